use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Thresholds separating taps, long presses, pans and pinches. Distances are screen pixels.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Movement past which a press is no longer a tap and may become a pan.
    pub tap_slop: f32,
    /// Movement allowed while holding for a long press.
    pub long_press_slop: f32,
    pub long_press_secs: f32,
    /// How far above the minimum zoom the camera must be before a drag pans.
    pub pan_zoom_epsilon: f32,
    /// Pinches starting with the contacts closer than this do not zoom.
    pub min_pinch_distance: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tap_slop: 12.0,
            long_press_slop: 15.0,
            long_press_secs: 0.5,
            pan_zoom_epsilon: 0.01,
            min_pinch_distance: 1.0,
        }
    }
}

/// Active contacts of one frame, in screen space. The first contact is the primary one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TouchSample {
    contacts: SmallVec<[Point; 2]>,
}

impl TouchSample {
    /// No contact, every finger lifted.
    pub fn released() -> Self {
        Self::default()
    }

    pub fn single(point: Point) -> Self {
        Self::from_iter([point])
    }

    pub fn pair(a: Point, b: Point) -> Self {
        Self::from_iter([a, b])
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    pub fn primary(&self) -> Option<Point> {
        self.contacts.first().copied()
    }

    /// First two contacts, if at least two are down.
    pub fn first_two(&self) -> Option<(Point, Point)> {
        match self.contacts.as_slice() {
            [a, b, ..] => Some((*a, *b)),
            _ => None,
        }
    }

    pub fn contacts(&self) -> &[Point] {
        &self.contacts
    }
}

impl FromIterator<Point> for TouchSample {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            contacts: iter.into_iter().collect(),
        }
    }
}

/// High-level result of a gesture, routed by the game controller.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureEvent {
    /// Quick press and release, at the press position.
    Tap(Point),
    /// Stationary hold, at the press position. Fires once per session.
    LongPress(Point),
    /// Camera target at the start of the pan, and the drag since then in screen pixels.
    Pan { from_target: Point, drag: Point },
    /// Requested zoom, unclamped, around the pinch midpoint.
    Zoom { focal: Point, zoom: f32 },
}

/// Where a session started and how far it went.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Press {
    pub start: Point,
    pub elapsed: f32,
    /// Distance of the primary contact from `start`, as of the latest sample.
    pub moved: f32,
}

impl Press {
    fn new(start: Point) -> Self {
        Self {
            start,
            elapsed: 0.0,
            moved: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GestureKind {
    None,
    TapOrHold,
    Pan,
    Pinch,
}

/// One touch interaction, from the first contact until every contact is lifted.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum GestureSession {
    #[default]
    Idle,
    /// Undecided: becomes a tap on release or a long press on timeout.
    TapOrHold { press: Press, long_press_fired: bool },
    Pan {
        press: Press,
        from_position: Point,
        from_target: Point,
    },
    /// Terminal for the session, even when a contact is lifted.
    Pinch {
        press: Press,
        start_distance: f32,
        start_zoom: f32,
    },
}

impl GestureSession {
    pub fn kind(&self) -> GestureKind {
        match self {
            Self::Idle => GestureKind::None,
            Self::TapOrHold { .. } => GestureKind::TapOrHold,
            Self::Pan { .. } => GestureKind::Pan,
            Self::Pinch { .. } => GestureKind::Pinch,
        }
    }

    pub fn press(&self) -> Option<Press> {
        match *self {
            Self::Idle => None,
            Self::TapOrHold { press, .. } | Self::Pan { press, .. } | Self::Pinch { press, .. } => {
                Some(press)
            }
        }
    }

    fn press_mut(&mut self) -> Option<&mut Press> {
        match self {
            Self::Idle => None,
            Self::TapOrHold { press, .. } | Self::Pan { press, .. } | Self::Pinch { press, .. } => {
                Some(press)
            }
        }
    }

    /// Advances the session by one frame of touch input.
    pub fn step(
        self,
        sample: &TouchSample,
        dt: f32,
        camera: &Camera,
        config: &GestureConfig,
    ) -> (Self, Option<GestureEvent>) {
        let Some(primary) = sample.primary() else {
            return (Self::Idle, self.release(config));
        };

        let session = match self {
            Self::Idle => Self::TapOrHold {
                press: Press::new(primary),
                long_press_fired: false,
            },
            active => active,
        };
        session.hold(sample, primary, dt, camera, config)
    }

    fn release(self, config: &GestureConfig) -> Option<GestureEvent> {
        match self {
            Self::TapOrHold {
                press,
                long_press_fired: false,
            } if press.moved < config.tap_slop => Some(GestureEvent::Tap(press.start)),
            _ => None,
        }
    }

    fn hold(
        mut self,
        sample: &TouchSample,
        primary: Point,
        dt: f32,
        camera: &Camera,
        config: &GestureConfig,
    ) -> (Self, Option<GestureEvent>) {
        if let Some(press) = self.press_mut() {
            press.elapsed += dt;
            press.moved = primary.distance(press.start);
        }

        if let (Some((a, b)), Some(press)) = (sample.first_two(), self.press()) {
            if !matches!(self, Self::Pinch { .. }) {
                self = Self::Pinch {
                    press,
                    start_distance: a.distance(b),
                    start_zoom: camera.zoom(),
                };
            }
        }

        if let Self::TapOrHold {
            press,
            long_press_fired: false,
        } = self
        {
            let zoomed_in = camera.zoom() > camera.min_zoom() + config.pan_zoom_epsilon;
            if sample.len() == 1 && press.moved > config.tap_slop && zoomed_in {
                self = Self::Pan {
                    press,
                    from_position: primary,
                    from_target: camera.target(),
                };
            }
        }

        let event = match &mut self {
            Self::Idle => None,
            Self::Pinch {
                start_distance,
                start_zoom,
                ..
            } => sample
                .first_two()
                .filter(|_| *start_distance > config.min_pinch_distance)
                .map(|(a, b)| GestureEvent::Zoom {
                    focal: a.midpoint(b),
                    zoom: *start_zoom * (a.distance(b) / *start_distance),
                }),
            Self::Pan {
                from_position,
                from_target,
                ..
            } => Some(GestureEvent::Pan {
                from_target: *from_target,
                drag: primary - *from_position,
            }),
            Self::TapOrHold {
                press,
                long_press_fired,
            } => {
                let held = press.elapsed >= config.long_press_secs;
                if !*long_press_fired && held && press.moved < config.long_press_slop {
                    *long_press_fired = true;
                    Some(GestureEvent::LongPress(press.start))
                } else {
                    None
                }
            }
        };
        (self, event)
    }
}

/// Owns the current session and feeds it one sample per frame.
#[derive(Clone, Debug, Default)]
pub struct GestureRecognizer {
    session: GestureSession,
    config: GestureConfig,
}

impl GestureRecognizer {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            session: GestureSession::Idle,
            config,
        }
    }

    pub fn session(&self) -> &GestureSession {
        &self.session
    }

    pub fn kind(&self) -> GestureKind {
        self.session.kind()
    }

    /// Drops the current session; contacts still down start a new one on the next sample.
    pub fn reset(&mut self) {
        self.session = GestureSession::Idle;
    }

    pub fn step(&mut self, sample: &TouchSample, dt: f32, camera: &Camera) -> Option<GestureEvent> {
        let before = self.session.kind();
        let (session, event) = self.session.step(sample, dt, camera, &self.config);
        self.session = session;

        if session.kind() != before {
            log::trace!("Gesture {:?} -> {:?}", before, session.kind());
        }
        if let Some(event) = event {
            log::trace!("Gesture event {:?}", event);
        }
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn zoomed_camera() -> Camera {
        let mut viewport = Viewport::new(
            Size::new(1080.0, 2400.0),
            Difficulty::Hard.config().size(),
            &ViewConfig::default(),
        );
        viewport.zoom_at(Point::new(540.0, 1200.0), 2.0);
        viewport.camera
    }

    fn run(
        recognizer: &mut GestureRecognizer,
        camera: &Camera,
        samples: impl IntoIterator<Item = TouchSample>,
    ) -> Vec<GestureEvent> {
        samples
            .into_iter()
            .filter_map(|sample| recognizer.step(&sample, DT, camera))
            .collect()
    }

    fn hold(point: Point, frames: usize) -> impl Iterator<Item = TouchSample> {
        std::iter::repeat_n(TouchSample::single(point), frames)
    }

    #[test]
    fn quick_press_is_a_tap() {
        let mut recognizer = GestureRecognizer::default();
        let camera = Camera::default();
        let start = Point::new(100.0, 100.0);

        let mut events = run(&mut recognizer, &camera, hold(start, 3));
        assert_eq!(recognizer.kind(), GestureKind::TapOrHold);
        events.extend(run(&mut recognizer, &camera, [TouchSample::released()]));

        assert_eq!(events, vec![GestureEvent::Tap(start)]);
        assert_eq!(recognizer.kind(), GestureKind::None);
    }

    #[test]
    fn stationary_hold_fires_one_long_press_and_no_tap() {
        let mut recognizer = GestureRecognizer::default();
        let camera = zoomed_camera();
        let start = Point::new(300.0, 900.0);
        let jitter = start + Point::new(3.0, -4.0);

        let samples = hold(start, 20)
            .chain(hold(jitter, 40))
            .chain([TouchSample::released()]);
        let events = run(&mut recognizer, &camera, samples);

        assert_eq!(events, vec![GestureEvent::LongPress(start)]);
    }

    #[test]
    fn long_press_needs_the_full_delay() {
        let mut recognizer = GestureRecognizer::default();
        let camera = Camera::default();
        let start = Point::new(300.0, 900.0);

        let samples = hold(start, 20).chain([TouchSample::released()]);
        let events = run(&mut recognizer, &camera, samples);

        assert_eq!(events, vec![GestureEvent::Tap(start)]);
    }

    #[test]
    fn drag_while_zoomed_in_pans_without_taps() {
        let mut recognizer = GestureRecognizer::default();
        let camera = zoomed_camera();
        let path = [0.0, 5.0, 10.0, 15.0, 25.0, 40.0]
            .map(|dx| TouchSample::single(Point::new(500.0 + dx, 1000.0)));

        let events = run(&mut recognizer, &camera, path);
        assert_eq!(recognizer.kind(), GestureKind::Pan);
        // keep holding still past the long press delay
        let mut rest = run(&mut recognizer, &camera, hold(Point::new(540.0, 1000.0), 60));
        rest.extend(run(&mut recognizer, &camera, [TouchSample::released()]));

        let from_target = camera.target();
        assert_eq!(
            events,
            vec![
                GestureEvent::Pan {
                    from_target,
                    drag: Point::ZERO
                },
                GestureEvent::Pan {
                    from_target,
                    drag: Point::new(10.0, 0.0)
                },
                GestureEvent::Pan {
                    from_target,
                    drag: Point::new(25.0, 0.0)
                },
            ]
        );
        assert!(
            rest.iter()
                .all(|event| matches!(event, GestureEvent::Pan { .. }))
        );
        assert_eq!(recognizer.kind(), GestureKind::None);
    }

    #[test]
    fn drag_at_min_zoom_neither_pans_nor_taps() {
        let mut recognizer = GestureRecognizer::default();
        let camera = Camera::default();
        let path = [0.0, 10.0, 20.0, 30.0]
            .map(|dy| TouchSample::single(Point::new(200.0, 800.0 + dy)))
            .into_iter()
            .chain(hold(Point::new(200.0, 830.0), 60))
            .chain([TouchSample::released()]);

        let events = run(&mut recognizer, &camera, path);

        assert!(events.is_empty(), "{events:?}");
    }

    #[test]
    fn movement_is_measured_from_the_start() {
        let mut recognizer = GestureRecognizer::default();
        let camera = Camera::default();
        let start = Point::new(200.0, 800.0);
        // wander off and come back near the start
        let path = [0.0, 8.0, 16.0, 8.0, 2.0]
            .map(|dx| TouchSample::single(start + Point::new(dx, 0.0)))
            .into_iter()
            .chain([TouchSample::released()]);

        let events = run(&mut recognizer, &camera, path);

        assert_eq!(events, vec![GestureEvent::Tap(start)]);
    }

    #[test]
    fn pinch_scales_zoom_around_midpoint() {
        let mut recognizer = GestureRecognizer::default();
        let camera = zoomed_camera();
        let a = Point::new(400.0, 1000.0);

        let samples = [
            TouchSample::pair(a, Point::new(600.0, 1000.0)),
            TouchSample::pair(a, Point::new(800.0, 1000.0)),
        ];
        let events = run(&mut recognizer, &camera, samples);

        assert_eq!(
            events,
            vec![
                GestureEvent::Zoom {
                    focal: Point::new(500.0, 1000.0),
                    zoom: 2.0
                },
                GestureEvent::Zoom {
                    focal: Point::new(600.0, 1000.0),
                    zoom: 4.0
                },
            ]
        );
    }

    #[test]
    fn pinch_is_terminal_for_the_session() {
        let mut recognizer = GestureRecognizer::default();
        let camera = zoomed_camera();
        let a = Point::new(400.0, 1000.0);

        let mut events = run(&mut recognizer, &camera, hold(a, 2));
        assert_eq!(recognizer.kind(), GestureKind::TapOrHold);
        events.extend(run(
            &mut recognizer,
            &camera,
            [TouchSample::pair(a, Point::new(500.0, 1000.0))],
        ));
        assert_eq!(recognizer.kind(), GestureKind::Pinch);
        let events_before_lift = events.len();

        // lifting one finger and dragging the other does not turn into a pan
        let samples = [0.0, 30.0, 60.0]
            .map(|dx| TouchSample::single(a + Point::new(dx, 0.0)))
            .into_iter()
            .chain(hold(a + Point::new(60.0, 0.0), 60))
            .chain([TouchSample::released()]);
        events.extend(run(&mut recognizer, &camera, samples));

        assert_eq!(events.len(), events_before_lift);
        assert_eq!(
            events,
            vec![GestureEvent::Zoom {
                focal: Point::new(450.0, 1000.0),
                zoom: camera.zoom()
            }]
        );
        assert_eq!(recognizer.kind(), GestureKind::None);
    }

    #[test]
    fn second_finger_turns_pan_into_pinch() {
        let mut recognizer = GestureRecognizer::default();
        let camera = zoomed_camera();
        let path = [0.0, 5.0, 10.0, 15.0, 25.0]
            .map(|dx| TouchSample::single(Point::new(500.0 + dx, 1000.0)));

        let panning = run(&mut recognizer, &camera, path);
        assert_eq!(recognizer.kind(), GestureKind::Pan);
        assert_eq!(panning.len(), 2);

        let a = Point::new(525.0, 1000.0);
        let samples = [
            TouchSample::pair(a, Point::new(725.0, 1000.0)),
            TouchSample::pair(a, Point::new(925.0, 1000.0)),
        ];
        let pinching = run(&mut recognizer, &camera, samples);
        assert_eq!(recognizer.kind(), GestureKind::Pinch);
        assert_eq!(
            pinching,
            vec![
                GestureEvent::Zoom {
                    focal: Point::new(625.0, 1000.0),
                    zoom: camera.zoom()
                },
                GestureEvent::Zoom {
                    focal: Point::new(725.0, 1000.0),
                    zoom: camera.zoom() * 2.0
                },
            ]
        );

        // the remaining finger keeps moving but the pan is over
        let rest = [0.0, 40.0, 80.0]
            .map(|dx| TouchSample::single(a + Point::new(dx, 0.0)))
            .into_iter()
            .chain([TouchSample::released()]);
        let after = run(&mut recognizer, &camera, rest);

        assert!(after.is_empty(), "{after:?}");
        assert_eq!(recognizer.kind(), GestureKind::None);
    }

    #[test]
    fn coincident_contacts_do_not_zoom() {
        let mut recognizer = GestureRecognizer::default();
        let camera = Camera::default();
        let a = Point::new(400.0, 1000.0);

        let samples = [
            TouchSample::pair(a, a),
            TouchSample::pair(a, a + Point::new(100.0, 0.0)),
            TouchSample::released(),
        ];
        let events = run(&mut recognizer, &camera, samples);

        assert!(events.is_empty(), "{events:?}");
    }

    #[test]
    fn released_session_starts_fresh() {
        let mut recognizer = GestureRecognizer::default();
        let camera = Camera::default();

        let first = hold(Point::new(10.0, 10.0), 40).chain([TouchSample::released()]);
        let second = hold(Point::new(50.0, 60.0), 2).chain([TouchSample::released()]);
        let events = run(&mut recognizer, &camera, first.chain(second));

        assert_eq!(
            events,
            vec![
                GestureEvent::LongPress(Point::new(10.0, 10.0)),
                GestureEvent::Tap(Point::new(50.0, 60.0)),
            ]
        );
    }

    #[test]
    fn pure_step_reports_press_data() {
        let camera = Camera::default();
        let config = GestureConfig::default();
        let start = Point::new(0.0, 0.0);

        let (session, event) =
            GestureSession::Idle.step(&TouchSample::single(start), 0.25, &camera, &config);
        let (session, _) = session.step(
            &TouchSample::single(Point::new(3.0, 4.0)),
            0.25,
            &camera,
            &config,
        );

        assert_eq!(event, None);
        let press = session.press().unwrap();
        assert_eq!(press.start, start);
        assert!((press.elapsed - 0.5).abs() < 1.0e-6);
        assert!((press.moved - 5.0).abs() < 1.0e-4);
    }
}
