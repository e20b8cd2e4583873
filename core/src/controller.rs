use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Menu -> Playing
/// - Playing -> Won
/// - Playing -> Lost
/// - Playing | Won | Lost -> Menu
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Initial state, difficulty selection
    #[default]
    Menu,
    Playing,
    Won,
    Lost,
}

impl GamePhase {
    /// Indicates the game has ended and the board only waits for a tap
    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Everything the input collaborator hands over for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub screen: Size,
    /// Seconds since the previous frame.
    pub dt: f32,
    pub touches: TouchSample,
}

#[derive(Clone, Debug)]
struct Round {
    board: Board,
    viewport: Viewport,
}

/// Owns the whole game: phase, board, viewport, gesture session and timer.
#[derive(Clone, Debug)]
pub struct GameController {
    settings: Settings,
    phase: GamePhase,
    screen: Size,
    round: Option<Round>,
    gesture: GestureRecognizer,
    elapsed: f32,
    rng: SmallRng,
}

impl GameController {
    /// `seed` drives the mine layouts of every game started by this controller.
    pub fn new(settings: Settings, seed: u64) -> Self {
        Self {
            settings,
            phase: GamePhase::Menu,
            screen: Size::default(),
            round: None,
            gesture: GestureRecognizer::new(settings.gesture),
            elapsed: 0.0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn screen(&self) -> Size {
        self.screen
    }

    /// Board of the current or just finished game, `None` on the menu.
    pub fn board(&self) -> Option<&Board> {
        self.round.as_ref().map(|round| &round.board)
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.round.as_ref().map(|round| &round.viewport)
    }

    pub fn gesture_kind(&self) -> GestureKind {
        self.gesture.kind()
    }

    /// Play time of the current game, frozen once it is won or lost.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed as u32
    }

    pub fn mines_left(&self) -> Option<isize> {
        self.board().map(Board::mines_left)
    }

    pub fn menu(&self) -> MenuLayout {
        MenuLayout::new(self.screen)
    }

    pub fn header(&self) -> HeaderLayout {
        HeaderLayout::new(
            self.screen.width,
            self.settings.view.header_height(self.screen),
        )
    }

    /// Starts a custom game, leaving everything untouched when the configuration is invalid.
    pub fn new_game(&mut self, rows: usize, cols: usize, mines: usize) -> Result<()> {
        let config = GameConfig::new(rows, cols, mines)?;
        let seed = self.rng.random();
        self.play_board(Board::new(config, seed));
        Ok(())
    }

    pub fn start(&mut self, difficulty: Difficulty) {
        log::debug!("Starting {:?} game", difficulty);
        let seed = self.rng.random();
        self.play_board(Board::new(difficulty.config(), seed));
    }

    /// Starts playing on a prepared board, e.g. one with a fixed mine layout.
    pub fn play_board(&mut self, board: Board) {
        let viewport = Viewport::new(self.screen, board.size(), &self.settings.view);
        self.round = Some(Round { board, viewport });
        self.elapsed = 0.0;
        self.set_phase(GamePhase::Playing);
    }

    pub fn return_to_menu(&mut self) {
        self.round = None;
        self.set_phase(GamePhase::Menu);
    }

    fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!(
                "Phase {:?} -> {:?} after {:.1}s",
                self.phase,
                phase,
                self.elapsed
            );
            self.phase = phase;
        }
    }

    /// Runs one frame: resize, timer, then the touch sample.
    pub fn update(&mut self, input: &FrameInput) {
        self.resize(input.screen);

        if self.phase == GamePhase::Playing {
            self.elapsed += input.dt;
        }

        let camera = self
            .viewport()
            .map(|viewport| viewport.camera)
            .unwrap_or_default();
        if let Some(event) = self.gesture.step(&input.touches, input.dt, &camera) {
            self.handle(event);
        }
    }

    fn resize(&mut self, screen: Size) {
        if screen == self.screen {
            return;
        }
        log::debug!("Screen resized from {:?} to {:?}", self.screen, screen);
        self.screen = screen;

        if let Some(round) = &mut self.round {
            round.viewport = Viewport::new(screen, round.board.size(), &self.settings.view);
            self.gesture.reset();
        }
    }

    fn handle(&mut self, event: GestureEvent) {
        use GamePhase::*;
        use GestureEvent::*;

        match (self.phase, event) {
            (Menu, Tap(point)) => {
                if let Some(difficulty) = self.menu().hit_test(point) {
                    self.start(difficulty);
                }
            }
            (Playing, Tap(point)) if self.header().hits_restart(point) => self.return_to_menu(),
            (Playing, Tap(point)) => self.reveal_at(point),
            (Playing, LongPress(point)) => self.flag_at(point),
            (Playing, Pan { from_target, drag }) => {
                if let Some(round) = &mut self.round {
                    round.viewport.pan_from(from_target, drag);
                }
            }
            (Playing, Zoom { focal, zoom }) => {
                if let Some(round) = &mut self.round {
                    round.viewport.zoom_at(focal, zoom);
                }
            }
            (phase, Tap(_)) if phase.is_final() => self.return_to_menu(),
            (phase, event) => log::trace!("Ignoring {:?} during {:?}", event, phase),
        }
    }

    fn reveal_at(&mut self, point: Point) {
        let Some(round) = &mut self.round else {
            return;
        };
        let Some(coords) = round.viewport.cell_at_screen(point) else {
            return;
        };

        let outcome = round.board.reveal(coords);
        if !outcome.has_update() {
            log::trace!("Nothing to reveal at {:?}", coords);
        } else if outcome.is_final() {
            let phase = match outcome {
                RevealOutcome::Won => GamePhase::Won,
                _ => GamePhase::Lost,
            };
            self.set_phase(phase);
        }
    }

    fn flag_at(&mut self, point: Point) {
        let Some(round) = &mut self.round else {
            return;
        };
        if let Some(coords) = round.viewport.cell_at_screen(point)
            && round.board.toggle_flag(coords).has_update()
        {
            log::debug!("Toggled flag at {:?}", coords);
        }
    }
}
