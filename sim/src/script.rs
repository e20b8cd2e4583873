//! Scripted touch traces, replayed frame by frame against a [`GameController`].
//!
//! ```toml
//! frame_dt = 0.016
//! screen = { width = 1080.0, height = 2400.0 }
//!
//! [[step]]
//! frames = 40
//! touches = [[540.0, 1100.0]]
//!
//! [[step]]
//! cells = [[4, 4]]
//! ```

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use touchsweeper_core::*;

const DEFAULT_FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f32,
    pub screen: Size,
    /// Fixed layout to play on instead of going through the menu.
    #[serde(default)]
    pub board: Option<FixedBoard>,
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

fn default_frame_dt() -> f32 {
    DEFAULT_FRAME_DT
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixedBoard {
    pub rows: usize,
    pub cols: usize,
    pub mines: Vec<[usize; 2]>,
}

impl FixedBoard {
    pub fn build(&self) -> Result<Board> {
        let config = GameConfig::new(self.rows, self.cols, self.mines.len())?;
        let mines = self
            .mines
            .iter()
            .map(|&[row, col]| -> Result<Coord2> {
                Ok((Coord::try_from(row)?, Coord::try_from(col)?))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Board::with_mines(config, &mines)?)
    }
}

/// Contacts held for a number of frames. An empty step lifts every finger.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Step {
    #[serde(default = "default_frames")]
    pub frames: u32,
    /// Contacts in screen pixels.
    #[serde(default)]
    pub touches: Vec<[f32; 2]>,
    /// Contacts on cell centers, resolved through the camera of the frame.
    #[serde(default)]
    pub cells: Vec<[Coord; 2]>,
    /// New screen size from this step on.
    #[serde(default)]
    pub screen: Option<Size>,
}

fn default_frames() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq)]
pub enum Contacts {
    Screen(TouchSample),
    Cells(Vec<Coord2>),
}

impl Contacts {
    /// Screen sample for this frame. Cells can only be resolved while a board is on screen.
    pub fn resolve(&self, viewport: Option<&Viewport>) -> TouchSample {
        match self {
            Self::Screen(sample) => sample.clone(),
            Self::Cells(cells) => match viewport {
                Some(viewport) => cells
                    .iter()
                    .map(|&coords| viewport.cell_center_on_screen(coords))
                    .collect(),
                None => {
                    log::warn!("No board on screen, releasing instead of touching {:?}", cells);
                    TouchSample::released()
                }
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub screen: Size,
    pub dt: f32,
    pub contacts: Contacts,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self> {
        let script: Script = toml::from_str(text).context("Invalid script")?;
        script.validate()?;
        Ok(script)
    }

    fn validate(&self) -> Result<()> {
        if !(self.frame_dt.is_finite() && self.frame_dt >= 0.0) {
            bail!("frame_dt must be a non-negative number, got {}", self.frame_dt);
        }
        for (index, step) in self.steps.iter().enumerate() {
            if !step.touches.is_empty() && !step.cells.is_empty() {
                bail!("step {} mixes touches and cells", index + 1);
            }
        }
        Ok(())
    }

    /// Every frame of the script, each step repeated `frames` times.
    pub fn frames(&self) -> Vec<Frame> {
        let mut screen = self.screen;
        let mut frames = Vec::new();
        for step in &self.steps {
            if let Some(new_screen) = step.screen {
                screen = new_screen;
            }
            let contacts = if step.cells.is_empty() {
                Contacts::Screen(step.touches.iter().copied().map(Point::from).collect())
            } else {
                Contacts::Cells(step.cells.iter().map(|&[row, col]| (row, col)).collect())
            };
            frames.extend((0..step.frames).map(|_| Frame {
                screen,
                dt: self.frame_dt,
                contacts: contacts.clone(),
            }));
        }
        frames
    }

    /// Plays the whole script, ending with every finger lifted.
    pub fn replay(&self, controller: &mut GameController) -> Result<()> {
        controller.update(&FrameInput {
            screen: self.screen,
            dt: 0.0,
            touches: TouchSample::released(),
        });
        if let Some(board) = &self.board {
            controller.play_board(board.build().context("Invalid fixed board")?);
        }

        let frames = self.frames();
        log::info!("Replaying {} frames", frames.len());
        let mut last_screen = self.screen;
        for frame in &frames {
            let viewport = frame_viewport(controller, frame.screen);
            let touches = frame.contacts.resolve(viewport.as_ref());
            controller.update(&FrameInput {
                screen: frame.screen,
                dt: frame.dt,
                touches,
            });
            last_screen = frame.screen;
        }

        controller.update(&FrameInput {
            screen: last_screen,
            dt: self.frame_dt,
            touches: TouchSample::released(),
        });
        Ok(())
    }
}

/// Viewport the controller will use for a frame on `screen`, rebuilt the way a resize does.
fn frame_viewport(controller: &GameController, screen: Size) -> Option<Viewport> {
    let viewport = controller.viewport()?;
    if screen == controller.screen() {
        return Some(*viewport);
    }
    let size = (viewport.layout.rows, viewport.layout.cols);
    Some(Viewport::new(screen, size, &controller.settings().view))
}
