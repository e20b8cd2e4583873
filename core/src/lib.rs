use serde::{Deserialize, Serialize};

pub use board::*;
pub use camera::*;
pub use cell::*;
pub use controller::*;
pub use error::*;
pub use generator::*;
pub use geom::*;
pub use gesture::*;
pub use menu::*;
pub use settings::*;
pub use types::*;

mod board;
mod camera;
mod cell;
mod controller;
mod error;
mod generator;
mod geom;
mod gesture;
mod menu;
mod settings;
mod types;

/// Board dimensions and mine count, validated on construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    rows: Coord,
    cols: Coord,
    mines: CellCount,
}

impl GameConfig {
    pub(crate) const fn new_unchecked(rows: Coord, cols: Coord, mines: CellCount) -> Self {
        Self { rows, cols, mines }
    }

    /// Rejects empty boards, boards wider than [`Coord::MAX`] and boards with no safe cell.
    pub fn new(rows: usize, cols: usize, mines: usize) -> Result<Self> {
        let invalid = GameError::InvalidConfiguration { rows, cols, mines };

        let (Ok(row_count), Ok(col_count)) = (Coord::try_from(rows), Coord::try_from(cols)) else {
            return Err(invalid);
        };
        if row_count == 0 || col_count == 0 {
            return Err(invalid);
        }

        let total = mult(row_count, col_count);
        match CellCount::try_from(mines) {
            Ok(mine_count) if mine_count < total => {
                Ok(Self::new_unchecked(row_count, col_count, mine_count))
            }
            _ => Err(invalid),
        }
    }

    pub const fn rows(&self) -> Coord {
        self.rows
    }

    pub const fn cols(&self) -> Coord {
        self.cols
    }

    pub const fn size(&self) -> Coord2 {
        (self.rows, self.cols)
    }

    pub const fn mines(&self) -> CellCount {
        self.mines
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.rows, self.cols)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells() - self.mines
    }

    pub fn contains(&self, (row, col): Coord2) -> bool {
        row < self.rows && col < self.cols
    }
}

/// The three built-in presets offered on the menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Menu order, top to bottom.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Easy => GameConfig::new_unchecked(9, 9, 10),
            Medium => GameConfig::new_unchecked(16, 16, 40),
            Hard => GameConfig::new_unchecked(16, 30, 99),
        }
    }

    pub const fn label(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "Easy (9x9)",
            Medium => "Medium (16x16)",
            Hard => "Hard (16x30)",
        }
    }

    pub(crate) const fn menu_index(self) -> usize {
        self as usize
    }
}

/// Outcome of toggling a flag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

/// Outcome of revealing a cell
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    /// Whether this outcome could have caused an update to the board
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed | HitMine | Won => true,
        }
    }

    /// Whether the reveal ended the game
    pub const fn is_final(self) -> bool {
        matches!(self, Self::HitMine | Self::Won)
    }
}
