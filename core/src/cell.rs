use serde::{Deserialize, Serialize};

/// State of one board position. Only the owning [`crate::Board`] mutates it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) has_mine: bool,
    pub(crate) is_revealed: bool,
    pub(crate) is_flagged: bool,
    pub(crate) neighbor_mines: u8,
}

impl Cell {
    pub const fn has_mine(self) -> bool {
        self.has_mine
    }

    pub const fn is_revealed(self) -> bool {
        self.is_revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.is_flagged
    }

    /// Mined 8-neighbors, only meaningful for safe cells.
    pub const fn neighbor_mines(self) -> u8 {
        self.neighbor_mines
    }

    /// Hidden and unflagged, the only state a reveal acts on.
    pub const fn is_pristine(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }

    pub const fn view(self) -> CellView {
        match (self.is_revealed, self.has_mine) {
            (false, _) if self.is_flagged => CellView::Flagged,
            (false, _) => CellView::Hidden,
            (true, true) => CellView::Mine {
                flagged: self.is_flagged,
            },
            (true, false) => CellView::Open(self.neighbor_mines),
        }
    }
}

/// What a renderer should draw for a cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Open(u8),
    Mine { flagged: bool },
}

impl CellView {
    // whether the cell is visually closed
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}
