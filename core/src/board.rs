use std::collections::VecDeque;
use std::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - Ready -> Active (first reveal places the mines)
/// - Ready | Active -> Won
/// - Ready | Active -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    /// Waiting for the first reveal, no mines placed yet
    #[default]
    Ready,
    Active,
    Won,
    Lost,
}

impl BoardState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// A single game's grid, from the first reveal to a win or a loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    config: GameConfig,
    cells: Array2<Cell>,
    revealed_count: CellCount,
    flag_count: CellCount,
    state: BoardState,
    seed: u64,
}

impl Board {
    /// All-clear board; mines are placed by the first reveal using `seed`.
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            cells: Array2::default(config.size().to_nd_index()),
            revealed_count: 0,
            flag_count: 0,
            state: BoardState::Ready,
            seed,
        }
    }

    /// Board with a fixed layout, ready to be played without the first-reveal placement.
    pub fn with_mines(config: GameConfig, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());
        for &coords in mine_coords {
            if !config.contains(coords) {
                return Err(GameError::InvalidCoords);
            }
            mines[coords.to_nd_index()] = true;
        }

        let placed = mines.iter().filter(|&&mine| mine).count();
        let config = GameConfig::new(config.rows().into(), config.cols().into(), placed)?;
        let mut board = Self::new(config, 0);
        board.apply_mines(&mines);
        Ok(board)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines()
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn flag_count(&self) -> CellCount {
        self.flag_count
    }

    /// How many mines have not been flagged yet, negative when over-flagged
    pub fn mines_left(&self) -> isize {
        (self.config.mines() as isize) - (self.flag_count as isize)
    }

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn first_click_pending(&self) -> bool {
        self.state.is_ready()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn cell(&self, coords: Coord2) -> Option<Cell> {
        self.config
            .contains(coords)
            .then(|| self.cells[coords.to_nd_index()])
    }

    /// Row-major iteration over every cell.
    pub fn iter_cells(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((row, col), &cell)| ((row as Coord, col as Coord), cell))
    }

    /// Places the mines around `safe` and computes every neighbor count. Only the first call has an effect.
    pub fn place_mines(&mut self, safe: Coord2) {
        if !self.state.is_ready() {
            log::warn!("Mines already placed, ignoring placement around {:?}", safe);
            return;
        }
        if !self.config.contains(safe) {
            log::warn!("Safe cell {:?} outside of the board, ignoring", safe);
            return;
        }

        let mines = RandomMinefieldGenerator::new(self.seed, safe).generate(self.config);
        self.apply_mines(&mines);
    }

    fn apply_mines(&mut self, mines: &Array2<bool>) {
        for (cell, &mine) in self.cells.iter_mut().zip(mines.iter()) {
            cell.has_mine = mine;
        }
        self.count_neighbor_mines();
        self.state = BoardState::Active;
    }

    fn count_neighbor_mines(&mut self) {
        let size = self.size();
        let (rows, cols) = size;
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if self.cells[coords.to_nd_index()].has_mine {
                    continue;
                }
                let count = neighbors(coords, size)
                    .filter(|&pos| self.cells[pos.to_nd_index()].has_mine)
                    .count();
                self.cells[coords.to_nd_index()].neighbor_mines = count as u8;
            }
        }
    }

    /// Reveal a hidden, unflagged cell, cascading through zero cells
    pub fn reveal(&mut self, coords: Coord2) -> RevealOutcome {
        use RevealOutcome::*;

        if self.state.is_finished() {
            return NoChange;
        }
        match self.cell(coords) {
            Some(cell) if cell.is_pristine() => {}
            _ => return NoChange,
        }

        if self.state.is_ready() {
            self.place_mines(coords);
        }

        let cell = &mut self.cells[coords.to_nd_index()];
        cell.is_revealed = true;
        let (has_mine, count) = (cell.has_mine, cell.neighbor_mines);

        if has_mine {
            log::debug!("Hit mine at {:?}", coords);
            self.reveal_all_mines();
            self.state = BoardState::Lost;
            return HitMine;
        }

        self.revealed_count += 1;
        log::debug!("Reveal cell at {:?}, mine count: {}", coords, count);
        if count == 0 {
            self.flood_fill(coords);
        }

        if self.check_win() {
            self.state = BoardState::Won;
            Won
        } else {
            Revealed
        }
    }

    /// Breadth-first cascade from a revealed zero cell, returning how many cells it opened.
    fn flood_fill(&mut self, origin: Coord2) -> CellCount {
        let size = self.size();
        let revealed_before = self.revealed_count;
        let mut to_visit = VecDeque::from([origin]);

        while let Some(visit_coords) = to_visit.pop_front() {
            for pos in neighbors(visit_coords, size) {
                let neighbor = &mut self.cells[pos.to_nd_index()];
                if !neighbor.is_pristine() || neighbor.has_mine {
                    continue;
                }

                // revealed before queueing, so every cell is queued at most once
                neighbor.is_revealed = true;
                self.revealed_count += 1;
                if neighbor.neighbor_mines == 0 {
                    to_visit.push_back(pos);
                }
            }
        }
        let opened = self.revealed_count - revealed_before;
        log::trace!("Flood fill from {:?} done, {} cells revealed", origin, opened);
        opened
    }

    /// Flag or unflag a hidden cell
    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        if self.state.is_finished() {
            return MarkOutcome::NoChange;
        }
        let Some(cell) = self.cell(coords) else {
            return MarkOutcome::NoChange;
        };
        if cell.is_revealed {
            return MarkOutcome::NoChange;
        }

        let cell = &mut self.cells[coords.to_nd_index()];
        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flag_count += 1;
        } else {
            self.flag_count -= 1;
        }
        MarkOutcome::Changed
    }

    /// Every safe cell is revealed.
    pub fn check_win(&self) -> bool {
        self.revealed_count == self.config.safe_cells()
    }

    /// Shows every mine, flagged or not, leaving safe cells untouched.
    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|cell| cell.has_mine) {
            cell.is_revealed = true;
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}
