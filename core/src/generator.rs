use ndarray::Array2;

use crate::*;

pub trait MinefieldGenerator {
    /// Produces a mine mask of `config.size()` holding exactly `config.mines()` mines.
    fn generate(self, config: GameConfig) -> Array2<bool>;
}

/// How much of the board around the first reveal is kept free of mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SafeZone {
    /// Only the revealed cell itself.
    Cell,
    /// The revealed cell and its 8 neighbors, so the first reveal always cascades.
    Block,
}

/// Rejection sampler: draws cells uniformly and re-draws whenever the cell is already mined or inside the safe zone.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
    safe: Coord2,
    zone: SafeZone,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64, safe: Coord2) -> Self {
        Self {
            seed,
            safe,
            zone: SafeZone::Block,
        }
    }

    pub fn with_zone(mut self, zone: SafeZone) -> Self {
        self.zone = zone;
        self
    }

    fn effective_zone(&self, config: GameConfig) -> SafeZone {
        let free = config.total_cells() - block_len(self.safe, config.size());
        match self.zone {
            SafeZone::Block if config.mines() > free => {
                log::warn!(
                    "No room for {} mines outside the block at {:?}, only the cell stays safe",
                    config.mines(),
                    self.safe
                );
                SafeZone::Cell
            }
            zone => zone,
        }
    }

    fn excluded(&self, zone: SafeZone, coords: Coord2) -> bool {
        match zone {
            SafeZone::Cell => coords == self.safe,
            SafeZone::Block => chebyshev(coords, self.safe) <= 1,
        }
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: GameConfig) -> Array2<bool> {
        use rand::prelude::*;

        let zone = self.effective_zone(config);
        let (rows, cols) = config.size();
        let mut mines: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: CellCount = 0;
        let mut draws: u32 = 0;

        while placed < config.mines() {
            let coords = (rng.random_range(0..rows), rng.random_range(0..cols));
            draws += 1;
            if self.excluded(zone, coords) || mines[coords.to_nd_index()] {
                continue;
            }
            mines[coords.to_nd_index()] = true;
            placed += 1;
        }

        log::debug!(
            "Placed {} mines around safe cell {:?} with {} draws ({:?})",
            placed,
            self.safe,
            draws,
            zone
        );
        mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(mines: &Array2<bool>) -> usize {
        mines.iter().filter(|&&mine| mine).count()
    }

    #[test]
    fn same_seed_same_layout() {
        let config = Difficulty::Medium.config();
        let a = RandomMinefieldGenerator::new(42, (3, 5)).generate(config);
        let b = RandomMinefieldGenerator::new(42, (3, 5)).generate(config);
        let c = RandomMinefieldGenerator::new(43, (3, 5)).generate(config);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(count(&a), 40);
    }

    #[test]
    fn block_stays_clear() {
        let config = Difficulty::Hard.config();
        for seed in 0..50 {
            let safe = ((seed % 16) as Coord, (seed * 7 % 30) as Coord);
            let mines = RandomMinefieldGenerator::new(seed, safe).generate(config);

            assert_eq!(count(&mines), 99);
            for ((row, col), &mine) in mines.indexed_iter() {
                let coords = (row as Coord, col as Coord);
                if chebyshev(coords, safe) <= 1 {
                    assert!(!mine, "seed {seed}: mine at {coords:?} next to {safe:?}");
                }
            }
        }
    }

    #[test]
    fn crowded_board_falls_back_to_single_safe_cell() {
        // 3x3 board with 8 mines has room for nothing but the first reveal
        let config = GameConfig::new(3, 3, 8).unwrap();
        let mines = RandomMinefieldGenerator::new(7, (1, 1)).generate(config);

        assert_eq!(count(&mines), 8);
        assert!(!mines[[1, 1]]);
    }

    #[test]
    fn single_cell_zone_allows_adjacent_mines() {
        let config = GameConfig::new(5, 5, 24).unwrap();
        let mines = RandomMinefieldGenerator::new(3, (2, 2))
            .with_zone(SafeZone::Cell)
            .generate(config);

        assert_eq!(count(&mines), 24);
        assert!(!mines[[2, 2]]);
        assert!(mines[[1, 1]] && mines[[2, 3]] && mines[[3, 2]]);
    }
}
