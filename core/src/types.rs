/// Single board axis, used for row/column counts and positions.
pub type Coord = u8;

/// Count type used for mine counts and cell totals.
pub type CellCount = u16;

/// Board position as `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    (a as CellCount).saturating_mul(b as CellCount)
}

/// Chebyshev distance, so every cell of a 3x3 block is within 1 of its center.
pub const fn chebyshev((r0, c0): Coord2, (r1, c1): Coord2) -> Coord {
    let dr = r0.abs_diff(r1);
    let dc = c0.abs_diff(c1);
    if dr > dc { dr } else { dc }
}

const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// In-bounds 8-neighborhood of `center` on a board of `size` rows and columns.
pub fn neighbors(center: Coord2, size: Coord2) -> impl Iterator<Item = Coord2> + use<> {
    let (row, col) = center;
    let (rows, cols) = size;
    OFFSETS.into_iter().filter_map(move |(dr, dc)| {
        let r = row.checked_add_signed(dr).filter(|&r| r < rows)?;
        let c = col.checked_add_signed(dc).filter(|&c| c < cols)?;
        Some((r, c))
    })
}

/// Number of cells of the clipped 3x3 block around `center`, the center included.
pub fn block_len(center: Coord2, size: Coord2) -> CellCount {
    1 + neighbors(center, size).count() as CellCount
}
