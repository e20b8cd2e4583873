use serde::Serialize;
use touchsweeper_core::*;

pub fn glyph(view: CellView) -> char {
    match view {
        CellView::Hidden => '#',
        CellView::Flagged => 'F',
        CellView::Mine { .. } => '*',
        CellView::Open(0) => '.',
        CellView::Open(count) => char::from(b'0' + count),
    }
}

/// One line per row, one glyph per cell.
pub fn grid(board: &Board) -> String {
    let (rows, cols) = board.size();
    let mut out = String::with_capacity(rows as usize * (cols as usize + 1));
    for row in 0..rows {
        for col in 0..cols {
            out.push(glyph(board[(row, col)].view()));
        }
        out.push('\n');
    }
    out
}

/// Header line followed by the grid, if a board is on screen.
pub fn text(controller: &GameController) -> String {
    let mut out = format!("phase: {:?}", controller.phase());
    if let Some(board) = controller.board() {
        out += &format!(
            "  time: {}s  mines left: {}\n",
            controller.elapsed_secs(),
            board.mines_left()
        );
        out += &grid(board);
    } else {
        out.push('\n');
    }
    out
}

/// Everything a renderer would read from the controller after the last frame.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub elapsed_secs: u32,
    pub mines_left: Option<isize>,
    pub board: Option<&'a Board>,
    pub viewport: Option<&'a Viewport>,
}

impl<'a> Snapshot<'a> {
    pub fn capture(controller: &'a GameController) -> Self {
        Self {
            phase: controller.phase(),
            elapsed_secs: controller.elapsed_secs(),
            mines_left: controller.mines_left(),
            board: controller.board(),
            viewport: controller.viewport(),
        }
    }
}
