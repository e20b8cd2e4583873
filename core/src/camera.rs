use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Header height as a fraction of the screen height.
    pub header_ratio: f32,
    /// On-screen size a cell may reach at full zoom, in pixels.
    pub max_cell_pixels: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            header_ratio: 0.08,
            max_cell_pixels: 90.0,
        }
    }
}

impl ViewConfig {
    pub fn header_height(&self, screen: Size) -> f32 {
        screen.height * self.header_ratio
    }
}

/// Unzoomed placement of the board below the header: square cells, fitted on one axis and centered on the other.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub screen: Size,
    pub header_height: f32,
    pub rows: Coord,
    pub cols: Coord,
    pub cell_size: f32,
    /// Top-left corner of the board in board space.
    pub origin: Point,
}

impl BoardLayout {
    pub fn compute(screen: Size, header_height: f32, rows: Coord, cols: Coord) -> Self {
        let available_width = screen.width;
        let available_height = screen.height - header_height;

        let cell_size =
            (available_width / f32::from(cols)).min(available_height / f32::from(rows));
        let board_width = cell_size * f32::from(cols);
        let board_height = cell_size * f32::from(rows);

        Self {
            screen,
            header_height,
            rows,
            cols,
            cell_size,
            origin: Point::new(
                (available_width - board_width) / 2.0,
                header_height + (available_height - board_height) / 2.0,
            ),
        }
    }

    /// Screen area below the header.
    pub fn play_area(&self) -> Rect {
        Rect::new(
            0.0,
            self.header_height,
            self.screen.width,
            self.screen.height - self.header_height,
        )
    }

    pub fn board_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.cell_size * f32::from(self.cols),
            self.cell_size * f32::from(self.rows),
        )
    }

    pub fn cell_rect(&self, (row, col): Coord2) -> Rect {
        Rect::new(
            self.origin.x + f32::from(col) * self.cell_size,
            self.origin.y + f32::from(row) * self.cell_size,
            self.cell_size,
            self.cell_size,
        )
    }

    /// Cell under a board-space point.
    pub fn cell_at(&self, point: Point) -> Option<Coord2> {
        let row = ((point.y - self.origin.y) / self.cell_size).floor();
        let col = ((point.x - self.origin.x) / self.cell_size).floor();
        let in_range = |value: f32, len: Coord| value >= 0.0 && value < f32::from(len);
        (in_range(row, self.rows) && in_range(col, self.cols))
            .then_some((row as Coord, col as Coord))
    }
}

/// Pan/zoom transform between screen space and board space.
///
/// A board point at `target` is drawn at the screen point `anchor`, scaled by `zoom` around it.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    target: Point,
    anchor: Point,
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Point::ZERO,
            anchor: Point::ZERO,
            zoom: 1.0,
            min_zoom: 1.0,
            max_zoom: 1.0,
        }
    }
}

impl Camera {
    /// Fully zoomed-out camera centered on the board.
    pub fn new(layout: &BoardLayout, config: &ViewConfig) -> Self {
        let min_zoom = 1.0;
        Self {
            target: layout.board_rect().center(),
            anchor: layout.play_area().center(),
            zoom: 1.0,
            min_zoom,
            max_zoom: (config.max_cell_pixels / layout.cell_size).max(min_zoom),
        }
    }

    pub fn target(&self) -> Point {
        self.target
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn screen_to_board(&self, point: Point) -> Point {
        (point - self.anchor) / self.zoom + self.target
    }

    pub fn board_to_screen(&self, point: Point) -> Point {
        (point - self.target) * self.zoom + self.anchor
    }

    pub fn set_target(&mut self, target: Point) {
        self.target = target;
    }

    /// Changes the zoom, clamped to the camera limits, keeping the board point under `focal` in place.
    pub fn apply_zoom(&mut self, focal: Point, zoom: f32) {
        let before = self.screen_to_board(focal);
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
        let after = self.screen_to_board(focal);
        self.target += before - after;
    }

    /// Drags the board by `delta` screen pixels, so the content follows the finger.
    pub fn apply_pan(&mut self, delta: Point) {
        self.target -= delta / self.zoom;
    }

    /// Keeps the visible area inside the board on each axis, or centers an axis the board does not fill.
    pub fn clamp(&mut self, layout: &BoardLayout) {
        let board = layout.board_rect();
        let play = layout.play_area();
        let center = board.center();

        let clamp_axis = |target: f32, start: f32, board_len: f32, visible_len: f32, center: f32| {
            if board_len > visible_len {
                target.clamp(start + visible_len / 2.0, start + board_len - visible_len / 2.0)
            } else {
                center
            }
        };

        self.target.x = clamp_axis(
            self.target.x,
            board.x,
            board.width,
            play.width / self.zoom,
            center.x,
        );
        self.target.y = clamp_axis(
            self.target.y,
            board.y,
            board.height,
            play.height / self.zoom,
            center.y,
        );
    }
}

/// Layout and camera of the board currently on screen.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub layout: BoardLayout,
    pub camera: Camera,
}

impl Viewport {
    pub fn new(screen: Size, (rows, cols): Coord2, config: &ViewConfig) -> Self {
        let layout = BoardLayout::compute(screen, config.header_height(screen), rows, cols);
        let camera = Camera::new(&layout, config);
        log::debug!(
            "Layout {}x{} on {:?}: cell size {}, zoom up to {}",
            rows,
            cols,
            screen,
            layout.cell_size,
            camera.max_zoom()
        );
        Self { layout, camera }
    }

    /// Cell under a screen point, through the camera.
    pub fn cell_at_screen(&self, point: Point) -> Option<Coord2> {
        self.layout.cell_at(self.camera.screen_to_board(point))
    }

    /// Screen point at the middle of a cell.
    pub fn cell_center_on_screen(&self, coords: Coord2) -> Point {
        self.camera
            .board_to_screen(self.layout.cell_rect(coords).center())
    }

    pub fn zoom_at(&mut self, focal: Point, zoom: f32) {
        self.camera.apply_zoom(focal, zoom);
        self.camera.clamp(&self.layout);
    }

    /// Moves the camera to `from_target` dragged by `drag` screen pixels.
    pub fn pan_from(&mut self, from_target: Point, drag: Point) {
        self.camera.set_target(from_target);
        self.camera.apply_pan(drag);
        self.camera.clamp(&self.layout);
    }
}
