use crate::*;

const BUTTON_WIDTH_RATIO: f32 = 0.6;
const BUTTON_HEIGHT_RATIO: f32 = 0.07;
const FIRST_BUTTON_Y_RATIO: f32 = 0.35;
/// Distance between button tops, in button heights.
const BUTTON_SPACING: f32 = 1.5;
/// Restart button side, as a fraction of the header height.
const RESTART_BUTTON_RATIO: f32 = 0.7;

/// Difficulty buttons of the start menu, proportional to the screen. Nothing is cached between queries.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MenuLayout {
    screen: Size,
}

impl MenuLayout {
    pub fn new(screen: Size) -> Self {
        Self { screen }
    }

    pub fn button_rect(&self, difficulty: Difficulty) -> Rect {
        let width = self.screen.width * BUTTON_WIDTH_RATIO;
        let height = self.screen.height * BUTTON_HEIGHT_RATIO;
        let top = self.screen.height * FIRST_BUTTON_Y_RATIO
            + height * BUTTON_SPACING * difficulty.menu_index() as f32;
        Rect::new((self.screen.width - width) / 2.0, top, width, height)
    }

    pub fn buttons(&self) -> impl Iterator<Item = (Difficulty, Rect)> + '_ {
        Difficulty::ALL
            .into_iter()
            .map(|difficulty| (difficulty, self.button_rect(difficulty)))
    }

    pub fn hit_test(&self, point: Point) -> Option<Difficulty> {
        self.buttons()
            .find(|(_, rect)| rect.contains(point))
            .map(|(difficulty, _)| difficulty)
    }
}

/// The strip above the board, holding the restart button.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HeaderLayout {
    screen_width: f32,
    height: f32,
}

impl HeaderLayout {
    pub fn new(screen_width: f32, height: f32) -> Self {
        Self {
            screen_width,
            height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.screen_width, self.height)
    }

    pub fn restart_button(&self) -> Rect {
        let side = self.height * RESTART_BUTTON_RATIO;
        Rect::new(
            (self.screen_width - side) / 2.0,
            (self.height - side) / 2.0,
            side,
            side,
        )
    }

    pub fn hits_restart(&self, point: Point) -> bool {
        self.restart_button().contains(point)
    }
}
