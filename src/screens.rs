//! Modal menu screens driven by the single top-level loop.
//!
//! Menus never run their own loop. The game keeps a [`ScreenStack`]; while it
//! is non-empty the simulation is paused and every frame's menu input goes to
//! the top screen instead. A screen can open a child screen, and when the
//! child finishes its result is handed back to the parent through
//! [`Screen::on_child_result`].
//!
//! - [`PauseScreen`] – Resume / Levels / Exit
//! - [`LevelSelectScreen`] – grid of levels, only unlocked ones selectable

use glam::Vec2;
use log::debug;

use crate::events::audio::AudioCmd;
use crate::systems::render::{Renderer, Rgba};

const TITLE_Y: f32 = 25.0;
const ITEMS_Y: f32 = 75.0;
const ITEM_SPACING: f32 = 15.0;
const NORMAL_COLOR: Rgba = Rgba::new(160, 160, 160, 255);
const SELECTED_COLOR: Rgba = Rgba::WHITE;
const BACKDROP: Rgba = Rgba::new(0, 0, 0, 180);

/// Edge-triggered menu navigation for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub confirm: bool,
    pub back: bool,
}

/// What a finished menu asks the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuResult {
    /// Keep playing; load this level if it is not the current one.
    Level(u32),
    Exit,
}

/// What a screen wants after handling input.
pub enum ScreenAction {
    None,
    Push(Box<dyn Screen>),
}

pub trait Screen {
    fn handle_input(&mut self, input: &MenuInput, audio: &mut Vec<AudioCmd>) -> ScreenAction;
    fn render(&self, renderer: &mut dyn Renderer);
    fn is_done(&self) -> bool;
    fn result(&self) -> Option<MenuResult>;
    /// Called when a child pushed by this screen finishes.
    fn on_child_result(&mut self, _result: MenuResult) {}
}

/// Stack of open screens; the top one receives input.
#[derive(Default)]
pub struct ScreenStack {
    screens: Vec<Box<dyn Screen>>,
    audio: Vec<AudioCmd>,
}

impl ScreenStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        !self.screens.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.screens.len()
    }

    pub fn push(&mut self, screen: Box<dyn Screen>) {
        self.screens.push(screen);
    }

    /// Feed input to the top screen and unwind finished screens.
    ///
    /// Returns the final result once the bottom screen is done.
    pub fn handle_input(&mut self, input: &MenuInput) -> Option<MenuResult> {
        let top = self.screens.last_mut()?;
        if let ScreenAction::Push(child) = top.handle_input(input, &mut self.audio) {
            self.screens.push(child);
            return None;
        }

        while let Some(top) = self.screens.last() {
            if !top.is_done() {
                break;
            }
            let result = top.result();
            self.screens.pop();
            debug!("Screen closed with {:?}", result);
            match (self.screens.last_mut(), result) {
                (Some(parent), Some(result)) => parent.on_child_result(result),
                (None, result) => return result,
                (Some(_), None) => {}
            }
        }
        None
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        if let Some(top) = self.screens.last() {
            top.render(renderer);
        }
    }

    /// Sounds the screens asked for since the last call.
    pub fn drain_audio(&mut self) -> Vec<AudioCmd> {
        std::mem::take(&mut self.audio)
    }
}

fn draw_backdrop(renderer: &mut dyn Renderer, title: &str) {
    let view = renderer.view_size();
    renderer.fill_polygon(
        &[
            Vec2::ZERO,
            Vec2::new(view.x, 0.0),
            view,
            Vec2::new(0.0, view.y),
        ],
        BACKDROP,
    );
    renderer.draw_text(title, Vec2::new(view.x / 2.0 - 40.0, TITLE_Y), Rgba::WHITE);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Resume,
    Levels,
    Exit,
}

impl PauseItem {
    pub const ALL: [PauseItem; 3] = [PauseItem::Resume, PauseItem::Levels, PauseItem::Exit];

    pub fn label(self) -> &'static str {
        match self {
            PauseItem::Resume => "Resume",
            PauseItem::Levels => "Levels",
            PauseItem::Exit => "Exit",
        }
    }
}

pub struct PauseScreen {
    pub selected_index: usize,
    current_level: u32,
    max_level: u32,
    result: Option<MenuResult>,
}

impl PauseScreen {
    pub fn new(current_level: u32, max_level: u32) -> Self {
        Self {
            selected_index: 0,
            current_level,
            max_level,
            result: None,
        }
    }
}

impl Screen for PauseScreen {
    fn handle_input(&mut self, input: &MenuInput, audio: &mut Vec<AudioCmd>) -> ScreenAction {
        let len = PauseItem::ALL.len();
        if input.up {
            self.selected_index = (self.selected_index + len - 1) % len;
            audio.push(AudioCmd::Click);
        } else if input.down {
            self.selected_index = (self.selected_index + 1) % len;
            audio.push(AudioCmd::Click);
        } else if input.confirm {
            audio.push(AudioCmd::Click);
            match PauseItem::ALL[self.selected_index] {
                PauseItem::Resume => self.result = Some(MenuResult::Level(self.current_level)),
                PauseItem::Levels => {
                    return ScreenAction::Push(Box::new(LevelSelectScreen::new(
                        self.current_level,
                        self.max_level,
                    )));
                }
                PauseItem::Exit => self.result = Some(MenuResult::Exit),
            }
        } else if input.back {
            self.result = Some(MenuResult::Level(self.current_level));
        }
        ScreenAction::None
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        draw_backdrop(renderer, "TRY-HARD");
        let x = renderer.view_size().x / 2.0 - 20.0;
        for (i, item) in PauseItem::ALL.iter().enumerate() {
            let color = if i == self.selected_index {
                SELECTED_COLOR
            } else {
                NORMAL_COLOR
            };
            let pos = Vec2::new(x, ITEMS_Y + i as f32 * ITEM_SPACING);
            renderer.draw_text(item.label(), pos, color);
        }
    }

    fn is_done(&self) -> bool {
        self.result.is_some()
    }

    fn result(&self) -> Option<MenuResult> {
        self.result
    }

    fn on_child_result(&mut self, result: MenuResult) {
        self.result = Some(result);
    }
}

pub const LEVELS_TOTAL: u32 = 10;
pub const LEVELS_PER_ROW: u32 = 5;
const LOCKED_COLOR: Rgba = Rgba::new(160, 160, 160, 255);
const CURSOR_COLOR: Rgba = Rgba::new(100, 100, 255, 255);
const CURRENT_COLOR: Rgba = Rgba::new(255, 255, 0, 255);

pub struct LevelSelectScreen {
    /// Level number under the cursor, 1-based.
    pub selected: u32,
    current_level: u32,
    max_level: u32,
    result: Option<MenuResult>,
}

impl LevelSelectScreen {
    pub fn new(current_level: u32, max_level: u32) -> Self {
        Self {
            selected: current_level.clamp(1, LEVELS_TOTAL),
            current_level,
            max_level,
            result: None,
        }
    }

    pub fn is_unlocked(&self, level: u32) -> bool {
        level <= self.max_level
    }

    fn cell_pos(level: u32, view: Vec2) -> Vec2 {
        let index = level - 1;
        let row = index / LEVELS_PER_ROW;
        let col = index % LEVELS_PER_ROW;
        Vec2::new(
            view.x / 2.0 + (col as f32 - 2.0) * 30.0,
            ITEMS_Y + row as f32 * 20.0,
        )
    }
}

impl Screen for LevelSelectScreen {
    fn handle_input(&mut self, input: &MenuInput, audio: &mut Vec<AudioCmd>) -> ScreenAction {
        let before = self.selected;
        if input.left && self.selected > 1 {
            self.selected -= 1;
        } else if input.right && self.selected < LEVELS_TOTAL {
            self.selected += 1;
        } else if input.up && self.selected > LEVELS_PER_ROW {
            self.selected -= LEVELS_PER_ROW;
        } else if input.down && self.selected + LEVELS_PER_ROW <= LEVELS_TOTAL {
            self.selected += LEVELS_PER_ROW;
        } else if input.confirm {
            if self.is_unlocked(self.selected) {
                audio.push(AudioCmd::Click);
                self.result = Some(MenuResult::Level(self.selected));
            }
        } else if input.back {
            self.result = Some(MenuResult::Level(self.current_level));
        }
        if self.selected != before {
            audio.push(AudioCmd::Click);
        }
        ScreenAction::None
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        draw_backdrop(renderer, "Levels");
        let view = renderer.view_size();
        for level in 1..=LEVELS_TOTAL {
            let color = if level == self.selected {
                CURSOR_COLOR
            } else if level == self.current_level {
                CURRENT_COLOR
            } else if self.is_unlocked(level) {
                Rgba::WHITE
            } else {
                LOCKED_COLOR
            };
            renderer.draw_text(&level.to_string(), Self::cell_pos(level, view), color);
        }
    }

    fn is_done(&self) -> bool {
        self.result.is_some()
    }

    fn result(&self) -> Option<MenuResult> {
        self.result
    }
}
