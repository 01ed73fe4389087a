//! Level editor model.
//!
//! Everything the editor does goes through the [`TileGrid`] mutation API, so
//! a level saved here loads in the game unchanged. The editor works at the
//! logical resolution and is shown at [`RENDER_SCALE`]; cursor positions come
//! in window pixels and are scaled down before use.

use std::path::{Path, PathBuf};

use glam::Vec2;
use log::info;

use crate::assets::AssetProvider;
use crate::resources::levelfile::LevelError;
use crate::resources::tilegrid::{CellPos, TileGrid, TileKind};
use crate::systems::render::Renderer;

pub const RENDER_SCALE: f32 = 2.0;
/// Camera speed in pixels per frame while a scroll key is held.
pub const SCROLL_SPEED: f32 = 2.0;
const DEFAULT_TILE_SIZE: u32 = 16;
const PREVIEW_POS: Vec2 = Vec2::new(5.0, 5.0);

/// One frame of editor input.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EditorInput {
    pub scroll_left: bool,
    pub scroll_right: bool,
    pub scroll_up: bool,
    pub scroll_down: bool,
    /// Cursor position in window pixels.
    pub cursor: Vec2,
    /// Left button went down this frame.
    pub place_pressed: bool,
    pub place_held: bool,
    pub erase_held: bool,
    /// Wheel steps this frame; negative is up.
    pub wheel: i32,
    /// Wheel cycles variants instead of groups while held.
    pub shift: bool,
    pub toggle_grid: bool,
    pub autotile: bool,
    pub save: bool,
}

pub struct EditorState {
    pub grid: TileGrid,
    pub level_path: PathBuf,
    pub camera_offset: Vec2,
    /// Tile kinds with at least one image, and how many variants each has.
    pub palette: Vec<(TileKind, u32)>,
    pub tile_group: usize,
    pub tile_variant: u32,
    pub snap_to_grid: bool,
}

impl EditorState {
    pub fn new(grid: TileGrid, level_path: impl Into<PathBuf>, assets: &dyn AssetProvider) -> Self {
        let palette = TileKind::ALL
            .iter()
            .map(|kind| (*kind, assets.variant_count(*kind)))
            .filter(|(_, count)| *count > 0)
            .collect();
        Self {
            grid,
            level_path: level_path.into(),
            camera_offset: Vec2::ZERO,
            palette,
            tile_group: 0,
            tile_variant: 0,
            snap_to_grid: true,
        }
    }

    /// Open a level for editing; a missing file starts an empty level.
    pub fn open(path: impl AsRef<Path>, assets: &dyn AssetProvider) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let grid = match TileGrid::load(path) {
            Ok(grid) => grid,
            Err(LevelError::NotFound(_)) => {
                info!("{} does not exist yet, starting an empty level", path.display());
                TileGrid::new(DEFAULT_TILE_SIZE)
            }
            Err(e) => return Err(e),
        };
        Ok(Self::new(grid, path, assets))
    }

    /// Kind and variant the next click places.
    pub fn current(&self) -> Option<(TileKind, u32)> {
        self.palette
            .get(self.tile_group)
            .map(|(kind, _)| (*kind, self.tile_variant))
    }

    pub fn cursor_world(&self, cursor: Vec2) -> Vec2 {
        cursor / RENDER_SCALE + self.camera_offset
    }

    pub fn hovered_cell(&self, cursor: Vec2) -> CellPos {
        CellPos::from_pixel(self.cursor_world(cursor), self.grid.tile_size())
    }

    fn cycle_group(&mut self, step: i32) {
        let len = self.palette.len() as i32;
        if len == 0 {
            return;
        }
        self.tile_group = (self.tile_group as i32 + step).rem_euclid(len) as usize;
        self.tile_variant = 0;
    }

    fn cycle_variant(&mut self, step: i32) {
        let Some((_, count)) = self.palette.get(self.tile_group) else {
            return;
        };
        let count = *count as i32;
        self.tile_variant = (self.tile_variant as i32 + step).rem_euclid(count) as u32;
    }

    /// Apply one frame of input. Only saving can fail.
    pub fn update(&mut self, input: &EditorInput, assets: &dyn AssetProvider) -> Result<(), LevelError> {
        self.camera_offset.x += (input.scroll_right as i32 - input.scroll_left as i32) as f32 * SCROLL_SPEED;
        self.camera_offset.y += (input.scroll_down as i32 - input.scroll_up as i32) as f32 * SCROLL_SPEED;

        if input.wheel != 0 {
            if input.shift {
                self.cycle_variant(input.wheel);
            } else {
                self.cycle_group(input.wheel);
            }
        }

        if input.toggle_grid {
            self.snap_to_grid = !self.snap_to_grid;
        }
        if input.autotile {
            let changed = self.grid.autotile();
            info!("Autotile changed {} tiles", changed);
        }

        let world = self.cursor_world(input.cursor);
        let cell = self.hovered_cell(input.cursor);
        if let Some((kind, variant)) = self.current() {
            if self.snap_to_grid && input.place_held {
                self.grid.place(kind, variant, cell);
            } else if !self.snap_to_grid && input.place_pressed {
                self.grid.push_offgrid(kind, variant, world);
            }
        }
        if input.erase_held {
            self.grid.remove(cell);
            self.grid.remove_offgrid_at(world, assets);
        }

        if input.save {
            self.grid.save(&self.level_path)?;
            info!("Saved level to {}", self.level_path.display());
        }
        Ok(())
    }

    /// Draw the level, the placement ghost under the cursor and the
    /// selected tile in the corner.
    pub fn render(&self, renderer: &mut dyn Renderer, assets: &dyn AssetProvider, cursor: Vec2) {
        let offset = self.camera_offset.trunc();
        self.grid.render(renderer, assets, offset);

        let Some(image) = self
            .current()
            .and_then(|(kind, variant)| assets.tile_image(kind, variant))
        else {
            return;
        };
        let ghost = if self.snap_to_grid {
            self.hovered_cell(cursor).to_pixel(self.grid.tile_size()) - self.camera_offset
        } else {
            cursor / RENDER_SCALE
        };
        renderer.draw_image(image.id, ghost, false);
        renderer.draw_image(image.id, PREVIEW_POS, false);
    }
}
