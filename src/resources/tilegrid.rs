//! Tile grid: the static level geometry.
//!
//! On-grid tiles are keyed by integer [`CellPos`]; off-grid decorations keep a
//! free pixel position and their list order is their draw order. The grid
//! answers every "what is solid here" question the physics needs, always
//! through a bounded 3x3 neighbourhood so per-frame cost does not depend on
//! level size.
//!
//! # Related
//!
//! - [`crate::resources::levelfile`] – serialized schema and [`LevelError`]
//! - [`crate::components::body::PhysicsBody`] – the main consumer of
//!   [`TileGrid::physics_rects_around`]

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use arrayvec::ArrayVec;
use bevy_ecs::prelude::Resource;
use glam::Vec2;
use log::{debug, info};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::assets::AssetProvider;
use crate::geometry::Rect;
use crate::resources::levelfile::{LevelError, LevelFile, OffgridRecord, TileRecord, cell_key};
use crate::systems::render::Renderer;

/// Category of a tile. Decides image set, solidity and autotiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Decor,
    Grass,
    LargeDecor,
    Stone,
    /// Authoring markers: variant 0 is the player start, 1 an enemy.
    #[serde(rename = "spawners", alias = "spawner")]
    Spawner,
}

impl TileKind {
    /// Every kind, in editor palette order.
    pub const ALL: [TileKind; 5] = [
        TileKind::Decor,
        TileKind::Grass,
        TileKind::LargeDecor,
        TileKind::Stone,
        TileKind::Spawner,
    ];

    /// Physical tiles block bodies and stop projectiles.
    pub fn is_physical(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone | TileKind::LargeDecor)
    }

    /// Autotiled kinds get their variant picked from their neighbours.
    pub fn is_autotiled(self) -> bool {
        matches!(self, TileKind::Grass | TileKind::Stone)
    }

    /// Name used in level files and asset directories.
    pub fn name(self) -> &'static str {
        match self {
            TileKind::Decor => "decor",
            TileKind::Grass => "grass",
            TileKind::LargeDecor => "large_decor",
            TileKind::Stone => "stone",
            TileKind::Spawner => "spawners",
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Integer cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cell containing a pixel. Floors, so `-0.5` lands in cell `-1`.
    pub fn from_pixel(pos: Vec2, tile_size: u32) -> Self {
        let ts = tile_size as f32;
        Self {
            x: (pos.x / ts).floor() as i32,
            y: (pos.y / ts).floor() as i32,
        }
    }

    /// Top-left pixel of the cell.
    pub fn to_pixel(self, tile_size: u32) -> Vec2 {
        Vec2::new(
            self.x as f32 * tile_size as f32,
            self.y as f32 * tile_size as f32,
        )
    }

    /// Neighbouring cell, clamped to the `i32` range.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Neighbouring cell, or `None` past the edge of the `i32` range.
    pub fn checked_offset(self, dx: i32, dy: i32) -> Option<Self> {
        Some(Self::new(self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }
}

impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.x, self.y)
    }
}

/// A tile occupying exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub variant: u32,
    pub cell: CellPos,
}

/// A decoration at a free pixel position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffgridTile {
    pub kind: TileKind,
    pub variant: u32,
    pub pos: Vec2,
}

/// Result of [`TileGrid::extract`]: always pixel space, whatever the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedTile {
    pub kind: TileKind,
    pub variant: u32,
    pub pos: Vec2,
}

/// Orthogonal neighbour bits used by the autotiler.
const NEIGHBOR_RIGHT: u8 = 1;
const NEIGHBOR_LEFT: u8 = 2;
const NEIGHBOR_UP: u8 = 4;
const NEIGHBOR_DOWN: u8 = 8;

const NEIGHBORS: [(u8, i32, i32); 4] = [
    (NEIGHBOR_RIGHT, 1, 0),
    (NEIGHBOR_LEFT, -1, 0),
    (NEIGHBOR_UP, 0, -1),
    (NEIGHBOR_DOWN, 0, 1),
];

/// Neighbour mask -> variant. `None` keeps the tile's current variant.
///
/// Variants 0/2/4/6 are the outer corners (top-left, top-right,
/// bottom-right, bottom-left), 1/3/5/7 the edges missing exactly one side
/// (top, right, bottom, left) and 8 the fully surrounded fill. Isolated
/// tiles, single-neighbour ends and vertical/horizontal strips are left to
/// the author.
const AUTOTILE_MAP: [Option<u32>; 16] = {
    let mut map = [None; 16];
    map[(NEIGHBOR_RIGHT | NEIGHBOR_DOWN) as usize] = Some(0);
    map[(NEIGHBOR_RIGHT | NEIGHBOR_DOWN | NEIGHBOR_LEFT) as usize] = Some(1);
    map[(NEIGHBOR_LEFT | NEIGHBOR_DOWN) as usize] = Some(2);
    map[(NEIGHBOR_LEFT | NEIGHBOR_UP | NEIGHBOR_DOWN) as usize] = Some(3);
    map[(NEIGHBOR_LEFT | NEIGHBOR_UP) as usize] = Some(4);
    map[(NEIGHBOR_LEFT | NEIGHBOR_UP | NEIGHBOR_RIGHT) as usize] = Some(5);
    map[(NEIGHBOR_RIGHT | NEIGHBOR_UP) as usize] = Some(6);
    map[(NEIGHBOR_RIGHT | NEIGHBOR_UP | NEIGHBOR_DOWN) as usize] = Some(7);
    map[(NEIGHBOR_RIGHT | NEIGHBOR_LEFT | NEIGHBOR_UP | NEIGHBOR_DOWN) as usize] = Some(8);
    map
};

/// Variant for a neighbour mask, if the mask is mapped.
pub fn autotile_variant(mask: u8) -> Option<u32> {
    AUTOTILE_MAP.get(mask as usize).copied().flatten()
}

/// Authoritative store of a level's tiles.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TileGrid {
    tiles: FxHashMap<CellPos, Tile>,
    offgrid: Vec<OffgridTile>,
    tile_size: u32,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(16)
    }
}

impl TileGrid {
    /// Empty grid. `tile_size` is fixed for the grid's lifetime.
    pub fn new(tile_size: u32) -> Self {
        assert!(tile_size > 0, "tile_size must be positive");
        Self {
            tiles: FxHashMap::default(),
            offgrid: Vec::new(),
            tile_size,
        }
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty() && self.offgrid.is_empty()
    }

    /// On-grid tiles in no particular order.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    /// Off-grid tiles in draw order.
    pub fn offgrid(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    pub fn tile_at(&self, cell: CellPos) -> Option<&Tile> {
        self.tiles.get(&cell)
    }

    pub fn tile_at_pixel(&self, pos: Vec2) -> Option<&Tile> {
        self.tile_at(CellPos::from_pixel(pos, self.tile_size))
    }

    /// True iff the pixel lies in a physical on-grid tile.
    pub fn solid_check(&self, pos: Vec2) -> bool {
        self.tile_at_pixel(pos)
            .is_some_and(|tile| tile.kind.is_physical())
    }

    /// Tiles in the 3x3 block of cells around the cell containing `pos`.
    pub fn tiles_around(&self, pos: Vec2) -> ArrayVec<&Tile, 9> {
        let center = CellPos::from_pixel(pos, self.tile_size);
        let mut found = ArrayVec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                let Some(cell) = center.checked_offset(dx, dy) else {
                    continue;
                };
                if let Some(tile) = self.tiles.get(&cell) {
                    found.push(tile);
                }
            }
        }
        found
    }

    /// One rect per physical tile in the 3x3 neighbourhood of `pos`.
    pub fn physics_rects_around(&self, pos: Vec2) -> ArrayVec<Rect, 9> {
        let ts = self.tile_size as f32;
        self.tiles_around(pos)
            .into_iter()
            .filter(|tile| tile.kind.is_physical())
            .map(|tile| {
                let origin = tile.cell.to_pixel(self.tile_size);
                Rect::new(origin.x, origin.y, ts, ts)
            })
            .collect()
    }

    /// Insert or replace the tile at `cell`, returning the previous one.
    pub fn place(&mut self, kind: TileKind, variant: u32, cell: CellPos) -> Option<Tile> {
        self.tiles.insert(
            cell,
            Tile {
                kind,
                variant,
                cell,
            },
        )
    }

    pub fn remove(&mut self, cell: CellPos) -> Option<Tile> {
        self.tiles.remove(&cell)
    }

    /// Append an off-grid tile on top of the existing ones.
    pub fn push_offgrid(&mut self, kind: TileKind, variant: u32, pos: Vec2) {
        self.offgrid.push(OffgridTile { kind, variant, pos });
    }

    /// Drop every off-grid tile matching `pred`. Returns how many went.
    pub fn remove_offgrid_where(&mut self, mut pred: impl FnMut(&OffgridTile) -> bool) -> usize {
        let before = self.offgrid.len();
        self.offgrid.retain(|tile| !pred(tile));
        before - self.offgrid.len()
    }

    /// Drop every off-grid tile whose image covers `point`.
    pub fn remove_offgrid_at(&mut self, point: Vec2, assets: &dyn AssetProvider) -> usize {
        self.remove_offgrid_where(|tile| {
            assets
                .tile_image(tile.kind, tile.variant)
                .is_some_and(|image| Rect::from_pos_size(tile.pos, image.size).contains_point(point))
        })
    }

    fn neighbor_mask(&self, tile: &Tile) -> u8 {
        let mut mask = 0;
        for (bit, dx, dy) in NEIGHBORS {
            let same_kind = tile
                .cell
                .checked_offset(dx, dy)
                .and_then(|cell| self.tiles.get(&cell))
                .is_some_and(|n| n.kind == tile.kind);
            if same_kind {
                mask |= bit;
            }
        }
        mask
    }

    /// Pick variants of autotiled kinds from their same-kind neighbours.
    ///
    /// Masks depend only on kinds and positions, never on variants, so the
    /// pass is order-independent and idempotent. Returns the number of tiles
    /// whose variant changed.
    pub fn autotile(&mut self) -> usize {
        let updates: Vec<(CellPos, u32)> = self
            .tiles
            .values()
            .filter(|tile| tile.kind.is_autotiled())
            .filter_map(|tile| {
                autotile_variant(self.neighbor_mask(tile))
                    .filter(|variant| *variant != tile.variant)
                    .map(|variant| (tile.cell, variant))
            })
            .collect();
        for (cell, variant) in &updates {
            if let Some(tile) = self.tiles.get_mut(cell) {
                tile.variant = *variant;
            }
        }
        debug!("autotile updated {} tiles", updates.len());
        updates.len()
    }

    /// Remove (or copy, when `keep`) every tile whose (kind, variant) is in
    /// `pairs`. Off-grid matches come first in list order, then on-grid
    /// matches sorted by cell; on-grid positions are converted to pixels.
    pub fn extract(&mut self, pairs: &[(TileKind, u32)], keep: bool) -> Vec<PlacedTile> {
        let wanted = |kind: TileKind, variant: u32| pairs.contains(&(kind, variant));
        let mut matches = Vec::new();

        for tile in &self.offgrid {
            if wanted(tile.kind, tile.variant) {
                matches.push(PlacedTile {
                    kind: tile.kind,
                    variant: tile.variant,
                    pos: tile.pos,
                });
            }
        }
        if !keep {
            self.offgrid.retain(|tile| !wanted(tile.kind, tile.variant));
        }

        let mut cells: Vec<CellPos> = self
            .tiles
            .values()
            .filter(|tile| wanted(tile.kind, tile.variant))
            .map(|tile| tile.cell)
            .collect();
        cells.sort_unstable();
        for cell in cells {
            let tile = if keep {
                self.tiles.get(&cell).copied()
            } else {
                self.tiles.remove(&cell)
            };
            if let Some(tile) = tile {
                matches.push(PlacedTile {
                    kind: tile.kind,
                    variant: tile.variant,
                    pos: tile.cell.to_pixel(self.tile_size),
                });
            }
        }
        matches
    }

    /// Number of tiles per kind, on-grid and off-grid together.
    pub fn count_by_kind(&self) -> BTreeMap<TileKind, usize> {
        let mut counts = BTreeMap::new();
        let kinds = self
            .tiles
            .values()
            .map(|t| t.kind)
            .chain(self.offgrid.iter().map(|t| t.kind));
        for kind in kinds {
            *counts.entry(kind).or_insert(0) += 1;
        }
        counts
    }

    /// Draw off-grid tiles, then the on-grid tiles inside the camera view
    /// widened by one cell on every side.
    pub fn render(&self, renderer: &mut dyn Renderer, assets: &dyn AssetProvider, offset: Vec2) {
        for tile in &self.offgrid {
            if let Some(image) = assets.tile_image(tile.kind, tile.variant) {
                renderer.draw_image(image.id, tile.pos - offset, false);
            }
        }

        let view = renderer.view_size();
        let min = CellPos::from_pixel(offset, self.tile_size).offset(-1, -1);
        let max = CellPos::from_pixel(offset + view, self.tile_size).offset(1, 1);
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                let Some(tile) = self.tiles.get(&CellPos::new(x, y)) else {
                    continue;
                };
                if let Some(image) = assets.tile_image(tile.kind, tile.variant) {
                    renderer.draw_image(image.id, tile.cell.to_pixel(self.tile_size) - offset, false);
                }
            }
        }
    }

    /// Convert to the serialized schema.
    pub fn to_level_file(&self) -> LevelFile {
        let tilemap = self
            .tiles
            .values()
            .map(|tile| {
                (
                    cell_key(tile.cell.x, tile.cell.y),
                    TileRecord {
                        kind: tile.kind,
                        variant: tile.variant,
                        pos: [tile.cell.x, tile.cell.y],
                    },
                )
            })
            .collect();
        let offgrid = self
            .offgrid
            .iter()
            .map(|tile| OffgridRecord {
                kind: tile.kind,
                variant: tile.variant,
                pos: [tile.pos.x, tile.pos.y],
            })
            .collect();
        LevelFile {
            tilemap,
            tile_size: self.tile_size,
            offgrid,
        }
    }

    /// Build a grid from the serialized schema, rejecting invalid data.
    pub fn from_level_file(file: LevelFile) -> Result<Self, String> {
        file.validate()?;
        let mut grid = TileGrid::new(file.tile_size);
        for record in file.tilemap.into_values() {
            grid.place(
                record.kind,
                record.variant,
                CellPos::new(record.pos[0], record.pos[1]),
            );
        }
        for record in file.offgrid {
            grid.push_offgrid(
                record.kind,
                record.variant,
                Vec2::new(record.pos[0], record.pos[1]),
            );
        }
        Ok(grid)
    }

    /// Parse level JSON. `path` only labels errors.
    pub fn from_json(text: &str, path: &Path) -> Result<Self, LevelError> {
        let corrupt = |reason: String| LevelError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };
        let file: LevelFile = serde_json::from_str(text).map_err(|e| corrupt(e.to_string()))?;
        TileGrid::from_level_file(file).map_err(corrupt)
    }

    /// Load a level file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(LevelError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(LevelError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let grid = TileGrid::from_json(&text, path)?;
        info!(
            "Loaded level {:?}: {} tiles, {} off-grid, tile_size={}",
            path,
            grid.tiles.len(),
            grid.offgrid.len(),
            grid.tile_size
        );
        Ok(grid)
    }

    /// Write the level file, replacing any existing one.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        let text = serde_json::to_string(&self.to_level_file())?;
        fs::write(path, text).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved level to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(cells: &[(TileKind, i32, i32)]) -> TileGrid {
        let mut grid = TileGrid::new(16);
        for (kind, x, y) in cells {
            grid.place(*kind, 0, CellPos::new(*x, *y));
        }
        grid
    }

    fn variants(grid: &TileGrid) -> BTreeMap<CellPos, u32> {
        grid.tiles().map(|t| (t.cell, t.variant)).collect()
    }

    #[test]
    fn test_cell_from_pixel_floors_negative_coordinates() {
        assert_eq!(CellPos::from_pixel(Vec2::new(-0.5, -16.0), 16), CellPos::new(-1, -1));
        assert_eq!(CellPos::from_pixel(Vec2::new(-16.01, 0.0), 16), CellPos::new(-2, 0));
        assert_eq!(CellPos::from_pixel(Vec2::new(15.99, 16.0), 16), CellPos::new(0, 1));
    }

    #[test]
    fn test_tile_at_pixel_and_solid_check() {
        let mut grid = grid_with(&[(TileKind::Stone, 0, 5), (TileKind::Decor, 1, 5)]);
        grid.place(TileKind::Spawner, 0, CellPos::new(-1, 5));
        assert_eq!(grid.tile_at_pixel(Vec2::new(8.0, 85.0)).unwrap().kind, TileKind::Stone);
        assert!(grid.solid_check(Vec2::new(0.0, 80.0)));
        assert!(!grid.solid_check(Vec2::new(20.0, 85.0)));
        assert!(!grid.solid_check(Vec2::new(-3.0, 85.0)));
        assert!(!grid.solid_check(Vec2::new(8.0, 79.9)));
    }

    #[test]
    fn test_large_decor_is_physical_but_decor_and_spawners_are_not() {
        assert!(TileKind::LargeDecor.is_physical());
        assert!(TileKind::Grass.is_physical());
        assert!(TileKind::Stone.is_physical());
        assert!(!TileKind::Decor.is_physical());
        assert!(!TileKind::Spawner.is_physical());
    }

    #[test]
    fn test_far_away_queries_find_nothing() {
        let grid = grid_with(&[(TileKind::Stone, 0, 0)]);
        let far = Vec2::new(1.0e7, 4.0e6);
        assert!(grid.tile_at_pixel(far).is_none());
        assert!(!grid.solid_check(far));
        assert!(grid.physics_rects_around(far).is_empty());
    }

    #[test]
    fn test_queries_past_i32_range_clamp_to_edge_cell() {
        let grid = TileGrid::new(16);
        assert!(grid.physics_rects_around(Vec2::new(1.0e11, 0.0)).is_empty());
        assert!(grid.tiles_around(Vec2::new(-1.0e11, -1.0e11)).is_empty());

        let edge = grid_with(&[(TileKind::Stone, 0, i32::MAX)]);
        let rects = edge.physics_rects_around(Vec2::new(8.0, 1.0e11));
        assert_eq!(rects.len(), 1);
    }

    #[test]
    fn test_autotile_at_edge_of_cell_range() {
        let mut grid = grid_with(&[
            (TileKind::Stone, i32::MAX, 0),
            (TileKind::Stone, i32::MAX - 1, 0),
            (TileKind::Grass, i32::MIN, i32::MIN),
        ]);
        assert_eq!(grid.autotile(), 0);
        assert_eq!(CellPos::new(i32::MAX, 0).checked_offset(1, 0), None);
        assert_eq!(
            CellPos::new(i32::MIN, 0).offset(-1, 1),
            CellPos::new(i32::MIN, 1)
        );
    }

    #[test]
    fn test_physics_rects_around_covers_three_by_three() {
        let mut cells = Vec::new();
        for x in -2..=2 {
            for y in -2..=2 {
                cells.push((TileKind::Stone, x, y));
            }
        }
        let mut grid = grid_with(&cells);
        grid.place(TileKind::Decor, 0, CellPos::new(1, 1));
        let rects = grid.physics_rects_around(Vec2::new(8.0, 8.0));
        assert_eq!(rects.len(), 8);
        assert!(rects.contains(&Rect::new(-16.0, -16.0, 16.0, 16.0)));
        assert!(!rects.contains(&Rect::new(16.0, 16.0, 16.0, 16.0)));
        assert!(!rects.contains(&Rect::new(32.0, 0.0, 16.0, 16.0)));
    }

    #[test]
    fn test_bounded_neighbourhood_finds_every_overlapping_tile() {
        let mut rng = fastrand::Rng::with_seed(7);
        let mut grid = TileGrid::new(16);
        for _ in 0..400 {
            let cell = CellPos::new(rng.i32(-10..10), rng.i32(-10..10));
            grid.place(TileKind::Stone, 0, cell);
        }
        let all: Vec<Rect> = grid
            .tiles()
            .map(|t| {
                let p = t.cell.to_pixel(16);
                Rect::new(p.x, p.y, 16.0, 16.0)
            })
            .collect();
        for _ in 0..500 {
            let pos = Vec2::new(rng.f32() * 300.0 - 150.0, rng.f32() * 300.0 - 150.0);
            let step = Vec2::new(rng.f32() * 31.8 - 15.9, rng.f32() * 31.8 - 15.9);
            let body = Rect::new(pos.x + step.x, pos.y + step.y, 8.0, 15.0);
            let before_center = Rect::new(pos.x, pos.y, 8.0, 15.0).center();
            let after_center = body.center();
            let near = grid.physics_rects_around(after_center);
            for rect in all.iter().filter(|r| r.intersects(&body)) {
                assert!(near.contains(rect), "missed {rect:?} for body {body:?}");
            }
            let reach = grid.physics_rects_around(before_center);
            if step.x.abs() < 16.0 - 8.0 && step.y.abs() < 16.0 - 15.0 {
                for rect in all.iter().filter(|r| r.intersects(&body)) {
                    assert!(reach.contains(rect));
                }
            }
        }
    }

    #[test]
    fn test_autotile_table_shapes() {
        // 3x3 block of grass: corners, edges and the centre fill
        let mut cells = Vec::new();
        for x in 0..3 {
            for y in 0..3 {
                cells.push((TileKind::Grass, x, y));
            }
        }
        let mut grid = grid_with(&cells);
        grid.autotile();
        let v = |x, y| grid.tile_at(CellPos::new(x, y)).unwrap().variant;
        assert_eq!(v(0, 0), 0);
        assert_eq!(v(1, 0), 1);
        assert_eq!(v(2, 0), 2);
        assert_eq!(v(2, 1), 3);
        assert_eq!(v(2, 2), 4);
        assert_eq!(v(1, 2), 5);
        assert_eq!(v(0, 2), 6);
        assert_eq!(v(0, 1), 7);
        assert_eq!(v(1, 1), 8);
    }

    #[test]
    fn test_autotile_ignores_other_kinds_and_unmapped_masks() {
        let mut grid = grid_with(&[
            (TileKind::Stone, 0, 0),
            (TileKind::Grass, 1, 0),
            (TileKind::Decor, 5, 5),
            (TileKind::Decor, 6, 5),
        ]);
        grid.place(TileKind::Stone, 3, CellPos::new(0, 0));
        assert_eq!(grid.autotile(), 0);
        assert_eq!(grid.tile_at(CellPos::new(0, 0)).unwrap().variant, 3);
        assert_eq!(grid.tile_at(CellPos::new(5, 5)).unwrap().variant, 0);
    }

    #[test]
    fn test_autotile_is_idempotent() {
        let mut rng = fastrand::Rng::with_seed(42);
        for _ in 0..20 {
            let mut grid = TileGrid::new(16);
            for _ in 0..60 {
                let kind = if rng.bool() { TileKind::Grass } else { TileKind::Stone };
                let cell = CellPos::new(rng.i32(0..8), rng.i32(0..8));
                grid.place(kind, rng.u32(0..9), cell);
            }
            grid.autotile();
            let once = variants(&grid);
            assert_eq!(grid.autotile(), 0);
            assert_eq!(variants(&grid), once);
        }
    }

    #[test]
    fn test_autotile_variant_lookup() {
        assert_eq!(autotile_variant(15), Some(8));
        assert_eq!(autotile_variant(0), None);
        assert_eq!(autotile_variant(NEIGHBOR_LEFT | NEIGHBOR_RIGHT), None);
    }

    #[test]
    fn test_extract_keep_returns_pixels_and_leaves_grid() {
        let mut grid = grid_with(&[(TileKind::Stone, 0, 5)]);
        grid.place(TileKind::LargeDecor, 2, CellPos::new(3, -2));
        grid.push_offgrid(TileKind::LargeDecor, 2, Vec2::new(10.5, 20.25));
        let before = grid.clone();

        let found = grid.extract(&[(TileKind::LargeDecor, 2)], true);
        assert_eq!(grid, before);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].pos, Vec2::new(10.5, 20.25));
        assert_eq!(found[1].pos, Vec2::new(48.0, -32.0));
    }

    #[test]
    fn test_extract_removes_exactly_the_matches() {
        let mut grid = grid_with(&[(TileKind::Stone, 0, 5), (TileKind::Grass, 1, 5)]);
        grid.place(TileKind::Spawner, 0, CellPos::new(2, 2));
        grid.place(TileKind::Spawner, 1, CellPos::new(4, 2));
        grid.place(TileKind::Spawner, 1, CellPos::new(6, 2));
        grid.place(TileKind::Spawner, 2, CellPos::new(8, 2));
        grid.push_offgrid(TileKind::Decor, 1, Vec2::new(1.0, 1.0));

        let found = grid.extract(&[(TileKind::Spawner, 0), (TileKind::Spawner, 1)], false);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].variant, 0);
        assert_eq!(found[0].pos, Vec2::new(32.0, 32.0));
        assert_eq!(grid.len(), 3);
        assert!(grid.tile_at(CellPos::new(8, 2)).is_some());
        assert!(grid.tile_at(CellPos::new(2, 2)).is_none());
        assert_eq!(grid.offgrid().len(), 1);
    }

    #[test]
    fn test_place_replaces_and_remove() {
        let mut grid = TileGrid::new(16);
        assert!(grid.place(TileKind::Stone, 0, CellPos::new(1, 1)).is_none());
        let old = grid.place(TileKind::Grass, 4, CellPos::new(1, 1)).unwrap();
        assert_eq!(old.kind, TileKind::Stone);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.remove(CellPos::new(1, 1)).unwrap().variant, 4);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_remove_offgrid_where() {
        let mut grid = TileGrid::new(16);
        grid.push_offgrid(TileKind::Decor, 0, Vec2::new(0.0, 0.0));
        grid.push_offgrid(TileKind::Decor, 1, Vec2::new(50.0, 0.0));
        assert_eq!(grid.remove_offgrid_where(|t| t.pos.x > 10.0), 1);
        assert_eq!(grid.offgrid().len(), 1);
    }

    #[test]
    fn test_remove_offgrid_at_uses_image_bounds() {
        let assets = crate::assets::HeadlessAssets::new();
        let mut grid = TileGrid::new(16);
        grid.push_offgrid(TileKind::LargeDecor, 0, Vec2::new(0.0, 0.0));
        grid.push_offgrid(TileKind::Decor, 0, Vec2::new(100.0, 0.0));
        assert_eq!(grid.remove_offgrid_at(Vec2::new(40.0, 5.0), &assets), 0);
        assert_eq!(grid.remove_offgrid_at(Vec2::new(31.0, 31.0), &assets), 1);
        assert_eq!(grid.offgrid()[0].kind, TileKind::Decor);
    }

    #[test]
    fn test_level_file_conversion_round_trip() {
        let mut grid = grid_with(&[(TileKind::Stone, -4, 5), (TileKind::Grass, 7, 0)]);
        grid.push_offgrid(TileKind::LargeDecor, 1, Vec2::new(3.5, -2.0));
        let file = grid.to_level_file();
        assert_eq!(file.tilemap["-4;5"].pos, [-4, 5]);
        assert_eq!(TileGrid::from_level_file(file).unwrap(), grid);
    }

    #[test]
    fn test_from_json_reports_corrupt_data() {
        let err = TileGrid::from_json(
            r#"{"tilemap": {"1;1": {"kind": "stone", "variant": 0, "pos": [1, 2]}},
                "tile_size": 16, "offgrid": []}"#,
            Path::new("bad.json"),
        )
        .unwrap_err();
        assert!(matches!(err, LevelError::Corrupt { .. }));

        let err = TileGrid::from_json("{not json", Path::new("bad.json")).unwrap_err();
        assert!(matches!(err, LevelError::Corrupt { .. }));
    }

    #[test]
    fn test_count_by_kind() {
        let mut grid = grid_with(&[(TileKind::Stone, 0, 0), (TileKind::Stone, 1, 0)]);
        grid.push_offgrid(TileKind::Decor, 0, Vec2::ZERO);
        let counts = grid.count_by_kind();
        assert_eq!(counts[&TileKind::Stone], 2);
        assert_eq!(counts[&TileKind::Decor], 1);
    }
}
