//! Image lookup seam between the core and whatever loads pixels.
//!
//! The core never decodes or owns image data. It asks an [`AssetProvider`]
//! for opaque [`ImageId`] handles plus their pixel size, and hands those ids
//! back to a [`Renderer`](crate::systems::render::Renderer).
//!
//! Missing content is a load-time error: [`validate_level`],
//! [`TileCatalogue::validate`] and
//! [`AnimationStore::from_assets`](crate::resources::animationstore::AnimationStore::from_assets)
//! report it as an [`AssetError`]; render paths simply skip unknown ids.

use glam::Vec2;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::resources::tilegrid::{TileGrid, TileKind};

/// Opaque handle to an image owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u32);

/// An image handle and its pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo {
    pub id: ImageId,
    pub size: Vec2,
}

#[derive(Debug, Error, PartialEq)]
pub enum AssetError {
    #[error("no image for tile {kind} variant {variant}")]
    MissingTileImage { kind: TileKind, variant: u32 },
    #[error("no frames for animation {0:?}")]
    MissingAnimation(String),
    #[error("animation {0:?} has no frames")]
    EmptyAnimation(String),
    #[error("no sprite named {0:?}")]
    MissingSprite(String),
}

/// Source of every image the core draws.
pub trait AssetProvider {
    /// Image for a tile, or `None` when the variant is out of range.
    fn tile_image(&self, kind: TileKind, variant: u32) -> Option<ImageInfo>;
    /// Number of variants available for a kind.
    fn variant_count(&self, kind: TileKind) -> u32;
    /// Single named sprite, e.g. `"gun"` or `"clouds/1"`.
    fn sprite(&self, name: &str) -> Option<ImageInfo>;
    /// Frames of an animation clip such as `"player/run"`.
    fn animation_frames(&self, key: &str) -> Option<Vec<ImageId>>;
    /// Pixel size of any image handed out above.
    fn image_size(&self, id: ImageId) -> Option<Vec2>;
}

/// Check that every tile of a level has an image.
pub fn validate_level(grid: &TileGrid, assets: &dyn AssetProvider) -> Result<(), AssetError> {
    check_tiles(grid, |kind, variant| assets.tile_image(kind, variant).is_some())
}

fn check_tiles(
    grid: &TileGrid,
    has_image: impl Fn(TileKind, u32) -> bool,
) -> Result<(), AssetError> {
    let on_grid = grid.tiles().map(|t| (t.kind, t.variant));
    let off_grid = grid.offgrid().iter().map(|t| (t.kind, t.variant));
    for (kind, variant) in on_grid.chain(off_grid) {
        if !has_image(kind, variant) {
            return Err(AssetError::MissingTileImage { kind, variant });
        }
    }
    Ok(())
}

/// Snapshot of which tile variants have images.
///
/// Lets the game session validate levels it loads later without holding on
/// to the asset provider.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileCatalogue {
    available: FxHashMap<TileKind, Vec<bool>>,
}

impl TileCatalogue {
    pub fn from_assets(assets: &dyn AssetProvider) -> Self {
        let available = TileKind::ALL
            .iter()
            .map(|&kind| {
                let variants = (0..assets.variant_count(kind))
                    .map(|variant| assets.tile_image(kind, variant).is_some())
                    .collect();
                (kind, variants)
            })
            .collect();
        Self { available }
    }

    pub fn contains(&self, kind: TileKind, variant: u32) -> bool {
        self.available
            .get(&kind)
            .and_then(|variants| variants.get(variant as usize))
            .copied()
            .unwrap_or(false)
    }

    /// Same check as [`validate_level`], against the snapshot.
    pub fn validate(&self, grid: &TileGrid) -> Result<(), AssetError> {
        check_tiles(grid, |kind, variant| self.contains(kind, variant))
    }
}

/// Sprites the game session draws besides tiles and animations.
pub const REQUIRED_SPRITES: [&str; 4] = ["gun", "projectile", "clouds/0", "clouds/1"];

pub fn validate_sprites(assets: &dyn AssetProvider) -> Result<(), AssetError> {
    for name in REQUIRED_SPRITES {
        if assets.sprite(name).is_none() {
            return Err(AssetError::MissingSprite(name.to_string()));
        }
    }
    Ok(())
}

/// Placeholder asset set with the stock content layout and made-up ids.
///
/// Used by the CLI and tests, where nothing is ever put on screen but the
/// core still needs sizes and frame counts to behave like the real game.
#[derive(Debug, Clone)]
pub struct HeadlessAssets {
    images: FxHashMap<String, ImageInfo>,
    /// Indexed by `ImageId`.
    sizes: Vec<Vec2>,
    variants: FxHashMap<TileKind, u32>,
    animations: FxHashMap<String, Vec<ImageId>>,
}

impl Default for HeadlessAssets {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAssets {
    pub fn new() -> Self {
        let mut assets = HeadlessAssets {
            images: FxHashMap::default(),
            sizes: Vec::new(),
            variants: FxHashMap::default(),
            animations: FxHashMap::default(),
        };

        let tile_sets = [
            (TileKind::Decor, 4, Vec2::new(16.0, 16.0)),
            (TileKind::Grass, 9, Vec2::new(16.0, 16.0)),
            (TileKind::LargeDecor, 3, Vec2::new(32.0, 32.0)),
            (TileKind::Stone, 9, Vec2::new(16.0, 16.0)),
            (TileKind::Spawner, 2, Vec2::new(16.0, 16.0)),
        ];
        for (kind, count, size) in tile_sets {
            assets.variants.insert(kind, count);
            for variant in 0..count {
                assets.add_image(tile_key(kind, variant), size);
            }
        }

        assets.add_image("gun".to_string(), Vec2::new(7.0, 4.0));
        assets.add_image("projectile".to_string(), Vec2::new(5.0, 2.0));
        assets.add_image("clouds/0".to_string(), Vec2::new(64.0, 24.0));
        assets.add_image("clouds/1".to_string(), Vec2::new(48.0, 20.0));

        let clips = [
            ("player/idle", 22, Vec2::new(14.0, 18.0)),
            ("player/run", 8, Vec2::new(14.0, 18.0)),
            ("player/jump", 1, Vec2::new(14.0, 18.0)),
            ("player/slide", 1, Vec2::new(14.0, 18.0)),
            ("player/wall_slide", 1, Vec2::new(14.0, 18.0)),
            ("enemy/idle", 16, Vec2::new(14.0, 18.0)),
            ("enemy/run", 8, Vec2::new(14.0, 18.0)),
            ("particle/leaf", 18, Vec2::new(3.0, 3.0)),
            ("particle/particle", 4, Vec2::new(3.0, 3.0)),
        ];
        for (key, count, size) in clips {
            let frames = (0..count)
                .map(|i| assets.add_image(format!("{key}/{i}"), size))
                .collect();
            assets.animations.insert(key.to_string(), frames);
        }
        assets
    }

    fn add_image(&mut self, key: String, size: Vec2) -> ImageId {
        let id = ImageId(self.sizes.len() as u32);
        self.sizes.push(size);
        self.images.insert(key, ImageInfo { id, size });
        id
    }

    /// Replace a clip's frames, e.g. to simulate broken content in tests.
    pub fn set_animation(&mut self, key: &str, frames: Vec<ImageId>) {
        self.animations.insert(key.to_string(), frames);
    }

    pub fn remove_animation(&mut self, key: &str) {
        self.animations.remove(key);
    }
}

fn tile_key(kind: TileKind, variant: u32) -> String {
    format!("tiles/{}/{}", kind.name(), variant)
}

impl AssetProvider for HeadlessAssets {
    fn tile_image(&self, kind: TileKind, variant: u32) -> Option<ImageInfo> {
        self.images.get(&tile_key(kind, variant)).copied()
    }

    fn variant_count(&self, kind: TileKind) -> u32 {
        self.variants.get(&kind).copied().unwrap_or(0)
    }

    fn sprite(&self, name: &str) -> Option<ImageInfo> {
        self.images.get(name).copied()
    }

    fn animation_frames(&self, key: &str) -> Option<Vec<ImageId>> {
        self.animations.get(key).cloned()
    }

    fn image_size(&self, id: ImageId) -> Option<Vec2> {
        self.sizes.get(id.0 as usize).copied()
    }
}
