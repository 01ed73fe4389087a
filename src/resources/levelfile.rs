//! On-disk level schema and its error type.
//!
//! The level file is the only place where cell coordinates appear as
//! `"<cx>;<cy>"` string keys. Everything past this boundary works with
//! [`CellPos`](crate::resources::tilegrid::CellPos) directly.
//!
//! ```json
//! {
//!   "tilemap": { "3;5": {"kind": "stone", "variant": 1, "pos": [3, 5]} },
//!   "tile_size": 16,
//!   "offgrid": [ {"kind": "large_decor", "variant": 2, "pos": [40.0, 62.5]} ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::resources::tilegrid::TileKind;

/// Failure while reading or writing a level file.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("corrupt level data in {}: {reason}", .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("failed to serialize level: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One on-grid tile entry. `pos` is redundant with the map key and must agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TileRecord {
    #[serde(alias = "type")]
    pub kind: TileKind,
    pub variant: u32,
    pub pos: [i32; 2],
}

/// One off-grid decoration, positioned in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OffgridRecord {
    #[serde(alias = "type")]
    pub kind: TileKind,
    pub variant: u32,
    pub pos: [f32; 2],
}

/// Whole level document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    pub tilemap: BTreeMap<String, TileRecord>,
    pub tile_size: u32,
    pub offgrid: Vec<OffgridRecord>,
}

/// Canonical map key for a cell.
pub fn cell_key(x: i32, y: i32) -> String {
    format!("{x};{y}")
}

impl LevelFile {
    /// Check the invariants serde cannot express: a positive tile size and
    /// every key matching its entry's position.
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_size == 0 {
            return Err("tile_size must be positive".to_string());
        }
        for (key, record) in &self.tilemap {
            let expected = cell_key(record.pos[0], record.pos[1]);
            if *key != expected {
                return Err(format!(
                    "tilemap key {key:?} does not match tile pos {expected:?}"
                ));
            }
        }
        for record in &self.offgrid {
            if !record.pos[0].is_finite() || !record.pos[1].is_finite() {
                return Err(format!("off-grid tile with non-finite pos {:?}", record.pos));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<LevelFile, serde_json::Error> {
        serde_json::from_str(text)
    }

    #[test]
    fn test_parses_schema() {
        let file = parse(
            r#"{"tilemap": {"0;5": {"kind": "stone", "variant": 1, "pos": [0, 5]}},
                "tile_size": 16,
                "offgrid": [{"kind": "decor", "variant": 0, "pos": [3, 4.5]}]}"#,
        )
        .unwrap();
        assert_eq!(file.tile_size, 16);
        assert_eq!(file.tilemap["0;5"].kind, TileKind::Stone);
        assert_eq!(file.offgrid[0].pos, [3.0, 4.5]);
        assert!(file.validate().is_ok());
    }

    #[test]
    fn test_accepts_legacy_type_key_and_spawner_names() {
        let file = parse(
            r#"{"tilemap": {"1;1": {"type": "spawners", "variant": 0, "pos": [1, 1]},
                            "2;1": {"kind": "spawner", "variant": 1, "pos": [2, 1]}},
                "tile_size": 16, "offgrid": []}"#,
        )
        .unwrap();
        assert_eq!(file.tilemap["1;1"].kind, TileKind::Spawner);
        assert_eq!(file.tilemap["2;1"].kind, TileKind::Spawner);
    }

    #[test]
    fn test_key_pos_mismatch_is_rejected() {
        let file = parse(
            r#"{"tilemap": {"0;4": {"kind": "grass", "variant": 0, "pos": [0, 5]}},
                "tile_size": 16, "offgrid": []}"#,
        )
        .unwrap();
        let err = file.validate().unwrap_err();
        assert!(err.contains("0;4"));
    }

    #[test]
    fn test_zero_tile_size_is_rejected() {
        let file = parse(r#"{"tilemap": {}, "tile_size": 0, "offgrid": []}"#).unwrap();
        assert!(file.validate().is_err());
    }

    #[test]
    fn test_unknown_kind_and_negative_variant_fail_to_parse() {
        assert!(
            parse(
                r#"{"tilemap": {"0;0": {"kind": "lava", "variant": 0, "pos": [0, 0]}},
                    "tile_size": 16, "offgrid": []}"#
            )
            .is_err()
        );
        assert!(
            parse(
                r#"{"tilemap": {"0;0": {"kind": "stone", "variant": -1, "pos": [0, 0]}},
                    "tile_size": 16, "offgrid": []}"#
            )
            .is_err()
        );
    }

    #[test]
    fn test_missing_section_fails_to_parse() {
        assert!(parse(r#"{"tilemap": {}, "tile_size": 16}"#).is_err());
    }

    #[test]
    fn test_cell_key_format() {
        assert_eq!(cell_key(-3, 12), "-3;12");
    }
}
