//! Construction-time error types.
//!
//! Everything fallible happens while a run is being set up. Once a
//! [`GameState`](crate::sim::GameState) exists, ticking it cannot fail.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating level data.
#[derive(Debug, Error)]
pub enum LevelError {
    /// A map file could not be read.
    #[error("failed to load map {path}: {source}")]
    MapLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The level has no segments at all.
    #[error("level contains no segments")]
    EmptyLevel,

    /// A segment's text map has no rows or no columns.
    #[error("segment {segment} has an empty tile map")]
    EmptySegment { segment: usize },

    /// Rows of a segment's text map differ in length.
    #[error("segment {segment} row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        segment: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A character in a text map is not a known tile or marker.
    #[error("segment {segment} row {row} col {col}: unknown tile {ch:?}")]
    UnknownTile {
        segment: usize,
        row: usize,
        col: usize,
        ch: char,
    },

    /// No segment carries a player spawn marker.
    #[error("no player spawn marker found in any segment")]
    SpawnNotFound,
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
