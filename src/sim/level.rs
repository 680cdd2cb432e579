//! Level and segment model
//!
//! A level is an ordered left-to-right run of segments. Each segment owns a
//! tile grid and the world-space origin of its top-left tile. Segments are
//! authored as text maps, one per segment:
//!
//! ```text
//! #  solid       .  empty (space also works)
//! P  player      E  rifle enemy   S  shotgun enemy   K  sniper enemy
//! ```

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;
use super::state::Weapon;
use crate::error::LevelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tile {
    #[default]
    Empty,
    Solid,
}

/// A horizontal slice of the level with its own tile grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub origin: Vec2,
    pub width: usize,
    pub height: usize,
    /// Row-major tiles
    tiles: Vec<Tile>,
}

impl Segment {
    pub fn new(origin: Vec2, width: usize, height: usize, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        Self {
            origin,
            width,
            height,
            tiles,
        }
    }

    /// Tile at local (col, row); anything outside the grid is empty
    pub fn tile(&self, col: i32, row: i32) -> Tile {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return Tile::Empty;
        }
        self.tiles[row as usize * self.width + col as usize]
    }

    /// World x of the right edge (exclusive)
    #[inline]
    pub fn right_edge(&self) -> f32 {
        self.origin.x + self.width as f32
    }

    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.origin.x && x < self.right_edge()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.origin, Vec2::new(self.width as f32, self.height as f32))
    }
}

/// Ordered sequence of segments with non-overlapping x ranges
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    segments: Vec<Segment>,
}

/// Where an enemy starts and what it carries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    /// World position of the marker tile's top-left corner
    pub tile: Vec2,
    pub weapon: Weapon,
}

/// A parsed level together with its spawn markers
#[derive(Debug, Clone)]
pub struct LevelMap {
    pub level: Level,
    /// World position of the player marker tile's top-left corner
    pub player_spawn: Vec2,
    pub enemy_spawns: Vec<EnemySpawn>,
}

impl Level {
    pub fn new(segments: Vec<Segment>) -> Result<Self, LevelError> {
        if segments.is_empty() {
            return Err(LevelError::EmptyLevel);
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index.min(self.segments.len() - 1)]
    }

    pub fn last_segment_index(&self) -> usize {
        self.segments.len() - 1
    }

    /// Index of the segment containing `pos.x`.
    ///
    /// Positions left of the first segment map to the first one and positions
    /// right of the last map to the last, so the lookup is total.
    pub fn segment_index_at(&self, pos: Vec2) -> usize {
        self.segments
            .iter()
            .position(|s| s.contains_x(pos.x))
            .unwrap_or(if pos.x < self.segments[0].origin.x {
                0
            } else {
                self.last_segment_index()
            })
    }

    /// Whether the world tile at (col, row) is solid
    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        let x = col as f32;
        self.segments
            .iter()
            .find(|s| s.contains_x(x))
            .map(|s| {
                let local_col = col - s.origin.x as i32;
                let local_row = row - s.origin.y as i32;
                s.tile(local_col, local_row) == Tile::Solid
            })
            .unwrap_or(false)
    }

    /// Solid world tiles overlapped by `rect`
    pub fn solid_tiles_in(&self, rect: &Rect) -> Vec<(i32, i32)> {
        let mut hits = Vec::new();
        for row in rect.tile_rows() {
            for col in rect.tile_cols() {
                if self.is_solid(col, row) {
                    hits.push((col, row));
                }
            }
        }
        hits
    }

    /// Bounding rectangle of every segment
    pub fn bounds(&self) -> Rect {
        let first = &self.segments[0];
        let mut min = first.origin;
        let mut max = first.bounds().max();
        for s in &self.segments[1..] {
            min = min.min(s.origin);
            max = max.max(s.bounds().max());
        }
        Rect::new(min, max - min)
    }

    /// Parse one text map per segment, laying segments out left to right
    pub fn from_text_maps<S: AsRef<str>>(maps: &[S]) -> Result<LevelMap, LevelError> {
        let mut segments = Vec::with_capacity(maps.len());
        let mut player_spawn = None;
        let mut enemy_spawns = Vec::new();
        let mut origin_x = 0.0;

        for (index, map) in maps.iter().enumerate() {
            let rows: Vec<&str> = map
                .as_ref()
                .lines()
                .map(|l| l.trim_end_matches('\r'))
                .collect();
            // Blank lines around a map are editor noise, not empty rows
            let start = rows.iter().position(|r| !r.is_empty()).unwrap_or(rows.len());
            let end = rows.iter().rposition(|r| !r.is_empty()).map_or(start, |i| i + 1);
            let rows = &rows[start..end];

            let width = rows.first().map_or(0, |r| r.chars().count());
            if rows.is_empty() || width == 0 {
                return Err(LevelError::EmptySegment { segment: index });
            }

            let origin = Vec2::new(origin_x, 0.0);
            let mut tiles = Vec::with_capacity(width * rows.len());
            for (row, line) in rows.iter().enumerate() {
                let found = line.chars().count();
                if found != width {
                    return Err(LevelError::RaggedRow {
                        segment: index,
                        row,
                        expected: width,
                        found,
                    });
                }
                for (col, ch) in line.chars().enumerate() {
                    let world = origin + Vec2::new(col as f32, row as f32);
                    let tile = match ch {
                        '#' => Tile::Solid,
                        '.' | ' ' => Tile::Empty,
                        'P' => {
                            if player_spawn.is_some() {
                                log::warn!(
                                    "Duplicate player spawn in segment {} at ({}, {}), ignoring",
                                    index,
                                    col,
                                    row
                                );
                            } else {
                                player_spawn = Some(world);
                            }
                            Tile::Empty
                        }
                        'E' | 'S' | 'K' => {
                            let weapon = match ch {
                                'S' => Weapon::PeaceKeeper,
                                'K' => Weapon::Kraber,
                                _ => Weapon::R99,
                            };
                            enemy_spawns.push(EnemySpawn { tile: world, weapon });
                            Tile::Empty
                        }
                        _ => {
                            return Err(LevelError::UnknownTile {
                                segment: index,
                                row,
                                col,
                                ch,
                            });
                        }
                    };
                    tiles.push(tile);
                }
            }

            segments.push(Segment::new(origin, width, rows.len(), tiles));
            origin_x += width as f32;
        }

        let level = Level::new(segments)?;
        let player_spawn = player_spawn.ok_or(LevelError::SpawnNotFound)?;
        log::info!(
            "Loaded level: {} segments, {} enemies",
            level.segments.len(),
            enemy_spawns.len()
        );

        Ok(LevelMap {
            level,
            player_spawn,
            enemy_spawns,
        })
    }

    /// Load every `*.txt` map in `dir`, ordered by file name
    pub fn load_dir(dir: &Path) -> Result<LevelMap, LevelError> {
        let map_err = |path: &Path| {
            let path = path.to_path_buf();
            move |source| LevelError::MapLoad { path, source }
        };

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(map_err(dir))? {
            let path = entry.map_err(map_err(dir))?.path();
            if path.extension().is_some_and(|e| e == "txt") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut maps = Vec::with_capacity(paths.len());
        for path in &paths {
            maps.push(std::fs::read_to_string(path).map_err(map_err(path))?);
        }
        Self::from_text_maps(&maps)
    }
}
