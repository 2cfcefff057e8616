//! `.map` format parser: MovingAI grid plus a `pivot` block.

use thiserror::Error;

/// A single cell in a grid map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    /// Agent can traverse this cell.
    Passable,
    /// Obstacle; agent cannot enter.
    Blocked,
}

/// Errors from parsing a map file.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("missing header field: {0}")]
    MissingHeader(&'static str),

    #[error("invalid header value for {field}: {value}")]
    InvalidHeader { field: &'static str, value: String },

    #[error("dimension mismatch: expected {expected} rows, got {got}")]
    DimensionMismatch { expected: u32, got: u32 },

    #[error("row {row} width mismatch: expected {expected}, got {got}")]
    RowWidthMismatch { row: u32, expected: u32, got: u32 },

    #[error("invalid pivot coordinates: {value}")]
    InvalidPivot { value: String },
}

/// A parsed grid map with an optional pivot cell.
///
/// A map without a `pivot` block parses successfully; such an instance
/// is rejected later by the safety check, not by the parser.
#[derive(Debug, Clone)]
pub struct GridMap {
    width: u32,
    height: u32,
    /// Row-major; index = y * width + x
    tiles: Vec<Tile>,
    pivot: Option<(u32, u32)>,
}

impl GridMap {
    /// Parse a `.map` file content.
    ///
    /// Expected format:
    /// ```text
    /// type octile
    /// height N
    /// width M
    /// map
    /// <N lines of M characters>
    /// pivot
    /// <px> <py>
    /// ```
    ///
    /// The `pivot` block may also appear before the `map` block.
    pub fn parse(input: &str) -> Result<Self, MapError> {
        let lines: Vec<&str> = input.lines().collect();

        let mut map_type: Option<&str> = None;
        let mut height: Option<u32> = None;
        let mut width: Option<u32> = None;
        let mut pivot: Option<(u32, u32)> = None;
        let mut tiles: Option<Vec<Tile>> = None;

        let mut i = 0;
        while i < lines.len() {
            let line = lines[i].trim();
            if line.eq_ignore_ascii_case("map") {
                let height = height.ok_or(MapError::MissingHeader("height"))?;
                let width = width.ok_or(MapError::MissingHeader("width"))?;
                tiles = Some(Self::parse_rows(&lines[i + 1..], width, height)?);
                i += 1 + height as usize;
                continue;
            }
            if line.eq_ignore_ascii_case("pivot") {
                let value = lines.get(i + 1).map(|l| l.trim()).unwrap_or("");
                pivot = Some(Self::parse_pivot(value)?);
                i += 2;
                continue;
            }
            if let Some(rest) = line.strip_prefix("type ") {
                map_type = Some(rest.trim());
            } else if let Some(rest) = line.strip_prefix("height ") {
                height = Some(rest.trim().parse().map_err(|_| MapError::InvalidHeader {
                    field: "height",
                    value: rest.to_string(),
                })?);
            } else if let Some(rest) = line.strip_prefix("width ") {
                width = Some(rest.trim().parse().map_err(|_| MapError::InvalidHeader {
                    field: "width",
                    value: rest.to_string(),
                })?);
            }
            i += 1;
        }

        let _map_type = map_type.ok_or(MapError::MissingHeader("type"))?;
        let height = height.ok_or(MapError::MissingHeader("height"))?;
        let width = width.ok_or(MapError::MissingHeader("width"))?;
        let tiles = tiles.ok_or(MapError::MissingHeader("map"))?;

        Ok(Self { width, height, tiles, pivot })
    }

    fn parse_rows(rows: &[&str], width: u32, height: u32) -> Result<Vec<Tile>, MapError> {
        let mut tiles = Vec::with_capacity((width * height) as usize);
        let mut row_count: u32 = 0;

        for line in rows {
            if row_count >= height {
                break;
            }
            let chars: Vec<char> = line.trim_end().chars().collect();
            if chars.len() != width as usize {
                return Err(MapError::RowWidthMismatch {
                    row: row_count,
                    expected: width,
                    got: chars.len() as u32,
                });
            }
            for ch in chars {
                tiles.push(Self::char_to_tile(ch));
            }
            row_count += 1;
        }

        if row_count < height {
            return Err(MapError::DimensionMismatch {
                expected: height,
                got: row_count,
            });
        }

        Ok(tiles)
    }

    fn parse_pivot(value: &str) -> Result<(u32, u32), MapError> {
        let mut parts = value.split_whitespace();
        let coord = |part: Option<&str>| part.and_then(|p| p.parse::<u32>().ok());
        match (coord(parts.next()), coord(parts.next())) {
            (Some(px), Some(py)) => Ok((px, py)),
            _ => Err(MapError::InvalidPivot {
                value: value.to_string(),
            }),
        }
    }

    fn char_to_tile(ch: char) -> Tile {
        match ch {
            // Only walls and trees block; '.', 'G' and anything else is free.
            '@' | 'T' => Tile::Blocked,
            _ => Tile::Passable,
        }
    }

    /// Width of the map (x dimension).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of the map (y dimension).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pivot cell, if the map declared one.
    pub fn pivot(&self) -> Option<(u32, u32)> {
        self.pivot
    }

    /// Get tile at (x, y). Returns `None` if out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<Tile> {
        if x < self.width && y < self.height {
            Some(self.tiles[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Check if cell (x, y) is passable (returns false for out-of-bounds).
    pub fn is_passable(&self, x: u32, y: u32) -> bool {
        self.get(x, y) == Some(Tile::Passable)
    }

    /// Convert to a flat byte array (row-major). 1 = passable, 0 = blocked.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.tiles
            .iter()
            .map(|t| match t {
                Tile::Passable => 1,
                Tile::Blocked => 0,
            })
            .collect()
    }
}
