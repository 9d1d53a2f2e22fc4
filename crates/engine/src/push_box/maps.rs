//! Box-pushing maps: text format, validation, built-in maps and loading.
//!
//! A map is plain text using these symbols, one map row per line:
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `.` | target |
//! | `o` | box |
//! | `O` | box on a target |
//! | `p` | player |
//! | `P` | player on a target |
//! | `#` | wall |
//! | ` ` | blank |
//!
//! Windows and classic Mac line endings are accepted. A map is valid when
//! the number of free targets (`.` and `P`) equals the number of free boxes
//! (`o`) and there is exactly one player.

use std::fs;
use std::path::Path;

use tracing::{debug, info};
use tty_games_core::GameError;

use crate::types::Point;

const BUILT_IN: [&[&str]; 3] = [
    &[
        "########",
        "# .. p #",
        "# oo   #",
        "#      #",
        "########",
    ],
    &[
        "#############",
        "# ...       #",
        "# ooo  p    #",
        "#           #",
        "#############",
    ],
    &[
        "###########",
        "# ..   #. #",
        "# oo   #o #",
        "#    p    #",
        "###########",
    ],
];

fn is_symbol(b: u8) -> bool {
    matches!(b, b'.' | b'o' | b'O' | b'p' | b'P' | b'#' | b' ' | b'\n')
}

/// A validated map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxMap {
    origin: String,
    rows: Vec<String>,
    player: Point,
}

impl BoxMap {
    /// Parse and validate map text. `origin` names the map in errors.
    pub fn parse(origin: impl Into<String>, text: &[u8]) -> Result<Self, GameError> {
        let origin = origin.into();
        let invalid = |reason: String| GameError::InvalidMap {
            origin: origin.clone(),
            reason,
        };

        let text = String::from_utf8_lossy(text).replace("\r\n", "\n").replace('\r', "\n");
        if let Some((offset, b)) = text.bytes().enumerate().find(|&(_, b)| !is_symbol(b)) {
            return Err(invalid(format!("unexpected byte {b:#04x} at offset {offset}")));
        }

        let mut rows: Vec<String> = text.split('\n').map(str::to_string).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }

        let (mut targets, mut boxes, mut players) = (0usize, 0usize, 0usize);
        let mut player = Point::ORIGIN;
        for (r, row) in rows.iter().enumerate() {
            for (c, b) in row.bytes().enumerate() {
                let here = Point::new(r as i32, c as i32);
                match b {
                    b'.' => targets += 1,
                    b'o' => boxes += 1,
                    b'p' => {
                        players += 1;
                        player = here;
                    }
                    b'P' => {
                        targets += 1;
                        players += 1;
                        player = here;
                    }
                    _ => {}
                }
            }
        }

        if targets != boxes {
            return Err(invalid(format!("{targets} targets but {boxes} boxes")));
        }
        if players != 1 {
            return Err(invalid(format!("expected one player, found {players}")));
        }

        Ok(Self {
            origin,
            rows,
            player,
        })
    }

    pub fn from_rows(origin: impl Into<String>, rows: &[&str]) -> Result<Self, GameError> {
        Self::parse(origin, rows.join("\n").as_bytes())
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(String::len).max().unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Starting position of the player.
    pub fn player(&self) -> Point {
        self.player
    }
}

/// The three maps played when no directory is given.
pub fn default_maps() -> Result<Vec<BoxMap>, GameError> {
    BUILT_IN
        .iter()
        .enumerate()
        .map(|(i, rows)| BoxMap::from_rows(format!("built-in map {}", i + 1), rows))
        .collect()
}

/// Load every `*.txt` file in `dir`, sorted by file name.
///
/// Fails on the first unreadable or invalid file.
pub fn load_maps(dir: impl AsRef<Path>) -> Result<Vec<BoxMap>, GameError> {
    let dir = dir.as_ref();
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && path.extension().is_some_and(|ext| ext == "txt") {
            paths.push(path);
        }
    }
    paths.sort();

    let maps = paths
        .iter()
        .map(|path| {
            debug!(path = %path.display(), "loading map");
            BoxMap::parse(path.display().to_string(), &fs::read(path)?)
        })
        .collect::<Result<Vec<_>, _>>()?;
    info!(dir = %dir.display(), count = maps.len(), "maps loaded");
    Ok(maps)
}
