//! Level data: tile grids, enemy placements, and heart tracking.
//!
//! Levels are authored as ASCII rows. The grid itself is immutable during
//! play; collected hearts are tracked in a separate set of consumed tile
//! coordinates. Any out-of-range or unrecognized cell reads as empty, so a
//! short row or a stray character can never be fatal.

use bevy_ecs::prelude::Resource;
use log::warn;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::components::enemy::EnemyKind;
use crate::events::audio::Theme;

/// Tile side length in pixels.
pub const TILE_SIZE: f32 = 16.0;

/// Kinds of cells a level grid can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    /// Solid ground surface block (`#`).
    Solid,
    /// Solid fill below the surface (`G`).
    SolidFill,
    /// Floating platform block (`=`), solid like ground.
    Platform,
    /// Heart collectible (`H`), not solid.
    Heart,
    /// Level exit (`P`), not solid.
    Portal,
}

impl Tile {
    /// Unknown characters are empty, never an error.
    pub fn from_char(c: char) -> Tile {
        match c {
            '#' => Tile::Solid,
            'G' => Tile::SolidFill,
            '=' => Tile::Platform,
            'H' => Tile::Heart,
            'P' => Tile::Portal,
            _ => Tile::Empty,
        }
    }

    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Solid | Tile::SolidFill | Tile::Platform)
    }
}

/// Immutable per-level tile grid in whole tile units.
#[derive(Debug, Clone)]
pub struct Tilemap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl Tilemap {
    /// Parse ASCII rows. Width is the longest row; shorter rows are padded
    /// with empty cells.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.as_ref().chars().count()).max().unwrap_or(0);
        let mut tiles = vec![Tile::Empty; width * height];
        for (row, line) in rows.iter().enumerate() {
            for (col, c) in line.as_ref().chars().enumerate() {
                tiles[row * width + col] = Tile::from_char(c);
            }
        }
        Tilemap {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width_px(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn height_px(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    /// Tile at a cell; out-of-range reads as empty.
    pub fn tile_at(&self, col: i32, row: i32) -> Tile {
        if col < 0 || row < 0 || col as usize >= self.width || row as usize >= self.height {
            return Tile::Empty;
        }
        self.tiles[row as usize * self.width + col as usize]
    }

    pub fn is_solid(&self, col: i32, row: i32) -> bool {
        self.tile_at(col, row).is_solid()
    }

    pub fn count_hearts(&self) -> u32 {
        self.tiles.iter().filter(|t| **t == Tile::Heart).count() as u32
    }
}

/// One enemy placement in level data, in tile units.
#[derive(Debug, Clone, Deserialize)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub patrol_left: Option<i32>,
    #[serde(default)]
    pub patrol_right: Option<i32>,
}

/// Static description of one level.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelData {
    pub title: String,
    pub theme: Theme,
    /// Player start cell (col, row).
    pub player_start: (i32, i32),
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    pub map: Vec<String>,
}

/// All levels of the current game, built-in or loaded from a pack file.
#[derive(Resource, Debug, Clone)]
pub struct LevelStore {
    pub levels: Vec<LevelData>,
}

impl LevelStore {
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelData> {
        self.levels.get(index)
    }

    /// Parse a JSON level pack (an array of level objects).
    pub fn from_json_str(json: &str) -> Result<Self, String> {
        let levels: Vec<LevelData> =
            serde_json::from_str(json).map_err(|e| format!("Invalid level pack: {}", e))?;
        if levels.is_empty() {
            return Err("Level pack contains no levels".into());
        }
        Ok(LevelStore { levels })
    }

    /// Load a level pack from disk, falling back to the built-in levels on
    /// any error.
    pub fn load_or_builtin(path: Option<&std::path::Path>) -> Self {
        if let Some(path) = path {
            match std::fs::read_to_string(path).map_err(|e| e.to_string()) {
                Ok(json) => match Self::from_json_str(&json) {
                    Ok(store) => return store,
                    Err(e) => warn!("{}; using built-in levels", e),
                },
                Err(e) => warn!("Cannot read {}: {}; using built-in levels", path.display(), e),
            }
        }
        Self::builtin()
    }

    /// The six built-in levels.
    pub fn builtin() -> Self {
        LevelStore {
            levels: vec![
                level_one(),
                level_two(),
                level_three(),
                level_four(),
                level_five(),
                level_six(),
            ],
        }
    }
}

/// Index of the level currently loaded (or about to load).
#[derive(Resource, Clone, Copy, Default)]
pub struct CurrentLevel(pub usize);

/// Active level snapshot built at load time.
#[derive(Resource, Debug, Clone)]
pub struct ActiveLevel {
    pub index: usize,
    pub title: String,
    pub theme: Theme,
    pub tilemap: Tilemap,
    pub total_hearts: u32,
}

/// Tile coordinates of hearts already consumed this level.
#[derive(Resource, Debug, Default)]
pub struct CollectedHearts(pub FxHashSet<(i32, i32)>);

impl CollectedHearts {
    pub fn collect(&mut self, col: i32, row: i32) -> bool {
        self.0.insert((col, row))
    }

    pub fn contains(&self, col: i32, row: i32) -> bool {
        self.0.contains(&(col, row))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

fn rows(surface: &[&str], width: usize) -> Vec<String> {
    let mut map: Vec<String> = surface.iter().map(|r| r.to_string()).collect();
    for _ in 0..3 {
        map.push("G".repeat(width));
    }
    map
}

fn spawn(kind: EnemyKind, x: i32, y: i32, patrol: Option<(i32, i32)>) -> EnemySpawn {
    EnemySpawn {
        kind,
        x,
        y,
        patrol_left: patrol.map(|p| p.0),
        patrol_right: patrol.map(|p| p.1),
    }
}

fn level_one() -> LevelData {
    LevelData {
        title: "Chapter 1: Istanbul".into(),
        theme: Theme::Istanbul,
        player_start: (2, 9),
        enemies: vec![
            spawn(EnemyKind::BrokenHeart, 20, 9, Some((16, 26))),
            spawn(EnemyKind::BrokenHeart, 40, 9, Some((35, 46))),
        ],
        map: rows(
            &[
                "",
                "",
                "",
                "                   H                          H",
                "                 =====                      =====",
                "",
                "         H                     H                      H",
                "       =====      ===       ======        ===       =====",
                "",
                "  H         H          H           H          H           H  P",
                "########  ########  #########  #########  #########  ############",
                "########  ########  #########  #########  #########  ############",
            ],
            65,
        ),
    }
}

fn level_two() -> LevelData {
    LevelData {
        title: "Chapter 2: Baku".into(),
        theme: Theme::Baku,
        player_start: (2, 9),
        enemies: vec![
            spawn(EnemyKind::BrokenHeart, 18, 9, Some((12, 25))),
            spawn(EnemyKind::Teardrop, 38, 9, Some((33, 44))),
            spawn(EnemyKind::BrokenHeart, 56, 9, Some((50, 62))),
        ],
        map: rows(
            &[
                "",
                "",
                "                         H                                H",
                "                       =====                            =====",
                "                                         H",
                "              H                         =====        H",
                "            =====       ===                        =====",
                "                          H       ===                          H",
                "   H                    =====        H                       =====",
                " ======      H                     =====       H                    H  P",
                "#########  ########  ##########  #########  ##########  #########  #########",
                "#########  ########  ##########  #########  ##########  #########  #########",
            ],
            75,
        ),
    }
}

fn level_three() -> LevelData {
    LevelData {
        title: "Chapter 3: Cappadocia".into(),
        theme: Theme::Cappadocia,
        player_start: (2, 9),
        enemies: vec![
            spawn(EnemyKind::BrokenHeart, 15, 9, Some((11, 21))),
            spawn(EnemyKind::Teardrop, 35, 9, Some((30, 42))),
            spawn(EnemyKind::Thorn, 52, 9, None),
            spawn(EnemyKind::BrokenHeart, 68, 9, Some((63, 74))),
        ],
        map: rows(
            &[
                "",
                "",
                "                              H                                      H",
                "                            =====                                  =====",
                "                                           H",
                "         H                   ===          =====          H",
                "       =====          H                                ======",
                "                    =====         H          ===                       H",
                "  H                   ===        =====        H                      =====",
                "======       H                              =====          H                  H  P",
                "##########  ########  ##########  ##########  #########  ##########  #####  ##########",
                "##########  ########  ##########  ##########  #########  ##########  #####  ##########",
            ],
            85,
        ),
    }
}

fn level_four() -> LevelData {
    LevelData {
        title: "Chapter 4: Istanbul Nights".into(),
        theme: Theme::Istanbul,
        player_start: (2, 9),
        enemies: vec![
            spawn(EnemyKind::Teardrop, 16, 9, Some((11, 22))),
            spawn(EnemyKind::BrokenHeart, 32, 9, Some((26, 38))),
            spawn(EnemyKind::Thorn, 48, 9, None),
            spawn(EnemyKind::Teardrop, 60, 9, Some((54, 66))),
            spawn(EnemyKind::BrokenHeart, 72, 9, Some((68, 76))),
        ],
        map: rows(
            &[
                "",
                "                                                          H",
                "                  H                                     =====",
                "                =====          ===       H",
                "                             H          =====       H",
                "       H                    =====                 =====",
                "     =====       ===                                            H",
                "                   H                      H         ===       =====",
                "  H              =====       ===       ======        H",
                "=====                         H                    =====         H        H  P",
                "#########  #########  ##########  #########  ##########  ##########  ############",
                "#########  #########  ##########  #########  ##########  ##########  ############",
            ],
            80,
        ),
    }
}

fn level_five() -> LevelData {
    LevelData {
        title: "Chapter 5: Baku Heights".into(),
        theme: Theme::Baku,
        player_start: (2, 9),
        enemies: vec![
            spawn(EnemyKind::Teardrop, 14, 9, Some((9, 20))),
            spawn(EnemyKind::BrokenHeart, 28, 9, Some((22, 34))),
            spawn(EnemyKind::Thorn, 42, 9, None),
            spawn(EnemyKind::Teardrop, 53, 9, Some((47, 59))),
            spawn(EnemyKind::Thorn, 65, 9, None),
            spawn(EnemyKind::Teardrop, 78, 9, Some((72, 84))),
        ],
        map: rows(
            &[
                "",
                "                                                                             H",
                "                         H                              H                  =====",
                "                       =====     ===    H             =====",
                "                                      =====                        H",
                "        H                     H           ===      H             =====",
                "      =====       ===      ======                =====                     H",
                "                                                            ===           =====",
                "               H                          H                H",
                " H           =====          H           =====            =====        H           H  P",
                "########  ##########  ##########  ##########  ##########  #########  #########  ##########",
                "########  ##########  ##########  ##########  ##########  #########  #########  ##########",
            ],
            90,
        ),
    }
}

fn level_six() -> LevelData {
    LevelData {
        title: "Chapter 6: Open Sky".into(),
        theme: Theme::Sky,
        player_start: (2, 9),
        enemies: vec![
            spawn(EnemyKind::Teardrop, 15, 9, Some((11, 22))),
            spawn(EnemyKind::Thorn, 30, 9, None),
            spawn(EnemyKind::Teardrop, 40, 9, Some((34, 46))),
            spawn(EnemyKind::BrokenHeart, 55, 9, Some((48, 62))),
            spawn(EnemyKind::Thorn, 68, 9, None),
            spawn(EnemyKind::Teardrop, 80, 9, Some((74, 87))),
            spawn(EnemyKind::Thorn, 93, 9, None),
        ],
        map: rows(
            &[
                "",
                "",
                "                                  H                                             H",
                "                                =====     ===         H                       =====",
                "                  H                                 =====          H",
                "                =====       H          ===                        =====      H",
                "      H                   =====       H         ===                        =====           H",
                "    =====          ===               =====     H          H                               =====",
                " H                 H         ===              =====     =====       H          ===               H",
                "=====            =====       H                                    =====          H           =====   P",
                "##########  ###########  ##########  ###########  ##########  ###########  ##########  ###  ##############",
                "##########  ###########  ##########  ###########  ##########  ###########  ##########  ###  ##############",
            ],
            105,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_legend() {
        assert_eq!(Tile::from_char('#'), Tile::Solid);
        assert_eq!(Tile::from_char('G'), Tile::SolidFill);
        assert_eq!(Tile::from_char('='), Tile::Platform);
        assert_eq!(Tile::from_char('H'), Tile::Heart);
        assert_eq!(Tile::from_char('P'), Tile::Portal);
        assert_eq!(Tile::from_char(' '), Tile::Empty);
        // Unknown characters degrade to empty, not an error.
        assert_eq!(Tile::from_char('?'), Tile::Empty);
    }

    #[test]
    fn test_solidity() {
        assert!(Tile::Solid.is_solid());
        assert!(Tile::SolidFill.is_solid());
        assert!(Tile::Platform.is_solid());
        assert!(!Tile::Heart.is_solid());
        assert!(!Tile::Portal.is_solid());
    }

    #[test]
    fn test_out_of_range_is_empty() {
        let map = Tilemap::from_rows(&["##", "#H"]);
        assert_eq!(map.tile_at(-1, 0), Tile::Empty);
        assert_eq!(map.tile_at(0, -1), Tile::Empty);
        assert_eq!(map.tile_at(2, 0), Tile::Empty);
        assert_eq!(map.tile_at(0, 2), Tile::Empty);
        assert_eq!(map.tile_at(1, 1), Tile::Heart);
    }

    #[test]
    fn test_short_rows_read_empty() {
        let map = Tilemap::from_rows(&["#", "####"]);
        assert_eq!(map.width(), 4);
        assert_eq!(map.tile_at(3, 0), Tile::Empty);
        assert_eq!(map.tile_at(3, 1), Tile::Solid);
    }

    #[test]
    fn test_builtin_levels_are_playable() {
        let store = LevelStore::builtin();
        assert_eq!(store.len(), 6);
        for level in &store.levels {
            let map = Tilemap::from_rows(&level.map);
            assert!(map.count_hearts() > 0, "{} has no hearts", level.title);
            // Each level must have exactly one portal to finish on.
            let portals = level
                .map
                .iter()
                .flat_map(|r| r.chars())
                .filter(|c| *c == 'P')
                .count();
            assert_eq!(portals, 1, "{} portal count", level.title);
            // Player start must be inside the grid and above solid ground.
            let (col, row) = level.player_start;
            assert!(map.tile_at(col, row + 1).is_solid());
        }
    }

    #[test]
    fn test_collected_hearts_single_award() {
        let mut collected = CollectedHearts::default();
        assert!(collected.collect(3, 9));
        assert!(!collected.collect(3, 9));
        assert!(collected.contains(3, 9));
        collected.clear();
        assert!(!collected.contains(3, 9));
    }

    #[test]
    fn test_level_pack_json_roundtrip() {
        let json = r######"[{
            "title": "Test",
            "theme": "sky",
            "player_start": [1, 2],
            "enemies": [
                { "kind": "thorn", "x": 5, "y": 2 },
                { "kind": "teardrop", "x": 8, "y": 2, "patrol_left": 6, "patrol_right": 10 }
            ],
            "map": ["  H P", "#####"]
        }]"######;
        let store = LevelStore::from_json_str(json).unwrap();
        assert_eq!(store.len(), 1);
        let level = store.get(0).unwrap();
        assert_eq!(level.theme, Theme::Sky);
        assert_eq!(level.enemies.len(), 2);
        assert_eq!(level.enemies[0].kind, EnemyKind::Thorn);
        assert_eq!(level.enemies[1].patrol_left, Some(6));
    }

    #[test]
    fn test_empty_pack_rejected() {
        assert!(LevelStore::from_json_str("[]").is_err());
        assert!(LevelStore::from_json_str("not json").is_err());
    }
}
