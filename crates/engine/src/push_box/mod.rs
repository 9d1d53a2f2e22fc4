//! Box pushing.
//!
//! The player walks the map and pushes boxes one at a time onto targets.
//! A map is solved once no free target, no free box and no player standing
//! on a target remain. [`PushBox`] plays one map; [`PushBoxSequence`] plays
//! several in order.

pub mod maps;

use std::io;
use std::ops::{BitAnd, BitOr, Not};
use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};
use tty_games_core::{Game, GameContext, GameError};

pub use maps::{default_maps, load_maps, BoxMap};

use crate::term::Screen;
use crate::types::{Direction, Key, Outcome, Point};

/// How long "congratulations!" stays up before the next map.
pub const CONGRATS_PAUSE: Duration = Duration::from_millis(300);

/// Contents of one map cell as bit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Cell(u8);

impl Cell {
    pub const BLANK: Cell = Cell(0);
    pub const TARGET: Cell = Cell(1);
    pub const BOX: Cell = Cell(2);
    pub const BOX_ON_TARGET: Cell = Cell(1 | 2);
    pub const PLAYER: Cell = Cell(4);
    pub const PLAYER_ON_TARGET: Cell = Cell(1 | 4);
    pub const WALL: Cell = Cell(8);

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Whether any flag of `other` is set.
    pub fn has(self, other: Cell) -> bool {
        self.0 & other.0 != 0
    }

    pub fn from_symbol(b: u8) -> Option<Cell> {
        match b {
            b' ' => Some(Cell::BLANK),
            b'.' => Some(Cell::TARGET),
            b'o' => Some(Cell::BOX),
            b'O' => Some(Cell::BOX_ON_TARGET),
            b'p' => Some(Cell::PLAYER),
            b'P' => Some(Cell::PLAYER_ON_TARGET),
            b'#' => Some(Cell::WALL),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Cell::TARGET => '.',
            Cell::BOX => 'o',
            Cell::BOX_ON_TARGET => 'O',
            Cell::PLAYER => 'p',
            Cell::PLAYER_ON_TARGET => 'P',
            Cell::WALL => '#',
            _ => ' ',
        }
    }
}

impl BitOr for Cell {
    type Output = Cell;

    fn bitor(self, rhs: Cell) -> Cell {
        Cell(self.0 | rhs.0)
    }
}

impl BitAnd for Cell {
    type Output = Cell;

    fn bitand(self, rhs: Cell) -> Cell {
        Cell(self.0 & rhs.0)
    }
}

impl Not for Cell {
    type Output = Cell;

    fn not(self) -> Cell {
        Cell(!self.0)
    }
}

/// One map in play.
pub struct PushBox {
    map: BoxMap,
    grid: Vec<Vec<Cell>>,
    player: Point,
    message: String,
    screen: Option<Screen>,
    quit: bool,
}

impl PushBox {
    pub fn new(map: BoxMap) -> Self {
        let mut game = Self {
            grid: Vec::new(),
            player: map.player(),
            map,
            message: String::new(),
            screen: None,
            quit: false,
        };
        game.reset();
        game
    }

    /// Restore the map to its starting layout.
    pub fn reset(&mut self) {
        let width = self.map.width();
        self.grid = self
            .map
            .rows()
            .iter()
            .map(|row| {
                let mut cells: Vec<Cell> = row
                    .bytes()
                    .map(|b| Cell::from_symbol(b).unwrap_or_default())
                    .collect();
                cells.resize(width, Cell::BLANK);
                cells
            })
            .collect();
        self.player = self.map.player();
        self.message.clear();
    }

    pub fn width(&self) -> usize {
        self.map.width()
    }

    pub fn height(&self) -> usize {
        self.map.height()
    }

    pub fn player(&self) -> Point {
        self.player
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn cell(&self, p: Point) -> Option<Cell> {
        if p.row < 0 || p.col < 0 {
            return None;
        }
        self.grid.get(p.row as usize)?.get(p.col as usize).copied()
    }

    fn cell_mut(&mut self, p: Point) -> Option<&mut Cell> {
        if p.row < 0 || p.col < 0 {
            return None;
        }
        self.grid.get_mut(p.row as usize)?.get_mut(p.col as usize)
    }

    /// Step the player one cell, pushing a box when one is in the way.
    pub fn move_player(&mut self, direction: Direction) {
        let offset = direction.offset();
        let ahead = self.player + offset;
        let Some(cell) = self.cell(ahead) else {
            self.message = "out of range!".to_string();
            return;
        };

        if cell == Cell::WALL {
            self.message = "wall!".to_string();
        } else if cell.has(Cell::BOX) {
            let beyond = ahead + offset;
            match self.cell(beyond) {
                Some(next) if !next.has(Cell::WALL) && !next.has(Cell::BOX) => {
                    self.update(beyond, |c| c | Cell::BOX);
                    self.update(ahead, |c| c & !Cell::BOX);
                    self.walk_to(ahead);
                }
                _ => self.message = "can not push box!".to_string(),
            }
        } else {
            self.walk_to(ahead);
        }
    }

    fn update(&mut self, p: Point, f: impl FnOnce(Cell) -> Cell) {
        if let Some(cell) = self.cell_mut(p) {
            *cell = f(*cell);
        }
    }

    fn walk_to(&mut self, p: Point) {
        let from = self.player;
        self.update(from, |c| c & !Cell::PLAYER);
        self.update(p, |c| c | Cell::PLAYER);
        self.player = p;
        self.message.clear();
    }

    pub fn is_solved(&self) -> bool {
        !self.grid.iter().flatten().any(|&c| {
            c == Cell::TARGET || c == Cell::BOX || c == Cell::PLAYER_ON_TARGET
        })
    }

    fn redraw(&mut self) {
        if let Some(mut screen) = self.screen.take() {
            render(&mut screen, self);
            self.screen = Some(screen);
        }
    }

    /// React to a non-quit key.
    fn play(&mut self, key: &Key) {
        match key {
            Key::Char(b'r') | Key::Char(b'R') => self.reset(),
            _ => {
                if let Some(direction) = key.direction() {
                    self.move_player(direction);
                }
            }
        }
    }

    pub fn draw(&self, screen: &mut Screen) -> io::Result<()> {
        screen.clear()?;
        screen.cursor(Point::ORIGIN)?;

        for row in &self.grid {
            let line: String = row.iter().map(|c| c.symbol()).collect();
            screen.draw_line(&line)?;
        }

        let col = self.width() as i32 + 3;
        screen.draw_at(Point::new(0, col), " Tips: push all `o` to `.`")?;
        screen.draw_at(Point::new(1, col), " press w,s,a,d to move `p`")?;
        screen.draw_at(Point::new(2, col), " press r to reset, q to exit")?;
        screen.draw_at(Point::new(3, col), &format!(" {}", self.message))?;
        screen.draw_at(
            Point::new(self.height() as i32, 0),
            &format!(" height:{}, width:{}", self.height(), self.width()),
        )
    }
}

fn render(screen: &mut Screen, game: &PushBox) {
    if let Err(e) = game.draw(screen).and_then(|()| screen.flush()) {
        warn!(error = %e, "redraw failed");
    }
}

impl Game for PushBox {
    fn init(&mut self, ctx: GameContext) -> Result<(), GameError> {
        self.screen = Some(ctx.screen);
        self.redraw();
        Ok(())
    }

    fn handle(&mut self, key: Key) {
        if key.is_quit() {
            self.quit = true;
            return;
        }
        self.play(&key);
        self.redraw();
    }

    fn should_continue(&self) -> bool {
        !self.quit && !self.is_solved()
    }

    fn finish(&mut self) -> Outcome {
        if self.is_solved() {
            self.message = "congratulations!".to_string();
            self.redraw();
            Outcome::Won
        } else {
            Outcome::Quit
        }
    }
}

/// Several maps played back to back.
pub struct PushBoxSequence {
    maps: Vec<BoxMap>,
    index: usize,
    current: Option<PushBox>,
    screen: Option<Screen>,
    pause: Duration,
    quit: bool,
}

impl PushBoxSequence {
    pub fn new(maps: Vec<BoxMap>) -> Self {
        Self {
            maps,
            index: 0,
            current: None,
            screen: None,
            pause: CONGRATS_PAUSE,
            quit: false,
        }
    }

    /// The built-in maps.
    pub fn with_default_maps() -> Result<Self, GameError> {
        Ok(Self::new(default_maps()?))
    }

    /// Every `*.txt` map in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, GameError> {
        let maps = load_maps(dir)?;
        if maps.is_empty() {
            return Err(GameError::NoMaps);
        }
        Ok(Self::new(maps))
    }

    /// Maps solved so far.
    pub fn solved(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&PushBox> {
        self.current.as_ref()
    }

    fn start(&mut self, index: usize) {
        self.index = index;
        self.current = self.maps.get(index).cloned().map(PushBox::new);
        if let Some(game) = &self.current {
            info!(map = index + 1, of = self.maps.len(), "map started");
            if let Some(screen) = self.screen.as_mut() {
                render(screen, game);
            }
        }
    }

    fn advance(&mut self) {
        let Some(game) = self.current.as_mut() else {
            return;
        };
        game.set_message("congratulations!");
        if let Some(screen) = self.screen.as_mut() {
            render(screen, game);
        }
        debug!(map = self.index + 1, "map solved");
        thread::sleep(self.pause);
        self.start(self.index + 1);
    }
}

impl Game for PushBoxSequence {
    fn init(&mut self, ctx: GameContext) -> Result<(), GameError> {
        if self.maps.is_empty() {
            return Err(GameError::NoMaps);
        }
        self.pause = ctx.config.pause.min(CONGRATS_PAUSE);
        self.screen = Some(ctx.screen);
        self.start(0);
        Ok(())
    }

    fn handle(&mut self, key: Key) {
        if key.is_quit() {
            self.quit = true;
            return;
        }
        let Some(game) = self.current.as_mut() else {
            return;
        };
        game.play(&key);
        if let Some(screen) = self.screen.as_mut() {
            render(screen, game);
        }
        if game.is_solved() {
            self.advance();
        }
    }

    fn should_continue(&self) -> bool {
        !self.quit && self.index < self.maps.len()
    }

    fn finish(&mut self) -> Outcome {
        if self.index >= self.maps.len() {
            Outcome::Won
        } else {
            Outcome::Quit
        }
    }
}
