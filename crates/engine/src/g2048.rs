//! 2048: slide and merge tiles on a 4x4 grid.
//!
//! Every slide compacts each line toward the move direction, then merges
//! equal neighbours repeatedly until nothing merges any more, so `2 2 2 2`
//! slides left into `8 . . .`. A new 2 appears on a random empty cell after
//! every move.

use std::io;

use arrayvec::ArrayVec;
use tracing::{debug, warn};
use tty_games_core::{Game, GameContext, GameError, SimpleRng};

use crate::term::Screen;
use crate::types::{Direction, Key, Outcome, Point};

/// Grid edge length.
pub const SIZE: usize = 4;

/// Reaching this tile wins.
pub const WIN_TILE: u32 = 2048;

const WALL: &str = "#";
const BALL: &str = "@";
const CELL_WIDTH: usize = 7;

pub type Grid = [[u32; SIZE]; SIZE];

/// Slide one line toward index 0 and merge until stable.
pub fn merge_line(line: [u32; SIZE]) -> [u32; SIZE] {
    let mut tiles: ArrayVec<u32, SIZE> = line.iter().copied().filter(|&v| v != 0).collect();

    loop {
        let mut merged = false;
        let mut i = 1;
        while i < tiles.len() {
            if tiles[i] == tiles[i - 1] {
                tiles[i - 1] <<= 1;
                tiles.remove(i);
                merged = true;
            }
            i += 1;
        }
        if !merged {
            break;
        }
    }

    let mut out = [0; SIZE];
    out[..tiles.len()].copy_from_slice(&tiles);
    out
}

/// Apply one slide to the whole grid.
pub fn slide(grid: &Grid, direction: Direction) -> Grid {
    let mut out = [[0; SIZE]; SIZE];
    for i in 0..SIZE {
        // Read the line so that index 0 is the side tiles move toward.
        let mut line = [0; SIZE];
        for (k, slot) in line.iter_mut().enumerate() {
            let (r, c) = line_cell(direction, i, k);
            *slot = grid[r][c];
        }
        for (k, value) in merge_line(line).into_iter().enumerate() {
            let (r, c) = line_cell(direction, i, k);
            out[r][c] = value;
        }
    }
    out
}

/// Grid cell of the `k`-th element of line `i` when sliding in `direction`.
fn line_cell(direction: Direction, i: usize, k: usize) -> (usize, usize) {
    match direction {
        Direction::Left => (i, k),
        Direction::Right => (i, SIZE - 1 - k),
        Direction::Up => (k, i),
        Direction::Down => (SIZE - 1 - k, i),
    }
}

pub struct G2048 {
    grid: Grid,
    rng: SimpleRng,
    screen: Option<Screen>,
    message: String,
    outcome: Option<Outcome>,
}

impl G2048 {
    pub fn new() -> Self {
        Self {
            grid: [[0; SIZE]; SIZE],
            rng: SimpleRng::default(),
            screen: None,
            message: String::new(),
            outcome: None,
        }
    }

    /// Start from a given grid instead of two random tiles.
    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid,
            ..Self::new()
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn empty_cells(&self) -> Vec<Point> {
        let mut cells = Vec::new();
        for (r, row) in self.grid.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value == 0 {
                    cells.push(Point::new(r as i32, c as i32));
                }
            }
        }
        cells
    }

    fn place_initial(&mut self) {
        let total = SIZE * SIZE;
        let first = self.rng.next_index(total);
        let mut second = self.rng.next_index(total - 1);
        if second >= first {
            second += 1;
        }
        for n in [first, second] {
            self.grid[n / SIZE][n % SIZE] = 2;
        }
    }

    /// Slide, then spawn a 2. Returns false when no cell was free to spawn.
    pub fn shift(&mut self, direction: Direction) -> bool {
        self.grid = slide(&self.grid, direction);
        let empty = self.empty_cells();
        match self.rng.pick(&empty) {
            Some(p) => {
                self.grid[p.row as usize][p.col as usize] = 2;
                true
            }
            None => false,
        }
    }

    fn has_moves(&self) -> bool {
        for r in 0..SIZE {
            for c in 0..SIZE {
                let value = self.grid[r][c];
                if value == 0 {
                    return true;
                }
                if c > 0 && value == self.grid[r][c - 1] {
                    return true;
                }
                if r > 0 && value == self.grid[r - 1][c] {
                    return true;
                }
            }
        }
        false
    }

    fn evaluate(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        if self.grid.iter().flatten().any(|&v| v >= WIN_TILE) {
            self.end(Outcome::Won, "Congratulations!");
        } else if !self.has_moves() {
            self.end(Outcome::Lost, "Game over!");
        }
    }

    fn end(&mut self, outcome: Outcome, message: &str) {
        debug!(outcome = outcome.as_str(), "2048 ended");
        self.outcome = Some(outcome);
        self.message = message.to_string();
    }

    fn render(&mut self) {
        let Some(mut screen) = self.screen.take() else {
            return;
        };
        if let Err(e) = self.draw(&mut screen).and_then(|()| screen.flush()) {
            warn!(error = %e, "redraw failed");
        }
        self.screen = Some(screen);
    }

    pub fn draw(&self, screen: &mut Screen) -> io::Result<()> {
        let border = WALL.repeat(SIZE * CELL_WIDTH + 1);
        screen.clear()?;
        screen.draw_line_at(Point::ORIGIN, &border)?;

        for row in &self.grid {
            for level in 0..3 {
                screen.draw(WALL)?;
                for &value in row {
                    screen.draw(&tile_slice(level, value))?;
                    screen.draw(" ")?;
                }
                screen.cursor_back(1)?;
                screen.draw_line(WALL)?;
            }
            let gap = " ".repeat(SIZE * CELL_WIDTH - 1);
            screen.draw_line(&format!("{WALL}{gap}{WALL}"))?;
        }
        screen.cursor_up(1)?;
        screen.draw_line(&border)?;
        if !self.message.is_empty() {
            screen.draw_line(&self.message)?;
        }
        Ok(())
    }
}

impl Default for G2048 {
    fn default() -> Self {
        Self::new()
    }
}

/// One of the three text rows of a tile.
fn tile_slice(level: usize, value: u32) -> String {
    if value == 0 {
        return " ".repeat(CELL_WIDTH - 1);
    }
    match level {
        1 => format!("{BALL}{}{BALL}", tile_label(value)),
        _ => BALL.repeat(CELL_WIDTH - 1),
    }
}

/// Right-aligned 4-wide value; blank once it no longer fits.
fn tile_label(value: u32) -> String {
    if value < 10_000 {
        format!("{value:>4}")
    } else {
        " ".repeat(4)
    }
}

impl Game for G2048 {
    fn init(&mut self, ctx: GameContext) -> Result<(), GameError> {
        self.rng = ctx.rng;
        if self.grid.iter().flatten().all(|&v| v == 0) {
            self.place_initial();
        }
        self.screen = Some(ctx.screen);
        self.evaluate();
        self.render();
        Ok(())
    }

    fn handle(&mut self, key: Key) {
        if key.is_quit() {
            self.outcome.get_or_insert(Outcome::Quit);
            self.message = "Exiting...".to_string();
            self.render();
            return;
        }
        let Some(direction) = key.direction() else {
            return;
        };
        if self.shift(direction) {
            self.evaluate();
        } else {
            self.end(Outcome::Lost, "Game over!");
        }
        self.render();
    }

    fn should_continue(&self) -> bool {
        self.outcome.is_none()
    }

    fn finish(&mut self) -> Outcome {
        self.outcome.unwrap_or(Outcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Interrupt;
    use tty_games_core::RuntimeConfig;

    fn ctx(seed: u32) -> (GameContext, crate::term::Capture) {
        let (screen, capture) = Screen::capture();
        let ctx = GameContext::new(
            screen,
            SimpleRng::new(seed),
            Interrupt::detached(),
            RuntimeConfig::default(),
        );
        (ctx, capture)
    }

    #[test]
    fn merge_repeats_until_stable() {
        assert_eq!(merge_line([2, 2, 2, 2]), [8, 0, 0, 0]);
        assert_eq!(merge_line([2, 2, 4, 0]), [8, 0, 0, 0]);
        assert_eq!(merge_line([0, 2, 0, 2]), [4, 0, 0, 0]);
        assert_eq!(merge_line([2, 4, 8, 16]), [2, 4, 8, 16]);
        assert_eq!(merge_line([0, 0, 0, 0]), [0, 0, 0, 0]);
    }

    #[test]
    fn slide_in_each_direction() {
        let grid: Grid = [[2, 0, 0, 2], [0, 0, 0, 0], [0, 4, 0, 0], [0, 4, 0, 0]];

        let left = slide(&grid, Direction::Left);
        assert_eq!(left[0], [4, 0, 0, 0]);
        assert_eq!(left[2], [4, 0, 0, 0]);

        let right = slide(&grid, Direction::Right);
        assert_eq!(right[0], [0, 0, 0, 4]);

        let up = slide(&grid, Direction::Up);
        assert_eq!(up[0], [2, 8, 0, 2]);
        assert_eq!(up[1], [0, 0, 0, 0]);

        let down = slide(&grid, Direction::Down);
        assert_eq!(down[3], [2, 8, 0, 2]);
    }

    #[test]
    fn init_places_two_tiles() {
        for seed in 1..50 {
            let mut game = G2048::new();
            let (ctx, _) = ctx(seed);
            game.init(ctx).unwrap();
            let twos = game.grid().iter().flatten().filter(|&&v| v == 2).count();
            assert_eq!(twos, 2, "seed {seed}");
            assert!(game.should_continue());
        }
    }

    #[test]
    fn every_move_spawns_a_tile() {
        let mut game = G2048::with_grid([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let (ctx, _) = ctx(3);
        game.init(ctx).unwrap();

        game.handle(Key::Char(b'a'));
        let tiles: Vec<u32> = game.grid().iter().flatten().copied().filter(|&v| v != 0).collect();
        assert_eq!(game.grid()[0][0], 4);
        assert_eq!(tiles.len(), 2);
        assert!(tiles.contains(&2));
    }

    #[test]
    fn reaching_2048_wins() {
        let mut game = G2048::with_grid([[1024, 1024, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let (ctx, capture) = ctx(1);
        game.init(ctx).unwrap();
        assert!(game.should_continue());

        game.handle(Key::Left);
        assert!(!game.should_continue());
        assert_eq!(game.finish(), Outcome::Won);
        assert!(capture.contents().contains("Congratulations!"));
    }

    #[test]
    fn full_grid_without_merges_is_lost() {
        let grid: Grid = [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]];
        let mut game = G2048::with_grid(grid);
        let (ctx, _) = ctx(1);
        game.init(ctx).unwrap();
        assert!(!game.should_continue());
        assert_eq!(game.finish(), Outcome::Lost);
    }

    #[test]
    fn move_without_room_to_spawn_is_lost() {
        // Full, but a vertical merge is still possible; sliding left frees nothing.
        let grid: Grid = [[2, 4, 2, 4], [2, 8, 16, 32], [4, 2, 4, 2], [8, 4, 8, 4]];
        let mut game = G2048::with_grid(grid);
        let (ctx, _) = ctx(1);
        game.init(ctx).unwrap();
        assert!(game.should_continue());

        game.handle(Key::Left);
        assert_eq!(game.outcome(), Some(Outcome::Lost));
        assert_eq!(game.message(), "Game over!");
    }

    #[test]
    fn quit_key_stops() {
        let mut game = G2048::new();
        let (ctx, _) = ctx(5);
        game.init(ctx).unwrap();
        game.handle(Key::Char(b'x'));
        assert!(game.should_continue());
        game.handle(Key::Char(b'Q'));
        assert!(!game.should_continue());
        assert_eq!(game.finish(), Outcome::Quit);
    }

    #[test]
    fn tiles_render_three_rows_high() {
        assert_eq!(tile_slice(0, 0), "      ");
        assert_eq!(tile_slice(0, 2), "@@@@@@");
        assert_eq!(tile_slice(1, 2), "@   2@");
        assert_eq!(tile_slice(1, 2048), "@2048@");
        assert_eq!(tile_slice(1, 16384), "@    @");
    }
}
