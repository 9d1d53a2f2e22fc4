//! Integration tests: games driven end to end through `run_game` with
//! scripted keys and a captured screen.

use std::collections::VecDeque;
use std::time::Duration;

use tty_games::core::{run_game, GameContext, GameError, RunError, RuntimeConfig, SimpleRng};
use tty_games::engine::{G2048, PushBoxSequence};
use tty_games::input::{InputError, Interrupt, KeySource};
use tty_games::term::{Capture, Screen};
use tty_games::types::{Key, Outcome, Point};
use tty_games::KeyEcho;

struct Script(VecDeque<Key>);

impl Script {
    fn keys(keys: &[u8]) -> Self {
        Self(keys.iter().map(|&b| Key::Char(b)).collect())
    }
}

impl KeySource for Script {
    fn next_key(&mut self) -> Result<Option<Key>, InputError> {
        Ok(self.0.pop_front())
    }
}

fn context(seed: u32) -> (GameContext, Capture) {
    let (screen, capture) = Screen::capture();
    let config = RuntimeConfig {
        pause: Duration::from_millis(1),
        ..RuntimeConfig::default()
    };
    let ctx = GameContext::new(screen, SimpleRng::new(seed), Interrupt::detached(), config);
    (ctx, capture)
}

#[test]
fn solving_the_first_map_starts_the_second() {
    let mut game = PushBoxSequence::with_default_maps().unwrap();
    // Two boxes pushed straight up onto the targets, then quit.
    let mut keys = Script::keys(b"ssaaawsdwq");
    let (ctx, capture) = context(1);

    let outcome = run_game(&mut game, &mut keys, ctx).unwrap();

    assert_eq!(outcome, Outcome::Quit);
    assert_eq!(game.solved(), 1);
    assert_eq!(game.current().unwrap().player(), Point::new(2, 7));
    let out = capture.contents();
    assert!(out.contains("congratulations!"));
}

#[test]
fn reset_restores_the_map() {
    let mut game = PushBoxSequence::with_default_maps().unwrap();
    let mut keys = Script::keys(b"ssarq");
    let (ctx, _capture) = context(1);

    run_game(&mut game, &mut keys, ctx).unwrap();

    assert_eq!(game.solved(), 0);
    assert_eq!(game.current().unwrap().player(), Point::new(1, 5));
}

#[test]
fn empty_sequence_fails_before_play() {
    let mut game = PushBoxSequence::new(Vec::new());
    let mut keys = Script::keys(b"q");
    let (ctx, _capture) = context(1);

    let err = run_game(&mut game, &mut keys, ctx).unwrap_err();
    assert!(matches!(err, RunError::Init(GameError::NoMaps)));
    assert_eq!(keys.0.len(), 1, "no key is read after a failed init");
}

#[test]
fn g2048_is_deterministic_for_a_seed() {
    let play = |seed| {
        let mut game = G2048::new();
        let mut keys = Script::keys(b"wasdwasd");
        let (ctx, _capture) = context(seed);
        let outcome = run_game(&mut game, &mut keys, ctx).unwrap();
        (outcome, *game.grid())
    };

    let (outcome, first) = play(42);
    let (_, second) = play(42);
    assert_eq!(first, second);
    assert_eq!(outcome, Outcome::Completed);
    assert!(first.iter().flatten().filter(|&&v| v > 0).count() >= 2);
}

#[test]
fn g2048_quit_shows_exit_message() {
    let mut game = G2048::new();
    let mut keys = Script::keys(b"aq");
    let (ctx, capture) = context(7);

    assert_eq!(run_game(&mut game, &mut keys, ctx).unwrap(), Outcome::Quit);
    assert!(capture.contents().contains("Exiting..."));
}

#[test]
fn g2048_reaching_the_winning_tile_wins() {
    let mut grid = [[0; 4]; 4];
    grid[0][0] = 1024;
    grid[0][1] = 1024;
    let mut game = G2048::with_grid(grid);
    let mut keys = Script::keys(b"ad");
    let (ctx, capture) = context(3);

    assert_eq!(run_game(&mut game, &mut keys, ctx).unwrap(), Outcome::Won);
    assert_eq!(game.grid()[0][0], 2048);
    assert!(capture.contents().contains("Congratulations!"));
}

#[test]
fn echo_prints_every_key_until_quit() {
    let mut echo = KeyEcho::new();
    let mut keys = Script(VecDeque::from([Key::Up, Key::Char(b'x'), Key::Char(b'q'), Key::Down]));
    let (ctx, capture) = context(1);

    assert_eq!(run_game(&mut echo, &mut keys, ctx).unwrap(), Outcome::Quit);
    assert_eq!(echo.seen(), 3);
    let out = capture.contents();
    assert!(out.contains(&tty_games::echo::describe(&Key::Up)));
    assert!(out.contains("'x'"));
    assert!(!out.contains("down"));
}
