//! Tick-driven games on the real loop: tetris and snake.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tty_games::core::{
    run_game, run_loop, Delivery, GameContext, LoopState, RuntimeConfig, SimpleRng, TickDriven,
    Timing,
};
use tty_games::engine::tetris::{Board, Move, BOARD_COLS, BOARD_ROWS};
use tty_games::engine::{Shape, Snake, Tetris};
use tty_games::input::{InputError, Interrupt, KeySource};
use tty_games::term::Screen;
use tty_games::types::{Direction, Key, Outcome, Point};

fn bottom_row_with_gap(gap: i32) -> Board {
    let mut board = Board::new();
    for col in (0..BOARD_COLS as i32).filter(|&c| c != gap) {
        board.set(Point::new(BOARD_ROWS as i32 - 1, col), true);
    }
    board
}

#[tokio::test(start_paused = true)]
async fn dropping_a_bar_into_the_gap_scores() {
    let bar = Shape::Bar { vertical: true };
    let game = Tetris::with_board(bottom_row_with_gap(5)).with_shapes(bar, Shape::Square);
    let (tx, rx) = mpsc::channel::<Delivery<Move>>(1);
    let (screen, capture) = Screen::capture();
    let state = Arc::new(LoopState::default());

    tx.send(Move::Drop.into()).await.unwrap();
    drop(tx);
    let state_handle = Arc::clone(&state);
    let interrupt = Interrupt::detached();
    let game = run_loop(game, screen, rx, Timing::default(), state_handle, interrupt).await;

    assert_eq!(game.score(), 1);
    assert_eq!(game.current(), Shape::Square);
    assert!(capture.contents().contains(" Score: 1"));
    assert_eq!(state.outcome(), None);
}

#[tokio::test(start_paused = true)]
async fn snake_runs_into_the_wall() {
    let mut snake = Snake::new();
    snake.place_food(Point::new(0, 0));
    let (_tx, rx) = mpsc::channel::<Delivery<Direction>>(1);
    let (screen, capture) = Screen::capture();
    let state = Arc::new(LoopState::default());
    let interrupt = Interrupt::detached();

    let state_handle = Arc::clone(&state);
    let reader = interrupt.clone();
    let snake = run_loop(snake, screen, rx, Timing::default(), state_handle, reader).await;

    assert_eq!(snake.head(), Point::new(5, 0));
    assert_eq!(snake.message(), "Game over!");
    assert_eq!(state.outcome(), Some(Outcome::Lost));
    assert!(state.is_stopped());
    assert!(interrupt.is_interrupted());
    assert!(capture.contents().contains("Game over!"));
}

#[test]
fn closed_channel_draws_once_and_returns() {
    let (tx, rx) = mpsc::channel(1);
    drop(tx);
    let (screen, capture) = Screen::capture();
    let game = Tetris::new().with_shapes(Shape::Square, Shape::Square);

    let game = tokio_test::block_on(run_loop(
        game,
        screen,
        rx,
        Timing::default(),
        Arc::new(LoopState::default()),
        Interrupt::detached(),
    ));

    assert_eq!(game.position(), Tetris::spawn_point());
    assert!(capture.contents().contains(" Score: 0"));
}

/// Blocks like the terminal reader until the loop interrupts it.
struct UntilInterrupted {
    interrupt: Interrupt,
    deadline: Instant,
}

impl KeySource for UntilInterrupted {
    fn next_key(&mut self) -> Result<Option<Key>, InputError> {
        while !self.interrupt.is_interrupted() && Instant::now() < self.deadline {
            std::thread::sleep(Duration::from_millis(1));
        }
        Ok(None)
    }
}

#[test]
fn driven_snake_reports_the_loss() {
    let config = RuntimeConfig {
        tick: Duration::from_millis(1),
        step: Duration::from_millis(2),
        pause: Duration::from_millis(1),
        ..RuntimeConfig::default()
    };
    let interrupt = Interrupt::detached();
    let (screen, _capture) = Screen::capture();
    let ctx = GameContext::new(screen, SimpleRng::new(5), interrupt.clone(), config);
    let mut keys = UntilInterrupted {
        interrupt,
        deadline: Instant::now() + Duration::from_secs(10),
    };

    let mut game = TickDriven::new(Snake::new());
    let outcome = run_game(&mut game, &mut keys, ctx).unwrap();
    assert_eq!(outcome, Outcome::Lost);
}
