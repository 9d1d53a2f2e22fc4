//! Tick-driven loop for games that also advance on their own.
//!
//! The world lives on a dedicated loop thread. The driver thread only
//! translates keys into actions and hands them over one at a time: `handle`
//! returns once the loop has applied the action and redrawn. The loop also
//! runs an autonomous step every `step` interval. Only the loop thread
//! touches the world or the screen.
//!
//! ```text
//!  driver thread            loop thread (current-thread runtime)
//!  handle(key) ──action──▶  select! { biased; action, tick }
//!       ▲                      ├─ action → apply → redraw ─┐
//!       └──────────ack─────────┼───────────────────────────┘
//!                              └─ tick ≥ step → step → redraw
//! ```

use std::fmt;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::error::GameError;
use crate::game::{Game, GameContext};
use crate::input::Interrupt;
use crate::rng::SimpleRng;
use crate::term::Screen;
use crate::types::{Key, Outcome};

/// Result of applying an action or a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// The game ended; `message` is shown before the loop stops.
    Over { outcome: Outcome, message: String },
}

impl Flow {
    pub fn over(outcome: Outcome, message: impl Into<String>) -> Self {
        Flow::Over {
            outcome,
            message: message.into(),
        }
    }
}

/// A world advanced both by player actions and by a periodic step.
pub trait TickGame: Send + 'static {
    type Action: fmt::Debug + Send + 'static;

    /// Prepare the first state (spawn pieces, food, ...).
    fn init(&mut self, rng: SimpleRng);

    /// Map a key to an action. Runs on the driver thread, so it sees no state.
    fn translate(key: &Key) -> Option<Self::Action>;

    fn apply(&mut self, action: Self::Action) -> Flow;

    /// One autonomous step.
    fn step(&mut self) -> Flow;

    fn set_message(&mut self, message: String);

    /// Full redraw; the caller flushes.
    fn draw(&self, screen: &mut Screen) -> io::Result<()>;
}

/// An action on its way to the loop.
///
/// A delivery made with [`Delivery::acked`] is acknowledged once the action
/// has been applied and drawn; dropping it unacknowledged also releases the
/// waiting sender.
#[derive(Debug)]
pub struct Delivery<A> {
    action: A,
    ack: Option<oneshot::Sender<()>>,
}

impl<A> Delivery<A> {
    pub fn acked(action: A) -> (Self, oneshot::Receiver<()>) {
        let (tx, rx) = oneshot::channel();
        let delivery = Self {
            action,
            ack: Some(tx),
        };
        (delivery, rx)
    }
}

impl<A> From<A> for Delivery<A> {
    fn from(action: A) -> Self {
        Self { action, ack: None }
    }
}

fn acknowledge(ack: Option<oneshot::Sender<()>>) {
    if let Some(ack) = ack {
        let _ = ack.send(());
    }
}

/// Loop timing, taken from [`RuntimeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub tick: Duration,
    pub step: Duration,
    pub pause: Duration,
}

impl From<&RuntimeConfig> for Timing {
    fn from(config: &RuntimeConfig) -> Self {
        Self {
            tick: config.tick,
            step: config.step,
            pause: config.pause,
        }
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::from(&RuntimeConfig::default())
    }
}

/// State shared between the driver and the loop thread.
#[derive(Debug, Default)]
pub struct LoopState {
    stopped: AtomicBool,
    outcome: Mutex<Option<Outcome>>,
}

impl LoopState {
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Record how the game ended and stop. The first outcome wins.
    pub fn finish(&self, outcome: Outcome) {
        let mut slot = self.outcome.lock().unwrap_or_else(|e| e.into_inner());
        slot.get_or_insert(outcome);
        drop(slot);
        self.stop();
    }

    pub fn outcome(&self) -> Option<Outcome> {
        *self.outcome.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Adapts a [`TickGame`] to the [`Game`] contract.
pub struct TickDriven<G: TickGame> {
    pending: Option<G>,
    actions: Option<mpsc::Sender<Delivery<G::Action>>>,
    state: Arc<LoopState>,
    worker: Option<JoinHandle<()>>,
}

impl<G: TickGame> TickDriven<G> {
    pub fn new(game: G) -> Self {
        Self {
            pending: Some(game),
            actions: None,
            state: Arc::new(LoopState::default()),
            worker: None,
        }
    }

    fn spawn(&mut self, mut game: G, ctx: GameContext) -> Result<(), GameError> {
        game.init(ctx.rng);

        let (tx, rx) = mpsc::channel(1);
        let timing = Timing::from(&ctx.config);
        let state = Arc::clone(&self.state);
        let screen = ctx.screen;
        let interrupt = ctx.interrupt;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(GameError::Runtime)?;

        let worker = thread::Builder::new()
            .name("tick-loop".into())
            .spawn(move || {
                runtime.block_on(run_loop(game, screen, rx, timing, state, interrupt));
            })
            .map_err(GameError::Runtime)?;

        self.actions = Some(tx);
        self.worker = Some(worker);
        Ok(())
    }
}

impl<G: TickGame> Game for TickDriven<G> {
    fn init(&mut self, ctx: GameContext) -> Result<(), GameError> {
        let game = self
            .pending
            .take()
            .ok_or_else(|| GameError::InvalidArgs("game already started".into()))?;
        self.spawn(game, ctx)?;
        info!("tick loop started");
        Ok(())
    }

    fn handle(&mut self, key: Key) {
        if key.is_quit() {
            self.state.finish(Outcome::Quit);
            self.actions = None;
            return;
        }
        let Some(action) = G::translate(&key) else {
            return;
        };
        let Some(tx) = &self.actions else {
            return;
        };
        let (delivery, applied) = Delivery::acked(action);
        if tx.blocking_send(delivery).is_err() || applied.blocking_recv().is_err() {
            debug!("tick loop already stopped");
        }
    }

    fn should_continue(&self) -> bool {
        !self.state.is_stopped()
    }

    fn finish(&mut self) -> Outcome {
        self.state.stop();
        self.actions = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("tick loop thread panicked");
            }
        }
        self.state.outcome().unwrap_or(Outcome::Quit)
    }
}

impl<G: TickGame> Drop for TickDriven<G> {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.finish();
        }
    }
}

/// Drive `game` until the action channel closes or the game ends.
///
/// Input wins when an action and a tick are ready together. An action is
/// acknowledged after it has been applied and drawn. On
/// [`Flow::Over`] the message is drawn, the loop pauses, records the outcome
/// and wakes the key reader. Returns the final world.
pub async fn run_loop<G: TickGame>(
    mut game: G,
    mut screen: Screen,
    mut actions: mpsc::Receiver<Delivery<G::Action>>,
    timing: Timing,
    state: Arc<LoopState>,
    interrupt: Interrupt,
) -> G {
    let started = Instant::now();
    let mut last_step = started;
    let mut ticker = time::interval(timing.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    redraw(&game, &mut screen);

    loop {
        let mut ack = None;
        let flow = tokio::select! {
            biased;
            delivery = actions.recv() => match delivery {
                Some(Delivery { action, ack: done }) => {
                    debug!(?action, "apply");
                    ack = done;
                    game.apply(action)
                }
                None => break,
            },
            now = ticker.tick() => {
                if now.duration_since(last_step) < timing.step {
                    continue;
                }
                last_step = now;
                game.set_message(clock(now.duration_since(started)));
                game.step()
            }
        };

        match flow {
            Flow::Continue => {
                redraw(&game, &mut screen);
                acknowledge(ack);
            }
            Flow::Over { outcome, message } => {
                info!(outcome = outcome.as_str(), %message, "game over");
                game.set_message(message);
                redraw(&game, &mut screen);
                acknowledge(ack);
                time::sleep(timing.pause).await;
                state.finish(outcome);
                interrupt.interrupt();
                break;
            }
        }
    }

    game
}

fn redraw<G: TickGame>(game: &G, screen: &mut Screen) {
    if let Err(e) = game.draw(screen).and_then(|()| screen.flush()) {
        warn!(error = %e, "redraw failed");
    }
}

/// Elapsed play time as `time mm:ss`.
fn clock(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("time {:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Capture;

    /// Counts steps; `Up` adds 10, `Down` ends the game.
    #[derive(Debug, Default)]
    struct Counter {
        value: u32,
        steps: u32,
        lose_at_step: Option<u32>,
        message: String,
    }

    #[derive(Debug, PartialEq)]
    enum Op {
        Add,
        End,
    }

    impl TickGame for Counter {
        type Action = Op;

        fn init(&mut self, _rng: SimpleRng) {}

        fn translate(key: &Key) -> Option<Op> {
            match key {
                Key::Up => Some(Op::Add),
                Key::Down => Some(Op::End),
                _ => None,
            }
        }

        fn apply(&mut self, action: Op) -> Flow {
            match action {
                Op::Add => {
                    self.value += 10;
                    Flow::Continue
                }
                Op::End => Flow::over(Outcome::Won, "done"),
            }
        }

        fn step(&mut self) -> Flow {
            self.steps += 1;
            self.value += 1;
            if Some(self.steps) == self.lose_at_step {
                return Flow::over(Outcome::Lost, "Game over!");
            }
            Flow::Continue
        }

        fn set_message(&mut self, message: String) {
            self.message = message;
        }

        fn draw(&self, screen: &mut Screen) -> io::Result<()> {
            screen.draw_line(&format!("value={} msg={}", self.value, self.message))
        }
    }

    type Started = (
        mpsc::Sender<Delivery<Op>>,
        tokio::task::JoinHandle<Counter>,
        Arc<LoopState>,
        Interrupt,
        Capture,
    );

    fn start(game: Counter) -> Started {
        let (screen, capture) = Screen::capture();
        let (tx, rx) = mpsc::channel(1);
        let state = Arc::new(LoopState::default());
        let interrupt = Interrupt::detached();
        let handle = tokio::spawn(run_loop(
            game,
            screen,
            rx,
            Timing::default(),
            Arc::clone(&state),
            interrupt.clone(),
        ));
        (tx, handle, state, interrupt, capture)
    }

    #[tokio::test(start_paused = true)]
    async fn steps_once_per_second() {
        let (tx, handle, state, _, capture) = start(Counter::default());

        time::sleep(Duration::from_millis(3500)).await;
        drop(tx);
        let game = handle.await.unwrap();

        assert_eq!(game.steps, 3);
        assert_eq!(game.message, "time 00:03");
        assert!(!state.is_stopped());
        // Initial draw plus one per step.
        assert_eq!(capture.contents().matches("value=").count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn actions_apply_and_redraw_immediately() {
        let (tx, handle, _, _, capture) = start(Counter::default());

        tx.send(Op::Add.into()).await.unwrap();
        tx.send(Op::Add.into()).await.unwrap();
        drop(tx);
        let game = handle.await.unwrap();

        assert_eq!(game.value, 20);
        assert_eq!(game.steps, 0);
        assert!(capture.contents().ends_with("value=20 msg=\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn losing_step_records_outcome_and_interrupts() {
        let game = Counter {
            lose_at_step: Some(2),
            ..Default::default()
        };
        let (_tx, handle, state, interrupt, capture) = start(game);

        let started = Instant::now();
        let game = handle.await.unwrap();

        assert_eq!(game.steps, 2);
        assert_eq!(game.message, "Game over!");
        assert_eq!(state.outcome(), Some(Outcome::Lost));
        assert!(state.is_stopped());
        assert!(interrupt.is_interrupted());
        // Two steps plus the final pause.
        assert!(started.elapsed() >= Duration::from_secs(3));
        assert!(capture.contents().contains("msg=Game over!"));
    }

    #[tokio::test(start_paused = true)]
    async fn winning_action_ends_loop() {
        let (tx, handle, state, interrupt, _) = start(Counter::default());

        tx.send(Op::End.into()).await.unwrap();
        let game = handle.await.unwrap();

        assert_eq!(game.message, "done");
        assert_eq!(state.outcome(), Some(Outcome::Won));
        assert!(interrupt.is_interrupted());
        // Further sends fail once the loop is gone.
        assert!(tx.send(Op::Add.into()).await.is_err());
    }

    #[test]
    fn clock_formats_minutes_and_seconds() {
        assert_eq!(clock(Duration::from_secs(0)), "time 00:00");
        assert_eq!(clock(Duration::from_secs(125)), "time 02:05");
    }

    fn short_config() -> RuntimeConfig {
        RuntimeConfig {
            tick: Duration::from_millis(1),
            step: Duration::from_secs(3600),
            pause: Duration::from_millis(1),
            ..RuntimeConfig::default()
        }
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let (screen, _) = Screen::capture();
        let mut driven = TickDriven::new(Counter::default());
        let ctx = GameContext::new(
            screen,
            SimpleRng::new(1),
            Interrupt::detached(),
            short_config(),
        );
        driven.init(ctx).unwrap();

        assert!(driven.should_continue());
        driven.handle(Key::Up);
        driven.handle(Key::Char(b'x'));
        driven.handle(Key::Char(b'q'));
        assert!(!driven.should_continue());
        assert_eq!(driven.finish(), Outcome::Quit);
    }

    #[test]
    fn game_over_is_reported_by_finish() {
        let (screen, capture) = Screen::capture();
        let interrupt = Interrupt::detached();
        let mut driven = TickDriven::new(Counter::default());
        let ctx = GameContext::new(screen, SimpleRng::new(1), interrupt.clone(), short_config());
        driven.init(ctx).unwrap();

        driven.handle(Key::Down);
        while driven.should_continue() {
            thread::sleep(Duration::from_millis(1));
        }
        assert!(interrupt.is_interrupted());
        assert_eq!(driven.finish(), Outcome::Won);
        assert!(capture.contents().contains("msg=done"));
    }

    #[test]
    fn second_init_is_rejected() {
        let mut driven = TickDriven::new(Counter::default());
        let (screen, _) = Screen::capture();
        let ctx = GameContext::new(
            screen,
            SimpleRng::new(1),
            Interrupt::detached(),
            short_config(),
        );
        driven.init(ctx).unwrap();

        let (screen, _) = Screen::capture();
        let ctx = GameContext::new(
            screen,
            SimpleRng::new(1),
            Interrupt::detached(),
            short_config(),
        );
        assert!(matches!(driven.init(ctx), Err(GameError::InvalidArgs(_))));
        driven.finish();
    }

    /// Records every applied letter; drawing stalls while `hold` is set.
    #[derive(Default)]
    struct Tape {
        applied: Arc<Mutex<Vec<u8>>>,
        hold: Arc<AtomicBool>,
    }

    impl TickGame for Tape {
        type Action = u8;

        fn init(&mut self, _rng: SimpleRng) {}

        fn translate(key: &Key) -> Option<u8> {
            match key {
                Key::Char(b) if b.is_ascii_lowercase() => Some(*b),
                _ => None,
            }
        }

        fn apply(&mut self, letter: u8) -> Flow {
            self.applied.lock().unwrap().push(letter);
            Flow::Continue
        }

        fn step(&mut self) -> Flow {
            Flow::Continue
        }

        fn set_message(&mut self, _message: String) {}

        fn draw(&self, _screen: &mut Screen) -> io::Result<()> {
            while self.hold.load(Ordering::SeqCst) {
                thread::sleep(Duration::from_millis(1));
            }
            Ok(())
        }
    }

    fn start_driven(tape: Tape) -> TickDriven<Tape> {
        let (screen, _) = Screen::capture();
        let mut driven = TickDriven::new(tape);
        let ctx = GameContext::new(
            screen,
            SimpleRng::new(1),
            Interrupt::detached(),
            short_config(),
        );
        driven.init(ctx).unwrap();
        driven
    }

    #[test]
    fn handle_waits_until_the_action_is_applied_and_drawn() {
        let tape = Tape::default();
        let applied = Arc::clone(&tape.applied);
        let hold = Arc::clone(&tape.hold);
        hold.store(true, Ordering::SeqCst);
        let mut driven = start_driven(tape);

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        let driver = thread::spawn(move || {
            driven.handle(Key::Char(b'a'));
            let _ = done_tx.send(());
            driven
        });

        let early = done_rx.recv_timeout(Duration::from_millis(200));
        assert!(early.is_err(), "handle returned while the loop was still drawing");

        hold.store(false, Ordering::SeqCst);
        done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("handle never returned");
        let mut driven = driver.join().unwrap();
        assert_eq!(*applied.lock().unwrap(), vec![b'a']);
        assert_eq!(driven.finish(), Outcome::Quit);
    }

    #[test]
    fn burst_of_keys_is_applied_in_order() {
        let tape = Tape::default();
        let applied = Arc::clone(&tape.applied);
        let mut driven = start_driven(tape);

        let letters: Vec<u8> = (b'a'..=b'p').collect();
        for &letter in &letters {
            driven.handle(Key::Char(letter));
        }

        // Every handle returned after its action was applied.
        assert_eq!(*applied.lock().unwrap(), letters);
        driven.finish();
    }
}
