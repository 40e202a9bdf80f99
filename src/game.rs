use std::io;
use std::sync::{atomic::{AtomicBool, Ordering}, Arc};
use std::{thread::sleep, time::{Duration, Instant}};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::info;
use rand::Rng;
use signal_hook::{consts::TERM_SIGNALS, flag};

use crate::board::Direction::{self, *};
use crate::session::Session;
use crate::snake::MoveResult;
use crate::term::{self, TermManager};

/// Sleep between two input polls, roughly 120 polls a second.
pub const POLL_INTERVAL: Duration = Duration::from_millis(8);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    Pause,
    Quit,
}

/// Answer to the pause and end-of-round prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Resume,
    Restart,
    Quit,
}

/// Maps a key press to what it does while a round is running.
pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    if is_ctrl_c(ev) {
        return Some(Command::Quit);
    }

    match ev.code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => Some(Command::Steer(Up)),
            'a' => Some(Command::Steer(Left)),
            's' => Some(Command::Steer(Down)),
            'd' => Some(Command::Steer(Right)),
            'p' | 'q' => Some(Command::Pause),
            _ => None,
        },
        KeyCode::Up => Some(Command::Steer(Up)),
        KeyCode::Left => Some(Command::Steer(Left)),
        KeyCode::Down => Some(Command::Steer(Down)),
        KeyCode::Right => Some(Command::Steer(Right)),
        KeyCode::Esc | KeyCode::F(1) => Some(Command::Pause),
        _ => None,
    }
}

/// Maps a key press on a prompt. `r` means `on_r`, `q` and Ctrl+C quit.
pub fn choice_for(ev: &KeyEvent, on_r: Choice) -> Option<Choice> {
    if is_ctrl_c(ev) {
        return Some(Choice::Quit);
    }

    match ev.code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'q' => Some(Choice::Quit),
            'r' => Some(on_r),
            _ => None,
        },
        _ => None,
    }
}

/// Raised when the process is asked to terminate.
///
/// Raw mode turns Ctrl+C into a key press, so this covers the signals that
/// arrive from outside: SIGTERM, SIGQUIT and, on unix, SIGHUP.
#[derive(Debug, Clone, Default)]
pub struct Shutdown(Arc<AtomicBool>);

impl Shutdown {
    /// Installs the signal handlers. A second signal kills the process outright.
    pub fn register() -> io::Result<Self> {
        let shutdown = Shutdown::default();

        let mut signals = TERM_SIGNALS.to_vec();
        #[cfg(unix)]
        signals.push(signal_hook::consts::SIGHUP);

        for sig in signals {
            flag::register_conditional_shutdown(sig, 1, Arc::clone(&shutdown.0))?;
            flag::register(sig, Arc::clone(&shutdown.0))?;
        }

        Ok(shutdown)
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// The real-time loop around a [`Session`].
pub struct SnakeGame<R> {
    term: TermManager,
    session: Session<R>,
    shutdown: Shutdown,
}

impl<R: Rng> SnakeGame<R> {
    pub fn new(term: TermManager, session: Session<R>, shutdown: Shutdown) -> Self {
        SnakeGame { term, session, shutdown }
    }

    /// Plays rounds until the player quits.
    pub fn run(&mut self) -> term::Result<()> {
        self.term.setup()?;
        self.term.clear()?;

        loop {
            if self.play_round()? == Choice::Quit {
                break;
            }

            self.term.draw_overlay(&self.session)?;
            match self.choose(Choice::Restart)? {
                Choice::Quit => break,
                _ => {
                    self.session.restart();
                    self.term.clear()?;
                }
            }
        }

        info!("quitting");
        self.term.restore()
    }

    /// Runs until the round ends. Returns `Quit` if the player asked to leave.
    fn play_round(&mut self) -> term::Result<Choice> {
        let mut last_move = Instant::now();

        while self.session.state().is_running() {
            if self.shutdown.requested() {
                info!("termination requested");
                return Ok(Choice::Quit);
            }

            if let Some(ev) = self.term.poll_key()? {
                match command_for(&ev) {
                    Some(Command::Steer(dir)) => {
                        self.session.steer(dir);
                    }
                    Some(Command::Pause) => {
                        if self.pause()? == Choice::Quit {
                            return Ok(Choice::Quit);
                        }
                        // Time spent paused does not count towards the next move.
                        last_move = Instant::now();
                    }
                    Some(Command::Quit) => return Ok(Choice::Quit),
                    None => {}
                }
            }

            if last_move.elapsed() >= self.session.state().speed() {
                last_move = Instant::now();
                if let Some(MoveResult::Crashed(crash)) = self.session.tick() {
                    info!("crashed into {:?}", crash);
                }
            }

            self.term.draw(&self.session)?;
            sleep(POLL_INTERVAL);
        }

        Ok(Choice::Restart)
    }

    fn pause(&mut self) -> term::Result<Choice> {
        self.session.pause();
        self.term.draw_overlay(&self.session)?;

        let choice = self.choose(Choice::Resume)?;
        self.session.resume();
        self.term.clear()?;
        Ok(choice)
    }

    /// Blocks until the player presses `q` or `r`.
    fn choose(&mut self, on_r: Choice) -> term::Result<Choice> {
        loop {
            if self.shutdown.requested() {
                info!("termination requested");
                return Ok(Choice::Quit);
            }

            if let Some(choice) = self.term.poll_key()?.and_then(|ev| choice_for(&ev, on_r)) {
                return Ok(choice);
            }
            sleep(POLL_INTERVAL);
        }
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
