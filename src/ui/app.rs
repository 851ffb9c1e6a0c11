//! Main TUI application state and logic

use crate::playback::{Playback, PlaybackError, PollScheduler};
use crate::scenario::{DisplayFrame, Script};
use crate::ui::panes::{
    render_narration_pane, render_operations_pane, render_snapshot_pane, render_status_bar,
    render_timeline_pane, StatusLine,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};
use tracing::debug;

/// Longest wait for input before checking timers again
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Key repeat guard for the play toggle
const SPACE_DEBOUNCE: Duration = Duration::from_millis(200);

/// The main application state
pub struct App {
    /// Recorded operations being browsed
    pub script: Script,

    /// Index of the operation loaded into `playback`
    pub operation: usize,

    pub playback: Playback<DisplayFrame, PollScheduler>,

    /// Auto-play interval
    pub interval: Duration,

    /// Per-pane scroll offsets
    pub operations_scroll: usize,
    pub frames_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create the app with the first operation of `script` loaded
    pub fn new(script: Script, interval: Duration) -> Result<Self, PlaybackError> {
        let mut playback = Playback::new(PollScheduler::new());
        let first = script
            .operations
            .first()
            .ok_or(PlaybackError::Empty)?;
        playback.load(first.frames.clone())?;

        Ok(App {
            script,
            operation: 0,
            playback,
            interval,
            operations_scroll: 0,
            frames_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        })
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if self.playback.tick() > 0 {
                self.status_message = if self.playback.is_playing() {
                    "Playing...".to_string()
                } else {
                    "Playback complete".to_string()
                };
            }

            // Wake up for whichever comes first, a key or the armed timer
            let timeout = self
                .playback
                .scheduler()
                .time_until_next()
                .map_or(POLL_INTERVAL, |due| due.min(POLL_INTERVAL));
            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(columns[1]);

        let Some(current) = self.playback.current() else {
            return;
        };
        let label = self
            .script
            .operations
            .get(self.operation)
            .map_or("", |op| op.label.as_str());

        render_snapshot_pane(frame, left_rows[0], current, self.script.graph.as_ref());
        render_narration_pane(frame, left_rows[1], label, current);
        render_operations_pane(
            frame,
            right_rows[0],
            &self.script,
            self.operation,
            &mut self.operations_scroll,
        );
        render_timeline_pane(
            frame,
            right_rows[1],
            self.playback.frames(),
            self.playback.position(),
            &mut self.frames_scroll,
        );
        render_status_bar(
            frame,
            main_chunks[1],
            &StatusLine {
                message: &self.status_message,
                position: self.playback.position(),
                total: self.playback.len(),
                operation: self.operation,
                operations: self.script.operations.len(),
                is_playing: self.playback.is_playing(),
                failed: current.failed,
            },
        );
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.playback.pause();
                let result = self.playback.step_backward().map(|_| ());
                self.report(result, "Stepped backward");
            }
            KeyCode::Right => {
                self.playback.pause();
                let result = self.playback.step_forward().map(|_| ());
                self.report(result, "Stepped forward");
            }
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= SPACE_DEBOUNCE {
                    self.last_space_press = Instant::now();
                    let result = self.playback.toggle(self.interval);
                    let message = if self.playback.is_playing() {
                        "Playing..."
                    } else {
                        "Paused"
                    };
                    self.report(result, message);
                }
            }
            KeyCode::Enter => {
                self.playback.pause();
                let last = self.playback.len().saturating_sub(1);
                let result = self.playback.seek(last).map(|_| ());
                self.report(result, "Jumped to end");
            }
            KeyCode::Backspace => {
                self.playback.pause();
                let result = self.playback.seek(0).map(|_| ());
                self.report(result, "Jumped to start");
            }
            KeyCode::Char('n') | KeyCode::Down => self.select(self.operation + 1),
            KeyCode::Char('p') | KeyCode::Up => {
                if let Some(previous) = self.operation.checked_sub(1) {
                    self.select(previous);
                }
            }
            _ => {}
        }
    }

    /// Load another operation's frames, starting from its first frame
    fn select(&mut self, operation: usize) {
        let Some(op) = self.script.operations.get(operation) else {
            return;
        };
        let result = self.playback.load(op.frames.clone());
        if result.is_ok() {
            debug!(operation = %op.label, "operation selected");
            self.status_message = format!("Loaded {}", op.label);
            self.operation = operation;
            self.frames_scroll = 0;
        } else {
            self.report(result, "");
        }
    }

    fn report(&mut self, result: Result<(), PlaybackError>, message: &str) {
        self.status_message = match result {
            Ok(()) => message.to_string(),
            Err(e) => format!("Cannot do that: {}", e),
        };
    }
}
