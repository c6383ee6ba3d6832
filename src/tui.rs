use std::{
    io::{Stdout, stdout},
    ops::{Deref, DerefMut},
    time::Duration,
};

use color_eyre::eyre::Result;
use crossterm::{
    cursor,
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event as CrosstermEvent, EventStream,
        KeyEvent, KeyEventKind,
    },
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::{FutureExt, StreamExt};
use ratatui::backend::CrosstermBackend;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};
use tracing::warn;

pub type Frame<'a> = ratatui::Frame<'a>;

/// Terminal events forwarded to the app.
#[derive(Clone, Debug)]
pub enum Event {
    Init,
    Closed,
    Tick,
    Render,
    Paste(String),
    Key(KeyEvent),
    Resize(u16, u16),
}

pub struct Tui {
    pub terminal: ratatui::Terminal<CrosstermBackend<Stdout>>,
    task: JoinHandle<()>,
    event_rx: UnboundedReceiver<Event>,
    event_tx: UnboundedSender<Event>,
    tick_delay: Duration,
    render_delay: Duration,
}

impl Tui {
    /// Rates are per second.
    pub fn new(tick_rate: f64, frame_rate: f64) -> Result<Self> {
        let terminal = ratatui::Terminal::new(CrosstermBackend::new(stdout()))?;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        Ok(Self {
            terminal,
            task: tokio::spawn(async {}),
            event_rx,
            event_tx,
            tick_delay: Duration::from_secs_f64(1.0 / tick_rate),
            render_delay: Duration::from_secs_f64(1.0 / frame_rate),
        })
    }

    fn start(&mut self) {
        self.task.abort();
        self.task = tokio::spawn(Self::event_loop(
            self.event_tx.clone(),
            self.tick_delay,
            self.render_delay,
        ));
    }

    async fn event_loop(tx: UnboundedSender<Event>, tick_delay: Duration, render_delay: Duration) {
        let mut reader = EventStream::new();
        let mut tick_interval = tokio::time::interval(tick_delay);
        let mut render_interval = tokio::time::interval(render_delay);
        if tx.send(Event::Init).is_err() {
            return;
        }
        loop {
            let event = tokio::select! {
                _ = tick_interval.tick() => Event::Tick,
                _ = render_interval.tick() => Event::Render,
                maybe_event = reader.next().fuse() => match maybe_event {
                    Some(Ok(CrosstermEvent::Key(key))) if key.kind == KeyEventKind::Press => {
                        Event::Key(key)
                    }
                    Some(Ok(CrosstermEvent::Resize(x, y))) => Event::Resize(x, y),
                    Some(Ok(CrosstermEvent::Paste(s))) => Event::Paste(s),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("Terminal event error: {}", e);
                        continue;
                    }
                    None => Event::Closed,
                },
            };
            let closed = matches!(event, Event::Closed);
            if tx.send(event).is_err() || closed {
                break;
            }
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        crossterm::execute!(stdout(), EnterAlternateScreen, cursor::Hide)?;
        enable_raw_mode()?;
        crossterm::execute!(stdout(), EnableBracketedPaste)?;
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.task.abort();
        if crossterm::terminal::is_raw_mode_enabled()? {
            self.flush()?;
            restore()?;
        }
        Ok(())
    }

    pub fn suspend(&mut self) -> Result<()> {
        self.exit()?;
        #[cfg(not(windows))]
        signal_hook::low_level::raise(signal_hook::consts::signal::SIGTSTP)?;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.enter()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}

impl Deref for Tui {
    type Target = ratatui::Terminal<CrosstermBackend<Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.terminal
    }
}

impl DerefMut for Tui {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.terminal
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        if let Err(e) = self.exit() {
            eprintln!("Failed to restore terminal: {e}");
        }
    }
}

/// Leave raw mode and the alternate screen. Safe to call more than once.
pub fn restore() -> Result<()> {
    if crossterm::terminal::is_raw_mode_enabled()? {
        crossterm::execute!(
            stdout(),
            DisableBracketedPaste,
            LeaveAlternateScreen,
            cursor::Show
        )?;
        disable_raw_mode()?;
    }
    Ok(())
}
