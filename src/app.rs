/// Main TUI application

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::core::{FetchError, FetchTicket, HttpTvlSource, ProtocolSeries, TvlSource};
use crate::screens::Dashboard;
use crate::utils::{AppConfig, UI_TICK_MS};

const STATUS_TTL: Duration = Duration::from_secs(3);

/// A finished request on its way back to the UI loop
#[derive(Debug)]
pub struct FetchResult {
    pub panel: usize,
    pub ticket: FetchTicket,
    pub result: Result<ProtocolSeries, FetchError>,
}

pub struct App {
    dashboard: Dashboard,
    source: Arc<dyn TvlSource>,
    focused: usize,
    should_quit: bool,
    show_help: bool,
    status_message: Option<String>,
    status_set_at: Option<Instant>,
    // Protocol editing state
    edit_buffer: Option<String>,
    // Background fetch channel
    fetch_tx: UnboundedSender<FetchResult>,
    fetch_rx: UnboundedReceiver<FetchResult>,
}

impl App {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let source = HttpTvlSource::new(&config.endpoint, config.request_timeout())?;
        tracing::info!(endpoint = %source.endpoint(), protocols = ?config.protocols, "starting dashboard");
        Ok(Self::with_source(&config.protocols, Arc::new(source)))
    }

    pub fn with_source(protocols: &[String], source: Arc<dyn TvlSource>) -> Self {
        let (fetch_tx, fetch_rx) = unbounded_channel();

        Self {
            dashboard: Dashboard::new(protocols),
            source,
            focused: 0,
            should_quit: false,
            show_help: false,
            status_message: None,
            status_set_at: None,
            edit_buffer: None,
            fetch_tx,
            fetch_rx,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.mount();

        let result = self.run_loop(&mut terminal).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Issue the initial request of every panel
    pub fn mount(&mut self) {
        for (index, ticket) in self.dashboard.mount() {
            self.dispatch(index, ticket);
        }
    }

    /// Run one request in the background; the result comes back over the channel
    fn dispatch(&self, panel: usize, ticket: FetchTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();

        tracing::info!(panel, protocol = %ticket.protocol, generation = ticket.generation, path = %ticket.path(), "requesting TVL series");

        tokio::spawn(async move {
            let result = source.fetch_series(&ticket.protocol).await;
            // Receiver is gone only when the app is shutting down
            let _ = tx.send(FetchResult { panel, ticket, result });
        });
    }

    /// Apply every finished request without blocking
    pub fn drain_results(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(done) = self.fetch_rx.try_recv() {
            self.apply_result(done);
            applied += 1;
        }
        applied
    }

    fn apply_result(&mut self, done: FetchResult) {
        if let Some(outcome) = self.dashboard.apply(done.panel, &done.ticket, done.result) {
            tracing::debug!(panel = done.panel, generation = done.ticket.generation, ?outcome, "fetch applied");
        }
    }

    async fn run_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            self.drain_results();

            if let Some(set_at) = self.status_set_at {
                if set_at.elapsed() >= STATUS_TTL {
                    self.clear_status();
                }
            }

            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(UI_TICK_MS))? {
                if let Event::Key(key_event) = event::read()? {
                    if key_event.kind == KeyEventKind::Press {
                        self.handle_key(key_event);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn render(&self, frame: &mut ratatui::Frame) {
        self.dashboard.render(
            frame,
            self.focused,
            self.edit_buffer.as_deref(),
            self.status_message.as_deref(),
            self.show_help,
        );
    }

    fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_set_at = Some(Instant::now());
    }

    fn clear_status(&mut self) {
        self.status_message = None;
        self.status_set_at = None;
    }

    pub fn handle_key(&mut self, key_event: KeyEvent) {
        let key = key_event.code;

        if key_event.modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Handle edit mode separately
        if self.edit_buffer.is_some() {
            self.handle_edit_key(key);
            return;
        }

        if self.show_help {
            if matches!(key, KeyCode::Char('?') | KeyCode::Esc | KeyCode::F(1)) {
                self.show_help = false;
            }
            return;
        }

        match key {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') | KeyCode::F(1) => {
                self.show_help = true;
            }
            KeyCode::Tab => self.next_panel(),
            KeyCode::BackTab => self.prev_panel(),
            KeyCode::Left => {
                if let Some(panel) = self.dashboard.panel_mut(self.focused) {
                    panel.cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(panel) = self.dashboard.panel_mut(self.focused) {
                    panel.cursor_right();
                }
            }
            KeyCode::Esc => {
                if let Some(panel) = self.dashboard.panel_mut(self.focused) {
                    panel.clear_cursor();
                }
            }
            KeyCode::Char('r') => {
                if let Some(panel) = self.dashboard.panel_mut(self.focused) {
                    let ticket = panel.begin_fetch();
                    self.set_status(format!("Refreshing {}...", ticket.protocol));
                    self.dispatch(self.focused, ticket);
                }
            }
            KeyCode::Char('R') => {
                self.set_status("Refreshing all panels...".to_string());
                self.mount();
            }
            KeyCode::Char('e') => {
                if let Some(panel) = self.dashboard.panels().get(self.focused) {
                    self.edit_buffer = Some(panel.protocol().to_string());
                    self.clear_status();
                }
            }
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyCode) {
        let Some(buffer) = self.edit_buffer.as_mut() else {
            return;
        };

        match key {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Esc => {
                self.edit_buffer = None;
            }
            KeyCode::Enter => {
                let protocol = buffer.trim().to_string();
                self.edit_buffer = None;

                if protocol.is_empty() {
                    self.set_status("Protocol name cannot be empty".to_string());
                    return;
                }

                let focused = self.focused;
                let ticket = self
                    .dashboard
                    .panel_mut(focused)
                    .and_then(|panel| panel.set_protocol(&protocol));

                if let Some(ticket) = ticket {
                    self.set_status(format!("Loading {}...", protocol));
                    self.dispatch(focused, ticket);
                }
            }
            _ => {}
        }
    }

    fn next_panel(&mut self) {
        if !self.dashboard.is_empty() {
            self.focused = (self.focused + 1) % self.dashboard.len();
        }
    }

    fn prev_panel(&mut self) {
        if !self.dashboard.is_empty() {
            self.focused = if self.focused == 0 {
                self.dashboard.len() - 1
            } else {
                self.focused - 1
            };
        }
    }
}
