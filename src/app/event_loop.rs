use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, DisableBracketedPaste, EnableBracketedPaste};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model};
use crate::autosave::Debouncer;
use crate::selection::{SelectionFile, SelectionStore};
use crate::store::{FileStore, JsonStore};
use crate::workspace::Workspace;

use super::input::handle_event;
use super::session::Session;

const RESIZE_DEBOUNCE_MS: u64 = 100;

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be opened, the active
    /// document cannot be resolved, or the terminal fails.
    pub fn run(&mut self) -> Result<()> {
        let store = JsonStore::open(&self.data_dir)
            .with_context(|| format!("Failed to open file store in {}", self.data_dir.display()))?;
        let selection = SelectionFile::open(&self.data_dir);
        let mut session = Session::new(Workspace::new(store, selection), self.autosave_delay);

        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - mdpad requires an interactive terminal")?;
        let _ = execute!(stdout(), EnableBracketedPaste);

        let result = Self::run_session(&mut terminal, &mut session);

        session.teardown();
        let _ = execute!(stdout(), DisableBracketedPaste);
        ratatui::restore();

        result
    }

    fn run_session<S, P>(terminal: &mut DefaultTerminal, session: &mut Session<S, P>) -> Result<()>
    where
        S: FileStore,
        P: SelectionStore,
    {
        let size = terminal.size()?;
        let mut model = Model::new((size.width, size.height));

        // Loading frame until the active document is known.
        terminal.draw(|frame| crate::ui::render(&model, frame))?;
        let outcome = session
            .start(&mut model)
            .context("Failed to load the active file")?;
        tracing::info!(?outcome, "session started");

        Self::event_loop(terminal, session, &mut model)
    }

    fn event_loop<S, P>(
        terminal: &mut DefaultTerminal,
        session: &mut Session<S, P>,
        model: &mut Model,
    ) -> Result<()>
    where
        S: FileStore,
        P: SelectionStore,
    {
        let start = Instant::now();
        let elapsed_ms = || u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let mut resize_debouncer = Debouncer::new(RESIZE_DEBOUNCE_MS);
        let mut needs_render = true;

        loop {
            let now_ms = elapsed_ms();

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                session.dispatch(model, Message::Resize(width, height), now_ms);
                needs_render = true;
            }

            if session.tick(model, now_ms) {
                needs_render = true;
            }

            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() || session.autosave_pending() {
                10
            } else {
                250
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Coalesce key repeat bursts and pastes into a single render.
                loop {
                    let event_ms = elapsed_ms();
                    let msg = handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        tracing::trace!(?msg, "message");
                        session.dispatch(model, msg, event_ms);
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if model.should_quit {
                break;
            }

            if needs_render {
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                needs_render = false;
            }
        }
        Ok(())
    }
}
