//! Interactive TUI: paste notes on the left, read the organized plan on the right.

pub mod app;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::debug;

use maintplan_core::plan::OrganizedPlan;
use maintplan_core::structuring::{PlanStructurer, StructuringError};

use app::{App, Submission};

type StructuringResult = Result<OrganizedPlan, StructuringError>;

/// Launch the interactive TUI.
pub async fn run_tui(structurer: Arc<dyn PlanStructurer>, initial_input: String) -> Result<()> {
    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(initial_input);

    let result = run_event_loop(&mut terminal, &mut app, structurer).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    structurer: Arc<dyn PlanStructurer>,
) -> Result<()> {
    let tick_rate = app.tick_rate;
    let (tx, mut rx) = mpsc::unbounded_channel::<StructuringResult>();

    loop {
        // Pick up a finished call before drawing.
        if let Ok(result) = rx.try_recv() {
            app.complete(result);
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(Submission::Dispatched(text)) = app.on_key(key) {
                        dispatch(&structurer, &tx, text);
                    }
                }
                Event::Paste(text) => app.insert_str(&text),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Run one structuring call off the UI task and report back on `tx`.
///
/// The app is in `Loading` until the result arrives, so no second call can
/// be dispatched in the meantime.
fn dispatch(
    structurer: &Arc<dyn PlanStructurer>,
    tx: &mpsc::UnboundedSender<StructuringResult>,
    text: String,
) {
    let structurer = Arc::clone(structurer);
    let tx = tx.clone();
    tokio::spawn(async move {
        debug!(structurer = structurer.name(), "structuring call started");
        let result = structurer.structure(&text).await;
        // The receiver is gone if the user quit mid-call.
        let _ = tx.send(result);
    });
}
