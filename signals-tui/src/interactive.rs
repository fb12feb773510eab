//! Keyboard-driven dashboard mode.

use std::io::{self, Write};
use std::panic;
use std::sync::Arc;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{Event, EventStream};
use crossterm::style::Print;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use crossterm::{execute, queue};
use futures::StreamExt;
use log::{debug, info, warn};
use signals_lib::boundary::ErrorBoundary;
use signals_lib::error::{Error, ErrorHandler};
use signals_lib::retry::{RetryCall, RetryError, RetryState};
use signals_ui::table::DataTable;
use tokio::sync::{Notify, watch};

use crate::brands::Brand;
use crate::dashboard::{self, Status};
use crate::error::AppError;
use crate::keys::{self, Command};

const HELP: &str = "up/down move  enter open  s select  1-6 sort  r retry  q quit";

type LoadCall = RetryCall<Vec<Brand>, Error>;

/// Restores the terminal when dropped, including on panic.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> io::Result<Self> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = restore_terminal();
    }
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), Show, LeaveAlternateScreen)?;
    Ok(())
}

/// Everything the interactive loop reads and mutates.
pub struct Session<'a> {
    pub table: &'a mut DataTable<Brand>,
    pub boundary: &'a ErrorBoundary,
    pub handler: &'a ErrorHandler,
    pub status: &'a Status,
    /// Signalled when the boundary resets.
    pub redraw: Arc<Notify>,
}

impl Session<'_> {
    fn set_status(&self, message: impl Into<String>) {
        if let Ok(mut status) = self.status.lock() {
            *status = Some(message.into());
        }
    }

    /// Apply one command. Returns `false` to quit.
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Table(key) => {
                self.table.handle_key(key);
            }
            Command::Select => {
                let Some(row) = self.table.focused_row() else {
                    self.set_status("Move to a row first");
                    return true;
                };
                if !self.table.select_row(row).is_handled() {
                    self.set_status("Selection is disabled (run with --selectable)");
                }
            }
            Command::Sort(n) => {
                let Some(key) = dashboard::visible_column_key(self.table, n) else {
                    return true;
                };
                if self.table.handle_sort(&key).is_handled() {
                    self.boundary.update_props(self.table.sort_state());
                } else {
                    self.set_status(format!("Column '{}' is not sortable", key));
                }
            }
            Command::Retry => match self.boundary.retry() {
                Some(delay) => self.set_status(format!("Retrying in {:.1}s", delay.as_secs_f64())),
                None => debug!("retry ignored"),
            },
        }
        true
    }

    fn finish_load(&mut self, result: Result<Vec<Brand>, RetryError<Error>>) {
        match result {
            Ok(brands) => {
                info!("loaded {} brands", brands.len());
                self.table.set_data(brands);
            }
            Err(e) => {
                self.handler.handle_error(e.to_string(), Some("load"));
                self.set_status(format!("Load failed: {}", e));
            }
        }
        self.table.set_loading(false);
    }
}

/// Compose the full screen: table, status line and help.
pub fn screen(session: &Session<'_>, progress: Option<&RetryState>) -> String {
    let mut out = dashboard::render(session.boundary, session.table);
    out.push('\n');

    let status = session.status.lock().ok().and_then(|s| s.clone());
    if let Some(state) = progress.filter(|s| s.is_retrying) {
        out.push_str(&format!(
            "Attempt {} failed ({}), retrying...",
            state.retry_count,
            state.last_error.as_deref().unwrap_or("unknown error"),
        ));
    } else if let Some(status) = status {
        out.push_str(&status);
    }
    out.push('\n');
    out.push_str(HELP);
    out
}

fn draw(out: &mut impl Write, screen: &str) -> io::Result<()> {
    queue!(out, Clear(ClearType::All))?;
    for (row, line) in screen.lines().enumerate() {
        queue!(out, MoveTo(0, row as u16), Print(line))?;
    }
    out.flush()
}

async fn wait_load(load: &mut Option<LoadCall>) -> Result<Vec<Brand>, RetryError<Error>> {
    match load {
        Some(call) => call.await,
        None => std::future::pending().await,
    }
}

/// Resolves when the load state changes; `false` once the load is gone.
async fn wait_progress(progress: &mut Option<watch::Receiver<RetryState>>) -> bool {
    match progress {
        Some(rx) => rx.changed().await.is_ok(),
        None => std::future::pending().await,
    }
}

/// Run the interactive loop until the user quits.
///
/// `load` fills the table when it settles; the table shows its loading view
/// until then. Quitting cancels a load still in progress.
pub async fn run(mut session: Session<'_>, load: LoadCall) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;
    let mut stdout = io::stdout();
    let mut events = EventStream::new();
    let mut progress: Option<watch::Receiver<RetryState>> = Some(load.subscribe());
    let mut load = Some(load);
    let redraw = session.redraw.clone();

    loop {
        let state = progress.as_ref().map(|rx| rx.borrow().clone());
        draw(&mut stdout, &screen(&session, state.as_ref()))?;

        tokio::select! {
            result = wait_load(&mut load) => {
                load = None;
                progress = None;
                session.finish_load(result);
            }
            open = wait_progress(&mut progress) => {
                if !open {
                    progress = None;
                }
            }
            _ = redraw.notified() => {
                debug!("boundary reset, redrawing");
            }
            event = events.next() => match event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(command) = keys::command(key)
                        && !session.apply(command)
                    {
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("terminal event error: {}", e);
                    return Err(e.into());
                }
                None => break,
            },
        }
    }

    if let Some(call) = load {
        call.cancel();
    }
    info!("interactive session ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use signals_lib::boundary::{BoundaryConfig, Fault};
    use signals_lib::error::ErrorHandlerConfig;
    use signals_ui::Key;

    use super::*;
    use crate::brands::sample;

    struct Fixture {
        table: DataTable<Brand>,
        boundary: ErrorBoundary,
        handler: ErrorHandler,
        status: Status,
    }

    impl Fixture {
        fn new(selectable: bool) -> Self {
            let status = Status::default();
            let mut table = dashboard::build_table(selectable, &status);
            table.set_data(sample());
            table.set_loading(false);
            Self {
                table,
                boundary: ErrorBoundary::new(
                    BoundaryConfig::named("brands").reset_on_props_change(true),
                ),
                handler: ErrorHandler::new(ErrorHandlerConfig::default().log_errors(false)),
                status,
            }
        }

        fn session(&mut self) -> Session<'_> {
            Session {
                table: &mut self.table,
                boundary: &self.boundary,
                handler: &self.handler,
                status: &self.status,
                redraw: Arc::new(Notify::new()),
            }
        }
    }

    #[test]
    fn test_commands_drive_table() {
        let mut fixture = Fixture::new(true);
        let mut session = fixture.session();
        assert!(session.apply(Command::Table(Key::Down)));
        assert!(session.apply(Command::Table(Key::Down)));
        assert!(session.apply(Command::Select));
        assert!(session.apply(Command::Sort(1)));
        assert!(!session.apply(Command::Quit));

        assert_eq!(fixture.table.focused_row(), Some(1));
        assert_eq!(fixture.table.selected_row(), Some(1));
        assert_eq!(fixture.table.sort_state().column.as_deref(), Some("name"));
        assert_eq!(
            fixture.status.lock().unwrap().as_deref(),
            Some("Selected acme")
        );
    }

    #[test]
    fn test_select_without_selectable_sets_status() {
        let mut fixture = Fixture::new(false);
        let mut session = fixture.session();
        session.apply(Command::Select);
        assert_eq!(
            session.status.lock().unwrap().as_deref(),
            Some("Move to a row first")
        );
        session.apply(Command::Table(Key::Home));
        session.apply(Command::Select);
        assert_eq!(
            session.status.lock().unwrap().as_deref(),
            Some("Selection is disabled (run with --selectable)")
        );
    }

    #[test]
    fn test_sort_change_resets_faulted_boundary() {
        let mut fixture = Fixture::new(false);
        fixture.boundary.update_props(fixture.table.sort_state());
        fixture
            .boundary
            .render(|| Err::<(), _>(Fault::error("bad cell")));
        assert!(fixture.boundary.is_faulted());

        let mut session = fixture.session();
        session.apply(Command::Sort(3));
        assert!(!fixture.boundary.is_faulted());
    }

    #[test]
    fn test_screen_shows_progress_then_status() {
        let mut fixture = Fixture::new(false);
        let session = fixture.session();
        let retrying = RetryState {
            is_retrying: true,
            retry_count: 2,
            last_error: Some("brand service unavailable".to_string()),
            can_retry: true,
        };
        let text = screen(&session, Some(&retrying));
        assert!(text.contains("Attempt 2 failed (brand service unavailable), retrying..."));
        assert!(text.ends_with(HELP));

        session.set_status("Opened Contoso");
        let text = screen(&session, None);
        assert!(text.contains("Opened Contoso"));
    }

    #[test]
    fn test_failed_load_reports_and_shows_empty_table() {
        let status = Status::default();
        let mut table = dashboard::build_table(false, &status);
        let boundary = ErrorBoundary::new(BoundaryConfig::default());
        let handler = ErrorHandler::new(ErrorHandlerConfig::default().log_errors(false));
        let mut session = Session {
            table: &mut table,
            boundary: &boundary,
            handler: &handler,
            status: &status,
            redraw: Arc::new(Notify::new()),
        };

        session.finish_load(Err(RetryError::Exhausted {
            attempts: 3,
            error: Error::transient("brand service unavailable"),
        }));
        assert!(screen(&session, None).starts_with("No brands tracked yet"));
        assert_eq!(handler.error_count(), 1);
        assert_eq!(handler.last_error().and_then(|e| e.context).as_deref(), Some("load"));
    }
}
