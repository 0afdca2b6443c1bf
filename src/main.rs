use std::io::{self, Stdout};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use goldspinner::app::{App, LedgerCmd, LedgerReply};
use goldspinner::ledger::{LedgerClient, LedgerConfig, LedgerError};
use goldspinner::ui::draw;

enum Event<I> {
    Input(I),
    Tick,
    Ledger(LedgerReply),
}

fn main() -> Result<()> {
    // A missing ledger disables saving but never blocks the session.
    let (client, ledger_error) =
        match LedgerConfig::from_env().and_then(|config| LedgerClient::connect(&config)) {
            Ok(client) => (Some(client), None),
            Err(err) => (None, Some(err.to_string())),
        };

    let (tx, rx) = mpsc::channel();
    let ledger_tx = spawn_ledger_worker(client, tx.clone());
    let mut app = App::new(ledger_tx, ledger_error);

    let mut terminal = setup_terminal()?;
    let res = run_app(&mut terminal, &mut app, tx, rx);
    restore_terminal(&mut terminal)?;
    res
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Ledger I/O runs on its own thread so append/fetch round-trips never
/// freeze the draw loop. One attempt per command, no retries.
fn spawn_ledger_worker(
    client: Option<LedgerClient>,
    tx: mpsc::Sender<Event<KeyEvent>>,
) -> mpsc::Sender<LedgerCmd> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<LedgerCmd>();
    thread::spawn(move || {
        for cmd in cmd_rx {
            let reply = match (&client, cmd) {
                (Some(client), LedgerCmd::Refresh) => {
                    LedgerReply::Refreshed(client.fetch_aggregate())
                }
                (Some(client), LedgerCmd::Save(record)) => LedgerReply::Saved(
                    client
                        .append(&record)
                        .map(|()| client.fetch_aggregate().ok()),
                ),
                (None, LedgerCmd::Refresh) => LedgerReply::Refreshed(Err(not_configured())),
                (None, LedgerCmd::Save(_)) => LedgerReply::Saved(Err(not_configured())),
            };
            if tx.send(Event::Ledger(reply)).is_err() {
                break;
            }
        }
    });
    cmd_tx
}

fn not_configured() -> LedgerError {
    LedgerError::Config("no ledger configured".into())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    tx: mpsc::Sender<Event<KeyEvent>>,
    rx: mpsc::Receiver<Event<KeyEvent>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);

    let input_tx = tx.clone();
    thread::spawn(move || {
        loop {
            if !event::poll(Duration::from_millis(250)).unwrap_or(false) {
                continue;
            }
            match event::read() {
                Ok(CEvent::Key(key)) => {
                    if input_tx.send(Event::Input(key)).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => {}
            }
        }
    });

    thread::spawn(move || {
        loop {
            if tx.send(Event::Tick).is_err() {
                break;
            }
            thread::sleep(tick_rate);
        }
    });

    loop {
        terminal.draw(|f| draw(f, app))?;

        match rx.recv()? {
            Event::Input(key) => {
                app.on_key(key);
            }
            Event::Tick => {
                app.on_tick();
            }
            Event::Ledger(reply) => {
                app.on_ledger(reply);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
