use std::io::{self, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::prelude::*;

use newspalette::app::App;
use newspalette::config::Config;
use newspalette::error::Result;
use newspalette::tui::{draw, handle_key_event};

type Tui = Terminal<CrosstermBackend<Stdout>>;

const TICK: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    // Warnings and errors only unless RUST_LOG says otherwise
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = Config::load()?;
    config.validate()?;

    let mut app = App::new(&config).await?;

    let mut terminal = enter_terminal()?;
    let result = run(&mut terminal, &mut app).await;
    leave_terminal(&mut terminal)?;

    if let Err(e) = result {
        tracing::error!(error = %e, "NewsPalette exited with an error");
        eprintln!("Error: {e}");
    }

    Ok(())
}

fn enter_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn leave_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run(terminal: &mut Tui, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;
        app.tick_spinner();

        // Background feed fetches land here
        app.poll_feed_results().await?;

        if !event::poll(TICK)? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if let Some(action) = handle_key_event(key, app.input_mode()) {
            app.clear_status();
            if app.handle_action(action).await? {
                return Ok(());
            }
        }
    }
}
