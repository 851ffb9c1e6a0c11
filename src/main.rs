// Stepwise: Step-by-Step Data Structure and Algorithm Visualizer

use std::env;
use std::io;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

use stepwise::config::{self, Config, LOG_ENV};
use stepwise::scenario;
use stepwise::ui::App;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let program_name = env::args().next().unwrap_or_else(|| "stepwise".to_string());

    let config = match Config::from_args(env::args().skip(1)) {
        Ok(Some(config)) => config,
        Ok(None) => {
            eprint!("{}", config::usage(&program_name));
            return Ok(());
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            eprint!("{}", config::usage(&program_name));
            std::process::exit(1);
        }
    };

    // --log wins over the environment
    let filter = match &config.log {
        Some(directives) => EnvFilter::try_new(directives)?,
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    eprintln!("Recording {}...", config.scenario);
    let script = match scenario::build(&config) {
        Ok(script) => script,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    eprintln!(
        "Recorded {} operations, {} frames.",
        script.operations.len(),
        script.total_frames()
    );
    for reason in &script.refused {
        eprintln!("Refused {}", reason);
    }

    if config.json {
        println!("{}", script.to_json()?);
        return Ok(());
    }

    let mut app = match App::new(script, config.interval) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Nothing to play: {}", e);
            std::process::exit(1);
        }
    };

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
