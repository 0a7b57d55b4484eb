use anyhow::Result;
use std::env;
use std::io;
use tracing_subscriber::EnvFilter;

// Use library instead of local modules
use expense_tracker::{run_menu, Config, Invocation, MenuOptions, RecordStore, Session, USAGE, VERSION};

fn main() -> Result<()> {
    let config = match Config::from_args(env::args().skip(1))? {
        Invocation::Run(config) => config,
        Invocation::Help => {
            println!("expense-tracker {}", VERSION);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    init_tracing(config.verbose)?;

    println!("📂 Loading expenses from {}...", config.data_file.display());
    let mut session = Session::open(RecordStore::new(&config.data_file));
    match session.load_error() {
        Some(err) => {
            eprintln!("❌ {:#}", err);
            eprintln!("   The menu still runs, but nothing will be saved to this file.\n");
        }
        None => println!("✓ Loaded {} expenses\n", session.table()?.len()),
    }

    let options = MenuOptions {
        recent_limit: config.recent_limit,
        ..MenuOptions::default()
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let mut charts = chart_renderer();

    run_menu(&mut session, &mut input, &mut output, &mut charts, &options)
}

/// Logs go to stderr so they never mix with the menu on stdout
fn init_tracing(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

#[cfg(feature = "tui")]
fn chart_renderer() -> expense_tracker::TerminalCharts {
    expense_tracker::TerminalCharts::new()
}

#[cfg(not(feature = "tui"))]
fn chart_renderer() -> expense_tracker::TextCharts<io::Stdout> {
    expense_tracker::TextCharts::new(io::stdout())
}
