mod history_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calclog::config::Settings;
use calclog::history;
use calclog::repl;
use calclog::session::{Request, Session};

#[derive(Parser)]
#[command(
    name = "calclog",
    about = "Calculator with a persistent, timestamped history"
)]
struct Cli {
    /// History file to load and save (default: data/calc_history.txt)
    #[arg(long, global = true, env = "CALCLOG_HISTORY_FILE")]
    history_file: Option<PathBuf>,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (the default)
    Repl,
    /// Run one calculation, print it and append it to the history
    Calc {
        /// Operation code: a, s, m, d, p or r (case-insensitive)
        op: String,
        /// First operand (number to root for `r`, base for `p`)
        #[arg(allow_hyphen_values = true)]
        first: String,
        /// Second operand (root index for `r`, exponent for `p`)
        #[arg(allow_hyphen_values = true)]
        second: String,
    },
    /// Show the saved history
    History,
    /// Print the resolved history file path
    Path,
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "calclog=debug"
    } else {
        "calclog=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();
}

fn cmd_repl(settings: &Settings) -> anyhow::Result<i32> {
    let loaded = history::load(&settings.history_path);
    let mut session = Session::new(loaded, settings.root);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let outcome = repl::run(stdin.lock(), stdout.lock(), &mut session);

    // Save even if the terminal went away mid-session.
    history::save(session.history(), &settings.history_path);
    outcome?;
    println!("Goodbye!");
    Ok(0)
}

fn cmd_calc(op: &str, first: &str, second: &str, settings: &Settings) -> anyhow::Result<i32> {
    let request = Request::parse(op, first, second)?;
    let mut session = Session::new(history::load(&settings.history_path), settings.root);

    match session.perform(&request) {
        Ok(record) => println!("Result: {}", record.result),
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Ok(1);
        }
    }
    history::save(session.history(), &settings.history_path);
    Ok(0)
}

fn or_exit(result: anyhow::Result<i32>) -> i32 {
    result.unwrap_or_else(|e| {
        eprintln!("[calclog] error: {e:#}");
        1
    })
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.history_file.as_deref());
    tracing::debug!("history file: {}", settings.history_path.display());

    let exit_code = match &cli.command {
        None | Some(Commands::Repl) => or_exit(cmd_repl(&settings)),
        Some(Commands::Calc { op, first, second }) => {
            or_exit(cmd_calc(op, first, second, &settings))
        }
        Some(Commands::History) => history_cmd::cmd_history_show(&settings.history_path),
        Some(Commands::Path) => history_cmd::cmd_history_path(&settings.history_path),
    };
    std::process::exit(exit_code);
}
