use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cppgraph_index::config::{ENV_COMPILE_DB, ENV_LOG_LEVEL};
use cppgraph_index::{exit_code, run_indexer, IndexerConfig};

/// Index C++ translation units into a graph database.
#[derive(Parser, Debug)]
#[command(name = "indexer", version)]
struct Cli {
    /// Path to the JSON compilation database (compile_commands.json).
    compile_db: PathBuf,

    /// Directory to create the graph database in.
    #[arg(long)]
    output_db: PathBuf,

    /// Replace an existing output database.
    #[arg(long)]
    overwrite: bool,

    /// Worker threads; defaults to hardware threads minus one.
    #[arg(long)]
    threads: Option<usize>,

    /// Per-TU wall-clock budget in seconds.
    #[arg(long, default_value_t = 300)]
    tu_timeout: u64,

    /// Abort the whole run on the first TU failure.
    #[arg(long)]
    fail_fast: bool,

    /// Front-end backend to drive.
    #[arg(long, default_value = "snapshot")]
    frontend: String,
}

fn init_tracing() {
    let level = std::env::var(ENV_LOG_LEVEL).unwrap_or_else(|_| "info".to_owned());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let compile_db = std::env::var(ENV_COMPILE_DB)
        .map(PathBuf::from)
        .unwrap_or(cli.compile_db);

    let config = IndexerConfig {
        compile_db,
        output_db: cli.output_db,
        overwrite: cli.overwrite,
        threads: cli.threads,
        tu_timeout: Duration::from_secs(cli.tu_timeout),
        fail_fast: cli.fail_fast,
        frontend: cli.frontend,
    };

    match run_indexer(&config) {
        Ok(summary) => {
            println!("{}", summary.line());
            if summary.failed > 0 {
                ExitCode::from(5)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("indexer: {e}");
            ExitCode::from(exit_code(&e) as u8)
        }
    }
}
