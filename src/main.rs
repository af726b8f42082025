mod app;
mod codec;
mod error;
mod invert;
mod paths;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use clap::Parser;
use log::{error, LevelFilter};

use app::{App, AppConfig};

#[derive(Parser)]
#[command(
    name = "imginvert",
    about = "Invert the colors of every JPEG/PNG under a directory",
    version
)]
struct Cli {
    /// Directory to scan; results go to <DIR>/inverted
    dir: Option<PathBuf>,

    /// Log every directory visited
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    const fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Warn
        } else {
            LevelFilter::Info
        }
    }
}

fn init_logger(level: LevelFilter) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level.as_str()))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(buf, "{style}{}{style:#} {}", record.level(), record.args())
        })
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let Some(root) = cli.dir.clone() else {
        eprintln!("imginvert - invert JPEG/PNG colors in a directory tree\n");
        eprintln!("Usage: imginvert <Directory_Name>\n");
        eprintln!("Run 'imginvert --help' for more options.");
        return ExitCode::FAILURE;
    };

    init_logger(cli.log_level());

    let result = App::new(&AppConfig { root }).and_then(|app| app.run());

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
