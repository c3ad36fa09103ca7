mod commands;
mod terminal;

use std::process::ExitCode;

use commands::CommandLine;
use terminal::{logging, print};
use tracing::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    if commands.no_color {
        colored::control::set_override(false);
    }

    let log_file = (!commands.no_log_file).then_some(commands.log_file.as_path());
    if let Err(e) = logging::init_logging(log_file) {
        warn!("Could not open log file {}: {e}", commands.log_file.display());
    }

    print::banner(commands.quiet);

    match commands::scan::scan(&commands).await {
        Ok(()) => {
            print::end_of_program();
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
