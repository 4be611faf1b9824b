// The binary uses the library, not duplicate modules
use std::process::ExitCode;
use trip_stats::{Settings, run, setup_logging};

fn main() -> ExitCode {
    setup_logging();
    let settings = Settings::from_cli();

    let stdout = std::io::stdout();
    match run(&settings, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
