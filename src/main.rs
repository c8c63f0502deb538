//! lfsgate binary entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    match lfsgate::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            lfsgate::ui::output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
