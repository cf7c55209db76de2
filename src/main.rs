mod engine;
mod utils;

use std::process::ExitCode;

fn main() -> ExitCode {
    utils::logger::init();

    match engine::cli::run_from_env() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("rolling-terrain failed: {err}");
            ExitCode::FAILURE
        }
    }
}
