use std::process::ExitCode;

fn main() -> ExitCode {
    match gitfleet::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            gitfleet::ui::output::error(format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
