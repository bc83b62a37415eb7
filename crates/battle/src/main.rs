mod app;

use std::process::ExitCode;

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match app::bootstrap::build_app(&args) {
        Ok(app) => app::runner::run(app),
        Err(message) => {
            eprintln!("{message}");
            ExitCode::from(2)
        }
    }
}
