use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = todomark::run() {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
