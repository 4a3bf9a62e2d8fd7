use std::process::ExitCode;

fn main() -> ExitCode {
    libris_cli::run()
}
