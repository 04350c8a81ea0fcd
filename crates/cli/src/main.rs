use std::process::ExitCode;

fn main() -> ExitCode {
    vestia_cli::run()
}
