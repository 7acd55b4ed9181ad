use std::process::ExitCode;

fn main() -> ExitCode {
    pricecompare_cli::run()
}
