use clap::Parser;
use quantsig::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
