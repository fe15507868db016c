use clap::Parser;
use sortdir::cli::{Cli, run};
use sortdir::output::OutputFormatter;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        OutputFormatter::error(&e);
        std::process::exit(1);
    }
}
