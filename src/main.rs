mod cli;

use anyhow::Context;
use clap::Parser;

use cli::Cli;
use everlance2mileiq::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging();

    let result = cli::convert::run(cli.file.as_deref()).context("Error Reading from file");

    if let Err(e) = result {
        // Errors go to stdout, after any rows already converted.
        println!("{e:?}");
        std::process::exit(1);
    }
}
