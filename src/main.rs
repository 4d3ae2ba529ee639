use clap::Parser;
use hurdat_analyzer::cli::{self, Args};
use std::process;

fn main() {
    let args = Args::parse();

    if let Err(error) = cli::setup_logging(&args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }

    match cli::run(&args) {
        Ok(_stats) => {
            // Success - the report has already been written by the sink
            process::exit(0);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
