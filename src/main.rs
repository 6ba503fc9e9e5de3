use clap::Parser;
use std::process;
use tcad_reader::cli::{Args, commands};

fn main() {
    let args = Args::parse();

    if let Err(error) = commands::run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}
