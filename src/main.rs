//! Command-line entry point of the interpreter.

use std::path::PathBuf;
use std::{fs, io, process};

use clap::Parser;
use lolrs_lib::{execute, Config, Context};

/// A tree-walking LOLCODE interpreter.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Path of the program to run.
    file: PathBuf,
    /// Print the timings of each stage.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let input = match fs::read_to_string(&cli.file) {
        Ok(input) => input,
        Err(err) => {
            eprintln!("{}: {err}", cli.file.display());
            process::exit(1);
        }
    };

    let config = Config {
        input: &input,
        filename: cli.file.to_str(),
        verbose: cli.verbose,
    };
    let ctx = Context::new(config);

    let stdin = io::stdin();
    match execute(&ctx, &mut stdin.lock()) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            ctx.reporter.report(&err);
            if ctx.reporter.display().is_err() {
                eprintln!("{err}");
            }
            process::exit(1);
        }
    }
}
