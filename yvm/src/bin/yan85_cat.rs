use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use yvm::constants::{CODE_SIZE, INSTRUCTION_SIZE};
use yvm::{builder, encode};

#[derive(Parser, Debug)]
#[command(name = "yan85-cat", version, about = "Generate a yan85 program that prints a file")]
struct Args {
    /// File the generated program will print
    target: String,

    /// Scratch memory address for the path and the file contents
    #[arg(short, long, default_value_t = 0)]
    addr: u8,

    /// Output bytecode file
    #[arg(short, long)]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    if args.verbose {
        env_logger::init();
    }

    let program = encode(&builder::cat_file(&args.target, args.addr));
    if program.len() > CODE_SIZE {
        eprintln!(
            "Error: generated program is {} bytes, code region holds at most {}",
            program.len(),
            CODE_SIZE
        );
        process::exit(1);
    }

    if let Err(e) = fs::write(&args.output, &program) {
        eprintln!("Error writing '{}': {}", args.output.display(), e);
        process::exit(1);
    }

    info!(
        "wrote {} instructions to {}",
        program.len() / INSTRUCTION_SIZE,
        args.output.display()
    );
}
