mod cli;

use std::fs;
use std::process;

use clap::Parser;
use colored::*;
use log::LevelFilter;

use cli::Cli;
use yvm::{decode, disasm, LogSink, OsHost, VM};

fn init_logging(level: LevelFilter) {
    // RUST_LOG, when set, overrides the -v level
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.log_level());
    if cli.no_color {
        colored::control::set_override(false);
    }

    let Some(file_path) = cli.program_path() else {
        eprintln!("Error: no program file given");
        process::exit(2);
    };

    // Read the bytecode file
    let program = fs::read(file_path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", file_path.display(), e);
        process::exit(1);
    });

    if cli.disasm {
        print!("{}", disasm::disassemble(&decode(&program)));
        return;
    }

    let mut vm = VM::new(OsHost::new(), LogSink);
    if let Err(e) = vm.load_program(&program) {
        eprintln!("Error loading program: {e}");
        process::exit(1);
    }

    match vm.run() {
        Ok(code) => process::exit(code.into()),
        Err(e) => {
            eprintln!("{}: {}", "Runtime error".bright_red().bold(), e);
            process::exit(1);
        }
    }
}
