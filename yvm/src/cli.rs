use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "yvm",
    about = "yan85 Virtual Machine - Run yan85 bytecode programs",
    long_about = "The yan85 Virtual Machine executes 3-byte-per-instruction bytecode against a\n\
                  small register/memory machine, bridging its syscalls to host file I/O.\n\
                  State dumps are logged on every CMP and SYS with -v.",
    version,
    author
)]
pub struct Cli {
    /// Bytecode file to execute
    #[arg(value_name = "FILE", required_unless_present = "file", conflicts_with = "file")]
    pub program: Option<PathBuf>,

    /// Bytecode file to execute (same as the positional argument)
    #[arg(short = 'f', long)]
    pub file: Option<PathBuf>,

    /// Print a disassembly of the program and exit
    #[arg(short = 'd', long)]
    pub disasm: bool,

    /// Log state dumps (-v) or every executed instruction (-vv)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored diagnostics
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn program_path(&self) -> Option<&Path> {
        self.program.as_deref().or(self.file.as_deref())
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
