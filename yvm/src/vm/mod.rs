//! VM module - the yan85 fetch-decode-execute machine

mod execution;
mod instruction;
mod register;
mod state;
mod syscall;

pub use instruction::{decode, encode, Instr};
pub use register::{Operand, Register, Registers};
pub use state::VMState;

use log::{info, trace};

use crate::constants::*;
use crate::disasm;
use crate::error::VmError;
use crate::host::{HostIo, OsHost};
use crate::trace::{LogSink, Snapshot, TraceCause, TraceEvent, TraceSink};

/// The yan85 Virtual Machine
pub struct VM<H: HostIo = OsHost, S: TraceSink = LogSink> {
    // Decoded view of code[..code_len]
    pub instructions: Vec<Instr>,

    // Raw bytecode; read_code may write more into it
    pub code: [u8; CODE_SIZE],
    code_len: usize,

    pub memory: [u8; MEMORY_SIZE],

    pub registers: Registers,

    pub state: VMState,

    pub host: H,
    pub sink: S,
}

impl<H: HostIo, S: TraceSink> VM<H, S> {
    pub fn new(host: H, sink: S) -> Self {
        VM {
            instructions: Vec::new(),
            code: [0; CODE_SIZE],
            code_len: 0,
            memory: [0; MEMORY_SIZE],
            registers: Registers::default(),
            state: VMState::Running,
            host,
            sink,
        }
    }

    /// Copy raw bytecode into the code region and decode it
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), VmError> {
        if program.len() > CODE_SIZE {
            return Err(VmError::ProgramTooLarge {
                size: program.len(),
                max: CODE_SIZE,
            });
        }

        self.code = [0; CODE_SIZE];
        self.code[..program.len()].copy_from_slice(program);
        self.code_len = program.len();
        self.instructions = decode(&self.code[..self.code_len]);
        Ok(())
    }

    /// Number of valid bytes in the code region
    pub fn code_len(&self) -> usize {
        self.code_len
    }

    /// Extend the loaded code to at least `end` bytes and re-decode. Any
    /// zeroed gap below `end` counts as loaded.
    pub(super) fn extend_code(&mut self, end: usize) {
        let end = end.min(CODE_SIZE);
        if end > self.code_len {
            self.code_len = end;
        }
        self.instructions = decode(&self.code[..self.code_len]);
    }

    pub fn step(&mut self) -> Result<(), VmError> {
        if let VMState::Exited(_) = self.state {
            return Ok(());
        }

        let ip = self.registers.get(Register::I);
        let instr = self
            .instructions
            .get(ip as usize)
            .copied()
            .ok_or(VmError::IpOutOfBounds {
                ip,
                len: self.instructions.len(),
            })?;

        self.registers.set(Register::I, ip.wrapping_add(1));

        trace!("[{ip:#04x}] {}", disasm::format_instruction(&instr));

        self.execute_instruction(instr)
    }

    /// Run until the program exits, returning its exit code
    pub fn run(&mut self) -> Result<u8, VmError> {
        info!("yan85 VM start, {} instructions loaded", self.instructions.len());
        loop {
            if let VMState::Exited(code) = self.state {
                return Ok(code);
            }
            self.step()?;
        }
    }

    pub fn current_instruction(&self) -> Option<Instr> {
        let ip = self.registers.get(Register::I);
        self.instructions.get(ip as usize).copied()
    }

    pub fn flags(&self) -> u8 {
        self.registers.get(Register::F)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            registers: self.registers,
            memory: self.memory,
        }
    }

    fn emit(&mut self, cause: TraceCause) {
        let event = TraceEvent {
            cause,
            snapshot: self.snapshot(),
        };
        self.sink.emit(event);
    }
}
