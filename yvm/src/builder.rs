//! Canonical yan85 programs, built as instruction sequences

use crate::constants::*;
use crate::vm::Instr;

/// Program that prints the file at `path` to stdout and exits with 0.
///
/// The NUL-terminated path is stored one byte at a time at `addr`, opened,
/// and up to 255 bytes are read back over it. The byte count returned by
/// the read becomes the write length, so exactly what was read is written.
pub fn cat_file(path: &str, addr: u8) -> Vec<Instr> {
    let mut program = vec![
        Instr::new(OP_IMM, REG_C, 1),
        Instr::new(OP_IMM, REG_B, addr),
    ];

    for byte in path.bytes().chain(std::iter::once(0)) {
        program.push(Instr::new(OP_IMM, REG_A, byte));
        program.push(Instr::new(OP_STM, REG_B, REG_A));
        program.push(Instr::new(OP_ADD, REG_B, REG_C));
    }

    program.extend([
        // fd = open(addr)
        Instr::new(OP_IMM, REG_A, addr),
        Instr::new(OP_SYS, SYS_OPEN, REG_A),
        // C = read(fd, addr, 255)
        Instr::new(OP_IMM, REG_B, addr),
        Instr::new(OP_IMM, REG_C, 255),
        Instr::new(OP_SYS, SYS_READ_MEMORY, REG_C),
        // write(stdout, addr, C)
        Instr::new(OP_IMM, REG_A, FD_STDOUT),
        Instr::new(OP_IMM, REG_B, addr),
        Instr::new(OP_SYS, SYS_WRITE, REG_D),
        // exit(0)
        Instr::new(OP_IMM, REG_A, 0),
        Instr::new(OP_SYS, SYS_EXIT, 0),
    ]);
    program
}
