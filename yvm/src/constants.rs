//! Central encoding constants for the yan85 VM

// Register ids (operand bytes that name a real register)
pub const REG_A: u8 = 0x01;
pub const REG_B: u8 = 0x02;
pub const REG_C: u8 = 0x03;
pub const REG_D: u8 = 0x04;
pub const REG_S: u8 = 0x05; // Stack pointer
pub const REG_I: u8 = 0x06; // Instruction pointer
pub const REG_F: u8 = 0x07; // Flags

// Opcodes
pub const OP_IMM: u8 = 0x08;
pub const OP_ADD: u8 = 0x09;
pub const OP_STK: u8 = 0x0A;
pub const OP_STM: u8 = 0x0B;
pub const OP_LDM: u8 = 0x0C;
pub const OP_CMP: u8 = 0x0D;
pub const OP_JMP: u8 = 0x0E;
pub const OP_SYS: u8 = 0x0F;

// Syscall bits, executed in this order when several are set
pub const SYS_OPEN: u8 = 0x01;
pub const SYS_READ_CODE: u8 = 0x02;
pub const SYS_READ_MEMORY: u8 = 0x04;
pub const SYS_WRITE: u8 = 0x08;
pub const SYS_SLEEP: u8 = 0x10;
pub const SYS_EXIT: u8 = 0x20;

// Flag bits produced by CMP
pub const FLAG_L: u8 = 0x01;
pub const FLAG_G: u8 = 0x02;
pub const FLAG_E: u8 = 0x04;
pub const FLAG_N: u8 = 0x08;
pub const FLAG_Z: u8 = 0x10;

// Instruction encoding
pub const INSTRUCTION_SIZE: usize = 3; // Bytes per instruction

// Memory layout
pub const MEMORY_SIZE: usize = 0x100;
pub const MAX_INSTRUCTIONS: usize = 0x100; // Addressable by the 8-bit instruction pointer
pub const CODE_SIZE: usize = INSTRUCTION_SIZE * MAX_INSTRUCTIONS;

// Host descriptors
pub const FD_STDIN: u8 = 0;
pub const FD_STDOUT: u8 = 1;
pub const FD_STDERR: u8 = 2;

// Debug output configuration
pub const DEBUG_MEMORY_BYTES_PER_LINE: usize = 16;
