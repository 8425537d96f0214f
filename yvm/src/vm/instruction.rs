use crate::constants::INSTRUCTION_SIZE;

/// Instruction representation for the yan85 VM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Instr {
    pub opcode: u8,
    pub arg1: u8,
    pub arg2: u8,
}

impl Instr {
    pub fn new(opcode: u8, arg1: u8, arg2: u8) -> Self {
        Self { opcode, arg1, arg2 }
    }

    pub fn to_bytes(self) -> [u8; INSTRUCTION_SIZE] {
        [self.opcode, self.arg1, self.arg2]
    }
}

/// Split raw bytecode into instructions. A trailing partial instruction
/// (1 or 2 bytes) is dropped.
pub fn decode(bytes: &[u8]) -> Vec<Instr> {
    bytes
        .chunks_exact(INSTRUCTION_SIZE)
        .map(|chunk| Instr::new(chunk[0], chunk[1], chunk[2]))
        .collect()
}

/// Concatenate instructions back into raw bytecode.
pub fn encode(instructions: &[Instr]) -> Vec<u8> {
    instructions.iter().flat_map(|instr| instr.to_bytes()).collect()
}
