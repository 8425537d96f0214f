use crate::constants::*;

/// Named 8-bit registers of the yan85 machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    A,
    B,
    C,
    D,
    S, // Stack pointer
    I, // Instruction pointer
    F, // Flags
}

impl Register {
    pub const ALL: [Register; 7] = [
        Register::A,
        Register::B,
        Register::C,
        Register::D,
        Register::S,
        Register::I,
        Register::F,
    ];

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            REG_A => Some(Register::A),
            REG_B => Some(Register::B),
            REG_C => Some(Register::C),
            REG_D => Some(Register::D),
            REG_S => Some(Register::S),
            REG_I => Some(Register::I),
            REG_F => Some(Register::F),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Register::A => REG_A,
            Register::B => REG_B,
            Register::C => REG_C,
            Register::D => REG_D,
            Register::S => REG_S,
            Register::I => REG_I,
            Register::F => REG_F,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::A => "a",
            Register::B => "b",
            Register::C => "c",
            Register::D => "d",
            Register::S => "s",
            Register::I => "i",
            Register::F => "f",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Result of resolving an operand byte to a register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Reg(Register),
    /// Operand names no register: reads as 0, writes are dropped
    Discard,
}

impl Operand {
    pub fn resolve(byte: u8) -> Self {
        Register::from_byte(byte).map_or(Operand::Discard, Operand::Reg)
    }

    pub fn name(self) -> &'static str {
        match self {
            Operand::Reg(reg) => reg.name(),
            Operand::Discard => "NONE",
        }
    }
}

/// The register file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Registers {
    values: [u8; 7],
}

impl Registers {
    pub fn get(&self, reg: Register) -> u8 {
        self.values[reg.index()]
    }

    pub fn set(&mut self, reg: Register, value: u8) {
        self.values[reg.index()] = value;
    }

    pub fn read(&self, operand: Operand) -> u8 {
        match operand {
            Operand::Reg(reg) => self.get(reg),
            Operand::Discard => 0,
        }
    }

    pub fn write(&mut self, operand: Operand, value: u8) {
        if let Operand::Reg(reg) = operand {
            self.set(reg, value);
        }
    }

    /// Values in A, B, C, D, S, I, F order
    pub fn values(&self) -> [u8; 7] {
        self.values
    }
}
