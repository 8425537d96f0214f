use log::trace;

use super::{Operand, Register, VM};
use super::instruction::Instr;
use crate::constants::*;
use crate::error::VmError;
use crate::host::HostIo;
use crate::trace::{TraceCause, TraceSink};

impl<H: HostIo, S: TraceSink> VM<H, S> {
    pub(super) fn execute_instruction(&mut self, instr: Instr) -> Result<(), VmError> {
        match instr.opcode {
            OP_IMM => self.interpret_imm(instr),
            OP_ADD => self.interpret_add(instr),
            OP_STK => self.interpret_stk(instr),
            OP_STM => self.interpret_stm(instr),
            OP_LDM => self.interpret_ldm(instr),
            OP_CMP => self.interpret_cmp(instr),
            OP_JMP => self.interpret_jmp(instr),
            OP_SYS => self.interpret_sys(instr)?,
            _ => trace!("ignoring unknown opcode {:#04x}", instr.opcode),
        }
        Ok(())
    }

    // reg1 = imm
    fn interpret_imm(&mut self, instr: Instr) {
        self.registers.write(Operand::resolve(instr.arg1), instr.arg2);
    }

    // reg1 += reg2
    fn interpret_add(&mut self, instr: Instr) {
        let dst = Operand::resolve(instr.arg1);
        let src = Operand::resolve(instr.arg2);
        let sum = self.registers.read(dst).wrapping_add(self.registers.read(src));
        self.registers.write(dst, sum);
    }

    // push reg2, then pop reg1
    fn interpret_stk(&mut self, instr: Instr) {
        if let Operand::Reg(reg) = Operand::resolve(instr.arg2) {
            let sp = self.registers.get(Register::S).wrapping_add(1);
            self.registers.set(Register::S, sp);
            self.memory[sp as usize] = self.registers.get(reg);
        }
        if let Operand::Reg(reg) = Operand::resolve(instr.arg1) {
            let value = self.memory[self.registers.get(Register::S) as usize];
            self.registers.set(reg, value);
            let sp = self.registers.get(Register::S).wrapping_sub(1);
            self.registers.set(Register::S, sp);
        }
    }

    // *reg1 = reg2
    fn interpret_stm(&mut self, instr: Instr) {
        let addr = self.registers.read(Operand::resolve(instr.arg1));
        self.memory[addr as usize] = self.registers.read(Operand::resolve(instr.arg2));
    }

    // reg1 = *reg2
    fn interpret_ldm(&mut self, instr: Instr) {
        let addr = self.registers.read(Operand::resolve(instr.arg2));
        let value = self.memory[addr as usize];
        self.registers.write(Operand::resolve(instr.arg1), value);
    }

    fn interpret_cmp(&mut self, instr: Instr) {
        let lhs = self.registers.read(Operand::resolve(instr.arg1));
        let rhs = self.registers.read(Operand::resolve(instr.arg2));
        let flags = compare_flags(lhs, rhs);
        self.registers.set(Register::F, flags);
        self.emit(TraceCause::Compare { lhs, rhs, flags });
    }

    // Flag mask 0 jumps unconditionally
    fn interpret_jmp(&mut self, instr: Instr) {
        let mask = instr.arg1;
        let target = self.registers.read(Operand::resolve(instr.arg2));
        if mask == 0 || self.flags() & mask != 0 {
            trace!("JMP taken to {target:#04x}");
            self.registers.set(Register::I, target);
        } else {
            trace!("JMP not taken");
        }
    }
}

/// Flags for `lhs` compared with `rhs`, computed from scratch
pub fn compare_flags(lhs: u8, rhs: u8) -> u8 {
    let mut flags = 0;
    if lhs < rhs {
        flags |= FLAG_L;
    }
    if lhs > rhs {
        flags |= FLAG_G;
    }
    if lhs == rhs {
        flags |= FLAG_E;
    } else {
        flags |= FLAG_N;
    }
    if lhs == 0 && rhs == 0 {
        flags |= FLAG_Z;
    }
    flags
}
