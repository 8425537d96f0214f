//! Text rendering of yan85 instructions

use crate::constants::*;
use crate::vm::{Instr, Operand};

/// Letters for each flag bit set, `*` when none are
pub fn describe_flags(flags: u8) -> String {
    let mut desc: String = [(FLAG_L, 'L'), (FLAG_G, 'G'), (FLAG_E, 'E'), (FLAG_N, 'N'), (FLAG_Z, 'Z')]
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|&(_, letter)| letter)
        .collect();
    if flags == 0 {
        desc.push('*');
    }
    desc
}

/// Syscall names joined by `|`, in execution order
pub fn describe_syscalls(mask: u8) -> String {
    let names: Vec<&str> = [
        (SYS_OPEN, "open"),
        (SYS_READ_CODE, "read_code"),
        (SYS_READ_MEMORY, "read_memory"),
        (SYS_WRITE, "write"),
        (SYS_SLEEP, "sleep"),
        (SYS_EXIT, "exit"),
    ]
    .iter()
    .filter(|(bit, _)| mask & bit != 0)
    .map(|&(_, name)| name)
    .collect();

    if names.is_empty() {
        "none".to_string()
    } else {
        names.join("|")
    }
}

pub fn opcode_name(opcode: u8) -> &'static str {
    match opcode {
        OP_IMM => "IMM",
        OP_ADD => "ADD",
        OP_STK => "STK",
        OP_STM => "STM",
        OP_LDM => "LDM",
        OP_CMP => "CMP",
        OP_JMP => "JMP",
        OP_SYS => "SYS",
        _ => "???",
    }
}

pub fn format_instruction(instr: &Instr) -> String {
    let op = opcode_name(instr.opcode);
    let r1 = Operand::resolve(instr.arg1);
    let r2 = Operand::resolve(instr.arg2);

    match instr.opcode {
        OP_IMM => format!("{op} {} = {:#04x}", r1.name(), instr.arg2),
        OP_ADD | OP_CMP => format!("{op} {} {}", r1.name(), r2.name()),
        OP_STK => {
            let mut parts = vec![op.to_string()];
            if let Operand::Reg(reg) = r2 {
                parts.push(format!("push {}", reg.name()));
            }
            if let Operand::Reg(reg) = r1 {
                parts.push(format!("pop {}", reg.name()));
            }
            parts.join(" ")
        }
        OP_STM => format!("{op} *{} = {}", r1.name(), r2.name()),
        OP_LDM => format!("{op} {} = *{}", r1.name(), r2.name()),
        OP_JMP => format!("{op} {} {}", describe_flags(instr.arg1), r2.name()),
        OP_SYS => match r2 {
            Operand::Reg(reg) => format!("{op} {} -> {}", describe_syscalls(instr.arg1), reg.name()),
            Operand::Discard => format!("{op} {}", describe_syscalls(instr.arg1)),
        },
        _ => format!("{op} {:#04x} {:#04x} {:#04x}", instr.opcode, instr.arg1, instr.arg2),
    }
}

/// One line per instruction, prefixed with its index
pub fn disassemble(instructions: &[Instr]) -> String {
    instructions
        .iter()
        .enumerate()
        .map(|(idx, instr)| format!("[{idx:#04x}] {}\n", format_instruction(instr)))
        .collect()
}
