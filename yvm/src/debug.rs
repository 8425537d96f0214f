//! Human-readable VM state dumps

use colored::*;

use crate::constants::DEBUG_MEMORY_BYTES_PER_LINE;
use crate::trace::Snapshot;
use crate::vm::{Register, Registers};

/// `[V] a:0x.. b:0x.. ... f:0x..`
pub fn format_registers(registers: &Registers) -> String {
    let mut out = "[V]".bright_cyan().bold().to_string();
    for reg in Register::ALL {
        let value = registers.get(reg);
        let formatted = format!("{}:{:#04x}", reg.name(), value);
        // Color non-zero values
        let painted = if value != 0 { formatted.bright_white() } else { formatted.bright_black() };
        out.push(' ');
        out.push_str(&painted.to_string());
    }
    out
}

/// Hex dump with an offset column and ASCII gutter, 16 bytes per line
pub fn hexdump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(DEBUG_MEMORY_BYTES_PER_LINE).enumerate() {
        let offset = row * DEBUG_MEMORY_BYTES_PER_LINE;
        out.push_str(&format!("{offset:08x}").bright_black().to_string());
        out.push_str("  ");

        for col in 0..DEBUG_MEMORY_BYTES_PER_LINE {
            match chunk.get(col) {
                Some(byte) => out.push_str(&format!("{byte:02x} ")),
                None => out.push_str("   "),
            }
            if col == DEBUG_MEMORY_BYTES_PER_LINE / 2 - 1 {
                out.push(' ');
            }
        }

        out.push_str(" |");
        for &byte in chunk {
            out.push(if byte.is_ascii_graphic() || byte == b' ' { byte as char } else { '.' });
        }
        out.push_str("|\n");
    }
    out
}

pub fn format_dump(snapshot: &Snapshot) -> String {
    format!("{}\n{}", format_registers(&snapshot.registers), hexdump(&snapshot.memory))
}
