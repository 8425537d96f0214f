//! Trace events raised by CMP and SYS, and the sinks that consume them

use log::{debug, log_enabled, Level};

use crate::constants::MEMORY_SIZE;
use crate::debug;
use crate::disasm::{describe_flags, describe_syscalls};
use crate::vm::{Operand, Registers};

/// Full machine state at the moment an event was raised
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub registers: Registers,
    pub memory: [u8; MEMORY_SIZE],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceCause {
    Compare { lhs: u8, rhs: u8, flags: u8 },
    Syscall { mask: u8, ret: Operand },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub cause: TraceCause,
    pub snapshot: Snapshot,
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

/// Renders every event through the `log` facade at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn emit(&mut self, event: TraceEvent) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        debug!("{}", debug::format_dump(&event.snapshot));
        match event.cause {
            TraceCause::Compare { flags, .. } => {
                debug!("CMP flags: {}", describe_flags(flags));
            }
            TraceCause::Syscall { mask, ret } => {
                if let Operand::Reg(reg) = ret {
                    debug!(
                        "SYS {} returned {:#04x} in register {}",
                        describe_syscalls(mask),
                        event.snapshot.registers.get(reg),
                        reg.name()
                    );
                }
            }
        }
    }
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

/// Keeps every event for later inspection
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<TraceEvent>,
}

impl TraceSink for RecordingSink {
    fn emit(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}
