pub mod builder;
pub mod constants;
pub mod debug;
pub mod disasm;
pub mod error;
pub mod host;
pub mod trace;
pub mod vm;

// Re-export commonly used types
pub use error::VmError;
pub use host::{HostIo, MemoryHost, OsHost};
pub use trace::{LogSink, NullSink, RecordingSink, Snapshot, TraceCause, TraceEvent, TraceSink};
pub use vm::{decode, encode, Instr, Operand, Register, Registers, VMState, VM};
