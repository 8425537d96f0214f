//! Fatal VM conditions
//!
//! None of these are recoverable: the binary reports them and terminates
//! the process with a non-zero status.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VmError {
    #[error("program is {size} bytes, code region holds at most {max}")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("instruction pointer out of bounds: {ip:#04x} >= {len} instructions")]
    IpOutOfBounds { ip: u8, len: usize },

    #[error("SYS open '{path}' failed: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("SYS read_code from fd {fd} failed: {source}")]
    ReadCode {
        fd: u8,
        #[source]
        source: io::Error,
    },

    #[error("SYS read_memory from fd {fd} failed: {source}")]
    ReadMemory {
        fd: u8,
        #[source]
        source: io::Error,
    },

    #[error("SYS write to fd {fd} failed: {source}")]
    Write {
        fd: u8,
        #[source]
        source: io::Error,
    },
}
