//! Host I/O bridge: the capabilities the SYS instruction may reach

mod memory;

pub use memory::MemoryHost;

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use log::warn;

use crate::constants::{FD_STDERR, FD_STDIN, FD_STDOUT};

/// Host operations reachable from yan85 syscalls. Descriptors are the
/// 8-bit values a program keeps in its registers.
pub trait HostIo {
    /// Open `path` read-only and return its descriptor
    fn open(&mut self, path: &[u8]) -> io::Result<u8>;
    fn read(&mut self, fd: u8, buf: &mut [u8]) -> io::Result<usize>;
    fn write(&mut self, fd: u8, buf: &[u8]) -> io::Result<usize>;
    fn sleep(&mut self, seconds: u8);
    /// Called once when the program requests exit, before the VM stops
    fn exit(&mut self, code: u8);
}

pub(crate) fn bad_fd(fd: u8) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("bad file descriptor {fd}"))
}

/// First descriptor handed out by `open`
pub(crate) const FIRST_FILE_FD: u8 = 3;

/// The real host: files on disk, process stdin/stdout/stderr and wall-clock sleep
pub struct OsHost<W: Write = io::Stdout> {
    stdout: W,
    files: HashMap<u8, File>,
}

impl OsHost {
    pub fn new() -> Self {
        Self::with_stdout(io::stdout())
    }
}

impl Default for OsHost {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> OsHost<W> {
    /// Route descriptor 1 to `stdout` instead of the process stdout
    pub fn with_stdout(stdout: W) -> Self {
        Self {
            stdout,
            files: HashMap::new(),
        }
    }

    pub fn stdout(&self) -> &W {
        &self.stdout
    }

    fn allocate_fd(&self) -> io::Result<u8> {
        (FIRST_FILE_FD..=u8::MAX)
            .find(|fd| !self.files.contains_key(fd))
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "too many open files"))
    }

    fn file(&mut self, fd: u8) -> io::Result<&mut File> {
        self.files.get_mut(&fd).ok_or_else(|| bad_fd(fd))
    }
}

impl<W: Write> HostIo for OsHost<W> {
    fn open(&mut self, path: &[u8]) -> io::Result<u8> {
        let fd = self.allocate_fd()?;
        let file = File::open(path_from_bytes(path))?;
        self.files.insert(fd, file);
        Ok(fd)
    }

    fn read(&mut self, fd: u8, buf: &mut [u8]) -> io::Result<usize> {
        match fd {
            FD_STDIN => io::stdin().read(buf),
            FD_STDOUT | FD_STDERR => Err(bad_fd(fd)),
            _ => self.file(fd)?.read(buf),
        }
    }

    fn write(&mut self, fd: u8, buf: &[u8]) -> io::Result<usize> {
        match fd {
            FD_STDOUT => {
                let n = self.stdout.write(buf)?;
                self.stdout.flush()?;
                Ok(n)
            }
            FD_STDERR => io::stderr().write(buf),
            FD_STDIN => Err(bad_fd(fd)),
            _ => self.file(fd)?.write(buf),
        }
    }

    fn sleep(&mut self, seconds: u8) {
        thread::sleep(Duration::from_secs(seconds.into()));
    }

    fn exit(&mut self, code: u8) {
        if let Err(e) = self.stdout.flush() {
            warn!("flushing stdout before exit({code}) failed: {e}");
        }
    }
}

#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;
    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}
