use std::collections::HashMap;
use std::io::{self, Cursor, Read};

use super::{bad_fd, HostIo, FIRST_FILE_FD};
use crate::constants::{FD_STDERR, FD_STDIN, FD_STDOUT};

/// In-memory host with no file-system or process side effects.
/// Virtual files are registered up front; output, sleeps and the exit
/// request are recorded for inspection.
#[derive(Debug)]
pub struct MemoryHost {
    files: HashMap<Vec<u8>, Vec<u8>>,
    open: HashMap<u8, Cursor<Vec<u8>>>,
    stdin: Cursor<Vec<u8>>,
    fail_writes: bool,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub sleeps: Vec<u8>,
    pub exit_code: Option<u8>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            open: HashMap::new(),
            stdin: Cursor::new(Vec::new()),
            fail_writes: false,
            stdout: Vec::new(),
            stderr: Vec::new(),
            sleeps: Vec::new(),
            exit_code: None,
        }
    }

    pub fn with_file(mut self, path: impl Into<Vec<u8>>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }

    pub fn with_stdin(mut self, input: impl Into<Vec<u8>>) -> Self {
        self.stdin = Cursor::new(input.into());
        self
    }

    /// Make every write fail, to exercise the fatal error path
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn open_descriptors(&self) -> usize {
        self.open.len()
    }
}

impl HostIo for MemoryHost {
    fn open(&mut self, path: &[u8]) -> io::Result<u8> {
        let contents = self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such file: {}", String::from_utf8_lossy(path)),
            )
        })?;
        let fd = (FIRST_FILE_FD..=u8::MAX)
            .find(|fd| !self.open.contains_key(fd))
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "too many open files"))?;
        self.open.insert(fd, Cursor::new(contents));
        Ok(fd)
    }

    fn read(&mut self, fd: u8, buf: &mut [u8]) -> io::Result<usize> {
        match fd {
            FD_STDIN => self.stdin.read(buf),
            _ => self.open.get_mut(&fd).ok_or_else(|| bad_fd(fd))?.read(buf),
        }
    }

    fn write(&mut self, fd: u8, buf: &[u8]) -> io::Result<usize> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write refused"));
        }
        match fd {
            FD_STDOUT => self.stdout.extend_from_slice(buf),
            FD_STDERR => self.stderr.extend_from_slice(buf),
            _ => return Err(bad_fd(fd)),
        }
        Ok(buf.len())
    }

    fn sleep(&mut self, seconds: u8) {
        self.sleeps.push(seconds);
    }

    fn exit(&mut self, code: u8) {
        self.exit_code = Some(code);
    }
}
