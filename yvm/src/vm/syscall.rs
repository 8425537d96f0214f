use log::debug;

use super::{Operand, Register, VMState, VM};
use super::instruction::Instr;
use crate::constants::*;
use crate::error::VmError;
use crate::host::HostIo;
use crate::trace::{TraceCause, TraceSink};

/// Length that fits in Memory starting at `offset`
fn clamp_len(offset: u8, requested: u8) -> usize {
    (MEMORY_SIZE - offset as usize).min(requested as usize)
}

impl<H: HostIo, S: TraceSink> VM<H, S> {
    // arg1 = syscall mask, arg2 = return register. A, B, C carry the parameters.
    pub(super) fn interpret_sys(&mut self, instr: Instr) -> Result<(), VmError> {
        let mask = instr.arg1;
        let ret = Operand::resolve(instr.arg2);

        if mask & SYS_OPEN != 0 {
            let fd = self.sys_open()?;
            self.registers.write(ret, fd);
        }
        if mask & SYS_READ_CODE != 0 {
            let n = self.sys_read_code()?;
            self.registers.write(ret, n as u8);
        }
        if mask & SYS_READ_MEMORY != 0 {
            let n = self.sys_read_memory()?;
            self.registers.write(ret, n as u8);
        }
        if mask & SYS_WRITE != 0 {
            let n = self.sys_write()?;
            self.registers.write(ret, n as u8);
        }
        if mask & SYS_SLEEP != 0 {
            let seconds = self.registers.get(Register::A);
            debug!("SYS sleep for {seconds} seconds");
            self.host.sleep(seconds);
            self.registers.write(ret, 0);
        }
        if mask & SYS_EXIT != 0 {
            let code = self.registers.get(Register::A);
            debug!("SYS exit with return code {code}");
            self.host.exit(code);
            self.state = VMState::Exited(code);
        }

        self.emit(TraceCause::Syscall { mask, ret });
        Ok(())
    }

    // open(path = NUL-terminated string at Memory[A])
    fn sys_open(&mut self) -> Result<u8, VmError> {
        let start = self.registers.get(Register::A) as usize;
        let end = self.memory[start..]
            .iter()
            .position(|&b| b == 0)
            .map_or(MEMORY_SIZE, |len| start + len);
        let path = &self.memory[start..end];
        debug!("SYS open {}", String::from_utf8_lossy(path));

        self.host.open(path).map_err(|source| VmError::Open {
            path: String::from_utf8_lossy(path).into_owned(),
            source,
        })
    }

    // read(fd = A, buf = Code[3 * B..]); C does not bound this read
    fn sys_read_code(&mut self) -> Result<usize, VmError> {
        let fd = self.registers.get(Register::A);
        let offset = self.registers.get(Register::B) as usize * INSTRUCTION_SIZE;
        debug!("SYS read_code from fd {fd} into code at {offset:#x}");

        let n = self
            .host
            .read(fd, &mut self.code[offset..])
            .map_err(|source| VmError::ReadCode { fd, source })?;
        // EOF loads nothing, so the fetch bound stays where it was
        if n > 0 {
            self.extend_code(offset + n);
        }
        Ok(n)
    }

    // read(fd = A, buf = Memory[B..], n = min(256 - B, C))
    fn sys_read_memory(&mut self) -> Result<usize, VmError> {
        let fd = self.registers.get(Register::A);
        let offset = self.registers.get(Register::B);
        let len = clamp_len(offset, self.registers.get(Register::C));
        debug!("SYS read_memory from fd {fd} at {offset:#04x} for {len} bytes");

        let start = offset as usize;
        self.host
            .read(fd, &mut self.memory[start..start + len])
            .map_err(|source| VmError::ReadMemory { fd, source })
    }

    // write(fd = A, buf = Memory[B..], n = min(256 - B, C))
    fn sys_write(&mut self) -> Result<usize, VmError> {
        let fd = self.registers.get(Register::A);
        let offset = self.registers.get(Register::B);
        let len = clamp_len(offset, self.registers.get(Register::C));
        debug!("SYS write to fd {fd} from {offset:#04x} for {len} bytes");

        let start = offset as usize;
        self.host
            .write(fd, &self.memory[start..start + len])
            .map_err(|source| VmError::Write { fd, source })
    }
}
