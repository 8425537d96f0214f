use pretty_assertions::assert_eq;
use yvm::builder::cat_file;
use yvm::constants::*;
use yvm::{encode, Instr, MemoryHost, RecordingSink, Register, TraceCause, VMState, VmError, VM};

fn vm_with(program: &[Instr], host: MemoryHost) -> VM<MemoryHost, RecordingSink> {
    let mut vm = VM::new(host, RecordingSink::default());
    vm.load_program(&encode(program)).unwrap();
    vm
}

fn step_n(vm: &mut VM<MemoryHost, RecordingSink>, n: usize) {
    for _ in 0..n {
        vm.step().unwrap();
    }
}

fn imm(reg: u8, value: u8) -> Instr {
    Instr::new(OP_IMM, reg, value)
}

fn exit_with(code: u8) -> [Instr; 2] {
    [imm(REG_A, code), Instr::new(OP_SYS, SYS_EXIT, 0)]
}

#[test]
fn test_add_wraps_modulo_256() {
    let mut vm = vm_with(
        &[imm(REG_A, 200), imm(REG_B, 100), Instr::new(OP_ADD, REG_A, REG_B)],
        MemoryHost::new(),
    );
    step_n(&mut vm, 3);
    assert_eq!(vm.registers.get(Register::A), 44);
    assert_eq!(vm.registers.get(Register::B), 100);
}

#[test]
fn test_instruction_pointer_advances_once_per_step() {
    let mut vm = vm_with(&[imm(REG_A, 1), imm(REG_B, 2)], MemoryHost::new());
    assert_eq!(vm.current_instruction(), Some(imm(REG_A, 1)));
    vm.step().unwrap();
    assert_eq!(vm.registers.get(Register::I), 1);
    vm.step().unwrap();
    assert_eq!(vm.registers.get(Register::I), 2);
    assert_eq!(vm.current_instruction(), None);
}

#[test]
fn test_immediate_store_load_round_trip() {
    let mut vm = vm_with(
        &[
            imm(REG_A, 0x5A),
            imm(REG_B, 0xC3),
            Instr::new(OP_STM, REG_B, REG_A),
            Instr::new(OP_LDM, REG_C, REG_B),
        ],
        MemoryHost::new(),
    );
    step_n(&mut vm, 4);
    assert_eq!(vm.memory[0xC3], 0x5A);
    assert_eq!(vm.registers.get(Register::C), 0x5A);
}

#[test]
fn test_stack_push_then_pop() {
    let mut vm = vm_with(
        &[
            imm(REG_A, 0x42),
            imm(REG_S, 0x10),
            Instr::new(OP_STK, 0, REG_A),
            Instr::new(OP_STK, REG_B, 0),
        ],
        MemoryHost::new(),
    );
    step_n(&mut vm, 3);
    assert_eq!(vm.registers.get(Register::S), 0x11);
    assert_eq!(vm.memory[0x11], 0x42);

    vm.step().unwrap();
    assert_eq!(vm.registers.get(Register::B), 0x42);
    assert_eq!(vm.registers.get(Register::S), 0x10);
}

#[test]
fn test_stack_exchange_in_one_instruction() {
    let mut vm = vm_with(
        &[imm(REG_A, 7), Instr::new(OP_STK, REG_B, REG_A)],
        MemoryHost::new(),
    );
    step_n(&mut vm, 2);
    assert_eq!(vm.registers.get(Register::B), 7);
    assert_eq!(vm.registers.get(Register::S), 0);
    assert_eq!(vm.memory[1], 7);
}

#[test]
fn test_operand_without_register_is_noop_target() {
    let mut vm = vm_with(
        &[
            imm(REG_A, 9),
            imm(0x00, 0x55),
            Instr::new(OP_ADD, REG_A, 0xEE),
            Instr::new(OP_ADD, 0xEE, REG_A),
        ],
        MemoryHost::new(),
    );
    step_n(&mut vm, 4);
    assert_eq!(vm.registers.get(Register::A), 9);
    assert_eq!(vm.registers.values(), [9, 0, 0, 0, 0, 4, 0]);
}

#[test]
fn test_unknown_opcode_is_ignored() {
    let mut vm = vm_with(&[Instr::new(0x00, REG_A, 1), Instr::new(0xFF, REG_B, 2)], MemoryHost::new());
    step_n(&mut vm, 2);
    assert_eq!(vm.registers.values(), [0, 0, 0, 0, 0, 2, 0]);
    assert_eq!(vm.memory, [0; MEMORY_SIZE]);
}

#[test]
fn test_compare_replaces_flags_and_emits_trace() {
    let mut vm = vm_with(
        &[
            imm(REG_A, 3),
            imm(REG_B, 5),
            Instr::new(OP_CMP, REG_A, REG_B),
            Instr::new(OP_CMP, REG_C, REG_D),
        ],
        MemoryHost::new(),
    );
    step_n(&mut vm, 3);
    assert_eq!(vm.flags(), FLAG_L | FLAG_N);

    vm.step().unwrap();
    assert_eq!(vm.flags(), FLAG_E | FLAG_Z);

    let causes: Vec<TraceCause> = vm.sink.events.iter().map(|e| e.cause).collect();
    assert_eq!(
        causes,
        vec![
            TraceCause::Compare { lhs: 3, rhs: 5, flags: FLAG_L | FLAG_N },
            TraceCause::Compare { lhs: 0, rhs: 0, flags: FLAG_E | FLAG_Z },
        ]
    );
    assert_eq!(vm.sink.events[0].snapshot.registers.get(Register::F), FLAG_L | FLAG_N);
}

#[test]
fn test_unconditional_jump_ignores_flags() {
    let mut program = vec![
        imm(REG_F, 0),
        imm(REG_D, 4),
        Instr::new(OP_JMP, 0, REG_D),
        imm(REG_C, 0xEE),
    ];
    program.extend(exit_with(0));
    let mut vm = vm_with(&program, MemoryHost::new());
    assert_eq!(vm.run().unwrap(), 0);
    assert_eq!(vm.registers.get(Register::C), 0);
}

#[test]
fn test_conditional_jump_fires_only_on_matching_flag() {
    let mut program = vec![
        imm(REG_A, 3),
        imm(REG_B, 5),
        imm(REG_D, 8),
        Instr::new(OP_CMP, REG_A, REG_B),
        Instr::new(OP_JMP, FLAG_G | FLAG_E, REG_D),
        imm(REG_C, 0x11),
        Instr::new(OP_JMP, FLAG_L, REG_D),
        imm(REG_C, 0xEE),
    ];
    program.extend(exit_with(0));
    let mut vm = vm_with(&program, MemoryHost::new());
    assert_eq!(vm.run().unwrap(), 0);
    assert_eq!(vm.registers.get(Register::C), 0x11);
}

#[test]
fn test_fetch_past_program_end_is_fatal() {
    let mut vm = vm_with(&[imm(REG_A, 1)], MemoryHost::new());
    let err = vm.run().unwrap_err();
    assert!(matches!(err, VmError::IpOutOfBounds { ip: 1, len: 1 }));
}

#[test]
fn test_jump_outside_program_is_fatal() {
    let mut vm = vm_with(&[imm(REG_D, 0xF0), Instr::new(OP_JMP, 0, REG_D)], MemoryHost::new());
    let err = vm.run().unwrap_err();
    assert!(matches!(err, VmError::IpOutOfBounds { ip: 0xF0, len: 2 }));
}

#[test]
fn test_oversized_program_is_rejected() {
    let mut vm = VM::new(MemoryHost::new(), RecordingSink::default());
    let err = vm.load_program(&vec![0u8; CODE_SIZE + 1]).unwrap_err();
    assert!(matches!(err, VmError::ProgramTooLarge { size, .. } if size == CODE_SIZE + 1));
    assert!(vm.load_program(&vec![0u8; CODE_SIZE]).is_ok());
    assert_eq!(vm.instructions.len(), MAX_INSTRUCTIONS);
}

#[test]
fn test_exit_stops_with_code_from_a() {
    let mut vm = vm_with(&exit_with(7), MemoryHost::new());
    assert_eq!(vm.run().unwrap(), 7);
    assert_eq!(vm.state, VMState::Exited(7));
    assert_eq!(vm.host.exit_code, Some(7));

    // Stepping an exited VM changes nothing
    vm.step().unwrap();
    assert_eq!(vm.registers.get(Register::I), 2);
}

#[test]
fn test_syscall_bits_run_in_fixed_order() {
    let mut vm = vm_with(
        &[
            imm(REG_A, 2),
            imm(REG_D, 0x33),
            Instr::new(OP_SYS, SYS_SLEEP | SYS_EXIT, REG_D),
        ],
        MemoryHost::new(),
    );
    assert_eq!(vm.run().unwrap(), 2);
    assert_eq!(vm.host.sleeps, vec![2]);
    assert_eq!(vm.registers.get(Register::D), 0);

    let last = vm.sink.events.last().unwrap();
    assert_eq!(
        last.cause,
        TraceCause::Syscall { mask: SYS_SLEEP | SYS_EXIT, ret: yvm::Operand::Reg(Register::D) }
    );
}

#[test]
fn test_read_memory_is_clamped_to_memory_end() {
    let mut program = vec![
        imm(REG_A, FD_STDIN),
        imm(REG_B, 0xF0),
        imm(REG_C, 0x40),
        Instr::new(OP_SYS, SYS_READ_MEMORY, REG_D),
    ];
    program.extend(exit_with(0));
    let mut vm = vm_with(&program, MemoryHost::new().with_stdin(vec![b'x'; 64]));
    vm.run().unwrap();

    assert_eq!(vm.registers.get(Register::D), 0x10);
    assert_eq!(&vm.memory[0xF0..], &[b'x'; 0x10][..]);
    assert_eq!(&vm.memory[..0xF0], &[0u8; 0xF0][..]);
}

#[test]
fn test_write_is_clamped_to_memory_end() {
    let mut program = vec![
        imm(REG_A, FD_STDOUT),
        imm(REG_B, 0xF8),
        imm(REG_C, 0xFF),
        Instr::new(OP_SYS, SYS_WRITE, REG_D),
    ];
    program.extend(exit_with(0));
    let mut vm = vm_with(&program, MemoryHost::new());
    vm.memory[0xF8..].copy_from_slice(b"ABCDEFGH");
    vm.run().unwrap();

    assert_eq!(vm.host.stdout, b"ABCDEFGH");
    assert_eq!(vm.registers.get(Register::D), 8);
}

#[test]
fn test_read_code_loads_executable_code() {
    let extra = encode(&[imm(REG_C, 0x77), imm(REG_A, 5), Instr::new(OP_SYS, SYS_EXIT, 0)]);
    let program = [
        imm(REG_A, FD_STDIN),
        imm(REG_B, 3),
        Instr::new(OP_SYS, SYS_READ_CODE, REG_D),
    ];
    let mut vm = vm_with(&program, MemoryHost::new().with_stdin(extra.clone()));
    assert_eq!(vm.run().unwrap(), 5);

    assert_eq!(vm.registers.get(Register::C), 0x77);
    assert_eq!(vm.registers.get(Register::D), extra.len() as u8);
    assert_eq!(vm.code_len(), 9 + extra.len());
    assert_eq!(&vm.code[9..18], &extra[..]);
}

#[test]
fn test_empty_read_code_keeps_fetch_bound() {
    let mut vm = vm_with(
        &[imm(REG_A, FD_STDIN), imm(REG_B, 100), Instr::new(OP_SYS, SYS_READ_CODE, REG_D)],
        MemoryHost::new(),
    );
    step_n(&mut vm, 3);
    assert_eq!(vm.registers.get(Register::D), 0);
    assert_eq!(vm.code_len(), 9);
    assert_eq!(vm.instructions.len(), 3);

    let err = vm.step().unwrap_err();
    assert!(matches!(err, VmError::IpOutOfBounds { ip: 3, len: 3 }));
}

#[test]
fn test_read_code_past_end_loads_zeroed_gap() {
    let extra = encode(&[imm(REG_A, 7), Instr::new(OP_SYS, SYS_EXIT, 0)]);
    let program = [
        imm(REG_A, FD_STDIN),
        imm(REG_B, 5),
        Instr::new(OP_SYS, SYS_READ_CODE, REG_D),
    ];
    let mut vm = vm_with(&program, MemoryHost::new().with_stdin(extra));
    assert_eq!(vm.run().unwrap(), 7);

    // slots 3 and 4 were never written and run as no-ops
    assert_eq!(vm.code_len(), 21);
    assert_eq!(vm.instructions[3], Instr::new(0, 0, 0));
    assert_eq!(vm.instructions[4], Instr::new(0, 0, 0));
}

#[test]
fn test_open_read_write_in_one_syscall() {
    let mask = SYS_OPEN | SYS_READ_MEMORY | SYS_WRITE;
    let mut vm = vm_with(
        &[
            imm(REG_A, 0x40),
            imm(REG_B, 0x80),
            imm(REG_C, 0x10),
            Instr::new(OP_SYS, mask, REG_A),
        ],
        MemoryHost::new().with_file("f", "Z"),
    );
    vm.memory[0x40..0x42].copy_from_slice(b"f\0");
    step_n(&mut vm, 4);

    // open -> A = 3, read 1 byte from fd 3 -> A = 1, write 16 bytes to fd 1 -> A = 16
    assert_eq!(vm.host.open_descriptors(), 1);
    assert_eq!(vm.memory[0x80], b'Z');
    let mut expected = vec![b'Z'];
    expected.resize(0x10, 0);
    assert_eq!(vm.host.stdout, expected);
    assert_eq!(vm.registers.get(Register::A), 16);

    let last = vm.sink.events.last().unwrap();
    assert_eq!(last.cause, TraceCause::Syscall { mask, ret: yvm::Operand::Reg(Register::A) });
}

#[test]
fn test_syscall_results_discarded_without_return_register() {
    let mask = SYS_OPEN | SYS_WRITE;
    let mut vm = vm_with(
        &[
            imm(REG_A, FD_STDOUT),
            imm(REG_B, 0x10),
            imm(REG_C, 2),
            Instr::new(OP_SYS, mask, 0),
        ],
        MemoryHost::new().with_file("f", ""),
    );
    // A doubles as the path address for open and the fd for write
    vm.memory[0x01..0x03].copy_from_slice(b"f\0");
    vm.memory[0x10..0x12].copy_from_slice(b"hi");
    step_n(&mut vm, 4);

    assert_eq!(vm.host.open_descriptors(), 1);
    assert_eq!(vm.host.stdout, b"hi");
    assert_eq!(vm.registers.get(Register::A), FD_STDOUT);
    assert_eq!(vm.registers.get(Register::B), 0x10);
    assert_eq!(vm.registers.get(Register::C), 2);
    assert_eq!(vm.registers.get(Register::D), 0);

    let last = vm.sink.events.last().unwrap();
    assert_eq!(last.cause, TraceCause::Syscall { mask, ret: yvm::Operand::Discard });
}

#[test]
fn test_open_reads_nul_terminated_path() {
    let mut vm = vm_with(
        &[imm(REG_A, 0x20), Instr::new(OP_SYS, SYS_OPEN, REG_B)],
        MemoryHost::new().with_file("/flag", "secret"),
    );
    vm.memory[0x20..0x26].copy_from_slice(b"/flag\0");
    vm.memory[0x26] = b'!';
    step_n(&mut vm, 2);
    assert_eq!(vm.registers.get(Register::B), 3);
    assert_eq!(vm.host.open_descriptors(), 1);
}

#[test]
fn test_open_path_may_run_to_memory_end() {
    let mut vm = vm_with(
        &[imm(REG_A, 0xFC), Instr::new(OP_SYS, SYS_OPEN, REG_A)],
        MemoryHost::new().with_file("abcd", ""),
    );
    vm.memory[0xFC..].copy_from_slice(b"abcd");
    step_n(&mut vm, 2);
    assert_eq!(vm.registers.get(Register::A), 3);
}

#[test]
fn test_open_failure_is_fatal() {
    let mut vm = vm_with(&[Instr::new(OP_SYS, SYS_OPEN, REG_A)], MemoryHost::new());
    vm.memory[..5].copy_from_slice(b"nope\0");
    let err = vm.run().unwrap_err();
    assert!(matches!(err, VmError::Open { ref path, .. } if path == "nope"));
}

#[test]
fn test_write_failure_is_fatal() {
    let mut program = vec![imm(REG_A, FD_STDOUT), imm(REG_C, 4), Instr::new(OP_SYS, SYS_WRITE, REG_A)];
    program.extend(exit_with(0));
    let mut vm = vm_with(&program, MemoryHost::new().with_failing_writes());
    let err = vm.run().unwrap_err();
    assert!(matches!(err, VmError::Write { fd: 1, .. }));
}

#[test]
fn test_cat_program_prints_file() {
    let contents = b"pwn.college{yan85}\n".to_vec();
    let mut vm = vm_with(&cat_file("/flag", 0x80), MemoryHost::new().with_file("/flag", contents.clone()));
    assert_eq!(vm.run().unwrap(), 0);
    assert_eq!(vm.host.stdout, contents);

    // open, read_memory, write, exit
    let syscalls = vm
        .sink
        .events
        .iter()
        .filter(|e| matches!(e.cause, TraceCause::Syscall { .. }))
        .count();
    assert_eq!(syscalls, 4);
}

#[test]
fn test_cat_program_stops_at_255_bytes() {
    let contents: Vec<u8> = (0..300u32).map(|i| b'a' + (i % 26) as u8).collect();
    let mut vm = vm_with(&cat_file("big.txt", 0), MemoryHost::new().with_file("big.txt", contents.clone()));
    assert_eq!(vm.run().unwrap(), 0);
    assert_eq!(vm.host.stdout, contents[..255].to_vec());
}
