/// VM execution states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMState {
    Running,
    Exited(u8),
}
