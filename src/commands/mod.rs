// Command implementations for the process-hooks CLI

pub mod process;
