pub mod collector;
pub mod memory;
pub mod process;
pub mod snapshot;
pub mod source;
