//! Pure classification and correlation over parsed process records. Nothing
//! in here spawns processes or touches the async runtime.

pub mod rules;
pub mod scripts;
pub mod sessions;
pub mod tabs;
pub mod windows;
