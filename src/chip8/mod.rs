//! The full implementation of the chip8 machine, from the state
//! model to the per-opcode execution semantics.
mod chipset;
mod execute;

/// reexport chipset structs and data for simpler usage
pub use chipset::*;
