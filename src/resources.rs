use std::path::Path;

use crate::{
    definitions::{cpu, memory},
    RomError,
};

/// The largest program that still fits into ram behind the
/// interpreter area.
pub const MAX_PROGRAM_SIZE: usize = memory::SIZE - cpu::PROGRAM_COUNTER;

#[derive(Clone)]
/// Represents a single rom with its information
pub struct Rom {
    /// The rom name
    name: String,
    /// The raw program data, copied verbatim into memory at the
    /// program start address
    data: Box<[u8]>,
}

impl Rom {
    /// Will generate a new rom based of the given data.
    ///
    /// Programs that would not fit below the end of ram are rejected
    /// before any instruction executes.
    pub fn new(name: &str, data: Vec<u8>) -> Result<Self, RomError> {
        if data.len() >= MAX_PROGRAM_SIZE {
            return Err(RomError::TooLarge {
                size: data.len(),
                max: MAX_PROGRAM_SIZE - 1,
            });
        }
        Ok(Rom {
            name: name.to_string(),
            data: data.into_boxed_slice(),
        })
    }

    /// Will read the rom from the given file path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RomError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(&name, data)
    }

    /// Will return a slice of the program data
    pub fn get_data(&self) -> &[u8] {
        &self.data
    }

    /// Will return the name of the rom.
    pub fn get_name(&self) -> &str {
        &self.name
    }
}
