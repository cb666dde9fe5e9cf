//! Opcode abstractions, decoding and constants.
use crate::{definitions::memory, OpcodeError};

/// the mask for the top nibble
pub(crate) const OPCODE_MASK_F000: u16 = 0xF000;

/// the mask for the last twelve bits
pub(crate) const OPCODE_MASK_0FFF: u16 = 0x0FFF;

/// the mask for the last eight bits
pub(crate) const OPCODE_MASK_00FF: u16 = 0x00FF;

/// the mask for the last four bits
pub(crate) const OPCODE_MASK_000F: u16 = 0x000F;

/// a wrapper type for u16 to make it clear what is meant to be used
pub type Opcode = u16;

/// will build an opcode from data and the given pointer
///
/// # Arguments
///
/// - `data` - A slice of u8 data entries used to generate the opcode
/// - `pointer` - Where in the data the opcode shall be extracted, so
///   `pointer` and `pointer + 1` make the opcode up (big-endian)
pub fn build_opcode(data: &[u8], pointer: usize) -> Result<Opcode, OpcodeError> {
    // controlling that there is no illegal access here
    if pointer + 1 < data.len() {
        Ok(Opcode::from_be_bytes([data[pointer], data[pointer + 1]]))
    } else {
        Err(OpcodeError::MemoryOutOfBounds {
            pointer,
            len: data.len(),
        })
    }
}

/// These are special traits used to filter out information
/// from opcodes
pub trait OpcodeTrait {
    /// extracts the opcode family `T` from an opcode of type `TNNN`
    fn t(&self) -> usize;

    /// extracts `NNN` from an opcode of type `TNNN`
    fn nnn(&self) -> usize;

    /// extracts `X` and `NN` from an opcode of type `TXNN`
    fn xnn(&self) -> (usize, u8);

    /// extracts `X`, `Y` and `N` from an opcode of type `TXYN`
    fn xyn(&self) -> (usize, usize, usize);

    /// extracts `X` and `Y` from an opcode of type `TXYT`
    fn xy(&self) -> (usize, usize);

    /// extracts `X` from an opcode of type `TXTT`
    fn x(&self) -> usize;
}

impl OpcodeTrait for Opcode {
    fn t(&self) -> usize {
        ((self & OPCODE_MASK_F000) >> 12) as usize
    }

    fn nnn(&self) -> usize {
        (self & OPCODE_MASK_0FFF) as usize
    }

    fn xnn(&self) -> (usize, u8) {
        let x = self.x();
        let nn = (self & OPCODE_MASK_00FF) as u8;
        (x, nn)
    }

    fn xyn(&self) -> (usize, usize, usize) {
        let (x, y) = self.xy();
        let n = (self & OPCODE_MASK_000F) as usize;
        (x, y, n)
    }

    fn xy(&self) -> (usize, usize) {
        let x = self.x();
        let y = ((self & 0x00F0) >> 4) as usize;
        (x, y)
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> 8) as usize
    }
}

/// The decoded form of an opcode.
///
/// The instruction set is closed, there is exactly one variant per
/// canonical opcode pattern, so the execution dispatch is a single
/// exhaustive `match` and the compiler checks that every variant is
/// handled. Any bit pattern without a variant fails decoding with
/// [`OpcodeError::InvalidOpcode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `00E0` - clears the screen
    Clear,
    /// `00EE` - returns from a subroutine
    Return,
    /// `1NNN` - jumps to address `NNN`
    Jump { nnn: usize },
    /// `2NNN` - calls subroutine at `NNN`
    Call { nnn: usize },
    /// `3XNN` - skips the next instruction if `VX` equals `NN`
    SkipEqConst { x: usize, nn: u8 },
    /// `4XNN` - skips the next instruction if `VX` doesn't equal `NN`
    SkipNeConst { x: usize, nn: u8 },
    /// `5XY0` - skips the next instruction if `VX` equals `VY`
    SkipEqReg { x: usize, y: usize },
    /// `6XNN` - sets `VX` to `NN`
    LoadConst { x: usize, nn: u8 },
    /// `7XNN` - adds `NN` to `VX` without touching the carry flag
    AddConst { x: usize, nn: u8 },
    /// `8XY0` - sets `VX` to the value of `VY`
    Assign { x: usize, y: usize },
    /// `8XY1` - sets `VX` to `VX | VY`
    Or { x: usize, y: usize },
    /// `8XY2` - sets `VX` to `VX & VY`
    And { x: usize, y: usize },
    /// `8XY3` - sets `VX` to `VX ^ VY`
    Xor { x: usize, y: usize },
    /// `8XY4` - adds `VY` to `VX`, `VF` becomes the carry
    Add { x: usize, y: usize },
    /// `8XY5` - subtracts `VY` from `VX`, `VF` is `1` when there was
    /// no borrow
    Sub { x: usize, y: usize },
    /// `8XY6` - stores the least significant bit of `VX` in `VF`,
    /// then shifts `VX` right by one
    ShiftRight { x: usize },
    /// `8XY7` - sets `VX` to `VY - VX`, `VF` is `1` when there was
    /// no borrow
    SubInv { x: usize, y: usize },
    /// `8XYE` - stores the most significant bit of `VX` in `VF`,
    /// then shifts `VX` left by one
    ShiftLeft { x: usize },
    /// `9XY0` - skips the next instruction if `VX` doesn't equal `VY`
    SkipNeReg { x: usize, y: usize },
    /// `ANNN` - sets `I` to `NNN`
    LoadIndex { nnn: usize },
    /// `BNNN` - jumps to `V0 + NNN`
    JumpOffset { nnn: usize },
    /// `CXNN` - sets `VX` to a random byte masked with `NN`
    Random { x: usize, nn: u8 },
    /// `DXYN` - draws the 8xN sprite at `memory[I..I+N)` to
    /// `(VX, VY)`, `VF` becomes the collision flag
    Draw { x: usize, y: usize, n: usize },
    /// `EX9E` - skips the next instruction if key `VX` is pressed
    SkipKeyPressed { x: usize },
    /// `EXA1` - skips the next instruction if key `VX` is not pressed
    SkipKeyNotPressed { x: usize },
    /// `FX07` - sets `VX` to the value of the delay timer
    GetDelayTimer { x: usize },
    /// `FX0A` - blocks until a key is pressed, then stores its code
    /// in `VX`
    AwaitKey { x: usize },
    /// `FX15` - sets the delay timer to `VX`
    SetDelayTimer { x: usize },
    /// `FX18` - sets the sound timer to `VX`
    SetSoundTimer { x: usize },
    /// `FX1E` - adds `VX` to `I`
    AddToIndex { x: usize },
    /// `FX29` - sets `I` to the font sprite for the digit in `VX`
    LoadSprite { x: usize },
    /// `FX33` - stores the decimal digits of `VX` at `I`, `I+1`, `I+2`
    StoreBcd { x: usize },
    /// `FX55` - stores `V0..=VX` into memory starting at `I`
    StoreRegisters { x: usize },
    /// `FX65` - loads `V0..=VX` from memory starting at `I`
    LoadRegisters { x: usize },
}

impl TryFrom<Opcode> for Instruction {
    type Error = OpcodeError;

    fn try_from(value: Opcode) -> Result<Self, Self::Error> {
        let invalid = || OpcodeError::InvalidOpcode(value);

        let res = match value.t() {
            0x0 => match value {
                0x00E0 => Instruction::Clear,
                0x00EE => Instruction::Return,
                _ => return Err(invalid()),
            },
            0x1 => Instruction::Jump { nnn: value.nnn() },
            0x2 => Instruction::Call { nnn: value.nnn() },
            0x3 => {
                let (x, nn) = value.xnn();
                Instruction::SkipEqConst { x, nn }
            }
            0x4 => {
                let (x, nn) = value.xnn();
                Instruction::SkipNeConst { x, nn }
            }
            0x5 => match value.xyn() {
                (x, y, 0x0) => Instruction::SkipEqReg { x, y },
                _ => return Err(invalid()),
            },
            0x6 => {
                let (x, nn) = value.xnn();
                Instruction::LoadConst { x, nn }
            }
            0x7 => {
                let (x, nn) = value.xnn();
                Instruction::AddConst { x, nn }
            }
            0x8 => {
                let (x, y, n) = value.xyn();
                match n {
                    0x0 => Instruction::Assign { x, y },
                    0x1 => Instruction::Or { x, y },
                    0x2 => Instruction::And { x, y },
                    0x3 => Instruction::Xor { x, y },
                    0x4 => Instruction::Add { x, y },
                    0x5 => Instruction::Sub { x, y },
                    0x6 => Instruction::ShiftRight { x },
                    0x7 => Instruction::SubInv { x, y },
                    0xE => Instruction::ShiftLeft { x },
                    _ => return Err(invalid()),
                }
            }
            0x9 => match value.xyn() {
                (x, y, 0x0) => Instruction::SkipNeReg { x, y },
                _ => return Err(invalid()),
            },
            0xA => Instruction::LoadIndex { nnn: value.nnn() },
            0xB => Instruction::JumpOffset { nnn: value.nnn() },
            0xC => {
                let (x, nn) = value.xnn();
                Instruction::Random { x, nn }
            }
            0xD => {
                let (x, y, n) = value.xyn();
                Instruction::Draw { x, y, n }
            }
            0xE => match value.xnn() {
                (x, 0x9E) => Instruction::SkipKeyPressed { x },
                (x, 0xA1) => Instruction::SkipKeyNotPressed { x },
                _ => return Err(invalid()),
            },
            0xF => {
                let (x, nn) = value.xnn();
                match nn {
                    0x07 => Instruction::GetDelayTimer { x },
                    0x0A => Instruction::AwaitKey { x },
                    0x15 => Instruction::SetDelayTimer { x },
                    0x18 => Instruction::SetSoundTimer { x },
                    0x1E => Instruction::AddToIndex { x },
                    0x29 => Instruction::LoadSprite { x },
                    0x33 => Instruction::StoreBcd { x },
                    0x55 => Instruction::StoreRegisters { x },
                    0x65 => Instruction::LoadRegisters { x },
                    _ => return Err(invalid()),
                }
            }
            _ => unreachable!("a nibble is at most 0xF"),
        };
        Ok(res)
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents the program counter movements that an executed
/// instruction can request.
pub enum ProgramCounterStep {
    /// Will not change the program counter
    None,
    /// Will move the program counter to the next instruction
    Next,
    /// Will move the program counter over the next instruction
    Skip,
    /// Will simply move the program counter to the given location
    Jump(usize),
}

impl ProgramCounterStep {
    /// Will return a Skip if the condition is true.
    #[inline]
    pub fn cond(cond: bool) -> Self {
        if cond {
            ProgramCounterStep::Skip
        } else {
            ProgramCounterStep::Next
        }
    }

    /// Maps the step to the distance moved relative to the current
    /// program counter, where `Jump` is an absolute location.
    #[inline]
    pub(crate) fn distance(&self) -> usize {
        match *self {
            ProgramCounterStep::None => 0,
            ProgramCounterStep::Next => memory::opcodes::SIZE,
            ProgramCounterStep::Skip => 2 * memory::opcodes::SIZE,
            ProgramCounterStep::Jump(pointer) => pointer,
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Represents a command from the interpreter up to the scheduler.
pub enum Operation {
    /// If no action has to be taken.
    None,
    /// A redraw command, the framebuffer changed and is dirty.
    Draw,
}
