use std::ops::Range;

use {
    crate::{
        definitions::{cpu, display, keyboard, memory},
        devices::Keyboard,
        opcode::{self, Instruction, Opcode, Operation, ProgramCounterStep},
        resources::Rom,
        OpcodeError, ProcessError, StackError,
    },
    rand::RngCore,
};

/// The execution mode of the chipset.
///
/// There are exactly two states. `AwaitingKey` is entered by the
/// await-key instruction when no key is down, and left again once a
/// key is observed pressed, no instruction is fetched in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Ordinary fetch-decode-execute flow.
    Running,
    /// Blocked on the await-key instruction, the pressed key code
    /// will be stored into `VX`.
    AwaitingKey { x: usize },
}

/// The ChipSet struct represents the current state
/// of the system, it contains all the structures
/// needed for emulating an instant on the
/// Chip8 CPU.
pub struct ChipSet {
    /// name of the loaded rom
    pub(super) name: String,
    /// the last fetched opcode, all two bytes long and stored
    /// big-endian
    pub(super) opcode: Opcode,
    /// - `0x000-0x04F` - the built in `4x5` pixel font set (`0-F`)
    /// - `0x200-0xFFF` - program rom and work ram
    pub(super) memory: Box<[u8]>,
    /// `8-bit` data registers named `V0` to `VF`. The `VF` register
    /// doubles as a flag for some instructions, in an addition
    /// operation it is the carry flag, in subtraction the "no borrow"
    /// flag and in the draw instruction it is set upon pixel
    /// collision.
    pub(super) registers: [u8; cpu::register::SIZE],
    /// The index for the register, this is a special 16-bit address
    /// register called `I`
    pub(super) index_register: usize,
    /// The program counter holds the address of the next instruction
    /// to be executed from memory.
    pub(super) program_counter: usize,
    /// The stack is only used to store return addresses when
    /// subroutines are called, it is bounded at 16 nesting entries.
    pub(super) stack: Vec<usize>,
    /// Delay timer: intended for timing the events of games. Its
    /// value can be set and read, the scheduler counts it down once
    /// per cycle until it reaches 0.
    pub(super) delay_timer: u8,
    /// Sound timer: while its value is nonzero a beep would be
    /// audible. Tracked as a value only, counted down like the delay
    /// timer.
    pub(super) sound_timer: u8,
    /// The graphics are black and white and the screen has a total of
    /// `2048` pixels `(64 x 32)`, stored as one flat row-major cell
    /// sequence. Draw index arithmetic wraps modulo the resolution.
    pub(super) framebuffer: Box<[bool]>,
    /// The input latch, a snapshot of the sixteen key states written
    /// once per cycle by the input collaborator and only read here.
    pub(super) keyboard: Keyboard,
    /// The current execution mode, see [`Mode`].
    pub(super) mode: Mode,
    /// This stores the random number generator, used by the chipset.
    /// It is injected into the chipset, so as to keep execution
    /// deterministic and testable.
    pub(super) rng: Box<dyn RngCore + Send>,
}

impl ChipSet {
    /// will create a new chipset object with the default system rng
    pub fn new(rom: Rom) -> Self {
        Self::with_rng(rom, Box::new(rand::rngs::OsRng))
    }

    /// will create a new chipset object with the given rng
    pub fn with_rng(rom: Rom, rng: Box<dyn RngCore + Send>) -> Self {
        // initialize all the memory with 0
        let mut ram = vec![0; memory::SIZE];

        // load the font
        ram[display::fontset::LOCATION
            ..(display::fontset::LOCATION + display::fontset::FONTSET.len())]
            .copy_from_slice(&display::fontset::FONTSET);

        // write the rom data into memory
        ram[cpu::PROGRAM_COUNTER..(cpu::PROGRAM_COUNTER + rom.get_data().len())]
            .copy_from_slice(rom.get_data());

        Self {
            name: rom.get_name().to_string(),
            opcode: 0,
            memory: ram.into_boxed_slice(),
            registers: [0; cpu::register::SIZE],
            index_register: 0,
            program_counter: cpu::PROGRAM_COUNTER,
            stack: Vec::with_capacity(cpu::stack::SIZE),
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: vec![false; display::RESOLUTION].into_boxed_slice(),
            keyboard: Keyboard::new(),
            mode: Mode::Running,
            rng,
        }
    }

    /// will advance the program by a single fetch-decode-execute step
    ///
    /// While the chipset awaits a key press no instruction is
    /// fetched, the program counter stays on the await-key
    /// instruction until a key is observed pressed and its code has
    /// been stored.
    pub fn step(&mut self) -> Result<Operation, ProcessError> {
        if let Mode::AwaitingKey { x } = self.mode {
            if let Some(key) = self.keyboard.first_pressed() {
                self.registers[x] = key as u8;
                self.mode = Mode::Running;
                self.apply_step(ProgramCounterStep::Next)?;
            }
            return Ok(Operation::None);
        }

        // fetch
        self.opcode = opcode::build_opcode(&self.memory, self.program_counter)
            .map_err(ProcessError::Opcode)?;
        // decode
        let instruction = Instruction::try_from(self.opcode).map_err(ProcessError::Opcode)?;
        // execute
        let (step, operation) = self.execute(instruction)?;
        self.apply_step(step)?;
        Ok(operation)
    }

    /// Will move the program counter by the given step.
    ///
    /// Running past the last valid instruction address is fatal, the
    /// program counter never clamps or wraps.
    pub(super) fn apply_step(&mut self, step: ProgramCounterStep) -> Result<(), ProcessError> {
        let pointer = if let ProgramCounterStep::Jump(_) = step {
            step.distance()
        } else {
            self.program_counter + step.distance()
        };

        if pointer + 1 >= memory::SIZE {
            return Err(OpcodeError::MemoryOutOfBounds {
                pointer,
                len: memory::SIZE,
            }
            .into());
        }

        self.program_counter = pointer;
        Ok(())
    }

    /// Will check an opcode-driven memory access of `len` bytes
    /// starting at `from` against the ram size.
    pub(super) fn memory_range(&self, from: usize, len: usize) -> Result<Range<usize>, ProcessError> {
        if from + len > memory::SIZE {
            Err(OpcodeError::MemoryOutOfBounds {
                pointer: from,
                len: memory::SIZE,
            }
            .into())
        } else {
            Ok(from..(from + len))
        }
    }

    /// Will push the current pointer to the stack
    pub(super) fn push_stack(&mut self, pointer: usize) -> Result<(), StackError> {
        if self.stack.len() == cpu::stack::SIZE {
            Err(StackError::Full)
        } else {
            self.stack.push(pointer);
            Ok(())
        }
    }

    /// Will pop the last pointer from the stack
    pub(super) fn pop_stack(&mut self) -> Result<usize, StackError> {
        self.stack.pop().ok_or(StackError::Empty)
    }

    /// Will count both timers down by one, saturating at zero.
    ///
    /// Driven by the scheduler once per cycle, independent of the
    /// instruction rate.
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// Will write the keyboard snapshot into the internal latch.
    pub fn set_keyboard(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keyboard.set_keys(keys);
    }

    /// Will get the current state of the keyboard
    pub fn get_keyboard(&self) -> &[bool] {
        self.keyboard.get_keys()
    }

    /// Will return an immutable view of the framebuffer cells
    pub fn get_framebuffer(&self) -> &[bool] {
        &self.framebuffer
    }

    /// will return the delay timer
    pub fn get_delay_timer(&self) -> u8 {
        self.delay_timer
    }

    /// will return the sound timer
    pub fn get_sound_timer(&self) -> u8 {
        self.sound_timer
    }

    /// will return the name of the loaded rom
    pub fn get_name(&self) -> &str {
        &self.name
    }
}
