//! The per-instruction state transitions.

use crate::{
    definitions::{cpu::register, display},
    opcode::{Instruction, Operation, ProgramCounterStep},
    ProcessError,
};

use super::chipset::{ChipSet, Mode};

impl ChipSet {
    /// Executes a single decoded instruction against the machine
    /// state and reports how the program counter shall move and
    /// whether the framebuffer got dirty.
    pub(super) fn execute(
        &mut self,
        instruction: Instruction,
    ) -> Result<(ProgramCounterStep, Operation), ProcessError> {
        log::trace!("opcode {:#06X} at {:#06X}", self.opcode, self.program_counter);

        let mut operation = Operation::None;
        let step = match instruction {
            Instruction::Clear => {
                for cell in self.framebuffer.iter_mut() {
                    *cell = false;
                }
                operation = Operation::Draw;
                ProgramCounterStep::Next
            }
            Instruction::Return => {
                let pointer = self.pop_stack()?;
                log::debug!("returning to {:#06X}", pointer);
                ProgramCounterStep::Jump(pointer)
            }
            Instruction::Jump { nnn } => ProgramCounterStep::Jump(nnn),
            Instruction::Call { nnn } => {
                // store the address of the instruction following the
                // call, so the return lands behind it
                self.push_stack(self.program_counter + ProgramCounterStep::Next.distance())?;
                ProgramCounterStep::Jump(nnn)
            }
            Instruction::SkipEqConst { x, nn } => {
                ProgramCounterStep::cond(self.registers[x] == nn)
            }
            Instruction::SkipNeConst { x, nn } => {
                ProgramCounterStep::cond(self.registers[x] != nn)
            }
            Instruction::SkipEqReg { x, y } => {
                ProgramCounterStep::cond(self.registers[x] == self.registers[y])
            }
            Instruction::LoadConst { x, nn } => {
                self.registers[x] = nn;
                ProgramCounterStep::Next
            }
            Instruction::AddConst { x, nn } => {
                // let VX overflow, but ignore carry
                self.registers[x] = self.registers[x].wrapping_add(nn);
                ProgramCounterStep::Next
            }
            Instruction::Assign { x, y } => {
                self.registers[x] = self.registers[y];
                ProgramCounterStep::Next
            }
            Instruction::Or { x, y } => {
                self.registers[x] |= self.registers[y];
                ProgramCounterStep::Next
            }
            Instruction::And { x, y } => {
                self.registers[x] &= self.registers[y];
                ProgramCounterStep::Next
            }
            Instruction::Xor { x, y } => {
                self.registers[x] ^= self.registers[y];
                ProgramCounterStep::Next
            }
            Instruction::Add { x, y } => {
                let (res, carry) = self.registers[x].overflowing_add(self.registers[y]);
                self.registers[x] = res;
                self.registers[register::LAST] = carry.into();
                ProgramCounterStep::Next
            }
            Instruction::Sub { x, y } => {
                // VF is 1 when there is no borrow, so only on a
                // strictly larger VX
                let no_borrow = self.registers[x] > self.registers[y];
                self.registers[x] = self.registers[x].wrapping_sub(self.registers[y]);
                self.registers[register::LAST] = no_borrow.into();
                ProgramCounterStep::Next
            }
            Instruction::ShiftRight { x } => {
                self.registers[register::LAST] = self.registers[x] & 1;
                self.registers[x] >>= 1;
                ProgramCounterStep::Next
            }
            Instruction::SubInv { x, y } => {
                let no_borrow = self.registers[y] > self.registers[x];
                self.registers[x] = self.registers[y].wrapping_sub(self.registers[x]);
                self.registers[register::LAST] = no_borrow.into();
                ProgramCounterStep::Next
            }
            Instruction::ShiftLeft { x } => {
                self.registers[register::LAST] = self.registers[x] >> 7;
                self.registers[x] <<= 1;
                ProgramCounterStep::Next
            }
            Instruction::SkipNeReg { x, y } => {
                ProgramCounterStep::cond(self.registers[x] != self.registers[y])
            }
            Instruction::LoadIndex { nnn } => {
                self.index_register = nnn;
                ProgramCounterStep::Next
            }
            Instruction::JumpOffset { nnn } => {
                ProgramCounterStep::Jump(self.registers[0] as usize + nnn)
            }
            Instruction::Random { x, nn } => {
                // using a fill_bytes call here, as the trait RngCore
                // does not support a random u8 directly
                let mut rand: [u8; 1] = [0];
                self.rng.fill_bytes(&mut rand);
                self.registers[x] = rand[0] & nn;
                ProgramCounterStep::Next
            }
            Instruction::Draw { x, y, n } => {
                operation = self.draw_sprite(x, y, n)?;
                ProgramCounterStep::Next
            }
            Instruction::SkipKeyPressed { x } => {
                ProgramCounterStep::cond(self.keyboard.is_pressed(self.registers[x] as usize))
            }
            Instruction::SkipKeyNotPressed { x } => {
                ProgramCounterStep::cond(!self.keyboard.is_pressed(self.registers[x] as usize))
            }
            Instruction::GetDelayTimer { x } => {
                self.registers[x] = self.delay_timer;
                ProgramCounterStep::Next
            }
            Instruction::AwaitKey { x } => {
                match self.keyboard.first_pressed() {
                    Some(key) => {
                        self.registers[x] = key as u8;
                        ProgramCounterStep::Next
                    }
                    None => {
                        // park on this instruction until a key shows
                        // up, nothing gets fetched in the meantime
                        self.mode = Mode::AwaitingKey { x };
                        ProgramCounterStep::None
                    }
                }
            }
            Instruction::SetDelayTimer { x } => {
                self.delay_timer = self.registers[x];
                ProgramCounterStep::Next
            }
            Instruction::SetSoundTimer { x } => {
                self.sound_timer = self.registers[x];
                ProgramCounterStep::Next
            }
            Instruction::AddToIndex { x } => {
                // I is a 16-bit register, no flag is set on overflow
                self.index_register =
                    (self.index_register + self.registers[x] as usize) & 0xFFFF;
                ProgramCounterStep::Next
            }
            Instruction::LoadSprite { x } => {
                let val = self.registers[x] as usize;
                self.index_register =
                    display::fontset::LOCATION + display::fontset::GLYPH_SIZE * val;
                ProgramCounterStep::Next
            }
            Instruction::StoreBcd { x } => {
                let range = self.memory_range(self.index_register, 3)?;
                let val = self.registers[x];
                self.memory[range.start] = val / 100; // 246u8 / 100 => 2
                self.memory[range.start + 1] = val / 10 % 10; // 246u8 / 10 => 24 % 10 => 4
                self.memory[range.start + 2] = val % 10; // 246u8 % 10 => 6
                ProgramCounterStep::Next
            }
            Instruction::StoreRegisters { x } => {
                // stores V0 to VX (including VX), I is left unmodified
                let range = self.memory_range(self.index_register, x + 1)?;
                self.memory[range].copy_from_slice(&self.registers[..=x]);
                ProgramCounterStep::Next
            }
            Instruction::LoadRegisters { x } => {
                // fills V0 to VX (including VX), I is left unmodified
                let range = self.memory_range(self.index_register, x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[range]);
                ProgramCounterStep::Next
            }
        };

        Ok((step, operation))
    }

    /// Draws the 8xN sprite at `memory[I..I+N)` to `(VX, VY)`.
    ///
    /// Every set source bit XORs the target cell. The target index is
    /// calculated flat and wraps modulo the resolution, so sprites
    /// running off one edge reappear on the other. `VF` becomes `1`
    /// exactly when a set cell got flipped back to unset.
    fn draw_sprite(&mut self, x: usize, y: usize, n: usize) -> Result<Operation, ProcessError> {
        const SPRITE_WIDTH: usize = 8;

        let coord_x = self.registers[x] as usize;
        let coord_y = self.registers[y] as usize;

        self.registers[register::LAST] = 0;

        let rows = self.memory_range(self.index_register, n)?;
        for (row, addr) in rows.enumerate() {
            let sprite_byte = self.memory[addr];
            for col in 0..SPRITE_WIDTH {
                let mask = 0x80 >> col;
                if sprite_byte & mask == 0 {
                    continue;
                }

                let cell = (coord_x + col + (coord_y + row) * display::WIDTH)
                    % display::RESOLUTION;

                if self.framebuffer[cell] {
                    // collision, a set pixel gets flipped back
                    self.registers[register::LAST] = 1;
                }
                self.framebuffer[cell] ^= true;
            }
        }

        Ok(Operation::Draw)
    }
}
