//! The cycle scheduler driving the chipset.

use std::thread;

use crate::{
    chip8::ChipSet,
    definitions::cpu,
    devices::{DisplayCommands, InputRefresh, KeyboardCommands},
    opcode::Operation,
    ProcessError,
};

/// The outcome of a single scheduler cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    /// Keep the machine running.
    Continue,
    /// The input collaborator requested termination.
    Quit,
}

/// Drives the chipset until the input collaborator requests
/// termination or a fatal error occurs.
///
/// Each cycle executes a fixed batch of instructions, then counts the
/// timers down once and paces with a fixed wall-clock delay. The
/// ratio keeps the timers at their nominal real-time rate independent
/// of the instruction rate.
pub fn run<D, K>(mut chip: ChipSet, mut display: D, mut keyboard: K) -> Result<(), ProcessError>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    log::info!("running rom '{}'", chip.get_name());

    loop {
        if let Cycle::Quit = run_cycle(&mut chip, &mut display, &mut keyboard)? {
            log::info!("termination requested, shutting down");
            return Ok(());
        }
        thread::sleep(cpu::CYCLE_INTERVAL);
    }
}

/// Runs one scheduler cycle: a batch of steps, each preceded by an
/// input latch refresh and followed by a redraw if the framebuffer
/// got dirty, then a single timer tick.
pub fn run_cycle<D, K>(
    chip: &mut ChipSet,
    display: &mut D,
    keyboard: &mut K,
) -> Result<Cycle, ProcessError>
where
    D: DisplayCommands,
    K: KeyboardCommands,
{
    for _ in 0..cpu::INSTRUCTIONS_PER_CYCLE {
        match keyboard.refresh() {
            InputRefresh::Keys(keys) => chip.set_keyboard(&keys),
            InputRefresh::Quit => return Ok(Cycle::Quit),
        }

        if let Operation::Draw = chip.step()? {
            display.draw(chip.get_framebuffer());
        }
    }

    chip.tick_timers();
    Ok(Cycle::Continue)
}
