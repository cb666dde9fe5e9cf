use crate::definitions::keyboard;

/// The result of sampling the external input source once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRefresh {
    /// A complete snapshot of the sixteen key states.
    Keys([bool; keyboard::SIZE]),
    /// The input source requested process termination.
    Quit,
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for the display based code
pub trait DisplayCommands {
    /// Will display all of the pixels, one flat row-major cell per
    /// screen pixel
    fn draw(&mut self, pixels: &[bool]);
}

#[cfg_attr(test, mockall::automock)]
/// The trait responsible for collecting the keyboard data
pub trait KeyboardCommands {
    /// Samples the host input source once, returning a coherent
    /// snapshot of all key states or a termination request.
    ///
    /// Called once per cycle before fetch, so the chipset never sees
    /// a partial update mid-step.
    fn refresh(&mut self) -> InputRefresh;
}

/// The internal keyboard latch of the chipset.
///
/// Input is done with a hex keyboard that has 16 keys ranging `0-F`.
/// Three opcodes are used to detect input. One skips an instruction
/// if a specific key is pressed, while another does the same if a
/// specific key is not pressed. The third waits for a key press, and
/// then stores it in one of the data registers.
#[derive(Default, Debug)]
pub struct Keyboard {
    keys: [bool; keyboard::SIZE],
}

impl Keyboard {
    pub fn new() -> Self {
        Keyboard::default()
    }

    /// Will overwrite the latch with a full snapshot.
    pub fn set_keys(&mut self, keys: &[bool; keyboard::SIZE]) {
        self.keys.copy_from_slice(keys);
    }

    /// Will check if the given key is currently pressed.
    pub fn is_pressed(&self, key: usize) -> bool {
        debug_assert!(key < keyboard::SIZE);
        self.keys[key]
    }

    /// Will return the lowest-numbered currently pressed key, if any.
    pub fn first_pressed(&self) -> Option<usize> {
        self.keys.iter().position(|&pressed| pressed)
    }

    pub fn get_keys(&self) -> &[bool] {
        &self.keys
    }
}
