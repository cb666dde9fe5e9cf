//! The thin terminal wrappers around the display and input
//! collaborator traits.

use std::collections::HashMap;
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyModifiers},
    style::Print,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand, QueueableCommand,
};

use chip::definitions::{display, keyboard};
use chip::devices::{DisplayCommands, InputRefresh, KeyboardCommands};

/// the keymap of the original hex keypad, laid over the left-hand
/// side of a qwerty keyboard
const KEYMAP: [(char, usize); keyboard::SIZE] = [
    ('1', 0x1),
    ('2', 0x2),
    ('3', 0x3),
    ('4', 0xC),
    ('q', 0x4),
    ('w', 0x5),
    ('e', 0x6),
    ('r', 0xD),
    ('a', 0x7),
    ('s', 0x8),
    ('d', 0x9),
    ('f', 0xE),
    ('z', 0xA),
    ('x', 0x0),
    ('c', 0xB),
    ('v', 0xF),
];

/// how long a key press stays latched
///
/// Terminals report no key release events, so a pressed key decays
/// after a short hold instead.
const KEY_HOLD: Duration = Duration::from_millis(150);

/// Renders the framebuffer as block characters on the alternate
/// screen.
pub struct TerminalDisplay {
    out: Stdout,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        out.execute(EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        Ok(Self { out })
    }
}

impl Drop for TerminalDisplay {
    /// restores the terminal no matter how the machine went down
    fn drop(&mut self) {
        let _ = self.out.execute(cursor::Show);
        let _ = self.out.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

impl DisplayCommands for TerminalDisplay {
    fn draw(&mut self, pixels: &[bool]) {
        let res: io::Result<()> = (|| {
            for (row, line) in pixels.chunks(display::WIDTH).enumerate() {
                let rendered: String = line
                    .iter()
                    .map(|&cell| if cell { '█' } else { ' ' })
                    .collect();
                self.out.queue(cursor::MoveTo(0, row as u16))?;
                self.out.queue(Print(rendered))?;
            }
            self.out.flush()
        })();

        if let Err(err) = res {
            log::error!("unable to draw the frame: {}", err);
        }
    }
}

/// Samples the terminal for key events and presents them as the
/// sixteen key states of the hex keypad.
pub struct TerminalKeyboard {
    keymap: HashMap<char, usize>,
    pressed_at: [Option<Instant>; keyboard::SIZE],
}

impl TerminalKeyboard {
    pub fn new() -> Self {
        Self {
            keymap: KEYMAP.iter().copied().collect(),
            pressed_at: [None; keyboard::SIZE],
        }
    }

    /// drains all pending terminal events, returns true on a quit
    /// request (Esc or Ctrl-C)
    fn drain_events(&mut self) -> io::Result<bool> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Esc => return Ok(true),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Char(pressed) => {
                        if let Some(&mapped) = self.keymap.get(&pressed) {
                            self.pressed_at[mapped] = Some(Instant::now());
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(false)
    }
}

impl KeyboardCommands for TerminalKeyboard {
    fn refresh(&mut self) -> InputRefresh {
        match self.drain_events() {
            Ok(true) => return InputRefresh::Quit,
            Ok(false) => {}
            Err(err) => {
                log::error!("unable to read input events: {}", err);
                return InputRefresh::Quit;
            }
        }

        let now = Instant::now();
        let mut keys = [false; keyboard::SIZE];
        for (key, pressed_at) in keys.iter_mut().zip(self.pressed_at.iter_mut()) {
            match *pressed_at {
                Some(at) if now.duration_since(at) < KEY_HOLD => *key = true,
                Some(_) => *pressed_at = None,
                None => {}
            }
        }
        InputRefresh::Keys(keys)
    }
}
