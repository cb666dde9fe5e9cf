use std::env;
use std::process;

use chip::{chip8::ChipSet, resources::Rom};

use frontend::{TerminalDisplay, TerminalKeyboard};

mod frontend;

fn main() {
    let mut args = env::args().skip(1);
    let path = match (args.next(), args.next()) {
        (Some(path), None) => path,
        _ => {
            eprintln!("Usage: chip8 <program>");
            process::exit(2);
        }
    };

    let rom = match Rom::from_file(&path) {
        Ok(rom) => rom,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let display = match TerminalDisplay::new() {
        Ok(display) => display,
        Err(err) => {
            eprintln!("Unable to set up the terminal: {}", err);
            process::exit(1);
        }
    };
    let keyboard = TerminalKeyboard::new();

    if let Err(err) = chip::run(ChipSet::new(rom), display, keyboard) {
        // display goes out of scope inside run, the terminal is
        // restored before this prints
        eprintln!("{}", err);
        process::exit(1);
    }
}
