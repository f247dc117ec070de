//! Line editor for the serial command console.

use heapless::{consts::U64, String};

use crate::context::Serial;

pub type Line = String<U64>;

const BACKSPACE: u8 = 8;
const DELETE: u8 = 127;
const BELL: u8 = 0x07;

pub struct Console {
    line: Line,
    echo: bool,
}

impl Console {
    pub fn new(echo: bool) -> Self {
        Self {
            line: String::new(),
            echo,
        }
    }

    /// Partially typed line
    pub fn pending(&self) -> &str {
        self.line.as_str()
    }

    /// Take at most one byte from `serial` and feed it to the editor
    pub fn poll<S: Serial + ?Sized>(&mut self, serial: &mut S) -> Option<Line> {
        match serial.read() {
            Ok(byte) => self.feed(byte, serial),
            Err(nb::Error::WouldBlock) => None,
            Err(nb::Error::Other(never)) => match never {},
        }
    }

    /// Handle one received byte, returns the line once it is terminated
    pub fn feed<S: Serial + ?Sized>(&mut self, byte: u8, serial: &mut S) -> Option<Line> {
        match byte {
            BACKSPACE | DELETE => {
                if self.line.pop().is_some() {
                    self.echo(byte, serial);
                }
                None
            }
            b'\n' | b'\r' => {
                serial.write(b'\n');
                Some(core::mem::replace(&mut self.line, String::new()))
            }
            _ => {
                if self.line.push(byte as char).is_ok() {
                    self.echo(byte, serial);
                } else {
                    serial.write(BELL);
                }
                None
            }
        }
    }

    fn echo<S: Serial + ?Sized>(&self, byte: u8, serial: &mut S) {
        if self.echo {
            serial.write(byte);
        }
    }
}
