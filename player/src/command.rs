//! Console commands
//!
//! A command line is a name followed by an optional argument string. `memset`
//! and `play` take `-`-separated operands made of a letter followed by an
//! integer, e.g. `memset -d0-s44` or `memset -d 0 -s 44`.
//!
//! Examples:
//! ```
//! use player::command::{Command, Invocation};
//!
//! let invocation = Invocation::split("  play -a1").unwrap();
//! assert_eq!(
//!     Command::parse(invocation),
//!     Ok(Command::Play { audio: Some(1), video: None }),
//! );
//! ```

use core::fmt;

use heapless::{consts::U8, Vec};

use crate::error::Error;

/// A command line split into its name and raw arguments
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Invocation<'a> {
    pub name: &'a str,
    pub args: &'a str,
}

impl<'a> Invocation<'a> {
    /// Split `line` at the first space after the name, `None` for a blank line
    pub fn split(line: &'a str) -> Option<Self> {
        let line = line.trim_start_matches(' ');
        if line.is_empty() {
            return None;
        }
        let (name, args) = match line.find(' ') {
            Some(at) => (&line[..at], &line[at + 1..]),
            None => (line, ""),
        };
        Some(Self { name, args })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Write the arguments back
    Echo(&'a str),
    /// Allocate block `id` and fill it with `size` bytes sent as hex
    Memset { id: usize, size: usize },
    /// Start streaming, an omitted source leaves its engine idle
    Play {
        audio: Option<usize>,
        video: Option<usize>,
    },
    /// Stop both engines
    Stop,
}

/// A single operand token that could not be understood
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OperandError<'a> {
    pub command: &'static str,
    pub token: &'a str,
    pub kind: Error,
}

impl<'a> fmt::Display for OperandError<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Error::InvalidValue => write!(f, "{}: invalid value in '{}'", self.command, self.token),
            _ => write!(f, "{}: unrecognized operand '{}'", self.command, self.token),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandError<'a> {
    UnknownCommand(&'a str),
    /// Every bad operand of the line, parsing goes on after the first one
    Operands(Vec<OperandError<'a>, U8>),
}

impl<'a> Command<'a> {
    pub fn parse(invocation: Invocation<'a>) -> Result<Self, CommandError<'a>> {
        match invocation.name {
            "echo" => Ok(Command::Echo(invocation.args)),
            "memset" => {
                let mut id = 0;
                let mut size = 0;
                parse_operands("memset", invocation.args, |letter, value| {
                    match letter {
                        'd' => id = value,
                        's' => size = value,
                        _ => return None,
                    }
                    Some(())
                })?;
                Ok(Command::Memset { id, size })
            }
            "play" => {
                let mut audio = None;
                let mut video = None;
                parse_operands("play", invocation.args, |letter, value| {
                    match letter {
                        'a' => audio = Some(value),
                        'v' => video = Some(value),
                        _ => return None,
                    }
                    Some(())
                })?;
                Ok(Command::Play { audio, video })
            }
            "stop" => Ok(Command::Stop),
            name => Err(CommandError::UnknownCommand(name)),
        }
    }
}

/// Walk over `-`-separated operands, handing each letter and value to
/// `assign`, which returns `None` for letters it does not know
fn parse_operands<'a, F>(command: &'static str, args: &'a str, mut assign: F) -> Result<(), CommandError<'a>>
where
    F: FnMut(char, usize) -> Option<()>,
{
    let mut errors = Vec::new();

    for token in args.split('-').filter(|token| !token.trim().is_empty()) {
        let letter = token.chars().next().unwrap_or(' ');
        let kind = match operand_value(&token[letter.len_utf8()..]) {
            Some(value) => match assign(letter, value) {
                Some(()) => continue,
                None => Error::UnrecognizedOperand,
            },
            None if letter.is_ascii_alphabetic() => Error::InvalidValue,
            None => Error::UnrecognizedOperand,
        };
        // beyond capacity only the first errors are kept
        let _ = errors.push(OperandError {
            command,
            token: token.trim(),
            kind,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(CommandError::Operands(errors))
    }
}

/// Leading decimal integer, surrounding blanks allowed, trailing junk ignored
fn operand_value(raw: &str) -> Option<usize> {
    let raw = raw.trim_start();
    let end = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or_else(|| raw.len());
    raw[..end].parse().ok()
}
