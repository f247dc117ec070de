//! Filling a memory block from ASCII hex sent over the console.

use log::trace;

use crate::blocks::BlockStore;
use crate::error::Error;

/// Value of a hex digit, letters in either case, anything else counts as 0
pub fn hex_value(c: u8) -> u8 {
    (c as char).to_digit(16).unwrap_or(0) as u8
}

/// Progress of a block upload, two hex characters per byte
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Upload {
    id: usize,
    size: usize,
    offset: usize,
    high: Option<u8>,
}

impl Upload {
    pub fn new(id: usize, size: usize) -> Self {
        Self {
            id,
            size,
            offset: 0,
            high: None,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Bytes written so far
    pub fn written(&self) -> usize {
        self.offset
    }

    pub fn is_complete(&self) -> bool {
        self.offset >= self.size
    }

    /// Feed one hex character, every second one stores a byte
    pub fn feed(&mut self, c: u8, store: &mut BlockStore) -> Result<(), Error> {
        if self.is_complete() {
            return Ok(());
        }

        match self.high.take() {
            None => self.high = Some(hex_value(c)),
            Some(high) => {
                store.write_byte(self.id, self.offset, high << 4 | hex_value(c))?;
                self.offset += 1;
                if self.offset & 0xFFFF == 0 {
                    trace!("memblock {}: {}/{} bytes", self.id, self.offset, self.size);
                }
            }
        }
        Ok(())
    }
}
