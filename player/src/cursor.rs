//! Bounds-checked reading position inside a memory block.
//!
//! Engines keep only the offset between ticks and rebuild a `Cursor` over the
//! block contents on every tick, so a cursor can never outlive the buffer it
//! walks over.

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Resume at `offset`, clamped to the end of `data`
    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self {
            data,
            offset: offset.min(data.len()),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_at_end(&self) -> bool {
        self.remaining() == 0
    }

    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    /// Consume `n` bytes, or nothing at all if fewer than `n` are left
    pub fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(n)?;
        let bytes = self.data.get(self.offset..end)?;
        self.offset = end;
        Some(bytes)
    }

    pub fn read_u8(&mut self) -> Option<u8> {
        self.take(1).map(|b| b[0])
    }

    pub fn read_u16_le(&mut self) -> Option<u16> {
        self.take(2).map(|b| u16::from_le_bytes([b[0], b[1]]))
    }

    pub fn read_u32_le(&mut self) -> Option<u32> {
        self.take(4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Move to an absolute offset
    pub fn seek(&mut self, offset: usize) -> Result<(), &'static str> {
        if offset <= self.data.len() {
            self.offset = offset;
            Ok(())
        } else {
            Err("Attempted to seek past the end of the block")
        }
    }
}
