//! Memory Block Store
//!
//! A fixed array of independently sized byte buffers. Blocks are (re)filled
//! by the upload command and only read by the streaming engines.

use alloc::vec::Vec;

use log::{debug, trace};

use crate::error::Error;

/// Number of block slots
pub const BLOCK_COUNT: usize = 4;

pub struct BlockStore {
    blocks: [Vec<u8>; BLOCK_COUNT],
}

impl BlockStore {
    pub fn new() -> Self {
        Self {
            blocks: [Vec::new(), Vec::new(), Vec::new(), Vec::new()],
        }
    }

    fn check_id(id: usize) -> Result<(), Error> {
        if id < BLOCK_COUNT {
            Ok(())
        } else {
            Err(Error::OutOfRange {
                id,
                max: BLOCK_COUNT,
            })
        }
    }

    /// Replace block `id` by a zero-filled buffer of `size` bytes
    ///
    /// The previous buffer is released first. If the new one cannot be
    /// allocated the block is left unset, never partially filled.
    pub fn allocate(&mut self, id: usize, size: usize) -> Result<(), Error> {
        Self::check_id(id)?;
        self.release(id);

        let mut data = Vec::new();
        data.try_reserve_exact(size)
            .map_err(|_| Error::AllocFailure { size })?;
        data.resize(size, 0);
        self.blocks[id] = data;

        debug!("memblock {} allocated, {} bytes", id, size);
        Ok(())
    }

    /// Drop the contents of block `id`, leaving it unset
    pub fn release(&mut self, id: usize) {
        if let Some(block) = self.blocks.get_mut(id) {
            if !block.is_empty() {
                trace!("memblock {} released", id);
            }
            *block = Vec::new();
        }
    }

    pub fn write_byte(&mut self, id: usize, offset: usize, value: u8) -> Result<(), Error> {
        Self::check_id(id)?;
        let size = self.blocks[id].len();
        self.blocks[id]
            .get_mut(offset)
            .map(|byte| *byte = value)
            .ok_or(Error::OffsetOutOfRange { offset, size })
    }

    /// Borrow the contents of a block, `None` when it is unset or out of range
    pub fn get(&self, id: usize) -> Option<&[u8]> {
        self.blocks
            .get(id)
            .filter(|block| !block.is_empty())
            .map(|block| block.as_slice())
    }

    pub fn size(&self, id: usize) -> usize {
        self.blocks.get(id).map_or(0, |block| block.len())
    }

    pub fn is_set(&self, id: usize) -> bool {
        self.get(id).is_some()
    }
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}
