use volatile_register::{RW, WO};

#[repr(C)]
pub struct Registers {
    /// One packed word of 32 pixels
    pub fifo: WO<u32>,
    /// read: bits 0-15 free FIFO words, bit 16 vertical sync. Writing 0
    /// drops the queued words.
    pub status: RW<u32>,
    /// `clock << 8 | horizontal << 4 | vertical` dividers
    pub clock: WO<u32>,
}

/// Monochrome video generator
pub struct VideoOut {
    regs: &'static mut Registers,
}

impl VideoOut {
    /// # Safety
    ///
    /// `base` must be the address of the video generator and no other handle
    /// to it may exist
    pub unsafe fn new(base: usize) -> Self {
        Self {
            regs: &mut *(base as *mut Registers),
        }
    }

    pub fn status(&self) -> u32 {
        self.regs.status.read()
    }

    pub fn write_word(&mut self, word: u32) {
        unsafe { self.regs.fifo.write(word) }
    }

    pub fn clear_fifo(&mut self) {
        unsafe { self.regs.status.write(0) }
    }

    pub fn set_clock(&mut self, dividers: u32) {
        unsafe { self.regs.clock.write(dividers) }
    }
}
