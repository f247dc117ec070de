use bit_field::BitField;
use volatile_register::{RW, WO};

#[repr(C)]
pub struct Registers {
    /// `left << 16 | right`
    pub sample: WO<u32>,
    /// write: divider in bits 16-31, read: free sample slots in bits 0-7
    pub control: RW<u32>,
}

/// Stereo audio DAC fed through a sample FIFO
pub struct AudioDac {
    regs: &'static mut Registers,
}

impl AudioDac {
    /// # Safety
    ///
    /// `base` must be the address of the audio DAC and no other handle to it
    /// may exist
    pub unsafe fn new(base: usize) -> Self {
        Self {
            regs: &mut *(base as *mut Registers),
        }
    }

    pub fn available(&self) -> u8 {
        self.regs.control.read().get_bits(0..8) as u8
    }

    /// Sample rate becomes the system clock divided by `divider`
    pub fn set_clock_divider(&mut self, divider: u16) {
        let mut control = 0u32;
        control.set_bits(16..32, u32::from(divider));
        unsafe { self.regs.control.write(control) }
    }

    pub fn write_sample(&mut self, left: u16, right: u16) {
        let mut sample = 0u32;
        sample.set_bits(16..32, u32::from(left));
        sample.set_bits(0..16, u32::from(right));
        unsafe { self.regs.sample.write(sample) }
    }
}
