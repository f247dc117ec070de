use core::fmt;

use bit_field::BitField;
use volatile_register::RW;

/// Depth of the transmit FIFO, in characters
pub const FIFO_DEPTH: u32 = 64;

#[repr(C)]
pub struct Registers {
    /// bits 0-7 character, bit 15 set when the character is valid
    pub data: RW<u32>,
    /// bits 16-31 free space in the transmit FIFO
    pub control: RW<u32>,
}

/// JTAG UART, the operator console
pub struct JtagUart {
    regs: &'static mut Registers,
}

impl JtagUart {
    /// # Safety
    ///
    /// `base` must be the address of a JTAG UART. Handles may only be shared
    /// between code that never preempts each other, the console and the
    /// logger on a single hart without interrupts.
    pub unsafe fn new(base: usize) -> Self {
        Self {
            regs: &mut *(base as *mut Registers),
        }
    }

    /// Pop a received character, if there is one
    pub fn read(&mut self) -> Option<u8> {
        let data = self.regs.data.read();
        if data.get_bit(15) {
            Some(data.get_bits(0..8) as u8)
        } else {
            None
        }
    }

    pub fn write_space(&self) -> u32 {
        self.regs.control.read().get_bits(16..32)
    }

    /// Send a character once the transmit FIFO has fully drained
    pub fn write(&mut self, byte: u8) {
        while self.write_space() != FIFO_DEPTH {}
        unsafe { self.regs.data.write(u32::from(byte)) }
    }
}

impl fmt::Write for JtagUart {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.bytes().for_each(|b| self.write(b));
        Ok(())
    }
}
