use volatile_register::WO;

/// Output port wired to the board LEDs
pub struct Leds {
    out: &'static mut WO<u32>,
}

impl Leds {
    /// # Safety
    ///
    /// `base` must be the address of the LED port and no other handle to it
    /// may exist
    pub unsafe fn new(base: usize) -> Self {
        Self {
            out: &mut *(base as *mut WO<u32>),
        }
    }

    pub fn set(&mut self, value: u32) {
        unsafe { self.out.write(value) }
    }
}
