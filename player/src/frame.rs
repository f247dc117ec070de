use bitvec::prelude::*;
#[cfg(feature = "embedded-graphics")]
use embedded_graphics::{
    drawable::{Drawable, Pixel},
    geometry::Point,
    pixelcolor::BinaryColor,
    DrawTarget,
};

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;
pub const PIXELS: usize = WIDTH * HEIGHT;
/// Pixels packed into a single FIFO word
pub const PIXELS_PER_WORD: usize = 32;
pub const FRAME_WORDS: usize = PIXELS / PIXELS_PER_WORD;

/// Monochrome frame packed one bit per pixel into 32-bit words
///
/// Pixels are stored row after row, pixel `n` of the frame lives in word
/// `n / 32` at bit `n % 32` counting from the least significant bit. This is
/// the layout the video generator shifts out of its FIFO.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Frame([u32; FRAME_WORDS]);

/// A shared view over a `Frame`
///
/// #Note:
/// Implements `Drawable` with `embedded-graphics` feature on.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct FrameView<'a>(&'a [u32; FRAME_WORDS]);

impl<'a> FrameView<'a> {
    /// View the packed words of a frame
    pub fn as_words(&self) -> &'a [u32] {
        &self.0[..]
    }

    /// Access frame's bits by indexes
    pub fn get_bit(&self, x: usize, y: usize) -> Option<bool> {
        if x < WIDTH {
            self.as_bits().get(y * WIDTH + x).copied()
        } else {
            None
        }
    }

    pub fn as_bits(&self) -> &'a BitSlice<Lsb0, u32> {
        self.0[..].view_bits::<Lsb0>()
    }

    /// Get iterator over rows in a form of a `BitSlice`s
    pub fn iter_rows_as_bitslices(&self) -> impl Iterator<Item = &'a BitSlice<Lsb0, u32>> {
        self.as_bits().chunks(WIDTH)
    }

    /// Iterate over every pixel of the frame, row by row
    #[cfg(feature = "embedded-graphics")]
    pub fn pixels(&self) -> impl Iterator<Item = Pixel<BinaryColor>> + 'a {
        self.iter_rows_as_bitslices()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter().enumerate().map(move |(x, &bit)| {
                    let color = if bit { BinaryColor::On } else { BinaryColor::Off };
                    Pixel(Point::new(x as i32, y as i32), color)
                })
            })
    }
}

#[cfg(feature = "embedded-graphics")]
impl<'a> Drawable<BinaryColor> for FrameView<'a> {
    fn draw<D: DrawTarget<BinaryColor>>(self, display: &mut D) -> Result<(), D::Error> {
        display.draw_iter(self.pixels())
    }
}

impl Frame {
    pub fn new() -> Self {
        Self([0; FRAME_WORDS])
    }

    /// Get view over frame
    pub fn view(&self) -> FrameView<'_> {
        FrameView(&self.0)
    }

    pub fn clear(&mut self) {
        self.0.iter_mut().for_each(|word| *word = 0);
    }

    /// Mutable bits of row `y`
    pub(crate) fn row_mut(&mut self, y: usize) -> Option<&mut BitSlice<Lsb0, u32>> {
        if y < HEIGHT {
            Some(&mut self.0[..].view_bits_mut::<Lsb0>()[y * WIDTH..(y + 1) * WIDTH])
        } else {
            None
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl Frame {
    pub(crate) fn as_words_mut(&mut self) -> &mut [u32] {
        &mut self.0
    }
}

#[cfg(test)]
mod frame_test {
    use super::*;

    #[test]
    fn get_bit() {
        let mut frame = Frame::new();
        frame.as_words_mut()[0] = 0b0000_0001;
        frame.as_words_mut()[WIDTH / PIXELS_PER_WORD] = 0b0000_0010;

        assert_eq!(frame.view().get_bit(0, 0), Some(true));
        assert_eq!(frame.view().get_bit(1, 0), Some(false));
        assert_eq!(frame.view().get_bit(0, 1), Some(false));
        assert_eq!(frame.view().get_bit(1, 1), Some(true));
        assert_eq!(frame.view().get_bit(WIDTH, 0), None);
        assert_eq!(frame.view().get_bit(0, HEIGHT), None);
    }

    #[test]
    fn row_mut_covers_one_row() {
        let mut frame = Frame::new();
        frame.row_mut(1).unwrap().set_all(true);

        let lit = frame.view().as_bits().count_ones();
        assert_eq!(lit, WIDTH);
        assert_eq!(frame.view().get_bit(0, 1), Some(true));
        assert_eq!(frame.view().get_bit(WIDTH - 1, 1), Some(true));
        assert_eq!(frame.view().get_bit(0, 2), Some(false));
        assert!(frame.row_mut(HEIGHT).is_none());

        frame.clear();
        assert_eq!(frame.view().as_bits().count_ones(), 0);
    }

    #[cfg(feature = "embedded-graphics")]
    #[test]
    fn pixels_follow_bits() {
        let mut frame = Frame::new();
        frame.as_words_mut()[0] = 0b101;

        let lit: alloc::vec::Vec<_> = frame
            .view()
            .pixels()
            .filter(|Pixel(_, color)| *color == BinaryColor::On)
            .map(|Pixel(point, _)| (point.x, point.y))
            .collect();
        assert_eq!(lit, [(0, 0), (2, 0)]);
        assert_eq!(frame.view().pixels().count(), PIXELS);
    }
}
