//! Alternating two-level run-length code used for video rows.
//!
//! A row is a sequence of byte-sized run lengths. Runs alternate between
//! background (bit clear) and foreground (bit set), always starting with
//! background, until they cover the row width. A run can not be longer than
//! 255 pixels, longer spans are split by a zero-length run of the other
//! colour. There is no frame header, frames are simply `HEIGHT` rows each.

use alloc::vec::Vec;

use bitvec::prelude::*;

use crate::cursor::Cursor;

/// Longest run a single byte can express
pub const MAX_RUN: u8 = u8::MAX;

/// The source ran out of bytes in the middle of a row
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Truncated;

/// Decode one row from `cursor` into `row`, the row width is `row.len()`
///
/// A run crossing the end of the row is clipped to it. On `Truncated` the
/// cursor is left where the row started.
pub fn decode_row(cursor: &mut Cursor<'_>, row: &mut BitSlice<Lsb0, u32>) -> Result<(), Truncated> {
    let mut input = *cursor;
    let width = row.len();
    let mut x = 0;
    let mut foreground = false;

    while x < width {
        let run = input.read_u8().ok_or(Truncated)? as usize;
        let end = (x + run).min(width);
        row[x..end].set_all(foreground);
        x = end;
        foreground = !foreground;
    }

    *cursor = input;
    Ok(())
}

/// Encode a row of pixels, `true` meaning foreground
pub fn encode_row<I>(pixels: I, out: &mut Vec<u8>)
where
    I: IntoIterator<Item = bool>,
{
    let mut foreground = false;
    let mut count = 0u8;

    for pixel in pixels {
        if pixel == foreground {
            count += 1;
            if count == MAX_RUN {
                out.push(count);
                count = 0;
                foreground = !foreground;
            }
        } else {
            out.push(count);
            count = 1;
            foreground = !foreground;
        }
    }

    if count > 0 {
        out.push(count);
    }
}
