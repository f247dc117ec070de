//! Audio Streaming Engine
//!
//! Streams PCM frames from a memory block into the DAC FIFO. The block starts
//! with a 40-byte WAV-like header of which only three fields are used:
//!
//! | offset | size | field           |
//! |--------|------|-----------------|
//! | 22     | 2    | channels        |
//! | 24     | 4    | sample rate     |
//! | 34     | 2    | bits per sample |
//!
//! All fields are little-endian, samples follow the header directly.

use core::convert::TryFrom;

use log::{debug, info, warn};

use crate::blocks::BlockStore;
use crate::context::Dac;
use crate::cursor::Cursor;
use crate::error::Error;
use crate::stream::{Phase, Tick};

pub const HEADER_LEN: usize = 40;

const CHANNELS_OFFSET: usize = 22;
const BITS_PER_SAMPLE_OFFSET: usize = 34;

/// Bias turning signed 16-bit PCM into the DAC's unsigned samples
const SIGNED_BIAS: u16 = 0x8000;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Format {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl Format {
    /// Parse the header at the start of `block`
    pub fn parse(block: &[u8]) -> Result<Self, Error> {
        if block.len() < HEADER_LEN {
            return Err(Error::InvalidHeader);
        }

        let mut cursor = Cursor::new(block);
        cursor
            .seek(CHANNELS_OFFSET)
            .map_err(|_| Error::InvalidHeader)?;
        let channels = cursor.read_u16_le().ok_or(Error::InvalidHeader)?;
        let sample_rate = cursor.read_u32_le().ok_or(Error::InvalidHeader)?;
        cursor
            .seek(BITS_PER_SAMPLE_OFFSET)
            .map_err(|_| Error::InvalidHeader)?;
        let bits_per_sample = cursor.read_u16_le().ok_or(Error::InvalidHeader)?;

        let format = Self {
            channels,
            sample_rate,
            bits_per_sample,
        };

        match (channels, bits_per_sample) {
            (1, 8) | (1, 16) | (2, 8) | (2, 16) if sample_rate > 0 => Ok(format),
            _ => Err(Error::InvalidHeader),
        }
    }

    pub fn bytes_per_sample(&self) -> usize {
        usize::from(self.bits_per_sample / 8)
    }

    /// Bytes consumed per emitted left/right pair
    pub fn frame_len(&self) -> usize {
        usize::from(self.channels) * self.bytes_per_sample()
    }

    /// DAC divider producing `sample_rate` out of `clock_frequency`
    pub fn clock_divider(&self, clock_frequency: u32) -> u16 {
        let divider = clock_frequency / self.sample_rate.max(1);
        u16::try_from(divider).unwrap_or_else(|_| {
            warn!(
                "sample rate {}Hz is too low, clock divider saturated",
                self.sample_rate
            );
            u16::MAX
        })
    }

    fn sample(&self, bytes: &[u8]) -> u16 {
        if self.bits_per_sample == 8 {
            u16::from(bytes[0]) << 8
        } else {
            u16::from_le_bytes([bytes[0], bytes[1]]).wrapping_add(SIGNED_BIAS)
        }
    }

    /// Convert one frame of `frame_len` bytes into a DAC sample pair
    pub fn decode_frame(&self, frame: &[u8]) -> (u16, u16) {
        let width = self.bytes_per_sample();
        let left = self.sample(&frame[..width]);
        let right = if self.channels == 2 {
            self.sample(&frame[width..])
        } else {
            left
        };
        (left, right)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct AudioStreamState {
    pub source: Option<usize>,
    /// Byte offset of the next frame inside the source block
    pub cursor: usize,
    pub format: Format,
    pub phase: Phase,
}

pub struct AudioEngine {
    clock_frequency: u32,
    state: AudioStreamState,
}

impl AudioEngine {
    pub fn new(clock_frequency: u32) -> Self {
        Self {
            clock_frequency,
            state: AudioStreamState::default(),
        }
    }

    pub fn state(&self) -> &AudioStreamState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    /// Block being read while the engine is active
    pub fn source(&self) -> Option<usize> {
        match self.state.phase {
            Phase::Idle => None,
            _ => self.state.source,
        }
    }

    /// Start streaming from block `source`, `None` leaves the engine idle
    pub fn activate(&mut self, source: Option<usize>) {
        self.state = AudioStreamState {
            source,
            phase: if source.is_some() {
                Phase::Initializing
            } else {
                Phase::Idle
            },
            ..AudioStreamState::default()
        };
    }

    /// Return to idle immediately, samples already queued in the DAC play out
    pub fn stop(&mut self) {
        self.state = AudioStreamState::default();
    }

    pub fn tick<D: Dac + ?Sized>(&mut self, store: &BlockStore, dac: &mut D) -> Tick {
        let source = match (self.state.phase, self.state.source) {
            (Phase::Idle, _) | (_, None) => return Tick::Idle,
            (_, Some(source)) => source,
        };

        let block = match store.get(source) {
            Some(block) => block,
            None => {
                warn!("audio source memblock {} is not set", source);
                self.stop();
                return Tick::Ended;
            }
        };

        match self.state.phase {
            Phase::Initializing => self.initialize(block, dac),
            _ => self.stream(block, dac),
        }
    }

    fn initialize<D: Dac + ?Sized>(&mut self, block: &[u8], dac: &mut D) -> Tick {
        let format = match Format::parse(block) {
            Ok(format) => format,
            Err(err) => {
                warn!("audio: {}", err);
                self.stop();
                return Tick::Ended;
            }
        };

        info!(
            "num: {}, samplerate: {}, bits: {}",
            format.channels, format.sample_rate, format.bits_per_sample
        );
        dac.set_clock_divider(format.clock_divider(self.clock_frequency));

        self.state.format = format;
        self.state.cursor = HEADER_LEN;
        self.state.phase = Phase::Streaming;
        Tick::Busy
    }

    fn stream<D: Dac + ?Sized>(&mut self, block: &[u8], dac: &mut D) -> Tick {
        let format = self.state.format;
        let frame_len = format.frame_len();
        let mut cursor = Cursor::at(block, self.state.cursor);

        for _ in 0..dac.available() {
            match cursor.take(frame_len) {
                Some(frame) => {
                    let (left, right) = format.decode_frame(frame);
                    dac.write_sample(left, right);
                }
                None => break,
            }
        }
        self.state.cursor = cursor.offset();

        if cursor.remaining() < frame_len {
            debug!("audio stream ended at offset {}", cursor.offset());
            self.stop();
            Tick::Ended
        } else {
            Tick::Busy
        }
    }
}
