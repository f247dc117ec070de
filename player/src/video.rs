//! Video Streaming Engine
//!
//! Two activities share every tick: decoding one run-length row into the
//! back buffer, and draining the front buffer into the generator's pixel
//! FIFO. They run at independent rates, the front buffer is only replaced by
//! freshly decoded content every `FRAME_DIVISOR + 1` displayed frames.
//!
//! Once the source runs out of rows, the last promoted frame is still shown
//! `FRAME_DIVISOR + 1` times before the engine returns to idle. A partially
//! decoded frame is never displayed.

use log::{debug, trace, warn};

use crate::blocks::BlockStore;
use crate::codec::{decode_row, Truncated};
use crate::context::{ClockDividers, VideoGenerator};
use crate::cursor::Cursor;
use crate::frame::{Frame, FrameView, PIXELS, PIXELS_PER_WORD, WIDTH};
use crate::stream::{Phase, Tick};

/// Displayed frames per promotion of the back buffer, minus one
pub const FRAME_DIVISOR: u32 = 3;

/// FIFO space assumed free right after a vertical sync
pub const VSYNC_BURST: u16 = 256;

/// Transmission batch sizes in words, largest first
const BATCHES: [usize; 3] = [16, 8, 4];

/// 640x480 timing, halved in both directions
pub const DIVIDERS: ClockDividers = ClockDividers {
    clock: 2,
    horizontal: 2,
    vertical: 2,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoStreamState {
    pub source: Option<usize>,
    pub decode_cursor: usize,
    /// Pixels of the front buffer sent during the current display frame
    pub pixel_count: usize,
    /// Pixels decoded into the back buffer for the current source frame
    pub decode_count: usize,
    /// Index of the front buffer
    pub active_buffer: usize,
    pub frame_divisor_count: u32,
    /// Transmission is held until the next vertical sync. Set after every
    /// completed frame, initialization counts as one.
    pub vsync_wait: bool,
    /// Decoded frames promoted to the front buffer since activation
    pub promoted: u32,
    /// The source has no more rows, only the front buffer is still shown
    pub exhausted: bool,
    pub phase: Phase,
    available: u16,
}

pub struct VideoEngine {
    buffers: [Frame; 2],
    state: VideoStreamState,
}

impl VideoEngine {
    pub fn new() -> Self {
        Self {
            buffers: [Frame::new(), Frame::new()],
            state: VideoStreamState::default(),
        }
    }

    pub fn state(&self) -> &VideoStreamState {
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

    /// Frame currently being transmitted
    pub fn front(&self) -> FrameView<'_> {
        self.buffers[self.state.active_buffer].view()
    }

    /// Frame currently being decoded into
    pub fn back(&self) -> FrameView<'_> {
        self.buffers[1 - self.state.active_buffer].view()
    }

    /// Start streaming from block `source`, `None` leaves the engine idle
    pub fn activate(&mut self, source: Option<usize>) {
        self.buffers.iter_mut().for_each(Frame::clear);
        self.state = VideoStreamState {
            source,
            phase: if source.is_some() {
                Phase::Initializing
            } else {
                Phase::Idle
            },
            ..VideoStreamState::default()
        };
    }

    /// Return to idle immediately, words already in the FIFO are not flushed
    pub fn stop(&mut self) {
        self.state = VideoStreamState::default();
    }

    pub fn tick<V: VideoGenerator + ?Sized>(&mut self, store: &BlockStore, video: &mut V) -> Tick {
        let source = match (self.state.phase, self.state.source) {
            (Phase::Idle, _) | (_, None) => return Tick::Idle,
            (_, Some(source)) => source,
        };

        let block = match store.get(source) {
            Some(block) => block,
            None => {
                warn!("video source memblock {} is not set", source);
                self.stop();
                return Tick::Ended;
            }
        };

        if self.state.phase == Phase::Initializing {
            video.set_clock(DIVIDERS);
            video.clear_fifo();
            self.state.vsync_wait = true;
            self.state.phase = Phase::Streaming;
            return Tick::Busy;
        }

        if !self.state.exhausted && self.decode(block).is_err() {
            debug!("video source exhausted at offset {}", self.state.decode_cursor);
            if self.state.promoted == 0 {
                self.stop();
                return Tick::Ended;
            }
            self.state.exhausted = true;
        }

        if self.transmit(video) {
            debug!("last video frame shown");
            self.stop();
            return Tick::Ended;
        }
        Tick::Busy
    }

    /// Decode a single row into the back buffer, unless it already holds a
    /// complete frame
    fn decode(&mut self, block: &[u8]) -> Result<(), Truncated> {
        if self.state.decode_count >= PIXELS {
            return Ok(());
        }

        let back = 1 - self.state.active_buffer;
        let y = self.state.decode_count / WIDTH;
        let row = match self.buffers[back].row_mut(y) {
            Some(row) => row,
            None => return Ok(()),
        };

        let mut cursor = Cursor::at(block, self.state.decode_cursor);
        decode_row(&mut cursor, row)?;
        self.state.decode_cursor = cursor.offset();
        self.state.decode_count += WIDTH;
        Ok(())
    }

    /// Feed the FIFO from the front buffer, returns true once an exhausted
    /// stream has shown its last frame
    fn transmit<V: VideoGenerator + ?Sized>(&mut self, video: &mut V) -> bool {
        if self.state.vsync_wait {
            if !video.status().vsync() {
                return false;
            }
            video.clear_fifo();
            self.state.vsync_wait = false;
            self.state.available = VSYNC_BURST;
        }

        if usize::from(self.state.available) < BATCHES[BATCHES.len() - 1] {
            self.state.available = video.status().available();
        }

        let words = self.buffers[self.state.active_buffer].view().as_words();
        let state = &mut self.state;
        loop {
            let sent = state.pixel_count / PIXELS_PER_WORD;
            let left = words.len() - sent;
            let batch = match BATCHES
                .iter()
                .copied()
                .find(|&batch| batch <= usize::from(state.available) && batch <= left)
            {
                Some(batch) => batch,
                None => break,
            };

            words[sent..sent + batch]
                .iter()
                .for_each(|&word| video.write_word(word));
            state.pixel_count += batch * PIXELS_PER_WORD;
            state.available -= batch as u16;

            if state.pixel_count >= PIXELS {
                break;
            }
        }

        self.state.pixel_count >= PIXELS && self.complete_frame()
    }

    /// Re-arm transmission after a fully sent frame and promote the back
    /// buffer when the divisor has elapsed and the back buffer is complete.
    ///
    /// Returns true when the source is exhausted and the front buffer has
    /// been shown `FRAME_DIVISOR + 1` times since its promotion.
    fn complete_frame(&mut self) -> bool {
        let state = &mut self.state;
        state.pixel_count = 0;
        state.vsync_wait = true;

        let count = state.frame_divisor_count;
        state.frame_divisor_count = count.saturating_add(1);
        if count >= FRAME_DIVISOR && state.decode_count >= PIXELS {
            state.active_buffer = 1 - state.active_buffer;
            state.decode_count = 0;
            state.frame_divisor_count = 0;
            state.promoted = state.promoted.saturating_add(1);
            trace!("front buffer is now {}", state.active_buffer);
        }

        state.exhausted && state.frame_divisor_count > FRAME_DIVISOR
    }
}

impl Default for VideoEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_row;
    use crate::context::testing::TestingContext;
    use crate::frame::{FRAME_WORDS, HEIGHT};

    use alloc::vec::Vec;

    fn encode_frame(pattern: impl Fn(usize, usize) -> bool, out: &mut Vec<u8>) {
        for y in 0..HEIGHT {
            encode_row((0..WIDTH).map(|x| pattern(x, y)), out);
        }
    }

    fn store_with(block: &[u8]) -> BlockStore {
        let mut store = BlockStore::new();
        store.allocate(0, block.len()).unwrap();
        for (offset, &byte) in block.iter().enumerate() {
            store.write_byte(0, offset, byte).unwrap();
        }
        store
    }

    /// All foreground, all background, then all foreground again
    fn stripes() -> Vec<u8> {
        let mut stream = Vec::new();
        encode_frame(|_, _| true, &mut stream);
        encode_frame(|_, _| false, &mut stream);
        encode_frame(|_, _| true, &mut stream);
        stream
    }

    fn started(store: &BlockStore, video: &mut TestingContext) -> VideoEngine {
        let mut engine = VideoEngine::new();
        engine.activate(Some(0));
        assert_eq!(engine.phase(), Phase::Initializing);
        assert_eq!(engine.tick(store, video), Tick::Busy);
        assert_eq!(engine.phase(), Phase::Streaming);
        engine
    }

    #[test]
    fn initialization_programs_generator() {
        let store = store_with(&stripes());
        let mut video = TestingContext::new();
        let engine = started(&store, &mut video);

        assert_eq!(video.video_clock, Some(DIVIDERS));
        assert_eq!(video.fifo_clears, 1);
        assert!(engine.state().vsync_wait);
        assert_eq!(engine.state().decode_cursor, 0);
    }

    #[test]
    fn waits_for_vsync() {
        let store = store_with(&stripes());
        let mut video = TestingContext::new().with_video_free(64);
        let mut engine = started(&store, &mut video);

        for _ in 0..10 {
            engine.tick(&store, &mut video);
        }
        assert!(video.words.is_empty());
        assert_eq!(engine.state().decode_count, 10 * WIDTH);

        video.vsync = true;
        engine.tick(&store, &mut video);
        assert_eq!(video.fifo_clears, 2);
        assert!(!engine.state().vsync_wait);
        assert_eq!(video.words.len(), usize::from(VSYNC_BURST));
    }

    #[test]
    fn batches_follow_availability() {
        let store = store_with(&stripes());
        let mut video = TestingContext::new().with_video_free(0);
        let mut engine = started(&store, &mut video);

        video.vsync = true;
        engine.tick(&store, &mut video);
        let sent = video.words.len();
        assert_eq!(sent, usize::from(VSYNC_BURST));

        video.video_free = 13;
        engine.tick(&store, &mut video);
        assert_eq!(video.words.len(), sent + 12);
        assert_eq!(engine.state().pixel_count, (sent + 12) * PIXELS_PER_WORD);

        video.video_free = 3;
        engine.tick(&store, &mut video);
        engine.tick(&store, &mut video);
        assert_eq!(video.words.len(), sent + 12);
    }

    #[test]
    fn front_buffer_is_promoted_every_fourth_frame() {
        let store = store_with(&stripes());
        let mut video = TestingContext::new().with_video_free(16);
        video.vsync = true;
        let mut engine = started(&store, &mut video);

        let mut completions = 0;
        let mut fronts = Vec::new();
        while completions < 5 {
            engine.tick(&store, &mut video);
            if video.words.len() == (completions + 1) * FRAME_WORDS {
                completions += 1;
                assert!(engine.state().vsync_wait);
                fronts.push(engine.state().active_buffer);
            }
        }

        assert_eq!(fronts, [0, 0, 0, 1, 1]);
        let frames: Vec<_> = video.words.chunks(FRAME_WORDS).collect();
        assert!(frames[..4].iter().all(|f| f.iter().all(|&w| w == 0)));
        assert!(frames[4].iter().all(|&w| w == u32::MAX));
        assert_eq!(engine.state().frame_divisor_count, 1);
    }

    #[test]
    fn promotion_waits_for_complete_decode() {
        let store = store_with(&stripes());
        let mut video = TestingContext::new().with_video_free(u16::MAX);
        video.vsync = true;
        let mut engine = started(&store, &mut video);

        for _ in 0..HEIGHT - 1 {
            engine.tick(&store, &mut video);
            assert_eq!(engine.state().active_buffer, 0);
        }
        assert!(engine.state().frame_divisor_count > FRAME_DIVISOR);
        assert!(engine.state().decode_count < PIXELS);

        while engine.state().active_buffer == 0 {
            engine.tick(&store, &mut video);
        }
        assert_eq!(engine.front().get_bit(0, 0), Some(true));
        assert_eq!(engine.state().decode_count, 0);
        assert_eq!(engine.state().frame_divisor_count, 0);
    }

    #[test]
    fn back_buffer_holds_decoded_rows() {
        let mut stream = Vec::new();
        encode_frame(|x, y| x == y, &mut stream);
        let store = store_with(&stream);
        let mut video = TestingContext::new();
        let mut engine = started(&store, &mut video);

        for _ in 0..HEIGHT {
            engine.tick(&store, &mut video);
        }
        assert_eq!(engine.state().decode_count, PIXELS);
        assert_eq!(engine.state().decode_cursor, stream.len());
        let back = engine.back();
        assert!((0..HEIGHT).all(|y| back.get_bit(y, y) == Some(true)));
        assert_eq!(back.as_bits().count_ones(), HEIGHT);

        assert_eq!(engine.tick(&store, &mut video), Tick::Busy);
        assert_eq!(engine.state().decode_cursor, stream.len());
    }

    #[test]
    fn ends_when_rows_run_out() {
        let mut stream = Vec::new();
        encode_frame(|x, _| x < 10, &mut stream);
        stream.truncate(stream.len() / 2);
        let store = store_with(&stream);
        let mut video = TestingContext::new();
        let mut engine = started(&store, &mut video);

        let mut ticks = 0;
        while engine.tick(&store, &mut video) == Tick::Busy {
            ticks += 1;
            assert!(engine.state().decode_cursor <= stream.len());
        }
        assert_eq!(ticks, HEIGHT / 2);
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.tick(&store, &mut video), Tick::Idle);
    }

    fn run_to_end(store: &BlockStore, video: &mut TestingContext) -> Vec<&'static str> {
        let mut engine = started(store, video);
        let mut ticks = 0;
        while engine.tick(store, video) == Tick::Busy {
            ticks += 1;
            assert!(ticks < 10_000, "stream never ended");
        }
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(video.words.len() % FRAME_WORDS, 0);

        video
            .words
            .chunks(FRAME_WORDS)
            .map(|frame| {
                if frame.iter().all(|&w| w == u32::MAX) {
                    "on"
                } else if frame.iter().all(|&w| w == 0) {
                    "off"
                } else {
                    "mixed"
                }
            })
            .collect()
    }

    #[test]
    fn last_frame_is_shown_before_ending() {
        let mut stream = Vec::new();
        encode_frame(|_, _| true, &mut stream);
        let store = store_with(&stream);
        let mut video = TestingContext::new().with_video_free(u16::MAX);
        video.vsync = true;

        let frames = run_to_end(&store, &mut video);
        let shown = frames.iter().filter(|&&f| f == "on").count();
        assert_eq!(shown, FRAME_DIVISOR as usize + 1);
        assert!(frames[frames.len() - shown..].iter().all(|&f| f == "on"));
        assert!(frames[..frames.len() - shown].iter().all(|&f| f == "off"));
    }

    #[test]
    fn every_frame_of_a_sequence_is_shown() {
        let mut stream = Vec::new();
        encode_frame(|_, _| true, &mut stream);
        encode_frame(|x, _| x % 2 == 0, &mut stream);
        let store = store_with(&stream);
        let mut video = TestingContext::new().with_video_free(u16::MAX);
        video.vsync = true;

        let frames = run_to_end(&store, &mut video);
        assert!(frames.contains(&"on"));
        assert_eq!(frames.last(), Some(&"mixed"));
        assert_eq!(
            frames.iter().filter(|&&f| f == "mixed").count(),
            FRAME_DIVISOR as usize + 1
        );
        assert!(video.words[video.words.len() - FRAME_WORDS..]
            .iter()
            .all(|&w| w == 0x5555_5555));
    }

    #[test]
    fn partial_last_frame_is_never_shown() {
        let mut stream = Vec::new();
        encode_frame(|_, _| true, &mut stream);
        let mut tail = Vec::new();
        encode_frame(|_, _| false, &mut tail);
        stream.extend_from_slice(&tail[..tail.len() / 2]);
        let store = store_with(&stream);
        let mut video = TestingContext::new().with_video_free(u16::MAX);
        video.vsync = true;

        let frames = run_to_end(&store, &mut video);
        let first_on = frames.iter().position(|&f| f == "on").unwrap();
        assert!(frames[first_on..].iter().all(|&f| f == "on"));
        assert!(frames.len() - first_on > FRAME_DIVISOR as usize);
    }

    #[test]
    fn missing_source_ends_stream() {
        let store = BlockStore::new();
        let mut video = TestingContext::new();
        let mut engine = VideoEngine::new();

        engine.activate(None);
        assert_eq!(engine.tick(&store, &mut video), Tick::Idle);

        engine.activate(Some(2));
        assert_eq!(engine.tick(&store, &mut video), Tick::Ended);
        assert_eq!(video.video_clock, None);
    }

    #[test]
    fn stop_discards_progress() {
        let store = store_with(&stripes());
        let mut video = TestingContext::new().with_video_free(16);
        video.vsync = true;
        let mut engine = started(&store, &mut video);
        engine.tick(&store, &mut video);
        engine.stop();

        assert_eq!(engine.state(), &VideoStreamState::default());
        assert_eq!(engine.source(), None);
    }
}
