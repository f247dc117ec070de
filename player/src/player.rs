use core::fmt::{self, Write};

use log::{debug, info};

use crate::audio::AudioEngine;
use crate::blocks::{BlockStore, BLOCK_COUNT};
use crate::command::{Command, CommandError, Invocation};
use crate::config::{Config, UploadMode};
use crate::console::Console;
use crate::context::{Context, SerialWriter};
use crate::error::Error;
use crate::stream::Tick;
use crate::upload::Upload;
use crate::video::VideoEngine;

/// The demo player: console, block store and both streaming engines driven
/// by one cooperative loop
pub struct Player<C: Context> {
    pub ctx: C,
    config: Config,
    store: BlockStore,
    console: Console,
    audio: AudioEngine,
    video: VideoEngine,
    upload: Option<Upload>,
    iterations: u32,
}

impl<C: Context> Player<C> {
    pub fn new(ctx: C, config: Config) -> Self {
        Self {
            ctx,
            config,
            store: BlockStore::new(),
            console: Console::new(config.echo),
            audio: AudioEngine::new(config.clock_frequency),
            video: VideoEngine::new(),
            upload: None,
            iterations: 0,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &BlockStore {
        &self.store
    }

    pub fn audio(&self) -> &AudioEngine {
        &self.audio
    }

    pub fn video(&self) -> &VideoEngine {
        &self.video
    }

    /// Interleaved upload still waiting for payload
    pub fn upload(&self) -> Option<&Upload> {
        self.upload.as_ref()
    }

    pub fn prompt(&mut self) {
        self.ctx.write(b'>');
    }

    /// Print the prompt and schedule forever
    pub fn run(&mut self) -> ! {
        self.prompt();
        loop {
            self.poll();
        }
    }

    /// One scheduler iteration: a console poll, an audio tick and a video
    /// tick, in that order
    pub fn poll(&mut self) {
        self.poll_console();

        if self.audio.tick(&self.store, &mut self.ctx) == Tick::Ended {
            info!("audio stream finished");
        }
        if self.video.tick(&self.store, &mut self.ctx) == Tick::Ended {
            info!("video stream finished");
        }

        self.heartbeat();
    }

    fn poll_console(&mut self) {
        if let Some(mut upload) = self.upload.take() {
            let fed = match self.ctx.read() {
                Ok(c) => upload.feed(c, &mut self.store),
                Err(nb::Error::WouldBlock) => Ok(()),
                Err(nb::Error::Other(never)) => match never {},
            };
            if let Err(err) = fed {
                self.say(format_args!("ERROR: memset: {}\n", err));
                self.prompt();
            } else if upload.is_complete() {
                info!("memblock {} filled, {} bytes", upload.id(), upload.written());
                self.prompt();
            } else {
                self.upload = Some(upload);
            }
            return;
        }

        if let Some(line) = self.console.poll(&mut self.ctx) {
            self.execute(&line);
            if self.upload.is_none() {
                self.prompt();
            }
        }
    }

    /// Interpret one console line
    pub fn execute(&mut self, line: &str) {
        let invocation = match Invocation::split(line) {
            Some(invocation) => invocation,
            None => return,
        };

        match Command::parse(invocation) {
            Ok(command) => {
                if let Err(err) = self.dispatch(command) {
                    self.say(format_args!("ERROR: {}: {}\n", invocation.name, err));
                }
            }
            Err(CommandError::UnknownCommand(name)) => {
                debug!("unknown command {}", name);
                self.say(format_args!("{}: command not found\n", name));
            }
            Err(CommandError::Operands(errors)) => errors
                .iter()
                .for_each(|error| self.say(format_args!("ERROR: {}\n", error))),
        }
    }

    fn dispatch(&mut self, command: Command<'_>) -> Result<(), Error> {
        match command {
            Command::Echo(text) => {
                self.say(format_args!("{}\n", text));
                Ok(())
            }
            Command::Memset { id, size } => self.memset(id, size),
            Command::Play { audio, video } => self.play(audio, video),
            Command::Stop => {
                self.audio.stop();
                self.video.stop();
                info!("playback stopped");
                Ok(())
            }
        }
    }

    fn memset(&mut self, id: usize, size: usize) -> Result<(), Error> {
        if size == 0 {
            debug!("memset without size ignored");
            return Ok(());
        }

        self.say(format_args!("Reading {} bytes to memblock {}\n", size, id));

        if self.audio.source() == Some(id) || self.video.source() == Some(id) {
            return Err(Error::BlockBusy { id });
        }
        self.store.allocate(id, size)?;

        let mut upload = Upload::new(id, size);
        match self.config.upload {
            UploadMode::Blocking => {
                while !upload.is_complete() {
                    let c = nb::block!(self.ctx.read()).unwrap_or_else(|never| match never {});
                    upload.feed(c, &mut self.store)?;
                }
                info!("memblock {} filled, {} bytes", id, size);
            }
            UploadMode::Interleaved => self.upload = Some(upload),
        }
        Ok(())
    }

    fn play(&mut self, audio: Option<usize>, video: Option<usize>) -> Result<(), Error> {
        if let Some(&id) = audio.iter().chain(video.iter()).find(|&&id| id >= BLOCK_COUNT) {
            return Err(Error::OutOfRange {
                id,
                max: BLOCK_COUNT,
            });
        }

        self.say(format_args!(
            "Playing: audio source={}, video source={}\n",
            source_id(audio),
            source_id(video)
        ));
        self.audio.activate(audio);
        self.video.activate(video);
        Ok(())
    }

    fn heartbeat(&mut self) {
        let shift = self.config.heartbeat_shift;
        let count = self.iterations;
        self.iterations = count.wrapping_add(1);

        let mask = 1u32.checked_shl(shift).map_or(u32::MAX, |bit| bit - 1);
        if count & mask == 0 {
            let leds = self.iterations.checked_shr(shift).unwrap_or(0);
            self.ctx.set_leds(leds);
        }
    }

    fn say(&mut self, args: fmt::Arguments<'_>) {
        let _ = SerialWriter(&mut self.ctx).write_fmt(args);
    }
}

/// Source id as printed on the console, `-1` for none
fn source_id(source: Option<usize>) -> isize {
    source.map_or(-1, |id| id as isize)
}
