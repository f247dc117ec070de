#![no_std]
extern crate alloc;

pub mod audio;
pub mod blocks;
pub mod builder;
pub mod codec;
pub mod command;
pub mod config;
pub mod console;
pub mod context;
pub mod cursor;
pub mod error;
pub mod frame;
pub mod player;
pub mod stream;
pub mod upload;
pub mod video;

#[cfg(feature = "embedded-graphics")]
pub use embedded_graphics;

pub use blocks::{BlockStore, BLOCK_COUNT};
pub use builder::Builder;
pub use config::{Config, UploadMode};
pub use context::{ClockDividers, Context, Dac, Serial, VideoGenerator, VideoStatus};
pub use error::Error;
pub use frame::Frame;
pub use player::Player;
pub use stream::{Phase, Tick};
