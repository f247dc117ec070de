#![no_std]

pub mod board;

pub use board::Board;
