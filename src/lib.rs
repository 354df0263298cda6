//! Mode controller for a single-button flashlight driver with off-time
//! capacitor memory.
//!
//! Every power-up the controller measures how long the light was off,
//! picks the next, previous or first mode, persists that choice in a
//! wear-levelled cell ring and runs the mode's output pattern, stepping the
//! light down (and finally off) when the battery runs low.
//!
//! All modules here are pure logic over the [`board::Board`] and
//! [`storage::Cells`] traits and can be tested on the host:
//! `cargo test --lib`.
//!
//! Note: The embedded binary (`main.rs`, feature `embedded`) supplies the
//! nRF52840 implementations of those traits.

#![cfg_attr(not(test), no_std)]

pub mod board;
pub mod config;
pub mod controller;
pub mod error;
pub mod modes;
pub mod pattern;
pub mod power;
pub mod press;
pub mod storage;

pub use board::Board;
pub use controller::{ModeController, Step};
pub use error::Error;
pub use modes::{Mode, ModeRef, ModeTables, DEFAULT_TABLES};
pub use press::PressEvent;
pub use storage::{Cells, FlashCells, ModeStore};
