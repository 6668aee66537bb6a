//! Driver library for Sitronix ST7789 TFT panels on an 8-bit parallel (i80) bus, such as the
//! 170x320 panel of the LilyGO T-Display-S3.
//!
//! The driver keeps a rendering library's logical coordinate space consistent with the panel's
//! native addressing across all four rotations. Each orientation has a memory access mode, a
//! logical resolution and a gap (the offset of the visible window inside the controller's frame
//! memory); `Display` converts every logical rectangle to native coordinates, adds the gap and
//! programs the address window before pixel data is written.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;
extern crate embedded_hal as hal;
#[macro_use]
extern crate itertools;
#[macro_use]
extern crate log;
extern crate nb;

pub mod command;
pub mod config;
#[macro_use]
pub mod display;
pub mod driver;
pub mod error;
pub mod flush;
#[cfg(feature = "graphics")]
pub mod graphics;
pub mod interface;
pub mod orientation;
pub mod shared;
pub mod transform;

// Re-exports for primary API.
pub use command::consts;
pub use config::Config;
pub use display::Display;
pub use driver::{NoRenderer, RenderDriver};
pub use error::Error;
pub use flush::FlushTarget;
pub use interface::i80::I80Interface;
pub use interface::DisplayInterface;
pub use orientation::{Orientation, OrientationProfile};
pub use shared::{SharedDisplay, SharedGuard};
pub use transform::{to_physical, ClampPolicy, LogicalRect, PhysicalRect};
