//! quadpad — fixed four-slot gamepad polling.
//!
//! Discovers up to four controllers, folds their raw button and axis events
//! into double-buffered per-slot state once per [`Gamepads::update`], and
//! answers normalized, edge-detected queries suitable for a game loop:
//!
//! ```no_run
//! use quadpad::{Button, Gamepads, PadId};
//!
//! let mut pads = Gamepads::discover()?;
//! loop {
//!     pads.update();
//!     if pads.button_triggered(PadId::Pad0, Button::A) {
//!         // fires for exactly one frame per press
//!     }
//! }
//! # Ok::<(), quadpad::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod backends;
pub mod config;
pub mod error;
pub mod gamepads;
pub mod layout;
pub mod normalize;
pub mod pad;
pub mod source;

pub use config::*;
pub use error::*;
pub use gamepads::*;
pub use layout::*;
pub use pad::*;
pub use source::*;
