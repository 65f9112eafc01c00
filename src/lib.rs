//! Serial control panel for an Arduino-class rover.
//!
//! The rover understands a handful of newline-terminated ASCII commands
//! ([`Command`]) and answers distance and mood queries with one line of
//! text. [`RobotController`] owns the [`Transport`] and keeps a [`Panel`]
//! describing what the window should show; [`link`] moves that work off
//! the UI thread.

pub mod app;
pub mod command;
pub mod config;
pub mod controller;
pub mod link;
pub mod mood;
pub mod panel;
pub mod transport;

pub use command::Command;
pub use config::{Overrides, RoverConfig};
pub use controller::RobotController;
pub use link::{Link, Request, spawn_link};
pub use mood::Mood;
pub use panel::{Layout, Panel};
pub use transport::{MemoryTransport, SerialTransport, Transport, TransportError};
