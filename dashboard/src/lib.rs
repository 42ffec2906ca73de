//! Host side of the Petfinder dashboard.
//!
//! # Overview
//! `petboard-core` builds requests and derives view models without touching
//! the network. This crate supplies the rest: a ureq-backed `Transport`, the
//! shared `Session` that owns the bearer token, the mounted views, and their
//! text rendering.
//!
//! # Design
//! - One `Session` per process behind an `Arc`; every view shares its token.
//! - A view settles once (`Loading` to `Error` or `Ready`) and is cancelled
//!   when dropped.
//! - Rendering is `Display` over `ViewState`, so it stays a pure function of
//!   what was fetched.

pub mod config;
pub mod logging;
pub mod render;
pub mod session;
pub mod transport;
pub mod view;

pub use config::{Config, ConfigError};
pub use render::{DashboardScreen, DetailScreen};
pub use session::{Session, SessionError};
pub use transport::{Transport, TransportError, UreqTransport};
pub use view::{DashboardView, DetailView};
