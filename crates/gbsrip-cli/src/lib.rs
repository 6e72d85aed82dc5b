//! gbsrip CLI library.
//!
//! Everything the `gbsrip` binary does lives here so it can be driven from
//! tests with a scripted engine.
//!
//! # Crate Structure
//!
//! - [`config`] - Render settings
//! - [`metadata`] - Album tags, per-track plans and output file names
//! - [`render`] - Render driver connecting an engine to the WAV pipeline
//! - [`commands`] - Subcommand implementations

pub mod commands;
pub mod config;
pub mod metadata;
pub mod render;

pub use config::RenderConfig;
pub use metadata::{AlbumTags, TrackPlan, TrackPlanner};
pub use render::{RenderEvent, RenderedTrack, Renderer};
