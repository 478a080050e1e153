//! Real-time spectrum analyzer and equalizer response display.
//!
//! Audio blocks enter through an [`engine::AudioTap`], are transformed into
//! smoothed spectrum paths by [`analysis::ChannelAnalyzer`], and are composed
//! with the filter chain's magnitude response by [`render::ResponseCurveRenderer`].

pub mod analysis;
pub mod config;
pub mod decibels;
pub mod engine;
pub mod fft;
pub mod fifo;
pub mod filter;
pub mod geometry;
pub mod params;
pub mod render;

pub use config::{AnalyzerConfig, ConfigError};
