//! # Particle Screensaver
//!
//! A GPU particle screensaver built on a ping-pong feedback loop.
//!
//! Each frame a compute pass reads one generation of particle state and
//! writes the next; the render pass draws the freshly written positions as
//! points; then the two generations swap roles. Dead particles are reborn
//! at the emitter with direction and speed drawn from a precomputed random
//! field, so nothing on the CPU touches individual particles after startup.
//!
//! ## Modules
//!
//! - [`core`]: Startup, event loop and frame driver
//! - [`config`]: Configuration files, environment overrides and validation
//! - [`render`]: Particle state, simulation kernels and the wgpu backend
//! - [`platform`]: Window and input abstraction over winit
//! - [`performance`]: Frame-rate telemetry

/// Startup, event loop and frame driver
pub mod core;
/// Configuration system
pub mod config;
/// Platform abstraction layer
pub mod platform;
/// Particle simulation and rendering
pub mod render;
/// Frame-rate telemetry
pub mod performance;
