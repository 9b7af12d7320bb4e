//! Real-time 2D light rays: a point source casts a fan of rays that march
//! across the viewport, bounce once off a moving circle and fade with distance.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod march;
pub mod rays;
pub mod renderer;
pub mod scaler;
pub mod segment;
pub mod sim;
pub mod stats;
pub mod world;

pub use config::SimConfig;
pub use error::{Error, Result};
pub use sim::Simulation;
