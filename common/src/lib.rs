//! Common utilities for the sandbox simulations
//!
//! This crate provides the fly camera and perspective projection, CPU
//! rasterization, GPU presentation of CPU-rendered frames, the egui overlay,
//! and configuration/logging setup used by the gravity, reentry and wave
//! optics binaries.

pub mod blit;
pub mod camera;
pub mod config;
pub mod graphics;
pub mod history;
pub mod raster;
pub mod ui;

pub use blit::{FrameBlitter, ScreenRect};
pub use camera::{FlyCamera, MoveInput, Projection, Viewport};
pub use config::{init_logging, load_or_default, load_yaml, ConfigError};
pub use graphics::{GraphicsContext, GraphicsError};
pub use history::BoundedHistory;
pub use raster::{Color, PixelBuffer};
pub use ui::{draw_equations_sidebar, draw_sparkline, EguiLayer, Equation};
