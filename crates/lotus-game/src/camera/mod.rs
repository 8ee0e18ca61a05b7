//! Camera system module
//!
//! Third-person boom camera driven by mouse look or by the lock-on controller.

mod config;
mod controller;

pub use config::CameraConfig;
pub use controller::CameraController;
