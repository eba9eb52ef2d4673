//! WebGPU rendering module
//!
//! Replays frames recorded by the scene: one pipeline per shader program,
//! meshes and the table texture uploaded once per surface.

pub mod pipeline;

pub use pipeline::{GpuRenderer, OffscreenTarget, request_headless_adapter};
