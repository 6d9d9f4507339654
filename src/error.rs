//! Crate error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Mesh resolution must be positive, got {0}")]
    InvalidResolution(usize),

    #[error("Failed to find a suitable GPU adapter")]
    NoAdapter,

    #[error("Failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to map readback buffer: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("Readback channel closed before the buffer was mapped")]
    ReadbackDropped,

    #[error("Readback does not fill a {0}x{1} image")]
    ReadbackSize(u32, u32),

    #[error("Failed to save image: {0}")]
    Image(#[from] image::ImageError),
}
