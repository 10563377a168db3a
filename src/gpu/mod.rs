mod buffers;
mod context;
mod render;

pub use buffers::{FrameParams, RingInstance, SceneBuffers};
pub use context::GpuContext;
pub use render::RenderPipeline;
