pub mod camera;
pub mod engine;
pub mod entity;
pub mod fixed;
/// Slice Engine - depth-partitioned multi-pass software renderer
/// Splits frames into bounded back-to-front submissions
pub mod perf;
pub mod rendering;
pub mod world;

pub use camera::{Camera, CameraController, CameraSnapshot, Frustum};
pub use engine::Engine;
pub use entity::{DrawSource, Entity, OverlaySource};
pub use fixed::Fixed;
pub use perf::{CounterSnapshot, RenderCounters, RENDER_COUNTERS};
pub use rendering::{
    DrawContext, FrameBail, FrameDriver, RenderConfig, RenderDevice, SoftwareDevice, TickOutcome,
};
pub use world::{EntityId, World};
