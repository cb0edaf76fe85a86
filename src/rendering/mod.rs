pub mod clip;
pub mod compositor;
/// Depth-partitioned multi-pass rendering pipeline
/// Splits each frame into bounded submissions that composite back-to-front
pub mod device;
pub mod driver;
pub mod gather;
pub mod partition;
pub mod queue;
pub mod software;

pub use clip::{ClipLimits, ClipRange, ClipResolution};
pub use compositor::PassPlan;
pub use device::{CaptureSlot, DrawContext, PassBackground, PassTarget, RenderDevice, Triangle};
pub use driver::{FrameBail, FrameDriver, TickOutcome};
pub use gather::gather_draw_list;
pub use partition::{build_pass_list, PassLimits};
pub use queue::{DepthQueue, OverlapSet, RenderRecord};
pub use software::{Framebuffer, SoftwareDevice};

use crate::fixed::Fixed;

/// Tuning parameters for the pass scheduler.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Primitive-cost budget per pass submission
    pub max_primitives_per_pass: u32,
    /// Hardware object-count ceiling per pass, applied in addition to
    /// the primitive budget
    pub max_objects_per_pass: usize,
    /// Far plane of the first pass of every frame
    pub max_view_distance: f32,
    /// Closest distance from the viewer any pass may clip at
    pub min_clip_distance: f32,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Background color shown where nothing is drawn (ARGB)
    pub clear_color: u32,
    /// Whether the translucent effects layer is drawn each frame
    pub effects_overlay: bool,
    /// Diagnostics override: limit every frame to a single pass
    pub single_pass_debug: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_primitives_per_pass: 2048,
            max_objects_per_pass: 128,
            max_view_distance: 600.0,
            min_clip_distance: 1.0,
            fov: 70.0f32.to_radians(),
            clear_color: 0xFF87CEEB, // Sky blue
            effects_overlay: false,
            single_pass_debug: false,
        }
    }
}

impl RenderConfig {
    pub fn clip_limits(&self) -> ClipLimits {
        ClipLimits {
            min_clip: Fixed::from_f32(self.min_clip_distance),
            max_view: Fixed::from_f32(self.max_view_distance),
        }
    }

    pub fn pass_limits(&self) -> PassLimits {
        PassLimits {
            primitive_budget: self.max_primitives_per_pass,
            object_ceiling: self.max_objects_per_pass,
        }
    }
}
