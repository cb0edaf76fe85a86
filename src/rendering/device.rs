/// Hardware seam for pass submission.
///
/// The pipeline never touches buffers or registers directly; it speaks
/// to a `RenderDevice` in terms of passes, capture slots, and
/// triangles. The two capture slots form the ping-pong arena: each
/// pass captures into the slot matching its parity while reading the
/// other slot (holding the previous pass's output) as an opaque
/// background, and the final pass of a frame targets the display
/// instead.
use glam::Vec3;

use crate::camera::CameraSnapshot;
use crate::rendering::clip::ClipRange;

/// One of the two offscreen capture images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSlot(pub usize);

impl CaptureSlot {
    /// Slot a pass captures into, by pass-index parity.
    #[inline]
    pub fn for_pass(pass_index: usize) -> Self {
        CaptureSlot(pass_index & 1)
    }

    /// The other slot of the pair.
    #[inline]
    pub fn other(self) -> Self {
        CaptureSlot(self.0 ^ 1)
    }
}

/// Where a pass's output lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassTarget {
    Capture(CaptureSlot),
    Display,
}

/// What fills the view before the pass's geometry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassBackground {
    /// Flat clear color (only the first pass of a frame has no
    /// captured predecessor).
    Clear(u32),
    /// The named capture slot drawn as an opaque full-view plane.
    Capture(CaptureSlot),
}

/// A single world-space primitive submission.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub v: [Vec3; 3],
    pub color: u32,
    /// Blended triangles composite translucently over what is already
    /// in the target and ignore the pass depth range (effects overlay).
    pub blend: bool,
}

/// Pass-level device interface.
///
/// Call order per frame: `begin_frame`, then for each pass
/// `begin_pass` / `submit_triangle`* / `end_pass` / `wait_vblank`.
/// A pass's capture is complete when `end_pass` returns; the following
/// pass may then read it as background. `wait_vblank` is the only
/// blocking point and the caller's cooperative yield.
pub trait RenderDevice {
    /// Latch the frame's camera snapshot. All passes of the frame are
    /// projected through this one snapshot.
    fn begin_frame(&mut self, snapshot: &CameraSnapshot);

    fn begin_pass(&mut self, target: PassTarget, clip: ClipRange, background: PassBackground);

    fn submit_triangle(&mut self, triangle: Triangle);

    fn end_pass(&mut self);

    /// Block until the vertical blank after a submission.
    fn wait_vblank(&mut self);
}

/// Primitive emission handle passed to entity draw callbacks.
///
/// Tracks how many primitives the pass actually emitted (the perf
/// counters compare this against the declared costs) and carries the
/// blend state for the effects overlay.
pub struct DrawContext<'a> {
    device: &'a mut dyn RenderDevice,
    snapshot: &'a CameraSnapshot,
    blend: bool,
    emitted: u32,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(device: &'a mut dyn RenderDevice, snapshot: &'a CameraSnapshot) -> Self {
        Self {
            device,
            snapshot,
            blend: false,
            emitted: 0,
        }
    }

    /// The frame's frozen camera, for view-relative geometry.
    #[inline]
    pub fn snapshot(&self) -> &CameraSnapshot {
        self.snapshot
    }

    /// Emit one triangle, vertices in world space.
    pub fn triangle(&mut self, a: Vec3, b: Vec3, c: Vec3, color: u32) {
        self.device.submit_triangle(Triangle {
            v: [a, b, c],
            color,
            blend: self.blend,
        });
        self.emitted += 1;
    }

    /// Emit a quad as two triangles. Corners wind consistently
    /// (a-b-c-d around the perimeter).
    pub fn quad(&mut self, corners: [Vec3; 4], color: u32) {
        let [a, b, c, d] = corners;
        self.triangle(a, b, c, color);
        self.triangle(a, c, d, color);
    }

    pub(crate) fn set_blend(&mut self, blend: bool) {
        self.blend = blend;
    }

    pub(crate) fn emitted(&self) -> u32 {
        self.emitted
    }
}
