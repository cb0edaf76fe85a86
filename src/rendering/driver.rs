/// Frame state machine.
///
/// The engine calls `tick` once per render tick; each call advances at
/// most one pass. A new frame begins exactly when no frame is in
/// progress (depth queue and overlap set both gone): the camera is
/// frozen, the scene gathered and sorted, and passes then march from
/// the far plane toward the viewer, one submission per tick, until the
/// final pass presents. Every failure path drops a single visual frame
/// and leaves game state untouched; nothing here is fatal.
use log::{debug, warn};
use thiserror::Error;

use crate::camera::{Camera, CameraSnapshot};
use crate::entity::OverlaySource;
use crate::fixed::Fixed;
use crate::{count_add, count_call};
use crate::perf::RENDER_COUNTERS;
use crate::rendering::clip::{resolve_clip_planes, ClipRange, ClipResolution};
use crate::rendering::compositor::{present_pass, PassPlan};
use crate::rendering::device::{
    CaptureSlot, DrawContext, PassBackground, PassTarget, RenderDevice,
};
use crate::rendering::gather::gather_draw_list;
use crate::rendering::partition::build_pass_list;
use crate::rendering::queue::{DepthQueue, OverlapSet};
use crate::rendering::RenderConfig;
use crate::world::World;

/// Why a frame was abandoned. Either way the queue is flushed, one
/// vsync passes without a present, and the next tick starts fresh.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FrameBail {
    /// No pass partition was possible for the queued entities.
    #[error("no pass partition possible for the queued entities")]
    NoProgress,
    /// Near and far clip planes coincided away from the viewer
    /// minimum: geometry too crowded to separate at this depth.
    #[error("near and far clip planes coincide away from the viewer")]
    DegeneratePlanes,
}

/// What one render tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// An intermediate pass was captured; the frame continues next tick.
    PassSubmitted,
    /// The frame's final pass went to the display.
    Presented,
    /// The frame was abandoned; nothing was shown this tick.
    Dropped(FrameBail),
}

/// Per-frame mutable state, alive from InitFrame until the final pass
/// presents or the frame bails.
struct FrameState {
    pass_index: usize,
    /// Near plane of the previous pass; the far plane of the next one.
    /// Starts at the maximum view distance.
    prev_near: Fixed,
    queue: DepthQueue,
    overlap: OverlapSet,
    snapshot: CameraSnapshot,
    effects_pending: bool,
}

/// The outer state machine. `None` state means idle: the next tick
/// starts a new frame.
#[derive(Default)]
pub struct FrameDriver {
    state: Option<FrameState>,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self { state: None }
    }

    /// True while a frame has passes left to submit.
    pub fn frame_in_progress(&self) -> bool {
        self.state.is_some()
    }

    /// Advance the render pipeline by one pass (or bail one frame).
    pub fn tick(
        &mut self,
        world: &mut World,
        camera: &Camera,
        device: &mut dyn RenderDevice,
        mut overlay: Option<&mut (dyn OverlaySource + 'static)>,
        config: &RenderConfig,
    ) -> TickOutcome {
        let limits = config.clip_limits();

        let mut st = match self.state.take() {
            Some(st) => st,
            None => {
                // InitFrame: freeze the camera, gather, reset pass state.
                let snapshot = camera.snapshot(config.min_clip_distance, config.max_view_distance);
                let queue = gather_draw_list(world, &snapshot, &limits);
                device.begin_frame(&snapshot);
                count_call!(RENDER_COUNTERS.frames_started);

                if queue.is_empty() {
                    // Nothing visible: the front of the view volume is
                    // reached immediately. Present the clear color with
                    // zero geometry passes.
                    debug!("empty gather; presenting cleared frame");
                    device.begin_pass(
                        PassTarget::Display,
                        ClipRange {
                            near: limits.min_clip,
                            far: limits.max_view,
                        },
                        PassBackground::Clear(config.clear_color),
                    );
                    if config.effects_overlay {
                        draw_overlay(device, &snapshot, overlay);
                    }
                    device.end_pass();
                    device.wait_vblank();
                    count_call!(RENDER_COUNTERS.frames_presented);
                    return TickOutcome::Presented;
                }

                FrameState {
                    pass_index: 0,
                    prev_near: limits.max_view,
                    queue,
                    overlap: OverlapSet::new(),
                    snapshot,
                    effects_pending: config.effects_overlay,
                }
            }
        };

        let entities = build_pass_list(&mut st.queue, &mut st.overlap, &config.pass_limits());
        if entities.is_empty() && !st.queue.is_empty() {
            let flushed = st.queue.flush();
            warn!(
                "render pass made no progress; dropping frame ({} entities flushed)",
                flushed
            );
            count_call!(RENDER_COUNTERS.frames_dropped_no_progress);
            // A dropped frame still waits out its vsync so game pacing
            // is unaffected.
            device.wait_vblank();
            return TickOutcome::Dropped(FrameBail::NoProgress);
        }

        if config.single_pass_debug {
            // Diagnostics override: the remaining queue is discarded so
            // this pass clips to the viewer minimum and presents alone.
            st.queue.flush();
        }

        match resolve_clip_planes(st.prev_near, st.queue.front().map(|r| r.far_z), &limits) {
            ClipResolution::Degenerate => {
                let flushed = st.queue.flush();
                warn!(
                    "degenerate clip planes at pass {}; dropping frame ({} entities flushed)",
                    st.pass_index, flushed
                );
                count_call!(RENDER_COUNTERS.frames_dropped_degenerate);
                device.wait_vblank();
                TickOutcome::Dropped(FrameBail::DegeneratePlanes)
            }
            ClipResolution::FrontOfView => {
                // Clean terminal state: the previous pass already
                // clipped at the viewer minimum. Present what has been
                // drawn without submitting further geometry.
                let background = if st.pass_index == 0 {
                    PassBackground::Clear(config.clear_color)
                } else {
                    PassBackground::Capture(CaptureSlot::for_pass(st.pass_index).other())
                };
                device.begin_pass(
                    PassTarget::Display,
                    ClipRange {
                        near: limits.min_clip,
                        far: limits.min_clip,
                    },
                    background,
                );
                if st.effects_pending {
                    draw_overlay(device, &st.snapshot, overlay);
                }
                device.end_pass();
                device.wait_vblank();
                count_call!(RENDER_COUNTERS.frames_presented);
                TickOutcome::Presented
            }
            ClipResolution::Range(clip) => {
                let plan = PassPlan { entities, clip };
                let presented = present_pass(
                    device,
                    world,
                    &st.snapshot,
                    &plan,
                    st.pass_index,
                    st.queue.is_empty(),
                    &mut st.overlap,
                    overlay.take(),
                    &mut st.effects_pending,
                    config.clear_color,
                    limits.min_clip,
                );
                st.prev_near = clip.near;
                st.pass_index += 1;
                count_call!(RENDER_COUNTERS.passes_submitted);
                device.wait_vblank();

                if presented {
                    count_call!(RENDER_COUNTERS.frames_presented);
                    TickOutcome::Presented
                } else {
                    self.state = Some(st);
                    TickOutcome::PassSubmitted
                }
            }
        }
    }
}

/// Draw the translucent effects layer into the currently open pass.
fn draw_overlay(
    device: &mut dyn RenderDevice,
    snapshot: &CameraSnapshot,
    overlay: Option<&mut (dyn OverlaySource + 'static)>,
) {
    if let Some(overlay) = overlay {
        let mut ctx = DrawContext::new(device, snapshot);
        ctx.set_blend(true);
        overlay.draw(&mut ctx);
        count_call!(RENDER_COUNTERS.overlay_draws);
        count_add!(RENDER_COUNTERS.primitives_emitted, ctx.emitted());
    }
}
