/// Pass presentation and ping-pong compositing.
///
/// Each pass captures into the slot matching its parity while the
/// other slot — holding everything the frame has drawn so far — goes
/// down first as an opaque background plane. The final pass of a frame
/// skips the capture and routes straight to the display, so the viewer
/// only ever sees completed frames.
use log::debug;

use crate::camera::CameraSnapshot;
use crate::entity::OverlaySource;
use crate::fixed::Fixed;
use crate::perf::RENDER_COUNTERS;
use crate::rendering::clip::ClipRange;
use crate::rendering::device::{
    CaptureSlot, DrawContext, PassBackground, PassTarget, RenderDevice,
};
use crate::rendering::queue::{OverlapSet, RenderRecord};
use crate::world::World;
use crate::{count_add, count_call};

/// One submission's worth of work: the entities to draw, in
/// back-to-front order, and the depth range they are clipped to.
pub struct PassPlan {
    pub entities: Vec<RenderRecord>,
    pub clip: ClipRange,
}

/// Draw and submit one pass. Returns true when this pass presented the
/// frame (nothing left to draw afterwards).
///
/// Entities whose near extent crosses the pass's near plane are only
/// partially complete after this pass; they are written into `overlap`
/// for the next pass to redraw. A pass clipping at the viewer minimum
/// never produces overlap — nothing can render closer.
#[allow(clippy::too_many_arguments)]
pub fn present_pass(
    device: &mut dyn RenderDevice,
    world: &World,
    snapshot: &CameraSnapshot,
    plan: &PassPlan,
    pass_index: usize,
    queue_empty: bool,
    overlap: &mut OverlapSet,
    overlay: Option<&mut (dyn OverlaySource + 'static)>,
    effects_pending: &mut bool,
    clear_color: u32,
    min_clip: Fixed,
) -> bool {
    overlap.clear();
    if plan.clip.near > min_clip {
        for record in plan.entities.iter().filter(|r| r.near_z < plan.clip.near) {
            overlap.push(*record);
            count_call!(RENDER_COUNTERS.overlap_redraws);
        }
    }

    // Last pass exactly when nothing remains queued and nothing
    // straddles this pass's near plane (and any pending overlay is
    // drawn below, inside this same pass).
    let is_last = queue_empty && overlap.is_empty();

    let slot = CaptureSlot::for_pass(pass_index);
    let target = if is_last {
        PassTarget::Display
    } else {
        PassTarget::Capture(slot)
    };
    let background = if pass_index == 0 {
        PassBackground::Clear(clear_color)
    } else {
        PassBackground::Capture(slot.other())
    };

    device.begin_pass(target, plan.clip, background);
    let emitted = {
        let mut ctx = DrawContext::new(device, snapshot);
        for record in &plan.entities {
            if let Some(entity) = world.get(record.entity) {
                entity.draw(&mut ctx);
            }
        }
        if is_last && *effects_pending {
            if let Some(overlay) = overlay {
                ctx.set_blend(true);
                overlay.draw(&mut ctx);
                ctx.set_blend(false);
                count_call!(RENDER_COUNTERS.overlay_draws);
            }
            *effects_pending = false;
        }
        ctx.emitted()
    };
    count_add!(RENDER_COUNTERS.primitives_emitted, emitted);
    device.end_pass();

    debug!(
        "pass {}: {} entities, clip {}..{}, {} overlap carried{}",
        pass_index,
        plan.entities.len(),
        plan.clip.near,
        plan.clip.far,
        overlap.len(),
        if is_last { ", presented" } else { "" }
    );

    is_last
}
