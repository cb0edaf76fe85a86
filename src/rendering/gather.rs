/// Visibility gathering.
///
/// Runs once at the start of each frame: walks the registry, culls
/// against the frozen camera's view volume, computes fixed-point depth
/// extents, and produces the frame's back-to-front queue. Entities
/// outside the volume are simply omitted; there is no failure path.
use log::trace;

use crate::camera::CameraSnapshot;
use crate::count_call;
use crate::fixed::Fixed;
use crate::perf::RENDER_COUNTERS;
use crate::rendering::clip::ClipLimits;
use crate::rendering::queue::{DepthQueue, RenderRecord};
use crate::world::World;

/// Cull and depth-sort all registered entities against the snapshot.
///
/// Side effect: every live entity's visibility flag is written, whether
/// it was kept or culled, for consumers outside the renderer.
pub fn gather_draw_list(
    world: &mut World,
    snapshot: &CameraSnapshot,
    limits: &ClipLimits,
) -> DepthQueue {
    let mut records = Vec::with_capacity(world.entity_count());

    for (id, entity) in world.iter_mut() {
        // Freeze the entity's transform for the whole frame by reading
        // it exactly once, here.
        let transform = entity.cached_transform();
        let center = transform.w_axis.truncate();
        let radius = entity.bounding_radius();

        let visible = snapshot.sphere_in_view(center, radius);
        entity.set_visible(visible);
        if !visible {
            count_call!(RENDER_COUNTERS.entities_culled);
            continue;
        }
        count_call!(RENDER_COUNTERS.entities_gathered);

        // The only float-to-fixed crossing in the pipeline: one depth
        // quantization per entity. Every comparison and clip plane
        // derived from these values is pure fixed-point.
        let depth = snapshot.depth_of(center);
        let (near_z, far_z) = if entity.simple() {
            // Collapsed to the center depth: never straddles a clip
            // plane, never forces a redraw.
            let d = depth.clamp(limits.min_clip, limits.max_view);
            (d, d)
        } else {
            let r = Fixed::from_f32(radius);
            (
                (depth - r).clamp(limits.min_clip, limits.max_view),
                (depth + r).clamp(limits.min_clip, limits.max_view),
            )
        };

        records.push(RenderRecord {
            entity: id,
            near_z,
            far_z,
            cost: entity.primitive_cost(),
            important: entity.important(),
        });
    }

    trace!(
        "gather: {} visible of {} registered",
        records.len(),
        world.entity_count()
    );

    DepthQueue::from_unsorted(records)
}
