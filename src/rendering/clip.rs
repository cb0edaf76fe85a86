/// Clip-plane derivation for depth-partitioned passes.
///
/// Passes march from the far plane toward the viewer: pass 0 covers up
/// to the maximum view distance, and each later pass's far plane is the
/// previous pass's near plane, so the covered z-ranges chain with no
/// gap and no overlap. The near plane of a pass sits exactly behind
/// where the pass's visible content ends: the `far_z` of the next
/// record still waiting in the depth queue.
use crate::fixed::Fixed;

/// Near/far depth bounds applied to one pass's projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRange {
    pub near: Fixed,
    pub far: Fixed,
}

/// Depth bounds of the whole view volume.
#[derive(Debug, Clone, Copy)]
pub struct ClipLimits {
    /// Closest distance from the viewer any pass may clip at.
    pub min_clip: Fixed,
    /// Far plane of the first pass of every frame.
    pub max_view: Fixed,
}

/// Outcome of resolving the planes for one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipResolution {
    /// Valid pass range; draw geometry under these planes.
    Range(ClipRange),
    /// Near and far coincide at the viewer minimum: the front of the
    /// view volume is reached. Terminal, not an error — present what
    /// has been drawn and finish the frame without further geometry.
    FrontOfView,
    /// Near and far coincide away from the viewer minimum: the
    /// partitioner could not separate the geometry at this depth.
    /// The frame must be bailed.
    Degenerate,
}

/// Resolve the clip planes for the current pass.
///
/// `prev_near` is the previous pass's near plane; callers initialize it
/// to `limits.max_view` before the first pass. `next_far` is the
/// `far_z` of the depth queue's front record, if any records remain.
pub fn resolve_clip_planes(
    prev_near: Fixed,
    next_far: Option<Fixed>,
    limits: &ClipLimits,
) -> ClipResolution {
    let far = prev_near;
    let near = next_far.unwrap_or(limits.min_clip).max(limits.min_clip);

    if near == far {
        if near == limits.min_clip {
            ClipResolution::FrontOfView
        } else {
            ClipResolution::Degenerate
        }
    } else if near > far {
        // Gather clamps record extents into [min_clip, max_view], so a
        // reversed range means the queue was mutated out of order.
        // Treat it as the same unrecoverable crowding case.
        ClipResolution::Degenerate
    } else {
        ClipResolution::Range(ClipRange { near, far })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> ClipLimits {
        ClipLimits {
            min_clip: Fixed::from_int(1),
            max_view: Fixed::from_int(500),
        }
    }

    #[test]
    fn first_pass_spans_to_next_record() {
        let result = resolve_clip_planes(
            Fixed::from_int(500),
            Some(Fixed::from_int(120)),
            &limits(),
        );
        assert_eq!(
            result,
            ClipResolution::Range(ClipRange {
                near: Fixed::from_int(120),
                far: Fixed::from_int(500),
            })
        );
    }

    #[test]
    fn empty_queue_collapses_near_to_viewer_minimum() {
        let result = resolve_clip_planes(Fixed::from_int(80), None, &limits());
        assert_eq!(
            result,
            ClipResolution::Range(ClipRange {
                near: Fixed::from_int(1),
                far: Fixed::from_int(80),
            })
        );
    }

    #[test]
    fn near_is_clamped_to_viewer_minimum() {
        let result = resolve_clip_planes(
            Fixed::from_int(80),
            Some(Fixed::from_f32(0.25)),
            &limits(),
        );
        assert_eq!(
            result,
            ClipResolution::Range(ClipRange {
                near: Fixed::from_int(1),
                far: Fixed::from_int(80),
            })
        );
    }

    #[test]
    fn coincidence_at_viewer_minimum_is_terminal() {
        let result = resolve_clip_planes(Fixed::from_int(1), None, &limits());
        assert_eq!(result, ClipResolution::FrontOfView);
    }

    #[test]
    fn coincidence_away_from_viewer_is_degenerate() {
        let result = resolve_clip_planes(
            Fixed::from_int(40),
            Some(Fixed::from_int(40)),
            &limits(),
        );
        assert_eq!(result, ClipResolution::Degenerate);
    }
}
