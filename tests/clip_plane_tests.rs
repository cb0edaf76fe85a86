/// Integration tests for clip-plane derivation: the pass ranges must
/// tile the view volume back-to-front with no gap and no overlap, and
/// coincident planes must classify as terminal or degenerate by where
/// they coincide.
use slice_engine::rendering::{
    build_pass_list, ClipLimits, ClipResolution, DepthQueue, OverlapSet, PassLimits, RenderRecord,
};
use slice_engine::rendering::clip::resolve_clip_planes;
use slice_engine::{EntityId, Fixed};

fn record(slot: usize, far: i32, cost: u32) -> RenderRecord {
    RenderRecord {
        entity: EntityId(slot),
        near_z: Fixed::from_int(far),
        far_z: Fixed::from_int(far),
        cost,
        important: false,
    }
}

fn limits() -> ClipLimits {
    ClipLimits {
        min_clip: Fixed::from_int(1),
        max_view: Fixed::from_int(500),
    }
}

#[test]
fn pass_ranges_chain_without_gap_or_overlap() {
    // Partition a deep scene under a tight budget and resolve planes
    // for each pass; consecutive ranges must share a plane exactly.
    let mut queue = DepthQueue::from_unsorted(
        (0..30)
            .map(|i| record(i, 480 - i as i32 * 16, 10))
            .collect(),
    );
    let mut overlap = OverlapSet::new();
    let pass_limits = PassLimits {
        primitive_budget: 30,
        object_ceiling: 32,
    };
    let clip_limits = limits();

    let mut prev_near = clip_limits.max_view;
    let mut ranges = Vec::new();

    loop {
        let pass = build_pass_list(&mut queue, &mut overlap, &pass_limits);
        if pass.is_empty() && queue.is_empty() {
            break;
        }
        match resolve_clip_planes(prev_near, queue.front().map(|r| r.far_z), &clip_limits) {
            ClipResolution::Range(range) => {
                assert!(range.near < range.far);
                prev_near = range.near;
                ranges.push(range);
            }
            other => panic!("unexpected resolution mid-frame: {:?}", other),
        }
        if queue.is_empty() {
            break;
        }
    }

    println!("[CLIP] scene partitioned into {} ranges", ranges.len());
    assert!(ranges.len() > 2, "scene was built to need several passes");

    assert_eq!(
        ranges[0].far,
        clip_limits.max_view,
        "first pass must reach the maximum view distance"
    );
    for pair in ranges.windows(2) {
        assert_eq!(
            pair[1].far, pair[0].near,
            "consecutive passes must share a plane: no gap, no overlap"
        );
    }
}

#[test]
fn near_plane_sits_exactly_behind_next_queued_record() {
    let mut queue = DepthQueue::from_unsorted(vec![
        record(0, 400, 10),
        record(1, 250, 10),
        record(2, 90, 10),
    ]);
    let mut overlap = OverlapSet::new();
    let pass_limits = PassLimits {
        primitive_budget: 10,
        object_ceiling: 32,
    };

    let pass = build_pass_list(&mut queue, &mut overlap, &pass_limits);
    assert_eq!(pass[0].entity, EntityId(0));

    match resolve_clip_planes(
        limits().max_view,
        queue.front().map(|r| r.far_z),
        &limits(),
    ) {
        ClipResolution::Range(range) => {
            assert_eq!(range.near, Fixed::from_int(250));
            assert_eq!(range.far, Fixed::from_int(500));
        }
        other => panic!("expected a valid range, got {:?}", other),
    }
}

#[test]
fn exhausted_queue_clips_to_viewer_minimum() {
    match resolve_clip_planes(Fixed::from_int(90), None, &limits()) {
        ClipResolution::Range(range) => {
            assert_eq!(range.near, limits().min_clip);
            assert_eq!(range.far, Fixed::from_int(90));
        }
        other => panic!("expected a valid range, got {:?}", other),
    }
}

#[test]
fn coincidence_at_viewer_minimum_is_clean_termination() {
    assert_eq!(
        resolve_clip_planes(limits().min_clip, None, &limits()),
        ClipResolution::FrontOfView
    );
    // A leftover record clamped up to the minimum classifies the same
    // way: the front of the view volume is reached.
    assert_eq!(
        resolve_clip_planes(limits().min_clip, Some(Fixed::from_f32(0.5)), &limits()),
        ClipResolution::FrontOfView
    );
}

#[test]
fn coincidence_away_from_viewer_is_degenerate() {
    assert_eq!(
        resolve_clip_planes(Fixed::from_int(64), Some(Fixed::from_int(64)), &limits()),
        ClipResolution::Degenerate
    );
}

#[test]
fn sub_resolution_depth_separation_still_chains() {
    // Records a quarter unit apart: fixed-point keeps the boundaries
    // exact where f32 rounding could open a gap.
    let far_a = Fixed::from_f32(10.25);
    let far_b = Fixed::from_f32(10.0);
    match resolve_clip_planes(far_a, Some(far_b), &limits()) {
        ClipResolution::Range(range) => {
            assert_eq!(range.far, far_a);
            assert_eq!(range.near, far_b);
            assert_eq!((range.far - range.near).to_bits(), 1024); // 0.25
        }
        other => panic!("expected a valid range, got {:?}", other),
    }
}
