/// Pass partitioning.
///
/// Greedy budgeted drain of the depth queue into pass lists. Each pass
/// is seeded with the overlap set left behind by the previous pass
/// (entities whose near extent crossed that pass's near plane and are
/// not fully drawn yet), then filled from the back of the queue until
/// the primitive budget or the hardware object ceiling would be
/// exceeded.
use log::{debug, warn};

use crate::count_call;
use crate::perf::RENDER_COUNTERS;
use crate::rendering::queue::{DepthQueue, OverlapSet, RenderRecord};

/// Hardware capacity for a single pass submission.
#[derive(Debug, Clone, Copy)]
pub struct PassLimits {
    /// Primitive-cost budget per pass.
    pub primitive_budget: u32,
    /// Object-count ceiling per pass, applied in addition to the
    /// primitive budget.
    pub object_ceiling: usize,
}

/// Build the entity list for the next pass.
///
/// Drains the overlap seed entirely and consumes queue records
/// back-to-front while they fit. Two guarantees:
///
/// - An entity whose own cost exceeds the budget is still accepted into
///   an otherwise empty pass, forming a single oversized pass; refusing
///   it would stall the queue forever.
/// - If the seed alone meets or exceeds the budget, the seed is rebuilt
///   from its important records only. Unimportant records lose their
///   redraw (a visible seam) but the pass regains room to make forward
///   progress.
///
/// An empty return with records still queued means no partition is
/// possible; the caller treats that as a dropped frame.
pub fn build_pass_list(
    queue: &mut DepthQueue,
    overlap: &mut OverlapSet,
    limits: &PassLimits,
) -> Vec<RenderRecord> {
    let mut cost: u32 = overlap.iter().map(|r| r.cost).sum();

    if !overlap.is_empty() && cost >= limits.primitive_budget {
        // Degraded recovery: keep only the records whose seams would be
        // unacceptable.
        let seed_cost = cost;
        let before = overlap.len();
        overlap.retain(|r| r.important);
        cost = overlap.iter().map(|r| r.cost).sum();
        count_call!(RENDER_COUNTERS.degraded_reseeds);
        warn!(
            "overlap seed at {} primitives meets pass budget {}; \
             dropped {} unimportant redraw(s)",
            seed_cost,
            limits.primitive_budget,
            before - overlap.len()
        );
    }

    let mut list = std::mem::take(overlap);

    loop {
        let top_cost = match queue.front() {
            Some(record) => record.cost,
            None => break,
        };
        if list.len() >= limits.object_ceiling {
            break;
        }

        let fits = cost.saturating_add(top_cost) <= limits.primitive_budget;
        if !fits && !list.is_empty() {
            break;
        }

        if let Some(record) = queue.pop_front() {
            cost = cost.saturating_add(record.cost);
            list.push(record);
        }

        if !fits {
            // Single oversized entity: accepted alone, then the pass
            // is closed.
            count_call!(RENDER_COUNTERS.oversized_passes);
            debug!(
                "entity with cost {} exceeds pass budget {}; drawing it as an oversized pass",
                top_cost, limits.primitive_budget
            );
            break;
        }
    }

    list
}
