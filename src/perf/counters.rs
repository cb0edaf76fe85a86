/// Render pipeline counters.
/// Thread-safe counters tracking how the frame scheduler behaves over
/// time: how many frames presented versus dropped, how often passes
/// degrade, how much redraw the overlap mechanism costs.
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for the render pipeline
pub struct RenderCounters {
    // Frame lifecycle
    pub frames_started: AtomicU64,
    pub frames_presented: AtomicU64,
    pub frames_dropped_no_progress: AtomicU64,
    pub frames_dropped_degenerate: AtomicU64,

    // Pass scheduling
    pub passes_submitted: AtomicU64,
    pub oversized_passes: AtomicU64,
    pub degraded_reseeds: AtomicU64,
    pub overlap_redraws: AtomicU64,

    // Gathering
    pub entities_gathered: AtomicU64,
    pub entities_culled: AtomicU64,

    // Draw submission
    pub primitives_emitted: AtomicU64,
    pub overlay_draws: AtomicU64,
}

impl RenderCounters {
    pub const fn new() -> Self {
        Self {
            frames_started: AtomicU64::new(0),
            frames_presented: AtomicU64::new(0),
            frames_dropped_no_progress: AtomicU64::new(0),
            frames_dropped_degenerate: AtomicU64::new(0),
            passes_submitted: AtomicU64::new(0),
            oversized_passes: AtomicU64::new(0),
            degraded_reseeds: AtomicU64::new(0),
            overlap_redraws: AtomicU64::new(0),
            entities_gathered: AtomicU64::new(0),
            entities_culled: AtomicU64::new(0),
            primitives_emitted: AtomicU64::new(0),
            overlay_draws: AtomicU64::new(0),
        }
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.frames_started.store(0, Ordering::Relaxed);
        self.frames_presented.store(0, Ordering::Relaxed);
        self.frames_dropped_no_progress.store(0, Ordering::Relaxed);
        self.frames_dropped_degenerate.store(0, Ordering::Relaxed);
        self.passes_submitted.store(0, Ordering::Relaxed);
        self.oversized_passes.store(0, Ordering::Relaxed);
        self.degraded_reseeds.store(0, Ordering::Relaxed);
        self.overlap_redraws.store(0, Ordering::Relaxed);
        self.entities_gathered.store(0, Ordering::Relaxed);
        self.entities_culled.store(0, Ordering::Relaxed);
        self.primitives_emitted.store(0, Ordering::Relaxed);
        self.overlay_draws.store(0, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            frames_started: self.frames_started.load(Ordering::Relaxed),
            frames_presented: self.frames_presented.load(Ordering::Relaxed),
            frames_dropped_no_progress: self.frames_dropped_no_progress.load(Ordering::Relaxed),
            frames_dropped_degenerate: self.frames_dropped_degenerate.load(Ordering::Relaxed),
            passes_submitted: self.passes_submitted.load(Ordering::Relaxed),
            oversized_passes: self.oversized_passes.load(Ordering::Relaxed),
            degraded_reseeds: self.degraded_reseeds.load(Ordering::Relaxed),
            overlap_redraws: self.overlap_redraws.load(Ordering::Relaxed),
            entities_gathered: self.entities_gathered.load(Ordering::Relaxed),
            entities_culled: self.entities_culled.load(Ordering::Relaxed),
            primitives_emitted: self.primitives_emitted.load(Ordering::Relaxed),
            overlay_draws: self.overlay_draws.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of counter values at a point in time
#[derive(Debug, Clone, Copy)]
pub struct CounterSnapshot {
    pub frames_started: u64,
    pub frames_presented: u64,
    pub frames_dropped_no_progress: u64,
    pub frames_dropped_degenerate: u64,
    pub passes_submitted: u64,
    pub oversized_passes: u64,
    pub degraded_reseeds: u64,
    pub overlap_redraws: u64,
    pub entities_gathered: u64,
    pub entities_culled: u64,
    pub primitives_emitted: u64,
    pub overlay_draws: u64,
}

impl CounterSnapshot {
    /// Print formatted report
    pub fn print_report(&self) {
        println!("\n=== Render Pipeline Report ===");
        println!("\nFrames:");
        println!("  started:                 {:12}", self.frames_started);
        println!("  presented:               {:12}", self.frames_presented);
        println!("  dropped (no progress):   {:12}", self.frames_dropped_no_progress);
        println!("  dropped (degenerate):    {:12}", self.frames_dropped_degenerate);

        println!("\nPasses:");
        println!("  submitted:               {:12}", self.passes_submitted);
        if self.frames_presented > 0 {
            let per_frame = self.passes_submitted as f64 / self.frames_presented as f64;
            println!("  per presented frame:     {:12.2}", per_frame);
        }
        println!("  oversized:               {:12}", self.oversized_passes);
        println!("  degraded reseeds:        {:12}", self.degraded_reseeds);
        println!("  overlap redraws:         {:12}", self.overlap_redraws);

        println!("\nGathering:");
        println!("  entities gathered:       {:12}", self.entities_gathered);
        println!("  entities culled:         {:12}", self.entities_culled);

        println!("\nSubmission:");
        println!("  primitives emitted:      {:12}", self.primitives_emitted);
        println!("  overlay draws:           {:12}", self.overlay_draws);

        println!();
    }
}

/// Global render counters instance
pub static RENDER_COUNTERS: RenderCounters = RenderCounters::new();

/// Macro for incrementing a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_call {
    ($counter:expr) => {{
        #[cfg(feature = "profiling")]
        $counter.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        #[cfg(not(feature = "profiling"))]
        let _ = &$counter;
    }};
}

/// Macro for adding to a counter (only when profiling feature is enabled)
#[macro_export]
macro_rules! count_add {
    ($counter:expr, $value:expr) => {{
        #[cfg(feature = "profiling")]
        $counter.fetch_add($value as u64, std::sync::atomic::Ordering::Relaxed);
        #[cfg(not(feature = "profiling"))]
        let _ = (&$counter, $value);
    }};
}
