/// Entity-side contracts for the renderer.
///
/// The renderer does not know what an entity is; it only needs the
/// surface below. Concrete game types (player, props, terrain slabs)
/// implement `DrawSource` and register with the `World`; ownership
/// stays with the world container and the renderer addresses entities
/// by slot id for the lifetime of the registration.
use glam::Mat4;

use crate::rendering::device::DrawContext;

/// What an entity must expose to participate in rendering.
pub trait DrawSource {
    /// World transform the entity cached for the current frame. The
    /// renderer reads it once at gather time and again at draw time
    /// within the same frame; entities must not mutate it in between
    /// (game updates run outside the render tick).
    fn cached_transform(&self) -> Mat4;

    /// Radius of the bounding sphere around the transform origin.
    fn bounding_radius(&self) -> f32;

    /// Important entities survive the degraded overlap reseed;
    /// unimportant ones may show seams under pathological overlap.
    fn important(&self) -> bool {
        false
    }

    /// Simple entities collapse their depth extent to the center
    /// distance at gather time: cheaper to schedule, and they never
    /// straddle a clip plane, so they are never redrawn across passes.
    fn simple(&self) -> bool {
        false
    }

    /// Primitive count this entity submits when drawn. Used for pass
    /// packing; it is a planning figure, not an enforced quota.
    fn primitive_cost(&self) -> u32;

    /// Emit primitives for the cached transform.
    fn draw(&self, ctx: &mut DrawContext<'_>);

    /// Visibility side channel written by the gather step each frame.
    /// Consumers outside the renderer (minimap, audio focus) may
    /// override this; the default discards the flag.
    fn set_visible(&mut self, _visible: bool) {}
}

/// A drawable entity that also advances game state. The engine's
/// update tick runs independently of rendering.
pub trait Entity: DrawSource {
    fn update(&mut self, _dt: f32) {}
}

/// Translucent effects layer drawn once per frame, after all geometry
/// of the final pass and before present. Stateful so effects can
/// animate.
pub trait OverlaySource {
    fn draw(&mut self, ctx: &mut DrawContext<'_>);
}
