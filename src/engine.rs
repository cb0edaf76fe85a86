/// Engine context tying the subsystems together.
///
/// Owns the world, the live camera, the frame driver, and the render
/// device; there is no global engine state. `update` advances game
/// entities and is independent of rendering; `draw` advances the
/// render state machine by exactly one tick.
use glam::Vec3;

use crate::camera::Camera;
use crate::entity::{Entity, OverlaySource};
use crate::rendering::device::RenderDevice;
use crate::rendering::driver::{FrameDriver, TickOutcome};
use crate::rendering::RenderConfig;
use crate::world::{EntityId, World};

pub struct Engine<D: RenderDevice> {
    world: World,
    camera: Camera,
    driver: FrameDriver,
    device: D,
    config: RenderConfig,
    overlay: Option<Box<dyn OverlaySource>>,
}

impl<D: RenderDevice> Engine<D> {
    pub fn new(device: D, config: RenderConfig, aspect_ratio: f32) -> Self {
        let mut camera = Camera::new(Vec3::ZERO, aspect_ratio);
        camera.fov = config.fov;
        Self {
            world: World::new(),
            camera,
            driver: FrameDriver::new(),
            device,
            config,
            overlay: None,
        }
    }

    /// Register an entity for update and rendering.
    pub fn add_entity(&mut self, entity: Box<dyn Entity>) -> EntityId {
        self.world.add_entity(entity)
    }

    /// Unregister an entity, returning ownership to the caller.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Box<dyn Entity>> {
        self.world.remove_entity(id)
    }

    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    /// Place the camera and aim it at a target point.
    pub fn set_camera(&mut self, position: Vec3, target: Vec3) {
        self.camera.position = position;
        self.camera.look_at(target, Vec3::Y);
    }

    /// Install or remove the translucent effects layer.
    pub fn set_overlay(&mut self, overlay: Option<Box<dyn OverlaySource>>) {
        self.overlay = overlay;
    }

    /// Advance game entities; independent of rendering.
    pub fn update(&mut self, dt: f32) {
        self.world.update(dt);
    }

    /// Advance the render state machine by one tick: one pass
    /// submission, one presented frame, or one dropped frame. Bails
    /// are reported in the outcome, never as errors.
    pub fn draw(&mut self) -> TickOutcome {
        self.driver.tick(
            &mut self.world,
            &self.camera,
            &mut self.device,
            self.overlay.as_deref_mut(),
            &self.config,
        )
    }

    /// Run ticks until the current frame either presents or drops.
    /// Convenience for callers pacing whole frames rather than passes.
    pub fn draw_frame(&mut self) -> TickOutcome {
        loop {
            match self.draw() {
                TickOutcome::PassSubmitted => continue,
                done => return done,
            }
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }
}
