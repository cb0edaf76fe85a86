/// Demo application entry point
/// Handles window creation, input, and the tick/draw loop
use glam::{Mat4, Vec3};
use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use slice_engine::entity::{DrawSource, Entity, OverlaySource};
use slice_engine::rendering::DrawContext;
use slice_engine::*;
use winit::{
    event::*,
    event_loop::{ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};

/// Convert RGB to ARGB u32
#[inline]
const fn rgb_to_u32(r: u8, g: u8, b: u8) -> u32 {
    0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
}

/// Scale a color's brightness (flat per-face shading)
#[inline]
fn shade(color: u32, factor: f32) -> u32 {
    let r = (((color >> 16) & 0xFF) as f32 * factor) as u8;
    let g = (((color >> 8) & 0xFF) as f32 * factor) as u8;
    let b = ((color & 0xFF) as f32 * factor) as u8;
    rgb_to_u32(r, g, b)
}

/// Emit an axis-aligned box as 6 shaded quads (12 primitives).
fn draw_box(ctx: &mut DrawContext<'_>, center: Vec3, half: Vec3, color: u32) {
    let (cx, cy, cz) = (center.x, center.y, center.z);
    let (hx, hy, hz) = (half.x, half.y, half.z);

    // Top, bottom, and the four sides with simple directional shading.
    ctx.quad(
        [
            Vec3::new(cx - hx, cy + hy, cz - hz),
            Vec3::new(cx + hx, cy + hy, cz - hz),
            Vec3::new(cx + hx, cy + hy, cz + hz),
            Vec3::new(cx - hx, cy + hy, cz + hz),
        ],
        color,
    );
    ctx.quad(
        [
            Vec3::new(cx - hx, cy - hy, cz - hz),
            Vec3::new(cx + hx, cy - hy, cz - hz),
            Vec3::new(cx + hx, cy - hy, cz + hz),
            Vec3::new(cx - hx, cy - hy, cz + hz),
        ],
        shade(color, 0.4),
    );
    ctx.quad(
        [
            Vec3::new(cx - hx, cy - hy, cz - hz),
            Vec3::new(cx + hx, cy - hy, cz - hz),
            Vec3::new(cx + hx, cy + hy, cz - hz),
            Vec3::new(cx - hx, cy + hy, cz - hz),
        ],
        shade(color, 0.8),
    );
    ctx.quad(
        [
            Vec3::new(cx - hx, cy - hy, cz + hz),
            Vec3::new(cx + hx, cy - hy, cz + hz),
            Vec3::new(cx + hx, cy + hy, cz + hz),
            Vec3::new(cx - hx, cy + hy, cz + hz),
        ],
        shade(color, 0.8),
    );
    ctx.quad(
        [
            Vec3::new(cx - hx, cy - hy, cz - hz),
            Vec3::new(cx - hx, cy - hy, cz + hz),
            Vec3::new(cx - hx, cy + hy, cz + hz),
            Vec3::new(cx - hx, cy + hy, cz - hz),
        ],
        shade(color, 0.6),
    );
    ctx.quad(
        [
            Vec3::new(cx + hx, cy - hy, cz - hz),
            Vec3::new(cx + hx, cy - hy, cz + hz),
            Vec3::new(cx + hx, cy + hy, cz + hz),
            Vec3::new(cx + hx, cy + hy, cz - hz),
        ],
        shade(color, 0.6),
    );
}

/// Static platform entity
struct Slab {
    transform: Mat4,
    half: Vec3,
    color: u32,
}

impl Slab {
    fn new(position: Vec3, half: Vec3, color: u32) -> Self {
        Self {
            transform: Mat4::from_translation(position),
            half,
            color,
        }
    }
}

impl DrawSource for Slab {
    fn cached_transform(&self) -> Mat4 {
        self.transform
    }
    fn bounding_radius(&self) -> f32 {
        self.half.length()
    }
    fn important(&self) -> bool {
        true
    }
    fn primitive_cost(&self) -> u32 {
        12
    }
    fn draw(&self, ctx: &mut DrawContext<'_>) {
        draw_box(ctx, self.transform.w_axis.truncate(), self.half, self.color);
    }
}

impl Entity for Slab {}

/// Cube circling a fixed center point
struct Orbiter {
    center: Vec3,
    orbit_radius: f32,
    speed: f32,
    angle: f32,
    size: f32,
    color: u32,
    important: bool,
    transform: Mat4,
}

impl Orbiter {
    fn new(center: Vec3, orbit_radius: f32, speed: f32, angle: f32, size: f32, color: u32) -> Self {
        let mut orbiter = Self {
            center,
            orbit_radius,
            speed,
            angle,
            size,
            color,
            important: size >= 2.0,
            transform: Mat4::IDENTITY,
        };
        orbiter.recache();
        orbiter
    }

    fn recache(&mut self) {
        let offset = Vec3::new(
            self.angle.cos() * self.orbit_radius,
            0.0,
            self.angle.sin() * self.orbit_radius,
        );
        self.transform = Mat4::from_translation(self.center + offset);
    }
}

impl DrawSource for Orbiter {
    fn cached_transform(&self) -> Mat4 {
        self.transform
    }
    fn bounding_radius(&self) -> f32 {
        self.size * 1.75
    }
    fn important(&self) -> bool {
        self.important
    }
    fn simple(&self) -> bool {
        // Small cubes schedule at their center depth.
        !self.important
    }
    fn primitive_cost(&self) -> u32 {
        12
    }
    fn draw(&self, ctx: &mut DrawContext<'_>) {
        draw_box(
            ctx,
            self.transform.w_axis.truncate(),
            Vec3::splat(self.size),
            self.color,
        );
    }
}

impl Entity for Orbiter {
    fn update(&mut self, dt: f32) {
        self.angle += self.speed * dt;
        self.recache();
    }
}

/// Slow-pulsing translucent haze across the whole view
struct HazePulse {
    phase: f32,
}

impl OverlaySource for HazePulse {
    fn draw(&mut self, ctx: &mut DrawContext<'_>) {
        self.phase += 0.06;
        let snap = *ctx.snapshot();

        let dist = 4.0;
        let half_h = dist * (snap.fov * 0.5).tan() * 1.4;
        let half_w = half_h * snap.aspect_ratio;
        let center = snap.position + snap.forward * dist;

        let glow = 0.55 + 0.45 * self.phase.sin();
        let color = shade(0xFFB8C8FF, glow);
        ctx.quad(
            [
                center - snap.right * half_w - snap.up * half_h,
                center + snap.right * half_w - snap.up * half_h,
                center + snap.right * half_w + snap.up * half_h,
                center - snap.right * half_w + snap.up * half_h,
            ],
            color,
        );
    }
}

fn populate_scene(engine: &mut Engine<SoftwareDevice>) {
    // Ground platform
    engine.add_entity(Box::new(Slab::new(
        Vec3::new(0.0, -6.0, -60.0),
        Vec3::new(60.0, 1.0, 60.0),
        0xFF3E7C3E,
    )));

    // Rings of orbiters at staggered depths; enough combined cost that
    // a frame regularly needs several passes.
    let palette = [0xFFCC4444u32, 0xFF44AACC, 0xFFCCAA33, 0xFF9955CC, 0xFF55CC88];
    for ring in 0..5 {
        let depth = -30.0 - ring as f32 * 35.0;
        let count = 10 + ring * 4;
        for i in 0..count {
            let angle = i as f32 / count as f32 * std::f32::consts::TAU;
            engine.add_entity(Box::new(Orbiter::new(
                Vec3::new(0.0, 2.0 + (ring % 3) as f32 * 4.0, depth),
                12.0 + ring as f32 * 3.0,
                0.2 + 0.07 * ring as f32,
                angle,
                if i % 4 == 0 { 2.5 } else { 1.4 },
                palette[(ring + i) % palette.len()],
            )));
        }
    }
}

fn main() {
    env_logger::init();

    println!("=== Slice Engine - Multi-Pass Software Renderer ===");
    println!("Controls:");
    println!("  WASD - Move camera");
    println!("  Space/Shift - Up/Down");
    println!("  Mouse (click to capture) - Look around");
    println!("  O - Toggle effects overlay");
    println!("  P - Toggle single-pass debug mode");
    println!("  R - Print pipeline report");
    println!("  ESC - Exit");
    println!();

    // Create event loop and window
    let event_loop = EventLoop::new().unwrap();
    let window = Arc::new(
        WindowBuilder::new()
            .with_title("Slice Engine")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
            .build(&event_loop)
            .unwrap(),
    );

    // Software presentation surface
    let context = softbuffer::Context::new(window.clone()).unwrap();
    let mut surface = softbuffer::Surface::new(&context, window.clone()).unwrap();

    let window_size = window.inner_size();
    let width = window_size.width as usize;
    let height = window_size.height as usize;

    let config = RenderConfig {
        // Small budgets on purpose: the scene is built to overflow them
        // so the pass partitioning is visibly exercised.
        max_primitives_per_pass: 256,
        max_objects_per_pass: 24,
        effects_overlay: false,
        ..Default::default()
    };

    let mut engine = Engine::new(
        SoftwareDevice::new(width, height),
        config,
        width as f32 / height as f32,
    );
    engine.set_overlay(Some(Box::new(HazePulse { phase: 0.0 })));
    populate_scene(&mut engine);
    engine.set_camera(Vec3::new(0.0, 8.0, 30.0), Vec3::new(0.0, 0.0, -60.0));

    println!("Scene: {} entities\n", engine.entity_count());

    let mut camera_controller = CameraController::new();

    // Timing
    let mut last_frame = Instant::now();
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    // Mouse state
    let mut mouse_captured = false;
    let mut last_mouse_pos: Option<(f64, f64)> = None;

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);

            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        elwt.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        let (w, h) = (new_size.width as usize, new_size.height as usize);
                        engine.device_mut().resize(w, h);
                        engine.camera_mut().set_aspect_ratio(w as f32 / h as f32);
                        if let (Some(nw), Some(nh)) =
                            (NonZeroU32::new(new_size.width), NonZeroU32::new(new_size.height))
                        {
                            surface.resize(nw, nh).unwrap();
                        }
                    }
                    WindowEvent::MouseInput {
                        state: ElementState::Pressed,
                        button: MouseButton::Left,
                        ..
                    } => {
                        mouse_captured = true;
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if mouse_captured {
                            if let Some((lx, ly)) = last_mouse_pos {
                                let dx = (position.x - lx) as f32;
                                let dy = (position.y - ly) as f32;
                                engine.camera_mut().rotate(dx, dy);
                            }
                        }
                        last_mouse_pos = Some((position.x, position.y));
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        let pressed = event.state == ElementState::Pressed;

                        if let PhysicalKey::Code(keycode) = event.physical_key {
                            match keycode {
                                KeyCode::KeyW => camera_controller.forward_pressed = pressed,
                                KeyCode::KeyS => camera_controller.backward_pressed = pressed,
                                KeyCode::KeyA => camera_controller.left_pressed = pressed,
                                KeyCode::KeyD => camera_controller.right_pressed = pressed,
                                KeyCode::Space => camera_controller.up_pressed = pressed,
                                KeyCode::ShiftLeft => camera_controller.down_pressed = pressed,
                                KeyCode::KeyO if pressed => {
                                    let config = engine.config_mut();
                                    config.effects_overlay = !config.effects_overlay;
                                    println!(
                                        "Effects overlay: {}",
                                        if config.effects_overlay { "ON" } else { "OFF" }
                                    );
                                }
                                KeyCode::KeyP if pressed => {
                                    let config = engine.config_mut();
                                    config.single_pass_debug = !config.single_pass_debug;
                                    println!(
                                        "Single-pass debug: {}",
                                        if config.single_pass_debug { "ON" } else { "OFF" }
                                    );
                                }
                                KeyCode::KeyR if pressed => {
                                    RENDER_COUNTERS.snapshot().print_report();
                                }
                                KeyCode::Escape if pressed => {
                                    if mouse_captured {
                                        mouse_captured = false;
                                    } else {
                                        elwt.exit();
                                    }
                                }
                                _ => {}
                            }
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        let dt = (now - last_frame).as_secs_f32().min(0.1);
                        last_frame = now;

                        camera_controller.update_camera(engine.camera_mut(), dt);
                        engine.update(dt);

                        // Run passes until the frame presents (or drops).
                        engine.draw_frame();

                        // Blit the display buffer to the window.
                        if let Ok(mut buffer) = surface.buffer_mut() {
                            let display = engine.device().display();
                            if buffer.len() == display.pixels.len() {
                                buffer.copy_from_slice(&display.pixels);
                            }
                            let _ = buffer.present();
                        }

                        frame_count += 1;
                        if fps_timer.elapsed().as_secs_f32() >= 1.0 {
                            println!("FPS: {}", frame_count);
                            frame_count = 0;
                            fps_timer = Instant::now();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .unwrap();
}
