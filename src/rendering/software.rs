/// Software implementation of the pass device.
///
/// Keeps the two capture images and the display image as plain CPU
/// framebuffers. There is deliberately no depth buffer anywhere: depth
/// correctness comes entirely from the pipeline's back-to-front pass
/// order, which is the constraint the whole partitioning scheme exists
/// to satisfy. A pass's triangles are rasterized in submission order;
/// a per-pixel depth-range test applies the pass's clip planes.
use glam::{Mat4, Vec3};
use rayon::prelude::*;

use crate::camera::CameraSnapshot;
use crate::rendering::clip::ClipRange;
use crate::rendering::device::{PassBackground, PassTarget, RenderDevice, Triangle};

/// Color framebuffer (ARGB format).
pub struct Framebuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl Framebuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
        }
    }

    /// Fill with a flat color
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Resize framebuffer
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.resize(width * height, 0);
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.pixels[y * self.width + x]
    }
}

/// One triangle after projection through the frame's snapshot:
/// screen-space corners plus per-vertex view-axis depth.
struct ProjectedTriangle {
    x: [f32; 3],
    y: [f32; 3],
    depth: [f32; 3],
    color: u32,
    blend: bool,
}

struct PassState {
    target: PassTarget,
    clip: ClipRange,
    background: PassBackground,
    triangles: Vec<Triangle>,
}

/// CPU device with two capture slots and a display buffer.
pub struct SoftwareDevice {
    captures: [Framebuffer; 2],
    display: Framebuffer,
    view_proj: Mat4,
    cam_position: Vec3,
    cam_forward: Vec3,
    pass: Option<PassState>,
}

impl SoftwareDevice {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            captures: [Framebuffer::new(width, height), Framebuffer::new(width, height)],
            display: Framebuffer::new(width, height),
            view_proj: Mat4::IDENTITY,
            cam_position: Vec3::ZERO,
            cam_forward: Vec3::NEG_Z,
            pass: None,
        }
    }

    /// Resize all targets (call when the window resizes)
    pub fn resize(&mut self, width: usize, height: usize) {
        self.captures[0].resize(width, height);
        self.captures[1].resize(width, height);
        self.display.resize(width, height);
    }

    /// The image the viewer sees.
    pub fn display(&self) -> &Framebuffer {
        &self.display
    }

    pub fn width(&self) -> usize {
        self.display.width
    }

    pub fn height(&self) -> usize {
        self.display.height
    }

    fn project(&self, triangle: &Triangle, width: f32, height: f32) -> Option<ProjectedTriangle> {
        let mut x = [0.0f32; 3];
        let mut y = [0.0f32; 3];
        let mut depth = [0.0f32; 3];

        for i in 0..3 {
            let clip = self.view_proj * triangle.v[i].extend(1.0);
            // Crude near rejection: any vertex at or behind the eye
            // drops the whole triangle rather than clipping it.
            if clip.w <= 1e-4 {
                return None;
            }
            let inv_w = 1.0 / clip.w;
            x[i] = (clip.x * inv_w * 0.5 + 0.5) * width;
            y[i] = (0.5 - clip.y * inv_w * 0.5) * height;
            depth[i] = (triangle.v[i] - self.cam_position).dot(self.cam_forward);
        }

        Some(ProjectedTriangle {
            x,
            y,
            depth,
            color: triangle.color,
            blend: triangle.blend,
        })
    }

    fn resolve_pass(&mut self, pass: PassState) {
        let width = self.display.width;
        let height = self.display.height;
        if width == 0 || height == 0 {
            return;
        }

        let projected: Vec<ProjectedTriangle> = pass
            .triangles
            .iter()
            .filter_map(|t| self.project(t, width as f32, height as f32))
            .collect();

        // The background goes down first: the previous pass's capture
        // (or the clear color on a frame's first pass) is an opaque
        // plane covering the full view.
        match (pass.target, pass.background) {
            (PassTarget::Display, PassBackground::Clear(color)) => {
                self.display.clear(color);
            }
            (PassTarget::Display, PassBackground::Capture(src)) => {
                self.display.pixels.copy_from_slice(&self.captures[src.0 & 1].pixels);
            }
            (PassTarget::Capture(dst), PassBackground::Clear(color)) => {
                self.captures[dst.0 & 1].clear(color);
            }
            (PassTarget::Capture(dst), PassBackground::Capture(_src)) => {
                // Slots always differ: target parity flips every pass.
                let (head, tail) = self.captures.split_at_mut(1);
                let (dst_fb, src_fb) = if dst.0 & 1 == 0 {
                    (&mut head[0], &tail[0])
                } else {
                    (&mut tail[0], &head[0])
                };
                dst_fb.pixels.copy_from_slice(&src_fb.pixels);
            }
        }

        if projected.is_empty() {
            return;
        }

        let target = match pass.target {
            PassTarget::Display => &mut self.display,
            PassTarget::Capture(slot) => &mut self.captures[slot.0 & 1],
        };

        let clip_near = pass.clip.near.to_f32();
        let clip_far = pass.clip.far.to_f32();

        // Stripe-parallel rasterization. Each stripe owns a disjoint
        // band of rows and replays every triangle in submission order,
        // so per-pixel write order matches a serial draw.
        let stripes = rayon::current_num_threads().max(1);
        let rows_per_stripe = (height + stripes - 1) / stripes;
        let chunk = rows_per_stripe * width;

        target
            .pixels
            .par_chunks_mut(chunk)
            .enumerate()
            .for_each(|(index, band)| {
                let y0 = index * rows_per_stripe;
                let rows = band.len() / width;
                for tri in &projected {
                    raster_triangle(band, width, y0, rows, tri, clip_near, clip_far);
                }
            });
    }

}

impl RenderDevice for SoftwareDevice {
    fn begin_frame(&mut self, snapshot: &CameraSnapshot) {
        self.view_proj = snapshot.view_proj;
        self.cam_position = snapshot.position;
        self.cam_forward = snapshot.forward;
    }

    fn begin_pass(&mut self, target: PassTarget, clip: ClipRange, background: PassBackground) {
        self.pass = Some(PassState {
            target,
            clip,
            background,
            triangles: Vec::new(),
        });
    }

    fn submit_triangle(&mut self, triangle: Triangle) {
        if let Some(pass) = &mut self.pass {
            pass.triangles.push(triangle);
        }
    }

    fn end_pass(&mut self) {
        if let Some(pass) = self.pass.take() {
            self.resolve_pass(pass);
        }
    }

    fn wait_vblank(&mut self) {
        // CPU rasterization completed in end_pass; pacing against the
        // real display is the window loop's concern.
    }
}

/// Rasterize one projected triangle into a horizontal band of rows.
/// `band` starts at global row `y0` and holds `rows` full rows.
fn raster_triangle(
    band: &mut [u32],
    width: usize,
    y0: usize,
    rows: usize,
    tri: &ProjectedTriangle,
    clip_near: f32,
    clip_far: f32,
) {
    let min_x = tri.x[0].min(tri.x[1]).min(tri.x[2]).floor().max(0.0) as usize;
    let max_x = (tri.x[0].max(tri.x[1]).max(tri.x[2]).ceil() as isize).min(width as isize - 1);
    if max_x < 0 {
        return;
    }
    let max_x = max_x as usize;
    if min_x > max_x {
        return;
    }

    let band_min_y = y0 as f32;
    let band_max_y = (y0 + rows) as f32;
    let min_y = tri.y[0].min(tri.y[1]).min(tri.y[2]).floor().max(band_min_y) as usize;
    let max_y_f = tri.y[0].max(tri.y[1]).max(tri.y[2]).ceil().min(band_max_y - 1.0);
    if max_y_f < band_min_y {
        return;
    }
    let max_y = max_y_f as usize;
    if min_y > max_y {
        return;
    }

    let (x0, x1, x2) = (tri.x[0], tri.x[1], tri.x[2]);
    let (ty0, ty1, ty2) = (tri.y[0], tri.y[1], tri.y[2]);

    let denom = (ty1 - ty2) * (x0 - x2) + (x2 - x1) * (ty0 - ty2);
    if denom.abs() < 1e-6 {
        return; // degenerate sliver
    }
    let inv_denom = 1.0 / denom;

    for py in min_y..=max_y {
        let sy = py as f32 + 0.5;
        let row = (py - y0) * width;
        for px in min_x..=max_x {
            let sx = px as f32 + 0.5;

            let w0 = ((ty1 - ty2) * (sx - x2) + (x2 - x1) * (sy - ty2)) * inv_denom;
            let w1 = ((ty2 - ty0) * (sx - x2) + (x0 - x2) * (sy - ty2)) * inv_denom;
            let w2 = 1.0 - w0 - w1;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            if !tri.blend {
                // The pass's clip planes, applied per pixel. Both ends
                // inclusive: a pixel exactly on the shared plane is
                // drawn by both adjacent passes with identical results.
                let depth = w0 * tri.depth[0] + w1 * tri.depth[1] + w2 * tri.depth[2];
                if depth < clip_near || depth > clip_far {
                    continue;
                }
            }

            let index = row + px;
            band[index] = if tri.blend {
                mix_colors(band[index], tri.color)
            } else {
                tri.color
            };
        }
    }
}

/// 50/50 per-channel blend for the translucent overlay.
#[inline]
fn mix_colors(dst: u32, src: u32) -> u32 {
    ((dst >> 1) & 0x7F7F7F7F).wrapping_add((src >> 1) & 0x7F7F7F7F) | 0xFF000000
}
