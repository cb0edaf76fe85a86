/// Camera system with FPS-style controls and per-frame snapshots.
///
/// Game code mutates the live `Camera` freely; the renderer never reads
/// it directly. At the start of each frame the driver freezes it into a
/// `CameraSnapshot`, and every pass of that frame culls, sorts, and
/// draws against the snapshot. A camera moved mid-frame therefore
/// cannot tear the image across passes.
use glam::{Mat4, Quat, Vec3, Vec4};

use crate::fixed::Fixed;

pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,   // Rotation around Y axis (radians)
    pub pitch: f32, // Rotation around X axis (radians)
    pub fov: f32,
    pub aspect_ratio: f32,

    // Movement state
    pub move_speed: f32,
    pub mouse_sensitivity: f32,
}

impl Camera {
    pub fn new(position: Vec3, aspect_ratio: f32) -> Self {
        Self {
            position,
            yaw: 0.0,
            pitch: 0.0,
            fov: 70.0f32.to_radians(),
            aspect_ratio,
            move_speed: 10.0,
            mouse_sensitivity: 0.002,
        }
    }

    /// Update camera orientation to look at a specific target point.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let view_matrix = Mat4::look_at_rh(self.position, target, up);
        let rotation_quat = Quat::from_mat4(&view_matrix.inverse());
        let (pitch, yaw, _roll) = rotation_quat.to_euler(glam::EulerRot::YXZ);
        self.yaw = yaw;
        self.pitch = pitch;
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        let rotation = self.rotation_quat();
        let forward = rotation * Vec3::NEG_Z;
        let target = self.position + forward;
        let up = rotation * Vec3::Y;

        Mat4::look_at_rh(self.position, target, up)
    }

    /// Get forward direction vector
    pub fn forward(&self) -> Vec3 {
        self.rotation_quat() * Vec3::NEG_Z
    }

    /// Get right direction vector
    pub fn right(&self) -> Vec3 {
        self.rotation_quat() * Vec3::X
    }

    /// Get up direction vector
    pub fn up(&self) -> Vec3 {
        self.rotation_quat() * Vec3::Y
    }

    /// Get rotation quaternion
    fn rotation_quat(&self) -> Quat {
        Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// Update camera orientation from mouse delta
    pub fn rotate(&mut self, mouse_delta_x: f32, mouse_delta_y: f32) {
        self.yaw += mouse_delta_x * self.mouse_sensitivity;
        self.pitch -= mouse_delta_y * self.mouse_sensitivity;

        // Clamp pitch to prevent gimbal lock
        const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
        self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move camera in local space
    pub fn move_local(&mut self, forward: f32, right: f32, up: f32, dt: f32) {
        let move_vec = self.forward() * forward + self.right() * right + Vec3::Y * up;
        self.position += move_vec * self.move_speed * dt;
    }

    /// Update aspect ratio (call when window resizes)
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Freeze the current camera state for one frame.
    ///
    /// `min_clip` and `max_view` bound the projection used for culling;
    /// they are the same distances the clip-plane solver marches
    /// between, so the frustum never admits an entity the passes cannot
    /// cover.
    pub fn snapshot(&self, min_clip: f32, max_view: f32) -> CameraSnapshot {
        let projection = Mat4::perspective_rh(self.fov, self.aspect_ratio, min_clip, max_view);
        let view_proj = projection * self.view_matrix();

        CameraSnapshot {
            position: self.position,
            forward: self.forward(),
            right: self.right(),
            up: self.up(),
            fov: self.fov,
            aspect_ratio: self.aspect_ratio,
            view_proj,
            frustum: Frustum::from_view_projection(&view_proj),
        }
    }
}

/// Frozen camera state for one frame.
///
/// Read-only after construction; gathering, clip-plane math, and every
/// draw submission within the frame use this snapshot, never the live
/// camera.
#[derive(Debug, Clone, Copy)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub view_proj: Mat4,
    frustum: Frustum,
}

impl CameraSnapshot {
    /// View-axis depth of a world-space point, quantized once to the
    /// fixed-point domain. Everything downstream of this call compares
    /// and subdivides depths in `Fixed` only.
    #[inline]
    pub fn depth_of(&self, point: Vec3) -> Fixed {
        Fixed::from_f32((point - self.position).dot(self.forward))
    }

    /// Test a bounding sphere against the view volume.
    #[inline]
    pub fn sphere_in_view(&self, center: Vec3, radius: f32) -> bool {
        self.frustum.intersects_sphere(center, radius)
    }
}

/// View frustum represented as 6 planes for bounding-sphere culling
/// Planes are stored in Hessian normal form: ax + by + cz + d = 0
/// where (a,b,c) is the outward-facing normal
#[derive(Debug, Clone, Copy)]
pub struct Frustum {
    /// 6 planes: left, right, bottom, top, near, far
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract frustum planes from a view-projection matrix
    /// Using Gribb-Hartmann method (fast extraction from MVP)
    pub fn from_view_projection(vp: &Mat4) -> Self {
        // Extract rows from the matrix. In glam's column-major Mat4,
        // rows still correspond to the plane extraction used by the
        // standard Gribb-Hartmann method.
        let row0 = vp.row(0);
        let row1 = vp.row(1);
        let row2 = vp.row(2);
        let row3 = vp.row(3);

        let mut planes = [Vec4::ZERO; 6];

        // Left plane: row3 + row0
        planes[0] = Self::normalize_plane(row3 + row0);
        // Right plane: row3 - row0
        planes[1] = Self::normalize_plane(row3 - row0);
        // Bottom plane: row3 + row1
        planes[2] = Self::normalize_plane(row3 + row1);
        // Top plane: row3 - row1
        planes[3] = Self::normalize_plane(row3 - row1);
        // Near plane: row3 + row2
        planes[4] = Self::normalize_plane(row3 + row2);
        // Far plane: row3 - row2
        planes[5] = Self::normalize_plane(row3 - row2);

        Self { planes }
    }

    /// Normalize a plane equation
    #[inline]
    fn normalize_plane(plane: Vec4) -> Vec4 {
        let normal_length = plane.truncate().length();
        if normal_length > 0.0001 {
            plane / normal_length
        } else {
            plane
        }
    }

    /// Test if a bounding sphere intersects the frustum
    /// Returns true if the sphere is at least partially inside
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        // A sphere is outside as soon as its center lies more than
        // `radius` behind any single plane.
        for plane in &self.planes {
            let dist = plane.x * center.x + plane.y * center.y + plane.z * center.z + plane.w;
            if dist < -radius {
                return false;
            }
        }

        true
    }
}


/// Camera controller - handles input state
pub struct CameraController {
    pub forward_pressed: bool,
    pub backward_pressed: bool,
    pub left_pressed: bool,
    pub right_pressed: bool,
    pub up_pressed: bool,
    pub down_pressed: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            forward_pressed: false,
            backward_pressed: false,
            left_pressed: false,
            right_pressed: false,
            up_pressed: false,
            down_pressed: false,
        }
    }

    /// Update camera based on controller state
    pub fn update_camera(&self, camera: &mut Camera, dt: f32) {
        let mut forward = 0.0;
        let mut right = 0.0;
        let mut up = 0.0;

        if self.forward_pressed {
            forward += 1.0;
        }
        if self.backward_pressed {
            forward -= 1.0;
        }
        if self.right_pressed {
            right += 1.0;
        }
        if self.left_pressed {
            right -= 1.0;
        }
        if self.up_pressed {
            up += 1.0;
        }
        if self.down_pressed {
            up -= 1.0;
        }

        camera.move_local(forward, right, up, dt);
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
