use crate::constants::{CAMERA_FOVY_DEG, CAMERA_Z, CAMERA_ZFAR, CAMERA_ZNEAR, TARGET_ASPECT};
use glam::{Mat4, Vec2, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, CAMERA_Z),
            target: Vec3::new(0.0, 0.0, CAMERA_Z - 1.0),
            up: Vec3::Y,
            aspect: TARGET_ASPECT,
            fovy_radians: CAMERA_FOVY_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalised device coordinates
    /// (x right, y up, both in \[-1, 1\]).
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = self.view_proj().inverse();
        let p_far = inv * Vec4::new(ndc.x, ndc.y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        Ray {
            origin: self.eye,
            dir: (p1 - self.eye).normalize(),
        }
    }

    /// Inverse of [`Camera::ray_from_ndc`]: where a world point lands in NDC.
    pub fn project(&self, world: Vec3) -> Vec2 {
        let clip = self.view_proj() * world.extend(1.0);
        Vec2::new(clip.x / clip.w, clip.y / clip.w)
    }
}

/// Client-space rectangle occupied by the render surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl SurfaceRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(left, top),
            size: Vec2::new(width, height),
        }
    }

    /// Client coordinates to NDC; `None` for an empty rect.
    pub fn client_to_ndc(&self, client: Vec2) -> Option<Vec2> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return None;
        }
        let local = (client - self.origin) / self.size;
        Some(Vec2::new(local.x * 2.0 - 1.0, 1.0 - local.y * 2.0))
    }

    pub fn ndc_to_client(&self, ndc: Vec2) -> Vec2 {
        let local = Vec2::new((ndc.x + 1.0) * 0.5, (1.0 - ndc.y) * 0.5);
        self.origin + local * self.size
    }
}

/// Surface size and centring offsets that fit `available` at a fixed aspect
/// ratio without stretching.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Letterbox {
    pub width: f32,
    pub height: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

pub fn letterbox(available: Vec2, target_aspect: f32) -> Letterbox {
    let avail_w = available.x.max(0.0);
    let avail_h = available.y.max(0.0);
    if avail_h <= 0.0 || target_aspect <= 0.0 {
        return Letterbox {
            width: avail_w,
            height: avail_h,
            offset_x: 0.0,
            offset_y: 0.0,
        };
    }
    let (width, height) = if avail_w / avail_h > target_aspect {
        (avail_h * target_aspect, avail_h)
    } else {
        (avail_w, avail_w / target_aspect)
    };
    Letterbox {
        width,
        height,
        offset_x: (avail_w - width) * 0.5,
        offset_y: (avail_h - height) * 0.5,
    }
}
