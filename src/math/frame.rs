use glam::Vec3;

pub const REFERENCE_UP: Vec3 = Vec3::Z;
pub const FALLBACK_UP: Vec3 = Vec3::Y;
pub const FALLBACK_TANGENT: Vec3 = Vec3::X;

// Squared lengths below this count as zero.
pub const DEGENERATE_EPSILON: f32 = 1e-8;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub tangent: Vec3,
    pub axis1: Vec3,
    pub axis2: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSample {
    pub point: Vec3,
    pub frame: Frame,
}

// Purely local: nothing is carried over from neighbouring segments.
pub fn estimate_frame(prev: Vec3, next: Vec3) -> Frame {
    let delta = next - prev;
    let tangent = if delta.length_squared() > DEGENERATE_EPSILON {
        delta.normalize()
    } else {
        FALLBACK_TANGENT
    };

    let mut side = tangent.cross(REFERENCE_UP);
    if side.length_squared() < DEGENERATE_EPSILON {
        side = tangent.cross(FALLBACK_UP);
    }
    let axis1 = side.normalize();
    let axis2 = axis1.cross(tangent).normalize();

    Frame {
        tangent,
        axis1,
        axis2,
    }
}
