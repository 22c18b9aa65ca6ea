use std::f32::consts::PI;

use glam::Vec3;

use crate::math::CurveSample;
use crate::math::frame::DEGENERATE_EPSILON;
use crate::yarn::config::VERTICES_PER_SIDE;

pub const LIGHT_DIRECTIONS: [Vec3; 2] = [Vec3::new(0.0, 0.6, 0.8), Vec3::new(-0.8, -0.36, 0.48)];
pub const AMBIENT: f32 = 0.2;

#[inline]
pub fn pack_unorm8(value: f32) -> u32 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u32
}

#[inline]
pub fn unpack_unorm8(channel: u32) -> f32 {
    (channel & 0xFF) as f32 / 255.0
}

// r | g << 8 | b << 16 | a << 24
#[inline]
pub fn pack_rgba8(r: f32, g: f32, b: f32, a: f32) -> u32 {
    pack_unorm8(r) | (pack_unorm8(g) << 8) | (pack_unorm8(b) << 16) | (pack_unorm8(a) << 24)
}

pub fn unpack_rgba8(color: u32) -> [f32; 4] {
    [
        unpack_unorm8(color),
        unpack_unorm8(color >> 8),
        unpack_unorm8(color >> 16),
        unpack_unorm8(color >> 24),
    ]
}

pub fn triangle_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let n = (b - a).cross(c - a);
    if n.length_squared() > DEGENERATE_EPSILON * DEGENERATE_EPSILON {
        n.normalize()
    } else {
        Vec3::ZERO
    }
}

pub fn shade(normal: Vec3) -> f32 {
    let diffuse: f32 = LIGHT_DIRECTIONS
        .iter()
        .map(|light| normal.dot(*light).clamp(0.0, 1.0))
        .sum();
    diffuse.clamp(0.0, 1.0) + AMBIENT
}

pub fn shade_triangle(a: Vec3, b: Vec3, c: Vec3) -> u32 {
    let value = shade(triangle_normal(a, b, c));
    pack_rgba8(value, value, value, 1.0)
}

#[derive(Clone, Copy, Debug)]
pub struct TubeExtruder {
    pub sides: u32,
    pub radius: f32,
}

impl TubeExtruder {
    pub fn new(sides: u32, radius: f32) -> Self {
        Self { sides, radius }
    }

    pub fn vertex_count(&self) -> u32 {
        VERTICES_PER_SIDE * self.sides
    }

    fn ring_point(&self, sample: &CurveSample, v: f32, offset: Vec3) -> Vec3 {
        let angle = 2.0 * PI * v;
        sample.point
            + sample.frame.axis1 * (self.radius * angle.cos())
            + sample.frame.axis2 * (self.radius * angle.sin())
            + offset
    }

    pub fn extrude<F>(&self, start: &CurveSample, end: &CurveSample, offset: Vec3, mut emit: F)
    where
        F: FnMut(usize, Vec3, u32),
    {
        for i in 0..self.sides {
            let v0 = i as f32 / self.sides as f32;
            let v1 = (i + 1) as f32 / self.sides as f32;

            let p3 = self.ring_point(start, v0, offset);
            let p2 = self.ring_point(end, v0, offset);
            let p1 = self.ring_point(end, v1, offset);
            let p0 = self.ring_point(start, v1, offset);

            // (axis1, axis2) turns clockwise around the tangent, so this
            // winding gives outward normals.
            let first = shade_triangle(p0, p2, p1);
            let second = shade_triangle(p0, p3, p2);

            let base = (i * VERTICES_PER_SIDE) as usize;
            emit(base, p0, first);
            emit(base + 1, p2, first);
            emit(base + 2, p1, first);
            emit(base + 3, p0, second);
            emit(base + 4, p3, second);
            emit(base + 5, p2, second);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::estimate_frame;
    use approx::assert_relative_eq;

    fn straight_samples() -> (CurveSample, CurveSample) {
        let frame = estimate_frame(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
        (
            CurveSample {
                point: Vec3::ZERO,
                frame,
            },
            CurveSample {
                point: Vec3::X,
                frame,
            },
        )
    }

    #[test]
    fn test_light_directions_are_unit() {
        for light in LIGHT_DIRECTIONS {
            assert_relative_eq!(light.length(), 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_pack_roundtrip_within_one_step() {
        for i in 0..=1000 {
            let d = i as f32 / 1000.0;
            let back = unpack_unorm8(pack_unorm8(d));
            assert!((back - d).abs() <= 1.0 / 255.0, "{d} -> {back}");
        }
    }

    #[test]
    fn test_pack_saturates() {
        assert_eq!(pack_unorm8(1.7), 255);
        assert_eq!(pack_unorm8(-0.3), 0);
        assert_eq!(pack_rgba8(1.0, 0.0, 0.0, 1.0), 0xFF00_00FF);
        assert_eq!(unpack_rgba8(0xFF00_00FF), [1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_shade_bounds() {
        assert_relative_eq!(shade(Vec3::ZERO), AMBIENT);
        assert_relative_eq!(shade(LIGHT_DIRECTIONS[0]), 1.0 + AMBIENT);
        assert_relative_eq!(shade(-LIGHT_DIRECTIONS[0]), AMBIENT, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_triangle_gets_ambient() {
        let color = shade_triangle(Vec3::ONE, Vec3::ONE, Vec3::ONE);
        assert_eq!(color & 0xFF, pack_unorm8(AMBIENT));
        assert_eq!(color >> 24, 255);
    }

    #[test]
    fn test_emits_six_vertices_per_side() {
        let (start, end) = straight_samples();
        for sides in [3, 4, 12, 17] {
            let extruder = TubeExtruder::new(sides, 0.25);
            let mut seen = vec![false; extruder.vertex_count() as usize];
            extruder.extrude(&start, &end, Vec3::ZERO, |i, _, _| {
                assert!(!seen[i]);
                seen[i] = true;
            });
            assert!(seen.iter().all(|s| *s));
            assert_eq!(seen.len(), 6 * sides as usize);
        }
    }

    #[test]
    fn test_vertices_lie_on_tube_wall() {
        let (start, end) = straight_samples();
        let extruder = TubeExtruder::new(12, 0.25);
        let offset = Vec3::new(0.0, 3.0, 0.0);
        extruder.extrude(&start, &end, offset, |_, p, _| {
            let local = p - offset;
            let radial = (local.y * local.y + local.z * local.z).sqrt();
            assert_relative_eq!(radial, 0.25, epsilon = 1e-5);
            assert!(local.x.abs() < 1e-6 || (local.x - 1.0).abs() < 1e-6);
        });
    }

    #[test]
    fn test_triangle_colors_are_uniform() {
        let (start, end) = straight_samples();
        let extruder = TubeExtruder::new(8, 0.5);
        let mut colors = vec![0u32; extruder.vertex_count() as usize];
        extruder.extrude(&start, &end, Vec3::ZERO, |i, _, c| colors[i] = c);
        for tri in colors.chunks_exact(3) {
            assert_eq!(tri[0], tri[1]);
            assert_eq!(tri[1], tri[2]);
        }
    }

    #[test]
    fn test_normals_point_outward() {
        let (start, end) = straight_samples();
        let extruder = TubeExtruder::new(12, 0.5);
        let mut positions = vec![Vec3::ZERO; extruder.vertex_count() as usize];
        extruder.extrude(&start, &end, Vec3::ZERO, |i, p, _| positions[i] = p);
        for tri in positions.chunks_exact(3) {
            let n = triangle_normal(tri[0], tri[1], tri[2]);
            let centroid = (tri[0] + tri[1] + tri[2]) / 3.0;
            let radial = Vec3::new(0.0, centroid.y, centroid.z);
            assert!(n.dot(radial) > 0.0);
        }
    }
}
