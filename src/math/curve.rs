use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveShape {
    pub height: f32,
    pub amplitude: f32,
    pub depth: f32,
}

impl CurveShape {
    pub fn sample(&self, t: f32) -> Vec3 {
        sample(t, self.height, self.amplitude, self.depth)
    }
}

// x = t + a·sin(2t), y = h·cos(t), z = d·cos(2t)
#[inline]
pub fn sample(t: f32, h: f32, a: f32, d: f32) -> Vec3 {
    let two_t = 2.0 * t;
    Vec3::new(t + a * two_t.sin(), h * t.cos(), d * two_t.cos())
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentSpan {
    pub t0: f32,
    pub t1: f32,
}

impl SegmentSpan {
    pub fn for_worker(worker: u32, total_workers: u32, curve_scale: f32) -> Self {
        let step = curve_scale / total_workers as f32;
        let t0 = worker as f32 * step;
        Self { t0, t1: t0 + step }
    }

    pub fn step(&self) -> f32 {
        self.t1 - self.t0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sample_at_origin() {
        let p = sample(0.0, 2.0, 0.5, 0.25);
        assert_relative_eq!(p.x, 0.0);
        assert_relative_eq!(p.y, 2.0);
        assert_relative_eq!(p.z, 0.25);
    }

    #[test]
    fn test_sample_is_bit_identical() {
        for i in 0..256 {
            let t = i as f32 * 0.137 - 9.0;
            let a = sample(t, 1.3, 0.7, 0.4);
            let b = sample(t, 1.3, 0.7, 0.4);
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.y.to_bits(), b.y.to_bits());
            assert_eq!(a.z.to_bits(), b.z.to_bits());
        }
    }

    #[test]
    fn test_shape_matches_free_function() {
        let shape = CurveShape {
            height: 1.0,
            amplitude: 0.3,
            depth: 0.6,
        };
        assert_eq!(shape.sample(1.25), sample(1.25, 1.0, 0.3, 0.6));
    }

    #[test]
    fn test_spans_tile_the_domain() {
        let total = 32;
        let scale = 12.0;
        let first = SegmentSpan::for_worker(0, total, scale);
        let last = SegmentSpan::for_worker(total - 1, total, scale);
        assert_relative_eq!(first.t0, 0.0);
        assert_relative_eq!(last.t1, scale, epsilon = 1e-4);

        for k in 0..total - 1 {
            let a = SegmentSpan::for_worker(k, total, scale);
            let b = SegmentSpan::for_worker(k + 1, total, scale);
            assert_relative_eq!(a.t1, b.t0, epsilon = 1e-5);
        }
    }
}
