use std::sync::atomic::{AtomicU32, Ordering};

use glam::Vec3;

use crate::math::{DebugLine, DrawIndirectArgs, MeshSnapshot};
use crate::yarn::config::StrandConfig;

pub struct SharedWords {
    words: Box<[AtomicU32]>,
}

impl SharedWords {
    pub fn zeroed(len: usize) -> Self {
        Self {
            words: (0..len).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    #[inline]
    pub fn store(&self, index: usize, value: u32) {
        self.words[index].store(value, Ordering::Relaxed);
    }

    #[inline]
    pub fn store_f32(&self, index: usize, value: f32) {
        self.store(index, value.to_bits());
    }

    #[inline]
    pub fn load(&self, index: usize) -> u32 {
        self.words[index].load(Ordering::Relaxed)
    }

    pub fn load_f32(&self, index: usize) -> f32 {
        f32::from_bits(self.load(index))
    }

    pub fn to_vec(&self, len: usize) -> Vec<u32> {
        self.words[..len.min(self.len())]
            .iter()
            .map(|w| w.load(Ordering::Relaxed))
            .collect()
    }
}

// Only vertex_count is contended.
pub struct IndirectDrawDescriptor {
    vertex_count: AtomicU32,
    instance_count: AtomicU32,
    first_vertex: AtomicU32,
    first_instance: AtomicU32,
}

impl Default for IndirectDrawDescriptor {
    fn default() -> Self {
        let descriptor = Self {
            vertex_count: AtomicU32::new(0),
            instance_count: AtomicU32::new(0),
            first_vertex: AtomicU32::new(0),
            first_instance: AtomicU32::new(0),
        };
        descriptor.reset();
        descriptor
    }
}

impl IndirectDrawDescriptor {
    /// Caller-side reset to `{0, 1, 0, 0}`; must happen before the pass.
    pub fn reset(&self) {
        self.store(DrawIndirectArgs::RESET);
    }

    pub fn init_fixed_fields(&self) {
        self.instance_count.store(1, Ordering::Relaxed);
        self.first_vertex.store(0, Ordering::Relaxed);
        self.first_instance.store(0, Ordering::Relaxed);
    }

    pub fn vertex_counter(&self) -> &AtomicU32 {
        &self.vertex_count
    }

    pub fn store(&self, args: DrawIndirectArgs) {
        self.vertex_count.store(args.vertex_count, Ordering::Relaxed);
        self.instance_count.store(args.instance_count, Ordering::Relaxed);
        self.first_vertex.store(args.first_vertex, Ordering::Relaxed);
        self.first_instance.store(args.first_instance, Ordering::Relaxed);
    }

    pub fn load(&self) -> DrawIndirectArgs {
        DrawIndirectArgs {
            vertex_count: self.vertex_count.load(Ordering::Relaxed),
            instance_count: self.instance_count.load(Ordering::Relaxed),
            first_vertex: self.first_vertex.load(Ordering::Relaxed),
            first_instance: self.first_instance.load(Ordering::Relaxed),
        }
    }
}

pub struct OutputMesh {
    positions: SharedWords,
    colors: SharedWords,
    draw: IndirectDrawDescriptor,
}

impl OutputMesh {
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: SharedWords::zeroed(vertices * 3),
            colors: SharedWords::zeroed(vertices),
            draw: IndirectDrawDescriptor::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.colors.len()
    }

    pub fn draw(&self) -> &IndirectDrawDescriptor {
        &self.draw
    }

    #[inline]
    pub fn write_vertex(&self, index: usize, position: Vec3, color: u32) {
        let base = index * 3;
        self.positions.store_f32(base, position.x);
        self.positions.store_f32(base + 1, position.y);
        self.positions.store_f32(base + 2, position.z);
        self.colors.store(index, color);
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * 3;
        Vec3::new(
            self.positions.load_f32(base),
            self.positions.load_f32(base + 1),
            self.positions.load_f32(base + 2),
        )
    }

    pub fn color(&self, index: usize) -> u32 {
        self.colors.load(index)
    }

    pub fn positions(&self) -> &SharedWords {
        &self.positions
    }

    pub fn colors(&self) -> &SharedWords {
        &self.colors
    }
}

pub struct DebugLineBuffer {
    words: SharedWords,
    draw: IndirectDrawDescriptor,
}

impl DebugLineBuffer {
    pub fn with_capacity(lines: usize) -> Self {
        Self {
            words: SharedWords::zeroed(lines * DebugLine::WORDS),
            draw: IndirectDrawDescriptor::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.words.len() / DebugLine::WORDS
    }

    pub fn draw(&self) -> &IndirectDrawDescriptor {
        &self.draw
    }

    pub fn write_line(&self, index: usize, line: &DebugLine) {
        let words: [u32; DebugLine::WORDS] = bytemuck::cast(*line);
        let base = index * DebugLine::WORDS;
        for (i, word) in words.into_iter().enumerate() {
            self.words.store(base + i, word);
        }
    }

    pub fn line(&self, index: usize) -> DebugLine {
        let base = index * DebugLine::WORDS;
        let words: [u32; DebugLine::WORDS] = std::array::from_fn(|i| self.words.load(base + i));
        bytemuck::cast(words)
    }
}

pub struct StrandTargets {
    pub mesh: OutputMesh,
    pub lines: DebugLineBuffer,
}

impl StrandTargets {
    pub fn with_capacity(vertices: usize, lines: usize) -> Self {
        Self {
            mesh: OutputMesh::with_capacity(vertices),
            lines: DebugLineBuffer::with_capacity(lines),
        }
    }

    pub fn for_config(config: &StrandConfig) -> Self {
        Self::with_capacity(config.vertex_capacity(), config.line_capacity())
    }

    pub fn fits(&self, config: &StrandConfig) -> bool {
        self.mesh.capacity() >= config.vertex_capacity()
            && self.lines.capacity() >= config.line_capacity()
    }

    pub fn reset(&self) {
        self.mesh.draw.reset();
        self.lines.draw.reset();
    }

    pub fn snapshot(&self) -> MeshSnapshot {
        let draw = self.mesh.draw.load();
        let vertices = (draw.vertex_count as usize).min(self.mesh.capacity());
        let line_draw = self.lines.draw.load();
        let lines = (line_draw.vertex_count / 2) as usize;
        let lines = lines.min(self.lines.capacity());

        MeshSnapshot {
            positions: self
                .mesh
                .positions
                .to_vec(vertices * 3)
                .into_iter()
                .map(f32::from_bits)
                .collect(),
            colors: self.mesh.colors.to_vec(vertices),
            draw,
            lines: (0..lines).map(|i| self.lines.line(i)).collect(),
            line_draw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_starts_reset() {
        let descriptor = IndirectDrawDescriptor::default();
        assert_eq!(descriptor.load(), DrawIndirectArgs::RESET);
    }

    #[test]
    fn test_reset_clears_counter() {
        let descriptor = IndirectDrawDescriptor::default();
        descriptor.vertex_counter().fetch_add(72, Ordering::Relaxed);
        descriptor.store(DrawIndirectArgs {
            vertex_count: 72,
            instance_count: 9,
            first_vertex: 3,
            first_instance: 4,
        });
        descriptor.reset();
        assert_eq!(descriptor.load(), DrawIndirectArgs::RESET);
    }

    #[test]
    fn test_write_and_read_vertex() {
        let mesh = OutputMesh::with_capacity(4);
        mesh.write_vertex(2, Vec3::new(1.0, -2.0, 3.5), 0xFF11_2233);
        assert_eq!(mesh.position(2), Vec3::new(1.0, -2.0, 3.5));
        assert_eq!(mesh.color(2), 0xFF11_2233);
        assert_eq!(mesh.color(1), 0);
    }

    #[test]
    #[should_panic]
    fn test_write_past_capacity_panics() {
        let mesh = OutputMesh::with_capacity(2);
        mesh.write_vertex(2, Vec3::ZERO, 0);
    }

    #[test]
    fn test_line_roundtrip_through_words() {
        let buffer = DebugLineBuffer::with_capacity(2);
        let line = DebugLine::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0), 0xFF00_00FF);
        buffer.write_line(1, &line);
        assert_eq!(buffer.line(1), line);
        assert_eq!(buffer.capacity(), 2);
    }

    #[test]
    fn test_snapshot_truncates_to_counter() {
        let targets = StrandTargets::with_capacity(12, 1);
        targets.reset();
        for i in 0..12 {
            targets.mesh.write_vertex(i, Vec3::splat(i as f32), i as u32);
        }
        targets.mesh.draw().vertex_counter().store(6, Ordering::Relaxed);

        let snapshot = targets.snapshot();
        assert_eq!(snapshot.vertex_count(), 6);
        assert_eq!(snapshot.positions.len(), 18);
        assert_eq!(snapshot.position(5), Vec3::splat(5.0));
        assert!(snapshot.lines.is_empty());
    }

    #[test]
    fn test_fits() {
        let config = StrandConfig::default();
        let targets = StrandTargets::for_config(&config);
        assert!(targets.fits(&config));
        let bigger = StrandConfig {
            row_count: 2,
            ..config
        };
        assert!(!targets.fits(&bigger));
    }
}
