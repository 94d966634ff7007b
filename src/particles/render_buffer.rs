use glam::Vec3;

use crate::particles::particle_data::ParticlePool;

/// Per-particle render data for GPU upload
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SmokeInstance {
    pub position: [f32; 3],
    pub size: f32,
    /// Clamped to `[0, 1]`; zero for free slots
    pub opacity: f32,
}

impl SmokeInstance {
    pub const SIZE: usize = std::mem::size_of::<Self>();
}

/// Renderer-facing copy of the pool, rewritten in place after every update
#[derive(Debug, Default)]
pub struct RenderBuffers {
    instances: Vec<SmokeInstance>,
    dirty: bool,
    released: bool,
}

impl RenderBuffers {
    /// Pre-size one instance per pool slot
    pub fn new(capacity: usize) -> Self {
        Self {
            instances: vec![SmokeInstance::default(); capacity],
            dirty: true,
            released: false,
        }
    }

    /// Copy pool state into the instance array. Does not allocate.
    pub fn sync(&mut self, pool: &ParticlePool) {
        if self.released {
            return;
        }

        for (i, instance) in self.instances.iter_mut().enumerate() {
            let opacity = if pool.is_active(i) {
                clamp_opacity(pool.opacity[i])
            } else {
                0.0
            };
            *instance = SmokeInstance {
                position: pool.position[i].to_array(),
                size: pool.size[i],
                opacity,
            };
        }
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn instances(&self) -> &[SmokeInstance] {
        &self.instances
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Free the instance storage; later syncs are ignored
    pub fn release(&mut self) {
        self.instances = Vec::new();
        self.dirty = false;
        self.released = true;
    }
}

/// Alpha written to the renderer. Negative or NaN opacity reads as transparent.
#[inline]
pub fn clamp_opacity(opacity: f32) -> f32 {
    if opacity.is_nan() {
        0.0
    } else {
        opacity.clamp(0.0, 1.0)
    }
}

/// Read-only view handed to the host renderer after an update
#[derive(Debug, Clone, Copy)]
pub struct RenderHandle<'a> {
    buffers: &'a RenderBuffers,
    pool: &'a ParticlePool,
    group_position: Vec3,
}

impl<'a> RenderHandle<'a> {
    pub(crate) fn new(buffers: &'a RenderBuffers, pool: &'a ParticlePool, group_position: Vec3) -> Self {
        Self {
            buffers,
            pool,
            group_position,
        }
    }

    /// Interleaved instances, one per slot
    pub fn instances(&self) -> &'a [SmokeInstance] {
        self.buffers.instances()
    }

    /// Instance data as raw bytes for `queue.write_buffer`
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.buffers.instances())
    }

    /// Number of instances to draw (pool capacity)
    pub fn instance_count(&self) -> u32 {
        self.buffers.instances().len() as u32
    }

    /// Slot positions, local to the emitter group
    pub fn positions(&self) -> &'a [Vec3] {
        &self.pool.position
    }

    pub fn sizes(&self) -> &'a [f32] {
        &self.pool.size
    }

    /// Per-slot opacity clamped to `[0, 1]`
    pub fn opacities(&self) -> impl Iterator<Item = f32> + 'a {
        self.buffers.instances().iter().map(|instance| instance.opacity)
    }

    /// World-space anchor of the emitter group
    pub fn group_position(&self) -> Vec3 {
        self.group_position
    }

    pub fn is_dirty(&self) -> bool {
        self.buffers.is_dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_layout() {
        assert_eq!(SmokeInstance::SIZE, 20);
    }

    #[test]
    fn test_clamp_opacity() {
        assert_eq!(clamp_opacity(-0.2), 0.0);
        assert_eq!(clamp_opacity(1.4), 1.0);
        assert_eq!(clamp_opacity(0.25), 0.25);
        assert_eq!(clamp_opacity(f32::NAN), 0.0);
    }

    #[test]
    fn test_sync_clamps_and_hides_free_slots() {
        let mut pool = ParticlePool::new(3, 1.5);
        pool.activate(0, Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO, 5.0);
        pool.activate(1, Vec3::ZERO, Vec3::ZERO, 5.0);
        pool.opacity[0] = 0.4;
        pool.opacity[1] = -0.3;
        pool.opacity[2] = 0.9;

        let mut buffers = RenderBuffers::new(3);
        buffers.sync(&pool);

        let instances = buffers.instances();
        assert_eq!(instances[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(instances[0].opacity, 0.4);
        assert_eq!(instances[0].size, 1.5);
        assert_eq!(instances[1].opacity, 0.0);
        assert_eq!(instances[2].opacity, 0.0);
    }

    #[test]
    fn test_dirty_flag_round_trip() {
        let mut buffers = RenderBuffers::new(1);
        assert!(buffers.take_dirty());
        assert!(!buffers.is_dirty());
        buffers.mark_dirty();
        assert!(buffers.is_dirty());
    }

    #[test]
    fn test_release_frees_instances() {
        let mut buffers = RenderBuffers::new(4);
        buffers.release();
        assert!(buffers.is_released());
        assert!(buffers.instances().is_empty());
        buffers.sync(&ParticlePool::new(4, 1.0));
        assert!(buffers.instances().is_empty());
    }

    #[test]
    fn test_handle_exposes_bytes() {
        let pool = ParticlePool::new(2, 1.0);
        let buffers = RenderBuffers::new(2);
        let handle = RenderHandle::new(&buffers, &pool, Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(handle.as_bytes().len(), 2 * SmokeInstance::SIZE);
        assert_eq!(handle.instance_count(), 2);
        assert_eq!(handle.group_position(), Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(handle.positions().len(), 2);
    }
}
