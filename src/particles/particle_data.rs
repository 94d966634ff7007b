use glam::Vec3;

use crate::constants::emission::INACTIVE_LIFETIME;

/// Fixed-capacity particle storage in Structure of Arrays (SOA) layout.
///
/// Every array has exactly `capacity` entries from construction on. A slot is
/// active while its lifetime differs from [`INACTIVE_LIFETIME`]; nothing here
/// allocates after `new`.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    /// Local offset from the emitter origin
    pub position: Vec<Vec3>,
    pub velocity: Vec<Vec3>,

    /// Seconds since emission
    pub age: Vec<f32>,
    /// Seconds until deactivation, or the inactive sentinel
    pub lifetime: Vec<f32>,

    /// Current point-sprite radius
    pub size: Vec<f32>,
    /// Size the slot starts from when (re)emitted
    pub base_size: Vec<f32>,
    /// Unclamped alpha
    pub opacity: Vec<f32>,
}

impl ParticlePool {
    /// Allocate `capacity` inactive slots, all with the same base size
    pub fn new(capacity: usize, base_size: f32) -> Self {
        Self {
            position: vec![Vec3::ZERO; capacity],
            velocity: vec![Vec3::ZERO; capacity],
            age: vec![0.0; capacity],
            lifetime: vec![INACTIVE_LIFETIME; capacity],
            size: vec![base_size; capacity],
            base_size: vec![base_size; capacity],
            opacity: vec![0.0; capacity],
        }
    }

    /// Number of slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.lifetime.len()
    }

    #[inline]
    pub fn is_active(&self, index: usize) -> bool {
        self.lifetime[index] != INACTIVE_LIFETIME
    }

    /// Number of active slots (O(N))
    pub fn active_count(&self) -> usize {
        self.lifetime
            .iter()
            .filter(|&&lifetime| lifetime != INACTIVE_LIFETIME)
            .count()
    }

    /// First slot holding the inactive sentinel
    pub fn first_inactive(&self) -> Option<usize> {
        self.lifetime
            .iter()
            .position(|&lifetime| lifetime == INACTIVE_LIFETIME)
    }

    /// Normalized age of an active slot
    #[inline]
    pub fn age_ratio(&self, index: usize) -> f32 {
        let lifetime = self.lifetime[index];
        if lifetime > 0.0 {
            self.age[index] / lifetime
        } else {
            1.0
        }
    }

    /// Return a slot to the free state
    #[inline]
    pub fn deactivate(&mut self, index: usize) {
        self.lifetime[index] = INACTIVE_LIFETIME;
        self.opacity[index] = 0.0;
    }

    /// Occupy a slot with a freshly emitted particle
    pub fn activate(&mut self, index: usize, position: Vec3, velocity: Vec3, lifetime: f32) {
        self.position[index] = position;
        self.velocity[index] = velocity;
        self.age[index] = 0.0;
        self.lifetime[index] = lifetime;
        self.size[index] = self.base_size[index];
        self.opacity[index] = 0.0;
    }

    /// Deactivate every slot
    pub fn clear(&mut self) {
        for index in 0..self.capacity() {
            self.deactivate(index);
        }
    }
}
