use bytemuck::{Pod, Zeroable};

use crate::render::snapshot::{BallView, Snapshot};

/// Per-ball render data for the browser renderer.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// [`BallTag::index`](crate::api::types::BallTag::index) as a float.
    pub tag: f32,
    /// 1.0 when drawn, 0.0 when hidden.
    pub visible: f32,
    pub _pad: [f32; 3],
}

impl BallInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

impl From<&BallView> for BallInstance {
    fn from(view: &BallView) -> Self {
        Self {
            x: view.position.x,
            y: view.position.y,
            radius: view.radius,
            tag: view.tag.index() as f32,
            visible: if view.visible { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }
}

/// Packed ball instances, object balls first and the cue ball last.
pub struct InstanceBuffer {
    pub instances: Vec<BallInstance>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(32),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: BallInstance) {
        self.instances.push(instance);
    }

    /// Replace the contents with every ball in `snapshot`.
    pub fn fill(&mut self, snapshot: &Snapshot) {
        self.clear();
        self.instances
            .extend(snapshot.all_balls().map(BallInstance::from));
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// The instances as one flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for InstanceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::api::types::BallTag;

    #[test]
    fn ball_instance_is_8_floats() {
        assert_eq!(std::mem::size_of::<BallInstance>(), 32);
        assert_eq!(BallInstance::STRIDE_BYTES, 32);
    }

    #[test]
    fn flat_floats_follow_field_order() {
        let mut buf = InstanceBuffer::new();
        buf.push(BallInstance::from(&BallView {
            position: Vec2::new(10.0, 20.0),
            radius: 5.5,
            tag: BallTag::Cue,
            value: 0,
            visible: true,
        }));
        assert_eq!(buf.instance_count(), 1);
        assert_eq!(buf.as_floats(), &[10.0, 20.0, 5.5, 7.0, 1.0, 0.0, 0.0, 0.0]);
    }
}
