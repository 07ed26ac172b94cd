use glam::{EulerRot, Mat4, Vec2, Vec3};

/// One point sprite as the GPU sees it (32 bytes, instance step).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

impl PointInstance {
    #[inline]
    pub fn new(position: Vec3, size: f32, color: [f32; 3]) -> Self {
        Self {
            position: position.to_array(),
            size,
            color,
            _pad: 0.0,
        }
    }
}

/// Line-list vertex; consecutive pairs form one connection segment.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
}

impl LineVertex {
    #[inline]
    pub fn new(position: Vec3) -> Self {
        Self {
            position: position.to_array(),
        }
    }
}

/// Everything a backend needs to draw one frame. Borrowed from the
/// simulation; valid until the next tick.
#[derive(Clone, Copy, Debug)]
pub struct SceneFrame<'a> {
    pub field: &'a [PointInstance],
    pub warp: &'a [PointInstance],
    pub lines: &'a [LineVertex],
    /// Bumped on every connection rebuild so backends can skip re-uploads.
    pub lines_revision: u64,
    /// Euler X/Y rotation shared by the field cloud and its lines.
    pub rotation: Vec2,
    pub warp_intensity: f32,
    pub line_opacity: f32,
    pub line_color: [f32; 3],
}

impl SceneFrame<'_> {
    /// Model matrix for the field points and connection lines (XYZ order).
    pub fn field_model(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpu_structs_have_expected_strides() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
        assert_eq!(std::mem::size_of::<LineVertex>(), 12);
    }
}
