use glam::{Mat4, Vec3};
use warp_core::constants::{
    CAMERA_FAR, CAMERA_FOV_Y_DEG, CAMERA_NEAR, CAMERA_Z, MAX_POINT_SIZE_PX,
};

/// Fixed perspective camera on +Z looking at the origin.
#[inline]
pub fn view_proj(aspect: f32) -> Mat4 {
    let proj = Mat4::perspective_rh(
        CAMERA_FOV_Y_DEG.to_radians(),
        aspect.max(1e-3),
        CAMERA_NEAR,
        CAMERA_FAR,
    );
    let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, CAMERA_Z), Vec3::ZERO, Vec3::Y);
    proj * view
}

/// On-screen sprite width in device pixels, as `vs_point` computes it.
/// `depth` is clip-space w, floored to keep the division finite.
pub fn sprite_pixel_size(size: f32, point_scale: f32, depth: f32, warp: f32, gain: f32) -> f32 {
    let px = size * (point_scale / depth.max(0.001)) * (1.0 + warp * gain);
    px.min(MAX_POINT_SIZE_PX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn origin_projects_to_screen_center() {
        let clip = view_proj(16.0 / 9.0) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(clip.x.abs() < 1e-5 && clip.y.abs() < 1e-5);
        // w is the distance in front of the camera
        assert!((clip.w - CAMERA_Z).abs() < 1e-3);
        let ndc_z = clip.z / clip.w;
        assert!((0.0..=1.0).contains(&ndc_z));
    }

    #[test]
    fn far_warp_depth_stays_inside_clip_range() {
        let clip = view_proj(1.0) * Vec4::new(0.0, 0.0, -450.0, 1.0);
        let ndc_z = clip.z / clip.w;
        assert!(ndc_z > 0.0 && ndc_z < 1.0);
    }

    #[test]
    fn points_behind_camera_have_negative_w() {
        let clip = view_proj(1.0) * Vec4::new(0.0, 0.0, CAMERA_Z + 10.0, 1.0);
        assert!(clip.w < 0.0);
    }

    #[test]
    fn distant_sprite_size_is_unclamped() {
        use warp_core::constants::FIELD_POINT_SCALE;
        // a 5-unit field particle at the origin, no warp
        let px = sprite_pixel_size(5.0, FIELD_POINT_SCALE, CAMERA_Z, 0.0, 1.0);
        assert!((px - 15.0).abs() < 1e-4);
    }

    #[test]
    fn sprite_rushing_past_the_camera_is_capped() {
        use warp_core::constants::{WARP_POINT_SCALE, WARP_WARP_SIZE_GAIN};
        let near = sprite_pixel_size(2.5, WARP_POINT_SCALE, 0.5, 1.0, WARP_WARP_SIZE_GAIN);
        assert_eq!(near, MAX_POINT_SIZE_PX);
        let degenerate = sprite_pixel_size(2.5, WARP_POINT_SCALE, 0.0, 1.0, WARP_WARP_SIZE_GAIN);
        assert!(degenerate.is_finite());
        assert_eq!(degenerate, MAX_POINT_SIZE_PX);
    }
}
