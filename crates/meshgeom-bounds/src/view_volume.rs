//! Box-versus-frustum overlap testing in clip space.

use glam::{Mat4, Vec4};

use crate::bounding_box::BoundingBox;

/// Returns true if `bbox` may overlap the view volume of `model_view_projection`.
///
/// Every box corner is taken to clip space and compared against `±w` on each
/// axis before any divide, so corners with `w == 0` are safe. The box is
/// rejected only when all 8 corners lie outside one and the same clip plane.
/// A corner inside all six planes accepts the box immediately.
///
/// The test never rejects a box that actually intersects the frustum, but
/// large boxes seen at an angle can be accepted while lying outside it.
/// The clip volume is `-w <= x, y, z <= w`.
pub fn overlaps_view_volume(bbox: &BoundingBox, model_view_projection: &Mat4) -> bool {
    if !bbox.is_valid() {
        return false;
    }

    // Per clip plane: -x, +x, -y, +y, -z, +z
    let mut outside = [0u32; 6];
    for corner in bbox.vertices() {
        let clip = *model_view_projection * corner.extend(1.0);
        let violations = clip_violations(clip);
        if !violations.contains(&true) {
            return true;
        }
        for (count, violated) in outside.iter_mut().zip(violations) {
            if violated {
                *count += 1;
            }
        }
    }

    !outside.contains(&8)
}

fn clip_violations(clip: Vec4) -> [bool; 6] {
    [
        clip.x < -clip.w,
        clip.x > clip.w,
        clip.y < -clip.w,
        clip.y > clip.w,
        clip.z < -clip.w,
        clip.z > clip.w,
    ]
}

/// A view volume described by a combined model-view-projection matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewVolume {
    matrix: Mat4,
}

impl ViewVolume {
    /// Wraps an already combined model-view-projection matrix.
    pub fn new(model_view_projection: Mat4) -> Self {
        Self {
            matrix: model_view_projection,
        }
    }

    /// Combines separate matrices as `projection * view * model`.
    pub fn from_matrices(projection: Mat4, view: Mat4, model: Mat4) -> Self {
        Self::new(projection * view * model)
    }

    /// Returns the combined matrix.
    pub fn matrix(&self) -> Mat4 {
        self.matrix
    }

    /// See [`overlaps_view_volume`].
    pub fn overlaps(&self, bbox: &BoundingBox) -> bool {
        overlaps_view_volume(bbox, &self.matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn camera() -> ViewVolume {
        let projection = Mat4::perspective_rh_gl(60f32.to_radians(), 1.0, 0.1, 100.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        ViewVolume::from_matrices(projection, view, Mat4::IDENTITY)
    }

    fn unit_box() -> BoundingBox {
        BoundingBox::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    fn shifted(offset: Vec3) -> BoundingBox {
        let bbox = unit_box();
        BoundingBox::from_min_max(bbox.min + offset, bbox.max + offset)
    }

    #[test]
    fn test_unit_box_at_origin_is_visible() {
        assert!(camera().overlaps(&unit_box()));
    }

    #[test]
    fn test_far_sideways_is_culled() {
        assert!(!camera().overlaps(&shifted(Vec3::new(1000.0, 0.0, 0.0))));
        assert!(!camera().overlaps(&shifted(Vec3::new(0.0, -1000.0, 0.0))));
    }

    #[test]
    fn test_beyond_far_plane_is_culled() {
        assert!(!camera().overlaps(&shifted(Vec3::new(0.0, 0.0, -1000.0))));
    }

    #[test]
    fn test_behind_camera_is_culled() {
        assert!(!camera().overlaps(&shifted(Vec3::new(0.0, 0.0, 100.0))));
    }

    #[test]
    fn test_invalid_box_is_never_visible() {
        assert!(!overlaps_view_volume(&BoundingBox::INVALID, &Mat4::IDENTITY));
    }

    #[test]
    fn test_identity_clip_cube() {
        let inside = BoundingBox::from_min_max(Vec3::splat(-0.5), Vec3::splat(0.5));
        let outside = BoundingBox::from_min_max(Vec3::splat(2.0), Vec3::splat(3.0));
        assert!(overlaps_view_volume(&inside, &Mat4::IDENTITY));
        assert!(!overlaps_view_volume(&outside, &Mat4::IDENTITY));
    }

    #[test]
    fn test_enclosing_box_is_visible_without_inside_corner() {
        // No corner lies inside, but no single plane rejects all of them
        let huge = BoundingBox::from_min_max(Vec3::splat(-10.0), Vec3::splat(10.0));
        assert!(overlaps_view_volume(&huge, &Mat4::IDENTITY));
    }

    #[test]
    fn test_straddling_box_is_visible() {
        let bbox = BoundingBox::from_min_max(Vec3::new(0.5, -0.1, -0.1), Vec3::new(5.0, 0.1, 0.1));
        assert!(overlaps_view_volume(&bbox, &Mat4::IDENTITY));
    }

    #[test]
    fn test_w_zero_corners_do_not_panic() {
        // A matrix that maps every point to w = 0
        let mut flat_w = Mat4::IDENTITY;
        flat_w.w_axis.w = 0.0;
        assert!(overlaps_view_volume(&BoundingBox::from_min_max(Vec3::ZERO, Vec3::ZERO), &flat_w));
    }
}
