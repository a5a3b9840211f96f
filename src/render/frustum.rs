use glam::{Mat4, Vec3, Vec4};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        AABB { min, max }
    }

    pub fn is_visible(&self, frustum: &Frustum) -> bool {
        frustum.is_box_visible(self.min, self.max)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    fn from_row(row: Vec4) -> Self {
        let mut plane = Plane {
            normal: row.truncate(),
            distance: row.w,
        };
        // Normalize so that distances are in world units
        let length = plane.normal.length();
        if length > 0.0 {
            plane.normal /= length;
            plane.distance /= length;
        }
        plane
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// Six clipping planes (left, right, bottom, top, near, far) of a
/// view-projection matrix.
#[derive(Clone, Copy, Debug, Default)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    pub fn from_view_proj(view_proj: &Mat4) -> Self {
        let mut frustum = Frustum::default();
        frustum.update(view_proj);
        frustum
    }

    pub fn update(&mut self, view_proj: &Mat4) {
        let r0 = view_proj.row(0);
        let r1 = view_proj.row(1);
        let r2 = view_proj.row(2);
        let r3 = view_proj.row(3);

        self.planes = [
            // Left
            Plane::from_row(r3 + r0),
            // Right
            Plane::from_row(r3 - r0),
            // Bottom
            Plane::from_row(r3 + r1),
            // Top
            Plane::from_row(r3 - r1),
            // Near (WGPU depth is [0, 1])
            Plane::from_row(r2),
            // Far
            Plane::from_row(r3 - r2),
        ];
    }

    /// Conservative outside/maybe test: false only when the box lies fully
    /// behind at least one plane.
    pub fn is_box_visible(&self, min: Vec3, max: Vec3) -> bool {
        for plane in &self.planes {
            let p = Vec3::new(
                if plane.normal.x >= 0.0 { max.x } else { min.x },
                if plane.normal.y >= 0.0 { max.y } else { min.y },
                if plane.normal.z >= 0.0 { max.z } else { min.z },
            );
            if plane.signed_distance(p) < 0.0 {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn looking_down_negative_z() -> Frustum {
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::NEG_Z, Vec3::Y);
        let proj = Mat4::perspective_rh(70f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
        Frustum::from_view_proj(&(proj * view))
    }

    #[test]
    fn test_planes_are_normalized() {
        let frustum = looking_down_negative_z();
        for plane in &frustum.planes {
            assert!((plane.normal.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_box_at_camera_is_visible() {
        let frustum = looking_down_negative_z();
        assert!(frustum.is_box_visible(Vec3::splat(-1.0), Vec3::splat(1.0)));
    }

    #[test]
    fn test_box_in_front_is_visible() {
        let frustum = looking_down_negative_z();
        let aabb = AABB::new(Vec3::new(-1.0, -1.0, -20.0), Vec3::new(1.0, 1.0, -10.0));
        assert!(aabb.is_visible(&frustum));
    }

    #[test]
    fn test_box_beyond_far_plane_is_culled() {
        let frustum = looking_down_negative_z();
        assert!(!frustum.is_box_visible(
            Vec3::new(-5.0, -5.0, -200.0),
            Vec3::new(5.0, 5.0, -150.0)
        ));
    }

    #[test]
    fn test_box_behind_camera_is_culled() {
        let frustum = looking_down_negative_z();
        assert!(!frustum.is_box_visible(
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(1.0, 1.0, 10.0)
        ));
    }

    #[test]
    fn test_box_far_to_the_side_is_culled() {
        let frustum = looking_down_negative_z();
        assert!(!frustum.is_box_visible(
            Vec3::new(-500.0, -1.0, -10.0),
            Vec3::new(-400.0, 1.0, -5.0)
        ));
    }
}
