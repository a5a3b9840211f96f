use glam::{IVec3, Mat4, Vec3};

use crate::constants::*;
use crate::player::input::InputState;
use crate::utils::settings::CameraSettings;
use crate::world::World;

/// Result of a block raycast: the solid cell hit and the empty cell the ray
/// passed through just before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RayHit {
    pub block: IVec3,
    pub previous: IVec3,
}

/// The observer: an eye point with orientation and an axis-aligned body
/// box that collides against resident voxels.
pub struct Camera {
    /// Eye point. The box extends `eye_height` below and
    /// `height - eye_height` above it.
    pub position: Vec3,
    pub front: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub world_up: Vec3,
    /// Degrees.
    pub yaw: f32,
    /// Degrees.
    pub pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub width: f32,
    pub height: f32,
    pub eye_height: f32,
    pub y_velocity: f32,
    pub is_grounded: bool,
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        let mut camera = Camera {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            movement_speed: PLAYER_BASE_SPEED,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            eye_height: PLAYER_EYE_HEIGHT,
            y_velocity: 0.0,
            is_grounded: false,
        };
        camera.update_camera_vectors();
        camera
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        let mut camera = Self::new(Vec3::from(settings.spawn));
        camera.movement_speed = settings.movement_speed;
        camera.mouse_sensitivity = settings.mouse_sensitivity;
        camera
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn view_projection(&self, aspect: f32, fov_radians: f32, near: f32, far: f32) -> Mat4 {
        Mat4::perspective_rh(fov_radians, aspect, near, far) * self.view_matrix()
    }

    /// Body box at `pos` as (min, max).
    pub fn bounds_at(&self, pos: Vec3) -> (Vec3, Vec3) {
        let half_width = self.width / 2.0;
        let min = Vec3::new(pos.x - half_width, pos.y - self.eye_height, pos.z - half_width);
        let max = Vec3::new(
            pos.x + half_width,
            pos.y + (self.height - self.eye_height),
            pos.z + half_width,
        );
        (min, max)
    }

    /// True when the body box at `next_pos` overlaps any solid cell of a
    /// resident chunk. Cells of missing chunks never block.
    pub fn check_collision(&self, next_pos: Vec3, world: &World) -> bool {
        let (min, max) = self.bounds_at(next_pos);
        let start = min.floor().as_ivec3();
        let end = max.floor().as_ivec3();

        for x in start.x..=end.x {
            for y in start.y..=end.y {
                for z in start.z..=end.z {
                    if world.is_solid(x, y, z) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Horizontal walking, resolved per axis so walls slide instead of stop.
    pub fn process_movement(&mut self, input: &InputState, dt: f32, world: &World) {
        let forward = Vec3::new(self.front.x, 0.0, self.front.z).normalize_or_zero();
        let right = Vec3::new(self.right.x, 0.0, self.right.z).normalize_or_zero();

        let mut movement = Vec3::ZERO;
        if input.forward {
            movement += forward;
        }
        if input.backward {
            movement -= forward;
        }
        if input.left {
            movement -= right;
        }
        if input.right {
            movement += right;
        }

        if movement.length_squared() > 0.0 {
            let step = movement.normalize() * self.movement_speed * dt;
            self.move_horizontal(step, world);
        }
    }

    /// Apply an XZ displacement, committing each axis only if it is free.
    pub fn move_horizontal(&mut self, step: Vec3, world: &World) {
        let mut next = self.position;
        next.x += step.x;
        if !self.check_collision(next, world) {
            self.position.x = next.x;
        }

        let mut next = self.position;
        next.z += step.z;
        if !self.check_collision(next, world) {
            self.position.z = next.z;
        }
    }

    pub fn jump_velocity() -> f32 {
        (2.0 * GRAVITY.abs() * PLAYER_JUMP_HEIGHT).sqrt()
    }

    pub fn process_jump(&mut self) {
        if self.is_grounded {
            self.y_velocity = Self::jump_velocity();
            self.is_grounded = false;
        }
    }

    pub fn update_physics(&mut self, dt: f32, world: &World) {
        self.y_velocity += GRAVITY * dt;
        self.y_velocity = self.y_velocity.max(-TERMINAL_FALL_SPEED);

        let mut next = self.position;
        next.y += self.y_velocity * dt;

        if self.check_collision(next, world) {
            if self.y_velocity < 0.0 {
                self.is_grounded = true;
            }
            // head bump or landing
            self.y_velocity = 0.0;
        } else {
            self.position.y = next.y;
            self.is_grounded = false;
        }
    }

    pub fn process_mouse_movement(&mut self, xoffset: f32, yoffset: f32, constrain_pitch: bool) {
        self.yaw += xoffset * self.mouse_sensitivity;
        self.pitch += yoffset * self.mouse_sensitivity;
        if constrain_pitch {
            self.pitch = self.pitch.clamp(-89.0, 89.0);
        }
        self.update_camera_vectors();
    }

    pub fn reset(&mut self, spawn: Vec3) {
        self.position = spawn;
        self.y_velocity = 0.0;
        self.is_grounded = false;
        tracing::info!(x = spawn.x, y = spawn.y, z = spawn.z, "observer reset");
    }

    pub fn raycast(&self, world: &World, max_dist: f32) -> Option<RayHit> {
        let step = 0.1;
        let mut pos = self.position;
        let mut prev = pos.floor().as_ivec3();

        for _ in 0..(max_dist / step) as i32 {
            pos += self.front * step;
            let current = pos.floor().as_ivec3();
            if current != prev {
                if world.is_solid(current.x, current.y, current.z) {
                    return Some(RayHit {
                        block: current,
                        previous: prev,
                    });
                }
                prev = current;
            }
        }
        None
    }

    fn update_camera_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = front.normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::BlockType;
    use crate::core::chunk::{BlockGrid, Chunk};

    /// World of 3x3 chunks around the origin, each filled by `fill`.
    fn world_with<F: Fn(i32, i32, i32) -> BlockType>(fill: F) -> World {
        let mut world = World::new();
        for cx in -1..=1 {
            for cz in -1..=1 {
                let mut grid = BlockGrid::new();
                for x in 0..CHUNK_SIZE {
                    for y in 0..CHUNK_HEIGHT {
                        for z in 0..CHUNK_SIZE {
                            grid.set(x, y, z, fill(cx * CHUNK_SIZE + x, y, cz * CHUNK_SIZE + z));
                        }
                    }
                }
                let mut chunk = Chunk::new(cx, cz);
                chunk.generate_from(grid);
                world.insert(chunk);
            }
        }
        world
    }

    fn floor_world(top: i32) -> World {
        world_with(|_, y, _| if y <= top { BlockType::Stone } else { BlockType::Air })
    }

    #[test]
    fn test_default_orientation_looks_down_negative_z() {
        let camera = Camera::new(Vec3::ZERO);
        assert!((camera.front - Vec3::NEG_Z).length() < 1e-5);
        assert!((camera.right - Vec3::X).length() < 1e-5);
        assert!((camera.up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_mouse_movement(0.0, 10_000.0, true);
        assert_eq!(camera.pitch, 89.0);
        camera.process_mouse_movement(0.0, -20_000.0, true);
        assert_eq!(camera.pitch, -89.0);
    }

    #[test]
    fn test_box_in_air_is_not_blocked() {
        let world = floor_world(9);
        let camera = Camera::new(Vec3::new(4.5, 20.0, 4.5));
        assert!(!camera.check_collision(camera.position, &world));
    }

    #[test]
    fn test_box_overlapping_single_solid_cell_is_blocked() {
        let world = world_with(|x, y, z| {
            if (x, y, z) == (3, 20, -2) {
                BlockType::Dirt
            } else {
                BlockType::Air
            }
        });
        let camera = Camera::new(Vec3::ZERO);
        assert!(camera.check_collision(Vec3::new(3.5, 20.5 + PLAYER_EYE_HEIGHT - 0.5, -1.5), &world));
        assert!(!camera.check_collision(Vec3::new(5.5, 21.6, -1.5), &world));
    }

    #[test]
    fn test_missing_chunks_never_block() {
        let world = World::new();
        let camera = Camera::new(Vec3::ZERO);
        assert!(!camera.check_collision(Vec3::new(1000.0, 10.0, -1000.0), &world));
    }

    #[test]
    fn test_free_fall_is_monotonic_and_clamped() {
        let world = World::new();
        let mut camera = Camera::new(Vec3::new(0.0, 100.0, 0.0));
        let mut last_y = camera.position.y;
        for _ in 0..600 {
            camera.update_physics(1.0 / 60.0, &world);
            assert!(camera.position.y < last_y);
            assert!(camera.y_velocity >= -TERMINAL_FALL_SPEED);
            assert!(!camera.is_grounded);
            last_y = camera.position.y;
        }
        assert_eq!(camera.y_velocity, -TERMINAL_FALL_SPEED);
    }

    #[test]
    fn test_jump_sets_closed_form_velocity() {
        let world = World::new();
        let mut camera = Camera::new(Vec3::new(0.0, 50.0, 0.0));
        camera.is_grounded = true;
        camera.process_jump();
        let before = camera.position;
        camera.update_physics(0.0, &world);
        assert_eq!(camera.position, before);
        assert_eq!(
            camera.y_velocity,
            (2.0 * GRAVITY.abs() * PLAYER_JUMP_HEIGHT).sqrt()
        );
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.process_jump();
        assert_eq!(camera.y_velocity, 0.0);
    }

    #[test]
    fn test_landing_sets_grounded() {
        let world = floor_world(9);
        let mut camera = Camera::new(Vec3::new(4.5, 14.0, 4.5));
        for _ in 0..240 {
            camera.update_physics(1.0 / 60.0, &world);
        }
        assert!(camera.is_grounded);
        assert_eq!(camera.y_velocity, 0.0);
        // feet never sink into the floor
        assert!(camera.position.y - PLAYER_EYE_HEIGHT >= 10.0);
    }

    #[test]
    fn test_head_bump_does_not_ground() {
        // ceiling from y=13 upward
        let world = world_with(|_, y, _| if y >= 13 { BlockType::Stone } else { BlockType::Air });
        let mut camera = Camera::new(Vec3::new(4.5, 12.5, 4.5));
        camera.y_velocity = 10.0;
        camera.update_physics(0.1, &world);
        assert_eq!(camera.y_velocity, 0.0);
        assert!(!camera.is_grounded);
        assert_eq!(camera.position.y, 12.5);
    }

    #[test]
    fn test_wall_slides_along_free_axis() {
        // wall filling x >= 6
        let world = world_with(|x, _, _| if x >= 6 { BlockType::Stone } else { BlockType::Air });
        let mut camera = Camera::new(Vec3::new(5.5, 20.0, 4.5));
        camera.move_horizontal(Vec3::new(0.5, 0.0, 0.5), &world);
        assert_eq!(camera.position.x, 5.5);
        assert_eq!(camera.position.z, 5.0);
    }

    #[test]
    fn test_forward_movement_ignores_pitch() {
        let world = World::new();
        let mut camera = Camera::new(Vec3::new(0.0, 50.0, 0.0));
        camera.process_mouse_movement(0.0, 450.0, true);
        let input = InputState {
            forward: true,
            ..Default::default()
        };
        camera.process_movement(&input, 1.0, &world);
        assert!((camera.position.z + PLAYER_BASE_SPEED).abs() < 1e-3);
        assert_eq!(camera.position.y, 50.0);
    }

    #[test]
    fn test_raycast_hits_block_in_front() {
        let world = world_with(|x, y, z| {
            if (x, y, z) == (0, 20, -3) {
                BlockType::Stone
            } else {
                BlockType::Air
            }
        });
        let camera = Camera::new(Vec3::new(0.5, 20.5, 0.5));
        let hit = camera.raycast(&world, PLAYER_REACH).unwrap();
        assert_eq!(hit.block, IVec3::new(0, 20, -3));
        assert_eq!(hit.previous, IVec3::new(0, 20, -2));
        assert!(camera.raycast(&World::new(), PLAYER_REACH).is_none());
    }

    #[test]
    fn test_reset_clears_motion() {
        let mut camera = Camera::new(Vec3::ZERO);
        camera.y_velocity = -12.0;
        camera.is_grounded = true;
        camera.reset(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.y_velocity, 0.0);
        assert!(!camera.is_grounded);
    }
}
