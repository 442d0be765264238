use crate::camera::{self, Camera};
use crate::input::{InputState, KeyCode};
use crate::lighting::{Attenuation, Light};
use crate::technique::ShadingTechnique;

/// Per-frame movement step for held keys, in world units.
pub const MOVE_STEP: f32 = 0.1;

/// Mutable state of the demo scene, owned by the frame loop.
///
/// Everything the update and draw steps touch lives here; there are no
/// free-standing globals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneState {
    pub camera: Camera,
    pub light: Light,
    pub attenuation: Attenuation,
    pub technique: ShadingTechnique,
}

impl Default for SceneState {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            light: Light::default(),
            attenuation: Attenuation::default(),
            technique: ShadingTechnique::default(),
        }
    }
}

impl SceneState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one frame's worth of held-key effects.
    ///
    /// Camera: W/S forward/back along the heading, A/D strafe, R/F vertical.
    /// Light: I/K move -Z/+Z, J/L move -X/+X, U/H move +Y/-Y in world space.
    /// Digits 1-5 select the shading technique.
    pub fn apply_input(&mut self, input: &InputState) {
        let held = |name: char| input.is_key_down(KeyCode::Character(name));

        if held('W') {
            self.camera.eye = camera::move_forward(self.camera.eye, self.camera.yaw, MOVE_STEP);
        }
        if held('S') {
            self.camera.eye = camera::move_forward(self.camera.eye, self.camera.yaw, -MOVE_STEP);
        }
        if held('A') {
            self.camera.eye = camera::move_strafe(self.camera.eye, self.camera.yaw, -MOVE_STEP);
        }
        if held('D') {
            self.camera.eye = camera::move_strafe(self.camera.eye, self.camera.yaw, MOVE_STEP);
        }
        if held('R') {
            self.camera.eye.y += MOVE_STEP;
        }
        if held('F') {
            self.camera.eye.y -= MOVE_STEP;
        }

        if held('I') {
            self.light.position_world.z -= MOVE_STEP;
        }
        if held('K') {
            self.light.position_world.z += MOVE_STEP;
        }
        if held('J') {
            self.light.position_world.x -= MOVE_STEP;
        }
        if held('L') {
            self.light.position_world.x += MOVE_STEP;
        }
        if held('U') {
            self.light.position_world.y += MOVE_STEP;
        }
        if held('H') {
            self.light.position_world.y -= MOVE_STEP;
        }

        if let Some(technique) = input.held_digit().and_then(ShadingTechnique::from_digit) {
            self.technique = technique;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn press(state: &InputState, name: &str) {
        state.set_key_down(KeyCode::from_name(name).unwrap());
    }

    #[test]
    fn no_keys_is_a_no_op() {
        let input = InputState::new();
        let mut scene = SceneState::new();
        let before = scene;
        scene.apply_input(&input);
        assert_eq!(scene, before);
    }

    #[test]
    fn forward_key_moves_along_heading() {
        let input = InputState::new();
        press(&input, "w");
        let mut scene = SceneState::new();
        let start = scene.camera.eye;
        scene.apply_input(&input);
        // Heading 0 faces -Z.
        assert!((scene.camera.eye.z - (start.z - MOVE_STEP)).abs() < 1e-6);
        assert_eq!(scene.camera.eye.x, start.x);
        assert_eq!(scene.camera.yaw, 0.0);
    }

    #[test]
    fn strafe_never_changes_heading() {
        let input = InputState::new();
        press(&input, "d");
        let mut scene = SceneState::new();
        scene.camera.yaw = 42.0;
        scene.apply_input(&input);
        assert_eq!(scene.camera.yaw, 42.0);
    }

    #[test]
    fn light_moves_monotonically_while_held() {
        let input = InputState::new();
        press(&input, "l");
        let mut scene = SceneState::new();
        let mut last_x = scene.light.position_world.x;
        for _ in 0..5 {
            scene.apply_input(&input);
            assert!(scene.light.position_world.x > last_x);
            last_x = scene.light.position_world.x;
        }
        // Other axes untouched.
        assert_eq!(scene.light.position_world.y, Light::default().position_world.y);
        assert_eq!(scene.light.position_world.z, Light::default().position_world.z);
    }

    #[test]
    fn technique_selection_leaves_camera_and_light_alone() {
        let input = InputState::new();
        press(&input, "4");
        let mut scene = SceneState::new();
        let camera = scene.camera;
        let light_pos = scene.light.position_world;
        scene.apply_input(&input);
        assert_eq!(scene.technique, ShadingTechnique::Reflection);
        assert_eq!(scene.camera, camera);
        assert_eq!(scene.light.position_world, light_pos);
    }

    #[test]
    fn vertical_movement_bypasses_heading() {
        let input = InputState::new();
        press(&input, "r");
        let mut scene = SceneState::new();
        scene.camera.yaw = 135.0;
        let start = scene.camera.eye;
        scene.apply_input(&input);
        assert_eq!(
            scene.camera.eye,
            glam::Vec3::new(start.x, start.y + MOVE_STEP, start.z)
        );
    }

    #[test]
    fn initial_light_position_matches_defaults() {
        let scene = SceneState::new();
        assert_eq!(scene.light.position_world, Vec4::new(-5.0, 2.0, 2.0, 1.0));
        assert_eq!(scene.technique, ShadingTechnique::Gouraud);
    }
}
