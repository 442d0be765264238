use glam::{Mat4, Vec3, Vec4};

use crate::lighting::{Material, MATERIAL_MATTE};
use crate::scene::SceneState;
use crate::technique::ShadingTechnique;
use crate::transform::{rotation_only, TransformStack};

pub const FOV_DEGREES: f32 = 60.0;
pub const NEAR_PLANE: f32 = 1.0;
pub const FAR_PLANE: f32 = 150.0;

/// World placement of the high-poly model shared by every technique.
pub const MODEL_OFFSET: Vec3 = Vec3::new(-2.0, 1.0, -3.0);
pub const MODEL_SCALE: f32 = 20.0;

const GROUND_OFFSET: Vec3 = Vec3::new(-10.0, -0.1, -10.0);
const GROUND_SCALE: Vec3 = Vec3::new(20.0, 0.1, 20.0);
const MARKER_SCALE: f32 = 0.25;
const SKYBOX_SCALE: f32 = 1.5;

/// Which uploaded mesh a draw uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshKind {
    Cube,
    Model,
}

/// Skybox pass: drawn first with depth writes off and interior faces shown.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxDraw {
    pub modelview: Mat4,
}

/// One draw of the environment pass (ground plane, light marker).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentDraw {
    pub modelview: Mat4,
    pub material: Material,
    pub mesh: MeshKind,
}

/// The single technique draw of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TechniqueDraw {
    pub technique: ShadingTechnique,
    pub modelview: Mat4,
    /// World placement matrix, present only for techniques whose program
    /// computes view vectors in world space.
    pub model: Option<Mat4>,
    pub material: Material,
    pub mesh: MeshKind,
}

/// Everything one frame draws, in pass order, with all matrices resolved.
///
/// Building the plan is pure: the GPU layer consumes it verbatim, which
/// keeps the stack discipline and pass sequencing testable headlessly.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub projection: Mat4,
    pub view: Mat4,
    /// Light position in view space, recomputed every frame.
    pub light_view_position: Vec4,
    pub skybox: SkyboxDraw,
    pub environment: Vec<EnvironmentDraw>,
    pub technique: TechniqueDraw,
}

impl FramePlan {
    pub fn build(scene: &SceneState, aspect: f32) -> Self {
        let projection = Mat4::perspective_rh(
            FOV_DEGREES.to_radians(),
            aspect.max(0.01),
            NEAR_PLANE,
            FAR_PLANE,
        );
        let view = scene.camera.view_matrix();

        let mut stack = TransformStack::new();
        let plan = {
            let mut frame = stack.scoped_matrix(view);

            // Skybox rotates with the camera but never translates; its scope
            // replaces the view with the rotation-only basis.
            let skybox = {
                let basis = rotation_only(frame.top());
                let mut sky = frame.scoped_matrix(basis);
                sky.scale(Vec3::splat(SKYBOX_SCALE));
                SkyboxDraw { modelview: sky.top() }
            };

            // The skybox scope has been popped: the top is the true view
            // matrix again, which is what the light must be transformed by.
            let light_view_position = scene.light.view_space_position(frame.top());

            let ground = {
                let mut scope = frame.scoped();
                scope.translate(GROUND_OFFSET);
                scope.scale(GROUND_SCALE);
                EnvironmentDraw {
                    modelview: scope.top(),
                    material: MATERIAL_MATTE,
                    mesh: MeshKind::Cube,
                }
            };

            let marker = {
                let mut scope = frame.scoped();
                scope.translate(scene.light.position_world.truncate());
                scope.scale(Vec3::splat(MARKER_SCALE));
                EnvironmentDraw {
                    modelview: scope.top(),
                    material: MATERIAL_MATTE,
                    mesh: MeshKind::Cube,
                }
            };

            let technique = {
                let mut scope = frame.scoped();
                scope.translate(MODEL_OFFSET);
                scope.scale(Vec3::splat(MODEL_SCALE));
                TechniqueDraw {
                    technique: scene.technique,
                    modelview: scope.top(),
                    model: scene
                        .technique
                        .needs_model_matrix()
                        .then(model_placement),
                    material: scene.technique.material(),
                    mesh: MeshKind::Model,
                }
            };

            FramePlan {
                projection,
                view,
                light_view_position,
                skybox,
                environment: vec![ground, marker],
                technique,
            }
        };
        debug_assert_eq!(stack.depth(), 1);
        plan
    }
}

/// World placement of the model: the matrix uploaded as the explicit model
/// matrix for the reflection and refraction programs.
pub fn model_placement() -> Mat4 {
    Mat4::from_translation(MODEL_OFFSET) * Mat4::from_scale(Vec3::splat(MODEL_SCALE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputState, KeyCode};

    const ASPECT: f32 = 800.0 / 600.0;

    #[test]
    fn plan_is_deterministic() {
        let scene = SceneState::new();
        assert_eq!(FramePlan::build(&scene, ASPECT), FramePlan::build(&scene, ASPECT));
    }

    #[test]
    fn skybox_basis_never_translates() {
        let mut scene = SceneState::new();
        let first = FramePlan::build(&scene, ASPECT);
        scene.camera.eye += Vec3::new(40.0, -3.0, 12.0);
        let second = FramePlan::build(&scene, ASPECT);
        assert_eq!(first.skybox, second.skybox);
        // And the basis carries no translation at all.
        let unscaled = first.skybox.modelview * Mat4::from_scale(Vec3::splat(1.0 / SKYBOX_SCALE));
        assert!(unscaled.w_axis.abs_diff_eq(Vec4::W, 1e-5));
    }

    #[test]
    fn light_is_transformed_by_the_view_not_the_skybox_basis() {
        let scene = SceneState::new();
        let plan = FramePlan::build(&scene, ASPECT);
        let expected = plan.view * scene.light.position_world;
        assert!(plan.light_view_position.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn first_frame_draws_the_expected_scene() {
        let scene = SceneState::new();
        let plan = FramePlan::build(&scene, ASPECT);

        assert_eq!(plan.environment.len(), 2);
        assert!(plan.environment.iter().all(|draw| draw.mesh == MeshKind::Cube));

        let draw = plan.technique;
        assert_eq!(draw.technique, ShadingTechnique::Gouraud);
        assert_eq!(draw.mesh, MeshKind::Model);
        assert_eq!(draw.model, None);
        let expected = plan.view * model_placement();
        assert!(draw.modelview.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn marker_sits_at_the_light_position() {
        let scene = SceneState::new();
        let plan = FramePlan::build(&scene, ASPECT);
        let expected = plan.view
            * Mat4::from_translation(scene.light.position_world.truncate())
            * Mat4::from_scale(Vec3::splat(MARKER_SCALE));
        assert!(plan.environment[1].modelview.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn selecting_reflection_replaces_the_technique_draw() {
        let input = InputState::new();
        input.set_key_down(KeyCode::Digit(4));
        let mut scene = SceneState::new();
        scene.apply_input(&input);

        let plan = FramePlan::build(&scene, ASPECT);
        assert_eq!(plan.technique.technique, ShadingTechnique::Reflection);
        assert!(plan.technique.technique.binds_surface_texture());
        let model = plan.technique.model.expect("reflection carries a model matrix");
        assert!(model.abs_diff_eq(model_placement(), 1e-6));
        // The model matrix is world placement, distinct from the model-view.
        assert_ne!(model, plan.technique.modelview);
    }

    #[test]
    fn technique_switch_does_not_disturb_other_passes() {
        let mut scene = SceneState::new();
        let before = FramePlan::build(&scene, ASPECT);
        scene.technique = ShadingTechnique::Toon;
        let after = FramePlan::build(&scene, ASPECT);
        assert_eq!(before.skybox, after.skybox);
        assert_eq!(before.environment, after.environment);
        assert_eq!(before.light_view_position, after.light_view_position);
        assert_ne!(before.technique.technique, after.technique.technique);
    }
}
