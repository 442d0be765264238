//! Core modules for the Shadeview demo, an interactive mesh viewer with
//! runtime-switchable shading techniques.
//!
//! The per-frame logic (camera derivation, transform-stack discipline,
//! lighting and technique dispatch) is kept separate from the GPU layer:
//! [`frame::FramePlan`] resolves a whole frame's draws and matrices as
//! plain data, so the interesting invariants stay testable in headless
//! environments, and [`render::Renderer`] turns plans into draw calls.

pub mod assets;
pub mod camera;
pub mod frame;
pub mod input;
pub mod lighting;
pub mod obj;
pub mod render;
pub mod scene;
pub mod technique;
pub mod transform;

pub use assets::{load_mesh_file, AssetPaths};
pub use camera::Camera;
pub use frame::{FramePlan, MeshKind};
pub use input::{InputState, KeyCode};
pub use lighting::{Attenuation, Light, Material, MATERIAL_GLOSSY, MATERIAL_MATTE};
pub use obj::{load_obj_from_str, ObjMesh};
pub use render::Renderer;
pub use scene::SceneState;
pub use technique::ShadingTechnique;
pub use transform::{rotation_only, TransformStack};
