use assert_cmd::prelude::*;
use once_cell::sync::Lazy;
use predicates::str::contains;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const TRIANGLE_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
const QUAD_OBJ: &str = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

static ASSETS: Lazy<TempDir> = Lazy::new(|| {
    let dir = tempfile::tempdir().expect("temp assets dir");
    fs::write(dir.path().join("cube.obj"), TRIANGLE_OBJ).expect("write cube");
    fs::write(dir.path().join("model.obj"), QUAD_OBJ).expect("write model");
    dir
});

#[test]
fn summary_reports_assets_and_techniques() {
    let mut cmd = Command::cargo_bin("shadeview").expect("binary exists");
    cmd.arg(ASSETS.path()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains(" - cube mesh: 3 vertices, 3 indices"))
        .stdout(contains(" - model mesh: 4 vertices, 6 indices"))
        .stdout(contains(" - ground texture: missing (placeholder)"))
        .stdout(contains(" - skybox faces: 0/6 found"))
        .stdout(contains(
            "Techniques: 1=gouraud 2=phong 3=refraction 4=reflection 5=toon",
        ));
}

#[test]
fn missing_model_mesh_degrades_to_cube() {
    let dir = tempfile::tempdir().expect("temp assets dir");
    fs::write(dir.path().join("cube.obj"), TRIANGLE_OBJ).expect("write cube");

    let mut cmd = Command::cargo_bin("shadeview").expect("binary exists");
    cmd.arg(dir.path()).arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains(" - model mesh: missing, substituting cube"));
}

#[test]
fn unknown_flags_are_rejected() {
    let mut cmd = Command::cargo_bin("shadeview").expect("binary exists");
    cmd.arg("--bogus");
    cmd.assert()
        .failure()
        .stderr(contains("Unknown argument"));
}
