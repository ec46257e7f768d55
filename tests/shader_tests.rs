use std::fs;
use std::io::Write;
use std::path::Path;

use glam::Mat4;
use nbody_viewer::shader::{
    load_source, resolve_uniforms, UniformBlock, UniformHandle, FRAGMENT_SHADER_FILE,
    VERTEX_SHADER_FILE,
};

#[test]
fn test_shipped_shader_files_exist() {
    assert!(Path::new("shaders").join(VERTEX_SHADER_FILE).exists());
    assert!(Path::new("shaders").join(FRAGMENT_SHADER_FILE).exists());
}

#[test]
fn test_shipped_shaders_declare_entry_points() {
    let vs_source = fs::read_to_string(Path::new("shaders").join(VERTEX_SHADER_FILE)).unwrap();
    let fs_source = fs::read_to_string(Path::new("shaders").join(FRAGMENT_SHADER_FILE)).unwrap();

    assert!(vs_source.contains("@vertex"), "vertex stage should declare @vertex");
    assert!(vs_source.contains("vs_main"), "vertex stage should have vs_main");
    assert!(fs_source.contains("@fragment"), "fragment stage should declare @fragment");
    assert!(fs_source.contains("fs_main"), "fragment stage should have fs_main");

    // The vertex stage carries the uniform block and the position attribute.
    assert!(vs_source.contains("@group(0) @binding(0)"));
    assert!(vs_source.contains("@location(0) position"));
}

#[test]
fn test_shipped_shaders_resolve_all_three_uniforms() {
    let vs_source = fs::read_to_string(Path::new("shaders").join(VERTEX_SHADER_FILE)).unwrap();
    let fs_source = fs::read_to_string(Path::new("shaders").join(FRAGMENT_SHADER_FILE)).unwrap();

    let handles = resolve_uniforms(&vs_source, &fs_source);
    assert!(handles.model.is_resolved());
    assert!(handles.view.is_resolved());
    assert!(handles.projection.is_resolved());
}

#[test]
fn test_load_source_reads_file_in_full() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stage.wgsl");
    let mut file = fs::File::create(&path).unwrap();
    writeln!(file, "@vertex fn vs_main() {{}}").unwrap();

    let source = load_source(&path).unwrap();
    assert!(source.contains("vs_main"));
}

#[test]
fn test_load_source_missing_file_errors_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.wgsl");

    let error = load_source(&path).unwrap_err();
    assert!(format!("{error:#}").contains("absent.wgsl"));
}

#[test]
fn test_load_source_rejects_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.wgsl");
    fs::write(&path, "  \n\t\n").unwrap();

    assert!(load_source(&path).is_err());
}

#[test]
fn test_missing_uniform_yields_sentinel_and_noop_write() {
    // A source that declares only view and projection.
    let vs = "struct SceneUniforms {\n    view: mat4x4<f32>,\n    projection: mat4x4<f32>,\n}\n";
    let handles = resolve_uniforms(vs, "");

    assert_eq!(handles.model, UniformHandle::NOT_FOUND);

    // Uploading through the sentinel must not raise and must not write.
    let mut block = UniformBlock::new(4);
    let before = block.as_bytes().to_vec();
    block.set_matrix(2, handles.model, &Mat4::IDENTITY);
    assert_eq!(block.as_bytes(), &before[..]);

    // A resolved handle on the same block does write.
    block.set_matrix(2, handles.view, &Mat4::IDENTITY);
    assert_ne!(block.as_bytes(), &before[..]);
}

#[test]
fn test_uniform_names_in_comments_do_not_resolve() {
    let vs = "// the model matrix would go here\nstruct U {\n    view: mat4x4<f32>,\n}\n";
    let handles = resolve_uniforms(vs, "");
    assert!(!handles.model.is_resolved());
    assert!(handles.view.is_resolved());
}
