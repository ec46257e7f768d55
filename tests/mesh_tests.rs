use nbody_viewer::mesh::SphereMesh;

#[test]
fn test_default_tessellation_vertex_count() {
    let mesh = SphereMesh::build(16, 16);
    assert_eq!(mesh.vertex_count(), (16 + 1) * (16 + 1));
}

#[test]
fn test_all_vertices_on_unit_sphere() {
    let mesh = SphereMesh::build(16, 16);
    for vertex in mesh.vertices() {
        let magnitude =
            (vertex[0] * vertex[0] + vertex[1] * vertex[1] + vertex[2] * vertex[2]).sqrt();
        assert!(
            (magnitude - 1.0).abs() < 1e-5,
            "vertex {vertex:?} has magnitude {magnitude}"
        );
    }
}

#[test]
fn test_row_major_lat_lon_ordering() {
    let latitude_bands = 8u32;
    let longitude_bands = 12u32;
    let mesh = SphereMesh::build(latitude_bands, longitude_bands);

    for lat in 0..=latitude_bands {
        let theta = lat as f32 * std::f32::consts::PI / latitude_bands as f32;
        for lon in 0..=longitude_bands {
            let phi = lon as f32 * 2.0 * std::f32::consts::PI / longitude_bands as f32;
            let expected = [
                phi.cos() * theta.sin(),
                theta.cos(),
                phi.sin() * theta.sin(),
            ];
            let index = (lat * (longitude_bands + 1) + lon) as usize;
            let actual = mesh.vertices()[index];
            for axis in 0..3 {
                assert!(
                    (actual[axis] - expected[axis]).abs() < 1e-6,
                    "vertex {index} axis {axis}: expected {expected:?}, got {actual:?}"
                );
            }
        }
    }
}

#[test]
fn test_each_ring_closes_on_itself() {
    // The last vertex of every ring repeats the first (phi = 0 and 2pi).
    let mesh = SphereMesh::build(4, 6);
    for lat in 0..=4usize {
        let ring_start = lat * 7;
        let first = mesh.vertices()[ring_start];
        let last = mesh.vertices()[ring_start + 6];
        for axis in 0..3 {
            assert!((first[axis] - last[axis]).abs() < 1e-6);
        }
    }
}

#[test]
fn test_vertex_layout_is_position_only() {
    let layout = SphereMesh::vertex_buffer_layout();
    assert_eq!(layout.array_stride, 12);
    assert_eq!(layout.attributes.len(), 1);
    assert_eq!(layout.attributes[0].shader_location, 0);
    assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
}
