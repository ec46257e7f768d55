//! Minimal real-time viewer for a handful of point masses, drawn as shaded
//! spheres. Bodies advance by `position += velocity * dt` each frame; there
//! is no force model. One procedurally tessellated unit sphere is shared by
//! every body and resized per draw through the model matrix.

pub mod body;
pub mod camera;
pub mod config;
pub mod gpu;
pub mod mesh;
pub mod shader;
pub mod sim;
pub mod vector;
