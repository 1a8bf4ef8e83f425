//! UV-sphere mesh generation for the planet shells and the star backdrop.

use std::f32::consts::{PI, TAU};

use crate::buffer::VertexPositionNormalUv;

/// CPU-side sphere mesh with equirectangular UVs.
pub struct SphereMesh {
    pub vertices: Vec<VertexPositionNormalUv>,
    pub indices: Vec<u32>,
}

/// Generate a latitude/longitude sphere.
///
/// `width_segments` columns of longitude and `height_segments` rows of
/// latitude; the seam column is duplicated so UVs wrap cleanly. u runs 0..1
/// around the equator, v runs 0 at the north pole to 1 at the south pole,
/// matching equirectangular planet maps.
pub fn generate_uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> SphereMesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let mut vertices =
        Vec::with_capacity(((width_segments + 1) * (height_segments + 1)) as usize);

    for row in 0..=height_segments {
        let v = row as f32 / height_segments as f32;
        // Polar angle from the north pole.
        let phi = v * PI;
        let (sin_phi, cos_phi) = phi.sin_cos();

        for col in 0..=width_segments {
            let u = col as f32 / width_segments as f32;
            let theta = u * TAU;
            let (sin_theta, cos_theta) = theta.sin_cos();

            // Longitude 0 faces -Z so u = 0.5 lines up with +Z, the
            // direction the orbit camera starts from.
            let normal = [
                -sin_phi * sin_theta,
                cos_phi,
                -sin_phi * cos_theta,
            ];
            vertices.push(VertexPositionNormalUv {
                position: [normal[0] * radius, normal[1] * radius, normal[2] * radius],
                normal,
                uv: [u, v],
            });
        }
    }

    let stride = width_segments + 1;
    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for row in 0..height_segments {
        for col in 0..width_segments {
            let a = row * stride + col;
            let b = a + stride;

            // Counter-clockwise winding seen from outside the sphere.
            if row != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if row != height_segments - 1 {
                indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    SphereMesh { vertices, indices }
}
