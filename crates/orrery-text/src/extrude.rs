//! Extrusion of closed 2D outlines into solid slab meshes.
//!
//! Each outline becomes a front cap at `+depth/2`, a mirrored back cap at
//! `-depth/2`, and flat-shaded side walls joining the two.

use lyon::path::Path;
use lyon::path::iterator::PathIterator;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, TessellationError,
    VertexBuffers,
};

use orrery_render::buffer::VertexPositionNormal;

/// A solid extruded mesh ready for GPU upload.
#[derive(Debug, Default, Clone)]
pub struct ExtrudedMesh {
    pub vertices: Vec<VertexPositionNormal>,
    pub indices: Vec<u32>,
}

impl ExtrudedMesh {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Append another mesh, offsetting its indices.
    pub fn append(&mut self, other: &ExtrudedMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| base + i));
    }
}

/// Extrude a closed outline path into a slab of the given depth.
///
/// The fill rule is non-zero, matching how font contours encode holes.
pub fn extrude_path(
    path: &Path,
    tolerance: f32,
    depth: f32,
) -> Result<ExtrudedMesh, TessellationError> {
    let half_depth = depth * 0.5;

    // Cap triangulation. Lyon emits counter-clockwise triangles, which is the
    // front-facing winding for the +Z cap as-is.
    let mut tess = FillTessellator::new();
    let mut cap: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
    let fill = FillOptions::tolerance(tolerance).with_fill_rule(FillRule::NonZero);
    tess.tessellate_path(
        path,
        &fill,
        &mut BuffersBuilder::new(&mut cap, |v: FillVertex| {
            let p = v.position();
            [p.x, p.y]
        }),
    )?;

    let cap_vertex_count = cap.vertices.len() as u32;
    let mut mesh = ExtrudedMesh::default();

    // Front cap at +depth/2.
    for &[x, y] in &cap.vertices {
        mesh.vertices.push(VertexPositionNormal {
            position: [x, y, half_depth],
            normal: [0.0, 0.0, 1.0],
        });
    }
    mesh.indices.extend_from_slice(&cap.indices);

    // Back cap at -depth/2, winding reversed so it faces -Z.
    for &[x, y] in &cap.vertices {
        mesh.vertices.push(VertexPositionNormal {
            position: [x, y, -half_depth],
            normal: [0.0, 0.0, -1.0],
        });
    }
    for tri in cap.indices.chunks_exact(3) {
        mesh.indices.push(cap_vertex_count + tri[0]);
        mesh.indices.push(cap_vertex_count + tri[2]);
        mesh.indices.push(cap_vertex_count + tri[1]);
    }

    // Side walls along each flattened contour.
    for contour in flatten_contours(path, tolerance) {
        let n = contour.len();
        for i in 0..n {
            let p1 = contour[i];
            let p2 = contour[(i + 1) % n];
            let dx = p2[0] - p1[0];
            let dy = p2[1] - p1[1];
            let len = (dx * dx + dy * dy).sqrt();
            if len < 1e-9 {
                continue;
            }
            // Outward normal for clockwise outer contours (TrueType, Y up).
            let normal = [-dy / len, dx / len, 0.0];

            let base = mesh.vertices.len() as u32;
            mesh.vertices.push(VertexPositionNormal {
                position: [p1[0], p1[1], half_depth],
                normal,
            });
            mesh.vertices.push(VertexPositionNormal {
                position: [p2[0], p2[1], half_depth],
                normal,
            });
            mesh.vertices.push(VertexPositionNormal {
                position: [p2[0], p2[1], -half_depth],
                normal,
            });
            mesh.vertices.push(VertexPositionNormal {
                position: [p1[0], p1[1], -half_depth],
                normal,
            });
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }

    Ok(mesh)
}

/// Flatten the path into closed polyline contours.
fn flatten_contours(path: &Path, tolerance: f32) -> Vec<Vec<[f32; 2]>> {
    let mut contours = Vec::new();
    let mut current: Vec<[f32; 2]> = Vec::new();

    for event in path.iter().flattened(tolerance) {
        match event {
            lyon::path::Event::Begin { at } => {
                current = vec![[at.x, at.y]];
            }
            lyon::path::Event::Line { to, .. } => {
                current.push([to.x, to.y]);
            }
            lyon::path::Event::End { .. } => {
                // The closing edge is implicit: walls wrap from the last point
                // back to the first.
                if current.len() >= 2 {
                    contours.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }

    contours
}
