//! Extruded 3D text: parses a font face, extracts glyph outlines, and turns a
//! string into a solid triangle mesh with front and back caps plus side walls.

pub mod extrude;
pub mod label;
pub mod outline;

pub use extrude::{ExtrudedMesh, extrude_path};
pub use label::{LabelMesh, TextError, build_label_mesh};
pub use outline::{OutlineCollector, glyph_outline};
