//! Scene model for the Orrery viewer.
//!
//! Holds the CPU-side description of what gets drawn: a small graph of named
//! nodes, the planet composite (surface, atmosphere, glow shell), the
//! per-layer spin animation state, and the camera orbit controller. Rendering
//! crates consume this state read-only each frame.

mod graph;
mod orbit;
mod planet;
mod spin;

pub use graph::{Node, NodeId, SceneGraph, Transform};
pub use orbit::{OrbitController, OrbitMode};
pub use planet::{Planet, PlanetLayer, SceneError, ATMOSPHERE_NODE, GLOW_NODE, SURFACE_NODE};
pub use spin::{LayerSpin, ATMOSPHERE_SPIN_STEP, SURFACE_SPIN_STEP};
