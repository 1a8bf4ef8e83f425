//! Material definitions for the Orrery planet scene.
//!
//! Each material kind has an enumerated, validated configuration struct and a
//! GPU-friendly packed uniform. Texture inputs are tracked per slot through a
//! small binding state machine so asynchronous load completions (and failures)
//! are first-class states rather than silent mutations.

mod binding;
mod material;

pub use binding::{TextureBinding, TextureBindingState, TextureSlot};
pub use material::{
    AtmosphereMaterialDef, AtmosphereUniform, GlowMaterialDef, GlowUniform, MaterialError,
    SurfaceMaterialDef, SurfaceUniform, glow_intensity,
};
