//! Background asset loading.
//!
//! Bitmaps are fetched and decoded on worker threads; results come back over
//! a channel and are drained on the event-loop thread once per frame. Failures
//! are first-class results, never silently swallowed: a missing or corrupt
//! file is logged and the scene keeps its untextured defaults.

mod error;
mod font;
mod loader;

pub use error::AssetError;
pub use font::load_font_bytes;
pub use loader::{AssetLoader, DecodedImage, TextureLoadResult};
