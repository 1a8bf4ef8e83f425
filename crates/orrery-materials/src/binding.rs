//! Texture slot bookkeeping for asynchronously loaded material inputs.
//!
//! Materials are constructed before their textures finish decoding on the
//! loader threads. Each slot starts [`TextureBindingState::Pending`] and is
//! flipped to `Loaded` or `Failed` when the load result arrives; renderers
//! substitute a placeholder for any slot that is not yet `Loaded`.

use std::collections::HashMap;

/// The texture inputs a planet scene can consume, one slot per map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Base color (albedo) map for the planet surface.
    ColorMap,
    /// Height map driving surface normal perturbation.
    BumpMap,
    /// Per-texel specular mask (oceans reflect, land does not).
    SpecularMap,
    /// Cloud layer color map.
    CloudMap,
    /// Cloud layer transparency map.
    CloudAlphaMap,
    /// Equirectangular star backdrop.
    Starfield,
}

impl TextureSlot {
    /// All slots, in load-request order.
    pub const ALL: [TextureSlot; 6] = [
        TextureSlot::ColorMap,
        TextureSlot::BumpMap,
        TextureSlot::SpecularMap,
        TextureSlot::CloudMap,
        TextureSlot::CloudAlphaMap,
        TextureSlot::Starfield,
    ];

    /// Stable string key used for load requests and GPU cache lookups.
    pub fn key(&self) -> &'static str {
        match self {
            TextureSlot::ColorMap => "planet_color",
            TextureSlot::BumpMap => "planet_bump",
            TextureSlot::SpecularMap => "planet_specular",
            TextureSlot::CloudMap => "cloud_color",
            TextureSlot::CloudAlphaMap => "cloud_alpha",
            TextureSlot::Starfield => "starfield",
        }
    }

    /// Default file name under the texture directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            TextureSlot::ColorMap => "earth_surface.jpg",
            TextureSlot::BumpMap => "earth_bump.jpg",
            TextureSlot::SpecularMap => "earth_specular.jpg",
            TextureSlot::CloudMap => "earth_clouds.jpg",
            TextureSlot::CloudAlphaMap => "earth_clouds_alpha.jpg",
            TextureSlot::Starfield => "galaxy_starfield.png",
        }
    }
}

/// Lifecycle of one texture slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureBindingState {
    /// Load requested, result not yet delivered.
    Pending,
    /// Decoded and uploaded; the renderer may sample it.
    Loaded,
    /// Decode or I/O failed; the placeholder stays in place.
    Failed(String),
}

/// Tracks binding state for every [`TextureSlot`].
///
/// Completion is idempotent: delivering a result for a slot that already
/// resolved leaves the existing state untouched, so a duplicate channel
/// message cannot regress a `Loaded` slot back to `Failed` or vice versa.
#[derive(Debug)]
pub struct TextureBinding {
    states: HashMap<TextureSlot, TextureBindingState>,
}

impl TextureBinding {
    /// All slots start `Pending`.
    pub fn new() -> Self {
        let states = TextureSlot::ALL
            .iter()
            .map(|slot| (*slot, TextureBindingState::Pending))
            .collect();
        Self { states }
    }

    /// Current state for a slot.
    pub fn state(&self, slot: TextureSlot) -> &TextureBindingState {
        // Every slot is seeded in new(), so the lookup cannot miss.
        &self.states[&slot]
    }

    /// Mark a slot's load as complete. Returns true if the state changed.
    pub fn complete(&mut self, slot: TextureSlot, result: Result<(), String>) -> bool {
        let entry = self
            .states
            .get_mut(&slot)
            .filter(|state| **state == TextureBindingState::Pending);

        match entry {
            Some(state) => {
                *state = match result {
                    Ok(()) => TextureBindingState::Loaded,
                    Err(message) => TextureBindingState::Failed(message),
                };
                true
            }
            None => false,
        }
    }

    /// True once the renderer may sample this slot.
    pub fn is_loaded(&self, slot: TextureSlot) -> bool {
        *self.state(slot) == TextureBindingState::Loaded
    }

    /// True when no slot remains `Pending`.
    pub fn all_resolved(&self) -> bool {
        self.states
            .values()
            .all(|state| *state != TextureBindingState::Pending)
    }

    /// Slots still waiting on the loader.
    pub fn pending_slots(&self) -> Vec<TextureSlot> {
        TextureSlot::ALL
            .iter()
            .copied()
            .filter(|slot| *self.state(*slot) == TextureBindingState::Pending)
            .collect()
    }
}

impl Default for TextureBinding {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_slots_start_pending() {
        let binding = TextureBinding::new();
        for slot in TextureSlot::ALL {
            assert_eq!(*binding.state(slot), TextureBindingState::Pending);
        }
        assert!(!binding.all_resolved());
        assert_eq!(binding.pending_slots().len(), TextureSlot::ALL.len());
    }

    #[test]
    fn test_complete_transitions_to_loaded() {
        let mut binding = TextureBinding::new();
        assert!(binding.complete(TextureSlot::ColorMap, Ok(())));
        assert!(binding.is_loaded(TextureSlot::ColorMap));
        assert!(!binding.is_loaded(TextureSlot::BumpMap));
    }

    #[test]
    fn test_complete_transitions_to_failed() {
        let mut binding = TextureBinding::new();
        assert!(binding.complete(TextureSlot::BumpMap, Err("decode error".to_string())));
        assert_eq!(
            *binding.state(TextureSlot::BumpMap),
            TextureBindingState::Failed("decode error".to_string())
        );
    }

    #[test]
    fn test_duplicate_completion_is_ignored() {
        let mut binding = TextureBinding::new();
        assert!(binding.complete(TextureSlot::ColorMap, Ok(())));
        // A late duplicate failure must not regress a loaded slot.
        assert!(!binding.complete(TextureSlot::ColorMap, Err("too late".to_string())));
        assert!(binding.is_loaded(TextureSlot::ColorMap));
    }

    #[test]
    fn test_all_resolved_after_every_slot_completes() {
        let mut binding = TextureBinding::new();
        for (i, slot) in TextureSlot::ALL.into_iter().enumerate() {
            let result = if i % 2 == 0 {
                Ok(())
            } else {
                Err("missing".to_string())
            };
            binding.complete(slot, result);
        }
        assert!(binding.all_resolved());
        assert!(binding.pending_slots().is_empty());
    }

    #[test]
    fn test_slot_keys_are_unique() {
        let mut keys: Vec<&str> = TextureSlot::ALL.iter().map(|s| s.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), TextureSlot::ALL.len());
    }
}
