//! The planet composite: surface, cloud atmosphere, and rim-glow shell.

use glam::Quat;
use thiserror::Error;

use orrery_config::PlanetConfig;
use orrery_materials::{
    AtmosphereMaterialDef, GlowMaterialDef, MaterialError, SurfaceMaterialDef, TextureBinding,
};

use crate::graph::{NodeId, SceneGraph};
use crate::spin::LayerSpin;

/// Name of the textured surface child node.
pub const SURFACE_NODE: &str = "surface";
/// Name of the translucent cloud child node.
pub const ATMOSPHERE_NODE: &str = "atmosphere";
/// Name of the additive glow shell child node.
pub const GLOW_NODE: &str = "atmosphericGlow";

/// Errors raised while assembling the planet composite.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Shell radii must satisfy glow > atmosphere > surface > 0.
    #[error(
        "planet radii must be strictly increasing and positive: \
         surface={surface}, atmosphere={atmosphere}, glow={glow}"
    )]
    InvalidRadii {
        surface: f32,
        atmosphere: f32,
        glow: f32,
    },

    /// A child node name collided with an existing graph node.
    #[error("scene graph already contains a node named {0:?}")]
    DuplicateNode(String),

    /// A material failed validation.
    #[error("material validation failed: {0}")]
    Material(#[from] MaterialError),
}

/// One shell of the planet composite.
#[derive(Debug)]
pub struct PlanetLayer {
    pub node: NodeId,
    pub radius: f32,
}

/// The assembled planet: three concentric sphere shells under one root node,
/// each looked up by name ([`SURFACE_NODE`], [`ATMOSPHERE_NODE`],
/// [`GLOW_NODE`]).
#[derive(Debug)]
pub struct Planet {
    pub root: NodeId,
    pub surface: PlanetLayer,
    pub atmosphere: PlanetLayer,
    pub glow: PlanetLayer,
    pub surface_material: SurfaceMaterialDef,
    pub atmosphere_material: AtmosphereMaterialDef,
    pub glow_material: GlowMaterialDef,
    /// Async texture slot states, shared across all three layers.
    pub textures: TextureBinding,
}

impl Planet {
    /// Build the composite from config, inserting four nodes into `graph`.
    ///
    /// # Errors
    ///
    /// Fails when the radii are not strictly increasing and positive, when a
    /// node name is already taken, or when a material rejects its parameters.
    pub fn build(graph: &mut SceneGraph, config: &PlanetConfig) -> Result<Self, SceneError> {
        if !(config.surface_radius > 0.0
            && config.atmosphere_radius > config.surface_radius
            && config.glow_radius > config.atmosphere_radius)
        {
            return Err(SceneError::InvalidRadii {
                surface: config.surface_radius,
                atmosphere: config.atmosphere_radius,
                glow: config.glow_radius,
            });
        }

        let root = graph
            .add_root("planet")
            .ok_or_else(|| SceneError::DuplicateNode("planet".to_string()))?;
        let mut child = |graph: &mut SceneGraph, name: &str| {
            graph
                .add_child(root, name)
                .ok_or_else(|| SceneError::DuplicateNode(name.to_string()))
        };
        let surface_node = child(graph, SURFACE_NODE)?;
        let atmosphere_node = child(graph, ATMOSPHERE_NODE)?;
        let glow_node = child(graph, GLOW_NODE)?;

        let surface_material = SurfaceMaterialDef::default().validated()?;
        let atmosphere_material = AtmosphereMaterialDef {
            opacity: config.atmosphere_opacity,
        }
        .validated()?;
        let glow_material = GlowMaterialDef {
            intensity: config.glow_intensity,
            fade: config.glow_fade,
            color: config.glow_color,
        }
        .validated()?;

        Ok(Self {
            root,
            surface: PlanetLayer {
                node: surface_node,
                radius: config.surface_radius,
            },
            atmosphere: PlanetLayer {
                node: atmosphere_node,
                radius: config.atmosphere_radius,
            },
            glow: PlanetLayer {
                node: glow_node,
                radius: config.glow_radius,
            },
            surface_material,
            atmosphere_material,
            glow_material,
            textures: TextureBinding::new(),
        })
    }

    /// Write the current spin angles into the layer node transforms.
    ///
    /// The renderer reads its per-layer model matrices back out of the graph
    /// via [`SceneGraph::world_matrix`], so this is the one place animation
    /// state touches node transforms. The glow shell does not spin.
    pub fn apply_spin(&self, graph: &mut SceneGraph, spin: &LayerSpin) {
        graph.node_mut(self.surface.node).transform.rotation =
            Quat::from_rotation_y(spin.surface_angle());
        graph.node_mut(self.atmosphere.node).transform.rotation =
            Quat::from_rotation_y(spin.atmosphere_angle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_creates_three_named_children() {
        let mut graph = SceneGraph::new();
        let planet = Planet::build(&mut graph, &PlanetConfig::default()).unwrap();

        let root_children = graph.node(planet.root).children();
        assert_eq!(root_children.len(), 3, "planet must have exactly 3 layers");

        assert_eq!(graph.find(SURFACE_NODE), Some(planet.surface.node));
        assert_eq!(graph.find(ATMOSPHERE_NODE), Some(planet.atmosphere.node));
        assert_eq!(graph.find(GLOW_NODE), Some(planet.glow.node));
    }

    #[test]
    fn test_radii_strictly_increasing() {
        let mut graph = SceneGraph::new();
        let planet = Planet::build(&mut graph, &PlanetConfig::default()).unwrap();

        assert!(planet.surface.radius > 0.0);
        assert!(planet.atmosphere.radius > planet.surface.radius);
        assert!(planet.glow.radius > planet.atmosphere.radius);
    }

    #[test]
    fn test_inverted_radii_rejected() {
        let mut graph = SceneGraph::new();
        let config = PlanetConfig {
            surface_radius: 0.6,
            atmosphere_radius: 0.5,
            ..Default::default()
        };
        let result = Planet::build(&mut graph, &config);
        assert!(matches!(result, Err(SceneError::InvalidRadii { .. })));
    }

    #[test]
    fn test_zero_surface_radius_rejected() {
        let mut graph = SceneGraph::new();
        let config = PlanetConfig {
            surface_radius: 0.0,
            ..Default::default()
        };
        assert!(Planet::build(&mut graph, &config).is_err());
    }

    #[test]
    fn test_duplicate_planet_rejected() {
        let mut graph = SceneGraph::new();
        Planet::build(&mut graph, &PlanetConfig::default()).unwrap();
        let result = Planet::build(&mut graph, &PlanetConfig::default());
        assert!(matches!(result, Err(SceneError::DuplicateNode(_))));
    }

    #[test]
    fn test_apply_spin_writes_layer_transforms() {
        use glam::Mat4;

        let mut graph = SceneGraph::new();
        let planet = Planet::build(&mut graph, &PlanetConfig::default()).unwrap();

        let mut spin = LayerSpin::new();
        for _ in 0..10 {
            spin.step();
        }
        planet.apply_spin(&mut graph, &spin);

        let surface = graph.world_matrix(planet.surface.node);
        assert!(surface.abs_diff_eq(Mat4::from_rotation_y(spin.surface_angle()), 1e-6));

        let atmosphere = graph.world_matrix(planet.atmosphere.node);
        assert!(atmosphere.abs_diff_eq(Mat4::from_rotation_y(spin.atmosphere_angle()), 1e-6));

        // The glow shell stays put.
        let glow = graph.world_matrix(planet.glow.node);
        assert!(glow.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_materials_reflect_config() {
        let mut graph = SceneGraph::new();
        let config = PlanetConfig::default();
        let planet = Planet::build(&mut graph, &config).unwrap();

        assert_eq!(planet.atmosphere_material.opacity, config.atmosphere_opacity);
        assert_eq!(planet.glow_material.intensity, config.glow_intensity);
        assert_eq!(planet.glow_material.fade, config.glow_fade);
        assert_eq!(planet.glow_material.color, config.glow_color);
    }
}
