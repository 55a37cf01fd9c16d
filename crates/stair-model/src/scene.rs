// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generated scene: nodes with a placement and material-tagged mesh parts

use crate::material::MaterialParams;
use crate::mesh::MeshData;
use crate::tread::{Placement, Tread};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Face of a tread cross-section
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TreadFace {
    /// Walking surface
    Top,
    Bottom,
    /// Nosing side, facing down the stair
    Front,
    Back,
    /// Side toward the turning center
    Inner,
    Outer,
}

impl TreadFace {
    pub const ALL: [TreadFace; 6] = [
        TreadFace::Top,
        TreadFace::Bottom,
        TreadFace::Front,
        TreadFace::Back,
        TreadFace::Inner,
        TreadFace::Outer,
    ];

    /// Horizontal faces (top and bottom)
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, TreadFace::Top | TreadFace::Bottom)
    }
}

/// What a mesh part represents
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PartRole {
    /// Thin slab carrying the surface (color) material
    WalkingSurface,
    /// Structural tread body
    Structure,
    /// Hi-tech support plate along a run of steps
    ConnectorPlate,
    /// Hi-tech support band along a landing edge
    LandingPlate,
    /// Glass or metal railing panel strip
    RailingPanel,
    /// Cable railing
    Cable,
}

/// One mesh with its material
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenePart {
    pub role: PartRole,
    /// Cross-section face, for per-face tread parts
    pub face: Option<TreadFace>,
    pub mesh: Arc<MeshData>,
    pub material: MaterialParams,
}

impl ScenePart {
    /// Create a part that does not belong to a single tread face
    pub fn new(role: PartRole, mesh: MeshData, material: MaterialParams) -> Self {
        Self {
            role,
            face: None,
            mesh: Arc::new(mesh),
            material,
        }
    }

    /// Create a per-face tread part
    pub fn face(role: PartRole, face: TreadFace, mesh: MeshData, material: MaterialParams) -> Self {
        Self {
            role,
            face: Some(face),
            mesh: Arc::new(mesh),
            material,
        }
    }
}

/// A transform node holding mesh parts in its local frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub placement: Placement,
    pub parts: Vec<ScenePart>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, placement: Placement) -> Self {
        Self {
            name: name.into(),
            placement,
            parts: Vec::new(),
        }
    }

    /// Parts with the given role
    pub fn parts_with_role(&self, role: PartRole) -> impl Iterator<Item = &ScenePart> {
        self.parts.iter().filter(move |part| part.role == role)
    }

    pub fn triangle_count(&self) -> usize {
        self.parts.iter().map(|part| part.mesh.triangle_count()).sum()
    }
}

/// Labeled corner marker (`T0`..`T3` on top, `B0`..`B3` on the bottom)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreadMarker {
    pub tread: usize,
    pub label: String,
    /// World position
    pub position: Point3<f64>,
}

/// Complete output of one generation pass
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StairScene {
    /// Laid-out treads, also read by price and railing UI
    pub treads: Vec<Tread>,
    pub nodes: Vec<SceneNode>,
    pub markers: Vec<TreadMarker>,
    /// Degraded-output notices (fallbacks, unconverged solves)
    pub warnings: Vec<String>,
}

impl StairScene {
    /// Find a node by name
    pub fn node(&self, name: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// All parts with a role, across nodes
    pub fn parts_with_role(&self, role: PartRole) -> impl Iterator<Item = &ScenePart> {
        self.nodes.iter().flat_map(move |node| node.parts_with_role(role))
    }

    pub fn triangle_count(&self) -> usize {
        self.nodes.iter().map(SceneNode::triangle_count).sum()
    }

    pub fn step_count(&self) -> usize {
        self.treads.iter().filter(|t| !t.is_landing).count()
    }

    pub fn landing_count(&self) -> usize {
        self.treads.iter().filter(|t| t.is_landing).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        MeshData {
            positions: vec![0.0; 12],
            normals: vec![0.0; 12],
            uvs: Vec::new(),
            indices: vec![0, 1, 2, 0, 2, 3],
        }
    }

    #[test]
    fn test_role_lookup() {
        let mut node = SceneNode::new("tread-0", Placement::identity());
        node.parts.push(ScenePart::face(
            PartRole::WalkingSurface,
            TreadFace::Top,
            quad(),
            MaterialParams::default(),
        ));
        node.parts
            .push(ScenePart::new(PartRole::Structure, quad(), MaterialParams::default()));

        let scene = StairScene {
            nodes: vec![node],
            ..Default::default()
        };
        assert_eq!(scene.parts_with_role(PartRole::Structure).count(), 1);
        assert_eq!(scene.triangle_count(), 4);
        assert!(scene.node("tread-0").is_some());
        assert!(scene.node("tread-1").is_none());
    }
}
