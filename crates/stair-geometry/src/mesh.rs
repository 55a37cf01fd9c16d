// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh builder
//!
//! Vertices are appended one at a time and return their index, so callers
//! never track buffer offsets by hand. Faces take an outward hint and are
//! wound to match it.

use crate::triangulation::{plane_basis, polygon_normal, project_to_plane, triangulate_polygon};
use crate::{Error, Result};
use nalgebra::{Point3, Vector3};
use stair_model::MeshData;

/// Size of a face in its own plane, used for texture fitting
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceExtent {
    pub dim_u: f64,
    pub dim_v: f64,
    /// Outward unit normal
    pub normal: Vector3<f64>,
}

/// Incremental triangle mesh in double precision
#[derive(Clone, Debug, Default)]
pub struct MeshBuilder {
    positions: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    uvs: Vec<[f64; 2]>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create builder with pre-allocated capacity
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count),
            normals: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(triangle_count * 3),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Position of vertex `index`
    #[inline]
    pub fn position(&self, index: u32) -> Point3<f64> {
        self.positions[index as usize]
    }

    /// Append a vertex and return its index
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>, uv: [f64; 2]) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        self.uvs.push(uv);
        index
    }

    /// Append a triangle as given
    #[inline]
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Append a quad as two triangles `(a, b, c)` and `(a, c, d)`
    #[inline]
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.add_triangle(a, b, c);
        self.add_triangle(a, c, d);
    }

    /// Append a triangle wound so its normal points along `facing`
    pub fn add_triangle_facing(&mut self, a: u32, b: u32, c: u32, facing: &Vector3<f64>) {
        let pa = self.positions[a as usize];
        let pb = self.positions[b as usize];
        let pc = self.positions[c as usize];
        let normal = (pb - pa).cross(&(pc - pa));
        if normal.dot(facing) < 0.0 {
            self.add_triangle(a, c, b);
        } else {
            self.add_triangle(a, b, c);
        }
    }

    /// Append a quad wound so both triangles face along `facing`
    pub fn add_quad_facing(&mut self, a: u32, b: u32, c: u32, d: u32, facing: &Vector3<f64>) {
        self.add_triangle_facing(a, b, c, facing);
        self.add_triangle_facing(a, c, d, facing);
    }

    /// Append a flat planar face with its own vertices and planar UVs
    ///
    /// `outward` picks the side the face is visible from; `u_hint` is the
    /// direction the U texture axis should follow.
    pub fn add_face(
        &mut self,
        points: &[Point3<f64>],
        outward: &Vector3<f64>,
        u_hint: &Vector3<f64>,
    ) -> Result<FaceExtent> {
        let mut normal = polygon_normal(points)
            .ok_or_else(|| Error::geometry(format!("degenerate face with {} points", points.len())))?;
        if normal.dot(outward) < 0.0 {
            normal = -normal;
        }

        let (u_axis, v_axis) = plane_basis(&normal, u_hint);
        let flat = project_to_plane(points, &u_axis, &v_axis, &points[0]);

        let (mut min_u, mut min_v) = (f64::MAX, f64::MAX);
        let (mut max_u, mut max_v) = (f64::MIN, f64::MIN);
        for p in &flat {
            min_u = min_u.min(p.x);
            min_v = min_v.min(p.y);
            max_u = max_u.max(p.x);
            max_v = max_v.max(p.y);
        }
        let dim_u = max_u - min_u;
        let dim_v = max_v - min_v;

        let triangles = triangulate_polygon(&flat)?;

        let base = self.positions.len() as u32;
        for (point, p2) in points.iter().zip(&flat) {
            let u = if dim_u > 1e-12 { (p2.x - min_u) / dim_u } else { 0.0 };
            let v = if dim_v > 1e-12 { (p2.y - min_v) / dim_v } else { 0.0 };
            self.add_vertex(*point, normal, [u, v]);
        }
        for tri in triangles.chunks_exact(3) {
            self.add_triangle_facing(
                base + tri[0] as u32,
                base + tri[1] as u32,
                base + tri[2] as u32,
                &normal,
            );
        }

        Ok(FaceExtent {
            dim_u,
            dim_v,
            normal,
        })
    }

    /// Append another builder's geometry
    pub fn append(&mut self, other: &MeshBuilder) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.uvs.extend_from_slice(&other.uvs);
        self.indices.extend(other.indices.iter().map(|i| i + offset));
    }

    /// Convert to renderer buffers
    pub fn build(self) -> MeshData {
        let mut mesh = MeshData::with_capacity(self.positions.len(), self.indices.len());
        for ((p, n), uv) in self.positions.iter().zip(&self.normals).zip(&self.uvs) {
            mesh.positions.extend_from_slice(&[p.x as f32, p.y as f32, p.z as f32]);
            mesh.normals.extend_from_slice(&[n.x as f32, n.y as f32, n.z as f32]);
            mesh.uvs.extend_from_slice(&[uv[0] as f32, uv[1] as f32]);
        }
        mesh.indices = self.indices;
        mesh
    }
}
