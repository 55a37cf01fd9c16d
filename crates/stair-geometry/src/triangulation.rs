// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Planar face triangulation
//!
//! Wrapper around earcutr for faces that are not simple quads.

use crate::{Error, Result};
use nalgebra::{Point2, Point3, Vector3};

/// Check if a polygon is convex (all cross products have same sign)
#[inline]
fn is_convex(points: &[Point2<f64>]) -> bool {
    if points.len() < 3 {
        return false;
    }

    let n = points.len();
    let mut sign = 0i8;

    for i in 0..n {
        let p0 = &points[i];
        let p1 = &points[(i + 1) % n];
        let p2 = &points[(i + 2) % n];

        let cross = (p1.x - p0.x) * (p2.y - p1.y) - (p1.y - p0.y) * (p2.x - p1.x);

        if cross.abs() > 1e-10 {
            let current_sign = if cross > 0.0 { 1i8 } else { -1i8 };
            if sign == 0 {
                sign = current_sign;
            } else if sign != current_sign {
                return false;
            }
        }
    }

    true
}

/// Fan triangulation for convex polygons
#[inline]
fn fan_triangulate(n: usize) -> Vec<usize> {
    let mut indices = Vec::with_capacity((n - 2) * 3);
    for i in 1..n - 1 {
        indices.extend_from_slice(&[0, i, i + 1]);
    }
    indices
}

/// Triangulate a simple polygon given in face-plane coordinates
///
/// Returns triangle indices into the input points. Winding of the output is
/// not guaranteed; callers orient triangles against the face normal.
pub fn triangulate_polygon(points: &[Point2<f64>]) -> Result<Vec<usize>> {
    let n = points.len();

    if n < 3 {
        return Err(Error::triangulation(format!(
            "face needs at least 3 points, got {}",
            n
        )));
    }

    // FAST PATH: triangles and convex faces (every box face, every plate quad)
    if n == 3 {
        return Ok(vec![0, 1, 2]);
    }
    if is_convex(points) {
        return Ok(fan_triangulate(n));
    }

    let mut vertices = Vec::with_capacity(n * 2);
    for p in points {
        vertices.push(p.x);
        vertices.push(p.y);
    }

    let indices = earcutr::earcut(&vertices, &[], 2)
        .map_err(|e| Error::triangulation(format!("{:?}", e)))?;

    if indices.is_empty() {
        return Err(Error::triangulation("earcut produced no triangles"));
    }
    Ok(indices)
}

/// Polygon normal by Newell's method, `None` for degenerate polygons
pub fn polygon_normal(points: &[Point3<f64>]) -> Option<Vector3<f64>> {
    if points.len() < 3 {
        return None;
    }

    let n = points.len();
    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let current = &points[i];
        let next = &points[(i + 1) % n];

        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }

    let len = normal.norm();
    if len > 1e-12 {
        Some(normal / len)
    } else {
        None
    }
}

/// Orthonormal in-plane basis `(u, v)` with `u` following `u_hint` where possible
///
/// `u x v` equals `normal`. A hint parallel to the normal falls back to the
/// world axis least aligned with it.
pub fn plane_basis(normal: &Vector3<f64>, u_hint: &Vector3<f64>) -> (Vector3<f64>, Vector3<f64>) {
    let projected = u_hint - normal * u_hint.dot(normal);
    let u_axis = if projected.norm() > 1e-9 {
        projected.normalize()
    } else {
        let abs_x = normal.x.abs();
        let abs_y = normal.y.abs();
        let abs_z = normal.z.abs();

        let reference = if abs_x <= abs_y && abs_x <= abs_z {
            Vector3::x()
        } else if abs_y <= abs_z {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let r = reference - normal * reference.dot(normal);
        r.normalize()
    };
    let v_axis = normal.cross(&u_axis);
    (u_axis, v_axis)
}

/// Project 3D points onto a plane basis
#[inline]
pub fn project_to_plane(
    points: &[Point3<f64>],
    u_axis: &Vector3<f64>,
    v_axis: &Vector3<f64>,
    origin: &Point3<f64>,
) -> Vec<Point2<f64>> {
    points
        .iter()
        .map(|p| {
            let v = p - origin;
            Point2::new(v.dot(u_axis), v.dot(v_axis))
        })
        .collect()
}
