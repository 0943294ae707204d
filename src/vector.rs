use std::ops::{ Add, Sub, Neg, Mul };

use serde::{ Serialize, Deserialize };

use crate::feq;

/// A three-dimensional vector.
///
/// Used both for points (sphere centers, light positions, hit points) and for
/// directions (ray directions, normals). Unlike a homogeneous 4D tuple there
/// is no `w` component; whether a value is a point or a direction is decided
/// by the caller.
///
/// Serialized as a plain `[x, y, z]` array.
#[derive(Debug, Default, Copy, Clone, PartialOrd, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vector3 {
    fn eq(&self, other: &Vector3) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(a: [f64; 3]) -> Vector3 {
        Vector3 { x: a[0], y: a[1], z: a[2] }
    }
}

impl From<Vector3> for [f64; 3] {
    fn from(v: Vector3) -> [f64; 3] {
        [v.x, v.y, v.z]
    }
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3 { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        f64::sqrt(
            self.x.powi(2)
            + self.y.powi(2)
            + self.z.powi(2)
        )
    }

    /// Scales the vector to unit length.
    ///
    /// Returns `None` if the vector has zero (or non-finite) length, in which
    /// case it has no direction to preserve.
    ///
    /// ```
    /// # use sphere_tracer::vector::Vector3;
    /// let v = Vector3::new(4.0, 0.0, 0.0);
    /// assert_eq!(v.normalize(), Some(Vector3::new(1.0, 0.0, 0.0)));
    /// assert_eq!(Vector3::ZERO.normalize(), None);
    /// ```
    pub fn normalize(&self) -> Option<Vector3> {
        let mag = self.magnitude();
        if mag == 0.0 || !mag.is_finite() {
            return None;
        }

        Some(*self * (1.0 / mag))
    }

    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    /// Mirrors this vector about a normal: `2 * n * (n . v) - v`.
    ///
    /// Both the light vector in the specular term and the view vector of a
    /// reflective hit are mirrored this way. The vector is expected to point
    /// *away* from the surface, and so is the result.
    pub fn reflect(&self, normal: &Vector3) -> Vector3 {
        *normal * 2.0 * normal.dot(self) - *self
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements scalar right-multiplication for a vector.
///
/// ```
/// use sphere_tracer::vector::Vector3;
///
/// let v = Vector3::new(1.0, 2.0, 3.0);
/// assert_eq!(v * 2.0, Vector3::new(2.0, 4.0, 6.0));
/// ```
impl Mul<f64> for Vector3 {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a vector.
impl Mul<Vector3> for f64 {
    type Output = Vector3;

    fn mul(self, other: Vector3) -> Vector3 {
        Vector3 {
            x: self * other.x,
            y: self * other.y,
            z: self * other.z,
        }
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a1 = Vector3::new(3.0, -2.0, 5.0);
    let a2 = Vector3::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Vector3::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_vectors() {
    let p1 = Vector3::new(3.0, 2.0, 1.0);
    let p2 = Vector3::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector3::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_vector() {
    let a = Vector3::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector3::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_scalar_both_sides() {
    let a = Vector3::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Vector3::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Vector3::new(0.5, -1.0, 1.5));
}

#[test]
fn magnitude_neg() {
    let v = Vector3::new(-1.0, -2.0, -3.0);

    assert_eq!(v.magnitude(), f64::sqrt(14.0));
}

#[test]
fn normalize_dirty() {
    let v = Vector3::new(1.0, 2.0, 3.0);
    let e = Vector3::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(v.normalize(), Some(e));
}

#[test]
fn normalize_zero_is_none() {
    assert_eq!(Vector3::ZERO.normalize(), None);
    assert_eq!(Vector3::new(f64::INFINITY, 0.0, 0.0).normalize(), None);
}

#[test]
fn dot_vectors() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
}

#[test]
fn reflect_45() {
    // Light arriving from the upper left leaves toward the upper right.
    let l = Vector3::new(-1.0, 1.0, 0.0);
    let n = Vector3::new(0.0, 1.0, 0.0);

    assert_eq!(l.reflect(&n), Vector3::new(1.0, 1.0, 0.0));
}

#[test]
fn deserialize_from_array() {
    let v: Vector3 = serde_json::from_str("[1.0, -2.5, 3]").unwrap();

    assert_eq!(v, Vector3::new(1.0, -2.5, 3.0));
}
