//! # Exact Arithmetic
//!
//! Rational-coordinate geometry for the corefinement kernel.
//!
//! All kernel decisions (orientations, containment, intersections) are made
//! on arbitrary-precision rationals, so there is no tolerance anywhere in
//! the boolean algorithm itself. Double precision only appears at the
//! import/export boundary and in conservative bounding-box prefilters.

pub(crate) mod mesh;
pub(crate) mod predicates;

use std::cmp::Ordering;

use glam::DVec3;
use num_bigint::Sign;
use num_rational::BigRational;
use num_traits::ToPrimitive;

/// Scalar type of the exact kernel.
pub(crate) type Scalar = BigRational;

/// Sign of an exact scalar, without allocating a zero for comparison.
#[inline]
pub(crate) fn sign(value: &Scalar) -> Ordering {
    match value.numer().sign() {
        Sign::Minus => Ordering::Less,
        Sign::NoSign => Ordering::Equal,
        Sign::Plus => Ordering::Greater,
    }
}

// =============================================================================
// POINT
// =============================================================================

/// Point with exact rational coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct ExactPoint {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Scalar,
}

impl ExactPoint {
    /// Promotes a double-precision point. `None` for non-finite input; the
    /// conversion is otherwise lossless.
    pub fn from_dvec3(v: DVec3) -> Option<Self> {
        Some(Self {
            x: BigRational::from_float(v.x)?,
            y: BigRational::from_float(v.y)?,
            z: BigRational::from_float(v.z)?,
        })
    }

    /// Rounds to double precision.
    pub fn to_dvec3(&self) -> DVec3 {
        DVec3::new(
            self.x.to_f64().unwrap_or(0.0),
            self.y.to_f64().unwrap_or(0.0),
            self.z.to_f64().unwrap_or(0.0),
        )
    }

    /// Vector from `other` to `self`.
    pub fn sub(&self, other: &ExactPoint) -> ExactVector {
        ExactVector {
            x: &self.x - &other.x,
            y: &self.y - &other.y,
            z: &self.z - &other.z,
        }
    }

    /// Point displaced by a vector.
    pub fn add(&self, vector: &ExactVector) -> ExactPoint {
        ExactPoint {
            x: &self.x + &vector.x,
            y: &self.y + &vector.y,
            z: &self.z + &vector.z,
        }
    }

    /// `self + t * (other - self)`.
    pub fn lerp(&self, other: &ExactPoint, t: &Scalar) -> ExactPoint {
        ExactPoint {
            x: &self.x + t * (&other.x - &self.x),
            y: &self.y + t * (&other.y - &self.y),
            z: &self.z + t * (&other.z - &self.z),
        }
    }

    /// Exact centroid of a triangle.
    pub fn centroid(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint) -> ExactPoint {
        let three = Scalar::from_integer(3.into());
        ExactPoint {
            x: (&a.x + &b.x + &c.x) / &three,
            y: (&a.y + &b.y + &c.y) / &three,
            z: (&a.z + &b.z + &c.z) / &three,
        }
    }
}

// =============================================================================
// VECTOR
// =============================================================================

/// Vector with exact rational components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExactVector {
    pub x: Scalar,
    pub y: Scalar,
    pub z: Scalar,
}

impl ExactVector {
    /// Vector from integer components (used for ray directions).
    pub fn from_ints(x: i64, y: i64, z: i64) -> Self {
        Self {
            x: Scalar::from_integer(x.into()),
            y: Scalar::from_integer(y.into()),
            z: Scalar::from_integer(z.into()),
        }
    }

    /// Cross product.
    pub fn cross(&self, other: &ExactVector) -> ExactVector {
        ExactVector {
            x: &self.y * &other.z - &self.z * &other.y,
            y: &self.z * &other.x - &self.x * &other.z,
            z: &self.x * &other.y - &self.y * &other.x,
        }
    }

    /// Dot product with another vector.
    pub fn dot(&self, other: &ExactVector) -> Scalar {
        &self.x * &other.x + &self.y * &other.y + &self.z * &other.z
    }

    /// Dot product with a point's coordinates.
    pub fn dot_point(&self, point: &ExactPoint) -> Scalar {
        &self.x * &point.x + &self.y * &point.y + &self.z * &point.z
    }

    /// True for the zero vector.
    pub fn is_zero(&self) -> bool {
        use num_traits::Zero;
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }
}

// =============================================================================
// PLANE
// =============================================================================

/// Plane `normal · p + offset = 0` with an exact (unnormalized) normal.
#[derive(Debug, Clone)]
pub(crate) struct ExactPlane {
    pub normal: ExactVector,
    offset: Scalar,
}

impl ExactPlane {
    /// Supporting plane of a triangle; `None` for a degenerate triangle.
    pub fn from_triangle(a: &ExactPoint, b: &ExactPoint, c: &ExactPoint) -> Option<Self> {
        let normal = b.sub(a).cross(&c.sub(a));
        if normal.is_zero() {
            return None;
        }
        let offset = -normal.dot_point(a);
        Some(Self { normal, offset })
    }

    /// Signed (unnormalized) distance of a point from the plane.
    pub fn eval(&self, point: &ExactPoint) -> Scalar {
        self.normal.dot_point(point) + &self.offset
    }

    /// Which side of the plane a point lies on.
    pub fn side(&self, point: &ExactPoint) -> Ordering {
        sign(&self.eval(point))
    }
}

// =============================================================================
// TESTS
// =============================================================================
