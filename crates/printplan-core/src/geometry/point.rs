//! Integer points in 2D and 3D
//!
//! Arithmetic on points is exact. Lengths and projections that need floating
//! point are exposed as separate `f64` accessors.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use super::Coord;
use crate::error::GeometryResult;
use crate::units::try_mm_to_coord;

/// A point or vector in the XY plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: Coord,
    pub y: Coord,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0, y: 0 };

    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Build a point from millimetre values
    pub fn try_from_mm(x: f64, y: f64) -> GeometryResult<Self> {
        Ok(Self::new(try_mm_to_coord(x)?, try_mm_to_coord(y)?))
    }

    /// Squared length, exact
    pub fn vsize2(self) -> Coord {
        self.x * self.x + self.y * self.y
    }

    pub fn vsize(self) -> f64 {
        (self.vsize2() as f64).sqrt()
    }

    pub fn dot(self, other: Point2) -> Coord {
        self.x * other.x + self.y * other.y
    }

    /// Z component of the 3D cross product
    pub fn cross(self, other: Point2) -> Coord {
        self.x * other.y - self.y * other.x
    }

    /// The vector rotated a quarter turn counter-clockwise
    pub fn turned_90_ccw(self) -> Point2 {
        Point2::new(-self.y, self.x)
    }

    pub fn with_z(self, z: Coord) -> Point3 {
        Point3::new(self.x, self.y, z)
    }
}

impl From<(Coord, Coord)> for Point2 {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self::new(x, y)
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Self::Output {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Self::Output {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point2 {
    type Output = Point2;

    fn neg(self) -> Self::Output {
        Point2::new(-self.x, -self.y)
    }
}

impl Mul<Coord> for Point2 {
    type Output = Point2;

    fn mul(self, rhs: Coord) -> Self::Output {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<Coord> for Point2 {
    type Output = Point2;

    fn div(self, rhs: Coord) -> Self::Output {
        Point2::new(self.x / rhs, self.y / rhs)
    }
}

impl AddAssign for Point2 {
    fn add_assign(&mut self, rhs: Point2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl SubAssign for Point2 {
    fn sub_assign(&mut self, rhs: Point2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A position of the print head
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl Point3 {
    pub const ORIGIN: Point3 = Point3 { x: 0, y: 0, z: 0 };

    pub const fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self { x, y, z }
    }

    /// Squared length, exact
    pub fn vsize2(self) -> Coord {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    pub fn vsize(self) -> f64 {
        (self.vsize2() as f64).sqrt()
    }

    /// Projection onto the XY plane
    pub fn to_point2(self) -> Point2 {
        Point2::new(self.x, self.y)
    }
}

impl From<(Coord, Coord, Coord)> for Point3 {
    fn from((x, y, z): (Coord, Coord, Coord)) -> Self {
        Self::new(x, y, z)
    }
}

impl Add for Point3 {
    type Output = Point3;

    fn add(self, rhs: Point3) -> Self::Output {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;

    fn sub(self, rhs: Point3) -> Self::Output {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Point3 {
    type Output = Point3;

    fn neg(self) -> Self::Output {
        Point3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<Coord> for Point3 {
    type Output = Point3;

    fn mul(self, rhs: Coord) -> Self::Output {
        Point3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<Coord> for Point3 {
    type Output = Point3;

    fn div(self, rhs: Coord) -> Self::Output {
        Point3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl AddAssign for Point3 {
    fn add_assign(&mut self, rhs: Point3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Point3 {
    fn sub_assign(&mut self, rhs: Point3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl fmt::Display for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
