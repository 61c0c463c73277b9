//! Collections of polygons describing an area

use serde::{Deserialize, Serialize};

use super::{Aabb, Point2, PointMatrix, Polygon};

/// An area made of outline polygons and hole polygons
///
/// Boolean operations on shapes are provided by external polygon libraries;
/// this type only stores the rings and answers cheap queries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Shape {
    pub polygons: Vec<Polygon>,
}

impl Shape {
    pub fn new(polygons: Vec<Polygon>) -> Self {
        Self { polygons }
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.iter().all(Polygon::is_empty)
    }

    pub fn push(&mut self, polygon: Polygon) {
        self.polygons.push(polygon);
    }

    /// Append every polygon of another shape without merging
    pub fn push_shape(&mut self, other: Shape) {
        self.polygons.extend(other.polygons);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Polygon> {
        self.polygons.iter()
    }

    /// Net area; holes subtract
    pub fn area(&self) -> f64 {
        self.polygons.iter().map(Polygon::area).sum()
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point2, Point2)> + '_ {
        self.polygons.iter().flat_map(Polygon::segments)
    }

    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for polygon in &self.polygons {
            aabb.include_box(&polygon.bounding_box());
        }
        aabb
    }

    pub fn apply_matrix(&mut self, matrix: &PointMatrix) {
        for polygon in &mut self.polygons {
            polygon.apply_matrix(matrix);
        }
    }
}

impl From<Polygon> for Shape {
    fn from(polygon: Polygon) -> Self {
        Self::new(vec![polygon])
    }
}

impl FromIterator<Polygon> for Shape {
    fn from_iter<I: IntoIterator<Item = Polygon>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Shape {
    type Item = &'a Polygon;
    type IntoIter = std::slice::Iter<'a, Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.iter()
    }
}

impl IntoIterator for Shape {
    type Item = Polygon;
    type IntoIter = std::vec::IntoIter<Polygon>;

    fn into_iter(self) -> Self::IntoIter {
        self.polygons.into_iter()
    }
}
