//! Geometry properties of city objects.

use geom_types::{DiscretizedGeometry, LineString3d, Point3, Polygon3d};

/// The geometry attached to a feature, by representation kind.
///
/// When a feature could carry several representations, the population
/// priority is solid, then multi-surface, then line string, then point; the
/// first populated kind wins.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryProperty {
    /// A closed shell.
    Solid(Vec<Polygon3d>),
    /// An open polygon set.
    MultiSurface(Vec<Polygon3d>),
    /// A curve.
    Curve(LineString3d),
    /// A point.
    Point(Point3<f64>),
}

impl GeometryProperty {
    /// Choose the property for a discretised geometry, following the
    /// solid > multi-surface > line-string > point priority.
    #[must_use]
    pub fn from_discretized(geometry: DiscretizedGeometry) -> Self {
        match geometry {
            DiscretizedGeometry::Solid(polygons) => Self::Solid(polygons),
            DiscretizedGeometry::MultiSurface(polygons) => Self::MultiSurface(polygons),
            DiscretizedGeometry::LineString(line) => Self::Curve(line),
            DiscretizedGeometry::Point(point) => Self::Point(point),
        }
    }

    /// Rank of this property in the population priority (lower wins).
    #[must_use]
    pub fn priority_rank(&self) -> u8 {
        match self {
            Self::Solid(_) => 0,
            Self::MultiSurface(_) => 1,
            Self::Curve(_) => 2,
            Self::Point(_) => 3,
        }
    }

    /// Translate every coordinate.
    #[must_use]
    pub fn translated(&self, offset: geom_types::Vector3<f64>) -> Self {
        match self {
            Self::Solid(polygons) => {
                Self::Solid(polygons.iter().map(|p| p.translated(offset)).collect())
            }
            Self::MultiSurface(polygons) => {
                Self::MultiSurface(polygons.iter().map(|p| p.translated(offset)).collect())
            }
            Self::Curve(line) => Self::Curve(line.translated(offset)),
            Self::Point(point) => Self::Point(point + offset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geom_types::Vector3;

    #[test]
    fn test_priority_ranks() {
        let solid = GeometryProperty::Solid(Vec::new());
        let surface = GeometryProperty::MultiSurface(Vec::new());
        let point = GeometryProperty::Point(Point3::origin());
        assert!(solid.priority_rank() < surface.priority_rank());
        assert!(surface.priority_rank() < point.priority_rank());
    }

    #[test]
    fn test_from_discretized() {
        let d = DiscretizedGeometry::Point(Point3::new(1.0, 2.0, 3.0));
        let property = GeometryProperty::from_discretized(d);
        assert!(matches!(property, GeometryProperty::Point(_)));
    }

    #[test]
    fn test_translation() {
        let property = GeometryProperty::Point(Point3::origin());
        let moved = property.translated(Vector3::new(1.0, 2.0, 3.0));
        let GeometryProperty::Point(p) = moved else {
            panic!("expected point");
        };
        assert_eq!(p, Point3::new(1.0, 2.0, 3.0));
    }
}
