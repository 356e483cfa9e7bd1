use geo::{Intersects, LineString, Point, Polygon};

/// Closed ring (lon, lat, SRID 4326) bounding the tracked airspace.
/// The first and last vertex are identical.
pub const REGION_RING: [(f64, f64); 6] = [
    (5.918960, 51.869971),
    (11.653823, 52.059508),
    (10.291518, 48.712994),
    (7.819594, 48.480487),
    (5.710219, 49.504086),
    (5.918960, 51.869971),
];

pub const REGION_SRID: i32 = 4326;

/// The geofence fixes must fall into to show up in a track.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    polygon: Polygon<f64>,
}

impl Default for Region {
    fn default() -> Self {
        Self::from_ring(&REGION_RING)
    }
}

impl Region {
    pub fn from_ring(ring: &[(f64, f64)]) -> Self {
        Self {
            polygon: Polygon::new(LineString::from(ring.to_vec()), vec![]),
        }
    }

    /// Inclusive containment: points on an edge or vertex count as inside.
    pub fn covers(&self, lon: f64, lat: f64) -> bool {
        self.polygon.intersects(&Point::new(lon, lat))
    }

    /// `POLYGON((lon lat, ...))` for `ST_GeomFromText`.
    pub fn to_wkt(&self) -> String {
        let coords = self
            .polygon
            .exterior()
            .coords()
            .map(|c| format!("{} {}", c.x, c.y))
            .collect::<Vec<_>>()
            .join(", ");
        format!("POLYGON(({}))", coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_interior_point() {
        // Frankfurt am Main
        assert!(Region::default().covers(8.6821, 50.1109));
    }

    #[test]
    fn rejects_points_outside() {
        let region = Region::default();
        // Berlin, Munich, Paris
        assert!(!region.covers(13.4050, 52.5200));
        assert!(!region.covers(11.5820, 48.1351));
        assert!(!region.covers(2.3522, 48.8566));
    }

    #[test]
    fn boundary_is_inclusive() {
        let region = Region::default();
        for (lon, lat) in REGION_RING {
            assert!(region.covers(lon, lat), "vertex ({lon}, {lat}) should be covered");
        }
    }

    #[test]
    fn wkt_lists_the_closed_ring() {
        let wkt = Region::default().to_wkt();
        assert!(wkt.starts_with("POLYGON((5.91896 51.869971, 11.653823 52.059508"));
        assert!(wkt.ends_with("5.91896 51.869971))"));
    }
}
