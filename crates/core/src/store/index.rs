//! R-tree over marker positions.
//!
//! Lookups filter in two stages: a Euclidean pass in degree space that is wide
//! enough to cover the radius at the query latitude, then an exact haversine
//! check.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use crate::{radar::RadarZone, units::Coordinates};

const METERS_PER_DEGREE_LATITUDE: f64 = 110_574.0;
const METERS_PER_DEGREE_LONGITUDE_AT_EQUATOR: f64 = 111_320.0;

#[derive(Clone, Debug)]
pub struct MarkerNode {
    /// Position of the marker in the store's list.
    pub slot: usize,
    point: [f64; 2],
}

impl MarkerNode {
    pub fn new(slot: usize, position: Coordinates) -> Self {
        Self {
            slot,
            point: [position.longitude, position.latitude],
        }
    }

    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.point[0], self.point[1])
    }
}

impl RTreeObject for MarkerNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for MarkerNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Degree radius that covers `radius_m` in every direction around `latitude`.
fn search_radius_degrees(radius_m: f64, latitude: f64) -> f64 {
    let lat_degrees = radius_m / METERS_PER_DEGREE_LATITUDE;
    let lon_scale = latitude.to_radians().cos().abs().max(1e-6);
    let lon_degrees = radius_m / (METERS_PER_DEGREE_LONGITUDE_AT_EQUATOR * lon_scale);

    lat_degrees.max(lon_degrees) * 1.01
}

#[derive(Default)]
pub struct MarkerIndex {
    tree: RTree<MarkerNode>,
}

impl MarkerIndex {
    pub fn build(positions: impl IntoIterator<Item = Coordinates>) -> Self {
        let nodes = positions
            .into_iter()
            .enumerate()
            .map(|(slot, position)| MarkerNode::new(slot, position))
            .collect();

        Self {
            tree: RTree::bulk_load(nodes),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slots of all markers inside `zone`, in ascending order.
    pub fn within(&self, zone: &RadarZone) -> Vec<usize> {
        let radius_m = zone.radius.as_meters();
        if radius_m <= 0.0 || !radius_m.is_finite() {
            return Vec::new();
        }

        let degrees = search_radius_degrees(radius_m, zone.center.latitude);
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance(
                [zone.center.longitude, zone.center.latitude],
                degrees * degrees,
            )
            .filter(|node| zone.contains(node.coordinates()))
            .map(|node| node.slot)
            .collect();

        slots.sort_unstable();
        slots
    }
}
