//! Coordinate index over mesh points.
//!
//! Points are bucketed by their exact x and y values. Bucket keys keep their
//! insertion order so nearest-coordinate ties resolve to the key seen first
//! in the file.

use crate::models::{Axis, PointId};
use std::collections::HashMap;

/// Buckets for one axis: coordinate value -> point ids in file order
#[derive(Debug, Default, Clone)]
struct AxisBuckets {
    values: Vec<f64>,
    points: Vec<Vec<PointId>>,
    slots: HashMap<u64, usize>,
}

impl AxisBuckets {
    fn insert(&mut self, value: f64, point: PointId) {
        let key = bucket_key(value);
        let slot = match self.slots.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.values.len();
                self.values.push(value);
                self.points.push(Vec::new());
                self.slots.insert(key, slot);
                slot
            }
        };
        self.points[slot].push(point);
    }

    fn nearest(&self, target: f64) -> Option<f64> {
        let mut best: Option<(f64, f64)> = None;
        for &value in &self.values {
            let distance = (value - target).abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((value, distance)),
            }
        }
        best.map(|(value, _)| value)
    }

    fn points_at(&self, value: f64) -> &[PointId] {
        self.slots
            .get(&bucket_key(value))
            .map(|&slot| self.points[slot].as_slice())
            .unwrap_or(&[])
    }
}

/// Exact-match key for a coordinate; adding 0.0 folds -0.0 into 0.0
fn bucket_key(value: f64) -> u64 {
    (value + 0.0).to_bits()
}

/// Mesh points indexed by x and y coordinate
#[derive(Debug, Default, Clone)]
pub struct MeshIndex {
    x: AxisBuckets,
    y: AxisBuckets,
    positions: HashMap<PointId, (f64, f64)>,
}

impl MeshIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a point under its x and y buckets.
    ///
    /// Returns `false` and leaves the index unchanged if the point is already
    /// indexed, so each point sits in exactly one bucket per axis.
    pub fn insert(&mut self, point: PointId, x: f64, y: f64) -> bool {
        if self.positions.contains_key(&point) {
            return false;
        }
        self.positions.insert(point, (x, y));
        self.x.insert(x, point);
        self.y.insert(y, point);
        true
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of distinct coordinate values along `axis`
    pub fn bucket_count(&self, axis: Axis) -> usize {
        self.buckets(axis).values.len()
    }

    /// Bucket value closest to `target`; the first-inserted key wins a tie
    pub fn nearest(&self, axis: Axis, target: f64) -> Option<f64> {
        self.buckets(axis).nearest(target)
    }

    /// Points whose `axis` coordinate is exactly `value`, in file order
    pub fn points_at(&self, axis: Axis, value: f64) -> &[PointId] {
        self.buckets(axis).points_at(value)
    }

    /// A point's own (x, y)
    pub fn position(&self, point: PointId) -> Option<(f64, f64)> {
        self.positions.get(&point).copied()
    }

    pub fn coordinate(&self, point: PointId, axis: Axis) -> Option<f64> {
        self.position(point).map(|(x, y)| match axis {
            Axis::X => x,
            Axis::Y => y,
        })
    }

    /// Points at `value` along `axis`, each paired with its coordinate on
    /// the perpendicular axis
    pub fn cross_section(&self, axis: Axis, value: f64) -> Vec<(PointId, f64)> {
        let across = axis.perpendicular();
        self.points_at(axis, value)
            .iter()
            .filter_map(|&point| self.coordinate(point, across).map(|c| (point, c)))
            .collect()
    }

    fn buckets(&self, axis: Axis) -> &AxisBuckets {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }
}

/// Nearest mesh coordinate to `position` along `axis`, or `None` for an
/// empty index
pub fn nearest_coordinate(index: &MeshIndex, axis: Axis, position: f64) -> Option<f64> {
    index.nearest(axis, position)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with_x(values: &[f64]) -> MeshIndex {
        let mut index = MeshIndex::new();
        for (i, &x) in values.iter().enumerate() {
            index.insert(PointId(i as u64 + 1), x, 0.0);
        }
        index
    }

    #[test]
    fn test_nearest_picks_closest_bucket() {
        let index = index_with_x(&[0.0, 1.0, 2.5]);
        assert_eq!(nearest_coordinate(&index, Axis::X, 1.9), Some(2.5));
        assert_eq!(nearest_coordinate(&index, Axis::X, 1.2), Some(1.0));
        assert_eq!(nearest_coordinate(&index, Axis::X, -7.0), Some(0.0));
        assert_eq!(nearest_coordinate(&index, Axis::X, 2.5), Some(2.5));
    }

    #[test]
    fn test_nearest_tie_goes_to_first_inserted() {
        let index = index_with_x(&[2.0, 1.0]);
        assert_eq!(index.nearest(Axis::X, 1.5), Some(2.0));

        let index = index_with_x(&[1.0, 2.0]);
        assert_eq!(index.nearest(Axis::X, 1.5), Some(1.0));
    }

    #[test]
    fn test_nearest_on_empty_index() {
        let index = MeshIndex::new();
        assert_eq!(index.nearest(Axis::Y, 0.0), None);
        assert!(index.points_at(Axis::Y, 0.0).is_empty());
    }

    #[test]
    fn test_points_share_buckets() {
        let mut index = MeshIndex::new();
        index.insert(PointId(1), 0.0, 0.0);
        index.insert(PointId(2), 0.0, 1.0);
        index.insert(PointId(3), 1.0, 1.0);

        assert_eq!(index.points_at(Axis::X, 0.0), &[PointId(1), PointId(2)]);
        assert_eq!(index.points_at(Axis::Y, 1.0), &[PointId(2), PointId(3)]);
        assert_eq!(index.bucket_count(Axis::X), 2);
        assert_eq!(index.bucket_count(Axis::Y), 2);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_negative_zero_shares_bucket() {
        let mut index = MeshIndex::new();
        index.insert(PointId(1), -0.0, 0.0);
        index.insert(PointId(2), 0.0, 1.0);
        assert_eq!(index.bucket_count(Axis::X), 1);
        assert_eq!(index.points_at(Axis::X, 0.0).len(), 2);
    }

    #[test]
    fn test_no_tolerance_between_close_values() {
        let mut index = MeshIndex::new();
        index.insert(PointId(1), 0.1 + 0.2, 0.0);
        index.insert(PointId(2), 0.3, 0.0);
        assert_eq!(index.bucket_count(Axis::X), 2);
    }

    #[test]
    fn test_duplicate_point_is_rejected() {
        let mut index = MeshIndex::new();
        assert!(index.insert(PointId(1), 0.0, 0.0));
        assert!(!index.insert(PointId(1), 5.0, 5.0));
        assert_eq!(index.position(PointId(1)), Some((0.0, 0.0)));
        assert!(index.points_at(Axis::X, 5.0).is_empty());
    }

    #[test]
    fn test_cross_section_pairs_perpendicular_coordinate() {
        let mut index = MeshIndex::new();
        index.insert(PointId(1), 0.5, 2.0);
        index.insert(PointId(2), 0.5, -1.0);
        index.insert(PointId(3), 0.7, 0.0);

        assert_eq!(
            index.cross_section(Axis::X, 0.5),
            vec![(PointId(1), 2.0), (PointId(2), -1.0)]
        );
        assert_eq!(index.cross_section(Axis::Y, 0.0), vec![(PointId(3), 0.7)]);
    }
}
