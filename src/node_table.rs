//! Node feature vectors keyed by mesh point.

use crate::models::PointId;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NodeInsertError {
    #[error("expected {expected} values to match the data header, found {found}")]
    WidthMismatch { expected: usize, found: usize },

    #[error("node id {node_id} cannot be mapped to a point id")]
    IdOverflow { node_id: u64 },
}

/// Feature vectors of a fixed width, keyed by [`PointId`]
#[derive(Debug, Clone)]
pub struct NodeTable {
    width: usize,
    rows: HashMap<PointId, Vec<f64>>,
}

impl NodeTable {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: HashMap::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Store the vector of node `node_id` under its point id.
    ///
    /// Returns the vector previously stored for that point, if any.
    pub fn insert(
        &mut self,
        node_id: u64,
        values: Vec<f64>,
    ) -> Result<Option<Vec<f64>>, NodeInsertError> {
        if values.len() != self.width {
            return Err(NodeInsertError::WidthMismatch {
                expected: self.width,
                found: values.len(),
            });
        }

        let point = PointId::from_node_id(node_id).ok_or(NodeInsertError::IdOverflow { node_id })?;
        Ok(self.rows.insert(point, values))
    }

    pub fn get(&self, point: PointId) -> Option<&[f64]> {
        self.rows.get(&point).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_applies_join_offset() {
        let mut table = NodeTable::new(2);
        table.insert(2, vec![1.0, 2.0]).unwrap();

        assert_eq!(table.get(PointId(3)), Some(&[1.0, 2.0][..]));
        assert_eq!(table.get(PointId(2)), None);
    }

    #[test]
    fn test_width_mismatch_is_rejected() {
        let mut table = NodeTable::new(3);
        assert_eq!(
            table.insert(0, vec![1.0, 2.0]),
            Err(NodeInsertError::WidthMismatch {
                expected: 3,
                found: 2
            })
        );
        assert!(table.insert(0, vec![1.0, 2.0, 3.0, 4.0]).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_node_replaces_previous() {
        let mut table = NodeTable::new(1);
        assert_eq!(table.insert(4, vec![1.0]).unwrap(), None);
        assert_eq!(table.insert(4, vec![9.0]).unwrap(), Some(vec![1.0]));
        assert_eq!(table.get(PointId(5)), Some(&[9.0][..]));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_id_overflow() {
        let mut table = NodeTable::new(0);
        assert_eq!(
            table.insert(u64::MAX, vec![]),
            Err(NodeInsertError::IdOverflow { node_id: u64::MAX })
        );
    }
}
