//! Core type definitions for the email graph

use serde::{Deserialize, Serialize};
use std::fmt;

pub use mailnet_algorithms::NodeId;

/// Default number of research groups in the institution
pub const DEFAULT_GROUP_COUNT: u16 = 42;

/// Research group a node belongs to, 1-based (`1..=group_count`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GroupLabel(u16);

impl GroupLabel {
    /// Build a label from a 1-based group number
    pub fn new(group: u16) -> Self {
        GroupLabel(group)
    }

    /// Shift a 0-based group index from the input files to a 1-based label.
    /// Returns `None` if the index is outside `0..group_count`.
    pub fn from_index(index: u64, group_count: u16) -> Option<Self> {
        if index < u64::from(group_count) {
            Some(GroupLabel(index as u16 + 1))
        } else {
            None
        }
    }

    pub fn get(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for GroupLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single email: a directed edge between two members
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailEdge {
    pub from: NodeId,
    pub to: NodeId,
    /// 1-based line in the edge list (0 when built in memory)
    pub line: usize,
}

impl EmailEdge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        EmailEdge { from, to, line: 0 }
    }
}
