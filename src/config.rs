//! Configuration management for brokerage computations

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Which paths a local score follows in a directed graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Paths from elsewhere into the own group
    In,
    /// Paths from the own group to elsewhere
    Out,
    /// Both, averaged when normalized
    All,
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(Direction::In),
            "out" => Ok(Direction::Out),
            "all" => Ok(Direction::All),
            other => Err(ValidationError::UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::All => "all",
        };
        f.write_str(name)
    }
}

/// How scores treat groups that share nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapStrategy {
    /// Clone shared nodes into one copy per group, score the disjoint
    /// problem and sum the copies back
    Decouple,
    /// Count group pairs per node pair on the original graph. Applies to
    /// global scores only; local scores always decouple
    Direct,
}

impl FromStr for OverlapStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decouple" => Ok(OverlapStrategy::Decouple),
            "direct" => Ok(OverlapStrategy::Direct),
            other => Err(ValidationError::UnknownOverlapStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for OverlapStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlapStrategy::Decouple => f.write_str("decouple"),
            OverlapStrategy::Direct => f.write_str("direct"),
        }
    }
}

/// Brokerage variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    /// Shortest paths between any two different groups
    Global,
    /// Cross-group paths that leave (or enter) the node's own group
    Local,
    /// Paths between two groups that both exclude the node
    External,
}

impl FromStr for Measure {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(Measure::Global),
            "local" => Ok(Measure::Local),
            "external" => Ok(Measure::External),
            other => Err(ValidationError::UnknownMeasure(other.to_string())),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Measure::Global => "global",
            Measure::Local => "local",
            Measure::External => "external",
        };
        f.write_str(name)
    }
}

/// Settings shared by all brokerage measures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrokerageConfig {
    /// Edge weight column; `None` means hop-count distances
    pub weight: Option<String>,

    /// Whether to rescale scores to [0, 1]
    pub normalized: bool,

    /// Direction of local scores on directed graphs
    pub direction: Direction,

    /// Treatment of overlapping groups
    pub overlap: OverlapStrategy,

    /// Maximum number of hops for unweighted searches
    pub max_path_length: Option<usize>,
}

impl Default for BrokerageConfig {
    fn default() -> Self {
        Self {
            weight: None,
            normalized: true,
            direction: Direction::Out,
            overlap: OverlapStrategy::Decouple,
            max_path_length: None,
        }
    }
}

impl BrokerageConfig {
    /// Create a new configuration with custom values
    pub fn new(
        weight: Option<String>,
        normalized: bool,
        direction: Direction,
        overlap: OverlapStrategy,
    ) -> Self {
        Self {
            weight,
            normalized,
            direction,
            overlap,
            max_path_length: None,
        }
    }

    pub fn with_weight(mut self, key: impl Into<String>) -> Self {
        self.weight = Some(key.into());
        self
    }

    pub fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_overlap(mut self, overlap: OverlapStrategy) -> Self {
        self.overlap = overlap;
        self
    }

    pub fn with_max_path_length(mut self, hops: usize) -> Self {
        self.max_path_length = Some(hops);
        self
    }
}
