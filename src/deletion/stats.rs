//! Deletion run statistics.

use std::fmt;
use std::time::Duration;

use crate::index::NodeVisits;

/// How a deletion pass found its victims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Scan every page and slot.
    Linear,
    /// Range-scan the attribute's index.
    Indexed,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Linear => write!(f, "linear"),
            Strategy::Indexed => write!(f, "indexed"),
        }
    }
}

/// Outcome of one deletion pass. Created fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletionStats {
    pub strategy: Strategy,
    /// Tree nodes touched; zero for a linear pass.
    pub visits: NodeVisits,
    /// Distinct pages read.
    pub pages_touched: usize,
    pub records_deleted: usize,
    /// Sum of the deleted records' attribute values.
    pub value_sum: f64,
    pub elapsed: Duration,
}

impl DeletionStats {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            visits: NodeVisits::default(),
            pages_touched: 0,
            records_deleted: 0,
            value_sum: 0.0,
            elapsed: Duration::ZERO,
        }
    }

    /// Mean attribute value of the deleted records, 0 when none were deleted.
    pub fn average(&self) -> f64 {
        if self.records_deleted == 0 {
            0.0
        } else {
            self.value_sum / self.records_deleted as f64
        }
    }
}

impl fmt::Display for DeletionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "strategy:        {}", self.strategy)?;
        if self.strategy == Strategy::Indexed {
            writeln!(
                f,
                "nodes visited:   {} (internal {}, leaf {})",
                self.visits.total(),
                self.visits.internal_nodes,
                self.visits.leaf_nodes
            )?;
        }
        writeln!(f, "pages touched:   {}", self.pages_touched)?;
        writeln!(f, "records deleted: {}", self.records_deleted)?;
        writeln!(f, "average value:   {:.4}", self.average())?;
        write!(f, "elapsed:         {:?}", self.elapsed)
    }
}

/// Both strategies run against the same starting state.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyComparison {
    pub linear: DeletionStats,
    pub indexed: DeletionStats,
}

impl StrategyComparison {
    /// Whether both passes deleted the same number of records with the same
    /// value sum.
    pub fn agree(&self) -> bool {
        self.linear.records_deleted == self.indexed.records_deleted
            && self.linear.value_sum == self.indexed.value_sum
    }
}

impl fmt::Display for StrategyComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<16}{:>14}{:>14}", "", "linear", "indexed")?;
        writeln!(
            f,
            "{:<16}{:>14}{:>14}",
            "pages touched", self.linear.pages_touched, self.indexed.pages_touched
        )?;
        writeln!(
            f,
            "{:<16}{:>14}{:>14}",
            "nodes visited",
            "-",
            self.indexed.visits.total()
        )?;
        writeln!(
            f,
            "{:<16}{:>14}{:>14}",
            "records deleted", self.linear.records_deleted, self.indexed.records_deleted
        )?;
        writeln!(
            f,
            "{:<16}{:>14.4}{:>14.4}",
            "average value",
            self.linear.average(),
            self.indexed.average()
        )?;
        write!(
            f,
            "{:<16}{:>14}{:>14}",
            "elapsed",
            format!("{:?}", self.linear.elapsed),
            format!("{:?}", self.indexed.elapsed)
        )
    }
}
