//! Indexed attribute descriptors.
//!
//! A [`Column`] ties together an attribute's key type, how to read it from a
//! [`GameRecord`] and which tree of the [`IndexManager`] indexes it. The
//! descriptors are zero-sized markers used as type parameters:
//!
//! ```
//! use boxscoredb::index::{FreeThrowPct, IndexManager, Percentage};
//!
//! let indexes = IndexManager::new();
//! let hits = indexes.search_range::<FreeThrowPct>(&Percentage(0.8), &Percentage(1.0));
//! assert!(hits.is_empty());
//! ```

use crate::index::btree::BPlusTree;
use crate::index::key::{IndexKey, Percentage};
use crate::index::manager::IndexManager;
use crate::storage::{GameDate, GameRecord};

/// An indexed attribute of [`GameRecord`].
pub trait Column {
    /// Key type stored in the attribute's tree.
    type Key: IndexKey;

    /// Short human-readable name, used in logs and reports.
    const NAME: &'static str;

    /// Extract the attribute from a record.
    fn key(record: &GameRecord) -> Self::Key;

    fn tree(indexes: &IndexManager) -> &BPlusTree<Self::Key>;

    fn tree_mut(indexes: &mut IndexManager) -> &mut BPlusTree<Self::Key>;
}

/// Home team id.
pub struct TeamId;

/// Home team points.
pub struct Points;

/// Home field-goal percentage.
pub struct FieldGoalPct;

/// Home free-throw percentage.
pub struct FreeThrowPct;

/// Game date.
pub struct Date;

impl Column for TeamId {
    type Key = i32;
    const NAME: &'static str = "team_id";

    fn key(record: &GameRecord) -> i32 {
        record.team_id_home
    }

    fn tree(indexes: &IndexManager) -> &BPlusTree<i32> {
        &indexes.team_id
    }

    fn tree_mut(indexes: &mut IndexManager) -> &mut BPlusTree<i32> {
        &mut indexes.team_id
    }
}

impl Column for Points {
    type Key = i32;
    const NAME: &'static str = "points";

    fn key(record: &GameRecord) -> i32 {
        record.pts_home
    }

    fn tree(indexes: &IndexManager) -> &BPlusTree<i32> {
        &indexes.points
    }

    fn tree_mut(indexes: &mut IndexManager) -> &mut BPlusTree<i32> {
        &mut indexes.points
    }
}

impl Column for FieldGoalPct {
    type Key = Percentage;
    const NAME: &'static str = "fg_pct";

    fn key(record: &GameRecord) -> Percentage {
        Percentage::new(record.fg_pct_home)
    }

    fn tree(indexes: &IndexManager) -> &BPlusTree<Percentage> {
        &indexes.fg_pct
    }

    fn tree_mut(indexes: &mut IndexManager) -> &mut BPlusTree<Percentage> {
        &mut indexes.fg_pct
    }
}

impl Column for FreeThrowPct {
    type Key = Percentage;
    const NAME: &'static str = "ft_pct";

    fn key(record: &GameRecord) -> Percentage {
        Percentage::new(record.ft_pct_home)
    }

    fn tree(indexes: &IndexManager) -> &BPlusTree<Percentage> {
        &indexes.ft_pct
    }

    fn tree_mut(indexes: &mut IndexManager) -> &mut BPlusTree<Percentage> {
        &mut indexes.ft_pct
    }
}

impl Column for Date {
    type Key = GameDate;
    const NAME: &'static str = "date";

    fn key(record: &GameRecord) -> GameDate {
        record.game_date
    }

    fn tree(indexes: &IndexManager) -> &BPlusTree<GameDate> {
        &indexes.date
    }

    fn tree_mut(indexes: &mut IndexManager) -> &mut BPlusTree<GameDate> {
        &mut indexes.date
    }
}
