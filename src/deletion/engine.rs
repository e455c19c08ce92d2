//! Threshold deletion: a full scan and an index-driven scan.
//!
//! Both passes tombstone every live record whose attribute is strictly
//! greater than a threshold and report the same [`DeletionStats`] shape, so
//! their cost can be compared while their effect must be identical.

use std::collections::HashSet;
use std::time::Instant;

use tracing::debug;

use crate::common::PageId;
use crate::deletion::stats::{DeletionStats, Strategy, StrategyComparison};
use crate::deletion::tombstone::TombstoneMap;
use crate::index::{Column, FreeThrowPct, IndexManager, Percentage, ThresholdKey};
use crate::storage::PageStore;

/// Tombstone every live record with `C > threshold` by scanning every page
/// and slot in physical order.
///
/// Every page is touched regardless of how many records match.
pub fn delete_above_linear<C>(
    store: &PageStore,
    tombstones: &mut TombstoneMap,
    threshold: C::Key,
) -> DeletionStats
where
    C: Column,
    C::Key: ThresholdKey,
{
    let start = Instant::now();
    let mut stats = DeletionStats::new(Strategy::Linear);
    tombstones.ensure_shape(store);

    for (location, record) in store.iter() {
        let value = C::key(&record);
        if value > threshold && tombstones.mark(location) {
            stats.records_deleted += 1;
            stats.value_sum += value.to_f64();
        }
    }
    stats.pages_touched = store.page_count();
    stats.elapsed = start.elapsed();

    debug!(
        column = C::NAME,
        ?threshold,
        deleted = stats.records_deleted,
        pages = stats.pages_touched,
        "linear deletion"
    );
    stats
}

/// Tombstone every live record with `C > threshold` using a range scan of
/// the attribute's index over `(threshold, MAX]`.
///
/// Candidates are deduplicated and re-checked against the stored value
/// before being tombstoned. Pages touched counts the distinct pages among
/// the candidates.
pub fn delete_above_indexed<C>(
    store: &PageStore,
    indexes: &IndexManager,
    tombstones: &mut TombstoneMap,
    threshold: C::Key,
) -> DeletionStats
where
    C: Column,
    C::Key: ThresholdKey,
{
    let start = Instant::now();
    let mut stats = DeletionStats::new(Strategy::Indexed);
    tombstones.ensure_shape(store);

    let Some(lower) = threshold.next_above() else {
        stats.elapsed = start.elapsed();
        return stats;
    };

    let upper = <C::Key as ThresholdKey>::MAX;
    let (candidates, visits) = C::tree(indexes).range_search_instrumented(&lower, &upper);
    stats.visits = visits;

    let mut seen = HashSet::with_capacity(candidates.len());
    let mut pages: HashSet<PageId> = HashSet::new();

    for location in candidates {
        if !seen.insert(location) {
            continue;
        }
        pages.insert(location.page_id);

        if tombstones.is_deleted(location) {
            continue;
        }
        // The tree may be stale relative to the store.
        let Ok(record) = store.record(location) else {
            continue;
        };
        let value = C::key(&record);
        if value > threshold && tombstones.mark(location) {
            stats.records_deleted += 1;
            stats.value_sum += value.to_f64();
        }
    }
    stats.pages_touched = pages.len();
    stats.elapsed = start.elapsed();

    debug!(
        column = C::NAME,
        ?threshold,
        deleted = stats.records_deleted,
        pages = stats.pages_touched,
        nodes = stats.visits.total(),
        "indexed deletion"
    );
    stats
}

/// Run both strategies from the same starting tombstones, each on its own
/// copy. `tombstones` is left unchanged.
pub fn compare_strategies<C>(
    store: &PageStore,
    indexes: &IndexManager,
    tombstones: &TombstoneMap,
    threshold: C::Key,
) -> StrategyComparison
where
    C: Column,
    C::Key: ThresholdKey,
{
    let mut linear_map = tombstones.clone();
    let mut indexed_map = tombstones.clone();

    StrategyComparison {
        linear: delete_above_linear::<C>(store, &mut linear_map, threshold),
        indexed: delete_above_indexed::<C>(store, indexes, &mut indexed_map, threshold),
    }
}

/// [`delete_above_linear`] on free-throw percentage.
pub fn delete_ft_pct_above_linear(
    store: &PageStore,
    tombstones: &mut TombstoneMap,
    threshold: f32,
) -> DeletionStats {
    delete_above_linear::<FreeThrowPct>(store, tombstones, Percentage::new(threshold))
}

/// [`delete_above_indexed`] on free-throw percentage.
pub fn delete_ft_pct_above_indexed(
    store: &PageStore,
    indexes: &IndexManager,
    tombstones: &mut TombstoneMap,
    threshold: f32,
) -> DeletionStats {
    delete_above_indexed::<FreeThrowPct>(store, indexes, tombstones, Percentage::new(threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Location;
    use crate::index::Points;
    use crate::storage::GameRecord;

    /// 25 records with FT% spread evenly over [0.70, 0.98].
    fn ft_store() -> PageStore {
        let mut store = PageStore::new();
        for i in 0..25 {
            store.add_record(&GameRecord {
                ft_pct_home: 0.70 + i as f32 * (0.28 / 24.0),
                pts_home: 90 + i,
                ..GameRecord::default()
            });
        }
        store
    }

    fn indexed(store: &PageStore) -> IndexManager {
        let mut indexes = IndexManager::new();
        indexes.build(store);
        indexes
    }

    fn deleted_set(map: &TombstoneMap, store: &PageStore) -> Vec<Location> {
        store
            .iter()
            .map(|(loc, _)| loc)
            .filter(|loc| map.is_deleted(*loc))
            .collect()
    }

    #[test]
    fn test_strategies_agree_on_ft_scenario() {
        let store = ft_store();
        let indexes = indexed(&store);
        assert_eq!(indexes.statistics().get("ft_pct").unwrap().leaf_nodes, 2);

        let mut linear_map = TombstoneMap::for_store(&store);
        let mut indexed_map = TombstoneMap::for_store(&store);
        let linear = delete_ft_pct_above_linear(&store, &mut linear_map, 0.90);
        let indexed = delete_ft_pct_above_indexed(&store, &indexes, &mut indexed_map, 0.90);

        let expected = store.iter().filter(|(_, r)| r.ft_pct_home > 0.90).count();
        assert!(expected > 0);
        assert_eq!(linear.records_deleted, expected);
        assert_eq!(indexed.records_deleted, expected);
        assert_eq!(linear.value_sum, indexed.value_sum);
        assert_eq!(linear.average(), indexed.average());
        assert_eq!(deleted_set(&linear_map, &store), deleted_set(&indexed_map, &store));
        assert!(indexed.visits.leaf_nodes >= 1);
    }

    #[test]
    fn test_threshold_is_strict() {
        let store = ft_store();
        let mut map = TombstoneMap::for_store(&store);
        let stats = delete_above_linear::<Points>(&store, &mut map, 110);
        // points run 90..=114, so 111..=114 go
        assert_eq!(stats.records_deleted, 4);
        assert_eq!(stats.value_sum, (111 + 112 + 113 + 114) as f64);

        let indexes = indexed(&store);
        let mut map = TombstoneMap::for_store(&store);
        let stats = delete_above_indexed::<Points>(&store, &indexes, &mut map, 110);
        assert_eq!(stats.records_deleted, 4);
    }

    #[test]
    fn test_second_pass_deletes_nothing() {
        let store = ft_store();
        let indexes = indexed(&store);
        let mut map = TombstoneMap::for_store(&store);

        let first = delete_ft_pct_above_indexed(&store, &indexes, &mut map, 0.85);
        let again_indexed = delete_ft_pct_above_indexed(&store, &indexes, &mut map, 0.85);
        let again_linear = delete_ft_pct_above_linear(&store, &mut map, 0.85);

        assert!(first.records_deleted > 0);
        assert_eq!(again_indexed.records_deleted, 0);
        assert_eq!(again_linear.records_deleted, 0);
        assert_eq!(map.deleted_count(), first.records_deleted);
    }

    #[test]
    fn test_no_matches() {
        let store = ft_store();
        let indexes = indexed(&store);
        let mut map = TombstoneMap::for_store(&store);

        let stats = delete_ft_pct_above_indexed(&store, &indexes, &mut map, 0.99);
        assert_eq!(stats.records_deleted, 0);
        assert_eq!(stats.pages_touched, 0);
        assert_eq!(stats.average(), 0.0);

        let stats = delete_above_indexed::<Points>(&store, &indexes, &mut map, i32::MAX);
        assert_eq!(stats.records_deleted, 0);
    }

    #[test]
    fn test_nan_thresholds_agree() {
        let store = ft_store();
        let indexes = indexed(&store);
        let empty = TombstoneMap::for_store(&store);

        // -NaN sorts below every value, +NaN above every value
        let neg_nan: f32 = "-NaN".parse().unwrap();
        let below = compare_strategies::<FreeThrowPct>(&store, &indexes, &empty, Percentage(neg_nan));
        assert!(below.agree());
        assert_eq!(below.linear.records_deleted, 25);

        let above = compare_strategies::<FreeThrowPct>(&store, &indexes, &empty, Percentage(f32::NAN));
        assert!(above.agree());
        assert_eq!(above.indexed.records_deleted, 0);
    }

    #[test]
    fn test_linear_touches_every_page() {
        let mut store = PageStore::new();
        for i in 0..300 {
            store.add_record(&GameRecord {
                pts_home: i,
                ..GameRecord::default()
            });
        }
        let indexes = indexed(&store);
        let cmp = compare_strategies::<Points>(&store, &indexes, &TombstoneMap::new(), 290);

        assert_eq!(cmp.linear.pages_touched, store.page_count());
        assert_eq!(cmp.indexed.pages_touched, 1);
        assert!(cmp.agree());
        assert_eq!(cmp.linear.records_deleted, 9);
    }

    #[test]
    fn test_compare_leaves_input_untouched() {
        let store = ft_store();
        let indexes = indexed(&store);
        let map = TombstoneMap::for_store(&store);

        let cmp = compare_strategies::<FreeThrowPct>(&store, &indexes, &map, Percentage(0.8));
        assert!(cmp.agree());
        assert_eq!(map.deleted_count(), 0);
    }

    #[test]
    fn test_indexed_skips_stale_entries() {
        let store = ft_store();
        let indexes = indexed(&store);

        // Tree built over a larger store than the one queried.
        let mut small = PageStore::new();
        for (_, record) in store.iter().take(10) {
            small.add_record(&record);
        }
        let mut map = TombstoneMap::for_store(&small);
        let stats = delete_ft_pct_above_indexed(&small, &indexes, &mut map, 0.0);
        assert_eq!(stats.records_deleted, 10);
    }
}
