//! Integration tests for loading, indexing and persistence.
//!
//! These tests drive the public API end to end: text in, file out, file
//! back in, queries against every index.

use std::fmt::Write as _;
use std::sync::Arc;
use std::thread;

use boxscoredb::index::{Column, Date, FieldGoalPct, FreeThrowPct, IndexManager, Points, TeamId};
use boxscoredb::{Database, DatabaseFile, GameRecord, PageStore};
use tempfile::tempdir;

/// A tab-separated file with `n` games and a few malformed lines mixed in.
fn games_text(n: usize) -> String {
    let mut text = String::from(
        "GAME_DATE_EST\tTEAM_ID_home\tPTS_home\tFG_PCT_home\tFT_PCT_home\tFG3_PCT_home\tAST_home\tREB_home\tHOME_TEAM_WINS\n",
    );
    for i in 0..n {
        writeln!(
            text,
            "20{:02}-{:02}-{:02}\t{}\t{}\t{:.3}\t{:.3}\t{:.3}\t{}\t{}\t{}",
            10 + i % 10,
            1 + i % 12,
            1 + i % 28,
            1610612737 + i % 30,
            85 + (i * 13) % 50,
            0.380 + ((i * 7) % 150) as f32 / 1000.0,
            0.600 + ((i * 11) % 400) as f32 / 1000.0,
            0.250 + (i % 200) as f32 / 1000.0,
            15 + i % 20,
            35 + i % 25,
            i % 2
        )
        .unwrap();
        if i % 97 == 0 {
            text.push_str("2020-01-01\tnot-a-team\t100\t0.5\t0.5\t0.5\t1\t1\t1\n");
        }
    }
    text
}

fn loaded_store(n: usize) -> PageStore {
    let db_text = games_text(n);
    let mut store = PageStore::new();
    let report = boxscoredb::storage::loader::load_from_reader(db_text.as_bytes(), &mut store).unwrap();
    assert_eq!(report.loaded, n);
    store
}

/// Every record must be found through each index under its own location.
fn assert_complete<C: Column>(store: &PageStore, indexes: &IndexManager) {
    for (location, record) in store.iter() {
        let hits = indexes.search_exact::<C>(&C::key(&record));
        assert!(hits.contains(&location), "{} missing {}", C::NAME, location);
    }
}

#[test]
fn test_every_record_found_on_every_index() {
    let store = loaded_store(2_500);
    let mut indexes = IndexManager::new();
    indexes.build(&store);

    assert_complete::<TeamId>(&store, &indexes);
    assert_complete::<Points>(&store, &indexes);
    assert_complete::<FieldGoalPct>(&store, &indexes);
    assert_complete::<FreeThrowPct>(&store, &indexes);
    assert_complete::<Date>(&store, &indexes);
}

#[test]
fn test_index_shapes_after_bulk_load() {
    let store = loaded_store(2_500);
    let mut indexes = IndexManager::new();
    indexes.build(&store);

    let stats = indexes.statistics();
    for (name, tree) in &stats.per_index {
        assert_eq!(tree.leaf_entries, 2_500, "{}", name);
        assert!(tree.height >= 2, "{}", name);
        assert!(tree.avg_keys_per_leaf() >= 9.0, "{}", name);
    }
}

#[test]
fn test_range_queries_match_scan() {
    let store = loaded_store(1_500);
    let mut indexes = IndexManager::new();
    indexes.build(&store);

    let mut hits = indexes.search_by_ft_pct(0.75, 0.85);
    let mut expected: Vec<_> = store
        .iter()
        .filter(|(_, r)| (0.75..=0.85).contains(&r.ft_pct_home))
        .map(|(loc, _)| loc)
        .collect();
    hits.sort();
    expected.sort();
    assert_eq!(hits, expected);

    let points = indexes.search_by_points_range(100, 104);
    let expected = store
        .iter()
        .filter(|(_, r)| (100..=104).contains(&r.pts_home))
        .count();
    assert_eq!(points.len(), expected);
}

#[test]
fn test_file_round_trip_preserves_queries() {
    let dir = tempdir().unwrap();
    let text_path = dir.path().join("games.txt");
    let db_path = dir.path().join("games.db");
    std::fs::write(&text_path, games_text(500)).unwrap();

    let db = Database::new();
    let report = db.load_from_text_file(&text_path).unwrap();
    assert_eq!(report.loaded, 500);
    assert_eq!(report.skipped, 6);
    db.build_indexes();
    db.write_to_disk(&db_path).unwrap();

    let reopened = Database::open(&db_path).unwrap();
    assert_eq!(reopened.record_count(), 500);
    assert_eq!(reopened.storage_statistics(), db.storage_statistics());

    for team in [1610612737, 1610612750, 1610612766] {
        let before = db.search_by_team_id(team);
        let after = reopened.search_by_team_id(team);
        assert_eq!(before, after);
        assert!(!after.is_empty());
    }

    let size = std::fs::metadata(&db_path).unwrap().len();
    assert_eq!(size, DatabaseFile::file_size(reopened.storage_statistics().page_count));
}

#[test]
fn test_corrupted_file_is_rejected() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("games.db");

    let db = Database::new();
    for i in 0..10 {
        db.add_record(&GameRecord {
            pts_home: i,
            ..GameRecord::default()
        });
    }
    db.write_to_disk(&db_path).unwrap();

    let mut bytes = std::fs::read(&db_path).unwrap();
    let last = bytes.len() - 1;
    bytes[last - 4000] ^= 0xFF;
    std::fs::write(&db_path, &bytes).unwrap();

    assert!(Database::open(&db_path).is_err());
}

#[test]
fn test_concurrent_readers() {
    let db = Database::new();
    db.load_from_reader(games_text(1_000).as_bytes()).unwrap();
    db.build_indexes();
    let db = Arc::new(db);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                let mut found = 0;
                for team in 0..30 {
                    let records = db.search_by_team_id(1610612737 + team);
                    assert!(records.iter().all(|r| r.team_id_home == 1610612737 + team));
                    found += records.len();
                }
                found += db.search_by_points_range(0, 1_000).len() * t;
                found
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), 1_000 + 1_000 * t);
    }
    assert_eq!(db.query_stats().queries, 4 * 31);
}
