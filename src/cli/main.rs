//! # boxscore CLI
//!
//! Load tab-separated game files into a database file, then query and
//! delete through the indexes.
//!
//! Set `RUST_LOG=debug` to see what the library is doing.

use std::env;
use std::process;

use boxscoredb::deletion::StrategyComparison;
use boxscoredb::index::{FreeThrowPct, ThresholdKey};
use boxscoredb::{Database, GameDate, GameRecord, Percentage, Strategy};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: boxscore <command> [args]

commands:
  load   <games.txt> <db>                 load a tab-separated file and write it out
  stats  <db>                             storage and index statistics
  team   <db> <team-id>                   games by home team id
  date   <db> <YYYY-MM-DD>                games on a date
  points <db> <min> <max>                 games by home points
  fg     <db> <min> <max>                 games by home field-goal %
  ft     <db> <min> <max>                 games by home free-throw %
  delete <db> <threshold> [linear|indexed|compare]
                                          delete games with free-throw % above threshold";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(message) = run(&args) {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), String> {
    let Some(command) = args.first() else {
        return Err(USAGE.to_string());
    };
    let rest = &args[1..];

    match (command.as_str(), rest) {
        ("load", [input, db_path]) => load(input, db_path),
        ("stats", [db_path]) => stats(&open(db_path)?),
        ("team", [db_path, id]) => {
            let db = open(db_path)?;
            print_records(&db.search_by_team_id(parse(id)?));
            Ok(())
        }
        ("date", [db_path, date]) => {
            let date: GameDate = date.parse().map_err(|e: boxscoredb::Error| e.to_string())?;
            let db = open(db_path)?;
            print_records(&db.search_by_date(&date));
            Ok(())
        }
        ("points", [db_path, min, max]) => {
            let db = open(db_path)?;
            print_records(&db.search_by_points_range(parse(min)?, parse(max)?));
            Ok(())
        }
        ("fg", [db_path, min, max]) => {
            let db = open(db_path)?;
            print_records(&db.search_by_fg_pct(parse(min)?, parse(max)?));
            Ok(())
        }
        ("ft", [db_path, min, max]) => {
            let db = open(db_path)?;
            print_records(&db.search_by_ft_pct(parse(min)?, parse(max)?));
            Ok(())
        }
        ("delete", [db_path, threshold]) => {
            delete(&open(db_path)?, parse_threshold(threshold)?, "compare")
        }
        ("delete", [db_path, threshold, mode]) => {
            delete(&open(db_path)?, parse_threshold(threshold)?, mode)
        }
        ("help" | "-h" | "--help", _) => {
            println!("{}", USAGE);
            Ok(())
        }
        _ => Err(USAGE.to_string()),
    }
}

fn open(db_path: &str) -> Result<Database, String> {
    Database::open(db_path).map_err(|e| format!("opening {}: {}", db_path, e))
}

fn parse<T: std::str::FromStr>(raw: &str) -> Result<T, String> {
    raw.parse().map_err(|_| format!("invalid number: {}", raw))
}

fn parse_threshold(raw: &str) -> Result<f32, String> {
    match parse::<f32>(raw)? {
        t if t.is_nan() => Err(format!("threshold is not a number: {}", raw)),
        t => Ok(t),
    }
}

fn load(input: &str, db_path: &str) -> Result<(), String> {
    let db = Database::new();
    let report = db
        .load_from_text_file(input)
        .map_err(|e| format!("reading {}: {}", input, e))?;
    db.write_to_disk(db_path)
        .map_err(|e| format!("writing {}: {}", db_path, e))?;

    println!(
        "Loaded {} records ({} lines skipped) into {}",
        report.loaded, report.skipped, db_path
    );
    println!("{}", db.storage_statistics());
    Ok(())
}

fn stats(db: &Database) -> Result<(), String> {
    println!("Storage");
    println!("{}", db.storage_statistics());
    println!();
    println!("Indexes");
    println!("{}", db.index_statistics());
    Ok(())
}

fn delete(db: &Database, threshold: f32, mode: &str) -> Result<(), String> {
    match mode {
        "linear" => report_deletion(db, threshold, Strategy::Linear),
        "indexed" => report_deletion(db, threshold, Strategy::Indexed),
        "compare" => {
            let cmp: StrategyComparison =
                db.compare_deletion::<FreeThrowPct>(Percentage::new(threshold));
            println!("Deleting games with FT% > {}", threshold);
            println!("{}", cmp);
            if !cmp.agree() {
                return Err("strategies disagree".to_string());
            }
        }
        other => return Err(format!("unknown strategy: {}", other)),
    }
    Ok(())
}

fn report_deletion(db: &Database, threshold: f32, strategy: Strategy) {
    let before = db.index_statistics();
    let stats = db.delete_ft_pct_above(threshold, strategy);
    db.rebuild_indexes_skipping_deleted();
    let after = db.index_statistics();

    println!("Deleting games with FT% > {}", threshold);
    println!("{}", stats);
    println!();
    println!(
        "FT% index entries: {} -> {}",
        before.get("ft_pct").map_or(0, |s| s.leaf_entries),
        after.get("ft_pct").map_or(0, |s| s.leaf_entries)
    );
    let above = Percentage::new(threshold).next_above().map_or(threshold, |p| p.0);
    println!(
        "Remaining games with FT% > {}: {}",
        threshold,
        db.search_by_ft_pct(above, 1.0).len()
    );
}

fn print_records(records: &[GameRecord]) {
    for record in records {
        println!("{}", record);
    }
    println!("({} games)", records.len());
}
