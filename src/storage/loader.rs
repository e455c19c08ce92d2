//! Tab-separated game file loader.
//!
//! Parses the `games.txt` export into [`GameRecord`]s. Malformed lines are
//! never errors: they are skipped, logged at `warn`, and counted in the
//! returned [`LoadReport`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use crate::common::Result;
use crate::storage::record::{GameDate, GameRecord};
use crate::storage::PageStore;

/// Number of tab-separated fields on a data line.
pub const FIELD_COUNT: usize = 9;

/// Outcome of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records appended to the store.
    pub loaded: usize,
    /// Non-blank data lines rejected by parsing or validation.
    pub skipped: usize,
}

/// Why a line was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than [`FIELD_COUNT`] fields.
    MissingFields(usize),
    /// A field failed to parse or is out of range.
    BadField { name: &'static str, value: String },
}

/// Parse one data line.
///
/// Fields: date, team id, points, FG%, FT%, 3P%, assists, rebounds, win
/// flag. Percentages must lie in `[0, 1]`, counts must be non-negative and
/// the win flag must be 0 or 1. Surrounding spaces are trimmed; extra
/// trailing fields are ignored.
pub fn parse_game_line(line: &str) -> std::result::Result<GameRecord, LineError> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if fields.len() < FIELD_COUNT {
        return Err(LineError::MissingFields(fields.len()));
    }

    let game_date: GameDate = fields[0]
        .trim()
        .parse()
        .map_err(|_| bad("GAME_DATE_EST", fields[0]))?;

    Ok(GameRecord {
        game_date,
        team_id_home: int_field("TEAM_ID_home", fields[1])?,
        pts_home: count_field("PTS_home", fields[2])?,
        fg_pct_home: pct_field("FG_PCT_home", fields[3])?,
        ft_pct_home: pct_field("FT_PCT_home", fields[4])?,
        fg3_pct_home: pct_field("FG3_PCT_home", fields[5])?,
        ast_home: count_field("AST_home", fields[6])?,
        reb_home: count_field("REB_home", fields[7])?,
        home_team_wins: match int_field("HOME_TEAM_WINS", fields[8])? {
            0 => false,
            1 => true,
            _ => return Err(bad("HOME_TEAM_WINS", fields[8])),
        },
    })
}

/// Load every valid line of `reader` into `store`, skipping the header line.
pub fn load_from_reader<R: BufRead>(reader: R, store: &mut PageStore) -> Result<LoadReport> {
    let mut report = LoadReport::default();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line_no == 0 || line.trim().is_empty() {
            continue;
        }

        match parse_game_line(&line) {
            Ok(record) => {
                store.add_record(&record);
                report.loaded += 1;
            }
            Err(reason) => {
                warn!(line = line_no + 1, ?reason, "skipping malformed game line");
                report.skipped += 1;
            }
        }
    }

    info!(
        loaded = report.loaded,
        skipped = report.skipped,
        pages = store.page_count(),
        "games loaded"
    );
    Ok(report)
}

/// Load a tab-separated file from disk.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be opened or read.
pub fn load_from_path<P: AsRef<Path>>(path: P, store: &mut PageStore) -> Result<LoadReport> {
    let file = File::open(path)?;
    load_from_reader(BufReader::new(file), store)
}

fn bad(name: &'static str, value: &str) -> LineError {
    LineError::BadField {
        name,
        value: value.to_string(),
    }
}

fn int_field(name: &'static str, raw: &str) -> std::result::Result<i32, LineError> {
    raw.trim().parse::<i32>().map_err(|_| bad(name, raw))
}

fn count_field(name: &'static str, raw: &str) -> std::result::Result<i32, LineError> {
    match int_field(name, raw)? {
        n if n >= 0 => Ok(n),
        _ => Err(bad(name, raw)),
    }
}

fn pct_field(name: &'static str, raw: &str) -> std::result::Result<f32, LineError> {
    let value = raw.trim().parse::<f32>().map_err(|_| bad(name, raw))?;
    if (0.0..=1.0).contains(&value) {
        // "-0" passes the range check; store it as +0.0
        Ok(value + 0.0)
    } else {
        Err(bad(name, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "GAME_DATE_EST\tTEAM_ID_home\tPTS_home\tFG_PCT_home\tFT_PCT_home\tFG3_PCT_home\tAST_home\tREB_home\tHOME_TEAM_WINS";

    #[test]
    fn test_parse_valid_line() {
        let record =
            parse_game_line("22/12/2022\t1610612740\t126\t0.484\t0.926\t0.382\t25\t46\t1");
        assert!(record.is_err(), "non-ISO dates are rejected");

        let record =
            parse_game_line("2022-12-22\t1610612740\t126\t0.484\t0.926\t0.382\t25\t46\t1").unwrap();
        assert_eq!(record.game_date.as_str(), "2022-12-22");
        assert_eq!(record.team_id_home, 1610612740);
        assert_eq!(record.pts_home, 126);
        assert_eq!(record.ft_pct_home, 0.926);
        assert!(record.home_team_wins);
    }

    #[test]
    fn test_parse_negative_zero_percentage() {
        let record = parse_game_line("2022-12-22\t1\t100\t-0\t-0.0\t0.3\t20\t40\t1").unwrap();
        assert_eq!(record.fg_pct_home.to_bits(), 0);
        assert_eq!(record.ft_pct_home.to_bits(), 0);
        assert!(parse_game_line("2022-12-22\t1\t100\t0.5\t-0.1\t0.3\t20\t40\t1").is_err());
    }

    #[test]
    fn test_parse_trims_spaces_and_crlf() {
        let record =
            parse_game_line(" 2022-12-22 \t 1610612740\t126\t0.484\t0.926\t0.382\t25\t46\t0\r")
                .unwrap();
        assert_eq!(record.team_id_home, 1610612740);
        assert!(!record.home_team_wins);
    }

    #[test]
    fn test_parse_rejects_malformed_lines() {
        assert_eq!(
            parse_game_line("2022-12-22\t1610612740\t126"),
            Err(LineError::MissingFields(3))
        );
        // empty field
        assert!(parse_game_line("2022-12-22\t1610612740\t\t0.484\t0.926\t0.382\t25\t46\t1").is_err());
        // percentage out of range
        assert!(parse_game_line("2022-12-22\t1610612740\t126\t1.484\t0.926\t0.382\t25\t46\t1").is_err());
        // negative count
        assert!(parse_game_line("2022-12-22\t1610612740\t126\t0.484\t0.926\t0.382\t-2\t46\t1").is_err());
        // win flag not 0/1
        assert!(parse_game_line("2022-12-22\t1610612740\t126\t0.484\t0.926\t0.382\t25\t46\t2").is_err());
    }

    #[test]
    fn test_load_skips_header_blank_and_bad_lines() {
        let text = format!(
            "{}\n{}\n\n{}\n{}\n",
            HEADER,
            "2022-12-22\t1610612740\t126\t0.484\t0.926\t0.382\t25\t46\t1",
            "2022-12-22\t1610612762\t\t\t\t\t\t\t0",
            "2022-12-21\t1610612755\t114\t0.442\t0.810\t0.359\t24\t44\t0",
        );

        let mut store = PageStore::new();
        let report = load_from_reader(Cursor::new(text), &mut store).unwrap();

        assert_eq!(report, LoadReport { loaded: 2, skipped: 1 });
        assert_eq!(store.total_records(), 2);
    }

    #[test]
    fn test_load_header_only() {
        let mut store = PageStore::new();
        let report = load_from_reader(Cursor::new(HEADER), &mut store).unwrap();
        assert_eq!(report, LoadReport::default());
        assert_eq!(store.page_count(), 0);
    }
}
