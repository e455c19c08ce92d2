//! Game record and its fixed 44-byte layout.

use std::fmt;
use std::str::FromStr;

use crate::common::config::RECORD_SIZE;
use crate::common::Error;

const DATE_LEN: usize = 10;

/// A game date stored as exactly ten ASCII bytes, `YYYY-MM-DD`.
///
/// Because the width is fixed and the fields are zero-padded, byte order
/// equals chronological order, so the derived `Ord` is what the date index
/// sorts by.
///
/// # Example
/// ```
/// use boxscoredb::GameDate;
///
/// let d: GameDate = "2022-12-22".parse().unwrap();
/// assert_eq!(d.as_str(), "2022-12-22");
///
/// let later: GameDate = "2023-01-01".parse().unwrap();
/// assert!(d < later);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GameDate([u8; DATE_LEN]);

impl GameDate {
    /// Number of characters in a date.
    pub const LEN: usize = DATE_LEN;

    /// Build a date from raw bytes without validation.
    ///
    /// Used when decoding records that were validated before being stored.
    pub fn from_raw(bytes: [u8; Self::LEN]) -> Self {
        GameDate(bytes)
    }

    /// Raw bytes of the date.
    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }

    /// The date as a string slice (empty if the bytes are not UTF-8).
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("")
    }
}

impl FromStr for GameDate {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != Self::LEN {
            return Err(Error::InvalidDate(s.to_string()));
        }
        for (i, &b) in bytes.iter().enumerate() {
            let ok = match i {
                4 | 7 => b == b'-',
                _ => b.is_ascii_digit(),
            };
            if !ok {
                return Err(Error::InvalidDate(s.to_string()));
            }
        }

        let month = (bytes[5] - b'0') * 10 + (bytes[6] - b'0');
        let day = (bytes[8] - b'0') * 10 + (bytes[9] - b'0');
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
            return Err(Error::InvalidDate(s.to_string()));
        }

        let mut raw = [0u8; Self::LEN];
        raw.copy_from_slice(bytes);
        Ok(GameDate(raw))
    }
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One home-team game line.
///
/// Records are plain values: they are copied out of pages on every read and
/// never mutated in place.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameRecord {
    pub game_date: GameDate,
    pub team_id_home: i32,
    pub pts_home: i32,
    pub fg_pct_home: f32,
    pub ft_pct_home: f32,
    pub fg3_pct_home: f32,
    pub ast_home: i32,
    pub reb_home: i32,
    pub home_team_wins: bool,
}

impl GameRecord {
    /// Serialized size in bytes.
    pub const SIZE: usize = RECORD_SIZE;

    const OFFSET_DATE: usize = 0;
    const OFFSET_TEAM_ID: usize = 12;
    const OFFSET_PTS: usize = 16;
    const OFFSET_FG_PCT: usize = 20;
    const OFFSET_FT_PCT: usize = 24;
    const OFFSET_FG3_PCT: usize = 28;
    const OFFSET_AST: usize = 32;
    const OFFSET_REB: usize = 36;
    const OFFSET_WINS: usize = 40;

    /// Write this record into the first [`RECORD_SIZE`] bytes of `buf`.
    ///
    /// The NUL terminator after the date and the padding byte are zeroed.
    ///
    /// # Panics
    /// Panics if `buf.len() < RECORD_SIZE`.
    pub fn write_to(&self, buf: &mut [u8]) {
        assert!(buf.len() >= Self::SIZE, "buffer too small for GameRecord");

        buf[..Self::OFFSET_TEAM_ID].fill(0);
        buf[Self::OFFSET_DATE..Self::OFFSET_DATE + GameDate::LEN]
            .copy_from_slice(self.game_date.as_bytes());

        put_i32(buf, Self::OFFSET_TEAM_ID, self.team_id_home);
        put_i32(buf, Self::OFFSET_PTS, self.pts_home);
        put_f32(buf, Self::OFFSET_FG_PCT, self.fg_pct_home);
        put_f32(buf, Self::OFFSET_FT_PCT, self.ft_pct_home);
        put_f32(buf, Self::OFFSET_FG3_PCT, self.fg3_pct_home);
        put_i32(buf, Self::OFFSET_AST, self.ast_home);
        put_i32(buf, Self::OFFSET_REB, self.reb_home);
        put_i32(buf, Self::OFFSET_WINS, i32::from(self.home_team_wins));
    }

    /// Read a record from the first [`RECORD_SIZE`] bytes of `buf`.
    ///
    /// # Panics
    /// Panics if `buf.len() < RECORD_SIZE`.
    pub fn from_bytes(buf: &[u8]) -> Self {
        assert!(buf.len() >= Self::SIZE, "buffer too small for GameRecord");

        let mut date = [0u8; GameDate::LEN];
        date.copy_from_slice(&buf[Self::OFFSET_DATE..Self::OFFSET_DATE + GameDate::LEN]);

        Self {
            game_date: GameDate::from_raw(date),
            team_id_home: get_i32(buf, Self::OFFSET_TEAM_ID),
            pts_home: get_i32(buf, Self::OFFSET_PTS),
            fg_pct_home: get_f32(buf, Self::OFFSET_FG_PCT),
            ft_pct_home: get_f32(buf, Self::OFFSET_FT_PCT),
            fg3_pct_home: get_f32(buf, Self::OFFSET_FG3_PCT),
            ast_home: get_i32(buf, Self::OFFSET_AST),
            reb_home: get_i32(buf, Self::OFFSET_REB),
            home_team_wins: get_i32(buf, Self::OFFSET_WINS) != 0,
        }
    }
}

impl fmt::Display for GameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date: {}, Team ID: {}, Points: {}, FG%: {:.3}, FT%: {:.3}, 3P%: {:.3}, AST: {}, REB: {}, Win: {}",
            self.game_date,
            self.team_id_home,
            self.pts_home,
            self.fg_pct_home,
            self.ft_pct_home,
            self.fg3_pct_home,
            self.ast_home,
            self.reb_home,
            u8::from(self.home_team_wins)
        )
    }
}

#[inline]
fn put_i32(buf: &mut [u8], offset: usize, value: i32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[inline]
fn put_f32(buf: &mut [u8], offset: usize, value: f32) {
    buf[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

#[inline]
fn get_i32(buf: &[u8], offset: usize) -> i32 {
    i32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

#[inline]
fn get_f32(buf: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}
