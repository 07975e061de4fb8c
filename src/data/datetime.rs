// src/data/datetime.rs

//! Datetime types and conversions for login-accounting records.
//!
//! A record stores its time as a C `struct timeval` pair, seconds and
//! microseconds since the Unix epoch. That pair is carried as a
//! [`tv_pair_type`] and converted to a [`DateTimeL`].

use crate::de_wrn;

use std::io::{Error, ErrorKind};

#[doc(hidden)]
pub use ::chrono::{
    DateTime,
    FixedOffset,
    LocalResult,
    NaiveDate,
    Offset, // adds `fix` onto `Utc`
    TimeZone,
    Utc,
};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// `DateTime` with a fixed offset from UTC.
pub type DateTimeL = DateTime<FixedOffset>;
pub type DateTimeLOpt = Option<DateTimeL>;

/// **t**ime **v**alue type representing seconds since Unix epoch
#[allow(non_camel_case_types)]
pub type tv_sec_type = i64;

/// **t**ime **v**alue type representing additional sub-second microseconds
#[allow(non_camel_case_types)]
pub type tv_usec_type = i64;

/// intermediate nanoseconds type used during conversion to [`DateTimeL`]
#[allow(non_camel_case_types)]
pub type nsecs_type = u32;

/// Microseconds in one second. A valid `tv_usec` is less than this.
pub const USECS_PER_SEC: tv_usec_type = 1_000_000;

/// **t**ime **v**alue pair type, (seconds, microseconds)
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct tv_pair_type(pub tv_sec_type, pub tv_usec_type);

impl std::fmt::Debug for tv_pair_type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:06}", self.0, self.1)
    }
}

/// The UTC offset, `+00:00`.
pub fn fixedoffset_utc() -> FixedOffset {
    Utc.fix()
}

/// Convert a [`tv_pair_type`] to a [`DateTimeL`] in timezone `tz_offset`.
///
/// The microseconds merely supplement the seconds. A `tv_usec` outside of
/// `0‥1_000_000` is treated as zero.
/// Return `Error` only if `tv_sec` cannot be represented.
pub fn convert_tvpair_to_datetime(
    tv_pair: tv_pair_type,
    tz_offset: &FixedOffset,
) -> Result<DateTimeL, Error> {
    let tv_usec = tv_pair.1;
    let nsec: nsecs_type = if (0..USECS_PER_SEC).contains(&tv_usec) {
        // cannot overflow; 999_999_000 < u32::MAX
        (tv_usec as nsecs_type) * 1000
    } else {
        de_wrn!("tv_usec {} out of range; use 0", tv_usec);
        0
    };
    let tv_sec = tv_pair.0;
    defñ!("{:?}.timestamp_opt({}, {})", tz_offset, tv_sec, nsec);
    match tz_offset.timestamp_opt(tv_sec, nsec) {
        LocalResult::Single(dt) => Ok(dt),
        // nothing can disambiguate this so take the first datetime
        LocalResult::Ambiguous(dt, _) => Ok(dt),
        LocalResult::None => {
            let err_s = format!(
                "failed to convert tv_sec {} to DateTime with offset {}",
                tv_sec, tz_offset,
            );
            de_wrn!("{}", err_s);

            Err(Error::new(ErrorKind::InvalidData, err_s))
        }
    }
}

/// Convert a [`DateTimeL`] to a [`tv_pair_type`].
pub fn convert_datetime_tvpair(dt: &DateTimeL) -> tv_pair_type {
    tv_pair_type(dt.timestamp(), dt.timestamp_subsec_micros() as tv_usec_type)
}

/// Parse a user-passed datetime string.
///
/// Accepts RFC 3339, e.g. `"2023-11-14T22:15:00+00:00"`, or Unix epoch
/// seconds preceded by `'+'`, e.g. `"+1700000100"`.
pub fn datetime_parse_from_str(value: &str, tz_offset: &FixedOffset) -> DateTimeLOpt {
    defn!("({:?}, {:?})", value, tz_offset);
    if let Some(secs) = value.strip_prefix('+') {
        let tv_sec: tv_sec_type = match secs.parse() {
            Ok(val) => val,
            Err(_err) => {
                defx!("parse {:?} failed {}; return None", secs, _err);
                return None;
            }
        };
        let dt = convert_tvpair_to_datetime(tv_pair_type(tv_sec, 0), tz_offset).ok();
        defx!("return {:?}", dt);
        return dt;
    }
    match DateTime::parse_from_rfc3339(value) {
        Ok(dt) => {
            let dt = dt.with_timezone(tz_offset);
            defx!("return {:?}", dt);

            Some(dt)
        }
        Err(_err) => {
            defx!("parse_from_rfc3339 {:?} failed {}; return None", value, _err);

            None
        }
    }
}

/// Parse a user-passed timezone offset, e.g. `"+09:00"`, `"-0530"`, `"+02"`,
/// `"Z"`.
pub fn fixedoffset_parse_from_str(value: &str) -> Option<FixedOffset> {
    if value == "Z" || value == "z" {
        return Some(fixedoffset_utc());
    }
    let (sign, rest): (i32, &str) = match value.as_bytes().first() {
        Some(b'+') => (1, &value[1..]),
        Some(b'-') => (-1, &value[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hh, mm): (i32, i32) = match digits.len() {
        2 => (digits.parse().ok()?, 0),
        4 => (digits[..2].parse().ok()?, digits[2..].parse().ok()?),
        _ => return None,
    };
    if mm >= 60 {
        return None;
    }

    FixedOffset::east_opt(sign * (hh * 3600 + mm * 60))
}

/// Is `dt` after or at `dt_after` (if given) and before or at `dt_before`
/// (if given)?
pub fn dt_pass_filters(
    dt: &DateTimeL,
    dt_after: &DateTimeLOpt,
    dt_before: &DateTimeLOpt,
) -> bool {
    if let Some(after) = dt_after {
        if dt < after {
            return false;
        }
    }
    if let Some(before) = dt_before {
        if dt > before {
            return false;
        }
    }

    true
}
