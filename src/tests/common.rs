// src/tests/common.rs

//! Common data and helpers for tests.

#![allow(non_upper_case_globals)]

use crate::common::{Bytes, FPath};
use crate::data::datetime::{
    fixedoffset_utc,
    DateTimeL,
    FixedOffset,
    LocalResult,
    NaiveDate,
    TimeZone,
};
use crate::data::layout::{Field, RecordLayout, LAYOUT_DEFAULT};
use crate::debug::helpers::{create_temp_file_bytes, ntf_fpath, NamedTempFile};

use ::lazy_static::lazy_static;

/// Sample `wtmp` file with five records:
/// `BOOT_TIME`, `EMPTY`, `LOGIN_PROCESS`, `USER_PROCESS` (IPv4),
/// `DEAD_PROCESS` (IPv6).
pub const WTMP_SAMPLE: &[u8] = include_bytes!("../../logs/Linux/x86_64/wtmp");
pub const WTMP_SAMPLE_FPATH: &str = "./logs/Linux/x86_64/wtmp";
/// gzip compressed copy of [`WTMP_SAMPLE`]
pub const WTMP_SAMPLE_GZ_FPATH: &str = "./logs/Linux/x86_64/wtmp.1.gz";
/// bzip2 compressed copy of [`WTMP_SAMPLE`]
pub const WTMP_SAMPLE_BZ2_FPATH: &str = "./logs/Linux/x86_64/wtmp.2.bz2";
/// count of windows in [`WTMP_SAMPLE`]
pub const WTMP_SAMPLE_WINDOWS: usize = 5;

/// `wtmp` file written by util-linux `utmpdump -r` (glibc 2.36, x86_64) from
/// `wtmp.utmpdump.txt`, six records:
/// `BOOT_TIME`, `RUN_LEVEL`, `LOGIN_PROCESS`, `USER_PROCESS` (IPv4),
/// `USER_PROCESS` (IPv6), `DEAD_PROCESS`.
pub const WTMP_UTMPDUMP: &[u8] = include_bytes!("../../logs/Linux/x86_64/wtmp.utmpdump");
pub const WTMP_UTMPDUMP_FPATH: &str = "./logs/Linux/x86_64/wtmp.utmpdump";
/// count of windows in [`WTMP_UTMPDUMP`]
pub const WTMP_UTMPDUMP_WINDOWS: usize = 6;

/// 2023-11-14T22:13:20Z
pub const TV_SEC_BOOT: i32 = 1_700_000_000;
/// 2023-11-14T22:15:00Z
pub const TV_SEC_LOGIN: i32 = 1_700_000_100;
/// 2023-11-14T23:15:00Z
pub const TV_SEC_LOGOUT: i32 = 1_700_003_700;

pub const ADDR_ZERO: [u8; 16] = [0; 16];
/// 192.168.1.5
pub const ADDR_V4: [u8; 16] = [192, 168, 1, 5, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
/// 2001:db8::1
pub const ADDR_V6: [u8; 16] = [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x01];

lazy_static! {
    pub static ref FO_0: FixedOffset = fixedoffset_utc();
    pub static ref FO_P9: FixedOffset = FixedOffset::east_opt(9 * 3600).unwrap();
    pub static ref FO_M8: FixedOffset = FixedOffset::west_opt(8 * 3600).unwrap();

    pub static ref NTF_WTMP_EMPTY: NamedTempFile = create_temp_file_bytes(&[], "");
    pub static ref NTF_WTMP_EMPTY_FPATH: FPath = ntf_fpath(&NTF_WTMP_EMPTY);

    /// one `USER_PROCESS` and one `DEAD_PROCESS` for user `"alice"`
    pub static ref WTMP_ALICE: Bytes = {
        let mut bytes = RawRecord::alice_login().to_bytes();
        bytes.extend(RawRecord::alice_logout().to_bytes());
        bytes
    };
}

/// Field values of one record, written to bytes by [`RawRecord::to_bytes`].
#[derive(Clone, Debug)]
pub struct RawRecord {
    pub ut_type: i16,
    pub pid: i32,
    pub line: Vec<u8>,
    pub id: Vec<u8>,
    pub user: Vec<u8>,
    pub host: Vec<u8>,
    pub termination: i16,
    pub exit: i16,
    pub session: i32,
    pub tv_sec: i32,
    pub tv_usec: i32,
    pub addr: [u8; 16],
}

impl Default for RawRecord {
    fn default() -> RawRecord {
        RawRecord {
            ut_type: 0,
            pid: 0,
            line: Vec::new(),
            id: Vec::new(),
            user: Vec::new(),
            host: Vec::new(),
            termination: 0,
            exit: 0,
            session: 0,
            tv_sec: 0,
            tv_usec: 0,
            addr: ADDR_ZERO,
        }
    }
}

impl RawRecord {
    pub fn alice_login() -> RawRecord {
        RawRecord {
            ut_type: 7,
            pid: 1234,
            line: b"pts/0".to_vec(),
            id: b"ts/0".to_vec(),
            user: b"alice".to_vec(),
            host: b"192.168.1.5".to_vec(),
            session: 1234,
            tv_sec: TV_SEC_LOGIN,
            tv_usec: 250_000,
            addr: ADDR_V4,
            ..Default::default()
        }
    }

    pub fn alice_logout() -> RawRecord {
        RawRecord {
            ut_type: 8,
            pid: 1234,
            line: b"pts/0".to_vec(),
            id: b"ts/0".to_vec(),
            termination: 1,
            exit: 2,
            session: 1234,
            tv_sec: TV_SEC_LOGOUT,
            tv_usec: 999_999,
            addr: ADDR_V6,
            ..Default::default()
        }
    }

    /// Write the record in the layout `LAYOUT_DEFAULT`. Text longer than its
    /// field is truncated.
    pub fn to_bytes(&self) -> Bytes {
        self.to_bytes_layout(LAYOUT_DEFAULT)
    }

    pub fn to_bytes_layout(&self, layout: &RecordLayout) -> Bytes {
        let mut window: Bytes = vec![0; layout.size];
        let mut put = |field: Field, data: &[u8]| {
            let fd = layout.field(field);
            let len = data.len().min(fd.size);
            window[fd.offset..fd.offset + len].copy_from_slice(&data[..len]);
        };
        put(Field::Type, &self.ut_type.to_le_bytes());
        put(Field::Pid, &self.pid.to_le_bytes());
        put(Field::Line, &self.line);
        put(Field::Id, &self.id);
        put(Field::User, &self.user);
        put(Field::Host, &self.host);
        put(Field::ExitTermination, &self.termination.to_le_bytes());
        put(Field::ExitExit, &self.exit.to_le_bytes());
        put(Field::Session, &self.session.to_le_bytes());
        put(Field::TvSec, &self.tv_sec.to_le_bytes());
        put(Field::TvUsec, &self.tv_usec.to_le_bytes());
        put(Field::AddrV6, &self.addr);

        window
    }
}

/// Concatenate the bytes of `records`.
pub fn records_to_bytes(records: &[RawRecord]) -> Bytes {
    records.iter().flat_map(|r| r.to_bytes()).collect()
}

/// Create a [`DateTimeL`] from year, month, day, hour, minute, second.
pub fn ymdhms(
    fixedoffset: &FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
) -> DateTimeL {
    ymdhmsm(fixedoffset, year, month, day, hour, min, sec, 0)
}

/// Create a [`DateTimeL`] from year, month, day, hour, minute, second,
/// microsecond. Panics if the values are not a valid datetime.
#[allow(clippy::too_many_arguments)]
pub fn ymdhmsm(
    fixedoffset: &FixedOffset,
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    min: u32,
    sec: u32,
    micro: u32,
) -> DateTimeL {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_micro_opt(hour, min, sec, micro));
    let naive = match naive {
        Some(val) => val,
        None => panic!(
            "invalid datetime {}-{}-{} {}:{}:{}.{}",
            year, month, day, hour, min, sec, micro
        ),
    };
    match fixedoffset.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => panic!("datetime {:?} does not exist for {:?}", naive, fixedoffset),
    }
}
