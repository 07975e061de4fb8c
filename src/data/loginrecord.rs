// src/data/loginrecord.rs

//! Implement [`LoginRecord`], one decoded login-accounting event.

use crate::common::FileOffset;
use crate::data::datetime::{DateTimeL, tv_pair_type};
use crate::data::recordtype::RecordType;
use crate::debug::printers::buffer_to_String_noraw;

use std::fmt;
use std::net::IpAddr;

/// Datetime format used by [`LoginRecord`] `Display`.
pub const DT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f%:z";

/// The `ut_exit` of a record. Only meaningful for
/// [`RecordType::DeadProcess`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct ExitStatus {
    /// process termination status, `e_termination`
    pub termination: i16,
    /// process exit status, `e_exit`
    pub exit_code: i16,
}

/// Process ID type, `pid_t`
pub type Pid = i32;

/// Session ID type, `ut_session`
pub type SessionId = i32;

/// One decoded login-accounting record.
///
/// All values are owned copies; a `LoginRecord` holds no reference to the
/// buffer it was decoded from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoginRecord {
    pub record_type: RecordType,
    /// may be zero for records that are not about a process
    pub pid: Pid,
    /// terminal device name, e.g. `"pts/0"`
    pub line: String,
    /// inittab id, often the `line` suffix
    pub id: String,
    /// user name, may be empty
    pub user: String,
    /// remote host name, or kernel version for `BOOT_TIME`
    pub host: String,
    pub exit: ExitStatus,
    pub session: SessionId,
    /// `ut_tv` as a datetime, microsecond precision
    pub dt: DateTimeL,
    /// `ut_tv` as stored
    pub tv_pair: tv_pair_type,
    pub addr: IpAddr,
    /// byte offset of this record within the decoded buffer
    pub fileoffset: FileOffset,
}

impl LoginRecord {
    /// The timestamp of the record.
    pub const fn dt(&self) -> &DateTimeL {
        &self.dt
    }

    /// Is the address field all zero? e.g. a local login.
    pub fn addr_is_unspecified(&self) -> bool {
        self.addr.is_unspecified()
    }

    /// Debug helper; every control character is made visible.
    #[allow(non_snake_case)]
    pub fn to_String_noraw(&self) -> String {
        buffer_to_String_noraw(self.to_string().as_bytes())
    }
}

impl fmt::Display for LoginRecord {
    /// Fields separated by a space, empty text fields printed as `-`, e.g.
    /// ```text
    /// 2023-11-14T22:15:00.250000+00:00 USER_PROCESS pid=1234 line=pts/0 id=ts/0 user=alice host=192.168.1.5 session=1234 addr=192.168.1.5
    /// ```
    /// `exit=` is only printed for a process-exit record.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn or_dash(s: &str) -> &str {
            if s.is_empty() { "-" } else { s }
        }
        write!(
            f,
            "{} {} pid={} line={} id={} user={} host={} session={}",
            self.dt.format(DT_FORMAT),
            self.record_type,
            self.pid,
            or_dash(&self.line),
            or_dash(&self.id),
            or_dash(&self.user),
            or_dash(&self.host),
            self.session,
        )?;
        if self.record_type.is_process_exit() {
            write!(f, " exit={}:{}", self.exit.termination, self.exit.exit_code)?;
        }
        write!(f, " addr={}", self.addr)
    }
}
