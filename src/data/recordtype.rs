// src/data/recordtype.rs

//! Classify the `ut_type` code of a login-accounting record.

use std::fmt;
use std::str::FromStr;

/// Raw `ut_type` code as stored on disk.
pub type TypeCode = i16;

/// The kind of event a login-accounting record describes.
///
/// Classification never fails; codes without a name become
/// [`RecordType::Unknown`] carrying the raw code.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum RecordType {
    /// unused or cleared slot
    Empty,
    /// change in system run-level
    RunLevel,
    /// time of system boot
    BootTime,
    /// time after system clock change
    NewTime,
    /// time before system clock change
    OldTime,
    /// process spawned by init
    InitProcess,
    /// session leader process for user login
    LoginProcess,
    /// normal process, a logged in user
    UserProcess,
    /// terminated process
    DeadProcess,
    /// not implemented by Linux
    Accounting,
    /// any other code
    Unknown(TypeCode),
}

/// Map `ut_type` value, implied in the index offset, to the `RecordType`.
const CODE_TO_RECORDTYPE: [RecordType; 10] = [
    RecordType::Empty, // 0
    RecordType::RunLevel, // 1
    RecordType::BootTime, // 2
    RecordType::NewTime, // 3
    RecordType::OldTime, // 4
    RecordType::InitProcess, // 5
    RecordType::LoginProcess, // 6
    RecordType::UserProcess, // 7
    RecordType::DeadProcess, // 8
    RecordType::Accounting, // 9
];

impl RecordType {
    /// Classify a raw `ut_type` code.
    pub const fn from_code(code: TypeCode) -> RecordType {
        if code >= 0 && (code as usize) < CODE_TO_RECORDTYPE.len() {
            return CODE_TO_RECORDTYPE[code as usize];
        }

        RecordType::Unknown(code)
    }

    /// The raw `ut_type` code.
    pub const fn code(&self) -> TypeCode {
        match self {
            RecordType::Empty => 0,
            RecordType::RunLevel => 1,
            RecordType::BootTime => 2,
            RecordType::NewTime => 3,
            RecordType::OldTime => 4,
            RecordType::InitProcess => 5,
            RecordType::LoginProcess => 6,
            RecordType::UserProcess => 7,
            RecordType::DeadProcess => 8,
            RecordType::Accounting => 9,
            RecordType::Unknown(code) => *code,
        }
    }

    /// Stable name of the type. `Unknown` is `"UNKNOWN"`; its code is only
    /// shown by `Display`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RecordType::Empty => "EMPTY",
            RecordType::RunLevel => "RUN_LEVEL",
            RecordType::BootTime => "BOOT_TIME",
            RecordType::NewTime => "NEW_TIME",
            RecordType::OldTime => "OLD_TIME",
            RecordType::InitProcess => "INIT_PROCESS",
            RecordType::LoginProcess => "LOGIN_PROCESS",
            RecordType::UserProcess => "USER_PROCESS",
            RecordType::DeadProcess => "DEAD_PROCESS",
            RecordType::Accounting => "ACCOUNTING",
            RecordType::Unknown(_) => "UNKNOWN",
        }
    }

    pub const fn is_unknown(&self) -> bool {
        matches!(self, RecordType::Unknown(_))
    }

    /// Is this a process-exit type, the only type with a meaningful
    /// `ut_exit`?
    pub const fn is_process_exit(&self) -> bool {
        matches!(self, RecordType::DeadProcess)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Unknown(code) => write!(f, "UNKNOWN({})", code),
            _ => write!(f, "{}", self.as_str()),
        }
    }
}

/// Error from [`RecordType::from_str`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseRecordTypeError(pub String);

impl fmt::Display for ParseRecordTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown record type {:?}", self.0)
    }
}

impl std::error::Error for ParseRecordTypeError {}

impl FromStr for RecordType {
    type Err = ParseRecordTypeError;

    /// Parse a type name, case-insensitive. The C macro spelling `RUN_LVL`
    /// is accepted, as is a bare number, e.g. `"7"`.
    fn from_str(s: &str) -> Result<RecordType, ParseRecordTypeError> {
        let upper = s.trim().to_ascii_uppercase();
        if upper == "RUN_LVL" {
            return Ok(RecordType::RunLevel);
        }
        if let Ok(code) = upper.parse::<TypeCode>() {
            return Ok(RecordType::from_code(code));
        }
        match CODE_TO_RECORDTYPE.iter().find(|rt| rt.as_str() == upper) {
            Some(rt) => Ok(*rt),
            None => Err(ParseRecordTypeError(s.to_string())),
        }
    }
}
