// src/readers/summary.rs

//! Implements `SummaryDecoder` statistics tracking struct.

#![allow(non_snake_case)]

use crate::common::{Count, FPath, FileSz};
use crate::data::recordtype::RecordType;

use std::collections::BTreeMap;
use std::fmt;

/// Accumulated statistics of one [`RecordDecoder::decode_with_summary`]
/// call. For CLI option `--summary`.
///
/// [`RecordDecoder::decode_with_summary`]: crate::readers::decoder::RecordDecoder::decode_with_summary
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SummaryDecoder {
    /// `RecordLayout.name` used for decoding
    pub RecordDecoder_layout: &'static str,
    /// `RecordLayout.size` used for decoding
    pub RecordDecoder_record_sz: usize,
    /// count of bytes in the decoded buffer
    pub RecordDecoder_bytes: FileSz,
    /// count of fixed-width windows, `bytes / record_sz`
    pub RecordDecoder_windows: Count,
    /// count of `EMPTY` windows dropped
    pub RecordDecoder_empty_dropped: Count,
    /// count of windows with an unknown `ut_type`
    pub RecordDecoder_unknown: Count,
    /// count of records returned
    pub RecordDecoder_records: Count,
    /// count of returned records per type
    pub RecordDecoder_types: BTreeMap<RecordType, Count>,
}

impl SummaryDecoder {
    /// Every window is either returned or dropped as `EMPTY`.
    pub fn is_consistent(&self) -> bool {
        self.RecordDecoder_records + self.RecordDecoder_empty_dropped == self.RecordDecoder_windows
    }
}

impl fmt::Display for SummaryDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "layout        : {} (record size {})", self.RecordDecoder_layout, self.RecordDecoder_record_sz)?;
        writeln!(f, "bytes         : {}", self.RecordDecoder_bytes)?;
        writeln!(f, "records       : {} of {} windows", self.RecordDecoder_records, self.RecordDecoder_windows)?;
        writeln!(f, "empty dropped : {}", self.RecordDecoder_empty_dropped)?;
        writeln!(f, "unknown types : {}", self.RecordDecoder_unknown)?;
        for (rt, count) in self.RecordDecoder_types.iter() {
            writeln!(f, "  {:<16}: {}", rt.to_string(), count)?;
        }

        Ok(())
    }
}

/// Statistics for one source file processed by the `lmwho` program.
#[derive(Clone, Debug, Default)]
pub struct Summary {
    pub path: FPath,
    /// `None` if decoding failed
    pub summarydecoder: Option<SummaryDecoder>,
    /// The first encountered error, if any, as a `String`.
    pub error: Option<String>,
}

impl Summary {
    pub fn new(path: FPath, summarydecoder: SummaryDecoder) -> Summary {
        Summary {
            path,
            summarydecoder: Some(summarydecoder),
            error: None,
        }
    }

    pub fn new_failed(path: FPath, error: String) -> Summary {
        Summary {
            path,
            summarydecoder: None,
            error: Some(error),
        }
    }
}
