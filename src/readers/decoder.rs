// src/readers/decoder.rs

//! Implements a [`RecordDecoder`], the driver of deriving [`LoginRecord`s]
//! from a buffer of fixed-width login-accounting records.
//!
//! The decoder does no I/O. The caller supplies the whole buffer, e.g. the
//! bytes of `/var/run/utmp` or `/var/log/wtmp` from a [`ByteSource`].
//! Decoding is all-or-nothing: a buffer whose length is not a multiple of the
//! record size returns [`DecodeError::Format`] and no records.
//!
//! [`LoginRecord`s]: crate::data::loginrecord::LoginRecord
//! [`ByteSource`]: crate::readers::bytesource::ByteSource

use crate::common::{Count, FileOffset, FileSz};
use crate::data::address::resolve_address;
use crate::data::collection::RecordCollection;
use crate::data::datetime::{
    convert_tvpair_to_datetime,
    fixedoffset_utc,
    tv_pair_type,
    tv_sec_type,
    tv_usec_type,
    DateTimeL,
    FixedOffset,
};
use crate::data::layout::{Field, RecordLayout, LAYOUT_DEFAULT};
use crate::data::loginrecord::{ExitStatus, LoginRecord};
use crate::data::recordtype::RecordType;
use crate::readers::summary::SummaryDecoder;
use crate::{de_wrn, debug_panic};
#[cfg(any(debug_assertions, test))]
use crate::debug::printers::buffer_to_String_noraw;

use std::fmt;
use std::io::Error;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Errors of decoding a login-accounting buffer.
#[derive(Debug)]
pub enum DecodeError {
    /// the buffer length `len` is not a multiple of the record size
    /// `record_sz`
    Format { len: usize, record_sz: usize },
    /// the bytes could not be read from their source
    SourceRead(Error),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Format { len, record_sz } => write!(
                f,
                "buffer length {} is not a multiple of record size {} ({} bytes remain)",
                len, record_sz, len % record_sz,
            ),
            DecodeError::SourceRead(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DecodeError::Format { .. } => None,
            DecodeError::SourceRead(err) => Some(err),
        }
    }
}

impl From<Error> for DecodeError {
    fn from(err: Error) -> DecodeError {
        DecodeError::SourceRead(err)
    }
}

pub type ResultDecode = Result<RecordCollection, DecodeError>;
pub type ResultDecodeSummary = Result<(RecordCollection, SummaryDecoder), DecodeError>;

/// Decodes a buffer of fixed-width records according to a [`RecordLayout`].
///
/// A `RecordDecoder` holds no state between calls. It may be shared among
/// threads.
#[derive(Clone, Copy, Debug)]
pub struct RecordDecoder {
    layout: &'static RecordLayout,
    /// timezone of the returned `LoginRecord.dt`
    tz_offset: FixedOffset,
    /// keep `EMPTY` records instead of dropping them
    retain_empty: bool,
}

impl Default for RecordDecoder {
    fn default() -> RecordDecoder {
        RecordDecoder::new(LAYOUT_DEFAULT, fixedoffset_utc())
    }
}

impl RecordDecoder {
    pub fn new(layout: &'static RecordLayout, tz_offset: FixedOffset) -> RecordDecoder {
        debug_assert!(layout.is_valid(), "invalid layout {}", layout.name);

        RecordDecoder {
            layout,
            tz_offset,
            retain_empty: false,
        }
    }

    /// Keep records of type `EMPTY` in the output. Default is to drop them.
    pub fn retain_empty(mut self, retain: bool) -> RecordDecoder {
        self.retain_empty = retain;

        self
    }

    pub const fn layout(&self) -> &'static RecordLayout {
        self.layout
    }

    pub const fn record_sz(&self) -> usize {
        self.layout.size
    }

    pub const fn tz_offset(&self) -> &FixedOffset {
        &self.tz_offset
    }

    /// Count of whole records in a buffer of `len` bytes, or
    /// `DecodeError::Format` if `len` is not a multiple of the record size.
    pub fn count_records(&self, len: usize) -> Result<usize, DecodeError> {
        let record_sz = self.record_sz();
        if len % record_sz != 0 {
            return Err(DecodeError::Format { len, record_sz });
        }

        Ok(len / record_sz)
    }

    /// Decode `buffer` into a [`RecordCollection`].
    pub fn decode(&self, buffer: &[u8]) -> ResultDecode {
        let (collection, _summary) = self.decode_with_summary(buffer)?;

        Ok(collection)
    }

    /// Decode `buffer` into a [`RecordCollection`] and statistics about
    /// the decoding.
    pub fn decode_with_summary(&self, buffer: &[u8]) -> ResultDecodeSummary {
        defn!("(buffer len {})", buffer.len());
        let count = match self.count_records(buffer.len()) {
            Ok(val) => val,
            Err(err) => {
                defx!("return Err {}", err);
                return Err(err);
            }
        };
        let record_sz = self.record_sz();
        let mut summary = SummaryDecoder {
            RecordDecoder_layout: self.layout.name,
            RecordDecoder_record_sz: record_sz,
            RecordDecoder_bytes: buffer.len() as FileSz,
            RecordDecoder_windows: count as Count,
            ..Default::default()
        };
        let mut records: Vec<LoginRecord> = Vec::with_capacity(count);
        for (index, window) in buffer.chunks_exact(record_sz).enumerate() {
            let fileoffset: FileOffset = (index * record_sz) as FileOffset;
            let record: LoginRecord = self.decode_record(window, fileoffset);
            if record.record_type.is_unknown() {
                de_wrn!("unknown record type {} at fileoffset {}", record.record_type, fileoffset);
                summary.RecordDecoder_unknown += 1;
            }
            if record.record_type == RecordType::Empty && !self.retain_empty {
                defo!("drop EMPTY record at fileoffset {}", fileoffset);
                summary.RecordDecoder_empty_dropped += 1;
                continue;
            }
            *summary.RecordDecoder_types.entry(record.record_type).or_insert(0) += 1;
            records.push(record);
        }
        summary.RecordDecoder_records = records.len() as Count;
        debug_assert!(self.retain_empty || summary.is_consistent(), "{:?}", summary);
        defx!("return {} records from {} windows", records.len(), count);

        Ok((RecordCollection::new(records), summary))
    }

    /// Decode one record `window` that begins at `fileoffset`.
    ///
    /// `window` must be exactly one record size. Cannot fail; every field
    /// is at a fixed position within the window.
    pub fn decode_record(&self, window: &[u8], fileoffset: FileOffset) -> LoginRecord {
        debug_assert_eq!(window.len(), self.record_sz(), "bad window size at fileoffset {}", fileoffset);
        let layout = self.layout;
        #[cfg(any(debug_assertions, test))]
        {
            for fd in layout.fields.iter() {
                defo!(
                    "{:<22}: {:3}‥{:3} | {}",
                    fd.name, fd.offset, fd.end(), buffer_to_String_noraw(fd.slice(window))
                );
            }
        }
        let record_type = RecordType::from_code(layout.read_i16(window, Field::Type));
        let tv_sec: tv_sec_type = layout.read_i32(window, Field::TvSec) as tv_sec_type;
        let tv_usec: tv_usec_type = layout.read_i32(window, Field::TvUsec) as tv_usec_type;
        let tv_pair = tv_pair_type(tv_sec, tv_usec);
        let dt: DateTimeL = self.tv_pair_to_datetime(tv_pair);

        LoginRecord {
            record_type,
            pid: layout.read_i32(window, Field::Pid),
            line: layout.read_cstr(window, Field::Line),
            id: layout.read_cstr(window, Field::Id),
            user: layout.read_cstr(window, Field::User),
            host: layout.read_cstr(window, Field::Host),
            exit: ExitStatus {
                termination: layout.read_i16(window, Field::ExitTermination),
                exit_code: layout.read_i16(window, Field::ExitExit),
            },
            session: layout.read_i32(window, Field::Session),
            dt,
            tv_pair,
            addr: resolve_address(&layout.read_bytes16(window, Field::AddrV6)),
            fileoffset,
        }
    }

    /// `tv_sec` is read from 4 bytes so it is always within the range of
    /// `DateTimeL`. The epoch fallback is unreachable.
    #[allow(unreachable_code)]
    fn tv_pair_to_datetime(&self, tv_pair: tv_pair_type) -> DateTimeL {
        match convert_tvpair_to_datetime(tv_pair, &self.tz_offset) {
            Ok(dt) => dt,
            Err(err) => {
                debug_panic!("convert_tvpair_to_datetime({:?}) failed {}", tv_pair, err);
                DateTimeL::default().with_timezone(&self.tz_offset)
            }
        }
    }
}

/// Decode `buffer` with the default layout and UTC timestamps, dropping
/// `EMPTY` records.
pub fn decode(buffer: &[u8]) -> ResultDecode {
    RecordDecoder::default().decode(buffer)
}
