// src/printer/printers.rs

//! Specialized printer struct [`PrinterRecord`] for printing
//! [`LoginRecord`s] with color.
//!
//! [`LoginRecord`s]: crate::data::loginrecord::LoginRecord

use crate::data::datetime::FixedOffset;
use crate::data::loginrecord::{LoginRecord, DT_FORMAT};
use crate::data::recordtype::RecordType;
use crate::debug::printers::de_err;

use std::io::{Result, Write};

#[doc(hidden)]
pub use ::termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// globals and constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Color`] for printing prepended data like the file name.
///
/// [`Color`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.Color.html
pub const COLOR_DEFAULT: Color = Color::White;

/// [`Color`] for printing some user-facing error messages.
///
/// [`Color`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.Color.html
pub const COLOR_ERROR: Color = Color::Red;

/// The [`Color`] a record is printed with, chosen by its [`RecordType`].
/// Chosen for a dark background console.
///
/// [`Color`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.Color.html
pub const fn color_record_type(record_type: &RecordType) -> Color {
    match record_type {
        RecordType::UserProcess => Color::Green,
        RecordType::LoginProcess => Color::Cyan,
        RecordType::DeadProcess => Color::Red,
        RecordType::BootTime => Color::Yellow,
        RecordType::RunLevel
        | RecordType::NewTime
        | RecordType::OldTime => Color::Rgb(230, 230, 127),
        RecordType::InitProcess
        | RecordType::Accounting
        | RecordType::Empty => Color::Rgb(127, 127, 127),
        RecordType::Unknown(_) => Color::Magenta,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PrinterRecord
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Aliased [`Result`] returned by various [`PrinterRecord`] functions.
/// The `usize` is the count of bytes printed.
///
/// [`Result`]: std::io::Result
pub type PrinterRecordResult = Result<usize>;

/// Macro to write to given writer. If there is an error then
/// `return PrinterRecordResult::Err`.
macro_rules! write_or_return {
    ($writer:expr, $slice_:expr, $printed:expr) => {
        match $writer.write_all($slice_) {
            Ok(_) => {
                $printed += $slice_.len();
            }
            Err(err) => {
                // XXX: this will print when this program stdout is truncated, like when piping
                //      to `head`, e.g. `lmwho | head`
                //          Broken pipe (os error 32)
                de_err!("{}.write_all(len {}) error {}", stringify!($writer), $slice_.len(), err);
                let _ = $writer.flush();
                return PrinterRecordResult::Err(err);
            }
        }
    };
}

/// Macro that sets output color, only changed if needed.
///
/// Unnecessary changes to `set_color` may cause errant formatting bytes to
/// print to the terminal.
macro_rules! setcolor_or_return {
    ($writer:expr, $color_spec:expr, $color_spec_last:expr) => {
        if $color_spec != $color_spec_last {
            if let Err(err) = $writer.set_color(&$color_spec) {
                de_err!("{}.set_color({:?}) returned error {}", stringify!($writer), $color_spec, err);
                return PrinterRecordResult::Err(err);
            };
            $color_spec_last = $color_spec.clone();
        }
    };
}

/// A printer specialized for [`LoginRecord`s].
///
/// The datetime of each record is underlined. The remainder of the record is
/// colored by its [`RecordType`].
///
/// [`LoginRecord`s]: crate::data::loginrecord::LoginRecord
pub struct PrinterRecord<W: WriteColor> {
    writer: W,
    /// should printing be in color?
    do_color: bool,
    /// color settings for prepended text
    color_spec_default: ColorSpec,
    /// the file name or path printed before each record
    prepend_file: Option<String>,
    /// timezone offset of printed datetimes; `None` prints as decoded
    tz_offset: Option<FixedOffset>,
    /// last value passed to `self.writer.set_color()`
    ///
    /// used by macro `setcolor_or_return`
    color_spec_last: ColorSpec,
}

impl PrinterRecord<StandardStream> {
    /// Create a new `PrinterRecord` writing to stdout.
    pub fn new_stdout(
        color_choice: ColorChoice,
        prepend_file: Option<String>,
        tz_offset: Option<FixedOffset>,
    ) -> PrinterRecord<StandardStream> {
        let do_color: bool = match color_choice {
            ColorChoice::Never => false,
            ColorChoice::Always | ColorChoice::AlwaysAnsi | ColorChoice::Auto => true,
        };

        PrinterRecord::new(StandardStream::stdout(color_choice), do_color, prepend_file, tz_offset)
    }
}

impl<W: WriteColor> PrinterRecord<W> {
    pub fn new(
        writer: W,
        do_color: bool,
        prepend_file: Option<String>,
        tz_offset: Option<FixedOffset>,
    ) -> PrinterRecord<W> {
        let mut color_spec_default: ColorSpec = ColorSpec::new();
        color_spec_default.set_fg(Some(COLOR_DEFAULT));
        let color_spec_last = color_spec_default.clone();
        let do_color = do_color && writer.supports_color();

        PrinterRecord {
            writer,
            do_color,
            color_spec_default,
            prepend_file,
            tz_offset,
            color_spec_last,
        }
    }

    /// Consume the printer, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// The text of `record` as printed, without the prepended file and
    /// without a newline.
    fn record_text(&self, record: &LoginRecord) -> (String, String) {
        let dt = match self.tz_offset {
            Some(ref tz_offset) => record.dt.with_timezone(tz_offset),
            None => record.dt,
        };
        let dt_text = dt.format(DT_FORMAT).to_string();
        // the `Display` of a `LoginRecord` leads with the datetime
        let full = record.to_string();
        let rest = match full.split_once(' ') {
            Some((_dt, rest)) => rest.to_string(),
            None => full,
        };

        (dt_text, rest)
    }

    /// Prints the [`LoginRecord`] based on `PrinterRecord` settings.
    pub fn print_record(&mut self, record: &LoginRecord) -> PrinterRecordResult {
        if self.do_color {
            self.print_record_color(record)
        } else {
            self.print_record_plain(record)
        }
    }

    fn print_record_plain(&mut self, record: &LoginRecord) -> PrinterRecordResult {
        let (dt_text, rest) = self.record_text(record);
        let mut printed: usize = 0;
        if let Some(prepend) = self.prepend_file.as_ref() {
            write_or_return!(self.writer, prepend.as_bytes(), printed);
        }
        write_or_return!(self.writer, dt_text.as_bytes(), printed);
        write_or_return!(self.writer, b" ", printed);
        write_or_return!(self.writer, rest.as_bytes(), printed);
        write_or_return!(self.writer, b"\n", printed);

        Ok(printed)
    }

    fn print_record_color(&mut self, record: &LoginRecord) -> PrinterRecordResult {
        let (dt_text, rest) = self.record_text(record);
        let color = color_record_type(&record.record_type);
        let mut color_spec_record: ColorSpec = ColorSpec::new();
        color_spec_record.set_fg(Some(color));
        let mut color_spec_datetime: ColorSpec = color_spec_record.clone();
        color_spec_datetime.set_underline(true);
        let mut printed: usize = 0;
        if let Some(prepend) = self.prepend_file.as_ref() {
            setcolor_or_return!(self.writer, self.color_spec_default, self.color_spec_last);
            write_or_return!(self.writer, prepend.as_bytes(), printed);
        }
        setcolor_or_return!(self.writer, color_spec_datetime, self.color_spec_last);
        write_or_return!(self.writer, dt_text.as_bytes(), printed);
        setcolor_or_return!(self.writer, color_spec_record, self.color_spec_last);
        write_or_return!(self.writer, b" ", printed);
        write_or_return!(self.writer, rest.as_bytes(), printed);
        setcolor_or_return!(self.writer, self.color_spec_default, self.color_spec_last);
        write_or_return!(self.writer, b"\n", printed);

        Ok(printed)
    }

    pub fn flush(&mut self) -> Result<()> {
        if self.do_color {
            self.writer.reset()?;
        }
        self.writer.flush()
    }
}

/// Print colored output to terminal on stderr, e.g. user-facing errors.
pub fn print_colored_stderr(color: Color, color_choice: ColorChoice, value: &[u8]) -> Result<()> {
    let mut stderr = StandardStream::stderr(color_choice);
    let mut color_spec = ColorSpec::new();
    color_spec.set_fg(Some(color));
    stderr.set_color(&color_spec)?;
    stderr.write_all(value)?;
    stderr.reset()?;
    stderr.flush()
}
