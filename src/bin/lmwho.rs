// src/bin/lmwho.rs

//! Driver program _lmwho_ drives the [_lmlib_].
//!
//! Processes user-passed command-line arguments, then decodes each
//! login-accounting file. Without `PATHS`, the live table `/var/run/utmp`
//! is decoded, like `who`. With `--history`, the history log `/var/log/wtmp`
//! is decoded, like `last`.
//!
//! Each file is read and decoded by its own thread. Each thread sends one
//! [`FileDatum`] to the main thread over a [`crossbeam_channel`]. The main
//! thread filters and prints records in the order the files were passed.
//!
//! `lmwho.rs` should be the main thread and the only thread that prints to
//! STDOUT.
//!
//! [_lmlib_]: lmlib

#![allow(non_camel_case_types)]

use std::collections::BTreeMap;
use std::process::ExitCode;
use std::thread;

use ::anyhow::{bail, Context};
use ::clap::{Parser, ValueEnum};
use ::const_format::concatcp;

use ::lmlib::common::{Count, FPath, FPaths};
use ::lmlib::data::collection::{RecordCollection, RecordTypeSet, SessionSet, UserSet};
use ::lmlib::data::datetime::{
    datetime_parse_from_str,
    fixedoffset_parse_from_str,
    DateTimeLOpt,
    FixedOffset,
};
use ::lmlib::data::layout::LAYOUT_DEFAULT;
use ::lmlib::data::loginrecord::SessionId;
use ::lmlib::data::recordtype::RecordType;
use ::lmlib::debug::printers::{e_err, e_wrn};
use ::lmlib::printer::printers::{print_colored_stderr, ColorChoice, PrinterRecord, COLOR_ERROR};
use ::lmlib::readers::bytesource::{ByteSource, FileSource, SourcePaths};
use ::lmlib::readers::decoder::{DecodeError, RecordDecoder};
use ::lmlib::readers::summary::{Summary, SummaryDecoder};
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// command-line parsing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// CLI enum that maps to [`termcolor::ColorChoice`].
///
/// [`termcolor::ColorChoice`]: https://docs.rs/termcolor/1.1.3/termcolor/enum.ColorChoice.html
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    ValueEnum, // from `clap`
)]
enum CLI_Color_Choice {
    always,
    auto,
    never,
}

const CLI_HELP_AFTER: &str = concatcp!(
    r#"DateTime Filters may be RFC 3339 strings, e.g. "2023-11-14T22:00:00Z",
or "+" followed by seconds since the Unix epoch, e.g. "+1700000000".

TYPE may be a name, e.g. "USER_PROCESS", or a number, e.g. "7".

Without PATHS the live table is read, default "#,
    ::lmlib::data::layout::linux_x86::PATH_UTMP,
    r#".
The history log default is "#,
    ::lmlib::data::layout::linux_x86::PATH_WTMP,
    r#".
Paths ending ".gz", ".bz2", ".xz", or ".lz4" are decompressed.
"#
);

#[derive(Parser, Debug)]
#[clap(
    about = env!("CARGO_PKG_DESCRIPTION"),
    author = env!("CARGO_PKG_AUTHORS"),
    name = "lmwho",
    // write expanded information for the `--version` output
    version = concatcp!(
        "Version: ",
        env!("CARGO_PKG_VERSION_MAJOR"), ".",
        env!("CARGO_PKG_VERSION_MINOR"), ".",
        env!("CARGO_PKG_VERSION_PATCH"), "\n",
        "MSRV: ", env!("CARGO_PKG_RUST_VERSION"), "\n",
        "License: ", env!("CARGO_PKG_LICENSE"), "\n",
        "Repository: ", env!("CARGO_PKG_REPOSITORY"), "\n",
    ),
    after_help = CLI_HELP_AFTER,
    verbatim_doc_comment,
)]
struct CLI_Args {
    /// Path(s) of login-accounting files, e.g. "/var/log/wtmp.1.gz".
    /// Overrides --live and --history.
    #[clap(verbatim_doc_comment)]
    paths: Vec<String>,

    /// Read the live table of current logins.
    /// This is the default when no PATHS are passed.
    #[clap(long, verbatim_doc_comment)]
    live: bool,

    /// Read the history log of logins and logouts.
    #[clap(long, verbatim_doc_comment)]
    history: bool,

    /// Path of the live table.
    #[clap(long, value_name = "PATH", default_value = ::lmlib::data::layout::linux_x86::PATH_UTMP)]
    utmp_path: String,

    /// Path of the history log.
    #[clap(long, value_name = "PATH", default_value = ::lmlib::data::layout::linux_x86::PATH_WTMP)]
    wtmp_path: String,

    /// Only print records of this user. May be passed more than once.
    #[clap(short = 'u', long = "user", value_name = "NAME")]
    users: Vec<String>,

    /// Only print records of this type. May be passed more than once.
    #[clap(
        short = 't',
        long = "type",
        value_name = "TYPE",
        value_parser = cli_parse_record_type,
    )]
    types: Vec<RecordType>,

    /// Only print records of this session id. May be passed more than once.
    #[clap(long = "session", value_name = "ID")]
    sessions: Vec<SessionId>,

    /// Only print users logged in, records of type USER_PROCESS.
    #[clap(long)]
    current: bool,

    /// Print EMPTY records. These are dropped by default.
    #[clap(long)]
    keep_empty: bool,

    /// DateTime Filter After: print records with a datetime that is at
    /// or after this datetime.
    #[clap(short = 'a', long, verbatim_doc_comment)]
    dt_after: Option<String>,

    /// DateTime Filter Before: print records with a datetime that is at
    /// or before this datetime.
    #[clap(short = 'b', long, verbatim_doc_comment)]
    dt_before: Option<String>,

    /// Timezone offset of printed datetimes.
    /// Example values, "Z", "+09", "-0800", "+02:00".
    /// To pass a value with leading "-" use "=" notation, e.g. "-z=-0800".
    #[clap(
        short = 'z',
        long,
        verbatim_doc_comment,
        value_parser = cli_process_tz_offset,
        default_value = "+00:00",
    )]
    tz_offset: FixedOffset,

    /// Choose to print to terminal using colors.
    #[clap(
        short = 'c',
        long = "color",
        verbatim_doc_comment,
        value_enum,
        default_value_t=CLI_Color_Choice::auto,
    )]
    color_choice: CLI_Color_Choice,

    /// Print a summary of each file decoded to STDERR.
    #[clap(short, long)]
    summary: bool,
}

fn cli_process_tz_offset(tzo: &str) -> std::result::Result<FixedOffset, String> {
    match fixedoffset_parse_from_str(tzo) {
        Some(fo) => Ok(fo),
        None => Err(format!("Unable to parse a timezone offset from {:?}", tzo)),
    }
}

fn cli_parse_record_type(value: &str) -> std::result::Result<RecordType, String> {
    value.parse::<RecordType>().map_err(|err| err.to_string())
}

/// The filters to apply to every decoded [`RecordCollection`].
#[derive(Debug, Default)]
struct Filters {
    types: Option<RecordTypeSet>,
    users: Option<UserSet>,
    sessions: Option<SessionSet>,
    dt_after: DateTimeLOpt,
    dt_before: DateTimeLOpt,
}

impl Filters {
    fn apply(&self, collection: RecordCollection) -> RecordCollection {
        let mut collection = collection;
        if let Some(types) = self.types.as_ref() {
            collection = collection.filter_by_record_types(types);
        }
        if let Some(users) = self.users.as_ref() {
            collection = collection.filter_by_users(users);
        }
        if let Some(sessions) = self.sessions.as_ref() {
            collection = collection.filter_by_sessions(sessions);
        }
        if self.dt_after.is_some() || self.dt_before.is_some() {
            collection = collection.filter_by_datetime(&self.dt_after, &self.dt_before);
        }

        collection
    }
}

/// Everything the main thread needs after processing the command-line.
struct Config {
    paths: FPaths,
    decoder: RecordDecoder,
    filters: Filters,
    color_choice: ColorChoice,
    summary: bool,
}

fn cli_process_args(args: CLI_Args) -> anyhow::Result<Config> {
    defn!("{:?}", args);
    let paths: FPaths = if !args.paths.is_empty() {
        if args.live || args.history {
            e_wrn!("PATHS were passed; ignoring --live and --history");
        }
        args.paths
    } else {
        let sources = SourcePaths {
            live: args.utmp_path,
            history: args.wtmp_path,
        };
        let mut paths_ = FPaths::new();
        if args.live || !args.history {
            paths_.push(sources.live);
        }
        if args.history {
            paths_.push(sources.history);
        }
        paths_
    };

    let dt_after = match args.dt_after {
        Some(ref value) => match datetime_parse_from_str(value, &args.tz_offset) {
            Some(dt) => Some(dt),
            None => bail!("Unable to parse a datetime from --dt-after {:?}", value),
        },
        None => None,
    };
    let dt_before = match args.dt_before {
        Some(ref value) => match datetime_parse_from_str(value, &args.tz_offset) {
            Some(dt) => Some(dt),
            None => bail!("Unable to parse a datetime from --dt-before {:?}", value),
        },
        None => None,
    };
    if let (Some(a), Some(b)) = (dt_after.as_ref(), dt_before.as_ref()) {
        if a > b {
            bail!("Datetime --dt-after ({}) is after Datetime --dt-before ({})", a, b);
        }
    }

    let mut types: Option<RecordTypeSet> = match args.types.is_empty() {
        true => None,
        false => Some(args.types.into_iter().collect()),
    };
    if args.current {
        let set = types.get_or_insert_with(RecordTypeSet::new);
        if set.is_empty() {
            set.insert(RecordType::UserProcess);
        } else {
            set.retain(|rt| *rt == RecordType::UserProcess);
        }
    }
    let filters = Filters {
        types,
        users: match args.users.is_empty() {
            true => None,
            false => Some(args.users.into_iter().collect()),
        },
        sessions: match args.sessions.is_empty() {
            true => None,
            false => Some(args.sessions.into_iter().collect()),
        },
        dt_after,
        dt_before,
    };

    let color_choice = match args.color_choice {
        CLI_Color_Choice::always => ColorChoice::Always,
        CLI_Color_Choice::auto => ColorChoice::Auto,
        CLI_Color_Choice::never => ColorChoice::Never,
    };
    let decoder = RecordDecoder::new(LAYOUT_DEFAULT, args.tz_offset).retain_empty(args.keep_empty);
    defx!("paths {:?}, filters {:?}", paths, filters);

    Ok(Config {
        paths,
        decoder,
        filters,
        color_choice,
        summary: args.summary,
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file processing threads
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
/// Index of a path in the order passed.
type PathIndex = usize;

/// Result of decoding one file.
type FileResult = Result<(RecordCollection, SummaryDecoder), DecodeError>;

/// Sent from a file processing thread to the main thread.
type FileDatum = (PathIndex, FileResult);

type ChanSendDatum = crossbeam_channel::Sender<FileDatum>;
type ChanRecvDatum = crossbeam_channel::Receiver<FileDatum>;

fn exec_file_thread(chan_send: ChanSendDatum, index: PathIndex, path: FPath, decoder: RecordDecoder) {
    defn!("({}, {:?})", index, path);
    let source = FileSource::new(path);
    let result: FileResult = match source.read_bytes() {
        Ok(bytes) => decoder.decode_with_summary(&bytes),
        Err(err) => Err(DecodeError::from(err)),
    };
    if let Err(_err) = chan_send.send((index, result)) {
        defo!("chan_send.send failed {}", _err);
    }
    defx!("({})", index);
}

/// Decode every path, each within its own thread. Returned in path order.
fn decode_files(paths: &FPaths, decoder: RecordDecoder) -> anyhow::Result<BTreeMap<PathIndex, FileResult>> {
    let (chan_send, chan_recv): (ChanSendDatum, ChanRecvDatum) = crossbeam_channel::unbounded();
    for (index, path) in paths.iter().enumerate() {
        let chan_send_ = chan_send.clone();
        let path_ = path.clone();
        thread::Builder::new()
            .name(format!("lmwho-{}", index))
            .spawn(move || exec_file_thread(chan_send_, index, path_, decoder))
            .with_context(|| format!("failed to spawn thread for {:?}", path))?;
    }
    // only the threads hold senders; `recv` ends when the last thread ends
    drop(chan_send);

    let mut results: BTreeMap<PathIndex, FileResult> = BTreeMap::new();
    for (index, result) in chan_recv.iter() {
        defo!("received result for path index {}", index);
        results.insert(index, result);
    }

    Ok(results)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// main
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Returns `true` if every file was decoded.
fn run(args: CLI_Args) -> anyhow::Result<bool> {
    let config: Config = cli_process_args(args)?;
    let results = decode_files(&config.paths, config.decoder)?;

    let prepend_file: bool = config.paths.len() > 1;
    let mut summaries: Vec<Summary> = Vec::with_capacity(config.paths.len());
    let mut printed: Count = 0;
    let mut all_ok = true;
    for (index, path) in config.paths.iter().enumerate() {
        match results.get(&index) {
            Some(Ok((collection, summarydecoder))) => {
                let filtered = config.filters.apply(collection.clone());
                let mut printer = PrinterRecord::new_stdout(
                    config.color_choice,
                    match prepend_file {
                        true => Some(format!("{}: ", path)),
                        false => None,
                    },
                    None,
                );
                for record in filtered.iter() {
                    printer
                        .print_record(record)
                        .with_context(|| format!("failed to print record of {:?}", path))?;
                    printed += 1;
                }
                printer.flush()?;
                summaries.push(Summary::new(path.clone(), summarydecoder.clone()));
            }
            Some(Err(err)) => {
                all_ok = false;
                let mesg = format!("{}: {}\n", path, err);
                if print_colored_stderr(COLOR_ERROR, config.color_choice, mesg.as_bytes()).is_err() {
                    e_err!("{}", mesg.trim_end());
                }
                summaries.push(Summary::new_failed(path.clone(), err.to_string()));
            }
            None => {
                all_ok = false;
                e_err!("{}: processing thread ended without a result", path);
                summaries.push(Summary::new_failed(path.clone(), String::from("no result")));
            }
        }
    }
    if config.summary {
        let mut text = String::new();
        for summary in summaries.iter() {
            text.push_str(&format!("\nFile: {}\n", summary.path));
            match (summary.summarydecoder.as_ref(), summary.error.as_ref()) {
                (Some(sd), _) => text.push_str(&sd.to_string()),
                (None, Some(err)) => text.push_str(&format!("error         : {}\n", err)),
                (None, None) => {}
            }
        }
        text.push_str(&format!("\nrecords printed: {}\n", printed));
        eprint!("{}", text);
    }

    Ok(all_ok)
}

pub fn main() -> ExitCode {
    let args = CLI_Args::parse();
    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            e_err!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
