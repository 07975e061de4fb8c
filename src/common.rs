// src/common.rs

//! Common imports, type aliases, and other globals for _lmlib_.

use std::fmt;
use std::io::Error;

#[doc(hidden)]
pub use std::fs::File;
#[doc(hidden)]
pub use std::path::Path;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// file-handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `F`ake `Path` or `F`ile `Path`.
pub type FPath = String;
pub type FPaths = Vec<FPath>;
pub type FileOpenOptions = std::fs::OpenOptions;
/// File size in bytes
pub type FileSz = u64;

/// Offset into a file (or into an in-memory copy of a file) in bytes
pub type FileOffset = u64;

/// Sequence of Bytes
pub type Bytes = Vec<u8>;

/// A general-purpose counting type, e.g. records seen, records dropped.
pub type Count = u64;

/// How the bytes of a login-accounting file are stored on disk.
///
/// Rotated `wtmp` files are often compressed by `logrotate`, e.g.
/// `/var/log/wtmp.1.gz`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum FileTypeArchive {
    /// a plain, uncompressed file
    #[default]
    Normal,
    /// a bzip2 compressed file, `.bz2`
    Bz2,
    /// a gzip compressed file, `.gz`
    Gz,
    /// a LZ4 compressed file, `.lz4`
    Lz4,
    /// a XZ compressed file, `.xz`
    Xz,
}

impl FileTypeArchive {
    /// Guess the `FileTypeArchive` from the file name extension of `path`.
    pub fn from_path(path: &Path) -> FileTypeArchive {
        let ext = match path.extension() {
            Some(val) => val.to_string_lossy().to_ascii_lowercase(),
            None => return FileTypeArchive::Normal,
        };
        match ext.as_str() {
            "bz2" => FileTypeArchive::Bz2,
            "gz" | "gzip" => FileTypeArchive::Gz,
            "lz4" => FileTypeArchive::Lz4,
            "xz" => FileTypeArchive::Xz,
            _ => FileTypeArchive::Normal,
        }
    }
}

impl fmt::Display for FileTypeArchive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FileTypeArchive::Normal => "normal",
            FileTypeArchive::Bz2 => "bzip2",
            FileTypeArchive::Gz => "gzip",
            FileTypeArchive::Lz4 => "lz4",
            FileTypeArchive::Xz => "xz",
        };
        write!(f, "{}", s)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// errors
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Create a new `Error` with the same `ErrorKind` as `error` and a message
/// that includes the `path` and an optional `mesg`.
///
/// `std::io::Error` does not carry the path of the file that caused it.
pub fn err_from_err_path(error: &Error, path: &FPath, mesg: Option<&str>) -> Error {
    match mesg {
        Some(mesg_) => Error::new(error.kind(), format!("{} for file {:?}; {}", error, path, mesg_)),
        None => Error::new(error.kind(), format!("{} for file {:?}", error, path)),
    }
}

/// `debug_panic!` panics in debug builds and prints an error in
/// release builds.
#[macro_export]
macro_rules! debug_panic {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions, test))]
            panic!($($args)*);
            #[cfg(not(any(debug_assertions, test)))]
            $crate::e_err!($($args)*);
        }
    }
}
pub use debug_panic;
