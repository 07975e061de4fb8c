// src/debug/helpers.rs

//! Temporary file helpers for testing.

use crate::common::FPath;

use std::io::Write; // for `NamedTempFile.write_all`

use ::lazy_static::lazy_static;
use ::si_trace_print::defñ;

#[doc(hidden)]
pub use ::tempfile::NamedTempFile;

/// NamedTempFile instances default to this file name prefix.
/// Makes left-over temporary files easy to find and delete.
pub const STR_TEMPFILE_PREFIX: &str = "tmp-lm-test-";

lazy_static! {
    pub static ref STRING_TEMPFILE_PREFIX: String = String::from(STR_TEMPFILE_PREFIX);
}

/// Small helper function for copying `NamedTempFile` path to a `FPath`.
pub fn ntf_fpath(ntf: &NamedTempFile) -> FPath {
    FPath::from(ntf.path().to_string_lossy())
}

/// Testing helper function to write `data` bytes to a temporary file
/// with file name ending `suffix`, e.g. `".gz"`.
pub fn create_temp_file_bytes(data: &[u8], suffix: &str) -> NamedTempFile {
    let mut ntf = match ::tempfile::Builder::new()
        .prefix::<str>(&STRING_TEMPFILE_PREFIX)
        .suffix(suffix)
        .tempfile()
    {
        Ok(val) => val,
        Err(err) => {
            panic!("tempfile::Builder::tempfile() return Err {}", err);
        }
    };
    if let Err(err) = ntf.write_all(data) {
        panic!("NamedTempFile::write_all() return Err {}", err);
    }
    if let Err(err) = ntf.flush() {
        panic!("NamedTempFile::flush() return Err {}", err);
    }
    defñ!("wrote {} bytes to {:?}", data.len(), ntf.path());

    ntf
}
