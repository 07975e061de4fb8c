// src/readers/bytesource.rs

//! Sources of the raw bytes handed to a
//! [`RecordDecoder`](crate::readers::decoder::RecordDecoder).
//!
//! A [`FileSource`] reads a whole file into memory. Rotated files compressed
//! with gzip, bzip2, xz, or lz4 are decompressed in memory; the compression
//! is guessed from the file name extension, e.g. `wtmp.1.gz`.

use crate::common::{err_from_err_path, Bytes, FPath, File, FileOpenOptions, FileTypeArchive, Path};
use crate::data::layout::linux_x86::{PATH_UTMP, PATH_WTMP};

use std::io::{BufReader, Error, ErrorKind, Read};

use ::bzip2_rs::DecoderReader as Bz2DecoderReader;
// `flate2` is for gzip files.
use ::flate2::read::GzDecoder;
// `lz4_flex` is for lz4 files.
use ::lz4_flex;
// `lzma_rs` is for xz files.
use ::lzma_rs;
#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

type Lz4FrameReader = lz4_flex::frame::FrameDecoder<BufReader<File>>;

/// Something that can supply the complete bytes of a login-accounting file.
pub trait ByteSource {
    /// Read all bytes. The result may have any length; length validation is
    /// done by the decoder.
    fn read_bytes(&self) -> Result<Bytes, Error>;

    /// A name for messages, e.g. the file path.
    fn name(&self) -> &str;
}

/// The well-known locations of the live table (who is logged in now) and
/// the history log (who was logged in).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SourcePaths {
    /// e.g. `/var/run/utmp`
    pub live: FPath,
    /// e.g. `/var/log/wtmp`
    pub history: FPath,
}

impl Default for SourcePaths {
    fn default() -> SourcePaths {
        SourcePaths {
            live: FPath::from(PATH_UTMP),
            history: FPath::from(PATH_WTMP),
        }
    }
}

impl SourcePaths {
    pub fn live_source(&self) -> FileSource {
        FileSource::new(self.live.clone())
    }

    pub fn history_source(&self) -> FileSource {
        FileSource::new(self.history.clone())
    }
}

/// A file on disk, possibly compressed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSource {
    path: FPath,
    archive: FileTypeArchive,
}

impl FileSource {
    /// The compression is guessed from the extension of `path`.
    pub fn new(path: FPath) -> FileSource {
        let archive = FileTypeArchive::from_path(Path::new(&path));

        FileSource::new_archive(path, archive)
    }

    pub fn new_archive(path: FPath, archive: FileTypeArchive) -> FileSource {
        defñ!("({:?}, {:?})", path, archive);

        FileSource { path, archive }
    }

    pub const fn path(&self) -> &FPath {
        &self.path
    }

    pub const fn archive(&self) -> FileTypeArchive {
        self.archive
    }

    fn open(&self) -> Result<File, Error> {
        match FileOpenOptions::new()
            .read(true)
            .open(Path::new(&self.path))
        {
            Ok(file) => Ok(file),
            Err(err) => Err(err_from_err_path(&err, &self.path, Some("open failed"))),
        }
    }

    /// Read everything from `reader`, with errors annotated by the path.
    fn read_to_end<R: Read>(&self, mut reader: R, what: &str) -> Result<Bytes, Error> {
        let mut buffer: Bytes = Bytes::new();
        match reader.read_to_end(&mut buffer) {
            Ok(_sz) => {
                defo!("{} read {} bytes from {:?}", what, _sz, self.path);
                Ok(buffer)
            }
            Err(err) => Err(err_from_err_path(&err, &self.path, Some(what))),
        }
    }
}

impl ByteSource for FileSource {
    fn read_bytes(&self) -> Result<Bytes, Error> {
        defn!("({:?}) archive {:?}", self.path, self.archive);
        let file: File = self.open()?;
        let result = match self.archive {
            FileTypeArchive::Normal => self.read_to_end(file, "read"),
            FileTypeArchive::Gz => self.read_to_end(GzDecoder::new(file), "gzip decompress"),
            FileTypeArchive::Bz2 => self.read_to_end(Bz2DecoderReader::new(file), "bzip2 decompress"),
            FileTypeArchive::Lz4 => {
                let reader: Lz4FrameReader = lz4_flex::frame::FrameDecoder::new(BufReader::new(file));
                self.read_to_end(reader, "lz4 decompress")
            }
            FileTypeArchive::Xz => {
                let mut bufreader = BufReader::new(file);
                let mut buffer: Bytes = Bytes::new();
                match lzma_rs::xz_decompress(&mut bufreader, &mut buffer) {
                    Ok(_) => Ok(buffer),
                    Err(lzma_rs::error::Error::IoError(err)) => {
                        Err(err_from_err_path(&err, &self.path, Some("xz decompress")))
                    }
                    Err(err) => {
                        let err_ = Error::new(ErrorKind::InvalidData, format!("{:?}", err));
                        Err(err_from_err_path(&err_, &self.path, Some("xz decompress")))
                    }
                }
            }
        };
        match result {
            Ok(ref _bytes) => defx!("return Ok({} bytes)", _bytes.len()),
            Err(ref _err) => defx!("return Err({})", _err),
        }

        result
    }

    fn name(&self) -> &str {
        self.path.as_str()
    }
}

/// Bytes already in memory.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SliceSource<'a> {
    name: &'a str,
    data: &'a [u8],
}

impl<'a> SliceSource<'a> {
    pub const fn new(name: &'a str, data: &'a [u8]) -> SliceSource<'a> {
        SliceSource { name, data }
    }
}

impl ByteSource for SliceSource<'_> {
    fn read_bytes(&self) -> Result<Bytes, Error> {
        Ok(self.data.to_vec())
    }

    fn name(&self) -> &str {
        self.name
    }
}
