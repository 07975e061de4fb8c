// src/readers/mod.rs

//! "Readers" for _lmlib_.
//!
//! ## Overview of readers
//!
//! * A [`ByteSource`] supplies the complete bytes of a login-accounting file.
//! * A [`RecordDecoder`] derives a [`RecordCollection`] of [`LoginRecord`s]
//!   from those bytes.
//!
//! <br/>
//!
//! The _lmwho_ binary program uses one [`FileSource`] and one
//! `RecordDecoder` per file, each within its own thread.
//!
//! Also see [_Definitions of data_].
//!
//! [_Definitions of data_]: crate::data
//! [`ByteSource`]: crate::readers::bytesource::ByteSource
//! [`FileSource`]: crate::readers::bytesource::FileSource
//! [`RecordDecoder`]: crate::readers::decoder::RecordDecoder
//! [`RecordCollection`]: crate::data::collection::RecordCollection
//! [`LoginRecord`s]: crate::data::loginrecord::LoginRecord

pub mod bytesource;
pub mod decoder;
pub mod summary;
