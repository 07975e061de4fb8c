// src/lib.rs

//! _lmlib_ decodes Linux login-accounting records, the `utmp` and `wtmp`
//! files, and answers questions like "who is logged in?" and "who was logged
//! in, and when?".
//!
//! A [`RecordDecoder`] turns the bytes of a file into a
//! [`RecordCollection`] of [`LoginRecord`s]. The collection is filtered by
//! record type, user, session, or datetime.
//!
//! ```rust,ignore
//! use lmlib::readers::bytesource::{ByteSource, SourcePaths};
//! use lmlib::readers::decoder::decode;
//!
//! let bytes = SourcePaths::default().live_source().read_bytes()?;
//! for record in decode(&bytes)?.current_users().iter() {
//!     println!("{}", record);
//! }
//! ```
//!
//! [`RecordDecoder`]: crate::readers::decoder::RecordDecoder
//! [`RecordCollection`]: crate::data::collection::RecordCollection
//! [`LoginRecord`s]: crate::data::loginrecord::LoginRecord

pub mod common;
pub mod data;
pub mod debug;
pub mod printer;
pub mod readers;
#[cfg(test)]
pub mod tests;
