// src/data/mod.rs

//! The `data` module is the specialized data containers of decoded
//! login-accounting records.
//!
//! ## Definitions of data
//!
//! ### Record
//!
//! A "record" is one fixed-width window of bytes in a login-accounting file,
//! e.g. `/var/run/utmp` or `/var/log/wtmp`. Every record in a file has the
//! same width, described by a [`RecordLayout`].
//!
//! A decoded record is a [`LoginRecord`]. Its kind is a [`RecordType`].
//!
//! ### Collection
//!
//! A [`RecordCollection`] is the ordered sequence of `LoginRecord`s decoded
//! from one buffer. It is filtered to answer questions like "who is logged in
//! now?".
//!
//! [`RecordLayout`]: crate::data::layout::RecordLayout
//! [`LoginRecord`]: crate::data::loginrecord::LoginRecord
//! [`RecordType`]: crate::data::recordtype::RecordType
//! [`RecordCollection`]: crate::data::collection::RecordCollection

pub mod address;
pub mod collection;
pub mod datetime;
pub mod layout;
pub mod loginrecord;
pub mod recordtype;
