// src/printer/mod.rs

//! The `printer` module is for printing user-facing
//! [`LoginRecord`s] with color by record type.
//!
//! [`LoginRecord`s]: crate::data::loginrecord::LoginRecord

pub mod printers;
