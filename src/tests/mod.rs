// src/tests/mod.rs

//! Tests for _lmlib_.
//!
//! Tests are placed at `src/tests/`, inside the `lmlib`. This is a reasonable
//! trade-off of separation and access.
//!
//! Tests placed at top-level path `tests/` do not have crate-internal
//! visibility.

pub mod common;
pub mod decoder_tests;
