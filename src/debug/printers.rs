// src/debug/printers.rs

//! Printer macros and helpers for debug builds, test builds, and user-facing
//! error messages.

#[doc(hidden)]
#[allow(unused_imports)]
use ::utf8_iter::Utf8CharsEx; // provides `.chars()` on `&[u8]`

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// stderr macros
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `d`ebug `e`println! an `err`or. Does nothing in release builds.
#[macro_export]
macro_rules! de_err {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprintln!("ERROR: {}", format_args!($($args)*));
        }
    }
}
pub use de_err;

/// `d`ebug `e`println! a `w`a`rn`ing. Does nothing in release builds.
#[macro_export]
macro_rules! de_wrn {
    (
        $($args:tt)*
    ) => {
        {
            #[cfg(any(debug_assertions,test))]
            eprintln!("WARNING: {}", format_args!($($args)*));
        }
    }
}
pub use de_wrn;

/// `e`println! an `err`or for the user.
#[macro_export]
macro_rules! e_err {
    (
        $($args:tt)*
    ) => {
        {
            eprintln!("ERROR: {}", format_args!($($args)*));
        }
    }
}
pub use e_err;

/// `e`println! a `w`a`rn`ing for the user.
#[macro_export]
macro_rules! e_wrn {
    (
        $($args:tt)*
    ) => {
        {
            eprintln!("WARNING: {}", format_args!($($args)*));
        }
    }
}
pub use e_wrn;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// "noraw" printing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Replace a C0 control character, or DEL, with the matching Unicode
/// "Control Pictures" character, e.g. `'\0'` becomes `'␀'` and `'\n'`
/// becomes `'␊'`. Every other `char` is returned as-is.
///
/// Keeps the printed width of a control character at one column so a
/// fixed-width buffer dump lines up.
pub const fn char_to_char_noraw(c: char) -> char {
    match c as u32 {
        n @ 0..=31 => match char::from_u32(0x2400 + n) {
            Some(pic) => pic,
            None => c,
        },
        127 => '␡',
        _ => c,
    }
}

/// Transform a buffer of UTF-8 bytes (presumably) to a non-raw `String`.
/// Invalid UTF-8 sequences become `'�'`.
///
/// only intended for debugging
#[doc(hidden)]
#[allow(non_snake_case)]
pub fn buffer_to_String_noraw(buffer: &[u8]) -> String {
    buffer.chars().map(char_to_char_noraw).collect()
}
