// src/data/layout.rs

//! Implement [`RecordLayout`], the explicit table of byte offsets and sizes
//! of the fields of one login-accounting record.
//!
//! Fields are extracted by offset from a byte slice. No raw memory is cast to
//! a C struct. The only C struct definition here, [`linux_x86::utmpx`], is a
//! compile-time witness that the table matches the platform's `struct utmpx`.
//!
//! See [`utmp(5)`].
//!
//! [`utmp(5)`]: https://www.man7.org/linux/man-pages/man5/utmp.5.html

use std::fmt;

#[allow(unused_imports)]
use ::more_asserts::{debug_assert_ge, debug_assert_le};

/// How the bytes of a [`FieldDef`] are interpreted.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum FieldKind {
    /// little-endian signed 16-bit integer
    Int16,
    /// little-endian signed 32-bit integer
    Int32,
    /// fixed-size text buffer, ends at the first null byte or at the end of
    /// the buffer, whichever comes first
    CStr,
    /// uninterpreted bytes
    Raw,
    /// alignment or reserved bytes; never read
    Padding,
}

/// Names of the fields of a [`RecordLayout`]. The discriminant is the index
/// into [`RecordLayout::fields`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Field {
    Type = 0,
    TypePadding,
    Pid,
    Line,
    Id,
    User,
    Host,
    ExitTermination,
    ExitExit,
    Session,
    TvSec,
    TvUsec,
    AddrV6,
    Reserved,
}

/// Count of [`Field`] variants.
pub const FIELD_COUNT: usize = 14;

/// One row of a [`RecordLayout`] table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDef {
    pub field: Field,
    /// the C struct member name, for debug printing
    pub name: &'static str,
    /// byte offset from the start of the record
    pub offset: usize,
    /// width in bytes
    pub size: usize,
    pub kind: FieldKind,
}

impl FieldDef {
    /// One byte past the last byte of the field.
    pub const fn end(&self) -> usize {
        self.offset + self.size
    }

    /// The bytes of this field within one record `window`.
    ///
    /// `window` must be at least [`FieldDef::end`] bytes.
    #[inline(always)]
    pub fn slice<'a>(&self, window: &'a [u8]) -> &'a [u8] {
        debug_assert_le!(self.end(), window.len(), "window too small for field {}", self.name);
        &window[self.offset..self.end()]
    }
}

/// A fixed-width on-disk record layout.
///
/// The layout is pinned per platform; it is never inferred from the data.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RecordLayout {
    /// short descriptive name, e.g. `"linux-glibc-utmpx"`
    pub name: &'static str,
    /// revision of this table; bump when any row changes
    pub version: u16,
    /// total record width in bytes, the stride used to slice a buffer
    pub size: usize,
    /// rows, indexed by [`Field`]
    pub fields: [FieldDef; FIELD_COUNT],
}

impl RecordLayout {
    #[inline(always)]
    pub const fn field(&self, field: Field) -> &FieldDef {
        &self.fields[field as usize]
    }

    /// Read a [`FieldKind::Int16`] field.
    pub fn read_i16(&self, window: &[u8], field: Field) -> i16 {
        let fd = self.field(field);
        debug_assert_eq!(fd.kind, FieldKind::Int16, "field {} is not Int16", fd.name);
        let b = fd.slice(window);

        i16::from_le_bytes([b[0], b[1]])
    }

    /// Read a [`FieldKind::Int32`] field.
    pub fn read_i32(&self, window: &[u8], field: Field) -> i32 {
        let fd = self.field(field);
        debug_assert_eq!(fd.kind, FieldKind::Int32, "field {} is not Int32", fd.name);
        let b = fd.slice(window);

        i32::from_le_bytes([b[0], b[1], b[2], b[3]])
    }

    /// Read a [`FieldKind::CStr`] field as text trimmed at the first null
    /// byte. The buffer may lack a null terminator (C attribute
    /// `__attribute_nonstring__`) in which case all bytes are used.
    /// Invalid UTF-8 is replaced with `'�'`.
    pub fn read_cstr(&self, window: &[u8], field: Field) -> String {
        let fd = self.field(field);
        debug_assert_eq!(fd.kind, FieldKind::CStr, "field {} is not CStr", fd.name);

        cstr_trim(fd.slice(window))
    }

    /// Read a 16 byte [`FieldKind::Raw`] field.
    pub fn read_bytes16(&self, window: &[u8], field: Field) -> [u8; 16] {
        let fd = self.field(field);
        debug_assert_eq!(fd.kind, FieldKind::Raw, "field {} is not Raw", fd.name);
        debug_assert_eq!(fd.size, 16, "field {} is not 16 bytes", fd.name);
        let mut out = [0u8; 16];
        out.copy_from_slice(fd.slice(window));

        out
    }

    /// Check the table is self-consistent: rows are in [`Field`] order,
    /// contiguous, non-overlapping, and exactly cover `size` bytes.
    pub const fn is_valid(&self) -> bool {
        let mut at: usize = 0;
        let mut i: usize = 0;
        while i < FIELD_COUNT {
            let fd = &self.fields[i];
            if fd.field as usize != i || fd.offset != at || fd.size == 0 {
                return false;
            }
            at = fd.end();
            i += 1;
        }

        at == self.size
    }
}

impl fmt::Display for RecordLayout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} v{} sizeof {}", self.name, self.version, self.size)?;
        for fd in self.fields.iter() {
            writeln!(f, "  {:<18} @{:3} sizeof {:3} {:?}", fd.name, fd.offset, fd.size, fd.kind)?;
        }

        Ok(())
    }
}

/// Text of a fixed-size C char buffer, trimmed at the first null byte.
pub fn cstr_trim(buffer: &[u8]) -> String {
    let end = buffer.iter().position(|&b| b == 0).unwrap_or(buffer.len());

    String::from_utf8_lossy(&buffer[..end]).into_owned()
}

/// Record layout found in `utmp.h`, `utmpx.h` from GNU glibc for Linux,
/// architectures amd64 (x86_64), i686 (x86_32), ARM64 (aarch64), and RISC-V
/// (riscv64). The `utmp` struct is exactly the same as the `utmpx` struct.
///
/// From the [code comment in `utmpx.h`]:
/// ```C
/// /* The fields ut_session and ut_tv must be the same size when compiled
///    32- and 64-bit.  This allows files and shared memory to be shared
///    between 32- and 64-bit applications.  */
/// ```
///
/// [code comment in `utmpx.h`]: https://elixir.bootlin.com/glibc/latest/source/sysdeps/gnu/bits/utmpx.h
#[allow(non_camel_case_types)]
pub mod linux_x86 {
    use super::{Field, FieldDef, FieldKind, RecordLayout};
    use crate::common::FileOffset;

    use std::mem::size_of;

    use ::const_format::{assertcp, assertcp_eq};
    use ::memoffset::offset_of;

    pub type c_char = std::ffi::c_char;
    pub type c_short = std::ffi::c_short;
    pub type pid_t = std::ffi::c_int;

    pub const PATH_UTMP: &str = "/var/run/utmp";
    pub const PATH_WTMP: &str = "/var/log/wtmp";

    pub const UT_LINESIZE: usize = 32;
    pub const UT_IDSIZE: usize = 4;
    pub const UT_USERSIZE: usize = 32;
    pub const UT_HOSTSIZE: usize = 256;

    /// ```text
    /// timeval               sizeof   8
    /// timeval.tv_sec   @  0 sizeof   4
    /// timeval.tv_usec  @  4 sizeof   4
    /// ```
    #[derive(Clone, Copy)]
    #[repr(C, align(4))]
    pub struct __timeval {
        pub tv_sec: i32,
        pub tv_usec: i32,
    }

    #[derive(Clone, Copy)]
    #[repr(C, align(2))]
    pub struct __exit_status {
        pub e_termination: i16,
        pub e_exit: i16,
    }

    /// Mirror of the [`utmpx` struct] from
    /// `/usr/include/x86_64-linux-gnu/bits/utmpx.h`.
    ///
    /// Never instantiated. Only used for compile-time checks of
    /// [`UTMPX_LAYOUT`].
    ///
    /// ```text
    /// utmpx                   sizeof 384
    /// utmpx.ut_type      @  0 sizeof   2
    /// utmpx.ut_pid       @  4 sizeof   4
    /// utmpx.ut_line      @  8 sizeof  32
    /// utmpx.ut_id        @ 40 sizeof   4
    /// utmpx.ut_user      @ 44 sizeof  32
    /// utmpx.ut_host      @ 76 sizeof 256
    /// utmpx.ut_exit      @332 sizeof   4
    /// utmpx.ut_session   @336 sizeof   4
    /// utmpx.ut_tv        @340 sizeof   8
    /// utmpx.ut_tv.tv_sec @340 sizeof   4
    /// utmpx.ut_tv.tv_usec@344 sizeof   4
    /// utmpx.ut_addr_v6   @348 sizeof  16
    /// ```
    ///
    /// [`utmpx` struct]: https://linux.die.net/man/5/utmpx
    #[allow(dead_code)]
    #[derive(Clone, Copy)]
    #[repr(C, align(4))]
    pub struct utmpx {
        pub ut_type: c_short,
        pub ut_pid: pid_t,
        pub ut_line: [c_char; UT_LINESIZE],
        pub ut_id: [c_char; UT_IDSIZE],
        pub ut_user: [c_char; UT_USERSIZE],
        pub ut_host: [c_char; UT_HOSTSIZE],
        pub ut_exit: __exit_status,
        pub ut_session: i32,
        pub ut_tv: __timeval,
        pub ut_addr_v6: [i32; 4],
        /* private fields */
        pub __glibc_reserved: [i8; 20],
    }

    /// Total record width. Every field offset after the first record depends
    /// on this value.
    pub const UTMPX_SZ: usize = 384;
    pub const UTMPX_SZ_FO: FileOffset = UTMPX_SZ as FileOffset;

    pub const UTMPX_LAYOUT: RecordLayout = RecordLayout {
        name: "linux-glibc-utmpx",
        version: 1,
        size: UTMPX_SZ,
        fields: [
            FieldDef { field: Field::Type, name: "ut_type", offset: 0, size: 2, kind: FieldKind::Int16 },
            FieldDef { field: Field::TypePadding, name: "(padding)", offset: 2, size: 2, kind: FieldKind::Padding },
            FieldDef { field: Field::Pid, name: "ut_pid", offset: 4, size: 4, kind: FieldKind::Int32 },
            FieldDef { field: Field::Line, name: "ut_line", offset: 8, size: UT_LINESIZE, kind: FieldKind::CStr },
            FieldDef { field: Field::Id, name: "ut_id", offset: 40, size: UT_IDSIZE, kind: FieldKind::CStr },
            FieldDef { field: Field::User, name: "ut_user", offset: 44, size: UT_USERSIZE, kind: FieldKind::CStr },
            FieldDef { field: Field::Host, name: "ut_host", offset: 76, size: UT_HOSTSIZE, kind: FieldKind::CStr },
            FieldDef { field: Field::ExitTermination, name: "ut_exit.e_termination", offset: 332, size: 2, kind: FieldKind::Int16 },
            FieldDef { field: Field::ExitExit, name: "ut_exit.e_exit", offset: 334, size: 2, kind: FieldKind::Int16 },
            FieldDef { field: Field::Session, name: "ut_session", offset: 336, size: 4, kind: FieldKind::Int32 },
            FieldDef { field: Field::TvSec, name: "ut_tv.tv_sec", offset: 340, size: 4, kind: FieldKind::Int32 },
            FieldDef { field: Field::TvUsec, name: "ut_tv.tv_usec", offset: 344, size: 4, kind: FieldKind::Int32 },
            FieldDef { field: Field::AddrV6, name: "ut_addr_v6", offset: 348, size: 16, kind: FieldKind::Raw },
            FieldDef { field: Field::Reserved, name: "__glibc_reserved", offset: 364, size: 20, kind: FieldKind::Padding },
        ],
    };

    const fn offset(field: Field) -> usize {
        UTMPX_LAYOUT.fields[field as usize].offset
    }

    const fn size(field: Field) -> usize {
        UTMPX_LAYOUT.fields[field as usize].size
    }

    // the table agrees with itself
    assertcp!(UTMPX_LAYOUT.is_valid(), "UTMPX_LAYOUT rows are not contiguous");
    // the table agrees with the C struct
    assertcp_eq!(size_of::<utmpx>(), UTMPX_SZ);
    assertcp_eq!(offset_of!(utmpx, ut_type), offset(Field::Type));
    assertcp_eq!(size_of::<c_short>(), size(Field::Type));
    assertcp_eq!(offset_of!(utmpx, ut_pid), offset(Field::Pid));
    assertcp_eq!(size_of::<pid_t>(), size(Field::Pid));
    assertcp_eq!(offset_of!(utmpx, ut_line), offset(Field::Line));
    assertcp_eq!(offset_of!(utmpx, ut_id), offset(Field::Id));
    assertcp_eq!(offset_of!(utmpx, ut_user), offset(Field::User));
    assertcp_eq!(offset_of!(utmpx, ut_host), offset(Field::Host));
    assertcp_eq!(
        offset_of!(utmpx, ut_exit) + offset_of!(__exit_status, e_termination),
        offset(Field::ExitTermination)
    );
    assertcp_eq!(
        offset_of!(utmpx, ut_exit) + offset_of!(__exit_status, e_exit),
        offset(Field::ExitExit)
    );
    assertcp_eq!(offset_of!(utmpx, ut_session), offset(Field::Session));
    assertcp_eq!(
        offset_of!(utmpx, ut_tv) + offset_of!(__timeval, tv_sec),
        offset(Field::TvSec)
    );
    assertcp_eq!(
        offset_of!(utmpx, ut_tv) + offset_of!(__timeval, tv_usec),
        offset(Field::TvUsec)
    );
    assertcp_eq!(size_of::<__timeval>(), 8);
    assertcp_eq!(offset_of!(utmpx, ut_addr_v6), offset(Field::AddrV6));
    assertcp_eq!(size_of::<[i32; 4]>(), size(Field::AddrV6));
    assertcp_eq!(offset_of!(utmpx, __glibc_reserved), offset(Field::Reserved));

    /// From [`utmpx.h`]
    /// ```C
    /// #define EMPTY           0
    /// #define RUN_LVL         1
    /// #define BOOT_TIME       2
    /// #define NEW_TIME        3
    /// #define OLD_TIME        4
    /// #define INIT_PROCESS    5
    /// #define LOGIN_PROCESS   6
    /// #define USER_PROCESS    7
    /// #define DEAD_PROCESS    8
    /// #define ACCOUNTING      9
    /// ```
    ///
    /// [`utmpx.h`]: https://elixir.bootlin.com/glibc/latest/source/bits/utmp.h
    pub const UT_TYPES: [c_short; 10] = [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9
    ];
}

/// The layout used when none is given.
pub const LAYOUT_DEFAULT: &RecordLayout = &linux_x86::UTMPX_LAYOUT;
