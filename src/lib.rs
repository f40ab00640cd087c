//! Bounded `snprintf` reimplemented in Rust.
//!
//! Formats a printf-style template into a caller-supplied byte buffer, never
//! writing past its end, and reports the length the output would have had
//! without the bound. Nothing here allocates; the engine runs on `core` alone.
//!
//! ```
//! use snprintf_compat::snprintf;
//!
//! let mut buf = [0u8; 8];
//! let len = snprintf!(&mut buf, "%5d|%s", 42, "truncated");
//! assert_eq!(len, 15);
//! assert_eq!(&buf, b"   42|t\0");
//! ```
//!
//! Supported: flags `- + space # 0` (and a no-op `'`), decimal width and
//! precision, length modifiers `hh h l ll j z t`, conversions `d i u x X o c s p`
//! and `%%`. Floating point, `%n`, `*` widths and positional arguments are not.
#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;
#[cfg(any(feature = "std", test))]
extern crate std;

/// Trace events, compiled out without the `tracing` feature.
#[cfg(feature = "tracing")]
macro_rules! trace {
    ($($tt:tt)*) => { ::tracing::trace!($($tt)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace {
    ($($tt:tt)*) => {{}};
}

mod args;
pub mod cstr;
mod error;
pub mod output;
mod parser;
pub mod printf;
use argument::*;
pub use parser::format;

pub use args::{Arg, ArgList, ToArg};
pub use cstr::{strlen, strnlen, FormatString};
pub use error::Error;
pub use printf::{formatted_len, snprintf, try_snprintf, try_vsnprintf, vsnprintf};

#[cfg(feature = "alloc")]
pub use printf::sprintf;

/// Upper bound for a decoded width or precision. Matches C's `int` return type,
/// which cannot report a longer output anyway.
pub const MAX_FIELD_WIDTH: usize = i32::MAX as usize;

pub mod argument {
    use core::ffi::{c_char, c_int, c_long, c_longlong, c_short};
    use core::mem::size_of;

    bitflags::bitflags! {
        /// Flags field.
        ///
        /// Definitions from
        /// [Wikipedia](https://en.wikipedia.org/wiki/Printf_format_string#Flags_field).
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub struct Flags: u8 {
            /// Left-align the output of this placeholder. (The default is to
            /// right-align the output.) Cancels `PREPEND_ZERO`.
            const LEFT_ALIGN = 0b00000001;
            /// Prepends a plus for positive signed-numeric types. positive =
            /// `+`, negative = `-`.
            const PREPEND_PLUS = 0b00000010;
            /// Prepends a space for positive signed-numeric types. Ignored if
            /// [`PREPEND_PLUS`][Flags::PREPEND_PLUS] is also present.
            const PREPEND_SPACE = 0b00000100;
            /// When the 'width' option is specified, prepends zeros for integer
            /// types. (The default prepends spaces.) Ignored when a precision
            /// is given.
            ///
            /// For example, `printf("%4X",3)` produces `   3`, while
            /// `printf("%04X",3)` produces `0003`.
            const PREPEND_ZERO = 0b00001000;
            /// Thousands grouping. Accepted for compatibility, never applied.
            const THOUSANDS_GROUPING = 0b00010000;
            /// Alternate form: `0x`/`0X` before nonzero `x`/`X` values, and a
            /// leading `0` digit for `o`.
            const ALTERNATE_FORM = 0b00100000;
        }
    }

    /// The [Length field](https://en.wikipedia.org/wiki/Printf_format_string#Length_field),
    /// naming the C type an integer argument is read as.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub enum Length {
        /// `hh`
        Char,
        /// `h`
        Short,
        /// no modifier
        Int,
        /// `l`
        Long,
        /// `ll`
        LongLong,
        /// `j`
        IntMax,
        /// `z`
        Size,
        /// `t`
        PtrDiff,
    }

    impl Length {
        /// Width in bits of the C type on this target.
        pub fn bits(self) -> u32 {
            let bytes = match self {
                Length::Char => size_of::<c_char>(),
                Length::Short => size_of::<c_short>(),
                Length::Int => size_of::<c_int>(),
                Length::Long => size_of::<c_long>(),
                Length::LongLong => size_of::<c_longlong>(),
                Length::IntMax => size_of::<i64>(),
                Length::Size => size_of::<usize>(),
                Length::PtrDiff => size_of::<isize>(),
            };
            bytes as u32 * 8
        }

        /// Keep only the bits the C type holds, as an unsigned value.
        pub fn truncate(self, raw: u64) -> u64 {
            match self.bits() {
                64.. => raw,
                bits => raw & ((1 << bits) - 1),
            }
        }

        /// Reinterpret the low bits as a value of the signed C type.
        pub fn sign_extend(self, raw: u64) -> i64 {
            let shift = 64 - self.bits().min(64);
            ((raw << shift) as i64) >> shift
        }
    }

    /// A decoded directive as passed to the [`format`][crate::format] handler.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct Directive<'a> {
        pub flags: Flags,
        /// Minimum field width; 0 means none.
        pub width: usize,
        /// `None` when no `.` was given; `.` alone is `Some(0)`.
        pub precision: Option<usize>,
        pub length: Length,
        pub specifier: Specifier<'a>,
    }

    impl<'a> From<Specifier<'a>> for Directive<'a> {
        fn from(specifier: Specifier<'a>) -> Self {
            Self {
                flags: Flags::empty(),
                width: 0,
                precision: None,
                length: Length::Int,
                specifier,
            }
        }
    }

    /// A [format specifier](https://en.wikipedia.org/wiki/Printf_format_string#Type_field),
    /// carrying its argument already read at the directive's length.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub enum Specifier<'a> {
        /// `%%`
        Percent,
        /// template text outside of directives
        Literals(&'a [u8]),
        /// `d`, `i`
        Int(i64),
        /// `u`
        Uint(u64),
        /// `o`
        Octal(u64),
        /// `x`
        Hex(u64),
        /// `X`
        UpperHex(u64),
        /// `c`
        Char(u8),
        /// `s`, possibly NUL-terminated
        String(&'a [u8]),
        /// `p`
        Pointer(usize),
    }
}
