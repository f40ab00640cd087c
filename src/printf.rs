use crate::args::{Arg, ArgList};
use crate::cstr::FormatString;
use crate::output::{sink_write, BoundedBuf, WriteCounter};
use crate::Error;

/// Format into `buf`, reading arguments from `args`. The `vsnprintf` of this
/// crate: use it to forward an argument list that is already built.
///
/// At most `buf.len()` bytes are written and a nonempty `buf` always ends up
/// NUL-terminated. Returns the length of the full output, excluding the
/// terminator, even if it did not fit: the output was truncated if and only
/// if the result is `>= buf.len()`. An empty `buf` is never written to, which
/// makes it a way to measure the output.
///
/// An argument list that runs out, or holds the wrong kind of value for a
/// directive, is an error; `buf` is still terminated after whatever was
/// written before it.
pub fn try_vsnprintf(
    buf: &mut [u8],
    fmt: impl FormatString,
    args: &mut ArgList,
) -> Result<usize, Error> {
    let capacity = buf.len();
    let mut out = BoundedBuf::new(buf);
    let res = crate::parser::format(fmt.template(), args, sink_write(&mut out));
    let len = out.finish();
    if len >= capacity {
        trace!(len, capacity, "output truncated");
    }
    res.map(|()| len)
}

/// Like [`try_vsnprintf`], with the arguments given as a slice.
pub fn try_snprintf(buf: &mut [u8], fmt: impl FormatString, args: &[Arg]) -> Result<usize, Error> {
    try_vsnprintf(buf, fmt, &mut ArgList::new(args))
}

/// Like [`try_vsnprintf`], but panics if the arguments do not fit the format
/// string.
pub fn vsnprintf(buf: &mut [u8], fmt: impl FormatString, args: &mut ArgList) -> usize {
    match try_vsnprintf(buf, fmt, args) {
        Ok(len) => len,
        Err(err) => panic!("snprintf: {}", err),
    }
}

/// The snprintf function entry point. Prefer the [`snprintf!`][crate::snprintf!]
/// macro, which converts its arguments.
///
/// Panics if the arguments do not fit the format string.
pub fn snprintf(buf: &mut [u8], fmt: impl FormatString, args: &[Arg]) -> usize {
    vsnprintf(buf, fmt, &mut ArgList::new(args))
}

/// The length of the output, without writing it anywhere.
pub fn formatted_len(fmt: impl FormatString, args: &[Arg]) -> Result<usize, Error> {
    let mut counter = WriteCounter::default();
    crate::parser::format(fmt.template(), &mut ArgList::new(args), sink_write(&mut counter))?;
    Ok(counter.0)
}

/// Format into a newly allocated `String`. Bytes that are not UTF-8 are
/// replaced with U+FFFD.
///
/// Panics if the arguments do not fit the format string.
#[cfg(feature = "alloc")]
pub fn sprintf(fmt: impl FormatString, args: &[Arg]) -> alloc::string::String {
    let mut s = alloc::string::String::new();
    let mut args = ArgList::new(args);
    let res = crate::parser::format(fmt.template(), &mut args, crate::output::fmt_write(&mut s));
    if let Err(err) = res {
        panic!("sprintf: {}", err);
    }
    s
}

/// Format into a byte buffer, C style: `snprintf!(&mut buf, "%d", 42)`.
///
/// Arguments are converted with [`ToArg`][crate::ToArg]. Evaluates to the
/// length of the full output; see [`try_vsnprintf`] for the contract.
#[macro_export]
macro_rules! snprintf {
    (
        $buf:expr, // target buffer
        $fmt:expr // format string
        $(, $arg:expr)* // arguments
        $(,)? // optional trailing comma
    ) => {
        $crate::printf::snprintf(
            $buf,
            $fmt,
            &[$($crate::ToArg::to_arg($arg)),*],
        )
    };
}

/// Format into a new `String`.
#[cfg(feature = "alloc")]
#[macro_export]
macro_rules! sprintf {
    (
        $fmt:expr // format string
        $(, $arg:expr)* // arguments
        $(,)? // optional trailing comma
    ) => {
        $crate::printf::sprintf(
            $fmt,
            &[$($crate::ToArg::to_arg($arg)),*],
        )
    };
}
