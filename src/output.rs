//! Various ways to output formatting data.

use core::fmt;

use itertools::repeat_n;

use super::{ArgList, Directive, Error, Flags, Specifier};
use crate::{strlen, strnlen};

const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";
const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// The trait for receiving printf output.
pub trait Sink {
    /// Write a run of bytes.
    fn write_bytes(&mut self, s: &[u8]) -> fmt::Result;

    /// Write a single byte.
    fn write_byte(&mut self, c: u8) -> fmt::Result {
        self.write_bytes(&[c])
    }

    /// Write `c` repeated `n` times.
    fn write_repeated(&mut self, c: u8, n: usize) -> fmt::Result {
        repeat_n(c, n).try_for_each(|c| self.write_byte(c))
    }
}

/// The sink behind `snprintf`: a fixed buffer and a running index.
///
/// The index counts every byte emitted. A byte is stored only while the index
/// is below the buffer's length; past that it is counted and dropped, so the
/// final index is the length the output would have had with room to spare.
pub struct BoundedBuf<'a> {
    buf: &'a mut [u8],
    index: usize,
}

impl<'a> BoundedBuf<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, index: 0 }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Bytes emitted so far, stored or not.
    pub fn index(&self) -> usize {
        self.index
    }

    fn put(&mut self, c: u8) {
        if let Some(slot) = self.buf.get_mut(self.index) {
            *slot = c;
        }
        self.index = self.index.saturating_add(1);
    }

    /// Emit `len` bytes at once. `fill` receives the part of the buffer they
    /// land in, which is shorter than `len` (maybe empty) near the end.
    fn put_run(&mut self, len: usize, fill: impl FnOnce(&mut [u8])) {
        let start = self.index.min(self.buf.len());
        let end = self.index.saturating_add(len).min(self.buf.len());
        fill(&mut self.buf[start..end]);
        self.index = self.index.saturating_add(len);
    }

    /// Terminate the output and return its length, excluding the terminator.
    ///
    /// The NUL goes through the same bounded path as everything else; then the
    /// last byte of the buffer is forced to NUL in case the output overran it.
    /// An empty buffer is never touched.
    pub fn finish(mut self) -> usize {
        self.put(0);
        if let Some(last) = self.buf.last_mut() {
            *last = 0;
        }
        self.index - 1
    }
}

impl Sink for BoundedBuf<'_> {
    fn write_bytes(&mut self, s: &[u8]) -> fmt::Result {
        self.put_run(s.len(), |dst| dst.copy_from_slice(&s[..dst.len()]));
        Ok(())
    }

    fn write_byte(&mut self, c: u8) -> fmt::Result {
        self.put(c);
        Ok(())
    }

    fn write_repeated(&mut self, c: u8, n: usize) -> fmt::Result {
        self.put_run(n, |dst| dst.fill(c));
        Ok(())
    }
}

/// A Sink which counts how many bytes are written.
#[derive(Debug, Default)]
pub struct WriteCounter(pub usize);

impl Sink for WriteCounter {
    fn write_bytes(&mut self, s: &[u8]) -> fmt::Result {
        self.0 = self.0.saturating_add(s.len());
        Ok(())
    }

    fn write_repeated(&mut self, _c: u8, n: usize) -> fmt::Result {
        self.0 = self.0.saturating_add(n);
        Ok(())
    }
}

/// Pad `body` to `width` with spaces, after it if left-aligned, else before.
fn write_padded(w: &mut impl Sink, flags: Flags, width: usize, body: &[u8]) -> fmt::Result {
    let fill = width.saturating_sub(body.len());
    if flags.contains(Flags::LEFT_ALIGN) {
        w.write_bytes(body)?;
        w.write_repeated(b' ', fill)
    } else {
        w.write_repeated(b' ', fill)?;
        w.write_bytes(body)
    }
}

fn write_str(
    w: &mut impl Sink,
    flags: Flags,
    width: usize,
    precision: Option<usize>,
    s: &[u8],
) -> fmt::Result {
    let len = match precision {
        Some(prec) => strnlen(s, prec),
        None => strlen(s),
    };
    write_padded(w, flags, width, &s[..len])
}

/// An integer broken into the pieces printf lays out: sign, prefix, digits.
#[derive(Debug, Copy, Clone)]
struct Int {
    sign: Option<u8>,
    prefix: &'static [u8],
    magnitude: u64,
    base: u64,
    digits: &'static [u8; 16],
    /// `#o`: the first digit printed must be a zero.
    leading_zero: bool,
}

impl Int {
    fn signed(value: i64, flags: Flags) -> Self {
        let sign = if value < 0 {
            Some(b'-')
        } else if flags.contains(Flags::PREPEND_PLUS) {
            Some(b'+')
        } else if flags.contains(Flags::PREPEND_SPACE) {
            Some(b' ')
        } else {
            None
        };
        Self {
            sign,
            magnitude: value.unsigned_abs(),
            ..Self::unsigned(0, 10)
        }
    }

    fn unsigned(magnitude: u64, base: u64) -> Self {
        Self {
            sign: None,
            prefix: b"",
            magnitude,
            base,
            digits: LOWER_DIGITS,
            leading_zero: false,
        }
    }
}

fn write_int(
    w: &mut impl Sink,
    flags: Flags,
    width: usize,
    precision: Option<usize>,
    int: Int,
) -> fmt::Result {
    // u64::MAX in octal.
    let mut buf = [0u8; 22];
    let mut start = buf.len();
    let mut n = int.magnitude;
    while n != 0 {
        start -= 1;
        buf[start] = int.digits[(n % int.base) as usize];
        n /= int.base;
    }
    let digits = &buf[start..];

    // Precision is a minimum digit count, so `.0` prints zero as nothing.
    let mut zeros = precision.unwrap_or(1).saturating_sub(digits.len());
    if int.leading_zero && zeros == 0 {
        zeros = 1;
    }

    let sign = int.sign.as_slice();
    let body = sign.len() + int.prefix.len() + zeros + digits.len();
    let fill = width.saturating_sub(body);

    if flags.contains(Flags::LEFT_ALIGN) {
        write_int_body(w, sign, int.prefix, zeros, digits)?;
        w.write_repeated(b' ', fill)
    } else if flags.contains(Flags::PREPEND_ZERO) && precision.is_none() {
        // Zero padding goes between the sign or prefix and the digits.
        write_int_body(w, sign, int.prefix, zeros.saturating_add(fill), digits)
    } else {
        w.write_repeated(b' ', fill)?;
        write_int_body(w, sign, int.prefix, zeros, digits)
    }
}

fn write_int_body(
    w: &mut impl Sink,
    sign: &[u8],
    prefix: &[u8],
    zeros: usize,
    digits: &[u8],
) -> fmt::Result {
    w.write_bytes(sign)?;
    w.write_bytes(prefix)?;
    w.write_repeated(b'0', zeros)?;
    w.write_bytes(digits)
}

/// Write a single directive to the sink.
fn write_1_arg(arg: Directive, w: &mut impl Sink) -> fmt::Result {
    let Directive {
        flags,
        width,
        precision,
        specifier,
        ..
    } = arg;
    let alternate = flags.contains(Flags::ALTERNATE_FORM);
    let int = match specifier {
        Specifier::Percent => return w.write_byte(b'%'),
        Specifier::Literals(data) => return w.write_bytes(data),
        Specifier::String(data) => return write_str(w, flags, width, precision, data),
        // Precision has no meaning for a single character.
        Specifier::Char(c) => return write_padded(w, flags, width, &[c]),
        Specifier::Int(value) => Int::signed(value, flags),
        Specifier::Uint(value) => Int::unsigned(value, 10),
        Specifier::Octal(value) => Int {
            leading_zero: alternate,
            ..Int::unsigned(value, 8)
        },
        Specifier::Hex(value) => Int {
            prefix: if alternate && value != 0 { &b"0x"[..] } else { &[] },
            ..Int::unsigned(value, 16)
        },
        Specifier::UpperHex(value) => Int {
            prefix: if alternate && value != 0 { &b"0X"[..] } else { &[] },
            digits: UPPER_DIGITS,
            ..Int::unsigned(value, 16)
        },
        Specifier::Pointer(ptr) => Int {
            prefix: b"0x",
            ..Int::unsigned(ptr as u64, 16)
        },
    };
    write_int(w, flags, width, precision, int)
}

/// Write to a [`Sink`].
pub fn sink_write(w: &mut impl Sink) -> impl FnMut(Directive) -> Result<(), Error> + '_ {
    move |arg| Ok(write_1_arg(arg, &mut *w)?)
}

// Adapts `fmt::Write` to `Sink`.
struct FmtWrite<'a, T: ?Sized>(&'a mut T);

impl<T> Sink for FmtWrite<'_, T>
where
    T: fmt::Write + ?Sized,
{
    /// Bytes that are not UTF-8 come out as U+FFFD.
    fn write_bytes(&mut self, s: &[u8]) -> fmt::Result {
        for chunk in s.utf8_chunks() {
            self.0.write_str(chunk.valid())?;
            if !chunk.invalid().is_empty() {
                self.0.write_char(char::REPLACEMENT_CHARACTER)?;
            }
        }
        Ok(())
    }
}

/// Write to a struct that implements [`fmt::Write`].
///
/// Output that is not UTF-8, such as a `%c` of a byte above 0x7f, is replaced
/// with U+FFFD.
pub fn fmt_write(w: &mut impl fmt::Write) -> impl FnMut(Directive) -> Result<(), Error> + '_ {
    move |arg| Ok(write_1_arg(arg, &mut FmtWrite(&mut *w))?)
}

/// Returns an object that implements [`Display`][fmt::Display] for
/// printing formatting data with [`format!`] and `{}`, or anything else built
/// on [`format_args!`].
///
/// An argument list that does not fit the template makes the `Display`
/// implementation fail with [`fmt::Error`].
pub fn display<'a, 'b>(format: &'a [u8], args: ArgList<'b>) -> ArgListDisplay<'a, 'b> {
    ArgListDisplay { format, args }
}

/// Helper struct created by [`display`].
#[derive(Debug, Clone)]
pub struct ArgListDisplay<'a, 'b> {
    format: &'a [u8],
    args: ArgList<'b>,
}

impl fmt::Display for ArgListDisplay<'_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        super::format(self.format, &mut self.args.clone(), fmt_write(f)).map_err(|_| fmt::Error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToArg;
    use std::string::{String, ToString};

    fn render(arg: Directive) -> String {
        let mut s = String::new();
        fmt_write(&mut s)(arg).unwrap();
        s
    }

    #[test]
    fn test_digit_tables() {
        assert_eq!(LOWER_DIGITS, b"0123456789abcdef");
        assert_eq!(UPPER_DIGITS, b"0123456789ABCDEF");
        assert_eq!(UPPER_DIGITS[..], LOWER_DIGITS.to_ascii_uppercase()[..]);
    }

    #[test]
    fn test_bounded_buf() {
        let mut buf = [b'#'; 4];
        let mut out = BoundedBuf::new(&mut buf);
        out.write_bytes(b"abcdef").unwrap();
        out.write_repeated(b' ', 3).unwrap();
        out.write_byte(b'!').unwrap();
        assert_eq!(out.index(), 10);
        assert_eq!(out.capacity(), 4);
        assert_eq!(out.finish(), 10);
        assert_eq!(&buf, b"abc\0");
    }

    #[test]
    fn test_bounded_buf_fits() {
        let mut buf = [b'#'; 8];
        let mut out = BoundedBuf::new(&mut buf);
        out.write_bytes(b"ab").unwrap();
        out.write_repeated(b'-', 2).unwrap();
        assert_eq!(out.finish(), 4);
        assert_eq!(&buf, b"ab--\0##\0");
    }

    #[test]
    fn test_bounded_buf_empty() {
        let mut out = BoundedBuf::new(&mut []);
        out.write_bytes(b"xyz").unwrap();
        out.write_byte(b'!').unwrap();
        assert_eq!(out.finish(), 4);
    }

    #[test]
    fn test_write_counter() {
        let mut counter = WriteCounter::default();
        counter.write_bytes(b"abc").unwrap();
        counter.write_repeated(b' ', 5).unwrap();
        counter.write_byte(b'x').unwrap();
        assert_eq!(counter.0, 9);
    }

    #[test]
    fn test_write_int_layout() {
        let d = |flags, width, precision, specifier| Directive {
            flags,
            width,
            precision,
            specifier,
            ..Specifier::Percent.into()
        };
        let zero = Flags::PREPEND_ZERO;
        assert_eq!(render(d(zero, 5, None, Specifier::Int(-42))), "-0042");
        assert_eq!(render(d(Flags::empty(), 5, Some(3), Specifier::Int(-7))), " -007");
        assert_eq!(
            render(d(zero | Flags::ALTERNATE_FORM, 10, None, Specifier::Hex(42))),
            "0x0000002a"
        );
        assert_eq!(render(d(Flags::empty(), 0, Some(0), Specifier::Uint(0))), "");
        assert_eq!(render(d(Flags::ALTERNATE_FORM, 0, Some(0), Specifier::Octal(0))), "0");
        assert_eq!(render(d(Flags::empty(), 0, None, Specifier::Pointer(0))), "0x0");
        assert_eq!(
            render(d(Flags::empty(), 0, None, Specifier::Int(i64::MIN))),
            i64::MIN.to_string()
        );
    }

    #[test]
    fn test_fmt_write_lossy() {
        let s = render(Specifier::Literals(b"a\xffb").into());
        assert_eq!(s, "a\u{fffd}b");
    }

    #[test]
    fn test_display() {
        let argv = [7i32.to_arg(), "seven".to_arg()];
        let shown = display(b"%03d=%s", ArgList::new(&argv));
        assert_eq!(shown.to_string(), "007=seven");
        // Formatting again starts from the first argument.
        assert_eq!(shown.to_string(), "007=seven");
    }
}
