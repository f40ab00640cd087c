//! C string primitives over byte slices.
//!
//! A slice is read as a C string: it ends at its first NUL byte, or at the end
//! of the slice if it has none.

use core::ffi::CStr;

/// Length of the C string in `s`.
pub fn strlen(s: &[u8]) -> usize {
    strnlen(s, s.len())
}

/// Length of the C string in `s`, looking at no more than `max` bytes.
pub fn strnlen(s: &[u8], max: usize) -> usize {
    let s = &s[..max.min(s.len())];
    s.iter().position(|&c| c == 0).unwrap_or(s.len())
}

/// Things that can serve as a format template.
pub trait FormatString {
    /// The raw bytes, possibly including a terminating NUL.
    fn bytes(&self) -> &[u8];

    /// The template proper: everything before the first NUL.
    fn template(&self) -> &[u8] {
        let bytes = self.bytes();
        &bytes[..strlen(bytes)]
    }
}

impl FormatString for str {
    fn bytes(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl FormatString for [u8] {
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl<const N: usize> FormatString for [u8; N] {
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl FormatString for CStr {
    fn bytes(&self) -> &[u8] {
        self.to_bytes()
    }
}

impl<T: FormatString + ?Sized> FormatString for &T {
    fn bytes(&self) -> &[u8] {
        (**self).bytes()
    }
}
