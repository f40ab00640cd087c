use crate::Error;
use core::ffi::CStr;

/// Printf argument types.
///
/// Integers are stored widened, the way C's default argument promotions widen
/// them; the directive's length modifier decides how many bits are read back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Arg<'a> {
    Str(&'a [u8]),
    Int(i64),
    UInt(u64),
    Ptr(usize),
}

/// Conversion from a raw value to a printf argument.
pub trait ToArg<'a>: Copy {
    fn to_arg(self) -> Arg<'a>;
}

impl<'a> ToArg<'a> for &'a str {
    fn to_arg(self) -> Arg<'a> {
        Arg::Str(self.as_bytes())
    }
}

impl<'a> ToArg<'a> for &'a [u8] {
    fn to_arg(self) -> Arg<'a> {
        Arg::Str(self)
    }
}

impl<'a, const N: usize> ToArg<'a> for &'a [u8; N] {
    fn to_arg(self) -> Arg<'a> {
        Arg::Str(self)
    }
}

impl<'a> ToArg<'a> for &'a CStr {
    fn to_arg(self) -> Arg<'a> {
        Arg::Str(self.to_bytes())
    }
}

/// A `char` travels as its code point, like a C character promoted to `int`.
impl ToArg<'static> for char {
    fn to_arg(self) -> Arg<'static> {
        Arg::Int(self as i64)
    }
}

impl<T> ToArg<'static> for *const T {
    fn to_arg(self) -> Arg<'static> {
        Arg::Ptr(self as usize)
    }
}

impl<T> ToArg<'static> for *mut T {
    fn to_arg(self) -> Arg<'static> {
        Arg::Ptr(self as usize)
    }
}

/// All signed types.
macro_rules! impl_to_arg {
    ($($t:ty),*) => {
        $(
            impl ToArg<'static> for $t {
                fn to_arg(self) -> Arg<'static> {
                    Arg::Int(self as i64)
                }
            }
        )*
    };
}
impl_to_arg!(i8, i16, i32, i64, isize);

/// All unsigned types.
macro_rules! impl_to_arg_u {
    ($($t:ty),*) => {
        $(
            impl ToArg<'static> for $t {
                fn to_arg(self) -> Arg<'static> {
                    Arg::UInt(self as u64)
                }
            }
        )*
    };
}
impl_to_arg_u!(u8, u16, u32, u64, usize);

/// Cursor over printf arguments, the counterpart of a `va_list`.
///
/// Every consuming directive advances it by exactly one argument. Cloning it
/// snapshots the position, so a list can be formatted more than once.
#[derive(Debug, Clone)]
pub struct ArgList<'a> {
    args: &'a [Arg<'a>],
    index: usize,
}

impl<'a> ArgList<'a> {
    /// Construct a new arglist.
    pub fn new(args: &'a [Arg<'a>]) -> Self {
        Self { args, index: 0 }
    }

    /// Return how many args are remaining.
    pub fn remaining(&self) -> usize {
        self.args.len() - self.index
    }

    /// Index of the next argument to be consumed.
    pub fn position(&self) -> usize {
        self.index
    }

    fn next_arg(&mut self) -> Result<(usize, &'a Arg<'a>), Error> {
        let args: &'a [Arg<'a>] = self.args;
        let index = self.index;
        let arg = args.get(index).ok_or(Error::MissingArg { index })?;
        self.index += 1;
        Ok((index, arg))
    }

    /// Next integer, widened to 64 bits. Signed values are sign-extended.
    pub fn arg_u64(&mut self) -> Result<u64, Error> {
        match self.next_arg()? {
            (_, Arg::Int(i)) => Ok(*i as u64),
            (_, Arg::UInt(u)) => Ok(*u),
            (index, _) => Err(Error::BadArg {
                index,
                expected: "int",
            }),
        }
    }

    /// Next character: the low byte of a promoted integer.
    pub fn arg_c(&mut self) -> Result<u8, Error> {
        match self.next_arg()? {
            (_, Arg::Int(i)) => Ok(*i as u8),
            (_, Arg::UInt(u)) => Ok(*u as u8),
            (index, _) => Err(Error::BadArg {
                index,
                expected: "char",
            }),
        }
    }

    pub fn arg_str(&mut self) -> Result<&'a [u8], Error> {
        match self.next_arg()? {
            (_, Arg::Str(s)) => Ok(*s),
            (index, _) => Err(Error::BadArg {
                index,
                expected: "str",
            }),
        }
    }

    // Pointers may also be passed as integers.
    pub fn arg_p(&mut self) -> Result<usize, Error> {
        match self.next_arg()? {
            (_, Arg::Ptr(p)) => Ok(*p),
            (_, Arg::Int(i)) => Ok(*i as usize),
            (_, Arg::UInt(u)) => Ok(*u as usize),
            (index, _) => Err(Error::BadArg {
                index,
                expected: "pointer",
            }),
        }
    }
}
