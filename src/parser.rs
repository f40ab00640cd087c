use super::{ArgList, Directive, Error, Flags, Length, Specifier};
use crate::{strlen, MAX_FIELD_WIDTH};

fn next_char(sub: &[u8]) -> &[u8] {
    sub.get(1..).unwrap_or(&[])
}

/// Parse the [Flags field](https://en.wikipedia.org/wiki/Printf_format_string#Flags_field).
fn parse_flags(mut sub: &[u8]) -> (Flags, &[u8]) {
    let mut flags: Flags = Flags::empty();
    while let Some(&ch) = sub.first() {
        flags.insert(match ch {
            b'-' => Flags::LEFT_ALIGN,
            b'+' => Flags::PREPEND_PLUS,
            b' ' => Flags::PREPEND_SPACE,
            b'0' => Flags::PREPEND_ZERO,
            b'\'' => Flags::THOUSANDS_GROUPING,
            b'#' => Flags::ALTERNATE_FORM,
            _ => break,
        });
        sub = next_char(sub);
    }
    // Left justification always wins over zero padding.
    if flags.contains(Flags::LEFT_ALIGN) {
        flags.remove(Flags::PREPEND_ZERO);
    }
    (flags, sub)
}

/// Parse a run of decimal digits, clamped to [`MAX_FIELD_WIDTH`].
fn parse_number(mut sub: &[u8]) -> (usize, &[u8]) {
    let mut n: usize = 0;
    while let Some(ch @ b'0'..=b'9') = sub.first().copied() {
        n = n
            .saturating_mul(10)
            .saturating_add(usize::from(ch - b'0'))
            .min(MAX_FIELD_WIDTH);
        sub = next_char(sub);
    }
    (n, sub)
}

/// Parse the [Width field](https://en.wikipedia.org/wiki/Printf_format_string#Width_field).
fn parse_width(sub: &[u8]) -> (usize, &[u8]) {
    parse_number(sub)
}

/// Parse the [Precision field](https://en.wikipedia.org/wiki/Printf_format_string#Precision_field).
/// A lone `.` is an explicit precision of zero.
fn parse_precision(sub: &[u8]) -> (Option<usize>, &[u8]) {
    match sub.first() {
        Some(&b'.') => {
            let (prec, sub) = parse_number(next_char(sub));
            (Some(prec), sub)
        }
        _ => (None, sub),
    }
}

/// Parse the [Length field](https://en.wikipedia.org/wiki/Printf_format_string#Length_field).
fn parse_length(sub: &[u8]) -> (Length, &[u8]) {
    match sub.first().copied() {
        Some(b'h') => match sub.get(1).copied() {
            Some(b'h') => (Length::Char, sub.get(2..).unwrap_or(&[])),
            _ => (Length::Short, next_char(sub)),
        },
        Some(b'l') => match sub.get(1).copied() {
            Some(b'l') => (Length::LongLong, sub.get(2..).unwrap_or(&[])),
            _ => (Length::Long, next_char(sub)),
        },
        Some(b'j') => (Length::IntMax, next_char(sub)),
        Some(b'z') => (Length::Size, next_char(sub)),
        Some(b't') => (Length::PtrDiff, next_char(sub)),
        _ => (Length::Int, sub),
    }
}

impl Length {
    fn parse_signed(self, args: &mut ArgList) -> Result<i64, Error> {
        Ok(self.sign_extend(args.arg_u64()?))
    }

    fn parse_unsigned(self, args: &mut ArgList) -> Result<u64, Error> {
        Ok(self.truncate(args.arg_u64()?))
    }
}

/// Parse a format template and hand each piece to `handler`.
///
/// Literal text arrives as [`Specifier::Literals`], `%%` as
/// [`Specifier::Percent`], and every recognized directive with its argument
/// already taken from `args`. The template ends at its first NUL byte.
///
/// Directives with an unknown conversion character, and a directive cut short
/// by the end of the template, are dropped without consuming an argument.
pub fn format<'f, 'a: 'f>(
    format: &'f [u8],
    args: &mut ArgList<'a>,
    mut handler: impl FnMut(Directive<'f>) -> Result<(), Error>,
) -> Result<(), Error> {
    let mut sub = &format[..strlen(format)];
    while !sub.is_empty() {
        let literal_len = sub.iter().position(|&c| c == b'%').unwrap_or(sub.len());
        if literal_len > 0 {
            handler(Specifier::Literals(&sub[..literal_len]).into())?;
        }
        sub = &sub[literal_len..];
        if sub.is_empty() {
            break;
        }

        sub = next_char(sub);
        if sub.first() == Some(&b'%') {
            handler(Specifier::Percent.into())?;
            sub = next_char(sub);
            continue;
        }

        let (flags, rest) = parse_flags(sub);
        let (width, rest) = parse_width(rest);
        let (precision, rest) = parse_precision(rest);
        let (length, rest) = parse_length(rest);
        let Some(&ch) = rest.first() else {
            trace!("template ends inside a directive");
            break;
        };
        sub = next_char(rest);

        let specifier = match ch {
            b'd' | b'i' => Specifier::Int(length.parse_signed(args)?),
            b'u' => Specifier::Uint(length.parse_unsigned(args)?),
            b'o' => Specifier::Octal(length.parse_unsigned(args)?),
            b'x' => Specifier::Hex(length.parse_unsigned(args)?),
            b'X' => Specifier::UpperHex(length.parse_unsigned(args)?),
            b'c' => Specifier::Char(args.arg_c()?),
            b's' => Specifier::String(args.arg_str()?),
            b'p' => Specifier::Pointer(args.arg_p()?),
            _ => {
                trace!(conversion = ?char::from(ch), "skipping unrecognized conversion");
                continue;
            }
        };
        handler(Directive {
            flags,
            width,
            precision,
            length,
            specifier,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToArg;
    use std::vec::Vec;

    fn directives<'f>(fmt: &'f [u8], args: &mut ArgList<'f>) -> Vec<Directive<'f>> {
        let mut out = Vec::new();
        format(fmt, args, |d| {
            out.push(d);
            Ok(())
        })
        .unwrap();
        out
    }

    #[test]
    fn test_parse_flags() {
        let (flags, rest) = parse_flags(b"-+ #0'5d");
        assert!(flags.contains(Flags::LEFT_ALIGN | Flags::PREPEND_PLUS | Flags::PREPEND_SPACE));
        assert!(flags.contains(Flags::ALTERNATE_FORM | Flags::THOUSANDS_GROUPING));
        assert!(!flags.contains(Flags::PREPEND_ZERO));
        assert_eq!(rest, b"5d");

        let (flags, rest) = parse_flags(b"0d");
        assert_eq!(flags, Flags::PREPEND_ZERO);
        assert_eq!(rest, b"d");
    }

    #[test]
    fn test_parse_width_and_precision() {
        assert_eq!(parse_width(b"12.3d"), (12, &b".3d"[..]));
        assert_eq!(parse_width(b"d"), (0, &b"d"[..]));
        assert_eq!(parse_precision(b".3d"), (Some(3), &b"d"[..]));
        assert_eq!(parse_precision(b".d"), (Some(0), &b"d"[..]));
        assert_eq!(parse_precision(b"d"), (None, &b"d"[..]));
    }

    #[test]
    fn test_parse_number_saturates() {
        let (n, rest) = parse_number(b"999999999999999999999999999d");
        assert_eq!(n, MAX_FIELD_WIDTH);
        assert_eq!(rest, b"d");
    }

    #[test]
    fn test_parse_length() {
        assert_eq!(parse_length(b"hhd").0, Length::Char);
        assert_eq!(parse_length(b"hd").0, Length::Short);
        assert_eq!(parse_length(b"ld").0, Length::Long);
        assert_eq!(parse_length(b"lld"), (Length::LongLong, &b"d"[..]));
        assert_eq!(parse_length(b"jd").0, Length::IntMax);
        assert_eq!(parse_length(b"zu").0, Length::Size);
        assert_eq!(parse_length(b"td").0, Length::PtrDiff);
        assert_eq!(parse_length(b"d"), (Length::Int, &b"d"[..]));
    }

    #[test]
    fn test_directive_descriptor() {
        let argv = [(-3i32).to_arg()];
        let mut args = ArgList::new(&argv);
        let found = directives(b"x=%-+8.3hd!", &mut args);
        assert_eq!(
            found,
            [
                Directive::from(Specifier::Literals(b"x=")),
                Directive {
                    flags: Flags::LEFT_ALIGN | Flags::PREPEND_PLUS,
                    width: 8,
                    precision: Some(3),
                    length: Length::Short,
                    specifier: Specifier::Int(-3),
                },
                Directive::from(Specifier::Literals(b"!")),
            ]
        );
    }

    #[test]
    fn test_percent_consumes_nothing() {
        let mut args = ArgList::new(&[]);
        let found = directives(b"100%%", &mut args);
        assert_eq!(
            found,
            [
                Directive::from(Specifier::Literals(b"100")),
                Directive::from(Specifier::Percent)
            ]
        );
    }

    #[test]
    fn test_unknown_conversion_consumes_nothing() {
        let argv = [5i32.to_arg()];
        let mut args = ArgList::new(&argv);
        let found = directives(b"%-5y%d", &mut args);
        assert_eq!(found, [Directive::from(Specifier::Int(5))]);
        assert_eq!(args.remaining(), 0);
    }

    #[test]
    fn test_truncated_directive() {
        let mut args = ArgList::new(&[]);
        assert_eq!(directives(b"ab%", &mut args), [Directive::from(Specifier::Literals(b"ab"))]);
        assert_eq!(directives(b"ab%-5l", &mut args), [Directive::from(Specifier::Literals(b"ab"))]);
    }

    #[test]
    fn test_stops_at_nul() {
        let argv = [1i32.to_arg()];
        let mut args = ArgList::new(&argv);
        assert_eq!(directives(b"ab\0%d", &mut args), [Directive::from(Specifier::Literals(b"ab"))]);
        assert_eq!(args.remaining(), 1);
    }

    #[test]
    fn test_missing_arg() {
        let mut args = ArgList::new(&[]);
        let res = format(b"%d", &mut args, |_| Ok(()));
        assert_eq!(res, Err(Error::MissingArg { index: 0 }));
    }
}
