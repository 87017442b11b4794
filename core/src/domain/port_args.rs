//! Port argument parsing (`3000`, `3000-3005`).

use crate::error::{Error, Result};

/// Widest accepted `start-end` span (`end - start`).
pub const DEFAULT_MAX_RANGE_SPAN: u16 = 100;

/// Expand port arguments into the ordered list of ports to process.
///
/// Each argument is a single port or an inclusive `start-end` range.
/// Ranges expand in ascending order. Any invalid argument rejects the
/// whole list, so nothing is returned on error.
pub fn parse_ports<S: AsRef<str>>(args: &[S], max_span: u16) -> Result<Vec<u16>> {
    let mut ports = Vec::new();

    for arg in args {
        let arg = arg.as_ref();

        match arg.split_once('-') {
            Some((start, end)) if !arg.starts_with('-') => {
                let start = parse_number(start, arg)?;
                let end = parse_number(end, arg)?;

                if start > end {
                    return Err(Error::InvalidRange(arg.to_string()));
                }
                if end - start > i64::from(max_span) {
                    return Err(Error::RangeTooLarge {
                        arg: arg.to_string(),
                        max: max_span,
                    });
                }

                let start = to_port(start)?;
                let end = to_port(end)?;
                ports.extend(start..=end);
            }
            _ => {
                let port = parse_number(arg, arg)?;
                ports.push(to_port(port)?);
            }
        }
    }

    Ok(ports)
}

fn parse_number(s: &str, arg: &str) -> Result<i64> {
    s.parse()
        .map_err(|_| Error::InvalidPort(arg.to_string()))
}

fn to_port(n: i64) -> Result<u16> {
    match u16::try_from(n) {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(Error::PortOutOfRange(n)),
    }
}
