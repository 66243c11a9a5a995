//! Numeric settings, persisted as decimal text under [`SETTINGS_DIR`].

use core::fmt::Write as _;

use heapless::{String, Vec};
use log::{debug, warn};

use crate::{
    consts::{CHUNK_SIZE, SETTINGS_DIR, SETTING_MAX},
    driver::{FileOpenFlags, Filesystem},
    io::{Error, Read as _, Result, SerialSink, Write as _},
    ops::Files,
    path::{Path, PathBuf},
};

impl<F: Filesystem, S: SerialSink> Files<F, S> {
    /// Writes a number setting, overwriting any prior value.
    ///
    /// `name` must be usable as a filename component, e.g. `"volume"`.
    pub fn settings_save_number(&mut self, name: &str, value: i32) {
        if let Err(err) = self.try_settings_save_number(name, value) {
            warn!("settings_save_number({}): {:?}", name, err);
        }
    }

    fn try_settings_save_number(&mut self, name: &str, value: i32) -> Result<()> {
        let path = setting_path(name)?;
        self.ensure_dir(SETTINGS_DIR)?;
        self.with_file(
            FileOpenFlags::WRITE | FileOpenFlags::CREATE | FileOpenFlags::TRUNCATE,
            &path,
            |file| file.write_all(decimal(value).as_bytes()),
        )
    }

    /// Reads a number setting, -1 if not found.
    ///
    /// A stored -1 is indistinguishable from an absent setting; callers that
    /// need negative values must encode around the sentinel.
    pub fn settings_read_number(&mut self, name: &str) -> i32 {
        match self.try_settings_read_number(name) {
            Ok(value) => value,
            Err(Error::NoSuchEntry) => -1,
            Err(err) => {
                debug!("settings_read_number({}): {:?}", name, err);
                -1
            }
        }
    }

    fn try_settings_read_number(&mut self, name: &str) -> Result<i32> {
        let path = setting_path(name)?;
        self.with_file(FileOpenFlags::READ, &path, |file| {
            let mut text: Vec<u8, SETTING_MAX> = Vec::new();
            let mut chunk = [0u8; CHUNK_SIZE];
            loop {
                let read = file.read(&mut chunk)?;
                if read == 0 {
                    break;
                }
                // keep what fits; no numeric value overflows SETTING_MAX
                if text.extend_from_slice(&chunk[..read]).is_err() {
                    break;
                }
            }
            Ok(parse_decimal(&text))
        })
    }
}

fn setting_path(name: &str) -> Result<PathBuf> {
    let name = Path::from_str(name)?;
    let path = SETTINGS_DIR.join(name)?;
    Ok(path)
}

/// Decimal text of `value`. `i32` text is at most 11 bytes.
pub(crate) fn decimal(value: i32) -> String<16> {
    let mut s = String::new();
    // infallible: the buffer outsizes any i32
    let _ = write!(&mut s, "{}", value);
    s
}

/// Best-effort decimal parse: optional leading whitespace and sign, digits
/// up to the first non-digit. Anything else yields 0.
pub(crate) fn parse_decimal(text: &[u8]) -> i32 {
    let mut i = 0;
    while i < text.len() && text[i].is_ascii_whitespace() {
        i += 1;
    }
    let negative = match text.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };
    // accumulate negated so that i32::MIN parses exactly
    let mut value: i32 = 0;
    while let Some(byte) = text.get(i) {
        if !byte.is_ascii_digit() {
            break;
        }
        value = value
            .saturating_mul(10)
            .saturating_sub((byte - b'0') as i32);
        i += 1;
    }
    if negative {
        value
    } else {
        value.checked_neg().unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::{decimal, parse_decimal};

    #[test]
    fn decimal_text() {
        assert_eq!(decimal(0).as_str(), "0");
        assert_eq!(decimal(7).as_str(), "7");
        assert_eq!(decimal(-12345).as_str(), "-12345");
        assert_eq!(decimal(i32::MIN).as_str(), "-2147483648");
    }

    #[test]
    fn parse_plain() {
        assert_eq!(parse_decimal(b"0"), 0);
        assert_eq!(parse_decimal(b"42"), 42);
        assert_eq!(parse_decimal(b"-7"), -7);
        assert_eq!(parse_decimal(b"+7"), 7);
    }

    #[test]
    fn parse_best_effort() {
        assert_eq!(parse_decimal(b""), 0);
        assert_eq!(parse_decimal(b"ab"), 0);
        assert_eq!(parse_decimal(b"12ab"), 12);
        assert_eq!(parse_decimal(b"  -7"), -7);
        assert_eq!(parse_decimal(b"- 7"), 0);
    }

    #[test]
    fn parse_extremes() {
        assert_eq!(parse_decimal(b"2147483647"), i32::MAX);
        assert_eq!(parse_decimal(b"-2147483648"), i32::MIN);
        // out of range saturates rather than wrapping
        assert_eq!(parse_decimal(b"99999999999"), i32::MAX);
        assert_eq!(parse_decimal(b"-99999999999"), i32::MIN);
    }
}
