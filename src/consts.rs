use crate::path::Path;

/// Number of bytes transferred per read in the chunked read loops.
pub const CHUNK_SIZE: usize = 32;

/// Maximum length of a stored setting value, in bytes.
///
/// Decimal `i32` text needs at most 11 bytes; the extra headroom keeps the
/// accumulation loop meaningful for hand-edited entries.
pub const SETTING_MAX: usize = 64;

/// Line terminator appended by `append_line`.
pub const NEW_LINE: &str = "\r\n";

pub const TAB: &str = "\t";

/// Reserved directory holding the settings entries.
pub const SETTINGS_DIR: &Path = crate::path!("settings");
