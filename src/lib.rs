#![cfg_attr(not(test), no_std)]

//! File operation blocks over embedded filesystems.
//!
//! This crate is the glue between a block-based code editor and an embedded
//! filesystem: each operation in [`Files`] maps to one block the editor can
//! place (append a line, dump a file to serial, persist a numeric setting,
//! ...). The filesystem itself is reached through the traits in [`driver`];
//! port glue implements them over the real storage stack, tests use
//! [`ram::RamFilesystem`].
//!
//! ```
//! use microfiles::{Files, FixedLayout, io::NullSink, ram::RamFilesystem};
//!
//! let fs: RamFilesystem<8, 256> = RamFilesystem::new();
//! let mut files = Files::new(fs, NullSink, &FixedLayout::new(0));
//!
//! files.append_line("log.txt", Some("boot"));
//! files.settings_save_number("volume", 7);
//! assert_eq!(files.settings_read_number("volume"), 7);
//! ```

/// Constants shared by the block operations.
pub mod consts;

/// The error types and core I/O traits.
pub mod io;
pub use io::{Error, Result};

/// The driver seam: `Filesystem`, `File` and `ProgramLayout` traits.
pub mod driver;
pub use driver::{FileOpenFlags, FixedLayout};

/// Paths.
pub mod path;
pub use path::{Path, PathBuf};

/// The `Files` facade.
pub mod ops;
pub use ops::Files;

mod settings;

/// Presentation metadata for the host code generator.
pub mod blocks;

/// An in-memory filesystem for tests and reference ports.
pub mod ram;

/// Creates a path from a string literal.
///
/// Panics and causes a compiler error if the string contains null bytes or
/// non-ascii characters, or is longer than [`PathBuf::MAX_SIZE`][].
///
/// # Examples
///
/// ```
/// use microfiles::{path, Path};
///
/// const SETTINGS: &Path = path!("settings");
/// let root = path!("/");
/// ```
///
/// Illegal values:
///
/// ```compile_fail
/// # use microfiles::{path, Path};
/// const WITH_NULL: &Path = path!("da\0ta");  // does not compile
/// ```
#[macro_export]
macro_rules! path {
    ($path:literal) => {{
        const _PATH: &$crate::path::Path = match $crate::path::Path::from_str($path) {
            Ok(path) => path,
            Err(_) => panic!("invalid path"),
        };
        _PATH
    }};
}
