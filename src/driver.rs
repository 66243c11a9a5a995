//! The filesystem driver seam.
//!
//! Users of this library provide the filesystem collaborator by implementing
//! [`Filesystem`] over their storage stack, and a [`ProgramLayout`] telling
//! the facade where file storage may begin. The facade never touches blocks,
//! wear leveling or directory indexing itself; all of that stays behind
//! these traits.

use bitflags::bitflags;

use crate::{
    io::{Read, Result, Write},
    path::Path,
};

bitflags! {
    /// Definition of file open flags which can be mixed and matched as
    /// appropriate. These definitions are reminiscent of the ones defined
    /// by POSIX.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct FileOpenFlags: i32 {
        /// Open file in read only mode.
        const READ = 0x1;
        /// Open file in write only mode.
        const WRITE = 0x2;
        /// Open file for reading and writing.
        const READWRITE = Self::READ.bits() | Self::WRITE.bits();
        /// Create the file if it does not exist.
        const CREATE = 0x0100;
        /// Fail if creating a file that already exists.
        const EXCL = 0x0200;
        /// Truncate the file if it already exists.
        const TRUNCATE = 0x0400;
        /// Open the file in append only mode.
        const APPEND = 0x0800;
    }
}

/// An open file handle, live only for the duration of a
/// [`Filesystem::open_file_with_flags_and_then_unit`] callback.
pub trait File: Read + Write {
    /// Size of the file in bytes.
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

pub type FileCallback<'a> = &'a mut dyn FnMut(&mut dyn File) -> Result<()>;

/// The filesystem collaborator.
///
/// The callback-style file access is deliberate: the implementation opens
/// the file, runs the callback, and releases the handle on every exit path,
/// error returns included. Callers cannot leak a handle.
pub trait Filesystem {
    /// True once [`mount`](Self::mount) has succeeded.
    fn is_mounted(&self) -> bool;

    /// Bring up the filesystem, claiming storage from `start_offset` on.
    fn mount(&mut self, start_offset: usize) -> Result<()>;

    /// Open `path` with `flags`, run `f` on the handle, release the handle.
    fn open_file_with_flags_and_then_unit(
        &mut self,
        flags: FileOpenFlags,
        path: &Path,
        f: FileCallback<'_>,
    ) -> Result<()>;

    /// Remove a file or (empty) directory.
    fn remove(&mut self, path: &Path) -> Result<()>;

    /// Creates a new, empty directory at the provided path.
    fn create_dir(&mut self, path: &Path) -> Result<()>;
}

/// Where the loaded program image ends and file storage may begin.
pub trait ProgramLayout {
    fn after_program_page(&self) -> usize;
}

/// A [`ProgramLayout`] with a fixed storage start, for ports whose linker
/// script already reserves the file region, and for tests.
pub struct FixedLayout {
    after_program: usize,
}

impl FixedLayout {
    pub const fn new(after_program: usize) -> Self {
        Self { after_program }
    }
}

impl ProgramLayout for FixedLayout {
    fn after_program_page(&self) -> usize {
        self.after_program
    }
}
