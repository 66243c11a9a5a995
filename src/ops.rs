//! The file operation blocks.
//!
//! Each public method on [`Files`] backs exactly one block in the editor
//! toolbox (see [`crate::blocks`]). The block contract is silent: operations
//! neither return errors nor panic on them; failures are logged through the
//! `log` facade and otherwise dropped, so broken storage degrades into
//! missing output instead of a crashed program.

use log::{debug, warn};

use crate::{
    consts::{CHUNK_SIZE, NEW_LINE},
    driver::{File, FileOpenFlags, Filesystem, ProgramLayout},
    io::{Error, Read as _, Result, SerialSink, Write as _},
    path::{Path, PathBuf},
    settings::decimal,
};

use heapless::Vec;

const APPEND: FileOpenFlags = FileOpenFlags::WRITE
    .union(FileOpenFlags::CREATE)
    .union(FileOpenFlags::APPEND);

/// The file operations facade.
///
/// Owns the filesystem driver and the serial sink; constructed once at
/// process start and threaded through the generated program. The filesystem
/// is mounted lazily, on the first operation that needs it.
pub struct Files<F: Filesystem, S: SerialSink> {
    fs: F,
    serial: S,
    storage_start: usize,
}

impl<F: Filesystem, S: SerialSink> Files<F, S> {
    /// Builds the facade. Does not touch storage; mounting happens on first
    /// use, against the offset the layout reports here.
    pub fn new(fs: F, serial: S, layout: &dyn ProgramLayout) -> Self {
        Self {
            fs,
            serial,
            storage_start: layout.after_program_page(),
        }
    }

    /// Deconstruct `Files`, handing back the driver and the sink.
    pub fn into_inner(self) -> (F, S) {
        (self.fs, self.serial)
    }

    /// Idempotent mount guard. Every operation passes through here before a
    /// handle is opened.
    fn mount_if_needed(&mut self) -> Result<()> {
        if self.fs.is_mounted() {
            return Ok(());
        }
        debug!("mounting filesystem at offset {}", self.storage_start);
        self.fs.mount(self.storage_start)
    }

    /// Scoped file access: mount, open, run `f`, release on every exit path.
    pub(crate) fn with_file<R>(
        &mut self,
        flags: FileOpenFlags,
        path: &Path,
        mut f: impl FnMut(&mut dyn File) -> Result<R>,
    ) -> Result<R> {
        self.mount_if_needed()?;
        let mut result = Err(Error::Io);
        self.fs
            .open_file_with_flags_and_then_unit(flags, path, &mut |file| {
                result = Ok(f(file)?);
                Ok(())
            })?;
        result
    }

    pub(crate) fn ensure_dir(&mut self, path: &Path) -> Result<()> {
        self.mount_if_needed()?;
        match self.fs.create_dir(path) {
            Ok(()) | Err(Error::EntryAlreadyExisted) => Ok(()),
            Err(err) => Err(err),
        }
    }

    /// Appends text and a new line to a file.
    ///
    /// With `None` for `text`, only the line terminator is appended.
    pub fn append_line(&mut self, filename: &str, text: Option<&str>) {
        if let Err(err) = self.try_append_line(filename, text) {
            warn!("append_line({}): {:?}", filename, err);
        }
    }

    fn try_append_line(&mut self, filename: &str, text: Option<&str>) -> Result<()> {
        let path = PathBuf::try_from(filename)?;
        self.with_file(APPEND, &path, |file| {
            if let Some(text) = text {
                file.write_all(text.as_bytes())?;
            }
            file.write_all(NEW_LINE.as_bytes())
        })
    }

    /// Appends text to a file, verbatim.
    ///
    /// With `None` for `text` this is a no-op: the file is not created.
    pub fn append_string(&mut self, filename: &str, text: Option<&str>) {
        let Some(text) = text else {
            return;
        };
        if let Err(err) = self.try_append(filename, text.as_bytes()) {
            warn!("append_string({}): {:?}", filename, err);
        }
    }

    /// Appends the decimal text of `value` to a file.
    pub fn append_number(&mut self, filename: &str, value: i32) {
        if let Err(err) = self.try_append(filename, decimal(value).as_bytes()) {
            warn!("append_number({}): {:?}", filename, err);
        }
    }

    /// Appends raw bytes to the end of a file.
    pub fn append_buffer(&mut self, filename: &str, buffer: &[u8]) {
        if let Err(err) = self.try_append(filename, buffer) {
            warn!("append_buffer({}): {:?}", filename, err);
        }
    }

    fn try_append(&mut self, filename: &str, data: &[u8]) -> Result<()> {
        let path = PathBuf::try_from(filename)?;
        self.with_file(APPEND, &path, |file| file.write_all(data))
    }

    /// Reads the content of the file and forwards it to the serial sink.
    ///
    /// The transfer runs in [`CHUNK_SIZE`] slices and stops at the first
    /// read that returns no data.
    pub fn read_to_serial(&mut self, filename: &str) {
        if let Err(err) = self.try_read_to_serial(filename) {
            warn!("read_to_serial({}): {:?}", filename, err);
        }
    }

    fn try_read_to_serial(&mut self, filename: &str) -> Result<()> {
        let path = PathBuf::try_from(filename)?;
        self.mount_if_needed()?;
        // destructured so the sink stays reachable inside the callback
        let Self { fs, serial, .. } = self;
        fs.open_file_with_flags_and_then_unit(FileOpenFlags::READ, &path, &mut |file| {
            let mut chunk = [0u8; CHUNK_SIZE];
            loop {
                let read = file.read(&mut chunk)?;
                if read == 0 {
                    break;
                }
                serial.send(&chunk[..read]);
            }
            Ok(())
        })
    }

    /// Reads the entire file into a bounded buffer.
    ///
    /// Content beyond the buffer capacity is dropped; a missing file, like
    /// any other failure, yields an empty buffer.
    pub fn read<const N: usize>(&mut self, filename: &str) -> Vec<u8, N> {
        match self.try_read(filename) {
            Ok(contents) => contents,
            Err(err) => {
                debug!("read({}): {:?}", filename, err);
                Vec::new()
            }
        }
    }

    fn try_read<const N: usize>(&mut self, filename: &str) -> Result<Vec<u8, N>> {
        let path = PathBuf::try_from(filename)?;
        self.with_file(FileOpenFlags::READ, &path, |file| {
            let len = file.len()?;
            if len > N {
                debug!("read({}): keeping {} of {} bytes", filename, N, len);
            }
            let mut contents: Vec<u8, N> = Vec::new();
            // no panic by construction
            contents.resize_default(contents.capacity()).unwrap();
            let mut filled = 0;
            while filled < N {
                let read = file.read(&mut contents[filled..])?;
                if read == 0 {
                    break;
                }
                filled += read;
            }
            contents.truncate(filled);
            Ok(contents)
        })
    }

    /// Removes the file. There is no undo for this operation.
    pub fn remove(&mut self, filename: &str) {
        if let Err(err) = self.try_remove(filename) {
            warn!("remove({}): {:?}", filename, err);
        }
    }

    fn try_remove(&mut self, filename: &str) -> Result<()> {
        let path = PathBuf::try_from(filename)?;
        self.mount_if_needed()?;
        self.fs.remove(&path)
    }

    /// Ensures the named directory exists.
    ///
    /// `name` is the fully qualified path; an already existing directory
    /// counts as success.
    pub fn create_directory(&mut self, name: &str) {
        if let Err(err) = self.try_create_directory(name) {
            warn!("create_directory({}): {:?}", name, err);
        }
    }

    fn try_create_directory(&mut self, name: &str) -> Result<()> {
        let path = PathBuf::try_from(name)?;
        self.ensure_dir(&path)
    }
}
