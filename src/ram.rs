//! A configurable in-memory implementation of the [`Filesystem`] trait.
//!
//! `RamFilesystem` backs the crate's own test suite and serves as the
//! reference for porting the driver seam to real storage. It keeps a flat
//! file table and enforces the rules the facade relies on: files nest only
//! under directories that exist, handles come and go inside the callback,
//! reads past the end return zero.
//!
//! `FILES` bounds the number of entries (files plus directories),
//! `BYTES` the content size per file.

use heapless::Vec;

use crate::{
    driver::{File, FileCallback, FileOpenFlags, Filesystem},
    io::{Error, Read, Result, Write},
    path::{Path, PathBuf},
};

struct Entry<const BYTES: usize> {
    path: PathBuf,
    data: Vec<u8, BYTES>,
}

pub struct RamFilesystem<const FILES: usize, const BYTES: usize> {
    entries: Vec<Entry<BYTES>, FILES>,
    dirs: Vec<PathBuf, FILES>,
    mounted: bool,
    mount_count: usize,
    storage_start: usize,
}

impl<const FILES: usize, const BYTES: usize> RamFilesystem<FILES, BYTES> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            dirs: Vec::new(),
            mounted: false,
            mount_count: 0,
            storage_start: 0,
        }
    }

    /// How often `mount` has been called.
    pub fn mount_count(&self) -> usize {
        self.mount_count
    }

    /// The offset passed to the last `mount` call.
    pub fn storage_start(&self) -> usize {
        self.storage_start
    }

    /// True if a file or directory exists at `path`.
    pub fn contains(&self, path: &Path) -> bool {
        self.entry_index(path).is_some() || self.dir_index(path).is_some()
    }

    /// The raw content of the file at `path`.
    pub fn contents(&self, path: &Path) -> Option<&[u8]> {
        self.entry_index(path)
            .map(|index| self.entries[index].data.as_slice())
    }

    fn entry_index(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| *e.path == *path)
    }

    fn dir_index(&self, path: &Path) -> Option<usize> {
        self.dirs.iter().position(|d| **d == *path)
    }

    fn check_parent(&self, path: &Path) -> Result<()> {
        if let Some((parent, _)) = path.as_str().rsplit_once('/') {
            if !parent.is_empty() && !self.dirs.iter().any(|d| d.as_str() == parent) {
                return Err(Error::NoSuchEntry);
            }
        }
        Ok(())
    }
}

impl<const FILES: usize, const BYTES: usize> Default for RamFilesystem<FILES, BYTES> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const FILES: usize, const BYTES: usize> Filesystem for RamFilesystem<FILES, BYTES> {
    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn mount(&mut self, start_offset: usize) -> Result<()> {
        self.mount_count += 1;
        self.storage_start = start_offset;
        self.mounted = true;
        Ok(())
    }

    fn open_file_with_flags_and_then_unit(
        &mut self,
        flags: FileOpenFlags,
        path: &Path,
        f: FileCallback<'_>,
    ) -> Result<()> {
        if !self.mounted {
            return Err(Error::Io);
        }
        if self.dir_index(path).is_some() {
            return Err(Error::PathIsDir);
        }
        self.check_parent(path)?;

        let index = match self.entry_index(path) {
            Some(index) => {
                if flags.contains(FileOpenFlags::EXCL) {
                    return Err(Error::EntryAlreadyExisted);
                }
                index
            }
            None => {
                if !flags.contains(FileOpenFlags::CREATE) {
                    return Err(Error::NoSuchEntry);
                }
                let entry = Entry {
                    path: PathBuf::from(path),
                    data: Vec::new(),
                };
                self.entries.push(entry).map_err(|_| Error::NoSpace)?;
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        if flags.contains(FileOpenFlags::TRUNCATE) {
            entry.data.clear();
        }
        let mut file = RamFile {
            data: &mut entry.data,
            pos: 0,
            flags,
        };
        f(&mut file)
    }

    fn remove(&mut self, path: &Path) -> Result<()> {
        if !self.mounted {
            return Err(Error::Io);
        }
        if let Some(index) = self.entry_index(path) {
            self.entries.swap_remove(index);
            return Ok(());
        }
        if let Some(index) = self.dir_index(path) {
            let dir = path.as_str();
            let occupied = self.entries.iter().any(|e| {
                e.path.as_str().starts_with(dir)
                    && e.path.as_str().as_bytes().get(dir.len()) == Some(&b'/')
            });
            if occupied {
                return Err(Error::DirNotEmpty);
            }
            self.dirs.swap_remove(index);
            return Ok(());
        }
        Err(Error::NoSuchEntry)
    }

    fn create_dir(&mut self, path: &Path) -> Result<()> {
        if !self.mounted {
            return Err(Error::Io);
        }
        if self.dir_index(path).is_some() || self.entry_index(path).is_some() {
            return Err(Error::EntryAlreadyExisted);
        }
        self.check_parent(path)?;
        self.dirs.push(PathBuf::from(path)).map_err(|_| Error::NoSpace)
    }
}

/// Handle into one entry, live for the duration of a callback.
struct RamFile<'a, const BYTES: usize> {
    data: &'a mut Vec<u8, BYTES>,
    pos: usize,
    flags: FileOpenFlags,
}

impl<const BYTES: usize> Read for RamFile<'_, BYTES> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let available = self.data.len().saturating_sub(self.pos);
        let n = available.min(buf.len());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

impl<const BYTES: usize> Write for RamFile<'_, BYTES> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        if self.flags.contains(FileOpenFlags::APPEND) {
            // append mode writes at the end, wherever the cursor is
            self.data
                .extend_from_slice(data)
                .map_err(|_| Error::NoSpace)?;
            self.pos = self.data.len();
        } else {
            let end = self.pos + data.len();
            if end > BYTES {
                return Err(Error::NoSpace);
            }
            if end > self.data.len() {
                // no panic: end <= BYTES
                self.data.resize_default(end).unwrap();
            }
            self.data[self.pos..end].copy_from_slice(data);
            self.pos = end;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<const BYTES: usize> File for RamFile<'_, BYTES> {
    fn len(&self) -> Result<usize> {
        Ok(self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::RamFilesystem;
    use crate::{
        driver::{FileOpenFlags, Filesystem},
        io::{Error, Read as _, Write as _},
        path,
    };

    const CREATE: FileOpenFlags = FileOpenFlags::WRITE.union(FileOpenFlags::CREATE);

    #[test]
    fn unmounted_is_refused() {
        let mut fs: RamFilesystem<4, 64> = RamFilesystem::new();
        assert_eq!(
            fs.open_file_with_flags_and_then_unit(CREATE, path!("a"), &mut |_| Ok(())),
            Err(Error::Io)
        );
    }

    #[test]
    fn open_without_create_requires_entry() {
        let mut fs: RamFilesystem<4, 64> = RamFilesystem::new();
        fs.mount(0).unwrap();
        assert_eq!(
            fs.open_file_with_flags_and_then_unit(FileOpenFlags::READ, path!("a"), &mut |_| Ok(())),
            Err(Error::NoSuchEntry)
        );
    }

    #[test]
    fn nested_files_need_their_directory() {
        let mut fs: RamFilesystem<4, 64> = RamFilesystem::new();
        fs.mount(0).unwrap();
        assert_eq!(
            fs.open_file_with_flags_and_then_unit(CREATE, path!("d/a"), &mut |_| Ok(())),
            Err(Error::NoSuchEntry)
        );
        fs.create_dir(path!("d")).unwrap();
        fs.open_file_with_flags_and_then_unit(CREATE, path!("d/a"), &mut |_| Ok(()))
            .unwrap();
        assert!(fs.contains(path!("d/a")));
    }

    #[test]
    fn non_empty_directory_is_kept() {
        let mut fs: RamFilesystem<4, 64> = RamFilesystem::new();
        fs.mount(0).unwrap();
        fs.create_dir(path!("d")).unwrap();
        fs.open_file_with_flags_and_then_unit(CREATE, path!("d/a"), &mut |_| Ok(()))
            .unwrap();
        assert_eq!(fs.remove(path!("d")), Err(Error::DirNotEmpty));
        fs.remove(path!("d/a")).unwrap();
        fs.remove(path!("d")).unwrap();
        assert!(!fs.contains(path!("d")));
    }

    #[test]
    fn truncate_clears_append_extends() {
        let mut fs: RamFilesystem<4, 64> = RamFilesystem::new();
        fs.mount(0).unwrap();
        let append = CREATE.union(FileOpenFlags::APPEND);
        fs.open_file_with_flags_and_then_unit(append, path!("a"), &mut |file| {
            file.write_all(b"one")
        })
        .unwrap();
        fs.open_file_with_flags_and_then_unit(append, path!("a"), &mut |file| {
            file.write_all(b"two")
        })
        .unwrap();
        assert_eq!(fs.contents(path!("a")), Some(&b"onetwo"[..]));

        let truncate = CREATE.union(FileOpenFlags::TRUNCATE);
        fs.open_file_with_flags_and_then_unit(truncate, path!("a"), &mut |file| {
            file.write_all(b"three")
        })
        .unwrap();
        assert_eq!(fs.contents(path!("a")), Some(&b"three"[..]));
    }

    #[test]
    fn reads_stop_at_the_end() {
        let mut fs: RamFilesystem<4, 64> = RamFilesystem::new();
        fs.mount(0).unwrap();
        fs.open_file_with_flags_and_then_unit(CREATE, path!("a"), &mut |file| {
            file.write_all(b"hello")
        })
        .unwrap();
        fs.open_file_with_flags_and_then_unit(FileOpenFlags::READ, path!("a"), &mut |file| {
            let mut buf = [0u8; 3];
            assert_eq!(file.read(&mut buf)?, 3);
            assert_eq!(&buf, b"hel");
            assert_eq!(file.read(&mut buf)?, 2);
            assert_eq!(&buf[..2], b"lo");
            assert_eq!(file.read(&mut buf)?, 0);
            Ok(())
        })
        .unwrap();
    }

    #[test]
    fn handle_is_released_on_error_paths() {
        let mut fs: RamFilesystem<4, 8> = RamFilesystem::new();
        fs.mount(0).unwrap();
        let append = CREATE.union(FileOpenFlags::APPEND);
        // overflow the 8-byte entry; the callback fails mid-write
        assert_eq!(
            fs.open_file_with_flags_and_then_unit(append, path!("a"), &mut |file| {
                file.write_all(b"0123456789")
            }),
            Err(Error::NoSpace)
        );
        // the entry is usable again afterwards
        fs.open_file_with_flags_and_then_unit(append, path!("a"), &mut |file| {
            file.write_all(b"ok")
        })
        .unwrap();
    }
}
