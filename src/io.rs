//! Traits and types for core I/O functionality.

use ufmt::derive::uDebug;

/// The `Read` trait allows for reading bytes from a file.
pub trait Read {
    /// Read at most buf.len() bytes.
    /// Upon success, return how many bytes were read.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    fn read_exact(&mut self, mut buf: &mut [u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.read(buf) {
                Ok(0) => break,
                Ok(n) => {
                    let tmp = buf;
                    buf = &mut tmp[n..];
                }
                Err(e) => return Err(e),
            }
        }

        if !buf.is_empty() {
            Err(Error::Io)
        } else {
            Ok(())
        }
    }
}

/// The `Write` trait allows for writing bytes to a file.
///
/// By analogy with `std::io::Write`, we also define a `flush()` method.
/// Whether writes land before flush is up to the driver's caches.
pub trait Write {
    /// Write at most data.len() bytes.
    /// Upon success, return how many bytes were written.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Write out all pending writes to storage.
    fn flush(&mut self) -> Result<()>;

    fn write_all(&mut self, mut buf: &[u8]) -> Result<()> {
        while !buf.is_empty() {
            match self.write(buf) {
                Ok(0) => {
                    // failed to write whole buffer
                    return Err(Error::Io);
                }
                Ok(n) => buf = &buf[n..],
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

/// Byte sink for `read_to_serial`, implemented by port glue over the board
/// UART (or whatever transport the editor console listens on).
pub trait SerialSink {
    fn send(&mut self, bytes: &[u8]);
}

/// A sink that discards everything.
pub struct NullSink;

impl SerialSink for NullSink {
    fn send(&mut self, _bytes: &[u8]) {}
}

pub type Result<T> = core::result::Result<T, Error>;

/// Definition of errors that might be returned by filesystem functionality.
#[derive(Clone, Copy, Debug, PartialEq, uDebug)]
pub enum Error {
    /// Input / output error occurred.
    Io,
    /// File or filesystem was corrupt.
    Corruption,
    /// No entry found with that name.
    NoSuchEntry,
    /// File or directory already exists.
    EntryAlreadyExisted,
    /// Path name is not a directory.
    PathNotDir,
    /// Path specification is to a directory.
    PathIsDir,
    /// Directory was not empty.
    DirNotEmpty,
    /// Bad file descriptor.
    BadFileDescriptor,
    /// File is too big.
    FileTooBig,
    /// Incorrect value specified to function.
    Invalid,
    /// No space left available for operation.
    NoSpace,
    /// No memory available for completing request.
    NoMemory,
    /// Filename too long
    FilenameTooLong,
    /// Unknown error occurred, integer code specified.
    Unknown(i32),
}

impl From<crate::path::PathError> for Error {
    fn from(error: crate::path::PathError) -> Self {
        match error {
            crate::path::PathError::TooLarge => Error::FilenameTooLong,
            _ => Error::Invalid,
        }
    }
}
