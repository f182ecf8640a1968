//! Seekable byte-stream handles carried by [`crate::Payload::Stream`].
//!
//! Streams are shared handles: the data source, the inspector and any
//! downstream consumer may hold the same stream, so every operation works
//! through `&self` and implementations keep their cursor behind a `RefCell`.

use bitflags::bitflags;
use std::cell::RefCell;
use std::fmt;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::rc::Rc;

bitflags! {
    /// Capabilities advertised by a stream.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StreamCaps: u8 {
        /// The stream can be read.
        const READ = 0b001;
        /// The stream position can be changed.
        const SEEK = 0b010;
        /// The stream can be written.
        const WRITE = 0b100;
    }
}

/// A readable, possibly seekable byte stream.
pub trait ByteStream: fmt::Debug {
    /// Name of the concrete stream type, as shown in reports.
    fn type_name(&self) -> &str;

    /// Capabilities of this stream.
    fn capabilities(&self) -> StreamCaps;

    /// Total length in bytes.
    fn len(&self) -> io::Result<u64>;

    /// Current read position.
    fn position(&self) -> io::Result<u64>;

    /// Move the read position.
    fn set_position(&self, pos: u64) -> io::Result<()>;

    /// Read into `buf`, returning the number of bytes read.
    fn read(&self, buf: &mut [u8]) -> io::Result<usize>;

    /// Whether the stream holds no bytes.
    fn is_empty(&self) -> io::Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Shorthand for `capabilities().contains(StreamCaps::READ)`.
    fn can_read(&self) -> bool {
        self.capabilities().contains(StreamCaps::READ)
    }

    /// Shorthand for `capabilities().contains(StreamCaps::SEEK)`.
    fn can_seek(&self) -> bool {
        self.capabilities().contains(StreamCaps::SEEK)
    }

    /// Shorthand for `capabilities().contains(StreamCaps::WRITE)`.
    fn can_write(&self) -> bool {
        self.capabilities().contains(StreamCaps::WRITE)
    }
}

/// Read from `stream` until `buf` is full or the stream is exhausted.
pub fn read_up_to(stream: &dyn ByteStream, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match stream.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read the first `limit` bytes of a stream without disturbing its position.
///
/// The original position is restored on every exit path, including a failed
/// read. A failed read takes precedence over a failed restore.
pub fn peek_head(stream: &dyn ByteStream, limit: usize) -> io::Result<Vec<u8>> {
    let original = stream.position()?;

    let peeked = stream.set_position(0).and_then(|()| {
        let mut buf = vec![0u8; limit];
        let n = read_up_to(stream, &mut buf)?;
        buf.truncate(n);
        Ok(buf)
    });
    let restored = stream.set_position(original);

    let bytes = peeked?;
    restored?;
    Ok(bytes)
}

/// Shared in-memory stream.
///
/// Clones share the same buffer and cursor, so a clone handed to a consumer
/// observes every position change made through another clone.
#[derive(Debug, Clone)]
pub struct MemoryStream {
    cursor: Rc<RefCell<Cursor<Vec<u8>>>>,
    caps: StreamCaps,
}

impl MemoryStream {
    /// Create a readable, seekable stream over `data`, positioned at 0.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            cursor: Rc::new(RefCell::new(Cursor::new(data.into()))),
            caps: StreamCaps::READ | StreamCaps::SEEK,
        }
    }

    /// Override the advertised capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, caps: StreamCaps) -> Self {
        self.caps = caps;
        self
    }
}

impl ByteStream for MemoryStream {
    fn type_name(&self) -> &str {
        "MemoryStream"
    }

    fn capabilities(&self) -> StreamCaps {
        self.caps
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.cursor.borrow().get_ref().len() as u64)
    }

    fn position(&self) -> io::Result<u64> {
        Ok(self.cursor.borrow().position())
    }

    fn set_position(&self, pos: u64) -> io::Result<()> {
        if !self.can_seek() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Stream does not support seeking",
            ));
        }
        self.cursor.borrow_mut().set_position(pos);
        Ok(())
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        if !self.can_read() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "Stream does not support reading",
            ));
        }
        self.cursor.borrow_mut().read(buf)
    }
}

/// Shared stream over any seekable reader, e.g. a [`std::fs::File`].
pub struct ReaderStream<R> {
    inner: Rc<RefCell<R>>,
    type_name: String,
}

impl<R> ReaderStream<R> {
    /// Wrap `reader`, reporting it under `type_name`.
    pub fn new(reader: R, type_name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(reader)),
            type_name: type_name.into(),
        }
    }
}

impl<R> Clone for ReaderStream<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
            type_name: self.type_name.clone(),
        }
    }
}

impl<R> fmt::Debug for ReaderStream<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderStream")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl<R: Read + Seek> ByteStream for ReaderStream<R> {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn capabilities(&self) -> StreamCaps {
        StreamCaps::READ | StreamCaps::SEEK
    }

    fn len(&self) -> io::Result<u64> {
        let mut inner = self.inner.borrow_mut();
        let current = inner.stream_position()?;
        let end = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(current))?;
        Ok(end)
    }

    fn position(&self) -> io::Result<u64> {
        self.inner.borrow_mut().stream_position()
    }

    fn set_position(&self, pos: u64) -> io::Result<()> {
        self.inner.borrow_mut().seek(SeekFrom::Start(pos)).map(|_| ())
    }

    fn read(&self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.borrow_mut().read(buf)
    }
}
