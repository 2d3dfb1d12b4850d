//! Cursor sources
//!
//! A [`CursorSource`] opens a fresh cursor every time a reader rewinds.
//! Opening is lazy: nothing is read until the first rewind.

use super::options::ReaderOptions;
use super::Reader;
use crate::cursor::{Cursor, SliceCursor};
use crate::error::OpenError;
use log::debug;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Something a [`Reader`] can open cursors from
pub trait CursorSource {
    type Cursor: Cursor;

    /// Open a cursor positioned before the first token
    fn open(&mut self) -> Result<Self::Cursor, OpenError>;

    /// Human-readable name of the document, for diagnostics
    fn describe(&self) -> String;
}

impl<S: CursorSource + ?Sized> CursorSource for Box<S> {
    type Cursor = S::Cursor;

    fn open(&mut self) -> Result<Self::Cursor, OpenError> {
        (**self).open()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>, OpenError> {
    let bytes = std::fs::read(path).map_err(|err| OpenError::could_not_open(path, err))?;
    debug!("opened {} ({} bytes)", path.display(), bytes.len());
    Ok(bytes)
}

/// Drain a stream into memory
fn read_all<R: Read>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Document stored in a file, re-read on every open
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    options: ReaderOptions,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, ReaderOptions::default())
    }

    pub fn with_options(path: impl Into<PathBuf>, options: ReaderOptions) -> Self {
        FileSource {
            path: path.into(),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CursorSource for FileSource {
    type Cursor = SliceCursor;

    fn open(&mut self) -> Result<SliceCursor, OpenError> {
        let bytes = read_file(&self.path)?;
        Ok(SliceCursor::with_options(bytes, self.options.clone()))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Document held in memory. The bytes are shared by every cursor opened
/// from this source.
#[derive(Debug, Clone)]
pub struct BufferSource {
    bytes: Arc<[u8]>,
    options: ReaderOptions,
}

impl BufferSource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::with_options(bytes, ReaderOptions::default())
    }

    pub fn with_options(bytes: impl Into<Arc<[u8]>>, options: ReaderOptions) -> Self {
        BufferSource {
            bytes: bytes.into(),
            options,
        }
    }
}

impl CursorSource for BufferSource {
    type Cursor = SliceCursor;

    fn open(&mut self) -> Result<SliceCursor, OpenError> {
        Ok(SliceCursor::with_options(Arc::clone(&self.bytes), self.options.clone()))
    }

    fn describe(&self) -> String {
        format!("<buffer of {} bytes>", self.bytes.len())
    }
}

/// Document produced as a byte stream. `producer` is called on every
/// open and the stream it returns is read to the end.
pub struct StreamSource<F> {
    producer: F,
    options: ReaderOptions,
}

impl<F, R> StreamSource<F>
where
    F: FnMut() -> std::io::Result<R>,
    R: Read,
{
    pub fn new(producer: F) -> Self {
        Self::with_options(producer, ReaderOptions::default())
    }

    pub fn with_options(producer: F, options: ReaderOptions) -> Self {
        StreamSource { producer, options }
    }
}

impl<F, R> CursorSource for StreamSource<F>
where
    F: FnMut() -> std::io::Result<R>,
    R: Read,
{
    type Cursor = SliceCursor;

    fn open(&mut self) -> Result<SliceCursor, OpenError> {
        let stream = (self.producer)()?;
        let bytes = read_all(stream)?;
        debug!("drained stream ({} bytes)", bytes.len());
        Ok(SliceCursor::with_options(bytes, self.options.clone()))
    }

    fn describe(&self) -> String {
        "<stream>".to_string()
    }
}

/// Cursors produced by a closure. A producer error becomes
/// [`OpenError::InvalidProducerResult`].
pub struct FnSource<F> {
    producer: F,
}

impl<F> FnSource<F> {
    pub fn new(producer: F) -> Self {
        FnSource { producer }
    }
}

impl<F, C, E> CursorSource for FnSource<F>
where
    F: FnMut() -> Result<C, E>,
    C: Cursor,
    E: fmt::Display,
{
    type Cursor = C;

    fn open(&mut self) -> Result<C, OpenError> {
        (self.producer)().map_err(|err| OpenError::invalid_producer_result(err.to_string()))
    }

    fn describe(&self) -> String {
        "<producer>".to_string()
    }
}

/// Resource descriptor accepted by [`ReaderFactory::create`]
#[derive(Debug, Clone)]
pub enum Resource {
    File(PathBuf),
    Buffer(Arc<[u8]>),
}

impl Resource {
    /// Type tag checked by [`ReaderFactory::supports`]
    pub fn resource_type(&self) -> &'static str {
        match self {
            Resource::File(_) => "file",
            Resource::Buffer(_) => "buffer",
        }
    }
}

/// Source behind a [`Resource`]
#[derive(Debug, Clone)]
pub struct ResourceSource {
    resource: Resource,
    options: ReaderOptions,
}

impl ResourceSource {
    pub fn new(resource: Resource, options: ReaderOptions) -> Self {
        ResourceSource { resource, options }
    }

    pub fn resource(&self) -> &Resource {
        &self.resource
    }
}

impl CursorSource for ResourceSource {
    type Cursor = SliceCursor;

    fn open(&mut self) -> Result<SliceCursor, OpenError> {
        let options = self.options.clone();
        match &self.resource {
            Resource::File(path) => Ok(SliceCursor::with_options(read_file(path)?, options)),
            Resource::Buffer(bytes) => Ok(SliceCursor::with_options(Arc::clone(bytes), options)),
        }
    }

    fn describe(&self) -> String {
        match &self.resource {
            Resource::File(path) => path.display().to_string(),
            Resource::Buffer(bytes) => format!("<buffer of {} bytes>", bytes.len()),
        }
    }
}

/// Builds readers with shared default options
#[derive(Debug, Clone, Default)]
pub struct ReaderFactory {
    options: ReaderOptions,
}

impl ReaderFactory {
    const RESOURCE_TYPES: [&'static str; 2] = ["file", "buffer"];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ReaderOptions) -> Self {
        ReaderFactory { options }
    }

    /// Options used by readers that are not given their own
    pub fn default_options(&self) -> &ReaderOptions {
        &self.options
    }

    pub fn set_default_options(&mut self, options: ReaderOptions) {
        self.options = options;
    }

    /// True when [`create`](Self::create) accepts resources of this type
    pub fn supports(&self, resource_type: &str) -> bool {
        Self::RESOURCE_TYPES.contains(&resource_type)
    }

    pub fn create(&self, resource: Resource) -> Reader<ResourceSource> {
        Reader::new(ResourceSource::new(resource, self.options.clone()))
    }

    pub fn open(&self, path: impl Into<PathBuf>) -> Reader<FileSource> {
        self.open_with(path, self.options.clone())
    }

    pub fn open_with(&self, path: impl Into<PathBuf>, options: ReaderOptions) -> Reader<FileSource> {
        Reader::new(FileSource::with_options(path, options))
    }

    pub fn from_bytes(&self, bytes: impl Into<Arc<[u8]>>) -> Reader<BufferSource> {
        Reader::new(BufferSource::with_options(bytes, self.options.clone()))
    }

    pub fn from_stream<F, R>(&self, producer: F) -> Reader<StreamSource<F>>
    where
        F: FnMut() -> std::io::Result<R>,
        R: Read,
    {
        Reader::new(StreamSource::with_options(producer, self.options.clone()))
    }

    pub fn from_fn<F, C, E>(&self, producer: F) -> Reader<FnSource<F>>
    where
        F: FnMut() -> Result<C, E>,
        C: Cursor,
        E: fmt::Display,
    {
        Reader::new(FnSource::new(producer))
    }
}
