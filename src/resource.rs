//! ResourceArc wrapper
//!
//! Persistent reader state shared with the BEAM. The reader sits behind a
//! mutex so processes holding the same reference take turns.

use crate::error::ReaderError;
use crate::node::Node;
use crate::reader::{Reader, ReaderFactory, ReaderOptions, Resource, ResourceSource};
use rustler::ResourceArc;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Reader plus the iteration bookkeeping that has to survive between NIF
/// calls
pub struct ReaderState {
    reader: Reader<ResourceSource>,
    started: bool,
    /// Error hit while advancing past the last node handed out
    pending: Option<ReaderError>,
}

impl ReaderState {
    fn rewind(&mut self) -> Result<(), ReaderError> {
        self.started = true;
        self.pending = None;
        self.reader.rewind()
    }

    /// Take up to `max` `(path, node)` pairs, rewinding on first use
    fn take(&mut self, max: usize) -> Result<Vec<(String, Node)>, ReaderError> {
        if let Some(err) = self.pending.take() {
            return Err(err);
        }
        if !self.started {
            self.rewind()?;
        }

        let mut nodes = Vec::with_capacity(max.min(1024));
        while nodes.len() < max && self.reader.valid() {
            let key = self.reader.key()?;
            let node = self.reader.current()?;
            nodes.push((key, node));
            if let Err(err) = self.reader.advance() {
                self.pending = Some(err);
                break;
            }
        }
        Ok(nodes)
    }
}

pub struct ReaderResource {
    pub inner: Mutex<ReaderState>,
}

impl ReaderResource {
    fn from_resource(resource: Resource, options: ReaderOptions) -> Self {
        let reader = ReaderFactory::with_options(options).create(resource);
        ReaderResource {
            inner: Mutex::new(ReaderState {
                reader,
                started: false,
                pending: None,
            }),
        }
    }

    /// Reader over an in-memory document; nothing is parsed until the
    /// first read
    pub fn from_bytes(bytes: Vec<u8>, options: ReaderOptions) -> Self {
        Self::from_resource(Resource::Buffer(bytes.into()), options)
    }

    /// Reader over a file, opened right away so open failures surface here
    pub fn open(path: impl Into<PathBuf>, options: ReaderOptions) -> Result<Self, ReaderError> {
        let resource = Self::from_resource(Resource::File(path.into()), options);
        resource.state().rewind()?;
        Ok(resource)
    }

    fn state(&self) -> MutexGuard<'_, ReaderState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn take(&self, max: usize) -> Result<Vec<(String, Node)>, ReaderError> {
        self.state().take(max)
    }

    pub fn rewind(&self) -> Result<(), ReaderError> {
        self.state().rewind()
    }
}

#[rustler::resource_impl]
impl rustler::Resource for ReaderResource {}

/// Type alias for the ResourceArc
pub type ReaderRef = ResourceArc<ReaderResource>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn paths(nodes: &[(String, Node)]) -> Vec<&str> {
        nodes.iter().map(|(path, _)| path.as_str()).collect()
    }

    #[test]
    fn test_take_in_batches() {
        let resource = ReaderResource::from_bytes(b"<r><a/><a/></r>".to_vec(), ReaderOptions::default());
        let first = resource.take(2).unwrap();
        assert_eq!(paths(&first), vec!["/r", "/r/a"]);
        let rest = resource.take(10).unwrap();
        assert_eq!(paths(&rest), vec!["/r/a[2]", "/r"]);
        assert!(resource.take(10).unwrap().is_empty());

        resource.rewind().unwrap();
        assert_eq!(paths(&resource.take(1).unwrap()), vec!["/r"]);
    }

    #[test]
    fn test_parse_error_follows_last_good_batch() {
        let resource = ReaderResource::from_bytes(b"<r><a></r>".to_vec(), ReaderOptions::strict_defaults());
        assert_eq!(paths(&resource.take(10).unwrap()), vec!["/r", "/r/a"]);
        assert!(matches!(resource.take(10), Err(ReaderError::Parse(_))));
    }

    #[test]
    fn test_open_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ReaderResource::open(dir.path().join("none.xml"), ReaderOptions::default());
        assert!(matches!(result, Err(ReaderError::Open(_))));
    }

    #[test]
    fn test_open_reads_file_eagerly() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"<doc>hi</doc>").unwrap();
        let resource = ReaderResource::open(file.path(), ReaderOptions::default()).unwrap();
        assert_eq!(paths(&resource.take(5).unwrap()), vec!["/doc", "/doc/#text", "/doc"]);
    }
}
