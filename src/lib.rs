//! xmlwalk - streaming XML node reader
//!
//! Walks an XML document one token at a time and turns every token into
//! an immutable [`Node`] snapshot addressed by an XPath-like path:
//!
//! ```
//! use xmlwalk::{BufferSource, Reader};
//!
//! let mut reader = Reader::new(BufferSource::new(&b"<r><a/><a/></r>"[..]));
//! let paths: Vec<String> = reader
//!     .nodes()
//!     .map(|item| item.map(|(path, _)| path))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(paths, ["/r", "/r/a", "/r/a[2]", "/r"]);
//! ```
//!
//! Layers:
//! - core: byte scanner, tokenizer, entity and attribute decoding
//! - cursor: forward-only token cursor with namespace and `xml:lang` scope
//! - node: snapshots, type flags, builder and path tracking
//! - reader: the projecting reader and its cursor sources
//!
//! The crate also builds as a NIF library for `Elixir.XmlWalk.Native`.

use rustler::{Binary, Encoder, Env, NifResult, ResourceArc, Term};

pub mod core;
pub mod cursor;
pub mod error;
pub mod node;
pub mod reader;
mod resource;
mod term;

pub use cursor::{Cursor, CursorKind, SliceCursor};
pub use error::{BuildError, NodeError, OpenError, ReaderError};
pub use node::{Namespace, Node, NodeBuilder, NodeType, PathTracker};
pub use reader::{
    BufferSource, CursorSource, FileSource, FnSource, Nodes, Reader, ReaderFactory, ReaderOptions,
    Resource, StreamSource,
};

use resource::{ReaderRef, ReaderResource};
use term::{error_to_term, nodes_to_term};

// ============================================================================
// Allocator Configuration
// ============================================================================

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

// ============================================================================
// Reader Resource
// ============================================================================

/// Create a lenient reader over a binary
#[rustler::nif]
fn reader_new(input: Binary) -> ReaderRef {
    ResourceArc::new(ReaderResource::from_bytes(
        input.as_slice().to_vec(),
        ReaderOptions::default(),
    ))
}

/// Create a reader that stops on the first well-formedness error
#[rustler::nif]
fn reader_new_strict(input: Binary) -> ReaderRef {
    ResourceArc::new(ReaderResource::from_bytes(
        input.as_slice().to_vec(),
        ReaderOptions::strict_defaults(),
    ))
}

/// Open a file reader (returns {:ok, ref} or {:error, reason})
#[rustler::nif(schedule = "DirtyIo")]
fn reader_open<'a>(env: Env<'a>, path: String) -> Term<'a> {
    match ReaderResource::open(path, ReaderOptions::default()) {
        Ok(resource) => (term::ok(), ResourceArc::new(resource)).encode(env),
        Err(err) => error_to_term(env, &err),
    }
}

/// Take up to `max` {path, node} pairs (or {:error, reason})
#[rustler::nif]
fn reader_next<'a>(env: Env<'a>, reader: ReaderRef, max: usize) -> NifResult<Term<'a>> {
    match reader.take(max) {
        Ok(nodes) => nodes_to_term(env, &nodes),
        Err(err) => Ok(error_to_term(env, &err)),
    }
}

/// Restart a reader from the beginning of its document
#[rustler::nif]
fn reader_rewind<'a>(env: Env<'a>, reader: ReaderRef) -> Term<'a> {
    match reader.rewind() {
        Ok(()) => term::ok().encode(env),
        Err(err) => error_to_term(env, &err),
    }
}

// ============================================================================
// One-shot
// ============================================================================

/// Read every {path, node} pair of a binary in one call
#[rustler::nif(schedule = "DirtyCpu")]
fn read_nodes<'a>(env: Env<'a>, input: Binary<'a>) -> NifResult<Term<'a>> {
    let mut reader = Reader::new(BufferSource::new(input.as_slice()));
    match reader.nodes().collect::<Result<Vec<_>, _>>() {
        Ok(nodes) => nodes_to_term(env, &nodes),
        Err(err) => Ok(error_to_term(env, &err)),
    }
}

// ============================================================================
// NIF Initialization
// ============================================================================

// `#[rustler::resource_impl]` on `ReaderResource` registers the type
fn load(_env: Env, _info: Term) -> bool {
    true
}

rustler::init!("Elixir.XmlWalk.Native", load = load);
