//! Elixir Term Conversion Utilities
//!
//! Converts node snapshots to Elixir terms.

use crate::node::Node;
use rustler::{Encoder, Env, NewBinary, NifResult, Term};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    node_type = "type",
    local_name,
    qualified_name,
    value,
    depth,
    position,
    language,
    prefix,
    uri,
    attributes,
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

fn optional_binary<'a>(env: Env<'a>, s: Option<&str>) -> Term<'a> {
    match s {
        Some(s) => str_to_binary(env, s),
        None => rustler::types::atom::nil().encode(env),
    }
}

/// `%{"name" => "value"}` for every attribute
fn attributes_to_term<'a>(env: Env<'a>, node: &Node) -> NifResult<Term<'a>> {
    let (keys, values): (Vec<Term<'a>>, Vec<Term<'a>>) = node
        .attributes()
        .iter()
        .map(|(name, value)| (str_to_binary(env, name), str_to_binary(env, value)))
        .unzip();
    Term::map_from_term_arrays(env, &keys, &values)
}

/// Convert a node to a map keyed by atoms. Absent optional fields are
/// `nil`; `type` carries the raw flag bits.
pub fn node_to_term<'a>(env: Env<'a>, node: &Node) -> NifResult<Term<'a>> {
    let keys = [
        node_type().encode(env),
        local_name().encode(env),
        qualified_name().encode(env),
        value().encode(env),
        depth().encode(env),
        position().encode(env),
        language().encode(env),
        prefix().encode(env),
        uri().encode(env),
        attributes().encode(env),
    ];
    let values = [
        node.node_type().bits().encode(env),
        str_to_binary(env, node.local_name()),
        str_to_binary(env, &node.qualified_name()),
        optional_binary(env, node.value()),
        node.depth().encode(env),
        node.position().encode(env),
        optional_binary(env, node.language()),
        optional_binary(env, node.prefix()),
        optional_binary(env, node.uri()),
        attributes_to_term(env, node)?,
    ];
    Term::map_from_term_arrays(env, &keys, &values)
}

/// Convert `(path, node)` pairs to a list of `{path, node_map}` tuples
pub fn nodes_to_term<'a>(env: Env<'a>, nodes: &[(String, Node)]) -> NifResult<Term<'a>> {
    let mut list = Term::list_new_empty(env);
    for (path, node) in nodes.iter().rev() {
        let tuple = (str_to_binary(env, path), node_to_term(env, node)?);
        list = list.list_prepend(tuple.encode(env));
    }
    Ok(list)
}

/// `{:error, reason}` with the reason rendered as a binary
pub fn error_to_term<'a>(env: Env<'a>, reason: &impl std::fmt::Display) -> Term<'a> {
    (error(), str_to_binary(env, &reason.to_string())).encode(env)
}
