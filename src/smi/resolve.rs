// ABOUTME: Field resolution from a node and a fixed relative path
// ABOUTME: Shared lookup-and-cast primitive behind every typed accessor

use super::error::{Result, SmiError};
use super::tree::NodeRef;
use core::fmt::Display;
use core::str::FromStr;

/// Text of the first node matching `path`
///
/// Fails with [`SmiError::FieldNotFound`] if nothing matches or the match has
/// no text. `context` names the view doing the lookup.
pub fn resolve<'a>(node: NodeRef<'a>, context: &'static str, path: &str) -> Result<&'a str> {
    node.find(path)
        .and_then(NodeRef::text)
        .ok_or_else(|| SmiError::field_not_found(context, path))
}

/// Resolve `path` and parse its text as `T`
pub fn resolve_as<T>(node: NodeRef<'_>, context: &'static str, path: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let text = resolve(node, context, path)?;
    text.parse()
        .map_err(|e| SmiError::malformed_value(path, text, e))
}

/// Resolve `path` and normalize its text with a unit parser
pub fn resolve_with<T, E, F>(
    node: NodeRef<'_>,
    context: &'static str,
    path: &str,
    parse: F,
) -> Result<T>
where
    F: FnOnce(&str) -> core::result::Result<T, E>,
    E: Display,
{
    let text = resolve(node, context, path)?;
    parse(text).map_err(|e| SmiError::malformed_value(path, text, e))
}
