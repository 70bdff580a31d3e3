//! Route table provider and formatting.
//!
//! A [`RoutesProvider`] supplies the raw route entries; this module owns
//! everything the wire sees: order-preserving deduplication, exclusion of
//! internal routes, the fixed-width verb column, and the optional `?q=`
//! substring filter.

use std::collections::HashSet;
use std::path::PathBuf;

use serde::Deserialize;

/// Fixed text served when the routes provider is unavailable.
pub const ROUTES_UNAVAILABLE: &str = "routes unavailable";

/// Route paths starting with one of these prefixes are internal
/// (administrative or asset endpoints) and never listed.
const RESERVED_PREFIXES: &[&str] = &["/_", "/assets"];

/// One route of the host application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Route {
    /// HTTP verb, e.g. `GET`.
    pub verb: String,
    /// Route path, e.g. `/users/:id`.
    pub path: String,
    /// Handler in `controller#action` form.
    pub action: String,
}

/// Supplies the entries of the `app://routes` resource.
///
/// Implementations must not fail; `None` signals that the route table is
/// unavailable and the resource reports a fixed error text instead.
pub trait RoutesProvider: Send + Sync {
    /// Returns the route entries in declaration order, or `None` when the
    /// table cannot be produced.
    fn routes(&self) -> Option<Vec<Route>>;
}

/// Reads routes from a JSON manifest under the project root.
///
/// The manifest is an array of `{verb, path, action}` objects, typically
/// written by the host application's build step. Any read or parse failure
/// makes the provider report unavailable.
#[derive(Debug, Clone)]
pub struct FileRoutesProvider {
    manifest: PathBuf,
}

impl FileRoutesProvider {
    /// Creates a provider reading from the given manifest file.
    #[must_use]
    pub const fn new(manifest: PathBuf) -> Self {
        Self { manifest }
    }
}

impl RoutesProvider for FileRoutesProvider {
    fn routes(&self) -> Option<Vec<Route>> {
        let contents = std::fs::read_to_string(&self.manifest).ok()?;
        serde_json::from_str(&contents).ok()
    }
}

/// Formats routes into the wire text: one `VERB path controller#action` line
/// per route, verbs padded to a fixed-width column.
///
/// Duplicate entries are dropped (first occurrence wins) and internal routes
/// are excluded.
#[must_use]
pub fn format_routes(routes: &[Route]) -> String {
    let mut seen = HashSet::new();
    let kept: Vec<&Route> = routes
        .iter()
        .filter(|r| !RESERVED_PREFIXES.iter().any(|p| r.path.starts_with(p)))
        .filter(|r| seen.insert((r.verb.clone(), r.path.clone(), r.action.clone())))
        .collect();

    let width = kept.iter().map(|r| r.verb.len()).max().unwrap_or(0);

    kept.iter()
        .map(|r| format!("{:<width$} {} {}", r.verb, r.path, r.action))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Applies a `?q=` filter to formatted route text.
///
/// Keeps the lines containing `term` (case-sensitive); when nothing matches,
/// the whole content is replaced by a fixed no-match message.
#[must_use]
pub fn filter_routes(formatted: &str, term: &str) -> String {
    let matching: Vec<&str> = formatted
        .lines()
        .filter(|line| line.contains(term))
        .collect();

    if matching.is_empty() {
        format!("no match for '{term}'")
    } else {
        matching.join("\n")
    }
}
