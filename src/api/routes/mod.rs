//! Route handlers

pub mod checks;
pub mod graph;
pub mod health;

/// Raw query string pairs in request order
pub type QueryPairs = Vec<(String, String)>;

/// First value given for `key`; later repeats are ignored
pub(crate) fn first_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
