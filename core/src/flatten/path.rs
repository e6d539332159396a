//! Parameter path construction.
//!
//! Hierarchical store names begin with `/`; flat single-level names do not.

/// Separator between path segments.
pub const DELIMITER: char = '/';


/// Join segments with `/` and normalize the result.
pub fn build_path<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("/");
    normalize(&joined)
}

/// Normalize an already joined path: any path containing `/` gets exactly
/// one leading `/`; a bare name is returned as is.
pub fn normalize(joined: &str) -> String {
    if joined.contains(DELIMITER) {
        format!("{}{}", DELIMITER, joined.trim_start_matches(DELIMITER))
    } else {
        joined.to_string()
    }
}

/// Raw (not yet normalized) path of `key` below `prefix`.
pub fn child(prefix: &str, key: &str) -> String {
    format!("{}{}{}", prefix, DELIMITER, key)
}
