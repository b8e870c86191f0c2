//! Small text helpers shared by the grammars: argument extraction from
//! flag lines and path splitting for both separator styles.

use once_cell::sync::Lazy;
use regex::Regex;

static INCLUDE_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r#"-I "([^"]*)""#).unwrap());
static DEFINE_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r#"-D "([^"]*)""#).unwrap());
static LIBPATH_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r#"-L "([^"]*)""#).unwrap());
static LINK_ARG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|\s)-l(\S+)").unwrap());

/// Paths from `-I "path"` arguments, in order.
pub(crate) fn include_args(text: &str) -> Vec<String> {
    captures(&INCLUDE_ARG, text)
}

/// Symbols from `-D "SYMBOL"` arguments, in order.
pub(crate) fn define_args(text: &str) -> Vec<String> {
    captures(&DEFINE_ARG, text)
}

/// Paths from `-L "path"` arguments, in order.
pub(crate) fn libpath_args(text: &str) -> Vec<String> {
    captures(&LIBPATH_ARG, text)
}

/// Library names from `-lname` arguments, in order.
pub(crate) fn link_args(text: &str) -> Vec<String> {
    captures(&LINK_ARG, text)
}

fn captures(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

/// Whitespace-separated words.
pub(crate) fn words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Split on `sep`, trimming entries and dropping empty ones.
pub(crate) fn split_list(text: &str, sep: char) -> Vec<String> {
    text.split(sep)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Final path component, for either separator.
pub(crate) fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Everything before the final path component (empty when there is none).
pub(crate) fn dirname(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(i) => &path[..i],
        None => "",
    }
}

/// Drop the extension of the final path component, keeping the directory.
pub(crate) fn without_extension(path: &str) -> String {
    let dir = dirname(path);
    let name = basename(path);
    let stem = match name.rfind('.') {
        Some(i) if i > 0 => &name[..i],
        _ => name,
    };
    if dir.is_empty() {
        stem.to_string()
    } else {
        format!("{}/{}", dir, stem)
    }
}

/// Extension of the final path component, including the dot.
pub(crate) fn extension(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(i) if i > 0 => &name[i..],
        _ => "",
    }
}

/// Translate Windows separators to forward slashes.
pub(crate) fn to_unix(path: &str) -> String {
    path.replace('\\', "/")
}

/// Split a package location into directory and file name. An empty
/// directory becomes `.`.
pub(crate) fn split_location(location: &str) -> (String, String) {
    let dir = dirname(location);
    let dir = if dir.is_empty() { "." } else { dir };
    (to_unix(dir), basename(location).to_string())
}

/// `true`/`True`/`TRUE`.
pub(crate) fn is_true(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}
