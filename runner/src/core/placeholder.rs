//! Closed placeholder grammar for exec words and env pairs.
//!
//! Recognised tokens: `<package>`, `<space>`, `<inherit>`, plus the `\#`
//! escape. Anything else between angle brackets is left as written.

pub const PACKAGE: &str = "<package>";
pub const SPACE: &str = "<space>";
pub const INHERIT: &str = "<inherit>";
pub const ESCAPED_HASH: &str = "\\#";

/// Rewrite one argv word.
///
/// Every occurrence is replaced in a single left-to-right pass, so text coming
/// from `package` is never rescanned for tokens.
pub fn expand_word(word: &str, package: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut rest = word;
    while let Some(ch) = rest.chars().next() {
        if let Some(tail) = rest.strip_prefix(PACKAGE) {
            out.push_str(package);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(SPACE) {
            out.push(' ');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix(ESCAPED_HASH) {
            out.push('#');
            rest = tail;
        } else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

/// Split an exec line on whitespace, append `extra` inputs and expand every
/// resulting word.
pub fn build_argv(line: &str, extra: &[String], package: &str) -> Vec<String> {
    line.split_whitespace()
        .chain(extra.iter().map(String::as_str))
        .map(|word| expand_word(word, package))
        .collect()
}

/// Result of expanding one `KEY=VALUE` env template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvPair {
    pub key: String,
    pub value: String,
    /// `<inherit>` was used but `key` is not set in the parent environment.
    pub unset_inherit: bool,
}

/// Expand an env template.
///
/// `<package>` in the value becomes the package name. The first `<inherit>`
/// becomes the parent's value of `KEY` as reported by `lookup`, or the empty
/// string when unset. Returns `None` when `pair` has no `=`.
pub fn expand_env_pair<F>(pair: &str, package: &str, lookup: F) -> Option<EnvPair>
where
    F: Fn(&str) -> Option<String>,
{
    let (key, template) = pair.split_once('=')?;
    let value = template.replace(PACKAGE, package);
    if !value.contains(INHERIT) {
        return Some(EnvPair {
            key: key.to_string(),
            value,
            unset_inherit: false,
        });
    }
    let inherited = lookup(key);
    let unset_inherit = inherited.is_none();
    let value = value.replacen(INHERIT, inherited.as_deref().unwrap_or_default(), 1);
    Some(EnvPair {
        key: key.to_string(),
        value,
        unset_inherit,
    })
}
