//! `{{placeholder}}` matching shared by the template store and renderer

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([\w.]+)\s*\}\}").expect("placeholder pattern is valid")
});

/// Distinct placeholder names in `text`, in order of first occurrence
pub fn placeholder_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in PLACEHOLDER.captures_iter(text) {
        let name = &captures[1];
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Replace every `{{name}}` (inner whitespace allowed) in `text` with `value`
pub fn replace_placeholder(text: &str, name: &str, value: &str) -> String {
    let pattern = format!(r"\{{\{{\s*{}\s*\}}\}}", regex::escape(name));
    match Regex::new(&pattern) {
        Ok(re) => re.replace_all(text, NoExpand(value)).into_owned(),
        Err(_) => text.to_string(),
    }
}
