use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use regex::Regex;

pub(crate) static RUST_KEYWORDS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
    "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self", "Self",
  ]
  .into_iter()
  .collect()
});

/// Type names that would shadow prelude items used by the generated modules.
static RESERVED_TYPE_NAMES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  [
    "Box", "Clone", "Copy", "Default", "Option", "Result", "Self", "Send", "String", "Sync", "Vec",
  ]
  .into_iter()
  .collect()
});

/// Keywords that cannot be written as raw identifiers.
const NON_RAW_KEYWORDS: &[&str] = &["crate", "self", "super", "Self"];

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static CAMEL_BOUNDARY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])").unwrap());

/// Transliterates to ASCII and collapses every run of characters outside
/// `[A-Za-z0-9_]` into a single underscore.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Converts an arbitrary OpenAPI name into a `snake_case` Rust identifier.
///
/// Keywords get the raw prefix (`r#type`), `self`, `super` and `crate` get a
/// trailing underscore (`crate_`), a leading
/// digit is prefixed with `_`, and an empty result becomes `_`.
pub(crate) fn to_rust_field_name(name: &str) -> String {
  let (negated, name) = match name.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, name),
  };

  let mut ident = sanitize(name).to_snake_case();
  if ident.is_empty() {
    return "_".to_string();
  }
  if negated {
    ident = format!("negative_{ident}");
  }
  if NON_RAW_KEYWORDS.contains(&ident.as_str()) {
    return format!("{ident}_");
  }
  if RUST_KEYWORDS.contains(ident.as_str()) {
    return format!("r#{ident}");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }
  ident
}

/// Converts an arbitrary OpenAPI name into a `PascalCase` Rust type name.
///
/// Each separator-delimited segment is capitalized. Segments that already mix
/// upper and lower case keep their inner capitalization (`XMLHttpRequest`).
pub(crate) fn to_rust_type_name(name: &str) -> String {
  let (negated, name) = match name.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, name),
  };

  let mut ident: String = sanitize(name)
    .split('_')
    .filter(|segment| !segment.is_empty())
    .map(capitalize_segment)
    .collect();

  if ident.is_empty() {
    return "Unnamed".to_string();
  }
  if negated {
    ident.insert_str(0, "Negative");
  }
  if RESERVED_TYPE_NAMES.contains(ident.as_str()) {
    ident.push_str("Type");
  }
  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }
  ident
}

fn capitalize_segment(segment: &str) -> String {
  let mixed = segment.chars().any(|c| c.is_ascii_uppercase()) && segment.chars().any(|c| c.is_ascii_lowercase());
  if mixed {
    let mut chars = segment.chars();
    return chars
      .next()
      .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
      .unwrap_or_default();
  }
  segment.to_lowercase().to_pascal_case()
}

/// Appends the smallest numeric suffix (starting at 2) that makes `base_name` unused.
pub(crate) fn ensure_unique<F>(base_name: &str, is_taken: F) -> String
where
  F: Fn(&str) -> bool,
{
  if !is_taken(base_name) {
    return base_name.to_string();
  }
  (2usize..)
    .map(|i| format!("{base_name}{i}"))
    .find(|candidate| !is_taken(candidate))
    .unwrap_or_else(|| base_name.to_string())
}

/// Splits `camelCase` boundaries so `petId` becomes `pet_Id` before snake casing.
pub(crate) fn split_camel_boundaries(input: &str) -> String {
  CAMEL_BOUNDARY_RE.replace_all(input, "${1}_${2}").into_owned()
}

/// Derives a method name for an operation that carries no `operationId`.
pub(crate) fn synthesize_operation_name(method: &str, path: &str) -> String {
  let parts = path
    .split('/')
    .filter(|segment| !segment.is_empty())
    .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(param) => format!("by_{}", split_camel_boundaries(param)),
      None => split_camel_boundaries(segment),
    })
    .collect::<Vec<_>>();

  if parts.is_empty() {
    to_rust_field_name(&method.to_lowercase())
  } else {
    to_rust_field_name(&format!("{}_{}", method.to_lowercase(), parts.join("_")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_field_names() {
    let cases = [
      ("foo-bar", "foo_bar"),
      ("petId", "pet_id"),
      ("X-Request-ID", "x_request_id"),
      ("type", "r#type"),
      ("self", "self_"),
      ("Self", "self_"),
      ("crate", "crate_"),
      ("super", "super_"),
      ("123name", "_123name"),
      ("", "_"),
      ("-created", "negative_created"),
    ];
    for (input, expected) in cases {
      assert_eq!(to_rust_field_name(input), expected, "failed for input {input:?}");
    }
  }

  #[test]
  fn test_type_names() {
    let cases = [
      ("pet", "Pet"),
      ("pet_store", "PetStore"),
      ("new-pet", "NewPet"),
      ("XMLHttpRequest", "XMLHttpRequest"),
      ("oAuth", "OAuth"),
      ("PETS", "Pets"),
      ("123Response", "T123Response"),
      ("Option", "OptionType"),
      ("Error", "Error"),
      ("", "Unnamed"),
      ("-INF", "NegativeInf"),
    ];
    for (input, expected) in cases {
      assert_eq!(to_rust_type_name(input), expected, "failed for input {input:?}");
    }
  }

  #[test]
  fn test_ensure_unique() {
    let used: HashSet<&str> = ["Pet", "Pet2"].into_iter().collect();
    assert_eq!(ensure_unique("Pet", |name| used.contains(name)), "Pet3");
    assert_eq!(ensure_unique("Owner", |name| used.contains(name)), "Owner");
  }

  #[test]
  fn test_synthesize_operation_name() {
    assert_eq!(synthesize_operation_name("GET", "/pets/{petId}"), "get_pets_by_pet_id");
    assert_eq!(synthesize_operation_name("POST", "/"), "post");
    assert_eq!(synthesize_operation_name("DELETE", "/store/order/{id}"), "delete_store_order_by_id");
  }
}
