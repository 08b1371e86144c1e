use oas3::spec::ObjectOrReference;

pub(crate) const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
pub(crate) const EXAMPLE_REF_PREFIX: &str = "#/components/examples/";

/// Extracts the component name from a local `$ref` with the given prefix.
///
/// Returns `None` for references into other documents, other component
/// sections, or nested pointers. JSON pointer escapes (`~1`, `~0`) are decoded.
pub fn parse_component_ref(ref_path: &str, prefix: &str) -> Option<String> {
  let name = ref_path.strip_prefix(prefix)?;
  if name.is_empty() || name.contains('/') {
    return None;
  }
  Some(name.replace("~1", "/").replace("~0", "~"))
}

/// Extracts the schema name from a `#/components/schemas/...` reference.
pub fn parse_schema_ref_path(ref_path: &str) -> Option<String> {
  parse_component_ref(ref_path, SCHEMA_REF_PREFIX)
}

/// The `$ref` target of an [`ObjectOrReference`], if it is a reference.
pub fn ref_path_of<T>(obj: &ObjectOrReference<T>) -> Option<&str> {
  match obj {
    ObjectOrReference::Ref { ref_path, .. } => Some(ref_path.as_str()),
    ObjectOrReference::Object(_) => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_schema_ref_path() {
    assert_eq!(parse_schema_ref_path("#/components/schemas/Pet"), Some("Pet".to_string()));
    assert_eq!(
      parse_schema_ref_path("#/components/schemas/a~1b~0c"),
      Some("a/b~c".to_string())
    );
    assert_eq!(parse_schema_ref_path("#/components/responses/Pet"), None);
    assert_eq!(parse_schema_ref_path("other.json#/components/schemas/Pet"), None);
    assert_eq!(parse_schema_ref_path("#/components/schemas/"), None);
    assert_eq!(parse_schema_ref_path("#/components/schemas/Pet/properties/id"), None);
  }

  #[test]
  fn test_parse_example_ref() {
    assert_eq!(
      parse_component_ref("#/components/examples/PetExample", EXAMPLE_REF_PREFIX),
      Some("PetExample".to_string())
    );
  }
}
