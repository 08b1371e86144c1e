use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use http::Method;

use crate::{
  generator::{FunctionStyle, operations::OperationRegistry},
  ui::{Colors, colors::Role, term_width},
  utils::spec::SpecLoader,
};

/// Method name, HTTP method, path and tags of every operation, sorted by method name.
fn operation_rows(spec: &oas3::Spec, style: FunctionStyle) -> Vec<[String; 4]> {
  let mut rows = OperationRegistry::new(spec)
    .operations()
    .map(|entry| {
      [
        style.function_name(entry),
        entry.method.to_string(),
        entry.path.clone(),
        entry.operation.tags.join(", "),
      ]
    })
    .collect::<Vec<_>>();
  rows.sort();
  rows
}

pub async fn list_operations(input: &Path, style: FunctionStyle, colors: &Colors) -> anyhow::Result<()> {
  let spec = SpecLoader::open(input).await?.parse()?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in ["METHOD NAME", "HTTP", "PATH", "TAGS"] {
    row.add_cell(Cell::new(header).fg(colors.cell(colors.get(Role::Label))));
  }
  table.set_header(row);

  for [name, method, path, tags] in operation_rows(&spec, style) {
    let method_color = Method::from_bytes(method.as_bytes()).map_or(colors.get(Role::Write), |m| colors.method(&m));
    let mut row = Row::new();
    row.add_cell(
      Cell::new(name)
        .fg(colors.cell(colors.get(Role::Identifier)))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(method)
        .fg(colors.cell(method_color))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(path).fg(colors.cell(colors.get(Role::Path))));
    row.add_cell(Cell::new(tags).fg(colors.cell(colors.get(Role::Tag))));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::generator::tests::support::parse_spec;

  fn spec() -> oas3::Spec {
    let document = json!({
      "openapi": "3.0.3",
      "info": {"title": "Pets", "version": "1"},
      "paths": {
        "/pets/{petId}": {
          "get": {"operationId": "showPetById", "tags": ["pets"], "responses": {"200": {"description": "ok"}}}
        },
        "/store": {
          "post": {"tags": ["store", "admin"], "responses": {"201": {"description": "created"}}}
        }
      }
    });
    parse_spec(&document.to_string())
  }

  #[test]
  fn test_rows_follow_resource_style() {
    let rows = operation_rows(&spec(), FunctionStyle::Resource);
    assert_eq!(rows[0][0], "get_pets_by_pet_id");
    assert_eq!(rows[0][1], "GET");
    assert_eq!(rows[1][0], "post_store");
    assert_eq!(rows[1][3], "store, admin");
  }

  #[test]
  fn test_rows_follow_remote_style() {
    let rows = operation_rows(&spec(), FunctionStyle::Remote);
    let names = rows.iter().map(|r| r[0].as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["post_store", "show_pet_by_id"]);
  }
}
