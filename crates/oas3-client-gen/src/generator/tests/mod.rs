pub(crate) mod support;

use serde_json::json;

use super::{
  DefaultOnlyPolicy, FunctionStyle, GeneratorOptions,
  ast::{FunctionBody, MethodVisibility, ReturnShape},
  client::{ClientGenerator, GenerationOutput},
  orchestrator::{CLIENT_FILE, MOD_FILE, Orchestrator, TYPES_FILE, UTILS_FILE},
};
use support::{assert_contains, codes, names, parse_spec, spec_from};

const PETSTORE: &str = include_str!("../../../fixtures/petstore.json");

fn petstore() -> oas3::Spec {
  parse_spec(PETSTORE)
}

fn run(spec: &oas3::Spec, options: &GeneratorOptions) -> GenerationOutput {
  ClientGenerator::new(spec, options).generate()
}

fn function_names(output: &GenerationOutput) -> Vec<&str> {
  output.functions.iter().map(|f| f.name.as_str()).collect()
}

#[test]
fn test_petstore_resource_client() {
  let output = run(&petstore(), &GeneratorOptions::default());

  assert_eq!(output.client_name, "SwaggerPetstoreClient");
  assert_eq!(output.base_url, "http://petstore.swagger.io/v1");
  assert!(output.diagnostics.is_empty(), "{:?}", output.diagnostics);
  assert_eq!(
    function_names(&output),
    vec![
      "get_pets",
      "post_pets",
      "get_pets_by_pet_id",
      "delete_pets_by_pet_id",
      "get_store_inventory"
    ]
  );
  for declared in ["Error", "NewPet", "Pet", "PetStatus", "Pets"] {
    assert!(names(&output.registry).iter().any(|n| n == declared), "missing {declared}");
  }

  assert_eq!(output.stats.operations_total, 5);
  assert_eq!(output.stats.operations_converted, 5);
  assert_eq!(output.stats.client_methods_generated, 5);
  assert!(!output.uses_status_binding);
  assert!(!output.uses_default_binding);
}

#[test]
fn test_petstore_remote_client_renders() {
  let options = GeneratorOptions::builder().style(FunctionStyle::Remote).build();
  let module = Orchestrator::new(petstore(), options)
    .generate("fixtures/petstore.json")
    .unwrap();

  let client = module.file(CLIENT_FILE).unwrap();
  for method in ["list_pets", "create_pet", "show_pet_by_id", "delete_pet", "get_inventory"] {
    assert_contains(client, &format!("pub async fn {method}("), "remote method");
  }
  assert_contains(client, "pub struct SwaggerPetstoreClient", "client struct");
  assert_contains(
    client,
    "pub const BASE_URL: &str = \"http://petstore.swagger.io/v1\";",
    "base url",
  );
  assert_contains(client, "#[deprecated]", "deprecated operation");

  let types = module.file(TYPES_FILE).unwrap();
  assert_contains(types, "pub struct Pet {", "record");
  assert_contains(types, "pub enum PetStatus {", "enum");
  assert_contains(types, "pub type Pets = Vec<Pet>;", "array alias");
  let pet = &types[types.find("pub struct Pet {").unwrap()..];
  let field_at = |field: &str| pet.find(&format!("pub {field}: ")).unwrap();
  assert!(field_at("id") < field_at("name"));
  assert!(field_at("name") < field_at("tag"));
  assert!(field_at("tag") < field_at("status"), "fields keep document order");

  let module_file = module.file(MOD_FILE).unwrap();
  assert_contains(module_file, "pub use client::{BASE_URL, SwaggerPetstoreClient};", "re-export");
  assert!(module.file(UTILS_FILE).is_some());
}

#[test]
fn test_generation_is_deterministic() {
  let options = GeneratorOptions::builder()
    .status_code_binding(true)
    .default_only(DefaultOnlyPolicy::Proceed)
    .build();

  let first = Orchestrator::new(petstore(), options.clone()).generate("petstore.json").unwrap();
  let second = Orchestrator::new(petstore(), options).generate("petstore.json").unwrap();

  assert_eq!(first.files, second.files);
  assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_parameter_order_is_stable() {
  let output = run(&petstore(), &GeneratorOptions::default());
  let list = &output.functions[0];
  let params = list.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
  assert_eq!(params, vec!["limit", "status"]);

  let delete = &output.functions[3];
  let params = delete.params.iter().map(|p| p.name.as_str()).collect::<Vec<_>>();
  assert_eq!(params, vec!["pet_id", "x_request_id"]);
}

#[test]
fn test_status_code_mapping() {
  let spec = spec_from(
    json!({
      "Pet": { "type": "object", "properties": { "id": { "type": "integer" } } },
      "Problem": { "type": "object", "properties": { "detail": { "type": "string" } } }
    }),
    json!({
      "/pets/{id}": {
        "get": {
          "operationId": "getPet",
          "parameters": [{ "name": "id", "in": "path", "required": true, "schema": { "type": "string" } }],
          "responses": {
            "200": { "description": "ok", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } },
            "404": { "description": "missing" },
            "9XX": { "description": "nonsense" },
            "default": { "description": "error", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Problem" } } } }
          }
        }
      }
    }),
  );
  let options = GeneratorOptions::builder().status_code_binding(true).build();
  let output = run(&spec, &options);

  assert_eq!(codes(&output.diagnostics), vec!["C113"]);
  assert!(output.uses_status_binding);
  assert!(output.uses_default_binding);

  let [public, private] = output.functions.as_slice() else {
    panic!("expected a public method and its impl");
  };
  assert_eq!(public.visibility, MethodVisibility::Public);
  assert_eq!(private.visibility, MethodVisibility::Private);
  assert!(matches!(public.body, FunctionBody::Delegate { .. }));
  assert_eq!(public.non_default_status_codes, vec![200, 404]);
  assert!(public.has_default_status_code_binding);

  let ReturnShape::StatusBinding { enum_name, arms } = &private.returns else {
    panic!("expected a response enum");
  };
  let variants = arms.iter().map(|a| a.variant.as_str()).collect::<Vec<_>>();
  assert_eq!(variants, vec!["Ok", "NotFound", "Default"]);
  assert_eq!(enum_name, "GetPetsByIdResponse");
}

#[test]
fn test_failed_operation_leaves_no_declarations() {
  let valid = json!({
    "get": {
      "operationId": "listItems",
      "responses": { "200": { "description": "ok", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Item" } } } } }
    }
  });
  let schemas = json!({
    "Item": { "type": "object", "properties": { "id": { "type": "string" } } }
  });

  let clean = spec_from(schemas.clone(), json!({ "/items": valid.clone() }));
  let broken = spec_from(
    schemas,
    json!({
      "/items": valid,
      "/broken": {
        "post": {
          "operationId": "broken",
          "parameters": [{
            "name": "mode",
            "in": "query",
            "schema": { "type": "string", "enum": ["fast", "slow"] }
          }],
          "requestBody": {
            "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Missing" } } }
          },
          "responses": { "204": { "description": "done" } }
        }
      }
    }),
  );

  let options = GeneratorOptions::default();
  let clean = run(&clean, &options);
  let broken = run(&broken, &options);

  assert_eq!(codes(&broken.diagnostics), vec!["C100"]);
  assert_eq!(function_names(&broken), vec!["get_items"]);
  assert_eq!(names(&broken.registry), names(&clean.registry));
  assert_eq!(broken.stats.operations_skipped, 1);
}

#[test]
fn test_filters_select_operations() {
  let options = GeneratorOptions::builder()
    .tags(vec!["store".to_string()])
    .operations(vec!["showPetById".to_string()])
    .build();
  let output = run(&petstore(), &options);
  assert_eq!(function_names(&output), vec!["get_pets_by_pet_id", "get_store_inventory"]);
  assert_eq!(output.stats.operations_total, 2);
}

#[test]
fn test_method_names_stay_unique() {
  let spec = spec_from(
    json!({}),
    json!({
      "/a": { "get": { "operationId": "fetch", "responses": { "204": { "description": "ok" } } } },
      "/b": { "get": { "operationId": "fetch", "responses": { "204": { "description": "ok" } } } },
      "/c": { "get": { "operationId": "new", "responses": { "204": { "description": "ok" } } } }
    }),
  );
  let options = GeneratorOptions::builder().style(FunctionStyle::Remote).build();
  let output = run(&spec, &options);

  let names = function_names(&output);
  assert_eq!(names.len(), 3);
  assert_eq!(names[0], "fetch");
  assert_ne!(names[1], "fetch");
  assert_ne!(names[2], "new");
}

#[test]
fn test_petstore_mock_client() {
  let options = GeneratorOptions::builder().mock(true).build();
  let output = run(&petstore(), &options);

  assert_eq!(
    function_names(&output),
    vec!["get_pets", "post_pets", "get_store_inventory"]
  );
  assert_eq!(output.stats.mock_methods_generated, 3);
  assert_eq!(codes(&output.diagnostics), vec!["C116", "C115"]);
  assert!(output.functions.iter().all(|f| f.is_mock()));
}

#[test]
fn test_keyword_names_render() {
  let spec = spec_from(
    json!({
      "Thing": {
        "type": "object",
        "required": ["crate"],
        "properties": {
          "crate": { "type": "string" },
          "super": { "type": "integer" },
          "Self": { "type": "boolean" },
          "type": { "type": "string" }
        }
      }
    }),
    json!({
      "/things/{crate}": {
        "get": {
          "operationId": "super",
          "parameters": [
            { "name": "crate", "in": "path", "required": true, "schema": { "type": "string" } },
            { "name": "self", "in": "query", "schema": { "type": "string" } }
          ],
          "responses": { "200": { "description": "ok", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Thing" } } } } }
        }
      }
    }),
  );
  let options = GeneratorOptions::builder().style(FunctionStyle::Remote).build();
  let module = Orchestrator::new(spec, options).generate("things.json").unwrap();

  let types = module.file(TYPES_FILE).unwrap();
  assert_contains(types, "pub crate_: String,", "crate field");
  assert_contains(types, "pub super_: Option<i64>,", "super field");
  assert_contains(types, "pub self_: Option<bool>,", "Self field");
  assert_contains(types, "pub r#type: Option<String>,", "raw field");
  assert_contains(types, "#[serde(rename = \"crate\")]", "crate wire name");

  let client = module.file(CLIENT_FILE).unwrap();
  assert_contains(client, "pub async fn super_(", "method name");
  assert_contains(client, "crate_: String", "path parameter");
  assert_contains(client, "self_: Option<String>", "query parameter");
}
