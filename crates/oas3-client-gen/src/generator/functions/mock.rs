//! Mock bodies that return a response example instead of calling the server.

use http::Method;
use oas3::spec::{MediaType, ObjectOrReference, Response};
use serde_json::Value;

use crate::{
  generator::{
    ast::{MockPlan, ReturnShape},
    diagnostics::{DiagnosticKind, Diagnostics},
    naming::status_codes::StatusKey,
    operations::OperationEntry,
    resolver::SchemaResolver,
  },
  utils::{
    SchemaExt,
    refs::{EXAMPLE_REF_PREFIX, parse_component_ref},
  },
};

const CREATED: &str = "201";
const PREFERRED_EXAMPLE: &str = "response";

/// Example lookup failed because a `$ref` did not lead anywhere.
struct InvalidExample(String);

pub(crate) struct MockBodyGenerator<'o> {
  entry: &'o OperationEntry,
  operation_label: &'o str,
  diagnostics: Diagnostics,
}

impl<'o> MockBodyGenerator<'o> {
  pub(crate) fn new(entry: &'o OperationEntry, operation_label: &'o str) -> Self {
    Self {
      entry,
      operation_label,
      diagnostics: Diagnostics::new(),
    }
  }

  pub(crate) fn diagnostics(&self) -> &Diagnostics {
    &self.diagnostics
  }

  pub(crate) fn take_diagnostics(&mut self) -> Diagnostics {
    self.diagnostics.take()
  }

  /// Picks the success response and its example, or `None` with a diagnostic.
  ///
  /// `returns` is the already synthesized return type; under status-code
  /// binding the example is wrapped in the variant of the chosen status code.
  pub(crate) fn generate(&mut self, resolver: &SchemaResolver<'_>, returns: &ReturnShape) -> Option<MockPlan> {
    let (status_code, response_ref) = self.success_response()?;

    let response = match response_ref {
      ObjectOrReference::Object(response) => response.clone(),
      ObjectOrReference::Ref { ref_path, .. } => match response_ref.resolve(resolver.spec()) {
        Ok(response) => response,
        Err(_) => {
          self.invalid_reference(ref_path);
          return None;
        }
      },
    };

    if response.content.is_empty() {
      self.no_success_response();
      return None;
    }

    let example = match self.find_example(resolver, &response) {
      Ok(Some(example)) => example,
      Ok(None) => {
        self.diagnostics.push(DiagnosticKind::MockNoExamples {
          operation: self.operation_label.to_string(),
        });
        return None;
      }
      Err(InvalidExample(reference)) => {
        self.invalid_reference(&reference);
        return None;
      }
    };

    let variant = match returns {
      ReturnShape::Single { .. } => None,
      ReturnShape::StatusBinding { arms, .. } => {
        let StatusKey::Code { variant, .. } = StatusKey::parse(status_code) else {
          self.diagnostics.push(DiagnosticKind::UnsupportedStatusCode {
            code: status_code.to_string(),
          });
          return None;
        };
        if !arms.iter().any(|arm| arm.variant == variant) {
          self.no_success_response();
          return None;
        }
        Some(variant.to_string())
      }
    };

    Some(MockPlan { example, variant })
  }

  /// `201` for `POST` when declared, otherwise the first `2xx` response.
  fn success_response(&mut self) -> Option<(&'o str, &'o ObjectOrReference<Response>)> {
    let entry = self.entry;
    let responses = entry.operation.responses.as_ref();
    let mut success = responses
      .into_iter()
      .flatten()
      .filter(|(code, _)| code.starts_with('2'))
      .peekable();

    if success.peek().is_none() {
      self.no_success_response();
      return None;
    }

    let created = (entry.method == Method::POST)
      .then(|| responses.and_then(|r| r.get_key_value(CREATED)))
      .flatten();
    created
      .or_else(|| success.next())
      .map(|(code, response)| (code.as_str(), response))
  }

  fn find_example(&self, resolver: &SchemaResolver<'_>, response: &Response) -> Result<Option<Value>, InvalidExample> {
    for media in response.content.values() {
      if let Some(example) = self.media_example(resolver, media)? {
        return Ok(Some(example));
      }
    }
    Ok(None)
  }

  /// Search order: the `examples` map, the `example` value, then the schema.
  fn media_example(&self, resolver: &SchemaResolver<'_>, media: &MediaType) -> Result<Option<Value>, InvalidExample> {
    let raw = serde_json::to_value(media).unwrap_or(Value::Null);

    if let Some(Value::Object(examples)) = raw.get("examples")
      && let Some(chosen) = examples
        .get(PREFERRED_EXAMPLE)
        .or_else(|| examples.values().next())
    {
      return self.example_value(resolver, chosen).map(Some);
    }

    if let Some(example) = raw.get("example").filter(|v| !v.is_null()) {
      return Ok(Some(example.clone()));
    }

    let Some(schema) = media.schema.as_ref() else {
      return Ok(None);
    };
    let schema = match schema {
      ObjectOrReference::Object(inline) => inline,
      ObjectOrReference::Ref { ref_path, .. } => resolver
        .lookup_component(ref_path)
        .map_err(|_| InvalidExample(ref_path.clone()))?,
    };
    Ok(schema.example_value())
  }

  /// Value of one `examples` entry, following a `#/components/examples/` reference.
  fn example_value(&self, resolver: &SchemaResolver<'_>, example: &Value) -> Result<Value, InvalidExample> {
    let Some(reference) = example.get("$ref").and_then(Value::as_str) else {
      return Ok(example.get("value").cloned().unwrap_or(Value::Null));
    };

    let invalid = || InvalidExample(reference.to_string());
    let name = parse_component_ref(reference, EXAMPLE_REF_PREFIX).ok_or_else(invalid)?;
    let components = resolver
      .spec()
      .components
      .as_ref()
      .and_then(|components| serde_json::to_value(components).ok())
      .ok_or_else(invalid)?;
    components
      .get("examples")
      .and_then(|examples| examples.get(&name))
      .and_then(|example| example.get("value"))
      .cloned()
      .ok_or_else(invalid)
  }

  fn no_success_response(&mut self) {
    self.diagnostics.push(DiagnosticKind::MockNoSuccessResponse {
      operation: self.operation_label.to_string(),
    });
  }

  fn invalid_reference(&mut self, reference: &str) {
    self.diagnostics.push(DiagnosticKind::MockInvalidExampleReference {
      operation: self.operation_label.to_string(),
      reference: reference.to_string(),
    });
  }
}
