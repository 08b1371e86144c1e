use proc_macro2::TokenStream;
use quote::{ToTokens, quote};

use super::Visibility;

/// Contents of the generated `utils.rs`.
///
/// The status-code binding helpers are emitted once per module, the default
/// response wrapper only when some response enum has a `Default` variant.
#[derive(Clone, Debug)]
pub(crate) struct SupportFragment {
  visibility: Visibility,
  status_binding: bool,
  default_binding: bool,
}

impl SupportFragment {
  pub(crate) fn new(visibility: Visibility, status_binding: bool, default_binding: bool) -> Self {
    Self {
      visibility,
      status_binding,
      default_binding,
    }
  }

  fn binding_helpers(&self) -> TokenStream {
    if !self.status_binding {
      return quote! {};
    }
    let vis = self.visibility.item_tokens();
    quote! {
      /// Implemented by clients whose methods delegate to a private status-code dispatch.
      #vis trait ClientMethodImpl {}

      /// Error returned by the private dispatch methods.
      #vis type ClientMethodInvocationError = ClientError;
    }
  }

  fn default_helper(&self) -> TokenStream {
    if !self.default_binding {
      return quote! {};
    }
    let vis = self.visibility.item_tokens();
    quote! {
      /// A response matched by the `default` entry, with the status code it arrived with.
      #[derive(Debug, Clone, PartialEq)]
      #vis struct DefaultStatusResponse<T> {
        #vis status: u16,
        #vis body: T,
      }
    }
  }
}

impl ToTokens for SupportFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let vis = self.visibility.item_tokens();
    let binding_helpers = self.binding_helpers();
    let default_helper = self.default_helper();

    tokens.extend(quote! {
      #![allow(dead_code)]

      /// Failure of a generated client method.
      #[derive(Debug, thiserror::Error)]
      #vis enum ClientError {
        #[error("invalid base url '{0}'")]
        InvalidBaseUrl(String),
        #[error("request failed: {0}")]
        Request(#[from] reqwest::Error),
        #[error("invalid header value: {0}")]
        InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
        #[error("failed to encode or decode a payload: {0}")]
        Serde(#[from] serde_json::Error),
        #[error("unexpected status code {status}: {body}")]
        UnexpectedStatus { status: u16, body: String },
      }

      #binding_helpers

      #default_helper

      /// Everything except RFC 3986 unreserved characters.
      const PATH_ENCODE_SET: &percent_encoding::AsciiSet = &percent_encoding::NON_ALPHANUMERIC
        .remove(b'-')
        .remove(b'_')
        .remove(b'.')
        .remove(b'~');

      /// Percent-encodes a value for use inside one path segment.
      #vis fn encode_path_segment(value: &str) -> String {
        percent_encoding::utf8_percent_encode(value, PATH_ENCODE_SET).to_string()
      }

      /// Joins the values of a non-exploded array parameter.
      #vis fn join_values<T: std::fmt::Display>(values: &[T]) -> String {
        values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
      }

      /// Builds a multipart form from the top-level properties of a serializable body.
      #vis fn multipart_form<T: serde::Serialize>(body: &T) -> Result<reqwest::multipart::Form, ClientError> {
        let mut form = reqwest::multipart::Form::new();
        if let serde_json::Value::Object(map) = serde_json::to_value(body)? {
          for (key, value) in map {
            let text = match value {
              serde_json::Value::Null => continue,
              serde_json::Value::String(s) => s,
              serde_json::Value::Number(n) => n.to_string(),
              serde_json::Value::Bool(b) => b.to_string(),
              other => serde_json::to_string(&other)?,
            };
            form = form.text(key, text);
          }
        }
        Ok(form)
      }

      /// Fails with the response body when the status is not a success.
      #vis async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
          return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::UnexpectedStatus {
          status: status.as_u16(),
          body,
        })
      }
    });
  }
}
