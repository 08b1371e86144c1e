use http::Method;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{ToTokens, format_ident, quote};
use serde_json::Value;

use super::{Visibility, json::JsonLiteralFragment};
use crate::generator::{
  ast::{
    BodyEncoding, Documentation, FunctionBody, FunctionDescriptor, MethodVisibility, MockPlan, ParameterDeclaration,
    ParameterLocation, PathSegment, RequestPlan, ResponseDecode, ResponseStatus, ReturnShape, RouteStyle,
    SegmentPart, StatusArm, TypeExpr,
  },
  client::GenerationOutput,
};

/// Characters a literal path segment can not carry unescaped.
const PATH_LITERAL_ENCODE_SET: &AsciiSet = &CONTROLS
  .add(b' ')
  .add(b'"')
  .add(b'#')
  .add(b'<')
  .add(b'>')
  .add(b'?')
  .add(b'`')
  .add(b'{')
  .add(b'}');

fn param_ident(param: &ParameterDeclaration) -> Ident {
  format_ident!("{}", param.name)
}

/// Wire text of the schema default sent when an optional parameter is `None`.
///
/// Defaults without a scalar form (objects, nulls, nested arrays) are not sent.
fn default_wire_values(param: &ParameterDeclaration) -> Option<Vec<String>> {
  fn scalar(value: &Value) -> Option<String> {
    match value {
      Value::String(s) => Some(s.clone()),
      Value::Number(n) => Some(n.to_string()),
      Value::Bool(b) => Some(b.to_string()),
      _ => None,
    }
  }

  match param.default.as_ref()? {
    Value::Array(items) => items.iter().map(scalar).collect(),
    other => scalar(other).map(|value| vec![value]),
  }
}

#[derive(Clone, Debug)]
pub(crate) struct HttpInitFragment {
  method: Method,
}

impl ToTokens for HttpInitFragment {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self.method {
      Method::GET => quote! { self.client.get(url) },
      Method::POST => quote! { self.client.post(url) },
      Method::PUT => quote! { self.client.put(url) },
      Method::DELETE => quote! { self.client.delete(url) },
      Method::PATCH => quote! { self.client.patch(url) },
      Method::HEAD => quote! { self.client.head(url) },
      _ => {
        let method = format_ident!("{}", self.method.as_str().to_ascii_uppercase());
        quote! { self.client.request(reqwest::Method::#method, url) }
      }
    };
    tokens.extend(ts);
  }
}

/// Builds `url`, either segment by segment or from a formatted template.
#[derive(Clone, Debug)]
pub(crate) struct UrlFragment<'a> {
  plan: &'a RequestPlan,
  params: &'a [ParameterDeclaration],
}

impl UrlFragment<'_> {
  fn path_param(&self, wire_name: &str) -> Option<&ParameterDeclaration> {
    self
      .params
      .iter()
      .find(|p| p.location == ParameterLocation::Path && p.wire_name == wire_name)
  }

  /// Format string and arguments for one segment; unbound parameters stay literal.
  ///
  /// With `encode` set the literal text is escaped here and parameter values
  /// at runtime, since a template URL is not escaped by `reqwest`.
  fn segment_format(&self, parts: &[SegmentPart], encode: bool) -> (String, Vec<TokenStream>) {
    let mut format = String::new();
    let mut args = vec![];
    for part in parts {
      match part {
        SegmentPart::Literal(lit) => {
          let text = if encode {
            utf8_percent_encode(lit, PATH_LITERAL_ENCODE_SET).to_string()
          } else {
            lit.clone()
          };
          format.push_str(&text.replace('{', "{{").replace('}', "}}"));
        }
        SegmentPart::Param(name) => match self.path_param(name) {
          Some(param) => {
            let ident = param_ident(param);
            format.push_str("{}");
            args.push(if encode {
              quote! { encode_path_segment(&#ident.to_string()) }
            } else {
              quote! { #ident }
            });
          }
          None => format.push_str(&format!("{{{{{name}}}}}")),
        },
      }
    }
    (format, args)
  }

  fn segment_parts(segment: &PathSegment) -> Vec<SegmentPart> {
    match segment {
      PathSegment::Literal(lit) => vec![SegmentPart::Literal(lit.clone())],
      PathSegment::Param(name) => vec![SegmentPart::Param(name.clone())],
      PathSegment::Mixed(parts) => parts.clone(),
    }
  }

  fn segments(&self) -> TokenStream {
    let pushes = self.plan.path.segments().iter().map(|segment| {
      if let PathSegment::Literal(lit) = segment {
        return quote! { segments.push(#lit); };
      }
      if let PathSegment::Param(name) = segment
        && let Some(param) = self.path_param(name)
      {
        let ident = param_ident(param);
        return quote! { segments.push(&#ident.to_string()); };
      }
      let (format, args) = self.segment_format(&Self::segment_parts(segment), false);
      quote! { segments.push(&format!(#format #(, #args)*)); }
    });

    quote! {
      let mut url = reqwest::Url::parse(&self.base_url)
        .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.clone()))?;
      {
        let mut segments = url
          .path_segments_mut()
          .map_err(|()| ClientError::InvalidBaseUrl(self.base_url.clone()))?;
        segments.pop_if_empty();
        #(#pushes)*
      }
    }
  }

  fn template(&self) -> TokenStream {
    let mut format = "{}".to_string();
    let mut args = vec![];
    for segment in self.plan.path.segments() {
      let (segment_format, segment_args) = self.segment_format(&Self::segment_parts(segment), true);
      format.push('/');
      format.push_str(&segment_format);
      args.extend(segment_args);
    }
    if self.plan.path.segments().is_empty() {
      format.push('/');
    }

    quote! {
      let url = format!(#format, self.base_url.trim_end_matches('/') #(, #args)*);
    }
  }
}

impl ToTokens for UrlFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self.plan.route {
      RouteStyle::Segments => self.segments(),
      RouteStyle::Template => self.template(),
    };
    tokens.extend(ts);
  }
}

#[derive(Clone, Debug)]
pub(crate) struct QueryParamFragment<'a> {
  param: &'a ParameterDeclaration,
}

impl ToTokens for QueryParamFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let param = self.param;
    let ident = param_ident(param);
    let wire = param.wire_name.as_str();

    let push = |value: TokenStream| match (param.is_array(), param.explode) {
      (true, true) => quote! {
        for item in #value {
          query.push((#wire, item.to_string()));
        }
      },
      (true, false) => quote! { query.push((#wire, join_values(#value))); },
      (false, _) => quote! { query.push((#wire, (#value).to_string())); },
    };

    let fallback = default_wire_values(param).map(|values| {
      if param.is_array() && param.explode {
        let pushes = values.iter().map(|value| quote! { query.push((#wire, #value.to_string())); });
        quote! { #(#pushes)* }
      } else {
        let joined = values.join(",");
        quote! { query.push((#wire, #joined.to_string())); }
      }
    });

    let ts = if param.required {
      push(quote! { &#ident })
    } else {
      let body = push(quote! { value });
      match fallback {
        Some(fallback) => quote! {
          if let Some(value) = &#ident {
            #body
          } else {
            #fallback
          }
        },
        None => quote! {
          if let Some(value) = &#ident {
            #body
          }
        },
      }
    };
    tokens.extend(ts);
  }
}

#[derive(Clone, Debug)]
pub(crate) struct HeaderParamFragment<'a> {
  param: &'a ParameterDeclaration,
}

impl ToTokens for HeaderParamFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let param = self.param;
    let ident = param_ident(param);
    let wire = param.wire_name.as_str();

    let header = |value: TokenStream| {
      let rendered = if param.is_array() {
        quote! { join_values(#value) }
      } else {
        quote! { (#value).to_string() }
      };
      quote! {
        request = request.header(#wire, reqwest::header::HeaderValue::from_str(&#rendered)?);
      }
    };

    let ts = if param.required {
      header(quote! { &#ident })
    } else {
      let body = header(quote! { value });
      match default_wire_values(param) {
        Some(values) => {
          let joined = values.join(",");
          quote! {
            if let Some(value) = &#ident {
              #body
            } else {
              request = request.header(#wire, reqwest::header::HeaderValue::from_str(#joined)?);
            }
          }
        }
        None => quote! {
          if let Some(value) = &#ident {
            #body
          }
        },
      }
    };
    tokens.extend(ts);
  }
}

#[derive(Clone, Debug)]
pub(crate) struct BodyFragment<'a> {
  param: &'a ParameterDeclaration,
}

impl BodyFragment<'_> {
  fn chain(encoding: BodyEncoding, value: &TokenStream) -> TokenStream {
    match encoding {
      BodyEncoding::Json => quote! { request = request.json(#value); },
      BodyEncoding::FormUrlEncoded => quote! { request = request.form(#value); },
      BodyEncoding::Multipart => quote! { request = request.multipart(multipart_form(#value)?); },
      BodyEncoding::Text => quote! {
        request = request
          .header(reqwest::header::CONTENT_TYPE, "text/plain")
          .body((#value).to_string());
      },
      BodyEncoding::Xml => quote! {
        request = request
          .header(reqwest::header::CONTENT_TYPE, "application/xml")
          .body((#value).to_string());
      },
      BodyEncoding::Binary => quote! {
        request = request
          .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
          .body((#value).clone());
      },
    }
  }
}

impl ToTokens for BodyFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ident = param_ident(self.param);
    let encoding = self.param.encoding.unwrap_or(BodyEncoding::Json);

    let ts = if self.param.required {
      Self::chain(encoding, &quote! { &#ident })
    } else {
      let body = Self::chain(encoding, &quote! { body });
      quote! {
        if let Some(body) = &#ident {
          #body
        }
      }
    };
    tokens.extend(ts);
  }
}

fn decode_expr(decode: ResponseDecode, payload: Option<&TypeExpr>) -> TokenStream {
  match (decode, payload) {
    (ResponseDecode::Json, Some(ty)) => quote! { response.json::<#ty>().await? },
    (ResponseDecode::Json, None) => quote! { response.json::<serde_json::Value>().await? },
    (ResponseDecode::Text, _) => quote! { response.text().await? },
    (ResponseDecode::Bytes, _) => quote! { response.bytes().await?.to_vec() },
    (ResponseDecode::Empty, _) => quote! { () },
  }
}

/// Reads the response into the return type.
#[derive(Clone, Debug)]
pub(crate) struct ResponseFragment<'a> {
  returns: &'a ReturnShape,
}

impl ResponseFragment<'_> {
  fn arm(enum_name: &Ident, arm: &StatusArm) -> TokenStream {
    let variant = format_ident!("{}", arm.variant);
    let value = decode_expr(arm.decode, arm.payload.as_ref());
    match arm.status {
      ResponseStatus::Code(code) => {
        let code = Literal::u16_unsuffixed(code);
        if arm.payload.is_some() {
          quote! { #code => Ok(#enum_name::#variant(#value)), }
        } else {
          quote! { #code => Ok(#enum_name::#variant), }
        }
      }
      ResponseStatus::Default => quote! {
        status => Ok(#enum_name::#variant(DefaultStatusResponse {
          status,
          body: #value,
        })),
      },
    }
  }
}

impl ToTokens for ResponseFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self.returns {
      ReturnShape::Single { type_expr, decode } => {
        let value = decode_expr(*decode, Some(type_expr));
        match decode {
          ResponseDecode::Empty => quote! {
            ensure_success(response).await?;
            Ok(())
          },
          _ => quote! {
            let response = ensure_success(response).await?;
            Ok(#value)
          },
        }
      }
      ReturnShape::StatusBinding { enum_name, arms } => {
        let enum_name = format_ident!("{}", enum_name);
        let coded = arms
          .iter()
          .filter(|arm| arm.status != ResponseStatus::Default)
          .map(|arm| Self::arm(&enum_name, arm));
        let fallback = arms
          .iter()
          .find(|arm| arm.status == ResponseStatus::Default)
          .map_or_else(
            || {
              quote! {
                status => Err(ClientError::UnexpectedStatus {
                  status,
                  body: response.text().await.unwrap_or_default(),
                }),
              }
            },
            |arm| Self::arm(&enum_name, arm),
          );
        quote! {
          match response.status().as_u16() {
            #(#coded)*
            #fallback
          }
        }
      }
    };
    tokens.extend(ts);
  }
}

#[derive(Clone, Debug)]
pub(crate) struct RequestBodyFragment<'a> {
  function: &'a FunctionDescriptor,
  plan: &'a RequestPlan,
}

impl ToTokens for RequestBodyFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let function = self.function;
    let url = UrlFragment {
      plan: self.plan,
      params: &function.params,
    };
    let init = HttpInitFragment {
      method: self.plan.method.clone(),
    };

    let query = function
      .param(ParameterLocation::Query)
      .map(|param| QueryParamFragment { param })
      .collect::<Vec<_>>();
    let query = (!query.is_empty()).then(|| {
      quote! {
        let mut query: Vec<(&str, String)> = Vec::new();
        #(#query)*
        request = request.query(&query);
      }
    });
    let headers = function
      .param(ParameterLocation::Header)
      .map(|param| HeaderParamFragment { param })
      .collect::<Vec<_>>();
    let body = function
      .param(ParameterLocation::Body)
      .map(|param| BodyFragment { param })
      .collect::<Vec<_>>();

    let mutable = (query.is_some() || !headers.is_empty() || !body.is_empty()).then(|| quote! { mut });
    let response = ResponseFragment {
      returns: &function.returns,
    };

    tokens.extend(quote! {
      #url
      let #mutable request = #init;
      #query
      #(#headers)*
      #(#body)*
      let response = request.send().await?;
      #response
    });
  }
}

#[derive(Clone, Debug)]
pub(crate) struct MockBodyFragment<'a> {
  function: &'a FunctionDescriptor,
  plan: &'a MockPlan,
}

impl ToTokens for MockBodyFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let idents = self.function.params.iter().map(param_ident).collect::<Vec<_>>();
    let unused = (!idents.is_empty()).then(|| quote! { let _ = (#(&#idents,)*); });
    let example = JsonLiteralFragment(&self.plan.example);

    let value = match (&self.plan.variant, &self.function.returns) {
      (Some(variant), ReturnShape::StatusBinding { enum_name, .. }) => {
        let enum_name = format_ident!("{}", enum_name);
        let variant = format_ident!("{}", variant);
        quote! { #enum_name::#variant(serde_json::from_value(example)?) }
      }
      _ => quote! { serde_json::from_value(example)? },
    };

    tokens.extend(quote! {
      #unused
      let example = serde_json::json!(#example);
      Ok(#value)
    });
  }
}

/// One method of the client `impl` block.
#[derive(Clone, Debug)]
pub(crate) struct MethodFragment<'a> {
  function: &'a FunctionDescriptor,
  visibility: Visibility,
}

impl MethodFragment<'_> {
  fn docs(&self) -> Documentation {
    let mut docs = self.function.docs.clone();
    let described = self
      .function
      .params
      .iter()
      .filter(|p| !p.docs.is_empty() || p.default.is_some())
      .collect::<Vec<_>>();
    if docs.is_empty() || described.is_empty() {
      return docs;
    }

    docs.push_paragraph("# Parameters");
    docs.push("");
    for param in described {
      let mut line = format!("- `{}`:", param.name.trim_start_matches("r#"));
      if let Some(first) = param.docs.lines().first() {
        line.push(' ');
        line.push_str(first);
      }
      if let Some(default) = &param.default {
        line.push_str(&format!(" Defaults to `{default}`."));
      }
      docs.push(line);
    }
    docs
  }
}

impl ToTokens for MethodFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let function = self.function;
    let name = format_ident!("{}", function.name);
    let ret = function.returns.type_expr();
    let params = function.params.iter().map(|param| {
      let ident = param_ident(param);
      let ty = param.signature_type();
      quote! { #ident: #ty }
    });

    let (vis, error, docs, deprecated) = match function.visibility {
      MethodVisibility::Public => (
        self.visibility.item_tokens(),
        quote! { ClientError },
        self.docs(),
        function.deprecated.then(|| quote! { #[deprecated] }),
      ),
      MethodVisibility::Private => (
        quote! {},
        quote! { ClientMethodInvocationError },
        Documentation::default(),
        None,
      ),
    };

    let body = match &function.body {
      FunctionBody::Request(plan) => RequestBodyFragment { function, plan }.into_token_stream(),
      FunctionBody::Mock(plan) => MockBodyFragment { function, plan }.into_token_stream(),
      FunctionBody::Delegate { target } => {
        let target = format_ident!("{}", target);
        let args = function.params.iter().map(param_ident);
        quote! { self.#target(#(#args),*).await }
      }
    };

    tokens.extend(quote! {
      #docs
      #deprecated
      #vis async fn #name(&self, #(#params),*) -> Result<#ret, #error> {
        #body
      }
    });
  }
}

/// Contents of the generated `client.rs`.
#[derive(Clone, Debug)]
pub(crate) struct ClientFragment<'a> {
  output: &'a GenerationOutput,
  visibility: Visibility,
}

impl<'a> ClientFragment<'a> {
  pub(crate) fn new(output: &'a GenerationOutput, visibility: Visibility) -> Self {
    Self { output, visibility }
  }
}

impl ToTokens for ClientFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let output = self.output;
    let vis = self.visibility.item_tokens();
    let client = format_ident!("{}", output.client_name);
    let base_url = output.base_url.as_str();
    let methods = output.functions.iter().map(|function| MethodFragment {
      function,
      visibility: self.visibility,
    });
    let marker = output
      .uses_status_binding
      .then(|| quote! { impl ClientMethodImpl for #client {} });

    tokens.extend(quote! {
      #![allow(clippy::too_many_arguments, unused_imports)]

      use super::{types::*, utils::*};

      /// Server URL declared by the document.
      #vis const BASE_URL: &str = #base_url;

      #[derive(Debug, Clone)]
      #vis struct #client {
        client: reqwest::Client,
        base_url: String,
      }

      impl #client {
        /// Creates a client with a default `reqwest::Client`.
        #vis fn new(base_url: impl Into<String>) -> Self {
          Self::with_client(reqwest::Client::new(), base_url)
        }

        /// Creates a client from an existing `reqwest::Client`.
        #vis fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
          Self {
            client,
            base_url: base_url.into(),
          }
        }

        #vis fn base_url(&self) -> &str {
          &self.base_url
        }

        #(#methods)*
      }

      impl Default for #client {
        fn default() -> Self {
          Self::new(BASE_URL)
        }
      }

      #marker
    });
  }
}
