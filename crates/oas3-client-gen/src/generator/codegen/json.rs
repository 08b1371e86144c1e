use proc_macro2::{Literal, TokenStream};
use quote::{ToTokens, quote};
use serde_json::{Number, Value};

/// A JSON value written as the body of a `serde_json::json!` invocation.
#[derive(Debug, Clone)]
pub(crate) struct JsonLiteralFragment<'a>(pub(crate) &'a Value);

impl ToTokens for JsonLiteralFragment<'_> {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ts = match self.0 {
      Value::Null => quote! { null },
      Value::Bool(true) => quote! { true },
      Value::Bool(false) => quote! { false },
      Value::Number(number) => number_tokens(number),
      Value::String(s) => Literal::string(s).into_token_stream(),
      Value::Array(items) => {
        let items = items.iter().map(JsonLiteralFragment);
        quote! { [#(#items),*] }
      }
      Value::Object(map) => {
        let entries = map.iter().map(|(key, value)| {
          let key = Literal::string(key);
          let value = JsonLiteralFragment(value);
          quote! { #key: #value }
        });
        quote! { { #(#entries),* } }
      }
    };
    tokens.extend(ts);
  }
}

fn number_tokens(number: &Number) -> TokenStream {
  let literal = if let Some(uint) = number.as_u64() {
    Literal::u64_unsuffixed(uint)
  } else if let Some(int) = number.as_i64() {
    let magnitude = Literal::u64_unsuffixed(int.unsigned_abs());
    return quote! { -#magnitude };
  } else {
    let float = number.as_f64().unwrap_or_default();
    if float < 0.0 {
      let magnitude = Literal::f64_unsuffixed(-float);
      return quote! { -#magnitude };
    }
    Literal::f64_unsuffixed(float)
  };
  literal.into_token_stream()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_nested_value_renders_as_json_macro_body() {
    let value = json!({"id": 7, "name": "Rex", "tags": ["a", null], "weight": -1.5, "good": true});
    let fragment = JsonLiteralFragment(&value);
    let rendered = quote! { serde_json::json!(#fragment) }.to_string();
    assert!(rendered.contains("\"id\" : 7"), "{rendered}");
    assert!(rendered.contains("\"tags\" : [\"a\" , null]"), "{rendered}");
    assert!(rendered.contains("- 1.5"), "{rendered}");
  }

  #[test]
  fn test_strings_are_escaped() {
    let value = json!("say \"hi\"");
    let rendered = JsonLiteralFragment(&value).into_token_stream().to_string();
    assert_eq!(rendered, r#""say \"hi\"""#);
  }
}
