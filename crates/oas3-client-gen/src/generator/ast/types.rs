use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use strum::Display;

/// Rust primitive and standard library types a schema can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display)]
pub enum RustPrimitive {
  #[strum(to_string = "i8")]
  I8,
  #[strum(to_string = "i16")]
  I16,
  #[strum(to_string = "i32")]
  I32,
  #[default]
  #[strum(to_string = "i64")]
  I64,
  #[strum(to_string = "u8")]
  U8,
  #[strum(to_string = "u16")]
  U16,
  #[strum(to_string = "u32")]
  U32,
  #[strum(to_string = "u64")]
  U64,
  #[strum(to_string = "f32")]
  F32,
  #[strum(to_string = "f64")]
  F64,
  #[strum(to_string = "bool")]
  Bool,
  #[strum(to_string = "String")]
  String,
  #[strum(to_string = "Vec<u8>")]
  Bytes,
  #[strum(to_string = "chrono::NaiveDate")]
  Date,
  #[strum(to_string = "chrono::DateTime<chrono::Utc>")]
  DateTime,
  #[strum(to_string = "chrono::NaiveTime")]
  Time,
  #[strum(to_string = "uuid::Uuid")]
  Uuid,
  #[strum(to_string = "()")]
  Unit,
}

impl RustPrimitive {
  pub const fn is_integer(self) -> bool {
    matches!(
      self,
      Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64
    )
  }

  pub const fn is_float(self) -> bool {
    matches!(self, Self::F32 | Self::F64)
  }

  /// Values that render to a single URL or header token via `Display`.
  pub const fn is_scalar(self) -> bool {
    !matches!(self, Self::Bytes | Self::Unit)
  }

  /// Name used when the primitive contributes to a synthesized identifier.
  pub const fn name_fragment(self) -> &'static str {
    match self {
      Self::I8 | Self::I16 | Self::I32 | Self::I64 | Self::U8 | Self::U16 | Self::U32 | Self::U64 => "Integer",
      Self::F32 | Self::F64 => "Number",
      Self::Bool => "Boolean",
      Self::String => "String",
      Self::Bytes => "Bytes",
      Self::Date => "Date",
      Self::DateTime => "DateTime",
      Self::Time => "Time",
      Self::Uuid => "Uuid",
      Self::Unit => "Unit",
    }
  }
}

impl ToTokens for RustPrimitive {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ty = match self {
      Self::I8 => quote! { i8 },
      Self::I16 => quote! { i16 },
      Self::I32 => quote! { i32 },
      Self::I64 => quote! { i64 },
      Self::U8 => quote! { u8 },
      Self::U16 => quote! { u16 },
      Self::U32 => quote! { u32 },
      Self::U64 => quote! { u64 },
      Self::F32 => quote! { f32 },
      Self::F64 => quote! { f64 },
      Self::Bool => quote! { bool },
      Self::String => quote! { String },
      Self::Bytes => quote! { Vec<u8> },
      Self::Date => quote! { chrono::NaiveDate },
      Self::DateTime => quote! { chrono::DateTime<chrono::Utc> },
      Self::Time => quote! { chrono::NaiveTime },
      Self::Uuid => quote! { uuid::Uuid },
      Self::Unit => quote! { () },
    };
    ty.to_tokens(tokens);
  }
}

/// Lightweight reference to a type, embedded wherever a type is used.
///
/// `Named` points into the type registry by name. A handle produced while
/// the named declaration is still under construction is `recursive` and
/// renders boxed when it sits directly inside a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeExpr {
  Primitive(RustPrimitive),
  Named { name: String, recursive: bool },
  Array { item: Box<TypeExpr>, dimensions: u8 },
  Map(Box<TypeExpr>),
  Optional(Box<TypeExpr>),
  Any,
}

impl TypeExpr {
  pub fn named(name: impl Into<String>) -> Self {
    Self::Named {
      name: name.into(),
      recursive: false,
    }
  }

  pub fn placeholder(name: impl Into<String>) -> Self {
    Self::Named {
      name: name.into(),
      recursive: true,
    }
  }

  /// Wraps in an array, folding nested arrays into one dimension counter.
  pub fn array_of(item: TypeExpr) -> Self {
    match item {
      Self::Array { item, dimensions } => Self::Array {
        item,
        dimensions: dimensions.saturating_add(1),
      },
      other => Self::Array {
        item: Box::new(other.without_recursion()),
        dimensions: 1,
      },
    }
  }

  pub fn map_of(value: TypeExpr) -> Self {
    Self::Map(Box::new(value.without_recursion()))
  }

  pub fn optional(self) -> Self {
    match self {
      Self::Optional(_) => self,
      other => Self::Optional(Box::new(other)),
    }
  }

  pub fn is_optional(&self) -> bool {
    matches!(self, Self::Optional(_))
  }

  /// Drops the optional wrapper, if any.
  pub fn required(self) -> Self {
    match self {
      Self::Optional(inner) => *inner,
      other => other,
    }
  }

  /// Collections already provide indirection, so recursion markers inside them are dropped.
  pub fn without_recursion(self) -> Self {
    match self {
      Self::Named { name, .. } => Self::named(name),
      other => other,
    }
  }

  pub fn named_type(&self) -> Option<&str> {
    match self {
      Self::Named { name, .. } => Some(name),
      Self::Optional(inner) => inner.named_type(),
      _ => None,
    }
  }

  pub fn primitive(&self) -> Option<RustPrimitive> {
    match self {
      Self::Primitive(primitive) => Some(*primitive),
      Self::Optional(inner) => inner.primitive(),
      _ => None,
    }
  }

  /// Identifier fragment describing this type, used for union variants and hoisted names.
  pub fn name_fragment(&self) -> String {
    match self {
      Self::Primitive(primitive) => primitive.name_fragment().to_string(),
      Self::Named { name, .. } => name.clone(),
      Self::Array { item, dimensions } => format!("{}{}", item.name_fragment(), "List".repeat(usize::from(*dimensions))),
      Self::Map(value) => format!("{}Map", value.name_fragment()),
      Self::Optional(inner) => inner.name_fragment(),
      Self::Any => "Value".to_string(),
    }
  }

  /// Full Rust type as source text.
  pub fn to_rust_type(&self) -> String {
    match self {
      Self::Primitive(primitive) => primitive.to_string(),
      Self::Named { name, recursive } => {
        if *recursive {
          format!("Box<{name}>")
        } else {
          name.clone()
        }
      }
      Self::Array { item, dimensions } => {
        let mut rendered = item.to_rust_type();
        for _ in 0..*dimensions {
          rendered = format!("Vec<{rendered}>");
        }
        rendered
      }
      Self::Map(value) => format!("std::collections::HashMap<String, {}>", value.to_rust_type()),
      Self::Optional(inner) => format!("Option<{}>", inner.to_rust_type()),
      Self::Any => "serde_json::Value".to_string(),
    }
  }
}

impl From<RustPrimitive> for TypeExpr {
  fn from(primitive: RustPrimitive) -> Self {
    Self::Primitive(primitive)
  }
}

impl ToTokens for TypeExpr {
  fn to_tokens(&self, tokens: &mut TokenStream) {
    let ty = match self {
      Self::Primitive(primitive) => quote! { #primitive },
      Self::Named { name, recursive } => {
        let ident = format_ident!("{}", name);
        if *recursive {
          quote! { Box<#ident> }
        } else {
          quote! { #ident }
        }
      }
      Self::Array { item, dimensions } => {
        let mut rendered = quote! { #item };
        for _ in 0..*dimensions {
          rendered = quote! { Vec<#rendered> };
        }
        rendered
      }
      Self::Map(value) => quote! { std::collections::HashMap<String, #value> },
      Self::Optional(inner) => quote! { Option<#inner> },
      Self::Any => quote! { serde_json::Value },
    };
    ty.to_tokens(tokens);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_array_dimensions_fold() {
    let inner = TypeExpr::array_of(RustPrimitive::String.into());
    let outer = TypeExpr::array_of(inner);
    assert_eq!(
      outer,
      TypeExpr::Array {
        item: Box::new(RustPrimitive::String.into()),
        dimensions: 2
      }
    );
    assert_eq!(outer.to_rust_type(), "Vec<Vec<String>>");
  }

  #[test]
  fn test_recursive_handle_unboxed_inside_collections() {
    let node = TypeExpr::placeholder("Node");
    assert_eq!(node.to_rust_type(), "Box<Node>");
    assert_eq!(TypeExpr::array_of(node.clone()).to_rust_type(), "Vec<Node>");
    assert_eq!(
      TypeExpr::map_of(node.clone()).to_rust_type(),
      "std::collections::HashMap<String, Node>"
    );
    assert_eq!(node.optional().to_rust_type(), "Option<Box<Node>>");
  }

  #[test]
  fn test_optional_does_not_nest() {
    let ty = TypeExpr::from(RustPrimitive::I32).optional().optional();
    assert_eq!(ty.to_rust_type(), "Option<i32>");
    assert_eq!(ty.required(), TypeExpr::Primitive(RustPrimitive::I32));
  }

  #[test]
  fn test_tokens_match_source_text() {
    let ty = TypeExpr::map_of(TypeExpr::array_of(TypeExpr::named("Pet"))).optional();
    let tokens = quote! { #ty };
    let parsed: syn::Type = syn::parse2(tokens).unwrap();
    let expected: syn::Type = syn::parse_str(&ty.to_rust_type()).unwrap();
    assert_eq!(quote! { #parsed }.to_string(), quote! { #expected }.to_string());
  }

  #[test]
  fn test_name_fragments() {
    assert_eq!(TypeExpr::from(RustPrimitive::I64).name_fragment(), "Integer");
    assert_eq!(TypeExpr::array_of(TypeExpr::named("Pet")).name_fragment(), "PetList");
    assert_eq!(TypeExpr::Any.name_fragment(), "Value");
  }
}
