use crate::generator::ast::{FunctionBody, FunctionDescriptor, MethodVisibility};

const IMPL_SUFFIX: &str = "_impl";

/// Name of the private method that performs the status-code dispatch.
pub(crate) fn impl_name(name: &str) -> String {
  format!("{name}{IMPL_SUFFIX}")
}

/// Splits a status-code-binding method into the public method and the private
/// `_impl` it delegates to. Both carry the same signature.
pub(crate) fn split_impl(function: FunctionDescriptor) -> [FunctionDescriptor; 2] {
  let target = impl_name(&function.name);

  let public = FunctionDescriptor {
    body: FunctionBody::Delegate { target: target.clone() },
    visibility: MethodVisibility::Public,
    ..function.clone()
  };
  let private = FunctionDescriptor {
    name: target,
    docs: Default::default(),
    visibility: MethodVisibility::Private,
    diagnostics: Default::default(),
    ..function
  };
  [public, private]
}
