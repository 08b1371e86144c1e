mod declarations;
mod documentation;
mod functions;
mod path_template;
mod types;

pub use declarations::{
  Constraints, DeclarationKind, EnumDef, EnumVariant, FieldDef, NewtypeDef, RecordDef, ResponseEnumDef,
  ResponseStatus, ResponseVariant, RestField, TypeDeclaration, UnionDef, UnionVariant,
};
pub use documentation::Documentation;
pub use functions::{
  BodyEncoding, FunctionBody, FunctionDescriptor, MethodVisibility, MockPlan, ParameterDeclaration,
  ParameterLocation, RequestPlan, ResponseDecode, ReturnShape, RouteStyle, StatusArm, sort_parameters,
};
pub use path_template::{PathParseError, PathSegment, PathTemplate, SegmentPart};
pub use types::{RustPrimitive, TypeExpr};
