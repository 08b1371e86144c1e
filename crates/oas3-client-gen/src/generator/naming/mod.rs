pub(crate) mod identifiers;
pub(crate) mod status_codes;
