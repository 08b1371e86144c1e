/// Status codes the status-code binding mode can express, with the variant
/// name used for each in generated response enums.
pub(crate) const STATUS_CODE_DESCRIPTIONS: &[(u16, &str)] = &[
  (100, "Continue"),
  (101, "SwitchingProtocols"),
  (102, "Processing"),
  (103, "EarlyHints"),
  (200, "Ok"),
  (201, "Created"),
  (202, "Accepted"),
  (203, "NonAuthoritativeInformation"),
  (204, "NoContent"),
  (205, "ResetContent"),
  (206, "PartialContent"),
  (207, "MultiStatus"),
  (208, "AlreadyReported"),
  (226, "ImUsed"),
  (300, "MultipleChoices"),
  (301, "MovedPermanently"),
  (302, "Found"),
  (303, "SeeOther"),
  (304, "NotModified"),
  (305, "UseProxy"),
  (307, "TemporaryRedirect"),
  (308, "PermanentRedirect"),
  (400, "BadRequest"),
  (401, "Unauthorized"),
  (402, "PaymentRequired"),
  (403, "Forbidden"),
  (404, "NotFound"),
  (405, "MethodNotAllowed"),
  (406, "NotAcceptable"),
  (407, "ProxyAuthenticationRequired"),
  (408, "RequestTimeout"),
  (409, "Conflict"),
  (410, "Gone"),
  (411, "LengthRequired"),
  (412, "PreconditionFailed"),
  (413, "PayloadTooLarge"),
  (414, "UriTooLong"),
  (415, "UnsupportedMediaType"),
  (416, "RangeNotSatisfiable"),
  (417, "ExpectationFailed"),
  (421, "MisdirectedRequest"),
  (422, "UnprocessableEntity"),
  (423, "Locked"),
  (424, "FailedDependency"),
  (425, "TooEarly"),
  (426, "UpgradeRequired"),
  (428, "PreconditionRequired"),
  (429, "TooManyRequests"),
  (431, "RequestHeaderFieldsTooLarge"),
  (451, "UnavailableForLegalReasons"),
  (500, "InternalServerError"),
  (501, "NotImplemented"),
  (502, "BadGateway"),
  (503, "ServiceUnavailable"),
  (504, "GatewayTimeout"),
  (505, "HttpVersionNotSupported"),
  (506, "VariantAlsoNegotiates"),
  (507, "InsufficientStorage"),
  (508, "LoopDetected"),
  (510, "NotExtended"),
  (511, "NetworkAuthenticationRequired"),
];

pub(crate) const DEFAULT_STATUS_KEY: &str = "default";

/// A response key from the `responses` map, classified for status-code binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusKey {
  Code { code: u16, variant: &'static str },
  Default,
  Unsupported,
}

impl StatusKey {
  pub(crate) fn parse(key: &str) -> Self {
    if key.eq_ignore_ascii_case(DEFAULT_STATUS_KEY) {
      return Self::Default;
    }
    key
      .parse::<u16>()
      .ok()
      .and_then(|code| {
        STATUS_CODE_DESCRIPTIONS
          .binary_search_by_key(&code, |(c, _)| *c)
          .ok()
          .map(|idx| Self::Code {
            code,
            variant: STATUS_CODE_DESCRIPTIONS[idx].1,
          })
      })
      .unwrap_or(Self::Unsupported)
  }
}

/// True for `2xx` codes and the `2XX` range key.
pub(crate) fn is_success_key(key: &str) -> bool {
  if key.eq_ignore_ascii_case("2xx") {
    return true;
  }
  key.parse::<u16>().is_ok_and(|code| (200..300).contains(&code))
}
