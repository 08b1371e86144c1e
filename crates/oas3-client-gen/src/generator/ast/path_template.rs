use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PathParseError {
  #[strum(to_string = "unclosed '{{' at position {position} in segment '{segment}'")]
  UnclosedBrace { segment: String, position: usize },
  #[strum(to_string = "empty parameter '{{}}' in segment '{segment}'")]
  EmptyParameter { segment: String },
  #[strum(to_string = "unmatched '}}' at position {position} in segment '{segment}'")]
  UnmatchedClosingBrace { segment: String, position: usize },
  #[strum(to_string = "nested '{{' at position {position} in segment '{segment}'")]
  NestedBraces { segment: String, position: usize },
}

impl std::error::Error for PathParseError {}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SegmentPart {
  Literal(String),
  Param(String),
}

/// One `/`-delimited piece of a path template. Parameters hold their wire names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
  Literal(String),
  Param(String),
  Mixed(Vec<SegmentPart>),
}

impl PathSegment {
  fn parse(segment: &str) -> Result<Self, PathParseError> {
    let mut parts = tokenize(segment)?;
    Ok(match parts.len() {
      0 => Self::Literal(String::new()),
      1 => match parts.remove(0) {
        SegmentPart::Literal(lit) => Self::Literal(lit),
        SegmentPart::Param(name) => Self::Param(name),
      },
      _ => Self::Mixed(parts),
    })
  }

  pub fn params(&self) -> Vec<&str> {
    match self {
      Self::Literal(_) => vec![],
      Self::Param(name) => vec![name.as_str()],
      Self::Mixed(parts) => parts
        .iter()
        .filter_map(|part| match part {
          SegmentPart::Param(name) => Some(name.as_str()),
          SegmentPart::Literal(_) => None,
        })
        .collect(),
    }
  }

  /// Pieces used when deriving a resource-style method name.
  fn name_fragment(&self) -> String {
    match self {
      Self::Literal(lit) => lit.clone(),
      Self::Param(name) => format!("by_{name}"),
      Self::Mixed(parts) => parts
        .iter()
        .map(|part| match part {
          SegmentPart::Literal(lit) => lit.clone(),
          SegmentPart::Param(name) => format!("by_{name}"),
        })
        .collect::<Vec<_>>()
        .join("_"),
    }
  }
}

fn tokenize(segment: &str) -> Result<Vec<SegmentPart>, PathParseError> {
  let mut parts = vec![];
  let mut rest = segment;
  let mut offset = 0;

  while !rest.is_empty() {
    let Some(open_pos) = rest.find('{') else {
      if let Some(stray_close) = rest.find('}') {
        return Err(PathParseError::UnmatchedClosingBrace {
          segment: segment.to_string(),
          position: offset + stray_close,
        });
      }
      parts.push(SegmentPart::Literal(rest.to_string()));
      break;
    };

    if let Some(stray_close) = rest[..open_pos].find('}') {
      return Err(PathParseError::UnmatchedClosingBrace {
        segment: segment.to_string(),
        position: offset + stray_close,
      });
    }

    if open_pos > 0 {
      parts.push(SegmentPart::Literal(rest[..open_pos].to_string()));
    }

    let after_open = &rest[open_pos + 1..];
    let Some(close_pos) = after_open.find('}') else {
      return Err(PathParseError::UnclosedBrace {
        segment: segment.to_string(),
        position: offset + open_pos,
      });
    };

    if let Some(nested) = after_open[..close_pos].find('{') {
      return Err(PathParseError::NestedBraces {
        segment: segment.to_string(),
        position: offset + open_pos + 1 + nested,
      });
    }

    let name = &after_open[..close_pos];
    if name.is_empty() {
      return Err(PathParseError::EmptyParameter {
        segment: segment.to_string(),
      });
    }
    parts.push(SegmentPart::Param(name.to_string()));

    let consumed = open_pos + 1 + close_pos + 1;
    offset += consumed;
    rest = &rest[consumed..];
  }

  Ok(parts)
}

/// An operation path split into literal and parameter segments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PathTemplate {
  raw: String,
  segments: Vec<PathSegment>,
}

impl PathTemplate {
  pub fn parse(path: &str) -> Result<Self, PathParseError> {
    let segments = path
      .split('/')
      .filter(|s| !s.is_empty())
      .map(PathSegment::parse)
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self {
      raw: path.to_string(),
      segments,
    })
  }

  pub fn raw(&self) -> &str {
    &self.raw
  }

  pub fn segments(&self) -> &[PathSegment] {
    &self.segments
  }

  /// Parameter wire names in the order they appear in the path.
  pub fn params(&self) -> impl Iterator<Item = &str> {
    self.segments.iter().flat_map(PathSegment::params)
  }

  pub fn name_fragments(&self) -> impl Iterator<Item = String> + '_ {
    self.segments.iter().map(PathSegment::name_fragment)
  }
}
