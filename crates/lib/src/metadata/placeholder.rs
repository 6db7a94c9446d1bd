//! `@token@` placeholders in WEB-INF documents.
//!
//! A token is `@` followed by one or more of `[A-Za-z0-9._-]` and a closing
//! `@`. Anything else (a lone `@`, an e-mail address) is literal text.
//! Tokens the resolver does not know are written back unchanged.
//!
//! ```
//! use themeforge_lib::metadata::placeholder::{parse, Segment};
//!
//! let segments = parse("id=@theme.name@ (contact: me@example.com)");
//! assert_eq!(segments[1], Segment::Token("theme.name".to_string()));
//! ```

/// A segment of parsed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Literal(String),

  /// Token name, without the surrounding `@`.
  Token(String),
}

/// Supplies values for tokens.
pub trait Resolver {
  /// `None` leaves the token in place.
  fn resolve(&self, token: &str) -> Option<&str>;
}

fn is_token_char(c: char) -> bool {
  c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}

/// Split `input` into literal text and tokens.
pub fn parse(input: &str) -> Vec<Segment> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut rest = input;

  while let Some(at) = rest.find('@') {
    literal.push_str(&rest[..at]);
    let after = &rest[at + 1..];
    let name_len = after.find(|c: char| !is_token_char(c)).unwrap_or(after.len());

    if name_len > 0 && after[name_len..].starts_with('@') {
      if !literal.is_empty() {
        segments.push(Segment::Literal(std::mem::take(&mut literal)));
      }
      segments.push(Segment::Token(after[..name_len].to_string()));
      rest = &after[name_len + 1..];
    } else {
      literal.push('@');
      rest = after;
    }
  }
  literal.push_str(rest);

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }
  segments
}

/// Replace every known token in `input`.
pub fn substitute(input: &str, resolver: &impl Resolver) -> String {
  let mut out = String::with_capacity(input.len());
  for segment in parse(input) {
    match segment {
      Segment::Literal(s) => out.push_str(&s),
      Segment::Token(name) => match resolver.resolve(&name) {
        Some(value) => out.push_str(value),
        None => {
          out.push('@');
          out.push_str(&name);
          out.push('@');
        }
      },
    }
  }
  out
}
