//! Key rewriting for `.properties` documents.
//!
//! Only whole `key=value` lines are touched. Comments, blank lines,
//! continuation lines and unrelated keys are kept byte for byte.

/// Key of a property line, or `None` for comments and blank lines.
fn line_key(line: &str) -> Option<&str> {
  let trimmed = line.trim_start();
  if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
    return None;
  }
  let end = trimmed
    .find(|c: char| c == '=' || c == ':' || c.is_whitespace())
    .unwrap_or(trimmed.len());
  Some(&trimmed[..end])
}

/// Set each `(key, value)` in `content`.
///
/// Existing lines for a key are replaced in place; keys with no line are
/// appended in the order given.
pub fn set_keys(content: &str, entries: &[(&str, &str)]) -> String {
  let mut seen = vec![false; entries.len()];
  let mut out = String::with_capacity(content.len());

  for line in content.split_inclusive('\n') {
    let key = line_key(line.trim_end_matches(['\r', '\n']));
    match key.and_then(|k| entries.iter().position(|(name, _)| *name == k)) {
      Some(idx) => {
        let (name, value) = entries[idx];
        out.push_str(name);
        out.push('=');
        out.push_str(value);
        out.push('\n');
        seen[idx] = true;
      }
      None => out.push_str(line),
    }
  }

  let missing: Vec<_> = entries.iter().zip(&seen).filter(|(_, seen)| !**seen).collect();
  if !missing.is_empty() && !out.is_empty() && !out.ends_with('\n') {
    out.push('\n');
  }
  for ((name, value), _) in missing {
    out.push_str(name);
    out.push('=');
    out.push_str(value);
    out.push('\n');
  }

  out
}
