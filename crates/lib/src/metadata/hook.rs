//! Rewriting of the hook descriptor's `language-properties` list.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

const ROOT: &[u8] = b"hook";
const LANGUAGE_PROPERTIES: &str = "language-properties";
const DEFAULT_INDENT: &str = "\n\t";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum HookError {
  #[error("invalid XML: {0}")]
  Xml(String),

  #[error("expected root element <hook>, found <{0}>")]
  UnexpectedRoot(String),

  #[error("document has no root element")]
  MissingRoot,

  #[error("element <{0}> is never closed")]
  Unclosed(String),
}

/// Replace every top-level `language-properties` element of a hook document
/// with one element per entry, in the order given.
///
/// The new list takes the place of the first existing element, or goes at
/// the end of `<hook>` when there was none. Everything else in the document
/// is written back as read.
pub fn rewrite_language_properties(xml: &str, entries: &[String]) -> Result<String, HookError> {
  let events = read_events(xml)?;

  let mut out: Vec<Event<'_>> = Vec::with_capacity(events.len() + entries.len() * 4);
  let mut depth = 0usize;
  let mut indent: Option<String> = None;
  let mut inserted = false;
  let mut skipping = 0usize;

  for event in events {
    if skipping > 0 {
      match event {
        Event::Start(_) => skipping += 1,
        Event::End(_) => skipping -= 1,
        _ => {}
      }
      continue;
    }

    match &event {
      Event::Start(e) if depth == 1 && e.name().as_ref() == LANGUAGE_PROPERTIES.as_bytes() => {
        note_removed(&mut out, &mut indent);
        skipping = 1;
        if !inserted {
          push_entries(&mut out, entries, indent.as_deref().unwrap_or(DEFAULT_INDENT));
          inserted = true;
        }
        continue;
      }
      Event::Empty(e) if depth == 1 && e.name().as_ref() == LANGUAGE_PROPERTIES.as_bytes() => {
        note_removed(&mut out, &mut indent);
        if !inserted {
          push_entries(&mut out, entries, indent.as_deref().unwrap_or(DEFAULT_INDENT));
          inserted = true;
        }
        continue;
      }
      Event::Empty(e) if depth == 0 => {
        // `<hook/>`: open it up so there is room for the list
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        out.push(Event::Start(BytesStart::new(name.clone())));
        push_entries(&mut out, entries, DEFAULT_INDENT);
        out.push(Event::Text(BytesText::new("\n")));
        out.push(Event::End(BytesEnd::new(name)));
        inserted = true;
        continue;
      }
      Event::Start(_) => depth += 1,
      Event::End(_) => {
        depth -= 1;
        if depth == 0 && !inserted {
          insert_before_closing(&mut out, entries);
          inserted = true;
        }
      }
      _ => {}
    }
    out.push(event);
  }

  let mut writer = Writer::new(Vec::with_capacity(xml.len()));
  for event in out {
    writer.write_event(event).map_err(|e| HookError::Xml(e.to_string()))?;
  }
  String::from_utf8(writer.into_inner()).map_err(|e| HookError::Xml(e.to_string()))
}

/// Parse the whole document, checking the root and that every element closes.
fn read_events(xml: &str) -> Result<Vec<Event<'_>>, HookError> {
  let mut reader = Reader::from_str(xml);
  let mut events = Vec::new();
  let mut open: Vec<String> = Vec::new();
  let mut seen_root = false;

  loop {
    let event = reader.read_event().map_err(|e| {
      HookError::Xml(format!("{} at position {}", e, reader.error_position()))
    })?;

    match &event {
      Event::Eof => break,
      Event::Start(e) | Event::Empty(e) => {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        if open.is_empty() {
          if seen_root {
            return Err(HookError::Xml(format!("unexpected second root element <{name}>")));
          }
          if e.name().as_ref() != ROOT {
            return Err(HookError::UnexpectedRoot(name));
          }
          seen_root = true;
        }
        if matches!(event, Event::Start(_)) {
          open.push(name);
        }
      }
      Event::End(_) => {
        open.pop();
      }
      _ => {}
    }
    events.push(event);
  }

  if let Some(name) = open.pop() {
    return Err(HookError::Unclosed(name));
  }
  if !seen_root {
    return Err(HookError::MissingRoot);
  }
  Ok(events)
}

/// Drop the whitespace that led up to a removed element, remembering it as
/// the indentation for the new list.
fn note_removed(out: &mut Vec<Event<'_>>, indent: &mut Option<String>) {
  if let Some(Event::Text(text)) = out.last()
    && text.iter().all(u8::is_ascii_whitespace)
  {
    let ws = String::from_utf8_lossy(text).into_owned();
    out.pop();
    if indent.is_none() {
      *indent = Some(ws);
    }
  }
}

fn push_entries<'a>(out: &mut Vec<Event<'a>>, entries: &[String], indent: &str) {
  for entry in entries {
    out.push(Event::Text(BytesText::from_escaped(indent.to_string())));
    out.push(Event::Start(BytesStart::new(LANGUAGE_PROPERTIES)));
    out.push(Event::Text(BytesText::new(entry).into_owned()));
    out.push(Event::End(BytesEnd::new(LANGUAGE_PROPERTIES)));
  }
}

/// Insert the list just before `</hook>`, ahead of its trailing whitespace.
fn insert_before_closing(out: &mut Vec<Event<'_>>, entries: &[String]) {
  if entries.is_empty() {
    return;
  }
  let trailing = match out.last() {
    Some(Event::Text(text)) if text.iter().all(u8::is_ascii_whitespace) => out.pop(),
    _ => None,
  };
  push_entries(out, entries, DEFAULT_INDENT);
  out.push(trailing.unwrap_or_else(|| Event::Text(BytesText::new("\n"))));
}
