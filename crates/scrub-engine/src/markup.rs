//! Markup (XML) walking.
//!
//! The document is rewritten as an event stream rather than a node
//! tree, so arbitrarily deep documents never grow the call stack.
//! Element and attribute names are never altered; only text payloads
//! and attribute values pass through the redactor.

use std::path::Path;

use quick_xml::events::{BytesCData, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use scrub_core::TextRedactor;
use tracing::warn;

use crate::{text, Result};

/// Sanitize one markup file in place.
///
/// If the content does not parse as well-formed markup the raw text is
/// redacted instead; a malformed file is never lost or skipped.
pub(crate) fn sanitize_file(path: &Path, redactor: &TextRedactor) -> Result<u64> {
    let (content, encoding) = text::read_text(path)?;
    match rewrite(&content, redactor) {
        Ok((rewritten, count)) => {
            if count > 0 {
                text::write_text(path, &rewritten, encoding)?;
            }
            Ok(count)
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "could not parse markup, redacting as text");
            let (redacted, count) = redactor.redact(&content);
            if redacted != content {
                text::write_text(path, &redacted, encoding)?;
            }
            Ok(count)
        }
    }
}

fn rewrite(content: &str, redactor: &TextRedactor) -> Result<(String, u64)> {
    let mut reader = Reader::from_str(content);
    let mut writer = Writer::new(Vec::new());
    let mut count = 0u64;

    loop {
        match reader.read_event()? {
            Event::Eof => break,
            Event::Start(elem) => {
                let (elem, n) = redact_attributes(&elem, redactor)?;
                count += n;
                writer.write_event(Event::Start(elem))?;
            }
            Event::Empty(elem) => {
                let (elem, n) = redact_attributes(&elem, redactor)?;
                count += n;
                writer.write_event(Event::Empty(elem))?;
            }
            Event::Text(t) => {
                let raw = t.unescape()?;
                let (redacted, n) = redactor.redact(&raw);
                count += n;
                writer.write_event(Event::Text(BytesText::new(&redacted)))?;
            }
            Event::CData(c) => {
                let raw = c.into_inner();
                let raw = String::from_utf8_lossy(&raw);
                let (redacted, n) = redactor.redact(&raw);
                count += n;
                writer.write_event(Event::CData(BytesCData::new(redacted.as_str())))?;
            }
            // Declaration, comments, PIs, doctype and end tags pass
            // through untouched.
            other => writer.write_event(other)?,
        }
    }

    let bytes = writer.into_inner();
    Ok((String::from_utf8_lossy(&bytes).into_owned(), count))
}

/// Rebuild an element with the same name and attribute order, values
/// redacted.
fn redact_attributes(
    elem: &BytesStart<'_>,
    redactor: &TextRedactor,
) -> Result<(BytesStart<'static>, u64)> {
    let mut count = 0u64;
    let mut attrs: Vec<(String, String)> = Vec::new();

    for attr in elem.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?;
        let (redacted, n) = redactor.redact(&value);
        count += n;
        attrs.push((key, redacted));
    }

    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);
    for (key, value) in &attrs {
        out.push_attribute((key.as_str(), value.as_str()));
    }
    Ok((out, count))
}
