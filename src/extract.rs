//! Navigation text extraction.
//!
//! Produces the ordered sequence of human-readable fragments from navigation
//! markup. Two strategies compose behind one function: a strict streaming
//! XML pass, and a regex scrape used whenever the strict pass rejects the
//! markup. Malformed navigation documents are expected in the wild, so the
//! fallback is part of the design, not an error path.

use std::sync::OnceLock;

use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;

/// Extract the ordered text fragments from navigation markup.
///
/// Never fails: markup the XML reader rejects is re-scanned with a
/// text-between-tags pattern, which is less precise but total.
pub fn extract_texts(markup: &str) -> Vec<String> {
    match extract_strict(markup) {
        Ok(texts) => texts,
        Err(_) => extract_fallback(markup),
    }
}

/// Strict pass: stream the markup, accumulating character data between
/// element boundaries. Each boundary flushes the accumulated run, trimmed;
/// empty runs are discarded.
fn extract_strict(markup: &str) -> std::result::Result<Vec<String>, quick_xml::Error> {
    let mut reader = Reader::from_str(markup);

    let mut texts = Vec::new();
    let mut run = String::new();

    loop {
        match reader.read_event()? {
            Event::Text(e) => run.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::CData(e) => run.push_str(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                if let Some(resolved) = resolve_entity(&entity) {
                    run.push_str(&resolved);
                }
            }
            Event::Start(_) | Event::End(_) | Event::Empty(_) => flush(&mut run, &mut texts),
            Event::Eof => break,
            _ => {}
        }
    }
    flush(&mut run, &mut texts);

    Ok(texts)
}

fn flush(run: &mut String, texts: &mut Vec<String>) {
    let trimmed = run.trim();
    if !trimmed.is_empty() {
        texts.push(trimmed.to_string());
    }
    run.clear();
}

/// Fallback pass: scrape every text span between a `>` and the next `<`.
fn extract_fallback(markup: &str) -> Vec<String> {
    static TEXT_BETWEEN_TAGS: OnceLock<Regex> = OnceLock::new();
    let re = TEXT_BETWEEN_TAGS.get_or_init(|| Regex::new(r">([^<]+)<").expect("static pattern"));

    re.captures_iter(markup)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    if let Some(hex) = entity.strip_prefix("#x") {
        if let Ok(code) = u32::from_str_radix(hex, 16)
            && let Some(c) = char::from_u32(code)
        {
            return Some(c.to_string());
        }
    } else if let Some(dec) = entity.strip_prefix('#')
        && let Ok(code) = dec.parse::<u32>()
        && let Some(c) = char::from_u32(code)
    {
        return Some(c.to_string());
    }

    None
}
