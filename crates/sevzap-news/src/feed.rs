//! Minimal RSS 2.0 / RSS 1.0 / Atom reader.
//!
//! Only the fields headlines need are extracted: the feed title and, per
//! entry, title, link and publication date. Entries keep document order.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedParseError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document is not an RSS or Atom feed")]
    NotAFeed,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub published: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

fn is_entry(name: &[u8]) -> bool {
    name == b"item" || name == b"entry"
}

fn is_feed_root(name: &[u8]) -> bool {
    matches!(name, b"rss" | b"feed" | b"RDF")
}

fn non_empty(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Atom `<link href=".." rel="..">`. Only alternate (or unmarked) links count.
fn atom_href(e: &BytesStart<'_>) -> Result<Option<String>, FeedParseError> {
    let mut href = None;
    let mut rel_ok = true;
    for attr in e.attributes().flatten() {
        match attr.key.local_name().as_ref() {
            b"href" => href = Some(attr.unescape_value()?.into_owned()),
            b"rel" => rel_ok = attr.unescape_value()?.as_ref() == "alternate",
            _ => {}
        }
    }
    Ok(href.filter(|_| rel_ok))
}

/// Parse an RSS or Atom document.
pub fn parse_feed(xml: &str) -> Result<Feed, FeedParseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut feed = Feed::default();
    let mut seen_root = false;
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut entry: Option<FeedEntry> = None;
    // Atom <updated>, used only when the entry has no <published>
    let mut updated: Option<String> = None;
    let mut text = String::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                if is_feed_root(&name) {
                    seen_root = true;
                }
                if is_entry(&name) {
                    entry = Some(FeedEntry::default());
                    updated = None;
                }
                if name == b"link" {
                    if let (Some(current), Some(href)) = (entry.as_mut(), atom_href(&e)?) {
                        current.link.get_or_insert(href);
                    }
                }
                text.clear();
                path.push(name);
            }
            Event::Empty(e) => {
                if e.local_name().as_ref() == b"link" {
                    if let (Some(current), Some(href)) = (entry.as_mut(), atom_href(&e)?) {
                        current.link.get_or_insert(href);
                    }
                }
            }
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::End(_) => {
                let Some(name) = path.pop() else {
                    continue;
                };
                let value = non_empty(&text);
                text.clear();

                if is_entry(&name) {
                    if let Some(mut done) = entry.take() {
                        if done.published.is_none() {
                            done.published = updated.take();
                        }
                        feed.entries.push(done);
                    }
                    continue;
                }

                match (entry.as_mut(), name.as_slice()) {
                    (Some(current), b"title") => {
                        if current.title.is_none() {
                            current.title = value;
                        }
                    }
                    (Some(current), b"link") => {
                        if let Some(link) = value {
                            current.link.get_or_insert(link);
                        }
                    }
                    (Some(current), b"pubDate" | b"published" | b"date") => {
                        if current.published.is_none() {
                            current.published = value;
                        }
                    }
                    (Some(_), b"updated") => {
                        if updated.is_none() {
                            updated = value;
                        }
                    }
                    (None, b"title") => {
                        let parent = path.last().map(Vec::as_slice);
                        if feed.title.is_none() && matches!(parent, Some(b"channel" | b"feed")) {
                            feed.title = value;
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(FeedParseError::NotAFeed);
    }
    Ok(feed)
}
