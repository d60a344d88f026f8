//! `Accept` header -> response shape.
//!
//! The header is parsed into media ranges first; the decision is then taken on
//! the parsed ranges, not on the raw string.

use axum::http::{HeaderMap, header};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiatedFormat {
    /// API / ajax caller: wants a machine readable body.
    PrefersStructured,
    /// Browser: can display a page.
    PrefersDocument,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaRange {
    pub kind: String,
    pub subtype: String,
    pub quality: f32,
}

impl MediaRange {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (kind, subtype) = parts.next()?.trim().split_once('/')?;
        let (kind, subtype) = (kind.trim(), subtype.trim());
        if kind.is_empty() || subtype.is_empty() {
            return None;
        }

        let quality = parts
            .filter_map(|param| param.split_once('='))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("q"))
            .and_then(|(_, value)| value.trim().parse::<f32>().ok())
            .filter(|q| q.is_finite())
            .map(|q| q.clamp(0.0, 1.0))
            .unwrap_or(1.0);

        Some(Self {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            quality,
        })
    }

    /// `text/html`, `application/xhtml+xml` and friends.
    pub fn is_document(&self) -> bool {
        self.subtype.contains("html")
    }
}

pub fn parse_accept(value: &str) -> Vec<MediaRange> {
    value.split(',').filter_map(MediaRange::parse).collect()
}

impl NegotiatedFormat {
    pub fn from_accept(value: &str) -> Self {
        let wants_document = parse_accept(value)
            .iter()
            .any(|range| range.quality > 0.0 && range.is_document());

        if wants_document {
            Self::PrefersDocument
        } else {
            Self::PrefersStructured
        }
    }

    /// Missing or unreadable `Accept` means an API caller.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let joined = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect::<Vec<_>>()
            .join(",");

        Self::from_accept(&joined)
    }
}
