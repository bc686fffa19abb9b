//! Data models for Clip Fetcher
//!
//! This module defines the central [`Item`] entity that flows through the
//! pipeline, and the pure filename sanitizer used to place items on disk.

use std::sync::OnceLock;

use crate::constants::files;

/// One downloadable music clip
///
/// Created by the lister with title, source URL and optional year, then
/// filled in place by the enricher (download URL, year backfill,
/// description). Read-only from the existence filter onwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Item {
    /// Identifier derived from the last segment of the source URL path
    pub id: String,
    /// Display title, also the resolution lookup key
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Source page URL
    pub url: String,
    /// Resolved binary URL, empty until enriched
    pub download_url: String,
    /// Byte size, known once a server reported a content length
    pub byte_size: Option<u64>,
    /// Publication year; `None` is bucketed as "other"
    pub year: Option<u32>,
    /// Memoized sanitized filename
    filename: OnceLock<String>,
}

impl Item {
    /// Create a listed item
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        url: impl Into<String>,
        year: Option<u32>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            url: url.into(),
            year,
            ..Default::default()
        }
    }

    /// An item is valid for download iff title, source URL and download URL are set
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.url.is_empty() && !self.download_url.is_empty()
    }

    /// Sanitized on-disk filename
    ///
    /// Computed from the title on first call and memoized; later changes to
    /// `title` do not affect it.
    pub fn filename(&self) -> &str {
        self.filename.get_or_init(|| sanitize_filename(&self.title))
    }

    /// Bucket directory name: the year, or "other" when unknown
    pub fn bucket(&self) -> String {
        match self.year {
            Some(year) if year > 0 => year.to_string(),
            _ => files::OTHER_BUCKET.to_string(),
        }
    }
}

/// Map a raw title to a safe filename
///
/// Accented Latin letters are transliterated, spaces become underscores,
/// ASCII letters and digits are kept and everything else is dropped. The
/// media extension is always appended. Titles differing only in dropped
/// characters collide.
pub fn sanitize_filename(title: &str) -> String {
    let mut sanitized = String::with_capacity(title.len() + files::MEDIA_EXTENSION.len());

    for c in title.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' => sanitized.push(c),
            ' ' => sanitized.push('_'),
            'ã' | 'á' | 'à' | 'â' => sanitized.push('a'),
            'é' | 'ê' => sanitized.push('e'),
            'í' => sanitized.push('i'),
            'õ' | 'ó' | 'ô' => sanitized.push('o'),
            'ú' | 'û' => sanitized.push('u'),
            'ç' => sanitized.push('c'),
            _ => {}
        }
    }

    sanitized.push_str(files::MEDIA_EXTENSION);
    sanitized
}
