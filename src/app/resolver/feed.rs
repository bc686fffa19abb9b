//! Resolution feed document
//!
//! Shape of the publication media API response. Only the fields needed to
//! map titles to download links are decoded; everything else is ignored.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer};

use crate::constants::site;

/// Top-level feed document: audio files grouped by language code
///
/// Languages are kept in a sorted map so the "last writer wins" rule for
/// duplicate titles is deterministic. A `null` anywhere in the document
/// decodes as the empty value instead of failing the whole feed.
#[derive(Debug, Default, Deserialize)]
pub struct FeedResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: BTreeMap<String, Option<LanguageFiles>>,
}

/// Files published for one language
#[derive(Debug, Default, Deserialize)]
pub struct LanguageFiles {
    #[serde(rename = "MP3", default, deserialize_with = "null_as_default")]
    pub mp3: Vec<Option<AudioFile>>,
}

/// One audio file descriptor
#[derive(Debug, Default, Deserialize)]
pub struct AudioFile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file: FileRef,
}

/// Location of the binary
#[derive(Debug, Default, Deserialize)]
pub struct FileRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalize a feed title into a cache key
///
/// Trims, strips the "play" prefix token and trims again. Titles that end
/// up with two characters or fewer are rejected.
pub fn normalize_title(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix(site::PLAY_PREFIX)
        .unwrap_or(trimmed)
        .trim();

    (stripped.chars().count() > site::MIN_TITLE_CHARS).then(|| stripped.to_string())
}

impl FeedResponse {
    /// Flatten every language into one title -> URL map
    ///
    /// Descriptors missing a title or URL are skipped. For duplicate
    /// normalized titles the last one seen wins.
    pub fn into_links(self) -> HashMap<String, String> {
        let mut links = HashMap::new();

        for files in self.files.into_values().flatten() {
            for audio in files.mp3.into_iter().flatten() {
                if audio.title.is_empty() || audio.file.url.is_empty() {
                    continue;
                }
                if let Some(title) = normalize_title(&audio.title) {
                    links.insert(title, audio.file.url);
                }
            }
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title_strips_play_prefix() {
        assert_eq!(
            normalize_title("  Reproduzir Canção A 2023 "),
            Some("Canção A 2023".to_string())
        );
        assert_eq!(normalize_title("Canção B"), Some("Canção B".to_string()));
    }

    #[test]
    fn test_normalize_title_rejects_short_titles() {
        assert_eq!(normalize_title("Reproduzir"), None);
        assert_eq!(normalize_title("Reproduzir ab"), None);
        // Length is counted in characters, not bytes
        assert_eq!(normalize_title("ção"), Some("ção".to_string()));
        assert_eq!(normalize_title("çã"), None);
    }

    #[test]
    fn test_into_links_skips_incomplete_descriptors() {
        let json = r#"{
            "files": {
                "T": {
                    "MP3": [
                        {"title": "Canção A", "file": {"url": "https://cdn/a.mp3"}, "filesize": 10},
                        {"title": "", "file": {"url": "https://cdn/empty.mp3"}},
                        {"title": "Sem link", "file": {"url": ""}},
                        {"title": "Reproduzir", "file": {"url": "https://cdn/short.mp3"}}
                    ],
                    "AAC": []
                }
            }
        }"#;

        let feed: FeedResponse = serde_json::from_str(json).unwrap();
        let links = feed.into_links();

        assert_eq!(links.len(), 1);
        assert_eq!(links.get("Canção A").map(String::as_str), Some("https://cdn/a.mp3"));
    }

    #[test]
    fn test_into_links_last_writer_wins() {
        let json = r#"{
            "files": {
                "E": {"MP3": [{"title": "Canção A", "file": {"url": "https://cdn/e.mp3"}}]},
                "T": {"MP3": [
                    {"title": "Canção A", "file": {"url": "https://cdn/t1.mp3"}},
                    {"title": "Reproduzir Canção A", "file": {"url": "https://cdn/t2.mp3"}}
                ]}
            }
        }"#;

        let feed: FeedResponse = serde_json::from_str(json).unwrap();
        let links = feed.into_links();

        assert_eq!(links.get("Canção A").map(String::as_str), Some("https://cdn/t2.mp3"));
    }

    #[test]
    fn test_missing_sections_decode_as_empty() {
        let feed: FeedResponse = serde_json::from_str(r#"{"files": {"T": {}}}"#).unwrap();
        assert!(feed.into_links().is_empty());

        let feed: FeedResponse = serde_json::from_str("{}").unwrap();
        assert!(feed.into_links().is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let json = r#"{
            "files": {
                "E": null,
                "S": {"MP3": null},
                "T": {
                    "MP3": [
                        null,
                        {"title": null, "file": {"url": "https://cdn/untitled.mp3"}},
                        {"title": "Sem arquivo", "file": null},
                        {"title": "Sem link", "file": {"url": null, "checksum": null}},
                        {
                            "title": "Canção A",
                            "file": {"url": "https://cdn/a.mp3", "modifiedDatetime": null, "checksum": null},
                            "filesize": null
                        }
                    ]
                }
            }
        }"#;

        let feed: FeedResponse = serde_json::from_str(json).unwrap();
        let links = feed.into_links();

        assert_eq!(links.len(), 1);
        assert_eq!(links.get("Canção A").map(String::as_str), Some("https://cdn/a.mp3"));

        let feed: FeedResponse = serde_json::from_str(r#"{"files": null}"#).unwrap();
        assert!(feed.into_links().is_empty());
    }
}
