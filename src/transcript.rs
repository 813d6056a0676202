//! Transcript files and their front matter.
//!
//! A transcript is a UTF-8 text file with a `---`-fenced block of
//! `key: value` metadata lines followed by the episode body.

use crate::error::{HarkError, Result};
use chrono::NaiveDate;
use std::path::Path;

/// A parsed transcript file.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Episode title.
    pub title: String,
    /// Episode description.
    pub description: String,
    /// Episode URL.
    pub url: String,
    /// Publish date.
    pub pub_date: NaiveDate,
    /// Free-text transcript body.
    pub body: String,
}

impl Episode {
    /// Parse a transcript from its raw file contents.
    pub fn parse(text: &str) -> Result<Self> {
        let (header, body) = split_front_matter(text)?;

        let mut title = None;
        let mut description = None;
        let mut url = None;
        let mut pub_date = None;

        for line in header.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = unquote(value.trim());
            match key.trim() {
                "title" => title = Some(value.to_string()),
                "description" => description = Some(value.to_string()),
                "url" => url = Some(value.to_string()),
                "pub_date" => pub_date = Some(parse_pub_date(value)?),
                _ => {}
            }
        }

        Ok(Self {
            title: title.ok_or_else(|| missing_key("title"))?,
            description: description.ok_or_else(|| missing_key("description"))?,
            url: url.ok_or_else(|| missing_key("url"))?,
            pub_date: pub_date.ok_or_else(|| missing_key("pub_date"))?,
            body: body.to_string(),
        })
    }

    /// Read and parse a transcript file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text).map_err(|e| {
            HarkError::Metadata(format!("{}: {}", path.display(), e))
        })
    }
}

/// Split a document into its front matter header and body.
fn split_front_matter(text: &str) -> Result<(&str, &str)> {
    let after_open = text.strip_prefix("---").ok_or_else(|| {
        HarkError::Metadata("missing front matter block".to_string())
    })?;

    let close = after_open.find("\n---").ok_or_else(|| {
        HarkError::Metadata("unterminated front matter block".to_string())
    })?;

    let header = &after_open[..close];
    // Skip past the closing fence to the end of its line.
    let rest = &after_open[close + 4..];
    let body = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => "",
    };

    Ok((header, body.trim_start()))
}

/// Strip one pair of matching surrounding quotes, if present.
fn unquote(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn missing_key(key: &str) -> HarkError {
    HarkError::Metadata(format!("missing required front matter key: {}", key))
}

/// Parse a publish date in the `MMMM D, YYYY` format (e.g. "January 5, 2023").
///
/// Ordinal day suffixes ("March 22nd, 2021") are tolerated, as the original
/// feeds allowed them.
pub fn parse_pub_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%B %d, %Y") {
        return Ok(date);
    }

    // Retry with any ordinal suffix stripped from the day.
    let parts: Vec<&str> = value.split_whitespace().collect();
    if let [month, day, year] = parts[..] {
        let day = day.trim_end_matches(',');
        let day = ["st", "nd", "rd", "th"]
            .iter()
            .find_map(|suffix| day.strip_suffix(suffix))
            .unwrap_or(day);
        if !day.is_empty() && day.chars().all(|c| c.is_ascii_digit()) {
            let canonical = format!("{} {}, {}", month, day, year);
            if let Ok(date) = NaiveDate::parse_from_str(&canonical, "%B %d, %Y") {
                return Ok(date);
            }
        }
    }

    Err(HarkError::Metadata(format!(
        "invalid pub_date '{}': expected format like 'January 5, 2023'",
        value
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "---\n\
title: Episode 1\n\
description: The first episode\n\
url: https://example.com/episodes/1\n\
pub_date: January 5, 2023\n\
---\n\
\n\
Welcome to the show. Today we talk about inbox rules.\n";

    #[test]
    fn test_parse_episode() {
        let episode = Episode::parse(SAMPLE).unwrap();
        assert_eq!(episode.title, "Episode 1");
        assert_eq!(episode.description, "The first episode");
        assert_eq!(episode.url, "https://example.com/episodes/1");
        assert_eq!(
            episode.pub_date,
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()
        );
        assert!(episode.body.starts_with("Welcome to the show."));
    }

    #[test]
    fn test_parse_quoted_values() {
        let text = "---\ntitle: \"Quoted: Title\"\ndescription: 'desc'\nurl: https://x.test\npub_date: February 1, 2022\n---\nbody";
        let episode = Episode::parse(text).unwrap();
        assert_eq!(episode.title, "Quoted: Title");
        assert_eq!(episode.description, "desc");
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let text = "---\ntitle: T\ndescription: D\nurl: U\npub_date: March 2, 2020\nepisode_number: 12\n---\nbody";
        let episode = Episode::parse(text).unwrap();
        assert_eq!(episode.body, "body");
    }

    #[test]
    fn test_missing_key_is_metadata_error() {
        let text = "---\ntitle: T\nurl: U\npub_date: March 2, 2020\n---\nbody";
        let err = Episode::parse(text).unwrap_err();
        assert!(matches!(err, HarkError::Metadata(_)));
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_missing_front_matter() {
        let err = Episode::parse("just a body, no header").unwrap_err();
        assert!(matches!(err, HarkError::Metadata(_)));
    }

    #[test]
    fn test_parse_pub_date() {
        assert_eq!(
            parse_pub_date("January 5, 2023").unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()
        );
        assert_eq!(
            parse_pub_date("December 31, 1999").unwrap(),
            NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_parse_pub_date_ordinal_suffix() {
        assert_eq!(
            parse_pub_date("March 22nd, 2021").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 22).unwrap()
        );
        assert_eq!(
            parse_pub_date("August 1st, 2021").unwrap(),
            NaiveDate::from_ymd_opt(2021, 8, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_pub_date_rejects_other_formats() {
        assert!(parse_pub_date("5 Jan 2023").is_err());
        assert!(parse_pub_date("2023-01-05").is_err());
        assert!(parse_pub_date("January 32, 2023").is_err());
        assert!(parse_pub_date("").is_err());
    }
}
