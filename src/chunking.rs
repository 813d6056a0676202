//! Transcript chunking for indexing.
//!
//! Splits a transcript body into overlapping chunks bounded by a maximum
//! size, cutting preferentially at sentence and paragraph separators.

use crate::config::ChunkingSettings;

/// Recursive character text splitter.
///
/// The body is first broken into pieces at the highest-priority separator it
/// contains (pieces keep their trailing separator); oversized pieces are
/// re-split with the remaining separators, falling back to a hard cut at
/// `max_chars`. Adjacent pieces are then merged greedily into chunks of at
/// most `max_chars` characters, and each chunk after the first starts with
/// the trailing pieces of its predecessor, up to `overlap` characters.
///
/// Splitting is deterministic. Empty or whitespace-only input yields no
/// chunks; any other input yields at least one.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    max_chars: usize,
    overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    /// Create a splitter. `overlap` is clamped below `max_chars` so that
    /// every chunk carries new content.
    pub fn new(max_chars: usize, overlap: usize, separators: Vec<String>) -> Self {
        let max_chars = max_chars.max(1);
        Self {
            max_chars,
            overlap: overlap.min(max_chars - 1),
            separators,
        }
    }

    /// Create a splitter from chunking settings.
    pub fn from_settings(settings: &ChunkingSettings) -> Self {
        Self::new(
            settings.max_chars,
            settings.overlap,
            settings.separators.clone(),
        )
    }

    /// Split text into chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut pieces = Vec::new();
        self.split_recursive(text, &self.separators, &mut pieces);
        self.merge(&pieces)
    }

    /// Break text into pieces of at most `max_chars`, trying separators in
    /// priority order.
    fn split_recursive<'a>(&self, text: &'a str, separators: &[String], out: &mut Vec<&'a str>) {
        if char_len(text) <= self.max_chars {
            out.push(text);
            return;
        }

        let Some(sep_idx) = separators.iter().position(|sep| text.contains(sep.as_str()))
        else {
            hard_cut(text, self.max_chars, out);
            return;
        };

        let sep = separators[sep_idx].as_str();
        let rest = &separators[sep_idx + 1..];
        for piece in text.split_inclusive(sep) {
            if char_len(piece) <= self.max_chars {
                out.push(piece);
            } else {
                self.split_recursive(piece, rest, out);
            }
        }
    }

    /// Merge pieces into chunks, carrying trailing pieces of each chunk into
    /// the next as overlap.
    fn merge(&self, pieces: &[&str]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: Vec<&str> = Vec::new();
        let mut window_len = 0usize;

        for &piece in pieces {
            let piece_len = char_len(piece);

            if window_len + piece_len > self.max_chars && !window.is_empty() {
                push_chunk(&mut chunks, &window);

                // Slide the window forward, retaining at most `overlap`
                // characters of trailing context.
                while window_len > self.overlap
                    || (window_len + piece_len > self.max_chars && window_len > 0)
                {
                    window_len -= char_len(window[0]);
                    window.remove(0);
                }
            }

            window.push(piece);
            window_len += piece_len;
        }

        push_chunk(&mut chunks, &window);
        chunks
    }
}

fn push_chunk(chunks: &mut Vec<String>, window: &[&str]) {
    let chunk = window.concat();
    let chunk = chunk.trim();
    if !chunk.is_empty() {
        chunks.push(chunk.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cut separator-free text into `max_chars`-sized pieces on char boundaries.
fn hard_cut<'a>(text: &'a str, max_chars: usize, out: &mut Vec<&'a str>) {
    let mut rest = text;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(max_chars)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        out.push(&rest[..cut]);
        rest = &rest[cut..];
    }
}
