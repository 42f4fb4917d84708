//! Paragraph-respecting transcript chunker.
//!
//! Splits long transcripts into size-bounded chunks on blank-line paragraph
//! boundaries so each chunk can be summarized independently and the results
//! merged in ordinal order. Content is never truncated: a paragraph larger
//! than the target becomes its own oversized chunk.

/// Default chunk target in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 6000;

/// Split `text` into paragraph-aligned chunks of at most `target_size`
/// characters (blank-line separators included in the accounting).
///
/// A paragraph is a maximal run of non-blank lines. Paragraphs inside a chunk
/// are rejoined with a single blank line. The returned iterator is lazy and
/// deterministic; empty input yields no chunks.
pub fn split_into_chunks(text: &str, target_size: usize) -> ParagraphChunks<'_> {
    ParagraphChunks {
        paragraphs: Paragraphs { remaining: text },
        pending: None,
        target_size,
    }
}

/// Iterator over blank-line-delimited paragraphs of a str slice.
struct Paragraphs<'a> {
    remaining: &'a str,
}

fn line_span(s: &str) -> usize {
    s.find('\n').map(|i| i + 1).unwrap_or(s.len())
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

impl<'a> Iterator for Paragraphs<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        // Skip blank lines between paragraphs.
        while !self.remaining.is_empty() {
            let span = line_span(self.remaining);
            if is_blank(&self.remaining[..span]) {
                self.remaining = &self.remaining[span..];
            } else {
                break;
            }
        }
        if self.remaining.is_empty() {
            return None;
        }

        // Consume lines until the next blank line or end of input.
        let start = self.remaining;
        let mut consumed = 0;
        while consumed < start.len() {
            let span = line_span(&start[consumed..]);
            if is_blank(&start[consumed..consumed + span]) {
                break;
            }
            consumed += span;
        }
        self.remaining = &start[consumed..];
        Some(start[..consumed].trim_end_matches(['\n', '\r']))
    }
}

/// Lazy chunk iterator produced by [`split_into_chunks`].
pub struct ParagraphChunks<'a> {
    paragraphs: Paragraphs<'a>,
    /// Paragraph that did not fit in the previous chunk.
    pending: Option<&'a str>,
    target_size: usize,
}

impl<'a> Iterator for ParagraphChunks<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let mut buf = String::new();
        let mut count = 0usize;

        while let Some(para) = self.pending.take().or_else(|| self.paragraphs.next()) {
            let para_len = para.chars().count();
            let sep = if buf.is_empty() { 0 } else { 2 };
            if !buf.is_empty() && count + sep + para_len > self.target_size {
                self.pending = Some(para);
                return Some(buf);
            }
            if !buf.is_empty() {
                buf.push_str("\n\n");
            }
            buf.push_str(para);
            count += sep + para_len;
        }

        if buf.is_empty() {
            None
        } else {
            Some(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_chunks() {
        assert_eq!(split_into_chunks("", 100).count(), 0);
        assert_eq!(split_into_chunks("\n\n   \n", 100).count(), 0);
    }

    #[test]
    fn single_chunk_when_under_target() {
        let text = "first paragraph\n\nsecond paragraph";
        let chunks: Vec<String> = split_into_chunks(text, 1000).collect();
        assert_eq!(chunks, vec!["first paragraph\n\nsecond paragraph"]);
    }

    #[test]
    fn flushes_before_exceeding_target() {
        // Two 10-char paragraphs with a 2-char separator: 22 total.
        let text = "aaaaaaaaaa\n\nbbbbbbbbbb\n\ncccccccccc";
        let chunks: Vec<String> = split_into_chunks(text, 22).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "aaaaaaaaaa\n\nbbbbbbbbbb");
        assert_eq!(chunks[1], "cccccccccc");
    }

    #[test]
    fn oversize_paragraph_becomes_its_own_chunk() {
        let big = "x".repeat(50);
        let text = format!("small\n\n{}\n\nalso small", big);
        let chunks: Vec<String> = split_into_chunks(&text, 20).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "small");
        assert_eq!(chunks[1], big);
        assert_eq!(chunks[2], "also small");
    }

    #[test]
    fn chunks_reconstruct_original_paragraph_sequence() {
        let text = "one\ntwo\n\nthree\n\n\nfour five\n\nsix\n";
        let expected: Vec<&str> = vec!["one\ntwo", "three", "four five", "six"];
        for target in [1usize, 5, 10, 100] {
            let rebuilt: Vec<String> = split_into_chunks(text, target)
                .flat_map(|c| c.split("\n\n").map(str::to_string).collect::<Vec<_>>())
                .collect();
            assert_eq!(rebuilt, expected, "target={}", target);
        }
    }

    #[test]
    fn size_bound_holds_except_for_single_oversize_paragraphs() {
        let text = "short one\n\nanother short\n\nthird paragraph here\n\ntiny";
        for target in [10usize, 15, 25, 40] {
            for chunk in split_into_chunks(text, target) {
                let len = chunk.chars().count();
                if len > target {
                    assert!(!chunk.contains("\n\n"), "multi-paragraph chunk over target");
                }
            }
        }
    }
}
