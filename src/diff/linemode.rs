//! Line-mode preprocessing: reduce each text to a string of synthetic
//! per-line code units, diff the reduced strings, then rehydrate.

use std::collections::HashMap;
use std::time::Instant;

use super::{diff_cleanup_semantic, Diff, Op};
use crate::Dmp;

impl Dmp {
    /// Speeds up large diffs by first diffing line-granularity tokens
    /// rather than individual code units, then re-diffing only the
    /// DELETE/INSERT pairs that remain adjacent after rehydration.
    pub(crate) fn diff_line_mode(&self, text1: &[char], text2: &[char], deadline: Option<Instant>) -> Vec<Diff> {
        let s1: String = text1.iter().collect();
        let s2: String = text2.iter().collect();

        let mut line_array: Vec<String> = vec![String::new()];
        let mut line_hash: HashMap<String, usize> = HashMap::new();

        let reduced1 = match lines_to_chars(&s1, &mut line_array, &mut line_hash) {
            Some(r) => r,
            None => return self.diff_bisect(text1, text2, deadline),
        };
        let reduced2 = match lines_to_chars(&s2, &mut line_array, &mut line_hash) {
            Some(r) => r,
            None => return self.diff_bisect(text1, text2, deadline),
        };

        let mut diffs = self.diff_main_deadline(&reduced1, &reduced2, false, deadline);

        chars_to_lines(&mut diffs, &line_array);
        diff_cleanup_semantic(&mut diffs);

        let mut result = Vec::with_capacity(diffs.len());
        let mut i = 0;
        while i < diffs.len() {
            if i + 1 < diffs.len() && diffs[i].op == Op::Delete && diffs[i + 1].op == Op::Insert {
                let deleted = diffs[i].text.clone();
                let inserted = diffs[i + 1].text.clone();
                let sub = self.diff_main_deadline(&deleted, &inserted, false, deadline);
                result.extend(sub);
                i += 2;
            } else {
                result.push(diffs[i].clone());
                i += 1;
            }
        }
        result
    }
}

/// Splits `text` on `\n` (a trailing fragment with no terminator counts
/// as a final line) and maps each distinct line to a synthetic `char`,
/// reserving index 0 as the empty-line sentinel. Returns `None` when the
/// number of distinct lines would exceed `char`'s representable range
/// for this purpose (practically unreachable, but bisect is the correct
/// fallback rather than silently wrapping indices).
fn lines_to_chars(text: &str, line_array: &mut Vec<String>, line_hash: &mut HashMap<String, usize>) -> Option<String> {
    let mut chars = String::new();
    let mut start = 0usize;
    let bytes = text.as_bytes();
    let len = bytes.len();

    while start < len {
        let end = match text[start..].find('\n') {
            Some(pos) => start + pos + 1,
            None => len,
        };
        let line = &text[start..end];
        let idx = if let Some(&idx) = line_hash.get(line) {
            idx
        } else {
            line_array.push(line.to_string());
            let idx = line_array.len() - 1;
            line_hash.insert(line.to_string(), idx);
            idx
        };
        if idx > char::MAX as usize {
            return None;
        }
        chars.push(char::from_u32(idx as u32)?);
        start = end;
    }

    Some(chars)
}

fn chars_to_lines(diffs: &mut [Diff], line_array: &[String]) {
    for d in diffs.iter_mut() {
        let mut text = String::new();
        for c in d.text.chars() {
            if let Some(line) = line_array.get(c as usize) {
                text.push_str(line);
            }
        }
        d.text = text;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines_to_chars_round_trip() {
        let mut line_array = vec![String::new()];
        let mut line_hash = HashMap::new();
        let encoded = lines_to_chars("alpha\nbeta\nalpha\n", &mut line_array, &mut line_hash).unwrap();
        assert_eq!(encoded.chars().count(), 3);
        assert_eq!(encoded.chars().nth(0), encoded.chars().nth(2));
        assert_eq!(line_array.len(), 3);
    }

    #[test]
    fn lines_to_chars_handles_trailing_fragment() {
        let mut line_array = vec![String::new()];
        let mut line_hash = HashMap::new();
        let encoded = lines_to_chars("one\ntwo", &mut line_array, &mut line_hash).unwrap();
        assert_eq!(encoded.chars().count(), 2);
        assert_eq!(line_array[1], "one\n");
        assert_eq!(line_array[2], "two");
    }
}
