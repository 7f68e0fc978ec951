//! The diff engine: an edit-script record type plus the orchestrator that
//! turns two strings into a minimal (post-cleanup) sequence of [`Diff`]s.

mod bisect;
mod cleanup;
mod delta;
mod halfmatch;
mod linemode;

pub use cleanup::{diff_cleanup_efficiency, diff_cleanup_merge, diff_cleanup_semantic, diff_cleanup_semantic_lossless};
pub use delta::{diff_from_delta, diff_to_delta};

use std::fmt;
use std::time::{Duration, Instant};

use crate::Dmp;

/// One of the three edit operations an edit script is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Delete,
    Insert,
    Equal,
}

/// A single `(operation, text)` edit script entry.
///
/// Equality is component-wise. Diffs are never produced with `None` text;
/// an empty-text diff may exist transiently as a cleanup-pass scratch
/// sentinel, but must not survive to a returned sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub op: Op,
    pub text: String,
}

impl Diff {
    pub fn new(op: Op, text: impl Into<String>) -> Self {
        Diff { op, text: text.into() }
    }

    pub fn delete(text: impl Into<String>) -> Self {
        Diff::new(Op::Delete, text)
    }

    pub fn insert(text: impl Into<String>) -> Self {
        Diff::new(Op::Insert, text)
    }

    pub fn equal(text: impl Into<String>) -> Self {
        Diff::new(Op::Equal, text)
    }

    pub(crate) fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            Op::Insert => "INSERT",
            Op::Delete => "DELETE",
            Op::Equal => "EQUAL",
        };
        let pretty = self.text.replace('\n', "\u{b6}");
        write!(f, "Diff({op},\"{pretty}\")")
    }
}

/// Concatenation of every non-[`Op::Insert`] diff's text: the source text.
pub fn diff_text1(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Op::Insert)
        .map(|d| d.text.as_str())
        .collect()
}

/// Concatenation of every non-[`Op::Delete`] diff's text: the target text.
pub fn diff_text2(diffs: &[Diff]) -> String {
    diffs
        .iter()
        .filter(|d| d.op != Op::Delete)
        .map(|d| d.text.as_str())
        .collect()
}

/// Levenshtein distance implied by an edit script: the sum, at every
/// equality boundary (and at the end), of `max(insertions, deletions)`
/// accumulated since the previous boundary.
pub fn diff_levenshtein(diffs: &[Diff]) -> usize {
    let mut levenshtein = 0usize;
    let mut insertions = 0usize;
    let mut deletions = 0usize;
    for d in diffs {
        match d.op {
            Op::Insert => insertions += d.text.chars().count(),
            Op::Delete => deletions += d.text.chars().count(),
            Op::Equal => {
                levenshtein += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }
    levenshtein += insertions.max(deletions);
    levenshtein
}

/// Maps a code-unit offset in `text1` (the diffs' source) to the
/// corresponding offset in `text2` (the diffs' target).
pub fn diff_x_index(diffs: &[Diff], loc: usize) -> usize {
    let mut chars1 = 0usize;
    let mut chars2 = 0usize;
    let mut last_chars1 = 0usize;
    let mut last_chars2 = 0usize;
    let mut last_op: Option<Op> = None;
    for d in diffs {
        let len = d.text.chars().count();
        if d.op != Op::Insert {
            chars1 += len;
        }
        if d.op != Op::Delete {
            chars2 += len;
        }
        if chars1 > loc {
            last_op = Some(d.op);
            break;
        }
        last_chars1 = chars1;
        last_chars2 = chars2;
    }
    if last_op == Some(Op::Delete) {
        return last_chars2;
    }
    last_chars2 + (loc - last_chars1)
}

/// Renders an edit script as HTML, wrapping each op in a colored
/// `<ins>`/`<del>`/`<span>` tag. Escapes `&`, `<`, `>` and turns `\n` into
/// a visible paragraph break, mirroring the original's `diff_prettyHtml`.
pub fn diff_pretty_html(diffs: &[Diff]) -> String {
    let mut html = String::new();
    for d in diffs {
        let text = d
            .text
            .replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('\n', "&para;<br>");
        match d.op {
            Op::Insert => {
                html.push_str("<ins style=\"background:#e6ffe6;\">");
                html.push_str(&text);
                html.push_str("</ins>");
            }
            Op::Delete => {
                html.push_str("<del style=\"background:#ffe6e6;\">");
                html.push_str(&text);
                html.push_str("</del>");
            }
            Op::Equal => {
                html.push_str("<span>");
                html.push_str(&text);
                html.push_str("</span>");
            }
        }
    }
    html
}

impl Dmp {
    /// Computes the best edit script turning `text1` into `text2`.
    ///
    /// `checklines` enables the line-mode speedup (spec §4.5) for inputs
    /// over 100 code units on both sides. A soft deadline derived from
    /// `Diff_Timeout` bounds the bisect subroutine; on expiry the affected
    /// subproblem degrades to a single delete+insert pair rather than
    /// failing.
    pub fn diff_main(&self, text1: &str, text2: &str, checklines: bool) -> Vec<Diff> {
        let deadline = self.deadline();
        self.diff_main_deadline(text1, text2, checklines, deadline)
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        if self.diff_timeout <= 0.0 {
            None
        } else {
            Some(Instant::now() + Duration::from_secs_f64(self.diff_timeout))
        }
    }

    pub(crate) fn diff_main_deadline(
        &self,
        text1: &str,
        text2: &str,
        checklines: bool,
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        tracing::trace!(len1 = text1.chars().count(), len2 = text2.chars().count(), checklines, "diff_main");

        if text1 == text2 {
            return if text1.is_empty() { Vec::new() } else { vec![Diff::equal(text1)] };
        }
        if text2.is_empty() {
            return vec![Diff::delete(text1)];
        }
        if text1.is_empty() {
            return vec![Diff::insert(text2)];
        }

        let c1: Vec<char> = text1.chars().collect();
        let c2: Vec<char> = text2.chars().collect();

        let prefix_len = crate::strutil::common_prefix(&c1, &c2);
        let common_prefix: String = c1[..prefix_len].iter().collect();
        let chopped1 = &c1[prefix_len..];
        let chopped2 = &c2[prefix_len..];

        let suffix_len = crate::strutil::common_suffix(chopped1, chopped2);
        let common_suffix: String = chopped1[chopped1.len() - suffix_len..].iter().collect();
        let chopped1 = &chopped1[..chopped1.len() - suffix_len];
        let chopped2 = &chopped2[..chopped2.len() - suffix_len];

        let mut diffs = self.diff_compute(chopped1, chopped2, checklines, deadline);

        if !common_prefix.is_empty() {
            diffs.insert(0, Diff::equal(common_prefix));
        }
        if !common_suffix.is_empty() {
            diffs.push(Diff::equal(common_suffix));
        }

        diff_cleanup_merge(&mut diffs);
        diffs
    }

    fn diff_compute(&self, text1: &[char], text2: &[char], checklines: bool, deadline: Option<Instant>) -> Vec<Diff> {
        if text1.is_empty() {
            return vec![Diff::insert(text2.iter().collect::<String>())];
        }
        if text2.is_empty() {
            return vec![Diff::delete(text1.iter().collect::<String>())];
        }

        {
            let (longtext, shorttext, text1_longer) =
                if text1.len() > text2.len() { (text1, text2, true) } else { (text2, text1, false) };
            if let Some(i) = find_subslice(longtext, shorttext) {
                let op = if text1_longer { Op::Delete } else { Op::Insert };
                let mut diffs = Vec::with_capacity(3);
                diffs.push(Diff::new(op, longtext[..i].iter().collect::<String>()));
                diffs.push(Diff::equal(shorttext.iter().collect::<String>()));
                diffs.push(Diff::new(op, longtext[i + shorttext.len()..].iter().collect::<String>()));
                return diffs;
            }

            if shorttext.len() == 1 {
                return vec![
                    Diff::delete(text1.iter().collect::<String>()),
                    Diff::insert(text2.iter().collect::<String>()),
                ];
            }
        }

        if let Some(hm) = self.diff_half_match(text1, text2) {
            let diffs_a = self.diff_main_chars(&hm.text1_a, &hm.text2_a, checklines, deadline);
            let diffs_b = self.diff_main_chars(&hm.text1_b, &hm.text2_b, checklines, deadline);
            let mut diffs = diffs_a;
            diffs.push(Diff::equal(hm.common.iter().collect::<String>()));
            diffs.extend(diffs_b);
            return diffs;
        }

        if checklines && text1.len() > 100 && text2.len() > 100 {
            return self.diff_line_mode(text1, text2, deadline);
        }

        self.diff_bisect(text1, text2, deadline)
    }

    /// `diff_main` reentered on already-split character slices, avoiding a
    /// string round-trip for recursive half-match/bisect-split calls.
    pub(crate) fn diff_main_chars(
        &self,
        text1: &[char],
        text2: &[char],
        checklines: bool,
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        let s1: String = text1.iter().collect();
        let s2: String = text2.iter().collect();
        self.diff_main_deadline(&s1, &s2, checklines, deadline)
    }
}

pub(crate) fn find_subslice(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
