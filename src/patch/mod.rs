//! Patch records: context-bearing hunks built from an edit script, and
//! the maker that packages them.

mod apply;
mod pad;
mod split;
mod text;

pub use text::{patch_from_text, patch_to_text};

use crate::diff::{diff_text1, Diff, Op};
use crate::Dmp;

/// A single hunk: a position in the pre- and post-patch texts plus the
/// ordered diffs that reconstruct that region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub start1: usize,
    pub start2: usize,
    pub length1: usize,
    pub length2: usize,
    pub diffs: Vec<Diff>,
}

impl Patch {
    fn new() -> Self {
        Patch { start1: 0, start2: 0, length1: 0, length2: 0, diffs: Vec::new() }
    }
}

impl Dmp {
    /// Builds patches from a source text and the target it should become,
    /// computing the edit script internally.
    pub fn patch_make_from_texts(&self, text1: &str, text2: &str) -> Vec<Patch> {
        let diffs = self.diff_main(text1, text2, true);
        self.patch_make_from_diffs(text1, &diffs)
    }

    /// Builds patches from a source text and an already-computed edit
    /// script against it.
    pub fn patch_make(&self, text1: &str, diffs: &[Diff]) -> Vec<Patch> {
        self.patch_make_from_diffs(text1, diffs)
    }

    /// Builds patches from just the edit script, recovering the source
    /// text from its non-insert diffs.
    pub fn patch_make_from_diffs_only(&self, diffs: &[Diff]) -> Vec<Patch> {
        let text1 = diff_text1(diffs);
        self.patch_make_from_diffs(&text1, diffs)
    }

    /// The legacy three-argument overload that ignores `text2`, kept only
    /// for API-compatibility with callers porting from the original; the
    /// edit script already encodes the transformation, so `text2` carries
    /// no information this call needs. Prefer [`Dmp::patch_make`].
    #[deprecated(note = "text2 is ignored; use Dmp::patch_make(text1, diffs) instead")]
    pub fn patch_make_legacy(&self, text1: &str, _text2: &str, diffs: &[Diff]) -> Vec<Patch> {
        self.patch_make_from_diffs(text1, diffs)
    }

    fn patch_make_from_diffs(&self, text1: &str, diffs: &[Diff]) -> Vec<Patch> {
        let mut patches = Vec::new();
        if diffs.is_empty() {
            return patches;
        }

        let mut patch = Patch::new();
        let mut char_count1 = 0usize;
        let mut char_count2 = 0usize;

        let prepatch_chars: Vec<char> = text1.chars().collect();
        let mut prepatch_text = prepatch_chars.clone();
        let mut postpatch_text = prepatch_chars.clone();

        for (i, d) in diffs.iter().enumerate() {
            let len = d.text.chars().count();

            if patch.diffs.is_empty() && d.op != Op::Equal {
                patch.start1 = char_count1;
                patch.start2 = char_count2;
            }

            match d.op {
                Op::Insert => {
                    patch.diffs.push(d.clone());
                    patch.length2 += len;
                    postpatch_text.splice(char_count2..char_count2, d.text.chars());
                }
                Op::Delete => {
                    patch.length1 += len;
                    patch.diffs.push(d.clone());
                    postpatch_text.splice(char_count2..char_count2 + len, std::iter::empty());
                }
                Op::Equal => {
                    if len <= 2 * self.patch_margin as usize && !patch.diffs.is_empty() && i != diffs.len() - 1 {
                        patch.diffs.push(d.clone());
                        patch.length1 += len;
                        patch.length2 += len;
                    } else if len >= 2 * self.patch_margin as usize && !patch.diffs.is_empty() {
                        self.patch_add_context(&mut patch, &prepatch_text);
                        patches.push(std::mem::replace(&mut patch, Patch::new()));
                        prepatch_text = postpatch_text.clone();
                        char_count1 = char_count2;
                    }
                }
            }

            if d.op != Op::Insert {
                char_count1 += len;
            }
            if d.op != Op::Delete {
                char_count2 += len;
            }
        }

        if !patch.diffs.is_empty() {
            self.patch_add_context(&mut patch, &prepatch_text);
            patches.push(patch);
        }

        patches
    }

    /// Extends `patch`'s recorded context until its pattern is uniquely
    /// locatable in `text`, up to `Match_MaxBits - 2*Patch_Margin`.
    fn patch_add_context(&self, patch: &mut Patch, text: &[char]) {
        if text.is_empty() {
            return;
        }

        let margin = self.patch_margin as usize;
        let max_pattern_len = self.match_max_bits.saturating_sub(2 * margin);

        let mut pattern: Vec<char> = {
            let start = patch.start2.min(text.len());
            let end = (patch.start2 + patch.length1).min(text.len());
            text[start..end].to_vec()
        };

        let mut padding = 0usize;
        while (pattern.is_empty() || find_all(text, &pattern).len() > 1) && pattern.len() < max_pattern_len {
            padding += margin;
            let start = patch.start2.saturating_sub(padding);
            let end = (patch.start2 + patch.length1 + padding).min(text.len());
            pattern = text[start..end].to_vec();
        }

        padding += margin;

        let prefix_start = patch.start2.saturating_sub(padding);
        let prefix: Vec<char> = text[prefix_start..patch.start2.min(text.len())].to_vec();
        if !prefix.is_empty() {
            patch.diffs.insert(0, Diff::equal(prefix.iter().collect::<String>()));
        }

        let suffix_end = (patch.start2 + patch.length1 + padding).min(text.len());
        let suffix_start = (patch.start2 + patch.length1).min(text.len());
        let suffix: Vec<char> = text[suffix_start..suffix_end].to_vec();
        if !suffix.is_empty() {
            patch.diffs.push(Diff::equal(suffix.iter().collect::<String>()));
        }

        patch.start1 = patch.start1.saturating_sub(prefix.len());
        patch.start2 = patch.start2.saturating_sub(prefix.len());
        patch.length1 += prefix.len() + suffix.len();
        patch.length2 += prefix.len() + suffix.len();
    }
}

/// A from-scratch copy of `patches`, so the applier never mutates the
/// caller's list.
pub(crate) fn patch_deep_copy(patches: &[Patch]) -> Vec<Patch> {
    patches.to_vec()
}

fn find_all(haystack: &[char], needle: &[char]) -> Vec<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return Vec::new();
    }
    haystack
        .windows(needle.len())
        .enumerate()
        .filter_map(|(i, w)| if w == needle { Some(i) } else { None })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::diff_text2;

    #[test]
    fn patch_make_from_texts_reconstructs_via_apply() {
        let dmp = Dmp::default();
        let text1 = "The quick brown fox jumps over the lazy dog.";
        let text2 = "That quick brown fox jumped over a lazy dog.";
        let patches = dmp.patch_make_from_texts(text1, text2);
        assert!(!patches.is_empty());
        let (result, results) = dmp.patch_apply(&patches, text1);
        assert_eq!(result, text2);
        assert!(results.iter().all(|&ok| ok));
    }

    #[test]
    fn patch_make_from_diffs_only_recovers_source() {
        let dmp = Dmp::default();
        let diffs = dmp.diff_main("hello world", "hello there world", true);
        let patches = dmp.patch_make_from_diffs_only(&diffs);
        let (result, _) = dmp.patch_apply(&patches, "hello world");
        assert_eq!(result, diff_text2(&diffs));
    }

    #[test]
    fn deep_copy_is_independent() {
        let dmp = Dmp::default();
        let patches = dmp.patch_make_from_texts("abc", "abd");
        let mut copy = patch_deep_copy(&patches);
        copy[0].start1 = 999;
        assert_ne!(copy[0].start1, patches[0].start1);
    }
}
