//! The patch applier: deep-copies, pads, splits oversized patches,
//! locates each hunk via the bitap matcher, replays its non-equal
//! operations, and reports per-patch success.

use super::{patch_deep_copy, Patch};
use crate::diff::{diff_cleanup_semantic_lossless, diff_levenshtein, diff_text1, diff_text2, diff_x_index, Op};
use crate::Dmp;

impl Dmp {
    /// Applies `patches` against `text`, returning the resulting text and
    /// a per-patch success vector. Never mutates `patches`: the applier
    /// works on a deep copy, padded with sentinel code units so edge
    /// patches have neighbors to locate against, and with any
    /// oversized patch split to fit `Match_MaxBits`.
    pub fn patch_apply(&self, patches: &[Patch], text: &str) -> (String, Vec<bool>) {
        if patches.is_empty() {
            return (text.to_string(), Vec::new());
        }

        let mut patches = patch_deep_copy(patches);
        let pad = self.patch_add_padding(&mut patches);
        let mut chars: Vec<char> = pad.chars().chain(text.chars()).chain(pad.chars()).collect();

        self.patch_split_max(&mut patches);

        let mut delta: i64 = 0;
        let mut results = Vec::with_capacity(patches.len());

        for patch in &patches {
            let expected_loc = (patch.start2 as i64 + delta).max(0) as usize;
            let pattern = diff_text1(&patch.diffs);
            let pattern_chars: Vec<char> = pattern.chars().collect();

            let (start_loc, end_loc) = self.locate_patch(&chars, &pattern_chars, expected_loc);

            let Some(start_loc) = start_loc else {
                results.push(false);
                delta -= patch.length2 as i64 - patch.length1 as i64;
                continue;
            };

            tracing::trace!(start1 = patch.start1, start_loc, "patch_apply: located hunk");
            results.push(true);
            delta = start_loc as i64 - expected_loc as i64;

            let region: Vec<char> = match end_loc {
                None => chars[start_loc..(start_loc + pattern_chars.len()).min(chars.len())].to_vec(),
                Some(end_loc) => {
                    let region_end = (end_loc + self.match_max_bits).min(chars.len());
                    chars[start_loc..region_end].to_vec()
                }
            };

            if region == pattern_chars {
                let replacement: Vec<char> = diff_text2(&patch.diffs).chars().collect();
                chars.splice(start_loc..start_loc + pattern_chars.len(), replacement);
            } else {
                let mut rdiffs = self.diff_main_chars(&pattern_chars, &region, false, self.deadline());
                let too_bad = pattern_chars.len() > self.match_max_bits
                    && (diff_levenshtein(&rdiffs) as f64 / pattern_chars.len() as f64) > self.patch_delete_threshold as f64;

                if too_bad {
                    *results.last_mut().unwrap() = false;
                } else {
                    diff_cleanup_semantic_lossless(&mut rdiffs);

                    let mut index1 = 0usize;
                    for d in &patch.diffs {
                        if d.op == Op::Insert {
                            let index2 = diff_x_index(&rdiffs, index1);
                            let insertion: Vec<char> = d.text.chars().collect();
                            let at = (start_loc + index2).min(chars.len());
                            chars.splice(at..at, insertion);
                        } else if d.op == Op::Delete {
                            let index2 = diff_x_index(&rdiffs, index1);
                            let del_end_index2 = diff_x_index(&rdiffs, index1 + d.text.chars().count());
                            let from = (start_loc + index2).min(chars.len());
                            let to = (start_loc + del_end_index2).min(chars.len());
                            if from < to {
                                chars.splice(from..to, std::iter::empty());
                            }
                        }
                        if d.op != Op::Delete {
                            index1 += d.text.chars().count();
                        }
                    }
                }
            }
        }

        let pad_len = pad.chars().count();
        let result_len = chars.len();
        let result: String = chars[pad_len..result_len.saturating_sub(pad_len)].iter().collect();
        (result, results)
    }

    /// Locates `pattern` in `chars` near `expected_loc`, splitting the
    /// search into head/tail halves when `pattern` exceeds `Match_MaxBits`
    /// (the only case `patch_splitMax` allows: a monster delete). Returns
    /// the start location and, for the split case, the tail's location.
    fn locate_patch(&self, chars: &[char], pattern: &[char], expected_loc: usize) -> (Option<usize>, Option<usize>) {
        let text: String = chars.iter().collect();

        if pattern.len() <= self.match_max_bits {
            let start = self.match_main(&text, &pattern.iter().collect::<String>(), expected_loc).unwrap_or(None);
            return (start, None);
        }

        let head: String = pattern[..self.match_max_bits].iter().collect();
        let start = match self.match_main(&text, &head, expected_loc).unwrap_or(None) {
            Some(s) => s,
            None => return (None, None),
        };

        let tail: String = pattern[pattern.len() - self.match_max_bits..].iter().collect();
        let tail_expected = expected_loc + pattern.len() - self.match_max_bits;
        let end = match self.match_main(&text, &tail, tail_expected).unwrap_or(None) {
            Some(e) if e > start => e,
            _ => return (None, None),
        };

        (Some(start), Some(end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_cleanly_to_unmodified_source() {
        let dmp = Dmp::default();
        let text1 = "The quick brown fox jumps over the lazy dog.";
        let text2 = "That quick brown fox jumped over a lazy dog.";
        let patches = dmp.patch_make_from_texts(text1, text2);
        let (result, results) = dmp.patch_apply(&patches, text1);
        assert_eq!(result, text2);
        assert!(results.iter().all(|&ok| ok));
    }

    #[test]
    fn tolerates_drift_within_distance() {
        let dmp = Dmp::default();
        let text1 = "The quick brown fox jumps over the lazy dog.";
        let text2 = "That quick brown fox jumped over a lazy dog.";
        let patches = dmp.patch_make_from_texts(text1, text2);
        let drifted = "The quick red rabbit jumps over the tired tiger.";
        let (result, results) = dmp.patch_apply(&patches, drifted);
        assert_eq!(result, "That quick red rabbit jumped over a tired tiger.");
        assert!(results.iter().all(|&ok| ok));
    }

    #[test]
    fn empty_source_with_padding() {
        let dmp = Dmp::default();
        let patches = dmp.patch_make_from_texts("", "test");
        let (result, results) = dmp.patch_apply(&patches, "");
        assert_eq!(result, "test");
        assert_eq!(results, vec![true]);
    }

    #[test]
    fn unrelated_text_fails_to_locate() {
        let dmp = Dmp::default();
        let patches = dmp.patch_make_from_texts("The quick brown fox.", "The slow brown fox.");
        let (_, results) = dmp.patch_apply(&patches, "Completely unrelated content with nothing in common.");
        assert!(results.iter().any(|&ok| !ok));
    }

    #[test]
    fn never_mutates_input_patch_list() {
        let dmp = Dmp::default();
        let patches = dmp.patch_make_from_texts("abc", "abXc");
        let before = crate::patch::patch_to_text(&patches);
        let _ = dmp.patch_apply(&patches, "abc");
        let after = crate::patch::patch_to_text(&patches);
        assert_eq!(before, after);
    }
}
