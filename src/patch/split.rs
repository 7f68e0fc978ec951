//! Re-packs oversized patches so each piece's pattern fits in
//! `Match_MaxBits`.

use std::collections::VecDeque;

use super::Patch;
use crate::diff::{diff_text1, diff_text2, Diff, Op};
use crate::Dmp;

impl Dmp {
    /// Splits every patch whose `length1` exceeds `Match_MaxBits` into
    /// pieces that each fit, carrying a rolling precontext (the tail of
    /// the previous piece's target text) and a postcontext (the head of
    /// the remaining source text) between pieces.
    pub(crate) fn patch_split_max(&self, patches: &mut Vec<Patch>) {
        let patch_size = self.match_max_bits;
        let margin = self.patch_margin as usize;

        let mut x = 0usize;
        while x < patches.len() {
            if patches[x].length1 <= patch_size {
                x += 1;
                continue;
            }

            let bigpatch = patches.remove(x);
            let mut start1 = bigpatch.start1;
            let mut start2 = bigpatch.start2;
            let mut diffs: VecDeque<Diff> = bigpatch.diffs.into_iter().collect();
            let mut precontext: Vec<char> = Vec::new();

            while !diffs.is_empty() {
                let mut patch = Patch::new();
                let mut empty = true;
                patch.start1 = start1 - precontext.len();
                patch.start2 = start2 - precontext.len();

                if !precontext.is_empty() {
                    patch.length1 = precontext.len();
                    patch.length2 = precontext.len();
                    patch.diffs.push(Diff::equal(precontext.iter().collect::<String>()));
                }

                while !diffs.is_empty() && patch.length1 < patch_size.saturating_sub(margin) {
                    let diff_type = diffs[0].op;
                    let diff_len = diffs[0].text.chars().count();

                    if diff_type == Op::Insert {
                        let d = diffs.pop_front().unwrap();
                        patch.length2 += diff_len;
                        start2 += diff_len;
                        patch.diffs.push(d);
                        empty = false;
                    } else if diff_type == Op::Delete
                        && patch.diffs.len() == 1
                        && patch.diffs[0].op == Op::Equal
                        && diff_len > 2 * patch_size
                    {
                        let d = diffs.pop_front().unwrap();
                        patch.length1 += diff_len;
                        start1 += diff_len;
                        empty = false;
                        patch.diffs.push(d);
                    } else {
                        let take = diff_len.min(patch_size.saturating_sub(patch.length1).saturating_sub(margin));
                        let chars: Vec<char> = diffs[0].text.chars().collect();
                        let piece: String = chars[..take].iter().collect();

                        patch.length1 += take;
                        start1 += take;
                        if diff_type == Op::Equal {
                            patch.length2 += take;
                            start2 += take;
                        } else {
                            empty = false;
                        }
                        patch.diffs.push(Diff::new(diff_type, piece));

                        if take == diff_len {
                            diffs.pop_front();
                        } else {
                            diffs[0].text = chars[take..].iter().collect();
                        }
                    }
                }

                let text2 = diff_text2(&patch.diffs.iter().cloned().collect::<Vec<_>>());
                let pc_chars: Vec<char> = text2.chars().collect();
                let pc_start = pc_chars.len().saturating_sub(margin);
                precontext = pc_chars[pc_start..].to_vec();

                let remaining: Vec<Diff> = diffs.iter().cloned().collect();
                let source = diff_text1(&remaining);
                let postcontext: String = source.chars().take(margin).collect();
                if !postcontext.is_empty() {
                    patch.length1 += postcontext.chars().count();
                    patch.length2 += postcontext.chars().count();
                    if let Some(last) = patch.diffs.last_mut() {
                        if last.op == Op::Equal {
                            last.text.push_str(&postcontext);
                        } else {
                            patch.diffs.push(Diff::equal(postcontext));
                        }
                    } else {
                        patch.diffs.push(Diff::equal(postcontext));
                    }
                }

                if !empty {
                    patches.insert(x, patch);
                    x += 1;
                }
            }
        }
    }
}
