//! Null-padding: wraps the text under patching in sentinel code units so
//! that patches anchored at either edge still have neighbors to locate
//! against.

use super::Patch;
use crate::diff::{Diff, Op};
use crate::Dmp;

impl Dmp {
    /// Builds a `Patch_Margin`-long padding string of low code units
    /// `1, 2, … Patch_Margin` (none of which collide with visible ASCII),
    /// shifts every patch's recorded starts forward by its length, and
    /// grows the first patch's leading equality and the last patch's
    /// trailing equality so each has at least that much padding to
    /// anchor against. Returns the padding string so the caller can
    /// prepend/append it to the text and strip it back off afterwards.
    ///
    /// The original source reads `patches.front()` twice here where the
    /// trailing-equality growth should read `patches.back()`; this
    /// implementation treats that as a bug and grows the first and last
    /// patches independently (see `DESIGN.md`).
    pub(crate) fn patch_add_padding(&self, patches: &mut [Patch]) -> String {
        let margin = self.patch_margin.max(0) as usize;
        let pad_text: String = (1..=margin as u32).filter_map(char::from_u32).collect();

        for patch in patches.iter_mut() {
            patch.start1 += margin;
            patch.start2 += margin;
        }

        if let Some(first) = patches.first_mut() {
            grow_leading(first, &pad_text, margin);
        }
        if let Some(last) = patches.last_mut() {
            grow_trailing(last, &pad_text, margin);
        }

        pad_text
    }
}

fn grow_leading(patch: &mut Patch, pad_text: &str, margin: usize) {
    if patch.diffs.first().map(|d| d.op) != Some(Op::Equal) {
        patch.diffs.insert(0, Diff::equal(pad_text));
        patch.start1 -= margin;
        patch.start2 -= margin;
        patch.length1 += margin;
        patch.length2 += margin;
        return;
    }

    let have = patch.diffs[0].text.chars().count();
    if margin > have {
        let extra = margin - have;
        let prefix: String = pad_text.chars().skip(have).collect();
        patch.diffs[0].text = format!("{prefix}{}", patch.diffs[0].text);
        patch.start1 -= extra;
        patch.start2 -= extra;
        patch.length1 += extra;
        patch.length2 += extra;
    }
}

fn grow_trailing(patch: &mut Patch, pad_text: &str, margin: usize) {
    if patch.diffs.last().map(|d| d.op) != Some(Op::Equal) {
        patch.diffs.push(Diff::equal(pad_text));
        patch.length1 += margin;
        patch.length2 += margin;
        return;
    }

    let last = patch.diffs.last_mut().unwrap();
    let have = last.text.chars().count();
    if margin > have {
        let extra = margin - have;
        let suffix: String = pad_text.chars().take(extra).collect();
        last.text.push_str(&suffix);
        patch.length1 += extra;
        patch.length2 += extra;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_edge_patches() {
        let dmp = Dmp::default();
        let mut patches = dmp.patch_make_from_texts("abc", "abXc");
        let pad = dmp.patch_add_padding(&mut patches);
        assert_eq!(pad.chars().count(), 4);
        assert_eq!(patches.first().unwrap().diffs.first().unwrap().op, Op::Equal);
        assert_eq!(patches.last().unwrap().diffs.last().unwrap().op, Op::Equal);
    }

    #[test]
    fn padding_round_trips_through_apply() {
        let dmp = Dmp::default();
        let patches = dmp.patch_make_from_texts("", "test");
        let (text, results) = dmp.patch_apply(&patches, "");
        assert_eq!(text, "test");
        assert!(results.iter().all(|&ok| ok));
    }
}
