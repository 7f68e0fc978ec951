//! Normalization passes: semantic cleanup, semantic-lossless boundary
//! sliding, efficiency cleanup, and the two-pass merge cleanup that every
//! other pass and `diff_main` itself finishes with.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Diff, Op};
use crate::strutil::{common_overlap, common_prefix, common_suffix};

static BLANK_LINE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\r?\n$").unwrap());
static BLANK_LINE_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\r?\n\r?\n").unwrap());

/// Removes equalities that are trivially short compared to the edits on
/// either side of them, turning them into an adjacent delete+insert pair,
/// then looks for overlap between newly adjacent delete/insert runs to
/// salvage a trimmed equality out of the overlap.
pub fn diff_cleanup_semantic(diffs: &mut Vec<Diff>) {
    if diffs.is_empty() {
        return;
    }

    let mut changes = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<String> = None;
    let mut pointer = 0usize;

    let mut length_insertions1 = 0usize;
    let mut length_deletions1 = 0usize;
    let mut length_insertions2 = 0usize;
    let mut length_deletions2 = 0usize;

    while pointer < diffs.len() {
        if diffs[pointer].op == Op::Equal {
            equalities.push(pointer);
            length_insertions1 = length_insertions2;
            length_deletions1 = length_deletions2;
            length_insertions2 = 0;
            length_deletions2 = 0;
            last_equality = Some(diffs[pointer].text.clone());
        } else {
            if diffs[pointer].op == Op::Insert {
                length_insertions2 += diffs[pointer].text.chars().count();
            } else {
                length_deletions2 += diffs[pointer].text.chars().count();
            }

            if let Some(ref eq) = last_equality {
                let eq_len = eq.chars().count();
                if eq_len <= length_insertions1.max(length_deletions1) && eq_len <= length_insertions2.max(length_deletions2) {
                    let idx = *equalities.last().unwrap();
                    diffs.insert(idx, Diff::delete(eq.clone()));
                    diffs[idx + 1] = Diff::insert(eq.clone());

                    equalities.pop();
                    if !equalities.is_empty() {
                        // Throw away the previous equality too; it needs to be
                        // reevaluated with fresh counts once we scan back over it.
                        equalities.pop();
                    }
                    pointer = equalities.last().copied().unwrap_or(0);
                    length_insertions1 = 0;
                    length_deletions1 = 0;
                    length_insertions2 = 0;
                    length_deletions2 = 0;
                    last_equality = None;
                    changes = true;
                    continue;
                }
            }
        }
        pointer += 1;
    }

    if changes {
        diff_cleanup_merge(diffs);
    }
    diff_cleanup_semantic_lossless(diffs);

    let mut pointer = 1usize;
    while pointer < diffs.len() {
        if pointer >= 1 && diffs[pointer - 1].op == Op::Delete && diffs[pointer].op == Op::Insert {
            let deletion = diffs[pointer - 1].text.clone();
            let insertion = diffs[pointer].text.clone();
            let d_chars: Vec<char> = deletion.chars().collect();
            let i_chars: Vec<char> = insertion.chars().collect();

            let overlap_len1 = common_overlap(&d_chars, &i_chars);
            let overlap_len2 = common_overlap(&i_chars, &d_chars);

            if overlap_len1 >= overlap_len2 {
                if overlap_len1 as f64 >= d_chars.len() as f64 / 2.0 || overlap_len1 as f64 >= i_chars.len() as f64 / 2.0 {
                    let overlap: String = i_chars[..overlap_len1].iter().collect();
                    diffs.insert(pointer, Diff::equal(overlap));
                    diffs[pointer - 1] = Diff::delete(d_chars[..d_chars.len() - overlap_len1].iter().collect::<String>());
                    diffs[pointer + 1] = Diff::insert(i_chars[overlap_len1..].iter().collect::<String>());
                    pointer += 1;
                }
            } else if overlap_len2 as f64 >= d_chars.len() as f64 / 2.0 || overlap_len2 as f64 >= i_chars.len() as f64 / 2.0 {
                let overlap: String = d_chars[..overlap_len2].iter().collect();
                diffs.insert(pointer, Diff::equal(overlap));
                diffs[pointer - 1] = Diff::insert(i_chars[..i_chars.len() - overlap_len2].iter().collect::<String>());
                diffs[pointer + 1] = Diff::delete(d_chars[overlap_len2..].iter().collect::<String>());
                pointer += 1;
            }
        }
        pointer += 1;
    }

    retain_nonempty(diffs);
}

/// Slides each single edit between two equalities toward the
/// highest-scoring boundary, preferring sentence/line/blank-line breaks
/// over mid-word splits.
pub fn diff_cleanup_semantic_lossless(diffs: &mut [Diff]) {
    let mut pointer = 1isize;
    while (pointer as usize) < diffs.len().saturating_sub(1) {
        let p = pointer as usize;
        if diffs[p - 1].op == Op::Equal && diffs[p + 1].op == Op::Equal {
            let mut equality1: Vec<char> = diffs[p - 1].text.chars().collect();
            let mut edit: Vec<char> = diffs[p].text.chars().collect();
            let mut equality2: Vec<char> = diffs[p + 1].text.chars().collect();

            let suffix_len = common_suffix(&equality1, &edit);
            if suffix_len > 0 {
                let common: Vec<char> = equality1[equality1.len() - suffix_len..].to_vec();
                equality1.truncate(equality1.len() - suffix_len);
                let mut new_edit = common.clone();
                new_edit.extend(edit[..edit.len() - suffix_len].iter().cloned());
                edit = new_edit;
                let mut new_eq2 = common;
                new_eq2.extend(equality2.iter().cloned());
                equality2 = new_eq2;
            }

            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score = cleanup_semantic_score(&equality1, &edit) + cleanup_semantic_score(&edit, &equality2);

            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2[0]);
                equality2.remove(0);

                let score = cleanup_semantic_score(&equality1, &edit) + cleanup_semantic_score(&edit, &equality2);
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if diffs[p - 1].text.chars().collect::<Vec<char>>() != best_equality1 {
                if best_equality1.is_empty() {
                    diffs[p - 1].text = String::new();
                } else {
                    diffs[p - 1].text = best_equality1.iter().collect();
                }
                diffs[p].text = best_edit.iter().collect();
                if best_equality2.is_empty() {
                    diffs[p + 1].text = String::new();
                } else {
                    diffs[p + 1].text = best_equality2.iter().collect();
                }
            }
        }
        pointer += 1;
    }

    retain_nonempty(diffs);
}

/// Scores the boundary between `one` and `two`: higher means a more
/// natural place to split (string edge, blank line, line break, sentence
/// end, whitespace, non-alphanumeric), `0` otherwise.
fn cleanup_semantic_score(one: &[char], two: &[char]) -> i32 {
    if one.is_empty() || two.is_empty() {
        return 6;
    }

    let char1 = *one.last().unwrap();
    let char2 = *two.first().unwrap();
    let non_alnum1 = !char1.is_alphanumeric();
    let non_alnum2 = !char2.is_alphanumeric();
    let whitespace1 = non_alnum1 && char1.is_whitespace();
    let whitespace2 = non_alnum2 && char2.is_whitespace();
    let line_break1 = whitespace1 && (char1 == '\n' || char1 == '\r');
    let line_break2 = whitespace2 && (char2 == '\n' || char2 == '\r');

    let tail: String = one.iter().rev().take(4).rev().collect();
    let head: String = two.iter().take(4).collect();
    let blank_line1 = line_break1 && BLANK_LINE_END.is_match(&tail);
    let blank_line2 = line_break2 && BLANK_LINE_START.is_match(&head);

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alnum1 && !whitespace1 && whitespace2 {
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alnum1 || non_alnum2 {
        1
    } else {
        0
    }
}

/// Eliminates short equalities (shorter than `edit_cost` code units)
/// surrounded by inserts/deletes when the surrounding edit shape makes
/// removing them cheaper than keeping them, per `Diff_EditCost`.
pub fn diff_cleanup_efficiency(diffs: &mut Vec<Diff>, edit_cost: i32) {
    if diffs.is_empty() {
        return;
    }

    let mut changes = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<String> = None;
    let mut pointer = 0usize;
    // Last position known to be safe to resume scanning from once the
    // candidate stack runs dry, mirroring the reference's `safeDiff`.
    let mut safe_pointer = 0usize;

    let mut pre_ins = false;
    let mut pre_del = false;
    let mut post_ins = false;
    let mut post_del = false;

    while pointer < diffs.len() {
        if diffs[pointer].op == Op::Equal {
            let short = (diffs[pointer].text.chars().count() as i32) < edit_cost;
            if short && (post_ins || post_del) {
                equalities.push(pointer);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(diffs[pointer].text.clone());
            } else {
                equalities.clear();
                last_equality = None;
                safe_pointer = pointer;
            }
            post_ins = false;
            post_del = false;
        } else {
            if diffs[pointer].op == Op::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }

            if let Some(ref eq) = last_equality {
                let eligible = (pre_ins && pre_del && post_ins && post_del)
                    || ((eq.chars().count() as i32) < edit_cost / 2 && [pre_ins, pre_del, post_ins, post_del].iter().filter(|b| **b).count() == 3);

                if eligible {
                    let idx = *equalities.last().unwrap();
                    diffs.insert(idx, Diff::delete(eq.clone()));
                    diffs[idx + 1] = Diff::insert(eq.clone());

                    last_equality = None;
                    changes = true;

                    if pre_ins && pre_del {
                        // Both sides already had an edit touching this equality;
                        // every candidate below it is stale once it's split.
                        equalities.clear();
                        safe_pointer = idx;
                        post_ins = true;
                        post_del = true;
                        pointer = idx + 2;
                        continue;
                    } else {
                        equalities.pop();
                        if !equalities.is_empty() {
                            equalities.pop();
                        }
                        pointer = equalities.last().copied().unwrap_or(safe_pointer);
                        post_ins = false;
                        post_del = false;
                        continue;
                    }
                }
            }
        }
        pointer += 1;
    }

    if changes {
        diff_cleanup_merge(diffs);
    }
}

/// Factors common affixes out of adjacent delete/insert runs into
/// neighboring equalities, coalesces same-op runs, and sweeps boundaries
/// left/right to merge a run into an identical neighboring equality.
pub fn diff_cleanup_merge(diffs: &mut Vec<Diff>) {
    diffs.push(Diff::equal(""));

    let mut pointer = 0usize;
    let mut count_delete = 0usize;
    let mut count_insert = 0usize;
    let mut text_delete = String::new();
    let mut text_insert = String::new();

    while pointer < diffs.len() {
        match diffs[pointer].op {
            Op::Insert => {
                count_insert += 1;
                text_insert.push_str(&diffs[pointer].text);
                pointer += 1;
            }
            Op::Delete => {
                count_delete += 1;
                text_delete.push_str(&diffs[pointer].text);
                pointer += 1;
            }
            Op::Equal => {
                if count_delete + count_insert > 1 {
                    if count_delete > 0 && count_insert > 0 {
                        let d: Vec<char> = text_delete.chars().collect();
                        let i: Vec<char> = text_insert.chars().collect();
                        let common_len = common_prefix(&d, &i);
                        if common_len > 0 {
                            let common: String = i[..common_len].iter().collect();
                            let insert_at = pointer - count_delete - count_insert;
                            if insert_at > 0 && diffs[insert_at - 1].op == Op::Equal {
                                diffs[insert_at - 1].text.push_str(&common);
                            } else {
                                diffs.insert(0, Diff::equal(common.clone()));
                                pointer += 1;
                            }
                            text_delete = d[common_len..].iter().collect();
                            text_insert = i[common_len..].iter().collect();
                        }

                        let d: Vec<char> = text_delete.chars().collect();
                        let i: Vec<char> = text_insert.chars().collect();
                        let common_len = common_suffix(&d, &i);
                        if common_len > 0 {
                            let common: String = i[i.len() - common_len..].iter().collect();
                            diffs[pointer].text = format!("{}{}", common, diffs[pointer].text);
                            text_delete = d[..d.len() - common_len].iter().collect();
                            text_insert = i[..i.len() - common_len].iter().collect();
                        }
                    }

                    let insert_at = pointer - count_delete - count_insert;
                    diffs.splice(insert_at..pointer, std::iter::empty());
                    pointer = insert_at;

                    if !text_delete.is_empty() {
                        diffs.insert(pointer, Diff::delete(text_delete.clone()));
                        pointer += 1;
                    }
                    if !text_insert.is_empty() {
                        diffs.insert(pointer, Diff::insert(text_insert.clone()));
                        pointer += 1;
                    }
                }

                count_insert = 0;
                count_delete = 0;
                text_delete = String::new();
                text_insert = String::new();
                pointer += 1;
            }
        }
    }

    if diffs.last().map(|d| d.text.is_empty()).unwrap_or(false) {
        diffs.pop();
    }

    retain_nonempty(diffs);

    let mut changes = false;
    let mut pointer = 1isize;
    while (pointer as usize) + 1 < diffs.len() {
        let p = pointer as usize;
        if diffs[p - 1].op == Op::Equal && diffs[p + 1].op == Op::Equal {
            let a = diffs[p - 1].text.clone();
            let c = diffs[p + 1].text.clone();
            if diffs[p].text.ends_with(&a) {
                let blen = diffs[p].text.chars().count() - a.chars().count();
                let b_prefix: String = diffs[p].text.chars().take(blen).collect();
                diffs[p].text = format!("{a}{b_prefix}");
                diffs[p + 1].text = format!("{a}{c}");
                diffs.remove(p - 1);
                changes = true;
            } else if diffs[p].text.starts_with(&c) {
                let blen = diffs[p].text.chars().count() - c.chars().count();
                let b_suffix: String = diffs[p].text.chars().skip(diffs[p].text.chars().count() - blen).collect();
                diffs[p - 1].text = format!("{a}{c}");
                diffs[p].text = format!("{b_suffix}{c}");
                diffs.remove(p + 1);
                changes = true;
            }
        }
        pointer += 1;
    }

    if changes {
        diff_cleanup_merge(diffs);
    }
}

fn retain_nonempty(diffs: &mut Vec<Diff>) {
    diffs.retain(|d| !d.text.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{diff_text1, diff_text2};

    #[test]
    fn semantic_cleanup_eliminates_trivial_equality() {
        let mut diffs = vec![
            Diff::delete("ab"),
            Diff::insert("12"),
            Diff::equal("xyz"),
            Diff::delete("cd"),
            Diff::insert("34"),
        ];
        let before1 = diff_text1(&diffs);
        let before2 = diff_text2(&diffs);
        diff_cleanup_semantic(&mut diffs);
        assert_eq!(diff_text1(&diffs), before1);
        assert_eq!(diff_text2(&diffs), before2);
    }

    #[test]
    fn merge_cleanup_coalesces_same_op_runs() {
        let mut diffs = vec![Diff::delete("a"), Diff::delete("b"), Diff::insert("c")];
        diff_cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![Diff::delete("ab"), Diff::insert("c")]);
    }

    #[test]
    fn merge_cleanup_factors_common_affixes() {
        let mut diffs = vec![Diff::equal("a"), Diff::delete("ba"), Diff::insert("baba"), Diff::equal("c")];
        diff_cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![Diff::equal("aba"), Diff::delete("b"), Diff::insert("b"), Diff::equal("ac")]);
    }

    #[test]
    fn merge_cleanup_drops_empty_diffs() {
        let mut diffs = vec![Diff::equal(""), Diff::delete("a"), Diff::equal("b"), Diff::equal("")];
        diff_cleanup_merge(&mut diffs);
        assert_eq!(diffs, vec![Diff::delete("a"), Diff::equal("b")]);
    }

    #[test]
    fn semantic_cleanup_backtracks_past_eliminated_equality() {
        let mut diffs = vec![
            Diff::delete("aaaa"),
            Diff::equal("LONG"),
            Diff::delete("bb"),
            Diff::equal("yy"),
            Diff::insert("zz"),
        ];
        diff_cleanup_semantic(&mut diffs);
        assert_eq!(diffs, vec![Diff::delete("aaaaLONGbbyy"), Diff::insert("LONGyyzz")]);
    }

    #[test]
    fn efficiency_cleanup_joins_short_equality_when_costly() {
        let mut diffs = vec![
            Diff::delete("wxyz"),
            Diff::insert("abcde"),
            Diff::equal("12"),
            Diff::insert("34"),
        ];
        diff_cleanup_efficiency(&mut diffs, 6);
        assert_eq!(diffs, vec![Diff::delete("wxyz12"), Diff::insert("abcde1234")]);
    }
}
