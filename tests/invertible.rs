//! Randomized invertibility checks: for arbitrary text pairs, a computed
//! diff must reconstruct both sides, and patches built from it must
//! reapply cleanly to the untouched source.

use dmp::{diff_from_delta, diff_text1, diff_text2, diff_to_delta, Dmp};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn diff_reconstructs_both_texts(a: String, b: String) -> bool {
    let dmp = Dmp::default();
    let diffs = dmp.diff_main(&a, &b, true);
    diff_text1(&diffs) == a && diff_text2(&diffs) == b
}

#[quickcheck]
fn delta_round_trips_any_diff(a: String, b: String) -> bool {
    let dmp = Dmp::default();
    let diffs = dmp.diff_main(&a, &b, true);
    let delta = diff_to_delta(&diffs);
    match diff_from_delta(&diff_text1(&diffs), &delta) {
        Ok(restored) => restored == diffs,
        Err(_) => false,
    }
}

#[quickcheck]
fn patch_apply_reconstructs_target_from_source(a: String, b: String) -> bool {
    let dmp = Dmp::default();
    let patches = dmp.patch_make_from_texts(&a, &b);
    let (result, results) = dmp.patch_apply(&patches, &a);
    result == b && results.iter().all(|&ok| ok)
}

#[quickcheck]
fn patch_apply_never_mutates_its_input(a: String, b: String) -> bool {
    let dmp = Dmp::default();
    let patches = dmp.patch_make_from_texts(&a, &b);
    let before = dmp::patch_to_text(&patches);
    let _ = dmp.patch_apply(&patches, &a);
    let after = dmp::patch_to_text(&patches);
    before == after
}
