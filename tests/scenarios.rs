//! Black-box scenarios straight out of the engine's documented behavior:
//! one `#[test]` per concrete example, exercising only the public API.

use dmp::{diff_text1, diff_text2, diff_to_delta, Diff, Dmp, Op};

#[test]
fn diff_splits_a_simple_insertion() {
    let dmp = Dmp::default();
    let diffs = dmp.diff_main("abc", "ab123c", true);
    assert_eq!(diffs, vec![Diff::equal("ab"), Diff::insert("123"), Diff::equal("c")]);
}

#[test]
fn diff_finds_word_level_substitution() {
    let dmp = Dmp::default();
    let diffs = dmp.diff_main("Apples are a fruit.", "Bananas are also fruit.", true);
    assert_eq!(
        diffs,
        vec![
            Diff::delete("Apple"),
            Diff::insert("Banana"),
            Diff::equal("s are a"),
            Diff::insert("lso"),
            Diff::equal(" fruit."),
        ]
    );
}

#[test]
fn delta_encodes_jump_example() {
    let diffs = vec![
        Diff::equal("jump"),
        Diff::delete("s"),
        Diff::insert("ed"),
        Diff::equal(" over "),
        Diff::delete("the"),
        Diff::insert("a"),
        Diff::equal(" lazy"),
        Diff::insert("old dog"),
    ];
    assert_eq!(diff_to_delta(&diffs), "=4\t-1\t+ed\t=6\t-3\t+a\t=5\t+old dog");
}

#[test]
fn match_main_examples() {
    let dmp = Dmp::default();
    assert_eq!(dmp.match_main("abcdefghijk", "fgh", 5).unwrap(), Some(5));

    let lenient = Dmp::default().match_threshold(0.4);
    assert_eq!(lenient.match_main("abcdefghijk", "efxyhi", 1).unwrap(), Some(4));

    let strict = Dmp::default().match_threshold(0.3);
    assert_eq!(strict.match_main("abcdefghijk", "efxyhi", 1).unwrap(), None);
}

#[test]
fn patch_apply_tolerates_drifted_text() {
    let dmp = Dmp::default();
    let patches = dmp.patch_make_from_texts(
        "The quick brown fox jumps over the lazy dog.",
        "That quick brown fox jumped over a lazy dog.",
    );
    let (result, results) = dmp.patch_apply(&patches, "The quick red rabbit jumps over the tired tiger.");
    assert_eq!(result, "That quick red rabbit jumped over a tired tiger.");
    assert_eq!(results, vec![true, true]);
}

#[test]
fn patch_apply_pads_an_empty_source() {
    let dmp = Dmp::default();
    let patches = dmp.patch_make_from_texts("", "test");
    let (result, results) = dmp.patch_apply(&patches, "");
    assert_eq!(result, "test");
    assert_eq!(results, vec![true]);
}

#[test]
fn diff_text1_and_text2_reconstruct_both_sides() {
    let dmp = Dmp::default();
    let t1 = "The quick brown fox jumps over the lazy dog.";
    let t2 = "That quick brown fox jumped over a lazy dog.";
    let diffs = dmp.diff_main(t1, t2, true);
    assert_eq!(diff_text1(&diffs), t1);
    assert_eq!(diff_text2(&diffs), t2);
}

#[test]
fn diff_pretty_html_wraps_each_op() {
    let dmp = Dmp::default();
    let diffs = dmp.diff_main("a", "b", true);
    let html = dmp::diff_pretty_html(&diffs);
    assert!(html.contains("<del"));
    assert!(html.contains("<ins"));
}

#[test]
fn line_mode_handles_large_inputs_identically_to_char_mode() {
    let dmp = Dmp::default();
    let mut t1 = String::new();
    let mut t2 = String::new();
    for i in 0..80 {
        t1.push_str(&format!("line number {i}\n"));
        t2.push_str(&format!("line number {i}\n"));
    }
    t2.push_str("an extra trailing line\n");

    let diffs = dmp.diff_main(&t1, &t2, true);
    assert_eq!(diff_text1(&diffs), t1);
    assert_eq!(diff_text2(&diffs), t2);
    assert!(diffs.iter().any(|d| d.op == Op::Insert && d.text.contains("extra trailing line")));
}

#[test]
fn patch_text_round_trips() {
    let dmp = Dmp::default();
    let patches = dmp.patch_make_from_texts(
        "The quick brown fox jumps over the lazy dog.",
        "That quick brown fox jumped over a lazy dog.",
    );
    let text = dmp::patch_to_text(&patches);
    let restored = dmp::patch_from_text(&text).unwrap();
    assert_eq!(restored, patches);
}
