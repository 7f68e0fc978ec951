/*! Benchmarks `diff_main` and `patch_apply` over synthetic text, grounded
on the teacher's own sample-corpus benchmark harness but driving this
crate's in-memory string API instead of invoking external binaries. */

use criterion::{criterion_group, criterion_main, Criterion};
use dmp::Dmp;

fn sample_text(lines: usize, seed: u32) -> String {
    let mut text = String::new();
    for i in 0..lines {
        text.push_str(&format!("line {} token-{} filler content here\n", i, (i as u32).wrapping_mul(seed) % 997));
    }
    text
}

fn mutate(text: &str, every: usize) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| if i % every == 0 { format!("{line} EDITED") } else { line.to_string() })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn diff(crit: &mut Criterion) {
    let dmp = Dmp::default();
    for &lines in &[20usize, 200, 2000] {
        let a = sample_text(lines, 7);
        let b = mutate(&a, 11);
        let bench_name = format!("diff_main {lines} lines");
        crit.bench_function(&bench_name, |bencher| bencher.iter(|| dmp.diff_main(&a, &b, true)));
    }
}

pub fn patch(crit: &mut Criterion) {
    let dmp = Dmp::default();
    for &lines in &[20usize, 200, 2000] {
        let a = sample_text(lines, 7);
        let b = mutate(&a, 11);
        let patches = dmp.patch_make_from_texts(&a, &b);
        let drifted = mutate(&a, 13);
        let bench_name = format!("patch_apply {lines} lines");
        crit.bench_function(&bench_name, |bencher| bencher.iter(|| dmp.patch_apply(&patches, &drifted)));
    }
}

criterion_group! {
    name = diff_benches;
    config = Criterion::default()
        .sample_size(10)
        .noise_threshold(0.02)
        .warm_up_time(std::time::Duration::from_millis(200))
        .measurement_time(std::time::Duration::new(2, 0));
    targets = diff,
}

criterion_group! {
    name = patch_benches;
    config = Criterion::default()
        .sample_size(10)
        .noise_threshold(0.02)
        .warm_up_time(std::time::Duration::from_millis(200))
        .measurement_time(std::time::Duration::new(2, 0));
    targets = patch,
}

criterion_main!(diff_benches, patch_benches);
