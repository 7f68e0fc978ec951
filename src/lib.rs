/*!
A bidirectional text diff / fuzzy-match / drift-tolerant patch engine.

Add dependency to `Cargo.toml` under your project:
```toml
[dependencies]
dmp = "0.1"
```

Three tightly coupled operations are exposed through a single engine
handle, [`Dmp`]:

- [`Dmp::diff_main`] computes a minimal edit script between two strings.
- [`Dmp::match_main`] fuzzily locates a pattern near an expected offset.
- [`Dmp::patch_make`] packages an edit script into context-bearing
  patches that [`Dmp::patch_apply`] can replay against a drifted copy of
  the source text.

```rust
use dmp::Dmp;

let dmp = Dmp::default();
let diffs = dmp.diff_main("abc", "ab123c", true);
assert_eq!(dmp::diff_text1(&diffs), "abc");
assert_eq!(dmp::diff_text2(&diffs), "ab123c");
```
*/

pub mod diff;
pub mod error;
pub mod matcher;
pub mod patch;
pub mod strutil;

pub use diff::{
    diff_from_delta, diff_pretty_html, diff_text1, diff_text2, diff_to_delta, diff_x_index, diff_levenshtein, Diff, Op,
};
pub use error::{Error, Result};
pub use patch::{patch_from_text, patch_to_text, Patch};

/// The diff/match/patch engine handle.
///
/// Holds only the seven tunable knobs; it owns no other state and is
/// cheap to clone. Every operation borrows its inputs and returns freshly
/// owned results — instances are not shared across threads internally,
/// matching the single-threaded, cooperative scheduling model these
/// algorithms were designed under.
///
/// Construct with [`Dmp::default`] and adjust with the consuming builder
/// setters, the same way the teacher configures `Bsdiff`/`Bspatch`:
///
/// ```rust
/// use dmp::Dmp;
/// let dmp = Dmp::default().diff_timeout(0.5).match_threshold(0.4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dmp {
    /// Soft deadline, in seconds, for a top-level `diff_main` call.
    /// `<= 0.0` disables both the deadline and the half-match speedup.
    pub diff_timeout: f64,
    /// Cost bound consulted by efficiency cleanup.
    pub diff_edit_cost: i32,
    /// Bitap match score cutoff in `[0, 1]`; `0.0` means exact-only.
    pub match_threshold: f32,
    /// Code-unit distance that adds `1.0` to the bitap score; `0` means
    /// the match location must be exact.
    pub match_distance: i32,
    /// Maximum acceptable Levenshtein ratio for a large imperfect patch
    /// match before the applier gives up on that patch.
    pub patch_delete_threshold: f32,
    /// Desired context code units on each side of a patch.
    pub patch_margin: i32,
    /// Maximum pattern length the bitap matcher accepts. The matcher
    /// packs a pattern's alphabet into a `u64` bitmask, so this should
    /// not exceed 64.
    pub match_max_bits: usize,
}

impl Default for Dmp {
    fn default() -> Self {
        Dmp {
            diff_timeout: 1.0,
            diff_edit_cost: 4,
            match_threshold: 0.5,
            match_distance: 1000,
            patch_delete_threshold: 0.5,
            patch_margin: 4,
            match_max_bits: 32,
        }
    }
}

impl Dmp {
    pub fn diff_timeout(mut self, v: f64) -> Self {
        self.diff_timeout = v;
        self
    }

    pub fn diff_edit_cost(mut self, v: i32) -> Self {
        self.diff_edit_cost = v;
        self
    }

    pub fn match_threshold(mut self, v: f32) -> Self {
        self.match_threshold = v;
        self
    }

    pub fn match_distance(mut self, v: i32) -> Self {
        self.match_distance = v;
        self
    }

    pub fn patch_delete_threshold(mut self, v: f32) -> Self {
        self.patch_delete_threshold = v;
        self
    }

    pub fn patch_margin(mut self, v: i32) -> Self {
        self.patch_margin = v;
        self
    }

    pub fn match_max_bits(mut self, v: usize) -> Self {
        self.match_max_bits = v;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_knobs_match_documented_values() {
        let dmp = Dmp::default();
        assert_eq!(dmp.diff_timeout, 1.0);
        assert_eq!(dmp.diff_edit_cost, 4);
        assert_eq!(dmp.match_threshold, 0.5);
        assert_eq!(dmp.match_distance, 1000);
        assert_eq!(dmp.patch_delete_threshold, 0.5);
        assert_eq!(dmp.patch_margin, 4);
        assert_eq!(dmp.match_max_bits, 32);
    }

    #[test]
    fn builder_is_consuming_and_chainable() {
        let dmp = Dmp::default().diff_timeout(0.0).match_threshold(0.1).patch_margin(8);
        assert_eq!(dmp.diff_timeout, 0.0);
        assert_eq!(dmp.match_threshold, 0.1);
        assert_eq!(dmp.patch_margin, 8);
    }
}
