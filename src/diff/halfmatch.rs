//! Half-match: a divide-and-conquer speedup that looks for a shared
//! substring at least half the length of the longer input before paying
//! for a full bisect.

use crate::strutil::{common_prefix, common_suffix};
use crate::Dmp;

pub(crate) struct HalfMatch {
    pub text1_a: Vec<char>,
    pub text1_b: Vec<char>,
    pub text2_a: Vec<char>,
    pub text2_b: Vec<char>,
    pub common: Vec<char>,
}

impl Dmp {
    /// Returns `None` when timeouts are disabled (a half-match can yield a
    /// non-optimal diff, acceptable only when bounded by a deadline), or
    /// when no seed extends to at least half the longer string's length.
    pub(crate) fn diff_half_match(&self, text1: &[char], text2: &[char]) -> Option<HalfMatch> {
        if self.diff_timeout <= 0.0 {
            return None;
        }

        let (longtext, shorttext, swapped) =
            if text1.len() > text2.len() { (text1, text2, false) } else { (text2, text1, true) };

        if longtext.len() < 4 || shorttext.len() * 2 < longtext.len() {
            return None;
        }

        let hm1 = half_match_i(longtext, shorttext, (longtext.len() + 3) / 4);
        let hm2 = half_match_i(longtext, shorttext, (longtext.len() + 1) / 2);

        let best = match (hm1, hm2) {
            (None, None) => return None,
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (Some(a), Some(b)) => {
                if a.common.len() > b.common.len() {
                    a
                } else {
                    b
                }
            }
        };

        let (text1_a, text1_b, text2_a, text2_b) = if swapped {
            (best.short_a, best.short_b, best.long_a, best.long_b)
        } else {
            (best.long_a, best.long_b, best.short_a, best.short_b)
        };

        Some(HalfMatch { text1_a, text1_b, text2_a, text2_b, common: best.common })
    }
}

struct Seed {
    long_a: Vec<char>,
    long_b: Vec<char>,
    short_a: Vec<char>,
    short_b: Vec<char>,
    common: Vec<char>,
}

/// Tries to extend the `⌊|longtext|/4⌋`-length seed starting at `i` in
/// `longtext` into `shorttext`, keeping whichever occurrence yields the
/// longest combined prefix+suffix match.
fn half_match_i(longtext: &[char], shorttext: &[char], i: usize) -> Option<Seed> {
    let seed_len = longtext.len() / 4;
    let seed = &longtext[i..i + seed_len];

    let mut best_common: Vec<char> = Vec::new();
    let mut best_long_a: Vec<char> = Vec::new();
    let mut best_long_b: Vec<char> = Vec::new();
    let mut best_short_a: Vec<char> = Vec::new();
    let mut best_short_b: Vec<char> = Vec::new();

    let mut j = find_from(shorttext, seed, 0);
    while let Some(found) = j {
        let prefix_len = common_prefix(&longtext[i..], &shorttext[found..]);
        let suffix_len = common_suffix(&longtext[..i], &shorttext[..found]);
        if best_common.len() < suffix_len + prefix_len {
            best_common = shorttext[found - suffix_len..found + prefix_len].to_vec();
            best_long_a = longtext[..i - suffix_len].to_vec();
            best_long_b = longtext[i + prefix_len..].to_vec();
            best_short_a = shorttext[..found - suffix_len].to_vec();
            best_short_b = shorttext[found + prefix_len..].to_vec();
        }
        j = find_from(shorttext, seed, found + 1);
    }

    if best_common.len() * 2 >= longtext.len() {
        Some(Seed {
            long_a: best_long_a,
            long_b: best_long_b,
            short_a: best_short_a,
            short_b: best_short_b,
            common: best_common,
        })
    } else {
        None
    }
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if from > haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..].windows(needle.len()).position(|w| w == needle).map(|p| p + from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cv(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn no_match_when_too_short() {
        let dmp = Dmp::default();
        assert!(dmp.diff_half_match(&cv("1234567890"), &cv("abcdef")).is_none());
    }

    #[test]
    fn finds_single_match() {
        let dmp = Dmp::default();
        let hm = dmp.diff_half_match(&cv("1234567890"), &cv("a345678z")).unwrap();
        assert_eq!(hm.common.iter().collect::<String>(), "345678");
        assert_eq!(hm.text1_a.iter().collect::<String>(), "12");
        assert_eq!(hm.text1_b.iter().collect::<String>(), "90");
        assert_eq!(hm.text2_a.iter().collect::<String>(), "a");
        assert_eq!(hm.text2_b.iter().collect::<String>(), "z");
    }

    #[test]
    fn disabled_without_timeout() {
        let dmp = Dmp::default().diff_timeout(0.0);
        assert!(dmp.diff_half_match(&cv("1234567890"), &cv("a345678z")).is_none());
    }
}
