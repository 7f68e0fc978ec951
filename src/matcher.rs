//! Bitap fuzzy string matching: locate the best approximate position of a
//! pattern in a text, favoring positions near an expected location.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::Dmp;

impl Dmp {
    /// Locates `pattern` in `text` near `loc`. Exact-substring and
    /// trivial-empty cases short-circuit before falling through to
    /// [`Dmp::match_bitap`].
    pub fn match_main(&self, text: &str, pattern: &str, loc: usize) -> Result<Option<usize>> {
        if text.is_empty() && pattern.is_empty() {
            return Ok(Some(0));
        }
        if text.is_empty() {
            return Ok(None);
        }

        let text_chars: Vec<char> = text.chars().collect();
        let pattern_chars: Vec<char> = pattern.chars().collect();
        let loc = loc.min(text_chars.len());

        if pattern_chars.is_empty() {
            return Ok(Some(loc));
        }

        if loc + pattern_chars.len() <= text_chars.len() && text_chars[loc..loc + pattern_chars.len()] == pattern_chars[..] {
            return Ok(Some(loc));
        }

        self.match_bitap(&text_chars, &pattern_chars, loc)
    }

    /// The bitap recurrence itself. Rejects patterns over `Match_MaxBits`
    /// code units, the precondition every other caller relies on.
    pub(crate) fn match_bitap(&self, text: &[char], pattern: &[char], loc: usize) -> Result<Option<usize>> {
        if pattern.len() > self.match_max_bits {
            return Err(Error::PatternTooLong { len: pattern.len(), max_bits: self.match_max_bits });
        }

        let alphabet = match_alphabet(pattern);
        let mut score_threshold = self.match_threshold as f64;

        if let Some(loc0) = find_from(text, pattern, loc) {
            score_threshold = score_threshold.min(self.bitap_score(0, loc0, loc, pattern.len()));
            if let Some(loc1) = rfind_from(text, pattern, (loc + pattern.len()).min(text.len())) {
                score_threshold = score_threshold.min(self.bitap_score(0, loc1, loc, pattern.len()));
            }
        }

        let match_mask: u64 = 1 << (pattern.len() - 1);
        let mut best_loc: Option<usize> = None;

        let mut last_rd: Vec<u64> = Vec::new();
        let mut bin_max = (pattern.len() + text.len()) as i64;

        for d in 0..pattern.len() {
            let mut bin_min = 0i64;
            let mut bin_mid = bin_max;
            while bin_min < bin_mid {
                let x = (loc as i64 + bin_mid).max(0) as usize;
                if self.bitap_score(d, x, loc, pattern.len()) <= score_threshold {
                    bin_min = bin_mid;
                } else {
                    bin_max = bin_mid;
                }
                bin_mid = (bin_max - bin_min) / 2 + bin_min;
            }
            bin_max = bin_mid;

            let mut start = 1usize.max((loc as i64 - bin_mid + 1).max(1) as usize);
            let finish = (loc + bin_mid as usize).min(text.len()) + pattern.len();

            let mut rd = vec![0u64; finish + 2];
            rd[finish + 1] = (1u64 << d) - 1;

            let mut j = finish;
            while j >= start {
                let char_match = if j >= 1 && j - 1 < text.len() {
                    *alphabet.get(&text[j - 1]).unwrap_or(&0)
                } else {
                    0
                };

                rd[j] = if d == 0 {
                    ((rd[j + 1] << 1) | 1) & char_match
                } else {
                    (((rd[j + 1] << 1) | 1) & char_match) | (((last_rd[j + 1] | last_rd[j]) << 1) | 1) | last_rd[j + 1]
                };

                if rd[j] & match_mask != 0 {
                    let score = self.bitap_score(d, j - 1, loc, pattern.len());
                    if score <= score_threshold {
                        score_threshold = score;
                        best_loc = Some(j - 1);
                        if j - 1 > loc {
                            start = 1.max(2 * loc as i64 - (j as i64 - 1)) as usize;
                        } else {
                            break;
                        }
                    }
                }

                if j == 0 {
                    break;
                }
                j -= 1;
            }

            if self.bitap_score(d + 1, loc, loc, pattern.len()) > score_threshold {
                break;
            }
            last_rd = rd;
        }

        Ok(best_loc)
    }

    fn bitap_score(&self, e: usize, x: usize, loc: usize, pattern_len: usize) -> f64 {
        let accuracy = e as f64 / pattern_len as f64;
        let proximity = x.abs_diff(loc);
        if self.match_distance == 0 {
            if proximity == 0 {
                accuracy
            } else {
                1.0
            }
        } else {
            accuracy + (proximity as f64) / (self.match_distance as f64)
        }
    }
}

/// Builds the bitmask alphabet: bit `|pattern|-1-i` is set for every
/// character appearing at position `i` of `pattern`.
fn match_alphabet(pattern: &[char]) -> HashMap<char, u64> {
    let mut map = HashMap::new();
    let len = pattern.len();
    for (i, &c) in pattern.iter().enumerate() {
        let bit = 1u64 << (len - 1 - i);
        *map.entry(c).or_insert(0) |= bit;
    }
    map
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if from >= haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    haystack[from..].windows(needle.len()).position(|w| w == needle).map(|p| p + from)
}

fn rfind_from(haystack: &[char], needle: &[char], upto: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(upto.min(haystack.len()));
    }
    let end = upto.min(haystack.len());
    if needle.len() > end {
        return None;
    }
    haystack[..end].windows(needle.len()).rposition(|w| w == needle)
}
