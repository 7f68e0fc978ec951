//! Myers' bidirectional O(ND) middle-snake bisection.

use std::time::Instant;

use super::Diff;
use crate::Dmp;

impl Dmp {
    /// Finds the shortest edit script between `text1` and `text2` by
    /// searching forward diagonals from the start and reverse diagonals
    /// from the end simultaneously, splitting at the first diagonal where
    /// they meet. Falls back to a trivial delete+insert pair once
    /// `deadline` has passed.
    pub(crate) fn diff_bisect(&self, text1: &[char], text2: &[char], deadline: Option<Instant>) -> Vec<Diff> {
        let (len1, len2) = (text1.len() as i64, text2.len() as i64);
        let max_d = (len1 + len2 + 1) / 2;
        let v_offset = max_d;
        let v_len = 2 * max_d;

        let mut v1 = vec![-1i64; v_len as usize];
        let mut v2 = vec![-1i64; v_len as usize];
        v1[(v_offset + 1) as usize] = 0;
        v2[(v_offset + 1) as usize] = 0;

        let delta = len1 - len2;
        let front = delta % 2 != 0;

        let mut k1start = 0i64;
        let mut k1end = 0i64;
        let mut k2start = 0i64;
        let mut k2end = 0i64;

        for d in 0..max_d {
            if let Some(dl) = deadline {
                if Instant::now() >= dl {
                    break;
                }
            }

            let mut k1 = -d + k1start;
            while k1 <= d - k1end {
                let k1_offset = v_offset + k1;
                let mut x1 = if k1 == -d || (k1 != d && v1[(k1_offset - 1) as usize] < v1[(k1_offset + 1) as usize]) {
                    v1[(k1_offset + 1) as usize]
                } else {
                    v1[(k1_offset - 1) as usize] + 1
                };
                let mut y1 = x1 - k1;
                while x1 < len1 && y1 < len2 && text1[x1 as usize] == text2[y1 as usize] {
                    x1 += 1;
                    y1 += 1;
                }
                v1[k1_offset as usize] = x1;
                if x1 > len1 {
                    k1end += 2;
                } else if y1 > len2 {
                    k1start += 2;
                } else if front {
                    let k2_offset = v_offset + delta - k1;
                    if k2_offset >= 0 && k2_offset < v_len && v2[k2_offset as usize] != -1 {
                        let x2 = len1 - v2[k2_offset as usize];
                        if x1 >= x2 {
                            return self.diff_bisect_split(text1, text2, x1, y1, deadline);
                        }
                    }
                }
                k1 += 2;
            }

            let mut k2 = -d + k2start;
            while k2 <= d - k2end {
                let k2_offset = v_offset + k2;
                let mut x2 = if k2 == -d || (k2 != d && v2[(k2_offset - 1) as usize] < v2[(k2_offset + 1) as usize]) {
                    v2[(k2_offset + 1) as usize]
                } else {
                    v2[(k2_offset - 1) as usize] + 1
                };
                let mut y2 = x2 - k2;
                while x2 < len1 && y2 < len2 && text1[(len1 - x2 - 1) as usize] == text2[(len2 - y2 - 1) as usize] {
                    x2 += 1;
                    y2 += 1;
                }
                v2[k2_offset as usize] = x2;
                if x2 > len1 {
                    k2end += 2;
                } else if y2 > len2 {
                    k2start += 2;
                } else if !front {
                    let k1_offset = v_offset + delta - k2;
                    if k1_offset >= 0 && k1_offset < v_len && v1[k1_offset as usize] != -1 {
                        let x1 = v1[k1_offset as usize];
                        let y1 = x1 - (k1_offset - v_offset);
                        let x2_mirror = len1 - x2;
                        if x1 >= x2_mirror {
                            return self.diff_bisect_split(text1, text2, x1, y1, deadline);
                        }
                    }
                }
                k2 += 2;
            }
        }

        vec![
            Diff::delete(text1.iter().collect::<String>()),
            Diff::insert(text2.iter().collect::<String>()),
        ]
    }

    fn diff_bisect_split(
        &self,
        text1: &[char],
        text2: &[char],
        x: i64,
        y: i64,
        deadline: Option<Instant>,
    ) -> Vec<Diff> {
        let (x, y) = (x as usize, y as usize);
        let (text1a, text1b) = text1.split_at(x);
        let (text2a, text2b) = text2.split_at(y);

        let mut diffs = self.diff_main_chars(text1a, text2a, false, deadline);
        diffs.extend(self.diff_main_chars(text1b, text2b, false, deadline));
        diffs
    }
}
