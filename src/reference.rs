//! Plain full-table LCS, used as an oracle for the stepping engine.
//!
//! Nothing here is incremental; it fills the whole table in one pass with the
//! usual `(n + 1) x (m + 1)` layout, where `dp[i][j]` is the LCS length of
//! `x[..i]` and `y[..j]`.

/// Full DP table for `x` and `y`.
pub fn lcs_table<T: PartialEq>(x: &[T], y: &[T]) -> Vec<Vec<u32>> {
    let n = x.len();
    let m = y.len();
    let mut dp = vec![vec![0u32; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            let up = dp[i - 1][j];
            let left = dp[i][j - 1];
            let diag = dp[i - 1][j - 1] + if x[i - 1] == y[j - 1] { 1 } else { 0 };
            dp[i][j] = up.max(left).max(diag);
        }
    }
    dp
}

/// LCS length of `x` and `y`.
pub fn lcs_length<T: PartialEq>(x: &[T], y: &[T]) -> u32 {
    let m = y.len();
    let mut prev = vec![0u32; m + 1];
    let mut curr = vec![0u32; m + 1];

    for cx in x {
        for j in 1..=m {
            let up = prev[j];
            let left = curr[j - 1];
            let diag = prev[j - 1] + if *cx == y[j - 1] { 1 } else { 0 };
            curr[j] = up.max(left).max(diag);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[m]
}

/// Returns true if `sub` is a subsequence of `seq`.
pub fn is_subsequence<T: PartialEq>(sub: &[T], seq: &[T]) -> bool {
    let mut it = seq.iter();
    sub.iter().all(|s| it.any(|c| c == s))
}
