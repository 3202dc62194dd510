use std::fmt::Debug;

use itertools::{EitherOrBoth, Itertools};
use regex::Regex;

pub fn assert_re(pattern: &str, haystack: &str) {
    let re = Regex::new(pattern).unwrap();
    assert!(re.is_match(haystack), "{:?} did not match {:?}", haystack, re);
}

pub fn assert_vec_eq<T: PartialEq + Debug>(left: Vec<T>, right: Vec<T>) {
    assert_vecr_eq(&left, &right);
}

/// Like assert_eq on two Vecs, but reports each differing index, which is
/// much easier to read for long QIF documents.
pub fn assert_vecr_eq<T: PartialEq + Debug>(left: &Vec<T>, right: &Vec<T>) {
    if left == right {
        return;
    }

    let mismatches = left
        .iter()
        .zip_longest(right.iter())
        .enumerate()
        .filter_map(|(i, pair)| match pair {
            EitherOrBoth::Both(l, r) if l == r => None,
            EitherOrBoth::Both(l, r) => Some(format!("[{i}] left: {l:?} != right: {r:?}")),
            EitherOrBoth::Left(l) => Some(format!("[{i}] left only: {l:?}")),
            EitherOrBoth::Right(r) => Some(format!("[{i}] right only: {r:?}")),
        })
        .join("\n");

    panic!(
        "left ({} items) != right ({} items). Differences:\n{}",
        left.len(),
        right.len(),
        mismatches
    );
}

/// Compares two multi-line texts line by line.
pub fn assert_lines_eq(text: &str, exp: &str) {
    assert_vec_eq(text.split('\n').collect(), exp.split('\n').collect());
}
