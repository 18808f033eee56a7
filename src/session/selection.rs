//! Selection expressions
//!
//! Users pick sessions by their 1-based list position, e.g. `2,4-6`. Parsing
//! yields 0-based indices; numbers outside the list are dropped silently.

use std::collections::BTreeSet;

use crate::error::SelectionError;

use super::{Session, classify};

/// Expand a selection expression into 0-based indices within `count`.
///
/// Tokens are separated by commas and are either a number or an `a-b` range
/// (reversed ranges are normalized). Empty tokens are ignored. Any token that
/// is not a number fails the whole parse.
pub fn parse_selection(input: &str, count: usize) -> Result<BTreeSet<usize>, SelectionError> {
    let mut indices = BTreeSet::new();
    let upper = i64::try_from(count).unwrap_or(i64::MAX);

    for token in input.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        let (lo, hi) = match token.split_once('-') {
            Some((a, b)) => {
                let a = parse_number(a, token)?;
                let b = parse_number(b, token)?;
                if a > b { (b, a) } else { (a, b) }
            }
            None => {
                let n = parse_number(token, token)?;
                (n, n)
            }
        };

        // Clamp before expanding so huge ranges stay cheap
        for n in lo.max(1)..=hi.min(upper) {
            indices.insert((n - 1) as usize);
        }
    }

    Ok(indices)
}

/// Parse a single 1-based choice, `None` if it is not a number in range
pub fn parse_index(input: &str, count: usize) -> Option<usize> {
    let n: usize = input.trim().parse().ok()?;
    (1..=count).contains(&n).then(|| n - 1)
}

fn parse_number(part: &str, token: &str) -> Result<i64, SelectionError> {
    part.trim()
        .parse()
        .map_err(|_| SelectionError::InvalidSelection(token.to_string()))
}

/// Keep only the selected sessions that are safe to destroy, in list order
pub fn filter_destroyable<'a, S: AsRef<str>>(
    sessions: &'a [Session],
    indices: &BTreeSet<usize>,
    current: Option<&str>,
    protected: &[S],
) -> Vec<&'a Session> {
    indices
        .iter()
        .filter_map(|&i| sessions.get(i))
        .filter(|s| classify(s, current, protected).is_destroyable())
        .collect()
}
