//! Similarity scores on a 0-100 scale.

use rapidfuzz::fuzz;

/// Best indel ratio of the shorter string against every alignment of it
/// inside the longer one, partial overlaps at either end included.
///
/// `partial_ratio("bedroom", "bedroom lamp (10.0.0.12)")` is 100.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };

    if short.is_empty() {
        return if long.is_empty() { 100.0 } else { 0.0 };
    }

    let width = short.len() as isize;
    let len = long.len() as isize;
    let mut best: f64 = 0.0;
    for start in (1 - width)..len {
        let lo = start.max(0) as usize;
        let hi = (start + width).min(len) as usize;
        best = best.max(fuzz::ratio(
            short.iter().copied(),
            long[lo..hi].iter().copied(),
        ));
        if best >= 100.0 {
            break;
        }
    }
    best
}
