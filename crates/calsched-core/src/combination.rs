//! k-combinations of an ordered sequence.
//!
//! Used when grouping schedule windows: every subset of `size` elements is
//! produced exactly once, keeping the relative order of the input.

/// Generate all `C(n, size)` combinations of `elements`.
///
/// Each combination is an independent `Vec`, so callers may mutate one result
/// without affecting the others. `size == 0` yields a single empty combination;
/// `size > n` yields none.
pub fn generate_combinations<T: Clone>(elements: &[T], size: usize) -> Vec<Vec<T>> {
    let mut output = Vec::with_capacity(binomial(elements.len(), size));
    let mut current = Vec::with_capacity(size);
    combine(elements, size, 0, &mut current, &mut output);
    output
}

fn combine<T: Clone>(
    elements: &[T],
    size: usize,
    start: usize,
    current: &mut Vec<T>,
    output: &mut Vec<Vec<T>>,
) {
    if current.len() == size {
        output.push(current.clone());
        return;
    }
    let remaining = size - current.len();
    // stop early once there are not enough elements left to fill the combination
    for i in start..elements.len() {
        if elements.len() - i < remaining {
            break;
        }
        current.push(elements[i].clone());
        combine(elements, size, i + 1, current, output);
        current.pop();
    }
}

/// Number of combinations, saturating instead of overflowing.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: usize = 1;
    for i in 0..k {
        result = result.saturating_mul(n - i) / (i + 1);
    }
    result
}
