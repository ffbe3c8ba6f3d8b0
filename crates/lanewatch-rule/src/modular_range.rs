/// Indices from `start` up to but excluding `end`, walking forward modulo `modulus`.
///
/// Both bounds are reduced modulo `modulus` first, so negative values and
/// values past the end are accepted. Equal bounds give an empty range.
///
/// ```
/// use lanewatch_rule::modular_range;
/// assert_eq!(modular_range(4, 3, 1).collect::<Vec<_>>(), vec![3, 0]);
/// assert_eq!(modular_range(4, 1, -1).collect::<Vec<_>>(), vec![1, 2]);
/// ```
pub fn modular_range(modulus: usize, start: i64, end: i64) -> impl Iterator<Item = usize> {
    assert!(modulus > 0, "modulus must be positive");
    let m = modulus as i64;
    let start = start.rem_euclid(m) as usize;
    let end = end.rem_euclid(m) as usize;
    let (first, second) = if start <= end {
        (start..end, 0..0)
    } else {
        (start..modulus, 0..end)
    };
    first.chain(second)
}
