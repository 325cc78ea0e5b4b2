//! Serde predicates for boolean fields.

/// Returns `true` when the provided flag is `false`.
///
/// Used with `skip_serializing_if` so `false` flags neither appear in
/// scenario files nor override configuration layers.
///
/// # Examples
///
/// ```
/// use scenmerge::bool_predicates;
///
/// assert!(bool_predicates::not(&false));
/// assert!(!bool_predicates::not(&true));
/// ```
#[must_use]
pub fn not<T>(value: &T) -> bool
where
    T: Copy + std::ops::Not<Output = bool>,
{
    !*value
}
