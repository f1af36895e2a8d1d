/// Number of items a windowed read starting at `start` may produce.
///
/// The result never exceeds the caller's request, the items left before `bound`,
/// or the number of items the caller's buffer can hold.
pub(crate) fn window_len(start: usize, requested: usize, bound: usize, capacity: usize) -> usize {
    if start >= bound {
        return 0;
    }

    requested.min(bound - start).min(capacity)
}
