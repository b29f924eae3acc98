//! Sequence relocation primitive shared by topic and content reordering.
//!
//! # Invariants
//! - The input slice is never mutated; a fresh `Vec` is returned.
//! - Negative indices count from the end.
//! - An out-of-range source index returns an unchanged copy.

/// Returns a copy of `items` with the element at `from` relocated to `to`.
///
/// A destination past the end appends; a negative destination that still
/// falls before the start inserts at the front.
pub fn move_to<T: Clone>(items: &[T], from: isize, to: isize) -> Vec<T> {
    let mut moved = items.to_vec();
    let Some(from) = resolve_index(items.len(), from) else {
        return moved;
    };
    if from >= items.len() {
        return moved;
    }

    let to = if to < 0 {
        (items.len() as isize + to).max(0) as usize
    } else {
        to as usize
    };

    let item = moved.remove(from);
    let to = to.min(moved.len());
    moved.insert(to, item);
    moved
}

fn resolve_index(len: usize, index: isize) -> Option<usize> {
    if index >= 0 {
        return Some(index as usize);
    }
    let resolved = len as isize + index;
    (resolved >= 0).then_some(resolved as usize)
}

#[cfg(test)]
mod tests {
    use super::move_to;

    #[test]
    fn moves_forward_and_backward() {
        let items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(move_to(&items, 0, 2), vec!['b', 'c', 'a', 'd']);
        assert_eq!(move_to(&items, 3, 0), vec!['d', 'a', 'b', 'c']);
        assert_eq!(items, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn negative_indices_count_from_end() {
        let items = vec![1, 2, 3, 4];
        assert_eq!(move_to(&items, -1, 0), vec![4, 1, 2, 3]);
        assert_eq!(move_to(&items, 0, -1), vec![2, 3, 4, 1]);
    }

    #[test]
    fn out_of_range_source_is_a_no_op() {
        let items = vec![1, 2, 3];
        assert_eq!(move_to(&items, 3, 0), items);
        assert_eq!(move_to(&items, -4, 0), items);
        assert!(move_to::<u8>(&[], 0, 0).is_empty());
    }

    #[test]
    fn destination_past_end_appends() {
        assert_eq!(move_to(&[1, 2, 3], 0, 10), vec![2, 3, 1]);
    }
}
