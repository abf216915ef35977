//! In-place quicksort of an index permutation.

use core::cmp::Ordering;

use crate::ordering::IndexComparer;

/// Sorts `map`, a permutation of buffer positions, by `cmp`.
///
/// Hoare partitioning around the middle entry; the smaller partition is
/// sorted recursively and the larger one iteratively, which bounds the stack
/// depth by `log2(n)`. The algorithm is not stable on its own: stability
/// comes from `cmp` breaking every full tie by position.
pub fn sort_permutation<C>(map: &mut [usize], cmp: &C)
where
    C: IndexComparer + ?Sized,
{
    if map.len() > 1 {
        quick_sort(map, 0, map.len() - 1, cmp);
    }
}

fn quick_sort<C>(map: &mut [usize], mut left: usize, mut right: usize, cmp: &C)
where
    C: IndexComparer + ?Sized,
{
    loop {
        let (j, i) = partition(map, left, right, cmp);

        // `j` may sit one before `left` (or below zero) and `i` one past
        // `right`; both sides are empty in that case.
        let left_len = j.map_or(0, |j| (j + 1).saturating_sub(left));
        let right_len = (right + 1).saturating_sub(i);
        if left_len <= right_len {
            if let Some(j) = j.filter(|&j| left < j) {
                quick_sort(map, left, j, cmp);
            }
            left = i;
        } else {
            if i < right {
                quick_sort(map, i, right, cmp);
            }
            match j {
                Some(j) => right = j,
                None => return,
            }
        }
        if left >= right {
            return;
        }
    }
}

/// One Hoare pass over `map[left..=right]`. Returns the final scan indices:
/// `j` (None once it would drop below zero) and `i`.
fn partition<C>(map: &mut [usize], left: usize, right: usize, cmp: &C) -> (Option<usize>, usize)
where
    C: IndexComparer + ?Sized,
{
    let mut i = left;
    let mut j = Some(right);
    let pivot = map[left + (right - left) / 2];
    loop {
        while i < map.len() && cmp.compare(pivot, map[i]) == Ordering::Greater {
            i += 1;
        }
        while let Some(jj) = j {
            if cmp.compare(pivot, map[jj]) != Ordering::Less {
                break;
            }
            j = jj.checked_sub(1);
        }
        let Some(jj) = j else { break };
        if i > jj {
            break;
        }
        if i < jj {
            map.swap(i, jj);
        }
        i += 1;
        j = jj.checked_sub(1);
        match j {
            Some(jj) if i <= jj => {}
            _ => break,
        }
    }
    (j, i)
}
