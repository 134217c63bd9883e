// ABOUTME: Ordered child-list helpers shared by hydration and every add-child mutation
// ABOUTME: Computes the next append position and sorts siblings by their position key
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::models::{
    BlockWorkout, Cicle, Session, SessionBlock, WorkoutExercise,
};

/// Anything ranked among its siblings by an integer position
pub trait Positioned {
    /// Sort key among siblings under one parent
    fn position(&self) -> i64;
}

impl Positioned for i64 {
    fn position(&self) -> i64 {
        *self
    }
}

impl Positioned for Cicle {
    fn position(&self) -> i64 {
        self.position
    }
}

impl Positioned for Session {
    fn position(&self) -> i64 {
        self.position
    }
}

impl Positioned for SessionBlock {
    fn position(&self) -> i64 {
        self.position
    }
}

impl Positioned for BlockWorkout {
    fn position(&self) -> i64 {
        self.position
    }
}

impl Positioned for WorkoutExercise {
    fn position(&self) -> i64 {
        self.position
    }
}

/// Position for a child appended after every existing sibling
///
/// `max(position) + 1`, or `0` for an empty collection. Gaps left by deletions
/// are never reused.
#[must_use]
pub fn next_position<T: Positioned>(children: &[T]) -> i64 {
    children
        .iter()
        .map(Positioned::position)
        .max()
        .map_or(0, |max| max + 1)
}

/// Stable ascending sort by position
pub fn sort_by_position<T: Positioned>(children: &mut [T]) {
    children.sort_by_key(Positioned::position);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Item(i64, &'static str);

    impl Positioned for Item {
        fn position(&self) -> i64 {
            self.0
        }
    }

    #[test]
    fn test_next_position_of_empty_list_is_zero() {
        let empty: Vec<i64> = Vec::new();
        assert_eq!(next_position(&empty), 0);
    }

    #[test]
    fn test_next_position_skips_past_gaps() {
        assert_eq!(next_position(&[0_i64, 1, 2]), 3);
        assert_eq!(next_position(&[0_i64, 5]), 6);
        assert_eq!(next_position(&[3_i64, 1]), 4);
    }

    #[test]
    fn test_sort_is_stable_for_equal_positions() {
        let mut items = vec![Item(2, "c"), Item(0, "a"), Item(2, "d"), Item(1, "b")];
        sort_by_position(&mut items);
        assert_eq!(
            items,
            vec![Item(0, "a"), Item(1, "b"), Item(2, "c"), Item(2, "d")]
        );
    }
}
