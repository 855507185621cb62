// src/core/indexing/balltree/center.rs

//! Centering strategies: how a node derives the point its radius is measured from.

use crate::core::metric::Centroid;

/// Computes the center of a node from the elements of its subtree.
pub trait Centering<T> {
    /// Name of the variant, used in logs and statistics.
    const NAME: &'static str;

    /// Center of `count` elements: `representative` followed by `others`.
    fn center<'a, I>(representative: &'a T, others: I, count: usize) -> T
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a;
}

/// Center is the arithmetic mean of all subtree elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanCenter;

impl<T: Centroid> Centering<T> for MeanCenter {
    const NAME: &'static str = "centered";

    #[allow(clippy::cast_precision_loss)]
    fn center<'a, I>(representative: &'a T, others: I, count: usize) -> T
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let mut sum = representative.zero_like();
        sum.accumulate(representative);
        for other in others {
            sum.accumulate(other);
        }
        if count > 1 {
            sum.scale(1.0 / count as f64);
        }
        sum
    }
}

/// Center is the representative itself. Works for any metric space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepresentativeCenter;

impl<T: Clone> Centering<T> for RepresentativeCenter {
    const NAME: &'static str = "uncentered";

    fn center<'a, I>(representative: &'a T, _others: I, _count: usize) -> T
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        representative.clone()
    }
}
