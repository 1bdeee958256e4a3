//! Registration ordering for routers that match routes in declaration order.
//!
//! Express-style routers dispatch to the first registered pattern that fits
//! the incoming path, so a wildcard route registered too early permanently
//! shadows every more specific route behind it. Sorting each group with
//! [`compare_operations`] before emission guarantees `/users/me` is
//! registered ahead of `/users/{id}` no matter how the source spec orders
//! them.

use std::cmp::Ordering;

use super::operations::IrOperation;
use super::types::IrModule;

/// One `/`-delimited component of a route path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Parameter(&'a str),
}

impl<'a> Segment<'a> {
    fn classify(raw: &'a str) -> Self {
        if raw.starts_with('{') {
            Segment::Parameter(raw)
        } else {
            Segment::Literal(raw)
        }
    }
}

/// Compare two route paths segment-wise, most specific first.
///
/// At the first index where the segments differ, a literal segment sorts
/// before a `{param}` segment regardless of spelling; two segments of the
/// same kind compare as strings. When one path is a prefix of the other,
/// the shorter path sorts first. Total over any pair of paths and never
/// panics; identical paths compare equal, leaving method-only ties to the
/// caller's stable sort.
pub fn compare_route_paths(a: &str, b: &str) -> Ordering {
    let mut a_segments = a.split('/').map(Segment::classify);
    let mut b_segments = b.split('/').map(Segment::classify);

    loop {
        let ordered = match (a_segments.next(), b_segments.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match (x, y) {
                (Segment::Literal(_), Segment::Parameter(_)) => Ordering::Less,
                (Segment::Parameter(_), Segment::Literal(_)) => Ordering::Greater,
                (Segment::Literal(l), Segment::Literal(r))
                | (Segment::Parameter(l), Segment::Parameter(r)) => l.cmp(r),
            },
        };
        if ordered != Ordering::Equal {
            return ordered;
        }
    }
}

/// Compare two operations by their route paths.
pub fn compare_operations(a: &IrOperation, b: &IrOperation) -> Ordering {
    compare_route_paths(&a.path, &b.path)
}

/// Sort a slice of operations into registration order, in place.
/// Stable: operations with identical paths keep their source order.
pub fn sort_for_registration(operations: &mut [IrOperation]) {
    operations.sort_by(compare_operations);
}

/// Sort a module's operation indices into registration order, in place.
/// The module keeps its identity; the index order is the only mutation.
pub fn sort_module_operations(module: &mut IrModule, operations: &[IrOperation]) {
    module
        .operations
        .sort_by(|&i, &j| compare_operations(&operations[i], &operations[j]));
}
