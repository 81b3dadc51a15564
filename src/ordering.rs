//! Order-index bookkeeping shared by posters and crew members.
//!
//! Both collections are sorted by an integer `order_index` that does not
//! have to be contiguous. The helpers here only decide *which* index to
//! store; the repositories apply the decision inside their write path.

use indexmap::IndexMap;

/// next_order_index
///
/// Index for an item appended to a scope whose current maximum is
/// `current_max`. An empty scope counts as a maximum of 0, so the first item
/// gets 1.
pub fn next_order_index(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0) + 1
}

/// What a crew update does to the member's `order_index`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderIndexChange {
    /// Leave the stored index alone.
    Keep,
    /// Store the index the client sent.
    Explicit(i32),
    /// Append to the end of the named category. The member's own current
    /// index is part of that category's max.
    AppendTo(String),
}

/// crew_order_change
///
/// An explicit index always wins. Otherwise a category change appends the
/// member to its new category; repeating the current category is a no-op.
pub fn crew_order_change(
    current_category: &str,
    requested_category: Option<&str>,
    requested_index: Option<i32>,
) -> OrderIndexChange {
    if let Some(index) = requested_index {
        return OrderIndexChange::Explicit(index);
    }
    match requested_category {
        Some(category) if category != current_category => {
            OrderIndexChange::AppendTo(category.to_string())
        }
        _ => OrderIndexChange::Keep,
    }
}

/// reorder_positions
///
/// Maps each id to its 0-based position in `ids`. If an id is listed twice
/// its last position wins.
pub fn reorder_positions(ids: &[i64]) -> Vec<(i64, i32)> {
    let mut positions: IndexMap<i64, i32> = IndexMap::with_capacity(ids.len());
    for (position, id) in ids.iter().enumerate() {
        // Re-inserting keeps the id's first slot and overwrites its position.
        positions.insert(*id, position as i32);
    }
    positions.into_iter().collect()
}
