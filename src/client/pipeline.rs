//! Pure transformations that turn a node's allocations into the page the
//! client view renders: source selection, search, sort and pagination.
//!
//! Every function borrows its input and returns a new sequence; nothing
//! here mutates the node snapshot.

use std::cmp::Ordering;

use crate::client::model::{Allocation, NodeDriver, NodeEvent};
use crate::client::view_state::AllocationSortKey;

/// Items that can be matched against a search term.
pub trait Searchable {
    /// Values the search term is matched against.
    fn search_fields(&self) -> Vec<String>;
}

impl Searchable for Allocation {
    fn search_fields(&self) -> Vec<String> {
        vec![self.short_id(), self.name.clone()]
    }
}

/// Items that can be ordered by a named property.
pub trait Sortable {
    type Property;

    fn compare_by(&self, other: &Self, property: &Self::Property) -> Ordering;
}

impl Sortable for Allocation {
    type Property = AllocationSortKey;

    fn compare_by(&self, other: &Self, property: &AllocationSortKey) -> Ordering {
        match property {
            AllocationSortKey::ModifyIndex => self.modify_index.cmp(&other.modify_index),
            AllocationSortKey::ShortId => self.short_id().cmp(&other.short_id()),
            AllocationSortKey::Name => self.name.cmp(&other.name),
            AllocationSortKey::JobId => self.job_id.cmp(&other.job_id),
            AllocationSortKey::TaskGroup => self.task_group.cmp(&other.task_group),
            AllocationSortKey::ClientStatus => {
                self.client_status.as_str().cmp(other.client_status.as_str())
            }
            AllocationSortKey::CreateTime => self.create_time.cmp(&other.create_time),
            AllocationSortKey::ModifyTime => self.modify_time.cmp(&other.modify_time),
        }
    }
}

/// Allocations that were evicted to make room for higher priority work.
pub fn preemptions(allocations: &[Allocation]) -> Vec<&Allocation> {
    allocations.iter().filter(|a| a.was_preempted).collect()
}

/// The list the rest of the pipeline works on.
pub fn select_source(allocations: &[Allocation], only_preemptions: bool) -> Vec<&Allocation> {
    if only_preemptions {
        preemptions(allocations)
    } else {
        allocations.iter().collect()
    }
}

/// Keep the items where any search field contains `term`, ignoring case.
/// A blank term matches everything.
pub fn search<'a, T: Searchable>(items: &[&'a T], term: &str) -> Vec<&'a T> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .copied()
        .filter(|item| {
            item.search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Stable sort by `property`. Descending order flips the comparison, so
/// items with equal keys keep their input order in both directions.
pub fn sort<'a, T: Sortable>(
    items: &[&'a T],
    property: &T::Property,
    descending: bool,
) -> Vec<&'a T> {
    let mut sorted = items.to_vec();
    if descending {
        sorted.sort_by(|a, b| b.compare_by(a, property));
    } else {
        sorted.sort_by(|a, b| a.compare_by(b, property));
    }
    sorted
}

/// Slice out page `current_page` (1-based). Pages past the end are empty.
pub fn paginate<T>(items: &[T], current_page: u32, page_size: usize) -> &[T] {
    if page_size == 0 || current_page == 0 {
        return &[];
    }
    let start = (current_page as usize - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed for `total` items; an empty list has no pages.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Node events, newest first.
pub fn sorted_events(events: &[NodeEvent]) -> Vec<&NodeEvent> {
    let mut sorted: Vec<&NodeEvent> = events.iter().collect();
    sorted.sort_by(|a, b| b.time.cmp(&a.time));
    sorted
}

/// Drivers in name order.
pub fn sorted_drivers(drivers: &[NodeDriver]) -> Vec<&NodeDriver> {
    let mut sorted: Vec<&NodeDriver> = drivers.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn alloc(name: &str, modify_index: u64) -> Allocation {
        Allocation::new(name, "example", modify_index)
    }

    #[test]
    fn paginate_clips_last_page() {
        let items: Vec<u32> = (0..10).collect();
        assert_eq!(paginate(&items, 1, 8), &[0, 1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(paginate(&items, 2, 8), &[8, 9]);
        assert!(paginate(&items, 3, 8).is_empty());
    }

    #[test]
    fn paginate_degenerate_inputs_are_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 0, 8).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
        assert!(paginate(&items, u32::MAX, usize::MAX).is_empty());
        assert!(paginate::<u32>(&[], 1, 8).is_empty());
    }

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(page_count(0, 8), 0);
        assert_eq!(page_count(8, 8), 1);
        assert_eq!(page_count(9, 8), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn search_is_case_insensitive_and_keeps_order() {
        let allocs = vec![alloc("Web.web[0]", 1), alloc("db.db[0]", 2), alloc("web.web[1]", 3)];
        let refs: Vec<&Allocation> = allocs.iter().collect();
        let found = search(&refs, "  WEB ");
        let names: Vec<&str> = found.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Web.web[0]", "web.web[1]"]);
    }

    #[test]
    fn search_matches_short_id() {
        let allocs = vec![alloc("a", 1), alloc("b", 2)];
        let refs: Vec<&Allocation> = allocs.iter().collect();
        let short = allocs[1].short_id();
        let found = search(&refs, &short);
        assert!(found.iter().any(|a| a.id == allocs[1].id));
    }

    #[test]
    fn search_without_match_is_empty() {
        let allocs = vec![alloc("web", 1)];
        let refs: Vec<&Allocation> = allocs.iter().collect();
        assert!(search(&refs, "no-such-alloc-zzz").is_empty());
    }

    #[test]
    fn events_newest_first_and_drivers_by_name() {
        let now = Utc::now();
        let events = vec![
            NodeEvent {
                time: now - Duration::seconds(30),
                subsystem: "Cluster".to_string(),
                message: "Node registered".to_string(),
            },
            NodeEvent {
                time: now,
                subsystem: "Drain".to_string(),
                message: "Node drain complete".to_string(),
            },
        ];
        let sorted = sorted_events(&events);
        assert_eq!(sorted[0].message, "Node drain complete");
        assert_eq!(sorted[1].message, "Node registered");

        let drivers = vec![
            NodeDriver {
                name: "raw_exec".to_string(),
                detected: true,
                healthy: true,
            },
            NodeDriver {
                name: "docker".to_string(),
                detected: true,
                healthy: false,
            },
            NodeDriver {
                name: "exec".to_string(),
                detected: false,
                healthy: false,
            },
        ];
        let names: Vec<&str> = sorted_drivers(&drivers)
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["docker", "exec", "raw_exec"]);
    }
}
