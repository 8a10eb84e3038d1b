//! Filter, sort and progress projections over the item collection.
//!
//! # Invariants
//! - Functions here never mutate or reorder their input.
//! - Filtered results keep collection (insertion) order.
//! - Deadline sorting is stable; equal deadlines keep collection order.

use crate::model::item::{parse_item_type, Item, ItemType};
use chrono::NaiveDate;

/// Category filter applied by list and calendar views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ItemType),
}

impl TypeFilter {
    /// Parses `"all"` or a category wire string.
    pub fn parse(value: &str) -> Option<TypeFilter> {
        match value.trim() {
            "all" => Some(TypeFilter::All),
            other => parse_item_type(other).map(TypeFilter::Only),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(kind) => kind.as_str(),
        }
    }

    pub fn matches(self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Only(kind) => item.kind == kind,
        }
    }
}

/// Completion summary for the progress bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// In `[0, 1]`; zero for an empty collection.
    pub ratio: f64,
}

/// Items due exactly on `date` that pass `filter`.
pub fn items_on_date(items: &[Item], date: NaiveDate, filter: TypeFilter) -> Vec<&Item> {
    items
        .iter()
        .filter(|item| item.deadline == date && filter.matches(item))
        .collect()
}

/// Items that pass `filter`.
pub fn filtered_by_type(items: &[Item], filter: TypeFilter) -> Vec<&Item> {
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Items in ascending deadline order.
pub fn sorted_by_deadline<'a, I>(items: I) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut sorted = items.into_iter().collect::<Vec<_>>();
    // `sort_by_key` is stable.
    sorted.sort_by_key(|item| item.deadline);
    sorted
}

/// List view rows: filtered, then sorted by deadline.
pub fn list_view(items: &[Item], filter: TypeFilter) -> Vec<&Item> {
    sorted_by_deadline(filtered_by_type(items, filter))
}

pub fn progress(items: &[Item]) -> Progress {
    let total = items.len();
    let completed = items.iter().filter(|item| item.completed).count();
    let ratio = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    };
    Progress {
        completed,
        total,
        ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::TypeFilter;
    use crate::model::item::ItemType;

    #[test]
    fn type_filter_parses_all_and_categories() {
        assert_eq!(TypeFilter::parse("all"), Some(TypeFilter::All));
        assert_eq!(
            TypeFilter::parse("forum"),
            Some(TypeFilter::Only(ItemType::Forum))
        );
        assert_eq!(TypeFilter::parse("everything"), None);
        assert_eq!(TypeFilter::Only(ItemType::Evaluation).as_str(), "evaluation");
    }
}
