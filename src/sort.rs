use std::cmp::Ordering;

use crate::record::{Client, Column};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: Column,
    pub direction: SortDirection,
}

/// Comparator registered for each column.
pub fn compare(column: Column, a: &Client, b: &Client) -> Ordering {
    match column {
        Column::Id => a.id.cmp(&b.id),
        Column::Client => a.display_name.cmp(&b.display_name),
        Column::Amount => a.amount.total_cmp(&b.amount),
        Column::Status => a.status.label().cmp(b.status.label()),
        Column::Date => a.date.cmp(&b.date),
    }
}

/// Orders store indices in place. Stable, so ties keep store order in either direction.
pub fn sort_rows(rows: &mut [usize], clients: &[Client], state: SortState) {
    rows.sort_by(|&a, &b| {
        let ord = compare(state.column, &clients[a], &clients[b]);
        match state.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
