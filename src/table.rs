use std::time::Instant;

use tracing::{debug, instrument, trace};

use crate::domain::CardListError;
use crate::filter::{ColumnFilter, FilterSet};
use crate::record::{Client, ClientStore, Column};
use crate::sort::{SortDirection, SortState, sort_rows};

/// A fixed client list with per-column filters and a single active sort.
/// `rows` maps visible positions to store indices and is rebuilt after every change.
#[derive(Debug)]
pub struct FilterableRecordTable {
    store: ClientStore,
    filters: FilterSet,
    sort: Option<SortState>,
    rows: Vec<usize>,
}

impl FilterableRecordTable {
    pub fn new(clients: Vec<Client>) -> Self {
        let mut table = Self {
            store: ClientStore::new(clients),
            filters: FilterSet::default(),
            sort: None,
            rows: Vec::new(),
        };
        table.recompute();
        table
    }

    pub fn visible_rows(&self) -> Vec<&Client> {
        self.rows
            .iter()
            .filter_map(|&idx| self.store.get(idx))
            .collect()
    }

    pub fn visible_len(&self) -> usize {
        self.rows.len()
    }

    pub fn visible_row(&self, position: usize) -> Option<&Client> {
        self.rows.get(position).and_then(|&idx| self.store.get(idx))
    }

    pub fn total_len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn client(&self, id: i64) -> Option<&Client> {
        self.store.find(id)
    }

    pub fn filter(&self, column: Column) -> Option<&ColumnFilter> {
        self.filters.get(column)
    }

    pub fn active_filters(&self) -> usize {
        self.filters.len()
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    #[instrument(level = "debug", skip(self, filter))]
    pub fn set_filter(&mut self, column: Column, filter: Option<ColumnFilter>) {
        self.filters.set(column, filter);
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
        self.recompute();
    }

    #[instrument(level = "debug", skip(self))]
    pub fn set_sort(&mut self, column: Column, direction: Option<SortDirection>) {
        self.sort = direction.map(|direction| SortState { column, direction });
        self.recompute();
    }

    /// Sorts by `column` ascending, or flips the direction if it is already the sort column.
    pub fn toggle_sort(&mut self, column: Column) -> SortDirection {
        let direction = match self.sort {
            Some(state) if state.column == column => state.direction.flip(),
            _ => SortDirection::Ascending,
        };
        self.set_sort(column, Some(direction));
        direction
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.recompute();
    }

    #[instrument(level = "debug", skip(self))]
    pub fn edit_amount(&mut self, id: i64, input: &str) -> Result<(), CardListError> {
        self.store.set_amount(id, input)?;
        self.recompute();
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn edit_status(&mut self, id: i64, input: &str) -> Result<(), CardListError> {
        self.store.set_status(id, input)?;
        self.recompute();
        Ok(())
    }

    fn recompute(&mut self) {
        let start_time = Instant::now();
        let mut rows = self.filters.apply(self.store.clients());
        if let Some(state) = self.sort {
            sort_rows(&mut rows, self.store.clients(), state);
        }
        self.rows = rows;
        trace!(
            "Recomputed view: {}/{} rows, {} filters, sort {:?} in {}us",
            self.rows.len(),
            self.store.len(),
            self.filters.len(),
            self.sort,
            start_time.elapsed().as_micros()
        );
        debug!("Visible rows: {}", self.rows.len());
    }
}
