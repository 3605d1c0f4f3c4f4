use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use tracing::trace;

use crate::domain::CardListError;
use crate::format::format_date;
use crate::record::{Client, Column, Status, parse_date};

type Predicate = Box<dyn Fn(&Client) -> bool>;

/// A predicate bound to one column, with a short label for the filter row.
pub struct ColumnFilter {
    label: String,
    predicate: Predicate,
}

impl ColumnFilter {
    pub fn new(label: impl Into<String>, predicate: impl Fn(&Client) -> bool + 'static) -> Self {
        Self {
            label: label.into(),
            predicate: Box::new(predicate),
        }
    }

    /// Case-insensitive substring match against the raw text of `column`.
    pub fn contains(column: Column, term: &str) -> Self {
        let needle = term.to_lowercase();
        Self::new(term, move |c: &Client| {
            c.raw_text(column).to_lowercase().contains(&needle)
        })
    }

    pub fn status(status: Status) -> Self {
        Self::new(status.label(), move |c: &Client| c.status == status)
    }

    pub fn date(date: NaiveDate) -> Self {
        Self::new(format_date(date), move |c: &Client| c.date == date)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn matches(&self, client: &Client) -> bool {
        (self.predicate)(client)
    }

    /// Builds the filter a column's input widget would produce for `input`.
    /// Empty input clears the column, which for text columns is the same as matching "".
    pub fn parse(column: Column, input: &str) -> Result<Option<Self>, CardListError> {
        if input.is_empty() {
            return Ok(None);
        }
        match column {
            Column::Id | Column::Client | Column::Amount => {
                Ok(Some(Self::contains(column, input)))
            }
            Column::Status if input.trim().is_empty() => Ok(None),
            Column::Status => Status::parse_loose(input).map(|s| Some(Self::status(s))),
            Column::Date if input.trim().is_empty() => Ok(None),
            Column::Date => parse_filter_date(input).map(|d| Some(Self::date(d))),
        }
    }
}

impl fmt::Debug for ColumnFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnFilter")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Accepts ISO dates and the `M/D/YYYY` form the table displays.
fn parse_filter_date(input: &str) -> Result<NaiveDate, CardListError> {
    parse_date(input).or_else(|_| {
        NaiveDate::parse_from_str(input.trim(), "%m/%d/%Y")
            .map_err(|_| CardListError::date_parse(input))
    })
}

/// Active filters, at most one per column. The visible set is their conjunction.
#[derive(Debug, Default)]
pub struct FilterSet {
    filters: BTreeMap<Column, ColumnFilter>,
}

impl FilterSet {
    /// Replaces the filter of `column`; `None` clears it.
    pub fn set(&mut self, column: Column, filter: Option<ColumnFilter>) {
        match filter {
            Some(f) => {
                trace!("Filter {:?} := {:?}", column, f.label());
                self.filters.insert(column, f);
            }
            None => {
                trace!("Filter {:?} cleared", column);
                self.filters.remove(&column);
            }
        }
    }

    pub fn get(&self, column: Column) -> Option<&ColumnFilter> {
        self.filters.get(&column)
    }

    pub fn clear(&mut self) {
        self.filters.clear();
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn matches(&self, client: &Client) -> bool {
        self.filters.values().all(|f| f.matches(client))
    }

    /// Store indices of all clients passing every filter, in store order.
    pub fn apply(&self, clients: &[Client]) -> Vec<usize> {
        clients
            .iter()
            .enumerate()
            .filter(|(_, c)| self.matches(c))
            .map(|(idx, _)| idx)
            .collect()
    }
}
