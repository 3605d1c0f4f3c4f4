use std::io::Error;
use std::time::Duration;

use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;

use crate::record::Column;

pub const HELP_TEXT: &str = "\
j/k, Up/Down     move row
h/l, Left/Right  move column
g / G            first / last row
f or /           filter current column
F                clear all filters
s / S            sort current column (repeat toggles) / clear sort
e or Enter       edit amount or status
Space            toggle row selection
y                copy row to clipboard
?                this help
q                quit
Esc              close popup / cancel input";

#[derive(Debug, thiserror::Error)]
pub enum CardListError {
    #[error("'{input}' is not a valid number")]
    Parse { input: String },

    #[error("'{input}' is not one of Pending, Success, Error")]
    InvalidEnum { input: String },

    #[error("'{input}' is not a valid date (expected YYYY-MM-DD)")]
    DateParse { input: String },

    #[error("no client with id {0}")]
    UnknownRecord(i64),

    #[error("missing column '{0}' in data file")]
    MissingField(String),

    #[error("io error: {0}")]
    IoError(#[from] Error),

    #[error("polars error: {0}")]
    PolarsError(#[from] PolarsError),

    #[error("loading failed: {0}")]
    LoadingFailed(String),

    #[error("file not found")]
    FileNotFound,

    #[error("permission denied")]
    PermissionDenied,
}

impl CardListError {
    pub fn parse(input: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
        }
    }

    pub fn invalid_enum(input: impl Into<String>) -> Self {
        Self::InvalidEnum {
            input: input.into(),
        }
    }

    pub fn date_parse(input: impl Into<String>) -> Self {
        Self::DateParse {
            input: input.into(),
        }
    }
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TableConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
    pub status_message_ttl: Duration,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            max_column_width: 32,
            status_message_ttl: Duration::from_secs(5),
        }
    }
}

/// What the command line at the bottom of the screen is currently editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Filter(Column),
    EditAmount(i64),
    EditStatus(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MoveBeginning,
    MoveEnd,
    Filter,
    ClearFilters,
    Sort,
    ClearSort,
    Edit,
    ToggleSelection,
    CopyRow,
    Help,
    Exit,
    Resize(usize, usize),
    RawKey(KeyEvent),
}
