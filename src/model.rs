use std::collections::BTreeSet;
use std::time::Instant;

use arboard::Clipboard;
use tracing::{debug, error, info, trace, warn};

use crate::domain::{CardListError, InputMode, Message, TableConfig};
use crate::filter::ColumnFilter;
use crate::inputter::{InputResult, Inputter};
use crate::record::{Client, Column, amount_text};
use crate::sort::SortState;
use crate::table::FilterableRecordTable;

#[derive(Debug, PartialEq)]
pub enum RunState {
    Ready,
    Quitting,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    Table,
    Popup,
    Input(InputMode),
}

pub struct Model {
    config: TableConfig,
    pub status: RunState,
    modus: Modus,
    table: FilterableRecordTable,
    cursor_row: usize,
    cursor_column: Column,
    selected: BTreeSet<i64>,
    input: Inputter,
    last_input: InputResult,
    clipboard: Option<Clipboard>,
    status_message: String,
    last_status_message_update: Instant,
}

impl Model {
    pub fn init(config: &TableConfig, clients: Vec<Client>) -> Self {
        let table = FilterableRecordTable::new(clients);
        let message = if table.is_empty() {
            "No clients loaded".to_string()
        } else {
            format!("Loaded {} clients", table.total_len())
        };
        let mut model = Self {
            config: config.clone(),
            status: RunState::Ready,
            modus: Modus::Table,
            table,
            cursor_row: 0,
            cursor_column: Column::Id,
            selected: BTreeSet::new(),
            input: Inputter::default(),
            last_input: InputResult::default(),
            clipboard: None,
            status_message: String::new(),
            last_status_message_update: Instant::now(),
        };
        model.set_status_message(message);
        model
    }

    // ----------------------------- accessors ------------------------------ //

    pub fn table(&self) -> &FilterableRecordTable {
        &self.table
    }

    pub fn cursor_row(&self) -> usize {
        self.cursor_row
    }

    pub fn cursor_column(&self) -> Column {
        self.cursor_column
    }

    pub fn current_client(&self) -> Option<&Client> {
        self.table.visible_row(self.cursor_row)
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.table.sort_state()
    }

    pub fn show_help(&self) -> bool {
        self.modus == Modus::Popup
    }

    /// Prompt label and current line content while an input is open.
    pub fn prompt(&self) -> Option<(String, &InputResult)> {
        match self.modus {
            Modus::Input(mode) => {
                let label = match mode {
                    InputMode::Filter(column) => format!("Filter {}: ", column.title()),
                    InputMode::EditAmount(id) => format!("Amount of {id}: "),
                    InputMode::EditStatus(id) => format!("Status of {id} (Pending|Success|Error): "),
                };
                Some((label, &self.last_input))
            }
            _ => None,
        }
    }

    pub fn status_message(&self) -> Option<&str> {
        if self.last_status_message_update.elapsed() < self.config.status_message_ttl {
            Some(self.status_message.as_str())
        } else {
            None
        }
    }

    pub fn raw_keyevents(&self) -> bool {
        matches!(self.modus, Modus::Input(_))
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
        self.last_status_message_update = Instant::now();
        trace!("Status message: {}", self.status_message);
    }

    pub fn quit(&mut self) {
        self.status = RunState::Quitting;
    }

    // ------------------------------ update -------------------------------- //

    pub fn update(&mut self, message: Message) -> Result<(), CardListError> {
        // Layout is recomputed on every draw, a resize only needs a redraw.
        if let Message::Resize(width, height) = message {
            trace!("UI was resized to {width}x{height}");
            return Ok(());
        }
        match self.modus {
            Modus::Table => match message {
                Message::Quit => self.quit(),
                Message::MoveDown => self.move_row(1),
                Message::MoveUp => self.move_row(-1),
                Message::MoveLeft => self.move_column(-1),
                Message::MoveRight => self.move_column(1),
                Message::MoveBeginning => self.cursor_row = 0,
                Message::MoveEnd => self.cursor_row = self.table.visible_len().saturating_sub(1),
                Message::Filter => self.enter_filter(),
                Message::ClearFilters => {
                    self.table.clear_filters();
                    self.clamp_cursor();
                    self.set_status_message("Cleared all filters");
                }
                Message::Sort => {
                    let direction = self.table.toggle_sort(self.cursor_column);
                    self.set_status_message(format!(
                        "Sorted by {} {:?}",
                        self.cursor_column.title(),
                        direction
                    ));
                }
                Message::ClearSort => {
                    self.table.clear_sort();
                    self.set_status_message("Sort cleared");
                }
                Message::Edit => self.enter_edit(),
                Message::ToggleSelection => self.toggle_selection(),
                Message::CopyRow => self.copy_row(),
                Message::Help => self.modus = Modus::Popup,
                Message::Exit | Message::RawKey(_) | Message::Resize(..) => (),
            },
            Modus::Popup => match message {
                Message::Quit => self.quit(),
                Message::Exit | Message::Help => self.modus = Modus::Table,
                _ => (),
            },
            Modus::Input(mode) => match message {
                Message::RawKey(key) => {
                    self.last_input = self.input.read(key);
                    if self.last_input.finished {
                        self.modus = Modus::Table;
                        self.commit_input(mode);
                    }
                }
                _ => (),
            },
        }
        Ok(())
    }

    fn move_row(&mut self, step: isize) {
        let last = self.table.visible_len().saturating_sub(1);
        self.cursor_row = self.cursor_row.saturating_add_signed(step).min(last);
    }

    fn move_column(&mut self, step: isize) {
        let idx = self.cursor_column.index().saturating_add_signed(step);
        if let Some(column) = Column::from_index(idx) {
            self.cursor_column = column;
        }
    }

    fn clamp_cursor(&mut self) {
        self.cursor_row = self
            .cursor_row
            .min(self.table.visible_len().saturating_sub(1));
    }

    fn open_input(&mut self, mode: InputMode, prefill: &str) {
        trace!("Entering input mode {mode:?} ...");
        self.input.set(prefill);
        self.last_input = self.input.get();
        self.modus = Modus::Input(mode);
    }

    fn enter_filter(&mut self) {
        let column = self.cursor_column;
        let current = self
            .table
            .filter(column)
            .map(|f| f.label().to_string())
            .unwrap_or_default();
        self.open_input(InputMode::Filter(column), &current);
    }

    fn enter_edit(&mut self) {
        let column = self.cursor_column;
        if !column.is_editable() {
            self.set_status_message(format!("{} is read-only", column.title()));
            return;
        }
        let Some((id, amount, status)) = self
            .current_client()
            .map(|c| (c.id, c.amount, c.status))
        else {
            self.set_status_message("Nothing to edit");
            return;
        };
        let (mode, prefill) = if column == Column::Status {
            (InputMode::EditStatus(id), status.label().to_string())
        } else {
            (InputMode::EditAmount(id), amount_text(amount))
        };
        self.open_input(mode, &prefill);
    }

    fn commit_input(&mut self, mode: InputMode) {
        let input = self.last_input.input.clone();
        if self.last_input.canceled {
            debug!("Input {mode:?} canceled");
            self.set_status_message("Canceled");
            return;
        }
        let result = match mode {
            InputMode::Filter(column) => ColumnFilter::parse(column, &input).map(|filter| {
                self.table.set_filter(column, filter);
                self.clamp_cursor();
                format!(
                    "{} of {} clients match",
                    self.table.visible_len(),
                    self.table.total_len()
                )
            }),
            InputMode::EditAmount(id) => self
                .table
                .edit_amount(id, &input)
                .map(|_| format!("Updated amount of {id}")),
            InputMode::EditStatus(id) => self
                .table
                .edit_status(id, &input)
                .map(|_| format!("Updated status of {id}")),
        };
        match result {
            Ok(message) => {
                info!("{message}");
                self.set_status_message(message);
            }
            Err(e) => {
                warn!("Rejected input {input:?} for {mode:?}: {e}");
                self.set_status_message(format!("Error: {e}"));
            }
        }
        // Edits can move or hide the current row.
        self.clamp_cursor();
    }

    fn toggle_selection(&mut self) {
        let Some(id) = self.current_client().map(|c| c.id) else {
            return;
        };
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.set_status_message(format!("{} selected", self.selected.len()));
    }

    fn wrap_cell_content(c: &str) -> String {
        let needs_escaping = c.contains('"');
        let needs_wrapping = c.chars().any(|c| c == ' ' || c == '\t' || c == ',');
        let mut out = String::from(c);

        if needs_escaping {
            out = out.replace('"', "\"\"");
        }
        if needs_wrapping || needs_escaping {
            out = format!("\"{out}\"");
        }
        out
    }

    /// Raw values of every column followed by the avatar url.
    fn row_as_csv(client: &Client) -> String {
        Column::ALL
            .iter()
            .map(|&c| client.raw_text(c))
            .chain(std::iter::once(client.avatar_url.clone()))
            .map(|v| Self::wrap_cell_content(&v))
            .collect::<Vec<String>>()
            .join(",")
    }

    fn copy_row(&mut self) {
        let Some(row_content) = self.current_client().map(Self::row_as_csv) else {
            return;
        };

        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(e) => {
                    error!("Clipboard unavailable: {e:?}");
                    self.set_status_message("Clipboard unavailable");
                    return;
                }
            }
        }

        if let Some(clipboard) = self.clipboard.as_mut() {
            match clipboard.set_text(row_content) {
                Ok(_) => {
                    trace!("Copied row content to clipboard.");
                    self.set_status_message("Copied row");
                }
                Err(e) => {
                    error!("Error copying to clipboard: {:?}", e);
                    self.set_status_message("Copy failed");
                }
            }
        }
    }
}
