use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::domain::CardListError;

pub const ISO_DATE: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    Pending,
    Success,
    Error,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Pending, Status::Success, Status::Error];

    pub fn label(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Success => "Success",
            Status::Error => "Error",
        }
    }

    /// Case-insensitive lookup for filter input. Edits go through `FromStr`, which is exact.
    pub fn parse_loose(input: &str) -> Result<Self, CardListError> {
        let needle = input.trim();
        Status::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CardListError::invalid_enum(input))
    }
}

impl FromStr for Status {
    type Err = CardListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Status::Pending),
            "Success" => Ok(Status::Success),
            "Error" => Ok(Status::Error),
            _ => Err(CardListError::invalid_enum(s)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Id,
    Client,
    Amount,
    Status,
    Date,
}

impl Column {
    pub const ALL: [Column; 5] = [
        Column::Id,
        Column::Client,
        Column::Amount,
        Column::Status,
        Column::Date,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Client => "Client",
            Column::Amount => "Amount",
            Column::Status => "Status",
            Column::Date => "Date",
        }
    }

    pub fn index(&self) -> usize {
        Column::ALL
            .iter()
            .position(|c| c == self)
            .unwrap_or_default()
    }

    pub fn from_index(idx: usize) -> Option<Column> {
        Column::ALL.get(idx).copied()
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, Column::Amount | Column::Status)
    }
}

/// Parses an amount the way an edit field delivers it. Non finite values are rejected.
pub fn parse_amount(input: &str) -> Result<f64, CardListError> {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CardListError::parse(input)),
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, CardListError> {
    NaiveDate::parse_from_str(input.trim(), ISO_DATE).map_err(|_| CardListError::date_parse(input))
}

/// Raw text of an amount as used by the text filter, e.g. `47427.0` or `1234.5`.
/// Whole numbers keep one fractional digit. Magnitudes from `1e7` upward or
/// below `1e-3` switch to scientific form: `1.0E7`, `1.5E-4`.
pub fn amount_text(amount: f64) -> String {
    let magnitude = amount.abs();
    if !amount.is_finite() {
        return amount.to_string();
    }
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let text = amount.to_string();
        return if text.contains('.') { text } else { format!("{text}.0") };
    }

    let text = format!("{amount:e}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    if mantissa.contains('.') {
        format!("{mantissa}E{exponent}")
    } else {
        format!("{mantissa}.0E{exponent}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    pub id: i64,
    pub avatar_url: String,
    pub display_name: String,
    pub amount: f64,
    pub status: Status,
    pub date: NaiveDate,
}

impl Client {
    /// Builds a client from the textual seed tuple, validating status and date.
    pub fn from_seed(
        id: i64,
        avatar_url: &str,
        display_name: &str,
        amount: f64,
        status: &str,
        date: &str,
    ) -> Result<Self, CardListError> {
        Ok(Client {
            id,
            avatar_url: avatar_url.to_string(),
            display_name: display_name.to_string(),
            amount,
            status: status.parse()?,
            date: parse_date(date)?,
        })
    }

    /// Unformatted text of a field, which is what text filters match against.
    pub fn raw_text(&self, column: Column) -> String {
        match column {
            Column::Id => self.id.to_string(),
            Column::Client => self.display_name.clone(),
            Column::Amount => amount_text(self.amount),
            Column::Status => self.status.label().to_string(),
            Column::Date => self.date.format(ISO_DATE).to_string(),
        }
    }
}

/// Canonical, fixed-size list of clients. Only `amount` and `status` change after construction.
#[derive(Debug, Default)]
pub struct ClientStore {
    clients: Vec<Client>,
}

impl ClientStore {
    pub fn new(clients: Vec<Client>) -> Self {
        Self { clients }
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn get(&self, idx: usize) -> Option<&Client> {
        self.clients.get(idx)
    }

    pub fn find(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    fn find_mut(&mut self, id: i64) -> Result<&mut Client, CardListError> {
        self.clients
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CardListError::UnknownRecord(id))
    }

    pub fn set_amount(&mut self, id: i64, input: &str) -> Result<(), CardListError> {
        let client = self.find_mut(id)?;
        let amount = parse_amount(input).inspect_err(|e| warn!("Rejected amount for {id}: {e}"))?;
        debug!("Amount of {id}: {} -> {amount}", client.amount);
        client.amount = amount;
        Ok(())
    }

    pub fn set_status(&mut self, id: i64, input: &str) -> Result<(), CardListError> {
        let client = self.find_mut(id)?;
        let status: Status = input
            .parse()
            .inspect_err(|e| warn!("Rejected status for {id}: {e}"))?;
        debug!("Status of {id}: {} -> {status}", client.status);
        client.status = status;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ClientStore {
        ClientStore::new(vec![
            Client::from_seed(4957, "a.jpg", "Amarachi Nkechi", 47427.0, "Success", "2019-05-09")
                .unwrap(),
            Client::from_seed(9800, "b.jpg", "Kobus van de Vegte", 7319.0, "Pending", "2019-04-22")
                .unwrap(),
        ])
    }

    #[test]
    fn set_amount_stores_parsed_value() {
        let mut store = store();
        store.set_amount(4957, "1234.5").unwrap();
        assert_eq!(store.find(4957).unwrap().amount, 1234.5);
        store.set_amount(4957, " 12 ").unwrap();
        assert_eq!(store.find(4957).unwrap().amount, 12.0);
    }

    #[test]
    fn set_amount_rejects_garbage_and_keeps_value() {
        let mut store = store();
        for bad in ["abc", "", "12,5", "NaN", "inf"] {
            let err = store.set_amount(4957, bad).unwrap_err();
            assert!(matches!(err, CardListError::Parse { .. }), "{bad}: {err:?}");
        }
        assert_eq!(store.find(4957).unwrap().amount, 47427.0);
    }

    #[test]
    fn set_status_accepts_closed_set_only() {
        let mut store = store();
        store.set_status(9800, "Success").unwrap();
        assert_eq!(store.find(9800).unwrap().status, Status::Success);

        for bad in ["Unknown", "success", ""] {
            let err = store.set_status(9800, bad).unwrap_err();
            assert!(matches!(err, CardListError::InvalidEnum { .. }));
        }
        assert_eq!(store.find(9800).unwrap().status, Status::Success);
    }

    #[test]
    fn edits_on_missing_id_fail() {
        let mut store = store();
        assert!(matches!(
            store.set_amount(1, "10"),
            Err(CardListError::UnknownRecord(1))
        ));
        assert!(matches!(
            store.set_status(1, "Error"),
            Err(CardListError::UnknownRecord(1))
        ));
    }

    #[test]
    fn raw_text_uses_unformatted_values() {
        let store = store();
        let c = store.find(4957).unwrap();
        assert_eq!(c.raw_text(Column::Id), "4957");
        assert_eq!(c.raw_text(Column::Amount), "47427.0");
        assert_eq!(c.raw_text(Column::Date), "2019-05-09");
        assert_eq!(amount_text(1234.5), "1234.5");
    }

    #[test]
    fn amount_text_switches_to_scientific_outside_plain_range() {
        assert_eq!(amount_text(0.0), "0.0");
        assert_eq!(amount_text(-18441.0), "-18441.0");
        assert_eq!(amount_text(0.001), "0.001");
        assert_eq!(amount_text(9999999.5), "9999999.5");
        assert_eq!(amount_text(1e7), "1.0E7");
        assert_eq!(amount_text(12345678.0), "1.2345678E7");
        assert_eq!(amount_text(-25000000.0), "-2.5E7");
        assert_eq!(amount_text(0.0001), "1.0E-4");
        assert_eq!(amount_text(0.00015), "1.5E-4");
    }

    #[test]
    fn malformed_seed_date_is_rejected() {
        let err = Client::from_seed(1, "", "x", 1.0, "Error", "2019-13-01").unwrap_err();
        assert!(matches!(err, CardListError::DateParse { .. }));
        let err = Client::from_seed(1, "", "x", 1.0, "Done", "2019-01-01").unwrap_err();
        assert!(matches!(err, CardListError::InvalidEnum { .. }));
    }

    #[test]
    fn status_loose_parse_ignores_case() {
        assert_eq!(Status::parse_loose("pending").unwrap(), Status::Pending);
        assert_eq!(Status::parse_loose(" ERROR ").unwrap(), Status::Error);
        assert!(Status::parse_loose("pend").is_err());
    }

    #[test]
    fn column_lookup() {
        assert_eq!(Column::from_index(4), Some(Column::Date));
        assert_eq!(Column::from_index(5), None);
        assert_eq!(Column::Status.index(), 3);
    }

    #[test]
    fn only_amount_and_status_are_editable() {
        let editable: Vec<Column> = Column::ALL.into_iter().filter(|c| c.is_editable()).collect();
        assert_eq!(editable, vec![Column::Amount, Column::Status]);
    }
}
