use chrono::{Datelike, NaiveDate};

use crate::record::{Client, Column};

/// US-dollar currency: `$47,427.00`, negatives as `-$1,234.50`.
/// Cents are rounded half to even on the exact binary value, so `2.675` shows as `$2.67`.
pub fn format_currency(amount: f64) -> String {
    let text = format!("{:.2}", amount.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && text != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}

/// `M/D/YYYY` without zero padding.
pub fn format_date(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Display text of a cell. Never touches the underlying value.
pub fn format_cell(column: Column, client: &Client) -> String {
    match column {
        Column::Id => client.id.to_string(),
        Column::Client => client.display_name.clone(),
        Column::Amount => format_currency(client.amount),
        Column::Status => client.status.label().to_string(),
        Column::Date => format_date(client.date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_date;
    use crate::seed::default_clients;

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(47427.0), "$47,427.00");
        assert_eq!(format_currency(7319.0), "$7,319.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(0.5), "$0.50");
        assert_eq!(format_currency(0.0), "$0.00");
    }

    #[test]
    fn currency_negative() {
        assert_eq!(format_currency(-1234.5), "-$1,234.50");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(-2.675), "-$2.67");
    }

    #[test]
    fn currency_rounds_half_even_on_exact_value() {
        // 0.125 and 0.625 are exact ties, 2.675 is stored just below the tie.
        assert_eq!(format_currency(0.125), "$0.12");
        assert_eq!(format_currency(0.375), "$0.38");
        assert_eq!(format_currency(0.625), "$0.62");
        assert_eq!(format_currency(2.675), "$2.67");
        assert_eq!(format_currency(1234.625), "$1,234.62");
    }

    #[test]
    fn dates_are_not_padded() {
        assert_eq!(format_date(parse_date("2019-05-09").unwrap()), "5/9/2019");
        assert_eq!(format_date(parse_date("2019-12-21").unwrap()), "12/21/2019");
    }

    #[test]
    fn cells_follow_column() {
        let clients = default_clients().unwrap();
        let c = &clients[0];
        assert_eq!(format_cell(Column::Id, c), "4957");
        assert_eq!(format_cell(Column::Client, c), "Amarachi Nkechi");
        assert_eq!(format_cell(Column::Amount, c), "$47,427.00");
        assert_eq!(format_cell(Column::Status, c), "Success");
        assert_eq!(format_cell(Column::Date, c), "5/9/2019");
        assert_eq!(c.amount, 47427.0);
    }
}
