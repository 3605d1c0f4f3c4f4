use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Instant;

use polars::prelude::*;
use tracing::{debug, info};

use crate::domain::CardListError;
use crate::record::{Client, parse_amount};

/// `(id, avatar url, display name, amount, status, date)`
pub type SeedRow<'a> = (i64, &'a str, &'a str, f64, &'a str, &'a str);

pub const DEFAULT_SEED: &[SeedRow<'static>] = &[
    (4957, "https://randomuser.me/api/portraits/women/42.jpg", "Amarachi Nkechi", 47427.0, "Success", "2019-05-09"),
    (675, "https://randomuser.me/api/portraits/women/24.jpg", "Bonelwa Ngqawana", 70503.0, "Success", "2019-05-09"),
    (6816, "https://randomuser.me/api/portraits/men/42.jpg", "Debashis Bhuiyan", 58931.0, "Success", "2019-05-07"),
    (5144, "https://randomuser.me/api/portraits/women/76.jpg", "Jacqueline Asong", 25053.0, "Pending", "2019-04-25"),
    (9800, "https://randomuser.me/api/portraits/men/24.jpg", "Kobus van de Vegte", 7319.0, "Pending", "2019-04-22"),
    (3599, "https://randomuser.me/api/portraits/women/94.jpg", "Mattie Blooman", 18441.0, "Error", "2019-04-17"),
    (3989, "https://randomuser.me/api/portraits/men/76.jpg", "Oea Romana", 33376.0, "Pending", "2019-04-17"),
    (1077, "https://randomuser.me/api/portraits/men/94.jpg", "Stephanus Huggins", 75774.0, "Success", "2019-02-26"),
    (8942, "https://randomuser.me/api/portraits/men/16.jpg", "Torsten Paulsson", 82531.0, "Pending", "2019-02-21"),
];

const CSV_COLUMNS: [&str; 6] = ["id", "avatar", "client", "amount", "status", "date"];

pub fn seed_clients(rows: &[SeedRow<'_>]) -> Result<Vec<Client>, CardListError> {
    rows.iter()
        .map(|&(id, avatar, name, amount, status, date)| {
            Client::from_seed(id, avatar, name, amount, status, date)
        })
        .collect()
}

pub fn default_clients() -> Result<Vec<Client>, CardListError> {
    seed_clients(DEFAULT_SEED)
}

/// Loads clients from a csv file with a header naming the columns
/// `id, avatar, client, amount, status, date` in any order.
pub fn load_csv(path: &Path) -> Result<Vec<Client>, CardListError> {
    check_file(path)?;
    let start_time = Instant::now();

    let df = LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()?
        .collect()?;

    let columns = CSV_COLUMNS
        .iter()
        .map(|name| string_column(&df, name))
        .collect::<Result<Vec<_>, _>>()?;

    let clients = (0..df.height())
        .map(|row| {
            let id = &columns[0][row];
            let id = id
                .trim()
                .parse::<i64>()
                .map_err(|_| CardListError::parse(id.as_str()))?;
            Client::from_seed(
                id,
                &columns[1][row],
                &columns[2][row],
                parse_amount(&columns[3][row])?,
                columns[4][row].trim(),
                &columns[5][row],
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "Loaded {} clients from {:?} in {}ms",
        clients.len(),
        path,
        start_time.elapsed().as_millis()
    );
    Ok(clients)
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>, CardListError> {
    let column = df
        .column(name)
        .map_err(|_| CardListError::MissingField(name.to_string()))?
        .cast(&DataType::String)?;
    let values = column
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect::<Vec<String>>();
    debug!("Column {name}: {} values", values.len());
    Ok(values)
}

fn check_file(path: &Path) -> Result<(), CardListError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => CardListError::FileNotFound,
        ErrorKind::PermissionDenied => CardListError::PermissionDenied,
        _ => CardListError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(CardListError::LoadingFailed(format!(
            "{} is not a file",
            path.display()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Status;
    use std::path::PathBuf;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn temp_csv(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("cardlist-{}-{name}", std::process::id()));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn default_seed_is_valid() {
        let clients = default_clients().unwrap();
        assert_eq!(clients.len(), 9);
        assert_eq!(clients[0].id, 4957);
        assert_eq!(clients[8].status, Status::Pending);
    }

    #[test]
    fn csv_fixture_matches_default_seed() {
        let clients = load_csv(&fixture("clients.csv")).unwrap();
        assert_eq!(clients, default_clients().unwrap());
    }

    #[test]
    fn csv_with_bad_date_is_rejected() {
        let path = temp_csv(
            "bad-date.csv",
            "id,avatar,client,amount,status,date\n1,a.jpg,Ann,10.5,Pending,2019-02-30\n",
        );
        let err = load_csv(&path).unwrap_err();
        assert!(matches!(err, CardListError::DateParse { .. }), "{err:?}");
        fs::remove_file(path).ok();
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let path = temp_csv("no-status.csv", "id,avatar,client,amount,date\n1,a.jpg,Ann,10.5,2019-02-01\n");
        let err = load_csv(&path).unwrap_err();
        assert!(matches!(err, CardListError::MissingField(ref f) if f == "status"), "{err:?}");
        fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_csv(&fixture("does-not-exist.csv")),
            Err(CardListError::FileNotFound)
        ));
    }
}
