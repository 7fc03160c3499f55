use duckdb::{params, Connection};
use log::{debug, info};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to inspect store schema: {0}")]
    Query(#[from] duckdb::Error),
    #[error("Store is missing table `{0}`")]
    MissingTable(&'static str),
    #[error("Store table `{table}` is missing column `{column}`")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    #[error("Store column `{table}.{column}` is {found}, expected {expected}")]
    ColumnType {
        table: &'static str,
        column: &'static str,
        expected: &'static str,
        found: String,
    },
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static str,
    pub nullable: bool,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

const fn column(name: &'static str, sql_type: &'static str, nullable: bool) -> Column {
    Column {
        name,
        sql_type,
        nullable,
    }
}

/// One weather reading per station per day.
pub const MEASUREMENT: Table = Table {
    name: "measurement",
    columns: &[
        column("id", "INTEGER", false),
        column("station", "TEXT", false),
        // YYYY-MM-DD, so string order is chronological order
        column("date", "TEXT", false),
        column("prcp", "DOUBLE", true),
        column("tobs", "DOUBLE", false),
    ],
};

pub const STATION: Table = Table {
    name: "station",
    columns: &[
        column("id", "INTEGER", false),
        column("station", "TEXT", false),
        column("name", "TEXT", false),
        column("latitude", "DOUBLE", true),
        column("longitude", "DOUBLE", true),
        column("elevation", "DOUBLE", true),
    ],
};

pub const TABLES: [&Table; 2] = [&MEASUREMENT, &STATION];

impl Column {
    /// Whether a column reported by `information_schema` can stand in for this one.
    /// Text columns must stay text so dates compare as strings; numeric columns
    /// accept any numeric type since values are cast to DOUBLE when read.
    pub fn accepts(&self, data_type: &str) -> bool {
        let data_type = data_type.to_uppercase();
        match self.sql_type {
            "TEXT" => matches!(data_type.as_str(), "TEXT" | "VARCHAR"),
            _ => is_numeric(&data_type),
        }
    }
}

fn is_numeric(data_type: &str) -> bool {
    matches!(
        data_type,
        "TINYINT"
            | "SMALLINT"
            | "INTEGER"
            | "BIGINT"
            | "HUGEINT"
            | "UTINYINT"
            | "USMALLINT"
            | "UINTEGER"
            | "UBIGINT"
            | "FLOAT"
            | "REAL"
            | "DOUBLE"
    ) || data_type.starts_with("DECIMAL")
}

impl Table {
    pub fn create_statement(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|column| {
                let null = if column.nullable { "" } else { " NOT NULL" };
                format!("{} {}{}", column.name, column.sql_type, null)
            })
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            columns.join(", ")
        )
    }
}

/// Checks that every declared table and column is present in the store with a
/// compatible type. The store is owned upstream, so nothing is ever altered here.
pub fn verify_schema(conn: &Connection) -> Result<(), Error> {
    let mut stmt = conn.prepare(
        "SELECT column_name, data_type FROM information_schema.columns WHERE table_name = ?",
    )?;
    for table in TABLES {
        let found: Vec<(String, String)> = stmt
            .query_map(params![table.name], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<(String, String)>, duckdb::Error>>()?;
        if found.is_empty() {
            return Err(Error::MissingTable(table.name));
        }
        for column in table.columns {
            let Some((_, data_type)) = found
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(column.name))
            else {
                return Err(Error::MissingColumn {
                    table: table.name,
                    column: column.name,
                });
            };
            if !column.accepts(data_type) {
                return Err(Error::ColumnType {
                    table: table.name,
                    column: column.name,
                    expected: column.sql_type,
                    found: data_type.to_owned(),
                });
            }
        }
        debug!("table {} matches declared schema", table.name);
    }
    info!("store schema verified");
    Ok(())
}

/// Creates the declared tables in an empty store, used when seeding fixture data.
pub fn create_tables(conn: &Connection) -> Result<(), duckdb::Error> {
    let statements: Vec<String> = TABLES
        .iter()
        .map(|table| table.create_statement())
        .collect();
    conn.execute_batch(&statements.join("\n"))
}
