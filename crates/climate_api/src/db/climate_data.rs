use crate::schema::{self, MEASUREMENT, STATION};
use async_trait::async_trait;
use duckdb::{params_from_iter, AccessMode, Config, Connection, Row};
use log::{debug, info};
use regex::Regex;
use scooby::postgres::{select, Aliasable, Orderable, Parameters, Select};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query duckdb: {0}")]
    Query(#[from] duckdb::Error),
    #[error("Failed to rewrite query placeholders: {0}")]
    Placeholder(#[from] regex::Error),
    #[error("Store connection is unusable after a panic while it was held")]
    Poisoned,
    #[error("Store does not match the expected schema: {0}")]
    Schema(#[from] schema::Error),
}

#[async_trait]
pub trait ClimateData: Sync + Send {
    async fn precipitation_since(&self, since: &str) -> Result<Vec<Precipitation>, Error>;
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    async fn temperature_observations_since(
        &self,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    async fn temperature_stats_from(&self, start: &str) -> Result<Vec<TemperatureStats>, Error>;
    async fn temperature_stats_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<TemperatureStats>, Error>;
}

pub struct ClimateAccess {
    conn: Mutex<Connection>,
}

impl ClimateAccess {
    /// Opens the store read-only and checks it against the declared schema.
    pub fn new(db_path: &str) -> Result<Self, Error> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        info!("opened climate store at {}", db_path);
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self, Error> {
        schema::verify_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Hands out a clone of the shared connection, backed by the same database instance
    pub fn open_connection(&self) -> Result<Connection, Error> {
        let conn = self.conn.lock().map_err(|_| Error::Poisoned)?;
        Ok(conn.try_clone()?)
    }

    pub fn query<T, F>(
        &self,
        select: Select,
        params: Vec<String>,
        map_row: F,
    ) -> Result<Vec<T>, Error>
    where
        F: FnMut(&Row<'_>) -> Result<T, duckdb::Error>,
    {
        let re = Regex::new(r"\$(\d+)")?;
        let binding = select.to_string();
        let fixed_params = re.replace_all(&binding, "?");
        debug!("executing: {} {:?}", fixed_params, params);
        let conn = self.open_connection()?;
        let mut stmt = conn.prepare(&fixed_params)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), map_row)?
            .collect::<Result<Vec<T>, duckdb::Error>>()?;
        Ok(rows)
    }

    fn temperature_stats(
        &self,
        start: &str,
        end: Option<&str>,
    ) -> Result<Vec<TemperatureStats>, Error> {
        let mut placeholders = Parameters::new();
        let mut query = select((
            "date",
            "MIN(tobs)::DOUBLE".as_("temp_min"),
            "AVG(tobs)::DOUBLE".as_("temp_avg"),
            "MAX(tobs)::DOUBLE".as_("temp_max"),
        ))
        .from(MEASUREMENT.name)
        .where_(format!("date >= {}", placeholders.next()));

        let mut values = vec![start.to_owned()];
        if let Some(end) = end {
            query = query.where_(format!("date <= {}", placeholders.next()));
            values.push(end.to_owned());
        }
        query = query.group_by("date").order_by("date".asc());

        self.query(query, values, |row| {
            Ok(TemperatureStats {
                date: row.get(0)?,
                min: row.get(1)?,
                avg: row.get(2)?,
                max: row.get(3)?,
            })
        })
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn precipitation_since(&self, since: &str) -> Result<Vec<Precipitation>, Error> {
        let mut placeholders = Parameters::new();
        let query = select(("date", "prcp::DOUBLE".as_("prcp")))
            .from(MEASUREMENT.name)
            .where_(format!("date >= {}", placeholders.next()))
            .order_by(("date".asc(), "id".asc()));

        self.query(query, vec![since.to_owned()], |row| {
            Ok(Precipitation {
                date: row.get(0)?,
                prcp: row.get(1)?,
            })
        })
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let query = select(("station", "name")).from(STATION.name);

        self.query(query, vec![], |row| {
            Ok(Station {
                station: row.get(0)?,
                name: row.get(1)?,
            })
        })
    }

    async fn temperature_observations_since(
        &self,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        let mut placeholders = Parameters::new();
        let query = select(("date", "tobs::DOUBLE".as_("tobs")))
            .from(MEASUREMENT.name)
            .where_(format!("date >= {}", placeholders.next()))
            .order_by(("date".asc(), "id".asc()));

        self.query(query, vec![since.to_owned()], |row| {
            Ok(TemperatureObservation {
                date: row.get(0)?,
                tobs: row.get(1)?,
            })
        })
    }

    async fn temperature_stats_from(&self, start: &str) -> Result<Vec<TemperatureStats>, Error> {
        self.temperature_stats(start, None)
    }

    async fn temperature_stats_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<TemperatureStats>, Error> {
        self.temperature_stats(start, Some(end))
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Precipitation {
    pub date: String,
    pub prcp: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct Station {
    pub station: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureObservation {
    pub date: String,
    pub tobs: f64,
}

/// Min, average and max of the temperature observations recorded on one date
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
pub struct TemperatureStats {
    pub date: String,
    pub min: f64,
    pub avg: f64,
    pub max: f64,
}
