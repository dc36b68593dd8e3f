// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! # Dialect Support
//!
//! This module defines the SQL dialects the analyzer understands.
//!
//! ## Design
//!
//! A dialect plays two roles:
//!
//! 1. **Parsing**: the lowering layer picks the matching parser dialect
//! 2. **Rule filtering**: rules may restrict themselves to a set of dialects
//!
//! Dialect names are matched case-insensitively and accept the common
//! aliases (`postgres`, `pg`, `tsql`, `sqlite3`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported SQL dialects
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Dialect-agnostic parsing
    #[default]
    Generic,
    Ansi,
    MySQL,
    PostgreSQL,
    DuckDB,
    Snowflake,
    BigQuery,
    SQLite,
    MsSql,
    Redshift,
    ClickHouse,
    Hive,
    Databricks,
}

impl Dialect {
    /// Every dialect, in declaration order
    pub const ALL: [Dialect; 13] = [
        Dialect::Generic,
        Dialect::Ansi,
        Dialect::MySQL,
        Dialect::PostgreSQL,
        Dialect::DuckDB,
        Dialect::Snowflake,
        Dialect::BigQuery,
        Dialect::SQLite,
        Dialect::MsSql,
        Dialect::Redshift,
        Dialect::ClickHouse,
        Dialect::Hive,
        Dialect::Databricks,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::Ansi => "ansi",
            Dialect::MySQL => "mysql",
            Dialect::PostgreSQL => "postgresql",
            Dialect::DuckDB => "duckdb",
            Dialect::Snowflake => "snowflake",
            Dialect::BigQuery => "bigquery",
            Dialect::SQLite => "sqlite",
            Dialect::MsSql => "mssql",
            Dialect::Redshift => "redshift",
            Dialect::ClickHouse => "clickhouse",
            Dialect::Hive => "hive",
            Dialect::Databricks => "databricks",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a dialect name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown SQL dialect: '{0}'")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" | "" => Ok(Dialect::Generic),
            "ansi" => Ok(Dialect::Ansi),
            "mysql" | "mariadb" => Ok(Dialect::MySQL),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSQL),
            "duckdb" => Ok(Dialect::DuckDB),
            "snowflake" => Ok(Dialect::Snowflake),
            "bigquery" => Ok(Dialect::BigQuery),
            "sqlite" | "sqlite3" => Ok(Dialect::SQLite),
            "mssql" | "tsql" | "sqlserver" => Ok(Dialect::MsSql),
            "redshift" => Ok(Dialect::Redshift),
            "clickhouse" => Ok(Dialect::ClickHouse),
            "hive" => Ok(Dialect::Hive),
            "databricks" | "spark" => Ok(Dialect::Databricks),
            _ => Err(UnknownDialect(s.to_string())),
        }
    }
}
