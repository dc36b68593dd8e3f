// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Parser dialect selection

use sqlparser::dialect::{
    AnsiDialect, BigQueryDialect, ClickHouseDialect, DatabricksDialect, Dialect as ParserDialect,
    DuckDbDialect, GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
    RedshiftSqlDialect, SQLiteDialect, SnowflakeDialect,
};
use sqlscope_ir::Dialect;

/// Parser dialect matching an analyzer dialect
pub fn parser_dialect(dialect: Dialect) -> Box<dyn ParserDialect> {
    match dialect {
        Dialect::Generic => Box::new(GenericDialect {}),
        Dialect::Ansi => Box::new(AnsiDialect {}),
        Dialect::MySQL => Box::new(MySqlDialect {}),
        Dialect::PostgreSQL => Box::new(PostgreSqlDialect {}),
        Dialect::DuckDB => Box::new(DuckDbDialect {}),
        Dialect::Snowflake => Box::new(SnowflakeDialect {}),
        Dialect::BigQuery => Box::new(BigQueryDialect {}),
        Dialect::SQLite => Box::new(SQLiteDialect {}),
        Dialect::MsSql => Box::new(MsSqlDialect {}),
        Dialect::Redshift => Box::new(RedshiftSqlDialect {}),
        Dialect::ClickHouse => Box::new(ClickHouseDialect {}),
        Dialect::Hive => Box::new(HiveDialect {}),
        Dialect::Databricks => Box::new(DatabricksDialect {}),
    }
}
