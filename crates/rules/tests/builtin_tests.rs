// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Builtin rules run against parsed SQL

use pretty_assertions::assert_eq;
use sqlscope_ir::Dialect;
use sqlscope_rules::RuleSpec;
use sqlscope_rules::builtin::all_rules;
use sqlscope_test_utils::{SqlAssertions, SqlFixtures};

fn rule(id: &str) -> RuleSpec {
    all_rules()
        .into_iter()
        .find(|r| r.id == id)
        .unwrap_or_else(|| panic!("no builtin rule {id}"))
}

fn fires(id: &str, sql: &str) {
    SqlAssertions::assert_fires(&rule(id), sql, Dialect::Generic);
}

fn silent(id: &str, sql: &str) {
    SqlAssertions::assert_silent(&rule(id), sql, Dialect::Generic);
}

// ===== Performance =====

#[test]
fn test_select_star() {
    fires("SQL-PERF-001", SqlFixtures::select_star());
    silent("SQL-PERF-001", SqlFixtures::exists_subquery());
}

#[test]
fn test_leading_wildcard() {
    fires("SQL-PERF-002", SqlFixtures::leading_wildcard());
    silent("SQL-PERF-002", "SELECT id FROM users WHERE email LIKE 'admin%'");
}

#[test]
fn test_function_on_filtered_column() {
    fires("SQL-PERF-003", SqlFixtures::function_on_column());
    silent("SQL-PERF-003", "SELECT LOWER(email) FROM users");
    // WHERE of a subquery that sits in the outer select list
    fires(
        "SQL-PERF-003",
        "SELECT (SELECT MAX(o.id) FROM orders o WHERE LOWER(o.status) = 'x') AS m FROM users",
    );
    silent(
        "SQL-PERF-003",
        "SELECT id FROM users WHERE id IN (SELECT LOWER(name) FROM accounts)",
    );
}

#[test]
fn test_or_in_join_condition() {
    fires("SQL-PERF-004", SqlFixtures::or_join_condition());
    silent("SQL-PERF-004", "SELECT id FROM users WHERE a = 1 OR b = 2");
}

#[test]
fn test_correlated_select_list_subquery() {
    fires("SQL-PERF-005", SqlFixtures::correlated_select_list());
    silent("SQL-PERF-005", "SELECT (SELECT MAX(id) FROM orders) AS m FROM users");
    silent("SQL-PERF-005", "SELECT (SELECT MAX(u.x) FROM sch.u) AS m FROM sch.t");
    fires(
        "SQL-PERF-005",
        "SELECT (SELECT MAX(o.total) FROM sales.orders o WHERE o.user_id = u.id) AS m \
         FROM crm.users u",
    );
}

#[test]
fn test_large_in_list() {
    let values = (1..=51).map(|i| i.to_string()).collect::<Vec<_>>().join(", ");
    let sql = format!("SELECT id FROM users WHERE id IN ({values})");
    let hits = SqlAssertions::assert_fires(&rule("SQL-PERF-007"), &sql, Dialect::Generic);
    assert_eq!(hits[0].message.as_deref(), Some("IN list with 51 values"));
    assert!(hits[0].matched_text.ends_with("..."));

    silent("SQL-PERF-007", "SELECT id FROM users WHERE id IN (1, 2, 3)");
}

#[test]
fn test_large_offset() {
    fires("SQL-PERF-008", SqlFixtures::large_offset());
    silent("SQL-PERF-008", "SELECT id FROM users ORDER BY id LIMIT 20 OFFSET 40");
}

#[test]
fn test_cartesian_join() {
    fires("SQL-PERF-009", SqlFixtures::cartesian_join());
    silent("SQL-PERF-009", SqlFixtures::inner_join());
}

#[test]
fn test_union_without_all() {
    fires("SQL-PERF-010", SqlFixtures::union_distinct());
    silent("SQL-PERF-010", "SELECT id FROM users UNION ALL SELECT user_id FROM orders");
}

#[test]
fn test_ordered_subquery() {
    fires("SQL-PERF-011", "SELECT * FROM (SELECT id FROM users ORDER BY id) AS t");
    silent("SQL-PERF-011", "SELECT * FROM (SELECT id FROM users ORDER BY id LIMIT 5) AS t");
}

#[test]
fn test_arithmetic_on_filtered_column() {
    fires("SQL-PERF-012", "SELECT id FROM orders WHERE total * 2 > 100");
    silent("SQL-PERF-012", "SELECT total * 2 FROM orders WHERE total > 50");
    fires(
        "SQL-PERF-012",
        "SELECT (SELECT MAX(o.id) FROM orders o WHERE o.total * 2 > 100) AS m FROM users",
    );
}

#[test]
fn test_having_without_aggregate() {
    fires(
        "SQL-PERF-013",
        "SELECT status FROM users GROUP BY status HAVING status = 'a'",
    );
    silent(
        "SQL-PERF-013",
        "SELECT status FROM users GROUP BY status HAVING COUNT(*) > 1",
    );
}

#[test]
fn test_window_without_partition() {
    fires("SQL-PERF-014", "SELECT ROW_NUMBER() OVER (ORDER BY id) FROM users");
    silent(
        "SQL-PERF-014",
        "SELECT ROW_NUMBER() OVER (PARTITION BY dept ORDER BY id) FROM users",
    );
}

#[test]
fn test_select_distinct() {
    fires("SQL-PERF-015", "SELECT DISTINCT id FROM users");
    silent("SQL-PERF-015", SqlFixtures::clean_select());
}

// ===== Correctness =====

#[test]
fn test_null_comparison() {
    fires("SQL-CORR-001", SqlFixtures::null_comparison());
    silent("SQL-CORR-001", "SELECT id FROM users WHERE deleted_at IS NULL");
}

#[test]
fn test_not_in_subquery() {
    fires("SQL-CORR-002", SqlFixtures::not_in_subquery());
    silent("SQL-CORR-002", "SELECT id FROM users WHERE id NOT IN (1, 2)");
}

#[test]
fn test_unfiltered_write() {
    fires("SQL-CORR-003", SqlFixtures::unfiltered_delete());
    fires("SQL-CORR-003", SqlFixtures::unfiltered_update());
    silent("SQL-CORR-003", SqlFixtures::filtered_delete());
}

#[test]
fn test_limit_without_order() {
    let hits = SqlAssertions::assert_fires(
        &rule("SQL-CORR-004"),
        SqlFixtures::limit_without_order(),
        Dialect::Generic,
    );
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].matched_text, "LIMIT 5");
    assert_eq!(hits[0].location, "main:1");

    silent("SQL-CORR-004", SqlFixtures::ordered_limit());
    silent(
        "SQL-CORR-004",
        "SELECT id FROM users u WHERE EXISTS (SELECT 1 FROM orders o WHERE o.user_id = u.id LIMIT 1)",
    );
}

#[test]
fn test_case_without_else() {
    fires("SQL-CORR-005", "SELECT CASE WHEN a > 1 THEN 'x' END FROM t");
    silent("SQL-CORR-005", "SELECT CASE WHEN a > 1 THEN 'x' ELSE 'y' END FROM t");
    fires("SQL-CORR-005", "SELECT CASE status WHEN 1 THEN 'a' WHEN 2 THEN 'b' END FROM t");
    silent(
        "SQL-CORR-005",
        "SELECT CASE status WHEN 1 THEN 'a' ELSE 'b' END FROM t",
    );
}

#[test]
fn test_aggregate_in_where() {
    fires("SQL-CORR-006", "SELECT id FROM t WHERE COUNT(*) > 1");
    silent("SQL-CORR-006", SqlFixtures::correlated_subquery());
}

#[test]
fn test_nullified_outer_join() {
    let hits = SqlAssertions::assert_fires(
        &rule("SQL-CORR-007"),
        SqlFixtures::nullified_left_join(),
        Dialect::Generic,
    );
    assert_eq!(hits[0].matched_text, "o.total > 10");
    assert_eq!(
        hits[0].message.as_deref(),
        Some("WHERE condition on o turns the LEFT JOIN into an inner join")
    );

    silent(
        "SQL-CORR-007",
        "SELECT u.id FROM users u LEFT JOIN orders o ON u.id = o.user_id WHERE o.id IS NULL",
    );
}

// ===== Security and style =====

#[test]
fn test_or_tautology() {
    fires("SQL-SEC-001", SqlFixtures::or_tautology());
    silent("SQL-SEC-001", "SELECT id FROM users WHERE name = 'x' OR name = 'y'");
}

#[test]
fn test_sensitive_column() {
    fires("SQL-SEC-002", "SELECT id, password FROM users");
    silent("SQL-SEC-002", "SELECT id FROM users WHERE password = 'x'");
}

#[test]
fn test_comma_join() {
    fires("SQL-STYLE-001", SqlFixtures::comma_join());
    silent("SQL-STYLE-001", SqlFixtures::inner_join());
}

#[test]
fn test_ordinal_order_and_group() {
    fires("SQL-STYLE-002", "SELECT id, name FROM users ORDER BY 1");
    silent("SQL-STYLE-002", "SELECT id, name FROM users ORDER BY name");

    let hits = SqlAssertions::assert_fires(
        &rule("SQL-STYLE-003"),
        "SELECT status, COUNT(*) FROM users GROUP BY 1",
        Dialect::Generic,
    );
    assert_eq!(hits[0].matched_text, "GROUP BY 1");
}

// ===== Optimization and info =====

#[test]
fn test_in_subquery_rewrite() {
    fires("SQL-OPT-001", "SELECT id FROM t WHERE id IN (SELECT id FROM u)");
    silent("SQL-OPT-001", SqlFixtures::not_in_subquery());
}

#[test]
fn test_count_for_existence() {
    fires("SQL-OPT-002", "SELECT id FROM t WHERE (SELECT COUNT(*) FROM u) > 0");
    silent("SQL-OPT-002", "SELECT id FROM t WHERE (SELECT COUNT(*) FROM u) > 5");
}

#[test]
fn test_recursive_cte() {
    fires("SQL-INFO-001", SqlFixtures::recursive_cte());
    silent("SQL-INFO-001", "WITH r AS (SELECT 1 AS n) SELECT n FROM r");
}

// ===== Dialect-specific =====

#[test]
fn test_mysql_rand_ordering() {
    let rand = rule("SQL-MYSQL-001");
    SqlAssertions::assert_fires(&rand, SqlFixtures::mysql_order_by_rand(), Dialect::MySQL);
    SqlAssertions::assert_silent(&rand, SqlFixtures::mysql_order_by_rand(), Dialect::PostgreSQL);
}

#[test]
fn test_postgres_random_ordering() {
    let random = rule("SQL-PG-001");
    SqlAssertions::assert_fires(
        &random,
        SqlFixtures::postgres_order_by_random(),
        Dialect::PostgreSQL,
    );
    SqlAssertions::assert_silent(&random, SqlFixtures::mysql_order_by_rand(), Dialect::PostgreSQL);
}

#[test]
fn test_warehouse_count_distinct() {
    let exact = rule("SQL-WH-001");
    let sql = "SELECT COUNT(DISTINCT user_id) FROM orders";
    SqlAssertions::assert_fires(&exact, sql, Dialect::Snowflake);
    SqlAssertions::assert_silent(&exact, sql, Dialect::Generic);
}

#[test]
fn test_clean_query_is_silent() {
    for rule in all_rules() {
        SqlAssertions::assert_silent(&rule, SqlFixtures::clean_select(), Dialect::Generic);
    }
}
