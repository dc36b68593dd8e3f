// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Test fixtures and sample SQL

/// Sample SQL queries for testing
pub struct SqlFixtures;

impl SqlFixtures {
    // ===== Basic SELECT queries =====

    /// SELECT * from a single table
    pub const fn select_star() -> &'static str {
        "SELECT * FROM users"
    }

    /// Named columns with a simple filter; no builtin rule fires
    pub const fn clean_select() -> &'static str {
        "SELECT id, name FROM users WHERE id = 1"
    }

    /// Filter, ordering and limit
    pub const fn ordered_limit() -> &'static str {
        "SELECT u.id, u.name
         FROM users u
         WHERE u.status = 'active'
         ORDER BY u.created_at DESC
         LIMIT 10"
    }

    /// LIMIT without ORDER BY
    pub const fn limit_without_order() -> &'static str {
        "SELECT id FROM users LIMIT 5"
    }

    /// OFFSET past the pagination threshold
    pub const fn large_offset() -> &'static str {
        "SELECT id FROM users ORDER BY id LIMIT 20 OFFSET 50000"
    }

    // ===== JOINs =====

    /// Explicit INNER JOIN plus filters
    pub const fn inner_join() -> &'static str {
        "SELECT u.name, o.total
         FROM users u
         INNER JOIN orders o ON u.id = o.user_id
         WHERE o.total > 100"
    }

    /// CROSS JOIN
    pub const fn cartesian_join() -> &'static str {
        "SELECT u.id, p.id FROM users u CROSS JOIN products p"
    }

    /// Comma join with the condition in WHERE
    pub const fn comma_join() -> &'static str {
        "SELECT u.id, o.id FROM users u, orders o WHERE u.id = o.user_id"
    }

    /// LEFT JOIN filtered on the optional side
    pub const fn nullified_left_join() -> &'static str {
        "SELECT u.id FROM users u LEFT JOIN orders o ON u.id = o.user_id WHERE o.total > 10"
    }

    /// OR inside a join condition
    pub const fn or_join_condition() -> &'static str {
        "SELECT u.id FROM users u JOIN orders o ON u.id = o.user_id OR u.email = o.email"
    }

    // ===== Predicates =====

    /// Comparison against NULL with `=`
    pub const fn null_comparison() -> &'static str {
        "SELECT id FROM users WHERE deleted_at = NULL"
    }

    /// LIKE pattern starting with a wildcard
    pub const fn leading_wildcard() -> &'static str {
        "SELECT id FROM users WHERE email LIKE '%@example.com'"
    }

    /// Function wrapped around a filtered column
    pub const fn function_on_column() -> &'static str {
        "SELECT id FROM users WHERE LOWER(email) = 'a@b.com'"
    }

    /// Always-true OR operand
    pub const fn or_tautology() -> &'static str {
        "SELECT id FROM users WHERE name = 'x' OR 1 = 1"
    }

    // ===== Subqueries =====

    /// Correlated scalar aggregate in WHERE
    pub const fn correlated_subquery() -> &'static str {
        "SELECT * FROM t1 WHERE x > (SELECT AVG(y) FROM t2 WHERE t2.k = t1.k)"
    }

    /// Correlated subquery in the select list
    pub const fn correlated_select_list() -> &'static str {
        "SELECT u.name, (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS order_count
         FROM users u"
    }

    /// Correlated EXISTS
    pub const fn exists_subquery() -> &'static str {
        "SELECT u.id FROM users u
         WHERE EXISTS (SELECT * FROM orders o WHERE o.user_id = u.id)"
    }

    /// NOT IN over a subquery
    pub const fn not_in_subquery() -> &'static str {
        "SELECT id FROM users WHERE id NOT IN (SELECT user_id FROM banned)"
    }

    /// Joined tables plus an IN subquery
    pub const fn join_with_in_subquery() -> &'static str {
        "SELECT * FROM a JOIN b ON a.id = b.id WHERE a.id IN (SELECT id FROM c)"
    }

    // ===== Set operations and CTEs =====

    /// UNION without ALL
    pub const fn union_distinct() -> &'static str {
        "SELECT id FROM users UNION SELECT user_id FROM orders"
    }

    /// Recursive CTE
    pub const fn recursive_cte() -> &'static str {
        "WITH RECURSIVE nums AS (
             SELECT 1 AS n
             UNION ALL
             SELECT n + 1 FROM nums WHERE n < 10
         )
         SELECT n FROM nums"
    }

    // ===== Writes =====

    /// DELETE without WHERE
    pub const fn unfiltered_delete() -> &'static str {
        "DELETE FROM users"
    }

    /// UPDATE without WHERE
    pub const fn unfiltered_update() -> &'static str {
        "UPDATE users SET active = false"
    }

    /// DELETE with WHERE
    pub const fn filtered_delete() -> &'static str {
        "DELETE FROM users WHERE created_at < '2020-01-01'"
    }

    // ===== Dialect-specific queries =====

    /// MySQL random ordering
    pub const fn mysql_order_by_rand() -> &'static str {
        "SELECT id FROM users ORDER BY RAND() LIMIT 1"
    }

    /// PostgreSQL random ordering
    pub const fn postgres_order_by_random() -> &'static str {
        "SELECT id FROM users ORDER BY RANDOM() LIMIT 1"
    }

    // ===== Degenerate input =====

    /// Comment-only input
    pub const fn comment_only() -> &'static str {
        "-- nothing here\n/* block */\n"
    }

    /// Input the parser rejects
    pub const fn unparsable() -> &'static str {
        "SELEC id FROM"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_not_empty() {
        assert!(!SqlFixtures::select_star().is_empty());
        assert!(SqlFixtures::correlated_subquery().contains("t1.k"));
        assert!(SqlFixtures::comment_only().trim_start().starts_with("--"));
    }
}
