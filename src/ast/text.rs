//! Raw SQL text normalization
//!
//! The database reports identifiers lowercased in plan filter text, so the
//! raw statement is folded to lowercase before parsing and display. Quoted
//! words keep their case.

/// Lowercases every whitespace-separated word that does not start a quoted
/// literal or quoted identifier.
pub fn normalize_sql_text(sql: &str) -> String {
    sql.split_whitespace()
        .map(|word| {
            if word.starts_with('"') || word.starts_with('\'') {
                word.to_string()
            } else {
                word.to_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
