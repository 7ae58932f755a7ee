//! Relational (SQLite) column redaction.

use std::path::Path;

use rusqlite::Connection;
use scrub_core::{patterns, KeywordMatcher};
use tracing::debug;

use crate::Result;

/// Overwrite every non-null, non-empty value of each sensitive column
/// with that column's placeholder.
///
/// Columns are flagged by substring containment over the lower-cased
/// name, so a column literally named `SortKey` is redacted too. All
/// updates for one database run inside a single transaction; the
/// connection closes on every exit path when it drops.
pub(crate) fn sanitize_database(path: &Path, columns: &KeywordMatcher) -> Result<u64> {
    let mut conn = Connection::open(path)?;
    let tx = conn.transaction()?;
    let mut total = 0u64;

    let tables: Vec<String> = {
        let mut stmt = tx.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect::<std::result::Result<_, _>>()?
    };

    for table in &tables {
        let table_columns: Vec<String> = {
            let mut stmt = tx.prepare(&format!("PRAGMA table_info({})", quote_ident(table)))?;
            let rows = stmt.query_map([], |row| row.get(1))?;
            rows.collect::<std::result::Result<_, _>>()?
        };

        for column in table_columns.iter().filter(|c| columns.matches(c)) {
            let placeholder = patterns::column_placeholder(column);
            let sql = format!(
                "UPDATE {table} SET {col} = ?1 WHERE {col} IS NOT NULL AND {col} != ''",
                table = quote_ident(table),
                col = quote_ident(column),
            );
            let affected = tx.execute(&sql, rusqlite::params![placeholder])? as u64;
            if affected > 0 {
                debug!(table = table.as_str(), column = column.as_str(), rows = affected, "sanitized column");
            }
            total += affected;
        }
    }

    tx.commit()?;
    Ok(total)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
