//! Application-defined SQL functions.
//!
//! # Invariants
//! - `fold_case(text)` lowercases with Unicode rules, matching
//!   `str::to_lowercase` on the Rust side; `NULL` stays `NULL`.

use super::DbResult;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// Registers every application-defined function on `conn`.
///
/// Re-registering replaces the previous definition, so this is safe to call
/// more than once per connection.
pub fn register_functions(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )?;
    Ok(())
}
