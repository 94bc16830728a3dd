use anyhow::{bail, Context, Result};
use rusqlite::Connection;

const CURRENT_SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &mut Connection) -> Result<()> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .context("failed to read user_version pragma")?;

    match version {
        0 => create_schema(conn),
        CURRENT_SCHEMA_VERSION => Ok(()),
        _ => bail!(
            "cache version ({}) is not a supported schema ({})",
            version,
            CURRENT_SCHEMA_VERSION
        ),
    }
}

fn create_schema(conn: &mut Connection) -> Result<()> {
    let tx = conn
        .transaction()
        .context("failed to open migration transaction")?;
    tx.execute_batch(include_str!("schemas/schema_v1.sql"))
        .context("failed to execute schema_v1.sql")?;
    tx.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)
        .context("failed to update user_version pragma")?;
    tx.commit().context("failed to commit schema")?;
    Ok(())
}
