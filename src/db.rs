// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite snapshot of the ledger. The store lives in memory; this module
//! loads it before a command runs and writes it back afterwards.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::clock::Clock;
use crate::models::{Category, CategoryScope, Kind, Recurrence, Reminder, Transaction};
use crate::store::LedgerStore;
use crate::utils::{get_setting, set_setting};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Tallybook", "tallybook"));

/// Environment variable that overrides the database location.
pub const DB_ENV: &str = "TALLYBOOK_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("tallybook.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS categories(
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        scope TEXT NOT NULL CHECK(scope IN ('income','expense','both'))
    );

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY,
        amount TEXT NOT NULL,
        category TEXT NOT NULL,
        date TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        recurring INTEGER NOT NULL DEFAULT 0,
        recurrence TEXT,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense'))
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_date ON transactions(date);

    CREATE TABLE IF NOT EXISTS reminders(
        id INTEGER PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT,
        date TEXT NOT NULL,
        amount TEXT,
        kind TEXT CHECK(kind IS NULL OR kind IN ('income','expense')),
        notify INTEGER NOT NULL DEFAULT 0
    );
    "#,
    )?;
    Ok(())
}

fn decimal_column(raw: &str, what: &str, id: i64) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .with_context(|| format!("Invalid {} '{}' on row {}", what, raw, id))
}

/// Loads the ledger. A database that was never saved yields a fresh ledger
/// with the starter categories.
pub fn load_store(conn: &Connection, clock: impl Clock + 'static) -> Result<LedgerStore> {
    if get_setting(conn, "seeded")?.is_none() {
        info!("no saved ledger, starting with starter categories");
        return Ok(LedgerStore::new(clock));
    }

    let mut stmt = conn.prepare("SELECT id, name, scope FROM categories ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    let mut categories = Vec::new();
    for row in rows {
        let (id, name, scope) = row?;
        categories.push(Category {
            id,
            name,
            scope: scope.parse::<CategoryScope>()?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, amount, category, date, description, recurring, recurrence, kind
         FROM transactions ORDER BY id DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, NaiveDate>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, bool>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, String>(7)?,
        ))
    })?;
    let mut transactions = Vec::new();
    for row in rows {
        let (id, amount, category, date, description, recurring, recurrence, kind) = row?;
        transactions.push(Transaction {
            id,
            amount: decimal_column(&amount, "amount", id)?,
            category,
            date,
            description,
            recurring,
            recurrence: recurrence.map(|s| s.parse::<Recurrence>()).transpose()?,
            kind: kind.parse::<Kind>()?,
        });
    }

    let mut stmt = conn.prepare(
        "SELECT id, title, description, date, amount, kind, notify FROM reminders ORDER BY id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, NaiveDate>(3)?,
            r.get::<_, Option<String>>(4)?,
            r.get::<_, Option<String>>(5)?,
            r.get::<_, bool>(6)?,
        ))
    })?;
    let mut reminders = Vec::new();
    for row in rows {
        let (id, title, description, date, amount, kind, notify) = row?;
        reminders.push(Reminder {
            id,
            title,
            description,
            date,
            amount: amount
                .map(|a| decimal_column(&a, "reminder amount", id))
                .transpose()?,
            kind: kind.map(|k| k.parse::<Kind>()).transpose()?,
            notify,
        });
    }

    debug!(
        transactions = transactions.len(),
        categories = categories.len(),
        reminders = reminders.len(),
        "ledger loaded"
    );
    Ok(LedgerStore::from_parts(
        clock,
        transactions,
        categories,
        reminders,
    ))
}

/// Replaces the stored ledger with the contents of `store` in one SQLite
/// transaction.
pub fn save_store(conn: &mut Connection, store: &LedgerStore) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(
        "DELETE FROM transactions; DELETE FROM categories; DELETE FROM reminders;",
    )?;
    {
        let mut stmt = tx.prepare("INSERT INTO categories(id, name, scope) VALUES (?1, ?2, ?3)")?;
        for c in store.categories() {
            stmt.execute(params![c.id, c.name, c.scope.as_str()])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO transactions(id, amount, category, date, description, recurring, recurrence, kind)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;
        for t in store.transactions() {
            stmt.execute(params![
                t.id,
                t.amount.to_string(),
                t.category,
                t.date,
                t.description,
                t.recurring,
                t.recurrence.map(|r| r.as_str()),
                t.kind.as_str(),
            ])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO reminders(id, title, description, date, amount, kind, notify)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        for r in store.reminders() {
            stmt.execute(params![
                r.id,
                r.title,
                r.description,
                r.date,
                r.amount.map(|a| a.to_string()),
                r.kind.map(|k| k.as_str()),
                r.notify,
            ])?;
        }
    }
    set_setting(&tx, "seeded", "1")?;
    tx.commit()?;
    debug!(
        transactions = store.transactions().len(),
        "ledger saved"
    );
    Ok(())
}
