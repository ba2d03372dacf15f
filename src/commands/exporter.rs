// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, Transaction};
use crate::store::LedgerStore;
use crate::utils::required_arg;
use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;

/// Column layout shared with `import transactions`.
pub const CSV_HEADER: [&str; 8] = [
    "id",
    "date",
    "kind",
    "amount",
    "category",
    "description",
    "recurring",
    "period",
];

pub fn handle(store: &LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("snapshot", sub)) => {
            let fmt = required_arg(sub, "format")?.to_lowercase();
            let out = required_arg(sub, "out")?;
            export_snapshot(store, &fmt, Path::new(out))?;
            println!("Exported ledger to {}", out);
            Ok(())
        }
        _ => Ok(()),
    }
}

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    balance: Decimal,
    income_this_month: Decimal,
    expense_this_month: Decimal,
    transactions: &'a [Transaction],
    categories: &'a [Category],
}

pub fn export_snapshot(store: &LedgerStore, fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(CSV_HEADER)?;
            for t in store.transactions() {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.kind.to_string(),
                    t.amount.to_string(),
                    t.category.clone(),
                    t.description.clone(),
                    t.recurring.to_string(),
                    t.recurrence.map(|r| r.to_string()).unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let doc = SnapshotDocument {
                balance: store.balance(),
                income_this_month: store.income_this_month(),
                expense_this_month: store.expense_this_month(),
                transactions: store.transactions(),
                categories: store.categories(),
            };
            std::fs::write(out, serde_json::to_string_pretty(&doc)?)
                .with_context(|| format!("Write {}", out.display()))?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    tracing::info!(format = fmt, out = %out.display(), "snapshot exported");
    Ok(())
}
