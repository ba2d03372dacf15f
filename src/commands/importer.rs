// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Kind, NewTransaction, Recurrence};
use crate::store::LedgerStore;
use crate::utils::{parse_amount, parse_date, required_arg};
use anyhow::{Context, Result, anyhow, bail};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::info;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = required_arg(sub, "path")?;
            let n = import_transactions(store, Path::new(path))?;
            println!("Imported {} transactions from {}", n, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Reads the CSV layout written by `export snapshot --format csv`. The `id`
/// column is ignored. Every row is validated before any is added, so a bad
/// row leaves the ledger untouched. A recurring row may leave `period`
/// blank, matching what export writes for such a transaction; a period on a
/// row that is not recurring is an error.
pub fn import_transactions(store: &mut LedgerStore, path: &Path) -> Result<usize> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path.display()))?;

    let mut pending = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let line = i + 2;
        let rec = result.with_context(|| format!("Read line {}", line))?;
        let field = |idx: usize, name: &str| {
            rec.get(idx)
                .map(str::trim)
                .ok_or_else(|| anyhow!("line {}: {} missing", line, name))
        };

        let date = parse_date(field(1, "date")?).with_context(|| format!("line {}", line))?;
        let kind: Kind = field(2, "kind")?
            .parse()
            .with_context(|| format!("line {}", line))?;
        let amount = parse_amount(field(3, "amount")?).with_context(|| format!("line {}", line))?;
        let category = field(4, "category")?;
        let description = rec.get(5).map(str::trim).unwrap_or("");
        let recurring =
            parse_flag(rec.get(6).unwrap_or("")).with_context(|| format!("line {}", line))?;
        let period = rec
            .get(7)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse::<Recurrence>)
            .transpose()
            .with_context(|| format!("line {}", line))?;
        if !recurring && period.is_some() {
            bail!("line {}: period given but recurring is false", line);
        }

        let mut input =
            NewTransaction::new(kind, amount, category, date).with_description(description);
        input.recurring = recurring;
        input.recurrence = period;
        pending.push(input);
    }

    let n = pending.len();
    // oldest first so the newest row ends up on top of the list
    pending.sort_by(|a, b| a.date.cmp(&b.date));
    for input in pending {
        store.add_transaction(input);
    }
    info!(count = n, path = %path.display(), "transactions imported");
    Ok(n)
}

/// `recurring` column: true/false, 1/0 or yes/no in any case. Blank is false.
fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(anyhow!("Invalid recurring flag '{}', expected true or false", other)),
    }
}
