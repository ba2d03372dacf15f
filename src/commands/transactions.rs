// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Kind, NewTransaction, Recurrence, TransactionPatch};
use crate::store::LedgerStore;
use crate::utils::{
    arg, maybe_print_json, parse_amount, parse_date, parse_month, pretty_table, required_arg,
};
use anyhow::{Result, bail};
use serde::Serialize;
use tracing::warn;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => rm(store, sub)?,
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn warn_on_category(store: &LedgerStore, name: &str, kind: Kind) {
    match store.category_named(name) {
        None => warn!(category = name, "category is not defined"),
        Some(c) if !c.scope.allows(kind) => {
            warn!(category = name, scope = %c.scope, %kind, "category is not meant for this kind")
        }
        Some(_) => {}
    }
}

fn add(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let date = match arg(sub, "date") {
        Some(d) => parse_date(d)?,
        None => store.today(),
    };
    let amount = parse_amount(required_arg(sub, "amount")?)?;
    let kind: Kind = required_arg(sub, "kind")?.parse()?;
    let category = required_arg(sub, "category")?;

    let mut input = NewTransaction::new(kind, amount, category, date);
    if let Some(desc) = arg(sub, "description") {
        input = input.with_description(desc);
    }
    if let Some(every) = arg(sub, "every") {
        input = input.every(every.parse::<Recurrence>()?);
    }

    warn_on_category(store, category, kind);
    store.add_transaction(input);
    let id = store.transactions().first().map(|t| t.id).unwrap_or_default();
    println!(
        "Recorded {} {} on {} in '{}' (id {})",
        kind, amount, date, category, id
    );
    Ok(())
}

fn edit(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    if store.transaction(id).is_none() {
        bail!("Transaction {} not found", id);
    }

    let mut patch = TransactionPatch {
        amount: arg(sub, "amount").map(parse_amount).transpose()?,
        category: arg(sub, "category").map(str::to_string),
        date: arg(sub, "date").map(parse_date).transpose()?,
        description: sub.get_one::<String>("description").map(|s| s.trim().to_string()),
        kind: arg(sub, "kind").map(str::parse::<Kind>).transpose()?,
        ..TransactionPatch::default()
    };
    if let Some(every) = arg(sub, "every") {
        patch.recurring = Some(true);
        patch.recurrence = Some(Some(every.parse::<Recurrence>()?));
    } else if sub.get_flag("once") {
        patch.recurring = Some(false);
        patch.recurrence = Some(None);
    }
    if patch.is_empty() {
        bail!("Nothing to change for transaction {}", id);
    }

    store.edit_transaction(id, patch);
    if let Some(tx) = store.transaction(id) {
        warn_on_category(store, &tx.category, tx.kind);
    }
    println!("Updated transaction {}", id);
    Ok(())
}

fn rm(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    if store.transaction(id).is_none() {
        bail!("Transaction {} not found", id);
    }
    store.remove_transaction(id);
    println!("Removed transaction {}", id);
    Ok(())
}

fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(store, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.kind.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.next_due.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Kind", "Amount", "Category", "Description", "Next due"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub kind: String,
    pub amount: String,
    pub category: String,
    pub description: String,
    pub next_due: String,
}

/// Filtered transactions, latest date first.
pub fn query_rows(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let month = arg(sub, "month").map(parse_month).transpose()?;
    let kind = arg(sub, "kind").map(str::parse::<Kind>).transpose()?;
    let category = arg(sub, "category");

    let mut matched: Vec<_> = store
        .transactions()
        .iter()
        .filter(|t| {
            month
                .as_deref()
                .is_none_or(|m| t.date.format("%Y-%m").to_string() == m)
        })
        .filter(|t| kind.is_none_or(|k| t.kind == k))
        .filter(|t| category.is_none_or(|c| t.category == c))
        .collect();
    matched.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    if let Some(limit) = sub.get_one::<usize>("limit") {
        matched.truncate(*limit);
    }

    Ok(matched
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            date: t.date.to_string(),
            kind: t.kind.to_string(),
            amount: format!("{:.2}", t.amount),
            category: t.category.clone(),
            description: t.description.clone(),
            next_due: t
                .next_occurrence()
                .map(|d| d.to_string())
                .unwrap_or_default(),
        })
        .collect())
}
