// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Kind, NewReminder, ReminderPatch, ReminderStatus};
use crate::store::LedgerStore;
use crate::utils::{arg, maybe_print_json, parse_amount, parse_date, pretty_table, required_arg};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(store, sub)?,
        Some(("edit", sub)) => edit(store, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            if store.reminder(id).is_none() {
                bail!("Reminder {} not found", id);
            }
            store.remove_reminder(id);
            println!("Removed reminder {}", id);
        }
        Some(("list", sub)) => list(store, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let title = required_arg(sub, "title")?;
    let date = parse_date(required_arg(sub, "date")?)?;
    let amount = arg(sub, "amount").map(parse_amount).transpose()?;
    let kind = arg(sub, "kind").map(str::parse::<Kind>).transpose()?;
    if kind.is_some() && amount.is_none() {
        bail!("--kind only applies together with --amount");
    }

    let mut input = NewReminder::new(title, date);
    input.description = arg(sub, "description").map(str::to_string);
    input.amount = amount;
    input.kind = kind;
    input.notify = sub.get_flag("notify");
    store.add_reminder(input);
    println!("Added reminder '{}' on {}", title, date);
    Ok(())
}

fn edit(store: &mut LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap_or(&0);
    if store.reminder(id).is_none() {
        bail!("Reminder {} not found", id);
    }
    let mut patch = ReminderPatch {
        title: arg(sub, "title").map(str::to_string),
        date: arg(sub, "date").map(parse_date).transpose()?,
        notify: sub.get_one::<bool>("notify").copied(),
        ..ReminderPatch::default()
    };
    if let Some(desc) = sub.get_one::<String>("description") {
        let desc = desc.trim();
        patch.description = Some((!desc.is_empty()).then(|| desc.to_string()));
    }
    if sub.get_flag("clear-amount") {
        patch.amount = Some(None);
        patch.kind = Some(None);
    } else {
        if let Some(amount) = arg(sub, "amount") {
            patch.amount = Some(Some(parse_amount(amount)?));
        }
        if let Some(kind) = arg(sub, "kind") {
            patch.kind = Some(Some(kind.parse::<Kind>()?));
        }
    }
    if patch == ReminderPatch::default() {
        bail!("Nothing to change for reminder {}", id);
    }
    store.edit_reminder(id, patch);
    println!("Updated reminder {}", id);
    Ok(())
}

#[derive(Serialize)]
pub struct ReminderRow {
    pub id: i64,
    pub date: String,
    pub status: ReminderStatus,
    pub title: String,
    pub description: String,
    pub amount: String,
    pub kind: String,
    pub notify: bool,
}

/// Reminders ordered by date; with `upcoming_only` past ones are skipped.
pub fn rows(store: &LedgerStore, upcoming_only: bool) -> Vec<ReminderRow> {
    let today = store.today();
    let mut reminders: Vec<_> = store
        .reminders()
        .iter()
        .filter(|r| !upcoming_only || r.status(today) != ReminderStatus::Past)
        .collect();
    reminders.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    reminders
        .into_iter()
        .map(|r| ReminderRow {
            id: r.id,
            date: r.date.to_string(),
            status: r.status(today),
            title: r.title.clone(),
            description: r.description.clone().unwrap_or_default(),
            amount: r.amount.map(|a| format!("{:.2}", a)).unwrap_or_default(),
            kind: r.kind.map(|k| k.to_string()).unwrap_or_default(),
            notify: r.notify,
        })
        .collect()
}

fn list(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let data = rows(store, sub.get_flag("upcoming"));
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date,
                    r.status.as_str().to_string(),
                    r.title,
                    r.amount,
                    r.kind,
                    if r.notify { "yes".into() } else { String::new() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Status", "Title", "Amount", "Kind", "Notify"],
                rows
            )
        );
    }
    Ok(())
}
