// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CategoryPatch, CategoryScope, NewCategory};
use crate::store::LedgerStore;
use crate::utils::{arg, maybe_print_json, pretty_table, required_arg};
use anyhow::{Result, bail};
use serde::Serialize;

pub fn handle(store: &mut LedgerStore, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required_arg(sub, "name")?;
            let scope: CategoryScope = arg(sub, "scope").unwrap_or("both").parse()?;
            if store.category_named(name).is_some() {
                bail!("Category '{}' already exists", name);
            }
            store.add_category(NewCategory::new(name, scope));
            println!("Added category '{}' ({})", name, scope);
        }
        Some(("edit", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let Some(current) = store.category(id) else {
                bail!("Category {} not found", id);
            };
            let patch = CategoryPatch {
                name: arg(sub, "name").map(str::to_string),
                scope: arg(sub, "scope")
                    .map(str::parse::<CategoryScope>)
                    .transpose()?,
            };
            if let Some(name) = &patch.name {
                if store.category_named(name).is_some_and(|c| c.id != id) {
                    bail!("Category '{}' already exists", name);
                }
                if *name != current.name {
                    println!(
                        "Note: transactions filed under '{}' keep that name",
                        current.name
                    );
                }
            }
            store.edit_category(id, patch);
            println!("Updated category {}", id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap_or(&0);
            let Some(name) = store.category(id).map(|c| c.name.clone()) else {
                bail!("Category {} not found", id);
            };
            store.remove_category(id);
            println!("Removed category '{}'", name);
        }
        Some(("list", sub)) => {
            let data = rows(store);
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|c| vec![c.id.to_string(), c.name, c.scope, c.transactions.to_string()])
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Id", "Category", "Applies to", "Transactions"], rows)
                );
            }
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub scope: String,
    pub transactions: usize,
}

pub fn rows(store: &LedgerStore) -> Vec<CategoryRow> {
    store
        .categories()
        .iter()
        .map(|c| CategoryRow {
            id: c.id,
            name: c.name.clone(),
            scope: c.scope.to_string(),
            transactions: store
                .transactions()
                .iter()
                .filter(|t| t.category == c.name)
                .count(),
        })
        .collect()
}
