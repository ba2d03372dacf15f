// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::store::LedgerStore;
use crate::utils::pretty_table;
use anyhow::Result;
use std::collections::HashMap;

/// `(issue, detail)` pairs describing inconsistencies in the ledger.
pub fn find_issues(store: &LedgerStore) -> Vec<Vec<String>> {
    let mut rows = Vec::new();

    // 1) Transactions filed under a category that no longer exists
    // 2) Transactions whose kind the category does not allow
    for t in store.transactions() {
        match store.category_named(&t.category) {
            None => rows.push(vec![
                "unknown_category".into(),
                format!("tx {} -> '{}'", t.id, t.category),
            ]),
            Some(c) if !c.scope.allows(t.kind) => rows.push(vec![
                "kind_mismatch".into(),
                format!("tx {} is {} but '{}' is {}", t.id, t.kind, c.name, c.scope),
            ]),
            Some(_) => {}
        }
    }

    // 3) Duplicate category names make name lookups ambiguous
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for c in store.categories() {
        *seen.entry(c.name.as_str()).or_default() += 1;
    }
    let mut dups: Vec<_> = seen.into_iter().filter(|(_, n)| *n > 1).collect();
    dups.sort();
    for (name, n) in dups {
        rows.push(vec!["duplicate_category".into(), format!("'{}' x{}", name, n)]);
    }

    // 4) Reminder kind without an amount
    for r in store.reminders() {
        if r.kind.is_some() && r.amount.is_none() {
            rows.push(vec![
                "reminder_kind_without_amount".into(),
                format!("reminder {} '{}'", r.id, r.title),
            ]);
        }
    }
    rows
}

pub fn handle(store: &LedgerStore) -> Result<()> {
    let rows = find_issues(store);
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
