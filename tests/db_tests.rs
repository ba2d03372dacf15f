// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use tallybook::clock::FixedClock;
use tallybook::db;
use tallybook::models::{Kind, NewReminder, NewTransaction, Recurrence};
use tallybook::utils::{get_currency, set_currency};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn conn() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn fresh_database_starts_with_starter_categories() {
    let conn = conn();
    let store = db::load_store(&conn, FixedClock(d(2025, 3, 1))).unwrap();
    assert!(store.transactions().is_empty());
    assert!(store.category_named("Food").is_some());
}

#[test]
fn saved_ledger_loads_back_identically() {
    let mut conn = conn();
    let clock = FixedClock(d(2025, 3, 12));
    let mut store = db::load_store(&conn, clock).unwrap();
    store.add_transaction(NewTransaction::new(
        Kind::Income,
        "3100.00".parse().unwrap(),
        "Salary",
        d(2025, 3, 1),
    ));
    store.add_transaction(
        NewTransaction::new(Kind::Expense, "49.99".parse().unwrap(), "Utilities", d(2025, 2, 27))
            .with_description("internet")
            .every(Recurrence::Monthly),
    );
    store.add_transaction(NewTransaction::new(
        Kind::Expense,
        "7.5".parse().unwrap(),
        "Food",
        d(2025, 3, 12),
    ));
    let mut rem = NewReminder::new("Insurance", d(2025, 4, 1));
    rem.amount = Some("320".parse().unwrap());
    rem.kind = Some(Kind::Expense);
    rem.notify = true;
    store.add_reminder(rem);
    store.remove_category(store.category_named("Gifts").unwrap().id);

    db::save_store(&mut conn, &store).unwrap();
    let loaded = db::load_store(&conn, clock).unwrap();
    assert_eq!(loaded.snapshot(), store.snapshot());
}

#[test]
fn saving_an_emptied_ledger_does_not_reseed() {
    let mut conn = conn();
    let clock = FixedClock(d(2025, 3, 12));
    let mut store = db::load_store(&conn, clock).unwrap();
    let ids: Vec<i64> = store.categories().iter().map(|c| c.id).collect();
    for id in ids {
        store.remove_category(id);
    }
    db::save_store(&mut conn, &store).unwrap();

    let loaded = db::load_store(&conn, clock).unwrap();
    assert!(loaded.categories().is_empty());
}

#[test]
fn currency_defaults_to_usd_and_can_be_changed() {
    let conn = conn();
    assert_eq!(get_currency(&conn).unwrap(), "USD");
    set_currency(&conn, "EUR").unwrap();
    assert_eq!(get_currency(&conn).unwrap(), "EUR");
}
