// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};
use tallybook::clock::{Clock, FixedClock};
use tallybook::models::{
    CategoryPatch, CategoryScope, Kind, NewCategory, NewReminder, NewTransaction, Recurrence,
    ReminderPatch, TransactionPatch,
};
use tallybook::store::{LedgerStore, RECENT_LIMIT};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn ledger() -> LedgerStore {
    LedgerStore::empty(FixedClock(d(2024, 1, 20)))
}

#[derive(Clone)]
struct SharedClock(Arc<Mutex<NaiveDate>>);

impl Clock for SharedClock {
    fn today(&self) -> NaiveDate {
        *self.0.lock().unwrap()
    }
}

/// Aggregates must match a ledger rebuilt from scratch over the same data.
fn assert_consistent(store: &LedgerStore) {
    let rebuilt = LedgerStore::from_parts(
        FixedClock(store.today()),
        store.transactions().to_vec(),
        store.categories().to_vec(),
        store.reminders().to_vec(),
    );
    let expected_balance: Decimal = store
        .transactions()
        .iter()
        .map(|t| match t.kind {
            Kind::Income => t.amount,
            Kind::Expense => -t.amount,
        })
        .sum();
    assert_eq!(store.balance(), expected_balance);
    assert_eq!(store.income_this_month(), rebuilt.income_this_month());
    assert_eq!(store.expense_this_month(), rebuilt.expense_this_month());
    assert_eq!(store.recent_transactions(), rebuilt.recent_transactions());
}

#[test]
fn first_income_sets_balance_month_total_and_recent() {
    let mut store = ledger();
    store.add_transaction(NewTransaction::new(
        Kind::Income,
        dec("100"),
        "Salary",
        d(2024, 1, 5),
    ));

    assert_eq!(store.balance(), dec("100"));
    assert_eq!(store.income_this_month(), dec("100"));
    assert_eq!(store.expense_this_month(), Decimal::ZERO);
    assert_eq!(store.recent_transactions().len(), 1);
    assert_eq!(store.recent_transactions()[0], store.transactions()[0]);
    assert_eq!(store.transactions()[0].id, 1);
}

#[test]
fn removing_income_leaves_only_expense() {
    let mut store = ledger();
    store.add_transaction(NewTransaction::new(Kind::Income, dec("100"), "Salary", d(2024, 1, 2)));
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("40"), "Food", d(2024, 1, 3)));
    assert_eq!(store.balance(), dec("60"));

    store.remove_transaction(1);
    assert_eq!(store.balance(), dec("-40"));
    assert_eq!(store.income_this_month(), Decimal::ZERO);
    assert_eq!(store.expense_this_month(), dec("40"));
    assert_consistent(&store);
}

#[test]
fn editing_amount_replaces_old_contribution() {
    let mut store = ledger();
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("50"), "Food", d(2024, 1, 20)));
    store.edit_transaction(
        1,
        TransactionPatch {
            amount: Some(dec("70")),
            ..Default::default()
        },
    );
    assert_eq!(store.balance(), dec("-70"));
    assert_eq!(store.expense_this_month(), dec("70"));
    assert_consistent(&store);
}

#[test]
fn flipping_kind_moves_balance_by_twice_the_amount() {
    let mut store = ledger();
    store.add_transaction(NewTransaction::new(Kind::Income, dec("30"), "Gifts", d(2024, 1, 10)));
    let before = store.balance();
    store.edit_transaction(
        1,
        TransactionPatch {
            kind: Some(Kind::Expense),
            ..Default::default()
        },
    );
    assert_eq!(store.balance(), dec("-30"));
    assert_eq!(before - store.balance(), dec("60"));
    assert_eq!(store.income_this_month(), Decimal::ZERO);
    assert_eq!(store.expense_this_month(), dec("30"));
}

#[test]
fn unknown_ids_leave_state_untouched() {
    let mut store = LedgerStore::new(FixedClock(d(2024, 1, 20)));
    store.add_transaction(NewTransaction::new(Kind::Income, dec("10"), "Salary", d(2024, 1, 1)));
    store.add_reminder(NewReminder::new("Rent", d(2024, 2, 1)));
    let before = store.snapshot();

    store.remove_transaction(9999);
    store.edit_transaction(
        9999,
        TransactionPatch {
            amount: Some(dec("1")),
            ..Default::default()
        },
    );
    store.remove_category(9999);
    store.edit_category(
        9999,
        CategoryPatch {
            name: Some("X".into()),
            ..Default::default()
        },
    );
    store.remove_reminder(9999);
    store.edit_reminder(
        9999,
        ReminderPatch {
            notify: Some(true),
            ..Default::default()
        },
    );

    assert_eq!(store.snapshot(), before);
}

#[test]
fn recent_view_keeps_five_latest_dates() {
    let mut store = ledger();
    for day in 1..=6 {
        store.add_transaction(NewTransaction::new(
            Kind::Expense,
            dec("1"),
            "Food",
            d(2024, 1, day),
        ));
    }
    let dates: Vec<_> = store.recent_transactions().iter().map(|t| t.date).collect();
    assert_eq!(
        dates,
        vec![
            d(2024, 1, 6),
            d(2024, 1, 5),
            d(2024, 1, 4),
            d(2024, 1, 3),
            d(2024, 1, 2)
        ]
    );
    assert_eq!(store.recent_transactions().len(), RECENT_LIMIT);
}

#[test]
fn recent_view_is_stable_for_equal_dates() {
    let mut store = ledger();
    // inserted out of date order; same-date entries keep list order (newest first)
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("1"), "Food", d(2024, 1, 3)));
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("2"), "Food", d(2024, 1, 9)));
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("3"), "Food", d(2024, 1, 3)));

    let ids: Vec<_> = store.recent_transactions().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn backdated_add_does_not_count_toward_this_month() {
    let mut store = ledger();
    store.add_transaction(NewTransaction::new(Kind::Income, dec("500"), "Salary", d(2023, 12, 28)));
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("20"), "Food", d(2024, 2, 1)));
    assert_eq!(store.balance(), dec("480"));
    assert_eq!(store.income_this_month(), Decimal::ZERO);
    assert_eq!(store.expense_this_month(), Decimal::ZERO);
}

#[test]
fn moving_a_transaction_out_of_the_month_updates_totals() {
    let mut store = ledger();
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("15"), "Food", d(2024, 1, 31)));
    assert_eq!(store.expense_this_month(), dec("15"));
    store.edit_transaction(
        1,
        TransactionPatch {
            date: Some(d(2023, 12, 31)),
            ..Default::default()
        },
    );
    assert_eq!(store.expense_this_month(), Decimal::ZERO);
    assert_eq!(store.balance(), dec("-15"));
    assert_consistent(&store);
}

#[test]
fn month_rollover_recomputes_totals() {
    let today = Arc::new(Mutex::new(d(2024, 1, 31)));
    let mut store = LedgerStore::empty(SharedClock(today.clone()));
    store.add_transaction(NewTransaction::new(Kind::Income, dec("100"), "Salary", d(2024, 1, 31)));
    assert_eq!(store.income_this_month(), dec("100"));

    *today.lock().unwrap() = d(2024, 2, 1);
    store.refresh();
    assert_eq!(store.income_this_month(), Decimal::ZERO);

    store.add_transaction(NewTransaction::new(Kind::Income, dec("40"), "Salary", d(2024, 2, 1)));
    assert_eq!(store.income_this_month(), dec("40"));
    assert_eq!(store.balance(), dec("140"));
}

#[test]
fn mutation_after_rollover_sees_new_month_without_refresh() {
    let today = Arc::new(Mutex::new(d(2024, 1, 15)));
    let mut store = LedgerStore::empty(SharedClock(today.clone()));
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("9"), "Food", d(2024, 1, 15)));

    *today.lock().unwrap() = d(2024, 2, 15);
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("4"), "Food", d(2024, 2, 15)));
    assert_eq!(store.expense_this_month(), dec("4"));
    assert_consistent(&store);
}

#[test]
fn ids_are_max_plus_one() {
    let mut store = ledger();
    for _ in 0..3 {
        store.add_transaction(NewTransaction::new(Kind::Income, dec("1"), "Salary", d(2024, 1, 1)));
    }
    store.remove_transaction(3);
    store.add_transaction(NewTransaction::new(Kind::Income, dec("1"), "Salary", d(2024, 1, 1)));
    assert_eq!(store.transactions()[0].id, 3);

    store.remove_transaction(1);
    store.add_transaction(NewTransaction::new(Kind::Income, dec("1"), "Salary", d(2024, 1, 1)));
    let mut ids: Vec<_> = store.transactions().iter().map(|t| t.id).collect();
    ids.sort();
    assert_eq!(ids, vec![2, 3, 4]);
}

#[test]
fn mixed_sequence_keeps_aggregates_consistent() {
    let mut store = ledger();
    let ops: [(Kind, &str, NaiveDate); 7] = [
        (Kind::Income, "1200.00", d(2024, 1, 1)),
        (Kind::Expense, "45.30", d(2024, 1, 3)),
        (Kind::Expense, "800", d(2023, 12, 30)),
        (Kind::Income, "75.5", d(2024, 1, 18)),
        (Kind::Expense, "12.99", d(2024, 1, 19)),
        (Kind::Expense, "5", d(2024, 1, 20)),
        (Kind::Income, "10", d(2023, 11, 2)),
    ];
    for (kind, amount, date) in ops {
        store.add_transaction(NewTransaction::new(kind, dec(amount), "Other", date));
        assert_consistent(&store);
    }
    store.edit_transaction(
        2,
        TransactionPatch {
            kind: Some(Kind::Income),
            date: Some(d(2023, 10, 1)),
            ..Default::default()
        },
    );
    assert_consistent(&store);
    store.remove_transaction(4);
    assert_consistent(&store);
    store.edit_transaction(
        3,
        TransactionPatch {
            date: Some(d(2024, 1, 2)),
            amount: Some(dec("790")),
            ..Default::default()
        },
    );
    assert_consistent(&store);
    assert_eq!(store.transactions().len(), 6);
}

#[test]
fn negative_amounts_are_stored_as_magnitudes() {
    let mut store = ledger();
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("-25"), "Food", d(2024, 1, 2)));
    assert_eq!(store.transactions()[0].amount, dec("25"));
    assert_eq!(store.balance(), dec("-25"));
}

#[test]
fn edit_never_touches_the_id_and_merges_fields() {
    let mut store = ledger();
    store.add_transaction(
        NewTransaction::new(Kind::Expense, dec("60"), "Utilities", d(2024, 1, 4))
            .with_description("power"),
    );
    store.edit_transaction(
        1,
        TransactionPatch {
            recurring: Some(true),
            recurrence: Some(Some(Recurrence::Monthly)),
            ..Default::default()
        },
    );
    let tx = store.transaction(1).unwrap();
    assert_eq!(tx.id, 1);
    assert_eq!(tx.description, "power");
    assert!(tx.recurring);
    assert_eq!(tx.next_occurrence(), Some(d(2024, 2, 4)));
}

#[test]
fn new_ledger_has_starter_categories() {
    let mut store = LedgerStore::new(FixedClock(d(2024, 1, 20)));
    let n = store.categories().len();
    assert!(n > 0);
    assert_eq!(store.categories()[0].id, 1);
    assert!(store.category_named("Salary").is_some());

    store.add_category(NewCategory::new("Pets", CategoryScope::Expense));
    assert_eq!(store.categories().last().unwrap().id, n as i64 + 1);
}

#[test]
fn category_changes_do_not_cascade() {
    let mut store = LedgerStore::new(FixedClock(d(2024, 1, 20)));
    let food = store.category_named("Food").unwrap().id;
    store.add_transaction(NewTransaction::new(Kind::Expense, dec("8"), "Food", d(2024, 1, 2)));
    let balance = store.balance();

    store.edit_category(
        food,
        CategoryPatch {
            name: Some("Groceries".into()),
            scope: None,
        },
    );
    assert_eq!(store.category(food).unwrap().name, "Groceries");
    assert_eq!(store.transactions()[0].category, "Food");

    store.remove_category(food);
    assert!(store.category(food).is_none());
    assert_eq!(store.transactions().len(), 1);
    assert_eq!(store.balance(), balance);
}

#[test]
fn reminders_do_not_affect_aggregates() {
    let mut store = ledger();
    let before = store.snapshot();
    let mut rent = NewReminder::new("Rent", d(2024, 1, 25));
    rent.amount = Some(dec("900"));
    rent.kind = Some(Kind::Expense);
    store.add_reminder(rent);
    store.add_reminder(NewReminder::new("Call bank", d(2024, 1, 10)));

    assert_eq!(store.reminders().len(), 2);
    assert_eq!(store.reminders()[1].id, 2);
    assert_eq!(store.balance(), before.balance);
    assert_eq!(store.expense_this_month(), before.expense_this_month);

    store.edit_reminder(
        1,
        ReminderPatch {
            amount: Some(None),
            kind: Some(None),
            ..Default::default()
        },
    );
    assert_eq!(store.reminder(1).unwrap().amount, None);

    store.remove_reminder(1);
    store.add_reminder(NewReminder::new("Dentist", d(2024, 3, 1)));
    let ids: Vec<_> = store.reminders().iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn totals_saturate_instead_of_overflowing() {
    let mut store = ledger();
    for _ in 0..2 {
        store.add_transaction(NewTransaction::new(
            Kind::Income,
            Decimal::MAX,
            "Salary",
            d(2024, 1, 5),
        ));
    }
    assert_eq!(store.transactions().len(), 2);
    assert_eq!(store.balance(), Decimal::MAX);
    assert_eq!(store.income_this_month(), Decimal::MAX);

    store.edit_transaction(
        1,
        TransactionPatch {
            kind: Some(Kind::Expense),
            ..Default::default()
        },
    );
    store.remove_transaction(2);
    assert_eq!(store.transactions().len(), 1);

    let rebuilt = LedgerStore::from_parts(
        FixedClock(d(2024, 1, 20)),
        vec![store.transactions()[0].clone(), store.transactions()[0].clone()],
        Vec::new(),
        Vec::new(),
    );
    assert_eq!(rebuilt.expense_this_month(), Decimal::MAX);
    assert_eq!(rebuilt.balance(), Decimal::MIN);
}
