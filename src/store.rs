// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! In-memory ledger: the owner of transactions, categories and reminders,
//! and of the aggregates derived from the transactions.
//!
//! Aggregates are maintained incrementally. Every transaction mutation first
//! reverses the old contribution (if any) and then books the new one, so a
//! patch that flips `kind` moves the balance by twice the amount. Unknown
//! identifiers are silent no-ops.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::clock::Clock;
use crate::models::{
    Category, CategoryPatch, Kind, NewCategory, NewReminder, NewTransaction, Reminder,
    ReminderPatch, STARTER_CATEGORIES, Transaction, TransactionPatch,
};
use crate::utils::month_bounds;

/// Size of the recent-transactions view.
pub const RECENT_LIMIT: usize = 5;

/// Point-in-time copy of the whole store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerSnapshot {
    pub balance: Decimal,
    pub income_this_month: Decimal,
    pub expense_this_month: Decimal,
    pub recent_transactions: Vec<Transaction>,
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub reminders: Vec<Reminder>,
}

#[derive(Clone, Copy)]
struct Effect {
    kind: Kind,
    amount: Decimal,
    date: NaiveDate,
}

impl Effect {
    fn of(tx: &Transaction) -> Self {
        Self {
            kind: tx.kind,
            amount: tx.amount,
            date: tx.date,
        }
    }
}

pub struct LedgerStore {
    clock: Box<dyn Clock>,
    transactions: Vec<Transaction>,
    categories: Vec<Category>,
    reminders: Vec<Reminder>,
    balance: Decimal,
    // inclusive bounds of the month the monthly totals refer to
    month: (NaiveDate, NaiveDate),
    income_this_month: Decimal,
    expense_this_month: Decimal,
    recent: Vec<Transaction>,
}

impl fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LedgerStore")
            .field("transactions", &self.transactions.len())
            .field("categories", &self.categories.len())
            .field("reminders", &self.reminders.len())
            .field("balance", &self.balance)
            .field("month", &self.month)
            .finish()
    }
}

fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().map_or(1, |max| max + 1)
}

impl LedgerStore {
    /// A ledger with no transactions and the starter categories.
    pub fn new(clock: impl Clock + 'static) -> Self {
        let categories = STARTER_CATEGORIES
            .iter()
            .zip(1..)
            .map(|((name, scope), id)| Category {
                id,
                name: (*name).to_string(),
                scope: *scope,
            })
            .collect();
        Self::from_parts(clock, Vec::new(), categories, Vec::new())
    }

    /// A ledger with nothing in it, not even categories.
    pub fn empty(clock: impl Clock + 'static) -> Self {
        Self::from_parts(clock, Vec::new(), Vec::new(), Vec::new())
    }

    /// Rebuilds a ledger from stored collections. `transactions` is expected
    /// newest-first, the order `add_transaction` produces.
    pub fn from_parts(
        clock: impl Clock + 'static,
        transactions: Vec<Transaction>,
        categories: Vec<Category>,
        reminders: Vec<Reminder>,
    ) -> Self {
        let month = month_bounds(clock.today());
        let mut store = Self {
            clock: Box::new(clock),
            transactions,
            categories,
            reminders,
            balance: Decimal::ZERO,
            month,
            income_this_month: Decimal::ZERO,
            expense_this_month: Decimal::ZERO,
            recent: Vec::new(),
        };
        store.balance = store
            .transactions
            .iter()
            .map(Transaction::signed_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add);
        store.recompute_monthly_totals();
        store.recompute_recent();
        store
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Income dated in the current month, as of the last mutation or
    /// [`refresh`](Self::refresh). Long-lived holders call `refresh()` first.
    pub fn income_this_month(&self) -> Decimal {
        self.income_this_month
    }

    /// Expense dated in the current month, as of the last mutation or
    /// [`refresh`](Self::refresh). Long-lived holders call `refresh()` first.
    pub fn expense_this_month(&self) -> Decimal {
        self.expense_this_month
    }

    /// Up to [`RECENT_LIMIT`] transactions, latest date first.
    pub fn recent_transactions(&self) -> &[Transaction] {
        &self.recent
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn transaction(&self, id: i64) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    pub fn category(&self, id: i64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Transactions reference categories by name; this resolves one.
    pub fn category_named(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn reminder(&self, id: i64) -> Option<&Reminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.balance,
            income_this_month: self.income_this_month,
            expense_this_month: self.expense_this_month,
            recent_transactions: self.recent.clone(),
            transactions: self.transactions.clone(),
            categories: self.categories.clone(),
            reminders: self.reminders.clone(),
        }
    }

    /// Re-reads the clock and recomputes the monthly totals if the calendar
    /// month moved on since they were last computed.
    pub fn refresh(&mut self) {
        let month = month_bounds(self.clock.today());
        if month != self.month {
            debug!(from = %self.month.0, to = %month.0, "month rolled over");
            self.month = month;
            self.recompute_monthly_totals();
        }
    }

    pub fn add_transaction(&mut self, input: NewTransaction) {
        self.refresh();
        let id = next_id(self.transactions.iter().map(|t| t.id));
        let tx = Transaction {
            id,
            amount: input.amount.abs(),
            category: input.category,
            date: input.date,
            description: input.description,
            recurring: input.recurring,
            recurrence: input.recurrence,
            kind: input.kind,
        };
        self.book(Effect::of(&tx), Decimal::ONE);
        debug!(id, kind = %tx.kind, amount = %tx.amount, date = %tx.date, "transaction added");
        self.transactions.insert(0, tx);
        self.recompute_recent();
    }

    pub fn remove_transaction(&mut self, id: i64) {
        let Some(pos) = self.transactions.iter().position(|t| t.id == id) else {
            debug!(id, "remove_transaction: unknown id");
            return;
        };
        self.refresh();
        let tx = self.transactions.remove(pos);
        self.book(Effect::of(&tx), Decimal::NEGATIVE_ONE);
        debug!(id, "transaction removed");
        self.recompute_recent();
    }

    pub fn edit_transaction(&mut self, id: i64, patch: TransactionPatch) {
        let Some(pos) = self.transactions.iter().position(|t| t.id == id) else {
            debug!(id, "edit_transaction: unknown id");
            return;
        };
        self.refresh();
        let old = Effect::of(&self.transactions[pos]);
        self.book(old, Decimal::NEGATIVE_ONE);
        patch.apply(&mut self.transactions[pos]);
        let new = Effect::of(&self.transactions[pos]);
        self.book(new, Decimal::ONE);
        debug!(id, "transaction edited");
        self.recompute_recent();
    }

    pub fn add_category(&mut self, input: NewCategory) {
        let id = next_id(self.categories.iter().map(|c| c.id));
        debug!(id, name = %input.name, "category added");
        self.categories.push(Category {
            id,
            name: input.name,
            scope: input.scope,
        });
    }

    /// Transactions that still name the removed category are left alone.
    pub fn remove_category(&mut self, id: i64) {
        let before = self.categories.len();
        self.categories.retain(|c| c.id != id);
        if self.categories.len() == before {
            debug!(id, "remove_category: unknown id");
        } else {
            debug!(id, "category removed");
        }
    }

    pub fn edit_category(&mut self, id: i64, patch: CategoryPatch) {
        match self.categories.iter_mut().find(|c| c.id == id) {
            Some(category) => {
                patch.apply(category);
                debug!(id, "category edited");
            }
            None => debug!(id, "edit_category: unknown id"),
        }
    }

    pub fn add_reminder(&mut self, input: NewReminder) {
        let id = next_id(self.reminders.iter().map(|r| r.id));
        debug!(id, date = %input.date, "reminder added");
        self.reminders.push(Reminder {
            id,
            title: input.title,
            description: input.description,
            date: input.date,
            amount: input.amount.map(|a| a.abs()),
            kind: input.kind,
            notify: input.notify,
        });
    }

    pub fn remove_reminder(&mut self, id: i64) {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        if self.reminders.len() == before {
            debug!(id, "remove_reminder: unknown id");
        } else {
            debug!(id, "reminder removed");
        }
    }

    pub fn edit_reminder(&mut self, id: i64, patch: ReminderPatch) {
        match self.reminders.iter_mut().find(|r| r.id == id) {
            Some(reminder) => {
                patch.apply(reminder);
                reminder.amount = reminder.amount.map(|a| a.abs());
                debug!(id, "reminder edited");
            }
            None => debug!(id, "edit_reminder: unknown id"),
        }
    }

    // Totals saturate at the Decimal range instead of panicking.
    fn book(&mut self, effect: Effect, factor: Decimal) {
        let amount = effect.amount.saturating_mul(factor);
        self.balance = self.balance.saturating_add(effect.kind.signed(amount));
        if effect.date < self.month.0 || effect.date > self.month.1 {
            return;
        }
        match effect.kind {
            Kind::Income => {
                self.income_this_month = self.income_this_month.saturating_add(amount)
            }
            Kind::Expense => {
                self.expense_this_month = self.expense_this_month.saturating_add(amount)
            }
        }
    }

    fn recompute_monthly_totals(&mut self) {
        let (first, last) = self.month;
        let mut income = Decimal::ZERO;
        let mut expense = Decimal::ZERO;
        for tx in self
            .transactions
            .iter()
            .filter(|t| t.date >= first && t.date <= last)
        {
            match tx.kind {
                Kind::Income => income = income.saturating_add(tx.amount),
                Kind::Expense => expense = expense.saturating_add(tx.amount),
            }
        }
        self.income_this_month = income;
        self.expense_this_month = expense;
    }

    fn recompute_recent(&mut self) {
        let mut by_date: Vec<&Transaction> = self.transactions.iter().collect();
        // sort_by is stable, so equal dates keep list order
        by_date.sort_by(|a, b| b.date.cmp(&a.date));
        self.recent = by_date.into_iter().take(RECENT_LIMIT).cloned().collect();
    }
}
