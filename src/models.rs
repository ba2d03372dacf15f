// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Invalid kind '{0}', expected income|expense")]
    Kind(String),
    #[error("Invalid category scope '{0}', expected income|expense|both")]
    Scope(String),
    #[error(
        "Invalid recurrence '{0}', expected daily|weekly|biweekly|monthly|bimonthly|quarterly|semiannual|annual"
    )]
    Recurrence(String),
}

/// Direction of a transaction. Amounts are never negative; the kind carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    /// Contribution of `amount` to a running balance.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            Kind::Income => amount,
            Kind::Expense => -amount,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(Kind::Income),
            "expense" | "out" => Ok(Kind::Expense),
            _ => Err(ParseError::Kind(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Semiannual,
    Annual,
}

impl Recurrence {
    pub fn as_str(self) -> &'static str {
        match self {
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Biweekly => "biweekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Bimonthly => "bimonthly",
            Recurrence::Quarterly => "quarterly",
            Recurrence::Semiannual => "semiannual",
            Recurrence::Annual => "annual",
        }
    }

    /// Next occurrence strictly after `date`. Month steps clamp to the
    /// last day of the target month (Jan 31 + 1 month = Feb 28/29).
    pub fn next_after(self, date: NaiveDate) -> Option<NaiveDate> {
        match self {
            Recurrence::Daily => date.checked_add_days(Days::new(1)),
            Recurrence::Weekly => date.checked_add_days(Days::new(7)),
            Recurrence::Biweekly => date.checked_add_days(Days::new(14)),
            Recurrence::Monthly => date.checked_add_months(Months::new(1)),
            Recurrence::Bimonthly => date.checked_add_months(Months::new(2)),
            Recurrence::Quarterly => date.checked_add_months(Months::new(3)),
            Recurrence::Semiannual => date.checked_add_months(Months::new(6)),
            Recurrence::Annual => date.checked_add_months(Months::new(12)),
        }
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recurrence {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Recurrence::Daily),
            "weekly" => Ok(Recurrence::Weekly),
            "biweekly" => Ok(Recurrence::Biweekly),
            "monthly" => Ok(Recurrence::Monthly),
            "bimonthly" => Ok(Recurrence::Bimonthly),
            "quarterly" => Ok(Recurrence::Quarterly),
            "semiannual" => Ok(Recurrence::Semiannual),
            "annual" | "yearly" => Ok(Recurrence::Annual),
            _ => Err(ParseError::Recurrence(s.to_string())),
        }
    }
}

/// Which transaction kinds a category is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryScope {
    Income,
    Expense,
    Both,
}

impl CategoryScope {
    pub fn allows(self, kind: Kind) -> bool {
        matches!(
            (self, kind),
            (CategoryScope::Both, _)
                | (CategoryScope::Income, Kind::Income)
                | (CategoryScope::Expense, Kind::Expense)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryScope::Income => "income",
            CategoryScope::Expense => "expense",
            CategoryScope::Both => "both",
        }
    }
}

impl fmt::Display for CategoryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryScope {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(CategoryScope::Income),
            "expense" => Ok(CategoryScope::Expense),
            "both" => Ok(CategoryScope::Both),
            _ => Err(ParseError::Scope(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
    pub recurring: bool,
    pub recurrence: Option<Recurrence>,
    pub kind: Kind,
}

impl Transaction {
    /// Signed contribution to the balance.
    pub fn signed_amount(&self) -> Decimal {
        self.kind.signed(self.amount)
    }

    /// Next due date for recurring transactions.
    pub fn next_occurrence(&self) -> Option<NaiveDate> {
        if !self.recurring {
            return None;
        }
        self.recurrence.and_then(|r| r.next_after(self.date))
    }
}

/// Input for a new transaction; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub description: String,
    pub recurring: bool,
    pub recurrence: Option<Recurrence>,
    pub kind: Kind,
}

impl NewTransaction {
    pub fn new(kind: Kind, amount: Decimal, category: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            amount,
            category: category.into(),
            date,
            description: String::new(),
            recurring: false,
            recurrence: None,
            kind,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn every(mut self, recurrence: Recurrence) -> Self {
        self.recurring = true;
        self.recurrence = Some(recurrence);
        self
    }
}

/// Shallow patch for an existing transaction. There is no id field, so an
/// edit can never change a transaction's identifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub recurring: Option<bool>,
    pub recurrence: Option<Option<Recurrence>>,
    pub kind: Option<Kind>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }

    pub(crate) fn apply(self, tx: &mut Transaction) {
        if let Some(amount) = self.amount {
            tx.amount = amount.abs();
        }
        if let Some(category) = self.category {
            tx.category = category;
        }
        if let Some(date) = self.date {
            tx.date = date;
        }
        if let Some(description) = self.description {
            tx.description = description;
        }
        if let Some(recurring) = self.recurring {
            tx.recurring = recurring;
        }
        if let Some(recurrence) = self.recurrence {
            tx.recurrence = recurrence;
        }
        if let Some(kind) = self.kind {
            tx.kind = kind;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub scope: CategoryScope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub scope: CategoryScope,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, scope: CategoryScope) -> Self {
        Self {
            name: name.into(),
            scope,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub scope: Option<CategoryScope>,
}

impl CategoryPatch {
    pub(crate) fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(scope) = self.scope {
            category.scope = scope;
        }
    }
}

/// Categories a fresh ledger starts with.
pub const STARTER_CATEGORIES: &[(&str, CategoryScope)] = &[
    ("Salary", CategoryScope::Income),
    ("Freelance", CategoryScope::Income),
    ("Investments", CategoryScope::Income),
    ("Gifts", CategoryScope::Both),
    ("Food", CategoryScope::Expense),
    ("Housing", CategoryScope::Expense),
    ("Transport", CategoryScope::Expense),
    ("Utilities", CategoryScope::Expense),
    ("Health", CategoryScope::Expense),
    ("Entertainment", CategoryScope::Expense),
    ("Education", CategoryScope::Expense),
    ("Shopping", CategoryScope::Expense),
    ("Other", CategoryScope::Both),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Upcoming,
    Today,
    Past,
}

impl ReminderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ReminderStatus::Upcoming => "upcoming",
            ReminderStatus::Today => "today",
            ReminderStatus::Past => "past",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub amount: Option<Decimal>,
    pub kind: Option<Kind>,
    pub notify: bool,
}

impl Reminder {
    pub fn status(&self, today: NaiveDate) -> ReminderStatus {
        match self.date.cmp(&today) {
            std::cmp::Ordering::Greater => ReminderStatus::Upcoming,
            std::cmp::Ordering::Equal => ReminderStatus::Today,
            std::cmp::Ordering::Less => ReminderStatus::Past,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReminder {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub amount: Option<Decimal>,
    pub kind: Option<Kind>,
    pub notify: bool,
}

impl NewReminder {
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            description: None,
            date,
            amount: None,
            kind: None,
            notify: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Option<Decimal>>,
    pub kind: Option<Option<Kind>>,
    pub notify: Option<bool>,
}

impl ReminderPatch {
    pub(crate) fn apply(self, reminder: &mut Reminder) {
        if let Some(title) = self.title {
            reminder.title = title;
        }
        if let Some(description) = self.description {
            reminder.description = description;
        }
        if let Some(date) = self.date {
            reminder.date = date;
        }
        if let Some(amount) = self.amount {
            reminder.amount = amount;
        }
        if let Some(kind) = self.kind {
            reminder.kind = kind;
        }
        if let Some(notify) = self.notify {
            reminder.notify = notify;
        }
    }
}
