// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Kind;
use crate::store::LedgerStore;
use crate::utils::{
    arg, fmt_money, maybe_print_json, month_bounds, month_key, month_start, pretty_table,
};
use anyhow::Result;
use chrono::Months;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

pub fn handle(store: &LedgerStore, ccy: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => print_summary(store, ccy, sub)?,
        Some(("cashflow", sub)) => print_cashflow(store, sub)?,
        Some(("spend-by-category", sub)) => print_spend_by_category(store, ccy, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct RecentRow {
    pub id: i64,
    pub date: String,
    pub kind: Kind,
    pub category: String,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub month: String,
    pub balance: Decimal,
    pub income_this_month: Decimal,
    pub expense_this_month: Decimal,
    pub net_this_month: Decimal,
    pub recent: Vec<RecentRow>,
}

pub fn summary(store: &LedgerStore) -> Summary {
    Summary {
        month: month_key(store.today()),
        balance: store.balance(),
        income_this_month: store.income_this_month(),
        expense_this_month: store.expense_this_month(),
        net_this_month: store
            .income_this_month()
            .saturating_sub(store.expense_this_month()),
        recent: store
            .recent_transactions()
            .iter()
            .map(|t| RecentRow {
                id: t.id,
                date: t.date.to_string(),
                kind: t.kind,
                category: t.category.clone(),
                amount: t.amount,
            })
            .collect(),
    }
}

fn print_summary(store: &LedgerStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let s = summary(store);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let totals = vec![
        vec!["Balance".into(), fmt_money(&s.balance, ccy)],
        vec![
            format!("Income ({})", s.month),
            fmt_money(&s.income_this_month, ccy),
        ],
        vec![
            format!("Expense ({})", s.month),
            fmt_money(&s.expense_this_month, ccy),
        ],
        vec![
            format!("Net ({})", s.month),
            fmt_money(&s.net_this_month, ccy),
        ],
    ];
    println!("{}", pretty_table(&["", "Amount"], totals));
    let recent = s
        .recent
        .iter()
        .map(|r| {
            vec![
                r.date.clone(),
                r.kind.to_string(),
                r.category.clone(),
                fmt_money(&r.kind.signed(r.amount), ccy),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Date", "Kind", "Category", "Amount"], recent)
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CashflowRow {
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
}

/// Income and expense for each of the `months` calendar months ending with
/// the current one, newest first. Months without activity show zeros.
pub fn cashflow(store: &LedgerStore, months: usize) -> Vec<CashflowRow> {
    let current = month_bounds(store.today()).0;
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in store.transactions() {
        let entry = map
            .entry(month_key(t.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));
        match t.kind {
            Kind::Income => entry.0 = entry.0.saturating_add(t.amount),
            Kind::Expense => entry.1 = entry.1.saturating_add(t.amount),
        }
    }
    (0..months)
        .map_while(|back| {
            let back = u32::try_from(back).ok()?;
            current.checked_sub_months(Months::new(back))
        })
        .map(|first| {
            let month = month_key(first);
            let (income, expense) = map
                .get(&month)
                .copied()
                .unwrap_or((Decimal::ZERO, Decimal::ZERO));
            CashflowRow {
                month,
                income,
                expense,
                net: income.saturating_sub(expense),
            }
        })
        .collect()
}

fn print_cashflow(store: &LedgerStore, sub: &clap::ArgMatches) -> Result<()> {
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let data = cashflow(store, months);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|r| {
                vec![
                    r.month.clone(),
                    format!("{:.2}", r.income),
                    format!("{:.2}", r.expense),
                    format!("{:.2}", r.net),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], rows)
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CategorySpend {
    pub category: String,
    pub spent: Decimal,
    /// Share of the month's expense, in percent.
    pub share: Decimal,
}

/// Expense per category for `month` (`YYYY-MM`, default: current month),
/// largest first. Shares add up to 100 up to rounding.
pub fn spend_by_category(store: &LedgerStore, month: Option<&str>) -> Result<Vec<CategorySpend>> {
    let anchor = match month {
        Some(m) => month_start(m)?,
        None => store.today(),
    };
    let (first, last) = month_bounds(anchor);

    let mut agg: HashMap<String, Decimal> = HashMap::new();
    for t in store
        .transactions()
        .iter()
        .filter(|t| t.kind == Kind::Expense && t.date >= first && t.date <= last)
    {
        let cat = if t.category.trim().is_empty() {
            "(uncategorized)".to_string()
        } else {
            t.category.clone()
        };
        let spent = agg.entry(cat).or_insert(Decimal::ZERO);
        *spent = spent.saturating_add(t.amount);
    }
    let total = agg
        .values()
        .copied()
        .fold(Decimal::ZERO, Decimal::saturating_add);

    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(items
        .into_iter()
        .map(|(category, spent)| CategorySpend {
            share: share_of(spent, total),
            category,
            spent,
        })
        .collect())
}

/// `part` as a percentage of `total`, to two places. Divides first so that
/// amounts near the Decimal range do not overflow.
fn share_of(part: Decimal, total: Decimal) -> Decimal {
    part.checked_div(total)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|pct| pct.round_dp(2))
        .unwrap_or(Decimal::ZERO)
}

fn print_spend_by_category(store: &LedgerStore, ccy: &str, sub: &clap::ArgMatches) -> Result<()> {
    let data = spend_by_category(store, arg(sub, "month"))?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|c| {
                vec![
                    c.category.clone(),
                    fmt_money(&c.spent, ccy),
                    format!("{:.2}%", c.share),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Spent", "Share"], rows)
        );
    }
    Ok(())
}
