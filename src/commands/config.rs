// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{arg, get_currency, set_currency};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("currency", sub)) => match arg(sub, "set") {
            Some(ccy) => {
                let ccy = ccy.to_uppercase();
                if ccy.len() != 3 || !ccy.chars().all(|c| c.is_ascii_alphabetic()) {
                    bail!("Invalid currency code '{}', expected e.g. USD", ccy);
                }
                set_currency(conn, &ccy)?;
                println!("Display currency set to {}", ccy);
            }
            None => println!("{}", get_currency(conn)?),
        },
        _ => {}
    }
    Ok(())
}
