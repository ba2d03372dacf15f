// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use tallybook::{cli, clock::SystemClock, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let mut conn = db::open_or_init()?;
    let mut store = db::load_store(&conn, SystemClock)?;
    let before = store.snapshot();
    let ccy = utils::get_currency(&conn)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            db::save_store(&mut conn, &store)?;
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&mut store, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut store, sub)?,
        Some(("reminder", sub)) => commands::reminders::handle(&mut store, sub)?,
        Some(("report", sub)) => commands::reports::handle(&store, &ccy, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&store, sub)?,
        Some(("import", sub)) => commands::importer::handle(&mut store, sub)?,
        Some(("config", sub)) => commands::config::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&store)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }

    if store.snapshot() != before {
        db::save_store(&mut conn, &store)?;
    }
    Ok(())
}
