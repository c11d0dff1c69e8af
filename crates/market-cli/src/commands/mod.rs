pub mod account;
pub mod chat;
pub mod items;
pub mod trades;

pub use items::ItemsAction;
pub use trades::{FavoritesAction, TradesAction};

use market_application::AppContext;
use std::io::{self, BufRead, Write};

/// Reports a failed command to the user. Returns whether it succeeded.
pub fn finish(ctx: &AppContext, action: &str, result: market_core::Result<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            ctx.report(action, &err);
            false
        }
    }
}

/// Reads one line from stdin after printing `label`.
pub fn prompt(label: &str) -> io::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
