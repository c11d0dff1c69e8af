use super::{finish, trades::load_items_quietly};
use crate::render;
use market_application::{AppContext, Dialog, MessagePoller, TradeUseCase};
use market_core::message::Message;
use market_core::MarketError;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const QUIT_COMMAND: &str = "/quit";

/// Interactive conversation for one transaction.
///
/// The thread refreshes in the background while the user types; the loop
/// ends on `/quit` or end of input, which closes the conversation.
pub async fn run(ctx: &Arc<AppContext>, transaction_id: i64) -> bool {
    let trades = TradeUseCase::new(ctx.clone());
    if let Err(e) = trades.load_transactions().await {
        return finish(ctx, "Load transactions", Err(e));
    }
    load_items_quietly(ctx).await;

    let poller = MessagePoller::new(
        ctx.gateways.messages.clone(),
        ctx.notifier.clone(),
        ctx.config.poll_interval(),
    );
    let header = match trades.open_conversation(&poller, transaction_id).await {
        Ok(header) => header,
        Err(e) => return finish(ctx, "Open conversation", Err(e)),
    };
    let viewer = match ctx.session.current().await {
        Some(session) => session.username,
        None => return finish(ctx, "Open conversation", Err(MarketError::Unauthenticated)),
    };

    let mut dialog = Dialog::open(format!("Transaction #{}", transaction_id));
    {
        let poller = poller.clone();
        dialog.on_close(move || poller.close());
    }

    render::conversation_header(&header);
    let mut thread_rx = poller.subscribe();
    let mut shown: Vec<Message> = Vec::new();
    if let Some(snapshot) = thread_rx.borrow_and_update().clone() {
        render::thread_update(&shown, &snapshot, &viewer);
        shown = snapshot.messages;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = thread_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = thread_rx.borrow_and_update().clone();
                if let Some(snapshot) = snapshot {
                    render::thread_update(&shown, &snapshot, &viewer);
                    shown = snapshot.messages;
                }
            }
            line = lines.next_line() => {
                let mut line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("[Chat] Failed to read input: {}", e);
                        break;
                    }
                };
                if line.trim() == QUIT_COMMAND {
                    break;
                }
                // Errors were already shown by the poller.
                let _ = poller.send(&mut line).await;
            }
        }
    }

    dialog.close();
    true
}
