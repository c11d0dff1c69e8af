//! Terminal rendering of marketplace data.

use chrono::{DateTime, Local};
use colored::Colorize;
use market_application::{ConversationHeader, Profile, ThreadSnapshot};
use market_core::item::Item;
use market_core::message::Message;
use market_core::stats::SystemStats;
use market_core::transaction::Transaction;
use market_core::user::Session;

pub fn format_time(unix_secs: i64) -> String {
    DateTime::from_timestamp(unix_secs, 0)
        .map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn format_price(price: f64) -> String {
    format!("¥{:.2}", price)
}

fn format_count(value: Option<u64>) -> String {
    value.map_or_else(|| "-".to_string(), |n| n.to_string())
}

pub fn item_list(items: &[Item]) {
    if items.is_empty() {
        println!("{}", "No items".bright_black());
        return;
    }
    for item in items {
        println!(
            "{:>5}  {:<28}  {:>10}  {:<12}  {:<10}  {}",
            format!("#{}", item.id).bright_black(),
            item.title.bold(),
            format_price(item.price).green(),
            item.category_name
                .clone()
                .unwrap_or_else(|| item.category().label().to_string()),
            item.status,
            item.owner_username.cyan()
        );
    }
}

pub fn item_detail(item: &Item) {
    println!("{} {}", format!("#{}", item.id).bright_black(), item.title.bold());
    println!("  Price:     {}", format_price(item.price).green());
    println!("  Category:  {}", item.category());
    println!("  Status:    {}", item.status);
    println!("  Condition: {}", item.condition);
    println!("  Seller:    {}", item.owner_username.cyan());
    if let Some(published) = item.publish_time {
        println!("  Published: {}", format_time(published));
    }
    println!(
        "  Image:     {}",
        if item.image_path.is_some() { "yes" } else { "none" }
    );
    if !item.description.is_empty() {
        println!();
        println!("{}", item.description);
    }
}

pub fn transaction_list(transactions: &[Transaction], viewer: &str) {
    if transactions.is_empty() {
        println!("{}", "No transactions".bright_black());
        return;
    }
    for t in transactions {
        let role = if t.buyer_username == viewer { "buying" } else { "selling" };
        println!(
            "{:>5}  item #{:<5}  {:>10}  {:<10}  {:<8} with {}  {}",
            format!("#{}", t.id).bright_black(),
            t.item_id,
            format_price(t.price).green(),
            t.status,
            role,
            t.counterpart_of(viewer).cyan(),
            format_time(t.create_time).bright_black()
        );
    }
}

pub fn transaction_detail(t: &Transaction, item_title: &str, viewer: &str) {
    println!("{} {}", format!("Transaction #{}", t.id).bold(), item_title);
    println!("  Seller:    {}", t.seller_username);
    println!("  Buyer:     {}", t.buyer_username);
    println!("  Price:     {}", format_price(t.price).green());
    println!("  Status:    {}", t.status);
    println!("  Created:   {}", format_time(t.create_time));
    if let Some(done) = t.completed_at() {
        println!("  Completed: {}", format_time(done));
    }
    let next: Vec<&str> = t.status.next_statuses().iter().map(|s| s.label()).collect();
    if !next.is_empty() {
        println!("  Next:      {}", next.join(", "));
    }
    println!("  Chat:      campus-market chat {}  (as {})", t.id, viewer);
}

pub fn session(session: &Session) {
    println!("{}", session.username.bold());
    println!("  Email:       {}", session.email);
    println!("  Phone:       {}", session.phone);
    println!("  Student ID:  {}", session.student_id);
    println!("  Credit:      {}", session.credit_score);
}

pub fn profile(profile: &Profile) {
    session(&profile.session);
    println!("  My items:    {}", profile.stats.my_items);
    println!("  Completed:   {}", profile.stats.completed_transactions);
    println!("  Favorites:   {}", profile.stats.favorites);
}

pub fn system_stats(stats: &SystemStats) {
    println!("Users:        {}", format_count(stats.users));
    println!("Items:        {}", format_count(stats.items));
    println!("Transactions: {}", format_count(stats.transactions));
}

pub fn conversation_header(header: &ConversationHeader) {
    println!(
        "{} {} · {}",
        "Conversation with".bold(),
        header.counterpart.cyan(),
        header.item_title
    );
    println!("{}", "Type a message and press Enter; /quit to leave.".bright_black());
}

fn message(message: &Message, viewer: &str) {
    let author = if message.is_sent_by(viewer) {
        "me".green()
    } else {
        message.sender_username.cyan()
    };
    println!(
        "{} {}: {}",
        format_time(message.send_time).bright_black(),
        author,
        message.content
    );
}

/// Messages of `next` that still have to be printed after `shown`.
///
/// When `next` extends `shown` only the tail is new; otherwise the whole
/// thread is printed again.
pub fn unseen<'a>(shown: &[Message], next: &'a [Message]) -> (bool, &'a [Message]) {
    if next.len() >= shown.len() && next[..shown.len()] == *shown {
        (false, &next[shown.len()..])
    } else {
        (true, next)
    }
}

/// Prints the part of `snapshot` the user has not seen yet.
pub fn thread_update(shown: &[Message], snapshot: &ThreadSnapshot, viewer: &str) {
    let (reprint, fresh) = unseen(shown, &snapshot.messages);
    if reprint {
        println!("{}", "----".bright_black());
    }
    for m in fresh {
        message(m, viewer);
    }
}
