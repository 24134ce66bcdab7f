//! Terminal implementations of the sidebar collaborators

use async_trait::async_trait;
use sidechat_core::{ConversationRow, Navigator, Notifier, Prompter, RowRenderer, SidebarView};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tracing::info;

/// Shared line reader over stdin
pub type InputLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn stdin_lines() -> InputLines {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

/// Reads the next stdin line, `None` on EOF or read error
pub async fn read_line(lines: &InputLines) -> Option<String> {
    lines.lock().await.next_line().await.ok().flatten()
}

pub struct StdinPrompter {
    lines: InputLines,
}

impl StdinPrompter {
    pub fn new(lines: InputLines) -> Self {
        Self { lines }
    }
}

#[async_trait]
impl Prompter for StdinPrompter {
    async fn prompt(&self, message: &str) -> Option<String> {
        println!("{}", message);
        read_line(&self.lines).await
    }
}

pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn alert(&self, message: &str) {
        println!("! {}", message);
    }
}

pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn push(&self, path: &str) {
        info!("Navigate to {}", path);
        println!("-> {}", path);
    }
}

pub struct StdoutRows;

impl RowRenderer for StdoutRows {
    fn render_row(&self, row: &ConversationRow) {
        let recipient = row.recipient.as_deref().unwrap_or("(no recipient)");
        println!("  [{}] {}", row.id, recipient);
    }
}

/// Print the header and search box of a sidebar view
pub fn print_header(view: &SidebarView) {
    let avatar = view.header.avatar.as_deref().unwrap_or("no photo");
    println!("== {} ({})", view.header.email, avatar);
    if view.search.is_empty() {
        println!("   search: <{}>", view.search_placeholder);
    } else {
        println!("   search: {}", view.search);
    }
}
