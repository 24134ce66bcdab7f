//! SideChat terminal host
//!
//! Runs the conversation sidebar against a local SQLite store and an
//! in-process session. Commands are read from stdin.

use anyhow::Context;
use sidechat_core::{
    default_config_path, CreateOutcome, CurrentUser, LocalSession, Sidebar, SidebarBody,
    SidebarDeps, SidebarSettings, Storage,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod terminal;

use terminal::{LogNavigator, StdinPrompter, StdoutNotifier, StdoutRows};

const USAGE: &str = "usage: sidechat <email> [photo-url]";
const HELP: &str = "commands: new | search <text> | home | signout | quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    New,
    Search(String),
    Home,
    SignOut,
    Quit,
    Unknown(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));
        match word {
            "new" => Command::New,
            "search" => Command::Search(rest.trim().to_string()),
            "home" => Command::Home,
            "signout" => Command::SignOut,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sidechat")
}

fn redraw(sidebar: &Sidebar) {
    let view = sidebar.view();
    terminal::print_header(&view);
    match view.body {
        SidebarBody::Loading => println!("  loading..."),
        SidebarBody::Rows(_) => {
            if sidebar.render(&StdoutRows) == 0 {
                println!("  (no conversations)");
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("SideChat v{}", env!("CARGO_PKG_VERSION"));

    let mut args = std::env::args().skip(1);
    let email = args.next().context(USAGE)?;
    let mut user = CurrentUser::new(email);
    if let Some(photo) = args.next() {
        user = user.with_photo(photo);
    }

    let settings = match default_config_path() {
        Some(path) => SidebarSettings::load_or_default(path)?,
        None => SidebarSettings::default(),
    };

    let store = Arc::new(Storage::new_with_path(data_dir()).context("failed to open storage")?);
    let lines = terminal::stdin_lines();

    let deps = SidebarDeps {
        auth: Arc::new(LocalSession::signed_in(user)),
        store,
        prompter: Arc::new(StdinPrompter::new(lines.clone())),
        notifier: Arc::new(StdoutNotifier),
        navigator: Arc::new(LogNavigator),
    };

    let mut sidebar = Sidebar::new(deps, settings);
    sidebar.mount()?;
    println!("{}", HELP);
    redraw(&sidebar);

    loop {
        tokio::select! {
            updated = sidebar.next_update() => {
                if !updated? {
                    break;
                }
                redraw(&sidebar);
            }
            line = terminal::read_line(&lines) => {
                let Some(line) = line else {
                    break;
                };
                match Command::parse(&line) {
                    Command::New => {
                        if let CreateOutcome::Created(doc_ref) = sidebar.new_chat().await? {
                            info!("Started conversation {}", doc_ref.id);
                        }
                    }
                    Command::Search(text) => {
                        sidebar.set_search(text);
                        redraw(&sidebar);
                    }
                    Command::Home => sidebar.avatar_clicked(),
                    Command::SignOut => {
                        sidebar.sign_out().await?;
                        println!("signed out");
                        break;
                    }
                    Command::Quit => break,
                    Command::Unknown(other) if other.is_empty() => {}
                    Command::Unknown(other) => println!("unknown command '{}'; {}", other, HELP),
                }
            }
        }
    }

    sidebar.unmount();
    Ok(())
}
