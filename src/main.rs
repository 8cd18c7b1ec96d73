//! Mailquill - AI-assisted composition for a third-party webmail surface
//!
//! CLI harness around the background service: exercise the generate and
//! improve flows directly, inspect settings, or run the full in-page flow
//! against a synthetic compose window.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use mailquill_agent::{injector, ModalKey, PageAgent};
use mailquill_background::icon::IconSink;
use mailquill_background::{BackgroundService, IconController};
use mailquill_dom::{Document, Layout};
use mailquill_protocols::{Bridge, BridgeRequest, IconState, SourceTag};
use mailquill_settings::{FileStore, SettingsStore};

/// Mailquill CLI.
#[derive(Parser)]
#[command(name = "mailquill")]
#[command(about = "AI-assisted composition for a third-party webmail surface")]
#[command(version)]
struct Cli {
    /// Settings file path
    #[arg(short, long, default_value = "mailquill.json", global = true)]
    settings: PathBuf,

    /// API key override (also read from the environment)
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a reply draft from talking points
    Generate {
        /// Talking points for the reply
        #[arg(long)]
        points: String,

        /// Thread context to ground the draft in
        #[arg(long)]
        context: Option<String>,
    },

    /// Improve a span of text
    Improve {
        /// The text to improve
        #[arg(long)]
        text: String,

        /// Treat the text as mail writing rather than general text
        #[arg(long)]
        mail: bool,
    },

    /// Settings management commands
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Run the full in-page flow against a synthetic compose window
    Demo {
        /// Talking points to submit through the dialog
        #[arg(long, default_value = "thank them and confirm the meeting")]
        points: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the effective settings record
    Show,

    /// Store the API key
    SetKey { key: String },
}

/// Icon sink that logs transitions instead of painting a badge.
struct LogIconSink;

#[async_trait]
impl IconSink for LogIconSink {
    async fn apply(&self, state: IconState) {
        info!(?state, "icon transition");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let store = Arc::new(FileStore::new(&cli.settings));

    if let Some(key) = &cli.api_key {
        let mut settings = store.get().await.context("reading settings")?;
        settings.api_key = key.clone();
        store.set(&settings).await.context("storing API key")?;
    }

    match cli.command {
        Commands::Generate { points, context } => {
            let service = background_service(store);
            let response = service
                .send(BridgeRequest::Generate {
                    talking_points: points,
                    thread_context: context,
                })
                .await;
            match (response.success, response.draft, response.error) {
                (true, Some(draft), _) => println!("{draft}"),
                (_, _, error) => bail!(error.unwrap_or_else(|| "no draft returned".into())),
            }
        }

        Commands::Improve { text, mail } => {
            let service = background_service(store);
            let source = if mail {
                SourceTag::Mail
            } else {
                SourceTag::General
            };
            let response = service
                .send(BridgeRequest::ImproveText {
                    text,
                    thread_context: None,
                    source,
                })
                .await;
            match (response.success, response.text, response.error) {
                (true, Some(improved), _) => println!("{improved}"),
                (_, _, error) => bail!(error.unwrap_or_else(|| "no text returned".into())),
            }
        }

        Commands::Settings { action } => match action {
            SettingsAction::Show => {
                let mut settings = store.get().await.context("reading settings")?;
                if settings.has_api_key() {
                    settings.api_key = "<set>".to_string();
                }
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
            SettingsAction::SetKey { key } => {
                let mut settings = store.get().await.context("reading settings")?;
                settings.api_key = key;
                store.set(&settings).await.context("storing API key")?;
                println!("API key stored");
            }
        },

        Commands::Demo { points } => {
            let service = Arc::new(background_service(store));
            let mut agent = PageAgent::new(compose_page(), service);
            agent.init();

            let Some(region) = agent.regions().first().cloned() else {
                bail!("synthetic page produced no compose region");
            };
            let Some(button) = injector::trigger_button(agent.doc(), region.root) else {
                bail!("injection produced no trigger control");
            };
            agent.click(button).await;

            let Some(input) = agent.doc().focused() else {
                bail!("dialog did not take focus");
            };
            agent.doc_mut().set_value(input, points);
            agent.press_key(ModalKey::Enter { ctrl: true }).await;

            let body = agent.doc().text_content(region.node);
            if body.is_empty() {
                match agent.clipboard().read() {
                    Some(text) => println!("(clipboard) {text}"),
                    None => bail!("the flow produced no draft"),
                }
            } else {
                println!("{body}");
            }
        }
    }

    Ok(())
}

fn background_service(store: Arc<FileStore>) -> BackgroundService {
    let icon = IconController::new(Arc::new(LogIconSink));
    BackgroundService::new(store, icon)
}

/// A minimal mail tab: one thread message and an open compose window.
fn compose_page() -> Document {
    let mut doc = Document::new();
    let root = doc.root();

    let article = doc.create_element("div");
    doc.set_attr(article, "role", "article");
    let message = doc.create_text("Can we move the sync to Friday afternoon?");
    doc.append_child(article, message);
    doc.append_child(root, article);

    let dialog = doc.create_element("div");
    doc.set_attr(dialog, "role", "dialog");
    doc.set_layout(dialog, Layout::sized(600, 500));
    doc.append_child(root, dialog);

    let editor = doc.create_element("div");
    doc.set_attr(editor, "role", "textbox");
    doc.set_attr(editor, "contenteditable", "true");
    doc.set_attr(editor, "aria-label", "Message Body");
    doc.set_layout(editor, Layout::sized(560, 300));
    doc.append_child(dialog, editor);

    let toolbar = doc.create_element("div");
    doc.set_attr(toolbar, "role", "toolbar");
    doc.append_child(dialog, toolbar);
    let send = doc.create_element("div");
    doc.set_attr(send, "role", "button");
    let label = doc.create_text("Send");
    doc.append_child(send, label);
    doc.append_child(toolbar, send);

    doc
}
