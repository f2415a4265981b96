//! Main chat loop orchestration.
//!
//! Input and rendering run side by side: the loop awaits lines and submits
//! them to the surface, while a render task follows the surface's `watch`
//! channel and prints whatever changed.

use std::io::Write;

use console::style;
use rustyline_async::SharedWriter;
use tokio::sync::watch;

use relaychat_core::chat::surface::{ChatSurface, SurfaceSnapshot};
use relaychat_infra::transport::HttpChatTransport;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::{TranscriptRenderer, TypingIndicator};

/// Run the interactive chat loop against the relay at `base_url`.
pub async fn run_chat_loop(base_url: &str) -> anyhow::Result<()> {
    let transport = HttpChatTransport::new(base_url);
    print_welcome_banner(transport.endpoint());

    let surface = ChatSurface::new(transport);
    let (mut chat_input, writer) = ChatInput::new()?;
    let render_task = tokio::spawn(render_updates(surface.subscribe(), writer));

    loop {
        let text = match chat_input.read_line().await {
            InputEvent::Line(text) => text,
            InputEvent::Eof | InputEvent::Interrupted => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
        };

        let outcome = match commands::parse(&text) {
            Some(ChatCommand::Help) => {
                commands::print_help();
                continue;
            }
            Some(ChatCommand::Clear) => {
                chat_input.clear();
                continue;
            }
            Some(ChatCommand::Exit) => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            Some(ChatCommand::Unknown(cmd)) => {
                println!(
                    "\n  {} Unknown command: {}. Type /help for available commands.\n",
                    style("?").yellow().bold(),
                    style(cmd).dim()
                );
                continue;
            }
            Some(ChatCommand::ThumbsUp) => surface.submit_quick_reply().await,
            None => surface.submit(&text).await,
        };

        tracing::debug!(?outcome, turns = surface.snapshot().messages.len(), "turn finished");
    }

    render_task.abort();
    chat_input.flush();
    Ok(())
}

/// Print snapshot changes until the surface goes away.
async fn render_updates(mut updates: watch::Receiver<SurfaceSnapshot>, mut writer: SharedWriter) {
    let mut renderer = TranscriptRenderer::new();
    let mut typing = TypingIndicator::default();

    while updates.changed().await.is_ok() {
        let snapshot = updates.borrow_and_update().clone();
        typing.update(snapshot.status);

        let out = renderer.catch_up(&snapshot);
        if !out.is_empty() {
            let _ = write!(writer, "{out}");
            let _ = writer.flush();
        }
    }
}
