//! Interactive chat handler
//!
//! Runs the readline loop over a [`ChatSession`], draining the push
//! channel between prompts so server-initiated messages land in the
//! transcript as soon as the user returns to the prompt.

use crate::api::types::{ChatMessage, Role};
use crate::chat::{ChatSession, PushChannel, SocketEvent};
use crate::commands::{api_client, durable_session, read_line};
use crate::config::Config;
use crate::error::{format_error, EchoLedgerError, Result};
use colored::Colorize;
use rustyline::DefaultEditor;

/// Start the interactive chat surface
pub async fn run(config: Config, conversation: Option<String>) -> Result<()> {
    let session = durable_session()?;
    let (Some(token), Some(user)) = (session.access_token(), session.current_user()) else {
        return Err(EchoLedgerError::Validation(
            "Not logged in. Run `echoledger login` first.".to_string(),
        )
        .into());
    };

    let api = api_client(&config, session)?;
    let mut chat = ChatSession::new(api);

    let mut channel = match PushChannel::connect(&config.socket, &token, &user.id).await {
        Ok(channel) => Some(channel),
        Err(e) => {
            // Chat still works over REST alone; only server-initiated
            // messages are lost.
            tracing::warn!("Push channel unavailable: {}", e);
            println!("{}", format!("Push channel unavailable: {}", format_error(&e)).yellow());
            None
        }
    };

    println!("{}", format!("Echo Ledger chat — hello, {}!", user.firstname).bold());
    println!("Commands: /new, /list, /open <id>, /quit\n");

    if let Some(id) = conversation {
        chat.open(&id).await?;
        for message in chat.messages() {
            print_message(message);
        }
    }

    let mut rl = DefaultEditor::new()?;
    loop {
        drain_push(&mut chat, channel.as_mut());

        let Some(line) = read_line(&mut rl, "you> ")? else {
            break;
        };
        if line.is_empty() {
            continue;
        }
        rl.add_history_entry(&line)?;

        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["/quit"] | ["/exit"] => break,
            ["/new"] => {
                chat.new_chat();
                println!("{}", "Started a new conversation.".green());
            }
            ["/list"] => match chat.refresh_conversations().await {
                Ok(conversations) => {
                    if conversations.is_empty() {
                        println!("No conversations yet.");
                    }
                    for summary in conversations {
                        let title = summary.title.as_deref().unwrap_or("(untitled)");
                        println!("  {}  {}", summary.id, title);
                    }
                }
                Err(e) => println!("{}", format_error(&e).red()),
            },
            ["/open", id] => match chat.open(id).await {
                Ok(()) => {
                    for message in chat.messages() {
                        print_message(message);
                    }
                }
                Err(e) => println!("{}", format_error(&e).red()),
            },
            [first, ..] if first.starts_with('/') => {
                println!("{}", format!("Unknown command: {}", first).yellow());
            }
            _ => {
                let before = chat.messages().len();
                chat.send(&line).await?;
                // Skip the echo of the user's own line; print the reply.
                for message in &chat.messages()[(before + 1).min(chat.messages().len())..] {
                    print_message(message);
                }
            }
        }
    }

    Ok(())
}

/// Forward queued push events into the session and print what landed
fn drain_push(chat: &mut ChatSession, channel: Option<&mut PushChannel>) {
    let Some(channel) = channel else {
        return;
    };
    let before = chat.messages().len();
    while let Some(event) = channel.try_next_event() {
        match event {
            SocketEvent::AiTyping { is_typing, .. } => {
                if is_typing {
                    println!("{}", "(assistant is typing...)".dimmed());
                }
            }
            event => chat.handle_push(event),
        }
    }
    let messages = chat.messages();
    for message in &messages[before.min(messages.len())..] {
        print_message(message);
    }
}

fn print_message(message: &ChatMessage) {
    match message.role {
        Role::User => println!("{} {}", "you:".blue(), message.content),
        Role::Assistant => println!("{} {}", "echo:".green(), message.content),
    }
}
