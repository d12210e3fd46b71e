//! PetShop terminal client - Main entry point

mod app;
mod commands;
mod display;

use app::App;
use commands::parse_input;
use display::TerminalSink;
use petshop_core::ClientConfig;
use petshop_engine::{spawn_chat_client, ChatClient};
use petshop_networking::{PetShopClient, WsTransport};
use petshop_persistence::{sqlite, Database};
use std::ops::ControlFlow;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of the chat view
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "petshop=info,petshop_engine=info,petshop_networking=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    tracing::info!("Starting PetShop client against {}", config.base_url);

    let http = PetShopClient::new(&config.base_url)?;

    // The client still works without saved state, it just forgets logins
    let db = match Database::connect(&config.database_path()).await {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!("Client state unavailable: {}", e);
            None
        }
    };

    let (mut client, events) = ChatClient::new(WsTransport::new(), TerminalSink, &config);

    if let Some(db) = &db {
        match sqlite::restore_identity(db.pool()).await {
            Ok(Some(identity)) => {
                client.restore(&identity);
                println!("Welcome back, {}", identity);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Could not restore saved login: {}", e),
        }
    }

    client.schedule_startup_connect();
    let (chat, chat_task) = spawn_chat_client(client, events);

    let mut app = App::new(http, db, chat.clone());
    app.show_products(None).await;
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if let ControlFlow::Break(()) = app.handle(parse_input(&line)).await {
            break;
        }
    }

    chat.stop();
    if let Err(e) = chat_task.await {
        tracing::error!("Chat client task failed: {}", e);
    }

    tracing::info!("PetShop client stopped");
    Ok(())
}
