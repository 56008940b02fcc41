use serenity::all::GatewayIntents;
use serenity::Client;
use std::env;
use std::sync::Arc;

use page_turner::config::ConfigSettings;
use page_turner::discord_helpers::session::Sessions;
use page_turner::{hey, nay, say, yay};

use crate::discord_handler::Handler;

mod commands;
mod discord_handler;

#[tokio::main]
async fn main() {
    yay!("📖 Page Turner is starting up!");

    if let Err(e) = dotenv::dotenv() {
        hey!("No .env file loaded: {}", e);
    }

    let Ok(token) = env::var("DISCORD_TOKEN") else {
        nay!("DISCORD_TOKEN not found in environment");
        return;
    };

    let config = match ConfigSettings::get() {
        Ok(config) => config,
        Err(e) => {
            nay!("{}", e);
            return;
        }
    };
    say!(
        "Paginator timeout: {:?}, {} page(s) per view",
        config.paginator.timeout_secs,
        config.paginator.per_page
    );

    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let sessions = Sessions::default();

    let Ok(mut client) = Client::builder(token, intents)
        .event_handler(Handler {
            config: Arc::new(config),
            sessions: sessions.clone(),
        })
        .await
    else {
        nay!("Error creating client");
        return;
    };

    // on ctrl+c strip the buttons from every open paginator before going offline
    let shard_manager = Arc::clone(&client.shard_manager);
    let shutdown = sessions.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            nay!("Failed to listen for ctrl+c: {}", e);
            return;
        }
        say!("Shutting down, closing {} paginator(s)...", shutdown.running());
        shutdown.shutdown().await;
        shard_manager.shutdown_all().await;
    });

    if let Err(err) = client.start().await {
        nay!("Client error: {}", err);
    }

    sessions.shutdown().await;
    yay!("Goodbye!");
}
