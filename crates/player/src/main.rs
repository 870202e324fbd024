//! Mafen Player - composition root binary.
//!
//! Logs in with the configured account, optionally enters the game as the
//! configured character, and logs session events until interrupted.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mafen_player::{AppConfig, MessageKind, ServerMessage, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mafen_player=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Mafen Player");

    let config = AppConfig::from_env()?;
    let session = Session::websocket(config.session.clone());

    session.reset_session();

    session.on(MessageKind::Character, |message| {
        if let ServerMessage::Character { name } = message {
            tracing::info!(character = %name, "Character available");
        }
    });
    let for_meters = session.clone();
    session.on(MessageKind::Meter, move |message| {
        if let ServerMessage::Meter { id, .. } = message {
            tracing::info!(
                item_id = %id,
                progress = %for_meters.progress_description(*id),
                weight = for_meters.total_carried_weight(),
                "Study progress"
            );
        }
    });
    let for_chats = session.clone();
    session.on(MessageKind::Msg, move |message| {
        if let ServerMessage::Msg { chat, from, text } = message {
            let channel = for_chats
                .chat(*chat)
                .map(|c| c.name)
                .unwrap_or_else(|| chat.to_string());
            tracing::info!(%channel, %from, "{}", text);
        }
    });

    session.open_connection(&config.server_url)?;
    session
        .login(&config.username, &config.password)
        .await
        .context("Authentication failed")?;

    if let Some(character) = config.character.clone() {
        tracing::info!(%character, "Entering game");
        session.play(character);
    }

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;
    session.logout();
    Ok(())
}
