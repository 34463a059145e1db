//! Webhook server entry point.

use std::sync::Arc;

use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chatbot_dialogue::adapters::http::webhook::{
    webhook_router, TelegramWebhookSettings, WebhookAppState, WhatsAppWebhookSettings,
};
use chatbot_dialogue::adapters::{
    FileStateStore, FileTranscriptStore, InMemoryStateStore, InMemoryTranscriptStore,
    TelegramClient, TelegramClientConfig, WhatsAppClient, WhatsAppClientConfig,
};
use chatbot_dialogue::application::handlers::HandleInboundMessageHandler;
use chatbot_dialogue::config::{AppConfig, StorageBackend};
use chatbot_dialogue::domain::foundation::Channel;
use chatbot_dialogue::ports::{StateStore, TranscriptStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let engine = Arc::new(config.dialogue.load_engine()?);

    let storage = &config.storage;
    let (state_store, transcripts): (Arc<dyn StateStore>, Arc<dyn TranscriptStore>) =
        match storage.backend {
            StorageBackend::Memory => (
                Arc::new(InMemoryStateStore::new()) as Arc<dyn StateStore>,
                Arc::new(InMemoryTranscriptStore::new()) as Arc<dyn TranscriptStore>,
            ),
            StorageBackend::File => (
                Arc::new(FileStateStore::new(storage.state_dir())) as Arc<dyn StateStore>,
                Arc::new(FileTranscriptStore::new(storage.transcript_dir())) as Arc<dyn TranscriptStore>,
            ),
        };

    let mut handler = HandleInboundMessageHandler::new(engine, state_store);
    if storage.record_transcripts {
        handler = handler.with_transcripts(transcripts);
    }

    let mut telegram_settings = None;
    if let Some(telegram) = &config.telegram {
        let client = Arc::new(TelegramClient::new(
            TelegramClientConfig::new(telegram.bot_token.clone())
                .with_api_base_url(telegram.api_base_url.clone())
                .with_media_dir(&storage.media_dir)
                .with_timeout(telegram.timeout()),
        )?);
        handler = handler.with_sender(client.clone());
        if storage.download_media {
            handler = handler.with_downloader(Channel::Telegram, client);
        }
        telegram_settings = Some(TelegramWebhookSettings {
            secret_token: telegram.secret_token.clone(),
        });
    }

    let mut whatsapp_settings = None;
    if let Some(whatsapp) = &config.whatsapp {
        let client = Arc::new(WhatsAppClient::new(
            WhatsAppClientConfig::new(
                whatsapp.access_token.clone(),
                whatsapp.phone_number_id.clone(),
            )
            .with_graph_base_url(whatsapp.graph_base_url.clone())
            .with_media_dir(&storage.media_dir)
            .with_timeout(whatsapp.timeout()),
        )?);
        handler = handler.with_sender(client.clone());
        if storage.download_media {
            handler = handler.with_downloader(Channel::WhatsApp, client);
        }
        whatsapp_settings = Some(WhatsAppWebhookSettings {
            verify_token: whatsapp.verify_token.clone(),
            app_secret: whatsapp.app_secret.clone(),
        });
    }

    let mut state = WebhookAppState::new(Arc::new(handler));
    if let Some(settings) = telegram_settings {
        state = state.with_telegram(settings);
    }
    if let Some(settings) = whatsapp_settings {
        state = state.with_whatsapp(settings);
    }

    let app = webhook_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, backend = ?storage.backend, "Webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Webhook server stopped");
    Ok(())
}

/// `RUST_LOG` overrides the configured filter.
fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
