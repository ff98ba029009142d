use std::{net::SocketAddr, sync::Arc};

use narration_core::{Narrator, SpeechConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tutor_core::{ConversationStore, GeminiClient, GuestGate, TutorConfig};

use server::config::ServerConfig;
use server::metrics::NarrationMetrics;
use server::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    async_main().await
}

async fn async_main() -> anyhow::Result<()> {
    info!("Starting tutor narration server...");

    let speech_config = SpeechConfig::from_env();
    let narrator = match Narrator::from_config(&speech_config) {
        Ok(narrator) => {
            info!(
                "Speech synthesis via {} (model {}, max chunk {} chars)",
                speech_config.api_url, speech_config.model, speech_config.max_chunk_length
            );
            Some(Arc::new(narrator))
        }
        Err(e) => {
            warn!("Speech synthesis disabled: {e}. Set SARVAM_API_KEY to enable narration.");
            None
        }
    };

    let tutor_config = TutorConfig::from_env();
    let tutor = match GeminiClient::new(&tutor_config) {
        Ok(client) => {
            info!("Tutor model: {}", tutor_config.model);
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("Tutor disabled: {e}. Set GEMINI_API_KEY to enable replies.");
            None
        }
    };

    let config = ServerConfig::from_env();
    info!(
        "Server configuration loaded: port={}, request_timeout={}s, llm_timeout={}s, narration_timeout={}s, narration_failure={:?}",
        config.port,
        config.request_timeout_secs,
        config.llm_timeout_secs,
        config.narration_timeout_secs,
        config.narration_failure
    );

    let state = AppState {
        narrator,
        tutor,
        conversations: ConversationStore::new(),
        gate: GuestGate::new(tutor_config.guest_message_limit),
        metrics: NarrationMetrics::new(),
        config: config.clone(),
    };

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!("Failed to bind {addr}: {e}. Try a different PORT.")
    })?;

    info!("Server listening on http://{addr}");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
