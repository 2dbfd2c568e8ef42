//! Reading normalizer.
//!
//! Ordered degradation tiers: missing configuration, provider failure,
//! unusable envelope, field-level content repair. The first applicable tier
//! decides the response and every tier ends in a fully-formed reading, so
//! the handler never surfaces a downstream failure to the caller.

use oracle_common::{
    build_user_prompt, Diagnostic, GenerateClient, ProviderError, Question, Reading,
    ReadingResponse, SYSTEM_PROMPT,
};
use tracing::{info, warn};

/// Produce a reading for the question, degrading through the tier chain as
/// needed. `client` is `None` when the deployment has no provider
/// credential; that tier answers without attempting a call.
pub async fn produce_reading(
    client: Option<&dyn GenerateClient>,
    question: &Question,
) -> ReadingResponse {
    let Some(client) = client else {
        warn!("[!]  no provider credential, serving configuration fallback");
        return ReadingResponse::degraded(
            Reading::missing_config(),
            Diagnostic::config("missing provider API key"),
        );
    };

    let user_prompt = build_user_prompt(question);
    match client.generate(SYSTEM_PROMPT, &user_prompt).await {
        Ok(content) => {
            let reading = Reading::repair(&content);
            info!("[A]  reading ready ({}%)", reading.odds);
            ReadingResponse::ok(reading)
        }
        // No usable content is the same failure mode as unparseable
        // content: fall through to the neutral defaults, no diagnostic.
        Err(ProviderError::Envelope(raw)) => {
            warn!("[-]  unusable provider envelope ({} chars)", raw.len());
            ReadingResponse::ok(Reading::neutral())
        }
        Err(ProviderError::Status { status, body }) => {
            warn!("[-]  provider status {}", status);
            ReadingResponse::degraded(
                Reading::provider_error(),
                Diagnostic::provider_status(status, &body),
            )
        }
        Err(ProviderError::Transport(message)) => {
            warn!("[-]  provider transport failure: {}", message);
            ReadingResponse::degraded(
                Reading::provider_error(),
                Diagnostic::provider_transport(&message),
            )
        }
    }
}
