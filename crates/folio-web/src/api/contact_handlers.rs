use std::time::Instant;

use axum::extract::State;
use axum::Json;
use folio_core::ContactSubmission;

use crate::dto::*;
use crate::error::AppError;
use crate::state::AppState;

/// Issues a verification code, or checks one when `code` is present.
pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<Json<VerifyEmailResponse>, AppError> {
    let now = Instant::now();

    if let Some(code) = body.code() {
        state
            .contact
            .confirm_code(&body.email, code, now)
            .map_err(|e| AppError::contact(e, "Failed to verify code"))?;

        return Ok(Json(VerifyEmailResponse::Verified {
            verified: true,
            message: "Email verified successfully".to_string(),
        }));
    }

    state
        .contact
        .request_code(&body.email, body.form(), now)
        .await
        .map_err(|e| AppError::contact(e, "Failed to send verification code"))?;

    Ok(Json(VerifyEmailResponse::CodeSent {
        message: "Verification code sent to your email".to_string(),
        requires_verification: true,
    }))
}

/// Forwards a verified submission to the site owner.
pub async fn contact(
    State(state): State<AppState>,
    Json(body): Json<ContactSubmission>,
) -> Result<Json<MessageResponse>, AppError> {
    let delivered = state
        .contact
        .deliver(body, Instant::now())
        .await
        .map_err(|e| AppError::contact(e, "Failed to send email"))?;

    let submission_id = uuid::Uuid::new_v4().to_string();
    tracing::info!("Contact submission {submission_id} forwarded for {}", delivered.email);

    if let Some(notifier) = state.notifier.clone() {
        tokio::spawn(async move {
            if let Err(e) = notifier.notify_delivery(&submission_id, &delivered).await {
                tracing::error!("Failed to post contact notice to Discord: {e}");
            }
        });
    }

    Ok(Json(MessageResponse {
        message: "Email sent successfully!".to_string(),
    }))
}
