//! HTTP surface: the webhook intake endpoint and a static-file route for
//! the alert transport's bundled images.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use dryrun_harness::{harness, DryRunRequest};
use github_client::WebhookEventKind;
use reconciler::alert::MessageBuilder;
use webhook_engine::{handle_delivery, Outcome};

use crate::state::AppState;
use crate::tracing_alert::TracingAlertTransport;
use crate::{hmac_verify, Error};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(receive_webhook))
        .route("/static/*path", get(serve_static))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn receive_webhook(State(state): State<Arc<AppState>>, headers: HeaderMap, body: Bytes) -> impl IntoResponse {
    let Some(signature) = header_str(&headers, "X-Hub-Signature-256") else {
        return (StatusCode::UNAUTHORIZED, "missing X-Hub-Signature-256").into_response();
    };
    if !hmac_verify::verify(&state.webhook_secret, &body, signature) {
        return (StatusCode::UNAUTHORIZED, "invalid signature").into_response();
    }
    let Some(event_header) = header_str(&headers, "X-GitHub-Event") else {
        return (StatusCode::BAD_REQUEST, "missing X-GitHub-Event").into_response();
    };
    let delivery_id = header_str(&headers, "X-GitHub-Delivery").unwrap_or("unknown").to_string();
    let kind = WebhookEventKind::from_header(event_header);
    let body = body.to_vec();
    let owner_login = extract_owner_login(&body).unwrap_or_else(|| state.config_org.clone());

    // GitHub retries deliveries that don't get a prompt response; dry-run
    // polling alone can take up to a minute, so acknowledge immediately and
    // finish the work in the background.
    tokio::spawn(async move {
        if let Err(e) = dispatch(state, kind, delivery_id.clone(), body, owner_login).await {
            tracing::error!(delivery_id, error = %e, "failed to process webhook delivery");
        }
    });

    StatusCode::ACCEPTED.into_response()
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn extract_owner_login(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("repository")
        .and_then(|r| r.get("owner"))
        .and_then(|o| o.get("login"))
        .or_else(|| value.get("organization").and_then(|o| o.get("login")))
        .and_then(|login| login.as_str())
        .map(str::to_string)
}

async fn dispatch(
    state: Arc<AppState>,
    kind: WebhookEventKind,
    delivery_id: String,
    body: Vec<u8>,
    owner_login: String,
) -> Result<(), Error> {
    let cache = state.cache_for(&owner_login);
    let ctx = state.engine_config();
    let outcome = handle_delivery(kind, &delivery_id, &body, cache, &state.configs, &ctx).await?;

    match outcome {
        Outcome::Alert(message) => flush_alert(message).await,
        Outcome::DryRun { owner, repo, pr_number, head_sha } => {
            start_dry_run(&state, &owner, &repo, pr_number, &head_sha).await?
        }
        Outcome::NoAction => {}
    }
    Ok(())
}

async fn flush_alert(message: MessageBuilder) {
    message.flush(&TracingAlertTransport).await;
}

async fn start_dry_run(
    state: &Arc<AppState>,
    owner: &str,
    repo: &str,
    pr_number: u64,
    head_sha: &str,
) -> Result<(), Error> {
    let merge_sha = harness::poll_for_merge_sha(&state.dry_run_client, owner, repo, pr_number).await?;
    let Some(merge_sha) = merge_sha else {
        harness::post_no_merge_sha_check(&state.dry_run_client, owner, repo, head_sha).await?;
        return Ok(());
    };

    let check_run_id = harness::post_in_progress_check(&state.dry_run_client, owner, repo, head_sha).await?;
    let request = DryRunRequest {
        config_org: state.config_org.clone(),
        config_repo: state.config_repo.clone(),
        config_path: state.config_path.clone(),
        pr_number,
        head_sha: head_sha.to_string(),
        reconciler_binary: state.reconciler_binary.clone(),
    };
    state.dry_run_queue.enqueue(request, merge_sha, check_run_id);
    Ok(())
}

async fn serve_static(Path(path): Path<String>) -> impl IntoResponse {
    tracing::debug!(path, "static asset requested; none are bundled");
    StatusCode::NOT_FOUND
}
