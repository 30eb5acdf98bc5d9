use async_trait::async_trait;
use gloo_net::http::{Request, Response};
use gloo_timers::future::TimeoutFuture;
use serde::de::DeserializeOwned;
use shared::{
    bounded, AdminLogin, AdminSession, ErrorResponse, Party, PartyDirectory, PartyDraft,
    ResetSummary, ResultsSummary, VoteFailure,
};
use uuid::Uuid;
use crate::config::CONFIG;
use crate::storage;

fn url(path: &str) -> String {
    format!("{}{}", CONFIG.api_base_url, path)
}

async fn error_message(response: &Response) -> String {
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("Request failed with status {}", response.status()),
    }
}

/// The election server as seen by the voting booth.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HttpDirectory;

impl HttpDirectory {
    async fn read_party_response<T: DeserializeOwned>(response: Response) -> Result<T, VoteFailure> {
        match response.status() {
            200..=299 => response.json::<T>().await
                // The server answered success, so the request may well have been applied.
                .map_err(|e| VoteFailure::NetworkError(format!("unreadable response: {}", e))),
            404 => Err(VoteFailure::NotFound),
            _ => Err(VoteFailure::ServerRejected(error_message(&response).await)),
        }
    }
}

#[async_trait(?Send)]
impl PartyDirectory for HttpDirectory {
    async fn list_parties(&self) -> Result<Vec<Party>, VoteFailure> {
        let response = Request::get(&url("/parties"))
            .send()
            .await
            .map_err(|e| VoteFailure::NetworkError(e.to_string()))?;
        Self::read_party_response(response).await
    }

    async fn increment_vote(&self, party_id: Uuid) -> Result<Party, VoteFailure> {
        let call = async move {
            match Request::post(&url(&format!("/vote/{}", party_id))).send().await {
                Ok(response) => Self::read_party_response::<Party>(response).await,
                Err(e) => Err(VoteFailure::NetworkError(e.to_string())),
            }
        };
        bounded(call, TimeoutFuture::new(CONFIG.vote_timeout_ms)).await
    }
}

async fn send(request: Request) -> Result<Response, String> {
    let response = request.send().await.map_err(|e| e.to_string())?;
    if response.ok() {
        return Ok(response);
    }
    if response.status() == 401 {
        storage::clear_admin_token();
    }
    Err(error_message(&response).await)
}

async fn send_json<T: DeserializeOwned>(request: Request) -> Result<T, String> {
    let response = send(request).await?;
    response.json::<T>().await.map_err(|e| format!("Failed to parse response: {}", e))
}

fn authorized(request: Request, token: &str) -> Request {
    request.header("Authorization", &format!("Bearer {}", token))
}

pub async fn fetch_results() -> Result<ResultsSummary, String> {
    send_json(Request::get(&url("/results"))).await
}

pub async fn fetch_parties_by_votes() -> Result<Vec<Party>, String> {
    send_json(Request::get(&url("/parties?sort=votes"))).await
}

pub async fn admin_login(secret: String) -> Result<AdminSession, String> {
    let request = Request::post(&url("/admin/login"))
        .json(&AdminLogin { secret })
        .map_err(|e| e.to_string())?;
    send_json(request).await
}

pub async fn check_session(token: &str) -> Result<(), String> {
    send(authorized(Request::get(&url("/admin/session")), token)).await.map(|_| ())
}

pub async fn admin_logout(token: &str) -> Result<(), String> {
    send(authorized(Request::post(&url("/admin/logout")), token)).await.map(|_| ())
}

pub async fn create_party(token: &str, draft: &PartyDraft) -> Result<Party, String> {
    let request = authorized(Request::post(&url("/parties")), token)
        .json(draft)
        .map_err(|e| e.to_string())?;
    send_json(request).await
}

pub async fn update_party(token: &str, id: Uuid, draft: &PartyDraft) -> Result<Party, String> {
    let request = authorized(Request::put(&url(&format!("/parties/{}", id))), token)
        .json(draft)
        .map_err(|e| e.to_string())?;
    send_json(request).await
}

pub async fn delete_party(token: &str, id: Uuid) -> Result<Party, String> {
    send_json(authorized(Request::delete(&url(&format!("/parties/{}", id))), token)).await
}

pub async fn reset_party(token: &str, id: Uuid) -> Result<Party, String> {
    send_json(authorized(Request::post(&url(&format!("/parties/{}/reset", id))), token)).await
}

pub async fn reset_all(token: &str) -> Result<ResetSummary, String> {
    send_json(authorized(Request::post(&url("/parties/reset")), token)).await
}
