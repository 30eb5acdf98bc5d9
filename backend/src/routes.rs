use std::sync::Arc;
use rocket::{State, get, post, put, delete, http::Status, serde::json::Json};
use tracing::{debug, info, warn, instrument};
use rustrict::CensorStr;
use sqlx::PgPool;
use shared::{
    models::*,
    results::summarize,
    user_info::ClientInfo,
    validation::validate_party_draft,
};
use crate::{
    admin::{AdminCredentials, AdminSessions, AdminToken},
    error::ApiError,
    rate_limiter::RateLimiter,
    store::{PartyOrder, PartyStore},
    utils::parse_party_id,
};

const LOGIN_MAX_ATTEMPTS: u32 = 5;
const LOGIN_WINDOW_MINUTES: i64 = 15;

pub struct AppState {
    pub db: PgPool,
    pub credentials: AdminCredentials,
    pub sessions: Arc<AdminSessions>,
    pub login_limiter: RateLimiter,
}

impl AppState {
    pub fn new(pool: PgPool, credentials: AdminCredentials) -> Self {
        Self {
            db: pool,
            credentials,
            sessions: Arc::new(AdminSessions::default()),
            login_limiter: RateLimiter::new(LOGIN_MAX_ATTEMPTS, LOGIN_WINDOW_MINUTES),
        }
    }
}

fn screen_draft(draft: &PartyDraft) -> Result<(), ApiError> {
    if draft.name.is_inappropriate() {
        return Err(ApiError::Inappropriate("party name"));
    }

    for (field, text) in [("slogan", &draft.slogan), ("description", &draft.description)] {
        if text.as_deref().map_or(false, |t| t.is_inappropriate()) {
            return Err(ApiError::Inappropriate(field));
        }
    }

    Ok(())
}

/// Normalizes, validates and screens an admin-submitted party.
pub fn prepare_draft(draft: PartyDraft) -> Result<PartyDraft, ApiError> {
    let draft = draft.normalized();
    validate_party_draft(&draft)?;
    screen_draft(&draft)?;
    Ok(draft)
}

#[get("/parties?<sort>")]
pub async fn list_parties(state: &State<AppState>, sort: Option<&str>) -> Result<Json<Vec<Party>>, ApiError> {
    let order = PartyOrder::parse(sort)?;
    Ok(Json(PartyStore::list(&state.db, order).await?))
}

#[get("/parties/<id>")]
pub async fn get_party(state: &State<AppState>, id: &str) -> Result<Json<Party>, ApiError> {
    let party_id = parse_party_id(id)?;
    PartyStore::get(&state.db, party_id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[instrument(skip(state), fields(party_id = %id))]
#[post("/vote/<id>")]
pub async fn cast_vote(state: &State<AppState>, id: &str) -> Result<Json<Party>, ApiError> {
    let party_id = parse_party_id(id)?;

    match PartyStore::increment_votes(&state.db, party_id).await? {
        Some(party) => {
            info!(votes = party.votes, "Vote recorded for {}", party.name);
            Ok(Json(party))
        }
        None => {
            debug!("Vote for unknown party");
            Err(ApiError::NotFound)
        }
    }
}

#[get("/results")]
pub async fn results(state: &State<AppState>) -> Result<Json<ResultsSummary>, ApiError> {
    let parties = PartyStore::list(&state.db, PartyOrder::Created).await?;
    Ok(Json(summarize(&parties)))
}

#[instrument(skip(state, _admin, draft))]
#[post("/parties", format = "json", data = "<draft>")]
pub async fn create_party(
    state: &State<AppState>,
    _admin: AdminToken,
    draft: Json<PartyDraft>,
) -> Result<(Status, Json<Party>), ApiError> {
    let draft = prepare_draft(draft.into_inner())?;
    let party = PartyStore::create(&state.db, &draft).await?;
    info!(party_id = %party.id, "Created party {}", party.name);
    Ok((Status::Created, Json(party)))
}

#[instrument(skip(state, _admin, draft), fields(party_id = %id))]
#[put("/parties/<id>", format = "json", data = "<draft>")]
pub async fn update_party(
    state: &State<AppState>,
    _admin: AdminToken,
    id: &str,
    draft: Json<PartyDraft>,
) -> Result<Json<Party>, ApiError> {
    let party_id = parse_party_id(id)?;
    let draft = prepare_draft(draft.into_inner())?;
    PartyStore::update(&state.db, party_id, &draft)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

#[instrument(skip(state, _admin), fields(party_id = %id))]
#[delete("/parties/<id>")]
pub async fn delete_party(state: &State<AppState>, _admin: AdminToken, id: &str) -> Result<Json<Party>, ApiError> {
    let party_id = parse_party_id(id)?;
    let party = PartyStore::delete(&state.db, party_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!("Deleted party {} with {} votes", party.name, party.votes);
    Ok(Json(party))
}

#[instrument(skip(state, _admin), fields(party_id = %id))]
#[post("/parties/<id>/reset")]
pub async fn reset_party_votes(state: &State<AppState>, _admin: AdminToken, id: &str) -> Result<Json<Party>, ApiError> {
    let party_id = parse_party_id(id)?;
    let party = PartyStore::reset_votes(&state.db, party_id)
        .await?
        .ok_or(ApiError::NotFound)?;
    info!("Reset votes for {}", party.name);
    Ok(Json(party))
}

#[instrument(skip(state, _admin))]
#[post("/parties/reset")]
pub async fn reset_all_votes(state: &State<AppState>, _admin: AdminToken) -> Result<Json<ResetSummary>, ApiError> {
    let parties_reset = PartyStore::reset_all(&state.db).await?;
    warn!("Reset votes for all {} parties", parties_reset);
    Ok(Json(ResetSummary { parties_reset }))
}

#[post("/admin/login", format = "json", data = "<login>")]
pub async fn admin_login(
    state: &State<AppState>,
    client: ClientInfo,
    login: Json<AdminLogin>,
) -> Result<Json<AdminSession>, ApiError> {
    // Keyed on the address alone: the user agent is free for the caller to vary.
    let rate_limit_key = format!("admin_login:{}", client.ip);
    state.login_limiter.check(&rate_limit_key)?;

    if !state.credentials.matches(&login.secret) {
        let remaining = state.login_limiter.record_failure(&rate_limit_key);
        warn!(ip = %client.ip, fingerprint = %client.fingerprint, remaining, "Rejected admin login");
        return Err(ApiError::Unauthorized);
    }

    state.login_limiter.clear(&rate_limit_key);
    let session = state.sessions.issue()?;
    info!(ip = %client.ip, "Admin signed in");
    Ok(Json(session))
}

#[post("/admin/logout")]
pub fn admin_logout(state: &State<AppState>, admin: AdminToken) -> Status {
    state.sessions.revoke(admin.as_str());
    debug!("Admin session revoked");
    Status::NoContent
}

#[get("/admin/session")]
pub fn admin_session(_admin: AdminToken) -> Status {
    Status::NoContent
}

#[rocket::options("/<_..>")]
pub async fn all_options() -> Status {
    Status::Ok
}
