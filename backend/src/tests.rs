#[cfg(test)]
mod tests {
    use rocket::http::{ContentType, Header, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::json;
    use shared::{AdminSession, PartyDraft, ValidationError};
    use sqlx::postgres::PgPoolOptions;
    use time::{Duration, OffsetDateTime};
    use tracing_subscriber::EnvFilter;
    use crate::{
        admin::{AdminCredentials, AdminSessions},
        build_rocket,
        cors::Cors,
        error::ApiError,
        rate_limiter::RateLimiter,
        routes::{prepare_draft, AppState},
        store::PartyOrder,
        utils::bearer_token,
    };

    const SECRET: &str = "correct horse battery staple";

    fn noon() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    async fn client(credentials: AdminCredentials) -> Client {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        // Never connected: every request below is answered before a query runs.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/school_election_test")
            .unwrap();
        let rocket = build_rocket(AppState::new(pool, credentials), Cors::default());
        Client::tracked(rocket).await.unwrap()
    }

    async fn sign_in(client: &Client) -> AdminSession {
        let response = client.post("/api/admin/login")
            .header(ContentType::JSON)
            .body(json!({ "secret": SECRET }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        response.into_json::<AdminSession>().await.unwrap()
    }

    fn bearer(session: &AdminSession) -> Header<'static> {
        Header::new("Authorization", format!("Bearer {}", session.token))
    }

    #[test]
    fn test_rate_limiter_blocks_after_max_failures() {
        let limiter = RateLimiter::new(3, 15);
        let now = noon();

        assert_eq!(limiter.record_failure_at("k", now), 2);
        assert_eq!(limiter.record_failure_at("k", now), 1);
        assert!(limiter.check_at("k", now).is_ok());
        assert_eq!(limiter.record_failure_at("k", now), 0);

        match limiter.check_at("k", now + Duration::minutes(5)) {
            Err(ApiError::RateLimited(minutes)) => assert_eq!(minutes, 10),
            other => panic!("expected rate limit, got {:?}", other),
        }
        assert!(limiter.check_at("other", now).is_ok());
    }

    #[test]
    fn test_rate_limiter_window_expires_and_clear_resets() {
        let limiter = RateLimiter::new(1, 15);
        let now = noon();

        limiter.record_failure_at("k", now);
        assert!(limiter.check_at("k", now).is_err());
        assert!(limiter.check_at("k", now + Duration::minutes(16)).is_ok());

        limiter.record_failure_at("k", now);
        limiter.clear("k");
        assert!(limiter.check_at("k", now).is_ok());
    }

    #[test]
    fn test_sessions_expire_and_revoke() {
        let sessions = AdminSessions::new(Duration::hours(1));
        let now = noon();
        let session = sessions.issue_at(now).unwrap();

        assert_eq!(session.expires_at, now + Duration::hours(1));
        assert!(sessions.verify_at(&session.token, now + Duration::minutes(59)));
        assert!(!sessions.verify_at(&session.token, now + Duration::hours(2)));
        // Expired tokens are dropped on first sight.
        assert!(!sessions.verify_at(&session.token, now));

        let other = sessions.issue_at(now).unwrap();
        assert_ne!(other.token, session.token);
        assert!(sessions.revoke(&other.token));
        assert!(!sessions.verify_at(&other.token, now));
        assert!(!sessions.revoke(&other.token));
    }

    #[test]
    fn test_purge_expired_sessions() {
        let sessions = AdminSessions::new(Duration::minutes(10));
        let now = noon();
        sessions.issue_at(now).unwrap();
        sessions.issue_at(now + Duration::minutes(8)).unwrap();

        assert_eq!(sessions.purge_expired_at(now + Duration::minutes(12)), 1);
        assert_eq!(sessions.purge_expired_at(now + Duration::minutes(12)), 0);
    }

    #[test]
    fn test_credentials() {
        let credentials = AdminCredentials::new(SECRET);
        assert!(credentials.is_enabled());
        assert!(credentials.matches(SECRET));
        assert!(!credentials.matches("correct horse"));
        assert!(!credentials.matches(""));

        let blank = AdminCredentials::new("   ");
        assert!(!blank.is_enabled());
        assert!(!blank.matches("   "));
        assert!(!AdminCredentials::disabled().matches(""));
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(ApiError::NotFound.status(), Status::NotFound);
        assert_eq!(ApiError::InvalidId.status(), Status::BadRequest);
        assert_eq!(ApiError::Validation(ValidationError::NameRequired).status(), Status::BadRequest);
        assert_eq!(ApiError::DuplicateName("Verdes".into()).status(), Status::Conflict);
        assert_eq!(ApiError::Unauthorized.status(), Status::Unauthorized);
        assert_eq!(ApiError::RateLimited(3).status(), Status::TooManyRequests);
        assert_eq!(ApiError::Internal("boom".into()).status(), Status::InternalServerError);
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(bearer_token("bearer  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }

    #[test]
    fn test_party_order_parse() {
        assert_eq!(PartyOrder::parse(None).unwrap(), PartyOrder::Created);
        assert_eq!(PartyOrder::parse(Some("")).unwrap(), PartyOrder::Created);
        assert_eq!(PartyOrder::parse(Some("votes")).unwrap(), PartyOrder::Votes);
        assert!(matches!(PartyOrder::parse(Some("name")), Err(ApiError::InvalidSort(_))));
    }

    #[test]
    fn test_prepare_draft() {
        let draft = PartyDraft {
            name: "  Partido Verde ".into(),
            color: "#22c55e".into(),
            slogan: Some("   ".into()),
            ..PartyDraft::default()
        };
        let prepared = prepare_draft(draft).unwrap();
        assert_eq!(prepared.name, "Partido Verde");
        assert_eq!(prepared.color, "#22C55E");
        assert_eq!(prepared.slogan, None);

        let unnamed = PartyDraft { name: "  ".into(), ..PartyDraft::default() };
        assert!(matches!(prepare_draft(unnamed), Err(ApiError::Validation(ValidationError::NameRequired))));

        let bad_color = PartyDraft { name: "Azul".into(), color: "blue".into(), ..PartyDraft::default() };
        assert!(matches!(prepare_draft(bad_color), Err(ApiError::Validation(ValidationError::InvalidColor(_)))));

        let rude = PartyDraft { name: "fuck this".into(), ..PartyDraft::default() };
        assert!(matches!(prepare_draft(rude), Err(ApiError::Inappropriate(_))));
    }

    #[test]
    fn test_cors_origins() {
        let cors = Cors::from_list("https://eleicao.example.org/, ,https://other.example.org");
        assert!(cors.allows("https://eleicao.example.org"));
        assert!(cors.allows("https://other.example.org"));
        assert!(cors.allows("http://localhost:8080"));
        assert!(!cors.allows("https://evil.example.com"));
        assert!(!Cors::default().allows("https://eleicao.example.org"));
    }

    #[rocket::async_test]
    async fn test_admin_routes_require_session() {
        let client = client(AdminCredentials::new(SECRET)).await;

        let response = client.post("/api/parties/reset").dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("Admin session required"));

        let response = client.delete("/api/parties/8d0f6f5e-4c1b-4d7a-9a55-3f1f2b0c9e11")
            .header(Header::new("Authorization", "Bearer not-a-session"))
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
        let body = response.into_string().await.unwrap();
        assert!(body.contains("expired or invalid"));
    }

    #[rocket::async_test]
    async fn test_malformed_requests_rejected() {
        let client = client(AdminCredentials::disabled()).await;

        let response = client.post("/api/vote/not-a-uuid").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
        assert!(response.into_string().await.unwrap().contains("Invalid party ID"));

        let response = client.get("/api/parties/42").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.get("/api/parties?sort=name").dispatch().await;
        assert_eq!(response.status(), Status::BadRequest);
        assert!(response.into_string().await.unwrap().contains("Unknown sort order"));

        let response = client.get("/api/nowhere").dispatch().await;
        assert_eq!(response.status(), Status::NotFound);
    }

    #[rocket::async_test]
    async fn test_admin_session_lifecycle() {
        let client = client(AdminCredentials::new(SECRET)).await;
        let session = sign_in(&client).await;

        let response = client.get("/api/admin/session").header(bearer(&session)).dispatch().await;
        assert_eq!(response.status(), Status::NoContent);

        let response = client.post("/api/admin/logout").header(bearer(&session)).dispatch().await;
        assert_eq!(response.status(), Status::NoContent);

        let response = client.get("/api/admin/session").header(bearer(&session)).dispatch().await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn test_admin_login_rate_limited() {
        let client = client(AdminCredentials::new(SECRET)).await;

        for _ in 0..5 {
            let response = client.post("/api/admin/login")
                .header(ContentType::JSON)
                .body(json!({ "secret": "guess" }).to_string())
                .dispatch()
                .await;
            assert_eq!(response.status(), Status::Unauthorized);
        }

        // Even the right secret is refused until the window passes.
        let response = client.post("/api/admin/login")
            .header(ContentType::JSON)
            .body(json!({ "secret": SECRET }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::TooManyRequests);
        assert!(response.into_string().await.unwrap().contains("try again in"));
    }

    #[rocket::async_test]
    async fn test_admin_login_limit_ignores_user_agent() {
        let client = client(AdminCredentials::new(SECRET)).await;

        let mut statuses = Vec::new();
        for i in 0..7 {
            let response = client.post("/api/admin/login")
                .header(ContentType::JSON)
                .header(Header::new("User-Agent", format!("browser-{}", i)))
                .header(Header::new("X-Real-IP", "203.0.113.7"))
                .body(json!({ "secret": "guess" }).to_string())
                .dispatch()
                .await;
            statuses.push(response.status());
        }

        assert_eq!(&statuses[..5], &[Status::Unauthorized; 5]);
        assert_eq!(&statuses[5..], &[Status::TooManyRequests; 2]);

        // Another address still has its own budget.
        let response = client.post("/api/admin/login")
            .header(ContentType::JSON)
            .header(Header::new("X-Real-IP", "198.51.100.20"))
            .body(json!({ "secret": SECRET }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
    }

    #[rocket::async_test]
    async fn test_disabled_admin_cannot_sign_in() {
        let client = client(AdminCredentials::disabled()).await;
        let response = client.post("/api/admin/login")
            .header(ContentType::JSON)
            .body(r#"{"secret":""}"#)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[rocket::async_test]
    async fn test_invalid_party_rejected_before_storage() {
        let client = client(AdminCredentials::new(SECRET)).await;
        let session = sign_in(&client).await;

        let response = client.post("/api/parties")
            .header(ContentType::JSON)
            .header(bearer(&session))
            .body(json!({ "name": "Azul", "color": "#12", "symbol": "sol" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);

        let response = client.put("/api/parties/8d0f6f5e-4c1b-4d7a-9a55-3f1f2b0c9e11")
            .header(ContentType::JSON)
            .header(bearer(&session))
            .body(json!({ "name": "", "color": "#123456", "symbol": "sol" }).to_string())
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::BadRequest);
        assert!(response.into_string().await.unwrap().contains("name"));
    }

    #[rocket::async_test]
    async fn test_cors_preflight() {
        let client = client(AdminCredentials::disabled()).await;
        let response = client.options("/api/vote/anything")
            .header(Header::new("Origin", "http://localhost:8080"))
            .dispatch()
            .await;

        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("http://localhost:8080")
        );
        assert!(response.headers().get_one("Access-Control-Allow-Headers")
            .map_or(false, |h| h.contains("Authorization")));
    }
}
