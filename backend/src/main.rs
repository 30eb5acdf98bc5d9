use std::sync::Arc;
use backend::{
    admin::{AdminCredentials, AdminSessions},
    build_rocket,
    cors::Cors,
    routes::AppState,
};
use rocket::{routes, fs::NamedFile};
use shuttle_runtime::CustomError;
use sqlx::PgPool;
use tokio::time::{interval, Duration};
use tracing::{info, warn};
use include_dir::{include_dir, Dir};
use uuid::Uuid;

static STATIC_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/static");

async fn run_session_sweeper(sessions: Arc<AdminSessions>) {
    let mut interval = interval(Duration::from_secs(60));
    info!("🧹 Session sweeper started");

    loop {
        interval.tick().await;
        let purged = sessions.purge_expired();
        if purged > 0 {
            info!("🗑️ Removed {} expired admin sessions", purged);
        }
    }
}

#[rocket::get("/<path..>", rank = 20)]
async fn spa_handler(path: std::path::PathBuf, temp_dir: &rocket::State<std::path::PathBuf>) -> Option<NamedFile> {
    let file_path = temp_dir.join(&path);
    if file_path.exists() && file_path.is_file() {
        NamedFile::open(&file_path).await.ok()
    } else {
        NamedFile::open(temp_dir.join("index.html")).await.ok()
    }
}

#[shuttle_runtime::main]
async fn rocket(
    #[shuttle_shared_db::Postgres] pool: PgPool,
    #[shuttle_runtime::Secrets] secret_store: shuttle_runtime::SecretStore,
) -> shuttle_rocket::ShuttleRocket {
    info!("🚀 Starting school election server");

    let credentials = match secret_store.get("ADMIN_SECRET") {
        Some(secret) => AdminCredentials::new(secret),
        None => {
            warn!("ADMIN_SECRET not found - admin panel will be unavailable");
            AdminCredentials::disabled()
        }
    };
    if credentials.is_enabled() {
        info!("🔐 Admin login enabled");
    }
    let cors = secret_store.get("ALLOWED_ORIGINS")
        .map(|origins| Cors::from_list(&origins))
        .unwrap_or_default();

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(CustomError::new)?;

    info!("📋 Migrations complete");

    let temp_dir = std::env::temp_dir().join(format!("school_election_static_{}", Uuid::new_v4()));
    std::fs::create_dir_all(&temp_dir).map_err(CustomError::new)?;
    STATIC_DIR.extract(&temp_dir).map_err(CustomError::new)?;

    let state = AppState::new(pool, credentials);
    tokio::spawn(run_session_sweeper(state.sessions.clone()));

    let rocket = build_rocket(state, cors)
        .manage(temp_dir)
        .mount("/", routes![spa_handler]);

    Ok(rocket.into())
}
