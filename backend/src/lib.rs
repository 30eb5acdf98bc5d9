pub mod admin;
pub mod catchers;
pub mod cors;
pub mod error;
pub mod rate_limiter;
pub mod routes;
pub mod store;
pub mod utils;
pub use shared::user_info;
pub use shared::{models::*, error::*, user_info::*};

use rocket::{catchers, routes, Build, Rocket};
use crate::{
    catchers::{bad_request, internal_error, not_found, too_many_requests, unauthorized, unprocessable},
    cors::Cors,
    routes::*,
};

/// The API rocket without static file hosting.
pub fn build_rocket(state: AppState, cors: Cors) -> Rocket<Build> {
    rocket::build()
        .attach(cors)
        .manage(state)
        .mount(
            "/api",
            routes![
                list_parties,
                get_party,
                cast_vote,
                results,
                create_party,
                update_party,
                delete_party,
                reset_party_votes,
                reset_all_votes,
                admin_login,
                admin_logout,
                admin_session,
                all_options
            ],
        )
        .register(
            "/",
            catchers![
                bad_request,
                unauthorized,
                not_found,
                unprocessable,
                too_many_requests,
                internal_error
            ],
        )
}

#[cfg(test)]
mod tests;
