use serde::{Serialize, Deserialize};

/// Who is calling, as far as the server can tell. Only used to key rate limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub fingerprint: String,
    pub ip: String,
}

#[cfg(not(target_arch = "wasm32"))]
pub fn client_fingerprint(ip: &str, user_agent: Option<&str>) -> String {
    use base64::engine::general_purpose::URL_SAFE;
    use base64::Engine;
    use sha2::{Sha256, Digest};

    let mut hasher = Sha256::new();
    hasher.update(ip.as_bytes());
    if let Some(ua) = user_agent {
        hasher.update(ua.as_bytes());
    }
    URL_SAFE.encode(hasher.finalize())
}

#[cfg(feature = "backend")]
mod backend_impl {
    use super::*;
    use rocket::request::{FromRequest, Outcome};
    use rocket::Request;

    #[rocket::async_trait]
    impl<'r> FromRequest<'r> for ClientInfo {
        type Error = ();

        async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
            let headers = req.headers();
            let ip = headers.get_one("X-Real-IP")
                .or_else(|| headers.get_one("X-Forwarded-For"))
                .map(|ip| ip.split(',').next().unwrap_or(ip).trim().to_string())
                .or_else(|| req.client_ip().map(|ip| ip.to_string()))
                .unwrap_or_else(|| "0.0.0.0".into());

            let user_agent = headers.get_one("User-Agent");
            let fingerprint = super::client_fingerprint(&ip, user_agent);

            Outcome::Success(ClientInfo { fingerprint, ip })
        }
    }
}
