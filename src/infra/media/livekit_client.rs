use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::header::AUTHORIZATION;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use url::Url;

use crate::{
    application::interfaces::media::{MediaRoomService, MediaServiceError},
    config::config_model::LiveKit,
};

const CREATE_ROOM_PATH: &str = "twirp/livekit.RoomService/CreateRoom";
const ADMIN_TOKEN_TTL_SECS: i64 = 10 * 60;
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct VideoGrant {
    #[serde(skip_serializing_if = "Option::is_none")]
    room: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    room_join: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    room_create: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    can_publish: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    can_subscribe: Option<bool>,
}

#[derive(Debug, Serialize)]
struct LiveKitClaims {
    iss: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    nbf: i64,
    exp: i64,
    video: VideoGrant,
}

/// LiveKit room service client plus access-token signer.
pub struct LiveKitClient {
    http: reqwest::Client,
    config: LiveKit,
    api_base: Url,
}

impl LiveKitClient {
    pub fn new(config: LiveKit) -> Result<Self> {
        let api_base = http_base_url(&config.url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            config,
            api_base,
        })
    }

    fn sign(&self, sub: Option<String>, ttl_secs: i64, video: VideoGrant) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = LiveKitClaims {
            iss: self.config.api_key.clone(),
            sub,
            nbf: now,
            exp: now + ttl_secs,
            video,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.api_secret.as_bytes()),
        )?;
        Ok(token)
    }
}

/// The room service speaks HTTP on the same host as the signalling websocket.
fn http_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    let scheme = match url.scheme() {
        "ws" | "http" => "http",
        "wss" | "https" => "https",
        other => bail!("unsupported LIVEKIT_URL scheme: {other}"),
    };
    if url.set_scheme(scheme).is_err() {
        bail!("cannot convert LIVEKIT_URL to {scheme}");
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl MediaRoomService for LiveKitClient {
    async fn create_room(&self, room_name: String) -> Result<(), MediaServiceError> {
        let admin_token = self
            .sign(
                None,
                ADMIN_TOKEN_TTL_SECS,
                VideoGrant {
                    room_create: true,
                    ..Default::default()
                },
            )
            .map_err(|err| MediaServiceError::Upstream(format!("sign admin token: {err}")))?;
        let endpoint = self
            .api_base
            .join(CREATE_ROOM_PATH)
            .map_err(|err| MediaServiceError::Upstream(format!("build url: {err}")))?;

        let resp = self
            .http
            .post(endpoint)
            .header(AUTHORIZATION, format!("Bearer {admin_token}"))
            .json(&json!({ "name": room_name }))
            .send()
            .await
            .map_err(|err| {
                error!(%room_name, error = ?err, "livekit: create room request failed");
                MediaServiceError::Upstream(err.to_string())
            })?;

        let status = resp.status();
        if status.is_success() {
            info!(%room_name, "livekit: room ensured");
            return Ok(());
        }

        let body = resp.text().await.unwrap_or_default();
        if body.to_lowercase().contains("already exists") {
            return Err(MediaServiceError::RoomAlreadyExists);
        }

        error!(%room_name, %status, response_body = %body, "livekit: create room rejected");
        Err(MediaServiceError::Upstream(format!(
            "CreateRoom returned {status}"
        )))
    }

    fn issue_join_token(&self, room_name: &str, identity: &str) -> Result<String> {
        let ttl = i64::try_from(self.config.token_ttl_seconds)?;
        self.sign(
            Some(identity.to_string()),
            ttl,
            VideoGrant {
                room: Some(room_name.to_string()),
                room_join: true,
                can_publish: Some(true),
                can_subscribe: Some(true),
                ..Default::default()
            },
        )
    }
}
