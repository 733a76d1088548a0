use std::net::SocketAddr;

use axum::routing::get;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::keys;

/// Errors from the test OIDC harness.
#[derive(Debug, Error)]
pub enum TestAuthError {
    /// Failed to bind or serve the issuer endpoints.
    #[error("oidc server error: {0}")]
    Server(#[from] std::io::Error),

    /// Failed to sign a token.
    #[error("token signing error: {0}")]
    Sign(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Serialize)]
struct TestClaims {
    iss: String,
    sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<String>,
    nbf: i64,
    exp: i64,
    scope: String,
}

/// A throwaway OIDC issuer bound to an ephemeral localhost port.
///
/// Serves the discovery document and a JWKS advertising the static test
/// keys, and mints RS256 tokens signed with the active key. Mirrors a real
/// provider closely enough for integration tests of the authentication
/// boundary; shut it down with [`shutdown`](Self::shutdown) when the test
/// finishes.
pub struct TestOidcServer {
    issuer: String,
    signing_key: EncodingKey,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl std::fmt::Debug for TestOidcServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestOidcServer")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}

impl TestOidcServer {
    /// Bind `127.0.0.1:0` and start serving discovery and JWKS documents.
    pub async fn spawn() -> Result<Self, TestAuthError> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let issuer = format!("http://{addr}");

        let router = Router::new()
            .route(
                "/.well-known/openid-configuration",
                get({
                    let issuer = issuer.clone();
                    move || discovery(issuer.clone())
                }),
            )
            .route("/jwks.json", get(jwks));

        let cancel = CancellationToken::new();
        let shutdown = cancel.clone();
        let handle = tokio::spawn(async move {
            let result = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await })
                .await;
            if let Err(err) = result {
                info!(error = %err, "test oidc server exited with error");
            }
        });

        info!(%issuer, "test oidc server listening");

        let signing_key = EncodingKey::from_rsa_pem(keys::TEST_KEY_1_PEM.as_bytes())?;
        Ok(Self {
            issuer,
            signing_key,
            cancel,
            handle,
        })
    }

    /// The issuer URL (`http://127.0.0.1:<port>`).
    #[must_use]
    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// URL of the JWKS document.
    #[must_use]
    pub fn jwks_uri(&self) -> String {
        format!("{}/jwks.json", self.issuer)
    }

    /// Mint a signed token for the given subject.
    ///
    /// Claims match what a real provider would issue for a client-credentials
    /// exchange: `iss`, `sub`, optional `aud`, `nbf` backdated two hours,
    /// `exp` two hours out, and a `test` scope.
    pub fn token(&self, subject: &str, audience: &str) -> Result<String, TestAuthError> {
        let now = Utc::now();
        let claims = TestClaims {
            iss: self.issuer.clone(),
            sub: subject.to_owned(),
            aud: (!audience.is_empty()).then(|| audience.to_owned()),
            nbf: (now - Duration::hours(2)).timestamp(),
            exp: (now + Duration::hours(2)).timestamp(),
            scope: "test".to_owned(),
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(keys::TEST_KEY_1_ID.to_owned());
        Ok(jsonwebtoken::encode(&header, &claims, &self.signing_key)?)
    }

    /// Stop the issuer and wait for it to exit.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

async fn discovery(issuer: String) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "issuer": issuer,
        "jwks_uri": format!("{issuer}/jwks.json"),
        "id_token_signing_alg_values_supported": ["RS256"],
        "response_types_supported": ["id_token"],
        "subject_types_supported": ["public"],
    }))
}

async fn jwks() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "keys": [
            keys::jwk(keys::TEST_KEY_1_ID, keys::TEST_KEY_1_MODULUS),
            keys::jwk(keys::TEST_KEY_2_ID, keys::TEST_KEY_2_MODULUS),
        ],
    }))
}
