use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::domain::endpoints::{self, Endpoint};
use crate::domain::errors::ClientError;
use crate::domain::http::{HttpMethod, MultipartForm, OutgoingRequest, RawResponse, RequestBody};
use crate::domain::ports::Transport;
use crate::interface_adapters::decoder::{self, DecodedResponse};
use crate::use_cases::session_store::SessionStore;

const FORBIDDEN: u16 = 403;

/// One logical call against a resolved endpoint path.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    /// Resolves an endpoint descriptor with its path parameters.
    pub fn to(endpoint: Endpoint, params: &[(&str, &str)]) -> Result<Self, ClientError> {
        Ok(Self::new(endpoint.method, endpoint.resolve(params)?))
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body).map_err(|e| ClientError::MalformedJson {
            preview: String::new(),
            diagnostic: format!("request body could not be encoded: {e}"),
        })?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn json_value(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// The only component that attaches credentials and reacts to auth failures.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: SessionStore,
    base_url: String,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: SessionStore,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            session,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Authenticated call with the verify-and-retry-once policy on 403.
    ///
    /// `Idle -> Dispatched -> {Success | NonAuthError | AuthError}`, and
    /// `AuthError -> VerifyInFlight -> {RetryDispatched (final) | SessionCleared (final)}`.
    #[tracing::instrument(
        name = "api_request",
        skip_all,
        fields(method = request.method.as_str(), path = %request.path)
    )]
    pub async fn request(&self, request: ApiRequest) -> Result<DecodedResponse, ClientError> {
        // Fast fail: never touch the network without a session.
        let Some(token) = self.session.token() else {
            tracing::info!("no session for authenticated request");
            self.handle_token_expired();
            return Err(ClientError::Unauthenticated);
        };

        let response = self.dispatch(&request, Some(&token)).await?;
        if response.status != FORBIDDEN {
            return finish(response);
        }

        tracing::info!("403 received, verifying token");
        if !self.verify_token().await {
            self.handle_token_expired();
            return Err(ClientError::SessionExpired);
        }

        // Re-read the token: it may have been refreshed while verify was in flight.
        let Some(token) = self.session.token() else {
            return Err(ClientError::Unauthenticated);
        };
        tracing::info!("token still valid, retrying once");
        // Final either way; the session is only cleared when verify fails.
        let retry = self.dispatch(&request, Some(&token)).await?;
        finish(retry)
    }

    /// Call that needs no session (login, register, health).
    #[tracing::instrument(
        name = "api_public_request",
        skip_all,
        fields(method = request.method.as_str(), path = %request.path)
    )]
    pub async fn request_public(&self, request: ApiRequest) -> Result<DecodedResponse, ClientError> {
        let response = self.dispatch(&request, None).await?;
        finish(response)
    }

    /// Like `request_public`, but hands back the raw response for status-specific handling.
    pub async fn send_public(&self, request: ApiRequest) -> Result<RawResponse, ClientError> {
        self.dispatch(&request, None).await
    }

    /// Lightweight authenticated GET against the verify endpoint.
    /// Any failure, including an unreachable server, counts as invalid.
    pub async fn verify_token(&self) -> bool {
        let Some(token) = self.session.token() else {
            return false;
        };
        let request = ApiRequest::new(endpoints::VERIFY.method, endpoints::VERIFY.template);
        match self.dispatch(&request, Some(&token)).await {
            Ok(response) if response.is_success() => {
                tracing::debug!("token verification successful");
                true
            }
            Ok(response) => {
                tracing::info!(status = response.status, "token verification failed");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "token verification error");
                false
            }
        }
    }

    /// Clears the session and redirects to login.
    pub fn handle_token_expired(&self) {
        self.session.expire();
    }

    fn build(&self, request: &ApiRequest, token: Option<&str>) -> OutgoingRequest {
        let mut headers: Vec<(String, String)> = Vec::new();
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        // Multipart bodies get their content type (with boundary) from the transport.
        if !matches!(request.body, RequestBody::Multipart(_)) {
            headers.push(("Content-Type".to_string(), "application/json".to_string()));
        }

        for (name, value) in &request.headers {
            if name.eq_ignore_ascii_case("authorization") {
                tracing::debug!("ignoring caller-supplied authorization header");
                continue;
            }
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        OutgoingRequest {
            method: request.method,
            url: format!("{}{}", self.base_url, request.path),
            headers,
            body: request.body.clone(),
        }
    }

    async fn dispatch(
        &self,
        request: &ApiRequest,
        token: Option<&str>,
    ) -> Result<RawResponse, ClientError> {
        let outgoing = self.build(request, token);
        let response = self.transport.send(outgoing).await.map_err(|cause| {
            tracing::error!(error = %cause, "request failed before a response arrived");
            ClientError::Network(cause)
        })?;
        tracing::debug!(status = response.status, "response received");
        Ok(response)
    }
}

fn finish(response: RawResponse) -> Result<DecodedResponse, ClientError> {
    if !response.is_success() {
        return Err(ClientError::Api {
            status: response.status,
            message: decoder::error_message(&response),
        });
    }
    decoder::decode(&response)
}
