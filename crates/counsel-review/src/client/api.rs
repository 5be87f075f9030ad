use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::FetchError;
use super::transport::{ApiRequest, ApiResponse, Transport};
use crate::session::{AuthScope, Session};

/// Authenticated client: reads the scope's token, attaches it, and classifies the reply.
pub struct ApiClient<T> {
    transport: T,
    session: Session,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(transport: T, session: Session) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Sends `request` under `scope`. A missing token fails before any I/O.
    pub async fn execute(
        &self,
        scope: AuthScope,
        request: ApiRequest,
    ) -> Result<ApiResponse, FetchError> {
        let token = self
            .session
            .token(scope)?
            .ok_or(FetchError::MissingAuth { scope })?;
        let request = request.with_bearer(token);
        let method = request.method;
        let path = request.path.clone();

        debug!(method = method.as_str(), %path, scope = scope.label(), "sending api request");
        let response = self.transport.send(request).await.map_err(|err| {
            warn!(method = method.as_str(), %path, error = %err, "api request failed");
            FetchError::from(err)
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let err = FetchError::from_status(response.status, &response.body);
        warn!(
            method = method.as_str(),
            %path,
            status = response.status,
            error = %err,
            "api request rejected"
        );
        Err(err)
    }

    /// Sends `request` and decodes a JSON body.
    pub async fn fetch_json<D: DeserializeOwned>(
        &self,
        scope: AuthScope,
        request: ApiRequest,
    ) -> Result<D, FetchError> {
        let response = self.execute(scope, request).await?;
        serde_json::from_slice(&response.body).map_err(|err| FetchError::Decode(err.to_string()))
    }

    /// Sends a mutation whose body, if any, is ignored.
    pub async fn command(&self, scope: AuthScope, request: ApiRequest) -> Result<(), FetchError> {
        self.execute(scope, request).await.map(|_| ())
    }
}
