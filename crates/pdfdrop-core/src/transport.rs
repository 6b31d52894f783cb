use crate::error::TransportError;
use crate::request::OperationRequest;
use crate::response::RawResponse;
use async_trait::async_trait;

/// Sends an assembled request to `endpoint` as a multipart POST.
///
/// Implementations must not interpret the status code; non-2xx responses
/// are returned as `Ok` and handled by [`crate::response::interpret`].
/// Futures are not `Send` so browser `fetch` can implement this.
#[async_trait(?Send)]
pub trait Transport<P> {
    async fn send(
        &self,
        endpoint: &str,
        request: &OperationRequest<P>,
    ) -> Result<RawResponse, TransportError>;
}
