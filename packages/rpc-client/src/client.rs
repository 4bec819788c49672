//! Typed call surface over the transport and cache.

use std::sync::Arc;

use contract::{Procedure, ValidateInput};
use serde_json::Value;

use crate::cache::QueryCache;
use crate::error::ClientError;
use crate::transport::Transport;

/// Typed RPC client. Reads go through the coalescing cache; mutations go
/// straight to the transport and drop cached reads, since any of them may be
/// stale afterwards.
#[derive(Clone)]
pub struct RpcClient {
    cache: QueryCache,
    transport: Arc<dyn Transport>,
}

impl RpcClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            cache: QueryCache::new(Arc::clone(&transport)),
            transport,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    fn encode<P: Procedure>(input: &P::Input) -> Result<Value, ClientError> {
        input.validate()?;
        serde_json::to_value(input).map_err(|e| ClientError::Decode {
            procedure: P::NAME,
            detail: format!("failed to encode input: {e}"),
        })
    }

    fn decode<P: Procedure>(raw: Value) -> Result<P::Output, ClientError> {
        serde_json::from_value(raw).map_err(|e| ClientError::Decode {
            procedure: P::NAME,
            detail: e.to_string(),
        })
    }

    /// Cached, coalesced read. One logical request per distinct input value.
    pub async fn query<P: Procedure>(&self, input: &P::Input) -> Result<P::Output, ClientError> {
        let raw_input = Self::encode::<P>(input)?;
        let raw_output = self.cache.get_raw(P::NAME, raw_input).await?;
        Self::decode::<P>(raw_output)
    }

    /// Uncached call for mutations. Invalidates all cached reads on success.
    pub async fn call<P: Procedure>(&self, input: &P::Input) -> Result<P::Output, ClientError> {
        let raw_input = Self::encode::<P>(input)?;
        let raw_output = self.transport.call(P::NAME, raw_input).await?;
        self.cache.clear();
        Self::decode::<P>(raw_output)
    }
}
