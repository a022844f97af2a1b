//! Call History Recorder
//!
//! Records the inputs and outputs of an operation as two paired lists.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::backend::SharedBackend;
use crate::error::Result;
use crate::instrument::{MethodId, Operation};

/// Appends the JSON-serialized input and output of every successful call to
/// `"{method}:inputs"` and `"{method}:outputs"`.
///
/// Both records are written by a single [`rpush_atomic`](crate::backend::Backend::rpush_atomic)
/// after the call returns, so the i-th input always belongs to the i-th
/// output, even with concurrent callers. A failed call records nothing and
/// its error is returned unchanged.
pub struct CallHistory<Op> {
    inner: Op,
    method: MethodId,
    backend: SharedBackend,
}

impl<Op> CallHistory<Op> {
    pub fn new(inner: Op, method: MethodId, backend: SharedBackend) -> Self {
        Self {
            inner,
            method,
            backend,
        }
    }

    pub fn method(&self) -> &MethodId {
        &self.method
    }
}

#[async_trait]
impl<Op, In> Operation<In> for CallHistory<Op>
where
    Op: Operation<In>,
    Op::Output: Serialize,
    In: Serialize + Send + 'static,
{
    type Output = Op::Output;

    async fn invoke(&self, input: In) -> Result<Self::Output> {
        let input_record = serde_json::to_string(&input)?;
        let output = self.inner.invoke(input).await?;
        let output_record = serde_json::to_string(&output)?;

        self.backend
            .rpush_atomic(vec![
                (self.method.inputs_key(), input_record.into_bytes()),
                (self.method.outputs_key(), output_record.into_bytes()),
            ])
            .await?;
        debug!(method = %self.method, "Recorded call");

        Ok(output)
    }
}
