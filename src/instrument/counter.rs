//! Call Counter
//!
//! Counts invocations of an operation in the backend.

use async_trait::async_trait;
use tracing::debug;

use crate::backend::{read_counter, Backend, SharedBackend};
use crate::error::Result;
use crate::instrument::{MethodId, Operation};

/// Increments the counter of `method` before every invocation of `inner`.
///
/// Attempts are counted, not successes: the counter moves even when the
/// wrapped operation then fails. If the increment itself fails the error is
/// returned and `inner` is not invoked.
pub struct CountCalls<Op> {
    inner: Op,
    method: MethodId,
    backend: SharedBackend,
}

impl<Op> CountCalls<Op> {
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
impl<Op, In> Operation<In> for CountCalls<Op>
where
    Op: Operation<In>,
    In: Send + 'static,
{
    type Output = Op::Output;

    async fn invoke(&self, input: In) -> Result<Self::Output> {
        let calls = self.backend.incr(self.method.counter_key()).await?;
        debug!(method = %self.method, calls, "Counted call");

        self.inner.invoke(input).await
    }
}

/// Reads how many times `method` has been invoked; zero if never.
pub async fn call_count(backend: &dyn Backend, method: &MethodId) -> Result<u64> {
    read_counter(backend, method.counter_key()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::CacheError;
    use crate::instrument::FnOperation;

    #[tokio::test]
    async fn test_counts_every_call() {
        let backend = MemoryBackend::default().shared();
        let method = MethodId::new("tests.echo");
        let echo = CountCalls::new(
            FnOperation::new(|s: String| async move { Ok(s) }),
            method.clone(),
            backend.clone(),
        );

        for i in 0..5 {
            assert_eq!(echo.invoke(i.to_string()).await.unwrap(), i.to_string());
        }

        assert_eq!(call_count(backend.as_ref(), &method).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_counts_failed_attempts() {
        let backend = MemoryBackend::default().shared();
        let method = MethodId::new("tests.fail");
        let failing = CountCalls::new(
            FnOperation::new(|_: ()| async move {
                Err::<(), _>(CacheError::InvalidRequest("boom".to_string()))
            }),
            method.clone(),
            backend.clone(),
        );

        assert!(failing.invoke(()).await.is_err());
        assert!(failing.invoke(()).await.is_err());

        assert_eq!(call_count(backend.as_ref(), &method).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_uncalled_method_counts_zero() {
        let backend = MemoryBackend::default().shared();
        let method = MethodId::new("tests.never");

        assert_eq!(call_count(backend.as_ref(), &method).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_distinct_methods_count_separately() {
        let backend = MemoryBackend::default().shared();
        let a = CountCalls::new(
            FnOperation::new(|_: ()| async move { Ok(()) }),
            MethodId::new("tests.a"),
            backend.clone(),
        );
        let b = CountCalls::new(
            FnOperation::new(|_: ()| async move { Ok(()) }),
            MethodId::new("tests.b"),
            backend.clone(),
        );

        a.invoke(()).await.unwrap();
        a.invoke(()).await.unwrap();
        b.invoke(()).await.unwrap();

        assert_eq!(call_count(backend.as_ref(), a.method()).await.unwrap(), 2);
        assert_eq!(call_count(backend.as_ref(), b.method()).await.unwrap(), 1);
    }
}
