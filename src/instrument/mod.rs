//! Instrumentation Module
//!
//! Wrappers that count and record calls to an [`Operation`], keyed by an
//! explicit [`MethodId`], and the reporter that replays what they recorded.
//!
//! Wrappers take and return the same [`Operation`] shape, so they stack in
//! either order:
//!
//! ```ignore
//! let method = MethodId::new("Cache.store");
//! let store = CallHistory::new(
//!     CountCalls::new(cache.store_operation(), method.clone(), backend.clone()),
//!     method.clone(),
//!     backend.clone(),
//! );
//! store.invoke(Value::from("cool")).await?;
//! println!("{}", replay(backend.as_ref(), &method).await?);
//! ```

mod counter;
mod history;
mod replay;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

pub use counter::{call_count, CountCalls};
pub use history::CallHistory;
pub use replay::{replay, Replay, ReplayEntry};

// == Method Identity ==
/// Stable name of a logical operation, used to namespace its instrumentation keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodId(String);

impl MethodId {
    /// Names a method, such as `"Cache.store"`. Two wrappers built with equal
    /// names share one counter and one history.
    pub fn new(name: impl Into<String>) -> Self {
        MethodId(name.into())
    }

    /// Returns the method name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the call counter: the identity itself.
    pub fn counter_key(&self) -> &str {
        &self.0
    }

    /// Key of the list of recorded inputs.
    pub fn inputs_key(&self) -> String {
        format!("{}:inputs", self.0)
    }

    /// Key of the list of recorded outputs.
    pub fn outputs_key(&self) -> String {
        format!("{}:outputs", self.0)
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Operation ==
/// An async function `In -> Result<Output>` that wrappers can be stacked around.
#[async_trait]
pub trait Operation<In: Send + 'static>: Send + Sync {
    type Output: Send + 'static;

    async fn invoke(&self, input: In) -> Result<Self::Output>;
}

#[async_trait]
impl<Op, In> Operation<In> for Arc<Op>
where
    Op: Operation<In>,
    In: Send + 'static,
{
    type Output = Op::Output;

    async fn invoke(&self, input: In) -> Result<Self::Output> {
        (**self).invoke(input).await
    }
}

// == Fn Operation ==
/// Adapts an async closure into an [`Operation`].
///
/// ```ignore
/// let double = FnOperation::new(|x: i64| async move { Ok(x * 2) });
/// assert_eq!(double.invoke(21).await?, 42);
/// ```
#[derive(Clone)]
pub struct FnOperation<F>(F);

impl<F> FnOperation<F> {
    pub fn new<In, Out, Fut>(f: F) -> Self
    where
        F: Fn(In) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Out>> + Send + 'static,
        In: Send + 'static,
        Out: Send + 'static,
    {
        FnOperation(f)
    }
}

#[async_trait]
impl<F, Fut, In, Out> Operation<In> for FnOperation<F>
where
    F: Fn(In) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Out>> + Send + 'static,
    In: Send + 'static,
    Out: Send + 'static,
{
    type Output = Out;

    async fn invoke(&self, input: In) -> Result<Out> {
        (self.0)(input).await
    }
}

impl<F> fmt::Debug for FnOperation<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOperation").finish_non_exhaustive()
    }
}
