//! Replay Reporter
//!
//! Renders the recorded history of a method as an ordered trace.

use std::fmt;

use tracing::warn;

use crate::backend::Backend;
use crate::error::Result;
use crate::instrument::{call_count, MethodId};

/// One recorded call: its serialized input and output.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayEntry {
    pub input: String,
    pub output: String,
}

/// The call count and paired history of one method.
///
/// Displays as:
///
/// ```text
/// Cache.store was called 2 times:
/// Cache.store(*"foo") -> "3b6c2f6e-..."
/// Cache.store(*42) -> "a0e1d8a4-..."
/// ```
#[derive(Debug, Clone)]
pub struct Replay {
    pub method: MethodId,
    /// Value of the call counter
    pub calls: u64,
    /// Paired records, truncated to the shorter of the two lists
    pub entries: Vec<ReplayEntry>,
    inputs_len: usize,
    outputs_len: usize,
}

impl Replay {
    /// True if the inputs and outputs lists had different lengths.
    pub fn is_diverged(&self) -> bool {
        self.inputs_len != self.outputs_len
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.method, self.calls)?;
        for entry in &self.entries {
            writeln!(f, "{}(*{}) -> {}", self.method, entry.input, entry.output)?;
        }
        Ok(())
    }
}

/// Reads the counter and history lists of `method`.
///
/// Lists of different lengths are paired up to the shorter one; the
/// divergence is logged and reported by [`Replay::is_diverged`].
pub async fn replay(backend: &dyn Backend, method: &MethodId) -> Result<Replay> {
    let calls = call_count(backend, method).await?;
    let inputs = backend.lrange(&method.inputs_key(), 0, -1).await?;
    let outputs = backend.lrange(&method.outputs_key(), 0, -1).await?;

    let (inputs_len, outputs_len) = (inputs.len(), outputs.len());
    if inputs_len != outputs_len {
        warn!(
            method = %method,
            inputs = inputs_len,
            outputs = outputs_len,
            "Call history diverged, truncating replay to shorter list"
        );
    }

    let entries = inputs
        .into_iter()
        .zip(outputs)
        .map(|(input, output)| ReplayEntry {
            input: String::from_utf8_lossy(&input).into_owned(),
            output: String::from_utf8_lossy(&output).into_owned(),
        })
        .collect();

    Ok(Replay {
        method: method.clone(),
        calls,
        entries,
        inputs_len,
        outputs_len,
    })
}
