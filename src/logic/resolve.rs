use anyhow::Result;

use crate::logic::validate::ValidationErrors;
use crate::model::{Id, Operation, Process};
use crate::store::traits::Store;

/// A parsed `op_number` path segment.
///
/// Member routes address operations by business key, so the segment arrives
/// as raw text. A syntactically invalid value is a validation failure (400),
/// which must stay distinct from an identifier that parses but does not
/// resolve (404).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpNumber(pub i64);

impl OpNumber {
    pub fn parse(raw: &str) -> Result<Self, ValidationErrors> {
        match raw.parse::<i64>() {
            Ok(n) if n >= 0 => Ok(Self(n)),
            Ok(_) => Err(ValidationErrors::single(
                "op_number",
                "Ensure this value is greater than or equal to 0.",
            )),
            Err(_) => Err(ValidationErrors::single(
                "op_number",
                "A valid integer is required.",
            )),
        }
    }
}

/// Resolve a process by surrogate key. `None` is the explicit absent marker,
/// not an error; upsert callers branch on it without a second query.
pub async fn resolve_process<S: Store>(store: &S, id: &Id) -> Result<Option<Process>> {
    store.get_process(id).await
}

/// Resolve an operation addressed as `(parent process id, op_number)`.
///
/// The business key is globally unique, so the store lookup needs only the
/// op_number; the parent scope is applied here. An operation holding the
/// op_number under a different process is absent at this address, even though
/// that same op_number can never be reused for this parent.
pub async fn resolve_operation<S: Store>(
    store: &S,
    parent_id: &Id,
    op_number: OpNumber,
) -> Result<Option<Operation>> {
    match store.find_operation_by_number(op_number.0).await? {
        Some(op) if op.process_id == *parent_id => Ok(Some(op)),
        _ => Ok(None),
    }
}
