use crate::model::{Id, Operation, Process};
use anyhow::Result;

/// Outcome of a keyed insert-or-update, decided atomically inside the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Constraint violations the store enforces on writes. Callers downcast the
/// anyhow error to map these onto field-level validation responses.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("op_number {0} is already in use")]
    DuplicateOpNumber(i64),
    #[error("process {0} does not exist")]
    ProcessNotFound(Id),
}

#[async_trait::async_trait]
pub trait ProcessStore: Send + Sync {
    async fn get_process(&self, id: &Id) -> Result<Option<Process>>;
    async fn list_processes(&self) -> Result<Vec<Process>>;
    async fn insert_process(&self, process: Process) -> Result<()>;
    /// Insert-or-update keyed by `process.id`, as a single atomic step.
    async fn upsert_process(&self, process: Process) -> Result<UpsertOutcome>;
    /// Delete a process and every operation that references it. Returns false
    /// when the id does not exist.
    async fn delete_process(&self, id: &Id) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait OperationStore: Send + Sync {
    /// Look up an operation by its business key alone. `op_number` is unique
    /// system-wide, so this returns at most one record regardless of parent.
    async fn find_operation_by_number(&self, op_number: i64) -> Result<Option<Operation>>;
    async fn list_operations_for_process(&self, process_id: &Id) -> Result<Vec<Operation>>;
    /// Fails with [`StoreError::DuplicateOpNumber`] when the op_number is
    /// taken anywhere, and [`StoreError::ProcessNotFound`] when the parent
    /// reference does not resolve.
    async fn insert_operation(&self, operation: Operation) -> Result<()>;
    /// Insert-or-update keyed by `(process_id, op_number)`, as a single atomic
    /// step. An existing operation keeps its surrogate id; only the mutable
    /// fields of `operation` are applied. Returns the outcome together with
    /// the stored record, so callers never need a second lookup. Fails with
    /// [`StoreError::DuplicateOpNumber`] when the op_number is held by an
    /// operation under a different process.
    async fn upsert_operation(&self, operation: Operation) -> Result<(UpsertOutcome, Operation)>;
    async fn delete_operation(&self, process_id: &Id, op_number: i64) -> Result<bool>;
}

pub trait Store: ProcessStore + OperationStore + Send + Sync {}
