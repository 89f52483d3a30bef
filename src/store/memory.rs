use crate::model::{Id, Operation, Process};
use crate::store::traits::{
    OperationStore, ProcessStore, Store, StoreError, UpsertOutcome,
};
use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Debug, Default)]
struct Tables {
    processes: HashMap<Id, Process>,
    operations: HashMap<Id, Operation>,
}

/// In-memory storage collaborator.
///
/// Both tables live behind one lock, so every check-then-act sequence the
/// traits promise to be atomic (uniqueness probe + insert, upsert branch,
/// cascade delete) runs under a single write acquisition. No method holds the
/// lock across an await point.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProcessStore for MemoryStore {
    async fn get_process(&self, id: &Id) -> Result<Option<Process>> {
        let tables = self.tables.read();
        Ok(tables.processes.get(id).cloned())
    }

    async fn list_processes(&self) -> Result<Vec<Process>> {
        let tables = self.tables.read();
        let mut processes: Vec<Process> = tables.processes.values().cloned().collect();
        processes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(processes)
    }

    async fn insert_process(&self, process: Process) -> Result<()> {
        let mut tables = self.tables.write();
        tables.processes.insert(process.id.clone(), process);
        Ok(())
    }

    async fn upsert_process(&self, process: Process) -> Result<UpsertOutcome> {
        let mut tables = self.tables.write();
        let outcome = match tables.processes.get_mut(&process.id) {
            Some(existing) => {
                existing.name = process.name;
                existing.description = process.description;
                UpsertOutcome::Updated
            }
            None => {
                tables.processes.insert(process.id.clone(), process);
                UpsertOutcome::Created
            }
        };
        Ok(outcome)
    }

    async fn delete_process(&self, id: &Id) -> Result<bool> {
        let mut tables = self.tables.write();
        if tables.processes.remove(id).is_none() {
            return Ok(false);
        }
        let before = tables.operations.len();
        tables.operations.retain(|_, op| op.process_id != *id);
        log::debug!(
            "cascade removed {} operation(s) of process {}",
            before - tables.operations.len(),
            id
        );
        Ok(true)
    }
}

#[async_trait::async_trait]
impl OperationStore for MemoryStore {
    async fn find_operation_by_number(&self, op_number: i64) -> Result<Option<Operation>> {
        let tables = self.tables.read();
        Ok(tables
            .operations
            .values()
            .find(|op| op.op_number == op_number)
            .cloned())
    }

    async fn list_operations_for_process(&self, process_id: &Id) -> Result<Vec<Operation>> {
        let tables = self.tables.read();
        let mut operations: Vec<Operation> = tables
            .operations
            .values()
            .filter(|op| op.process_id == *process_id)
            .cloned()
            .collect();
        operations.sort_by_key(|op| op.op_number);
        Ok(operations)
    }

    async fn insert_operation(&self, operation: Operation) -> Result<()> {
        let mut tables = self.tables.write();
        if !tables.processes.contains_key(&operation.process_id) {
            return Err(StoreError::ProcessNotFound(operation.process_id.clone()).into());
        }
        if tables
            .operations
            .values()
            .any(|op| op.op_number == operation.op_number)
        {
            return Err(StoreError::DuplicateOpNumber(operation.op_number).into());
        }
        tables.operations.insert(operation.id.clone(), operation);
        Ok(())
    }

    async fn upsert_operation(&self, operation: Operation) -> Result<(UpsertOutcome, Operation)> {
        let mut tables = self.tables.write();
        if !tables.processes.contains_key(&operation.process_id) {
            return Err(StoreError::ProcessNotFound(operation.process_id.clone()).into());
        }
        match tables.operations.values_mut().find(|op| {
            op.op_number == operation.op_number && op.process_id == operation.process_id
        }) {
            Some(existing) => {
                existing.name = operation.name;
                existing.description = operation.description;
                existing.cycle_time = operation.cycle_time;
                Ok((UpsertOutcome::Updated, existing.clone()))
            }
            None => {
                // The key is free under this parent, but the business key is
                // global: it may still be held elsewhere.
                if tables
                    .operations
                    .values()
                    .any(|op| op.op_number == operation.op_number)
                {
                    return Err(StoreError::DuplicateOpNumber(operation.op_number).into());
                }
                let stored = operation.clone();
                tables.operations.insert(operation.id.clone(), operation);
                Ok((UpsertOutcome::Created, stored))
            }
        }
    }

    async fn delete_operation(&self, process_id: &Id, op_number: i64) -> Result<bool> {
        let mut tables = self.tables.write();
        let target = tables
            .operations
            .values()
            .find(|op| op.process_id == *process_id && op.op_number == op_number)
            .map(|op| op.id.clone());
        match target {
            Some(id) => {
                tables.operations.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Store for MemoryStore {}
