use crate::model::{generate_id, CycleTime, Id};
use serde::{Deserialize, Serialize};

/// A single step of a manufacturing process.
///
/// Carries two identities: `id` is the surrogate key used for joins, while
/// `op_number` is the business key used for addressing. `op_number` is unique
/// across the whole system, not just within its parent process; the storage
/// layer enforces this on every write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: Id,
    pub op_number: i64,
    pub name: String,
    pub description: String,
    pub cycle_time: CycleTime,
    pub process_id: Id,
}

impl Operation {
    pub fn new(
        op_number: i64,
        name: String,
        description: String,
        cycle_time: CycleTime,
        process_id: Id,
    ) -> Self {
        Self {
            id: generate_id(),
            op_number,
            name,
            description,
            cycle_time,
            process_id,
        }
    }
}
