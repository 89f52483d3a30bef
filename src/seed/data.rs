use anyhow::Result;

use crate::model::{CycleTime, Operation, Process};
use crate::store::traits::Store;

/// Load a small demonstration routing: one heat-treat process with its
/// furnace operations. Intended for local development, gated behind
/// LOAD_SEED_DATA in main.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    let process = Process::new(
        "HEAT_TREAT".to_string(),
        "Anneal and quench 4140 bar stock".to_string(),
    );
    store.insert_process(process.clone()).await?;

    let operations = [
        (10, "Load Furnace", "Load on a flat plate", 90),
        (20, "Soak", "Hold at 845C", 2 * 3600),
        (30, "Quench", "Oil quench to ambient", 15 * 60),
        (40, "Unload", "Unload and rack for tempering", 120),
    ];
    let count = operations.len();
    for (op_number, name, description, seconds) in operations {
        store
            .insert_operation(Operation::new(
                op_number,
                name.to_string(),
                description.to_string(),
                CycleTime::from_seconds(seconds),
                process.id.clone(),
            ))
            .await?;
    }

    log::info!("seeded process {} with {} operations", process.id, count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::store::traits::{OperationStore, ProcessStore};

    #[tokio::test]
    async fn seed_data_loads_into_an_empty_store() {
        let store = MemoryStore::new();
        load_seed_data(&store).await.unwrap();

        let processes = store.list_processes().await.unwrap();
        assert_eq!(processes.len(), 1);
        let operations = store
            .list_operations_for_process(&processes[0].id)
            .await
            .unwrap();
        assert_eq!(operations.len(), 4);
    }
}
