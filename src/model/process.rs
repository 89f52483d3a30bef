use crate::model::{generate_id, Id};
use serde::{Deserialize, Serialize};

/// A manufacturing process: the parent record owning a set of operations.
///
/// `id` is the surrogate key, assigned once at creation and never rewritten;
/// replacing a process through PUT keeps the key from the request path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: Id,
    pub name: String,
    pub description: String,
}

impl Process {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: generate_id(),
            name,
            description,
        }
    }

    pub fn with_id(id: Id, name: String, description: String) -> Self {
        Self {
            id,
            name,
            description,
        }
    }
}
