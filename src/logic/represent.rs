use itertools::Itertools;
use serde::Serialize;

use crate::model::{CycleTime, Id, Operation, Process};

/// Base URL of the in-flight request, threaded explicitly into every
/// serialization that emits hyperlinks. There is no implicit current-request
/// lookup: a handler that renders relation fields must have extracted one,
/// and the extractor fails the request when no base URL can be derived.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderContext {
    base_url: String,
}

impl RenderContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn process_url(&self, id: &Id) -> String {
        format!("{}/processes/{}", self.base_url, id)
    }

    pub fn operation_url(&self, process_id: &Id, op_number: i64) -> String {
        format!(
            "{}/processes/{}/operations/{}",
            self.base_url, process_id, op_number
        )
    }
}

/// List-view representation of a process. Carries no relation fields, so it
/// needs no render context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessSummary {
    pub id: Id,
    pub name: String,
    pub description: String,
}

/// Detail-view representation of a process, with one hyperlink per owned
/// operation, ordered by op_number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessDetail {
    pub id: Id,
    pub name: String,
    pub description: String,
    pub operations: Vec<String>,
}

/// Wire representation of an operation. The parent relation is a hyperlink to
/// the process detail resource, never a raw key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationRepr {
    pub id: Id,
    pub op_number: i64,
    pub name: String,
    pub description: String,
    pub cycle_time: CycleTime,
    pub process: String,
}

pub fn process_summary(process: &Process) -> ProcessSummary {
    ProcessSummary {
        id: process.id.clone(),
        name: process.name.clone(),
        description: process.description.clone(),
    }
}

pub fn process_detail(
    process: &Process,
    operations: &[Operation],
    ctx: &RenderContext,
) -> ProcessDetail {
    ProcessDetail {
        id: process.id.clone(),
        name: process.name.clone(),
        description: process.description.clone(),
        operations: operations
            .iter()
            .sorted_by_key(|op| op.op_number)
            .map(|op| ctx.operation_url(&op.process_id, op.op_number))
            .collect(),
    }
}

pub fn operation_repr(operation: &Operation, ctx: &RenderContext) -> OperationRepr {
    OperationRepr {
        id: operation.id.clone(),
        op_number: operation.op_number,
        name: operation.name.clone(),
        description: operation.description.clone(),
        cycle_time: operation.cycle_time,
        process: ctx.process_url(&operation.process_id),
    }
}

/// Extract the process id from an incoming `process` hyperlink.
///
/// Accepts an absolute URL or a bare path; the host, if any, is not checked
/// against the current request. Returns None when the value does not address
/// a process detail resource. Whether the id resolves to a stored process is
/// the identity resolver's concern.
pub fn parse_process_link(link: &str) -> Option<Id> {
    let path = match link.find("://") {
        Some(scheme_end) => {
            let rest = &link[scheme_end + 3..];
            match rest.find('/') {
                Some(path_start) => &rest[path_start..],
                None => return None,
            }
        }
        None => link,
    };
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        ["processes", id] => Some((*id).to_string()),
        _ => None,
    }
}
