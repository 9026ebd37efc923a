use serde::{Deserialize, Serialize};

use restocker_core::ProductId;

use crate::order::PassId;

/// One intent that could not be turned into a durable purchase order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueFailure {
    pub product_id: ProductId,
    pub reason: String,
}

/// Outcome of one issuance run.
///
/// Counts are disjoint: every intent ends up as exactly one of `created`,
/// `failed` or `duplicates`. `notice_failures` counts orders that were
/// created but whose vendor notice did not go out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueReport {
    pub pass_id: PassId,
    pub created: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub notice_failures: usize,
    pub failures: Vec<IssueFailure>,
}

impl IssueReport {
    pub fn empty(pass_id: PassId) -> Self {
        Self {
            pass_id,
            created: 0,
            failed: 0,
            duplicates: 0,
            notice_failures: 0,
            failures: Vec::new(),
        }
    }
}
