//! Driving port for reading leads.

use async_trait::async_trait;

use crate::domain::{Caller, Error, Lead, LeadId};

/// Leads visible to a caller.
///
/// Organisors get assigned leads in `leads` and the rest in
/// `unassigned_leads`; agents only ever get their own leads and `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadListing {
    pub leads: Vec<Lead>,
    pub unassigned_leads: Option<Vec<Lead>>,
}

#[async_trait]
pub trait LeadsQuery: Send + Sync {
    async fn list_leads(&self, caller: &Caller) -> Result<LeadListing, Error>;

    async fn lead_detail(&self, caller: &Caller, id: LeadId) -> Result<Lead, Error>;
}
