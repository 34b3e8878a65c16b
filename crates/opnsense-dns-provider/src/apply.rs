//! Changeset application.

use std::fmt;

use opnsense_dns_core::{Changes, DnsError, Endpoint, HostOverrideBackend, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::provider::Provider;
use crate::record::{existing_id, Record};
use crate::registry;

/// What an applied changeset did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Rows created
    pub created: usize,
    /// Rows updated in place
    pub updated: usize,
    /// Rows deleted
    pub deleted: usize,
    /// Endpoints skipped for their record type
    pub skipped: usize,
}

impl ApplyReport {
    /// Number of backend mutations performed
    #[must_use]
    pub const fn mutations(&self) -> usize {
        self.created + self.updated + self.deleted
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} deleted, {} skipped",
            self.created, self.updated, self.deleted, self.skipped
        )
    }
}

struct Plan<'a> {
    delete: Vec<&'a Endpoint>,
    update: Vec<(&'a Endpoint, Record)>,
    create: Vec<(&'a Endpoint, Vec<Record>)>,
}

impl<B: HostOverrideBackend> Provider<B> {
    /// Apply a changeset in the order delete, update, create
    ///
    /// Every endpoint is translated, and every non-registry delete or update
    /// checked for its UUID, before the first mutation, so validation and
    /// missing UUID errors leave the backend untouched. Registry records are
    /// resolved against the current rows when their turn comes. Endpoints of unsupported record
    /// types are skipped. Any other failure aborts the rest of the changeset;
    /// nothing already done is rolled back. When at least one mutation ran,
    /// the backend is committed once.
    ///
    /// # Errors
    ///
    /// Validation errors for malformed changesets, consistency errors when a
    /// row cannot be identified, and backend errors.
    pub async fn apply_changes(&self, changes: &Changes) -> Result<ApplyReport> {
        debug!(
            create = changes.create.len(),
            update = changes.update_new.len(),
            delete = changes.delete.len(),
            "Applying changes"
        );

        let mut report = ApplyReport::default();
        let plan = self.plan(changes, &mut report)?;

        let result = self.execute(plan, &mut report).await;

        if report.mutations() > 0 {
            match (&result, self.backend.commit().await) {
                (Ok(()), Err(err)) => return Err(err),
                (Err(_), Err(err)) => warn!(error = %err, "Commit after failed changeset also failed"),
                (_, Ok(())) => debug!("Committed changes"),
            }
        }

        result.map(|()| {
            info!(%report, "Applied changes");
            report
        })
    }

    fn plan<'a>(&self, changes: &'a Changes, report: &mut ApplyReport) -> Result<Plan<'a>> {
        let ownership = self.config.ownership_description;

        if changes.update_old.len() != changes.update_new.len() {
            return Err(DnsError::validation(
                "changes",
                format!(
                    "updateOld has {} endpoints but updateNew has {}",
                    changes.update_old.len(),
                    changes.update_new.len()
                ),
            ));
        }

        let mut delete = Vec::with_capacity(changes.delete.len());
        for ep in &changes.delete {
            if supported(ep, report) {
                check_addressable(ep)?;
                delete.push(ep);
            }
        }

        let mut update = Vec::with_capacity(changes.update_new.len());
        for (old, new) in changes.update_old.iter().zip(&changes.update_new) {
            if !(supported(old, report) && supported(new, report)) {
                continue;
            }
            if old.record_type != new.record_type {
                return Err(DnsError::validation(
                    &new.dns_name,
                    format!("record type cannot change from {} to {}", old.record_type, new.record_type),
                ));
            }
            check_addressable(old)?;
            update.push((old, Record::from_endpoint(new, ownership)?));
        }

        let mut create = Vec::with_capacity(changes.create.len());
        for ep in &changes.create {
            if supported(ep, report) {
                create.push((ep, Record::from_endpoint_targets(ep, ownership)?));
            }
        }

        Ok(Plan { delete, update, create })
    }

    async fn execute(&self, plan: Plan<'_>, report: &mut ApplyReport) -> Result<()> {
        for ep in plan.delete {
            let id = self.resolve_id(ep).await?;
            self.backend.delete(&id).await?;
            info!(
                dns_name = %ep.dns_name,
                record_type = %ep.record_type,
                id = %id,
                "Deleted host override"
            );
            report.deleted += 1;
        }

        for (old, record) in plan.update {
            let id = self.resolve_id(old).await?;
            self.backend.update(&id, &record.host).await?;
            info!(
                dns_name = %record.fqdn(),
                record_type = %record.record_type(),
                id = %id,
                "Updated host override"
            );
            report.updated += 1;
        }

        for (ep, records) in plan.create {
            for record in records {
                let id = self.backend.create(&record.host).await?;
                info!(
                    dns_name = %ep.dns_name,
                    record_type = %ep.record_type,
                    target = %record.target(),
                    id = %id,
                    "Created host override"
                );
                report.created += 1;
            }
        }

        Ok(())
    }

    /// UUID of the row an existing endpoint refers to
    async fn resolve_id(&self, ep: &Endpoint) -> Result<String> {
        if registry::is_registry_endpoint(ep) {
            debug!(dns_name = %ep.dns_name, "Matching registry record against current rows");
            let current = self.records().await?;
            let found = registry::find_match(&current, ep)?;
            return existing_id(found).map(ToString::to_string);
        }

        existing_id(ep).map(ToString::to_string)
    }
}

/// Non-registry endpoints must already carry the UUID of their row
fn check_addressable(ep: &Endpoint) -> Result<()> {
    if registry::is_registry_endpoint(ep) {
        Ok(())
    } else {
        existing_id(ep).map(|_| ())
    }
}

fn supported(ep: &Endpoint, report: &mut ApplyReport) -> bool {
    if ep.record_type.is_supported() {
        return true;
    }
    warn!(
        dns_name = %ep.dns_name,
        record_type = %ep.record_type,
        "Record type is not supported, skipping"
    );
    report.skipped += 1;
    false
}
