//! Validate, split and store a site in one call.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::{SiteRequest, ValidationMode};
use crate::console_log;
use crate::error::{SiteError, SiteResult};
use crate::models::{BuildSite, SplitResult};
use crate::site_store::SiteStore;
use crate::splitter::split;
use crate::validator::{validate, validate_all};

#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub message: String,
    pub project_name: String,
    pub buildings_saved: usize,
    pub replaced_previous: bool,
}

/// Structural and geometric checks according to `mode`.
pub fn check_site(site: &BuildSite, tolerance: u32, mode: ValidationMode) -> SiteResult<()> {
    site.check_structure()?;
    match mode {
        ValidationMode::FailFast => validate(site, tolerance),
        ValidationMode::Accumulate => {
            let errors = validate_all(site, tolerance);
            if errors.is_empty() {
                Ok(())
            } else {
                Err(SiteError::Invalid(errors))
            }
        }
    }
}

/// Validate and split without touching the store.
pub fn split_checked(request: &SiteRequest) -> SiteResult<BTreeMap<usize, SplitResult>> {
    check_site(&request.site, request.tolerance, request.validation_mode)?;
    Ok(split(
        &request.project_name,
        &request.site.buildings,
        &request.site.plateaus,
    ))
}

/// Validate, split and overwrite the project's stored results. Nothing is
/// stored when validation fails.
pub fn process_site(request: &SiteRequest, store: &mut SiteStore) -> SiteResult<ProcessOutcome> {
    let results = split_checked(request)?;
    let buildings_saved = results.len();
    let replaced_previous = store.replace_project(&request.project_name, results);

    let mut message = String::new();
    if replaced_previous {
        message.push_str("Old project entry deleted. ");
    }
    message.push_str("New project data saved.");

    console_log!(
        "Saved {} building(s) for project '{}'",
        buildings_saved,
        request.project_name
    );

    Ok(ProcessOutcome {
        message,
        project_name: request.project_name.clone(),
        buildings_saved,
        replaced_previous,
    })
}

/// [`process_site`] against the global store.
pub fn process_site_global(request: &SiteRequest) -> SiteResult<ProcessOutcome> {
    SiteStore::with_mut(|store| process_site(request, store))
}
