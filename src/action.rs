//! Entry point of the branch cleanup step.
//!
//! Resolves inputs against the triggering GitHub event, decides whether the
//! event concerns a branch at all, and queues the delete.

use std::path::Path;

use serde::Deserialize;

use crate::{ClientOptions, CodeRefsClient, CodeRefsError, Result, DEFAULT_BASE_URI};

/// Action inputs after flag/env parsing. Empty strings count as absent.
#[derive(Clone, Debug, Default)]
pub struct ActionInputs {
    pub access_token: Option<String>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub base_uri: Option<String>,
    /// Run even for non-branch delete events.
    pub force: bool,
    pub options: ClientOptions,
}

/// The triggering event, as far as this step cares.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventContext {
    pub event_name: String,
    pub ref_type: Option<String>,
    pub ref_name: Option<String>,
    pub repository_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct EventPayload {
    #[serde(rename = "ref")]
    ref_name: Option<String>,
    ref_type: Option<String>,
    repository: Option<RepositoryPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct RepositoryPayload {
    name: Option<String>,
}

impl EventContext {
    /// Reads `GITHUB_EVENT_NAME`, the JSON payload at `GITHUB_EVENT_PATH`
    /// and `GITHUB_REPOSITORY`. A missing or unreadable payload leaves the
    /// payload-derived fields empty.
    pub fn from_env() -> Self {
        let event_name = std::env::var("GITHUB_EVENT_NAME").unwrap_or_default();
        let github_repository = std::env::var("GITHUB_REPOSITORY").ok();
        let payload = std::env::var_os("GITHUB_EVENT_PATH")
            .and_then(|path| read_payload(Path::new(&path)))
            .unwrap_or_default();
        Self::from_payload(event_name, &payload, github_repository.as_deref())
    }

    /// Builds the context from a raw webhook payload.
    ///
    /// The repository name comes from `repository.name` in the payload, or
    /// else from the `name` half of an `owner/name` string.
    pub fn from_payload(
        event_name: impl Into<String>,
        payload: &str,
        github_repository: Option<&str>,
    ) -> Self {
        let parsed: EventPayload = if payload.trim().is_empty() {
            EventPayload::default()
        } else {
            serde_json::from_str(payload).unwrap_or_else(|err| {
                tracing::warn!(%err, "ignoring unparseable event payload");
                EventPayload::default()
            })
        };

        let repository_name = parsed
            .repository
            .and_then(|repo| repo.name)
            .filter(|name| !name.is_empty())
            .or_else(|| {
                github_repository
                    .and_then(|full| full.split('/').nth(1))
                    .filter(|name| !name.is_empty())
                    .map(str::to_owned)
            });

        Self {
            event_name: event_name.into(),
            ref_type: parsed.ref_type.filter(|value| !value.is_empty()),
            ref_name: parsed.ref_name.filter(|value| !value.is_empty()),
            repository_name,
        }
    }
}

fn read_payload(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "cannot read event payload");
            None
        }
    }
}

/// Returns the skip reason when `event` is a delete of something other
/// than a branch (typically a tag) and `force` is not set.
pub fn should_skip(event: &EventContext, force: bool) -> Option<String> {
    if force || event.event_name != "delete" {
        return None;
    }
    match event.ref_type.as_deref() {
        Some(ref_type) if ref_type != "branch" => {
            Some(format!("Skipping non-branch delete event (ref_type={ref_type})"))
        }
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Skipped { ref_type: String },
    Queued { repo_key: String, branch: String },
}

/// Runs the cleanup step once.
pub async fn run(inputs: ActionInputs, event: &EventContext) -> Result<RunOutcome> {
    let token = non_empty(inputs.access_token)
        .ok_or_else(|| CodeRefsError::Configuration("Access token not found".to_owned()))?;
    let base_uri = non_empty(inputs.base_uri).unwrap_or_else(|| DEFAULT_BASE_URI.to_owned());
    let repo_key = non_empty(inputs.repo)
        .or_else(|| event.repository_name.clone())
        .ok_or_else(|| CodeRefsError::Configuration("Repository key not found".to_owned()))?;
    let branch = non_empty(inputs.branch)
        .or_else(|| event.ref_name.clone())
        .ok_or_else(|| CodeRefsError::Configuration("Branch ref not found".to_owned()))?;

    if let Some(reason) = should_skip(event, inputs.force) {
        tracing::info!("{reason}");
        return Ok(RunOutcome::Skipped {
            ref_type: event.ref_type.clone().unwrap_or_default(),
        });
    }

    tracing::info!("Deleting LaunchDarkly Code Refs branch '{branch}' in repo '{repo_key}'...");

    CodeRefsClient::new(token)
        .with_base_uri(base_uri)
        .with_options(inputs.options)
        .delete_branch(&repo_key, &branch)
        .await?;

    tracing::info!("LaunchDarkly Code Refs branch delete queued successfully.");
    Ok(RunOutcome::Queued { repo_key, branch })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
