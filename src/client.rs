use std::fmt;
use std::time::Duration;

use reqwest::{
    header::{self, HeaderValue},
    Method, Url,
};

use crate::{retry, ClientOptions, CodeRefsError, Logger, RequestDescriptor, Result};

/// Production LaunchDarkly host.
pub const DEFAULT_BASE_URI: &str = "https://app.launchdarkly.com";

const REPOSITORIES_PATH: &str = "/api/v2/code-refs/repositories";

/// Builds the branch-delete-tasks endpoint for `repo_key`.
///
/// The repository key is percent-encoded as one path segment, so
/// `"my/repo"` becomes `my%2Frepo`. Any path, query or fragment on
/// `base_uri` is discarded.
///
/// Example: `("https://app.launchdarkly.com", "web")` →
/// `"https://app.launchdarkly.com/api/v2/code-refs/repositories/web/branch-delete-tasks"`
pub fn branch_delete_url(base_uri: &str, repo_key: &str) -> Result<Url> {
    let mut url = Url::parse(base_uri)
        .map_err(|err| CodeRefsError::InvalidUrl(format!("{base_uri}: {err}")))?;
    url.set_query(None);
    url.set_fragment(None);
    url.set_path(REPOSITORIES_PATH);
    url.path_segments_mut()
        .map_err(|()| CodeRefsError::InvalidUrl(format!("{base_uri}: cannot be a base")))?
        .push(repo_key)
        .push("branch-delete-tasks");
    Ok(url)
}

#[derive(Clone)]
/// HTTP client for the LaunchDarkly Code References API.
pub struct CodeRefsClient {
    http: reqwest::Client,
    base_uri: String,
    token: String,
    options: ClientOptions,
    logger: Logger,
}

impl fmt::Debug for CodeRefsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeRefsClient")
            .field("base_uri", &self.base_uri)
            .field("token", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

impl CodeRefsClient {
    /// Creates a client against the production host.
    ///
    /// `token` is sent verbatim as the `Authorization` header value; API
    /// access tokens carry no scheme prefix.
    pub fn new(token: impl Into<String>) -> Self {
        let options = ClientOptions::default();
        Self {
            http: build_http(&options),
            base_uri: DEFAULT_BASE_URI.to_owned(),
            token: token.into(),
            options,
            logger: Logger::info(),
        }
    }

    /// Points the client at another host, e.g. a federal or EU instance.
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = base_uri.into();
        self
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.http = build_http(&opts);
        self.options = opts;
        self
    }

    /// Replaces the sink for retry progress messages (default: `tracing` info).
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Queues deletion of `branch` from the indexed repository `repo_key`.
    ///
    /// Transient failures are retried per [`ClientOptions`]. A terminal
    /// non-success response becomes [`CodeRefsError::Service`]; a success
    /// response is returned untouched.
    pub async fn delete_branch(&self, repo_key: &str, branch: &str) -> Result<reqwest::Response> {
        let request = self.branch_delete_request(repo_key, branch)?;
        let config = self.options.retry_config(self.logger.clone());

        let response = retry::execute(&self.http, &request, config).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        // Best-effort: an unreadable body counts as empty.
        let body = response.text().await.unwrap_or_default();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or_default().to_owned()
        } else {
            body
        };
        tracing::debug!(status = status.as_u16(), "branch delete rejected");

        Err(CodeRefsError::Service {
            status: status.as_u16(),
            message,
        })
    }

    fn branch_delete_request(&self, repo_key: &str, branch: &str) -> Result<RequestDescriptor> {
        let url = branch_delete_url(&self.base_uri, repo_key)?;
        let authorization = HeaderValue::from_str(&self.token).map_err(|_| {
            CodeRefsError::Configuration("access token is not a valid header value".to_owned())
        })?;

        RequestDescriptor::new(Method::POST, url)
            .header(header::AUTHORIZATION, authorization)
            .header(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(header::ACCEPT, HeaderValue::from_static("application/json"))
            .json(&[branch])
    }
}

/// One-shot convenience over [`CodeRefsClient::delete_branch`] with default
/// options. `base_uri` defaults to [`DEFAULT_BASE_URI`].
pub async fn delete_branch(
    token: &str,
    repo_key: &str,
    branch: &str,
    base_uri: Option<&str>,
) -> Result<reqwest::Response> {
    CodeRefsClient::new(token)
        .with_base_uri(base_uri.unwrap_or(DEFAULT_BASE_URI))
        .delete_branch(repo_key, branch)
        .await
}

fn build_http(options: &ClientOptions) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_millis(options.timeout_ms))
        .build()
        // Only fails if the TLS backend cannot initialise; fall back to defaults.
        .unwrap_or_else(|_| reqwest::Client::new())
}
