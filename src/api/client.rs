//! Tracker API client implementation.
//!
//! This module provides the main client for interacting with the Tracker REST API v2.
//! Every operation is a thin typed wrapper that builds an [`ApiRequest`] and hands it
//! to [`TrackerClient::execute`], which owns URL construction, status checking and
//! body decoding.

use std::fmt;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::auth::{Auth, AuthScheme};
use super::error::{ApiError, Result};
use super::pagination::{
    collect_numbered, collect_watermarked, CommentCursor, Page, PagePolicy, PageRequest,
};
use super::request::{ApiRequest, ApiResponse, RequestBody, ResponseMeta, MULTIPART_FIELD_NAME};
use super::types::{
    Attachment, Comment, CommentRequest, CommentUpdateRequest, Component, ComponentRequest,
    ComponentUpdateRequest, FileUpload, Issue, IssueCountRequest, IssueCreateRequest,
    IssueModifyRequest, IssueSearchRequest, Priority, Transition, TransitionRequest, User,
};
use super::urls;
use super::values::{CommentExpand, TransitionKind};

/// Production API root.
pub const DEFAULT_BASE_URL: &str = "https://api.tracker.yandex.net/v2";

/// Language used when the configured one is not supported.
pub const DEFAULT_LANGUAGE: &str = "ru";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const X_ORG_ID: &str = "X-Org-ID";
const X_CLOUD_ORG_ID: &str = "X-Cloud-Org-ID";

/// Organization scope sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Organization {
    /// Yandex 360 for Business organization.
    OrgId(String),
    /// Yandex Cloud Organization.
    CloudOrgId(String),
}

impl Organization {
    /// Pick the organization header from optional ids.
    ///
    /// A plain org id wins over a cloud org id; empty strings count as absent.
    pub fn resolve(org_id: Option<&str>, cloud_org_id: Option<&str>) -> Option<Self> {
        fn non_empty(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }

        match (non_empty(org_id), non_empty(cloud_org_id)) {
            (Some(id), _) => Some(Organization::OrgId(id.to_string())),
            (None, Some(id)) => Some(Organization::CloudOrgId(id.to_string())),
            (None, None) => None,
        }
    }

    pub fn header_name(&self) -> &'static str {
        match self {
            Organization::OrgId(_) => X_ORG_ID,
            Organization::CloudOrgId(_) => X_CLOUD_ORG_ID,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Organization::OrgId(id) | Organization::CloudOrgId(id) => id,
        }
    }
}

/// Map a requested language to a supported `Accept-Language` value.
///
/// Only `ru` and `en` are supported; anything else becomes [`DEFAULT_LANGUAGE`].
pub fn resolve_language(language: &str) -> &'static str {
    match language {
        "ru" => "ru",
        "en" => "en",
        _ => DEFAULT_LANGUAGE,
    }
}

/// Immutable client configuration.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    auth: Auth,
    language: &'static str,
    organization: Option<Organization>,
    timeout: Duration,
    page_policy: PagePolicy,
}

impl ClientConfig {
    /// Configuration for the production API with the given credentials.
    pub fn new(auth: Auth) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth,
            language: DEFAULT_LANGUAGE,
            organization: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_policy: PagePolicy::default(),
        }
    }

    /// Configuration using an OAuth token.
    pub fn oauth(token: &str) -> Self {
        Self::new(Auth::new(AuthScheme::OAuth, token))
    }

    /// Configuration using an IAM token.
    pub fn iam(token: &str) -> Self {
        Self::new(Auth::new(AuthScheme::Bearer, token))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = normalize_base_url(base_url);
        self
    }

    /// Set the response language. Unsupported values fall back to `ru`.
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = resolve_language(language);
        self
    }

    /// Set the organization from optional ids; see [`Organization::resolve`].
    pub fn with_organization(mut self, org_id: Option<&str>, cloud_org_id: Option<&str>) -> Self {
        self.organization = Organization::resolve(org_id, cloud_org_id);
        self
    }

    pub fn with_org_id(self, org_id: &str) -> Self {
        self.with_organization(Some(org_id), None)
    }

    /// Use a cloud organization, unless a plain org id is already set.
    pub fn with_cloud_org_id(mut self, cloud_org_id: &str) -> Self {
        if !matches!(self.organization, Some(Organization::OrgId(_))) {
            self.organization = Organization::resolve(None, Some(cloud_org_id));
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Error policy used by the `get_all_*` / `search_all_*` methods.
    pub fn with_page_policy(mut self, policy: PagePolicy) -> Self {
        self.page_policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn language(&self) -> &str {
        self.language
    }

    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn page_policy(&self) -> PagePolicy {
        self.page_policy
    }

    /// Headers sent with every request.
    pub fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        let mut auth_value = header_value(self.auth.header_value())?;
        auth_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth_value);

        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static(self.language),
        );

        if let Some(org) = &self.organization {
            headers.insert(
                HeaderName::from_static(org_header_key(org)),
                header_value(org.id())?,
            );
        }

        Ok(headers)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("language", &self.language)
            .field("organization", &self.organization)
            .field("timeout", &self.timeout)
            .field("page_policy", &self.page_policy)
            .finish()
    }
}

/// `HeaderName::from_static` requires lowercase.
fn org_header_key(org: &Organization) -> &'static str {
    match org {
        Organization::OrgId(_) => "x-org-id",
        Organization::CloudOrgId(_) => "x-cloud-org-id",
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| ApiError::Validation(format!("invalid header value: {}", e)))
}

/// The Tracker API client.
///
/// Cheap to share by reference across tasks; the configuration never changes
/// after construction.
#[derive(Debug)]
pub struct TrackerClient {
    client: Client,
    config: ClientConfig,
}

impl TrackerClient {
    /// Create a client. Does NOT validate the connection.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(config.default_headers()?)
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Transport)?;

        Ok(Self { client, config })
    }

    /// Create a client and validate it against `/myself`.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        info!("Creating Tracker client");
        let tracker = Self::new(config)?;
        tracker.validate_connection().await?;
        info!("Tracker client created and connection validated");
        Ok(tracker)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Validate the connection by calling the /myself endpoint.
    #[instrument(skip(self))]
    pub async fn validate_connection(&self) -> Result<User> {
        debug!("Validating Tracker connection");

        let user = self.get_myself().await.map_err(|e| {
            error!("Connection validation failed: {}", e);
            match e {
                ApiError::Api { .. } if e.is_unauthorized() => e,
                ApiError::Transport(_) => ApiError::ConnectionFailed(format!(
                    "Cannot connect to {}: {}",
                    self.config.base_url, e
                )),
                _ => ApiError::ConnectionFailed(e.to_string()),
            }
        })?;

        info!("Connected as user: {}", user.login);
        Ok(user)
    }

    // -----------------------------------------------------------------------
    // Executor
    // -----------------------------------------------------------------------

    /// Send a request and decode the 2xx body into `T`.
    ///
    /// Non-2xx responses become `ApiError::Api` with the raw body; the body is
    /// never decoded as `T` in that case.
    #[instrument(
        skip(self, request),
        fields(method = %request.endpoint().method, template = request.endpoint().template)
    )]
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<ApiResponse<T>> {
        let response = self.send(request).await?;
        let meta = response_meta(&response);
        let text = response.text().await?;

        let data = serde_json::from_str(&text).map_err(|e| {
            debug!("Undecodable response body: {}", text);
            ApiError::Decode(format!("{} (status {})", e, meta.status))
        })?;

        Ok(ApiResponse { data, meta })
    }

    /// Send a request whose success body is ignored.
    #[instrument(
        skip(self, request),
        fields(method = %request.endpoint().method, template = request.endpoint().template)
    )]
    pub async fn execute_empty(&self, request: ApiRequest) -> Result<ResponseMeta> {
        let response = self.send(request).await?;
        Ok(response_meta(&response))
    }

    /// Build the full URL for a request: base + rendered template + query.
    pub fn build_url(&self, request: &ApiRequest) -> Result<Url> {
        let path = request.render_path()?;
        let mut url = Url::parse(&format!("{}{}", self.config.base_url, path)).map_err(|e| {
            ApiError::MalformedRequest(format!("invalid URL '{}{}': {}", self.config.base_url, path, e))
        })?;

        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        Ok(url)
    }

    async fn send(&self, request: ApiRequest) -> Result<Response> {
        let url = self.build_url(&request)?;
        let endpoint = request.endpoint();
        let body = request.into_body();

        if endpoint.multipart != matches!(body, RequestBody::Multipart(_)) {
            return Err(ApiError::MalformedRequest(format!(
                "{} {} expects a {} body",
                endpoint.method,
                endpoint.template,
                if endpoint.multipart { "multipart" } else { "JSON or empty" }
            )));
        }

        debug!("{} {}", endpoint.method, url);

        let builder = self.client.request(endpoint.method.clone(), url);
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(file) => builder.multipart(multipart_form(file)?),
        };

        let response = builder.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let body = error_body(status, response.text().await);
            debug!("Error response body: {}", body);
            Err(ApiError::from_status(status, body))
        }
    }

    // -----------------------------------------------------------------------
    // Issues
    // -----------------------------------------------------------------------

    /// Create an issue. `POST /issues/`
    #[instrument(skip(self, req), fields(queue = %req.queue.key))]
    pub async fn create_issue(&self, req: &IssueCreateRequest) -> Result<Issue> {
        let request = ApiRequest::new(&urls::ISSUE_CREATE).json(req)?;
        let issue = self.execute::<Issue>(request).await?.into_data();
        debug!("Created issue: {}", issue.key);
        Ok(issue)
    }

    /// Get an issue by id or key, optionally expanding attachments and transitions.
    #[instrument(skip(self), fields(issue_id = %issue_id))]
    pub async fn get_issue(
        &self,
        issue_id: &str,
        expand_attachments: bool,
        expand_transitions: bool,
    ) -> Result<Issue> {
        let mut expand = Vec::new();
        if expand_attachments {
            expand.push("attachments");
        }
        if expand_transitions {
            expand.push("transitions");
        }

        let request = ApiRequest::new(&urls::ISSUE_GET)
            .path("issue_id", issue_id)
            .query_values("expand", expand);
        Ok(self.execute(request).await?.into_data())
    }

    /// Count issues matching a filter or query.
    #[instrument(skip(self, req))]
    pub async fn count_issues(&self, req: &IssueCountRequest) -> Result<i64> {
        let request = ApiRequest::new(&urls::ISSUES_COUNT).json(req)?;
        Ok(self.execute(request).await?.into_data())
    }

    /// Fetch one page of search results. Unset page size defaults to 5, page to 1.
    #[instrument(skip(self, req), fields(page = page.page, per_page = page.per_page))]
    pub async fn search_issues_page(
        &self,
        req: &IssueSearchRequest,
        page: PageRequest,
    ) -> Result<Page<Issue>> {
        let request = ApiRequest::new(&urls::ISSUES_SEARCH)
            .with_page(page)
            .json(req)?;
        self.fetch_page(request).await
    }

    /// Fetch every page of search results, 50 per page.
    pub async fn search_all_issues(&self, req: &IssueSearchRequest) -> Result<Vec<Issue>> {
        self.search_all_issues_with_policy(req, self.config.page_policy)
            .await
    }

    #[instrument(skip(self, req))]
    pub async fn search_all_issues_with_policy(
        &self,
        req: &IssueSearchRequest,
        policy: PagePolicy,
    ) -> Result<Vec<Issue>> {
        let issues =
            collect_numbered(policy, move |page| self.search_issues_page(req, page)).await?;
        debug!("Found {} issues", issues.len());
        Ok(issues)
    }

    /// Modify an issue's fields.
    #[instrument(skip(self, req), fields(issue_id = %issue_id))]
    pub async fn modify_issue(&self, issue_id: &str, req: &IssueModifyRequest) -> Result<Issue> {
        let request = ApiRequest::new(&urls::ISSUE_MODIFY)
            .path("issue_id", issue_id)
            .json(req)?;
        Ok(self.execute(request).await?.into_data())
    }

    /// Execute a workflow transition. Returns the transitions available afterwards.
    #[instrument(skip(self, req), fields(issue_id = %issue_id, transition_id = %transition_id))]
    pub async fn execute_transition(
        &self,
        issue_id: &str,
        transition_id: &str,
        req: &TransitionRequest,
    ) -> Result<Vec<Transition>> {
        let request = ApiRequest::new(&urls::ISSUE_TRANSITION_EXECUTE)
            .path("issue_id", issue_id)
            .path("transition_id", transition_id)
            .json(req)?;
        Ok(self.execute(request).await?.into_data())
    }

    /// Execute a standard transition with its preset body.
    pub async fn execute_transition_kind(
        &self,
        issue_id: &str,
        kind: TransitionKind,
        assignee: Option<&str>,
    ) -> Result<Vec<Transition>> {
        if assignee.is_some() && !kind.accepts_assignee() {
            warn!(transition = %kind, "Transition does not take an assignee, ignoring it");
        }
        let req = TransitionRequest::for_kind(kind, assignee);
        self.execute_transition(issue_id, kind.id(), &req).await
    }

    /// List transitions currently available for an issue.
    #[instrument(skip(self), fields(issue_id = %issue_id))]
    pub async fn get_issue_transitions(&self, issue_id: &str) -> Result<Vec<Transition>> {
        let request = ApiRequest::new(&urls::ISSUE_TRANSITIONS).path("issue_id", issue_id);
        Ok(self.execute(request).await?.into_data())
    }

    // -----------------------------------------------------------------------
    // Comments
    // -----------------------------------------------------------------------

    #[instrument(skip(self, req), fields(issue_id = %issue_id))]
    pub async fn create_comment(&self, issue_id: &str, req: &CommentRequest) -> Result<Comment> {
        let request = ApiRequest::new(&urls::COMMENT_CREATE)
            .path("issue_id", issue_id)
            .json(req)?;
        Ok(self.execute(request).await?.into_data())
    }

    #[instrument(skip(self), fields(issue_id = %issue_id))]
    pub async fn get_comment(&self, issue_id: &str, comment_id: i64) -> Result<Comment> {
        let request = ApiRequest::new(&urls::COMMENT_GET)
            .path("issue_id", issue_id)
            .path("comment_id", comment_id);
        Ok(self.execute(request).await?.into_data())
    }

    /// Fetch up to `cursor.per_page` comments after `cursor.from_id`.
    ///
    /// The returned page's `info.last_id` is the id of its last comment, or 0
    /// for an empty page.
    #[instrument(skip(self), fields(issue_id = %issue_id, from_id = cursor.from_id))]
    pub async fn get_comments_page(
        &self,
        issue_id: &str,
        expand: CommentExpand,
        cursor: CommentCursor,
    ) -> Result<Page<Comment>> {
        let request = ApiRequest::new(&urls::COMMENTS_LIST)
            .path("issue_id", issue_id)
            .query_opt("expand", expand.as_query())
            .query("perPage", cursor.per_page())
            .query_opt("id", cursor.from_id_query());

        let response = self.execute::<Vec<Comment>>(request).await?;
        let last_id = response.data.last().map(|c| c.id).unwrap_or(0);
        let info = response.meta.page_info().with_last_id(last_id);
        Ok(Page::new(response.data, info))
    }

    /// Fetch all comments of an issue, 50 per page.
    pub async fn get_all_comments(
        &self,
        issue_id: &str,
        expand: CommentExpand,
    ) -> Result<Vec<Comment>> {
        self.get_all_comments_with_policy(issue_id, expand, self.config.page_policy)
            .await
    }

    #[instrument(skip(self), fields(issue_id = %issue_id))]
    pub async fn get_all_comments_with_policy(
        &self,
        issue_id: &str,
        expand: CommentExpand,
        policy: PagePolicy,
    ) -> Result<Vec<Comment>> {
        let comments = collect_watermarked(policy, 0, move |cursor| {
            self.get_comments_page(issue_id, expand, cursor)
        })
        .await?;
        debug!("Fetched {} comments", comments.len());
        Ok(comments)
    }

    #[instrument(skip(self, req), fields(issue_id = %issue_id))]
    pub async fn update_comment(
        &self,
        issue_id: &str,
        comment_id: i64,
        req: &CommentUpdateRequest,
    ) -> Result<Comment> {
        let request = ApiRequest::new(&urls::COMMENT_UPDATE)
            .path("issue_id", issue_id)
            .path("comment_id", comment_id)
            .json(req)?;
        Ok(self.execute(request).await?.into_data())
    }

    #[instrument(skip(self), fields(issue_id = %issue_id))]
    pub async fn delete_comment(&self, issue_id: &str, comment_id: i64) -> Result<()> {
        let request = ApiRequest::new(&urls::COMMENT_DELETE)
            .path("issue_id", issue_id)
            .path("comment_id", comment_id);
        self.execute_empty(request).await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Priorities
    // -----------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn get_priorities_page(
        &self,
        localized: bool,
        page: PageRequest,
    ) -> Result<Page<Priority>> {
        let request = ApiRequest::new(&urls::PRIORITIES_LIST)
            .with_page(page)
            .query("localized", localized);
        self.fetch_page(request).await
    }

    pub async fn get_all_priorities(&self, localized: bool) -> Result<Vec<Priority>> {
        self.get_all_priorities_with_policy(localized, self.config.page_policy)
            .await
    }

    pub async fn get_all_priorities_with_policy(
        &self,
        localized: bool,
        policy: PagePolicy,
    ) -> Result<Vec<Priority>> {
        collect_numbered(policy, move |page| self.get_priorities_page(localized, page)).await
    }

    #[instrument(skip(self))]
    pub async fn get_priority(&self, priority_id: i64, localized: bool) -> Result<Priority> {
        let request = ApiRequest::new(&urls::PRIORITY_GET)
            .path("priority_id", priority_id)
            .query("localized", localized);
        Ok(self.execute(request).await?.into_data())
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    /// Get the account the token belongs to.
    #[instrument(skip(self))]
    pub async fn get_myself(&self) -> Result<User> {
        let request = ApiRequest::new(&urls::MYSELF);
        Ok(self.execute(request).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn get_users_page(&self, page: PageRequest) -> Result<Page<User>> {
        let request = ApiRequest::new(&urls::USERS_LIST).with_page(page);
        self.fetch_page(request).await
    }

    pub async fn get_all_users(&self) -> Result<Vec<User>> {
        self.get_all_users_with_policy(self.config.page_policy).await
    }

    pub async fn get_all_users_with_policy(&self, policy: PagePolicy) -> Result<Vec<User>> {
        collect_numbered(policy, move |page| self.get_users_page(page)).await
    }

    /// Get a user by login, or by numeric id when `login` is empty.
    #[instrument(skip(self))]
    pub async fn get_user(&self, login: &str, user_id: i64) -> Result<User> {
        let request =
            ApiRequest::new(&urls::USER_GET).path("login_or_user_id", user_path_id(login, user_id)?);
        Ok(self.execute(request).await?.into_data())
    }

    // -----------------------------------------------------------------------
    // Components
    // -----------------------------------------------------------------------

    #[instrument(skip(self, req), fields(queue = %req.queue, name = %req.name))]
    pub async fn create_component(&self, req: &ComponentRequest) -> Result<Component> {
        let request = ApiRequest::new(&urls::COMPONENT_CREATE).json(req)?;
        Ok(self.execute(request).await?.into_data())
    }

    #[instrument(skip(self))]
    pub async fn get_components_page(&self, page: PageRequest) -> Result<Page<Component>> {
        let request = ApiRequest::new(&urls::COMPONENTS_LIST).with_page(page);
        self.fetch_page(request).await
    }

    pub async fn get_all_components(&self) -> Result<Vec<Component>> {
        self.get_all_components_with_policy(self.config.page_policy)
            .await
    }

    pub async fn get_all_components_with_policy(
        &self,
        policy: PagePolicy,
    ) -> Result<Vec<Component>> {
        collect_numbered(policy, move |page| self.get_components_page(page)).await
    }

    #[instrument(skip(self))]
    pub async fn get_component(&self, component_id: i64) -> Result<Component> {
        let request = ApiRequest::new(&urls::COMPONENT_GET).path("component_id", component_id);
        Ok(self.execute(request).await?.into_data())
    }

    /// Update a component. `version` must match the current component version.
    #[instrument(skip(self, req))]
    pub async fn update_component(
        &self,
        component_id: i64,
        version: i64,
        req: &ComponentUpdateRequest,
    ) -> Result<Component> {
        let request = ApiRequest::new(&urls::COMPONENT_UPDATE)
            .path("component_id", component_id)
            .query("version", version)
            .json(req)?;
        Ok(self.execute(request).await?.into_data())
    }

    // -----------------------------------------------------------------------
    // Attachments
    // -----------------------------------------------------------------------

    /// Upload a file not yet linked to any issue.
    ///
    /// The returned id can be passed in `attachment_ids` of issue or comment bodies.
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload_temporary_attachment(&self, file: FileUpload) -> Result<Attachment> {
        let request = ApiRequest::new(&urls::ATTACHMENT_UPLOAD).multipart(file);
        Ok(self.execute(request).await?.into_data())
    }

    /// Upload a file and attach it to an issue.
    #[instrument(skip(self, file), fields(issue_id = %issue_id, file_name = %file.file_name))]
    pub async fn attach_file(&self, issue_id: &str, file: FileUpload) -> Result<Attachment> {
        let request = ApiRequest::new(&urls::ISSUE_ATTACH_FILE)
            .path("issue_id", issue_id)
            .multipart(file);
        Ok(self.execute(request).await?.into_data())
    }

    #[instrument(skip(self), fields(issue_id = %issue_id))]
    pub async fn get_issue_attachments(&self, issue_id: &str) -> Result<Vec<Attachment>> {
        let request = ApiRequest::new(&urls::ISSUE_ATTACHMENTS).path("issue_id", issue_id);
        Ok(self.execute(request).await?.into_data())
    }

    #[instrument(skip(self), fields(issue_id = %issue_id, attachment_id = %attachment_id))]
    pub async fn get_issue_attachment(
        &self,
        issue_id: &str,
        attachment_id: &str,
    ) -> Result<Attachment> {
        let request = ApiRequest::new(&urls::ISSUE_ATTACHMENT_GET)
            .path("issue_id", issue_id)
            .path("attachment_id", attachment_id);
        Ok(self.execute(request).await?.into_data())
    }

    #[instrument(skip(self), fields(issue_id = %issue_id, file_id = %file_id))]
    pub async fn delete_attachment(&self, issue_id: &str, file_id: &str) -> Result<()> {
        let request = ApiRequest::new(&urls::ISSUE_ATTACHMENT_DELETE)
            .path("issue_id", issue_id)
            .path("file_id", file_id);
        self.execute_empty(request).await?;
        Ok(())
    }

    async fn fetch_page<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Page<T>> {
        let response = self.execute::<Vec<T>>(request).await?;
        let info = response.meta.page_info();
        debug!(
            items = response.data.len(),
            total_pages = info.total_pages,
            total_count = info.total_count,
            "Fetched page"
        );
        Ok(Page::new(response.data, info))
    }
}

impl ApiRequest {
    /// Attach `perPage`/`page` with single-page defaults applied.
    fn with_page(self, page: PageRequest) -> Self {
        page.query_pairs()
            .into_iter()
            .fold(self, |req, (name, value)| req.query(name, value))
    }
}

/// Path segment for user lookup.
///
/// A non-empty login wins; an all-digit login gets a `login:` prefix so it is
/// not read as a user id. With an empty login the numeric id is used.
pub fn user_path_id(login: &str, user_id: i64) -> Result<String> {
    if !login.is_empty() {
        if login.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(format!("login:{}", login));
        }
        return Ok(login.to_string());
    }
    if user_id <= 0 {
        return Err(ApiError::Validation(
            "either a login or a positive user id is required".to_string(),
        ));
    }
    Ok(user_id.to_string())
}

/// Body text of an error response. A failed read keeps the status and logs why
/// the body is missing.
fn error_body<E: fmt::Display>(status: StatusCode, read: std::result::Result<String, E>) -> String {
    read.unwrap_or_else(|e| {
        warn!(%status, error = %e, "Failed to read error response body");
        String::new()
    })
}

fn response_meta(response: &Response) -> ResponseMeta {
    ResponseMeta {
        status: response.status(),
        headers: response.headers().clone(),
    }
}

fn multipart_form(file: FileUpload) -> Result<Form> {
    let mut part = Part::bytes(file.bytes).file_name(file.file_name);
    if let Some(mime) = &file.mime_type {
        part = part
            .mime_str(mime)
            .map_err(|e| ApiError::Validation(format!("invalid mime type '{}': {}", mime, e)))?;
    }
    Ok(Form::new().part(MULTIPART_FIELD_NAME, part))
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}
