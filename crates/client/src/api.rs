//! REST API gateway client.
//!
//! One method per remote operation. Every method issues exactly one HTTP
//! call and returns the parsed JSON body unchanged; shape normalization is
//! left to the view model. There are no retries, no timeouts and no caching.

use portal_core::identity::Scope;
use portal_core::models::Attachment;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde_json::{json, Map, Value};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Multipart part name for task attachments.
pub const ATTACHMENT_FIELD: &str = "file_upload";

/// HTTP client for the portal REST API.
#[derive(Debug, Clone)]
pub struct PortalApi {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

/// Errors from the REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    /// A 2xx response whose body is not JSON.
    #[error("Response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status of a rejected request.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}

impl PortalApi {
    /// Create a client for the API rooted at `api_url`.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            api_url,
            token: None,
        }
    }

    /// Attach the session's bearer token to every request.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- authentication ----

    /// `POST /customers/login`. The body is the identity blob.
    pub async fn login_customer(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let body = json!({"email": email, "password": password});
        self.send(self.request(Method::POST, "/customers/login").json(&body))
            .await
    }

    /// `POST /users/login`.
    pub async fn login_user(&self, email: &str, password: &str) -> Result<Value, ApiError> {
        let body = json!({"email": email, "password": password});
        self.send(self.request(Method::POST, "/users/login").json(&body))
            .await
    }

    // ---- customers and users ----

    pub async fn get_customer(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/customers/{id}")).await
    }

    /// `PUT /customers/{id}` with the changed profile fields.
    pub async fn update_customer(&self, id: &str, body: &Value) -> Result<Value, ApiError> {
        self.put(&format!("/customers/{id}"), body).await
    }

    /// `PUT /customers/{id}/password`.
    pub async fn change_customer_password(&self, id: &str, body: &Value) -> Result<Value, ApiError> {
        self.put(&format!("/customers/{id}/password"), body).await
    }

    pub async fn get_user(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/users/{id}")).await
    }

    pub async fn update_user(&self, id: &str, body: &Value) -> Result<Value, ApiError> {
        self.put(&format!("/users/{id}"), body).await
    }

    pub async fn change_user_password(&self, id: &str, body: &Value) -> Result<Value, ApiError> {
        self.put(&format!("/users/{id}/password"), body).await
    }

    /// `GET /users`: every operator account.
    pub async fn list_users(&self) -> Result<Value, ApiError> {
        self.get("/users").await
    }

    // ---- scoped collections ----

    pub async fn list_projects(&self, scope: &Scope) -> Result<Value, ApiError> {
        self.get(&scoped_path("projects", scope)).await
    }

    pub async fn list_orders(&self, scope: &Scope) -> Result<Value, ApiError> {
        self.get(&scoped_path("orders", scope)).await
    }

    pub async fn list_assets(&self, scope: &Scope) -> Result<Value, ApiError> {
        self.get(&scoped_path("assets", scope)).await
    }

    pub async fn list_tasks(&self, scope: &Scope) -> Result<Value, ApiError> {
        self.get(&scoped_path("tasks", scope)).await
    }

    // ---- relationship-scoped collections ----

    /// `GET /orders/project/{id}`.
    pub async fn orders_by_project(&self, project_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/orders/project/{project_id}")).await
    }

    /// `GET /assets/project/{id}`: candidates for a task's asset selector.
    pub async fn assets_by_project(&self, project_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/assets/project/{project_id}")).await
    }

    /// `GET /tasks/order/{id}`.
    pub async fn tasks_by_order(&self, order_id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/tasks/order/{order_id}")).await
    }

    // ---- single records ----

    pub async fn get_project(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/projects/{id}")).await
    }

    pub async fn get_order(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/orders/{id}")).await
    }

    pub async fn get_asset(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/assets/{id}")).await
    }

    pub async fn get_task(&self, id: &str) -> Result<Value, ApiError> {
        self.get(&format!("/tasks/{id}")).await
    }

    pub async fn delete_order(&self, id: &str) -> Result<Value, ApiError> {
        self.send(self.request(Method::DELETE, &format!("/orders/{id}")))
            .await
    }

    pub async fn delete_task(&self, id: &str) -> Result<Value, ApiError> {
        self.send(self.request(Method::DELETE, &format!("/tasks/{id}")))
            .await
    }

    // ---- task mutations ----

    /// `POST /tasks`. Multipart when `attachments` is non-empty, JSON otherwise.
    pub async fn create_task(
        &self,
        body: &Map<String, Value>,
        attachments: &[Attachment],
    ) -> Result<Value, ApiError> {
        let request = self.request(Method::POST, "/tasks");
        self.send(with_task_body(request, body, attachments)?).await
    }

    /// `PUT /tasks/{id}`. Same encoding rules as [`Self::create_task`].
    pub async fn update_task(
        &self,
        id: &str,
        body: &Map<String, Value>,
        attachments: &[Attachment],
    ) -> Result<Value, ApiError> {
        let request = self.request(Method::PUT, &format!("/tasks/{id}"));
        self.send(with_task_body(request, body, attachments)?).await
    }

    // ---- private helpers ----

    async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<Value, ApiError> {
        self.send(self.request(Method::PUT, path).json(body)).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{}", self.api_url, path))
            .header(REQUEST_ID_HEADER, uuid::Uuid::new_v4().to_string());
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request.send().await?;
        tracing::debug!(
            url = %response.url(),
            status = response.status().as_u16(),
            "API response"
        );
        Self::parse_response(response).await
    }

    /// Ensure the response has a success status code, or turn it into
    /// [`ApiError::RequestFailed`] with the server's message.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::RequestFailed {
            status: status.as_u16(),
            message: failure_message(status, &body),
        })
    }

    /// Parse a successful response body. An empty body is `null`.
    async fn parse_response(response: reqwest::Response) -> Result<Value, ApiError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn scoped_path(collection: &str, scope: &Scope) -> String {
    match scope {
        Scope::Customer(id) => format!("/{collection}/customer/{id}"),
        Scope::Employee(id) => format!("/{collection}/employee/{id}"),
        Scope::All => format!("/{collection}"),
    }
}

/// The server's `message` or `error` field when present, else the
/// canonical reason phrase.
fn failure_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["message", "error"]
            .iter()
            .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
    });
    from_body
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "Request failed".to_string())
}

fn with_task_body(
    request: RequestBuilder,
    body: &Map<String, Value>,
    attachments: &[Attachment],
) -> Result<RequestBuilder, ApiError> {
    if attachments.is_empty() {
        return Ok(request.json(body));
    }

    let mut form = Form::new();
    for (key, value) in body {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Null => continue,
            other => other.to_string(),
        };
        form = form.text(key.clone(), text);
    }
    for attachment in attachments {
        let part = Part::bytes(attachment.bytes.clone()).file_name(attachment.file_name.clone());
        let part = match &attachment.content_type {
            Some(mime) => part.mime_str(mime)?,
            None => part,
        };
        form = form.part(ATTACHMENT_FIELD, part);
    }
    Ok(request.multipart(form))
}
