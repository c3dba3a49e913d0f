//! In-process fake of the portal REST API.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Multipart, Path, Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use portal_client::PortalApi;
use serde_json::{json, Value};

/// Every request the fake received, as `"METHOD /path"`.
#[derive(Clone, Default)]
pub struct Hits(Arc<Mutex<Vec<String>>>);

impl Hits {
    pub fn all(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn contains(&self, hit: &str) -> bool {
        self.all().iter().any(|h| h == hit)
    }
}

pub struct FakeApi {
    pub api: PortalApi,
    pub hits: Hits,
}

async fn record(State(hits): State<Hits>, request: Request, next: Next) -> Response {
    hits.0
        .lock()
        .unwrap()
        .push(format!("{} {}", request.method(), request.uri().path()));
    next.run(request).await
}

fn failure(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

// -- fixtures -----------------------------------------------------------------

pub fn customer_login() -> Value {
    json!({
        "token": "tok-123",
        "customer": {"_id": "c1", "name": "Acme", "email": "ops@acme.test", "phone": "555-0100"}
    })
}

fn orders() -> Value {
    json!([
        {"_id": "o1", "order_number": "WO-1", "status": "Pending", "amount": {"value": 100},
         "project": {"_id": "p1", "name": "Plant"}},
        {"_id": "o2", "order_number": "WO-2", "status": "Completed", "amount": {"$numberDecimal": "250"},
         "project": "p1"}
    ])
}

fn projects() -> Value {
    json!({"projects": [
        {"_id": "p1", "name": "Plant", "status": "Active"},
        {"_id": "p2", "title": "Dock", "status": "in-progress"}
    ]})
}

fn assets() -> Value {
    json!({"data": [{"_id": "a1", "title": "Pump", "project": "p1"}]})
}

fn tasks() -> Value {
    json!({"tasks": [
        {"_id": "t1", "title": "Inspect", "status": "Todo", "order": "o1", "asset": {"_id": "a1", "title": "Pump"}},
        {"_id": "t2", "title": "Repair", "status": "On Hold", "order": "o1"}
    ]})
}

fn users() -> Value {
    json!([
        {"_id": "u1", "name": "Eve", "role": "employee"},
        {"_id": "u2", "name": "Root", "role": "admin"},
        {"_id": "u3", "name": "Sam", "role": "Employee"}
    ])
}

// -- handlers -----------------------------------------------------------------

async fn customer_login_handler(Json(body): Json<Value>) -> Response {
    if body["password"] == "secret" {
        Json(customer_login()).into_response()
    } else {
        failure(StatusCode::UNAUTHORIZED, "Invalid credentials")
    }
}

async fn update_customer(Path(id): Path<String>, Json(mut body): Json<Value>) -> Json<Value> {
    body["_id"] = json!(id);
    Json(json!({ "customer": body }))
}

async fn change_password(Json(body): Json<Value>) -> Response {
    if body["currentPassword"] == "old-secret" {
        StatusCode::NO_CONTENT.into_response()
    } else {
        failure(StatusCode::BAD_REQUEST, "Current password is incorrect")
    }
}

async fn slow_projects() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(200)).await;
    Json(projects())
}

async fn slow_users() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(200)).await;
    Json(users())
}

async fn get_order(Path(id): Path<String>) -> Response {
    match orders()
        .as_array()
        .and_then(|all| all.iter().find(|o| o["_id"] == id.as_str()).cloned())
    {
        Some(order) => Json(json!({ "order": order })).into_response(),
        None => failure(StatusCode::NOT_FOUND, "Order not found"),
    }
}

async fn delete_order(Path(id): Path<String>) -> Response {
    if id == "o1" {
        StatusCode::NO_CONTENT.into_response()
    } else {
        failure(StatusCode::NOT_FOUND, "Order not found")
    }
}

async fn create_task(headers: HeaderMap, request: Request) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = match <Multipart as axum::extract::FromRequest<()>>::from_request(request, &()).await {
            Ok(m) => m,
            Err(e) => return e.into_response(),
        };
        let mut task = json!({"_id": "t-new", "file_upload": []});
        while let Ok(Some(field)) = multipart.next_field().await {
            let name = field.name().unwrap_or_default().to_string();
            if name == "file_upload" {
                let file = field.file_name().unwrap_or_default().to_string();
                if let Some(list) = task["file_upload"].as_array_mut() {
                    list.push(json!(format!("uploads/{file}")));
                }
            } else {
                let text = field.text().await.unwrap_or_default();
                let value = serde_json::from_str::<Value>(&text)
                    .ok()
                    .filter(Value::is_object)
                    .unwrap_or(Value::String(text));
                task[name] = value;
            }
        }
        return Json(json!({ "task": task })).into_response();
    }

    let bytes = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(b) => b,
        Err(_) => return failure(StatusCode::BAD_REQUEST, "unreadable body"),
    };
    let mut task: Value = match serde_json::from_slice(&bytes) {
        Ok(v) => v,
        Err(_) => return failure(StatusCode::BAD_REQUEST, "expected JSON"),
    };
    task["_id"] = json!("t-new");
    Json(json!({ "task": task })).into_response()
}

// -- server -------------------------------------------------------------------

/// Start the fake on an ephemeral port and return a client pointed at it.
pub async fn spawn() -> FakeApi {
    let hits = Hits::default();

    let api_routes = Router::new()
        .route("/customers/login", post(customer_login_handler))
        .route("/users/login", post(|| async { failure(StatusCode::UNAUTHORIZED, "Invalid credentials") }))
        .route("/customers/{id}", put(update_customer))
        .route("/customers/{id}/password", put(change_password))
        .route("/users", get(slow_users))
        .route("/projects", get(slow_projects))
        .route("/projects/customer/{id}", get(|| async { Json(projects()) }))
        .route("/orders/customer/{id}", get(|| async { Json(orders()) }))
        .route("/assets/customer/{id}", get(|| async { Json(assets()) }))
        .route("/tasks/customer/{id}", get(|| async { Json(tasks()) }))
        .route("/projects/employee/{id}", get(|| async { Json(projects()) }))
        .route("/orders/employee/{id}", get(|| async { Json(orders()) }))
        .route("/assets/employee/{id}", get(|| async { Json(assets()) }))
        .route(
            "/tasks/employee/{id}",
            get(|| async { failure(StatusCode::INTERNAL_SERVER_ERROR, "Task service unavailable") }),
        )
        .route("/orders/{id}", get(get_order).delete(delete_order))
        .route("/tasks/order/{id}", get(|| async { Json(tasks()) }))
        .route("/assets/project/{id}", get(|| async { Json(assets()) }))
        .route("/tasks", post(create_task))
        .route("/tasks/{id}", delete(|| async { StatusCode::NO_CONTENT }));

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(hits.clone(), record));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeApi {
        api: PortalApi::new(format!("http://{addr}/api")).with_token(Some("tok-123".into())),
        hits,
    }
}
