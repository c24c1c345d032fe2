// In-process mock of the finance backend shared by the integration tests.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use finance_client::ClientConfig;
use serde_json::{Value, json};
use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

// Everything the mock remembers between requests.
#[derive(Default)]
struct Backend {
    // email -> (name, password)
    users: HashMap<String, (String, String)>,
    tokens: HashSet<String>,
    budgets: Vec<Value>,
    // Number of upcoming /api calls answered with 403 regardless of token.
    forbidden_remaining: u32,
    // When set, /auth/verify rejects every token.
    verify_rejects: bool,
    // "METHOD /path" per request, in arrival order.
    hits: Vec<String>,
}

type Shared = Arc<Mutex<Backend>>;

fn lock(state: &Shared) -> MutexGuard<'_, Backend> {
    state.lock().expect("backend state lock")
}

pub struct MockBackend {
    pub base_url: String,
    port: u16,
    state: Shared,
}

impl MockBackend {
    // Bind an ephemeral port and serve on the calling test's runtime.
    pub async fn spawn() -> Self {
        let state: Shared = Arc::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral test port");
        let addr = listener.local_addr().expect("get local addr");
        let app = routes(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock backend failed");
        });

        // The listener is already bound, so this only guards against a slow accept loop.
        for _ in 0..50 {
            if tokio::net::TcpStream::connect(addr).await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        Self {
            base_url: format!("http://{addr}"),
            port: addr.port(),
            state,
        }
    }

    // Client config pointing at this backend, with no redirect pause.
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.backend.host = "127.0.0.1".to_string();
        config.backend.port = self.port;
        config.ui.redirect_delay_ms = 0;
        config
    }

    pub fn add_user(&self, name: &str, email: &str, password: &str) {
        lock(&self.state)
            .users
            .insert(email.to_string(), (name.to_string(), password.to_string()));
    }

    pub fn forbid_next(&self, count: u32) {
        lock(&self.state).forbidden_remaining = count;
    }

    pub fn reject_verify(&self) {
        lock(&self.state).verify_rejects = true;
    }

    pub fn hits(&self) -> Vec<String> {
        lock(&self.state).hits.clone()
    }

    pub fn budgets(&self) -> Vec<Value> {
        lock(&self.state).budgets.clone()
    }
}

fn routes(state: Shared) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/verify", get(verify))
        .route("/auth/health", get(health))
        .route("/api/budgets", get(list_budgets).post(create_budget))
        .route("/api/goals", get(empty_list))
        .route("/api/transactions", get(empty_list))
        .route("/api/insights", get(empty_list))
        .with_state(state)
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

fn bearer(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

fn issue_token(backend: &mut Backend) -> String {
    let token = uuid::Uuid::new_v4().to_string();
    backend.tokens.insert(token.clone());
    token
}

// Records the hit and answers 403 for forced or unknown tokens.
fn authorize(backend: &mut Backend, headers: &HeaderMap, hit: &str) -> Result<(), Response> {
    backend.hits.push(hit.to_string());
    if backend.forbidden_remaining > 0 {
        backend.forbidden_remaining -= 1;
        return Err(StatusCode::FORBIDDEN.into_response());
    }
    match bearer(headers) {
        Some(token) if backend.tokens.contains(&token) => Ok(()),
        _ => Err(StatusCode::FORBIDDEN.into_response()),
    }
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = lock(&state);
    backend.hits.push("POST /auth/login".to_string());
    let email = body["email"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let name = match backend.users.get(email) {
        Some((name, stored)) if stored == password => name.clone(),
        _ => return message(StatusCode::UNAUTHORIZED, "Invalid email or password"),
    };
    let token = issue_token(&mut backend);
    Json(json!({ "token": token, "name": name })).into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut backend = lock(&state);
    backend.hits.push("POST /auth/register".to_string());
    let name = body["name"].as_str().unwrap_or_default().to_string();
    let email = body["email"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    if backend.users.contains_key(&email) {
        return message(StatusCode::BAD_REQUEST, "User already exists");
    }
    backend.users.insert(email, (name.clone(), password));
    let token = issue_token(&mut backend);
    (
        StatusCode::CREATED,
        Json(json!({ "token": token, "userName": name })),
    )
        .into_response()
}

async fn verify(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut backend = lock(&state);
    backend.hits.push("GET /auth/verify".to_string());
    let known = bearer(&headers).is_some_and(|token| backend.tokens.contains(&token));
    if backend.verify_rejects || !known {
        return message(StatusCode::UNAUTHORIZED, "Invalid token");
    }
    Json(json!({ "valid": true })).into_response()
}

async fn health(State(state): State<Shared>) -> &'static str {
    lock(&state).hits.push("GET /auth/health".to_string());
    "Finance backend is running"
}

async fn list_budgets(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut backend = lock(&state);
    if let Err(denied) = authorize(&mut backend, &headers, "GET /api/budgets") {
        return denied;
    }
    Json(Value::Array(backend.budgets.clone())).into_response()
}

async fn create_budget(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut backend = lock(&state);
    if let Err(denied) = authorize(&mut backend, &headers, "POST /api/budgets") {
        return denied;
    }

    let mut budget = body["budget"].clone();
    let Some(fields) = budget.as_object_mut() else {
        return message(StatusCode::BAD_REQUEST, "budget is required");
    };
    let limits: Vec<Value> = body["categoryLimits"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|limit| {
            json!({
                "categoryId": limit["categoryId"],
                "limitAmount": limit["limitAmount"],
                "spentAmount": 0
            })
        })
        .collect();
    fields.insert("id".to_string(), json!(uuid::Uuid::new_v4().to_string()));
    fields.insert("categoryLimits".to_string(), Value::Array(limits));

    backend.budgets.push(budget.clone());
    (StatusCode::CREATED, Json(budget)).into_response()
}

async fn empty_list(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut backend = lock(&state);
    if let Err(denied) = authorize(&mut backend, &headers, "GET list") {
        return denied;
    }
    Json(json!([])).into_response()
}
