//! In-process stand-in for the Money Tracker API.
//!
//! Keeps wallets in memory, applies transfers and adjustments the way the real
//! server does, and records every request (method, path, query, bearer, body)
//! so tests can assert on what the client actually sent.

use axum::{
    body::Body,
    extract::{Path, Query, Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Form, Json, Router,
};
use money_tracker_client::models::{Transaction, TransactionDraft, TransactionKind, WalletDraft};
use money_tracker_client::{TransactionId, Wallet, WalletIcon, WalletId, WalletType};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub bearer: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

#[derive(Default)]
pub struct FakeState {
    pub wallets: Vec<Wallet>,
    pub next_id: i64,
    pub transactions: Vec<Transaction>,
    pub next_transaction_id: i64,
    /// Registered usernames and emails.
    pub users: Vec<(String, String)>,
    pub requests: Vec<Recorded>,
    /// "METHOD /path" -> forced response.
    pub failures: HashMap<String, (StatusCode, Value)>,
}

#[derive(Clone, Default)]
pub struct FakeServer {
    pub state: Arc<Mutex<FakeState>>,
}

pub fn wallet(id: i64, name: &str, balance: f64) -> Wallet {
    Wallet {
        id: WalletId(id),
        name: name.to_string(),
        wallet_type: WalletType::Cash,
        icon: WalletIcon::Cash,
        color: "#16A34A".to_string(),
        balance,
        description: None,
        is_default: id == 1,
        is_active: true,
        created_at: Some("2024-05-01T10:00:00.000000".to_string()),
        updated_at: Some("2024-05-01T10:00:00.000000".to_string()),
    }
}

pub fn transaction(id: i64, amount: f64, category: &str, kind: TransactionKind) -> Transaction {
    Transaction {
        id: TransactionId(id),
        amount,
        category: category.to_string(),
        description: format!("{} entry", category),
        transaction_type: kind,
        date: "2024-05-04T12:00:00".to_string(),
        created_at: Some("2024-05-04T12:00:00".to_string()),
    }
}

impl FakeServer {
    /// Cash (id 1, 100) and Bank (id 2, 500). Two transactions: Salary (11) and Food (12).
    pub fn with_cash_and_bank() -> Self {
        let server = Self::default();
        {
            let mut s = server.state.lock().unwrap();
            s.wallets = vec![wallet(1, "Cash", 100.0), wallet(2, "Bank", 500.0)];
            s.next_id = 3;
            s.transactions = vec![
                transaction(11, 2500.0, "Salary", TransactionKind::Income),
                transaction(12, 42.5, "Food", TransactionKind::Expense),
            ];
            s.next_transaction_id = 13;
            s.users = vec![("alice".to_string(), "alice@example.com".to_string())];
        }
        server
    }

    /// Runs `f` against the server's wallets before or between requests.
    pub fn edit_wallet(&self, id: i64, f: impl FnOnce(&mut Wallet)) {
        let mut s = self.state.lock().unwrap();
        if let Some(w) = s.wallets.iter_mut().find(|w| w.id == WalletId(id)) {
            f(w);
        }
    }

    pub fn transaction_ids(&self) -> Vec<i64> {
        self.state
            .lock()
            .unwrap()
            .transactions
            .iter()
            .map(|t| t.id.get())
            .collect()
    }

    pub fn fail(&self, route: &str, status: StatusCode, body: Value) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(route.to_string(), (status, body));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn last(&self, method: &str, path: &str) -> Option<Recorded> {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.method == method && r.path == path)
    }

    pub fn balance(&self, id: i64) -> Option<f64> {
        self.state
            .lock()
            .unwrap()
            .wallets
            .iter()
            .find(|w| w.id == WalletId(id))
            .map(|w| w.balance)
    }

    /// Binds 127.0.0.1 on a free port and returns the base URL.
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/token", post(login))
            .route("/wallets", get(list_wallets).post(create_wallet))
            .route("/wallets/transfer", post(transfer))
            .route("/wallets/transfers", get(list_transfers))
            .route("/wallets/:id", put(update_wallet).delete(delete_wallet))
            .route("/wallets/:id/adjust", post(adjust))
            .route("/wallets/:id/adjustments", get(list_adjustments))
            .route("/dashboard", get(dashboard))
            .route("/analytics/category-spending", get(category_spending))
            .route("/transactions", get(list_transactions).post(create_transaction))
            .route(
                "/transactions/:id",
                get(get_transaction)
                    .put(update_transaction)
                    .delete(delete_transaction),
            )
            .route("/categories", get(categories))
            .route("/register", post(register))
            .route("/me", get(me))
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake server");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake server");
        });
        format!("http://{}", addr)
    }
}

async fn record(State(server): State<FakeServer>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from);
    let key = format!("{} {}", parts.method, parts.uri.path());
    let forced = {
        let mut s = server.state.lock().unwrap();
        s.requests.push(Recorded {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(String::from),
            bearer: bearer.clone(),
            body: String::from_utf8_lossy(&bytes).to_string(),
        });
        s.failures.get(&key).cloned()
    };
    if let Some((status, body)) = forced {
        return (status, Json(body)).into_response();
    }
    let public = matches!(parts.uri.path(), "/token" | "/register" | "/categories");
    if bearer.is_none() && !public {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Not authenticated"})),
        )
            .into_response();
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "detail": message }))).into_response()
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(Form(form): Form<LoginForm>) -> Response {
    if form.password != "secret" {
        return detail(StatusCode::UNAUTHORIZED, "Incorrect username or password");
    }
    Json(json!({ "access_token": format!("token-for-{}", form.username), "token_type": "bearer" }))
        .into_response()
}

async fn list_wallets(State(server): State<FakeServer>) -> Json<Vec<Wallet>> {
    Json(server.state.lock().unwrap().wallets.clone())
}

async fn create_wallet(State(server): State<FakeServer>, Json(draft): Json<WalletDraft>) -> Response {
    let mut s = server.state.lock().unwrap();
    let id = s.next_id;
    s.next_id += 1;
    let created = Wallet {
        id: WalletId(id),
        name: draft.name,
        wallet_type: draft.wallet_type,
        icon: draft.icon,
        color: draft.color,
        balance: draft.initial_balance,
        description: (!draft.description.is_empty()).then_some(draft.description),
        is_default: draft.is_default,
        is_active: true,
        created_at: None,
        updated_at: None,
    };
    s.wallets.push(created.clone());
    Json(created).into_response()
}

async fn update_wallet(
    State(server): State<FakeServer>,
    Path(id): Path<i64>,
    Json(update): Json<Value>,
) -> Response {
    let mut s = server.state.lock().unwrap();
    let Some(w) = s.wallets.iter_mut().find(|w| w.id == WalletId(id)) else {
        return detail(StatusCode::NOT_FOUND, "Wallet not found");
    };
    if let Some(name) = update.get("name").and_then(|v| v.as_str()) {
        w.name = name.to_string();
    }
    if let Some(color) = update.get("color").and_then(|v| v.as_str()) {
        w.color = color.to_string();
    }
    if let Some(d) = update.get("description") {
        w.description = d.as_str().map(String::from);
    }
    Json(w.clone()).into_response()
}

async fn delete_wallet(State(server): State<FakeServer>, Path(id): Path<i64>) -> Response {
    let mut s = server.state.lock().unwrap();
    let before = s.wallets.len();
    s.wallets.retain(|w| w.id != WalletId(id));
    if s.wallets.len() == before {
        return detail(StatusCode::NOT_FOUND, "Wallet not found");
    }
    Json(json!({ "message": "Wallet deleted successfully" })).into_response()
}

async fn transfer(State(server): State<FakeServer>, Json(body): Json<Value>) -> Response {
    let Some(amount) = body.get("amount").and_then(|v| v.as_f64()) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "loc": ["body", "amount"], "msg": "value is not a valid float" }] })),
        )
            .into_response();
    };
    let from = body.get("from_wallet_id").and_then(|v| v.as_i64()).unwrap_or_default();
    let to = body.get("to_wallet_id").and_then(|v| v.as_i64()).unwrap_or_default();
    if from == to {
        return detail(StatusCode::BAD_REQUEST, "Cannot transfer to the same wallet");
    }
    let mut s = server.state.lock().unwrap();
    let source_balance = s.wallets.iter().find(|w| w.id == WalletId(from)).map(|w| w.balance);
    match source_balance {
        None => return detail(StatusCode::NOT_FOUND, "Wallet not found"),
        Some(b) if b < amount => {
            return detail(StatusCode::BAD_REQUEST, "Insufficient balance in source wallet")
        }
        Some(_) => {}
    }
    for w in s.wallets.iter_mut() {
        if w.id == WalletId(from) {
            w.balance -= amount;
        } else if w.id == WalletId(to) {
            w.balance += amount;
        }
    }
    Json(json!({ "id": 1, "amount": amount })).into_response()
}

async fn adjust(
    State(server): State<FakeServer>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let Some(new_balance) = body.get("new_balance").and_then(|v| v.as_f64()) else {
        return (StatusCode::UNPROCESSABLE_ENTITY, Json(json!({ "detail": [] }))).into_response();
    };
    let mut s = server.state.lock().unwrap();
    let Some(w) = s.wallets.iter_mut().find(|w| w.id == WalletId(id)) else {
        return detail(StatusCode::NOT_FOUND, "Wallet not found");
    };
    let old = w.balance;
    w.balance = new_balance;
    Json(json!({ "id": 1, "old_balance": old, "new_balance": new_balance })).into_response()
}

async fn list_transfers(State(server): State<FakeServer>) -> Response {
    let s = server.state.lock().unwrap();
    let (Some(from), Some(to)) = (s.wallets.first(), s.wallets.get(1)) else {
        return Json(json!([])).into_response();
    };
    Json(json!([{
        "id": 7,
        "amount": 50.0,
        "description": "rent share",
        "transfer_date": "2024-05-02T09:30:00",
        "created_at": "2024-05-02T09:30:00",
        "from_wallet": from,
        "to_wallet": to,
    }]))
    .into_response()
}

async fn list_adjustments(State(server): State<FakeServer>, Path(id): Path<i64>) -> Response {
    let s = server.state.lock().unwrap();
    let Some(w) = s.wallets.iter().find(|w| w.id == WalletId(id)) else {
        return detail(StatusCode::NOT_FOUND, "Wallet not found");
    };
    Json(json!([{
        "id": 3,
        "old_balance": 100.0,
        "new_balance": 75.0,
        "adjustment_amount": -25.0,
        "reason": "recount",
        "adjusted_at": "2024-05-03T18:00:00",
        "wallet": w,
    }]))
    .into_response()
}

async fn dashboard() -> Json<Value> {
    Json(json!({
        "balance": 600.0,
        "total_income": 2500.0,
        "total_expenses": 1900.0,
        "monthly_summary": { "income": 1200.0, "expenses": 800.0, "net": 400.0 },
        "recent_transactions": [{
            "id": 11,
            "amount": 42.5,
            "category": "Food",
            "description": "Groceries",
            "transaction_type": "expense",
            "date": "2024-05-04T12:00:00",
            "created_at": "2024-05-04T12:00:00"
        }]
    }))
}

async fn category_spending() -> Json<Value> {
    Json(json!({ "data": { "Food": 320.5, "Rent": 900.0, "Transport": 60.0 } }))
}

#[derive(Deserialize)]
struct TransactionFilter {
    #[serde(default)]
    skip: usize,
    #[serde(default = "default_limit")]
    limit: usize,
    category: Option<String>,
}

fn default_limit() -> usize {
    100
}

async fn list_transactions(
    State(server): State<FakeServer>,
    Query(filter): Query<TransactionFilter>,
) -> Json<Vec<Transaction>> {
    let s = server.state.lock().unwrap();
    let matching = s
        .transactions
        .iter()
        .filter(|t| filter.category.as_deref().map_or(true, |c| t.category == c))
        .skip(filter.skip)
        .take(filter.limit)
        .cloned()
        .collect();
    Json(matching)
}

async fn create_transaction(
    State(server): State<FakeServer>,
    Json(draft): Json<TransactionDraft>,
) -> Json<Transaction> {
    let mut s = server.state.lock().unwrap();
    let id = s.next_transaction_id;
    s.next_transaction_id += 1;
    let created = Transaction {
        id: TransactionId(id),
        amount: draft.amount,
        category: draft.category,
        description: draft.description,
        transaction_type: draft.transaction_type,
        date: draft.date,
        created_at: Some("2024-05-05T08:00:00".to_string()),
    };
    s.transactions.push(created.clone());
    Json(created)
}

async fn get_transaction(State(server): State<FakeServer>, Path(id): Path<i64>) -> Response {
    let s = server.state.lock().unwrap();
    match s.transactions.iter().find(|t| t.id == TransactionId(id)) {
        Some(t) => Json(t.clone()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Transaction not found"),
    }
}

async fn update_transaction(
    State(server): State<FakeServer>,
    Path(id): Path<i64>,
    Json(update): Json<Value>,
) -> Response {
    let mut s = server.state.lock().unwrap();
    let Some(t) = s.transactions.iter_mut().find(|t| t.id == TransactionId(id)) else {
        return detail(StatusCode::NOT_FOUND, "Transaction not found");
    };
    if let Some(amount) = update.get("amount").and_then(|v| v.as_f64()) {
        t.amount = amount;
    }
    if let Some(category) = update.get("category").and_then(|v| v.as_str()) {
        t.category = category.to_string();
    }
    if let Some(description) = update.get("description").and_then(|v| v.as_str()) {
        t.description = description.to_string();
    }
    if let Some(kind) = update.get("transaction_type").and_then(|v| v.as_str()) {
        if let Ok(kind) = kind.parse::<TransactionKind>() {
            t.transaction_type = kind;
        }
    }
    if let Some(date) = update.get("date").and_then(|v| v.as_str()) {
        t.date = date.to_string();
    }
    Json(t.clone()).into_response()
}

async fn delete_transaction(State(server): State<FakeServer>, Path(id): Path<i64>) -> Response {
    let mut s = server.state.lock().unwrap();
    let before = s.transactions.len();
    s.transactions.retain(|t| t.id != TransactionId(id));
    if s.transactions.len() == before {
        return detail(StatusCode::NOT_FOUND, "Transaction not found");
    }
    Json(json!({ "message": "Transaction deleted successfully" })).into_response()
}

async fn categories() -> Json<Value> {
    Json(json!({
        "categories": ["Food", "Transport", "Shopping", "Entertainment", "Healthcare", "Education", "Other"]
    }))
}

#[derive(Deserialize)]
struct Registration {
    username: String,
    email: String,
}

async fn register(State(server): State<FakeServer>, Json(user): Json<Registration>) -> Response {
    let mut s = server.state.lock().unwrap();
    let taken = s
        .users
        .iter()
        .any(|(name, email)| *name == user.username || *email == user.email);
    if taken {
        return detail(StatusCode::BAD_REQUEST, "Username or email already registered");
    }
    s.users.push((user.username.clone(), user.email.clone()));
    let id = s.users.len() as i64;
    Json(json!({
        "id": id,
        "username": user.username,
        "email": user.email,
        "created_at": "2024-05-05T08:00:00"
    }))
    .into_response()
}

async fn me(req: Request) -> Json<Value> {
    let username = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer token-for-"))
        .unwrap_or("alice")
        .to_string();
    Json(json!({ "id": 1, "username": username, "email": format!("{}@example.com", username) }))
}
