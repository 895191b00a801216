#![allow(dead_code)]

use actix_web::{test, web, App};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use finance_ledger::session::SessionStore;
use finance_ledger::{configure_api, configure_auth, db};

pub const PASSWORD: &str = "Secret1";

// Set TEST_LOG=1 to see the service logs while debugging a test
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("debug"))
            .with_test_writer()
            .init();
    }
});

/// A fresh in-memory store plus the session shared by every request.
pub struct TestApp {
    pub pool: SqlitePool,
    pub session: web::Data<SessionStore>,
}

pub struct TestResponse {
    status: u16,
    body: bytes::Bytes,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    pub async fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.to_vec()).expect("Response body is not UTF-8")
    }
}

impl TestApp {
    pub async fn new() -> Self {
        Lazy::force(&TRACING);

        let pool = db::connect_in_memory()
            .await
            .expect("Failed to open in-memory store");
        let session = SessionStore::load(pool.clone())
            .await
            .expect("Failed to load session");

        TestApp {
            pool,
            session: web::Data::new(session),
        }
    }

    async fn send(&self, req: test::TestRequest) -> TestResponse {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(self.pool.clone()))
                .app_data(self.session.clone())
                .configure(configure_api)
                .configure(configure_auth),
        )
        .await;

        let resp = test::call_service(&app, req.to_request()).await;

        let status = resp.status().as_u16();
        let body = test::read_body(resp).await;

        TestResponse { status, body }
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        self.send(test::TestRequest::get().uri(path)).await
    }

    pub async fn post(&self, path: &str, payload: &Value) -> TestResponse {
        self.send(test::TestRequest::post().uri(path).set_json(payload))
            .await
    }

    pub async fn patch(&self, path: &str, payload: &Value) -> TestResponse {
        self.send(test::TestRequest::patch().uri(path).set_json(payload))
            .await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        self.send(test::TestRequest::delete().uri(path)).await
    }

    pub async fn register(&self, email: &str) -> TestResponse {
        self.post(
            "/auth/register",
            &json!({
                "firstName": "Jane",
                "lastName": "Doe",
                "email": email,
                "password": PASSWORD,
                "confirmPassword": PASSWORD
            }),
        )
        .await
    }

    pub async fn login(&self, email: &str, remember_me: bool) -> TestResponse {
        self.post(
            "/auth/login",
            &json!({ "email": email, "password": PASSWORD, "rememberMe": remember_me }),
        )
        .await
    }

    pub async fn register_and_login(&self, email: &str) {
        assert_eq!(self.register(email).await.status(), 201);
        assert_eq!(self.login(email, false).await.status(), 200);
    }

    /// Id of a default category
    pub async fn category_id(&self, name: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT id FROM categories WHERE name = ? AND owner_email IS NULL",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .expect("Default category should exist")
    }

    /// Record a transaction through the API as the logged-in user
    pub async fn add_transaction(
        &self,
        kind: &str,
        amount: f64,
        date: &str,
        category_id: i64,
    ) -> Value {
        let response = self
            .post(
                "/transactions",
                &json!({
                    "kind": kind,
                    "amount": amount,
                    "date": date,
                    "categoryId": category_id
                }),
            )
            .await;
        assert_eq!(response.status(), 201, "{}", response.text());
        response.json().await
    }

    /// Write a transaction row directly, bypassing the category checks
    pub async fn insert_transaction(
        &self,
        owner: &str,
        kind: &str,
        amount: &str,
        date: &str,
        category_id: i64,
    ) -> i64 {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO transactions (owner_email, kind, amount, date, category_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(kind)
        .bind(amount)
        .bind(date)
        .bind(category_id)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to insert transaction")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}
