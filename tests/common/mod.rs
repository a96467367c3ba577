use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use rollbook::config::cors::CorsConfig;
use rollbook::config::jwt::JwtConfig;
use rollbook::router::init_router;
use rollbook::state::AppState;
use rollbook::utils::jwt::create_access_token;
use rollbook::utils::password::hash_password;
use rollbook::utils::storage::LocalFileStore;

pub fn setup_test_app(pool: PgPool) -> Router {
    dotenvy::dotenv().ok();
    let state = AppState {
        db: pool,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        file_store: LocalFileStore::new(
            std::env::temp_dir().join("rollbook-test-uploads"),
            "http://localhost:3000/files".to_string(),
            5 * 1024 * 1024,
        ),
    };
    init_router(state)
}

#[allow(dead_code)]
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub token: String,
}

/// Create a test user with the given role. `role` is one of: "admin",
/// "student", "instructor" (pending, no projection), or
/// "instructor_verified" (approved projection row).
pub async fn create_test_user(pool: &PgPool, role: &str) -> TestUser {
    let username = generate_unique_username();
    let email = format!("{}@test.com", username);
    let password = "testpass123";
    let hashed = hash_password(password).unwrap();

    let (is_admin, is_instructor, is_student) = match role {
        "admin" => (true, false, false),
        "student" => (false, false, true),
        "instructor" | "instructor_verified" => (false, true, false),
        _ => panic!("Invalid role: {}", role),
    };

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO users (username, email, password, is_admin, is_instructor, is_student)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(&username)
    .bind(&email)
    .bind(&hashed)
    .bind(is_admin)
    .bind(is_instructor)
    .bind(is_student)
    .fetch_one(pool)
    .await
    .unwrap();

    if is_student {
        sqlx::query("INSERT INTO students (id, username, email) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(&username)
            .bind(&email)
            .execute(pool)
            .await
            .unwrap();
    }

    if role == "instructor_verified" {
        sqlx::query(
            "INSERT INTO instructors (id, username, email, verified) VALUES ($1, $2, $3, TRUE)",
        )
        .bind(id)
        .bind(&username)
        .bind(&email)
        .execute(pool)
        .await
        .unwrap();
    }

    let token = create_access_token(id, &username, &JwtConfig::from_env()).unwrap();

    TestUser {
        id,
        username,
        password: password.to_string(),
        token,
    }
}

#[allow(dead_code)]
pub async fn create_test_course(
    pool: &PgPool,
    name: &str,
    duration: i32,
    instructor_id: Option<i64>,
) -> i64 {
    sqlx::query_scalar(
        "INSERT INTO courses (name, duration, instructor_id) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(duration)
    .bind(instructor_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

#[allow(dead_code)]
pub async fn enroll_student(pool: &PgPool, student_id: i64, course_id: i64) {
    sqlx::query("INSERT INTO enrollments (student_id, course_id) VALUES ($1, $2)")
        .bind(student_id)
        .bind(course_id)
        .execute(pool)
        .await
        .unwrap();
}

pub fn generate_unique_username() -> String {
    format!("user-{}", Uuid::new_v4())
}

/// Send a multipart file upload through the router and return the status
/// with the parsed response body.
#[allow(dead_code)]
pub async fn send_multipart(
    app: Router,
    uri: &str,
    token: &str,
    filename: &str,
    content: &[u8],
) -> (StatusCode, serde_json::Value) {
    let boundary = "test-upload-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"{filename}\"\r\nContent-Type: image/png\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

/// Send a JSON request through the router, optionally with a bearer token,
/// and return the status with the parsed response body.
#[allow(dead_code)]
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}
