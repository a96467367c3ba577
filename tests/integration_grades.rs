mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{create_test_course, create_test_user, enroll_student, send_json, setup_test_app};

#[sqlx::test(migrations = "./migrations")]
async fn test_list_grades_is_admin_only(pool: PgPool) {
    let admin = create_test_user(&pool, "admin").await;
    let instructor = create_test_user(&pool, "instructor_verified").await;
    let app = setup_test_app(pool);

    let (status, body) = send_json(
        app.clone(),
        "GET",
        "/api/grades",
        Some(&instructor.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized: Admin access required");

    let (status, body) = send_json(app, "GET", "/api/grades", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_records_grade(pool: PgPool) {
    let admin = create_test_user(&pool, "admin").await;
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Algebra", 12, None).await;
    enroll_student(&pool, student.id, course_id).await;
    let app = setup_test_app(pool);

    let (status, body) = send_json(
        app,
        "POST",
        "/api/grades",
        Some(&admin.token),
        Some(json!({
            "student_id": student.id,
            "course_id": course_id,
            "grade": "A",
            "comments": "Excellent work"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["grade"], "A");
    assert_eq!(body["student_id"], student.id);
    assert!(body["created_at"].is_string());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grades_append_per_event(pool: PgPool) {
    let admin = create_test_user(&pool, "admin").await;
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Algebra", 12, None).await;
    enroll_student(&pool, student.id, course_id).await;
    let app = setup_test_app(pool);

    for grade in ["B", "A"] {
        let (status, _) = send_json(
            app.clone(),
            "POST",
            "/api/grades",
            Some(&admin.token),
            Some(json!({
                "student_id": student.id,
                "course_id": course_id,
                "grade": grade
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Two grading events for the same pair, two ledger entries.
    let (status, body) = send_json(app, "GET", "/api/grades", Some(&admin.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_owning_instructor_records_grade(pool: PgPool) {
    let owner = create_test_user(&pool, "instructor_verified").await;
    let other = create_test_user(&pool, "instructor_verified").await;
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Physics", 8, Some(owner.id)).await;
    enroll_student(&pool, student.id, course_id).await;
    let app = setup_test_app(pool);

    let payload = json!({
        "student_id": student.id,
        "course_id": course_id,
        "grade": "B+"
    });

    let (status, body) = send_json(
        app.clone(),
        "POST",
        "/api/grades",
        Some(&other.token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You are not the instructor for this course");

    let (status, _) = send_json(
        app,
        "POST",
        "/api/grades",
        Some(&owner.token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_cannot_record_grade(pool: PgPool) {
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Physics", 8, None).await;
    let app = setup_test_app(pool);

    let (status, _) = send_json(
        app,
        "POST",
        "/api/grades",
        Some(&student.token),
        Some(json!({
            "student_id": student.id,
            "course_id": course_id,
            "grade": "A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_grade_requires_existing_student_and_course(pool: PgPool) {
    let admin = create_test_user(&pool, "admin").await;
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Physics", 8, None).await;
    let app = setup_test_app(pool);

    let (status, _) = send_json(
        app.clone(),
        "POST",
        "/api/grades",
        Some(&admin.token),
        Some(json!({
            "student_id": student.id,
            "course_id": 99999,
            "grade": "A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        app,
        "POST",
        "/api/grades",
        Some(&admin.token),
        Some(json!({
            "student_id": 99999,
            "course_id": course_id,
            "grade": "A"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_get_grade_scoped_to_course_owner(pool: PgPool) {
    let owner = create_test_user(&pool, "instructor_verified").await;
    let other = create_test_user(&pool, "instructor_verified").await;
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "History", 4, Some(owner.id)).await;
    enroll_student(&pool, student.id, course_id).await;

    let grade_id: i64 = sqlx::query_scalar(
        "INSERT INTO grades (student_id, course_id, grade) VALUES ($1, $2, 'A-') RETURNING id",
    )
    .bind(student.id)
    .bind(course_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    let app = setup_test_app(pool);

    let uri = format!("/api/grades/{}", grade_id);
    let (status, body) = send_json(app.clone(), "GET", &uri, Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "A-");
    assert_eq!(body["student_id"], student.id);

    let (status, _) = send_json(app.clone(), "GET", &uri, Some(&other.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send_json(app, "GET", "/api/grades/99999", Some(&owner.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_and_delete_grade(pool: PgPool) {
    let admin = create_test_user(&pool, "admin").await;
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Physics", 8, None).await;
    enroll_student(&pool, student.id, course_id).await;
    let app = setup_test_app(pool);

    let (_, created) = send_json(
        app.clone(),
        "POST",
        "/api/grades",
        Some(&admin.token),
        Some(json!({
            "student_id": student.id,
            "course_id": course_id,
            "grade": "C"
        })),
    )
    .await;
    let grade_id = created["id"].as_i64().unwrap();

    let (status, body) = send_json(
        app.clone(),
        "PUT",
        &format!("/api/grades/{}", grade_id),
        Some(&admin.token),
        Some(json!({ "grade": "B", "comments": "Regraded after appeal" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grade"], "B");
    assert_eq!(body["comments"], "Regraded after appeal");
    // The original timestamp survives the update.
    assert_eq!(body["created_at"], created["created_at"]);

    let (status, _) = send_json(
        app.clone(),
        "DELETE",
        &format!("/api/grades/{}", grade_id),
        Some(&admin.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(
        app,
        "PUT",
        &format!("/api/grades/{}", grade_id),
        Some(&admin.token),
        Some(json!({ "grade": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
