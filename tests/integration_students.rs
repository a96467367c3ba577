mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;

use common::{create_test_course, create_test_user, enroll_student, send_json, setup_test_app};

#[sqlx::test(migrations = "./migrations")]
async fn test_student_enrolls_in_course(pool: PgPool) {
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Algebra", 12, None).await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send_json(
        app,
        "POST",
        "/api/students/enroll",
        Some(&student.token),
        Some(json!({ "course_id": course_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM enrollments WHERE student_id = $1 AND course_id = $2",
    )
    .bind(student.id)
    .bind(course_id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_enrollment_conflicts(pool: PgPool) {
    let student = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Algebra", 12, None).await;
    let app = setup_test_app(pool.clone());

    let (status, _) = send_json(
        app.clone(),
        "POST",
        "/api/students/enroll",
        Some(&student.token),
        Some(json!({ "course_id": course_id })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send_json(
        app,
        "POST",
        "/api/students/enroll",
        Some(&student.token),
        Some(json!({ "course_id": course_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Already enrolled in this course");

    // Still exactly one ledger row.
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM enrollments WHERE student_id = $1")
            .bind(student.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_enroll_missing_course(pool: PgPool) {
    let student = create_test_user(&pool, "student").await;
    let app = setup_test_app(pool);

    let (status, _) = send_json(
        app,
        "POST",
        "/api/students/enroll",
        Some(&student.token),
        Some(json!({ "course_id": 99999 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_students_cannot_enroll(pool: PgPool) {
    let admin = create_test_user(&pool, "admin").await;
    let instructor = create_test_user(&pool, "instructor_verified").await;
    let course_id = create_test_course(&pool, "Algebra", 12, None).await;
    let app = setup_test_app(pool);

    for token in [&admin.token, &instructor.token] {
        let (status, _) = send_json(
            app.clone(),
            "POST",
            "/api/students/enroll",
            Some(token),
            Some(json!({ "course_id": course_id })),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_my_courses_lists_enrollments(pool: PgPool) {
    let student = create_test_user(&pool, "student").await;
    let enrolled = create_test_course(&pool, "Algebra", 12, None).await;
    create_test_course(&pool, "Chemistry", 10, None).await;
    enroll_student(&pool, student.id, enrolled).await;
    let app = setup_test_app(pool);

    let (status, body) = send_json(
        app,
        "GET",
        "/api/students/my-courses",
        Some(&student.token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["name"], "Algebra");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_my_grades_joined_with_course(pool: PgPool) {
    let student = create_test_user(&pool, "student").await;
    let other = create_test_user(&pool, "student").await;
    let course_id = create_test_course(&pool, "Algebra", 12, None).await;
    enroll_student(&pool, student.id, course_id).await;
    enroll_student(&pool, other.id, course_id).await;

    for (student_id, grade) in [(student.id, "A"), (other.id, "C")] {
        sqlx::query("INSERT INTO grades (student_id, course_id, grade) VALUES ($1, $2, $3)")
            .bind(student_id)
            .bind(course_id)
            .bind(grade)
            .execute(&pool)
            .await
            .unwrap();
    }

    let app = setup_test_app(pool);
    let (status, body) = send_json(
        app,
        "GET",
        "/api/students/my-grades",
        Some(&student.token),
        None,
    )
    .await;

    // Only the caller's own entries come back.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["grade"], "A");
    assert_eq!(body[0]["course_name"], "Algebra");
}
