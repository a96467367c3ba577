//! # Rollbook API
//!
//! A role-based academic records backend built with Rust, Axum, and
//! PostgreSQL. Users authenticate with JWT tokens; admins and verified
//! instructors manage courses, enrollments, and grades, while students
//! view their own records.
//!
//! ## Role model
//!
//! A single `users` row carries three mutually-constrained role flags
//! (admin / instructor / student). The effective [`Role`] is computed on
//! read; the `instructors` and `students` tables are projection records
//! rebuilt from user state transitions:
//!
//! ```text
//! signup (student)  -> students row created immediately, token issued
//! signup (instructor) -> pending: no projection row, no privileges
//!     admin approves  -> instructors row created with verified = true
//! ```
//!
//! An instructor only gains course and grade privileges once an admin has
//! approved them; the `verified` flag on the projection gates every
//! privileged operation.
//!
//! ## Authorization guard
//!
//! Every privileged request resolves the caller fresh from the database
//! (token validity does not imply current account validity), derives the
//! effective role, and applies capability checks:
//!
//! | Operation | Required role |
//! |-----------|---------------|
//! | manage users / approve instructors | Admin |
//! | create/update/delete course or grade | Admin, or verified instructor owning the course |
//! | list/view courses | any authenticated caller |
//! | enroll / view own courses and grades | the student themselves |
//!
//! ## Architecture
//!
//! The codebase follows a modular structure:
//!
//! ```text
//! src/
//! ├── cli/              # create-admin bootstrap command
//! ├── config/           # Configuration (database, JWT, CORS, storage)
//! ├── middleware/       # Auth extractors and role middleware
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Signup, login, logout
//! │   ├── users/       # Admin user management, instructor approval
//! │   ├── courses/     # Course catalog and instructor views
//! │   ├── grades/      # Grade ledger (append-only)
//! │   └── students/    # Student self-service (enroll, my-courses, my-grades)
//! └── utils/           # Errors, JWT, password hashing, file storage
//! ```
//!
//! Each feature module follows a consistent structure: `controller.rs`
//! (HTTP handlers), `service.rs` (business logic), `model.rs` (entities
//! and DTOs), `router.rs` (route wiring).
//!
//! [`Role`]: crate::modules::users::model::Role

pub mod cli;
pub mod config;
pub mod docs;
pub mod logging;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;
