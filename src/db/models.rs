// Database model structs

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;

use crate::models::SubmittedAnswer;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AuthUser {
    pub id: i64,
    pub org_id: Option<i64>,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub tier: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Deal {
    pub id: i64,
    pub public_id: String,
    pub org_id: i64,
    pub registered_by: i64,
    pub customer_name: String,
    pub customer_email: String,
    pub amount_cents: i64,
    pub stage: String,
    pub status: String,
    pub expected_close: NaiveDate,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Ticket {
    pub id: i64,
    pub public_id: String,
    pub org_id: i64,
    pub opened_by: i64,
    pub subject: String,
    pub body: String,
    pub priority: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TicketReply {
    pub id: i64,
    pub ticket_id: i64,
    pub author_name: String,
    pub author_is_admin: bool,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Article {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub body: String,
    pub category: String,
    pub min_tier: String,
    pub published: bool,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Course {
    pub id: i64,
    pub public_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_path: Option<String>,
    pub min_tier: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CourseModule {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub position: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Lesson {
    pub id: i64,
    pub module_id: i64,
    pub title: String,
    pub video_url: String,
    pub duration_seconds: i32,
    pub position: i32,
}

/// Question with its answer key. Never handed to views as-is; learner-facing
/// pages strip `correct_index` first.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuizQuestion {
    pub id: i64,
    pub lesson_id: i64,
    pub prompt: String,
    pub options: Json<Vec<String>>,
    pub correct_index: i32,
    pub position: i32,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Enrollment {
    pub id: i64,
    pub user_id: i64,
    pub course_id: i64,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub certificate_no: Option<String>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LessonProgress {
    pub id: i64,
    pub enrollment_id: i64,
    pub lesson_id: i64,
    pub watch_seconds: i32,
    pub completed: bool,
    pub last_watched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuizAttempt {
    pub id: i64,
    pub enrollment_id: i64,
    pub lesson_id: i64,
    pub attempt_number: i32,
    pub answers: Json<Vec<SubmittedAnswer>>,
    pub score: i32,
    pub passed: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Certificate {
    pub id: i64,
    pub certificate_no: String,
    pub enrollment_id: i64,
    pub partner_name: String,
    pub course_title: String,
    pub completed_on: NaiveDate,
    pub issued_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MdfRequest {
    pub id: i64,
    pub public_id: String,
    pub org_id: i64,
    pub requested_by: i64,
    pub campaign_name: String,
    pub description: String,
    pub amount_cents: i64,
    pub roi_metrics: Json<serde_json::Value>,
    pub status: String,
    pub decided_by: Option<i64>,
    pub decision_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

/// Lesson fields the progress engine needs, resolved through the
/// enrollment's course so a lesson id from another course is rejected.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LessonRef {
    pub id: i64,
    pub duration_seconds: i32,
    pub question_count: i64,
}

/// Partner name and course title snapshotted onto an issued certificate.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CertificateParties {
    pub partner_name: String,
    pub course_title: String,
}

#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct DashboardCounts {
    pub open_deals: i64,
    pub open_tickets: i64,
    pub pending_mdf: i64,
    pub courses_in_progress: i64,
}

#[derive(Debug, Clone, Copy, Default, sqlx::FromRow)]
pub struct AdminQueueCounts {
    pub pending_deals: i64,
    pub open_tickets: i64,
    pub pending_mdf: i64,
    pub courses: i64,
}

/// Catalog row: a published course plus the viewer's enrollment, if any.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CatalogEntry {
    pub course_id: i64,
    pub public_id: String,
    pub title: String,
    pub description: String,
    pub thumbnail_path: Option<String>,
    pub enrollment_id: Option<i64>,
    pub completed_at: Option<DateTime<Utc>>,
    pub certificate_no: Option<String>,
}

/// One lesson row of a course outline with the enrollee's progress joined in.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutlineLesson {
    pub module_id: i64,
    pub module_title: String,
    pub module_position: i32,
    pub lesson_id: i64,
    pub lesson_title: String,
    pub duration_seconds: i32,
    pub lesson_position: i32,
    pub question_count: i64,
    pub watch_seconds: Option<i32>,
    pub completed: Option<bool>,
    pub best_score: Option<i32>,
}
