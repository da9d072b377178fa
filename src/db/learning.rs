use color_eyre::Result;
use sqlx::types::Json;

use super::models::{Enrollment, LessonProgress, LessonRef, QuizAttempt, QuizQuestion};
use super::Db;
use crate::models::SubmittedAnswer;
use crate::services::progress::ProgressRepository;

impl Db {
    pub async fn enrollment_for_user(
        &self,
        user_id: i64,
        course_id: i64,
    ) -> Result<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE user_id = $1 AND course_id = $2",
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(enrollment)
    }

    pub async fn enrollment_by_id_for_user(
        &self,
        enrollment_id: i64,
        user_id: i64,
    ) -> Result<Option<Enrollment>> {
        let enrollment = sqlx::query_as::<_, Enrollment>(
            "SELECT * FROM enrollments WHERE id = $1 AND user_id = $2",
        )
        .bind(enrollment_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(enrollment)
    }

    /// Idempotent: enrolling twice returns the existing enrollment.
    pub async fn enroll(&self, user_id: i64, course_id: i64) -> Result<Enrollment> {
        // The no-op update lets RETURNING hand back the existing row on conflict.
        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"
            INSERT INTO enrollments (user_id, course_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, course_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("enrollment ensured: id={}, user_id={user_id}, course_id={course_id}", enrollment.id);
        Ok(enrollment)
    }

    pub async fn attempts_for_lesson(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> Result<Vec<QuizAttempt>> {
        let attempts = sqlx::query_as::<_, QuizAttempt>(
            r#"
            SELECT * FROM quiz_attempts
            WHERE enrollment_id = $1 AND lesson_id = $2
            ORDER BY attempt_number DESC
            "#,
        )
        .bind(enrollment_id)
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(attempts)
    }
}

impl ProgressRepository for Db {
    /// Resolves a lesson within the enrollment's course. Returns None when the
    /// lesson does not exist or belongs to a different course.
    fn lesson_for_enrollment(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<LessonRef>>> + Send {
        async move {
            let lesson = sqlx::query_as::<_, LessonRef>(
                r#"
                SELECT l.id, l.duration_seconds,
                       (SELECT COUNT(*) FROM lesson_questions q WHERE q.lesson_id = l.id) AS question_count
                FROM lessons l
                JOIN course_modules m ON m.id = l.module_id
                JOIN enrollments e ON e.course_id = m.course_id
                WHERE e.id = $1 AND l.id = $2
                "#,
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;
            Ok(lesson)
        }
    }

    fn ensure_lesson_progress(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<LessonProgress>> + Send {
        async move {
            let progress = sqlx::query_as::<_, LessonProgress>(
                r#"
                INSERT INTO lesson_progress (enrollment_id, lesson_id)
                VALUES ($1, $2)
                ON CONFLICT (enrollment_id, lesson_id) DO UPDATE SET lesson_id = EXCLUDED.lesson_id
                RETURNING *
                "#,
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .fetch_one(&self.pool)
            .await?;
            Ok(progress)
        }
    }

    fn record_watch_time(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        watch_seconds: i32,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            // GREATEST keeps the stored value monotonic even if a stale
            // client reports a smaller number.
            sqlx::query(
                r#"
                UPDATE lesson_progress
                SET watch_seconds = GREATEST(watch_seconds, $3), last_watched_at = NOW()
                WHERE enrollment_id = $1 AND lesson_id = $2
                "#,
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .bind(watch_seconds)
            .execute(&self.pool)
            .await?;
            Ok(())
        }
    }

    fn mark_lesson_completed(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            sqlx::query(
                r#"
                UPDATE lesson_progress
                SET completed = TRUE, last_watched_at = NOW()
                WHERE enrollment_id = $1 AND lesson_id = $2 AND NOT completed
                "#,
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .execute(&self.pool)
            .await?;

            tracing::info!("lesson completed: enrollment_id={enrollment_id}, lesson_id={lesson_id}");
            Ok(())
        }
    }

    fn questions_for_lesson(
        &self,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<QuizQuestion>>> + Send {
        Db::questions_for_lesson(self, lesson_id)
    }

    fn attempt_count(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<i64>> + Send {
        async move {
            let count: i64 = sqlx::query_scalar(
                "SELECT COUNT(*) FROM quiz_attempts WHERE enrollment_id = $1 AND lesson_id = $2",
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .fetch_one(&self.pool)
            .await?;
            Ok(count)
        }
    }

    fn record_quiz_attempt(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        attempt_number: i32,
        answers: Vec<SubmittedAnswer>,
        score: i32,
        passed: bool,
    ) -> impl std::future::Future<Output = Result<()>> + Send {
        async move {
            sqlx::query(
                r#"
                INSERT INTO quiz_attempts (enrollment_id, lesson_id, attempt_number, answers, score, passed)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(enrollment_id)
            .bind(lesson_id)
            .bind(attempt_number)
            .bind(Json(&answers))
            .bind(score)
            .bind(passed)
            .execute(&self.pool)
            .await?;

            tracing::info!(
                "quiz attempt recorded: enrollment_id={enrollment_id}, lesson_id={lesson_id}, \
                 attempt={attempt_number}, score={score}, passed={passed}"
            );
            Ok(())
        }
    }

    fn course_lesson_ids(
        &self,
        course_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<i64>>> + Send {
        async move {
            let ids: Vec<i64> = sqlx::query_scalar(
                r#"
                SELECT l.id FROM lessons l
                JOIN course_modules m ON m.id = l.module_id
                WHERE m.course_id = $1
                "#,
            )
            .bind(course_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(ids)
        }
    }

    fn completed_lesson_ids(
        &self,
        enrollment_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<i64>>> + Send {
        async move {
            let ids: Vec<i64> = sqlx::query_scalar(
                "SELECT lesson_id FROM lesson_progress WHERE enrollment_id = $1 AND completed",
            )
            .bind(enrollment_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(ids)
        }
    }
}
