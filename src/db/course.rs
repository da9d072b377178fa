use color_eyre::Result;
use ulid::Ulid;

use super::models::{CatalogEntry, Course, CourseModule, Lesson, OutlineLesson, QuizQuestion};
use super::Db;
use crate::models::NewQuestion;

impl Db {
    /// Published courses visible to the given tiers, with the viewer's
    /// enrollment joined in.
    pub async fn course_catalog(&self, user_id: i64, tiers: &[String]) -> Result<Vec<CatalogEntry>> {
        let entries = sqlx::query_as::<_, CatalogEntry>(
            r#"
            SELECT c.id AS course_id, c.public_id, c.title, c.description, c.thumbnail_path,
                   e.id AS enrollment_id, e.completed_at, e.certificate_no
            FROM courses c
            LEFT JOIN enrollments e ON e.course_id = c.id AND e.user_id = $1
            WHERE c.published AND c.min_tier = ANY($2)
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(user_id)
        .bind(tiers)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    pub async fn course_by_public_id(&self, public_id: &str) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE public_id = $1")
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(course)
    }

    pub async fn course_by_id(&self, id: i64) -> Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(course)
    }

    /// Flattened module/lesson outline with the enrollee's progress. Rows come
    /// back ordered for display; views regroup them by module.
    pub async fn course_outline(
        &self,
        course_id: i64,
        enrollment_id: Option<i64>,
    ) -> Result<Vec<OutlineLesson>> {
        let rows = sqlx::query_as::<_, OutlineLesson>(
            r#"
            SELECT m.id AS module_id, m.title AS module_title, m.position AS module_position,
                   l.id AS lesson_id, l.title AS lesson_title, l.duration_seconds,
                   l.position AS lesson_position,
                   (SELECT COUNT(*) FROM lesson_questions q WHERE q.lesson_id = l.id) AS question_count,
                   p.watch_seconds, p.completed,
                   (SELECT MAX(a.score) FROM quiz_attempts a
                    WHERE a.enrollment_id = $2 AND a.lesson_id = l.id) AS best_score
            FROM course_modules m
            JOIN lessons l ON l.module_id = m.id
            LEFT JOIN lesson_progress p ON p.lesson_id = l.id AND p.enrollment_id = $2
            WHERE m.course_id = $1
            ORDER BY m.position, m.id, l.position, l.id
            "#,
        )
        .bind(course_id)
        .bind(enrollment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn lesson_by_id(&self, lesson_id: i64) -> Result<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>("SELECT * FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lesson)
    }

    pub async fn questions_for_lesson(&self, lesson_id: i64) -> Result<Vec<QuizQuestion>> {
        let questions = sqlx::query_as::<_, QuizQuestion>(
            "SELECT * FROM lesson_questions WHERE lesson_id = $1 ORDER BY position, id",
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(questions)
    }

    // ----- authoring -----

    pub async fn all_courses(&self) -> Result<Vec<Course>> {
        let courses = sqlx::query_as::<_, Course>("SELECT * FROM courses ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(courses)
    }

    /// Returns the new course's public id.
    pub async fn create_course(
        &self,
        title: &str,
        description: &str,
        min_tier: &str,
    ) -> Result<String> {
        let public_id = Ulid::new().to_string();

        sqlx::query(
            "INSERT INTO courses (public_id, title, description, min_tier) VALUES ($1, $2, $3, $4)",
        )
        .bind(&public_id)
        .bind(title)
        .bind(description)
        .bind(min_tier)
        .execute(&self.pool)
        .await?;

        tracing::info!("course created: public_id={public_id}");
        Ok(public_id)
    }

    pub async fn update_course(
        &self,
        public_id: &str,
        title: &str,
        description: &str,
        min_tier: &str,
        published: bool,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE courses
            SET title = $1, description = $2, min_tier = $3, published = $4
            WHERE public_id = $5
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(min_tier)
        .bind(published)
        .bind(public_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn set_course_thumbnail(&self, public_id: &str, path: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE courses SET thumbnail_path = $1 WHERE public_id = $2")
            .bind(path)
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("course thumbnail updated: public_id={public_id}, path={path}");
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_course(&self, public_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM courses WHERE public_id = $1")
            .bind(public_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("course deleted: public_id={public_id}");
        Ok(result.rows_affected() > 0)
    }

    pub async fn modules_for_course(&self, course_id: i64) -> Result<Vec<CourseModule>> {
        let modules = sqlx::query_as::<_, CourseModule>(
            "SELECT * FROM course_modules WHERE course_id = $1 ORDER BY position, id",
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(modules)
    }

    pub async fn module_by_id(&self, module_id: i64) -> Result<Option<CourseModule>> {
        let module = sqlx::query_as::<_, CourseModule>("SELECT * FROM course_modules WHERE id = $1")
            .bind(module_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(module)
    }

    pub async fn add_module(&self, course_id: i64, title: &str) -> Result<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO course_modules (course_id, title, position)
            VALUES ($1, $2,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM course_modules WHERE course_id = $1))
            RETURNING id
            "#,
        )
        .bind(course_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("module added: id={id}, course_id={course_id}");
        Ok(id)
    }

    pub async fn delete_module(&self, module_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM course_modules WHERE id = $1")
            .bind(module_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("module deleted: id={module_id}");
        Ok(())
    }

    pub async fn lessons_for_course(&self, course_id: i64) -> Result<Vec<Lesson>> {
        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT l.* FROM lessons l
            JOIN course_modules m ON m.id = l.module_id
            WHERE m.course_id = $1
            ORDER BY m.position, m.id, l.position, l.id
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(lessons)
    }

    /// Insert a lesson with all its quiz questions atomically in a transaction.
    /// Uses an UNNEST batch insert to avoid N+1 round-trips.
    pub async fn create_lesson_with_questions(
        &self,
        module_id: i64,
        title: &str,
        video_url: &str,
        duration_seconds: i32,
        questions: &[NewQuestion],
    ) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let lesson_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO lessons (module_id, title, video_url, duration_seconds, position)
            VALUES ($1, $2, $3, $4,
                    (SELECT COALESCE(MAX(position) + 1, 0) FROM lessons WHERE module_id = $1))
            RETURNING id
            "#,
        )
        .bind(module_id)
        .bind(title)
        .bind(video_url)
        .bind(duration_seconds)
        .fetch_one(&mut *tx)
        .await?;

        if !questions.is_empty() {
            let prompts: Vec<String> = questions.iter().map(|q| q.prompt.clone()).collect();
            let options: Vec<String> = questions
                .iter()
                .map(|q| serde_json::to_string(&q.options))
                .collect::<Result<_, _>>()?;
            let correct: Vec<i32> = questions.iter().map(|q| q.correct_index).collect();

            sqlx::query(
                r#"
                INSERT INTO lesson_questions (lesson_id, prompt, options, correct_index, position)
                SELECT $1, p, o::jsonb, c, (n - 1)::INT
                FROM UNNEST($2::TEXT[], $3::TEXT[], $4::INT4[]) WITH ORDINALITY AS t(p, o, c, n)
                "#,
            )
            .bind(lesson_id)
            .bind(&prompts)
            .bind(&options)
            .bind(&correct)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            "lesson created: id={lesson_id}, module_id={module_id}, questions={}",
            questions.len()
        );
        Ok(lesson_id)
    }

    pub async fn delete_lesson(&self, lesson_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(lesson_id)
            .execute(&self.pool)
            .await?;

        tracing::info!("lesson deleted: id={lesson_id}");
        Ok(())
    }
}
