use std::collections::HashSet;

use color_eyre::Result;

use crate::db::models::{Enrollment, LessonProgress, LessonRef, QuizQuestion};
use crate::db::Db;
use crate::models::SubmittedAnswer;
use crate::names;
use crate::services::certificate::{CertificateService, CertificateStore};

// ---------------------------------------------------------------------------
// ProgressRepository trait (DIP: service defines the abstraction it needs)
// ---------------------------------------------------------------------------

#[cfg_attr(test, mockall::automock)]
pub trait ProgressRepository: Send + Sync {
    /// Resolve a lesson through the enrollment's course. None when the lesson
    /// does not exist or belongs to another course.
    fn lesson_for_enrollment(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<Option<LessonRef>>> + Send;

    fn ensure_lesson_progress(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<LessonProgress>> + Send;

    fn record_watch_time(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        watch_seconds: i32,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn mark_lesson_completed(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn questions_for_lesson(
        &self,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<QuizQuestion>>> + Send;

    fn attempt_count(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
    ) -> impl std::future::Future<Output = Result<i64>> + Send;

    fn record_quiz_attempt(
        &self,
        enrollment_id: i64,
        lesson_id: i64,
        attempt_number: i32,
        answers: Vec<SubmittedAnswer>,
        score: i32,
        passed: bool,
    ) -> impl std::future::Future<Output = Result<()>> + Send;

    fn course_lesson_ids(
        &self,
        course_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<i64>>> + Send;

    fn completed_lesson_ids(
        &self,
        enrollment_id: i64,
    ) -> impl std::future::Future<Output = Result<Vec<i64>>> + Send;
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

pub enum TickOutcome {
    /// Watch time recorded; the completion threshold is not reached yet.
    Recorded { watch_seconds: i32 },
    /// Threshold reached and the lesson has a quiz to pass.
    QuizUnlocked { watch_seconds: i32 },
    /// Threshold reached on a lesson without a quiz; the lesson is done.
    /// Carries the certificate number when this tick finished the course.
    LessonCompleted {
        watch_seconds: i32,
        certificate: Option<String>,
    },
    /// The lesson was already completed; the tick is dropped.
    AlreadyCompleted,
    /// Lesson id does not belong to the enrollment's course.
    UnknownLesson,
}

pub enum QuizOutcome {
    Graded(GradedQuiz),
    /// Not every question has an answer.
    Incomplete,
    /// The lesson has no quiz to grade.
    NoQuiz,
    UnknownLesson,
}

pub struct GradedQuiz {
    pub score: i32,
    pub passed: bool,
    pub attempt_number: i32,
    /// Set when the passing attempt finished the whole course.
    pub certificate: Option<String>,
}

// ---------------------------------------------------------------------------
// ProgressService
// ---------------------------------------------------------------------------

pub struct ProgressService<R: ProgressRepository = Db, C: CertificateStore = Db> {
    repo: R,
    issuer: CertificateService<C>,
}

impl<R: ProgressRepository + Clone, C: CertificateStore + Clone> Clone for ProgressService<R, C> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            issuer: self.issuer.clone(),
        }
    }
}

impl<R: ProgressRepository, C: CertificateStore> ProgressService<R, C> {
    pub fn new(repo: R, issuer: CertificateService<C>) -> Self {
        Self { repo, issuer }
    }

    /// Opens a lesson for viewing. Creates the progress row lazily on first
    /// view. None when the lesson is not part of the enrollment's course.
    pub async fn start_lesson(
        &self,
        enrollment: &Enrollment,
        lesson_id: i64,
    ) -> Result<Option<(LessonRef, LessonProgress)>> {
        let Some(lesson) = self
            .repo
            .lesson_for_enrollment(enrollment.id, lesson_id)
            .await?
        else {
            return Ok(None);
        };

        let progress = self
            .repo
            .ensure_lesson_progress(enrollment.id, lesson_id)
            .await?;

        Ok(Some((lesson, progress)))
    }

    /// Handles one periodic watch-time report from the player. `ended` is the
    /// player's end-of-video signal, which completes the video regardless of
    /// the reported position.
    pub async fn record_tick(
        &self,
        enrollment: &Enrollment,
        lesson_id: i64,
        reported_seconds: i32,
        ended: bool,
    ) -> Result<TickOutcome> {
        let Some(lesson) = self
            .repo
            .lesson_for_enrollment(enrollment.id, lesson_id)
            .await?
        else {
            return Ok(TickOutcome::UnknownLesson);
        };

        let progress = self
            .repo
            .ensure_lesson_progress(enrollment.id, lesson_id)
            .await?;

        if progress.completed {
            return Ok(TickOutcome::AlreadyCompleted);
        }

        // Watch time never regresses: a stale tab reporting an old play-head
        // cannot undo later progress.
        let watch_seconds = progress.watch_seconds.max(reported_seconds.max(0));
        self.repo
            .record_watch_time(enrollment.id, lesson_id, watch_seconds)
            .await?;

        let video_complete = ended
            || watch_seconds as f64
                >= lesson.duration_seconds as f64 * names::VIDEO_COMPLETE_RATIO;

        if !video_complete {
            return Ok(TickOutcome::Recorded { watch_seconds });
        }

        if lesson.question_count > 0 {
            return Ok(TickOutcome::QuizUnlocked { watch_seconds });
        }

        // No quiz: watching the video is the whole lesson.
        self.repo
            .mark_lesson_completed(enrollment.id, lesson_id)
            .await?;
        let certificate = self.check_course_completion(enrollment).await?;

        Ok(TickOutcome::LessonCompleted {
            watch_seconds,
            certificate,
        })
    }

    /// Grades one quiz submission and appends the attempt. A passing attempt
    /// completes the lesson and re-checks the whole course.
    pub async fn submit_quiz(
        &self,
        enrollment: &Enrollment,
        lesson_id: i64,
        answers: &[SubmittedAnswer],
    ) -> Result<QuizOutcome> {
        if self
            .repo
            .lesson_for_enrollment(enrollment.id, lesson_id)
            .await?
            .is_none()
        {
            return Ok(QuizOutcome::UnknownLesson);
        }

        let questions = self.repo.questions_for_lesson(lesson_id).await?;
        if questions.is_empty() {
            return Ok(QuizOutcome::NoQuiz);
        }

        let Some(correct_count) = grade(&questions, answers) else {
            return Ok(QuizOutcome::Incomplete);
        };

        let score = score_percent(correct_count, questions.len());
        let passed = score >= names::PASS_MARK;

        let attempt_number = self.repo.attempt_count(enrollment.id, lesson_id).await? as i32 + 1;
        self.repo
            .record_quiz_attempt(
                enrollment.id,
                lesson_id,
                attempt_number,
                answers.to_vec(),
                score,
                passed,
            )
            .await?;

        let mut certificate = None;
        if passed {
            self.repo
                .ensure_lesson_progress(enrollment.id, lesson_id)
                .await?;
            self.repo
                .mark_lesson_completed(enrollment.id, lesson_id)
                .await?;
            certificate = self.check_course_completion(enrollment).await?;
        }

        Ok(QuizOutcome::Graded(GradedQuiz {
            score,
            passed,
            attempt_number,
            certificate,
        }))
    }

    /// Full re-scan: the course is complete when every lesson of every module
    /// has a completed progress row. Issues the certificate on the transition.
    async fn check_course_completion(&self, enrollment: &Enrollment) -> Result<Option<String>> {
        let all = self.repo.course_lesson_ids(enrollment.course_id).await?;
        let done: HashSet<i64> = self
            .repo
            .completed_lesson_ids(enrollment.id)
            .await?
            .into_iter()
            .collect();

        if !all.iter().all(|id| done.contains(id)) {
            return Ok(None);
        }

        let number = self.issuer.issue(enrollment.id).await?;
        Ok(Some(number))
    }
}

/// Number of correctly answered questions, or None when any question has no
/// submitted answer.
fn grade(questions: &[QuizQuestion], answers: &[SubmittedAnswer]) -> Option<usize> {
    let mut correct = 0;
    for question in questions {
        let answer = answers.iter().find(|a| a.question_id == question.id)?;
        if answer.selected == question.correct_index {
            correct += 1;
        }
    }
    Some(correct)
}

fn score_percent(correct: usize, total: usize) -> i32 {
    (100.0 * correct as f64 / total as f64).round() as i32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use sqlx::types::Json;

    use super::*;
    use crate::db::models::CertificateParties;
    use crate::services::certificate::{CertificateInsert, MockCertificateStore};

    const LESSON_ID: i64 = 5;

    fn enrollment() -> Enrollment {
        Enrollment {
            id: 9,
            user_id: 1,
            course_id: 3,
            started_at: Utc::now(),
            completed_at: None,
            certificate_no: None,
        }
    }

    fn lesson(duration_seconds: i32, question_count: i64) -> LessonRef {
        LessonRef {
            id: LESSON_ID,
            duration_seconds,
            question_count,
        }
    }

    fn progress(watch_seconds: i32, completed: bool) -> LessonProgress {
        LessonProgress {
            id: 1,
            enrollment_id: 9,
            lesson_id: LESSON_ID,
            watch_seconds,
            completed,
            last_watched_at: Utc::now(),
        }
    }

    /// One question per entry; the entry is the correct option index.
    fn questions(correct: &[i32]) -> Vec<QuizQuestion> {
        correct
            .iter()
            .enumerate()
            .map(|(i, &correct_index)| QuizQuestion {
                id: i as i64 + 1,
                lesson_id: LESSON_ID,
                prompt: format!("Question {}", i + 1),
                options: Json(vec!["a".to_string(), "b".to_string(), "c".to_string()]),
                correct_index,
                position: i as i32,
            })
            .collect()
    }

    fn answers(selected: &[i32]) -> Vec<SubmittedAnswer> {
        selected
            .iter()
            .enumerate()
            .map(|(i, &selected)| SubmittedAnswer {
                question_id: i as i64 + 1,
                selected,
            })
            .collect()
    }

    fn service(
        repo: MockProgressRepository,
    ) -> ProgressService<MockProgressRepository, MockCertificateStore> {
        ProgressService::new(repo, CertificateService::new(MockCertificateStore::new()))
    }

    fn service_with_issuer(
        repo: MockProgressRepository,
        store: MockCertificateStore,
    ) -> ProgressService<MockProgressRepository, MockCertificateStore> {
        ProgressService::new(repo, CertificateService::new(store))
    }

    fn issuing_store() -> MockCertificateStore {
        let mut store = MockCertificateStore::new();
        store
            .expect_certificate_for_enrollment()
            .returning(|_| Box::pin(async { Ok(None) }));
        store.expect_enrollment_parties().returning(|_| {
            Box::pin(async {
                Ok(Some(CertificateParties {
                    partner_name: "Acme Corp".to_string(),
                    course_title: "Selling Widgets 101".to_string(),
                }))
            })
        });
        store
            .expect_insert_certificate()
            .returning(|_, _, _, _| Box::pin(async { Ok(CertificateInsert::Inserted) }));
        store
            .expect_stamp_enrollment_completed()
            .returning(|_, _| Box::pin(async { Ok(()) }));
        store
    }

    // ----- tick tests -----

    #[tokio::test]
    async fn tick_on_foreign_lesson_is_rejected() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let svc = service(repo);
        let outcome = svc.record_tick(&enrollment(), 999, 10, false).await.unwrap();

        assert!(matches!(outcome, TickOutcome::UnknownLesson));
    }

    #[tokio::test]
    async fn tick_below_threshold_just_records() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 0))) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(0, false)) }));
        repo.expect_record_watch_time()
            .withf(|_, _, seconds| *seconds == 120)
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let svc = service(repo);
        let outcome = svc
            .record_tick(&enrollment(), LESSON_ID, 120, false)
            .await
            .unwrap();

        assert!(matches!(outcome, TickOutcome::Recorded { watch_seconds: 120 }));
    }

    #[tokio::test]
    async fn stale_tick_cannot_regress_watch_time() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 0))) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(200, false)) }));
        repo.expect_record_watch_time()
            .withf(|_, _, seconds| *seconds == 200)
            .returning(|_, _, _| Box::pin(async { Ok(()) }));

        let svc = service(repo);
        let outcome = svc
            .record_tick(&enrollment(), LESSON_ID, 120, false)
            .await
            .unwrap();

        assert!(matches!(outcome, TickOutcome::Recorded { watch_seconds: 200 }));
    }

    #[tokio::test]
    async fn tick_at_95_percent_completes_a_lesson_without_quiz() {
        // Scenario: 300s video, no questions, tick reports 285s.
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 0))) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(270, false)) }));
        repo.expect_record_watch_time()
            .returning(|_, _, _| Box::pin(async { Ok(()) }));
        repo.expect_mark_lesson_completed()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));
        // A second lesson is still open, so no certificate yet.
        repo.expect_course_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID, 6]) }));
        repo.expect_completed_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID]) }));

        let svc = service(repo);
        let outcome = svc
            .record_tick(&enrollment(), LESSON_ID, 285, false)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            TickOutcome::LessonCompleted {
                watch_seconds: 285,
                certificate: None
            }
        ));
    }

    #[tokio::test]
    async fn end_signal_completes_regardless_of_position() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 0))) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(10, false)) }));
        repo.expect_record_watch_time()
            .returning(|_, _, _| Box::pin(async { Ok(()) }));
        repo.expect_mark_lesson_completed()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));
        repo.expect_course_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID, 6]) }));
        repo.expect_completed_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID]) }));

        let svc = service(repo);
        let outcome = svc
            .record_tick(&enrollment(), LESSON_ID, 10, true)
            .await
            .unwrap();

        assert!(matches!(outcome, TickOutcome::LessonCompleted { .. }));
    }

    #[tokio::test]
    async fn threshold_with_quiz_unlocks_the_quiz_without_completing() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 2))) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(280, false)) }));
        repo.expect_record_watch_time()
            .returning(|_, _, _| Box::pin(async { Ok(()) }));
        // No mark_lesson_completed expectation: completing here would panic.

        let svc = service(repo);
        let outcome = svc
            .record_tick(&enrollment(), LESSON_ID, 290, false)
            .await
            .unwrap();

        assert!(matches!(outcome, TickOutcome::QuizUnlocked { watch_seconds: 290 }));
    }

    #[tokio::test]
    async fn tick_on_completed_lesson_is_dropped() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 0))) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(300, true)) }));

        let svc = service(repo);
        let outcome = svc
            .record_tick(&enrollment(), LESSON_ID, 50, false)
            .await
            .unwrap();

        assert!(matches!(outcome, TickOutcome::AlreadyCompleted));
    }

    // ----- quiz tests -----

    #[tokio::test]
    async fn missing_answers_are_rejected_before_grading() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 2))) }));
        repo.expect_questions_for_lesson()
            .returning(|_| Box::pin(async { Ok(questions(&[0, 1])) }));
        // No record_quiz_attempt expectation: nothing may be appended.

        let svc = service(repo);
        let submitted = vec![SubmittedAnswer {
            question_id: 1,
            selected: 0,
        }];
        let outcome = svc
            .submit_quiz(&enrollment(), LESSON_ID, &submitted)
            .await
            .unwrap();

        assert!(matches!(outcome, QuizOutcome::Incomplete));
    }

    #[tokio::test]
    async fn failed_attempt_scores_but_never_completes() {
        // Scenario: correct answers [0, 1], submission [0, 0] → 50, failed.
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 2))) }));
        repo.expect_questions_for_lesson()
            .returning(|_| Box::pin(async { Ok(questions(&[0, 1])) }));
        repo.expect_attempt_count()
            .returning(|_, _| Box::pin(async { Ok(0) }));
        repo.expect_record_quiz_attempt()
            .withf(|_, _, attempt, _, score, passed| *attempt == 1 && *score == 50 && !passed)
            .returning(|_, _, _, _, _, _| Box::pin(async { Ok(()) }));
        // No mark_lesson_completed expectation: a failed attempt must not
        // complete the lesson.

        let svc = service(repo);
        let outcome = svc
            .submit_quiz(&enrollment(), LESSON_ID, &answers(&[0, 0]))
            .await
            .unwrap();

        let QuizOutcome::Graded(graded) = outcome else {
            panic!("expected a graded outcome");
        };
        assert_eq!(graded.score, 50);
        assert!(!graded.passed);
        assert_eq!(graded.attempt_number, 1);
        assert!(graded.certificate.is_none());
    }

    #[tokio::test]
    async fn passing_retry_completes_and_increments_attempt_number() {
        // Scenario continued: second submission [0, 1] → 100, passed.
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 2))) }));
        repo.expect_questions_for_lesson()
            .returning(|_| Box::pin(async { Ok(questions(&[0, 1])) }));
        repo.expect_attempt_count()
            .returning(|_, _| Box::pin(async { Ok(1) }));
        repo.expect_record_quiz_attempt()
            .withf(|_, _, attempt, _, score, passed| *attempt == 2 && *score == 100 && *passed)
            .returning(|_, _, _, _, _, _| Box::pin(async { Ok(()) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(290, false)) }));
        repo.expect_mark_lesson_completed()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));
        repo.expect_course_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID, 6]) }));
        repo.expect_completed_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID]) }));

        let svc = service(repo);
        let outcome = svc
            .submit_quiz(&enrollment(), LESSON_ID, &answers(&[0, 1]))
            .await
            .unwrap();

        let QuizOutcome::Graded(graded) = outcome else {
            panic!("expected a graded outcome");
        };
        assert_eq!(graded.score, 100);
        assert!(graded.passed);
        assert_eq!(graded.attempt_number, 2);
        assert!(graded.certificate.is_none());
    }

    #[tokio::test]
    async fn passing_the_last_lesson_issues_a_certificate() {
        // Scenario: single-module, single-lesson course; passing the quiz
        // completes the enrollment and mints a certificate.
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 2))) }));
        repo.expect_questions_for_lesson()
            .returning(|_| Box::pin(async { Ok(questions(&[0, 1])) }));
        repo.expect_attempt_count()
            .returning(|_, _| Box::pin(async { Ok(1) }));
        repo.expect_record_quiz_attempt()
            .returning(|_, _, _, _, _, _| Box::pin(async { Ok(()) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(290, false)) }));
        repo.expect_mark_lesson_completed()
            .returning(|_, _| Box::pin(async { Ok(()) }));
        repo.expect_course_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID]) }));
        repo.expect_completed_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID]) }));

        let svc = service_with_issuer(repo, issuing_store());
        let outcome = svc
            .submit_quiz(&enrollment(), LESSON_ID, &answers(&[0, 1]))
            .await
            .unwrap();

        let QuizOutcome::Graded(graded) = outcome else {
            panic!("expected a graded outcome");
        };
        assert!(graded.passed);

        let number = graded.certificate.unwrap();
        let parts: Vec<&str> = number.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "CERT");
        assert_eq!(parts[2].len(), 9);
        assert!(parts[2]
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn score_is_rounded_to_the_nearest_percent() {
        for (selected, expected_score, expected_pass) in [
            (vec![0, 9, 9], 33, false),
            (vec![0, 1, 9], 67, false),
            (vec![0, 1, 2], 100, true),
        ] {
            let mut repo = MockProgressRepository::new();
            repo.expect_lesson_for_enrollment()
                .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 3))) }));
            repo.expect_questions_for_lesson()
                .returning(|_| Box::pin(async { Ok(questions(&[0, 1, 2])) }));
            repo.expect_attempt_count()
                .returning(|_, _| Box::pin(async { Ok(0) }));
            repo.expect_record_quiz_attempt()
                .returning(|_, _, _, _, _, _| Box::pin(async { Ok(()) }));
            if expected_pass {
                repo.expect_ensure_lesson_progress()
                    .returning(|_, _| Box::pin(async { Ok(progress(290, false)) }));
                repo.expect_mark_lesson_completed()
                    .returning(|_, _| Box::pin(async { Ok(()) }));
                repo.expect_course_lesson_ids()
                    .returning(|_| Box::pin(async { Ok(vec![LESSON_ID, 6]) }));
                repo.expect_completed_lesson_ids()
                    .returning(|_| Box::pin(async { Ok(vec![LESSON_ID]) }));
            }

            let svc = service(repo);
            let outcome = svc
                .submit_quiz(&enrollment(), LESSON_ID, &answers(&selected))
                .await
                .unwrap();

            let QuizOutcome::Graded(graded) = outcome else {
                panic!("expected a graded outcome");
            };
            assert_eq!(graded.score, expected_score);
            assert_eq!(graded.passed, expected_pass);
        }
    }

    #[tokio::test]
    async fn seventy_percent_exactly_is_a_pass() {
        let correct: Vec<i32> = vec![0; 10];
        // 7 right, 3 wrong → exactly 70.
        let mut selected = vec![0; 7];
        selected.extend([9, 9, 9]);

        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 10))) }));
        repo.expect_questions_for_lesson()
            .returning(move |_| {
                let qs = questions(&correct);
                Box::pin(async move { Ok(qs) })
            });
        repo.expect_attempt_count()
            .returning(|_, _| Box::pin(async { Ok(0) }));
        repo.expect_record_quiz_attempt()
            .returning(|_, _, _, _, _, _| Box::pin(async { Ok(()) }));
        repo.expect_ensure_lesson_progress()
            .returning(|_, _| Box::pin(async { Ok(progress(290, false)) }));
        repo.expect_mark_lesson_completed()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(()) }));
        repo.expect_course_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID, 6]) }));
        repo.expect_completed_lesson_ids()
            .returning(|_| Box::pin(async { Ok(vec![LESSON_ID]) }));

        let svc = service(repo);
        let outcome = svc
            .submit_quiz(&enrollment(), LESSON_ID, &answers(&selected))
            .await
            .unwrap();

        let QuizOutcome::Graded(graded) = outcome else {
            panic!("expected a graded outcome");
        };
        assert_eq!(graded.score, 70);
        assert!(graded.passed);
    }

    #[tokio::test]
    async fn quiz_submission_without_questions_is_rejected() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 0))) }));
        repo.expect_questions_for_lesson()
            .returning(|_| Box::pin(async { Ok(vec![]) }));

        let svc = service(repo);
        let outcome = svc.submit_quiz(&enrollment(), LESSON_ID, &[]).await.unwrap();

        assert!(matches!(outcome, QuizOutcome::NoQuiz));
    }

    #[tokio::test]
    async fn quiz_on_foreign_lesson_is_rejected() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let svc = service(repo);
        let outcome = svc.submit_quiz(&enrollment(), 999, &[]).await.unwrap();

        assert!(matches!(outcome, QuizOutcome::UnknownLesson));
    }

    // ----- start_lesson tests -----

    #[tokio::test]
    async fn start_lesson_creates_the_progress_row_lazily() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(Some(lesson(300, 2))) }));
        repo.expect_ensure_lesson_progress()
            .times(1)
            .returning(|_, _| Box::pin(async { Ok(progress(0, false)) }));

        let svc = service(repo);
        let opened = svc.start_lesson(&enrollment(), LESSON_ID).await.unwrap();

        let (lesson, progress) = opened.unwrap();
        assert_eq!(lesson.id, LESSON_ID);
        assert_eq!(progress.watch_seconds, 0);
    }

    #[tokio::test]
    async fn start_lesson_rejects_foreign_lessons() {
        let mut repo = MockProgressRepository::new();
        repo.expect_lesson_for_enrollment()
            .returning(|_, _| Box::pin(async { Ok(None) }));

        let svc = service(repo);
        let opened = svc.start_lesson(&enrollment(), 999).await.unwrap();

        assert!(opened.is_none());
    }
}
