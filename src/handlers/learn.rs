use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    db::models::{Course, Enrollment},
    extractors::{IsHtmx, PartnerGuard},
    models::{SubmittedAnswer, Tier},
    names,
    rejections::{AppError, ResultExt},
    services::progress::{QuizOutcome, TickOutcome},
    views, AppState,
};

use crate::views::{certificate as certificate_views, learn as learn_views};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/training", get(catalog_page))
        .route("/training/certificates", get(my_certificates_page))
        .route("/training/{public_id}", get(course_page))
        .route("/training/{public_id}/enroll", post(enroll_post))
        .route("/learn/{enrollment_id}/lesson/{lesson_id}", get(lesson_page))
        .route("/learn/{enrollment_id}/lesson/{lesson_id}/tick", post(tick_post))
        .route(
            "/learn/{enrollment_id}/lesson/{lesson_id}/quiz",
            get(quiz_page).post(quiz_post),
        )
        .route("/certificates/{number}", get(certificate_page))
}

async fn visible_course(
    state: &AppState,
    public_id: &str,
    org_id: i64,
) -> Result<Course, AppError> {
    let course = state
        .db
        .course_by_public_id(public_id)
        .await
        .reject("could not load course")?
        .ok_or(AppError::NotFound(names::TRAINING_URL))?;

    let org = state
        .db
        .organization(org_id)
        .await
        .reject("could not load organization")?;

    if !course.published || Tier::parse(&course.min_tier) > Tier::parse(&org.tier) {
        return Err(AppError::NotFound(names::TRAINING_URL));
    }

    Ok(course)
}

async fn catalog_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let org = state
        .db
        .organization(guard.org_id)
        .await
        .reject("could not load organization")?;
    let entries = state
        .db
        .course_catalog(guard.user.id, &Tier::parse(&org.tier).visible_tiers())
        .await
        .reject("could not load courses")?;

    Ok(views::render(
        is_htmx,
        "Training",
        Some(&guard.user),
        learn_views::catalog(&entries),
    ))
}

async fn course_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(public_id): Path<String>,
) -> Result<maud::Markup, AppError> {
    let course = visible_course(&state, &public_id, guard.org_id).await?;
    let enrollment = state
        .db
        .enrollment_for_user(guard.user.id, course.id)
        .await
        .reject("could not load enrollment")?;
    let outline = state
        .db
        .course_outline(course.id, enrollment.as_ref().map(|e| e.id))
        .await
        .reject("could not load course outline")?;

    Ok(views::render(
        is_htmx,
        &course.title,
        Some(&guard.user),
        learn_views::course(&course, enrollment.as_ref(), &outline),
    ))
}

async fn enroll_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let course = visible_course(&state, &public_id, guard.org_id).await?;
    let enrollment = state
        .db
        .enroll(guard.user.id, course.id)
        .await
        .reject("could not enroll")?;
    let outline = state
        .db
        .course_outline(course.id, Some(enrollment.id))
        .await
        .reject("could not load course outline")?;

    Ok(views::titled(
        &course.title,
        learn_views::course(&course, Some(&enrollment), &outline),
    )
    .into_response())
}

async fn own_enrollment(
    state: &AppState,
    enrollment_id: i64,
    user_id: i64,
) -> Result<Enrollment, AppError> {
    state
        .db
        .enrollment_by_id_for_user(enrollment_id, user_id)
        .await
        .reject("could not load enrollment")?
        .ok_or(AppError::NotFound(names::TRAINING_URL))
}

async fn lesson_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path((enrollment_id, lesson_id)): Path<(i64, i64)>,
) -> Result<maud::Markup, AppError> {
    let enrollment = own_enrollment(&state, enrollment_id, guard.user.id).await?;

    let (lesson_ref, progress) = state
        .progress
        .start_lesson(&enrollment, lesson_id)
        .await
        .reject("could not open lesson")?
        .ok_or(AppError::NotFound(names::TRAINING_URL))?;

    let lesson = state
        .db
        .lesson_by_id(lesson_id)
        .await
        .reject("could not load lesson")?
        .ok_or(AppError::NotFound(names::TRAINING_URL))?;
    let course = state
        .db
        .course_by_id(enrollment.course_id)
        .await
        .reject("could not load course")?
        .ok_or(AppError::NotFound(names::TRAINING_URL))?;

    let data = learn_views::LessonPageData {
        enrollment_id: enrollment.id,
        course_public_id: course.public_id,
        course_title: course.title,
        lesson_id: lesson.id,
        lesson_title: lesson.title,
        video_url: lesson.video_url,
        duration_seconds: lesson_ref.duration_seconds,
        watch_seconds: progress.watch_seconds,
        completed: progress.completed,
        question_count: lesson_ref.question_count,
    };

    Ok(views::render(
        is_htmx,
        &data.lesson_title,
        Some(&guard.user),
        learn_views::lesson(&data),
    ))
}

#[derive(Deserialize)]
struct TickPost {
    seconds: i32,
    #[serde(default)]
    ended: bool,
}

#[derive(Serialize)]
struct TickResponse {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    watch_seconds: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    certificate: Option<String>,
}

async fn tick_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Path((enrollment_id, lesson_id)): Path<(i64, i64)>,
    Json(body): Json<TickPost>,
) -> Result<Json<TickResponse>, AppError> {
    let enrollment = own_enrollment(&state, enrollment_id, guard.user.id).await?;

    let outcome = state
        .progress
        .record_tick(&enrollment, lesson_id, body.seconds, body.ended)
        .await
        .reject("could not record watch time")?;

    let response = match outcome {
        TickOutcome::Recorded { watch_seconds } => TickResponse {
            state: "recorded",
            watch_seconds: Some(watch_seconds),
            certificate: None,
        },
        TickOutcome::QuizUnlocked { watch_seconds } => TickResponse {
            state: "quiz_unlocked",
            watch_seconds: Some(watch_seconds),
            certificate: None,
        },
        TickOutcome::LessonCompleted {
            watch_seconds,
            certificate,
        } => TickResponse {
            state: "completed",
            watch_seconds: Some(watch_seconds),
            certificate,
        },
        TickOutcome::AlreadyCompleted => TickResponse {
            state: "already_completed",
            watch_seconds: None,
            certificate: None,
        },
        TickOutcome::UnknownLesson => return Err(AppError::NotFound(names::TRAINING_URL)),
    };

    Ok(Json(response))
}

async fn quiz_data(
    state: &AppState,
    enrollment: &Enrollment,
    lesson_id: i64,
) -> Result<learn_views::QuizPageData, AppError> {
    let lesson = state
        .db
        .lesson_by_id(lesson_id)
        .await
        .reject("could not load lesson")?
        .ok_or(AppError::NotFound(names::TRAINING_URL))?;
    let questions = state
        .db
        .questions_for_lesson(lesson_id)
        .await
        .reject("could not load quiz")?;
    let attempts = state
        .db
        .attempts_for_lesson(enrollment.id, lesson_id)
        .await
        .reject("could not load attempts")?;

    Ok(learn_views::QuizPageData {
        enrollment_id: enrollment.id,
        lesson_id,
        lesson_title: lesson.title,
        questions: questions
            .into_iter()
            .map(|q| learn_views::QuizPrompt {
                question_id: q.id,
                prompt: q.prompt,
                options: q.options.0,
            })
            .collect(),
        attempts,
    })
}

async fn quiz_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path((enrollment_id, lesson_id)): Path<(i64, i64)>,
) -> Result<axum::response::Response, AppError> {
    let enrollment = own_enrollment(&state, enrollment_id, guard.user.id).await?;

    let (lesson_ref, _) = state
        .progress
        .start_lesson(&enrollment, lesson_id)
        .await
        .reject("could not open quiz")?
        .ok_or(AppError::NotFound(names::TRAINING_URL))?;

    if lesson_ref.question_count == 0 {
        return Ok(Redirect::to(&names::lesson_url(enrollment.id, lesson_id)).into_response());
    }

    let data = quiz_data(&state, &enrollment, lesson_id).await?;

    Ok(views::render(
        is_htmx,
        "Quiz",
        Some(&guard.user),
        learn_views::quiz(&data, learn_views::QuizFormState::NoError),
    )
    .into_response())
}

/// json-enc posts the quiz form as one flat object keyed by input name;
/// answers arrive as `q<question id> = <option index>`.
fn parse_quiz_form(form: &HashMap<String, String>) -> Vec<SubmittedAnswer> {
    let mut answers = Vec::new();
    for (key, value) in form {
        let Some(question_id) = key.strip_prefix('q').and_then(|s| s.parse::<i64>().ok()) else {
            continue;
        };
        let Ok(selected) = value.parse::<i32>() else {
            continue;
        };
        answers.push(SubmittedAnswer {
            question_id,
            selected,
        });
    }
    answers
}

async fn quiz_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Path((enrollment_id, lesson_id)): Path<(i64, i64)>,
    Json(form): Json<HashMap<String, String>>,
) -> Result<axum::response::Response, AppError> {
    let enrollment = own_enrollment(&state, enrollment_id, guard.user.id).await?;
    let answers = parse_quiz_form(&form);

    let outcome = state
        .progress
        .submit_quiz(&enrollment, lesson_id, &answers)
        .await
        .reject("could not grade quiz")?;

    match outcome {
        QuizOutcome::Graded(graded) => {
            let lesson = state
                .db
                .lesson_by_id(lesson_id)
                .await
                .reject("could not load lesson")?
                .ok_or(AppError::NotFound(names::TRAINING_URL))?;
            let course = state
                .db
                .course_by_id(enrollment.course_id)
                .await
                .reject("could not load course")?
                .ok_or(AppError::NotFound(names::TRAINING_URL))?;

            let data = learn_views::QuizResultData {
                enrollment_id: enrollment.id,
                lesson_id,
                lesson_title: lesson.title,
                course_public_id: course.public_id,
                score: graded.score,
                passed: graded.passed,
                attempt_number: graded.attempt_number,
                certificate: graded.certificate,
            };

            Ok(views::titled("Quiz result", learn_views::quiz_result(&data)).into_response())
        }
        QuizOutcome::Incomplete => {
            let data = quiz_data(&state, &enrollment, lesson_id).await?;
            Ok(views::titled(
                "Quiz",
                learn_views::quiz(&data, learn_views::QuizFormState::Incomplete),
            )
            .into_response())
        }
        QuizOutcome::NoQuiz => Err(AppError::Input("this lesson has no quiz")),
        QuizOutcome::UnknownLesson => Err(AppError::NotFound(names::TRAINING_URL)),
    }
}

async fn my_certificates_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let certs = state
        .db
        .certificates_for_user(guard.user.id)
        .await
        .reject("could not load certificates")?;

    Ok(views::render(
        is_htmx,
        "My certificates",
        Some(&guard.user),
        learn_views::certificates(&certs),
    ))
}

/// No session required: anyone holding a certificate number can verify it.
/// Errors render as plain text, not the portal's styled pages.
async fn certificate_page(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> axum::response::Response {
    match state.db.certificate_by_number(&number).await {
        Ok(Some(cert)) => certificate_views::document(&cert).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "certificate not found").into_response(),
        Err(err) => {
            tracing::error!("could not load certificate: {err:?}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "could not load certificate",
            )
                .into_response()
        }
    }
}
