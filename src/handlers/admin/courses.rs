use axum::{
    extract::{Form, Multipart, Path, State},
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use maud::Markup;
use serde::Deserialize;
use ulid::Ulid;

use crate::{
    db::models::{Course, CourseModule, Lesson},
    extractors::{AdminGuard, IsHtmx},
    models, names,
    rejections::{AppError, ResultExt},
    storage::{self, ObjectStore},
    views, AppState,
};

use crate::views::admin::courses::{self as course_views, CourseFormState, EditorState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/courses", get(list_page))
        .route("/admin/courses/new", get(new_page).post(create_post))
        .route("/admin/courses/{public_id}", get(editor_page).post(update_post))
        .route("/admin/courses/{public_id}/delete", post(delete_post))
        .route("/admin/courses/{public_id}/thumbnail", post(thumbnail_post))
        .route("/admin/courses/{public_id}/modules", post(module_add_post))
        .route("/admin/modules/{module_id}/delete", post(module_delete_post))
        .route("/admin/modules/{module_id}/lessons", post(lesson_add_post))
        .route("/admin/lessons/{lesson_id}/delete", post(lesson_delete_post))
}

async fn list_fragment(state: &AppState) -> Result<Markup, AppError> {
    let courses = state
        .db
        .all_courses()
        .await
        .reject("could not load courses")?;
    Ok(course_views::list(&courses))
}

async fn list_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    let body = list_fragment(&state).await?;
    Ok(views::render(is_htmx, "Courses", Some(&user), body))
}

async fn new_page(
    AdminGuard(user): AdminGuard,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    Ok(views::render(
        is_htmx,
        "New course",
        Some(&user),
        course_views::new_course(CourseFormState::NoError),
    ))
}

/// Course plus its modules with each module's lessons, in outline order.
async fn editor_data(
    state: &AppState,
    public_id: &str,
) -> Result<(Course, Vec<(CourseModule, Vec<Lesson>)>), AppError> {
    let course = state
        .db
        .course_by_public_id(public_id)
        .await
        .reject("could not load course")?
        .ok_or(AppError::NotFound(names::ADMIN_COURSES_URL))?;
    let modules = state
        .db
        .modules_for_course(course.id)
        .await
        .reject("could not load modules")?;
    let lessons = state
        .db
        .lessons_for_course(course.id)
        .await
        .reject("could not load lessons")?;

    let mut grouped: Vec<(CourseModule, Vec<Lesson>)> =
        modules.into_iter().map(|m| (m, Vec::new())).collect();
    for lesson in lessons {
        if let Some((_, bucket)) = grouped.iter_mut().find(|(m, _)| m.id == lesson.module_id) {
            bucket.push(lesson);
        }
    }

    Ok((course, grouped))
}

async fn editor_fragment(
    state: &AppState,
    public_id: &str,
    editor_state: EditorState,
) -> Result<Markup, AppError> {
    let (course, modules) = editor_data(state, public_id).await?;
    let data = course_views::EditorData {
        course: &course,
        modules,
    };
    Ok(views::titled(
        &course.title,
        course_views::editor(&data, editor_state),
    ))
}

async fn editor_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(public_id): Path<String>,
) -> Result<Markup, AppError> {
    let (course, modules) = editor_data(&state, &public_id).await?;
    let data = course_views::EditorData {
        course: &course,
        modules,
    };

    Ok(views::render(
        is_htmx,
        &course.title,
        Some(&user),
        course_views::editor(&data, EditorState::NoError),
    ))
}

#[derive(Deserialize)]
struct CoursePost {
    title: String,
    #[serde(default)]
    description: String,
    min_tier: String,
    /// Checkbox: present when ticked, absent otherwise.
    #[serde(default)]
    published: Option<String>,
}

async fn create_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Form(body): Form<CoursePost>,
) -> Result<axum::response::Response, AppError> {
    if !names::TIERS.contains(&body.min_tier.as_str()) {
        return Err(AppError::Input("unknown tier"));
    }

    let title = body.title.trim();
    if title.is_empty() {
        return Ok(views::titled(
            "New course",
            course_views::new_course(CourseFormState::Invalid("Give the course a title.")),
        )
        .into_response());
    }

    let public_id = state
        .db
        .create_course(title, body.description.trim(), &body.min_tier)
        .await
        .reject("could not create course")?;

    // Swap the address bar from /new to the created course's editor URL.
    let mut headers = HeaderMap::new();
    headers.insert(
        "HX-Replace-Url",
        HeaderValue::from_str(&names::admin_course_url(&public_id))
            .reject("could not build replace-url header")?,
    );

    let body = editor_fragment(&state, &public_id, EditorState::NoError).await?;
    Ok((headers, body).into_response())
}

async fn update_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Form(body): Form<CoursePost>,
) -> Result<Markup, AppError> {
    if !names::TIERS.contains(&body.min_tier.as_str()) {
        return Err(AppError::Input("unknown tier"));
    }

    let title = body.title.trim();
    if title.is_empty() {
        return editor_fragment(
            &state,
            &public_id,
            EditorState::CourseInvalid("Give the course a title."),
        )
        .await;
    }

    let updated = state
        .db
        .update_course(
            &public_id,
            title,
            body.description.trim(),
            &body.min_tier,
            body.published.is_some(),
        )
        .await
        .reject("could not update course")?;
    if !updated {
        return Err(AppError::NotFound(names::ADMIN_COURSES_URL));
    }

    editor_fragment(&state, &public_id, EditorState::NoError).await
}

async fn delete_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Markup, AppError> {
    let deleted = state
        .db
        .delete_course(&public_id)
        .await
        .reject("could not delete course")?;
    if !deleted {
        return Err(AppError::NotFound(names::ADMIN_COURSES_URL));
    }

    let body = list_fragment(&state).await?;
    Ok(views::titled("Courses", body))
}

async fn thumbnail_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Markup, AppError> {
    let mut upload: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("failed to read multipart field: {e}");
        AppError::Input("failed to read multipart field")
    })? {
        if field.name() != Some("thumbnail") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| {
            tracing::error!("failed to read field data: {e}");
            AppError::Input("failed to read field data")
        })?;
        upload = Some((content_type, bytes.to_vec()));
    }

    let Some((content_type, bytes)) = upload else {
        return Err(AppError::Input("missing thumbnail field"));
    };

    // Validation happens before anything touches the object store.
    if let Err(err) =
        storage::validate_image_upload(content_type.as_deref(), bytes.len() as u64)
    {
        return editor_fragment(
            &state,
            &public_id,
            EditorState::ThumbnailRejected(err.message()),
        )
        .await;
    }

    let ext = storage::extension_for_content_type(content_type.as_deref().unwrap_or_default());
    let path = format!("thumbnails/{}.{ext}", Ulid::new());

    state
        .storage
        .put(&path, bytes)
        .await
        .reject("could not store thumbnail")?;

    let updated = state
        .db
        .set_course_thumbnail(&public_id, &path)
        .await
        .reject("could not update thumbnail")?;
    if !updated {
        return Err(AppError::NotFound(names::ADMIN_COURSES_URL));
    }

    editor_fragment(&state, &public_id, EditorState::NoError).await
}

#[derive(Deserialize)]
struct ModulePost {
    title: String,
}

async fn module_add_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Form(body): Form<ModulePost>,
) -> Result<Markup, AppError> {
    let course = state
        .db
        .course_by_public_id(&public_id)
        .await
        .reject("could not load course")?
        .ok_or(AppError::NotFound(names::ADMIN_COURSES_URL))?;

    let title = body.title.trim();
    if title.is_empty() {
        return editor_fragment(
            &state,
            &public_id,
            EditorState::ModuleInvalid("Give the module a title."),
        )
        .await;
    }

    state
        .db
        .add_module(course.id, title)
        .await
        .reject("could not add module")?;

    editor_fragment(&state, &public_id, EditorState::NoError).await
}

/// Resolve a module back to its course, for re-rendering the editor.
async fn course_of_module(state: &AppState, module_id: i64) -> Result<(CourseModule, Course), AppError> {
    let module = state
        .db
        .module_by_id(module_id)
        .await
        .reject("could not load module")?
        .ok_or(AppError::NotFound(names::ADMIN_COURSES_URL))?;
    let course = state
        .db
        .course_by_id(module.course_id)
        .await
        .reject("could not load course")?
        .ok_or(AppError::NotFound(names::ADMIN_COURSES_URL))?;
    Ok((module, course))
}

async fn module_delete_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(module_id): Path<i64>,
) -> Result<Markup, AppError> {
    let (module, course) = course_of_module(&state, module_id).await?;

    state
        .db
        .delete_module(module.id)
        .await
        .reject("could not delete module")?;

    editor_fragment(&state, &course.public_id, EditorState::NoError).await
}

#[derive(Deserialize)]
struct LessonPost {
    title: String,
    video_url: String,
    duration_seconds: String,
    #[serde(default)]
    questions: String,
}

async fn lesson_add_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(module_id): Path<i64>,
    Form(body): Form<LessonPost>,
) -> Result<Markup, AppError> {
    let (module, course) = course_of_module(&state, module_id).await?;

    let invalid = |msg| editor_fragment(&state, &course.public_id, EditorState::LessonInvalid(msg));

    let title = body.title.trim();
    let video_url = body.video_url.trim();
    if title.is_empty() || video_url.is_empty() {
        return invalid("Every lesson needs a title and a video URL.").await;
    }

    let duration_seconds = body.duration_seconds.trim().parse::<i32>().unwrap_or(0);
    if duration_seconds <= 0 {
        return invalid("Video length must be a positive number of seconds.").await;
    }

    let questions = match models::parse_questions_json(&body.questions) {
        Ok(questions) => questions,
        Err(msg) => return invalid(msg).await,
    };

    state
        .db
        .create_lesson_with_questions(module.id, title, video_url, duration_seconds, &questions)
        .await
        .reject("could not create lesson")?;

    editor_fragment(&state, &course.public_id, EditorState::NoError).await
}

async fn lesson_delete_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(lesson_id): Path<i64>,
) -> Result<Markup, AppError> {
    let lesson = state
        .db
        .lesson_by_id(lesson_id)
        .await
        .reject("could not load lesson")?
        .ok_or(AppError::NotFound(names::ADMIN_COURSES_URL))?;
    let (_, course) = course_of_module(&state, lesson.module_id).await?;

    state
        .db
        .delete_lesson(lesson.id)
        .await
        .reject("could not delete lesson")?;

    editor_fragment(&state, &course.public_id, EditorState::NoError).await
}
