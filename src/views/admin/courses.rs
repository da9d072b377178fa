use crate::{
    db::models::{Course, CourseModule, Lesson},
    names, utils,
    views::components,
};
use maud::{html, Markup};

pub enum CourseFormState {
    NoError,
    Invalid(&'static str),
}

pub enum EditorState {
    NoError,
    CourseInvalid(&'static str),
    ThumbnailRejected(&'static str),
    ModuleInvalid(&'static str),
    LessonInvalid(&'static str),
}

pub fn list(courses: &[Course]) -> Markup {
    html! {
        h1 { "Courses" }
        p {
            button hx-get=(names::NEW_ADMIN_COURSE_URL)
                   hx-push-url="true"
                   hx-target="main"
                   style="width: fit-content;" {
                "New course"
            }
        }
        @if courses.is_empty() {
            (components::empty_state("No courses yet."))
        } @else {
            table {
                thead { tr {
                    th { "Title" }
                    th { "Minimum tier" }
                    th { "Published" }
                    th { "Created" }
                    th { "" }
                } }
                tbody {
                    @for course in courses {
                        tr {
                            td {
                                a hx-get=(names::admin_course_url(&course.public_id))
                                  hx-push-url="true"
                                  hx-target="main"
                                  href="#" { (course.title) }
                            }
                            td { (components::status_badge(&course.min_tier)) }
                            td {
                                @if course.published { "Yes" } @else { "Draft" }
                            }
                            td { (components::datetime(course.created_at)) }
                            td {
                                button hx-post=(names::admin_course_delete_url(&course.public_id))
                                       hx-target="main"
                                       hx-swap="innerHTML"
                                       hx-confirm="Delete this course and all its enrollments?"
                                       style="width:fit-content;padding:0.25rem 0.5rem;font-size:0.8rem;background-color:#dc3545;color:white;" {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn new_course(state: CourseFormState) -> Markup {
    let error_msg = match state {
        CourseFormState::NoError => None,
        CourseFormState::Invalid(msg) => Some(msg),
    };

    html! {
        p style="margin-bottom: 0.5rem; font-size: 0.9rem;" {
            a hx-get=(names::ADMIN_COURSES_URL)
              hx-push-url="true"
              hx-target="main"
              href="#" { "Back to courses" }
        }
        h1 { "New course" }
        @if let Some(msg) = error_msg {
            (components::error_banner(msg))
        }
        article style="width: fit-content;" {
            form hx-post=(names::NEW_ADMIN_COURSE_URL)
                 hx-target="main"
                 hx-disabled-elt="find input, find button, find textarea, find select"
                 hx-swap="innerHTML" {
                (course_fields(None))
                button type="submit" { "Create" }
            }
        }
    }
}

fn course_fields(existing: Option<&Course>) -> Markup {
    html! {
        label {
            "Title"
            input name="title"
                  type="text"
                  required="true"
                  value=[existing.map(|c| c.title.as_str())]
                  aria-label="Title";
        }
        label {
            "Description"
            textarea name="description"
                     rows="3"
                     aria-label="Description" {
                @if let Some(course) = existing { (course.description) }
            }
        }
        label {
            "Minimum tier"
            select name="min_tier" aria-label="Minimum tier" {
                @for tier in names::TIERS {
                    option value=(tier)
                           selected[existing.is_some_and(|c| c.min_tier == *tier)] {
                        (tier)
                    }
                }
            }
            small { "Partners at this tier and above see the course in their catalog." }
        }
        @if existing.is_some() {
            label {
                input name="published"
                      type="checkbox"
                      value="true"
                      checked[existing.is_some_and(|c| c.published)];
                "Published"
            }
        }
    }
}

pub struct EditorData<'a> {
    pub course: &'a Course,
    pub modules: Vec<(CourseModule, Vec<Lesson>)>,
}

pub fn editor(data: &EditorData, state: EditorState) -> Markup {
    let (course_error, thumbnail_error, module_error, lesson_error) = match state {
        EditorState::NoError => (None, None, None, None),
        EditorState::CourseInvalid(msg) => (Some(msg), None, None, None),
        EditorState::ThumbnailRejected(msg) => (None, Some(msg), None, None),
        EditorState::ModuleInvalid(msg) => (None, None, Some(msg), None),
        EditorState::LessonInvalid(msg) => (None, None, None, Some(msg)),
    };

    html! {
        p style="margin-bottom: 0.5rem; font-size: 0.9rem;" {
            a hx-get=(names::ADMIN_COURSES_URL)
              hx-push-url="true"
              hx-target="main"
              href="#" { "Back to courses" }
        }
        h1 { (data.course.title) }

        article style="width: fit-content;" {
            h4 { "Details" }
            @if let Some(msg) = course_error {
                (components::error_banner(msg))
            }
            form hx-post=(names::admin_course_url(&data.course.public_id))
                 hx-target="main"
                 hx-disabled-elt="find input, find button, find textarea, find select"
                 hx-swap="innerHTML" {
                (course_fields(Some(data.course)))
                button type="submit" { "Save" }
            }
        }

        article style="width: fit-content;" {
            h4 { "Thumbnail" }
            @if let Some(path) = &data.course.thumbnail_path {
                img src=(names::media_url(path))
                    alt=(data.course.title)
                    style="max-width: 240px; display: block; margin-bottom: 0.5rem;";
            }
            @if let Some(msg) = thumbnail_error {
                (components::error_banner(msg))
            }
            form hx-post=(names::admin_course_thumbnail_url(&data.course.public_id))
                 hx-encoding="multipart/form-data"
                 hx-target="main"
                 hx-disabled-elt="find input, find button"
                 hx-swap="innerHTML" {
                label {
                    "Image file"
                    input name="thumbnail"
                          type="file"
                          accept="image/*"
                          required="true"
                          aria-label="Image file";
                    small { "An image up to 5 MB." }
                }
                button type="submit" { "Upload" }
            }
        }

        h2 { "Modules" }
        @if let Some(msg) = lesson_error {
            (components::error_banner(msg))
        }
        @if data.modules.is_empty() {
            (components::empty_state("No modules yet. Add the first one below."))
        }
        @for (module, lessons) in &data.modules {
            article {
                div style="display: flex; align-items: center;" {
                    h4 style="margin-bottom: 0;" { (module.position + 1) ". " (module.title) }
                    span style="margin-left: auto;" {
                        button hx-post=(names::admin_module_delete_url(module.id))
                               hx-target="main"
                               hx-swap="innerHTML"
                               hx-confirm="Delete this module and its lessons?"
                               style="width:fit-content;padding:0.25rem 0.5rem;font-size:0.8rem;background-color:#dc3545;color:white;" {
                            "Delete module"
                        }
                    }
                }
                @if lessons.is_empty() {
                    p { small { em { "No lessons in this module." } } }
                } @else {
                    table {
                        thead { tr {
                            th { "Lesson" }
                            th { "Video" }
                            th { "Length" }
                            th { "" }
                        } }
                        tbody {
                            @for lesson in lessons {
                                tr {
                                    td { (lesson.title) }
                                    td { small { code { (lesson.video_url) } } }
                                    td { (utils::format_duration(lesson.duration_seconds)) }
                                    td {
                                        button hx-post=(names::admin_lesson_delete_url(lesson.id))
                                               hx-target="main"
                                               hx-swap="innerHTML"
                                               hx-confirm="Delete this lesson?"
                                               style="width:fit-content;padding:0.25rem 0.5rem;font-size:0.8rem;background-color:#dc3545;color:white;" {
                                            "Delete"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                details {
                    summary { "Add a lesson" }
                    form hx-post=(names::admin_module_lessons_url(module.id))
                         hx-target="main"
                         hx-disabled-elt="find input, find button, find textarea"
                         hx-swap="innerHTML" {
                        label {
                            "Title"
                            input name="title" type="text" required="true" aria-label="Lesson title";
                        }
                        label {
                            "Video URL"
                            input name="video_url"
                                  type="text"
                                  required="true"
                                  placeholder="https://video.example.com/intro.mp4"
                                  aria-label="Video URL";
                        }
                        label {
                            "Video length (seconds)"
                            input name="duration_seconds"
                                  type="number"
                                  min="1"
                                  required="true"
                                  aria-label="Video length in seconds";
                        }
                        label {
                            "Quiz questions (JSON, optional)"
                            textarea name="questions"
                                     rows="6"
                                     placeholder=(QUESTIONS_PLACEHOLDER)
                                     aria-label="Quiz questions" {}
                            small {
                                "A JSON array; each question needs a prompt, at least two "
                                "options, and the index of the correct one. Leave empty for "
                                "a video-only lesson."
                            }
                        }
                        button type="submit" { "Add lesson" }
                    }
                }
            }
        }

        article style="width: fit-content;" {
            h4 { "Add a module" }
            @if let Some(msg) = module_error {
                (components::error_banner(msg))
            }
            form hx-post=(names::admin_course_modules_url(&data.course.public_id))
                 hx-target="main"
                 hx-disabled-elt="find input, find button"
                 hx-swap="innerHTML" {
                label {
                    "Title"
                    input name="title" type="text" required="true" aria-label="Module title";
                }
                button type="submit" { "Add module" }
            }
        }
    }
}

const QUESTIONS_PLACEHOLDER: &str = r#"[{"prompt": "What does MDF stand for?", "options": ["Market Development Funds", "Managed Data Feed"], "correct_index": 0}]"#;
