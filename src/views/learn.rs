use crate::{
    db::models::{CatalogEntry, Certificate, Course, Enrollment, OutlineLesson, QuizAttempt},
    names, utils,
    views::components,
};
use maud::{html, Markup, PreEscaped};

pub fn catalog(entries: &[CatalogEntry]) -> Markup {
    html! {
        h1 { "Training" }
        p {
            a hx-get=(names::MY_CERTIFICATES_URL)
              hx-push-url="true"
              hx-target="main"
              href="#" { "My certificates" }
        }
        @if entries.is_empty() {
            (components::empty_state("No courses are available for your tier yet."))
        } @else {
            div class="course-grid" {
                @for entry in entries {
                    article class="course-card" {
                        @if let Some(path) = &entry.thumbnail_path {
                            img src=(names::media_url(path)) alt=(entry.title) class="course-thumb";
                        }
                        h3 { (entry.title) }
                        p { small { (entry.description) } }
                        @if entry.completed_at.is_some() {
                            p { span class="badge" data-status="approved" { "Completed" } }
                            @if let Some(number) = &entry.certificate_no {
                                a href=(names::certificate_url(number)) target="_blank" {
                                    "View certificate"
                                }
                            }
                        } @else if entry.enrollment_id.is_some() {
                            button hx-get=(names::course_url(&entry.public_id))
                                   hx-push-url="true"
                                   hx-target="main"
                                   hx-swap="innerHTML"
                                   class="card-actions"
                                   style="width: fit-content;" {
                                "Continue"
                            }
                        } @else {
                            button hx-post=(names::enroll_url(&entry.public_id))
                                   hx-target="main"
                                   hx-swap="innerHTML"
                                   class="card-actions"
                                   style="width: fit-content;" {
                                "Enroll"
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn course(course: &Course, enrollment: Option<&Enrollment>, outline: &[OutlineLesson]) -> Markup {
    let mut modules: Vec<(i64, &str, Vec<&OutlineLesson>)> = Vec::new();
    for row in outline {
        match modules.last_mut() {
            Some((id, _, lessons)) if *id == row.module_id => lessons.push(row),
            _ => modules.push((row.module_id, row.module_title.as_str(), vec![row])),
        }
    }
    let total_seconds: i32 = outline.iter().map(|l| l.duration_seconds).sum();
    let completed_count = outline
        .iter()
        .filter(|l| l.completed.unwrap_or(false))
        .count();

    html! {
        p style="margin-bottom: 0.5rem; font-size: 0.9rem;" {
            a hx-get=(names::TRAINING_URL)
              hx-push-url="true"
              hx-target="main"
              href="#" { "Back to training" }
        }
        h1 { (course.title) }
        p { (course.description) }
        @if enrollment.is_some() {
            p style="color: #666; font-size: 0.9rem;" {
                (outline.len()) " lessons, "
                (utils::format_duration(total_seconds))
                " of video, " (completed_count) " completed."
            }
        } @else {
            p style="color: #666; font-size: 0.9rem;" {
                (outline.len()) " lessons, "
                (utils::format_duration(total_seconds)) " of video."
            }
            button hx-post=(names::enroll_url(&course.public_id))
                   hx-target="main"
                   hx-swap="innerHTML"
                   style="width: fit-content;" {
                "Enroll"
            }
        }

        @if enrollment.is_some_and(|e| e.completed_at.is_some()) {
            article style="background-color: #d4edda; border: 2px solid #28a745; padding: 1rem; border-radius: 8px;" {
                h4 { "Course complete" }
                @if let Some(number) = enrollment.and_then(|e| e.certificate_no.as_ref()) {
                    p {
                        "Your certificate number is " mark { (number) } "."
                    }
                    a href=(names::certificate_url(number)) target="_blank" { "View certificate" }
                }
            }
        }

        @if modules.is_empty() {
            (components::empty_state("This course has no lessons yet."))
        }
        @for (_, title, lessons) in &modules {
            article {
                h4 { (title) }
                table {
                    thead { tr {
                        th { "Lesson" }
                        th { "Video" }
                        th { "Quiz" }
                        th { "Status" }
                        th { "" }
                    } }
                    tbody {
                        @for lesson in lessons {
                            tr {
                                td { (lesson.lesson_title) }
                                td { (utils::format_duration(lesson.duration_seconds)) }
                                td {
                                    @if lesson.question_count > 0 {
                                        (lesson.question_count) " questions"
                                    } @else {
                                        "-"
                                    }
                                }
                                td { (lesson_status(lesson)) }
                                td {
                                    @if let Some(enrollment) = enrollment {
                                        a hx-get=(names::lesson_url(enrollment.id, lesson.lesson_id))
                                          hx-push-url="true"
                                          hx-target="main"
                                          href="#" { "Open" }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn lesson_status(lesson: &OutlineLesson) -> Markup {
    html! {
        @if lesson.completed.unwrap_or(false) {
            @if let Some(score) = lesson.best_score {
                span style="color: #28a745; font-weight: 500;" { "Passed (" (score) "%)" }
            } @else {
                span style="color: #28a745; font-weight: 500;" { "Completed" }
            }
        } @else if lesson.watch_seconds.unwrap_or(0) > 0 {
            span style="color: #6c757d; font-weight: 500;" {
                "In progress"
                @if let Some(score) = lesson.best_score {
                    " (best " (score) "%)"
                }
            }
        } @else {
            span style="color: #6c757d;" { "Not started" }
        }
    }
}

pub struct LessonPageData {
    pub enrollment_id: i64,
    pub course_public_id: String,
    pub course_title: String,
    pub lesson_id: i64,
    pub lesson_title: String,
    pub video_url: String,
    pub duration_seconds: i32,
    pub watch_seconds: i32,
    pub completed: bool,
    pub question_count: i64,
}

pub fn lesson(data: &LessonPageData) -> Markup {
    let video_complete = data.completed
        || data.watch_seconds as f64
            >= data.duration_seconds as f64 * names::VIDEO_COMPLETE_RATIO;

    html! {
        p style="margin-bottom: 0.5rem; font-size: 0.9rem;" {
            a hx-get=(names::course_url(&data.course_public_id))
              hx-push-url="true"
              hx-target="main"
              href="#" { "Back to " (data.course_title) }
        }
        h1 { (data.lesson_title) }

        video id="lesson-video"
              controls
              preload="metadata"
              style="width: 100%; max-width: 720px; background-color: #000;"
              src=(data.video_url) {}

        p style="color: #666; font-size: 0.9rem;" {
            "Watched " (utils::format_duration(data.watch_seconds))
            " of " (utils::format_duration(data.duration_seconds)) "."
        }

        @if data.completed {
            article style="width: fit-content; background-color: #d4edda; border: 2px solid #28a745; padding: 1rem; border-radius: 8px;" {
                p style="margin-bottom: 0;" { "Lesson complete." }
            }
        } @else if data.question_count > 0 {
            @if video_complete {
                article style="width: fit-content;" {
                    p {
                        "Score at least " (names::PASS_MARK) "% on the quiz to complete this lesson."
                    }
                    button hx-get=(names::quiz_url(data.enrollment_id, data.lesson_id))
                           hx-push-url="true"
                           hx-target="main"
                           style="width: fit-content;" {
                        "Take the quiz"
                    }
                }
            } @else {
                p { "Finish the video to unlock the quiz." }
            }
        } @else {
            p { "The lesson completes when you finish the video." }
        }

        @if !data.completed {
            (tick_script(data.enrollment_id, data.lesson_id))
        }
    }
}

/// Reports playback every few seconds while the video runs, and once more on the
/// `ended` event. Any state change reloads the page so the unlock or completion
/// shows up without the viewer doing anything. The timer is bound to the video
/// element's lifetime and cancels itself once a swap removes it from the page.
fn tick_script(enrollment_id: i64, lesson_id: i64) -> Markup {
    let tick_url = names::lesson_tick_url(enrollment_id, lesson_id);
    let page_url = names::lesson_url(enrollment_id, lesson_id);
    let interval_ms = names::TICK_INTERVAL_SECS * 1000;
    let script = format!(
        r#"(function(){{
var v=document.getElementById('lesson-video');
if(!v||v.dataset.tickBound)return;
v.dataset.tickBound='1';
var timer=null,stopped=false;
function report(ended){{
if(stopped)return;
var seconds=Math.floor(v.currentTime);
fetch('{tick_url}',{{method:'POST',headers:{{'Content-Type':'application/json','HX-Request':'true'}},body:JSON.stringify({{seconds:seconds,ended:ended}})}})
.then(function(r){{return r.json();}})
.then(function(p){{if(p.state!=='recorded'){{stopped=true;if(timer)clearInterval(timer);htmx.ajax('GET','{page_url}',{{target:'main',swap:'innerHTML'}});}}}})
.catch(function(){{}});
}}
timer=setInterval(function(){{
if(!document.body.contains(v)){{clearInterval(timer);return;}}
if(!v.paused&&!v.ended)report(false);
}},{interval_ms});
v.addEventListener('ended',function(){{report(true);}});
}})()"#
    );
    html! {
        (PreEscaped(format!("<script>{script}</script>")))
    }
}

pub enum QuizFormState {
    NoError,
    Incomplete,
}

pub struct QuizPrompt {
    pub question_id: i64,
    pub prompt: String,
    pub options: Vec<String>,
}

pub struct QuizPageData {
    pub enrollment_id: i64,
    pub lesson_id: i64,
    pub lesson_title: String,
    pub questions: Vec<QuizPrompt>,
    pub attempts: Vec<QuizAttempt>,
}

pub fn quiz(data: &QuizPageData, state: QuizFormState) -> Markup {
    let error_msg = match state {
        QuizFormState::NoError => None,
        QuizFormState::Incomplete => Some("Please answer every question."),
    };

    html! {
        p style="margin-bottom: 0.5rem; font-size: 0.9rem;" {
            a hx-get=(names::lesson_url(data.enrollment_id, data.lesson_id))
              hx-push-url="true"
              hx-target="main"
              href="#" { "Back to lesson" }
        }
        h1 { "Quiz: " (data.lesson_title) }
        p {
            (data.questions.len()) " questions. Score at least "
            (names::PASS_MARK) "% to pass."
        }

        @if let Some(msg) = error_msg {
            (components::error_banner(msg))
        }

        article style="width: fit-content;" {
            form hx-post=(names::quiz_url(data.enrollment_id, data.lesson_id))
                 hx-ext="json-enc"
                 hx-target="main"
                 hx-disabled-elt="find input, find button"
                 hx-swap="innerHTML" {
                @for (idx, question) in data.questions.iter().enumerate() {
                    fieldset {
                        legend {
                            strong { (idx + 1) ". " (question.prompt) }
                        }
                        @for (opt_idx, option) in question.options.iter().enumerate() {
                            label {
                                input type="radio"
                                      name=(format!("q{}", question.question_id))
                                      value=(opt_idx)
                                      required;
                                (option)
                            }
                        }
                    }
                }
                button type="submit" { "Submit answers" }
            }
        }

        @if !data.attempts.is_empty() {
            article {
                h4 { "Previous attempts" }
                table {
                    thead { tr {
                        th { "Attempt" }
                        th { "Score" }
                        th { "Result" }
                        th { "Submitted" }
                    } }
                    tbody {
                        @for attempt in &data.attempts {
                            tr {
                                td { (attempt.attempt_number) }
                                td { (attempt.score) "%" }
                                td {
                                    @if attempt.passed {
                                        span style="color: #28a745; font-weight: 500;" { "Passed" }
                                    } @else {
                                        span style="color: #dc3545; font-weight: 500;" { "Failed" }
                                    }
                                }
                                td { (components::datetime(attempt.submitted_at)) }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub struct QuizResultData {
    pub enrollment_id: i64,
    pub lesson_id: i64,
    pub lesson_title: String,
    pub course_public_id: String,
    pub score: i32,
    pub passed: bool,
    pub attempt_number: i32,
    pub certificate: Option<String>,
}

pub fn quiz_result(data: &QuizResultData) -> Markup {
    html! {
        h1 { "Quiz: " (data.lesson_title) }

        @if data.passed {
            article style="background-color: #d4edda; border: 2px solid #28a745; padding: 1rem; border-radius: 8px;" {
                h4 { "Passed" }
                p {
                    "You scored " mark { (data.score) "%" }
                    " on attempt " (data.attempt_number) ". The lesson is complete."
                }
            }
            @if let Some(number) = &data.certificate {
                article style="width: fit-content;" {
                    h4 { "Course complete" }
                    p { "Your certificate number is " mark { (number) } "." }
                    a href=(names::certificate_url(number)) target="_blank" { "View certificate" }
                }
            }
            div style="margin-top: 1rem;" {
                button hx-get=(names::course_url(&data.course_public_id))
                       hx-push-url="true"
                       hx-target="main"
                       style="width: fit-content;" {
                    "Back to course"
                }
            }
        } @else {
            article style="background-color: #fff3cd; border: 2px solid #f0ad4e; padding: 1rem; border-radius: 8px;" {
                h4 { "Not quite" }
                p {
                    "You scored " mark { (data.score) "%" }
                    " on attempt " (data.attempt_number) ", below the "
                    (names::PASS_MARK) "% pass mark."
                }
            }
            div style="display: flex; gap: 1rem; margin-top: 1rem;" {
                button hx-get=(names::quiz_url(data.enrollment_id, data.lesson_id))
                       hx-target="main"
                       style="width: fit-content;" {
                    "Try again"
                }
                button hx-get=(names::lesson_url(data.enrollment_id, data.lesson_id))
                       hx-push-url="true"
                       hx-target="main"
                       class="secondary"
                       style="width: fit-content;" {
                    "Rewatch the video"
                }
            }
        }
    }
}

pub fn certificates(certs: &[Certificate]) -> Markup {
    html! {
        p style="margin-bottom: 0.5rem; font-size: 0.9rem;" {
            a hx-get=(names::TRAINING_URL)
              hx-push-url="true"
              hx-target="main"
              href="#" { "Back to training" }
        }
        h1 { "My certificates" }
        @if certs.is_empty() {
            (components::empty_state("Complete a course to earn your first certificate."))
        } @else {
            table {
                thead { tr {
                    th { "Number" }
                    th { "Course" }
                    th { "Completed" }
                    th { "" }
                } }
                tbody {
                    @for cert in certs {
                        tr {
                            td { code { (cert.certificate_no) } }
                            td { (cert.course_title) }
                            td { (components::date(cert.completed_on)) }
                            td {
                                a href=(names::certificate_url(&cert.certificate_no)) target="_blank" {
                                    "View"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
