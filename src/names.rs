pub const LOGIN_URL: &str = "/login";
pub const REGISTER_URL: &str = "/register";
pub const LOGOUT_URL: &str = "/logout";
pub const ACCOUNT_URL: &str = "/account";
pub const CHANGE_PASSWORD_URL: &str = "/change-password";
pub const UPDATE_PROFILE_URL: &str = "/account/profile";

pub const USER_SESSION_COOKIE_NAME: &str = "user_session";

pub const DEALS_URL: &str = "/deals";
pub const NEW_DEAL_URL: &str = "/deals/new";
pub const TICKETS_URL: &str = "/tickets";
pub const NEW_TICKET_URL: &str = "/tickets/new";
pub const KB_URL: &str = "/kb";
pub const MDF_URL: &str = "/mdf";
pub const NEW_MDF_URL: &str = "/mdf/new";
pub const TRAINING_URL: &str = "/training";
pub const MY_CERTIFICATES_URL: &str = "/training/certificates";

pub const ADMIN_URL: &str = "/admin";
pub const ADMIN_DEALS_URL: &str = "/admin/deals";
pub const ADMIN_TICKETS_URL: &str = "/admin/tickets";
pub const ADMIN_ARTICLES_URL: &str = "/admin/articles";
pub const NEW_ADMIN_ARTICLE_URL: &str = "/admin/articles/new";
pub const ADMIN_MDF_URL: &str = "/admin/mdf";
pub const ADMIN_PARTNERS_URL: &str = "/admin/partners";
pub const ADMIN_COURSES_URL: &str = "/admin/courses";
pub const NEW_ADMIN_COURSE_URL: &str = "/admin/courses/new";

pub fn deal_url(public_id: &str) -> String {
    format!("/deals/{public_id}")
}

pub fn ticket_url(public_id: &str) -> String {
    format!("/tickets/{public_id}")
}

pub fn ticket_reply_url(public_id: &str) -> String {
    format!("/tickets/{public_id}/reply")
}

pub fn ticket_close_url(public_id: &str) -> String {
    format!("/tickets/{public_id}/close")
}

pub fn article_url(slug: &str) -> String {
    format!("/kb/{slug}")
}

pub fn mdf_url(public_id: &str) -> String {
    format!("/mdf/{public_id}")
}

pub fn course_url(public_id: &str) -> String {
    format!("/training/{public_id}")
}

pub fn enroll_url(public_id: &str) -> String {
    format!("/training/{public_id}/enroll")
}

pub fn lesson_url(enrollment_id: i64, lesson_id: i64) -> String {
    format!("/learn/{enrollment_id}/lesson/{lesson_id}")
}

pub fn lesson_tick_url(enrollment_id: i64, lesson_id: i64) -> String {
    format!("/learn/{enrollment_id}/lesson/{lesson_id}/tick")
}

pub fn quiz_url(enrollment_id: i64, lesson_id: i64) -> String {
    format!("/learn/{enrollment_id}/lesson/{lesson_id}/quiz")
}

pub fn certificate_url(certificate_no: &str) -> String {
    format!("/certificates/{certificate_no}")
}

pub fn admin_deal_status_url(public_id: &str) -> String {
    format!("/admin/deals/{public_id}/status")
}

pub fn admin_ticket_url(public_id: &str) -> String {
    format!("/admin/tickets/{public_id}")
}

pub fn admin_ticket_reply_url(public_id: &str) -> String {
    format!("/admin/tickets/{public_id}/reply")
}

pub fn admin_ticket_close_url(public_id: &str) -> String {
    format!("/admin/tickets/{public_id}/close")
}

pub fn admin_partner_tier_url(org_id: i64) -> String {
    format!("/admin/partners/{org_id}/tier")
}

pub fn admin_article_url(id: i64) -> String {
    format!("/admin/articles/{id}")
}

pub fn admin_article_delete_url(id: i64) -> String {
    format!("/admin/articles/{id}/delete")
}

pub fn admin_mdf_decide_url(public_id: &str) -> String {
    format!("/admin/mdf/{public_id}/decide")
}

pub fn admin_course_url(public_id: &str) -> String {
    format!("/admin/courses/{public_id}")
}

pub fn admin_course_delete_url(public_id: &str) -> String {
    format!("/admin/courses/{public_id}/delete")
}

pub fn admin_course_thumbnail_url(public_id: &str) -> String {
    format!("/admin/courses/{public_id}/thumbnail")
}

pub fn admin_course_modules_url(public_id: &str) -> String {
    format!("/admin/courses/{public_id}/modules")
}

pub fn admin_module_lessons_url(module_id: i64) -> String {
    format!("/admin/modules/{module_id}/lessons")
}

pub fn admin_module_delete_url(module_id: i64) -> String {
    format!("/admin/modules/{module_id}/delete")
}

pub fn admin_lesson_delete_url(lesson_id: i64) -> String {
    format!("/admin/lessons/{lesson_id}/delete")
}

// Learning defaults
pub const VIDEO_COMPLETE_RATIO: f64 = 0.95;
pub const PASS_MARK: i32 = 70;
pub const TICK_INTERVAL_SECS: u32 = 15;

// Certificate numbers: CERT-<year>-<9 random alphanumeric chars>
pub const CERT_NUMBER_PREFIX: &str = "CERT";
pub const CERT_SUFFIX_LEN: usize = 9;
pub const CERT_MINT_ATTEMPTS: usize = 3;

// Uploads
pub const MAX_THUMBNAIL_BYTES: u64 = 5 * 1024 * 1024;
pub const MEDIA_URL: &str = "/media";

pub fn media_url(path: &str) -> String {
    format!("{MEDIA_URL}/{path}")
}

// Partner tiers, lowest first
pub const TIERS: &[&str] = &["bronze", "silver", "gold", "platinum"];

pub const DEAL_STAGES: &[&str] = &["prospecting", "negotiation", "closed_won", "closed_lost"];
pub const TICKET_PRIORITIES: &[&str] = &["low", "normal", "high"];
