use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct CookieAuthModifier;

impl Modify for CookieAuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "JWT token for current user",
                ))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::account::account_signup_handler,
        crate::web::routes::account::account_signin_handler,
        crate::web::routes::account::account_verify_handler,
        crate::web::routes::modules::modules_list_handler,
        crate::web::routes::modules::modules_create_handler,
        crate::web::routes::modules::modules_enroll_handler,
        crate::web::routes::modules::modules_unenroll_handler,
        crate::web::routes::stats::user_stats_handler,
        crate::web::routes::mentorship::sessions_list_handler,
        crate::web::routes::mentorship::sessions_request_handler,
        crate::web::routes::mentorship::sessions_cancel_handler,
    ),
    modifiers(&CookieAuthModifier),
)]
pub struct ApiDoc;
