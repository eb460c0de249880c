pub mod access_requests;
pub mod admin;
pub mod auth;
pub mod datasets;
pub mod health;
pub mod settings;
pub mod showcases;
pub mod tags;
pub mod uploads;

use actix_web::web;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(health::health_check)
            .configure(auth::auth_routes)
            .configure(datasets::datasets_routes)
            .configure(tags::tags_routes)
            .configure(showcases::showcases_routes)
            .configure(settings::settings_routes)
            .configure(access_requests::access_requests_routes)
            .configure(uploads::uploads_routes)
            .configure(admin::admin_routes)
    );
}
