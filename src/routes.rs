use crate::{
    api::attendance,
    config::Config,
    error::{ApiError, ReportError},
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

// Helper to build per-scope limiter
fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .unwrap();
    Governor::new(&cfg)
}

/// Malformed bodies become a 400 in the `{success: false}` envelope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::validation(err.to_string()).into())
}

/// Same as [`json_config`] but in the `{status: "error"}` report envelope.
pub fn report_json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ReportError(ApiError::validation(err.to_string())).into())
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    let limiter = build_limiter(config.rate_protected_per_min);

    cfg.app_data(json_config());

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::create_attendance)),
                    )
                    // /attendance/find
                    .service(
                        web::resource("/find").route(web::post().to(attendance::find_attendance)),
                    )
                    // /attendance/summary
                    .service(
                        web::resource("/summary")
                            .route(web::get().to(attendance::attendance_summary)),
                    )
                    // /attendance/analysis
                    .service(
                        web::resource("/analysis")
                            .app_data(report_json_config())
                            .route(web::post().to(attendance::attendance_analysis)),
                    )
                    // /attendance/history/{user_id}
                    .service(
                        web::resource("/history/{user_id}")
                            .route(web::get().to(attendance::attendance_history)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance)),
                    ),
            ),
    );
}
