use crate::{
    api::{checkin, history, roster, settings},
    auth::{handlers, middleware::session_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap()
    }

    let login_limiter = build_limiter(config.rate_login_per_min);
    let register_limiter = build_limiter(config.rate_register_per_min);
    let protected_limiter = build_limiter(config.rate_protected_per_min);

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(Governor::new(&register_limiter))
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/logout")
                    .wrap(Governor::new(&login_limiter))
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(session_middleware))
            // session resolution
            .wrap(Governor::new(&protected_limiter)) // rate limiting
            .service(web::resource("/me").route(web::get().to(handlers::me)))
            .service(
                web::resource("/location").route(web::post().to(checkin::report_location)),
            )
            .service(
                web::scope("/checkin")
                    // /checkin
                    .service(web::resource("").route(web::post().to(checkin::check_in)))
                    // /checkin/status
                    .service(web::resource("/status").route(web::get().to(checkin::status))),
            )
            .service(web::resource("/history").route(web::get().to(history::my_history)))
            .service(web::resource("/roster").route(web::get().to(roster::today_roster)))
            .service(
                web::scope("/settings")
                    // /settings/reference
                    .service(
                        web::resource("/reference")
                            .route(web::get().to(settings::get_reference))
                            .route(web::put().to(settings::set_reference)),
                    ),
            ),
    );
}
