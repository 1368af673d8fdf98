use crate::{api::balance, auth::middleware::auth_middleware, config::Config};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

// Builds a per-scope limiter; 0 means one request per millisecond.
fn build_limiter(requests_per_min: u32) -> Option<Governor<PeerIpKeyExtractor, NoOpMiddleware>> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        60_000 / requests_per_min as u64
    };
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()?;
    Some(Governor::new(&cfg))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    let balance_routes = web::scope("/v1")
        .service(
            web::scope("/balance")
                // /v1/balance
                .service(web::resource("").route(web::get().to(balance::my_balances)))
                // /v1/balance/aggregate
                .service(web::resource("/aggregate").route(web::get().to(balance::my_aggregate))),
        )
        .service(
            web::scope("/employee/{employee_id}")
                // /v1/employee/{id}/balance
                .service(web::resource("/balance").route(web::get().to(balance::employee_balances)))
                // /v1/employee/{id}/balance/aggregate
                .service(
                    web::resource("/balance/aggregate")
                        .route(web::get().to(balance::employee_aggregate)),
                )
                // /v1/employee/{id}/leave-variants
                .service(
                    web::resource("/leave-variants")
                        .route(web::get().to(balance::assigned_variants)),
                ),
        );

    // Protected routes
    match build_limiter(config.rate_protected_per_min) {
        Some(limiter) => cfg.service(
            web::scope(&config.api_prefix)
                .wrap(from_fn(auth_middleware)) // authentication
                .wrap(limiter) // rate limiting
                .service(balance_routes),
        ),
        None => {
            tracing::warn!("Rate limiter configuration rejected; serving without rate limiting");
            cfg.service(
                web::scope(&config.api_prefix)
                    .wrap(from_fn(auth_middleware))
                    .service(balance_routes),
            )
        }
    };
}
