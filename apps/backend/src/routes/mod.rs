use actix_web::web;

pub mod health;
pub mod rpc;

/// Configure unprotected application routes.
///
/// In production, `main.rs` wires the RPC surface under `/api/rpc` with the
/// JwtExtract middleware. Tests register the same paths without those
/// wrappers so endpoint behavior can be exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check routes: /health
    cfg.service(web::scope("/health").configure(health::configure_routes));
}
