// Route exports
pub mod analysis;
pub mod page;

use actix_web::web;

pub use analysis::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(page::index)).service(
        web::scope("/api/v1")
            .configure(analysis::configure),
    );
}
