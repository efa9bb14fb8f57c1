//! HTTP inbound adapter exposing the REST endpoints.

pub mod accounts;
pub mod auth;
pub mod error;
pub mod health;
pub mod linktrees;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub(crate) mod validation;

use actix_web::web;

pub use error::ApiResult;

use self::auth::RequireToken;
use self::state::HttpState;
use self::validation::malformed_body_error;

/// Register every account and linktree route on `cfg`.
///
/// Signup and login are public. Everything else is wrapped in
/// [`RequireToken`]; because the guarded scope matches every path, register
/// other public services (health probes, docs) before calling this.
///
/// ```ignore
/// App::new()
///     .service(ready)
///     .configure(|cfg| configure(cfg, &state));
/// ```
pub fn configure(cfg: &mut web::ServiceConfig, state: &web::Data<HttpState>) {
    let tokens = state.tokens.clone();
    cfg.app_data(state.clone())
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| malformed_body_error(err).into()),
        )
        .service(accounts::signup)
        .service(accounts::login)
        .service(
            web::scope("")
                .wrap(RequireToken::new(tokens))
                .service(linktrees::list_linktrees)
                .service(linktrees::create_linktree)
                .service(linktrees::add_link)
                .service(linktrees::update_link)
                .service(linktrees::delete_link)
                .service(linktrees::set_bio)
                .service(linktrees::set_fullname)
                .service(linktrees::get_linktree),
        );
}
