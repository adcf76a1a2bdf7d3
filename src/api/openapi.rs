use super::handlers::{auth, events, health, ideas, me, students};
use utoipa::openapi::{InfoBuilder, OpenApiBuilder, Tag};
use utoipa_axum::{router::OpenApiRouter, routes};

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    // Reuse the same router wiring and only return the generated OpenAPI spec.
    let (_router, openapi) = api_router().split_for_parts();
    openapi
}

/// Build the router that also drives the `OpenAPI` document.
///
/// Add new endpoints here via `.routes(routes!(...))` so they are both served
/// and included in the generated `OpenAPI` spec.
/// Routes added outside (like `/` and `/openapi.json`) are intentionally not documented.
pub(crate) fn api_router() -> OpenApiRouter {
    let mut auth_tag = Tag::new("auth");
    auth_tag.description = Some("Login and current-identity endpoints".to_string());

    let mut portal_tag = Tag::new("portal");
    portal_tag.description = Some("Scope-filtered portal resources".to_string());

    let mut health_tag = Tag::new("health");
    health_tag.description = Some("Service liveness".to_string());

    let mut openapi = cargo_openapi();
    openapi.tags = Some(vec![auth_tag, portal_tag, health_tag]);

    // `routes!` reads #[utoipa::path] to bind HTTP method + path and add the route to OpenAPI.
    OpenApiRouter::with_openapi(openapi)
        .routes(routes!(health::health))
        .routes(routes!(auth::login::login))
        .routes(routes!(me::me))
        .routes(routes!(ideas::list_ideas, ideas::create_idea))
        .routes(routes!(ideas::get_idea))
        .routes(routes!(events::list_events, events::create_event))
        .routes(routes!(students::list_students))
}

fn cargo_openapi() -> utoipa::openapi::OpenApi {
    // Use Cargo.toml metadata instead of the utoipa-axum crate info defaults.
    let info = InfoBuilder::new()
        .title(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .description(Some(env!("CARGO_PKG_DESCRIPTION")))
        .build();

    OpenApiBuilder::new().info(info).build()
}
