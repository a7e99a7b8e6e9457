mod config;
mod database;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod service;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;

use crate::db::stage_db;
use crate::middleware::RequestLogger;
use crate::models::session::DisplayTimezone;
use crate::routes as app_routes;
use crate::service::code::CodeGenerator;
use crate::service::qr::QrEncoder;
use rocket::{Build, Rocket, catchers, http::Method};
use rocket_cors::{AllowedOrigins, CorsOptions};
use rocket_okapi::swagger_ui::{SwaggerUIConfig, make_swagger_ui};
use rocket_okapi::{get_openapi_route, okapi::merge::marge_spec_list};
use tracing_subscriber::EnvFilter;

fn init_tracing(log_level: &str, json_format: bool) {
    // RUST_LOG takes precedence over the configured level, e.g.
    //   RUST_LOG=roll_call::service=debug,info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).with_target(true).with_line_number(true);

    // A subscriber may already be installed when several rockets are built in one process.
    let _ = if json_format {
        subscriber.json().try_init()
    } else {
        subscriber.try_init()
    };
}

fn build_cors(cors_config: &config::CorsConfig) -> CorsOptions {
    let is_wildcard = cors_config.allowed_origins.len() == 1 && cors_config.allowed_origins[0] == "*";

    if is_wildcard && cors_config.allow_credentials {
        panic!(
            "Invalid CORS configuration: Cannot use wildcard origins (*) with credentials enabled. \
            Either set specific origins or disable credentials."
        );
    }

    let allowed_origins = if cors_config.allowed_origins.is_empty() {
        AllowedOrigins::some_exact::<&str>(&[])
    } else if is_wildcard {
        AllowedOrigins::all()
    } else {
        AllowedOrigins::some_exact(&cors_config.allowed_origins.iter().map(String::as_str).collect::<Vec<_>>())
    };

    CorsOptions {
        allowed_origins,
        allowed_methods: vec![Method::Get, Method::Post, Method::Options, Method::Head]
            .into_iter()
            .map(From::from)
            .collect(),
        allowed_headers: rocket_cors::AllowedHeaders::some(&["Content-Type", "Accept"]),
        allow_credentials: cors_config.allow_credentials,
        ..Default::default()
    }
}

fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return config::DEFAULT_API_BASE_PATH.to_string();
    }

    let mut normalized = if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    };

    while normalized.ends_with('/') && normalized.len() > 1 {
        normalized.pop();
    }

    normalized
}

fn join_base_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let suffix = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", suffix)
    } else {
        format!("{}/{}", base, suffix)
    }
}

fn collect_route_specs() -> Vec<(Vec<rocket::Route>, okapi::openapi3::OpenApi)> {
    vec![app_routes::session::routes(), app_routes::attendance::routes(), app_routes::health::routes()]
}

fn mount_api_routes(mut rocket: Rocket<Build>, base_path: &str, enable_swagger: bool) -> Rocket<Build> {
    let mut openapi_list = Vec::new();
    for (routes, openapi) in collect_route_specs() {
        rocket = rocket.mount(base_path, routes);
        openapi_list.push(("", openapi));
    }

    if enable_swagger {
        let openapi_docs = match marge_spec_list(&openapi_list) {
            Ok(docs) => docs,
            Err(err) => panic!("Could not merge OpenAPI spec: {}", err),
        };

        let settings = rocket_okapi::settings::OpenApiSettings::default();
        rocket = rocket.mount(base_path, vec![get_openapi_route(openapi_docs, &settings)]);

        let openapi_url = join_base_path(base_path, "openapi.json");
        rocket = rocket.mount(
            join_base_path(base_path, "docs"),
            make_swagger_ui(&SwaggerUIConfig {
                url: openapi_url,
                ..Default::default()
            }),
        );
    }

    rocket
}

fn server_figment(server: &config::ServerConfig) -> rocket::figment::Figment {
    rocket::Config::figment()
        .merge(("address", server.address.clone()))
        .merge(("port", server.port))
}

pub fn build_rocket(config: Config) -> Rocket<Build> {
    init_tracing(&config.logging.level, config.logging.json_format);

    let cors = build_cors(&config.cors).to_cors().expect("Failed to create CORS fairing");
    let base_path = normalize_base_path(&config.api.base_path);

    tracing::info!(
        base_path = %base_path,
        validity_minutes = config.session.validity_minutes,
        display_timezone = %config.session.display_timezone,
        "starting attendance service"
    );

    let rocket = rocket::custom(server_figment(&config.server))
        .attach(cors)
        .attach(RequestLogger)
        .attach(stage_db(config.database))
        .manage(CodeGenerator::system(config.session.validity()))
        .manage(QrEncoder::new(config.session.qr_min_dimension))
        .manage(DisplayTimezone(config.session.display_timezone));

    mount_api_routes(rocket, &base_path, config.api.enable_swagger).register(
        "/",
        catchers![
            app_routes::error::bad_request,
            app_routes::error::not_found,
            app_routes::error::payload_too_large,
            app_routes::error::unprocessable_entity,
            app_routes::error::internal_error,
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(normalize_base_path(""), "/api");
        assert_eq!(normalize_base_path("api/"), "/api");
        assert_eq!(normalize_base_path(" /v1/attendance// "), "/v1/attendance");
        assert_eq!(normalize_base_path("/"), "/");
    }

    #[test]
    fn joined_paths_have_single_slashes() {
        assert_eq!(join_base_path("/api", "docs"), "/api/docs");
        assert_eq!(join_base_path("/", "openapi.json"), "/openapi.json");
    }

    #[test]
    #[should_panic(expected = "Invalid CORS configuration")]
    fn wildcard_cors_with_credentials_is_rejected() {
        build_cors(&config::CorsConfig {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: true,
        });
    }

    #[test]
    fn every_endpoint_is_mounted() {
        let paths: Vec<String> = collect_route_specs()
            .into_iter()
            .flat_map(|(routes, _)| routes.into_iter().map(|route| format!("{} {}", route.method, route.uri)))
            .collect();

        for expected in ["POST /sessions", "POST /sessions/<id>/refresh", "GET /sessions/<id>/attendance", "POST /attendance", "GET /health"] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected} in {paths:?}");
        }
    }
}
