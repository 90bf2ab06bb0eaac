//! OpenAPI document for the REST surface.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{EventFailureDto, SweepResponse};
use super::handlers::{sweep, system};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI specification.
#[derive(Debug, OpenApi)]
#[openapi(
    paths(
        sweep::run_sweep,
        system::health_handler,
        system::sweep_settings_handler,
    ),
    components(schemas(SweepResponse, EventFailureDto, ErrorResponse, ErrorBody)),
    modifiers(&BearerSecurity),
    tags(
        (name = "Admin", description = "Administrative sweep trigger"),
        (name = "System", description = "Health and configuration"),
    )
)]
pub struct ApiDoc;

struct BearerSecurity;

impl Modify for BearerSecurity {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_admin_path() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/admin/sweep"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
