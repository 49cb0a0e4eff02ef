use crate::auth::auth::AuthUser;
use crate::store::identity::IdentityStore;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;

/// Resolves the persisted session pointer into an `AuthUser` for every
/// protected request; requests without a session never reach a handler.
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let identity = req
        .app_data::<Data<IdentityStore>>()
        .ok_or_else(|| actix_web::error::ErrorInternalServerError("Identity store missing"))?;

    match identity.current_session() {
        Some(user) => {
            req.extensions_mut().insert(AuthUser {
                name: user.name,
                role: user.role,
            });
            next.call(req).await
        }
        None => {
            let resp = HttpResponse::Unauthorized().json(json!({"error": "Not signed in"}));
            Ok(req.into_response(resp.map_into_boxed_body()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::role::Role;
    use crate::storage::{SlotFile, test_support::ScratchDir};
    use actix_web::{App, middleware::from_fn, test, web};
    use std::sync::Arc;

    async fn whoami(auth: AuthUser) -> String {
        auth.name
    }

    #[actix_web::test]
    async fn session_gates_protected_routes() {
        let scratch = ScratchDir::new();
        let identity = Arc::new(
            IdentityStore::open(
                SlotFile::new(&scratch.0, "users.json"),
                SlotFile::new(&scratch.0, "session.json"),
            )
            .unwrap(),
        );
        let app = test::init_service(
            App::new().app_data(Data::from(identity.clone())).service(
                web::scope("/api")
                    .wrap(from_fn(session_middleware))
                    .route("/me", web::get().to(whoami)),
            ),
        )
        .await;

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/me").to_request()).await;
        assert_eq!(resp.status(), 401);

        // Registering signs the caller in; the same request now passes.
        identity.register("Alice", "secret", Role::Employee).unwrap();
        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/me").to_request()).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(test::read_body(resp).await, "Alice");
    }
}
