use axum::{Json, Router, extract::State, routing::get};
use serde_json::{Value, json};

use crate::{
    errors::Result,
    routes::{api_route::api_router, auth_route::auth_router},
    state::AppState,
};

pub mod api_route;
pub mod auth_route;

pub async fn health(State(state): State<AppState>) -> Result<Json<Value>> {
    state.sdb.health().await?;
    Ok(Json(json!({ "status": "ok" })))
}

pub fn app(state: AppState) -> Result<Router> {
    Ok(Router::new()
        .route("/health", get(health))
        .merge(auth_router(state.clone())?)
        .nest("/api", api_router(state.clone()))
        .with_state(state))
}

#[cfg(test)]
mod tests {
    use std::{
        net::SocketAddr,
        sync::{Arc, atomic::Ordering},
    };

    use axum::{
        body::{Body, to_bytes},
        extract::ConnectInfo,
        http::{Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{
        models::status::FakturaStatus,
        services::sync::tests::CountingOrchestrator,
        test_utils::{
            ADMINS, CASEWORKERS, JWT_SECRET, record, seed, test_config, test_state,
            test_state_with,
        },
        utils::jwt::{Claims, encode_jwt},
    };

    fn token(groups: &[&str]) -> String {
        let claims = Claims {
            email: "sag@kommune.dk".into(),
            name: "Sag Behandler".into(),
            groups: groups.iter().map(|g| g.to_string()).collect(),
            exp: chrono::Utc::now().timestamp() as usize + 600,
        };
        encode_jwt(&claims, JWT_SECRET).unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    /// Signs in through the token endpoint and returns the cookie pair.
    async fn login(app: &Router, groups: &[&str]) -> String {
        let response = app
            .clone()
            .oneshot(
                Request::get(format!(
                    "/login/token?jwt={}&next=/faktureret",
                    token(groups)
                ))
                .header("x-forwarded-for", "10.0.0.1")
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/faktureret");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.contains("HttpOnly"));
        cookie.split(';').next().unwrap().to_string()
    }

    fn get(uri: &str, cookie: &str) -> Request<Body> {
        Request::get(uri)
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .unwrap()
    }

    fn post_json(uri: &str, cookie: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::COOKIE, cookie)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn api_requires_a_session() {
        let app = app(test_state().await).unwrap();
        let response = app
            .oneshot(Request::get("/api/me").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0], "Du er ikke logget ind.");
    }

    #[tokio::test]
    async fn bad_token_is_unauthorized() {
        let app = app(test_state().await).unwrap();
        let response = app
            .oneshot(
                Request::get("/login/token?jwt=not-a-token")
                    .header("x-forwarded-for", "10.0.0.1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_then_me_then_logout() {
        let app = app(test_state().await).unwrap();
        let cookie = login(&app, &[CASEWORKERS]).await;

        let response = app.clone().oneshot(get("/api/me", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let me = body_json(response).await;
        assert_eq!(me["email"], "sag@kommune.dk");
        assert_eq!(me["roles"], json!(["Sagsbehandler"]));

        let response = app.clone().oneshot(get("/logout", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let response = app.oneshot(get("/api/me", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn transitions_through_the_api() {
        let state = test_state().await;
        seed(&state.sdb, record(1, FakturaStatus::Ny)).await;
        let app = app(state).unwrap();
        let cookie = login(&app, &[CASEWORKERS]).await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/fakturering/1/handling",
                &cookie,
                json!({ "intent": "undo" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/fakturering/1/handling",
                &cookie,
                json!({ "intent": "send-to-billing" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["row"]["faktura_status"], "Afsendt");

        let response = app
            .clone()
            .oneshot(get("/api/views/til-fakturering", &cookie))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["rows"][0]["startdato"], "01-01-2024");

        let response = app
            .oneshot(get("/api/fakturering/1/log", &cookie))
            .await
            .unwrap();
        let log = body_json(response).await;
        assert_eq!(log.as_array().unwrap().len(), 1);
        assert_eq!(log[0]["handling"], "SendTilFakturering");
    }

    #[tokio::test]
    async fn edits_are_validated_and_gated() {
        let state = test_state().await;
        seed(&state.sdb, record(1, FakturaStatus::Ny)).await;
        let app = app(state).unwrap();

        let nobody = login(&app, &[]).await;
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/fakturering/1",
                &nobody,
                json!({ "meter": "3", "startdato": "01-01-2024", "slutdato": "02-01-2024" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await["errors"][0],
            "Du har ikke adgang til denne handling. Kræver rollen Sagsbehandler."
        );

        let cookie = login(&app, &[CASEWORKERS]).await;
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/fakturering/1",
                &cookie,
                json!({ "meter": "tre", "startdato": "1/1/2024", "slutdato": "02-01-2024" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["errors"].as_array().unwrap().len(), 2);

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/fakturering/1",
                &cookie,
                json!({ "meter": "3,5", "startdato": "2024-01-01", "slutdato": "02-01-2024" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["row"]["meter"], "3,5");
        assert_eq!(body["row"]["antal_dage"], 2);
        assert_eq!(body["row"]["total_pris"], "70");

        let response = app
            .oneshot(get("/api/fakturering/404", &cookie))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sync_trigger_needs_admin_and_waits_for_cooldown() {
        let orchestrator = Arc::new(CountingOrchestrator::default());
        let state = test_state_with(test_config(), orchestrator.clone()).await;
        let app = app(state).unwrap();

        let caseworker = login(&app, &[CASEWORKERS]).await;
        let response = app
            .clone()
            .oneshot(post_json("/api/sync/trigger", &caseworker, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin = login(&app, &[ADMINS]).await;
        let response = app
            .clone()
            .oneshot(post_json("/api/sync/trigger", &admin, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(post_json("/api/sync/trigger", &admin, json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let message = body_json(response).await["errors"][0].as_str().unwrap().to_string();
        assert!(message.starts_with("Synkroniseringen blev startet for nylig. Prøv igen om "));
        assert_eq!(orchestrator.calls.load(Ordering::SeqCst), 1);

        let response = app.oneshot(get("/api/sync/status", &admin)).await.unwrap();
        let status = body_json(response).await;
        assert!(status["sidst_startet"].is_string());
        assert!(status["ventetid_sekunder"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn dev_bypass_only_from_loopback() {
        let config = crate::config::AppConfig {
            local_dev_bypass: true,
            ..test_config()
        };
        let state = test_state_with(config, Arc::new(CountingOrchestrator::default())).await;
        let app = app(state).unwrap();

        let mut local = Request::get("/api/me").body(Body::empty()).unwrap();
        local
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 50000))));
        let response = app.clone().oneshot(local).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await["roles"],
            json!(["Sagsbehandler", "Administrator"])
        );

        let mut remote = Request::get("/api/me").body(Body::empty()).unwrap();
        remote
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([10, 1, 2, 3], 50000))));
        let response = app.oneshot(remote).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn export_is_csv() {
        let state = test_state().await;
        seed(&state.sdb, record(1, FakturaStatus::Ny)).await;
        let app = app(state).unwrap();
        let cookie = login(&app, &[CASEWORKERS]).await;

        let response = app.oneshot(get("/api/export", &cookie)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let csv = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(csv.trim_end().split("\r\n").count(), 2);
    }
}
