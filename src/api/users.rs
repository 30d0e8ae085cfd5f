use super::AppState;
use crate::models::{CreateUserRequest, DonateRequest, User, UsersPage};
use crate::services::user_service::{self, DEFAULT_PAGE, DEFAULT_PAGE_SIZE};
use crate::utils::{AppError, ErrorBody};
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsersQuery {
    /// Page number, 1-based (default 1)
    pub page: Option<String>,
    /// Page size (default 50)
    pub limit: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/user/{code}",
    tag = "Users",
    params(("code" = String, Path, description = "Referral code")),
    responses(
        (status = 200, description = "User, or the demo fallback user", body = User),
        (status = 404, description = "No such user (demo mode off)", body = ErrorBody),
        (status = 500, description = "Database error", body = ErrorBody)
    )
)]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    log::info!("🔎 GET /api/user/{}", code);

    let user = user_service::get_user(state.store.as_ref(), Some(&code), state.demo_mode).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    get,
    path = "/api/user",
    tag = "Users",
    responses(
        (status = 200, description = "Demo fallback user", body = User),
        (status = 404, description = "Demo mode off", body = ErrorBody)
    )
)]
pub async fn get_default_user(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    log::info!("🔎 GET /api/user");

    let user = user_service::get_user(state.store.as_ref(), None, state.demo_mode).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[utoipa::path(
    post,
    path = "/api/user",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Missing name or email", body = ErrorBody),
        (status = 409, description = "Referral code or email already taken", body = ErrorBody)
    )
)]
pub async fn create_user(
    state: web::Data<AppState>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let email = request.email.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /api/user - email: {}", email);

    match user_service::create_user(state.store.as_ref(), &request).await {
        Ok(user) => {
            log::info!("✅ User created: {} ({})", user.referral_code, user.email);
            Ok(HttpResponse::Created().json(user))
        }
        Err(e) => {
            log::warn!("❌ User creation failed: {} - {}", email, e);
            Err(e)
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    params(UsersQuery),
    responses(
        (status = 200, description = "Page of users, newest first", body = UsersPage),
        (status = 500, description = "Database error", body = ErrorBody)
    )
)]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UsersQuery>,
) -> Result<HttpResponse, AppError> {
    let page = user_service::parse_positive(query.page.as_deref(), DEFAULT_PAGE);
    let limit = user_service::parse_positive(query.limit.as_deref(), DEFAULT_PAGE_SIZE);
    log::info!("👥 GET /api/users - page {} limit {}", page, limit);

    match user_service::list_users(state.store.as_ref(), page, limit, state.demo_mode).await {
        Ok(result) => Ok(HttpResponse::Ok().json(result)),
        Err(e) => {
            log::error!("❌ Failed to list users: {}", e);
            Err(e)
        }
    }
}

#[utoipa::path(
    put,
    path = "/api/user/{code}/donate",
    tag = "Users",
    params(("code" = String, Path, description = "Referral code")),
    request_body = DonateRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    )
)]
pub async fn donate(
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<DonateRequest>,
) -> Result<HttpResponse, AppError> {
    let code = path.into_inner();
    log::info!("💸 PUT /api/user/{}/donate - amount: {}", code, request.amount);

    match user_service::add_donation(state.store.as_ref(), &code, request.amount).await {
        Ok(user) => {
            log::info!("✅ {} total is now {}", user.referral_code, user.total_donations);
            Ok(HttpResponse::Ok().json(user))
        }
        Err(e) => {
            log::warn!("⚠️ Donation to {} failed: {}", code, e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app_state, read_json, test_app};
    use crate::models::{fallback_user, sample_users, User, UsersPage};
    use crate::store::MemoryUserStore;
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_create_then_lookup() {
        let app = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), true))).await;

        let req = test::TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "name": "Grace Hopper", "email": "grace@example.com" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: User = read_json(res).await;
        assert_eq!(created.referral_code, "gracehopper2025");

        let req = test::TestRequest::get().uri("/api/user/gracehopper2025").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let found: User = read_json(res).await;
        assert_eq!(found, created);
    }

    #[actix_web::test]
    async fn test_lookup_fallback_and_not_found() {
        let demo = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), true))).await;
        for uri in ["/api/user", "/api/user/nobody2025"] {
            let res = test::call_service(&demo, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);
            let user: User = read_json(res).await;
            assert_eq!(user, fallback_user());
        }

        let strict = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), false))).await;
        let res = test::call_service(&strict, test::TestRequest::get().uri("/api/user/nobody2025").to_request()).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = read_json(res).await;
        assert!(body["error"].as_str().unwrap().contains("nobody2025"));
    }

    #[actix_web::test]
    async fn test_create_validation_and_conflict() {
        let app = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), true))).await;

        let req = test::TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "name": "No Email" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_json(res).await;
        assert_eq!(body, json!({ "error": "email is required" }));

        let first = json!({ "name": "Ada", "email": "ada@example.com" });
        let req = test::TestRequest::post().uri("/api/user").set_json(&first).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "name": "A DA", "email": "ada2@example.com" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: Value = read_json(res).await;
        assert_eq!(body["field"], "referralCode");
    }

    #[actix_web::test]
    async fn test_malformed_json_is_a_client_error() {
        let app = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), true))).await;

        let req = test::TestRequest::put()
            .uri("/api/user/johndoe2025/donate")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"amount\": \"lots\"}")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = read_json(res).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_donate_updates_total_or_404() {
        let store = Arc::new(MemoryUserStore::new());
        let app = test::init_service(test_app(app_state(store, true))).await;

        let req = test::TestRequest::post()
            .uri("/api/user")
            .set_json(json!({ "name": "Linus", "email": "linus@example.com" }))
            .to_request();
        let created: User = read_json(test::call_service(&app, req).await).await;

        let req = test::TestRequest::put()
            .uri("/api/user/linus2025/donate")
            .set_json(json!({ "amount": 250 }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: User = read_json(res).await;
        assert_eq!(updated.total_donations, created.total_donations + 250);

        let req = test::TestRequest::put()
            .uri("/api/user/ghost2025/donate")
            .set_json(json!({ "amount": 250 }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = read_json(res).await;
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[actix_web::test]
    async fn test_empty_store_lists_sample_users() {
        let app = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), true))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/users").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = read_json(res).await;
        assert_eq!(
            body["pagination"],
            json!({ "currentPage": 1, "totalPages": 1, "totalUsers": 6, "hasNext": false, "hasPrev": false })
        );
        let page: UsersPage = serde_json::from_value(body).unwrap();
        assert_eq!(page.users, sample_users());
    }

    #[actix_web::test]
    async fn test_list_users_lenient_query() {
        let app = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), false))).await;
        for i in 0..3 {
            let req = test::TestRequest::post()
                .uri("/api/user")
                .set_json(json!({ "name": format!("Member {}", i), "email": format!("m{}@example.com", i) }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::get().uri("/api/users?page=2&limit=2").to_request();
        let page: UsersPage = read_json(test::call_service(&app, req).await).await;
        assert_eq!(page.users.len(), 1);
        assert!(page.pagination.has_prev);
        assert!(!page.pagination.has_next);

        let req = test::TestRequest::get().uri("/api/users?page=abc&limit=0").to_request();
        let page: UsersPage = read_json(test::call_service(&app, req).await).await;
        assert_eq!(page.pagination.current_page, 1);
        assert_eq!(page.users.len(), 3);
    }
}
