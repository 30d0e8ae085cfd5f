use super::AppState;
use crate::models::User;
use crate::services::user_service;
use crate::utils::{AppError, ErrorBody};
use actix_web::{web, HttpResponse};

#[utoipa::path(
    get,
    path = "/api/leaderboard",
    tag = "Leaderboard",
    responses(
        (status = 200, description = "Up to 10 users, highest donation total first", body = [User]),
        (status = 500, description = "Database error", body = ErrorBody)
    )
)]
pub async fn get_leaderboard(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    log::info!("🏆 GET /api/leaderboard");

    match user_service::leaderboard(state.store.as_ref(), state.demo_mode).await {
        Ok(users) => {
            log::info!("✅ Leaderboard: {} entries", users.len());
            Ok(HttpResponse::Ok().json(users))
        }
        Err(e) => {
            log::error!("❌ Failed to build leaderboard: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app_state, read_json, test_app};
    use crate::models::{sample_leaderboard, NewUser, User};
    use crate::store::{MemoryUserStore, UserStore};
    use actix_web::{http::StatusCode, test};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_leaderboard_sorted_and_capped() {
        let store = Arc::new(MemoryUserStore::new());
        for i in 0..15i64 {
            store
                .insert(NewUser {
                    name: format!("Donor {}", i),
                    email: format!("donor{}@example.com", i),
                    referral_code: format!("donor{}2025", i),
                    total_donations: (i * 37) % 11,
                    created_at: chrono::Utc::now(),
                })
                .await
                .unwrap();
        }
        let app = test::init_service(test_app(app_state(store, true))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/leaderboard").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        let board: Vec<User> = read_json(res).await;
        assert_eq!(board.len(), 10);
        assert!(board
            .windows(2)
            .all(|pair| pair[0].total_donations >= pair[1].total_donations));
    }

    #[actix_web::test]
    async fn test_empty_leaderboard_uses_sample() {
        let app = test::init_service(test_app(app_state(Arc::new(MemoryUserStore::new()), true))).await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/api/leaderboard").to_request()).await;
        let board: Vec<User> = read_json(res).await;
        assert_eq!(board, sample_leaderboard());
    }
}
