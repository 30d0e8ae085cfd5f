use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Refrel Directory API",
        version = "1.0.0",
        description = "Referral and donation tracking.\n\n**Features:**\n- User signup with derived referral codes\n- Lookup by referral code\n- Paginated user directory\n- Donation leaderboard\n- Donation increments\n\nWith `DEMO_MODE` on, lookups and listings fall back to sample data when the store has nothing to show."
    ),
    paths(
        // Users
        crate::api::users::get_user,
        crate::api::users::get_default_user,
        crate::api::users::create_user,
        crate::api::users::list_users,
        crate::api::users::donate,

        // Leaderboard
        crate::api::leaderboard::get_leaderboard,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::User,
            crate::models::CreateUserRequest,
            crate::models::DonateRequest,
            crate::models::Pagination,
            crate::models::UsersPage,
            crate::utils::ErrorBody,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "Signup, lookup by referral code, directory listing and donations."),
        (name = "Leaderboard", description = "Top referrers by donation total."),
        (name = "Health", description = "Health check and request metrics."),
    )
)]
pub struct ApiDoc;
