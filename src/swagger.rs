use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{
    AccountRole, CouponStatus, DeliveryChannel, LimitPeriod, NotificationPriority,
    NotificationType, PrizeTier, RestaurantStatus,
};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::login,
        handlers::auth::me,
        handlers::auth::create_account,
        handlers::auth::confirm_account,
        handlers::wheel::get_wheel,
        handlers::wheel::spin,
        handlers::wheel::submit_lead,
        handlers::restaurant::list_restaurants,
        handlers::restaurant::create_restaurant,
        handlers::restaurant::get_restaurant,
        handlers::restaurant::update_restaurant,
        handlers::restaurant::toggle_status,
        handlers::restaurant::delete_restaurant,
        handlers::prize::list_prizes,
        handlers::prize::create_prize,
        handlers::prize::update_prize,
        handlers::prize::delete_prize,
        handlers::lead::list_restaurant_leads,
        handlers::lead::list_all_leads,
        handlers::lead::get_lead,
        handlers::lead::delete_lead,
        handlers::lead::contact_lead,
        handlers::lead::send_coupons,
        handlers::lead::set_remarketing_date,
        handlers::lead::remarketing_today,
        handlers::lead::lead_report,
        handlers::lead::lead_deliveries,
        handlers::lead::test_webhook,
        handlers::lead::generate_scripts,
        handlers::metric::restaurant_metrics,
        handlers::metric::global_overview,
        handlers::notification::list_notifications,
        handlers::notification::unread_count,
        handlers::notification::mark_read,
        handlers::notification::mark_all_read,
        handlers::notification::delete_all,
        handlers::notification::evaluate,
        handlers::food_option::list_food_options,
        handlers::food_option::create_food_option,
        handlers::food_option::delete_food_option,
    ),
    components(
        schemas(
            AccountRole,
            RestaurantStatus,
            PrizeTier,
            LimitPeriod,
            CouponStatus,
            DeliveryChannel,
            NotificationType,
            NotificationPriority,
            LoginRequest,
            AuthResponse,
            AccountResponse,
            CreateAccountRequest,
            RestaurantResponse,
            PublicRestaurantResponse,
            CreateRestaurantRequest,
            UpdateRestaurantRequest,
            CreateRestaurantResponse,
            WebhookTestResponse,
            PrizeResponse,
            CreatePrizeRequest,
            UpdatePrizeRequest,
            WheelPrize,
            WheelResponse,
            SpinResponse,
            SubmitLeadRequest,
            SubmitLeadResponse,
            LeadResponse,
            LeadStatusFilter,
            LeadSort,
            ContactLeadRequest,
            ContactLink,
            SendCouponsRequest,
            RemarketingDateRequest,
            CountEntry,
            LeadReport,
            CouponDeliveryResponse,
            MetricResponse,
            MetricsSummary,
            RestaurantOverview,
            GlobalOverview,
            NotificationMetadata,
            NotificationResponse,
            UnreadCountResponse,
            EvaluationResponse,
            FoodOptionResponse,
            CreateFoodOptionRequest,
            GenerateScriptsRequest,
            RemarketingScripts,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication and account API"),
        (name = "wheel", description = "Public prize wheel API"),
        (name = "restaurant", description = "Restaurant management API"),
        (name = "prize", description = "Prize configuration API"),
        (name = "lead", description = "Lead and remarketing API"),
        (name = "metric", description = "Access / spin / lead metrics API"),
        (name = "notification", description = "Restaurant notification API"),
        (name = "food_option", description = "Favourite product catalogue API"),
    ),
    info(
        title = "Spinwheel Backend API",
        version = "1.0.0",
        description = "Multi-tenant restaurant prize wheel REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/wheel/{slug}/spin"));
        assert!(doc.paths.paths.contains_key("/restaurants/{id}/leads"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
