use crate::config::CouponWebhookConfig;
use crate::entities::{CouponStatus, DeliveryChannel, lead_entity as leads, restaurant_entity as restaurants};
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// 平台统一优惠券 webhook 的请求体
#[derive(Debug, Serialize)]
pub struct GenericCouponPayload {
    #[serde(rename = "storeId")]
    pub store_id: String,
    pub nome: String,
    pub telefone: String,
}

/// 餐厅自有 webhook 的请求体
#[derive(Debug, Serialize)]
pub struct RestaurantLeadPayload {
    pub lead_id: i64,
    pub name: String,
    pub phone: String,
    pub prize: String,
    pub day_pref: Option<String>,
    pub time_pref: Option<String>,
    pub fav_product: Option<String>,
    pub restaurant_id: i64,
    pub restaurant_name: String,
    pub timestamp: DateTime<Utc>,
}

impl RestaurantLeadPayload {
    pub fn new(lead: &leads::Model, restaurant: &restaurants::Model) -> Self {
        Self {
            lead_id: lead.id,
            name: lead.name.clone(),
            phone: lead.phone.clone(),
            prize: lead.prize.clone(),
            day_pref: lead.day_pref.clone(),
            time_pref: lead.time_pref.clone(),
            fav_product: lead.fav_product.clone(),
            restaurant_id: restaurant.id,
            restaurant_name: restaurant.name.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// 一次投递的结果；网络错误也记为 failed 而不是 Err
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryOutcome {
    pub channel: DeliveryChannel,
    pub status: CouponStatus,
    pub http_status: Option<i32>,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn is_sent(&self) -> bool {
        self.status == CouponStatus::Sent
    }
}

#[derive(Clone)]
pub struct CouponWebhookClient {
    client: Client,
    generic_url: Option<String>,
}

impl CouponWebhookClient {
    pub fn new(config: &CouponWebhookConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build webhook client: {e}")))?;
        Ok(Self {
            client,
            generic_url: config.url.clone().filter(|u| !u.trim().is_empty()),
        })
    }

    pub fn has_generic_channel(&self) -> bool {
        self.generic_url.is_some()
    }

    /// 投递到平台统一 webhook；未配置时返回 None
    pub async fn deliver_generic(
        &self,
        lead: &leads::Model,
        restaurant: &restaurants::Model,
    ) -> Option<DeliveryOutcome> {
        let url = self.generic_url.as_deref()?;
        let payload = GenericCouponPayload {
            store_id: restaurant.store_id(),
            nome: lead.name.clone(),
            telefone: lead.phone.clone(),
        };
        Some(self.post(DeliveryChannel::Generic, url, &payload, None).await)
    }

    /// 投递到餐厅自有 webhook；未配置时返回 None
    pub async fn deliver_restaurant(
        &self,
        payload: &RestaurantLeadPayload,
        restaurant: &restaurants::Model,
    ) -> Option<DeliveryOutcome> {
        let url = restaurant
            .webhook_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())?;
        let token = restaurant.webhook_token.as_deref().filter(|t| !t.is_empty());
        Some(
            self.post(DeliveryChannel::Restaurant, url, payload, token)
                .await,
        )
    }

    async fn post<T: Serialize>(
        &self,
        channel: DeliveryChannel,
        url: &str,
        body: &T,
        token: Option<&str>,
    ) -> DeliveryOutcome {
        let mut request = self.client.post(url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    log::info!("Coupon webhook delivered: channel={channel:?}, status={status}");
                    DeliveryOutcome {
                        channel,
                        status: CouponStatus::Sent,
                        http_status: Some(status.as_u16() as i32),
                        error: None,
                    }
                } else {
                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    log::warn!(
                        "Coupon webhook rejected: channel={channel:?}, status={status}, body={error_text}"
                    );
                    DeliveryOutcome {
                        channel,
                        status: CouponStatus::Failed,
                        http_status: Some(status.as_u16() as i32),
                        error: Some(error_text),
                    }
                }
            }
            Err(e) => {
                log::warn!("Coupon webhook unreachable: channel={channel:?}, error={e}");
                DeliveryOutcome {
                    channel,
                    status: CouponStatus::Failed,
                    http_status: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::RestaurantStatus;
    use actix_web::http::header;
    use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};

    type Captured = Arc<Mutex<Vec<(Option<String>, Value)>>>;

    /// 本地 webhook：记录 Authorization 头与请求体
    async fn spawn_recorder() -> (String, Captured) {
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let sink = captured.clone();
        let server = HttpServer::new(move || {
            let sink = sink.clone();
            App::new().default_service(web::to(
                move |req: HttpRequest, body: web::Json<Value>| {
                    let sink = sink.clone();
                    async move {
                        let auth = req
                            .headers()
                            .get(header::AUTHORIZATION)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string);
                        sink.lock().unwrap().push((auth, body.into_inner()));
                        HttpResponse::Ok().finish()
                    }
                },
            ))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        (format!("http://{addr}/coupon"), captured)
    }

    fn restaurant(webhook_url: Option<String>, webhook_token: Option<String>) -> restaurants::Model {
        restaurants::Model {
            id: 7,
            name: "Cantina da Nona".into(),
            slug: "cantina-da-nona".into(),
            status: RestaurantStatus::Active,
            whatsapp: Some("5511988887777".into()),
            color: None,
            webhook_url,
            webhook_token,
            metrics_access: 0,
            metrics_spins: 0,
            metrics_leads: 0,
            created_at: None,
            updated_at: None,
        }
    }

    fn lead() -> leads::Model {
        leads::Model {
            id: 42,
            restaurant_id: 7,
            name: "Maria".into(),
            phone: "5511999999999".into(),
            prize: "Sobremesa grátis".into(),
            day_pref: Some("sexta".into()),
            time_pref: None,
            fav_product: Some("pizza".into()),
            sent_by_admin: false,
            coupon_status: CouponStatus::Pending,
            remarketing_eligible_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn client(url: Option<String>) -> CouponWebhookClient {
        CouponWebhookClient::new(&CouponWebhookConfig {
            url,
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[actix_web::test]
    async fn test_generic_payload_uses_store_slug() {
        let (url, captured) = spawn_recorder().await;
        let outcome = client(Some(url))
            .deliver_generic(&lead(), &restaurant(None, None))
            .await
            .unwrap();
        assert!(outcome.is_sent());
        assert_eq!(outcome.channel, DeliveryChannel::Generic);
        assert_eq!(outcome.http_status, Some(200));

        let calls = captured.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (auth, body) = &calls[0];
        assert!(auth.is_none());
        assert_eq!(
            body,
            &json!({
                "storeId": "cantina-da-nona",
                "nome": "Maria",
                "telefone": "5511999999999"
            })
        );
    }

    #[actix_web::test]
    async fn test_restaurant_payload_and_bearer_token() {
        let (url, captured) = spawn_recorder().await;
        let r = restaurant(Some(url), Some("tok-123".into()));
        let payload = RestaurantLeadPayload::new(&lead(), &r);
        let outcome = client(None).deliver_restaurant(&payload, &r).await.unwrap();
        assert!(outcome.is_sent());
        assert_eq!(outcome.channel, DeliveryChannel::Restaurant);

        let calls = captured.lock().unwrap();
        let (auth, body) = &calls[0];
        assert_eq!(auth.as_deref(), Some("Bearer tok-123"));

        let object = body.as_object().unwrap();
        let mut keys: Vec<&str> = object.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "day_pref",
                "fav_product",
                "lead_id",
                "name",
                "phone",
                "prize",
                "restaurant_id",
                "restaurant_name",
                "time_pref",
                "timestamp",
            ]
        );
        assert_eq!(body["lead_id"], 42);
        assert_eq!(body["prize"], "Sobremesa grátis");
        assert_eq!(body["day_pref"], "sexta");
        assert_eq!(body["time_pref"], Value::Null);
        assert_eq!(body["restaurant_id"], 7);
        assert_eq!(body["restaurant_name"], "Cantina da Nona");
        assert!(body["timestamp"].as_str().is_some_and(|t| t.parse::<DateTime<Utc>>().is_ok()));
    }

    #[actix_web::test]
    async fn test_restaurant_without_token_sends_no_auth_header() {
        let (url, captured) = spawn_recorder().await;
        let r = restaurant(Some(url), Some(String::new()));
        let payload = RestaurantLeadPayload::new(&lead(), &r);
        assert!(client(None).deliver_restaurant(&payload, &r).await.unwrap().is_sent());
        assert!(captured.lock().unwrap()[0].0.is_none());
    }

    #[actix_web::test]
    async fn test_missing_channels_are_skipped() {
        let r = restaurant(None, None);
        let c = client(None);
        assert!(!c.has_generic_channel());
        assert!(c.deliver_generic(&lead(), &r).await.is_none());
        let payload = RestaurantLeadPayload::new(&lead(), &r);
        assert!(c.deliver_restaurant(&payload, &r).await.is_none());
    }
}
