use crate::config::AiConfig;
use crate::entities::lead_entity as leads;
use crate::error::{AppError, AppResult};
use crate::models::RemarketingScripts;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

const SYSTEM_PROMPT: &str = "Você é um especialista em marketing para restaurantes. \
Responda somente com um objeto JSON com as chaves \"persuasive\", \"playful\" e \"neutral\", \
cada uma contendo uma mensagem curta de WhatsApp em português.";

/// OpenAI 兼容的 chat completions 客户端
#[derive(Clone)]
pub struct AiTextClient {
    client: Client,
    config: AiConfig,
}

impl AiTextClient {
    pub fn new(config: AiConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build AI client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        !self.config.api_key.trim().is_empty()
    }

    /// 生成三种语气的营销文案
    pub async fn remarketing_scripts(
        &self,
        lead: &leads::Model,
        promotion: &str,
        product_type: &str,
    ) -> AppResult<RemarketingScripts> {
        if !self.is_configured() {
            return Err(AppError::ConfigError(
                "AI api key is not configured".to_string(),
            ));
        }

        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(lead, promotion, product_type),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("AI completion failed: status={status}, body={error_text}");
            return Err(AppError::ExternalApiError(format!(
                "AI provider returned {status}"
            )));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AppError::ExternalApiError("AI provider returned no content".into()))?;

        parse_scripts(&content)
    }
}

fn user_prompt(lead: &leads::Model, promotion: &str, product_type: &str) -> String {
    let or_unknown = |v: &Option<String>| v.clone().unwrap_or_else(|| "não informado".to_string());
    format!(
        "Cliente: {}\nDia preferido: {}\nHorário preferido: {}\nProduto favorito: {}\nPrêmio ganho: {}\nPromoção: {}\nTipo de produto: {}",
        lead.name,
        or_unknown(&lead.day_pref),
        or_unknown(&lead.time_pref),
        or_unknown(&lead.fav_product),
        lead.prize,
        promotion,
        product_type,
    )
}

/// 模型偶尔会用 ```json 包裹输出
pub fn parse_scripts(content: &str) -> AppResult<RemarketingScripts> {
    let trimmed = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(trimmed)
        .map_err(|e| AppError::ExternalApiError(format!("Unexpected AI output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scripts_with_fence() {
        let raw = "```json\n{\"persuasive\":\"a\",\"playful\":\"b\",\"neutral\":\"c\"}\n```";
        let scripts = parse_scripts(raw).unwrap();
        assert_eq!(scripts.playful, "b");
        assert!(parse_scripts("not json").is_err());
    }

    fn lead() -> leads::Model {
        leads::Model {
            id: 1,
            restaurant_id: 1,
            name: "Ana".into(),
            phone: "11999999999".into(),
            prize: "10% OFF".into(),
            day_pref: Some("Sexta".into()),
            time_pref: None,
            fav_product: Some("Pizza".into()),
            sent_by_admin: false,
            coupon_status: crate::entities::CouponStatus::Sent,
            remarketing_eligible_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_prompt_includes_preferences() {
        let prompt = user_prompt(&lead(), "2x1", "Pizza");
        assert!(prompt.contains("Dia preferido: Sexta"));
        assert!(prompt.contains("Horário preferido: não informado"));
        assert!(prompt.contains("Promoção: 2x1"));
    }

    #[actix_web::test]
    async fn test_missing_api_key_is_config_error() {
        let client = AiTextClient::new(AiConfig::default()).unwrap();
        let result = client.remarketing_scripts(&lead(), "2x1", "Pizza").await;
        assert!(matches!(result, Err(AppError::ConfigError(_))));
    }
}
