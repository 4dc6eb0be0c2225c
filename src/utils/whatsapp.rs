use crate::error::{AppError, AppResult};
use reqwest::Url;

use super::phone::digits_only;

/// 中奖后发给餐厅的兑奖消息
pub fn prize_claim_message(prize: &str) -> String {
    format!("Olá! Acabei de ganhar *{prize}* na roleta! Gostaria de resgatar.")
}

/// 批量发券时发给顾客的消息
pub fn coupon_offer_message(name: &str, discount: &str) -> String {
    format!(
        "Olá {name}! 🎉\n\nParabéns por participar da nossa roleta!\n\nEstamos com uma PROMOÇÃO ESPECIAL para você: *{discount}* em qualquer pedido!\n\nGostaria de fazer seu pedido agora? 😋"
    )
}

/// 生成 https://wa.me/<number>?text=<message>
pub fn wa_me_link(number: &str, message: &str) -> AppResult<String> {
    let number = digits_only(number);
    if number.is_empty() {
        return Err(AppError::ValidationError(
            "WhatsApp number is empty".to_string(),
        ));
    }
    let mut url = Url::parse("https://wa.me/")
        .and_then(|base| base.join(&number))
        .map_err(|e| AppError::InternalError(format!("Invalid WhatsApp url: {e}")))?;
    url.query_pairs_mut().append_pair("text", message);
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wa_me_link_encodes_message() {
        let link = wa_me_link("+55 11 98888-7777", &prize_claim_message("10% OFF")).unwrap();
        assert!(link.starts_with("https://wa.me/5511988887777?text="));
        assert!(!link.contains(' '));
        assert!(link.contains("10%25"));
    }

    #[test]
    fn test_wa_me_link_rejects_empty_number() {
        assert!(wa_me_link("--", "oi").is_err());
    }

    #[test]
    fn test_coupon_offer_message() {
        let msg = coupon_offer_message("Ana", "15% OFF");
        assert!(msg.starts_with("Olá Ana! 🎉"));
        assert!(msg.contains("*15% OFF*"));
    }
}
