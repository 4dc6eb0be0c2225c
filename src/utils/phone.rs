use crate::error::{AppError, AppResult};
use regex::Regex;

/// 只保留数字
pub fn digits_only(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// 校验本地格式手机号：去掉标点后 10~13 位数字
pub fn validate_phone(phone: &str) -> AppResult<()> {
    let phone_regex = Regex::new(r"^\d{10,13}$")
        .map_err(|e| AppError::InternalError(format!("Invalid phone pattern: {e}")))?;

    if !phone_regex.is_match(&digits_only(phone)) {
        return Err(AppError::ValidationError(
            "Invalid phone number, expected 10 to 13 digits".to_string(),
        ));
    }

    Ok(())
}

/// 转为带国家码的 WhatsApp 号码；已带国家码的长号码保持不变
pub fn normalize_phone(phone: &str, country_code: &str) -> String {
    let digits = digits_only(phone);
    if digits.len() > 11 && digits.starts_with(country_code) {
        digits
    } else {
        format!("{country_code}{digits}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("(11) 99999-9999").is_ok());
        assert!(validate_phone("1133334444").is_ok());
        assert!(validate_phone("999").is_err());
        assert!(validate_phone("").is_err());
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("(11) 99999-9999", "55"), "5511999999999");
        assert_eq!(normalize_phone("5511999999999", "55"), "5511999999999");
        // 11 位本地号码即使以 55 开头也要补国家码
        assert_eq!(normalize_phone("55999999999", "55"), "5555999999999");
    }
}
