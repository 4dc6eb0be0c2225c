use bcrypt::{DEFAULT_COST, hash, verify};

use crate::error::{AppError, AppResult};

const MIN_CHARS: usize = 8;
// bcrypt 只取前 72 字节
const MAX_BYTES: usize = 72;

/// 账号密码规则：至少 8 个字符、不超过 72 字节，同时包含字母和数字
pub fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_CHARS {
        return Err(AppError::ValidationError(format!(
            "Password must have at least {MIN_CHARS} characters"
        )));
    }
    if password.len() > MAX_BYTES {
        return Err(AppError::ValidationError(format!(
            "Password must not exceed {MAX_BYTES} bytes"
        )));
    }
    let (letters, digits) = password.chars().fold((0, 0), |(l, d), c| {
        (l + c.is_alphabetic() as usize, d + c.is_ascii_digit() as usize)
    });
    if letters == 0 || digits == 0 {
        return Err(AppError::ValidationError(
            "Password must contain letters and digits".to_string(),
        ));
    }
    Ok(())
}

pub fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalError(format!("Password hashing failed: {e}")))
}

/// 登录校验；哈希格式损坏视为内部错误而非密码错误
pub fn verify_password(password: &str, password_hash: &str) -> AppResult<bool> {
    verify(password, password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password() {
        assert!(validate_password("senha1234").is_ok());
        assert!(validate_password("12345678").is_err()); // 缺少字母
        assert!(validate_password("password").is_err()); // 缺少数字
        assert!(validate_password("abc123").is_err()); // 太短
        assert!(validate_password(&format!("a1{}", "x".repeat(80))).is_err());
        assert!(validate_password("pão1234567").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hashed = hash_password("Restaurante42").unwrap();
        assert!(verify_password("Restaurante42", &hashed).unwrap());
        assert!(!verify_password("restaurante42", &hashed).unwrap());
        assert!(verify_password("Restaurante42", "not-a-hash").is_err());
    }
}
