//! 일회용 토큰 생성

use base64::Engine;
use rand::RngCore;

/// 32바이트 난수를 URL-safe base64(패딩 없음, 43자)로 인코딩합니다.
///
/// CSRF 토큰과 비밀번호 재설정 토큰에 사용됩니다.
pub fn random_url_safe_token() -> String {
    let mut random_bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut random_bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = random_url_safe_token();

        assert_eq!(token.len(), 43);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_ne!(token, random_url_safe_token());
    }
}
