//! # 문자열 유틸리티 / 입력 정화
//!
//! 요청 DTO의 자유 입력 필드를 저장 전에 정리합니다.
//!
//! - 앞뒤 공백 제거, 제어 문자 제거
//! - HTML 특수 문자 이스케이프 (`&`, `<`, `>`, `"`, `'`, `/`)
//!
//! serde 역직렬화 단계에서 적용되도록 `deserialize_with` 헬퍼를 제공합니다.
//! 비밀번호와 토큰 필드에는 사용하지 않습니다.

use serde::Deserialize;

/// 빈 문자열/공백 문자열은 `None`, 나머지는 trim 후 `Some`
pub fn clean_optional_string(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// HTML 특수 문자를 엔티티로 바꿉니다.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// 제어 문자 제거 → trim → HTML 이스케이프
pub fn sanitize_text(input: &str) -> String {
    let without_controls: String = input.chars().filter(|c| !c.is_control()).collect();
    escape_html(without_controls.trim())
}

/// `#[serde(deserialize_with = "deserialize_sanitized_string")]`
pub fn deserialize_sanitized_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(sanitize_text(&raw))
}

/// 정화 후 비어 있으면 `None`
pub fn deserialize_optional_sanitized<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(clean_optional_string(raw).map(|s| sanitize_text(&s)).filter(|s| !s.is_empty()))
}

/// 이메일은 이스케이프하지 않고 trim + 소문자 정규화만 합니다.
pub fn deserialize_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_optional_string() {
        assert_eq!(clean_optional_string(Some("  Hi ".to_string())), Some("Hi".to_string()));
        assert_eq!(clean_optional_string(Some("   ".to_string())), None);
        assert_eq!(clean_optional_string(None), None);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x's")</script> & co"#),
            "&lt;script&gt;alert(&quot;x&#x27;s&quot;)&lt;&#x2F;script&gt; &amp; co"
        );
    }

    #[test]
    fn test_sanitize_text_trims_and_strips_controls() {
        assert_eq!(sanitize_text("  Window\u{0}seat <please>  "), "Windowseat &lt;please&gt;");
    }

    #[derive(Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "deserialize_sanitized_string")]
        name: String,
        #[serde(default, deserialize_with = "deserialize_optional_sanitized")]
        note: Option<String>,
        #[serde(deserialize_with = "deserialize_email")]
        email: String,
    }

    #[test]
    fn test_serde_helpers() {
        let sample: Sample = serde_json::from_str(
            r#"{"name": " <b>Lee</b> ", "note": "   ", "email": " Lee@Example.com "}"#,
        )
        .unwrap();

        assert_eq!(sample.name, "&lt;b&gt;Lee&lt;&#x2F;b&gt;");
        assert_eq!(sample.note, None);
        assert_eq!(sample.email, "lee@example.com");
    }
}
