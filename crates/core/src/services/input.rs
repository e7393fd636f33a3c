//! Lenient input coercion shared by the services.
//!
//! The web client sends ids and coordinates either as JSON numbers or as
//! strings (often empty), so those fields arrive as [`Value`] and are
//! coerced here.

use celula_common::{AppError, AppResult};
use celula_db::entities::member::Role;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a present field as `Some`, keeping an explicit `null` as
/// `Some(None)` when used with `Option<Option<T>>`.
///
/// Use together with `#[serde(default)]` so a missing key stays `None`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Deserialize a string with surrounding whitespace removed, so that a
/// `length(min = 1)` check rejects blank text.
pub fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

/// Coerce a number or numeric string to `f64`; anything else is `None`.
#[must_use]
pub fn safe_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Coerce an integer or integer string to `i32`; anything else is `None`.
#[must_use]
pub fn safe_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse an optional id strictly: null and blank strings mean "none", a
/// number or numeric string is the id, anything else is rejected.
pub fn strict_id(value: &Value, field: &str) -> AppResult<Option<i32>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        other => safe_int(other)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("{field} deve ser numérico"))),
    }
}

/// Parse a `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Parse an ISO-8601 style timestamp.
///
/// Accepts `T` or space separators, optional seconds and fractions, a
/// trailing UTC offset (the wall-clock time is kept) and bare dates, which
/// map to midnight.
#[must_use]
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    let value = value.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
        return Some(with_offset.naive_local());
    }

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| parse_date(value).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

/// Map an invite code to the role it grants.
///
/// Matching ignores case and surrounding whitespace; unknown codes grant the
/// plain member role.
#[must_use]
pub fn role_for_invite_code(code: &str) -> Role {
    match code.trim().to_uppercase().as_str() {
        "LIDER12" => Role::Leader,
        "REDE12" => Role::NetworkLeader,
        "GERACAO12" => Role::GenerationLeader,
        "ADMIN12" => Role::Admin,
        _ => Role::Member,
    }
}

/// Parse a role from its wire label (`Membro`, `Lider`, ...).
pub fn parse_role(label: &str) -> AppResult<Role> {
    [
        Role::Member,
        Role::Leader,
        Role::NetworkLeader,
        Role::GenerationLeader,
        Role::Admin,
        Role::Visitor,
    ]
    .into_iter()
    .find(|role| role.as_str().eq_ignore_ascii_case(label.trim()))
    .ok_or_else(|| AppError::BadRequest(format!("Tipo de membro inválido: {label}")))
}

/// Trim a free-text field, mapping blank input to `None`.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_safe_float() {
        assert_eq!(safe_float(&json!(-23.55)), Some(-23.55));
        assert_eq!(safe_float(&json!("-46.63")), Some(-46.63));
        assert_eq!(safe_float(&json!("")), None);
        assert_eq!(safe_float(&json!("abc")), None);
        assert_eq!(safe_float(&Value::Null), None);
    }

    #[test]
    fn test_safe_int() {
        assert_eq!(safe_int(&json!(7)), Some(7));
        assert_eq!(safe_int(&json!(" 12 ")), Some(12));
        assert_eq!(safe_int(&json!("12a")), None);
        assert_eq!(safe_int(&json!(1.5)), None);
        assert_eq!(safe_int(&json!(true)), None);
    }

    #[test]
    fn test_strict_id() {
        assert_eq!(strict_id(&json!(""), "celula_id").unwrap(), None);
        assert_eq!(strict_id(&json!("   "), "celula_id").unwrap(), None);
        assert_eq!(strict_id(&Value::Null, "celula_id").unwrap(), None);
        assert_eq!(strict_id(&json!("3"), "celula_id").unwrap(), Some(3));
        assert_eq!(strict_id(&json!(4), "celula_id").unwrap(), Some(4));
        assert!(matches!(
            strict_id(&json!("abc"), "celula_id"),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_invite_codes() {
        assert_eq!(role_for_invite_code(" lider12 "), Role::Leader);
        assert_eq!(role_for_invite_code("LIDER12"), Role::Leader);
        assert_eq!(role_for_invite_code("Lider12"), Role::Leader);
        assert_eq!(role_for_invite_code("rede12"), Role::NetworkLeader);
        assert_eq!(role_for_invite_code("GERACAO12"), Role::GenerationLeader);
        assert_eq!(role_for_invite_code("admin12"), Role::Admin);
        assert_eq!(role_for_invite_code("LIDER13"), Role::Member);
        assert_eq!(role_for_invite_code(""), Role::Member);
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(parse_role("LiderRede").unwrap(), Role::NetworkLeader);
        assert_eq!(parse_role("visitante").unwrap(), Role::Visitor);
        assert!(parse_role("Pastor").is_err());
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();

        assert_eq!(parse_datetime("2025-03-01 19:30"), Some(expected));
        assert_eq!(parse_datetime("2025-03-01T19:30"), Some(expected));
        assert_eq!(parse_datetime("2025-03-01T19:30:00"), Some(expected));
        assert_eq!(parse_datetime("2025-03-01T19:30:00-03:00"), Some(expected));
        assert_eq!(
            parse_datetime("2025-03-01"),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("amanhã"), None);
    }

    #[test]
    fn test_parse_date_invalid_is_none() {
        assert_eq!(parse_date("31/12/1990"), None);
        assert_eq!(parse_date("1990-12-31"), NaiveDate::from_ymd_opt(1990, 12, 31));
    }

    #[test]
    fn test_deserialize_some_distinguishes_null() {
        #[derive(Deserialize)]
        struct Patch {
            #[serde(default, deserialize_with = "deserialize_some")]
            telefone: Option<Option<String>>,
        }

        let missing: Patch = serde_json::from_value(json!({})).unwrap();
        let cleared: Patch = serde_json::from_value(json!({"telefone": null})).unwrap();
        let set: Patch = serde_json::from_value(json!({"telefone": "9999"})).unwrap();

        assert_eq!(missing.telefone, None);
        assert_eq!(cleared.telefone, Some(None));
        assert_eq!(set.telefone, Some(Some("9999".to_string())));
    }

    #[test]
    fn test_trimmed_strips_surrounding_whitespace() {
        #[derive(Deserialize)]
        struct Body {
            #[serde(deserialize_with = "trimmed")]
            texto: String,
        }

        let body: Body = serde_json::from_value(json!({"texto": "  Amém \n"})).unwrap();
        assert_eq!(body.texto, "Amém");

        let blank: Body = serde_json::from_value(json!({"texto": "   "})).unwrap();
        assert!(blank.texto.is_empty());
    }
}
