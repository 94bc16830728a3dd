//! Upstream response envelope: `{ "code": 200, "status": "OK", "data": { "surahs": [...] } }`.

use serde::Deserialize;
use serde_json::Value;

use crate::corpus::Corpus;
use crate::error::LoadError;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    code: Option<i64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    data: Option<Value>,
}

/// Turns a raw response body into a validated corpus. Any deviation from the
/// expected shape is a `LoadError::Format`.
pub fn parse_corpus_payload(body: &str) -> Result<Corpus, LoadError> {
    let response: ApiResponse = serde_json::from_str(body)
        .map_err(|err| LoadError::Format(format!("response is not JSON: {err}")))?;

    if response.code != Some(200) {
        return Err(LoadError::Format(format!(
            "unexpected response code {:?} (status {:?})",
            response.code, response.status
        )));
    }

    let sections = response
        .data
        .and_then(|mut data| data.get_mut("surahs").map(Value::take))
        .filter(Value::is_array)
        .ok_or_else(|| LoadError::Format("missing data.surahs list".into()))?;

    let corpus: Corpus = serde_json::from_value(sections)
        .map_err(|err| LoadError::Format(format!("malformed section list: {err}")))?;
    corpus.validate()?;

    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "code": 200,
        "status": "OK",
        "data": {
            "surahs": [
                {"number": 1, "englishName": "Al-Faatiha", "ayahs": [
                    {"number": 1, "numberInSurah": 1, "text": "In the name of God"},
                    {"number": 2, "numberInSurah": 2, "text": "All praise is due to God alone"}
                ]},
                {"number": 2, "englishName": "Al-Baqara", "ayahs": [
                    {"number": 3, "numberInSurah": 1, "text": "Alif. Lam. Mim."}
                ]}
            ],
            "edition": {"identifier": "en.asad"}
        }
    }"#;

    #[test]
    fn parses_valid_response() {
        let corpus = parse_corpus_payload(VALID).unwrap();
        assert_eq!(corpus.sections().len(), 2);
        assert_eq!(corpus.item_count(), 3);
    }

    #[test]
    fn non_200_code_is_format_error() {
        let body = VALID.replacen("\"code\": 200", "\"code\": 404", 1);
        assert!(matches!(
            parse_corpus_payload(&body),
            Err(LoadError::Format(_))
        ));
    }

    #[test]
    fn missing_sections_is_format_error() {
        let err = parse_corpus_payload(r#"{"code":200,"data":{}}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid data format from API: missing data.surahs list"
        );
    }

    #[test]
    fn section_without_items_is_rejected() {
        let body = r#"{"code":200,"data":{"surahs":[
            {"number":1,"englishName":"Empty","ayahs":[]}]}}"#;
        assert!(parse_corpus_payload(body).is_err());
    }

    #[test]
    fn html_error_page_is_rejected() {
        assert!(matches!(
            parse_corpus_payload("<html>bad gateway</html>"),
            Err(LoadError::Format(_))
        ));
    }
}
