use serde::Serialize;
use utoipa::ToSchema;

/// The JSON envelope every API endpoint responds with.
///
/// Success carries `{code, message, data}`, failure `{code, message, error}`;
/// the unused side is omitted from the serialized form.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: String::from("Success"),
            data: Some(data),
            error: None,
        }
    }

    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            code: 201,
            message: message.into(),
            data: Some(data),
            error: None,
        }
    }

    /// Success with no payload, e.g. after a delete.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            code: 200,
            message: message.into(),
            data: None,
            error: None,
        }
    }

    pub fn failure(code: u16, message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_omits_the_error_field() {
        let value = serde_json::to_value(ApiResponse::success(vec![1, 2, 3]))
            .expect("envelope serializes");
        assert_eq!(value["code"], 200);
        assert_eq!(value["message"], "Success");
        assert_eq!(value["data"], serde_json::json!([1, 2, 3]));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_envelope_omits_the_data_field() {
        let envelope =
            ApiResponse::<()>::failure(500, "Internal Server Error", "connection refused");
        let value = serde_json::to_value(envelope).expect("envelope serializes");
        assert_eq!(value["code"], 500);
        assert_eq!(value["error"], "connection refused");
        assert!(value.get("data").is_none());
    }

    #[test]
    fn created_envelope_uses_code_201() {
        let value = serde_json::to_value(ApiResponse::created("P1", "Product created"))
            .expect("envelope serializes");
        assert_eq!(value["code"], 201);
        assert_eq!(value["data"], "P1");
    }

    #[test]
    fn message_only_envelope_has_neither_payload_nor_error() {
        let value = serde_json::to_value(ApiResponse::<()>::message_only("Deleted"))
            .expect("envelope serializes");
        assert_eq!(value["code"], 200);
        assert!(value.get("data").is_none());
        assert!(value.get("error").is_none());
    }
}
