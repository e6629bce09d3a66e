use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

/// Wrapper producing the uniform success envelope every endpoint shares.
///
/// Shapes are fixed wire contracts:
/// - single resource / related info: `{"data": <value>}`
/// - create: 201 with `{"data": [<new_id>]}`
/// - update/delete: 204 with empty body
///
/// Grid responses carry their own top-level paging fields and plain lists
/// are bare arrays; both bypass this wrapper.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub status_code: Option<StatusCode>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with a `{"data": ...}` body
    pub fn data(data: T) -> Self {
        Self {
            data,
            status_code: None,
        }
    }

    pub fn with_status(data: T, status_code: StatusCode) -> Self {
        Self {
            data,
            status_code: Some(status_code),
        }
    }

    /// 204 No Content with empty body
    pub fn no_content() -> ApiResponse<()> {
        ApiResponse::with_status((), StatusCode::NO_CONTENT)
    }
}

impl ApiResponse<Value> {
    /// 201 Created with `{"data": [<new_id>]}`
    pub fn created_id(id: i64) -> Self {
        Self::with_status(json!([id]), StatusCode::CREATED)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        // For 204 No Content, return empty response
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "code": crate::error::codes::PERSISTENCE,
                        "message": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let envelope = json!({ "data": data_value });

        (status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn created_id_wraps_id_in_array() {
        let resp = ApiResponse::created_id(42);
        assert_eq!(resp.status_code, Some(StatusCode::CREATED));
        assert_eq!(resp.data, json!([42]));
    }

    #[test]
    fn no_content_has_no_body_payload() {
        let resp = ApiResponse::<()>::no_content();
        assert_eq!(resp.status_code, Some(StatusCode::NO_CONTENT));
    }
}
