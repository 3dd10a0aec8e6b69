use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("입력값이 올바르지 않습니다: {0}")]
    InvalidInput(String),

    #[error("시트 데이터를 가져오지 못했습니다: {0}")]
    SheetFetchFailed(String),

    #[error("뉴스 검색에 실패했습니다: {0}")]
    NewsSearchFailed(String),

    #[error("AI 호출에 실패했습니다: {0}")]
    GenerationFailed(String),

    #[error("사용 가능한 AI 모델이 없습니다: {0}")]
    NoModelAvailable(String),

    #[error("AI 응답을 해석할 수 없습니다: {0}")]
    MalformedOutput(String),

    #[error("설정 오류: {0}")]
    Config(String),

    #[error("요청 한도 초과: {0}")]
    RateLimited(String),

    #[error("요청 시간이 초과되었습니다")]
    Timeout,

    #[error("내부 오류가 발생했습니다: {0}")]
    Internal(String),
}

impl FromStr for AppError {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("입력값이") {
            Ok(AppError::InvalidInput(s.to_string()))
        } else if s.starts_with("시트 데이터") {
            Ok(AppError::SheetFetchFailed(s.to_string()))
        } else if s.starts_with("뉴스 검색") {
            Ok(AppError::NewsSearchFailed(s.to_string()))
        } else if s.starts_with("AI 호출") {
            Ok(AppError::GenerationFailed(s.to_string()))
        } else if s.starts_with("사용 가능한 AI 모델") {
            Ok(AppError::NoModelAvailable(s.to_string()))
        } else if s.starts_with("AI 응답") {
            Ok(AppError::MalformedOutput(s.to_string()))
        } else if s.starts_with("설정 오류") {
            Ok(AppError::Config(s.to_string()))
        } else if s.starts_with("요청 한도") {
            Ok(AppError::RateLimited(s.to_string()))
        } else if s.contains("시간이 초과") {
            Ok(AppError::Timeout)
        } else {
            Ok(AppError::Internal(s.to_string()))
        }
    }
}

impl AppError {
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidInput(msg) | Self::RateLimited(msg) => msg.clone(),
            Self::SheetFetchFailed(_) => "시트 데이터를 불러오지 못했습니다.".to_string(),
            Self::NewsSearchFailed(_) => "뉴스 검색에 실패했습니다.".to_string(),
            Self::GenerationFailed(msg) | Self::NoModelAvailable(msg) => {
                format!("AI 생성에 실패했습니다. 잠시 후 다시 시도해주세요. ({})", msg)
            }
            Self::MalformedOutput(msg) => {
                format!("AI 응답 형식이 올바르지 않습니다. 다시 시도해주세요. ({})", msg)
            }
            Self::Config(_) => "서버 설정에 문제가 있습니다. 관리자에게 문의하세요.".to_string(),
            Self::Timeout => "요청이 너무 오래 걸립니다. 다시 시도해주세요.".to_string(),
            Self::Internal(_) => "서버에 문제가 발생했습니다. 잠시 후 다시 시도해주세요.".to_string(),
        }
    }
}

#[cfg(feature = "ssr")]
mod ssr_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        message: String,
    }

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
                AppError::SheetFetchFailed(_)
                | AppError::NewsSearchFailed(_)
                | AppError::GenerationFailed(_)
                | AppError::NoModelAvailable(_)
                | AppError::MalformedOutput(_) => StatusCode::BAD_GATEWAY,
                AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let message = self.user_message();
            (status, Json(ErrorResponse { message })).into_response()
        }
    }
}
