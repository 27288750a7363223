//! 분석 엔진의 에러 타입.
//!
//! 이 모듈은 도메인 값 객체 생성과 설정 로드에서 발생하는 에러를 정의합니다.
//! 지표 계산 자체는 에러 대신 중립 기본값을 반환하므로 여기서 다루지 않습니다.

use thiserror::Error;

/// 핵심 도메인 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 가격 시계열 검증 실패 (날짜 역순, 중복 등)
    #[error("잘못된 시계열: {0}")]
    InvalidSeries(String),

    /// 잘못된 입력
    #[error("잘못된 입력: {0}")]
    InvalidInput(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 직렬화 에러
    #[error("직렬화 에러: {0}")]
    Serialization(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_is_localized() {
        let err = CoreError::InvalidInput("strike".to_string());
        assert_eq!(err.to_string(), "잘못된 입력: strike");
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<u32>("not a number").unwrap_err();
        let err: CoreError = parse_err.into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }
}
