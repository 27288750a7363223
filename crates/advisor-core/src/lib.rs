//! # Advisor Core
//!
//! 시장 분석 엔진의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! - 일봉 가격 시계열과 옵션 체인 스냅샷 (입력)
//! - 기술적 분석 결과와 옵션 지표 (출력)
//! - 표시 라벨을 가진 판정 열거형
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
