//! 가격 계산을 위한 Decimal 유틸리티.
//!
//! 가격 도메인(OHLC, 밴드, 지지/저항)은 `Decimal`로 계산하고,
//! 파생 지표(RSI, 점수, 비율)는 `f64`로 보고합니다. 이 모듈은 두 영역 사이의
//! 변환 규칙을 한 곳에 모읍니다.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;

/// 가격 타입.
pub type Price = Decimal;

/// 거래량 타입.
pub type Volume = Decimal;

/// Decimal 변환을 위한 확장 트레이트.
pub trait DecimalExt {
    /// `f64`로 변환합니다. 표현할 수 없는 값은 0.0이 됩니다.
    fn to_f64_or_zero(&self) -> f64;
}

impl DecimalExt for Decimal {
    fn to_f64_or_zero(&self) -> f64 {
        self.to_f64().filter(|v| v.is_finite()).unwrap_or(0.0)
    }
}

/// `f64`를 Decimal로 변환합니다.
///
/// NaN/무한대 또는 Decimal 범위를 넘는 값은 0이 됩니다. 신호 분류에
/// NaN이 전파되지 않도록 지표 계산 경계에서만 사용합니다.
pub fn decimal_from_f64(value: f64) -> Decimal {
    if !value.is_finite() {
        return Decimal::ZERO;
    }
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}
