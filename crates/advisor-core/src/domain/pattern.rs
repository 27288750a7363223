//! 패턴 인식 결과 값 객체.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 인식 대상 캔들스틱 패턴.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlestickPattern {
    /// 장악형 (강세/약세 모두)
    Engulfing,
    /// 망치형
    Hammer,
    /// 역망치형
    InvertedHammer,
    /// 샛별형 (3봉)
    MorningStar,
    /// 석별형 (3봉)
    EveningStar,
    /// 적삼병
    ThreeWhiteSoldiers,
    /// 흑삼병
    ThreeBlackCrows,
    /// 도지
    Doji,
    /// 유성형
    ShootingStar,
    /// 교수형
    HangingMan,
}

impl CandlestickPattern {
    /// 인식 순서가 고정된 전체 패턴 목록.
    pub const ALL: [CandlestickPattern; 10] = [
        CandlestickPattern::Engulfing,
        CandlestickPattern::Hammer,
        CandlestickPattern::InvertedHammer,
        CandlestickPattern::MorningStar,
        CandlestickPattern::EveningStar,
        CandlestickPattern::ThreeWhiteSoldiers,
        CandlestickPattern::ThreeBlackCrows,
        CandlestickPattern::Doji,
        CandlestickPattern::ShootingStar,
        CandlestickPattern::HangingMan,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Engulfing => "engulfing",
            Self::Hammer => "hammer",
            Self::InvertedHammer => "invertedhammer",
            Self::MorningStar => "morningstar",
            Self::EveningStar => "eveningstar",
            Self::ThreeWhiteSoldiers => "3whitesoldiers",
            Self::ThreeBlackCrows => "3blackcrows",
            Self::Doji => "doji",
            Self::ShootingStar => "shootingstar",
            Self::HangingMan => "hangingman",
        }
    }
}

impl fmt::Display for CandlestickPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 패턴 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternDirection {
    Bullish,
    Bearish,
}

/// 감지된 캔들 패턴 하나.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedPattern {
    pub pattern: CandlestickPattern,
    pub direction: PatternDirection,
}

impl DetectedPattern {
    pub fn bullish(pattern: CandlestickPattern) -> Self {
        Self {
            pattern,
            direction: PatternDirection::Bullish,
        }
    }

    pub fn bearish(pattern: CandlestickPattern) -> Self {
        Self {
            pattern,
            direction: PatternDirection::Bearish,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.direction == PatternDirection::Bullish
    }
}

/// 스윙 고점 또는 저점.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwingPoint {
    /// 시계열 내 인덱스
    pub index: usize,
    pub price: Decimal,
}

/// 피보나치 되돌림 레벨.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibLevel {
    /// 비율 (0, 0.236, ..., 1)
    pub ratio: Decimal,
    /// 레벨 가격
    pub price: Decimal,
}
