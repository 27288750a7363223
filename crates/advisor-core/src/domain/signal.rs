//! 지표 판정 라벨.
//!
//! 각 지표의 분류 결과를 열거형으로 표현합니다. `Display`는 리포트 생성기 등
//! 하위 소비자가 그대로 사용하는 표시 라벨을 출력하고, serde 직렬화는
//! snake_case 식별자를 사용합니다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// `label()`과 `Display`를 한 번에 구현합니다.
macro_rules! impl_label {
    ($ty:ty { $($variant:ident => $label:expr),+ $(,)? }) => {
        impl $ty {
            /// 표시용 라벨.
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

/// 3단계 방향 신호 (종합 판정, MACD, 일목 신호 등).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl_label!(Signal {
    Bullish => "強気",
    Bearish => "弱気",
    Neutral => "中立",
});

impl Signal {
    /// 종합 점수(-100 ~ 100)를 신호로 변환합니다. ±20을 초과해야 방향이 정해집니다.
    pub fn from_score(score: i32) -> Self {
        if score > 20 {
            Signal::Bullish
        } else if score < -20 {
            Signal::Bearish
        } else {
            Signal::Neutral
        }
    }

    /// 강세/약세 개수를 비교해 판정합니다. 같으면 중립.
    pub fn from_counts(bullish: usize, bearish: usize) -> Self {
        match bullish.cmp(&bearish) {
            std::cmp::Ordering::Greater => Signal::Bullish,
            std::cmp::Ordering::Less => Signal::Bearish,
            std::cmp::Ordering::Equal => Signal::Neutral,
        }
    }
}

/// RSI 계열 과매수/과매도 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiSignal {
    Oversold,
    Overbought,
    #[default]
    Neutral,
}

impl_label!(RsiSignal {
    Oversold => "売られすぎ",
    Overbought => "買われすぎ",
    Neutral => "中立",
});

/// 이동평균 이격도 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaDeviationSignal {
    UpperDeviation,
    LowerDeviation,
    #[default]
    Neutral,
}

impl_label!(MaDeviationSignal {
    UpperDeviation => "上方乖離",
    LowerDeviation => "下方乖離",
    Neutral => "中立",
});

/// MA20/50/200 배열 추세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaTrend {
    Uptrend,
    Downtrend,
    Flat,
    /// 200개 미만
    #[default]
    InsufficientData,
}

impl_label!(MaTrend {
    Uptrend => "上昇トレンド",
    Downtrend => "下降トレンド",
    Flat => "横ばい",
    InsufficientData => "データ不足",
});

/// MACD 히스토그램 기울기 (최근 3개 값).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramSlope {
    Bottoming,
    Topping,
    Rising,
    Falling,
    #[default]
    Neutral,
}

impl_label!(HistogramSlope {
    Bottoming => "bottoming",
    Topping => "topping",
    Rising => "rising",
    Falling => "falling",
    Neutral => "neutral",
});

/// MACD 제로라인 필터.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroLineFilter {
    AboveZero,
    #[default]
    BelowZero,
}

impl_label!(ZeroLineFilter {
    AboveZero => "above_zero",
    BelowZero => "below_zero",
});

/// 볼린저 밴드 내 종가 위치.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BollingerPosition {
    BreakoutAbove,
    BreakoutBelow,
    UpperHalf,
    #[default]
    LowerHalf,
}

impl_label!(BollingerPosition {
    BreakoutAbove => "上限突破",
    BreakoutBelow => "下限突破",
    UpperHalf => "上半分",
    LowerHalf => "下半分",
});

impl BollingerPosition {
    /// 밴드 하단 쪽 (하단 돌파 또는 하단 절반).
    pub fn is_lower_side(self) -> bool {
        matches!(self, Self::BreakoutBelow | Self::LowerHalf)
    }

    /// 밴드 상단 쪽 (상단 돌파 또는 상단 절반).
    pub fn is_upper_side(self) -> bool {
        matches!(self, Self::BreakoutAbove | Self::UpperHalf)
    }
}

/// 역추세 매수 구간 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContrarianSignal {
    BuyZone,
    Overheated,
    #[default]
    Watch,
}

impl_label!(ContrarianSignal {
    BuyZone => "買い検討ゾーン",
    Overheated => "過熱警戒",
    Watch => "様子見",
});

/// OBV 추세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObvTrend {
    Rising,
    Falling,
    #[default]
    Flat,
}

impl_label!(ObvTrend {
    Rising => "上昇",
    Falling => "下降",
    Flat => "横ばい",
});

/// 가격과 지표의 다이버전스.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Divergence {
    Bullish,
    Bearish,
    #[default]
    None,
}

impl_label!(Divergence {
    Bullish => "bullish",
    Bearish => "bearish",
    None => "none",
});

/// ADX 추세 강도.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    Strong,
    Weak,
    #[default]
    Range,
}

impl_label!(TrendStrength {
    Strong => "強トレンド",
    Weak => "弱トレンド",
    Range => "レンジ",
});

/// 단일 타임프레임 추세 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeframeSignal {
    Bullish,
    Bearish,
    Neutral,
    #[default]
    InsufficientData,
}

impl_label!(TimeframeSignal {
    Bullish => "強気",
    Bearish => "弱気",
    Neutral => "中立",
    InsufficientData => "データ不足",
});

/// 다중 타임프레임 정렬.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MtfAlignment {
    AlignedBullish,
    AlignedBearish,
    #[default]
    Mixed,
}

impl_label!(MtfAlignment {
    AlignedBullish => "aligned_bullish",
    AlignedBearish => "aligned_bearish",
    Mixed => "mixed",
});

/// 일목균형표 구름 레짐.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IchimokuRegime {
    AboveCloud,
    BelowCloud,
    InCloud,
    /// 52개 미만
    #[default]
    InsufficientData,
}

impl_label!(IchimokuRegime {
    AboveCloud => "above_cloud",
    BelowCloud => "below_cloud",
    InCloud => "in_cloud",
    InsufficientData => "データ不足",
});

/// 볼린저/켈트너 스퀴즈 판정.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqueezeSignal {
    Squeeze,
    ExpansionBreakout,
    Expansion,
    Normal,
    #[default]
    InsufficientData,
}

impl_label!(SqueezeSignal {
    Squeeze => "squeeze",
    ExpansionBreakout => "expansion_breakout",
    Expansion => "expansion",
    Normal => "normal",
    InsufficientData => "データ不足",
});

/// 동적 RSI 레짐 (MA200 기준).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiRegime {
    #[default]
    Bullish,
    Bearish,
}

impl_label!(RsiRegime {
    Bullish => "bullish_regime",
    Bearish => "bearish_regime",
});

/// 스윙 고점/저점 구조.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingStructure {
    HigherHighs,
    LowerLows,
    Range,
    #[default]
    Unknown,
}

impl_label!(SwingStructure {
    HigherHighs => "higher_highs",
    LowerLows => "lower_lows",
    Range => "range",
    Unknown => "unknown",
});

/// 근방 GEX 부호로 본 감마 레짐.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GexRegime {
    PositiveGamma,
    NegativeGamma,
    #[default]
    Unknown,
}

impl_label!(GexRegime {
    PositiveGamma => "positive_gamma",
    NegativeGamma => "negative_gamma",
    Unknown => "unknown",
});

/// 캔들 패턴 인식 요약.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandlestickSummary {
    Bullish,
    Bearish,
    Neutral,
    #[default]
    NoPattern,
    /// 인식기 없음
    Unavailable,
}

impl_label!(CandlestickSummary {
    Bullish => "bullish",
    Bearish => "bearish",
    Neutral => "neutral",
    NoPattern => "パターンなし",
    Unavailable => "ライブラリなし",
});
