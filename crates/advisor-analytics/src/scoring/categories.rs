//! 카테고리 점수.
//!
//! 각 카테고리는 0에서 시작해 판독값별 가감점을 더한 뒤 마지막에 [-2, 2]로 제한합니다.
//!
//! | 카테고리 | 구성 |
//! |---|---|
//! | 추세 | MACD ±1.0/±0.5, 히스토그램 기울기 ±0.3, 일목 +1.0/+0.5/-0.7/×0.5, MA 배열 ±0.5, ADX ≥ 25 ×1.3 |
//! | 모멘텀 | 동적 RSI ±1.0, Stochastic RSI ±0.5, RSI 다이버전스 ±0.8 |
//! | 패턴 | 스퀴즈 돌파 +1.0 / 스퀴즈 +0.2, BB 돌파 ±0.5, 스윙 구조 ±0.5, 캔들 보정, 이격도 회귀 ±0.7/±0.3 |
//! | 수급 | OBV 다이버전스 ±1.0, OBV 추세 ±0.3, 옵션 보정 |

use advisor_core::{
    clamp_category, BollingerPosition, Divergence, HistogramSlope, IchimokuRegime, MaTrend,
    MtfAlignment, ObvTrend, RsiSignal, Signal, SqueezeSignal, SwingStructure, ZeroLineFilter,
};

use crate::indicators::{MacdReading, ObvReading};
use crate::regimes::{IchimokuReading, SqueezeReading};

/// ADX 추세 강화 기준.
const ADX_BOOST_THRESHOLD: f64 = 25.0;
const ADX_BOOST: f64 = 1.3;

/// 추세 점수.
pub fn trend_score(macd: &MacdReading, ichimoku: &IchimokuReading, ma_trend: MaTrend, adx: f64) -> f64 {
    let mut score = 0.0;

    // 제로라인 필터와 방향이 어긋나면 절반
    match macd.signal {
        Signal::Bullish => {
            score += if macd.zero_filter() == ZeroLineFilter::AboveZero { 1.0 } else { 0.5 };
        }
        Signal::Bearish => {
            score -= if macd.zero_filter() == ZeroLineFilter::BelowZero { 1.0 } else { 0.5 };
        }
        Signal::Neutral => {}
    }

    match macd.hist_slope() {
        HistogramSlope::Bottoming => score += 0.3,
        HistogramSlope::Topping => score -= 0.3,
        _ => {}
    }

    if ichimoku.sannyaku {
        score += 1.0;
    } else {
        match ichimoku.regime {
            IchimokuRegime::AboveCloud => score += 0.5,
            IchimokuRegime::BelowCloud => score -= 0.7,
            IchimokuRegime::InCloud => score *= 0.5,
            IchimokuRegime::InsufficientData => {}
        }
    }

    match ma_trend {
        MaTrend::Uptrend => score += 0.5,
        MaTrend::Downtrend => score -= 0.5,
        _ => {}
    }

    if adx >= ADX_BOOST_THRESHOLD {
        score *= ADX_BOOST;
    }

    clamp_category(score)
}

/// 모멘텀 점수.
pub fn momentum_score(dynamic_rsi: RsiSignal, stoch_rsi: f64, rsi_divergence: Divergence) -> f64 {
    let mut score = 0.0;

    match dynamic_rsi {
        RsiSignal::Oversold => score += 1.0,
        RsiSignal::Overbought => score -= 1.0,
        RsiSignal::Neutral => {}
    }

    if stoch_rsi <= 20.0 {
        score += 0.5;
    } else if stoch_rsi >= 80.0 {
        score -= 0.5;
    }

    match rsi_divergence {
        Divergence::Bullish => score += 0.8,
        Divergence::Bearish => score -= 0.8,
        Divergence::None => {}
    }

    clamp_category(score)
}

/// 패턴 점수.
pub fn pattern_score(
    squeeze: &SqueezeReading,
    bb_position: BollingerPosition,
    swing: SwingStructure,
    candlestick_adjustment: f64,
    ma_deviation: f64,
) -> f64 {
    let mut score = 0.0;

    if squeeze.signal == SqueezeSignal::ExpansionBreakout {
        score += 1.0;
    } else if squeeze.squeeze {
        score += 0.2;
    }

    match bb_position {
        BollingerPosition::BreakoutBelow => score += 0.5,
        BollingerPosition::BreakoutAbove => score -= 0.5,
        _ => {}
    }

    match swing {
        SwingStructure::HigherHighs => score += 0.5,
        SwingStructure::LowerLows => score -= 0.5,
        _ => {}
    }

    score += candlestick_adjustment;

    // 이격도 평균 회귀
    if ma_deviation < -15.0 {
        score += 0.7;
    } else if ma_deviation < -5.0 {
        score += 0.3;
    } else if ma_deviation > 15.0 {
        score -= 0.7;
    } else if ma_deviation > 5.0 {
        score -= 0.3;
    }

    clamp_category(score)
}

/// 수급 점수. 옵션 보정값은 그대로 더합니다 (옵션 데이터가 없으면 0).
pub fn flow_score(obv: &ObvReading, options_adjustment: f64) -> f64 {
    let mut score = 0.0;

    match obv.divergence {
        Divergence::Bullish => score += 1.0,
        Divergence::Bearish => score -= 1.0,
        Divergence::None => {}
    }

    match obv.trend {
        ObvTrend::Rising => score += 0.3,
        ObvTrend::Falling => score -= 0.3,
        ObvTrend::Flat => {}
    }

    clamp_category(score + options_adjustment)
}

/// 다중 타임프레임 점수 (±1 또는 0).
pub fn timeframe_score(alignment: MtfAlignment) -> f64 {
    match alignment {
        MtfAlignment::AlignedBullish => 1.0,
        MtfAlignment::AlignedBearish => -1.0,
        MtfAlignment::Mixed => 0.0,
    }
}
