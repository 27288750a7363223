//! 종합 점수 산출 방식.
//!
//! - **Categorical** (기본): 카테고리 점수 가중 합 × 50 → [-100, 100] 제한 후 소수점 버림.
//!   GEX 레짐이 양(+)이면 추세 가중치 0.10을 모멘텀으로, 음(-)이면 반대로 옮깁니다.
//! - **Additive**: 0에서 시작해 RSI ±30, 이격도 × -2, MACD ±20을 순서대로 더하며
//!   단계마다 [-100, 100]으로 제한합니다.

use advisor_core::{CategoryScores, CategoryWeights, GexRegime, Signal};

/// 종합 점수 한계.
pub const OVERALL_SCORE_LIMIT: f64 = 100.0;

/// 감마 레짐에 따라 이동하는 가중치.
const REGIME_WEIGHT_SHIFT: f64 = 0.10;

/// 카테고리 가중 합 → 점수 배율.
const CATEGORY_SCALE: f64 = 50.0;

fn clamp_overall(score: f64) -> f64 {
    score.clamp(-OVERALL_SCORE_LIMIT, OVERALL_SCORE_LIMIT)
}

/// GEX 레짐 반영 가중치.
///
/// 양(+) 감마: 변동성 억제 구간이라 모멘텀(평균 회귀) 비중을 높입니다.
/// 음(-) 감마: 추세 가속 구간이라 추세 비중을 높입니다.
pub fn regime_weights(base: CategoryWeights, regime: GexRegime) -> CategoryWeights {
    match regime {
        GexRegime::PositiveGamma => {
            let shift = REGIME_WEIGHT_SHIFT.min(base.trend);
            CategoryWeights {
                trend: base.trend - shift,
                momentum: base.momentum + shift,
                ..base
            }
        }
        GexRegime::NegativeGamma => {
            let shift = REGIME_WEIGHT_SHIFT.min(base.momentum);
            CategoryWeights {
                trend: base.trend + shift,
                momentum: base.momentum - shift,
                ..base
            }
        }
        GexRegime::Unknown => base,
    }
}

/// 카테고리 가중 합산 점수.
pub fn categorical_score(
    scores: &CategoryScores,
    timeframe_score: f64,
    weights: CategoryWeights,
    regime: GexRegime,
) -> i32 {
    let w = regime_weights(weights, regime);
    let weighted = scores.trend * w.trend
        + scores.momentum * w.momentum
        + scores.pattern * w.pattern
        + scores.flow * w.flow
        + timeframe_score * w.timeframe;

    clamp_overall(weighted * CATEGORY_SCALE) as i32
}

/// RSI/이격도/MACD 가산 점수 (단계별 제한).
pub fn additive_score(rsi: f64, ma_deviation: f64, macd_signal: Signal) -> i32 {
    let mut score = 0.0;

    if rsi < 30.0 {
        score += 30.0;
    } else if rsi > 70.0 {
        score -= 30.0;
    }
    score = clamp_overall(score);

    score = clamp_overall(score - ma_deviation * 2.0);

    match macd_signal {
        Signal::Bullish => score += 20.0,
        Signal::Bearish => score -= 20.0,
        Signal::Neutral => {}
    }
    clamp_overall(score) as i32
}
