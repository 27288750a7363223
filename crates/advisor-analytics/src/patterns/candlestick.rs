//! 캔들스틱 패턴 인식.
//!
//! 인식기는 `CandlestickRecognizer` 트레이트로 주입됩니다. 인식기가 없는 환경에서는
//! `UnavailableRecognizer`를 사용하며, 이 경우 결과는 `Unavailable`이고
//! 점수 영향은 0입니다.
//!
//! ## 지원 패턴 (최신 봉 기준)
//! - 장악형, 망치형, 역망치형, 샛별형, 석별형
//! - 적삼병, 흑삼병, 도지, 유성형, 교수형
//!
//! ## 점수 보정
//! 패턴당 ±0.3을 기본으로 RSI 극단과 볼린저 위치에 따라 가중한 뒤
//! 합계를 [-0.5, 0.5]로 제한합니다.

use advisor_core::{
    decimal_from_f64, Bar, BollingerPosition, CandlestickConfig, CandlestickPattern,
    CandlestickSummary, DetectedPattern,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 패턴 하나의 기본 점수.
const PATTERN_WEIGHT: f64 = 0.3;

/// 점수 보정 한계.
const ADJUSTMENT_LIMIT: f64 = 0.5;

/// 캔들스틱 패턴 인식 능력.
///
/// `None`은 인식기를 사용할 수 없음을 뜻합니다 (패턴이 없다는 뜻이 아님).
pub trait CandlestickRecognizer: Send + Sync {
    fn detect(&self, bars: &[Bar]) -> Option<Vec<DetectedPattern>>;
}

/// 인식기가 없는 환경용 구현.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableRecognizer;

impl CandlestickRecognizer for UnavailableRecognizer {
    fn detect(&self, _bars: &[Bar]) -> Option<Vec<DetectedPattern>> {
        None
    }
}

/// 규칙 기반 인식기 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CandlestickParams {
    /// 도지 몸통 비율 (기본: 0.1).
    pub doji_body_ratio: Decimal,
    /// 망치형 그림자/몸통 비율 (기본: 2.0).
    pub shadow_ratio: Decimal,
    /// 추세 확인 기간 (기본: 5).
    pub trend_period: usize,
}

impl Default for CandlestickParams {
    fn default() -> Self {
        Self {
            doji_body_ratio: dec!(0.1),
            shadow_ratio: dec!(2.0),
            trend_period: 5,
        }
    }
}

/// 직전 추세 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PriorTrend {
    Up,
    Down,
    Flat,
}

/// 규칙 기반 캔들스틱 인식기.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedRecognizer {
    params: CandlestickParams,
}

impl RuleBasedRecognizer {
    pub fn new(params: CandlestickParams) -> Self {
        Self { params }
    }

    /// 설정 파일의 `[candlestick]` 섹션으로 생성합니다.
    pub fn from_config(config: &CandlestickConfig) -> Self {
        Self::new(CandlestickParams {
            doji_body_ratio: decimal_from_f64(config.doji_body_ratio),
            shadow_ratio: decimal_from_f64(config.shadow_ratio),
            trend_period: config.trend_period,
        })
    }

    /// `index` 시점 직전 추세. 기간 대비 ±2% 이상 움직였는지로 판단합니다.
    fn prior_trend(&self, bars: &[Bar], index: usize) -> PriorTrend {
        let period = self.params.trend_period;
        if period == 0 || index < period {
            return PriorTrend::Flat;
        }

        let current = bars[index].close;
        let past = bars[index - period].close;

        if current > past * dec!(1.02) {
            PriorTrend::Up
        } else if current < past * dec!(0.98) {
            PriorTrend::Down
        } else {
            PriorTrend::Flat
        }
    }

    fn is_doji(&self, bar: &Bar) -> bool {
        let range = bar.range();
        range > Decimal::ZERO && bar.body_size() <= range * self.params.doji_body_ratio
    }

    /// 긴 아래꼬리, 짧은 위꼬리.
    fn has_hammer_shape(&self, bar: &Bar) -> bool {
        let body = bar.body_size();
        body > Decimal::ZERO
            && lower_shadow(bar) >= body * self.params.shadow_ratio
            && upper_shadow(bar) < body * dec!(0.5)
    }

    /// 긴 위꼬리, 짧은 아래꼬리.
    fn has_inverted_shape(&self, bar: &Bar) -> bool {
        let body = bar.body_size();
        body > Decimal::ZERO
            && upper_shadow(bar) >= body * self.params.shadow_ratio
            && lower_shadow(bar) < body * dec!(0.5)
    }

    fn engulfing(prev: &Bar, bar: &Bar) -> Option<DetectedPattern> {
        if is_bearish(prev)
            && bar.is_bullish()
            && bar.open < prev.close
            && bar.close > prev.open
        {
            Some(DetectedPattern::bullish(CandlestickPattern::Engulfing))
        } else if prev.is_bullish()
            && is_bearish(bar)
            && bar.open > prev.close
            && bar.close < prev.open
        {
            Some(DetectedPattern::bearish(CandlestickPattern::Engulfing))
        } else {
            None
        }
    }

    /// 큰 음봉 → 작은 몸통 → 첫 봉 몸통 중간 위로 마감하는 양봉.
    fn is_morning_star(first: &Bar, second: &Bar, third: &Bar) -> bool {
        is_bearish(first)
            && second.body_size() <= first.body_size() * dec!(0.3)
            && second.open.max(second.close) < first.close
            && third.is_bullish()
            && third.close > (first.open + first.close) / dec!(2)
    }

    /// 큰 양봉 → 작은 몸통 → 첫 봉 몸통 중간 아래로 마감하는 음봉.
    fn is_evening_star(first: &Bar, second: &Bar, third: &Bar) -> bool {
        first.is_bullish()
            && second.body_size() <= first.body_size() * dec!(0.3)
            && second.open.min(second.close) > first.close
            && is_bearish(third)
            && third.close < (first.open + first.close) / dec!(2)
    }

    /// 연속 3양봉, 종가 상승, 시가는 직전 몸통 안.
    fn is_three_white_soldiers(bars: &[Bar]) -> bool {
        bars.iter().all(Bar::is_bullish)
            && bars.windows(2).all(|w| {
                w[1].close > w[0].close && w[1].open >= w[0].open && w[1].open <= w[0].close
            })
    }

    /// 연속 3음봉, 종가 하락, 시가는 직전 몸통 안.
    fn is_three_black_crows(bars: &[Bar]) -> bool {
        bars.iter().all(is_bearish)
            && bars.windows(2).all(|w| {
                w[1].close < w[0].close && w[1].open <= w[0].open && w[1].open >= w[0].close
            })
    }
}

impl CandlestickRecognizer for RuleBasedRecognizer {
    fn detect(&self, bars: &[Bar]) -> Option<Vec<DetectedPattern>> {
        let Some(last_index) = bars.len().checked_sub(1) else {
            return Some(Vec::new());
        };
        let bar = &bars[last_index];
        let trend = self.prior_trend(bars, last_index);
        let mut detected = Vec::new();

        for pattern in CandlestickPattern::ALL {
            let hit = match pattern {
                CandlestickPattern::Engulfing => match last_index.checked_sub(1) {
                    Some(prev) => Self::engulfing(&bars[prev], bar),
                    None => None,
                },
                CandlestickPattern::Hammer => (trend == PriorTrend::Down && self.has_hammer_shape(bar))
                    .then(|| DetectedPattern::bullish(pattern)),
                CandlestickPattern::InvertedHammer => {
                    (trend == PriorTrend::Down && self.has_inverted_shape(bar))
                        .then(|| DetectedPattern::bullish(pattern))
                }
                CandlestickPattern::MorningStar => last_three(bars)
                    .filter(|w| Self::is_morning_star(&w[0], &w[1], &w[2]))
                    .map(|_| DetectedPattern::bullish(pattern)),
                CandlestickPattern::EveningStar => last_three(bars)
                    .filter(|w| Self::is_evening_star(&w[0], &w[1], &w[2]))
                    .map(|_| DetectedPattern::bearish(pattern)),
                CandlestickPattern::ThreeWhiteSoldiers => last_three(bars)
                    .filter(|w| Self::is_three_white_soldiers(w))
                    .map(|_| DetectedPattern::bullish(pattern)),
                CandlestickPattern::ThreeBlackCrows => last_three(bars)
                    .filter(|w| Self::is_three_black_crows(w))
                    .map(|_| DetectedPattern::bearish(pattern)),
                // 도지는 양의 신호로 보고합니다
                CandlestickPattern::Doji => self.is_doji(bar).then(|| DetectedPattern::bullish(pattern)),
                CandlestickPattern::ShootingStar => {
                    (trend == PriorTrend::Up && self.has_inverted_shape(bar))
                        .then(|| DetectedPattern::bearish(pattern))
                }
                CandlestickPattern::HangingMan => (trend == PriorTrend::Up && self.has_hammer_shape(bar))
                    .then(|| DetectedPattern::bearish(pattern)),
            };

            if let Some(p) = hit {
                detected.push(p);
            }
        }

        Some(detected)
    }
}

fn upper_shadow(bar: &Bar) -> Decimal {
    bar.high - bar.open.max(bar.close)
}

fn lower_shadow(bar: &Bar) -> Decimal {
    bar.open.min(bar.close) - bar.low
}

fn is_bearish(bar: &Bar) -> bool {
    bar.close < bar.open
}

/// 마지막 3봉.
fn last_three(bars: &[Bar]) -> Option<&[Bar]> {
    bars.len().checked_sub(3).map(|start| &bars[start..])
}

/// 캔들스틱 인식 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CandlestickResult {
    /// 인식기 없음 (점수 영향 0)
    Unavailable,
    /// 최신 봉에서 패턴 없음
    NoPattern,
    Detected {
        patterns: Vec<DetectedPattern>,
        summary: CandlestickSummary,
        score_adjustment: f64,
    },
}

impl CandlestickResult {
    pub fn summary(&self) -> CandlestickSummary {
        match self {
            Self::Unavailable => CandlestickSummary::Unavailable,
            Self::NoPattern => CandlestickSummary::NoPattern,
            Self::Detected { summary, .. } => *summary,
        }
    }

    pub fn score_adjustment(&self) -> f64 {
        match self {
            Self::Detected {
                score_adjustment, ..
            } => *score_adjustment,
            _ => 0.0,
        }
    }

    pub fn patterns(&self) -> &[DetectedPattern] {
        match self {
            Self::Detected { patterns, .. } => patterns,
            _ => &[],
        }
    }
}

/// 인식기를 실행하고 RSI/볼린저 위치로 점수를 보정합니다.
pub fn recognize_candlesticks(
    recognizer: &dyn CandlestickRecognizer,
    bars: &[Bar],
    rsi: f64,
    bb_position: BollingerPosition,
) -> CandlestickResult {
    let Some(patterns) = recognizer.detect(bars) else {
        debug!("캔들 패턴 인식기 없음");
        return CandlestickResult::Unavailable;
    };

    if patterns.is_empty() {
        return CandlestickResult::NoPattern;
    }

    let score_adjustment = score_patterns(&patterns, rsi, bb_position);

    let bullish = patterns.iter().filter(|p| p.is_bullish()).count();
    let bearish = patterns.len() - bullish;
    let summary = if bullish > bearish {
        CandlestickSummary::Bullish
    } else if bearish > bullish {
        CandlestickSummary::Bearish
    } else {
        CandlestickSummary::Neutral
    };

    CandlestickResult::Detected {
        patterns,
        summary,
        score_adjustment,
    }
}

/// 패턴별 점수를 합산해 [-0.5, 0.5]로 제한합니다.
///
/// - 강세 패턴: RSI < 35이면 ×1.5, RSI > 65이면 ×0.3, 하단 쪽 볼린저 위치면 ×1.3
/// - 약세 패턴: RSI > 65이면 ×1.5, RSI < 35이면 ×0.3, 상단 쪽 볼린저 위치면 ×1.3
pub fn score_patterns(patterns: &[DetectedPattern], rsi: f64, bb_position: BollingerPosition) -> f64 {
    let total: f64 = patterns
        .iter()
        .map(|p| {
            if p.is_bullish() {
                let mut raw = PATTERN_WEIGHT;
                if rsi < 35.0 {
                    raw *= 1.5;
                } else if rsi > 65.0 {
                    raw *= 0.3;
                }
                if bb_position.is_lower_side() {
                    raw *= 1.3;
                }
                raw
            } else {
                let mut raw = -PATTERN_WEIGHT;
                if rsi > 65.0 {
                    raw *= 1.5;
                } else if rsi < 35.0 {
                    raw *= 0.3;
                }
                if bb_position.is_upper_side() {
                    raw *= 1.3;
                }
                raw
            }
        })
        .sum();

    total.clamp(-ADJUSTMENT_LIMIT, ADJUSTMENT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(day: u32, open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Bar {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        Bar::new(date, open, high, low, close, dec!(1000))
    }

    /// 5봉 하락 뒤 마지막 봉을 붙입니다.
    fn downtrend_then(last: Bar) -> Vec<Bar> {
        let mut bars: Vec<Bar> = (0..6)
            .map(|i| {
                let close = dec!(110) - Decimal::from(i * 2);
                bar(i + 1, close + dec!(1), close + dec!(1.5), close - dec!(0.5), close)
            })
            .collect();
        bars.push(last);
        bars
    }

    #[test]
    fn test_unavailable_recognizer() {
        let result = recognize_candlesticks(
            &UnavailableRecognizer,
            &[],
            50.0,
            BollingerPosition::LowerHalf,
        );
        assert_eq!(result, CandlestickResult::Unavailable);
        assert_eq!(result.summary(), CandlestickSummary::Unavailable);
        assert_eq!(result.score_adjustment(), 0.0);
    }

    #[test]
    fn test_hammer_after_downtrend() {
        // 몸통 0.5, 아래꼬리 3.0, 위꼬리 0.1
        let hammer = bar(10, dec!(97.5), dec!(98.1), dec!(94.5), dec!(98));
        let bars = downtrend_then(hammer);

        let patterns = RuleBasedRecognizer::default().detect(&bars).unwrap();
        assert!(patterns.contains(&DetectedPattern::bullish(CandlestickPattern::Hammer)));
        assert!(!patterns.iter().any(|p| p.pattern == CandlestickPattern::HangingMan));
    }

    #[test]
    fn test_recognizer_from_config() {
        let hammer = bar(10, dec!(97.5), dec!(98.1), dec!(94.5), dec!(98));
        let bars = downtrend_then(hammer);

        let default = RuleBasedRecognizer::from_config(&CandlestickConfig::default());
        let patterns = default.detect(&bars).unwrap();
        assert!(patterns.contains(&DetectedPattern::bullish(CandlestickPattern::Hammer)));

        // 아래꼬리 3.0 < 몸통 0.5 × 10
        let strict = RuleBasedRecognizer::from_config(&CandlestickConfig {
            shadow_ratio: 10.0,
            ..Default::default()
        });
        let patterns = strict.detect(&bars).unwrap();
        assert!(!patterns.iter().any(|p| p.pattern == CandlestickPattern::Hammer));
    }

    #[test]
    fn test_bullish_engulfing() {
        let prev = bar(1, dec!(102), dec!(102.5), dec!(99.5), dec!(100));
        let last = bar(2, dec!(99), dec!(104), dec!(98.5), dec!(103));

        let patterns = RuleBasedRecognizer::default().detect(&[prev, last]).unwrap();
        assert_eq!(
            patterns,
            vec![DetectedPattern::bullish(CandlestickPattern::Engulfing)]
        );
    }

    #[test]
    fn test_three_white_soldiers() {
        let bars = vec![
            bar(1, dec!(100), dec!(103.2), dec!(99.8), dec!(103)),
            bar(2, dec!(102), dec!(106.2), dec!(101.8), dec!(106)),
            bar(3, dec!(105), dec!(109.2), dec!(104.8), dec!(109)),
        ];
        let patterns = RuleBasedRecognizer::default().detect(&bars).unwrap();
        assert!(patterns.contains(&DetectedPattern::bullish(CandlestickPattern::ThreeWhiteSoldiers)));
    }

    #[test]
    fn test_no_pattern_on_plain_bar() {
        let bars = vec![
            bar(1, dec!(100), dec!(101.2), dec!(99.8), dec!(101)),
            bar(2, dec!(101), dec!(101.5), dec!(99.5), dec!(100)),
        ];
        let result = recognize_candlesticks(
            &RuleBasedRecognizer::default(),
            &bars,
            50.0,
            BollingerPosition::UpperHalf,
        );
        assert_eq!(result, CandlestickResult::NoPattern);
        assert_eq!(result.summary().label(), "パターンなし");
    }

    #[test]
    fn test_score_weights() {
        let bullish = [DetectedPattern::bullish(CandlestickPattern::Hammer)];
        // 0.3 × 1.5 × 1.3 = 0.585 → 0.5로 제한
        assert_eq!(score_patterns(&bullish, 30.0, BollingerPosition::BreakoutBelow), 0.5);
        // 0.3 × 0.3
        assert!((score_patterns(&bullish, 70.0, BollingerPosition::UpperHalf) - 0.09).abs() < 1e-12);

        let bearish = [DetectedPattern::bearish(CandlestickPattern::ShootingStar)];
        assert!((score_patterns(&bearish, 50.0, BollingerPosition::UpperHalf) + 0.39).abs() < 1e-12);
        assert!((score_patterns(&bearish, 30.0, BollingerPosition::LowerHalf) + 0.09).abs() < 1e-12);
    }

    #[test]
    fn test_mixed_patterns_summary_neutral() {
        struct Fixed;
        impl CandlestickRecognizer for Fixed {
            fn detect(&self, _bars: &[Bar]) -> Option<Vec<DetectedPattern>> {
                Some(vec![
                    DetectedPattern::bullish(CandlestickPattern::Doji),
                    DetectedPattern::bearish(CandlestickPattern::EveningStar),
                ])
            }
        }

        let result = recognize_candlesticks(&Fixed, &[], 50.0, BollingerPosition::UpperHalf);
        assert_eq!(result.summary(), CandlestickSummary::Neutral);
        assert_eq!(result.patterns().len(), 2);
        // 0.3 - 0.39
        assert!((result.score_adjustment() + 0.09).abs() < 1e-12);
    }
}
