//! 종목별 기술적 분석 결과.
//!
//! (종목, 기준일) 한 번의 분석 호출마다 새로 만들어지는 값 객체입니다.
//! 생성 이후 엔진은 이 값을 수정하지 않으며 호출 간에 보관하지도 않습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::pattern::{DetectedPattern, FibLevel, SwingPoint};
use super::signal::*;
use crate::error::CoreResult;

/// 카테고리 점수 한계 (±2.0).
pub const CATEGORY_SCORE_LIMIT: f64 = 2.0;

/// 카테고리 점수를 [-2.0, 2.0]으로 제한합니다.
pub fn clamp_category(score: f64) -> f64 {
    score.clamp(-CATEGORY_SCORE_LIMIT, CATEGORY_SCORE_LIMIT)
}

/// 4개 카테고리 점수. 각각 [-2.0, 2.0].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    pub trend: f64,
    pub momentum: f64,
    pub pattern: f64,
    pub flow: f64,
}

/// 다중 타임프레임 판정 상세.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeframeDetails {
    pub daily: TimeframeSignal,
    pub weekly: TimeframeSignal,
    pub monthly: TimeframeSignal,
}

/// 기술적 분석 종합 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalScore {
    // ==================== 기본 지표 ====================
    pub rsi: f64,
    pub rsi_signal: RsiSignal,
    /// MA50 대비 이격도 (%)
    pub ma_deviation: f64,
    pub ma_signal: MaDeviationSignal,
    pub ma_trend: MaTrend,
    pub macd_signal: Signal,
    pub bb_position: BollingerPosition,
    /// 밴드 폭 (% of MA)
    pub bb_width: f64,
    pub atr: Decimal,
    pub atr_percent: f64,
    pub support_price: Decimal,
    pub resistance_price: Decimal,
    /// 종합 점수 [-100, 100]
    pub overall_score: i32,
    pub overall_signal: Signal,
    /// (하단, 상단) = (BB 하단 - ATR, BB 하단)
    pub contrarian_buy_zone: (Decimal, Decimal),
    pub contrarian_signal: ContrarianSignal,

    // ==================== 확장 지표 ====================
    pub obv_trend: ObvTrend,
    pub obv_divergence: Divergence,
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub adx_signal: TrendStrength,
    pub stoch_rsi: f64,
    pub stoch_rsi_signal: RsiSignal,
    pub fib_levels: Vec<FibLevel>,
    pub fib_nearest_ratio: Decimal,
    pub mtf_alignment: MtfAlignment,
    pub mtf_details: TimeframeDetails,
    pub divergence_rsi: Divergence,
    pub divergence_macd: Divergence,
    pub macd_hist_slope: HistogramSlope,
    pub macd_zero_filter: ZeroLineFilter,

    // ==================== 레짐 ====================
    pub rsi_regime: RsiRegime,
    pub rsi_dynamic_signal: RsiSignal,
    pub bb_squeeze: bool,
    pub bb_squeeze_signal: SqueezeSignal,
    pub bb_bandwidth_percentile: f64,
    pub ichimoku_regime: IchimokuRegime,
    pub ichimoku_sannyaku: bool,
    pub ichimoku_signal: Signal,
    pub avwap_ytd: f64,
    pub avwap_deviation: f64,

    // ==================== 패턴 ====================
    pub recent_peaks: Vec<SwingPoint>,
    pub recent_valleys: Vec<SwingPoint>,
    pub swing_structure: SwingStructure,
    pub candlestick_patterns: Vec<DetectedPattern>,
    pub candlestick_summary: CandlestickSummary,

    // ==================== 옵션 ====================
    pub gex_regime: GexRegime,
    pub gex_positive_wall: Option<f64>,
    pub gex_negative_wall: Option<f64>,
    pub pcr_ratio: Option<f64>,
    pub pcr_signal: Signal,
    pub atm_iv: Option<f64>,
    pub max_pain: Option<f64>,

    pub category_scores: CategoryScores,
}

impl TechnicalScore {
    /// 리포트 생성기 전달용 JSON.
    pub fn to_json(&self) -> CoreResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
