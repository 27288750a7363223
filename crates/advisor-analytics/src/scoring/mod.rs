//! Technical Scoring Engine.
//!
//! 가격 시계열 하나에서 모든 지표/레짐/패턴 판독을 계산하고 4개 카테고리 점수와
//! 종합 점수를 담은 [`TechnicalScore`]를 만듭니다.
//!
//! 개별 판독은 데이터가 부족해도 에러 없이 중립 기본값을 사용하므로, 분석 불가
//! (`None`)는 시계열이 비어 있을 때뿐입니다. 옵션 분석 결과는 선택 입력이며
//! 없으면 수급 보정 0, GEX 레짐 `Unknown`으로 처리합니다.

mod basket;
mod categories;
mod strategy;
mod summary;

pub use basket::IndexTechnicals;
pub use categories::{flow_score, momentum_score, pattern_score, timeframe_score, trend_score};
pub use strategy::{additive_score, categorical_score, regime_weights, OVERALL_SCORE_LIMIT};
pub use summary::technical_summary;

use advisor_core::{
    decimal_from_f64, AnalyticsConfig, CategoryScores, GexRegime, IndicatorConfig, PriceSeries,
    ScoringConfig, ScoringStrategy, SentimentConfig, Signal, TechnicalScore,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::indicators::{
    classify_ma_deviation, classify_rsi, contrarian_signal, contrarian_zone, detect_divergence,
    fibonacci_levels, support_resistance, AdxParams, AtrParams, AtrSmoothing, BollingerBandsParams,
    DirectionalIndicators, MacdParams, MacdVariant, MomentumCalculator, ObvIndicator, ObvParams,
    RsiParams, StochRsiParams, TrendIndicators, VolatilityIndicators,
};
use crate::options::OptionsAnalysis;
use crate::patterns::{
    detect_swings, recognize_candlesticks, CandlestickRecognizer, RuleBasedRecognizer, SwingParams,
};
use crate::regimes::{anchored_vwap, bb_squeeze, dynamic_rsi, ichimoku_regime, SqueezeParams, VwapAnchor};
use crate::timeframe_alignment::multi_timeframe_alignment;

/// 기술적 분석기.
///
/// 상태를 갖지 않으며 `Send + Sync`이므로 종목별 병렬 호출이 가능합니다.
pub struct TechnicalAnalyzer {
    indicators: IndicatorConfig,
    scoring: ScoringConfig,
    recognizer: Box<dyn CandlestickRecognizer>,
    basket: Vec<String>,
}

impl std::fmt::Debug for TechnicalAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechnicalAnalyzer")
            .field("indicators", &self.indicators)
            .field("scoring", &self.scoring)
            .field("basket", &self.basket)
            .finish_non_exhaustive()
    }
}

impl Default for TechnicalAnalyzer {
    fn default() -> Self {
        Self::new(IndicatorConfig::default(), ScoringConfig::default())
    }
}

impl TechnicalAnalyzer {
    /// 규칙 기반 캔들 인식기를 사용하는 분석기.
    pub fn new(indicators: IndicatorConfig, scoring: ScoringConfig) -> Self {
        Self {
            indicators,
            scoring,
            recognizer: Box::new(RuleBasedRecognizer::default()),
            basket: SentimentConfig::default().basket,
        }
    }

    /// 설정 파일의 `[indicators]`, `[scoring]`, `[candlestick]` 섹션과
    /// `[sentiment]`의 바스켓으로 생성합니다.
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(config.indicators.clone(), config.scoring.clone())
            .with_recognizer(RuleBasedRecognizer::from_config(&config.candlestick))
            .with_basket(config.sentiment.basket.clone())
    }

    /// 캔들 인식기를 교체합니다.
    pub fn with_recognizer(mut self, recognizer: impl CandlestickRecognizer + 'static) -> Self {
        self.recognizer = Box::new(recognizer);
        self
    }

    /// 종합 점수 산출 방식을 바꿉니다.
    pub fn with_strategy(mut self, strategy: ScoringStrategy) -> Self {
        self.scoring.strategy = strategy;
        self
    }

    /// 종목 컨텍스트 span 안에서 분석합니다.
    pub fn analyze_ticker(
        &self,
        ticker: &str,
        series: &PriceSeries,
        options: Option<&OptionsAnalysis>,
    ) -> Option<TechnicalScore> {
        let as_of = series
            .last()
            .map(|b| b.date.to_string())
            .unwrap_or_default();
        let span = advisor_core::analysis_span!("technical_analysis", ticker, as_of);
        let _guard = span.enter();

        self.analyze(series, options)
    }

    /// 가격 시계열 분석. 시계열이 비어 있으면 `None`.
    pub fn analyze(&self, series: &PriceSeries, options: Option<&OptionsAnalysis>) -> Option<TechnicalScore> {
        let close = series.last()?.close;
        let cfg = &self.indicators;

        let closes = series.closes();
        let highs = series.highs();
        let lows = series.lows();
        let volumes = series.volumes();

        let trend = TrendIndicators::new();
        let momentum = MomentumCalculator::new();
        let volatility = VolatilityIndicators::new();

        // ==================== 기본 지표 ====================
        let rsi_params = RsiParams {
            period: cfg.rsi_period,
        };
        let rsi = momentum.rsi_value(&closes, rsi_params);
        let ma_deviation = trend.ma_deviation(&closes, cfg.ma_deviation_period);
        let ma_trend = trend.ma_trend(&closes);
        let macd = trend.macd_reading(&closes, MacdParams::default(), MacdVariant::Extended);

        let bb = volatility.bollinger_reading(
            &closes,
            BollingerBandsParams {
                period: cfg.bb_period,
                std_dev_multiplier: decimal_from_f64(cfg.bb_std_dev),
            },
        );
        let atr = volatility.atr_reading(
            &highs,
            &lows,
            &closes,
            AtrParams {
                period: cfg.atr_period,
                smoothing: AtrSmoothing::Simple,
            },
        );
        let levels = support_resistance(&closes, cfg.support_window);
        let zone = contrarian_zone(&bb, atr.atr);

        // ==================== 확장 지표 ====================
        let obv = ObvIndicator::new().reading(
            &closes,
            &volumes,
            ObvParams {
                ma_period: cfg.obv_ma_period,
                divergence_lookback: cfg.divergence_lookback,
                ..Default::default()
            },
        );
        let adx = DirectionalIndicators::new().reading(
            &highs,
            &lows,
            &closes,
            AdxParams {
                period: cfg.adx_period,
            },
        );
        let stoch = momentum.stochastic_rsi_reading(
            &closes,
            StochRsiParams {
                rsi_period: cfg.rsi_period,
                stoch_period: cfg.stoch_rsi_period,
            },
        );
        let fib = fibonacci_levels(&highs, &lows, &closes);
        let mtf = multi_timeframe_alignment(series);

        let rolling_rsi = momentum.rolling_rsi(&closes, rsi_params).unwrap_or_default();
        let divergence_rsi = detect_divergence(&closes, &rolling_rsi, cfg.divergence_lookback);
        let macd_line: Vec<Option<Decimal>> = trend
            .macd(&closes, MacdParams::default())
            .map(|series| series.iter().map(|r| r.macd).collect())
            .unwrap_or_default();
        let divergence_macd = detect_divergence(&closes, &macd_line, cfg.divergence_lookback);

        // ==================== 레짐 / 패턴 ====================
        let ichimoku = ichimoku_regime(&highs, &lows, &closes);
        let squeeze = bb_squeeze(&highs, &lows, &closes, SqueezeParams::default());
        let dyn_rsi = dynamic_rsi(&closes, rsi);
        let avwap = anchored_vwap(series, VwapAnchor::YearStart);
        let swings = detect_swings(&highs, &lows, SwingParams::default());
        let candles = recognize_candlesticks(self.recognizer.as_ref(), series.bars(), rsi, bb.position);

        // ==================== 옵션 ====================
        let options_adjustment = options.map(|o| o.score_adjustment).unwrap_or(0.0);
        let gex_regime = options.map(|o| o.gex_regime).unwrap_or(GexRegime::Unknown);
        let metrics = options.map(|o| &o.metrics);
        let gex = metrics.and_then(|m| m.gex.as_ref());

        // ==================== 점수 ====================
        let category_scores = CategoryScores {
            trend: trend_score(&macd, &ichimoku, ma_trend, adx.adx),
            momentum: momentum_score(dyn_rsi.signal, stoch.value, divergence_rsi),
            pattern: pattern_score(
                &squeeze,
                bb.position,
                swings.structure,
                candles.score_adjustment(),
                ma_deviation,
            ),
            flow: flow_score(&obv, options_adjustment),
        };

        let overall_score = match self.scoring.strategy {
            ScoringStrategy::Categorical => categorical_score(
                &category_scores,
                timeframe_score(mtf.alignment),
                self.scoring.weights,
                gex_regime,
            ),
            ScoringStrategy::Additive => additive_score(rsi, ma_deviation, macd.signal),
        };
        let overall_signal = Signal::from_score(overall_score);

        debug!(
            overall_score,
            %overall_signal,
            trend = category_scores.trend,
            momentum = category_scores.momentum,
            pattern = category_scores.pattern,
            flow = category_scores.flow,
            "기술적 분석 완료"
        );

        Some(TechnicalScore {
            rsi,
            rsi_signal: classify_rsi(rsi),
            ma_deviation,
            ma_signal: classify_ma_deviation(ma_deviation),
            ma_trend,
            macd_signal: macd.signal,
            bb_position: bb.position,
            bb_width: bb.width,
            atr: atr.atr,
            atr_percent: atr.atr_percent,
            support_price: levels.support,
            resistance_price: levels.resistance,
            overall_score,
            overall_signal,
            contrarian_buy_zone: zone,
            contrarian_signal: contrarian_signal(close, zone, rsi, &bb),

            obv_trend: obv.trend,
            obv_divergence: obv.divergence,
            adx: adx.adx,
            plus_di: adx.plus_di,
            minus_di: adx.minus_di,
            adx_signal: adx.signal,
            stoch_rsi: stoch.value,
            stoch_rsi_signal: stoch.signal,
            fib_levels: fib.levels,
            fib_nearest_ratio: fib.nearest_ratio,
            mtf_alignment: mtf.alignment,
            mtf_details: mtf.details,
            divergence_rsi,
            divergence_macd,
            macd_hist_slope: macd.hist_slope(),
            macd_zero_filter: macd.zero_filter(),

            rsi_regime: dyn_rsi.regime,
            rsi_dynamic_signal: dyn_rsi.signal,
            bb_squeeze: squeeze.squeeze,
            bb_squeeze_signal: squeeze.signal,
            bb_bandwidth_percentile: squeeze.bandwidth_percentile,
            ichimoku_regime: ichimoku.regime,
            ichimoku_sannyaku: ichimoku.sannyaku,
            ichimoku_signal: ichimoku.signal,
            avwap_ytd: avwap.avwap,
            avwap_deviation: avwap.deviation_pct,

            recent_peaks: swings.peaks,
            recent_valleys: swings.valleys,
            swing_structure: swings.structure,
            candlestick_patterns: candles.patterns().to_vec(),
            candlestick_summary: candles.summary(),

            gex_regime,
            gex_positive_wall: gex.and_then(|g| g.positive_wall).map(|w| w.strike),
            gex_negative_wall: gex.and_then(|g| g.negative_wall).map(|w| w.strike),
            pcr_ratio: metrics.and_then(|m| m.pcr).and_then(|p| p.oi_reading()),
            pcr_signal: options.map(|o| o.pcr_signal).unwrap_or_default(),
            atm_iv: metrics.and_then(|m| m.atm_iv),
            max_pain: metrics.and_then(|m| m.max_pain),

            category_scores,
        })
    }
}
