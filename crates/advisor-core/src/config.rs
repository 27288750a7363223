//! 설정 관리.
//!
//! 분석 엔진의 파라미터(지표 기간, 가중치, 옵션 밴드 등)를 정의하고
//! TOML 파일과 환경 변수에서 로드합니다. 모든 섹션은 `Default`를 구현하므로
//! 파일에는 바꾸고 싶은 값만 적으면 됩니다.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// 분석 엔진 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// 지표 파라미터
    pub indicators: IndicatorConfig,
    /// 종합 점수 설정
    pub scoring: ScoringConfig,
    /// 옵션 분석 설정
    pub options: OptionsConfig,
    /// 캔들 패턴 인식 설정
    pub candlestick: CandlestickConfig,
    /// 센티먼트 집계 설정
    pub sentiment: SentimentConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 지표 계산 기간 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// RSI 기간
    pub rsi_period: usize,
    /// 이동평균 이격도 기준 기간
    pub ma_deviation_period: usize,
    /// 볼린저 밴드 기간
    pub bb_period: usize,
    /// 볼린저 밴드 표준편차 배수
    pub bb_std_dev: f64,
    /// ATR 기간
    pub atr_period: usize,
    /// 지지/저항 계산 구간
    pub support_window: usize,
    /// OBV 이동평균 기간
    pub obv_ma_period: usize,
    /// ADX 기간
    pub adx_period: usize,
    /// Stochastic RSI 기간
    pub stoch_rsi_period: usize,
    /// 다이버전스 비교 구간
    pub divergence_lookback: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ma_deviation_period: 50,
            bb_period: 20,
            bb_std_dev: 2.0,
            atr_period: 14,
            support_window: 20,
            obv_ma_period: 20,
            adx_period: 14,
            stoch_rsi_period: 14,
            divergence_lookback: 20,
        }
    }
}

/// 종합 점수 산출 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringStrategy {
    /// 4개 카테고리 가중 합산 (기본)
    #[default]
    Categorical,
    /// RSI/이격도/MACD 정수 가산 방식
    Additive,
}

/// 카테고리 가중치.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub trend: f64,
    pub momentum: f64,
    pub pattern: f64,
    pub flow: f64,
    /// 다중 타임프레임 정렬
    pub timeframe: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            trend: 0.30,
            momentum: 0.20,
            pattern: 0.20,
            flow: 0.20,
            timeframe: 0.10,
        }
    }
}

/// 종합 점수 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// 점수 산출 방식
    pub strategy: ScoringStrategy,
    /// 카테고리 가중치 (GEX 레짐이 없을 때)
    pub weights: CategoryWeights,
}

/// 옵션 분석 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OptionsConfig {
    /// 근방 GEX 집계 범위 (현재가 대비 비율)
    pub nearby_band_pct: f64,
    /// Wall 탐색 범위 (현재가 대비 비율)
    pub wall_band_pct: f64,
    /// Wall 근접 판정 비율
    pub wall_proximity_pct: f64,
}

impl Default for OptionsConfig {
    fn default() -> Self {
        Self {
            nearby_band_pct: 0.03,
            wall_band_pct: 0.10,
            wall_proximity_pct: 0.01,
        }
    }
}

/// 규칙 기반 캔들 인식기 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CandlestickConfig {
    /// 도지 판정 몸통/범위 비율
    pub doji_body_ratio: f64,
    /// 망치형 그림자/몸통 비율
    pub shadow_ratio: f64,
    /// 직전 추세 확인 기간
    pub trend_period: usize,
}

impl Default for CandlestickConfig {
    fn default() -> Self {
        Self {
            doji_body_ratio: 0.1,
            shadow_ratio: 2.0,
            trend_period: 5,
        }
    }
}

/// 센티먼트 집계 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SentimentConfig {
    /// 기본 바스켓 티커
    pub basket: Vec<String>,
    /// GEX를 신뢰하기 위한 최소 총 미결제약정
    pub min_total_open_interest: u64,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            basket: vec!["SPY".to_string(), "QQQ".to_string(), "IWM".to_string()],
            min_total_open_interest: 1000,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
    /// span 진입/종료 이벤트 출력 여부
    pub span_events: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            span_events: false,
        }
    }
}

impl AnalyticsConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `ADVISOR__SCORING__STRATEGY=additive` 형태로 파일 값을 덮어씁니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            // 파일에서 로드
            .add_source(config::File::from(path.as_ref()))
            // 환경 변수로 오버라이드
            .add_source(
                config::Environment::with_prefix("ADVISOR")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 값 범위를 검증합니다.
    pub fn validate(&self) -> CoreResult<()> {
        let ind = &self.indicators;
        let periods = [
            ("rsi_period", ind.rsi_period),
            ("ma_deviation_period", ind.ma_deviation_period),
            ("bb_period", ind.bb_period),
            ("atr_period", ind.atr_period),
            ("support_window", ind.support_window),
            ("obv_ma_period", ind.obv_ma_period),
            ("adx_period", ind.adx_period),
            ("stoch_rsi_period", ind.stoch_rsi_period),
            ("divergence_lookback", ind.divergence_lookback),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| *period == 0) {
            return Err(CoreError::InvalidInput(format!("{}는 1 이상이어야 합니다", name)));
        }

        if !(ind.bb_std_dev.is_finite() && ind.bb_std_dev > 0.0) {
            return Err(CoreError::InvalidInput(
                "bb_std_dev는 0보다 커야 합니다".into(),
            ));
        }

        let w = &self.scoring.weights;
        if [w.trend, w.momentum, w.pattern, w.flow, w.timeframe]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(CoreError::InvalidInput(
                "카테고리 가중치는 0 이상이어야 합니다".into(),
            ));
        }

        let opt = &self.options;
        if [opt.nearby_band_pct, opt.wall_band_pct, opt.wall_proximity_pct]
            .iter()
            .any(|v| !v.is_finite() || *v <= 0.0 || *v >= 1.0)
        {
            return Err(CoreError::InvalidInput(
                "옵션 밴드 비율은 0과 1 사이여야 합니다".into(),
            ));
        }

        let cdl = &self.candlestick;
        if !(cdl.doji_body_ratio > 0.0 && cdl.doji_body_ratio < 1.0) || !(cdl.shadow_ratio > 0.0) {
            return Err(CoreError::InvalidInput(
                "캔들 비율 설정이 범위를 벗어났습니다".into(),
            ));
        }

        if self.sentiment.basket.is_empty() {
            return Err(CoreError::InvalidInput("바스켓이 비어 있습니다".into()));
        }

        Ok(())
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load("config/default.toml")
    }
}
