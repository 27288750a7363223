//! 기술적 지표 모듈.
//!
//! 가격/거래량 시계열에서 단일 지표를 계산하는 순수 함수들을 제공합니다.
//!
//! 두 단계의 API가 있습니다:
//! - 시계열 단위 (`TrendIndicators::sma` 등): `IndicatorResult<Vec<Option<Decimal>>>`를
//!   반환하며 데이터가 부족하면 `IndicatorError::InsufficientData`를 돌려줍니다.
//! - 판독 단위 (`*_reading`): 최신 값 하나만 반환하며 에러 대신 문서화된
//!   중립 기본값을 사용합니다. 점수 엔진은 이쪽만 사용합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA / EMA**: 이동평균
//! - **MACD**: 기본/확장 변형 (히스토그램 기울기, 제로라인 필터)
//! - **이격도 / MA 배열**
//! - **ADX/DI**: 추세 강도
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: Wilder 평활
//! - **Stochastic RSI**
//! - **다이버전스**
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 표본 표준편차
//! - **ATR**: 단순/Wilder 평활
//! - **Keltner Channel**
//! - **지지/저항, 역추세 매수 구간**
//!
//! ## 거래량 / 가격 레벨
//! - **OBV**
//! - **피보나치 되돌림**
//!
//! # 사용 예시
//!
//! ```ignore
//! use advisor_analytics::indicators::{IndicatorEngine, SmaParams, RsiParams};
//!
//! let engine = IndicatorEngine::new();
//!
//! // SMA 계산
//! let sma = engine.sma(&prices, SmaParams { period: 20 })?;
//!
//! // RSI 계산
//! let rsi = engine.rsi(&prices, RsiParams { period: 14 })?;
//! ```

pub mod adx;
pub mod divergence;
pub mod fibonacci;
pub mod momentum;
pub mod obv;
pub mod trend;
pub mod volatility;

use rust_decimal::Decimal;
use thiserror::Error;

pub use adx::{AdxParams, AdxReading, AdxResult, DirectionalIndicators};
pub use divergence::detect_divergence;
pub use fibonacci::{fibonacci_levels, FibonacciReading, FIB_RATIOS};
pub use momentum::{
    classify_rsi, MomentumCalculator, RsiParams, StochRsiParams, StochRsiReading,
};
pub use obv::{ObvIndicator, ObvParams, ObvReading, ObvResult};
pub use trend::{
    classify_ma_deviation, EmaParams, MacdExtension, MacdParams, MacdReading, MacdResult,
    MacdVariant, SmaParams, TrendIndicators,
};
pub use volatility::{
    contrarian_signal, contrarian_zone, support_resistance, AtrParams, AtrReading, AtrSmoothing,
    BollingerBandsParams, BollingerBandsResult, BollingerReading, KeltnerChannelParams,
    KeltnerChannelResult, SupportResistance, VolatilityIndicators,
};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 계산 오류
    #[error("계산 오류: {0}")]
    CalculationError(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

/// 기간 파라미터 검증.
pub(crate) fn ensure_period(period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    Ok(())
}

/// 최소 데이터 개수 검증.
pub(crate) fn ensure_len(provided: usize, required: usize) -> IndicatorResult<()> {
    if provided < required {
        return Err(IndicatorError::InsufficientData { required, provided });
    }
    Ok(())
}

/// 시계열의 마지막 값.
pub(crate) fn last_value(series: &[Option<Decimal>]) -> Option<Decimal> {
    series.last().copied().flatten()
}

/// 단순 평균. 빈 슬라이스는 None.
pub(crate) fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<Decimal>() / Decimal::from(values.len()))
}

/// 통합 지표 엔진.
///
/// 시계열 단위 지표 계산을 위한 통합 인터페이스를 제공합니다.
#[derive(Debug, Default, Clone, Copy)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumCalculator,
    volatility: VolatilityIndicators,
    directional: DirectionalIndicators,
    obv: ObvIndicator,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 추세 지표 ====================

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// # 반환
    /// 계산된 SMA 값들의 벡터 (처음 period-1개는 None)
    pub fn sma(&self, prices: &[Decimal], params: SmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.sma(prices, params)
    }

    /// 지수 이동평균 (EMA) 계산. 첫 값은 SMA로 시작합니다.
    pub fn ema(&self, prices: &[Decimal], params: EmaParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.trend.ema(prices, params)
    }

    /// MACD 라인, 시그널 라인, 히스토그램.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        self.trend.macd(prices, params)
    }

    /// ADX/DI 계산.
    pub fn adx(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        self.directional.calculate(high, low, close, params)
    }

    // ==================== 모멘텀 지표 ====================

    /// RSI (Wilder 평활). 0-100 사이의 값들.
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.rsi(prices, params)
    }

    /// Stochastic RSI. 0-100 사이의 값들.
    pub fn stochastic_rsi(
        &self,
        prices: &[Decimal],
        params: StochRsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.momentum.stochastic_rsi(prices, params)
    }

    // ==================== 변동성 지표 ====================

    /// 볼린저 밴드 계산.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        self.volatility.bollinger_bands(prices, params)
    }

    /// ATR (Average True Range) 계산.
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.volatility.atr(high, low, close, params)
    }

    /// Keltner Channel 계산.
    pub fn keltner_channel(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: KeltnerChannelParams,
    ) -> IndicatorResult<Vec<KeltnerChannelResult>> {
        self.volatility.keltner_channel(high, low, close, params)
    }

    // ==================== 거래량 지표 ====================

    /// OBV (On-Balance Volume) 계산.
    pub fn obv(&self, close: &[Decimal], volume: &[Decimal]) -> IndicatorResult<Vec<ObvResult>> {
        self.obv.calculate(close, volume)
    }
}
