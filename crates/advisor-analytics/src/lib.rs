//! 결정적 시장 분석 엔진.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 기술적 지표 (RSI, MACD, 볼린저 밴드, ATR, OBV, ADX, Stochastic RSI, 피보나치 등)
//! - 레짐/패턴 판독 (일목균형표, 스퀴즈, 동적 RSI, Anchored VWAP, 스윙 구조, 캔들 패턴)
//! - 다중 타임프레임 정렬
//! - 카테고리별 기술적 점수와 종합 점수
//! - 옵션 지표 (PCR, GEX, Max Pain, ATM IV)와 바스켓 센티먼트 집계
//!
//! 모든 계산은 동기식 순수 함수이며 호출 간 상태를 공유하지 않습니다.
//! 데이터 수집, 캐싱, 리포트 생성은 호출하는 쪽의 책임입니다.
//!
//! # 사용 예시
//!
//! ```ignore
//! use advisor_analytics::{OptionsEngine, TechnicalAnalyzer};
//!
//! let options = OptionsEngine::new().analyze(&chain, Some(spot))?;
//! let score = TechnicalAnalyzer::default().analyze(&series, Some(&options));
//! ```

pub mod indicators;
pub mod options;
pub mod patterns;
pub mod regimes;
pub mod scoring;
pub mod sentiment;
pub mod timeframe_alignment;

// Indicators 모듈 re-exports
pub use indicators::{
    AdxParams,
    AdxReading,
    AtrParams,
    AtrSmoothing,
    // 변동성 지표
    BollingerBandsParams,
    BollingerReading,
    DirectionalIndicators,
    IndicatorEngine,
    IndicatorError,
    IndicatorResult,
    // 추세 지표
    MacdParams,
    MacdReading,
    MacdVariant,
    // 모멘텀 지표
    MomentumCalculator,
    // OBV
    ObvIndicator,
    ObvParams,
    ObvReading,
    RsiParams,
    StochRsiParams,
    TrendIndicators,
    VolatilityIndicators,
};

// Options re-exports
pub use options::{OptionsAnalysis, OptionsEngine, OptionsError, OptionsResult};

// Patterns re-exports
pub use patterns::{
    CandlestickRecognizer, CandlestickResult, RuleBasedRecognizer, UnavailableRecognizer,
};

// Scoring re-exports
pub use scoring::{technical_summary, IndexTechnicals, TechnicalAnalyzer};

// Sentiment re-exports
pub use sentiment::{
    ReportError, ReportWriter, SentimentAggregator, SentimentReport, TickerOptionsInput,
    TickerSentiment,
};

// Timeframe Alignment re-export
pub use timeframe_alignment::{multi_timeframe_alignment, MtfReading};
