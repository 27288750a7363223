//! 시장 레짐 판정.
//!
//! 단일 지표 값이 아니라 "지금 어떤 국면인가"를 판정하는 검출기들입니다.
//!
//! - [`ichimoku`]: 일목균형표 구름 위치와 삼역호전
//! - [`squeeze`]: 볼린저/켈트너 스퀴즈와 밴드 폭 백분위
//! - [`dynamic_rsi`]: MA200 기준 레짐별 RSI 임계값
//! - [`anchored_vwap`]: 연초/분기초/스윙 저점 앵커드 VWAP

pub mod anchored_vwap;
pub mod dynamic_rsi;
pub mod ichimoku;
pub mod squeeze;

pub use anchored_vwap::{anchored_vwap, AnchoredVwapReading, VwapAnchor};
pub use dynamic_rsi::{dynamic_rsi, regime_thresholds, DynamicRsiReading};
pub use ichimoku::{ichimoku_regime, IchimokuReading};
pub use squeeze::{bb_squeeze, SqueezeParams, SqueezeReading};
