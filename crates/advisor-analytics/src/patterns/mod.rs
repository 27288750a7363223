//! 가격 패턴 인식.
//!
//! - [`swing`]: 스윙 고점/저점과 Higher Highs / Lower Lows 구조
//! - [`candlestick`]: 캔들스틱 패턴 인식과 점수 보정

pub mod candlestick;
pub mod swing;

pub use candlestick::{
    recognize_candlesticks, score_patterns, CandlestickParams, CandlestickRecognizer,
    CandlestickResult, RuleBasedRecognizer, UnavailableRecognizer,
};
pub use swing::{detect_swings, SwingParams, SwingReading, RECENT_SWING_COUNT};
