//! 분석 엔진의 입력/출력 도메인 모델.

mod market_data;
mod option_chain;
mod options_metrics;
mod pattern;
mod signal;
mod technical_score;

pub use market_data::*;
pub use option_chain::*;
pub use options_metrics::*;
pub use pattern::*;
pub use signal::*;
pub use technical_score::*;
