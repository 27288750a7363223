//! 레짐별 동적 RSI 임계값.
//!
//! 종가가 MA200 위면 강세 레짐(40/80), 아래면 약세 레짐(20/60)입니다.
//! 200개 미만이면 강세 레짐 임계값을 사용합니다.

use advisor_core::{RsiRegime, RsiSignal};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

const REGIME_MA_PERIOD: usize = 200;

/// 동적 RSI 판독.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicRsiReading {
    pub rsi: f64,
    pub regime: RsiRegime,
    pub signal: RsiSignal,
    pub oversold_threshold: f64,
    pub overbought_threshold: f64,
}

/// 레짐별 (과매도, 과매수) 임계값.
pub fn regime_thresholds(regime: RsiRegime) -> (f64, f64) {
    match regime {
        RsiRegime::Bullish => (40.0, 80.0),
        RsiRegime::Bearish => (20.0, 60.0),
    }
}

/// 주어진 RSI 값을 레짐 임계값으로 분류합니다 (경계 포함).
pub fn dynamic_rsi(closes: &[Decimal], rsi: f64) -> DynamicRsiReading {
    let regime = match (closes.last(), closes.len() >= REGIME_MA_PERIOD) {
        (Some(close), true) => {
            let window = &closes[closes.len() - REGIME_MA_PERIOD..];
            let ma = window.iter().sum::<Decimal>() / Decimal::from(REGIME_MA_PERIOD);
            if *close > ma {
                RsiRegime::Bullish
            } else {
                RsiRegime::Bearish
            }
        }
        _ => RsiRegime::Bullish,
    };

    let (oversold, overbought) = regime_thresholds(regime);
    let signal = if rsi <= oversold {
        RsiSignal::Oversold
    } else if rsi >= overbought {
        RsiSignal::Overbought
    } else {
        RsiSignal::Neutral
    };

    DynamicRsiReading {
        rsi,
        regime,
        signal,
        oversold_threshold: oversold,
        overbought_threshold: overbought,
    }
}
