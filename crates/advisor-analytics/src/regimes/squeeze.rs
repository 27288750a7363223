//! 볼린저/켈트너 스퀴즈.
//!
//! 볼린저 밴드가 켈트너 채널 안쪽으로 완전히 들어오면 스퀴즈입니다.
//! 밴드 폭 백분위는 최근 120개 밴드 폭 관측치(현재 포함) 중 현재 값보다
//! 엄격하게 작은 비율입니다.

use advisor_core::SqueezeSignal;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{
    BollingerBandsParams, BollingerBandsResult, KeltnerChannelParams, KeltnerChannelResult,
    VolatilityIndicators,
};

/// 스퀴즈 판정 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SqueezeParams {
    /// 볼린저 기간 (기본: 20).
    pub bb_period: usize,
    /// 볼린저 표준편차 배수 (기본: 2.0).
    pub bb_std_dev: Decimal,
    /// 켈트너 이동평균/ATR 기간 (기본: 20).
    pub atr_period: usize,
    /// 켈트너 ATR 배수 (기본: 1.5).
    pub kc_multiplier: Decimal,
    /// 밴드 폭 백분위 관측 구간 (기본: 120).
    pub percentile_window: usize,
}

impl Default for SqueezeParams {
    fn default() -> Self {
        Self {
            bb_period: 20,
            bb_std_dev: dec!(2.0),
            atr_period: 20,
            kc_multiplier: dec!(1.5),
            percentile_window: 120,
        }
    }
}

impl SqueezeParams {
    /// 판정에 필요한 최소 데이터 수.
    pub fn min_samples(&self) -> usize {
        self.bb_period.max(self.atr_period) + 20
    }
}

/// 스퀴즈 판독.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqueezeReading {
    pub squeeze: bool,
    pub signal: SqueezeSignal,
    /// 밴드 폭 백분위 (0-100)
    pub bandwidth_percentile: f64,
}

impl Default for SqueezeReading {
    fn default() -> Self {
        Self {
            squeeze: false,
            signal: SqueezeSignal::InsufficientData,
            bandwidth_percentile: 50.0,
        }
    }
}

/// 최신 봉의 스퀴즈 상태.
///
/// 신호 우선순위: 스퀴즈 → 백분위 < 10이면서 상단 돌파(확장 돌파)
/// → 백분위 > 80(확장) → 보통.
pub fn bb_squeeze(
    highs: &[Decimal],
    lows: &[Decimal],
    closes: &[Decimal],
    params: SqueezeParams,
) -> SqueezeReading {
    if closes.len() < params.min_samples() {
        debug!(len = closes.len(), required = params.min_samples(), "스퀴즈 데이터 부족");
        return SqueezeReading::default();
    }

    let volatility = VolatilityIndicators::new();
    let bands = volatility.bollinger_bands(
        closes,
        BollingerBandsParams {
            period: params.bb_period,
            std_dev_multiplier: params.bb_std_dev,
        },
    );
    let channel = volatility.keltner_channel(
        highs,
        lows,
        closes,
        KeltnerChannelParams {
            period: params.atr_period,
            atr_multiplier: params.kc_multiplier,
        },
    );

    let (bands, channel) = match (bands, channel) {
        (Ok(b), Ok(c)) => (b, c),
        (Err(e), _) | (_, Err(e)) => {
            debug!(error = %e, "스퀴즈 계산 불가");
            return SqueezeReading::default();
        }
    };

    let (
        Some(BollingerBandsResult {
            upper: Some(bb_upper),
            lower: Some(bb_lower),
            bandwidth,
            ..
        }),
        Some(KeltnerChannelResult {
            upper: Some(kc_upper),
            lower: Some(kc_lower),
            ..
        }),
    ) = (bands.last().copied(), channel.last().copied())
    else {
        return SqueezeReading::default();
    };

    let squeeze = bb_upper < kc_upper && bb_lower > kc_lower;

    let observed: Vec<Decimal> = bands.iter().filter_map(|b| b.bandwidth).collect();
    let window = &observed[observed.len().saturating_sub(params.percentile_window)..];
    let bandwidth_percentile = match bandwidth {
        Some(current) if !window.is_empty() => {
            let below = window.iter().filter(|bw| **bw < current).count();
            below as f64 / window.len() as f64 * 100.0
        }
        _ => 50.0,
    };

    let close = closes[closes.len() - 1];
    let signal = if squeeze {
        SqueezeSignal::Squeeze
    } else if bandwidth_percentile < 10.0 && close > bb_upper {
        SqueezeSignal::ExpansionBreakout
    } else if bandwidth_percentile > 80.0 {
        SqueezeSignal::Expansion
    } else {
        SqueezeSignal::Normal
    };

    SqueezeReading {
        squeeze,
        signal,
        bandwidth_percentile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_data() {
        let closes = vec![dec!(100); 39];
        let reading = bb_squeeze(&closes, &closes, &closes, SqueezeParams::default());
        assert_eq!(reading, SqueezeReading::default());
        assert_eq!(reading.bandwidth_percentile, 50.0);
    }

    #[test]
    fn test_flat_close_with_range_is_squeeze() {
        let closes = vec![dec!(100); 60];
        let highs = vec![dec!(100.5); 60];
        let lows = vec![dec!(99.5); 60];

        let reading = bb_squeeze(&highs, &lows, &closes, SqueezeParams::default());
        assert!(reading.squeeze);
        assert_eq!(reading.signal, SqueezeSignal::Squeeze);
        assert_eq!(reading.bandwidth_percentile, 0.0);
    }

    #[test]
    fn test_accelerating_trend_is_expansion() {
        // 기울기가 커지는 추세: 밴드 폭이 계속 넓어짐
        let closes: Vec<Decimal> = (0..80i64)
            .map(|i| dec!(100) + Decimal::from(i * i) / dec!(100))
            .collect();
        let highs: Vec<Decimal> = closes.iter().map(|c| *c + dec!(0.1)).collect();
        let lows: Vec<Decimal> = closes.iter().map(|c| *c - dec!(0.1)).collect();

        let reading = bb_squeeze(&highs, &lows, &closes, SqueezeParams::default());
        assert!(!reading.squeeze);
        assert!(reading.bandwidth_percentile > 80.0);
        assert_eq!(reading.signal, SqueezeSignal::Expansion);
    }
}
