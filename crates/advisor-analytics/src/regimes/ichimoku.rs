//! 일목균형표 구름 레짐.
//!
//! 전환선(9), 기준선(26), 선행스팬 A = (전환선 + 기준선) / 2, 선행스팬 B(52)를
//! 최신 봉에서 평가합니다. 선행스팬은 앞으로 이동시키지 않습니다.

use advisor_core::{IchimokuRegime, Signal};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

const TENKAN_PERIOD: usize = 9;
const KIJUN_PERIOD: usize = 26;
const SENKOU_B_PERIOD: usize = 52;

/// 일목균형표 판독.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IchimokuReading {
    pub regime: IchimokuRegime,
    /// 삼역호전
    pub sannyaku: bool,
    pub signal: Signal,
    pub tenkan: Decimal,
    pub kijun: Decimal,
    pub cloud_top: Decimal,
    pub cloud_bottom: Decimal,
}

impl IchimokuReading {
    fn insufficient() -> Self {
        Self {
            regime: IchimokuRegime::InsufficientData,
            sannyaku: false,
            signal: Signal::Neutral,
            tenkan: Decimal::ZERO,
            kijun: Decimal::ZERO,
            cloud_top: Decimal::ZERO,
            cloud_bottom: Decimal::ZERO,
        }
    }
}

impl Default for IchimokuReading {
    fn default() -> Self {
        Self::insufficient()
    }
}

/// 최근 period개 (최고가 + 최저가) / 2.
fn midpoint(highs: &[Decimal], lows: &[Decimal], period: usize) -> Option<Decimal> {
    let high = highs[highs.len().checked_sub(period)?..].iter().max()?;
    let low = lows[lows.len().checked_sub(period)?..].iter().min()?;
    Some((*high + *low) / dec!(2))
}

/// 구름 대비 가격 위치와 삼역호전 여부.
///
/// 52개 미만이면 `InsufficientData` 레짐과 중립 신호.
pub fn ichimoku_regime(highs: &[Decimal], lows: &[Decimal], closes: &[Decimal]) -> IchimokuReading {
    let len = closes.len();
    if len < SENKOU_B_PERIOD || highs.len() != len || lows.len() != len {
        debug!(len, "일목균형표 데이터 부족");
        return IchimokuReading::insufficient();
    }

    let (Some(tenkan), Some(kijun), Some(senkou_b)) = (
        midpoint(highs, lows, TENKAN_PERIOD),
        midpoint(highs, lows, KIJUN_PERIOD),
        midpoint(highs, lows, SENKOU_B_PERIOD),
    ) else {
        return IchimokuReading::insufficient();
    };
    let senkou_a = (tenkan + kijun) / dec!(2);

    let cloud_top = senkou_a.max(senkou_b);
    let cloud_bottom = senkou_a.min(senkou_b);
    let price = closes[len - 1];

    let regime = if price > cloud_top {
        IchimokuRegime::AboveCloud
    } else if price < cloud_bottom {
        IchimokuRegime::BelowCloud
    } else {
        IchimokuRegime::InCloud
    };

    let tenkan_above = tenkan > kijun;
    let above_lagging = price > closes[len - KIJUN_PERIOD];
    let sannyaku = tenkan_above && above_lagging && regime == IchimokuRegime::AboveCloud;

    let signal = if sannyaku {
        Signal::Bullish
    } else if regime == IchimokuRegime::BelowCloud && !tenkan_above {
        Signal::Bearish
    } else {
        Signal::Neutral
    };

    IchimokuReading {
        regime,
        sannyaku,
        signal,
        tenkan,
        kijun,
        cloud_top,
        cloud_bottom,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ohlc(closes: &[Decimal]) -> (Vec<Decimal>, Vec<Decimal>) {
        (
            closes.iter().map(|c| *c + dec!(1)).collect(),
            closes.iter().map(|c| *c - dec!(1)).collect(),
        )
    }

    #[test]
    fn test_uptrend_is_sannyaku() {
        let closes: Vec<Decimal> = (0..80).map(|i| Decimal::from(100 + i)).collect();
        let (highs, lows) = ohlc(&closes);

        let reading = ichimoku_regime(&highs, &lows, &closes);
        assert_eq!(reading.regime, IchimokuRegime::AboveCloud);
        assert!(reading.sannyaku);
        assert_eq!(reading.signal, Signal::Bullish);
        assert!(reading.tenkan > reading.kijun);
    }

    #[test]
    fn test_downtrend_is_bearish() {
        let closes: Vec<Decimal> = (0..80).map(|i| Decimal::from(200 - i)).collect();
        let (highs, lows) = ohlc(&closes);

        let reading = ichimoku_regime(&highs, &lows, &closes);
        assert_eq!(reading.regime, IchimokuRegime::BelowCloud);
        assert!(!reading.sannyaku);
        assert_eq!(reading.signal, Signal::Bearish);
    }

    #[test]
    fn test_flat_is_in_cloud() {
        let closes = vec![dec!(100); 60];
        let (highs, lows) = ohlc(&closes);

        let reading = ichimoku_regime(&highs, &lows, &closes);
        assert_eq!(reading.regime, IchimokuRegime::InCloud);
        assert_eq!(reading.signal, Signal::Neutral);
    }

    #[test]
    fn test_insufficient_data() {
        let closes = vec![dec!(100); 51];
        let (highs, lows) = ohlc(&closes);

        let reading = ichimoku_regime(&highs, &lows, &closes);
        assert_eq!(reading.regime, IchimokuRegime::InsufficientData);
        assert_eq!(reading.signal, Signal::Neutral);
    }
}
