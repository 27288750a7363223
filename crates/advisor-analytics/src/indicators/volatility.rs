//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표들을 제공합니다.
//! - Bollinger Bands (볼린저 밴드, 표본 표준편차)
//! - ATR (Average True Range, 평균 실제 범위)
//! - Keltner Channel
//! - 지지/저항과 역추세 매수 구간

use advisor_core::{BollingerPosition, ContrarianSignal, DecimalExt};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_len, ensure_period, last_value, mean, IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2.0).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2.0),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
    /// 밴드 폭 ((상단 - 하단) / 중간 × 100). 중간이 0 이하이면 None.
    pub bandwidth: Option<Decimal>,
}

impl BollingerBandsResult {
    const EMPTY: Self = Self {
        upper: None,
        middle: None,
        lower: None,
        bandwidth: None,
    };
}

/// 최신 시점의 볼린저 밴드 판독.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerReading {
    pub upper: Decimal,
    pub middle: Decimal,
    pub lower: Decimal,
    /// 밴드 폭 (% of MA)
    pub width: f64,
    pub position: BollingerPosition,
    /// 밴드가 실제로 계산되었는지 여부
    pub available: bool,
}

impl BollingerReading {
    /// 데이터 부족 시: 밴드를 마지막 종가로 접고 폭 0, 하단 절반.
    fn collapsed(close: Decimal) -> Self {
        Self {
            upper: close,
            middle: close,
            lower: close,
            width: 0.0,
            position: BollingerPosition::LowerHalf,
            available: false,
        }
    }
}

/// ATR 평활 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtrSmoothing {
    /// 최근 period개 True Range의 단순 평균
    #[default]
    Simple,
    /// Wilder 평활 (첫 값은 단순 평균)
    Wilder,
}

/// ATR 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtrParams {
    /// ATR 기간 (기본: 14).
    pub period: usize,
    /// 평활 방식 (기본: 단순 평균).
    pub smoothing: AtrSmoothing,
}

impl Default for AtrParams {
    fn default() -> Self {
        Self {
            period: 14,
            smoothing: AtrSmoothing::Simple,
        }
    }
}

/// 최신 ATR 판독.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AtrReading {
    pub atr: Decimal,
    /// ATR / 종가 × 100
    pub atr_percent: f64,
}

/// Keltner Channel 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeltnerChannelParams {
    /// 이동평균 및 ATR 기간 (기본: 20).
    pub period: usize,
    /// ATR 배수 (기본: 1.5).
    pub atr_multiplier: Decimal,
}

impl Default for KeltnerChannelParams {
    fn default() -> Self {
        Self {
            period: 20,
            atr_multiplier: dec!(1.5),
        }
    }
}

/// Keltner Channel 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeltnerChannelResult {
    /// 상단 채널 (MA + k × ATR).
    pub upper: Option<Decimal>,
    /// 중간 채널 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 채널 (MA - k × ATR).
    pub lower: Option<Decimal>,
}

/// 지지/저항 가격.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SupportResistance {
    pub support: Decimal,
    pub resistance: Decimal,
}

/// 변동성 지표 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 상단 밴드 = MA + (k × σ)
    /// 중간 밴드 = MA (이동평균)
    /// 하단 밴드 = MA - (k × σ)
    ///
    /// σ는 표본 표준편차(n-1)입니다.
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;
        if period < 2 {
            return Err(IndicatorError::InvalidParameter(
                "볼린저 밴드 기간은 2 이상이어야 합니다".to_string(),
            ));
        }
        ensure_len(prices.len(), period)?;

        let period_decimal = Decimal::from(period);
        let sample_size = Decimal::from(period - 1);
        let mut result = vec![BollingerBandsResult::EMPTY; period - 1];

        for window in prices.windows(period) {
            let ma = window.iter().sum::<Decimal>() / period_decimal;

            let variance: Decimal = window
                .iter()
                .map(|&p| {
                    let diff = p - ma;
                    diff * diff
                })
                .sum::<Decimal>()
                / sample_size;

            let deviation = params.std_dev_multiplier * sqrt_decimal(variance);
            let upper = ma + deviation;
            let lower = ma - deviation;

            let bandwidth = if ma > Decimal::ZERO {
                Some((upper - lower) / ma * dec!(100))
            } else {
                None
            };

            result.push(BollingerBandsResult {
                upper: Some(upper),
                middle: Some(ma),
                lower: Some(lower),
                bandwidth,
            });
        }

        Ok(result)
    }

    /// 최신 볼린저 밴드 판독.
    ///
    /// 데이터가 부족하면 밴드를 마지막 종가로 접습니다 (폭 0, 하단 절반).
    pub fn bollinger_reading(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> BollingerReading {
        let close = prices.last().copied().unwrap_or(Decimal::ZERO);

        let last = match self.bollinger_bands(prices, params) {
            Ok(series) => series.last().copied(),
            Err(e) => {
                debug!(error = %e, "볼린저 밴드 계산 불가");
                None
            }
        };

        let Some(BollingerBandsResult {
            upper: Some(upper),
            middle: Some(middle),
            lower: Some(lower),
            bandwidth,
        }) = last
        else {
            return BollingerReading::collapsed(close);
        };

        let position = if close > upper {
            BollingerPosition::BreakoutAbove
        } else if close < lower {
            BollingerPosition::BreakoutBelow
        } else if close > middle {
            BollingerPosition::UpperHalf
        } else {
            BollingerPosition::LowerHalf
        };

        BollingerReading {
            upper,
            middle,
            lower,
            width: bandwidth.map(|w| w.to_f64_or_zero()).unwrap_or(0.0),
            position,
            available: true,
        }
    }

    /// True Range 시계열.
    ///
    /// True Range = max(고가 - 저가, |고가 - 전일종가|, |저가 - 전일종가|)
    /// 첫 번째 값은 당일 범위(고가 - 저가)입니다.
    pub fn true_range(&self, high: &[Decimal], low: &[Decimal], close: &[Decimal]) -> Vec<Decimal> {
        let len = high.len().min(low.len()).min(close.len());
        (0..len)
            .map(|i| {
                let hl = high[i] - low[i];
                if i == 0 {
                    return hl;
                }
                let hc = (high[i] - close[i - 1]).abs();
                let lc = (low[i] - close[i - 1]).abs();
                hl.max(hc).max(lc)
            })
            .collect()
    }

    /// ATR (Average True Range) 계산.
    ///
    /// - `Simple`: 최근 period개 True Range의 평균 (period개부터 계산)
    /// - `Wilder`: 첫 값은 단순 평균, 이후 alpha = 1/period 평활
    pub fn atr(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;

        let true_ranges = self.true_range(high, low, close);
        let len = true_ranges.len();

        match params.smoothing {
            AtrSmoothing::Simple => {
                ensure_len(len, period)?;
                let mut result = vec![None; period - 1];
                result.extend(true_ranges.windows(period).map(mean));
                Ok(result)
            }
            AtrSmoothing::Wilder => {
                ensure_len(len, period + 1)?;

                let alpha = Decimal::ONE / Decimal::from(period);
                let one_minus_alpha = Decimal::ONE - alpha;

                let mut result = vec![None; period - 1];
                let mut atr = true_ranges[..period].iter().sum::<Decimal>() / Decimal::from(period);
                result.push(Some(atr));

                for tr in true_ranges.iter().skip(period) {
                    atr = (*tr * alpha) + (atr * one_minus_alpha);
                    result.push(Some(atr));
                }

                Ok(result)
            }
        }
    }

    /// 최신 ATR 판독.
    ///
    /// 데이터가 부족하면 0. atr_percent는 종가가 0 이하이면 0.
    pub fn atr_reading(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AtrParams,
    ) -> AtrReading {
        let atr = match self.atr(high, low, close, params) {
            Ok(series) => last_value(&series).unwrap_or(Decimal::ZERO),
            Err(e) => {
                debug!(error = %e, "ATR 계산 불가, 0 사용");
                Decimal::ZERO
            }
        };

        let atr_percent = match close.last() {
            Some(c) if *c > Decimal::ZERO => (atr / *c * dec!(100)).to_f64_or_zero(),
            _ => 0.0,
        };

        AtrReading { atr, atr_percent }
    }

    /// Keltner Channel 계산.
    ///
    /// 중간 채널 = SMA(period), 상/하단 = 중간 ± k × ATR(period, 단순 평균)
    pub fn keltner_channel(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: KeltnerChannelParams,
    ) -> IndicatorResult<Vec<KeltnerChannelResult>> {
        let period = params.period;
        ensure_period(period)?;
        ensure_len(close.len(), period)?;

        let atr_values = self.atr(
            high,
            low,
            close,
            AtrParams {
                period,
                smoothing: AtrSmoothing::Simple,
            },
        )?;

        let period_decimal = Decimal::from(period);
        let result = (0..close.len())
            .map(|i| {
                let atr = atr_values.get(i).copied().flatten();
                match atr {
                    Some(atr) if i + 1 >= period => {
                        let ma = close[i + 1 - period..=i].iter().sum::<Decimal>() / period_decimal;
                        let deviation = params.atr_multiplier * atr;
                        KeltnerChannelResult {
                            upper: Some(ma + deviation),
                            middle: Some(ma),
                            lower: Some(ma - deviation),
                        }
                    }
                    _ => KeltnerChannelResult {
                        upper: None,
                        middle: None,
                        lower: None,
                    },
                }
            })
            .collect();

        Ok(result)
    }
}

/// 최근 window개 종가의 최저/최고 (window보다 짧으면 전체).
pub fn support_resistance(closes: &[Decimal], window: usize) -> SupportResistance {
    let start = closes.len().saturating_sub(window);
    let recent = &closes[start..];

    SupportResistance {
        support: recent.iter().min().copied().unwrap_or(Decimal::ZERO),
        resistance: recent.iter().max().copied().unwrap_or(Decimal::ZERO),
    }
}

/// 역추세 매수 구간 (BB 하단 - ATR, BB 하단).
pub fn contrarian_zone(bb: &BollingerReading, atr: Decimal) -> (Decimal, Decimal) {
    (bb.lower - atr, bb.lower)
}

/// 역추세 매수 구간 판정.
///
/// 종가가 구간 안(양 끝 포함)이면 매수 검토, RSI > 70이면서 상단 돌파면 과열 경고,
/// 그 외(밴드를 계산하지 못한 경우 포함)는 관망입니다.
pub fn contrarian_signal(
    close: Decimal,
    zone: (Decimal, Decimal),
    rsi: f64,
    bb: &BollingerReading,
) -> ContrarianSignal {
    let (lower, upper) = zone;
    if bb.available && lower <= close && close <= upper {
        ContrarianSignal::BuyZone
    } else if rsi > 70.0 && bb.position == BollingerPosition::BreakoutAbove {
        ContrarianSignal::Overheated
    } else {
        ContrarianSignal::Watch
    }
}

/// Decimal 제곱근 계산 (Newton-Raphson 방법).
///
/// f64 제곱근을 초기값으로 사용해 몇 번의 반복으로 Decimal 정밀도까지 수렴합니다.
pub(crate) fn sqrt_decimal(value: Decimal) -> Decimal {
    if value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let mut x = value
        .to_f64()
        .map(f64::sqrt)
        .and_then(Decimal::from_f64)
        .filter(|x| *x > Decimal::ZERO)
        .unwrap_or(value);

    for _ in 0..6 {
        let next = (x + value / x) / dec!(2);
        if next == x {
            break;
        }
        x = next;
    }

    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_ohlc() -> (Vec<Decimal>, Vec<Decimal>, Vec<Decimal>) {
        let close: Vec<Decimal> = (0..20).map(|i| dec!(100) + Decimal::from(i)).collect();
        let high: Vec<Decimal> = close.iter().map(|c| *c + dec!(2)).collect();
        let low: Vec<Decimal> = close.iter().map(|c| *c - dec!(2)).collect();
        (high, low, close)
    }

    #[test]
    fn test_sqrt_decimal() {
        assert_eq!(sqrt_decimal(dec!(4)), dec!(2));
        assert_eq!(sqrt_decimal(Decimal::ZERO), Decimal::ZERO);
        let large = sqrt_decimal(dec!(1000000000000));
        assert!((large - dec!(1000000)).abs() < dec!(0.000001));
        let root_two = sqrt_decimal(dec!(2)).to_f64_or_zero();
        assert!((root_two - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_bollinger_sample_std() {
        let vol = VolatilityIndicators::new();
        let prices = vec![dec!(1), dec!(2), dec!(3), dec!(4), dec!(5)];
        let bb = vol
            .bollinger_bands(
                &prices,
                BollingerBandsParams {
                    period: 5,
                    std_dev_multiplier: dec!(2),
                },
            )
            .unwrap();

        // 평균 3, 표본분산 2.5
        let last = bb[4];
        assert_eq!(last.middle, Some(dec!(3)));
        let std = (last.upper.unwrap() - dec!(3)) / dec!(2);
        assert!((std.to_f64_or_zero() - 2.5f64.sqrt()).abs() < 1e-12);
        assert!(bb[3].upper.is_none());
    }

    #[test]
    fn test_bollinger_reading_positions() {
        let vol = VolatilityIndicators::new();
        let params = BollingerBandsParams::default();

        // 횡보 후 단독 급등은 표본 표준편차로도 상단 밴드를 넘는다
        let mut spike = vec![dec!(100); 19];
        spike.push(dec!(101));
        let reading = vol.bollinger_reading(&spike, params);
        assert!(reading.available);
        assert_eq!(reading.position, BollingerPosition::BreakoutAbove);

        let mut drop = vec![dec!(100); 19];
        drop.push(dec!(99));
        assert_eq!(
            vol.bollinger_reading(&drop, params).position,
            BollingerPosition::BreakoutBelow
        );

        let zigzag: Vec<Decimal> = (0..19)
            .map(|i| if i % 2 == 0 { dec!(99) } else { dec!(101) })
            .collect();

        let mut upper_half = zigzag.clone();
        upper_half.push(dec!(100.5));
        assert_eq!(
            vol.bollinger_reading(&upper_half, params).position,
            BollingerPosition::UpperHalf
        );

        let mut lower_half = zigzag;
        lower_half.push(dec!(99.5));
        assert_eq!(
            vol.bollinger_reading(&lower_half, params).position,
            BollingerPosition::LowerHalf
        );
    }

    #[test]
    fn test_bollinger_reading_insufficient_collapses() {
        let vol = VolatilityIndicators::new();
        let reading = vol.bollinger_reading(&[dec!(10), dec!(11)], BollingerBandsParams::default());

        assert!(!reading.available);
        assert_eq!(reading.upper, dec!(11));
        assert_eq!(reading.lower, dec!(11));
        assert_eq!(reading.width, 0.0);
        assert_eq!(reading.position, BollingerPosition::LowerHalf);
    }

    #[test]
    fn test_atr_simple_and_wilder() {
        let vol = VolatilityIndicators::new();
        let (high, low, close) = sample_ohlc();

        let simple = vol.atr(&high, &low, &close, AtrParams::default()).unwrap();
        assert!(simple[12].is_none());
        // TR[0] = 4, 이후 TR = max(4, |c+2 - (c-1)|=3, |c-2-(c-1)|=1) = 4
        assert_eq!(simple[13], Some(dec!(4)));

        let wilder = vol
            .atr(
                &high,
                &low,
                &close,
                AtrParams {
                    period: 14,
                    smoothing: AtrSmoothing::Wilder,
                },
            )
            .unwrap();
        let last = wilder.last().copied().flatten().unwrap();
        assert!((last - dec!(4)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_atr_reading() {
        let vol = VolatilityIndicators::new();
        let (high, low, close) = sample_ohlc();
        let reading = vol.atr_reading(&high, &low, &close, AtrParams::default());
        assert_eq!(reading.atr, dec!(4));
        // 4 / 119 × 100
        assert!((reading.atr_percent - 4.0 / 119.0 * 100.0).abs() < 1e-9);

        let empty = vol.atr_reading(&[], &[], &[], AtrParams::default());
        assert_eq!(empty.atr, Decimal::ZERO);
        assert_eq!(empty.atr_percent, 0.0);
    }

    #[test]
    fn test_keltner_channel() {
        let vol = VolatilityIndicators::new();
        let (high, low, close) = sample_ohlc();
        let kc = vol
            .keltner_channel(&high, &low, &close, KeltnerChannelParams::default())
            .unwrap();

        let last = kc[19];
        // MA = 109.5, ATR = 4 → ±6
        assert_eq!(last.middle, Some(dec!(109.5)));
        assert_eq!(last.upper, Some(dec!(115.5)));
        assert_eq!(last.lower, Some(dec!(103.5)));
    }

    #[test]
    fn test_support_resistance() {
        let closes: Vec<Decimal> = (1..=30).map(Decimal::from).collect();
        let sr = support_resistance(&closes, 20);
        assert_eq!(sr.support, dec!(11));
        assert_eq!(sr.resistance, dec!(30));

        let short = support_resistance(&closes[..5], 20);
        assert_eq!(short.support, dec!(1));
        assert_eq!(short.resistance, dec!(5));
    }

    #[test]
    fn test_contrarian_signal() {
        let bb = BollingerReading {
            upper: dec!(110),
            middle: dec!(100),
            lower: dec!(90),
            width: 20.0,
            position: BollingerPosition::BreakoutBelow,
            available: true,
        };
        let zone = contrarian_zone(&bb, dec!(3));
        assert_eq!(zone, (dec!(87), dec!(90)));

        assert_eq!(contrarian_signal(dec!(88), zone, 25.0, &bb), ContrarianSignal::BuyZone);
        assert_eq!(contrarian_signal(dec!(90), zone, 25.0, &bb), ContrarianSignal::BuyZone);
        assert_eq!(contrarian_signal(dec!(86), zone, 25.0, &bb), ContrarianSignal::Watch);

        let hot = BollingerReading {
            position: BollingerPosition::BreakoutAbove,
            ..bb
        };
        assert_eq!(contrarian_signal(dec!(115), zone, 75.0, &hot), ContrarianSignal::Overheated);
        assert_eq!(contrarian_signal(dec!(115), zone, 65.0, &hot), ContrarianSignal::Watch);
    }
}
