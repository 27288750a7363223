//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//! - 이동평균 이격도 / 20·50·200 배열

use advisor_core::{
    DecimalExt, HistogramSlope, MaDeviationSignal, MaTrend, Signal, ZeroLineFilter,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_len, ensure_period, last_value, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// MACD 판독 변형.
///
/// 확장 변형은 기본 신호에 히스토그램 기울기와 제로라인 필터를 더합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdVariant {
    Basic,
    #[default]
    Extended,
}

/// 확장 변형에서만 계산되는 값.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MacdExtension {
    pub hist_slope: HistogramSlope,
    pub zero_filter: ZeroLineFilter,
}

/// 최신 시점의 MACD 판독.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacdReading {
    /// MACD > 시그널 → 강세, < → 약세
    pub signal: Signal,
    pub macd: Option<Decimal>,
    pub signal_line: Option<Decimal>,
    pub histogram: Option<Decimal>,
    /// `MacdVariant::Extended`일 때만 Some
    pub extension: Option<MacdExtension>,
}

impl MacdReading {
    /// 히스토그램 기울기 (기본 변형이면 Neutral).
    pub fn hist_slope(&self) -> HistogramSlope {
        self.extension.map(|e| e.hist_slope).unwrap_or_default()
    }

    /// 제로라인 필터 (기본 변형이면 BelowZero).
    pub fn zero_filter(&self) -> ZeroLineFilter {
        self.extension.map(|e| e.zero_filter).unwrap_or_default()
    }
}

/// 추세 지표 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;
        ensure_len(prices.len(), period)?;

        let period_decimal = Decimal::from(period);
        let mut result = Vec::with_capacity(prices.len());
        let mut window_sum = Decimal::ZERO;

        for (i, price) in prices.iter().enumerate() {
            window_sum += *price;
            if i >= period {
                window_sum -= prices[i - period];
            }
            if i + 1 < period {
                result.push(None);
            } else {
                result.push(Some(window_sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × k) + (이전 EMA × (1 - k))
    /// k = 2 / (period + 1)
    ///
    /// 첫 EMA는 처음 period개의 SMA입니다.
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;
        ensure_len(prices.len(), period)?;

        let mut result = Vec::with_capacity(prices.len());
        let multiplier = dec!(2) / Decimal::from(period + 1);

        // 처음 period-1개는 None
        for _ in 0..period - 1 {
            result.push(None);
        }

        // 첫 EMA는 SMA로 시작
        let initial_sma: Decimal = prices[..period].iter().sum::<Decimal>() / Decimal::from(period);
        result.push(Some(initial_sma));

        let mut prev_ema = initial_sma;
        for price in prices.iter().skip(period) {
            let ema = (*price * multiplier) + (prev_ema * (Decimal::ONE - multiplier));
            result.push(Some(ema));
            prev_ema = ema;
        }

        Ok(result)
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        ensure_len(prices.len(), params.slow_period + params.signal_period)?;

        let fast_ema = self.ema(prices, EmaParams { period: params.fast_period })?;
        let slow_ema = self.ema(prices, EmaParams { period: params.slow_period })?;

        let macd_line: Vec<Option<Decimal>> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|(fast, slow)| match (fast, slow) {
                (Some(f), Some(s)) => Some(*f - *s),
                _ => None,
            })
            .collect();

        // 시그널 라인 (MACD 라인의 EMA)
        let macd_values: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
        let signal_ema = self.ema(&macd_values, EmaParams { period: params.signal_period })?;

        let mut result = Vec::with_capacity(prices.len());
        let mut signal_idx = 0;

        for macd_val in macd_line {
            match macd_val {
                Some(m) => {
                    let signal = signal_ema.get(signal_idx).copied().flatten();
                    result.push(MacdResult {
                        macd: Some(m),
                        signal,
                        histogram: signal.map(|s| m - s),
                    });
                    signal_idx += 1;
                }
                None => result.push(MacdResult {
                    macd: None,
                    signal: None,
                    histogram: None,
                }),
            }
        }

        Ok(result)
    }

    /// 최신 MACD 판독.
    ///
    /// 데이터가 부족하면 중립 신호, Neutral 기울기, BelowZero 필터를 반환합니다.
    pub fn macd_reading(
        &self,
        prices: &[Decimal],
        params: MacdParams,
        variant: MacdVariant,
    ) -> MacdReading {
        let series = match self.macd(prices, params) {
            Ok(series) => series,
            Err(e) => {
                debug!(error = %e, "MACD 계산 불가, 중립값 사용");
                return MacdReading {
                    extension: (variant == MacdVariant::Extended).then(MacdExtension::default),
                    ..MacdReading::default()
                };
            }
        };

        let last = series.last().copied().unwrap_or(MacdResult {
            macd: None,
            signal: None,
            histogram: None,
        });

        let signal = match (last.macd, last.signal) {
            (Some(m), Some(s)) if m > s => Signal::Bullish,
            (Some(m), Some(s)) if m < s => Signal::Bearish,
            _ => Signal::Neutral,
        };

        let extension = match variant {
            MacdVariant::Basic => None,
            MacdVariant::Extended => {
                let histogram: Vec<Decimal> = series.iter().filter_map(|r| r.histogram).collect();
                let zero_filter = match last.macd {
                    Some(m) if m > Decimal::ZERO => ZeroLineFilter::AboveZero,
                    _ => ZeroLineFilter::BelowZero,
                };
                Some(MacdExtension {
                    hist_slope: histogram_slope(&histogram),
                    zero_filter,
                })
            }
        };

        MacdReading {
            signal,
            macd: last.macd,
            signal_line: last.signal,
            histogram: last.histogram,
            extension,
        }
    }

    /// 종가의 period 이동평균 대비 이격도 (%).
    ///
    /// 이동평균을 계산할 수 없거나 0이면 0.0을 반환합니다.
    pub fn ma_deviation(&self, closes: &[Decimal], period: usize) -> f64 {
        let ma = match self.sma(closes, SmaParams { period }) {
            Ok(series) => last_value(&series),
            Err(e) => {
                debug!(error = %e, "이격도 계산 불가");
                None
            }
        };

        match (ma, closes.last()) {
            (Some(ma), Some(close)) if ma != Decimal::ZERO => {
                ((*close - ma) / ma * dec!(100)).to_f64_or_zero()
            }
            _ => 0.0,
        }
    }

    /// MA20/50/200 배열 추세.
    ///
    /// 200개 미만이면 `MaTrend::InsufficientData`.
    pub fn ma_trend(&self, closes: &[Decimal]) -> MaTrend {
        if closes.len() < 200 {
            return MaTrend::InsufficientData;
        }

        let ma = |period| {
            self.sma(closes, SmaParams { period })
                .ok()
                .and_then(|s| last_value(&s))
        };

        match (ma(20), ma(50), ma(200)) {
            (Some(ma20), Some(ma50), Some(ma200)) if ma20 > ma50 && ma50 > ma200 => {
                MaTrend::Uptrend
            }
            (Some(ma20), Some(ma50), Some(ma200)) if ma20 < ma50 && ma50 < ma200 => {
                MaTrend::Downtrend
            }
            _ => MaTrend::Flat,
        }
    }
}

/// 히스토그램 최근 3개 값으로 기울기를 판정합니다.
fn histogram_slope(histogram: &[Decimal]) -> HistogramSlope {
    let n = histogram.len();
    if n < 3 {
        return HistogramSlope::Neutral;
    }
    let (h0, h1, h2) = (histogram[n - 1], histogram[n - 2], histogram[n - 3]);

    if h0 > h1 && h1 < h2 {
        HistogramSlope::Bottoming
    } else if h0 < h1 && h1 > h2 {
        HistogramSlope::Topping
    } else if h0 > h1 {
        HistogramSlope::Rising
    } else {
        HistogramSlope::Falling
    }
}

/// 이격도 판정 (±10% 초과).
pub fn classify_ma_deviation(deviation: f64) -> MaDeviationSignal {
    if deviation > 10.0 {
        MaDeviationSignal::UpperDeviation
    } else if deviation < -10.0 {
        MaDeviationSignal::LowerDeviation
    } else {
        MaDeviationSignal::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
        ]
    }

    #[test]
    fn test_sma_basic() {
        let trend = TrendIndicators::new();
        let sma = trend.sma(&sample_prices(), SmaParams { period: 3 }).unwrap();

        assert!(sma[0].is_none());
        assert!(sma[1].is_none());
        // (100 + 102 + 101) / 3 = 101
        assert_eq!(sma[2], Some(dec!(101)));
        // (107 + 108 + 109) / 3 = 108
        assert_eq!(sma[9], Some(dec!(108)));
    }

    #[test]
    fn test_ema_seeded_with_sma() {
        let trend = TrendIndicators::new();
        let ema = trend.ema(&sample_prices(), EmaParams { period: 3 }).unwrap();

        assert!(ema[1].is_none());
        assert_eq!(ema[2], Some(dec!(101)));
        // k = 0.5 → 103 * 0.5 + 101 * 0.5 = 102
        assert_eq!(ema[3], Some(dec!(102)));
    }

    #[test]
    fn test_macd_basic() {
        let trend = TrendIndicators::new();
        let prices: Vec<Decimal> = (0..50).map(|i| Decimal::from(100 + i)).collect();

        let macd = trend.macd(&prices, MacdParams::default()).unwrap();

        assert_eq!(macd.len(), prices.len());
        assert!(macd[0].macd.is_none());
        assert!(macd[25].macd.is_some());
        assert!(macd[40].histogram.is_some());
    }

    #[test]
    fn test_macd_reading_insufficient_is_neutral() {
        let trend = TrendIndicators::new();
        let reading = trend.macd_reading(&sample_prices(), MacdParams::default(), MacdVariant::Extended);

        assert_eq!(reading.signal, Signal::Neutral);
        assert_eq!(reading.hist_slope(), HistogramSlope::Neutral);
        assert_eq!(reading.zero_filter(), ZeroLineFilter::BelowZero);
    }

    #[test]
    fn test_macd_reading_uptrend_above_zero() {
        let trend = TrendIndicators::new();
        // 가속 상승: MACD가 양수이고 시그널 위
        let prices: Vec<Decimal> = (0..80).map(|i| Decimal::from(100 + i * i / 10)).collect();
        let reading = trend.macd_reading(&prices, MacdParams::default(), MacdVariant::Extended);

        assert_eq!(reading.zero_filter(), ZeroLineFilter::AboveZero);
        assert_eq!(reading.signal, Signal::Bullish);

        let basic = trend.macd_reading(&prices, MacdParams::default(), MacdVariant::Basic);
        assert_eq!(basic.signal, Signal::Bullish);
        assert!(basic.extension.is_none());
    }

    #[test]
    fn test_histogram_slope() {
        assert_eq!(
            histogram_slope(&[dec!(-1), dec!(-3), dec!(-2)]),
            HistogramSlope::Bottoming
        );
        assert_eq!(
            histogram_slope(&[dec!(1), dec!(3), dec!(2)]),
            HistogramSlope::Topping
        );
        assert_eq!(
            histogram_slope(&[dec!(1), dec!(2), dec!(3)]),
            HistogramSlope::Rising
        );
        assert_eq!(
            histogram_slope(&[dec!(3), dec!(2), dec!(1)]),
            HistogramSlope::Falling
        );
        assert_eq!(histogram_slope(&[dec!(1), dec!(2)]), HistogramSlope::Neutral);
    }

    #[test]
    fn test_ma_deviation() {
        let trend = TrendIndicators::new();
        let mut prices = vec![dec!(100); 49];
        prices.push(dec!(149));
        // MA50 = (4900 + 149) / 50 = 100.98
        let dev = trend.ma_deviation(&prices, 50);
        assert!((dev - 47.5539710833829).abs() < 1e-9);

        // 데이터 부족
        assert_eq!(trend.ma_deviation(&prices[..10], 50), 0.0);
        // MA가 0
        assert_eq!(trend.ma_deviation(&[Decimal::ZERO; 60], 50), 0.0);
    }

    #[test]
    fn test_ma_trend() {
        let trend = TrendIndicators::new();

        let short: Vec<Decimal> = (0..10).map(Decimal::from).collect();
        assert_eq!(trend.ma_trend(&short), MaTrend::InsufficientData);

        let rising: Vec<Decimal> = (0..250).map(|i| Decimal::from(100 + i)).collect();
        assert_eq!(trend.ma_trend(&rising), MaTrend::Uptrend);

        let falling: Vec<Decimal> = (0..250).map(|i| Decimal::from(1000 - i)).collect();
        assert_eq!(trend.ma_trend(&falling), MaTrend::Downtrend);

        assert_eq!(trend.ma_trend(&vec![dec!(50); 250]), MaTrend::Flat);
    }

    #[test]
    fn test_classify_ma_deviation_is_strict() {
        assert_eq!(classify_ma_deviation(10.0), MaDeviationSignal::Neutral);
        assert_eq!(classify_ma_deviation(10.01), MaDeviationSignal::UpperDeviation);
        assert_eq!(classify_ma_deviation(-10.5), MaDeviationSignal::LowerDeviation);
    }
}
