//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표들을 제공합니다.
//! - RSI (Relative Strength Index, Wilder 평활)
//! - Stochastic RSI

use advisor_core::{DecimalExt, RsiSignal};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ensure_len, ensure_period, last_value, IndicatorResult};

/// 0으로 나누기 방지용 분모 보정값.
pub(crate) const EPSILON: Decimal = dec!(0.0000000001);

/// RSI 중립 기본값.
pub const NEUTRAL_RSI: f64 = 50.0;

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// Stochastic RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StochRsiParams {
    /// RSI 기간 (기본: 14).
    pub rsi_period: usize,
    /// RSI의 최소/최대 구간 (기본: 14).
    pub stoch_period: usize,
}

impl Default for StochRsiParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            stoch_period: 14,
        }
    }
}

/// Stochastic RSI 판독.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StochRsiReading {
    pub value: f64,
    pub signal: RsiSignal,
}

impl Default for StochRsiReading {
    fn default() -> Self {
        Self {
            value: NEUTRAL_RSI,
            signal: RsiSignal::Neutral,
        }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct MomentumCalculator;

impl MomentumCalculator {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS))
    /// RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 평균은 Wilder 평활(alpha = 1/period)이며, 첫 평균은 처음 period개
    /// 변화량의 단순 평균입니다. 평균 하락폭이 0이면 100, 상승/하락이 모두
    /// 0이면(횡보) 50입니다.
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (처음 period개는 None)
    pub fn rsi(&self, prices: &[Decimal], params: RsiParams) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;
        ensure_len(prices.len(), period + 1)?;

        let (gains, losses) = split_changes(prices);
        let period_decimal = Decimal::from(period);

        let mut result = vec![None; period];

        // 초기 평균은 단순 평균
        let mut avg_gain = gains[..period].iter().sum::<Decimal>() / period_decimal;
        let mut avg_loss = losses[..period].iter().sum::<Decimal>() / period_decimal;
        result.push(Some(rsi_from_averages(avg_gain, avg_loss)));

        let smoothing = period_decimal - Decimal::ONE;
        for (gain, loss) in gains.iter().zip(losses.iter()).skip(period) {
            avg_gain = (avg_gain * smoothing + *gain) / period_decimal;
            avg_loss = (avg_loss * smoothing + *loss) / period_decimal;
            result.push(Some(rsi_from_averages(avg_gain, avg_loss)));
        }

        Ok(result)
    }

    /// 최신 RSI 값.
    ///
    /// 빈 시계열, 기간 미달, 횡보 시계열은 50.0을 반환합니다.
    pub fn rsi_value(&self, prices: &[Decimal], params: RsiParams) -> f64 {
        match self.rsi(prices, params) {
            Ok(series) => last_value(&series)
                .map(|v| v.to_f64_or_zero())
                .unwrap_or(NEUTRAL_RSI),
            Err(e) => {
                debug!(error = %e, "RSI 계산 불가, 중립값 사용");
                NEUTRAL_RSI
            }
        }
    }

    /// 단순 이동평균 방식 RSI.
    ///
    /// 구간 평균 상승/하락폭을 사용하며 분모에 1e-10을 더합니다.
    /// Stochastic RSI의 입력으로 사용됩니다.
    pub fn rolling_rsi(
        &self,
        prices: &[Decimal],
        params: RsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;
        ensure_period(period)?;
        ensure_len(prices.len(), period + 1)?;

        let (gains, losses) = split_changes(prices);
        let period_decimal = Decimal::from(period);

        let mut result = vec![None; period];
        let mut gain_sum: Decimal = gains[..period].iter().sum();
        let mut loss_sum: Decimal = losses[..period].iter().sum();

        for i in period..=gains.len() {
            if i > period {
                gain_sum += gains[i - 1] - gains[i - 1 - period];
                loss_sum += losses[i - 1] - losses[i - 1 - period];
            }
            let rs = (gain_sum / period_decimal) / (loss_sum / period_decimal + EPSILON);
            result.push(Some(dec!(100) - dec!(100) / (Decimal::ONE + rs)));
        }

        Ok(result)
    }

    /// Stochastic RSI 계산.
    ///
    /// StochRSI = 100 × (RSI - 최저 RSI) / (최고 RSI - 최저 RSI + 1e-10)
    pub fn stochastic_rsi(
        &self,
        prices: &[Decimal],
        params: StochRsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        ensure_period(params.stoch_period)?;
        ensure_len(prices.len(), params.rsi_period + params.stoch_period)?;

        let rsi = self.rolling_rsi(prices, RsiParams { period: params.rsi_period })?;
        let first = params.rsi_period + params.stoch_period - 1;

        let result = (0..rsi.len())
            .map(|i| {
                if i < first {
                    return None;
                }
                let window: Vec<Decimal> = rsi[i + 1 - params.stoch_period..=i]
                    .iter()
                    .flatten()
                    .copied()
                    .collect();
                let lowest = window.iter().min().copied()?;
                let highest = window.iter().max().copied()?;
                let current = rsi[i]?;
                Some(dec!(100) * (current - lowest) / (highest - lowest + EPSILON))
            })
            .collect();

        Ok(result)
    }

    /// 최신 Stochastic RSI 판독 (≥80 과매수, ≤20 과매도).
    ///
    /// 데이터가 부족하면 50 / 중립.
    pub fn stochastic_rsi_reading(&self, prices: &[Decimal], params: StochRsiParams) -> StochRsiReading {
        let value = match self.stochastic_rsi(prices, params) {
            Ok(series) => last_value(&series).map(|v| v.to_f64_or_zero()),
            Err(e) => {
                debug!(error = %e, "Stochastic RSI 계산 불가, 중립값 사용");
                None
            }
        };

        match value {
            Some(value) => {
                let signal = if value >= 80.0 {
                    RsiSignal::Overbought
                } else if value <= 20.0 {
                    RsiSignal::Oversold
                } else {
                    RsiSignal::Neutral
                };
                StochRsiReading { value, signal }
            }
            None => StochRsiReading::default(),
        }
    }
}

/// 가격 변화를 상승폭/하락폭으로 분리합니다. 인덱스 i는 prices[i+1] - prices[i].
fn split_changes(prices: &[Decimal]) -> (Vec<Decimal>, Vec<Decimal>) {
    prices
        .windows(2)
        .map(|w| {
            let delta = w[1] - w[0];
            if delta > Decimal::ZERO {
                (delta, Decimal::ZERO)
            } else {
                (Decimal::ZERO, -delta)
            }
        })
        .unzip()
}

fn rsi_from_averages(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
    if avg_loss == Decimal::ZERO {
        if avg_gain == Decimal::ZERO {
            dec!(50)
        } else {
            dec!(100)
        }
    } else {
        let rs = avg_gain / avg_loss;
        dec!(100) - (dec!(100) / (Decimal::ONE + rs))
    }
}

/// RSI 판정 (<30 과매도, >70 과매수).
pub fn classify_rsi(rsi: f64) -> RsiSignal {
    if rsi < 30.0 {
        RsiSignal::Oversold
    } else if rsi > 70.0 {
        RsiSignal::Overbought
    } else {
        RsiSignal::Neutral
    }
}
