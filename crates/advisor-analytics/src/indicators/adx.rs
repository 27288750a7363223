//! ADX / DI (Average Directional Index).
//!
//! True Range, +DM, -DM을 Wilder 방식(alpha = 1/period, 첫 값 시드)으로
//! 평활한 뒤 DX와 ADX를 계산합니다.

use advisor_core::{DecimalExt, TrendStrength};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::momentum::EPSILON;
use super::{ensure_len, ensure_period, IndicatorResult, VolatilityIndicators};

/// ADX 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdxParams {
    /// 평활 기간 (기본: 14).
    pub period: usize,
}

impl Default for AdxParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 시점별 ADX/DI 값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxResult {
    pub adx: Decimal,
    pub plus_di: Decimal,
    pub minus_di: Decimal,
}

/// 최신 ADX 판독.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AdxReading {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub signal: TrendStrength,
}

impl AdxReading {
    /// ADX ≥ 25 강한 추세, ≥ 15 약한 추세, 그 외 레인지.
    pub fn classify(adx: f64) -> TrendStrength {
        if adx >= 25.0 {
            TrendStrength::Strong
        } else if adx >= 15.0 {
            TrendStrength::Weak
        } else {
            TrendStrength::Range
        }
    }
}

/// ADX/DI 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct DirectionalIndicators;

impl DirectionalIndicators {
    pub fn new() -> Self {
        Self
    }

    /// 시점별 ADX, +DI, -DI.
    ///
    /// period+1개 미만이면 `InsufficientData`.
    pub fn calculate(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> IndicatorResult<Vec<AdxResult>> {
        let period = params.period;
        ensure_period(period)?;

        let true_ranges = VolatilityIndicators::new().true_range(high, low, close);
        let len = true_ranges.len();
        ensure_len(len, period + 1)?;

        // 방향성 움직임
        let mut plus_dm = vec![Decimal::ZERO; len];
        let mut minus_dm = vec![Decimal::ZERO; len];
        for i in 1..len {
            let up = high[i] - high[i - 1];
            let down = low[i - 1] - low[i];
            if up > down && up > Decimal::ZERO {
                plus_dm[i] = up;
            }
            if down > up && down > Decimal::ZERO {
                minus_dm[i] = down;
            }
        }

        let alpha = Decimal::ONE / Decimal::from(period);
        let smoothed_tr = wilder_smooth(&true_ranges, alpha);
        let smoothed_plus = wilder_smooth(&plus_dm, alpha);
        let smoothed_minus = wilder_smooth(&minus_dm, alpha);

        let mut di = Vec::with_capacity(len);
        let mut dx = Vec::with_capacity(len);
        for i in 0..len {
            let (plus_di, minus_di) = if smoothed_tr[i] > Decimal::ZERO {
                (
                    dec!(100) * smoothed_plus[i] / smoothed_tr[i],
                    dec!(100) * smoothed_minus[i] / smoothed_tr[i],
                )
            } else {
                (Decimal::ZERO, Decimal::ZERO)
            };
            di.push((plus_di, minus_di));
            dx.push(dec!(100) * (plus_di - minus_di).abs() / (plus_di + minus_di + EPSILON));
        }

        let adx = wilder_smooth(&dx, alpha);

        Ok(di
            .into_iter()
            .zip(adx)
            .map(|((plus_di, minus_di), adx)| AdxResult {
                adx,
                plus_di,
                minus_di,
            })
            .collect())
    }

    /// 최신 ADX 판독. 데이터가 부족하면 0 / 레인지.
    pub fn reading(
        &self,
        high: &[Decimal],
        low: &[Decimal],
        close: &[Decimal],
        params: AdxParams,
    ) -> AdxReading {
        let last = match self.calculate(high, low, close, params) {
            Ok(series) => series.last().copied(),
            Err(e) => {
                debug!(error = %e, "ADX 계산 불가, 레인지로 처리");
                None
            }
        };

        match last {
            Some(r) => {
                let adx = r.adx.to_f64_or_zero();
                AdxReading {
                    adx,
                    plus_di: r.plus_di.to_f64_or_zero(),
                    minus_di: r.minus_di.to_f64_or_zero(),
                    signal: AdxReading::classify(adx),
                }
            }
            None => AdxReading::default(),
        }
    }
}

/// 첫 값을 시드로 하는 지수 평활.
fn wilder_smooth(values: &[Decimal], alpha: Decimal) -> Vec<Decimal> {
    let mut result = Vec::with_capacity(values.len());
    let mut prev: Option<Decimal> = None;
    for value in values {
        let next = match prev {
            None => *value,
            Some(p) => *value * alpha + p * (Decimal::ONE - alpha),
        };
        result.push(next);
        prev = Some(next);
    }
    result
}
