//! OBV (On-Balance Volume) 지표.
//!
//! OBV는 거래량을 이용하여 자금 흐름을 추적하는 지표입니다.
//!
//! ## 계산 방식
//! - 종가 상승: OBV += 거래량
//! - 종가 하락: OBV -= 거래량
//! - 종가 동일: OBV 변화 없음
//!
//! ## 판독
//! - 추세: OBV와 OBV 이동평균 비교 (|MA|의 2% 불감대)
//! - 다이버전스: 최근 구간의 가격 변화와 OBV 변화 방향이 반대

use advisor_core::{Divergence, ObvTrend};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{IndicatorError, IndicatorResult};

/// OBV 판독 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObvParams {
    /// OBV 이동평균 기간 (기본: 20).
    pub ma_period: usize,
    /// 추세 불감대 비율 (기본: 0.02).
    pub dead_band: Decimal,
    /// 다이버전스 비교 구간 (기본: 20).
    pub divergence_lookback: usize,
}

impl Default for ObvParams {
    fn default() -> Self {
        Self {
            ma_period: 20,
            dead_band: dec!(0.02),
            divergence_lookback: 20,
        }
    }
}

/// OBV 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObvResult {
    /// OBV 값.
    pub obv: i64,
    /// OBV 변화량 (전일 대비).
    pub change: i64,
}

/// 최신 OBV 판독.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ObvReading {
    pub obv: i64,
    pub trend: ObvTrend,
    pub divergence: Divergence,
}

/// OBV 계산기.
#[derive(Debug, Default, Clone, Copy)]
pub struct ObvIndicator;

impl ObvIndicator {
    /// 새로운 OBV 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// OBV (On-Balance Volume) 계산. 첫 값은 0입니다.
    pub fn calculate(&self, close: &[Decimal], volume: &[Decimal]) -> IndicatorResult<Vec<ObvResult>> {
        if close.len() != volume.len() {
            return Err(IndicatorError::InvalidParameter(
                "종가와 거래량 데이터의 길이가 일치하지 않습니다".to_string(),
            ));
        }

        if close.is_empty() {
            return Err(IndicatorError::InsufficientData {
                required: 1,
                provided: 0,
            });
        }

        let mut result = Vec::with_capacity(close.len());
        let mut current_obv = 0i64;

        for i in 0..close.len() {
            let change = if i == 0 {
                0
            } else {
                let price_change = close[i] - close[i - 1];

                if price_change > Decimal::ZERO {
                    self.volume_to_i64(volume[i])?
                } else if price_change < Decimal::ZERO {
                    -self.volume_to_i64(volume[i])?
                } else {
                    0
                }
            };

            current_obv = current_obv.saturating_add(change);

            result.push(ObvResult {
                obv: current_obv,
                change,
            });
        }

        Ok(result)
    }

    /// 최신 OBV 추세와 다이버전스.
    ///
    /// MA 기간 미만이면 추세는 횡보, 비교 구간 미만이면 다이버전스 없음.
    pub fn reading(&self, close: &[Decimal], volume: &[Decimal], params: ObvParams) -> ObvReading {
        let series = match self.calculate(close, volume) {
            Ok(series) => series,
            Err(e) => {
                debug!(error = %e, "OBV 계산 불가");
                return ObvReading::default();
            }
        };

        let obv: Vec<Decimal> = series.iter().map(|r| Decimal::from(r.obv)).collect();
        let len = obv.len();
        let current = obv[len - 1];

        let trend = if params.ma_period > 0 && len >= params.ma_period {
            let ma = obv[len - params.ma_period..].iter().sum::<Decimal>()
                / Decimal::from(params.ma_period);
            let band = ma.abs() * params.dead_band;
            if current > ma + band {
                ObvTrend::Rising
            } else if current < ma - band {
                ObvTrend::Falling
            } else {
                ObvTrend::Flat
            }
        } else {
            ObvTrend::Flat
        };

        let lookback = params.divergence_lookback;
        let divergence = if lookback > 0 && len >= lookback {
            let price_change = close[len - 1] - close[len - lookback];
            let obv_change = current - obv[len - lookback];

            if price_change < Decimal::ZERO && obv_change > Decimal::ZERO {
                Divergence::Bullish
            } else if price_change > Decimal::ZERO && obv_change < Decimal::ZERO {
                Divergence::Bearish
            } else {
                Divergence::None
            }
        } else {
            Divergence::None
        };

        ObvReading {
            obv: series[len - 1].obv,
            trend,
            divergence,
        }
    }

    /// Decimal 거래량을 i64로 변환 (소수점 이하 버림).
    fn volume_to_i64(&self, volume: Decimal) -> IndicatorResult<i64> {
        volume.trunc().to_i64().ok_or_else(|| {
            IndicatorError::CalculationError(format!("거래량 변환 실패: {}", volume))
        })
    }
}
