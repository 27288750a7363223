//! 앵커드 VWAP.
//!
//! 앵커 시점부터 대표 가격 (H+L+C)/3 의 거래량 가중 평균을 계산합니다.
//! AVWAP = Σ(대표가 × 거래량) / (Σ거래량 + 1e-10)

use advisor_core::{Bar, DecimalExt, PriceSeries};
use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::momentum::EPSILON;

/// 최소 데이터 수.
const MIN_SAMPLES: usize = 20;

/// VWAP 앵커.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VwapAnchor {
    /// 최신 봉이 속한 연도의 첫 봉
    #[default]
    YearStart,
    /// 최신 봉이 속한 분기의 첫 봉
    QuarterStart,
    /// 시계열 최저가 봉
    SwingLow,
}

/// 앵커드 VWAP 판독.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchoredVwapReading {
    pub avwap: f64,
    /// (종가 - AVWAP) / AVWAP × 100
    pub deviation_pct: f64,
    pub anchor: VwapAnchor,
}

fn quarter(month: u32) -> u32 {
    (month - 1) / 3
}

/// 앵커 시작 인덱스.
fn anchor_index(bars: &[Bar], anchor: VwapAnchor) -> usize {
    let Some(last) = bars.last() else {
        return 0;
    };

    match anchor {
        VwapAnchor::YearStart => bars
            .iter()
            .position(|b| b.date.year() == last.date.year())
            .unwrap_or(0),
        VwapAnchor::QuarterStart => bars
            .iter()
            .position(|b| {
                b.date.year() == last.date.year()
                    && quarter(b.date.month()) == quarter(last.date.month())
            })
            .unwrap_or(0),
        VwapAnchor::SwingLow => {
            // 최저가가 여럿이면 가장 이른 봉
            let mut index = 0;
            for (i, bar) in bars.iter().enumerate() {
                if bar.low < bars[index].low {
                    index = i;
                }
            }
            index
        }
    }
}

/// 앵커드 VWAP과 종가 괴리율.
///
/// 20개 미만이거나 전체 거래량이 0이면 0을 반환합니다.
pub fn anchored_vwap(series: &PriceSeries, anchor: VwapAnchor) -> AnchoredVwapReading {
    let bars = series.bars();
    let zero = AnchoredVwapReading {
        anchor,
        ..Default::default()
    };

    let total_volume: Decimal = bars.iter().map(|b| b.volume).sum();
    if bars.len() < MIN_SAMPLES || total_volume.is_zero() {
        debug!(len = bars.len(), "앵커드 VWAP 계산 불가");
        return zero;
    }

    let segment = &bars[anchor_index(bars, anchor)..];
    let (weighted, volume) = segment.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(weighted, volume), bar| (weighted + bar.typical_price() * bar.volume, volume + bar.volume),
    );
    let avwap = weighted / (volume + EPSILON);

    let close = bars[bars.len() - 1].close;
    let deviation_pct = if avwap > Decimal::ZERO {
        ((close - avwap) / avwap * dec!(100)).to_f64_or_zero()
    } else {
        0.0
    };

    AnchoredVwapReading {
        avwap: avwap.to_f64_or_zero(),
        deviation_pct,
        anchor,
    }
}
