//! 다중 타임프레임 추세 정렬.
//!
//! 일봉 시계열을 주봉(ISO 주)과 월봉(달력 월)으로 리샘플링한 뒤
//! 각 타임프레임에서 단순 추세 판정(종가 vs MA20, ±2% 불감대)을 수행하고
//! 3개 중 2개 이상이 일치하면 정렬된 것으로 봅니다.
//!
//! # 리샘플링 규칙
//!
//! - **Open**: 구간 첫 거래일의 시가
//! - **High**: 구간 중 최고가
//! - **Low**: 구간 중 최저가
//! - **Close**: 구간 마지막 거래일의 종가
//! - **Volume**: 구간 전체 거래량 합계
//! - **Date**: 구간 마지막 거래일

use advisor_core::{Bar, MtfAlignment, PriceSeries, TimeframeDetails, TimeframeSignal};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 타임프레임별 판정에 필요한 최소 봉 수.
pub const MIN_TIMEFRAME_SAMPLES: usize = 20;

const MA_PERIOD: usize = 20;

/// 리샘플링 주기.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResamplePeriod {
    /// ISO 주 (월요일 시작)
    Weekly,
    /// 달력 월
    Monthly,
}

impl ResamplePeriod {
    fn bucket(self, date: NaiveDate) -> (i32, u32) {
        match self {
            Self::Weekly => {
                let week = date.iso_week();
                (week.year(), week.week())
            }
            Self::Monthly => (date.year(), date.month()),
        }
    }
}

/// 다중 타임프레임 판독.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MtfReading {
    pub alignment: MtfAlignment,
    pub details: TimeframeDetails,
}

/// 일봉 → 주봉/월봉 리샘플링.
///
/// 불완전한 마지막 구간도 포함합니다.
pub fn resample(bars: &[Bar], period: ResamplePeriod) -> Vec<Bar> {
    let mut resampled = Vec::new();
    let mut bucket_bars: Vec<&Bar> = Vec::new();
    let mut current_bucket: Option<(i32, u32)> = None;

    for bar in bars {
        let key = period.bucket(bar.date);

        if current_bucket != Some(key) {
            if let Some(candle) = aggregate(&bucket_bars) {
                resampled.push(candle);
            }
            bucket_bars.clear();
            current_bucket = Some(key);
        }

        bucket_bars.push(bar);
    }

    if let Some(candle) = aggregate(&bucket_bars) {
        resampled.push(candle);
    }

    resampled
}

fn aggregate(bars: &[&Bar]) -> Option<Bar> {
    let first = bars.first()?;
    let last = bars.last()?;

    Some(Bar {
        date: last.date,
        open: first.open,
        high: bars.iter().map(|b| b.high).max()?,
        low: bars.iter().map(|b| b.low).min()?,
        close: last.close,
        volume: bars.iter().map(|b| b.volume).sum(),
    })
}

/// 종가와 MA20 비교로 단일 타임프레임 추세를 판정합니다.
///
/// 20개 미만이면 `InsufficientData`.
pub fn timeframe_signal(closes: &[Decimal]) -> TimeframeSignal {
    if closes.len() < MIN_TIMEFRAME_SAMPLES {
        return TimeframeSignal::InsufficientData;
    }

    let window = &closes[closes.len() - MA_PERIOD..];
    let ma = window.iter().sum::<Decimal>() / Decimal::from(MA_PERIOD);
    let close = closes[closes.len() - 1];

    if close > ma * dec!(1.02) {
        TimeframeSignal::Bullish
    } else if close < ma * dec!(0.98) {
        TimeframeSignal::Bearish
    } else {
        TimeframeSignal::Neutral
    }
}

/// 일봉/주봉/월봉 추세 정렬.
pub fn multi_timeframe_alignment(series: &PriceSeries) -> MtfReading {
    let bars = series.bars();
    let closes_of = |bars: &[Bar]| bars.iter().map(|b| b.close).collect::<Vec<_>>();

    let details = TimeframeDetails {
        daily: timeframe_signal(&closes_of(bars)),
        weekly: timeframe_signal(&closes_of(&resample(bars, ResamplePeriod::Weekly))),
        monthly: timeframe_signal(&closes_of(&resample(bars, ResamplePeriod::Monthly))),
    };

    let signals = [details.daily, details.weekly, details.monthly];
    let bullish = signals.iter().filter(|s| **s == TimeframeSignal::Bullish).count();
    let bearish = signals.iter().filter(|s| **s == TimeframeSignal::Bearish).count();

    let alignment = if bullish >= 2 {
        MtfAlignment::AlignedBullish
    } else if bearish >= 2 {
        MtfAlignment::AlignedBearish
    } else {
        MtfAlignment::Mixed
    };

    MtfReading { alignment, details }
}
