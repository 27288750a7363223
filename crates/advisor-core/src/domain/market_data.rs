//! 시장 데이터 타입 및 구조체.
//!
//! 이 모듈은 분석 엔진의 입력 시계열을 정의합니다:
//! - `Bar` - 일 단위 OHLCV 데이터
//! - `PriceSeries` - 날짜 오름차순이 보장된 `Bar` 시퀀스

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{Price, Volume};

/// 일 단위 OHLCV 데이터.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: Price,
    /// 고가
    pub high: Price,
    /// 저가
    pub low: Price,
    /// 종가
    pub close: Price,
    /// 거래량
    pub volume: Volume,
}

impl Bar {
    /// 새 바를 생성합니다.
    pub fn new(
        date: NaiveDate,
        open: Price,
        high: Price,
        low: Price,
        close: Price,
        volume: Volume,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 몸통 크기(절대값)를 반환합니다.
    pub fn body_size(&self) -> Decimal {
        (self.close - self.open).abs()
    }

    /// 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }

    /// 양봉 여부.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 대표 가격 (H+L+C)/3.
    pub fn typical_price(&self) -> Decimal {
        (self.high + self.low + self.close) / Decimal::from(3)
    }
}

/// 날짜 오름차순이 보장된 가격 시계열.
///
/// 생성 시점에 날짜가 엄격하게 증가하는지 검증합니다. 빈 시계열은 허용되며,
/// 점수 엔진은 이를 "분석 불가"로 처리합니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// 시계열을 생성합니다.
    ///
    /// # 에러
    /// 날짜가 중복되거나 역순이면 `CoreError::InvalidSeries`.
    pub fn new(bars: Vec<Bar>) -> CoreResult<Self> {
        for (i, pair) in bars.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::InvalidSeries(format!(
                    "{}번째 바의 날짜 {}가 이전 날짜 {} 이후가 아닙니다",
                    i + 1,
                    pair[1].date,
                    pair[0].date
                )));
            }
        }
        Ok(Self { bars })
    }

    /// 빈 시계열.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// 마지막 바.
    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn opens(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.open).collect()
    }

    pub fn highs(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.low).collect()
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            bars: Vec<Bar>,
        }

        let raw = Raw::deserialize(deserializer)?;
        PriceSeries::new(raw.bars).map_err(serde::de::Error::custom)
    }
}
