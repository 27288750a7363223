//! 옵션 체인 스냅샷.
//!
//! 옵션 공급자가 제공한 행 데이터를 그대로 담습니다. 여러 만기가 이어붙여진
//! 상태일 수 있으며 분석 엔진은 이 테이블을 변경하지 않습니다.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 콜/풋 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSide {
    Call,
    Put,
}

impl OptionSide {
    /// GEX 부호 (딜러 롱감마 = 콜 +1, 숏감마 = 풋 -1).
    pub fn gex_sign(self) -> f64 {
        match self {
            OptionSide::Call => 1.0,
            OptionSide::Put => -1.0,
        }
    }
}

/// 옵션 계약 한 행.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionContract {
    /// 행사가
    pub strike: f64,
    /// 만기일
    pub expiration: NaiveDate,
    /// 미결제약정
    pub open_interest: u64,
    /// 거래량
    pub volume: u64,
    /// 내재변동성 (0.25 = 25%)
    pub implied_volatility: f64,
    /// 감마 (공급자가 제공하지 않으면 None)
    #[serde(default)]
    pub gamma: Option<f64>,
}

impl OptionContract {
    pub fn new(
        strike: f64,
        expiration: NaiveDate,
        open_interest: u64,
        volume: u64,
        implied_volatility: f64,
    ) -> Self {
        Self {
            strike,
            expiration,
            open_interest,
            volume,
            implied_volatility,
            gamma: None,
        }
    }

    /// 감마 값을 지정합니다.
    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// 사용 가능한 감마. 없음/NaN/0 이하는 추정 대상입니다.
    pub fn usable_gamma(&self) -> Option<f64> {
        self.gamma.filter(|g| g.is_finite() && *g > 0.0)
    }
}

/// 옵션 체인 스냅샷 (콜/풋 두 컬렉션).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionChainSnapshot {
    pub calls: Vec<OptionContract>,
    pub puts: Vec<OptionContract>,
}

impl OptionChainSnapshot {
    pub fn new(calls: Vec<OptionContract>, puts: Vec<OptionContract>) -> Self {
        Self { calls, puts }
    }

    /// 콜/풋 모두 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }

    /// 모든 행을 구분과 함께 순회합니다 (콜 먼저).
    pub fn contracts(&self) -> impl Iterator<Item = (OptionSide, &OptionContract)> {
        self.calls
            .iter()
            .map(|c| (OptionSide::Call, c))
            .chain(self.puts.iter().map(|p| (OptionSide::Put, p)))
    }

    /// 총 미결제약정 (콜 + 풋).
    pub fn total_open_interest(&self) -> u64 {
        self.contracts().map(|(_, c)| c.open_interest).sum()
    }

    /// 가장 가까운 만기일.
    pub fn nearest_expiration(&self) -> Option<NaiveDate> {
        self.contracts().map(|(_, c)| c.expiration).min()
    }
}
