//! 옵션 시장 구조 지표.
//!
//! 하나의 `OptionChainSnapshot`과 현재가에서 매 호출마다 새로 계산됩니다.
//! `None`은 "지표 사용 불가"를 뜻하며, 종합 점수에서는 0이 아니라 제외로 처리됩니다.

use serde::{Deserialize, Serialize};

/// Put/Call Ratio.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PcrMetrics {
    /// 거래량 기준 PCR (풋 거래량 / 콜 거래량)
    pub volume_pcr: f64,
    /// 미결제약정 기준 PCR (풋 OI / 콜 OI)
    pub oi_pcr: f64,
    pub total_call_volume: u64,
    pub total_put_volume: u64,
    pub total_call_oi: u64,
    pub total_put_oi: u64,
}

impl PcrMetrics {
    /// 콜+풋 총 미결제약정.
    pub fn total_open_interest(&self) -> u64 {
        self.total_call_oi + self.total_put_oi
    }

    /// 판정에 쓸 OI PCR. 콜 OI가 0이면 비율이 정의되지 않으므로 `None`.
    pub fn oi_reading(&self) -> Option<f64> {
        (self.total_call_oi > 0).then_some(self.oi_pcr)
    }

    /// 판정에 쓸 거래량 PCR. 콜 거래량이 0이면 `None`.
    pub fn volume_reading(&self) -> Option<f64> {
        (self.total_call_volume > 0).then_some(self.volume_pcr)
    }
}

/// 행사가별 GEX 합계.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeGex {
    pub strike: f64,
    pub gex: f64,
    /// 해당 행사가의 콜+풋 미결제약정
    pub open_interest: u64,
}

/// 감마 Wall.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GammaWall {
    pub strike: f64,
    pub gex: f64,
}

/// 감마 익스포저 프로파일.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GexProfile {
    /// 계산에 사용한 현재가
    pub spot: f64,
    /// 전체 행사가 GEX 합계
    pub total_gex: f64,
    /// 현재가 근방 행사가만의 순 GEX
    pub nearby_net_gex: f64,
    /// 행사가 오름차순 GEX
    pub strike_gex: Vec<StrikeGex>,
    /// 양(+) GEX 최대 행사가 (저항/자석)
    pub positive_wall: Option<GammaWall>,
    /// 음(-) GEX 최대 크기 행사가 (지지/가속 구간)
    pub negative_wall: Option<GammaWall>,
}

/// 옵션 지표 묶음.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionsMetrics {
    pub pcr: Option<PcrMetrics>,
    pub gex: Option<GexProfile>,
    pub max_pain: Option<f64>,
    pub atm_iv: Option<f64>,
}

impl OptionsMetrics {
    /// 사용 가능한 지표가 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.pcr.is_none() && self.gex.is_none() && self.max_pain.is_none() && self.atm_iv.is_none()
    }
}
