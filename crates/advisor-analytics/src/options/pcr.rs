//! Put/Call Ratio.

use advisor_core::{OptionChainSnapshot, PcrMetrics, Signal};

/// OI 기준 PCR 약세 임계값.
pub const PCR_BEARISH_THRESHOLD: f64 = 1.2;
/// OI 기준 PCR 강세 임계값.
pub const PCR_BULLISH_THRESHOLD: f64 = 0.7;

/// 거래량/미결제약정 기준 PCR.
///
/// 콜과 풋이 모두 비어 있으면 `None`. 분모가 0이면 해당 비율은 0.0입니다.
pub fn put_call_ratio(chain: &OptionChainSnapshot) -> Option<PcrMetrics> {
    if chain.is_empty() {
        return None;
    }

    let total_call_volume: u64 = chain.calls.iter().map(|c| c.volume).sum();
    let total_put_volume: u64 = chain.puts.iter().map(|c| c.volume).sum();
    let total_call_oi: u64 = chain.calls.iter().map(|c| c.open_interest).sum();
    let total_put_oi: u64 = chain.puts.iter().map(|c| c.open_interest).sum();

    Some(PcrMetrics {
        volume_pcr: ratio(total_put_volume, total_call_volume),
        oi_pcr: ratio(total_put_oi, total_call_oi),
        total_call_volume,
        total_put_volume,
        total_call_oi,
        total_put_oi,
    })
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// PCR 구간 판정. > 1.2 약세, < 0.7 강세.
pub fn pcr_signal(pcr: f64) -> Signal {
    if pcr > PCR_BEARISH_THRESHOLD {
        Signal::Bearish
    } else if pcr < PCR_BULLISH_THRESHOLD {
        Signal::Bullish
    } else {
        Signal::Neutral
    }
}
