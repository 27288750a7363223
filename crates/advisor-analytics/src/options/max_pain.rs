//! Max Pain.
//!
//! 각 행사가 k에서 만기 시 옵션 매수자 총 지급액
//! Σ_콜 max(0, k - strike) × OI + Σ_풋 max(0, strike - k) × OI
//! 를 계산하여 이를 최소화하는 행사가를 찾습니다.

use advisor_core::{OptionChainSnapshot, OptionSide};

/// 지급액 최소 행사가. 동률이면 낮은 행사가, 체인이 비어 있으면 `None`.
pub fn max_pain(chain: &OptionChainSnapshot) -> Option<f64> {
    let mut strikes: Vec<f64> = chain
        .contracts()
        .map(|(_, c)| c.strike)
        .filter(|s| s.is_finite())
        .collect();
    strikes.sort_by(|a, b| a.total_cmp(b));
    strikes.dedup();

    let mut best: Option<(f64, f64)> = None;
    for k in strikes {
        let payout = max_pain_payout(chain, k);
        match best {
            Some((_, min)) if payout >= min => {}
            _ => best = Some((k, payout)),
        }
    }

    best.map(|(strike, _)| strike)
}

/// 만기 가격 `settle`에서 옵션 매수자에게 지급되는 총액.
pub fn max_pain_payout(chain: &OptionChainSnapshot, settle: f64) -> f64 {
    chain
        .contracts()
        .filter(|(_, c)| c.strike.is_finite())
        .map(|(side, c)| {
            let intrinsic = match side {
                OptionSide::Call => settle - c.strike,
                OptionSide::Put => c.strike - settle,
            };
            intrinsic.max(0.0) * c.open_interest as f64
        })
        .sum()
}
