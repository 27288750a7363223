//! ATM 내재변동성.

use advisor_core::OptionChainSnapshot;

/// 유효 IV 범위 (0, 2).
fn is_valid_iv(iv: f64) -> bool {
    iv.is_finite() && iv > 0.0 && iv < 2.0
}

/// 최근월 만기에서 현재가에 가장 가까운 행사가의 IV 평균 (콜/풋 모두).
///
/// 거리가 같은 행사가가 둘이면 낮은 쪽을 선택합니다. 해당 행사가에 유효한
/// IV가 하나도 없으면 `None`.
pub fn atm_implied_volatility(chain: &OptionChainSnapshot, spot: f64) -> Option<f64> {
    let expiration = chain.nearest_expiration()?;

    let front: Vec<_> = chain
        .contracts()
        .map(|(_, c)| c)
        .filter(|c| c.expiration == expiration && c.strike.is_finite())
        .collect();

    let atm_strike = front
        .iter()
        .map(|c| c.strike)
        .min_by(|a, b| {
            (a - spot)
                .abs()
                .total_cmp(&(b - spot).abs())
                .then(a.total_cmp(b))
        })?;

    let ivs: Vec<f64> = front
        .iter()
        .filter(|c| c.strike == atm_strike)
        .map(|c| c.implied_volatility)
        .filter(|iv| is_valid_iv(*iv))
        .collect();

    if ivs.is_empty() {
        None
    } else {
        Some(ivs.iter().sum::<f64>() / ivs.len() as f64)
    }
}
