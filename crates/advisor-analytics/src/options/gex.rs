//! 감마 익스포저 (GEX).
//!
//! 행별 GEX = 감마 × 미결제약정 × 100 × 현재가 (콜 +, 풋 -)를 행사가별로 합산합니다.
//! 감마가 없거나 유효하지 않은 행은 ATM 거리에 따라 지수적으로 감소하는 값으로 추정합니다.

use advisor_core::{GammaWall, GexProfile, OptionChainSnapshot, StrikeGex};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{OptionsError, OptionsResult};

/// 계약 승수.
const CONTRACT_MULTIPLIER: f64 = 100.0;

/// GEX 계산 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GexParams {
    /// 근방 순 GEX 집계 범위 (현재가 대비, 기본 3%)
    pub nearby_band_pct: f64,
    /// Wall 탐색 범위 (현재가 대비, 기본 10%)
    pub wall_band_pct: f64,
}

impl Default for GexParams {
    fn default() -> Self {
        Self {
            nearby_band_pct: 0.03,
            wall_band_pct: 0.10,
        }
    }
}

/// 감마 추정값: max(0.001, 0.05 × exp(-5 × |moneyness|)).
pub fn estimate_gamma(strike: f64, spot: f64) -> f64 {
    let moneyness = (strike - spot) / spot;
    (0.05 * (-5.0 * moneyness.abs()).exp()).max(0.001)
}

/// 유효한 현재가인지 확인합니다 (유한한 양수).
pub fn validate_spot(spot: Option<f64>) -> OptionsResult<f64> {
    match spot {
        Some(s) if s.is_finite() && s > 0.0 => Ok(s),
        _ => Err(OptionsError::NoSpotPrice),
    }
}

/// 행사가별 GEX 프로파일과 Wall.
///
/// # 에러
/// - 체인이 비어 있으면 `EmptyChain`
/// - 현재가가 없거나 0 이하/비정상이면 `NoSpotPrice`
pub fn gamma_exposure(
    chain: &OptionChainSnapshot,
    spot: Option<f64>,
    params: GexParams,
) -> OptionsResult<GexProfile> {
    if chain.is_empty() {
        return Err(OptionsError::EmptyChain);
    }
    let spot = validate_spot(spot)?;

    let mut rows: Vec<StrikeGex> = Vec::with_capacity(chain.calls.len() + chain.puts.len());
    for (side, contract) in chain.contracts() {
        if !contract.strike.is_finite() {
            warn!(strike = contract.strike, "비정상 행사가 행 제외");
            continue;
        }
        let gamma = contract
            .usable_gamma()
            .unwrap_or_else(|| estimate_gamma(contract.strike, spot));
        let gex = side.gex_sign()
            * gamma
            * contract.open_interest as f64
            * CONTRACT_MULTIPLIER
            * spot;
        rows.push(StrikeGex {
            strike: contract.strike,
            gex,
            open_interest: contract.open_interest,
        });
    }

    // 행사가 오름차순 합산
    rows.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    let mut strike_gex: Vec<StrikeGex> = Vec::new();
    for row in rows {
        match strike_gex.last_mut() {
            Some(last) if last.strike == row.strike => {
                last.gex += row.gex;
                last.open_interest += row.open_interest;
            }
            _ => strike_gex.push(row),
        }
    }

    let total_gex = strike_gex.iter().map(|s| s.gex).sum();

    let nearby_range = spot * params.nearby_band_pct;
    let nearby_net_gex = strike_gex
        .iter()
        .filter(|s| (s.strike - spot).abs() <= nearby_range)
        .map(|s| s.gex)
        .sum();

    let wall_range = spot * params.wall_band_pct;
    let in_wall_band = || strike_gex.iter().filter(move |s| (s.strike - spot).abs() <= wall_range);

    let positive_wall = in_wall_band()
        .filter(|s| s.gex > 0.0)
        .fold(None::<&StrikeGex>, |best, s| match best {
            Some(b) if b.gex >= s.gex => Some(b),
            _ => Some(s),
        })
        .map(|s| GammaWall {
            strike: s.strike,
            gex: s.gex,
        });

    let negative_wall = in_wall_band()
        .filter(|s| s.gex < 0.0)
        .fold(None::<&StrikeGex>, |best, s| match best {
            Some(b) if b.gex <= s.gex => Some(b),
            _ => Some(s),
        })
        .map(|s| GammaWall {
            strike: s.strike,
            gex: s.gex,
        });

    Ok(GexProfile {
        spot,
        total_gex,
        nearby_net_gex,
        strike_gex,
        positive_wall,
        negative_wall,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::OptionContract;
    use chrono::NaiveDate;

    fn contract(strike: f64, open_interest: u64) -> OptionContract {
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        OptionContract::new(strike, expiry, open_interest, 0, 0.2)
    }

    #[test]
    fn test_net_gex_sign() {
        let chain = OptionChainSnapshot::new(
            vec![contract(100.0, 1000).with_gamma(0.05)],
            vec![contract(100.0, 800).with_gamma(0.05)],
        );

        let profile = gamma_exposure(&chain, Some(100.0), GexParams::default()).unwrap();
        assert_eq!(profile.strike_gex.len(), 1);
        assert!((profile.strike_gex[0].gex - 100_000.0).abs() < 1e-6);
        assert_eq!(profile.strike_gex[0].open_interest, 1800);
        assert!((profile.total_gex - 100_000.0).abs() < 1e-6);
        assert!((profile.nearby_net_gex - 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_gamma_estimation() {
        assert!((estimate_gamma(100.0, 100.0) - 0.05).abs() < 1e-12);
        // 멀리 떨어진 행사가는 하한 0.001
        assert_eq!(estimate_gamma(300.0, 100.0), 0.001);
        assert!(estimate_gamma(105.0, 100.0) < 0.05);
    }

    #[test]
    fn test_walls_and_ordering() {
        let chain = OptionChainSnapshot::new(
            vec![
                contract(105.0, 5000).with_gamma(0.04),
                contract(102.0, 1000).with_gamma(0.04),
                // 범위 밖 대형 콜: Wall 후보 아님
                contract(150.0, 90000).with_gamma(0.04),
            ],
            vec![
                contract(95.0, 4000).with_gamma(0.04),
                contract(98.0, 500).with_gamma(0.04),
            ],
        );

        let profile = gamma_exposure(&chain, Some(100.0), GexParams::default()).unwrap();
        let strikes: Vec<f64> = profile.strike_gex.iter().map(|s| s.strike).collect();
        assert_eq!(strikes, vec![95.0, 98.0, 102.0, 105.0, 150.0]);

        assert_eq!(profile.positive_wall.unwrap().strike, 105.0);
        assert_eq!(profile.negative_wall.unwrap().strike, 95.0);

        // 근방(±3)에는 98, 102만 포함
        let expected = (0.04 * 1000.0 - 0.04 * 500.0) * 100.0 * 100.0;
        assert!((profile.nearby_net_gex - expected).abs() < 1e-6);
    }

    #[test]
    fn test_missing_gamma_is_estimated() {
        let chain = OptionChainSnapshot::new(vec![contract(100.0, 10)], vec![]);
        let profile = gamma_exposure(&chain, Some(100.0), GexParams::default()).unwrap();
        assert!((profile.total_gex - 0.05 * 10.0 * 100.0 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_errors() {
        let empty = OptionChainSnapshot::default();
        assert!(matches!(
            gamma_exposure(&empty, Some(100.0), GexParams::default()),
            Err(OptionsError::EmptyChain)
        ));

        let chain = OptionChainSnapshot::new(vec![contract(100.0, 10)], vec![]);
        for spot in [None, Some(0.0), Some(-5.0), Some(f64::NAN)] {
            assert!(matches!(
                gamma_exposure(&chain, spot, GexParams::default()),
                Err(OptionsError::NoSpotPrice)
            ));
        }
    }
}
