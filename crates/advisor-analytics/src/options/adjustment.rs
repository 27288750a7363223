//! 옵션 지표 → 기술적 점수 보정값.

use advisor_core::{GexProfile, GexRegime, OptionsMetrics};

/// 보정값 한계 (±1.0).
pub const OPTIONS_ADJUSTMENT_LIMIT: f64 = 1.0;

/// 근방 순 GEX 부호로 감마 레짐을 판정합니다. GEX가 없으면 `Unknown`.
pub fn gex_regime(gex: Option<&GexProfile>) -> GexRegime {
    match gex {
        Some(profile) if profile.nearby_net_gex > 0.0 => GexRegime::PositiveGamma,
        Some(_) => GexRegime::NegativeGamma,
        None => GexRegime::Unknown,
    }
}

/// 옵션 지표에서 수급 카테고리 보정값을 계산합니다.
///
/// - +Wall 근접 -0.3, -Wall 근접 +0.3 (`|spot - wall| ≤ wall × proximity_pct`)
/// - OI PCR > 1.2 -0.5, < 0.7 +0.5 (콜 OI가 0이면 제외)
/// - ATM IV > 0.4 -0.2
/// - 현재가 < Max Pain × 0.95 +0.3, > Max Pain × 1.05 -0.3
///
/// `None`인 지표는 기여하지 않습니다. 결과는 [-1, 1]로 제한됩니다.
pub fn options_score_adjustment(metrics: &OptionsMetrics, spot: Option<f64>, proximity_pct: f64) -> f64 {
    let mut adjustment: f64 = 0.0;

    if let (Some(gex), Some(spot)) = (&metrics.gex, spot) {
        let near = |wall: f64| (spot - wall).abs() <= wall.abs() * proximity_pct;
        if gex.positive_wall.is_some_and(|w| near(w.strike)) {
            adjustment -= 0.3;
        }
        if gex.negative_wall.is_some_and(|w| near(w.strike)) {
            adjustment += 0.3;
        }
    }

    if let Some(oi_pcr) = metrics.pcr.as_ref().and_then(|p| p.oi_reading()) {
        if oi_pcr > 1.2 {
            adjustment -= 0.5;
        } else if oi_pcr < 0.7 {
            adjustment += 0.5;
        }
    }

    if metrics.atm_iv.is_some_and(|iv| iv > 0.4) {
        adjustment -= 0.2;
    }

    if let (Some(max_pain), Some(spot)) = (metrics.max_pain, spot) {
        if spot < max_pain * 0.95 {
            adjustment += 0.3;
        } else if spot > max_pain * 1.05 {
            adjustment -= 0.3;
        }
    }

    adjustment.clamp(-OPTIONS_ADJUSTMENT_LIMIT, OPTIONS_ADJUSTMENT_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{GammaWall, PcrMetrics};

    fn pcr(oi_pcr: f64) -> PcrMetrics {
        PcrMetrics {
            oi_pcr,
            total_call_oi: 100,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_metrics_contribute_nothing() {
        assert_eq!(options_score_adjustment(&OptionsMetrics::default(), Some(100.0), 0.01), 0.0);
    }

    #[test]
    fn test_bearish_stack_is_clamped() {
        let metrics = OptionsMetrics {
            pcr: Some(pcr(1.5)),
            gex: Some(GexProfile {
                spot: 100.0,
                positive_wall: Some(GammaWall {
                    strike: 100.5,
                    gex: 1.0e6,
                }),
                ..Default::default()
            }),
            max_pain: Some(90.0),
            atm_iv: Some(0.55),
        };
        // -0.3 - 0.5 - 0.2 - 0.3 = -1.3 → -1.0
        assert_eq!(options_score_adjustment(&metrics, Some(100.0), 0.01), -1.0);
    }

    #[test]
    fn test_bullish_components() {
        let metrics = OptionsMetrics {
            pcr: Some(pcr(0.5)),
            max_pain: Some(110.0),
            ..Default::default()
        };
        let adj = options_score_adjustment(&metrics, Some(100.0), 0.01);
        assert!((adj - 0.8).abs() < 1e-12);

        // 현재가가 없으면 Max Pain 비교 불가
        let adj = options_score_adjustment(&metrics, None, 0.01);
        assert!((adj - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_call_open_interest_is_not_bullish() {
        // 풋만 있는 체인: 비율 0.0이지만 판정 대상이 아님
        let metrics = OptionsMetrics {
            pcr: Some(PcrMetrics {
                oi_pcr: 0.0,
                total_put_oi: 5000,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(options_score_adjustment(&metrics, Some(100.0), 0.01), 0.0);
    }

    #[test]
    fn test_gex_regime() {
        assert_eq!(gex_regime(None), GexRegime::Unknown);
        let mut profile = GexProfile {
            nearby_net_gex: 10.0,
            ..Default::default()
        };
        assert_eq!(gex_regime(Some(&profile)), GexRegime::PositiveGamma);
        profile.nearby_net_gex = -10.0;
        assert_eq!(gex_regime(Some(&profile)), GexRegime::NegativeGamma);
    }
}
