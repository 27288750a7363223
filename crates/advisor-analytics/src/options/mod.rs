//! Options Analytics Engine.
//!
//! 하나의 옵션 체인 스냅샷과 현재가로부터 PCR, GEX, Max Pain, ATM IV를 계산하고
//! 기술적 점수의 수급 카테고리에 들어갈 보정값을 만듭니다.
//!
//! 체인이 비어 있는 경우만 에러입니다. 현재가가 없으면 현재가가 필요한 지표
//! (GEX, ATM IV)만 `None`이 되고 나머지는 그대로 계산됩니다.

mod adjustment;
mod atm_iv;
mod gex;
mod max_pain;
mod pcr;

pub use adjustment::{gex_regime, options_score_adjustment, OPTIONS_ADJUSTMENT_LIMIT};
pub use atm_iv::atm_implied_volatility;
pub use gex::{estimate_gamma, gamma_exposure, validate_spot, GexParams};
pub use max_pain::{max_pain, max_pain_payout};
pub use pcr::{pcr_signal, put_call_ratio, PCR_BEARISH_THRESHOLD, PCR_BULLISH_THRESHOLD};

use advisor_core::{GexRegime, OptionChainSnapshot, OptionsConfig, OptionsMetrics, Signal};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// 옵션 분석 에러.
#[derive(Debug, Error)]
pub enum OptionsError {
    /// 콜/풋 모두 비어 있음
    #[error("옵션 체인이 비어 있습니다")]
    EmptyChain,

    /// 현재가가 없거나 유효하지 않음
    #[error("유효한 현재가가 없습니다")]
    NoSpotPrice,
}

/// 옵션 분석 Result 타입.
pub type OptionsResult<T> = Result<T, OptionsError>;

/// 옵션 분석 결과.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OptionsAnalysis {
    pub metrics: OptionsMetrics,
    /// 수급 카테고리 보정값 [-1, 1]
    pub score_adjustment: f64,
    pub gex_regime: GexRegime,
    /// OI PCR 기준 판정 (PCR 없으면 중립)
    pub pcr_signal: Signal,
}

/// 옵션 분석 엔진.
#[derive(Debug, Clone, Copy)]
pub struct OptionsEngine {
    gex_params: GexParams,
    wall_proximity_pct: f64,
}

impl Default for OptionsEngine {
    fn default() -> Self {
        Self::from_config(&OptionsConfig::default())
    }
}

impl OptionsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정 파일의 `[options]` 섹션으로 생성합니다.
    pub fn from_config(config: &OptionsConfig) -> Self {
        Self {
            gex_params: GexParams {
                nearby_band_pct: config.nearby_band_pct,
                wall_band_pct: config.wall_band_pct,
            },
            wall_proximity_pct: config.wall_proximity_pct,
        }
    }

    /// 개별 지표 계산. 현재가가 필요한 지표는 현재가가 없으면 `None`.
    pub fn metrics(&self, chain: &OptionChainSnapshot, spot: Option<f64>) -> OptionsResult<OptionsMetrics> {
        if chain.is_empty() {
            return Err(OptionsError::EmptyChain);
        }

        let gex = match gamma_exposure(chain, spot, self.gex_params) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "GEX 계산 제외");
                None
            }
        };

        let atm_iv = validate_spot(spot)
            .ok()
            .and_then(|s| atm_implied_volatility(chain, s));
        if atm_iv.is_none() {
            debug!("ATM IV 사용 불가");
        }

        Ok(OptionsMetrics {
            pcr: put_call_ratio(chain),
            gex,
            max_pain: max_pain(chain),
            atm_iv,
        })
    }

    /// 체인 전체 분석.
    pub fn analyze(&self, chain: &OptionChainSnapshot, spot: Option<f64>) -> OptionsResult<OptionsAnalysis> {
        let metrics = self.metrics(chain, spot)?;
        let spot = validate_spot(spot).ok();

        let score_adjustment = options_score_adjustment(&metrics, spot, self.wall_proximity_pct);
        let gex_regime = gex_regime(metrics.gex.as_ref());
        let pcr_signal = metrics
            .pcr
            .and_then(|p| p.oi_reading())
            .map(pcr_signal)
            .unwrap_or_default();

        Ok(OptionsAnalysis {
            metrics,
            score_adjustment,
            gex_regime,
            pcr_signal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::OptionContract;
    use chrono::NaiveDate;

    fn contract(strike: f64, open_interest: u64, volume: u64) -> OptionContract {
        let expiry = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        OptionContract::new(strike, expiry, open_interest, volume, 0.25).with_gamma(0.03)
    }

    fn sample_chain() -> OptionChainSnapshot {
        OptionChainSnapshot::new(
            vec![contract(100.0, 2000, 500), contract(105.0, 3000, 300)],
            vec![contract(95.0, 1000, 200), contract(100.0, 500, 100)],
        )
    }

    #[test]
    fn test_analyze_full_chain() {
        let analysis = OptionsEngine::new().analyze(&sample_chain(), Some(100.0)).unwrap();

        let metrics = &analysis.metrics;
        assert!(metrics.pcr.is_some());
        assert!(metrics.gex.is_some());
        assert_eq!(metrics.atm_iv, Some(0.25));
        assert_eq!(analysis.gex_regime, GexRegime::PositiveGamma);
        // OI PCR = 1500 / 5000 = 0.3
        assert_eq!(analysis.pcr_signal, Signal::Bullish);
        assert!(analysis.score_adjustment.abs() <= OPTIONS_ADJUSTMENT_LIMIT);
    }

    #[test]
    fn test_missing_spot_keeps_spot_free_metrics() {
        let analysis = OptionsEngine::new().analyze(&sample_chain(), None).unwrap();

        assert!(analysis.metrics.gex.is_none());
        assert!(analysis.metrics.atm_iv.is_none());
        assert!(analysis.metrics.pcr.is_some());
        assert!(analysis.metrics.max_pain.is_some());
        assert_eq!(analysis.gex_regime, GexRegime::Unknown);
    }

    #[test]
    fn test_empty_chain_is_error() {
        let result = OptionsEngine::new().analyze(&OptionChainSnapshot::default(), Some(100.0));
        assert!(matches!(result, Err(OptionsError::EmptyChain)));
    }

    #[test]
    fn test_from_config_band() {
        let config = OptionsConfig {
            wall_band_pct: 0.01,
            ..Default::default()
        };
        let engine = OptionsEngine::from_config(&config);
        let profile = engine.metrics(&sample_chain(), Some(100.0)).unwrap().gex.unwrap();
        // ±1 범위에는 100 행사가만 남음
        assert_eq!(profile.positive_wall.map(|w| w.strike), Some(100.0));
        assert!(profile.negative_wall.is_none());
    }
}
