//! 옵션 분석 엔진 + 센티먼트 집계 통합 테스트

use advisor_analytics::options::{
    gamma_exposure, max_pain, max_pain_payout, put_call_ratio, GexParams,
};
use advisor_analytics::{
    OptionsEngine, OptionsError, ReportError, ReportWriter, SentimentAggregator,
    TickerOptionsInput, TickerSentiment,
};
use advisor_core::{AnalyticsConfig, OptionChainSnapshot, OptionContract, Signal};
use chrono::NaiveDate;

fn expiry() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 21).unwrap()
}

fn contract(strike: f64, open_interest: u64, volume: u64) -> OptionContract {
    OptionContract::new(strike, expiry(), open_interest, volume, 0.3)
}

#[test]
fn test_gex_reference_value() {
    let chain = OptionChainSnapshot::new(
        vec![contract(100.0, 1000, 0).with_gamma(0.05)],
        vec![contract(100.0, 800, 0).with_gamma(0.05)],
    );

    let profile = gamma_exposure(&chain, Some(100.0), GexParams::default()).unwrap();
    assert!((profile.total_gex - 100_000.0).abs() < 1e-6);
}

#[test]
fn test_pcr_reference_value() {
    let chain = OptionChainSnapshot::new(
        vec![contract(100.0, 10, 100), contract(105.0, 10, 50), contract(110.0, 10, 10)],
        vec![contract(95.0, 10, 20), contract(90.0, 10, 30), contract(85.0, 10, 80)],
    );

    let pcr = put_call_ratio(&chain).unwrap();
    assert!((pcr.volume_pcr - 0.8125).abs() < 1e-12);
}

fn chain_of(calls: &[(f64, u64)], puts: &[(f64, u64)]) -> OptionChainSnapshot {
    OptionChainSnapshot::new(
        calls.iter().map(|(s, oi)| contract(*s, *oi, 0)).collect(),
        puts.iter().map(|(s, oi)| contract(*s, *oi, 0)).collect(),
    )
}

#[test]
fn test_max_pain_payout_table() {
    let chain = chain_of(
        &[(90.0, 100), (100.0, 100), (110.0, 100)],
        &[(90.0, 100), (100.0, 100), (110.0, 100)],
    );

    // 행사가별 지급액 (손 계산)
    for (strike, expected) in [(90.0, 3000.0), (100.0, 2000.0), (110.0, 3000.0)] {
        assert_eq!(max_pain_payout(&chain, strike), expected, "strike {}", strike);
    }
    assert_eq!(max_pain(&chain), Some(100.0));
}

#[test]
fn test_max_pain_at_upper_strike() {
    let chain = chain_of(
        &[(90.0, 100), (100.0, 100), (110.0, 100)],
        &[(90.0, 100), (100.0, 100), (110.0, 500)],
    );

    for (strike, expected) in [(90.0, 11000.0), (100.0, 6000.0), (110.0, 3000.0)] {
        assert_eq!(max_pain_payout(&chain, strike), expected, "strike {}", strike);
    }
    assert_eq!(max_pain(&chain), Some(110.0));
}

#[test]
fn test_max_pain_tie_takes_lowest_strike() {
    let chain = chain_of(&[(100.0, 100)], &[(110.0, 100)]);

    assert_eq!(max_pain_payout(&chain, 100.0), 1000.0);
    assert_eq!(max_pain_payout(&chain, 110.0), 1000.0);
    assert_eq!(max_pain(&chain), Some(100.0));
}

#[test]
fn test_no_spot_price() {
    let chain = OptionChainSnapshot::new(vec![contract(100.0, 10, 1)], vec![]);
    assert!(matches!(
        gamma_exposure(&chain, None, GexParams::default()),
        Err(OptionsError::NoSpotPrice)
    ));
}

struct BrokenWriter;

impl ReportWriter for BrokenWriter {
    fn write_report(&self, _: &[TickerSentiment]) -> Result<String, ReportError> {
        Err(ReportError::Generation("timeout".to_string()))
    }
}

#[test]
fn test_basket_from_config() {
    let config = AnalyticsConfig::default();
    let aggregator = SentimentAggregator::from_config(
        &config.sentiment,
        OptionsEngine::from_config(&config.options),
    )
    .with_writer(BrokenWriter);

    // 풋 거래 우위 + 음의 근방 GEX + 현재가 > Max Pain
    let bearish = OptionChainSnapshot::new(
        vec![contract(90.0, 500, 100).with_gamma(0.03)],
        vec![contract(100.0, 4000, 900).with_gamma(0.03)],
    );
    let inputs: Vec<TickerOptionsInput> = aggregator
        .basket()
        .iter()
        .map(|ticker| TickerOptionsInput::new(ticker.clone(), Some(101.0), Some(bearish.clone())))
        .collect();

    let report = aggregator.aggregate(&inputs);
    assert_eq!(report.tickers.len(), 3);
    assert!(report.tickers.iter().all(|t| t.sentiment == Signal::Bearish));
    assert_eq!(report.market_sentiment, Signal::Bearish);
    assert!(report.narrative.is_none());
    assert_eq!(
        report.summary_line().as_deref(),
        Some("SPY: 弱気; QQQ: 弱気; IWM: 弱気")
    );
}
