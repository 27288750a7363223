//! 점수 범위와 결정성 속성 테스트

use advisor_analytics::{MomentumCalculator, RsiParams, TechnicalAnalyzer};
use advisor_core::{Bar, PriceSeries, TechnicalScore, CATEGORY_SCORE_LIMIT};
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn build_series(closes_cents: &[u32], start: NaiveDate) -> PriceSeries {
    let bars = closes_cents
        .iter()
        .enumerate()
        .map(|(i, cents)| {
            let close = Decimal::new(i64::from(*cents), 2);
            Bar::new(
                start + Duration::days(i as i64),
                close,
                close * dec!(1.01),
                close * dec!(0.99),
                close,
                Decimal::from(1000 + (i % 7) as i64 * 250),
            )
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

fn assert_bounded(score: &TechnicalScore) {
    assert!((-100..=100).contains(&score.overall_score));
    assert!((0.0..=100.0).contains(&score.rsi));
    let c = score.category_scores;
    for value in [c.trend, c.momentum, c.pattern, c.flow] {
        assert!(value.abs() <= CATEGORY_SCORE_LIMIT, "category = {}", value);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn rsi_stays_in_range(closes in prop::collection::vec(100u32..100_000, 2..120)) {
        let prices: Vec<Decimal> = closes.iter().map(|c| Decimal::new(i64::from(*c), 2)).collect();
        let rsi = MomentumCalculator::new().rsi_value(&prices, RsiParams::default());
        prop_assert!((0.0..=100.0).contains(&rsi));
    }

    #[test]
    fn scores_stay_bounded(closes in prop::collection::vec(100u32..100_000, 1..160)) {
        let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let series = build_series(&closes, start);
        let score = TechnicalAnalyzer::default().analyze(&series, None).unwrap();
        assert_bounded(&score);
    }

    #[test]
    fn analysis_is_deterministic(closes in prop::collection::vec(100u32..100_000, 1..100)) {
        let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let series = build_series(&closes, start);
        let analyzer = TechnicalAnalyzer::default();

        let first = analyzer.analyze(&series, None).unwrap().to_json().unwrap();
        let second = analyzer.analyze(&series, None).unwrap().to_json().unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_long_rising_series_is_bounded() {
    let closes: Vec<u32> = (0..10_000).map(|i| 10_000 + i * 10).collect();
    let start = NaiveDate::from_ymd_opt(1995, 1, 2).unwrap();
    let score = TechnicalAnalyzer::default()
        .analyze(&build_series(&closes, start), None)
        .unwrap();

    assert_bounded(&score);
    assert_eq!(score.ma_trend, advisor_core::MaTrend::Uptrend);
}
