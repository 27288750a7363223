//! 기술적 분석기 통합 테스트
//!
//! 가격 시계열 → TechnicalScore 전체 경로 검증

use advisor_analytics::{OptionsEngine, TechnicalAnalyzer, UnavailableRecognizer};
use std::collections::HashMap;

use advisor_core::logging::{init_logging, LogConfig};
use advisor_core::{
    AnalyticsConfig, Bar, CandlestickSummary, GexRegime, MaTrend, OptionChainSnapshot, OptionContract, PriceSeries,
    Signal, SqueezeSignal, TimeframeSignal,
};
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn series(bars: Vec<(Decimal, Decimal, Decimal)>) -> PriceSeries {
    let bars = bars
        .into_iter()
        .enumerate()
        .map(|(i, (high, low, close))| {
            Bar::new(
                start_date() + Duration::days(i as i64),
                close,
                high,
                low,
                close,
                dec!(1000),
            )
        })
        .collect();
    PriceSeries::new(bars).unwrap()
}

/// 지그재그 100봉 → 초저변동 횡보 25봉 → 상단 돌파 1봉
fn squeeze_breakout_series() -> PriceSeries {
    let mut bars = Vec::new();
    for i in 0..100 {
        let close = if i % 2 == 0 { dec!(105) } else { dec!(95) };
        bars.push((close + dec!(1), close - dec!(1), close));
    }
    for _ in 0..25 {
        bars.push((dec!(100.01), dec!(99.99), dec!(100)));
    }
    bars.push((dec!(101), dec!(100.9), dec!(101)));
    series(bars)
}

#[test]
fn test_squeeze_then_expansion_breakout() {
    let analyzer = TechnicalAnalyzer::default();
    let full = squeeze_breakout_series();

    // 돌파 직전: 볼린저 밴드가 켈트너 채널 안쪽
    let before = PriceSeries::new(full.bars()[..125].to_vec()).unwrap();
    let score = analyzer.analyze(&before, None).unwrap();
    assert!(score.bb_squeeze);
    assert_eq!(score.bb_squeeze_signal, SqueezeSignal::Squeeze);

    // 돌파 봉: 낮은 밴드 폭 백분위에서 상단 돌파
    let score = analyzer.analyze(&full, None).unwrap();
    assert!(!score.bb_squeeze);
    assert!(score.bb_bandwidth_percentile < 10.0);
    assert_eq!(score.bb_squeeze_signal, SqueezeSignal::ExpansionBreakout);
}

#[test]
fn test_ten_bars_ma_trend_insufficient() {
    let bars = (0..10)
        .map(|i| {
            let c = Decimal::from(100 + i);
            (c + dec!(1), c - dec!(1), c)
        })
        .collect();
    let score = TechnicalAnalyzer::default().analyze(&series(bars), None).unwrap();

    assert_eq!(score.ma_trend, MaTrend::InsufficientData);
    assert_eq!(score.mtf_details.weekly, TimeframeSignal::InsufficientData);
    assert_eq!(score.rsi, 50.0);
}

#[test]
fn test_fibonacci_half_level() {
    // 최고가 110, 최저가 100
    let bars = vec![
        (dec!(110), dec!(104), dec!(106)),
        (dec!(108), dec!(100), dec!(103)),
        (dec!(107), dec!(102), dec!(105)),
    ];
    let score = TechnicalAnalyzer::default().analyze(&series(bars), None).unwrap();

    let half = score
        .fib_levels
        .iter()
        .find(|l| l.ratio == dec!(0.5))
        .unwrap();
    assert_eq!(half.price, dec!(105));
    assert_eq!(score.fib_nearest_ratio, dec!(0.5));
}

#[test]
fn test_empty_series_returns_none() {
    assert!(TechnicalAnalyzer::default()
        .analyze(&PriceSeries::empty(), None)
        .is_none());
}

#[test]
fn test_null_recognizer_has_no_impact() {
    let bars: Vec<_> = (0..80)
        .map(|i| {
            let c = dec!(100) + Decimal::from(i % 9);
            (c + dec!(2), c - dec!(2), c)
        })
        .collect();
    let s = series(bars);

    let with_rules = TechnicalAnalyzer::default().analyze(&s, None).unwrap();
    let without = TechnicalAnalyzer::default()
        .with_recognizer(UnavailableRecognizer)
        .analyze(&s, None)
        .unwrap();

    assert_eq!(without.candlestick_summary, CandlestickSummary::Unavailable);
    // 캔들 보정 외의 카테고리는 동일
    assert_eq!(with_rules.category_scores.trend, without.category_scores.trend);
    assert_eq!(with_rules.category_scores.flow, without.category_scores.flow);
}

#[test]
fn test_options_analysis_flows_into_score() {
    let bars: Vec<_> = (0..120)
        .map(|i| {
            let c = dec!(100) + Decimal::from(i % 5);
            (c + dec!(1), c - dec!(1), c)
        })
        .collect();
    let s = series(bars);
    let spot = 102.0;

    let expiry = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
    let chain = OptionChainSnapshot::new(
        vec![OptionContract::new(102.0, expiry, 5000, 900, 0.22).with_gamma(0.04)],
        vec![OptionContract::new(95.0, expiry, 1000, 300, 0.28).with_gamma(0.02)],
    );
    let options = OptionsEngine::new().analyze(&chain, Some(spot)).unwrap();

    let score = TechnicalAnalyzer::default()
        .analyze(&s, Some(&options))
        .unwrap();

    assert_eq!(score.gex_regime, GexRegime::PositiveGamma);
    assert_eq!(score.gex_positive_wall, Some(102.0));
    assert_eq!(score.pcr_ratio, Some(0.2));
    assert_eq!(score.pcr_signal, Signal::Bullish);
    assert_eq!(score.atm_iv, Some(0.22));
    assert!(score.max_pain.is_some());

    let json = score.to_json().unwrap();
    assert!(json.contains("\"gex_regime\":\"positive_gamma\""));
}

#[test]
fn test_analyze_ticker_with_subscriber() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("advisor_analytics=debug")
        .with_test_writer()
        .try_init();

    let s = squeeze_breakout_series();
    let analyzer = TechnicalAnalyzer::default();

    let scored = analyzer.analyze_ticker("SPY", &s, None).unwrap();
    let plain = analyzer.analyze(&s, None).unwrap();
    assert_eq!(scored.to_json().unwrap(), plain.to_json().unwrap());
}

/// 80봉 완만한 상승 추세
fn uptrend_series() -> PriceSeries {
    let bars = (0..80)
        .map(|i| {
            let close = dec!(100) + Decimal::from(i) * dec!(0.5);
            (close + dec!(1), close - dec!(1), close)
        })
        .collect();
    series(bars)
}

#[test]
fn test_basket_analysis_skips_missing_tickers() {
    let config = AnalyticsConfig::default();
    // 다른 테스트가 먼저 구독자를 설치했을 수 있음
    let _ = init_logging(LogConfig::from(&config.logging));

    let analyzer = TechnicalAnalyzer::from_config(&config);
    assert_eq!(analyzer.basket(), ["SPY", "QQQ", "IWM"]);

    let mut prices = HashMap::new();
    prices.insert("SPY".to_string(), uptrend_series());
    prices.insert("QQQ".to_string(), PriceSeries::empty());
    // IWM 없음

    let results = analyzer.analyze_basket(&prices);
    assert_eq!(results.len(), 1);

    let spy = &results[0];
    let direct = analyzer.analyze(&prices["SPY"], None).unwrap();
    assert_eq!(spy.ticker, "SPY");
    assert_eq!(spy.overall_score, direct.overall_score);
    assert_eq!(spy.overall_signal, Signal::from_score(spy.overall_score));
    assert_eq!(spy.ma_trend, direct.ma_trend);
    assert!(spy.summary.starts_with("【SPY テクニカル分析】"));
}

#[test]
fn test_basket_follows_configured_order() {
    let analyzer = TechnicalAnalyzer::default()
        .with_basket(vec!["IWM".to_string(), "SPY".to_string()]);

    let mut prices = HashMap::new();
    prices.insert("SPY".to_string(), uptrend_series());
    prices.insert("IWM".to_string(), squeeze_breakout_series());
    prices.insert("QQQ".to_string(), uptrend_series());

    let tickers: Vec<_> = analyzer
        .analyze_basket(&prices)
        .into_iter()
        .map(|r| r.ticker)
        .collect();
    assert_eq!(tickers, ["IWM", "SPY"]);
}
