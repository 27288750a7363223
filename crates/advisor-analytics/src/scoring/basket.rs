//! 지수 바스켓 기술적 요약.

use std::collections::HashMap;

use advisor_core::{MaTrend, PriceSeries, Signal, TechnicalScore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{technical_summary, TechnicalAnalyzer};

/// 바스켓 종목 하나의 기술적 요약.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexTechnicals {
    pub ticker: String,
    pub rsi: f64,
    pub overall_score: i32,
    pub overall_signal: Signal,
    pub macd_signal: Signal,
    pub ma_trend: MaTrend,
    /// 리포트 생성기용 여러 줄 요약
    pub summary: String,
}

impl IndexTechnicals {
    fn new(ticker: &str, score: &TechnicalScore) -> Self {
        Self {
            ticker: ticker.to_string(),
            rsi: score.rsi,
            overall_score: score.overall_score,
            overall_signal: score.overall_signal,
            macd_signal: score.macd_signal,
            ma_trend: score.ma_trend,
            summary: technical_summary(ticker, score),
        }
    }
}

impl TechnicalAnalyzer {
    /// 바스켓 티커 (기본 SPY, QQQ, IWM).
    pub fn basket(&self) -> &[String] {
        &self.basket
    }

    /// 바스켓 티커를 바꿉니다.
    pub fn with_basket(mut self, basket: Vec<String>) -> Self {
        self.basket = basket;
        self
    }

    /// 바스켓 각 종목을 분석합니다.
    ///
    /// 결과는 바스켓 순서를 따릅니다. 시계열이 없거나 비어 있는 종목은
    /// 경고 로그를 남기고 건너뜁니다.
    pub fn analyze_basket(&self, series: &HashMap<String, PriceSeries>) -> Vec<IndexTechnicals> {
        let results: Vec<IndexTechnicals> = self
            .basket
            .iter()
            .filter_map(|ticker| {
                let Some(prices) = series.get(ticker) else {
                    warn!(%ticker, "가격 데이터 없음, 바스켓에서 제외");
                    return None;
                };
                match self.analyze_ticker(ticker, prices, None) {
                    Some(score) => Some(IndexTechnicals::new(ticker, &score)),
                    None => {
                        warn!(%ticker, "빈 시계열, 바스켓에서 제외");
                        None
                    }
                }
            })
            .collect();

        info!(
            analyzed = results.len(),
            basket = self.basket.len(),
            "바스켓 기술적 분석 완료"
        );
        results
    }
}
