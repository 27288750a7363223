//! 옵션 센티먼트 집계.
//!
//! 지수 ETF 바스켓(기본 SPY, QQQ, IWM) 각각의 옵션 체인에서 PCR/GEX/Max Pain
//! 투표로 종목별 센티먼트를 정하고, 종목 간 다수결로 시장 센티먼트를 만듭니다.
//! 서술형 리포트는 주입된 [`ReportWriter`]가 있을 때만 생성되며, 실패해도
//! 집계 결과에는 영향을 주지 않습니다.

use advisor_core::{OptionChainSnapshot, OptionsMetrics, SentimentConfig, Signal};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::options::{validate_spot, OptionsEngine};

/// 거래량 PCR 약세 임계값.
const VOLUME_PCR_BEARISH: f64 = 1.2;
/// 거래량 PCR 강세 임계값.
const VOLUME_PCR_BULLISH: f64 = 0.7;

/// 리포트 생성 에러.
#[derive(Debug, Error)]
pub enum ReportError {
    /// 생성기를 사용할 수 없음 (키 미설정 등)
    #[error("리포트 생성기 사용 불가: {0}")]
    Unavailable(String),

    /// 생성 실패
    #[error("리포트 생성 실패: {0}")]
    Generation(String),
}

/// 서술형 리포트 생성기.
pub trait ReportWriter: Send + Sync {
    /// 종목별 센티먼트로 리포트 본문을 작성합니다.
    fn write_report(&self, sentiments: &[TickerSentiment]) -> Result<String, ReportError>;
}

/// 종목 하나의 옵션 입력.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerOptionsInput {
    pub ticker: String,
    pub spot: Option<f64>,
    pub chain: Option<OptionChainSnapshot>,
}

impl TickerOptionsInput {
    pub fn new(ticker: impl Into<String>, spot: Option<f64>, chain: Option<OptionChainSnapshot>) -> Self {
        Self {
            ticker: ticker.into(),
            spot,
            chain,
        }
    }
}

/// 종목별 센티먼트.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerSentiment {
    pub ticker: String,
    /// GEX 계산에 쓰인 현재가, 없으면 입력 현재가
    pub spot: Option<f64>,
    pub sentiment: Signal,
    pub metrics: OptionsMetrics,
    /// 판단 근거 (표시용 문장)
    pub rationale: Vec<String>,
}

/// 바스켓 집계 결과.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SentimentReport {
    /// 분석 가능했던 종목만 포함
    pub tickers: Vec<TickerSentiment>,
    /// 종목 센티먼트 다수결
    pub market_sentiment: Signal,
    pub narrative: Option<String>,
}

impl SentimentReport {
    /// "SPY: 強気; QQQ: 中立" 형식의 한 줄 요약 (최대 3종목).
    pub fn summary_line(&self) -> Option<String> {
        if self.tickers.is_empty() {
            return None;
        }
        Some(
            self.tickers
                .iter()
                .take(3)
                .map(|t| format!("{}: {}", t.ticker, t.sentiment))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// 옵션 센티먼트 집계기.
pub struct SentimentAggregator {
    engine: OptionsEngine,
    basket: Vec<String>,
    min_total_open_interest: u64,
    writer: Option<Box<dyn ReportWriter>>,
}

impl std::fmt::Debug for SentimentAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SentimentAggregator")
            .field("engine", &self.engine)
            .field("basket", &self.basket)
            .field("min_total_open_interest", &self.min_total_open_interest)
            .field("has_writer", &self.writer.is_some())
            .finish()
    }
}

impl Default for SentimentAggregator {
    fn default() -> Self {
        Self::from_config(&SentimentConfig::default(), OptionsEngine::default())
    }
}

impl SentimentAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정 파일의 `[sentiment]` 섹션과 옵션 엔진으로 생성합니다.
    pub fn from_config(config: &SentimentConfig, engine: OptionsEngine) -> Self {
        Self {
            engine,
            basket: config.basket.clone(),
            min_total_open_interest: config.min_total_open_interest,
            writer: None,
        }
    }

    /// 리포트 생성기를 주입합니다.
    pub fn with_writer(mut self, writer: impl ReportWriter + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// 설정된 기본 바스켓.
    pub fn basket(&self) -> &[String] {
        &self.basket
    }

    /// 바스켓 전체를 집계합니다. 분석 불가 종목은 결과에서 빠집니다.
    pub fn aggregate(&self, inputs: &[TickerOptionsInput]) -> SentimentReport {
        let tickers: Vec<TickerSentiment> = inputs
            .iter()
            .filter_map(|input| self.ticker_sentiment(input))
            .collect();

        let bullish = tickers.iter().filter(|t| t.sentiment == Signal::Bullish).count();
        let bearish = tickers.iter().filter(|t| t.sentiment == Signal::Bearish).count();
        let market_sentiment = Signal::from_counts(bullish, bearish);

        let narrative = match &self.writer {
            Some(writer) if !tickers.is_empty() => match writer.write_report(&tickers) {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(error = %e, "센티먼트 리포트 생성 실패");
                    None
                }
            },
            _ => None,
        };

        SentimentReport {
            tickers,
            market_sentiment,
            narrative,
        }
    }

    /// 종목 하나의 센티먼트. 체인이 없거나 PCR/GEX 모두 사용 불가면 `None`.
    pub fn ticker_sentiment(&self, input: &TickerOptionsInput) -> Option<TickerSentiment> {
        let span = advisor_core::analysis_span!("option_sentiment", input.ticker);
        let _guard = span.enter();

        let Some(chain) = input.chain.as_ref() else {
            debug!("옵션 체인 없음, 건너뜀");
            return None;
        };

        let mut metrics = match self.engine.metrics(chain, input.spot) {
            Ok(metrics) => metrics,
            Err(e) => {
                debug!(error = %e, "옵션 지표 계산 불가, 건너뜀");
                return None;
            }
        };

        if metrics.pcr.is_none() && metrics.gex.is_none() {
            return None;
        }

        let spot = metrics
            .gex
            .as_ref()
            .map(|g| g.spot)
            .or_else(|| validate_spot(input.spot).ok());

        // 미결제약정이 너무 적으면 GEX를 신뢰하지 않음
        let oi_too_thin = metrics
            .pcr
            .is_some_and(|p| p.total_open_interest() < self.min_total_open_interest);
        let gex_note = if metrics.gex.is_none() {
            Some("※ 現在値なしのためGEX分析は省略")
        } else if oi_too_thin {
            warn!(min = self.min_total_open_interest, "총 미결제약정 부족, GEX 제외");
            metrics.gex = None;
            Some("※ OIデータ不足のためGEX分析は省略")
        } else {
            None
        };

        let mut bullish = 0;
        let mut bearish = 0;
        let mut rationale = Vec::new();

        if let Some(pcr) = &metrics.pcr {
            match pcr.volume_reading() {
                Some(vol_pcr) if vol_pcr > VOLUME_PCR_BEARISH => {
                    bearish += 1;
                    rationale.push(format!("PCR(Vol) ({:.2}) が高く、プット取引活発 (弱気示唆)", vol_pcr));
                }
                Some(vol_pcr) if vol_pcr < VOLUME_PCR_BULLISH => {
                    bullish += 1;
                    rationale.push(format!("PCR(Vol) ({:.2}) が低く、コール取引活発 (強気示唆)", vol_pcr));
                }
                Some(vol_pcr) => {
                    rationale.push(format!("PCR(Vol) ({:.2}) は中立水準", vol_pcr));
                }
                None => rationale.push("PCR(Vol): コール出来高なし (判定対象外)".to_string()),
            }

            if let Some(note) = gex_note {
                rationale.push(note.to_string());
            }
        }

        if let Some(gex) = &metrics.gex {
            if gex.nearby_net_gex > 0.0 {
                bullish += 1;
                rationale.push("近傍GEX: 正 (値動き抑制)".to_string());
            } else {
                if gex.nearby_net_gex < 0.0 {
                    bearish += 1;
                }
                rationale.push("近傍GEX: 負 (ボラ拡大警戒)".to_string());
            }

            if let Some(wall) = gex.positive_wall {
                rationale.push(format!("+Wall (${:.0}): 上値抵抗", wall.strike));
            }
            if let Some(wall) = gex.negative_wall {
                rationale.push(format!("-Wall (${:.0}): 下値支持", wall.strike));
            }
        }

        if let Some(iv) = metrics.atm_iv {
            rationale.push(format!("ATM IV: {:.1}%", iv * 100.0));
        }

        if let Some(max_pain) = metrics.max_pain {
            if let Some(spot) = spot {
                if spot < max_pain {
                    bullish += 1;
                } else if spot > max_pain {
                    bearish += 1;
                }
            }
            rationale.push(format!("Max Pain: ${:.0}", max_pain));
        }

        let sentiment = Signal::from_counts(bullish, bearish);
        debug!(%sentiment, bullish, bearish, "종목 센티먼트");

        Some(TickerSentiment {
            ticker: input.ticker.clone(),
            spot,
            sentiment,
            metrics,
            rationale,
        })
    }
}
