//! 리포트 생성기 입력용 텍스트 요약.

use advisor_core::TechnicalScore;
use std::fmt::Write;

/// 옵션 값이 없으면 "N/A".
fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

/// 기술적 분석 결과를 여러 줄 요약 문자열로 만듭니다.
pub fn technical_summary(ticker: &str, score: &TechnicalScore) -> String {
    let candles = if score.candlestick_patterns.is_empty() {
        "なし".to_string()
    } else {
        score
            .candlestick_patterns
            .iter()
            .map(|p| format!("{}({})", p.pattern, if p.is_bullish() { "買" } else { "売" }))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let pcr = or_na(score.pcr_ratio.map(|p| format!("{:.2}", p)));
    let iv = or_na(score.atm_iv.map(|iv| format!("{:.1}%", iv * 100.0)));
    let max_pain = or_na(score.max_pain.map(|mp| format!("${:.0}", mp)));

    let mut out = String::new();
    // String에 대한 write!는 실패하지 않음
    let _ = writeln!(out, "【{} テクニカル分析】", ticker);
    let _ = writeln!(
        out,
        "- 総合: {}点 ({}) | トレンド: {}",
        score.overall_score, score.overall_signal, score.ma_trend
    );
    let _ = writeln!(
        out,
        "- RSI: {:.1} ({}) | 動的: {} ({})",
        score.rsi, score.rsi_signal, score.rsi_dynamic_signal, score.rsi_regime
    );
    let _ = writeln!(out, "- MACD: {} (Hist: {})", score.macd_signal, score.macd_hist_slope);
    let _ = writeln!(out, "- 一目均衡表: {} ({})", score.ichimoku_signal, score.ichimoku_regime);
    let _ = writeln!(
        out,
        "- ボリンジャー: {}, スクイズ: {}",
        score.bb_position, score.bb_squeeze_signal
    );
    let _ = writeln!(
        out,
        "- 需給環境: GEX={}, PCR={}({}), IV={}, MaxPain={}",
        score.gex_regime, pcr, score.pcr_signal, iv, max_pain
    );
    let _ = writeln!(out, "- OBV: {} (Div: {})", score.obv_trend, score.obv_divergence);
    let _ = writeln!(
        out,
        "- パターン: 極値={}, ローソク足={}",
        score.swing_structure, candles
    );
    let _ = writeln!(
        out,
        "- サポート/レジスタンス: ${:.2} / ${:.2}",
        score.support_price, score.resistance_price
    );
    let _ = writeln!(
        out,
        "- AVWAP(YTD): ${:.2} (乖離 {:+.1}%)",
        score.avwap_ytd, score.avwap_deviation
    );

    out
}
