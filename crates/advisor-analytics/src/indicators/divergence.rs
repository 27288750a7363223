//! 가격-지표 다이버전스 검출.

use advisor_core::Divergence;
use rust_decimal::Decimal;

/// 최근 `lookback` 구간의 가격 방향과 지표 방향을 비교합니다.
///
/// `x[len-1]`과 `x[len-lookback]`을 비교하며, 가격 하락 중 지표 상승이면
/// 강세 다이버전스, 가격 상승 중 지표 하락이면 약세 다이버전스입니다.
/// 어느 한쪽이 구간보다 짧거나 양 끝 지표 값이 없으면 `None`.
pub fn detect_divergence(
    price: &[Decimal],
    indicator: &[Option<Decimal>],
    lookback: usize,
) -> Divergence {
    if lookback == 0 || price.len() < lookback || indicator.len() < lookback {
        return Divergence::None;
    }

    let price_start = price[price.len() - lookback];
    let price_end = price[price.len() - 1];

    let (ind_start, ind_end) = match (
        indicator[indicator.len() - lookback],
        indicator[indicator.len() - 1],
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => return Divergence::None,
    };

    let price_rising = price_end > price_start;
    let indicator_rising = ind_end > ind_start;

    match (price_rising, indicator_rising) {
        (false, true) => Divergence::Bullish,
        (true, false) => Divergence::Bearish,
        _ => Divergence::None,
    }
}
