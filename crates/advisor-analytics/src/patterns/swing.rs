//! 스윙 고점/저점 검출과 추세 구조 판정.
//!
//! 각 시점을 좌우 `order`개 이웃과 비교해 엄격한 국소 극값을 찾습니다.
//! 범위를 벗어나는 이웃 인덱스는 양 끝으로 잘라 비교하므로
//! 첫 번째와 마지막 시점은 극값이 될 수 없습니다.

use advisor_core::{SwingPoint, SwingStructure};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 보고할 최근 극값 개수.
pub const RECENT_SWING_COUNT: usize = 5;

/// 스윙 검출 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SwingParams {
    /// 비교 이웃 수 (기본: 5).
    pub order: usize,
}

impl Default for SwingParams {
    fn default() -> Self {
        Self { order: 5 }
    }
}

/// 스윙 판독 결과.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwingReading {
    /// 최근 고점 (최대 5개, 오래된 순)
    pub peaks: Vec<SwingPoint>,
    /// 최근 저점 (최대 5개, 오래된 순)
    pub valleys: Vec<SwingPoint>,
    pub structure: SwingStructure,
}

/// 고가에서 고점, 저가에서 저점을 찾아 구조를 판정합니다.
///
/// 마지막 두 고점과 저점을 비교합니다:
/// 고점 상승 + 저점 상승이면 `HigherHighs`, 고점 하락 + 저점 하락이면 `LowerLows`,
/// 그 외는 `Range`. 고점이나 저점이 2개 미만이면 `Unknown`.
pub fn detect_swings(highs: &[Decimal], lows: &[Decimal], params: SwingParams) -> SwingReading {
    let peaks = recent(extrema(highs, params.order, |a, b| a > b));
    let valleys = recent(extrema(lows, params.order, |a, b| a < b));

    let structure = match (last_two(&peaks), last_two(&valleys)) {
        (Some((prev_peak, last_peak)), Some((prev_valley, last_valley))) => {
            let higher_high = last_peak > prev_peak;
            let higher_low = last_valley > prev_valley;
            let lower_high = last_peak < prev_peak;
            let lower_low = last_valley < prev_valley;

            if higher_high && higher_low {
                SwingStructure::HigherHighs
            } else if lower_high && lower_low {
                SwingStructure::LowerLows
            } else {
                SwingStructure::Range
            }
        }
        _ => SwingStructure::Unknown,
    };

    SwingReading {
        peaks,
        valleys,
        structure,
    }
}

/// `cmp(values[i], 이웃)`이 모든 이웃에 대해 참인 인덱스.
fn extrema<F>(values: &[Decimal], order: usize, cmp: F) -> Vec<SwingPoint>
where
    F: Fn(Decimal, Decimal) -> bool,
{
    let len = values.len();
    if len == 0 || order == 0 {
        return Vec::new();
    }
    let last = len - 1;

    (0..len)
        .filter(|&i| {
            (1..=order).all(|k| {
                let left = i.saturating_sub(k);
                let right = (i + k).min(last);
                cmp(values[i], values[left]) && cmp(values[i], values[right])
            })
        })
        .map(|index| SwingPoint {
            index,
            price: values[index],
        })
        .collect()
}

fn recent(mut points: Vec<SwingPoint>) -> Vec<SwingPoint> {
    let start = points.len().saturating_sub(RECENT_SWING_COUNT);
    points.drain(..start);
    points
}

fn last_two(points: &[SwingPoint]) -> Option<(Decimal, Decimal)> {
    match points {
        [.., prev, last] => Some((prev.price, last.price)),
        _ => None,
    }
}
