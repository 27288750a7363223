//! 피보나치 되돌림 레벨.
//!
//! 시계열 전체의 최고가/최저가 사이에 레벨을 배치합니다.
//! 레벨 = 저점 + (고점 - 저점) × (1 - 비율) 이므로 0%는 고점, 100%는 저점입니다.

use advisor_core::FibLevel;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// 되돌림 비율.
pub const FIB_RATIOS: [Decimal; 7] = [
    dec!(0),
    dec!(0.236),
    dec!(0.382),
    dec!(0.5),
    dec!(0.618),
    dec!(0.786),
    dec!(1),
];

/// 피보나치 판독 결과.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FibonacciReading {
    pub levels: Vec<FibLevel>,
    /// 최신 종가에 가장 가까운 레벨의 비율
    pub nearest_ratio: Decimal,
}

/// 고가/저가/종가 시계열로 피보나치 레벨을 계산합니다.
///
/// 입력이 비어 있으면 레벨 없이 비율 0을 반환합니다.
/// 거리가 같은 레벨이 여럿이면 먼저 나오는 비율을 택합니다.
pub fn fibonacci_levels(highs: &[Decimal], lows: &[Decimal], closes: &[Decimal]) -> FibonacciReading {
    let (Some(swing_high), Some(swing_low), Some(current)) = (
        highs.iter().max().copied(),
        lows.iter().min().copied(),
        closes.last().copied(),
    ) else {
        return FibonacciReading::default();
    };

    let range = swing_high - swing_low;
    let levels: Vec<FibLevel> = FIB_RATIOS
        .iter()
        .map(|&ratio| FibLevel {
            ratio,
            price: swing_low + range * (Decimal::ONE - ratio),
        })
        .collect();

    let mut nearest = levels[0];
    for level in &levels[1..] {
        if (level.price - current).abs() < (nearest.price - current).abs() {
            nearest = *level;
        }
    }

    FibonacciReading {
        nearest_ratio: nearest.ratio,
        levels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_between_swing_points() {
        let highs = vec![dec!(104), dec!(110), dec!(107)];
        let lows = vec![dec!(100), dec!(103), dec!(102)];
        let closes = vec![dec!(102), dec!(108), dec!(105.2)];

        let reading = fibonacci_levels(&highs, &lows, &closes);
        assert_eq!(reading.levels.len(), 7);
        assert_eq!(reading.levels[0].price, dec!(110));
        assert_eq!(reading.levels[3].price, dec!(105));
        assert_eq!(reading.levels[6].price, dec!(100));
        assert_eq!(reading.nearest_ratio, dec!(0.5));
    }

    #[test]
    fn test_flat_range_picks_first_ratio() {
        let flat = vec![dec!(100); 5];
        let reading = fibonacci_levels(&flat, &flat, &flat);
        assert_eq!(reading.nearest_ratio, Decimal::ZERO);
        assert!(reading.levels.iter().all(|l| l.price == dec!(100)));
    }

    #[test]
    fn test_empty_input() {
        let reading = fibonacci_levels(&[], &[], &[]);
        assert!(reading.levels.is_empty());
        assert_eq!(reading.nearest_ratio, Decimal::ZERO);
    }
}
