//! # Classify モジュール
//!
//! 主要カテゴリの占有量を5段階の視覚的影響度に写像します。
//! 状態を持たない純粋関数のみで構成されます。

use std::fmt;

/// 視覚的影響度の5段階分類
///
/// 順序付きの分類帯。占有量の増加に対して単調非減少です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeverityBand {
    /// 占有量 <= 7
    VeryLow,
    /// 占有量 8〜14
    Low,
    /// 占有量 15〜25
    Moderate,
    /// 占有量 26〜36
    High,
    /// 占有量 >= 37
    VeryHigh,
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SeverityBand::VeryLow => "Very low",
            SeverityBand::Low => "Low",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::High => "High",
            SeverityBand::VeryHigh => "Very high",
        };
        write!(f, "{}", label)
    }
}

/// 中間評価のトリガーしきい値
///
/// 主要カテゴリの占有量がこの値以上の場合、より詳細な中間評価の
/// 実施が必要と判断されます。
pub const INTERMEDIATE_TRIGGER_THRESHOLD: i64 = 16;

/// 占有量を分類帯に写像
///
/// # 引数
///
/// * `value` - 主要カテゴリの占有量（セル占有ポリシーではセル数、
///   角度総和ポリシーでは天井関数和）
///
/// # 戻り値
///
/// 対応する分類帯
pub fn classify_magnitude(value: i64) -> SeverityBand {
    if value <= 7 {
        SeverityBand::VeryLow
    } else if value <= 14 {
        SeverityBand::Low
    } else if value <= 25 {
        SeverityBand::Moderate
    } else if value <= 36 {
        SeverityBand::High
    } else {
        SeverityBand::VeryHigh
    }
}

/// 中間評価が必要かどうかの判定
pub fn triggers_intermediate_assessment(value: i64) -> bool {
    value >= INTERMEDIATE_TRIGGER_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(classify_magnitude(0), SeverityBand::VeryLow);
        assert_eq!(classify_magnitude(7), SeverityBand::VeryLow);
        assert_eq!(classify_magnitude(8), SeverityBand::Low);
        assert_eq!(classify_magnitude(14), SeverityBand::Low);
        assert_eq!(classify_magnitude(15), SeverityBand::Moderate);
        assert_eq!(classify_magnitude(25), SeverityBand::Moderate);
        assert_eq!(classify_magnitude(26), SeverityBand::High);
        assert_eq!(classify_magnitude(36), SeverityBand::High);
        assert_eq!(classify_magnitude(37), SeverityBand::VeryHigh);
        assert_eq!(classify_magnitude(1000), SeverityBand::VeryHigh);
    }

    #[test]
    fn test_monotonic_non_decreasing() {
        let mut previous = classify_magnitude(0);
        for value in 1..=50 {
            let current = classify_magnitude(value);
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn test_intermediate_trigger_boundary() {
        assert!(!triggers_intermediate_assessment(15));
        assert!(triggers_intermediate_assessment(16));
        assert!(!triggers_intermediate_assessment(0));
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(SeverityBand::VeryLow.to_string(), "Very low");
        assert_eq!(SeverityBand::VeryHigh.to_string(), "Very high");
    }
}
