//! # Sampler モジュール
//!
//! 観測点の周囲の固定水平範囲を歩き、各サンプル点に立つ仮想的な鉄塔の
//! 見かけの垂直角・水平角を導出するサンプラーを提供します。
//!
//! 掃引は整数ステップの列挙です。既定では-4000mから+4000mまでを
//! 鉄塔間隔（span）刻みで走査し、終端を超える端数ステップは切り捨てます。
//! 鉄塔間隔は整数に切り詰めてからステップに使用します（設定読み込み時に
//! 文書化された挙動。1m未満の間隔は検証段階で拒否されます）。

use crate::models::common::{math_utils, TowerCategory};
use crate::scenario::ScenarioConfig;

/// 1つの水平オフセットに対応するサンプル
///
/// 掃引内の各サンプル点における仮想鉄塔の幾何量を保持します。
/// 呼び出しごとに再計算される一時的な値オブジェクトです。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerSample {
    /// 中央からの符号付きオフセット（m）
    pub offset_m: f64,
    /// 観測点から鉄塔基部までの斜距離（m）
    pub slant_range_m: f64,
    /// 見かけの垂直角（度、構成上0以上）
    pub vertical_angle_deg: f64,
    /// 見かけの水平角（度、[0, 180]）
    pub horizontal_angle_deg: f64,
    /// 分類カテゴリ
    pub category: TowerCategory,
}

/// 鉄塔掃引
///
/// シナリオ設定から構築され、有限で再起動可能なサンプル列を生成します。
/// 仰角の正接が特異な場合は縮退シナリオとなり、サンプルを1つも
/// 生成しません（エラーではありません）。
#[derive(Debug, Clone)]
pub struct TowerSweep {
    tower_height_m: f64,
    baseline_m: Option<f64>,
    step_m: i64,
    min_offset_m: i64,
    max_offset_m: i64,
    pin_bearing_deg: f64,
    visibility_floor_deg: f64,
    main_threshold_deg: f64,
}

impl TowerSweep {
    /// シナリオ設定から掃引を構築
    ///
    /// # 引数
    ///
    /// * `config` - 検証済みのシナリオ設定
    ///
    /// # 戻り値
    ///
    /// 構築された掃引。仰角が縮退している場合も掃引自体は生成され、
    /// `is_degenerate()`がtrueを返します。
    pub fn new(config: &ScenarioConfig) -> Self {
        let assessment = &config.assessment;
        let sweep = &config.sweep;

        Self {
            tower_height_m: assessment.tower_height_m,
            baseline_m: math_utils::baseline_distance(
                assessment.tower_height_m,
                assessment.elevation_angle_deg,
            ),
            // 鉄塔間隔は整数ステップに切り詰める（0方向への切り捨て）
            step_m: assessment.span_m.trunc() as i64,
            min_offset_m: sweep.min_offset_m.trunc() as i64,
            max_offset_m: sweep.max_offset_m.trunc() as i64,
            pin_bearing_deg: sweep.pin_bearing_deg,
            visibility_floor_deg: sweep.visibility_floor_deg,
            main_threshold_deg: sweep.main_threshold_deg,
        }
    }

    /// 縮退シナリオかどうか
    ///
    /// 仰角の正接が実質ゼロ（|tan| < 1e-12）の場合、観測距離が定義できず
    /// 掃引はサンプルを生成しません。
    pub fn is_degenerate(&self) -> bool {
        self.baseline_m.is_none()
    }

    /// 観測点から中央鉄塔までの基線距離（m）
    ///
    /// 縮退シナリオの場合はNone
    pub fn baseline_m(&self) -> Option<f64> {
        self.baseline_m
    }

    /// サンプル列のイテレータを生成
    ///
    /// 呼び出しごとに先頭から再開する新しいイテレータを返します。
    /// 1回の呼び出しで全掃引を1パスします。
    pub fn samples(&self) -> SampleIter<'_> {
        SampleIter {
            sweep: self,
            cursor: self.min_offset_m,
        }
    }
}

/// 掃引サンプルのイテレータ
///
/// 可視下限未満のサンプルを読み飛ばしながら、掃引範囲内の
/// 各オフセットのサンプルを順に返します。
#[derive(Debug)]
pub struct SampleIter<'a> {
    sweep: &'a TowerSweep,
    cursor: i64,
}

impl Iterator for SampleIter<'_> {
    type Item = TowerSample;

    fn next(&mut self) -> Option<TowerSample> {
        let baseline = self.sweep.baseline_m?;

        // 非正のステップでは前進できない（検証済み設定では起こらない）
        if self.sweep.step_m <= 0 {
            return None;
        }

        while self.cursor <= self.sweep.max_offset_m {
            let offset = self.cursor as f64;
            self.cursor += self.sweep.step_m;

            let slant_range = baseline.hypot(offset);
            if slant_range <= 0.0 {
                continue;
            }

            let vertical_angle =
                math_utils::rad_to_deg((self.sweep.tower_height_m / slant_range).atan());
            if vertical_angle < self.sweep.visibility_floor_deg {
                continue;
            }

            // 中央鉄塔（オフセット0）は固定方位。それ以外は基線との角度差を
            // 固定方位に加減して[0, 180]にクランプする
            let horizontal_angle = if offset == 0.0 {
                self.sweep.pin_bearing_deg
            } else {
                let delta = math_utils::rad_to_deg((offset.abs() / baseline).atan());
                let bearing = if offset > 0.0 {
                    self.sweep.pin_bearing_deg + delta
                } else {
                    self.sweep.pin_bearing_deg - delta
                };
                math_utils::clamp_bearing(bearing)
            };

            let category = if vertical_angle > self.sweep.main_threshold_deg {
                TowerCategory::Main
            } else {
                TowerCategory::Side
            };

            return Some(TowerSample {
                offset_m: offset,
                slant_range_m: slant_range,
                vertical_angle_deg: vertical_angle,
                horizontal_angle_deg: horizontal_angle,
                category,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::ScenarioConfig;

    fn sweep_for(height: f64, span: f64, angle: f64) -> TowerSweep {
        let config = ScenarioConfig::from_scalars(height, span, angle, "cells").unwrap();
        TowerSweep::new(&config)
    }

    #[test]
    fn test_degenerate_angle_produces_no_samples() {
        let sweep = sweep_for(50.0, 100.0, 0.0);
        assert!(sweep.is_degenerate());
        assert_eq!(sweep.samples().count(), 0);

        let sweep = sweep_for(50.0, 100.0, 180.0);
        assert!(sweep.is_degenerate());
        assert_eq!(sweep.samples().count(), 0);
    }

    #[test]
    fn test_baseline_reference_value() {
        // h=50m, span=100m, 仰角5度 → 基線 ≈ 571.5m
        let sweep = sweep_for(50.0, 100.0, 5.0);
        let baseline = sweep.baseline_m().unwrap();
        assert!((baseline - 571.5026151380671).abs() < 1e-9);
    }

    #[test]
    fn test_center_sample_is_pinned() {
        let sweep = sweep_for(50.0, 100.0, 5.0);
        let center = sweep
            .samples()
            .find(|s| s.offset_m == 0.0)
            .expect("中央サンプルが存在するはず");

        assert_eq!(center.horizontal_angle_deg, 95.0);
        // 中央では斜距離=基線なので垂直角は仰角と厳密に一致する
        assert!((center.vertical_angle_deg - 5.0).abs() < 1e-9);
        assert_eq!(center.category, TowerCategory::Main);
    }

    #[test]
    fn test_offset_500_reference_values() {
        let sweep = sweep_for(50.0, 100.0, 5.0);
        let sample = sweep
            .samples()
            .find(|s| s.offset_m == 500.0)
            .expect("オフセット500mのサンプルが存在するはず");

        assert!((sample.slant_range_m - 759.3518546).abs() < 1e-3);
        assert!((sample.vertical_angle_deg - 3.7672384).abs() < 1e-3);
        assert!((sample.horizontal_angle_deg - 136.1822462).abs() < 1e-3);
        assert_eq!(sample.category, TowerCategory::Main);
    }

    #[test]
    fn test_symmetry_about_center() {
        // +xと-xのサンプルは垂直角が等しく、水平角は95度について鏡映
        let sweep = sweep_for(50.0, 100.0, 5.0);
        let samples: Vec<_> = sweep.samples().collect();

        for s in &samples {
            if s.offset_m <= 0.0 {
                continue;
            }
            let mirror = samples
                .iter()
                .find(|m| m.offset_m == -s.offset_m)
                .expect("対称なサンプルが存在するはず");

            assert!((s.vertical_angle_deg - mirror.vertical_angle_deg).abs() < 1e-12);
            let delta_pos = s.horizontal_angle_deg - 95.0;
            let delta_neg = 95.0 - mirror.horizontal_angle_deg;
            assert!((delta_pos - delta_neg).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sweep_endpoints_included() {
        // span=100は8000mを割り切るため両端が含まれる
        let sweep = sweep_for(50.0, 100.0, 5.0);
        let samples: Vec<_> = sweep.samples().collect();

        assert_eq!(samples.first().map(|s| s.offset_m), Some(-4000.0));
        assert_eq!(samples.last().map(|s| s.offset_m), Some(4000.0));
        assert_eq!(samples.len(), 81);
    }

    #[test]
    fn test_span_truncated_to_integer_step() {
        // 100.7mの間隔は100mに切り詰められ、同一のサンプル列になる
        let truncated: Vec<_> = sweep_for(50.0, 100.7, 5.0).samples().collect();
        let integral: Vec<_> = sweep_for(50.0, 100.0, 5.0).samples().collect();
        assert_eq!(truncated, integral);
    }

    #[test]
    fn test_samples_are_restartable() {
        let sweep = sweep_for(50.0, 100.0, 5.0);
        let first_pass = sweep.samples().count();
        let second_pass = sweep.samples().count();
        assert_eq!(first_pass, second_pass);
        assert_eq!(first_pass, 81);
    }

    #[test]
    fn test_visibility_floor_discards_distant_samples() {
        // 低い鉄塔を広い間隔で見ると、遠方のサンプルは0.1度未満で破棄される
        let sweep = sweep_for(5.0, 1000.0, 10.0);
        for sample in sweep.samples() {
            assert!(sample.vertical_angle_deg >= 0.1);
        }
    }
}
