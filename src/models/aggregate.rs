//! # Aggregate モジュール
//!
//! サンプル列をカテゴリ別（主要・副次）に集約し、各カテゴリの
//! 占有量（Magnitude）へ還元します。
//!
//! 集約ポリシーは2種類あり、シナリオ設定で切り替えます：
//!
//! - **セル占有（CellOccupancy）**: 水平角を10度幅のセルに分割し、
//!   カテゴリごとに占有された異なるセルの数を数えます。同一セルに
//!   複数の鉄塔が入っても1と数えます（集合和）。
//! - **角度総和（AngleSummation）**: カテゴリごとに垂直角の
//!   床関数和・天井関数和・正確な和の3つを累積します。

use std::collections::HashSet;
use std::str::FromStr;

use crate::models::common::TowerCategory;
use crate::models::sampler::TowerSweep;

/// 集約ポリシー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationPolicy {
    /// 占有された10度セルの数を数える
    CellOccupancy,
    /// 垂直角の総和（床・天井・正確値）を累積する
    AngleSummation,
}

impl FromStr for AggregationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cells" | "occupancy" => Ok(AggregationPolicy::CellOccupancy),
            "sums" | "summation" => Ok(AggregationPolicy::AngleSummation),
            _ => Err(format!(
                "無効な集約ポリシー: {}. 利用可能: cells, sums",
                s
            )),
        }
    }
}

/// 1カテゴリの占有量
///
/// アクティブなポリシーに応じて、セル数または角度総和の
/// どちらか一方を保持します。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Magnitude {
    /// 占有された異なるセルの数
    CellCount(usize),
    /// 垂直角の総和
    AngleSums {
        /// floor(垂直角)の総和
        floor_sum: i64,
        /// ceil(垂直角)の総和
        ceil_sum: i64,
        /// 垂直角の正確な総和
        exact_sum: f64,
    },
}

impl Magnitude {
    /// 分類に使用する整数値
    ///
    /// セル占有ポリシーではセル数、角度総和ポリシーでは天井関数和を
    /// 分類の入力とします。
    pub fn classification_value(&self) -> i64 {
        match self {
            Magnitude::CellCount(count) => *count as i64,
            Magnitude::AngleSums { ceil_sum, .. } => *ceil_sum,
        }
    }
}

/// 集約結果
///
/// 呼び出しごとに新しく計算される不変の値オブジェクトです。
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateResult {
    /// 主要カテゴリ（垂直角 > 3.0度）の占有量
    pub main: Magnitude,
    /// 副次カテゴリ（0.1度 <= 垂直角 <= 3.0度）の占有量
    pub side: Magnitude,
}

/// 描画用のサンプル
///
/// 描画側の協調コンポーネントに渡す(水平角, 垂直角, カテゴリ)の組。
/// 垂直角は描画上限（既定40度）でキャップされます。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSample {
    pub horizontal_angle_deg: f64,
    pub vertical_angle_deg: f64,
    pub category: TowerCategory,
}

/// 集約の実行結果一式
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateOutput {
    pub result: AggregateResult,
    /// 描画協調コンポーネント用のサンプルリスト
    pub render_samples: Vec<RenderSample>,
    /// 採用されたサンプルの総数
    pub sample_count: usize,
}

/// カテゴリ別の累積器
#[derive(Debug, Default)]
struct GroupAccumulator {
    cells: HashSet<usize>,
    floor_sum: i64,
    ceil_sum: i64,
    exact_sum: f64,
    count: usize,
}

impl GroupAccumulator {
    fn add(&mut self, cell: usize, vertical_angle_deg: f64) {
        self.cells.insert(cell);
        self.floor_sum += vertical_angle_deg.floor() as i64;
        self.ceil_sum += vertical_angle_deg.ceil() as i64;
        self.exact_sum += vertical_angle_deg;
        self.count += 1;
    }

    fn magnitude(&self, policy: AggregationPolicy) -> Magnitude {
        match policy {
            AggregationPolicy::CellOccupancy => Magnitude::CellCount(self.cells.len()),
            AggregationPolicy::AngleSummation => Magnitude::AngleSums {
                floor_sum: self.floor_sum,
                ceil_sum: self.ceil_sum,
                exact_sum: self.exact_sum,
            },
        }
    }
}

/// 掃引を集約して占有量を計算
///
/// 掃引の全サンプルを1パスし、主要・副次の各カテゴリについて
/// 指定されたポリシーの占有量を計算します。縮退シナリオでは
/// 両カテゴリともゼロの結果になります。
///
/// # 引数
///
/// * `sweep` - サンプルを生成する掃引
/// * `policy` - 集約ポリシー
/// * `cell_width_deg` - 水平セルの幅（度）
/// * `render_cap_deg` - 描画用垂直角の上限（度）
///
/// # 戻り値
///
/// 集約結果と描画用サンプルリスト
pub fn aggregate_sweep(
    sweep: &TowerSweep,
    policy: AggregationPolicy,
    cell_width_deg: f64,
    render_cap_deg: f64,
) -> AggregateOutput {
    let mut main = GroupAccumulator::default();
    let mut side = GroupAccumulator::default();
    let mut render_samples = Vec::new();

    // [0, 180]の閉区間に対してセル番号を0..=max_cellに収める。
    // ちょうど180度のサンプルは最終セルに属する
    let max_cell = ((180.0 / cell_width_deg).ceil() as usize).saturating_sub(1);

    for sample in sweep.samples() {
        let cell = ((sample.horizontal_angle_deg / cell_width_deg).floor() as usize).min(max_cell);

        match sample.category {
            TowerCategory::Main => main.add(cell, sample.vertical_angle_deg),
            TowerCategory::Side => side.add(cell, sample.vertical_angle_deg),
        }

        render_samples.push(RenderSample {
            horizontal_angle_deg: sample.horizontal_angle_deg,
            vertical_angle_deg: sample.vertical_angle_deg.min(render_cap_deg),
            category: sample.category,
        });
    }

    let sample_count = main.count + side.count;

    AggregateOutput {
        result: AggregateResult {
            main: main.magnitude(policy),
            side: side.magnitude(policy),
        },
        render_samples,
        sample_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::common::sweep_defaults;
    use crate::scenario::ScenarioConfig;

    fn output_for(height: f64, span: f64, angle: f64, policy: AggregationPolicy) -> AggregateOutput {
        let config = ScenarioConfig::from_scalars(height, span, angle, "cells").unwrap();
        let sweep = TowerSweep::new(&config);
        aggregate_sweep(
            &sweep,
            policy,
            sweep_defaults::CELL_WIDTH_DEG,
            sweep_defaults::RENDER_CAP_DEG,
        )
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            AggregationPolicy::from_str("cells"),
            Ok(AggregationPolicy::CellOccupancy)
        );
        assert_eq!(
            AggregationPolicy::from_str("SUMS"),
            Ok(AggregationPolicy::AngleSummation)
        );
        assert!(AggregationPolicy::from_str("invalid").is_err());
    }

    #[test]
    fn test_cell_occupancy_reference_scenario() {
        // h=50m, span=100m, 仰角5度の基準シナリオ
        let output = output_for(50.0, 100.0, 5.0, AggregationPolicy::CellOccupancy);

        assert_eq!(output.result.main, Magnitude::CellCount(11));
        assert_eq!(output.result.side, Magnitude::CellCount(8));
        assert_eq!(output.sample_count, 81);
    }

    #[test]
    fn test_angle_summation_reference_scenario() {
        let output = output_for(50.0, 100.0, 5.0, AggregationPolicy::AngleSummation);

        match output.result.main {
            Magnitude::AngleSums {
                floor_sum,
                ceil_sum,
                exact_sum,
            } => {
                assert_eq!(floor_sum, 55);
                assert_eq!(ceil_sum, 70);
                assert!((exact_sum - 62.1255849).abs() < 1e-3);
            }
            _ => panic!("AngleSumsであるはず"),
        }

        match output.result.side {
            Magnitude::AngleSums {
                floor_sum,
                ceil_sum,
                exact_sum,
            } => {
                assert_eq!(floor_sum, 54);
                assert_eq!(ceil_sum, 120);
                assert!((exact_sum - 89.9258223).abs() < 1e-3);
            }
            _ => panic!("AngleSumsであるはず"),
        }
    }

    #[test]
    fn test_all_side_scenario() {
        // 仰角2度では中央でも垂直角2度となり、主要カテゴリは空
        let output = output_for(30.0, 250.0, 2.0, AggregationPolicy::CellOccupancy);

        assert_eq!(output.result.main, Magnitude::CellCount(0));
        assert_eq!(output.result.side, Magnitude::CellCount(15));
    }

    #[test]
    fn test_degenerate_scenario_is_all_zero() {
        let output = output_for(50.0, 100.0, 0.0, AggregationPolicy::CellOccupancy);
        assert_eq!(output.result.main, Magnitude::CellCount(0));
        assert_eq!(output.result.side, Magnitude::CellCount(0));
        assert!(output.render_samples.is_empty());

        let output = output_for(50.0, 100.0, 0.0, AggregationPolicy::AngleSummation);
        assert_eq!(output.result.main.classification_value(), 0);
        assert_eq!(output.result.side.classification_value(), 0);
    }

    #[test]
    fn test_cell_count_bounds() {
        // セル数は[0,180]を覆う18セルを超えず、サンプル数も超えない
        for (h, span, angle) in [(50.0, 100.0, 5.0), (80.0, 50.0, 10.0), (30.0, 250.0, 2.0)] {
            let output = output_for(h, span, angle, AggregationPolicy::CellOccupancy);
            let main_count = match output.result.main {
                Magnitude::CellCount(n) => n,
                _ => unreachable!(),
            };
            let side_count = match output.result.side {
                Magnitude::CellCount(n) => n,
                _ => unreachable!(),
            };
            assert!(main_count <= 18);
            assert!(side_count <= 18);
            assert!(main_count + side_count <= output.sample_count);
        }
    }

    #[test]
    fn test_floor_exact_ceil_ordering() {
        let output = output_for(80.0, 50.0, 10.0, AggregationPolicy::AngleSummation);
        if let Magnitude::AngleSums {
            floor_sum,
            ceil_sum,
            exact_sum,
        } = output.result.main
        {
            assert!(floor_sum as f64 <= exact_sum);
            assert!(exact_sum <= ceil_sum as f64);
        } else {
            panic!("AngleSumsであるはず");
        }
    }

    #[test]
    fn test_render_samples_capped() {
        // 高い鉄塔を間近に見るシナリオでは垂直角が40度を超えるため、
        // 描画用リストでは40度にキャップされる
        let output = output_for(300.0, 100.0, 45.0, AggregationPolicy::CellOccupancy);
        assert!(output
            .render_samples
            .iter()
            .all(|s| s.vertical_angle_deg <= 40.0));
        assert!(output
            .render_samples
            .iter()
            .any(|s| s.vertical_angle_deg == 40.0));
    }
}
