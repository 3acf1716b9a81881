//! # Assessment モジュール
//!
//! 鉄塔景観評価の中核となる評価エンジンを提供します。
//!
//! このモジュールは、シナリオ設定から評価パイプライン
//! （Sampler → Aggregator → Classifier）を1回実行し、
//! 占有量・分類・中間評価トリガーをまとめた評価レポートを生成します。
//!
//! ## 評価処理順序
//!
//! 1. **掃引構築**: シナリオから基線距離と掃引範囲を決定
//! 2. **サンプリング**: 各オフセットの見かけの垂直角・水平角を導出
//! 3. **集約**: カテゴリ別にセル占有または角度総和へ還元
//! 4. **分類**: 主要カテゴリの占有量を5段階分類へ写像
//!
//! パイプラインは状態を持たず、呼び出しごとに独立です。
//! 縮退シナリオ（仰角の正接が実質ゼロ）は全ゼロの結果になります。

use crate::models::*;
use crate::scenario::{ScenarioConfig, ScenarioError};
use tracing::{debug, info, trace, warn};

/// 評価レポート
///
/// 1回の評価実行の結果一式。生成後は不変です。
#[derive(Debug, Clone)]
pub struct AssessmentReport {
    /// 観測点から中央鉄塔までの基線距離（m）。縮退シナリオではNone
    pub baseline_m: Option<f64>,
    /// カテゴリ別の占有量
    pub result: AggregateResult,
    /// 主要カテゴリの占有量に基づく分類
    pub classification: SeverityBand,
    /// 中間評価のトリガー（主要占有量 >= 16）
    pub triggers_intermediate: bool,
    /// 描画協調コンポーネント用のサンプルリスト
    pub render_samples: Vec<RenderSample>,
    /// 採用されたサンプルの総数
    pub sample_count: usize,
}

/// 評価エンジン
pub struct AssessmentEngine {
    pub scenario_config: ScenarioConfig,
    pub verbose_level: u8,
}

impl AssessmentEngine {
    pub fn new(scenario: ScenarioConfig, verbose_level: u8) -> Self {
        Self {
            scenario_config: scenario,
            verbose_level,
        }
    }

    /// 評価パイプラインを実行してレポートを生成
    ///
    /// サンプリング・集約・分類を1パスで実行します。
    /// 出力は行わないため、描画側や他のホストから直接利用できます。
    ///
    /// # 戻り値
    ///
    /// 評価レポート。入力が無効な場合は検証エラー
    pub fn assess(&self) -> Result<AssessmentReport, ScenarioError> {
        self.scenario_config.validate()?;
        let policy = self.scenario_config.aggregation_policy()?;

        let sweep = TowerSweep::new(&self.scenario_config);

        if sweep.is_degenerate() {
            warn!("仰角が小さすぎるため観測距離が定義できません（縮退シナリオ）");
        } else if self.verbose_level > 1 {
            debug!(
                "基線距離: {:.1}m, 掃引範囲: {:.0}m 〜 {:.0}m",
                sweep.baseline_m().unwrap_or(0.0),
                self.scenario_config.sweep.min_offset_m,
                self.scenario_config.sweep.max_offset_m
            );
        }

        if self.verbose_level > 2 {
            for sample in sweep.samples() {
                trace!(
                    "サンプル: オフセット{:+.0}m, 垂直角{:.3}度, 水平角{:.3}度, {:?}",
                    sample.offset_m,
                    sample.vertical_angle_deg,
                    sample.horizontal_angle_deg,
                    sample.category
                );
            }
        }

        let output = aggregate_sweep(
            &sweep,
            policy,
            self.scenario_config.sweep.cell_width_deg,
            self.scenario_config.sweep.render_cap_deg,
        );

        let magnitude = output.result.main.classification_value();
        let classification = classify_magnitude(magnitude);
        let triggers_intermediate = triggers_intermediate_assessment(magnitude);

        Ok(AssessmentReport {
            baseline_m: sweep.baseline_m(),
            result: output.result,
            classification,
            triggers_intermediate,
            render_samples: output.render_samples,
            sample_count: output.sample_count,
        })
    }

    /// 評価を実行して結果を表示
    pub fn run(&self) -> Result<AssessmentReport, ScenarioError> {
        info!("=== 評価実行開始 ===");

        let report = self.assess()?;

        if self.verbose_level > 0 {
            info!("採用サンプル数: {}", report.sample_count);
        }

        self.print_results(&report);

        info!("=== 評価完了 ===");

        Ok(report)
    }

    /// 評価結果の表示
    fn print_results(&self, report: &AssessmentReport) {
        let assessment = &self.scenario_config.assessment;

        println!("=== 評価結果 ===");
        println!("鉄塔の高さ: {:.1}m", assessment.tower_height_m);
        println!("鉄塔間隔: {:.1}m", assessment.span_m);
        println!("仰角: {:.1}度", assessment.elevation_angle_deg);
        println!();

        println!("--- 主要カテゴリ (垂直角 > 3度) ---");
        Self::print_magnitude(&report.result.main);
        println!("分類: {}", report.classification);
        if report.triggers_intermediate {
            println!(
                "注意: 主要占有量が{}以上のため、中間評価の実施が必要です",
                INTERMEDIATE_TRIGGER_THRESHOLD
            );
        }
        println!();

        println!("--- 副次カテゴリ (垂直角 <= 3度) ---");
        Self::print_magnitude(&report.result.side);
    }

    fn print_magnitude(magnitude: &Magnitude) {
        match magnitude {
            Magnitude::CellCount(count) => {
                println!("占有セル数 (1x10度): {}", count);
            }
            Magnitude::AngleSums {
                floor_sum,
                ceil_sum,
                exact_sum,
            } => {
                println!("垂直角総和 (床): {}", floor_sum);
                println!("垂直角総和 (天井): {}", ceil_sum);
                println!("垂直角総和 (正確): {:.2}", exact_sum);
            }
        }
    }
}
