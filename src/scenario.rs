use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;

use crate::models::aggregate::AggregationPolicy;
use crate::models::common::sweep_defaults;

/// シナリオメタデータ
#[derive(Debug, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

impl Default for ScenarioMeta {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: "ad-hoc".to_string(),
            description: "コマンドライン引数から構築されたシナリオ".to_string(),
        }
    }
}

/// 評価対象の設定
///
/// 評価コアへの入力は3つのスカラー値だけです。
#[derive(Debug, Deserialize, Serialize)]
pub struct AssessmentConfig {
    /// 鉄塔の高さ（m、正値）
    pub tower_height_m: f64,
    /// 鉄塔間隔（m、正値）。掃引のステップ幅を兼ねる。
    /// ステップとしては整数に切り詰めて使用される
    pub span_m: f64,
    /// 仰角（度）。正接が定義する観測距離の元になる角度
    pub elevation_angle_deg: f64,
}

/// 掃引設定
///
/// 掃引範囲・基準方位・しきい値などの領域前提。シナリオで省略した
/// 項目は既定値が使われます。
#[derive(Debug, Deserialize, Serialize)]
pub struct SweepConfig {
    #[serde(default = "default_min_offset")]
    pub min_offset_m: f64,
    #[serde(default = "default_max_offset")]
    pub max_offset_m: f64,
    #[serde(default = "default_pin_bearing")]
    pub pin_bearing_deg: f64,
    #[serde(default = "default_visibility_floor")]
    pub visibility_floor_deg: f64,
    #[serde(default = "default_main_threshold")]
    pub main_threshold_deg: f64,
    #[serde(default = "default_cell_width")]
    pub cell_width_deg: f64,
    #[serde(default = "default_render_cap")]
    pub render_cap_deg: f64,
}

fn default_min_offset() -> f64 {
    sweep_defaults::MIN_OFFSET_M
}
fn default_max_offset() -> f64 {
    sweep_defaults::MAX_OFFSET_M
}
fn default_pin_bearing() -> f64 {
    sweep_defaults::PIN_BEARING_DEG
}
fn default_visibility_floor() -> f64 {
    sweep_defaults::VISIBILITY_FLOOR_DEG
}
fn default_main_threshold() -> f64 {
    sweep_defaults::MAIN_THRESHOLD_DEG
}
fn default_cell_width() -> f64 {
    sweep_defaults::CELL_WIDTH_DEG
}
fn default_render_cap() -> f64 {
    sweep_defaults::RENDER_CAP_DEG
}

fn default_policy() -> String {
    "cells".to_string()
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            min_offset_m: default_min_offset(),
            max_offset_m: default_max_offset(),
            pin_bearing_deg: default_pin_bearing(),
            visibility_floor_deg: default_visibility_floor(),
            main_threshold_deg: default_main_threshold(),
            cell_width_deg: default_cell_width(),
            render_cap_deg: default_render_cap(),
        }
    }
}

/// 完全なシナリオ設定
#[derive(Debug, Deserialize, Serialize)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub meta: ScenarioMeta,
    pub assessment: AssessmentConfig,
    /// 集約ポリシー ("cells" または "sums")
    #[serde(default = "default_policy")]
    pub policy: String,
    #[serde(default)]
    pub sweep: SweepConfig,
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        // ファイル読み込み
        let contents = fs::read_to_string(path)
            .map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        // YAML解析
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ScenarioError::ParseError(path.to_path_buf(), e))?;

        // 基本的な検証
        config.validate()?;

        Ok(config)
    }

    /// スカラー値からシナリオ設定を構築（コマンドライン直接指定用）
    ///
    /// # 引数
    ///
    /// * `tower_height_m` - 鉄塔の高さ（m）
    /// * `span_m` - 鉄塔間隔（m）
    /// * `elevation_angle_deg` - 仰角（度）
    /// * `policy` - 集約ポリシー文字列
    pub fn from_scalars(
        tower_height_m: f64,
        span_m: f64,
        elevation_angle_deg: f64,
        policy: &str,
    ) -> Result<Self, ScenarioError> {
        let config = Self {
            meta: ScenarioMeta::default(),
            assessment: AssessmentConfig {
                tower_height_m,
                span_m,
                elevation_angle_deg,
            },
            policy: policy.to_string(),
            sweep: SweepConfig::default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// 設定の基本的な検証
    pub fn validate(&self) -> Result<(), ScenarioError> {
        // 評価入力の検証
        if self.assessment.tower_height_m <= 0.0 {
            return Err(ScenarioError::ValidationError(
                "tower_height_m must be positive".to_string(),
            ));
        }
        if self.assessment.span_m <= 0.0 {
            return Err(ScenarioError::ValidationError(
                "span_m must be positive".to_string(),
            ));
        }
        // 1m未満の間隔は整数ステップに切り詰めるとゼロになり掃引できない
        if self.assessment.span_m.trunc() < 1.0 {
            return Err(ScenarioError::ValidationError(
                "span_m must be at least 1m (integer step)".to_string(),
            ));
        }

        // 掃引範囲の検証
        if self.sweep.min_offset_m >= self.sweep.max_offset_m {
            return Err(ScenarioError::ValidationError(
                "Invalid sweep bounds".to_string(),
            ));
        }
        if self.sweep.cell_width_deg <= 0.0 {
            return Err(ScenarioError::ValidationError(
                "cell_width_deg must be positive".to_string(),
            ));
        }
        if self.sweep.visibility_floor_deg >= self.sweep.main_threshold_deg {
            return Err(ScenarioError::ValidationError(
                "visibility_floor_deg must be below main_threshold_deg".to_string(),
            ));
        }

        // 集約ポリシーの検証
        self.aggregation_policy()?;

        Ok(())
    }

    /// 集約ポリシーの取得
    pub fn aggregation_policy(&self) -> Result<AggregationPolicy, ScenarioError> {
        self.policy
            .parse::<AggregationPolicy>()
            .map_err(ScenarioError::ValidationError)
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== 評価入力 ===");
        println!("鉄塔の高さ: {:.1}m", self.assessment.tower_height_m);
        println!("鉄塔間隔: {:.1}m", self.assessment.span_m);
        println!("仰角: {:.1}度", self.assessment.elevation_angle_deg);
        println!("集約ポリシー: {}", self.policy);
        println!();

        println!("=== 掃引設定 ===");
        println!(
            "掃引範囲: {:.0}m 〜 {:.0}m",
            self.sweep.min_offset_m, self.sweep.max_offset_m
        );
        println!("基準方位: {:.1}度", self.sweep.pin_bearing_deg);
        println!(
            "可視下限/主要しきい値: {:.1}度 / {:.1}度",
            self.sweep.visibility_floor_deg, self.sweep.main_threshold_deg
        );
        println!("セル幅: {:.0}度", self.sweep.cell_width_deg);
    }
}

/// シナリオ読み込みエラー
#[derive(Debug)]
pub enum ScenarioError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::FileNotFound(path) => {
                write!(f, "シナリオファイルが見つかりません: {}", path.display())
            }
            ScenarioError::IoError(path, err) => {
                write!(f, "ファイル読み込みエラー {}: {}", path.display(), err)
            }
            ScenarioError::ParseError(path, err) => {
                write!(f, "YAML解析エラー {}: {}", path.display(), err)
            }
            ScenarioError::ValidationError(msg) => {
                write!(f, "設定検証エラー: {}", msg)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}
