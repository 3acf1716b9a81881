/// 鉄塔サンプルの分類カテゴリ
///
/// 視野内の鉄塔は見かけの垂直角によって2つのカテゴリに分かれます。
/// 主要カテゴリ（Main）は垂直角がしきい値（3.0度）を超える鉄塔、
/// 副次カテゴリ（Side）は可視下限（0.1度）以上かつしきい値以下の鉄塔です。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TowerCategory {
    /// 主要カテゴリ（垂直角 > 3.0度）
    Main,
    /// 副次カテゴリ（0.1度 <= 垂直角 <= 3.0度）
    Side,
}

/// 掃引の既定値定数
///
/// 掃引範囲・基準方位などの領域前提をマジックナンバーとして
/// 埋め込まず、名前付き定数として保持します。
/// シナリオ設定（SweepConfig）で上書き可能です。
pub mod sweep_defaults {
    /// 掃引範囲の下限（m）
    pub const MIN_OFFSET_M: f64 = -4000.0;
    /// 掃引範囲の上限（m）
    pub const MAX_OFFSET_M: f64 = 4000.0;
    /// 中央鉄塔の固定方位（度）。観測者の基準視線は真正面よりわずかに
    /// ずれた95度に置かれます。
    pub const PIN_BEARING_DEG: f64 = 95.0;
    /// 可視下限（度）。これ未満の垂直角のサンプルは破棄されます。
    pub const VISIBILITY_FLOOR_DEG: f64 = 0.1;
    /// 主要カテゴリのしきい値（度）
    pub const MAIN_THRESHOLD_DEG: f64 = 3.0;
    /// 水平セルの幅（度）
    pub const CELL_WIDTH_DEG: f64 = 10.0;
    /// 描画用垂直角の上限（度）
    pub const RENDER_CAP_DEG: f64 = 40.0;
    /// 正接の特異点判定しきい値
    pub const TANGENT_EPSILON: f64 = 1e-12;
}

/// 数学ユーティリティ関数
pub mod math_utils {
    /// 度をラジアンに変換
    pub fn deg_to_rad(degrees: f64) -> f64 {
        degrees * std::f64::consts::PI / 180.0
    }

    /// ラジアンを度に変換
    pub fn rad_to_deg(radians: f64) -> f64 {
        radians * 180.0 / std::f64::consts::PI
    }

    /// 仰角から観測者と鉄塔列の基線距離を計算
    ///
    /// `baseline = tower_height / tan(elevation_angle)`
    ///
    /// # 引数
    ///
    /// * `tower_height_m` - 鉄塔の高さ（m）
    /// * `elevation_angle_deg` - 仰角（度）
    ///
    /// # 戻り値
    ///
    /// 基線距離（m）。正接が特異（|tan| < 1e-12）の場合はNone（縮退シナリオ）
    pub fn baseline_distance(tower_height_m: f64, elevation_angle_deg: f64) -> Option<f64> {
        let tangent = deg_to_rad(elevation_angle_deg).tan();
        if tangent.abs() < super::sweep_defaults::TANGENT_EPSILON {
            return None;
        }
        Some(tower_height_m / tangent)
    }

    /// 角度を[0, 180]度の範囲にクランプ
    pub fn clamp_bearing(angle_deg: f64) -> f64 {
        angle_deg.clamp(0.0, 180.0)
    }
}
