// 基本的なデータ型と数学ユーティリティ
pub mod common;

// 評価パイプラインの各段の実装
pub mod sampler;
pub mod aggregate;
pub mod classify;

// 便利な re-export
pub use common::*;
pub use sampler::{SampleIter, TowerSample, TowerSweep};
pub use aggregate::{
    aggregate_sweep, AggregateOutput, AggregateResult, AggregationPolicy, Magnitude, RenderSample,
};
pub use classify::{
    classify_magnitude, triggers_intermediate_assessment, SeverityBand,
    INTERMEDIATE_TRIGGER_THRESHOLD,
};
