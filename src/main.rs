mod assessment;
mod logging;
mod models;
mod scenario;

use clap::{Arg, Command};
use assessment::AssessmentEngine;
use logging::{init_logging, parse_log_level, LogConfig, LogOutput};
use scenario::ScenarioConfig;

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("towerscan")
        .version("0.1.0")
        .about("鉄塔景観評価 (Tower Sightline Assessment)")
        .long_about("等間隔に並ぶ送電鉄塔列を固定観測点から見たとき、\n\
                     水平視野のどの程度が鉄塔に占有されるかを推定し、\n\
                     5段階の視覚的影響度に分類します。")
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定")
                .long_help("実行するシナリオファイル(.yaml)のパスを指定します。\n\
                           指定しない場合、--height/--span/--angleによる\n\
                           直接指定で実行できます。")
        )
        .arg(
            Arg::new("height")
                .short('H')
                .long("height")
                .value_name("METERS")
                .value_parser(clap::value_parser!(f64))
                .help("鉄塔の高さ(m)を直接指定 [既定値: 50]")
                .conflicts_with("scenario")
        )
        .arg(
            Arg::new("span")
                .long("span")
                .value_name("METERS")
                .value_parser(clap::value_parser!(f64))
                .help("鉄塔間隔(m)を直接指定 [既定値: 100]")
                .conflicts_with("scenario")
        )
        .arg(
            Arg::new("angle")
                .short('a')
                .long("angle")
                .value_name("DEGREES")
                .value_parser(clap::value_parser!(f64))
                .help("仰角(度)を直接指定 [既定値: 5]")
                .conflicts_with("scenario")
        )
        .arg(
            Arg::new("policy")
                .short('p')
                .long("policy")
                .value_name("POLICY")
                .help("集約ポリシー (cells: セル占有, sums: 角度総和) [既定値: cells]")
                .conflicts_with("scenario")
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了")
                .conflicts_with("test")
        )
        .arg(
            Arg::new("test")
                .short('t')
                .long("test")
                .action(clap::ArgAction::SetTrue)
                .help("評価パイプラインのテストを実行")
                .conflicts_with("info")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: 基本, -vv: 詳細, -vvv: サンプル単位)")
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("DEST")
                .help("ログ出力先 (console, file, both) [既定値: console]")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .help("ログレベル (trace, debug, info, warn, error) [既定値: info]")
        )
        .get_matches();

    println!("鉄塔景観評価 (Tower Sightline Assessment) - towerscan v0.1.0");
    println!();

    // ログシステムの初期化
    let mut log_config = LogConfig::default();
    if let Some(output) = matches.get_one::<String>("log-output") {
        match output.parse::<LogOutput>() {
            Ok(parsed) => log_config.output = parsed,
            Err(e) => eprintln!("警告: {}", e),
        }
    }
    if let Some(level) = matches.get_one::<String>("log-level") {
        log_config.level = parse_log_level(level);
    }
    if let Err(e) = init_logging(log_config) {
        eprintln!("警告: ログ初期化に失敗しました: {}", e);
    }

    // 詳細レベルの設定
    let verbose_level = matches.get_count("verbose");
    if verbose_level > 0 {
        println!("詳細出力レベル: {}", verbose_level);
    }

    // テストモードの実行
    if matches.get_flag("test") {
        println!("=== 評価パイプラインテストモード ===");
        if let Err(e) = run_pipeline_test() {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // シナリオファイルの処理
    if let Some(scenario_path) = matches.get_one::<String>("scenario") {
        match run_scenario(scenario_path, matches.get_flag("info"), verbose_level) {
            Ok(_) => {
                if verbose_level > 0 {
                    println!("シナリオ実行が正常に完了しました。");
                }
            }
            Err(e) => {
                eprintln!("エラー: {}", e);
                std::process::exit(1);
            }
        }
    } else if matches.contains_id("height")
        || matches.contains_id("span")
        || matches.contains_id("angle")
        || matches.contains_id("policy")
    {
        // スカラー直接指定での実行
        let height = matches.get_one::<f64>("height").copied().unwrap_or(50.0);
        let span = matches.get_one::<f64>("span").copied().unwrap_or(100.0);
        let angle = matches.get_one::<f64>("angle").copied().unwrap_or(5.0);
        let policy = matches
            .get_one::<String>("policy")
            .map(String::as_str)
            .unwrap_or("cells");

        match run_adhoc(height, span, angle, policy, matches.get_flag("info"), verbose_level) {
            Ok(_) => {}
            Err(e) => {
                eprintln!("エラー: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        // デフォルト動作: 使用方法を表示
        show_default_help();
    }
}

/// パイプラインの動作確認
///
/// 基準シナリオ（高さ50m、間隔100m、仰角5度）を両方の集約ポリシーで
/// 実行し、結果を表示します。
fn run_pipeline_test() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== 評価パイプラインのテスト ===");

    for policy in ["cells", "sums"] {
        println!("\n--- ポリシー: {} ---", policy);
        let config = ScenarioConfig::from_scalars(50.0, 100.0, 5.0, policy)?;
        let engine = AssessmentEngine::new(config, 0);
        engine.run()?;
    }

    println!("\n評価パイプラインが正常に動作しました！");
    Ok(())
}

/// シナリオファイルを読み込んで実行
fn run_scenario(scenario_path: &str, info_only: bool, verbose_level: u8) -> Result<(), Box<dyn std::error::Error>> {
    // シナリオファイルの読み込み
    let scenario = ScenarioConfig::from_file(scenario_path)?;

    if verbose_level > 0 {
        println!("シナリオファイル読み込み完了: {}", scenario_path);
    }

    // 情報表示のみの場合
    if info_only {
        scenario.print_summary();
        return Ok(());
    }

    execute_scenario(scenario, verbose_level)?;

    Ok(())
}

/// スカラー直接指定での実行
fn run_adhoc(
    height_m: f64,
    span_m: f64,
    angle_deg: f64,
    policy: &str,
    info_only: bool,
    verbose_level: u8,
) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = ScenarioConfig::from_scalars(height_m, span_m, angle_deg, policy)?;

    if info_only {
        scenario.print_summary();
        return Ok(());
    }

    execute_scenario(scenario, verbose_level)?;

    Ok(())
}

/// シナリオの実行
fn execute_scenario(scenario: ScenarioConfig, verbose_level: u8) -> Result<(), Box<dyn std::error::Error>> {
    // 基本情報表示
    scenario.print_summary();
    println!();

    // 評価エンジンの作成と実行
    let engine = AssessmentEngine::new(scenario, verbose_level);
    engine.run()?;

    Ok(())
}

/// デフォルトヘルプとシナリオ一覧を表示
fn show_default_help() {
    println!("使用方法:");
    println!("  towerscan [オプション]");
    println!();
    println!("オプション:");
    println!("  -s, --scenario <FILE>  シナリオファイルを指定して実行");
    println!("  -H, --height <M>       鉄塔の高さを直接指定");
    println!("      --span <M>         鉄塔間隔を直接指定");
    println!("  -a, --angle <DEG>      仰角を直接指定");
    println!("  -p, --policy <POLICY>  集約ポリシー (cells, sums)");
    println!("  -i, --info             シナリオ情報のみ表示");
    println!("  -t, --test             評価パイプラインのテスト実行");
    println!("  -v, --verbose          詳細出力 (複数指定で詳細レベル上昇)");
    println!("  -h, --help             このヘルプを表示");
    println!();
    println!("利用可能なシナリオファイル:");
    println!("  scenarios/scenario_basic.yaml      - 基準シナリオ (50m/100m/5度)");
    println!("  scenarios/scenario_summation.yaml  - 角度総和ポリシー");
    println!("  scenarios/scenario_dense_row.yaml  - 密な鉄塔列 (80m/50m/10度)");
    println!();
    println!("例:");
    println!("  towerscan -s scenarios/scenario_basic.yaml");
    println!("  towerscan --height 50 --span 100 --angle 5");
    println!("  towerscan --height 80 --span 50 --angle 10 -p sums -v");
    println!("  towerscan --test");
}
