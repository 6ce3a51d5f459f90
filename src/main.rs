use clap::Parser;
use item_thumb_common::{extract_job_code, normalize_item_name};
use item_thumb_rust::batch::{BatchProcessor, BatchReport};
use item_thumb_rust::cli::{Cli, Commands};
use item_thumb_rust::config::Config;
use item_thumb_rust::error::{ItemThumbError, Result};
use item_thumb_rust::watcher::{IntervalTicker, Outcome, Watcher};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Watch { run, interval, max_cycles } => {
            println!("👀 item-thumb - フォルダ監視\n");

            let config = run.apply(&config);
            config.ensure_dirs()?;
            let processor = BatchProcessor::from_config(&config, run.offline)?;
            let watcher = Watcher::new(config.watch_dir.clone(), processor);

            let interval = interval
                .map(std::time::Duration::from_secs)
                .unwrap_or_else(|| config.poll_interval());
            let mut ticker = IntervalTicker::new(interval);
            if let Some(cycles) = max_cycles {
                ticker = ticker.with_max_cycles(cycles);
            }

            println!("- 監視フォルダ: {}", watcher.watch_dir().display());
            println!("- 出力先: {}", config.output_root.display());
            println!("- 間隔: {}秒\n", interval.as_secs());

            let summary = watcher.run(&mut ticker);
            println!(
                "\n✅ 監視終了 (サイクル: {}, 処理: {}, 失敗: {})",
                summary.cycles, summary.processed, summary.failed
            );
        }

        Commands::Once { run } => {
            println!("🔍 item-thumb - 1回処理\n");

            let config = run.apply(&config);
            config.ensure_dirs()?;
            let processor = BatchProcessor::from_config(&config, run.offline)?;
            let watcher = Watcher::new(config.watch_dir.clone(), processor);

            match watcher.process_once()? {
                Outcome::Idle => println!("処理対象のファイルがありません: {}", watcher.watch_dir().display()),
                Outcome::Processed { source, report, source_removed } => {
                    print_report(&report);
                    if source_removed {
                        println!("✔ 元ファイルを削除: {}", source.display());
                    }
                }
                Outcome::Failed { error, .. } => return Err(error),
            }
        }

        Commands::Process { file, code, run } => {
            println!("📦 item-thumb - 在庫表処理\n");

            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let code = match code {
                Some(c) => c,
                None => extract_job_code(&file_name)
                    .ok_or_else(|| ItemThumbError::InvalidJobCode(file_name.clone()))?,
            };

            let config = run.apply(&config);
            let processor = BatchProcessor::from_config(&config, run.offline)?;

            println!("- ファイル: {} (コード: {})", file.display(), code);
            let report = processor.process(&file, &code)?;
            print_report(&report);
        }

        Commands::Normalize { names } => {
            for name in names {
                println!("{} → {}", name, normalize_item_name(&name));
            }
        }

        Commands::Config { set_watch_dir, set_output_root, set_budget_kb, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(dir) = set_watch_dir {
                config.watch_dir = dir;
                changed = true;
            }
            if let Some(dir) = set_output_root {
                config.output_root = dir;
                changed = true;
            }
            if let Some(budget) = set_budget_kb {
                config.size_budget_kb = budget;
                changed = true;
            }

            if changed {
                config.save()?;
                println!("✔ 設定を保存しました: {}", Config::config_path()?.display());
            }

            if show || !changed {
                println!("設定:");
                println!("  監視フォルダ: {}", config.watch_dir.display());
                println!("  出力先: {}", config.output_root.display());
                println!("  ポーリング間隔: {}秒", config.poll_interval_seconds);
                println!("  シート: {}", config.sheet_index + 1);
                println!("  サイズ上限: {}KB", config.size_budget_kb);
                println!("  画像形式: {}", config.thumbnail_format);
                println!("  検索タイムアウト: {}秒", config.search_timeout_seconds);
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn print_report(report: &BatchReport) {
    println!("✔ スプレッドシート: {}", report.spreadsheet.display());
    println!("✔ レコード: {}件 / 部門: {}件", report.records, report.departments);
    println!(
        "✔ 部門画像: 取得 {} / プレースホルダ {} / スキップ {}",
        report.department_images.real, report.department_images.placeholder, report.department_images.failed
    );
    println!(
        "✔ 商品画像: 取得 {} / プレースホルダ {} / スキップ {}",
        report.item_images.real, report.item_images.placeholder, report.item_images.failed
    );
    println!("\n✅ 完了 ({})", report.finished_at.format("%Y-%m-%d %H:%M:%S"));
}
