//! src/main.rs
//!
//! 程序的主入口。
//! 初始化日志，把 ./input 下的所有 JSON 文件转换为游戏数据格式写入 ./output，
//! 最后打印汇总；任何文件转换失败时以非零状态退出。

use std::process::ExitCode;
use std::time::Instant;

mod config;
mod converter;
mod error;
mod models;
mod utils;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let start_time = Instant::now();
    let app_config = config::AppConfig::default();

    let summary = match converter::convert_input_files(&app_config) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("无法读取输入目录: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log::info!(
        "完成：{} 个文件，转换 {} 条记录，跳过 {} 条，失败文件 {} 个，耗时 {:.2?}",
        summary.files_converted,
        summary.records_converted,
        summary.records_skipped,
        summary.failed_files.len(),
        start_time.elapsed()
    );

    for (path, e) in &summary.failed_files {
        log::error!("  {}: {}", path.display(), e);
    }

    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
