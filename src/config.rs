//! src/config.rs
//!
//! 程序的运行配置。
//! 转换器没有命令行参数和配置文件，所有路径与保留字段都是固定常量，
//! 这里把它们集中起来，便于测试时替换输入/输出目录。

use std::path::{Path, PathBuf};

/// 默认的输入目录（相对于当前工作目录）。
pub const INPUT_DIR: &str = "./input";
/// 默认的输出目录，不存在时自动创建。
pub const OUTPUT_DIR: &str = "./output";
/// 输入文件中保留的顶层键，用于声明 Mod 的唯一 ID。
pub const MOD_ID_KEY: &str = "ModId";
/// 记录 ID 中的占位符，会被替换成 Mod ID。
pub const MOD_ID_PLACEHOLDER: &str = "{{ModId}}";
/// 只处理带有此扩展名的输入文件。
pub const INPUT_EXTENSION: &str = "json";

/// 供转换流程使用的最终配置。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl AppConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// 某个输入文件对应的输出路径：同名文件，放在输出目录下。
    pub fn output_path_for(&self, input_file: &Path) -> Option<PathBuf> {
        input_file.file_name().map(|name| self.output_dir.join(name))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(INPUT_DIR, OUTPUT_DIR)
    }
}
