//! src/converter.rs
//!
//! 文件转换流程：扫描输入目录，逐个文件解析、分类、转换记录，
//! 并把结果写入输出目录中的同名文件。
//! 单条记录出错只会跳过该记录；单个文件出错只会跳过该文件。

use crate::config::{AppConfig, INPUT_EXTENSION, MOD_ID_KEY, MOD_ID_PLACEHOLDER};
use crate::error::{ConvertError, DecodeError};
use crate::models::RecordKind;
use crate::utils::{as_display_text, as_object};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// 一个输入文件的转换结果。
#[derive(Debug, Default)]
pub struct FileOutput {
    /// 解析后的记录 ID -> 目标格式字符串，保持输入顺序。
    pub records: Map<String, Value>,
    /// 被跳过的记录（原始键, 原因）。
    pub skipped: Vec<(String, DecodeError)>,
}

/// 一次完整运行的汇总。
#[derive(Debug, Default)]
pub struct RunSummary {
    pub files_converted: usize,
    pub records_converted: usize,
    pub records_skipped: usize,
    pub failed_files: Vec<(PathBuf, ConvertError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed_files.is_empty()
    }
}

/// 顶层函数：转换输入目录下的全部 JSON 文件。
/// 文件级错误会被记录下来，继续处理下一个文件。
pub fn convert_input_files(config: &AppConfig) -> Result<RunSummary, ConvertError> {
    let mut summary = RunSummary::default();

    for file in discover_input_files(&config.input_dir)? {
        match convert_input_file(&file, config) {
            Ok(output) => {
                summary.files_converted += 1;
                summary.records_converted += output.records.len();
                summary.records_skipped += output.skipped.len();
            }
            Err(e) => {
                log::error!("转换 {} 失败: {}", file.display(), e);
                summary.failed_files.push((file, e));
            }
        }
    }

    Ok(summary)
}

/// 列出目录中（不递归）所有 .json 文件，按文件名排序。
/// 目录不存在时返回空列表。
pub fn discover_input_files(input_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    if !input_dir.is_dir() {
        log::warn!("输入目录 {} 不存在，没有需要转换的文件", input_dir.display());
        return Ok(Vec::new());
    }

    let entries = fs::read_dir(input_dir).map_err(|e| ConvertError::io(input_dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ConvertError::io(input_dir, e))?.path();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext == INPUT_EXTENSION);
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// 转换单个文件并写出结果。任何错误发生时都不会产生输出文件。
pub fn convert_input_file(file: &Path, config: &AppConfig) -> Result<FileOutput, ConvertError> {
    let contents = fs::read_to_string(file).map_err(|e| ConvertError::io(file, e))?;
    let output = convert_file_contents(file, &contents)?;

    fs::create_dir_all(&config.output_dir).map_err(|e| ConvertError::io(&config.output_dir, e))?;
    let output_path = config
        .output_path_for(file)
        .ok_or_else(|| ConvertError::io(file, std::io::Error::other("输入路径没有文件名")))?;

    let serialized = serde_json::to_string_pretty(&output.records)
        .map_err(|e| ConvertError::json(&output_path, e))?;
    fs::write(&output_path, serialized).map_err(|e| ConvertError::io(&output_path, e))?;

    log::info!(
        "{} -> {}: 转换 {} 条，跳过 {} 条",
        file.display(),
        output_path.display(),
        output.records.len(),
        output.skipped.len()
    );
    Ok(output)
}

/// 解析并转换一个文件的内容，不涉及任何文件系统操作。
/// `source` 只用于错误信息。
pub fn convert_file_contents(source: &Path, contents: &str) -> Result<FileOutput, ConvertError> {
    let data: Value = serde_json::from_str(contents).map_err(|e| ConvertError::json(source, e))?;
    let Value::Object(data) = data else {
        return Err(ConvertError::NotAnObject {
            path: source.to_path_buf(),
        });
    };

    let mod_id = read_mod_id(&data);
    let mut output = FileOutput::default();

    for (unique_id, raw_fields) in &data {
        if unique_id == MOD_ID_KEY {
            continue;
        }

        let parsed_id = resolve_id(unique_id, &mod_id);
        match convert_record(&parsed_id, raw_fields) {
            Ok(converted) => {
                if output.records.insert(parsed_id.clone(), Value::String(converted)).is_some() {
                    log::warn!("{unique_id} 解析后的 ID {parsed_id} 重复，保留最后一条");
                }
            }
            Err(e) => {
                match &e {
                    DecodeError::MissingField(_) => log::warn!("{unique_id} 缺少必需的值: {e}"),
                    _ => log::warn!("{unique_id} 的值类型或取值不正确: {e}"),
                }
                output.skipped.push((unique_id.clone(), e));
            }
        }
    }

    Ok(output)
}

fn convert_record(id: &str, raw_fields: &Value) -> Result<String, DecodeError> {
    let fields = as_object(raw_fields, id)?;
    let kind = RecordKind::classify(fields);
    let record = kind.build(id, fields)?;
    let converted = record.convert();
    log::debug!("{} {} ({}): {}", kind, record.id(), record.name(), converted);
    Ok(converted)
}

/// 读取文件声明的 Mod ID，缺失时使用占位符本身。
/// 非字符串的值使用其 JSON 文本。
fn read_mod_id(data: &Map<String, Value>) -> String {
    match data.get(MOD_ID_KEY) {
        None | Some(Value::Null) => MOD_ID_PLACEHOLDER.to_string(),
        Some(value) => as_display_text(value),
    }
}

/// 把记录键中的每个占位符替换成 Mod ID。
pub fn resolve_id(raw_id: &str, mod_id: &str) -> String {
    raw_id.replace(MOD_ID_PLACEHOLDER, mod_id)
}
