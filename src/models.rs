//! src/models.rs
//!
//! 定义了两种可转换的记录：鱼（Fish）和蟹笼捕获物（Trap），
//! 以及把它们拼接成 `Data/Fish` 格式字符串的逻辑。
//! 所有校验都在构造阶段完成，构造成功后 `convert` 不会失败。

use crate::error::DecodeError;
use crate::utils::{self, as_array, as_object, require};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// 全季节可用的标记，目标格式的固定片段。
const ALL_SEASONS: &str = "spring summer fall winter";
/// 旧版"渔获重量"占位，游戏不再使用但必须保留。
const FISH_CATCH_WEIGHTS: &str = "690 .4 685 .1";
/// 蟹笼条目的固定片段。
const TRAP_CATCH_WEIGHTS: &str = "684 .45";

/// 闭区间 (min, max)，用于尺寸和时间段。不校验 min <= max。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumRange {
    pub min: i64,
    pub max: i64,
}

impl NumRange {
    /// 从 `{ "Min": .., "Max": .. }` 对象解析。`path` 用于错误信息中的字段路径。
    pub fn from_json(value: &Value, path: &str) -> Result<Self, DecodeError> {
        let raw: RawRange = from_raw(value, path)?;
        Ok(Self {
            min: utils::integer_field(raw.min.as_ref(), &format!("{path}.Min"))?,
            max: utils::integer_field(raw.max.as_ref(), &format!("{path}.Max"))?,
        })
    }
}

/// 输入文件中的原始字段。所有字段都保留为 JSON 值，
/// 类型转换和缺失检查在构造记录时进行，以便给出具体的字段路径。
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawRange {
    min: Option<Value>,
    max: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawFish {
    name: Option<Value>,
    size: Option<Value>,
    time_ranges: Option<Value>,
    chance_to_dart: Option<Value>,
    darting_randomness: Option<Value>,
    weather: Option<Value>,
    max_depth: Option<Value>,
    spawn_multiplier: Option<Value>,
    depth_multiplier: Option<Value>,
    fishing_level: Option<Value>,
    tutorial_catch: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawTrap {
    name: Option<Value>,
    size: Option<Value>,
    chance: Option<Value>,
    water_type: Option<Value>,
}

/// 把一个 JSON 对象读入原始字段结构。非对象值是类型错误。
fn from_raw<T: for<'de> Deserialize<'de>>(value: &Value, path: &str) -> Result<T, DecodeError> {
    as_object(value, path)?;
    serde_json::from_value(value.clone()).map_err(|_| DecodeError::wrong_type(path, "object", value))
}

/// 为字符串枚举生成 `as_str`、`parse` 和 `Display`。
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident, $field:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const FIELD: &'static str = $field;
            pub const ALLOWED: &'static [&'static str] = &[$($text),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            pub fn parse(value: &str) -> Result<Self, DecodeError> {
                match value {
                    $($text => Ok(Self::$variant),)+
                    other => Err(DecodeError::InvalidEnum {
                        field: Self::FIELD,
                        value: other.to_string(),
                        allowed: Self::ALLOWED,
                    }),
                }
            }

            fn from_value(value: Option<&Value>) -> Result<Self, DecodeError> {
                Self::parse(utils::text_field(value, Self::FIELD)?)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// 鱼在钓鱼小游戏中的移动方式。
    DartingRandomness, "DartingRandomness", {
        Mixed => "mixed",
        Smooth => "smooth",
        Floater => "floater",
        Sinker => "sinker",
        Dart => "dart",
    }
);

string_enum!(Weather, "Weather", {
    Sunny => "sunny",
    Rainy => "rainy",
    Both => "both",
});

string_enum!(
    /// 蟹笼的水域类型。
    WaterType, "WaterType", {
        Freshwater => "freshwater",
        Ocean => "ocean",
    }
);

/// 两种记录共有的部分：ID、显示名称和尺寸范围。
#[derive(Debug, Clone, PartialEq)]
pub struct RecordBase {
    pub id: String,
    pub name: String,
    pub size: NumRange,
}

impl RecordBase {
    pub fn new(id: impl Into<String>, name: impl Into<String>, size: NumRange) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size,
        }
    }

    fn from_raw(id: &str, name: Option<&Value>, size: Option<&Value>) -> Result<Self, DecodeError> {
        let size = NumRange::from_json(require(size, "Size")?, "Size")?;
        let name = utils::display_field(name, "Name")?;
        Ok(Self::new(id, name, size))
    }
}

/// 任何可以转换成目标格式字符串的记录。
pub trait CatchRecord {
    fn base(&self) -> &RecordBase;

    /// 生成目标格式字符串。纯函数，不会失败。
    fn convert(&self) -> String;

    fn id(&self) -> &str {
        &self.base().id
    }

    fn name(&self) -> &str {
        &self.base().name
    }
}

/// 鱼塘/水域中主动钓起的鱼。
#[derive(Debug, Clone, PartialEq)]
pub struct FishRecord {
    pub base: RecordBase,
    pub chance_to_dart: i64,
    pub darting_randomness: DartingRandomness,
    pub time_ranges: Vec<NumRange>,
    pub weather: Weather,
    pub max_depth: i64,
    pub spawn_multiplier: f64,
    pub depth_multiplier: f64,
    pub fishing_level: i64,
    pub tutorial_catch: bool,
}

impl FishRecord {
    /// 从原始字段构造，字段缺失、类型错误或枚举值非法都会返回错误。
    pub fn from_json(id: &str, fields: &Map<String, Value>) -> Result<Self, DecodeError> {
        let raw: RawFish = from_raw(&Value::Object(fields.clone()), id)?;
        let base = RecordBase::from_raw(id, raw.name.as_ref(), raw.size.as_ref())?;

        let time_ranges = as_array(require(raw.time_ranges.as_ref(), "TimeRanges")?, "TimeRanges")?
            .iter()
            .enumerate()
            .map(|(i, range)| NumRange::from_json(range, &format!("TimeRanges[{i}]")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            base,
            chance_to_dart: utils::integer_field(raw.chance_to_dart.as_ref(), "ChanceToDart")?,
            darting_randomness: DartingRandomness::from_value(raw.darting_randomness.as_ref())?,
            time_ranges,
            weather: Weather::from_value(raw.weather.as_ref())?,
            max_depth: utils::integer_field(raw.max_depth.as_ref(), "MaxDepth")?,
            spawn_multiplier: utils::decimal_field(raw.spawn_multiplier.as_ref(), "SpawnMultiplier")?,
            depth_multiplier: utils::decimal_field(raw.depth_multiplier.as_ref(), "DepthMultiplier")?,
            fishing_level: utils::integer_field(raw.fishing_level.as_ref(), "FishingLevel")?,
            tutorial_catch: utils::bool_field(raw.tutorial_catch.as_ref(), "TutorialCatch")?,
        })
    }

    fn time_data(&self) -> String {
        self.time_ranges
            .iter()
            .map(|range| format!("{} {}", range.min, range.max))
            .join(" ")
    }
}

impl CatchRecord for FishRecord {
    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn convert(&self) -> String {
        [
            self.base.name.clone(),
            self.chance_to_dart.to_string(),
            self.darting_randomness.to_string(),
            self.base.size.min.to_string(),
            self.base.size.max.to_string(),
            self.time_data(),
            ALL_SEASONS.to_string(),
            self.weather.to_string(),
            FISH_CATCH_WEIGHTS.to_string(),
            self.max_depth.to_string(),
            utils::format_fraction(self.spawn_multiplier),
            utils::format_fraction(self.depth_multiplier),
            self.fishing_level.to_string(),
            self.tutorial_catch.to_string(),
        ]
        .join("/")
    }
}

/// 蟹笼中的捕获物。
#[derive(Debug, Clone, PartialEq)]
pub struct TrapRecord {
    pub base: RecordBase,
    pub chance: f64,
    pub water_type: WaterType,
}

impl TrapRecord {
    pub fn from_json(id: &str, fields: &Map<String, Value>) -> Result<Self, DecodeError> {
        let raw: RawTrap = from_raw(&Value::Object(fields.clone()), id)?;
        Ok(Self {
            base: RecordBase::from_raw(id, raw.name.as_ref(), raw.size.as_ref())?,
            chance: utils::decimal_field(raw.chance.as_ref(), "Chance")?,
            water_type: WaterType::from_value(raw.water_type.as_ref())?,
        })
    }
}

impl CatchRecord for TrapRecord {
    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn convert(&self) -> String {
        format!(
            "{}/trap/{}/{}/{}/{}/{}/false",
            self.base.name,
            utils::format_fraction(self.chance),
            TRAP_CATCH_WEIGHTS,
            self.water_type,
            self.base.size.min,
            self.base.size.max,
        )
    }
}

/// 记录的种类，由 "Chance" 字段决定。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Fish,
    Trap,
}

impl RecordKind {
    /// "Chance" 缺失或为 null 时视为鱼，否则视为蟹笼捕获物。
    pub fn classify(fields: &Map<String, Value>) -> Self {
        match fields.get("Chance") {
            None | Some(Value::Null) => Self::Fish,
            Some(_) => Self::Trap,
        }
    }

    /// 按种类构造记录。
    pub fn build(self, id: &str, fields: &Map<String, Value>) -> Result<Box<dyn CatchRecord>, DecodeError> {
        let record: Box<dyn CatchRecord> = match self {
            Self::Fish => Box::new(FishRecord::from_json(id, fields)?),
            Self::Trap => Box::new(TrapRecord::from_json(id, fields)?),
        };
        Ok(record)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fish => f.write_str("fish"),
            Self::Trap => f.write_str("trap"),
        }
    }
}
