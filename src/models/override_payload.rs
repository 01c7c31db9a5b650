//! 本地英雄覆盖数据
//!
//! 英雄名 → 属性记录。属性记录中可识别的是布尔标记和 `icon`，
//! 其余键原样保留，序列化时透传。

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

const ICON_KEY: &str = "icon";

/// 评分服务识别的属性键（与题目 key 一一对应）
pub const ATTRIBUTE_KEYS: [&str; 15] = [
    "heavy_ad",
    "heavy_ap",
    "need_engage",
    "need_cc",
    "frontline",
    "peeling",
    "invade",
    "scaling",
    "early_game",
    "ally_melee",
    "hp_tanks",
    "aa_heavy",
    "enchanter_adc",
    "lock_target",
    "range_heavy",
];

/// 单个英雄的属性记录
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ChampionAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// 布尔标记以及其它未知字段
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ChampionAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取布尔标记，缺失或非布尔视为 false
    pub fn flag(&self, key: &str) -> bool {
        self.fields.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// 写入布尔标记；`icon` 不是标记，忽略
    pub fn set_flag(&mut self, key: impl Into<String>, value: bool) {
        let key = key.into();
        if key == ICON_KEY {
            warn!("⚠️ icon 不能作为布尔标记写入，已忽略");
            return;
        }
        self.fields.insert(key, Value::Bool(value));
    }

    /// 所有为 true 的标记
    pub fn active_flags(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(_, v)| v.as_bool() == Some(true))
            .map(|(k, _)| k.as_str())
            .collect()
    }
}

impl From<Map<String, Value>> for ChampionAttributes {
    fn from(mut fields: Map<String, Value>) -> Self {
        // 非字符串的 icon 不认，留在 fields 里透传
        let icon = match fields.remove(ICON_KEY) {
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                fields.insert(ICON_KEY.to_string(), other);
                None
            }
            None => None,
        };
        Self { icon, fields }
    }
}

/// 覆盖数据：英雄名 → 属性记录
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct OverridePayload {
    champions: BTreeMap<String, ChampionAttributes>,
}

impl OverridePayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.champions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.champions.len()
    }

    pub fn get(&self, name: &str) -> Option<&ChampionAttributes> {
        self.champions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.champions.contains_key(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, attributes: ChampionAttributes) {
        self.champions.insert(name.into(), attributes);
    }

    pub fn remove(&mut self, name: &str) -> Option<ChampionAttributes> {
        self.champions.remove(name)
    }

    /// 按名称排序的英雄列表
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.champions.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChampionAttributes)> {
        self.champions.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<BTreeMap<String, Value>> for OverridePayload {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let champions = raw
            .into_iter()
            .filter_map(|(name, meta)| match meta {
                Value::Object(map) => Some((name, ChampionAttributes::from(map))),
                _ => None,
            })
            .collect();
        Self { champions }
    }
}

impl Serialize for OverridePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.champions.serialize(serializer)
    }
}
