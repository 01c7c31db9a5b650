use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 答案集合：题目 key → 是/否
///
/// 每个 key 最多一个值，重复作答覆盖旧值
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<String, bool>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录答案，返回被覆盖的旧值
    pub fn record(&mut self, key: impl Into<String>, value: bool) -> Option<bool> {
        self.0.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.0.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
