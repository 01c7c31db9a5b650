use serde::{Deserialize, Serialize};

/// 问答中的一道是非题
///
/// 题目列表在会话开始时一次性加载，顺序固定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// 题目标识，同时也是答案集合中的键
    pub key: String,
    /// 题干
    pub text: String,
    /// 服务端给出的权重（仅展示用）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

impl Question {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
            weight: None,
        }
    }
}
