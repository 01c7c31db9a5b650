use serde::{Deserialize, Serialize};

use super::{AnswerSet, OverridePayload};

/// 推荐理由标签
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reason {
    pub label: String,
    pub weight: i64,
    /// 对应的属性键（服务端可能不返回）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

/// 评分服务返回的一条推荐
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub champion: String,
    pub score: f64,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub reasons: Vec<Reason>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// 评分请求体，实时预览和最终评分共用
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoringRequest {
    pub answers: AnswerSet,
    pub max_results: u32,
    /// 为空时不发送：服务端会把出现的 payload 当作完整英雄库
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<OverridePayload>,
}

impl ScoringRequest {
    pub fn new(answers: AnswerSet, max_results: u32, overrides: OverridePayload) -> Self {
        Self {
            answers,
            max_results,
            payload: (!overrides.is_empty()).then_some(overrides),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ChampionAttributes;
    use serde_json::json;

    #[test]
    fn test_item_tolerates_missing_optional_fields() {
        let item: RecommendationItem =
            serde_json::from_value(json!({"champion": "Zac", "score": 3})).unwrap();
        assert_eq!(item.icon, "");
        assert!(item.reasons.is_empty());
        assert_eq!(item.score, 3.0);
    }

    #[test]
    fn test_empty_override_is_omitted() {
        let answers: AnswerSet = [("q1", true)].into_iter().collect();
        let request = ScoringRequest::new(answers, 6, OverridePayload::new());

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, json!({"answers": {"q1": true}, "max_results": 6}));
    }

    #[test]
    fn test_override_is_merged_when_present() {
        let mut overrides = OverridePayload::new();
        let mut attrs = ChampionAttributes::new();
        attrs.set_flag("frontline", true);
        overrides.insert("Sejuani", attrs);

        let request = ScoringRequest::new(AnswerSet::new(), 3, overrides);
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["payload"], json!({"Sejuani": {"frontline": true}}));
    }
}
