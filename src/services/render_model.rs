//! 渲染模型
//!
//! 把评分结果映射为与展示无关的纯数据，交给外部视图层渲染。

use crate::models::RecommendationItem;
use crate::services::icon_resolver::IconResolver;

/// 理由标签
#[derive(Debug, Clone, PartialEq)]
pub struct ReasonTag {
    pub label: String,
    pub weight: i64,
}

/// 英雄卡片
#[derive(Debug, Clone, PartialEq)]
pub struct ChampionCard {
    pub champion: String,
    pub score: f64,
    pub score_label: String,
    pub icon_url: String,
    /// 按权重从高到低
    pub reasons: Vec<ReasonTag>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderModel {
    /// 尚未作答时的占位提示
    Placeholder,
    /// 服务返回空列表
    NoResults,
    /// 按服务端顺序排列的卡片
    Cards(Vec<ChampionCard>),
}

impl RenderModel {
    /// 条目顺序保持服务端返回的顺序，只对每条的理由按权重降序排序
    pub fn from_items(items: &[RecommendationItem], icons: &IconResolver) -> Self {
        if items.is_empty() {
            return RenderModel::NoResults;
        }

        let cards = items
            .iter()
            .map(|item| {
                let mut reasons: Vec<ReasonTag> = item
                    .reasons
                    .iter()
                    .map(|r| ReasonTag {
                        label: r.label.clone(),
                        weight: r.weight,
                    })
                    .collect();
                // 稳定排序，同权重保持原顺序
                reasons.sort_by(|a, b| b.weight.cmp(&a.weight));

                ChampionCard {
                    champion: item.champion.clone(),
                    score: item.score,
                    score_label: format!("+{}", item.score),
                    icon_url: icons.resolve(&item.champion, &item.icon),
                    reasons,
                }
            })
            .collect();

        RenderModel::Cards(cards)
    }

    pub fn cards(&self) -> &[ChampionCard] {
        match self {
            RenderModel::Cards(cards) => cards,
            _ => &[],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, RenderModel::Placeholder)
    }
}

/// 外部视图层
///
/// 核心逻辑只通过这个接口交付渲染模型，不直接操作展示状态
pub trait ResultView: Send + Sync {
    /// 实时预览区域
    fn show_preview(&self, model: &RenderModel);

    /// 最终结果区域
    fn show_results(&self, model: &RenderModel);
}

/// 不做任何展示的视图
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl ResultView for NullView {
    fn show_preview(&self, _model: &RenderModel) {}

    fn show_results(&self, _model: &RenderModel) {}
}
