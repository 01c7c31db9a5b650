//! 终端视图
//!
//! `ResultView` 的终端实现：把渲染模型打印为文本

use std::sync::atomic::{AtomicBool, Ordering};

use crate::services::{RenderModel, ResultView};

const PLACEHOLDER_TEXT: &str = "开始答题后这里会出现第一批推荐";
const NO_RESULTS_TEXT: &str = "没有符合这些回答的英雄，换几个答案再试试";

pub struct ConsoleView {
    preview_visible: AtomicBool,
}

impl ConsoleView {
    pub fn new() -> Self {
        Self {
            preview_visible: AtomicBool::new(false),
        }
    }

    /// 切换预览可见性，返回切换后的状态
    pub fn toggle_preview(&self) -> bool {
        !self.preview_visible.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn preview_visible(&self) -> bool {
        self.preview_visible.load(Ordering::SeqCst)
    }
}

impl Default for ConsoleView {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultView for ConsoleView {
    fn show_preview(&self, model: &RenderModel) {
        if !self.preview_visible() {
            return;
        }
        println!("── 实时预览 ──");
        for line in format_model(model, false) {
            println!("{}", line);
        }
    }

    fn show_results(&self, model: &RenderModel) {
        println!("{}", "=".repeat(60));
        println!("🏆 推荐结果");
        for line in format_model(model, true) {
            println!("{}", line);
        }
        println!("{}", "=".repeat(60));
    }
}

/// 渲染模型转为文本行
pub fn format_model(model: &RenderModel, with_reasons: bool) -> Vec<String> {
    match model {
        RenderModel::Placeholder => vec![PLACEHOLDER_TEXT.to_string()],
        RenderModel::NoResults => vec![NO_RESULTS_TEXT.to_string()],
        RenderModel::Cards(cards) => cards
            .iter()
            .enumerate()
            .map(|(i, card)| {
                let mut line = format!("{:>2}. {} {}", i + 1, card.champion, card.score_label);
                if with_reasons && !card.reasons.is_empty() {
                    let tags: Vec<String> = card
                        .reasons
                        .iter()
                        .map(|r| format!("{}(w{})", r.label, r.weight))
                        .collect();
                    line.push_str(&format!("  [{}]", tags.join(", ")));
                }
                line.push_str(&format!("  <{}>", card.icon_url));
                line
            })
            .collect(),
    }
}
