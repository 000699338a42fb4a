//! 当前文献的筛选面板：标题、摘要、规则勾选与备注

use crate::core::models::{Article, CitationSummary};
use crate::ui::styles::Theme;
use eframe::egui::{self, RichText, Ui};

/// 筛选面板
#[derive(Default)]
pub struct ArticlePanel {
    /// 是否展开备注输入
    show_comments: bool,
}

impl ArticlePanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// 渲染筛选清单
    pub fn render(
        &mut self,
        ui: &mut Ui,
        theme: &Theme,
        article: &Article,
        summary: Option<&CitationSummary>,
    ) -> ArticlePanelAction {
        let mut action = ArticlePanelAction::None;

        ui.heading("正在筛选");

        let (title, abstract_text) = summary
            .map(|s| (s.title.as_str(), s.abstract_text.as_str()))
            .unwrap_or(("", ""));

        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("标题:").strong());
            ui.label(if title.is_empty() { "（无标题）" } else { title });
        });
        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new("摘要:").strong());
            ui.label(if abstract_text.is_empty() { "（无摘要）" } else { abstract_text });
        });

        ui.separator();

        ui.horizontal(|ui| {
            ui.label(RichText::new("筛选清单").strong());
            ui.label(
                RichText::new(format!("{}/{}", article.passed_count(), article.screens.len()))
                    .color(theme.screening_color(article.passed_count(), article.screens.len())),
            );
            ui.checkbox(&mut self.show_comments, "显示备注");
        });

        for (index, result) in article.screens.iter().enumerate() {
            ui.horizontal(|ui| {
                let mut passed = result.passed;
                if ui.checkbox(&mut passed, result.rule.as_str()).changed() {
                    action = ArticlePanelAction::SetScreen(index, passed);
                }
            });

            if self.show_comments {
                ui.indent(("screen_comment", index), |ui| {
                    let mut comment = result.comment.clone().unwrap_or_default();
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut comment)
                            .hint_text("备注")
                            .desired_width(400.0),
                    );
                    if response.changed() {
                        action = ArticlePanelAction::SetComment(index, comment);
                    }
                });
            }
        }

        action
    }
}

/// 筛选面板操作
#[derive(Debug, PartialEq)]
pub enum ArticlePanelAction {
    None,
    SetScreen(usize, bool),
    SetComment(usize, String),
}
