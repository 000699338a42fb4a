//! 标签树视图
//!
//! 节点按插入顺序纵向排列，子节点缩进显示在父节点下方；
//! 点击节点即把其规范路径加到当前文献上。

use crate::core::models::TagNode;
use crate::core::tag_tree;
use crate::ui::styles::Theme;
use eframe::egui::{self, RichText, Ui};

/// 标签视图
#[derive(Default)]
pub struct TagView {
    /// 新标签输入框
    input: String,
}

impl TagView {
    pub fn new() -> Self {
        Self::default()
    }

    /// 渲染标签树、输入框以及当前文献的标签
    pub fn render(
        &mut self,
        ui: &mut Ui,
        theme: &Theme,
        forest: &[TagNode],
        selected: &[String],
    ) -> TagViewAction {
        let mut action = TagViewAction::None;

        if forest.is_empty() {
            ui.label(RichText::new("（暂无标签）").small().color(theme.secondary));
        } else {
            Self::render_level(ui, forest, &mut Vec::new(), &mut action);
        }

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut self.input)
                    .hint_text("添加标签（层级：A/B/C）")
                    .desired_width(220.0),
            );

            let canonical = tag_tree::join_path(&tag_tree::parse_tag_path(&self.input));
            let can_add = !canonical.is_empty() && !selected.contains(&canonical);
            if ui.add_enabled(can_add, egui::Button::new("添加")).clicked() {
                action = TagViewAction::AddPath(std::mem::take(&mut self.input));
            }
        });

        ui.horizontal_wrapped(|ui| {
            for tag in selected {
                egui::Frame::none()
                    .fill(theme.tag_bg)
                    .rounding(crate::ui::styles::default_rounding())
                    .inner_margin(egui::Margin::symmetric(6.0, 2.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(tag).color(theme.primary));
                            if ui.small_button("✖").clicked() {
                                action = TagViewAction::Remove(tag.clone());
                            }
                        });
                    });
            }
        });

        action
    }

    fn render_level<'a>(
        ui: &mut Ui,
        nodes: &'a [TagNode],
        ancestors: &mut Vec<&'a str>,
        action: &mut TagViewAction,
    ) {
        for node in nodes {
            let canonical = tag_tree::canonical_path(node, ancestors.as_slice());
            if ui
                .button(RichText::new(&node.label).monospace())
                .on_hover_text(canonical.as_str())
                .clicked()
            {
                *action = TagViewAction::Select(canonical.clone());
            }

            if node.has_children() {
                ui.indent(("tag_children", canonical), |ui| {
                    ancestors.push(&node.value);
                    Self::render_level(ui, node.children(), ancestors, action);
                    ancestors.pop();
                });
            }
        }
    }
}

/// 标签视图操作
#[derive(Debug, PartialEq)]
pub enum TagViewAction {
    None,
    /// 选择已有标签（规范路径）
    Select(String),
    /// 按输入添加新标签
    AddPath(String),
    /// 从当前文献移除标签
    Remove(String),
}
