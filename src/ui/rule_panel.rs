//! 规则定义面板

use crate::core::ruleset::Ruleset;
use eframe::egui::{self, RichText, Ui};

/// 规则面板
#[derive(Default)]
pub struct RulePanel {
    /// 选中的规则序号
    selected: Option<usize>,
}

impl RulePanel {
    /// 创建新的规则面板
    pub fn new() -> Self {
        Self::default()
    }

    /// 渲染规则面板
    pub fn render(&mut self, ui: &mut Ui, ruleset: &Ruleset) -> RulePanelAction {
        let mut action = RulePanelAction::None;

        ui.horizontal(|ui| {
            ui.heading("📋 定义筛选规则");
            ui.separator();
            if ui.button("📂 导入规则...").clicked() {
                action = RulePanelAction::ImportRules;
            }
        });

        ui.separator();

        // 规则列表
        egui::ScrollArea::vertical()
            .max_height(400.0)
            .show(ui, |ui| {
                for (index, rule) in ruleset.rules().iter().enumerate() {
                    let is_selected = self.selected == Some(index);
                    let blank = rule.trim().is_empty();

                    egui::Frame::none()
                        .fill(if is_selected {
                            egui::Color32::from_rgba_unmultiplied(66, 133, 244, 30)
                        } else {
                            egui::Color32::TRANSPARENT
                        })
                        .inner_margin(egui::Margin::symmetric(8.0, 4.0))
                        .show(ui, |ui| {
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(format!("{}.", index + 1))
                                        .color(egui::Color32::GRAY),
                                );

                                let mut text = rule.clone();
                                let response = ui.add(
                                    egui::TextEdit::singleline(&mut text)
                                        .hint_text("请输入规则...")
                                        .desired_width(480.0),
                                );
                                if response.gained_focus() {
                                    self.selected = Some(index);
                                }
                                if response.changed() {
                                    action = RulePanelAction::Edit(index, text);
                                }

                                if blank {
                                    ui.label(
                                        RichText::new("⚠ 空规则")
                                            .small()
                                            .color(egui::Color32::YELLOW),
                                    );
                                }

                                let layout = egui::Layout::right_to_left(egui::Align::Center);
                                ui.with_layout(layout, |ui| {
                                    if ui.button("🗑️ 删除").clicked() {
                                        action = RulePanelAction::Delete(index);
                                        self.selected = None;
                                    }
                                });
                            });
                        });
                }
            });

        if ui.button("➕ 添加规则").clicked() {
            action = RulePanelAction::AddBlank;
        }

        ui.separator();

        // 开始筛选按钮仅在规则集合法时可用
        let validation = ruleset.validate();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(validation.is_ok(), egui::Button::new("🚀 开始筛选"))
                .clicked()
            {
                action = RulePanelAction::Start;
            }
            if let Err(e) = &validation {
                ui.label(RichText::new(e.to_string()).small().color(egui::Color32::GRAY));
            }
        });

        action
    }
}

/// 规则面板操作
#[derive(Debug, PartialEq)]
pub enum RulePanelAction {
    None,
    Edit(usize, String),
    Delete(usize),
    AddBlank,
    ImportRules,
    Start,
}
