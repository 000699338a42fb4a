//! 主应用程序
//!
//! 持有筛选会话，把各面板返回的操作转换为会话变换。

use crate::core::codec;
use crate::core::models::AppConfig;
use crate::core::session::{Phase, ScreeningSession};
use crate::storage::config::ConfigManager;
use crate::storage::dataset_file;
use crate::ui::article_panel::{ArticlePanel, ArticlePanelAction};
use crate::ui::article_table::{ArticleStats, ArticleTable};
use crate::ui::dialogs::{MessageDialog, MessageDialogResult, SettingsDialog, SettingsResult};
use crate::ui::rule_panel::{RulePanel, RulePanelAction};
use crate::ui::styles::{self, Theme};
use crate::ui::tag_view::{TagView, TagViewAction};
use anyhow::Context;
use eframe::egui::{self, RichText};
use std::path::Path;

/// 主应用程序
pub struct ScreenerApp {
    /// 筛选会话
    session: ScreeningSession,
    /// 配置
    config: AppConfig,
    /// 配置管理器
    config_manager: ConfigManager,
    /// 主题
    theme: Theme,
    /// 引文粘贴框
    citation_input: String,
    /// 规则面板
    rule_panel: RulePanel,
    /// 筛选面板
    article_panel: ArticlePanel,
    /// 标签视图
    tag_view: TagView,
    /// 已筛选文献表格
    article_table: ArticleTable,
    /// 消息对话框
    message_dialog: MessageDialog,
    /// 设置对话框
    settings_dialog: SettingsDialog,
    /// 状态消息
    status_message: String,
}

impl ScreenerApp {
    /// 创建新的应用实例
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.style_mut(|style| styles::button_style(&mut style.visuals));

        let config_manager = ConfigManager::new(ConfigManager::default_path());
        let mut message_dialog = MessageDialog::default();
        let config = match config_manager.load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("加载配置失败，使用默认配置: {:#}", e);
                message_dialog.show_error("配置", "配置文件无效，已使用默认配置", &e);
                AppConfig::default()
            }
        };

        Self::with_config(config, config_manager, message_dialog)
    }

    fn with_config(
        config: AppConfig,
        config_manager: ConfigManager,
        message_dialog: MessageDialog,
    ) -> Self {
        Self {
            session: ScreeningSession::new(config.default_rules.clone()),
            config,
            config_manager,
            theme: Theme::default(),
            citation_input: String::new(),
            rule_panel: RulePanel::new(),
            article_panel: ArticlePanel::new(),
            tag_view: TagView::new(),
            article_table: ArticleTable::new(),
            message_dialog,
            settings_dialog: SettingsDialog::default(),
            status_message: "请定义筛选规则".to_string(),
        }
    }

    fn file_dialog(&self) -> rfd::FileDialog {
        let dialog = rfd::FileDialog::new().add_filter("JSON", &["json"]);
        match &self.config.last_directory {
            Some(dir) => dialog.set_directory(dir),
            None => dialog,
        }
    }

    fn remember_directory(&mut self, path: &Path) {
        let Some(parent) = path.parent() else {
            return;
        };
        if self.config.last_directory.as_deref() == Some(parent) {
            return;
        }
        self.config.last_directory = Some(parent.to_path_buf());
        if let Err(e) = self.config_manager.save(&self.config) {
            tracing::warn!("保存默认目录失败: {:#}", e);
        }
    }

    /// 从文件导入规则
    fn import_rules(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };
        self.remember_directory(&path);

        match dataset_file::read_text(&path) {
            Ok(text) => {
                let next = self.session.import_rules(&text);
                self.status_message = if next == self.session {
                    "规则文件格式不符，已忽略".to_string()
                } else if next.phase() == Phase::Screening {
                    format!("已导入 {} 条规则，开始筛选", next.ruleset().len())
                } else {
                    format!("已导入 {} 条规则，请修正空规则", next.ruleset().len())
                };
                self.session = next;
            }
            Err(e) => {
                tracing::error!("读取规则文件失败: {:#}", e);
                self.message_dialog.show_error("导入规则失败", "无法读取规则文件", &e);
            }
        }
    }

    /// 导入数据集
    fn import_dataset(&mut self) {
        let Some(path) = self.file_dialog().pick_file() else {
            return;
        };
        self.remember_directory(&path);

        let imported = dataset_file::read_text(&path).and_then(|text| {
            self.session
                .import_json(&text)
                .with_context(|| format!("数据集文件无效: {}", path.display()))
        });
        match imported {
            Ok(next) => {
                self.session = next;
                self.status_message = format!(
                    "已导入 {} 篇文献",
                    self.session.dataset().articles.len()
                );
            }
            Err(e) => {
                tracing::error!("导入数据集失败: {:#}", e);
                self.message_dialog
                    .show_error("导入失败", "数据集文件无效，当前数据未改变", &e);
            }
        }
    }

    /// 导出数据集
    fn export_dataset(&mut self) {
        let Some(path) = self
            .file_dialog()
            .set_file_name(self.config.export_file_name.as_str())
            .save_file()
        else {
            return;
        };
        self.remember_directory(&path);

        let text = if self.config.pretty_export {
            self.session.export_json()
        } else {
            codec::export_dataset_compact(self.session.dataset())
        };
        let written = text
            .map_err(anyhow::Error::from)
            .and_then(|text| dataset_file::write_text(&path, &text));
        match written {
            Ok(()) => {
                self.status_message = format!("已导出: {}", path.display());
            }
            Err(e) => {
                tracing::error!("导出数据集失败: {:#}", e);
                self.message_dialog.show_error("导出失败", "无法写出数据集文件", &e);
            }
        }
    }

    /// 载入粘贴的引文
    fn load_citation(&mut self) {
        match self.session.load_citation(&self.citation_input) {
            Ok(next) => {
                self.session = next;
                self.citation_input.clear();
                self.status_message = "已载入文献".to_string();
            }
            Err(e) => {
                tracing::warn!("引文无效: {}", e);
                self.message_dialog.show("引文无效", &e.to_string(), "");
            }
        }
    }

    fn save_config(&mut self) {
        match self.config_manager.save(&self.config) {
            Ok(()) => {
                self.status_message =
                    format!("设置已保存: {}", self.config_manager.path().display());
            }
            Err(e) => {
                tracing::error!("保存配置失败: {:#}", e);
                self.message_dialog.show_error("保存失败", "无法写入配置文件", &e);
            }
        }
    }
}

impl eframe::App for ScreenerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // 消息对话框显示期间其余界面不可操作
        let interactive = !self.message_dialog.visible;

        // 顶部菜单栏
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("文件", |ui| {
                        if ui.button("📂 导入数据集...").clicked() {
                            ui.close_menu();
                            self.import_dataset();
                        }
                        if ui.button("💾 导出数据集...").clicked() {
                            ui.close_menu();
                            self.export_dataset();
                        }
                        ui.separator();
                        if ui.button("⚙️ 设置").clicked() {
                            ui.close_menu();
                            self.settings_dialog.open(&self.config);
                        }
                        ui.separator();
                        if ui.button("❌ 退出").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
            });
        });

        // 底部状态栏
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status_message.as_str());

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let stats = ArticleStats::from_articles(&self.session.dataset().articles);
                    ui.label(format!(
                        "文献: {}  全部通过: {}  已打标签: {}",
                        stats.total_articles, stats.all_passed, stats.tagged
                    ));
                });
            });
        });

        // 主内容区域
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| match self.session.phase() {
                Phase::DefineRules => self.render_rules_view(ui),
                Phase::Screening => self.render_screening_view(ui),
            });
        });

        self.render_dialogs(ctx);
    }
}

impl ScreenerApp {
    /// 渲染规则定义视图
    fn render_rules_view(&mut self, ui: &mut egui::Ui) {
        match self.rule_panel.render(ui, self.session.ruleset()) {
            RulePanelAction::Edit(index, text) => {
                self.session = self.session.edit_rules(|r| r.set(index, &text));
            }
            RulePanelAction::Delete(index) => {
                self.session = self.session.edit_rules(|r| r.remove(index));
            }
            RulePanelAction::AddBlank => {
                self.session = self.session.edit_rules(|r| r.push_blank());
            }
            RulePanelAction::ImportRules => self.import_rules(),
            RulePanelAction::Start => match self.session.start_screening() {
                Ok(next) => {
                    self.session = next;
                    self.status_message = "请粘贴 BibTeX 引文".to_string();
                }
                Err(e) => self.status_message = e.to_string(),
            },
            RulePanelAction::None => {}
        }
    }

    /// 渲染筛选视图
    fn render_screening_view(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical().show(ui, |ui| {
            if self.session.draft().is_some() {
                self.render_draft(ui);
            } else {
                self.render_citation_input(ui);
            }

            ui.separator();

            self.article_table
                .render_toolbar(ui, &self.session.dataset().articles);
            ui.separator();
            self.article_table
                .render(ui, &self.theme, &self.session.dataset().articles);
        });
    }

    /// 渲染引文粘贴框
    fn render_citation_input(&mut self, ui: &mut egui::Ui) {
        ui.heading("📄 粘贴 BibTeX 引文");
        ui.add(
            egui::TextEdit::multiline(&mut self.citation_input)
                .hint_text("@article{key, title = {...}, abstract = {...}}")
                .code_editor()
                .desired_width(f32::INFINITY)
                .desired_rows(8),
        );

        let can_load = !self.citation_input.trim().is_empty();
        if ui.add_enabled(can_load, egui::Button::new("▶️ 载入")).clicked() {
            self.load_citation();
        }
    }

    /// 渲染当前草稿
    fn render_draft(&mut self, ui: &mut egui::Ui) {
        let Some(article) = self.session.draft().cloned() else {
            return;
        };
        let summary = self.session.draft_summary();

        egui::Frame::group(ui.style())
            .stroke(styles::panel_stroke())
            .rounding(styles::default_rounding())
            .show(ui, |ui| {
                match self.article_panel.render(ui, &self.theme, &article, summary.as_ref()) {
                    ArticlePanelAction::SetScreen(index, passed) => {
                        self.session = self.session.set_screen(index, passed);
                    }
                    ArticlePanelAction::SetComment(index, comment) => {
                        self.session = self.session.set_screen_comment(index, &comment);
                    }
                    ArticlePanelAction::None => {}
                }
            });

        ui.add_space(8.0);

        egui::Frame::group(ui.style())
            .stroke(styles::panel_stroke())
            .rounding(styles::default_rounding())
            .show(ui, |ui| {
                ui.label(RichText::new("🏷 标签").strong());
                let action = self.tag_view.render(
                    ui,
                    &self.theme,
                    &self.session.dataset().tags,
                    &article.tags,
                );
                match action {
                    TagViewAction::Select(canonical) => {
                        self.session = self.session.select_tag(&canonical);
                    }
                    TagViewAction::AddPath(input) => {
                        self.session = self.session.add_tag_path(&input);
                    }
                    TagViewAction::Remove(canonical) => {
                        self.session = self.session.remove_tag(&canonical);
                    }
                    TagViewAction::None => {}
                }
            });

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            if ui.button("✓ 完成并继续").clicked() {
                self.session = self.session.finish_article();
                self.status_message = format!(
                    "已完成 {} 篇文献",
                    self.session.dataset().articles.len()
                );
            }
            if ui.button("✗ 放弃").clicked() {
                self.session = self.session.discard_draft();
                self.status_message = "已放弃当前文献".to_string();
            }
        });
    }

    /// 渲染对话框
    fn render_dialogs(&mut self, ctx: &egui::Context) {
        match self.message_dialog.render(ctx) {
            MessageDialogResult::Dismissed => {
                // 确认后状态栏保留消息摘要
                self.status_message = self.message_dialog.summary();
            }
            MessageDialogResult::None => {}
        }

        match self.settings_dialog.render(ctx) {
            SettingsResult::Save => {
                self.settings_dialog.apply_to(&mut self.config);
                self.save_config();
            }
            SettingsResult::Reset => match self.config_manager.reset() {
                Ok(()) => {
                    self.config = AppConfig::default();
                    self.status_message = "已恢复默认设置".to_string();
                }
                Err(e) => {
                    tracing::error!("恢复默认配置失败: {:#}", e);
                    self.message_dialog.show_error("保存失败", "无法写入配置文件", &e);
                }
            },
            SettingsResult::Cancel => {}
            SettingsResult::None => {}
        }
    }
}
