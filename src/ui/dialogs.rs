//! 对话框组件

use crate::core::models::AppConfig;
use eframe::egui::{self, RichText};

/// 阻塞式消息对话框
/// 显示期间主界面不可操作，直到用户确认
pub struct MessageDialog {
    /// 是否显示
    pub visible: bool,
    /// 标题
    pub title: String,
    /// 消息正文
    pub message: String,
    /// 补充细节（如错误链）
    pub detail: String,
}

impl Default for MessageDialog {
    fn default() -> Self {
        Self {
            visible: false,
            title: "提示".to_string(),
            message: String::new(),
            detail: String::new(),
        }
    }
}

impl MessageDialog {
    /// 显示对话框
    pub fn show(&mut self, title: &str, message: &str, detail: &str) {
        self.visible = true;
        self.title = title.to_string();
        self.message = message.to_string();
        self.detail = detail.to_string();
    }

    /// 以 anyhow 错误链作为细节显示
    pub fn show_error(&mut self, title: &str, message: &str, error: &anyhow::Error) {
        let detail = error
            .chain()
            .map(|cause| cause.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        self.show(title, message, &detail);
    }

    /// 单行摘要，供状态栏使用
    pub fn summary(&self) -> String {
        if self.message.is_empty() {
            self.title.clone()
        } else {
            format!("{}: {}", self.title, self.message)
        }
    }

    /// 渲染对话框
    pub fn render(&mut self, ctx: &egui::Context) -> MessageDialogResult {
        let mut result = MessageDialogResult::None;

        if !self.visible {
            return result;
        }

        egui::Window::new(self.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(400.0)
            .show(ctx, |ui| {
                ui.label(RichText::new(&self.message).strong());

                if !self.detail.is_empty() {
                    ui.separator();
                    egui::ScrollArea::vertical()
                        .max_height(120.0)
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(&self.detail)
                                    .small()
                                    .color(egui::Color32::GRAY),
                            );
                        });
                }

                ui.separator();

                if ui.button("✓ 确定").clicked() {
                    result = MessageDialogResult::Dismissed;
                    self.visible = false;
                }
            });

        result
    }
}

/// 消息对话框结果
#[derive(Debug, PartialEq)]
pub enum MessageDialogResult {
    None,
    Dismissed,
}

/// 设置对话框
pub struct SettingsDialog {
    /// 是否显示
    pub visible: bool,
    /// 导出文件名
    pub export_file_name: String,
    /// 导出时是否缩进
    pub pretty_export: bool,
    /// 默认规则（每行一条）
    pub default_rules: String,
    /// 默认目录
    pub last_directory: String,
}

impl Default for SettingsDialog {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl SettingsDialog {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            visible: false,
            export_file_name: config.export_file_name.clone(),
            pretty_export: config.pretty_export,
            default_rules: config.default_rules.join("\n"),
            last_directory: config
                .last_directory
                .as_ref()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    /// 从配置加载并显示
    pub fn open(&mut self, config: &AppConfig) {
        *self = Self::from_config(config);
        self.visible = true;
    }

    /// 将编辑结果写回配置
    pub fn apply_to(&self, config: &mut AppConfig) {
        let name = self.export_file_name.trim();
        if !name.is_empty() {
            config.export_file_name = name.to_string();
        }
        config.pretty_export = self.pretty_export;
        config.default_rules = self
            .default_rules
            .lines()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
        let dir = self.last_directory.trim();
        config.last_directory = (!dir.is_empty()).then(|| dir.into());
    }

    /// 渲染对话框
    pub fn render(&mut self, ctx: &egui::Context) -> SettingsResult {
        let mut result = SettingsResult::None;

        if !self.visible {
            return result;
        }

        egui::Window::new("⚙️ 设置")
            .collapsible(false)
            .resizable(true)
            .default_width(500.0)
            .show(ctx, |ui| {
                ui.heading("导出");

                ui.horizontal(|ui| {
                    ui.label("文件名:");
                    ui.text_edit_singleline(&mut self.export_file_name);
                });
                ui.checkbox(&mut self.pretty_export, "导出带缩进的 JSON");

                ui.horizontal(|ui| {
                    ui.label("默认目录:");
                    ui.text_edit_singleline(&mut self.last_directory);
                    if ui.button("📁").clicked() {
                        if let Some(path) = rfd::FileDialog::new().pick_folder() {
                            self.last_directory = path.to_string_lossy().to_string();
                        }
                    }
                });

                ui.separator();
                ui.heading("默认规则");
                ui.label(
                    RichText::new("每行一条，新会话时使用")
                        .small()
                        .color(egui::Color32::GRAY),
                );
                ui.add(
                    egui::TextEdit::multiline(&mut self.default_rules)
                        .desired_width(f32::INFINITY)
                        .desired_rows(6),
                );

                ui.separator();

                ui.horizontal(|ui| {
                    if ui.button("💾 保存").clicked() {
                        result = SettingsResult::Save;
                        self.visible = false;
                    }
                    if ui.button("↺ 恢复默认").clicked() {
                        result = SettingsResult::Reset;
                        self.visible = false;
                    }
                    if ui.button("✗ 取消").clicked() {
                        result = SettingsResult::Cancel;
                        self.visible = false;
                    }
                });
            });

        result
    }
}

/// 设置对话框结果
#[derive(Debug, PartialEq)]
pub enum SettingsResult {
    None,
    Save,
    /// 恢复并保存默认配置
    Reset,
    Cancel,
}
