//! 已筛选文献表格
//!
//! 显示数据集中已完成的文献：
//! - 标题（无标题显示为 Untitled）
//! - 通过规则数，按进度着色
//! - 标签
//! - 按标题或标签搜索

use crate::core::bibtex;
use crate::core::models::Article;
use crate::ui::styles::Theme;
use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

/// 文献表格
#[derive(Default)]
pub struct ArticleTable {
    /// 搜索过滤
    filter_text: String,
}

/// 表格中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRow {
    /// 在数据集中的序号（从 1 开始）
    pub number: usize,
    pub title: String,
    pub passed: usize,
    pub total: usize,
    pub tags: String,
}

impl ArticleRow {
    pub fn from_article(number: usize, article: &Article) -> Self {
        let title = bibtex::parse_citation(&article.citation)
            .map(|s| s.title)
            .unwrap_or_default();

        Self {
            number,
            title: if title.is_empty() {
                "Untitled".to_string()
            } else {
                title
            },
            passed: article.passed_count(),
            total: article.screens.len(),
            tags: article.tags.join(", "),
        }
    }

    /// 标题或标签是否包含过滤文本（大小写不敏感）
    pub fn matches(&self, filter: &str) -> bool {
        let filter = filter.trim().to_lowercase();
        filter.is_empty()
            || self.title.to_lowercase().contains(&filter)
            || self.tags.to_lowercase().contains(&filter)
    }
}

impl ArticleTable {
    /// 创建新的文献表格
    pub fn new() -> Self {
        Self::default()
    }

    /// 渲染工具栏
    pub fn render_toolbar(&mut self, ui: &mut Ui, articles: &[Article]) {
        ui.horizontal(|ui| {
            ui.heading(format!("已筛选文献: {}", articles.len()));
            ui.separator();
            ui.label("🔍");
            ui.add(
                egui::TextEdit::singleline(&mut self.filter_text)
                    .hint_text("搜索标题或标签...")
                    .desired_width(200.0),
            );
        });
    }

    /// 渲染表格
    pub fn render(&self, ui: &mut Ui, theme: &Theme, articles: &[Article]) {
        let rows: Vec<ArticleRow> = articles
            .iter()
            .enumerate()
            .map(|(i, a)| ArticleRow::from_article(i + 1, a))
            .filter(|row| row.matches(&self.filter_text))
            .collect();

        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .vscroll(false)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::exact(40.0))
            .column(Column::initial(320.0).at_least(120.0))
            .column(Column::exact(60.0))
            .column(Column::remainder())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("标题");
                });
                header.col(|ui| {
                    ui.strong("通过");
                });
                header.col(|ui| {
                    ui.strong("标签");
                });
            })
            .body(|mut body| {
                for row in &rows {
                    body.row(22.0, |mut table_row| {
                        table_row.col(|ui| {
                            ui.label(row.number.to_string());
                        });
                        table_row.col(|ui| {
                            ui.label(row.title.as_str());
                        });
                        table_row.col(|ui| {
                            ui.label(
                                RichText::new(format!("{}/{}", row.passed, row.total))
                                    .color(theme.screening_color(row.passed, row.total)),
                            );
                        });
                        table_row.col(|ui| {
                            ui.label(row.tags.as_str());
                        });
                    });
                }
            });
    }
}

/// 数据集统计
#[derive(Debug, Default, PartialEq)]
pub struct ArticleStats {
    pub total_articles: usize,
    pub all_passed: usize,
    pub tagged: usize,
}

impl ArticleStats {
    pub fn from_articles(articles: &[Article]) -> Self {
        Self {
            total_articles: articles.len(),
            all_passed: articles.iter().filter(|a| a.all_passed()).count(),
            tagged: articles.iter().filter(|a| !a.tags.is_empty()).count(),
        }
    }
}
