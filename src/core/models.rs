//! 核心数据模型定义
//!
//! 这些结构同时也是导出文件的数据格式，字段顺序即为导出时的键顺序。

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 标签树节点
/// 同一兄弟列表中 `value` 唯一；规范路径由根到节点的 `value` 以 `/` 拼接而成
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNode {
    /// 显示名称
    pub label: String,
    /// 路径段取值
    pub value: String,
    /// 子节点（缺省与空列表是两种不同状态，需原样往返）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TagNode>>,
}

impl TagNode {
    /// 创建一个 label 与 value 相同、子列表为空的节点
    pub fn new(segment: &str) -> Self {
        Self {
            label: segment.to_string(),
            value: segment.to_string(),
            children: Some(Vec::new()),
        }
    }

    /// 子节点切片（缺省视为空）
    pub fn children(&self) -> &[TagNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

/// 单条筛选规则的判定结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenResult {
    /// 规则文本
    pub rule: String,
    /// 是否通过
    pub passed: bool,
    /// 备注（可选）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ScreenResult {
    /// 创建尚未作答的结果
    pub fn unanswered(rule: &str) -> Self {
        Self {
            rule: rule.to_string(),
            passed: false,
            comment: None,
        }
    }
}

/// 文献记录
/// 保存原始引文文本、筛选结果和规范路径形式的标签
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// 原始引文（导出键名沿用 `bibtex`，导入时也接受 `citation`）
    #[serde(rename = "bibtex", alias = "citation")]
    pub citation: String,
    /// 筛选结果，顺序与开始筛选时的规则集一致
    #[serde(default)]
    pub screens: Vec<ScreenResult>,
    /// 标签规范路径（去重、保序）
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Article {
    /// 创建新的文献记录，筛选结果与标签均为空
    pub fn new(citation: impl Into<String>) -> Self {
        Self::with_state(citation, Vec::new(), Vec::new())
    }

    /// 使用已有的筛选结果和标签创建记录
    pub fn with_state(
        citation: impl Into<String>,
        screens: Vec<ScreenResult>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            citation: citation.into(),
            screens,
            tags,
        }
    }

    /// 返回第 `index` 条结果的通过状态被替换后的新记录，其余条目保持不变
    pub fn with_screen_passed(&self, index: usize, passed: bool) -> Self {
        self.map_screen(index, |result| ScreenResult {
            passed,
            ..result.clone()
        })
    }

    /// 返回第 `index` 条结果备注被替换后的新记录；全空白的备注视为清除
    pub fn with_screen_comment(&self, index: usize, comment: &str) -> Self {
        self.map_screen(index, |result| ScreenResult {
            comment: (!comment.trim().is_empty()).then(|| comment.to_string()),
            ..result.clone()
        })
    }

    fn map_screen(&self, index: usize, f: impl FnOnce(&ScreenResult) -> ScreenResult) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.screens.get_mut(index) {
            *slot = f(&self.screens[index]);
        }
        next
    }

    /// 添加标签（已存在则不变）
    pub fn with_tag(&self, canonical: &str) -> Self {
        let mut next = self.clone();
        if !next.has_tag(canonical) {
            next.tags.push(canonical.to_string());
        }
        next
    }

    /// 移除标签，仅影响本记录，不会级联到子路径或标签树
    pub fn without_tag(&self, canonical: &str) -> Self {
        let mut next = self.clone();
        next.tags.retain(|t| t != canonical);
        next
    }

    pub fn has_tag(&self, canonical: &str) -> bool {
        self.tags.iter().any(|t| t == canonical)
    }

    /// 已通过的规则数
    pub fn passed_count(&self) -> usize {
        self.screens.iter().filter(|s| s.passed).count()
    }

    /// 是否所有规则均通过（无规则时为 false）
    pub fn all_passed(&self) -> bool {
        !self.screens.is_empty() && self.passed_count() == self.screens.len()
    }
}

/// 筛选数据集
/// 数据集拥有标签树；文献只通过规范路径字符串引用其中的节点
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningData {
    /// 已完成筛选的文献
    pub articles: Vec<Article>,
    /// 当前规则集
    pub screens: Vec<String>,
    /// 标签树
    pub tags: Vec<TagNode>,
}

impl ScreeningData {
    /// 以给定规则集创建空数据集
    pub fn with_rules(rules: Vec<String>) -> Self {
        Self {
            articles: Vec::new(),
            screens: rules,
            tags: Vec::new(),
        }
    }
}

/// 引文解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationSummary {
    /// 标题（缺失时为空串）
    pub title: String,
    /// 摘要（缺失时为空串）
    pub abstract_text: String,
    /// 原始文本，便于之后重新解析
    pub raw: String,
}

/// 应用配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 新会话使用的默认规则
    pub default_rules: Vec<String>,
    /// 导出文件名
    pub export_file_name: String,
    /// 上次导入/导出所在目录
    pub last_directory: Option<PathBuf>,
    /// 导出时是否缩进
    pub pretty_export: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_rules: crate::core::ruleset::default_rules(),
            export_file_name: "screening_data.json".to_string(),
            last_directory: None,
            pretty_export: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_article() -> Article {
        Article::with_state(
            "@article{a, title={T}}",
            vec![
                ScreenResult::unanswered("peer reviewed"),
                ScreenResult {
                    rule: "english".to_string(),
                    passed: false,
                    comment: Some("check later".to_string()),
                },
                ScreenResult::unanswered("full text"),
            ],
            vec!["X/Y".to_string()],
        )
    }

    #[test]
    fn test_new_article_defaults_to_empty_state() {
        let article = Article::new("@misc{k}");
        assert!(article.screens.is_empty());
        assert!(article.tags.is_empty());
    }

    #[test]
    fn test_toggle_changes_only_target_entry() {
        let article = sample_article();
        let toggled = article.with_screen_passed(1, true);

        assert!(toggled.screens[1].passed);
        assert_eq!(toggled.screens[1].rule, "english");
        assert_eq!(toggled.screens[1].comment.as_deref(), Some("check later"));
        assert_eq!(toggled.screens[0], article.screens[0]);
        assert_eq!(toggled.screens[2], article.screens[2]);
        // 原记录不受影响
        assert!(!article.screens[1].passed);
    }

    #[test]
    fn test_toggle_out_of_range_is_noop() {
        let article = sample_article();
        assert_eq!(article.with_screen_passed(9, true), article);
    }

    #[test]
    fn test_blank_comment_clears_field() {
        let article = sample_article();
        let cleared = article.with_screen_comment(1, "   ");
        assert_eq!(cleared.screens[1].comment, None);
        assert_eq!(cleared.screens[0], article.screens[0]);

        let set = article.with_screen_comment(0, "needs PDF ");
        assert_eq!(set.screens[0].comment.as_deref(), Some("needs PDF "));
    }

    #[test]
    fn test_tags_are_unique_and_removal_is_local() {
        let article = sample_article().with_tag("X/Y").with_tag("X");
        assert_eq!(article.tags, vec!["X/Y", "X"]);

        let removed = article.without_tag("X");
        assert_eq!(removed.tags, vec!["X/Y"]);
    }

    #[test]
    fn test_all_passed() {
        let article = sample_article();
        assert!(!article.all_passed());
        let done = article
            .with_screen_passed(0, true)
            .with_screen_passed(1, true)
            .with_screen_passed(2, true);
        assert!(done.all_passed());
        assert_eq!(done.passed_count(), 3);
        assert!(!Article::new("x").all_passed());
    }

    #[test]
    fn test_tag_node_children_absent_vs_empty() {
        let bare = TagNode {
            label: "A".to_string(),
            value: "A".to_string(),
            children: None,
        };
        assert!(bare.children().is_empty());
        assert!(!bare.has_children());
        assert_eq!(TagNode::new("A").children, Some(Vec::new()));
    }
}
