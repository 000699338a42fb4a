//! 筛选会话
//!
//! 整个会话的状态集中在 [`ScreeningSession`] 中，由界面层持有。
//! 每个用户操作都是 `&self -> Self`（或 `Result<Self, E>`）的纯变换：
//! 界面用返回的新值替换旧值，出错时旧值保持不变。

use crate::core::bibtex::{self, CitationError};
use crate::core::codec::{self, DatasetError};
use crate::core::models::{Article, CitationSummary, ScreeningData};
use crate::core::ruleset::{self, Ruleset, RulesetError};
use crate::core::tag_tree;

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 定义筛选规则
    DefineRules,
    /// 逐篇筛选
    Screening,
}

/// 会话状态
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningSession {
    phase: Phase,
    ruleset: Ruleset,
    dataset: ScreeningData,
    /// 正在筛选、尚未加入数据集的文献
    draft: Option<Article>,
}

impl Default for ScreeningSession {
    fn default() -> Self {
        Self::new(ruleset::default_rules())
    }
}

impl ScreeningSession {
    /// 以给定规则开始一个新会话（处于规则定义阶段）
    pub fn new(rules: Vec<String>) -> Self {
        Self {
            phase: Phase::DefineRules,
            dataset: ScreeningData::with_rules(rules.clone()),
            ruleset: Ruleset::new(rules),
            draft: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    pub fn dataset(&self) -> &ScreeningData {
        &self.dataset
    }

    pub fn draft(&self) -> Option<&Article> {
        self.draft.as_ref()
    }

    /// 当前草稿的标题与摘要
    pub fn draft_summary(&self) -> Option<CitationSummary> {
        self.draft
            .as_ref()
            .and_then(|a| bibtex::parse_citation(&a.citation).ok())
    }

    /// 修改规则集（仅在规则定义阶段生效）
    pub fn edit_rules(&self, edit: impl FnOnce(&mut Ruleset)) -> Self {
        let mut next = self.clone();
        if next.phase == Phase::DefineRules {
            edit(&mut next.ruleset);
        }
        next
    }

    /// 进入筛选阶段：规则集必须非空且不含空白规则
    pub fn start_screening(&self) -> Result<Self, RulesetError> {
        self.ruleset.validate()?;

        let mut next = self.clone();
        next.dataset.screens = self.ruleset.rules().to_vec();
        next.phase = Phase::Screening;
        tracing::info!("开始筛选，共 {} 条规则", next.ruleset.len());
        Ok(next)
    }

    /// 导入仅含规则的文件
    ///
    /// 形状不符时原样返回；规则合法时自动进入筛选阶段。
    pub fn import_rules(&self, text: &str) -> Self {
        let Some(rules) = ruleset::parse_rules_import(text) else {
            tracing::warn!("规则文件格式不符，已忽略");
            return self.clone();
        };

        let mut next = self.clone();
        next.ruleset = Ruleset::new(rules);
        tracing::info!("已导入 {} 条规则", next.ruleset.len());

        match next.start_screening() {
            Ok(started) => started,
            Err(e) => {
                tracing::warn!("导入的规则无法直接开始筛选: {}", e);
                next
            }
        }
    }

    /// 载入一条引文作为新草稿，筛选结果为当前规则集的快照
    pub fn load_citation(&self, raw: &str) -> Result<Self, CitationError> {
        let summary = bibtex::parse_citation(raw)?;

        let mut next = self.clone();
        next.draft = Some(Article::with_state(
            summary.raw,
            self.ruleset.snapshot(),
            Vec::new(),
        ));
        tracing::info!("载入文献: {}", summary.title);
        Ok(next)
    }

    /// 设置草稿第 `index` 条规则的通过状态
    pub fn set_screen(&self, index: usize, passed: bool) -> Self {
        self.map_draft(|a| a.with_screen_passed(index, passed))
    }

    /// 设置草稿第 `index` 条规则的备注
    pub fn set_screen_comment(&self, index: usize, comment: &str) -> Self {
        self.map_draft(|a| a.with_screen_comment(index, comment))
    }

    /// 按输入路径添加标签：写入标签树，并把规范路径加入草稿
    ///
    /// 输入规整后为空时不做任何改变。
    pub fn add_tag_path(&self, input: &str) -> Self {
        let path = tag_tree::parse_tag_path(input);
        if path.is_empty() {
            return self.clone();
        }

        let canonical = tag_tree::join_path(&path);
        let mut next = self.map_draft(|a| a.with_tag(&canonical));
        tag_tree::insert(&mut next.dataset.tags, &path);
        tracing::debug!("添加标签: {}", canonical);
        next
    }

    /// 选择标签树中已有的标签
    pub fn select_tag(&self, canonical: &str) -> Self {
        self.map_draft(|a| a.with_tag(canonical))
    }

    /// 从草稿移除标签，标签树保持不变
    pub fn remove_tag(&self, canonical: &str) -> Self {
        self.map_draft(|a| a.without_tag(canonical))
    }

    /// 完成当前文献，将草稿加入数据集
    pub fn finish_article(&self) -> Self {
        let mut next = self.clone();
        if let Some(article) = next.draft.take() {
            tracing::info!(
                "完成筛选: 通过 {}/{}，标签 {} 个",
                article.passed_count(),
                article.screens.len(),
                article.tags.len()
            );
            next.dataset.articles.push(article);
        }
        next
    }

    /// 放弃当前草稿
    pub fn discard_draft(&self) -> Self {
        let mut next = self.clone();
        next.draft = None;
        next
    }

    pub fn export_json(&self) -> Result<String, DatasetError> {
        codec::export_dataset(&self.dataset)
    }

    /// 导入数据集，替换当前数据集，并以其中的规则作为当前规则集
    pub fn import_json(&self, text: &str) -> Result<Self, DatasetError> {
        let next = self.with_dataset(codec::import_dataset(text)?);
        tracing::info!(
            "已导入数据集: {} 篇文献，{} 条规则",
            next.dataset.articles.len(),
            next.ruleset.len()
        );
        Ok(next)
    }

    /// 用已解析的数据集替换当前数据集，草稿保持不变
    pub fn with_dataset(&self, dataset: ScreeningData) -> Self {
        let mut next = self.clone();
        next.ruleset = Ruleset::new(dataset.screens.clone());
        next.dataset = dataset;
        next
    }

    fn map_draft(&self, f: impl FnOnce(&Article) -> Article) -> Self {
        let mut next = self.clone();
        if let Some(draft) = self.draft.as_ref() {
            next.draft = Some(f(draft));
        }
        next
    }
}
