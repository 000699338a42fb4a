//! 筛选规则集
//!
//! 规则是用户可编辑的有序判断条件。开始筛选前必须保证每条规则非空，
//! 这是硬性前置条件而不是警告。

use crate::core::models::ScreenResult;
use thiserror::Error;

/// 内置默认规则
pub fn default_rules() -> Vec<String> {
    [
        "Is this a peer-reviewed article?",
        "Is the article in English?",
        "Is the article within the relevant domain?",
        "Is the full text available?",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// 规则集校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesetError {
    #[error("至少需要一条筛选规则")]
    Empty,
    #[error("第 {} 条规则为空", .index + 1)]
    BlankRule { index: usize },
}

/// 有序规则集
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ruleset {
    rules: Vec<String>,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::new(default_rules())
    }
}

impl Ruleset {
    pub fn new(rules: Vec<String>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// 末尾追加一条空规则，等待用户填写
    pub fn push_blank(&mut self) {
        self.rules.push(String::new());
    }

    /// 替换第 `index` 条规则文本（越界时忽略）
    pub fn set(&mut self, index: usize, text: &str) {
        if let Some(rule) = self.rules.get_mut(index) {
            *rule = text.to_string();
        }
    }

    /// 删除第 `index` 条规则（越界时忽略）
    pub fn remove(&mut self, index: usize) {
        if index < self.rules.len() {
            self.rules.remove(index);
        }
    }

    /// 校验能否开始筛选
    pub fn validate(&self) -> Result<(), RulesetError> {
        if self.rules.is_empty() {
            return Err(RulesetError::Empty);
        }
        match self.rules.iter().position(|r| r.trim().is_empty()) {
            Some(index) => Err(RulesetError::BlankRule { index }),
            None => Ok(()),
        }
    }

    pub fn can_start(&self) -> bool {
        self.validate().is_ok()
    }

    /// 为新文献生成一份未作答的筛选结果
    pub fn snapshot(&self) -> Vec<ScreenResult> {
        self.rules.iter().map(|r| ScreenResult::unanswered(r)).collect()
    }
}

/// 解析仅包含规则的导入文件 `{"rules": [...]}`
///
/// 任何其他形状（包括非法 JSON）都返回 `None`，调用方应直接忽略。
pub fn parse_rules_import(text: &str) -> Option<Vec<String>> {
    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!("忽略无法解析的规则文件: {}", e);
            return None;
        }
    };

    value
        .get("rules")?
        .as_array()?
        .iter()
        .map(|r| r.as_str().map(str::to_string))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ruleset(rules: &[&str]) -> Ruleset {
        Ruleset::new(rules.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_default_rules_pass_guard() {
        let rules = Ruleset::default();
        assert_eq!(rules.len(), 4);
        assert!(rules.can_start());
    }

    #[test]
    fn test_empty_ruleset_is_refused() {
        assert_eq!(ruleset(&[]).validate(), Err(RulesetError::Empty));
    }

    #[test]
    fn test_blank_rule_is_refused() {
        let rules = ruleset(&["ok", "   ", ""]);
        assert_eq!(rules.validate(), Err(RulesetError::BlankRule { index: 1 }));
        assert!(!rules.can_start());
    }

    #[test]
    fn test_editing_operations() {
        let mut rules = ruleset(&["a", "b"]);
        rules.push_blank();
        assert!(!rules.can_start());

        rules.set(2, "c");
        rules.remove(0);
        rules.remove(10);
        rules.set(10, "ignored");
        assert_eq!(rules.rules(), ["b", "c"]);
        assert!(rules.can_start());
    }

    #[test]
    fn test_snapshot_is_unanswered_in_order() {
        let snapshot = ruleset(&["first", "second"]).snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].rule, "first");
        assert_eq!(snapshot[1].rule, "second");
        assert!(snapshot.iter().all(|s| !s.passed && s.comment.is_none()));
    }

    #[test]
    fn test_parse_rules_import() {
        assert_eq!(
            parse_rules_import(r#"{"rules": ["x", "y"], "extra": 1}"#),
            Some(vec!["x".to_string(), "y".to_string()])
        );
        assert_eq!(parse_rules_import(r#"{"rules": "x"}"#), None);
        assert_eq!(parse_rules_import(r#"{"screens": ["x"]}"#), None);
        assert_eq!(parse_rules_import(r#"[["x"]]"#), None);
        assert_eq!(parse_rules_import(r#"{"rules": ["x", 2]}"#), None);
        assert_eq!(parse_rules_import("not json"), None);
    }

    #[test]
    fn test_error_messages_are_one_based() {
        assert_eq!(
            RulesetError::BlankRule { index: 0 }.to_string(),
            "第 1 条规则为空"
        );
    }
}
