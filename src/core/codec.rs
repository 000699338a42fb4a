//! 数据集导入/导出
//!
//! 导出为 JSON 文本，导入时先检查顶层必需字段，再做强类型反序列化，
//! 不会把半结构化的数据交给下游。

use crate::core::models::ScreeningData;
use serde_json::Value;
use thiserror::Error;

/// 顶层必需字段，按检查顺序排列
pub const REQUIRED_KEYS: [&str; 3] = ["articles", "screens", "tags"];

/// 数据集文件错误
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("不是合法的 JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),
    #[error("顶层必须是 JSON 对象")]
    NotAnObject,
    #[error("缺少必需字段 `{0}`")]
    MissingKey(&'static str),
    #[error("数据结构不符合要求: {0}")]
    InvalidShape(#[source] serde_json::Error),
    #[error("序列化失败: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// 导出为带缩进的 JSON
pub fn export_dataset(data: &ScreeningData) -> Result<String, DatasetError> {
    serde_json::to_string_pretty(data).map_err(DatasetError::Serialize)
}

/// 导出为紧凑 JSON
pub fn export_dataset_compact(data: &ScreeningData) -> Result<String, DatasetError> {
    serde_json::to_string(data).map_err(DatasetError::Serialize)
}

/// 从 JSON 文本导入数据集，未知的额外字段被忽略
pub fn import_dataset(text: &str) -> Result<ScreeningData, DatasetError> {
    let value: Value = serde_json::from_str(text).map_err(DatasetError::InvalidJson)?;

    let object = value.as_object().ok_or(DatasetError::NotAnObject)?;
    if let Some(key) = REQUIRED_KEYS.into_iter().find(|k| !object.contains_key(*k)) {
        return Err(DatasetError::MissingKey(key));
    }

    serde_json::from_value(value).map_err(DatasetError::InvalidShape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Article, ScreenResult, TagNode};
    use crate::core::tag_tree;

    fn sample_dataset() -> ScreeningData {
        let mut tags = vec![TagNode {
            label: "Imported".to_string(),
            value: "imp".to_string(),
            children: None,
        }];
        tag_tree::insert(&mut tags, &["X", "Y"]);
        tag_tree::insert(&mut tags, &["X", "Z"]);

        ScreeningData {
            articles: vec![
                Article::with_state(
                    "@article{a, title = {Alpha}}",
                    vec![
                        ScreenResult {
                            rule: "peer reviewed".to_string(),
                            passed: true,
                            comment: Some("journal".to_string()),
                        },
                        ScreenResult::unanswered("english"),
                    ],
                    vec!["X/Y".to_string()],
                ),
                Article::new("@misc{b}"),
            ],
            screens: vec!["peer reviewed".to_string(), "english".to_string()],
            tags,
        }
    }

    #[test]
    fn test_round_trip_pretty_and_compact() {
        let data = sample_dataset();
        assert_eq!(import_dataset(&export_dataset(&data).unwrap()).unwrap(), data);
        assert_eq!(
            import_dataset(&export_dataset_compact(&data).unwrap()).unwrap(),
            data
        );
    }

    #[test]
    fn test_round_trip_empty_dataset() {
        let data = ScreeningData::default();
        assert_eq!(import_dataset(&export_dataset(&data).unwrap()).unwrap(), data);
    }

    #[test]
    fn test_tagged_article_survives_round_trip() {
        let data = ScreeningData {
            articles: vec![Article::with_state("@misc{k}", Vec::new(), vec!["X/Y".to_string()])],
            ..Default::default()
        };
        let back = import_dataset(&export_dataset(&data).unwrap()).unwrap();
        assert_eq!(back.articles[0].tags, vec!["X/Y"]);
    }

    #[test]
    fn test_export_key_order_is_stable() {
        let text = export_dataset_compact(&sample_dataset()).unwrap();

        let articles = text.find("\"articles\"").unwrap();
        let screens = text.rfind("\"screens\":[\"").unwrap();
        let tags = text.rfind("\"tags\":[{").unwrap();
        assert!(articles < screens && screens < tags);

        assert!(text.contains(r#"{"bibtex":"@article{a, title = {Alpha}}","screens":["#));
        assert!(text.contains(r#"{"rule":"peer reviewed","passed":true,"comment":"journal"}"#));
        assert!(text.contains(r#"{"rule":"english","passed":false}"#));
        assert!(text.contains(r#"{"label":"Imported","value":"imp"}"#));
        assert!(text.contains(r#"{"label":"Y","value":"Y","children":[]}"#));
    }

    #[test]
    fn test_missing_required_keys() {
        assert!(matches!(
            import_dataset(r#"{"foo": 1}"#),
            Err(DatasetError::MissingKey("articles"))
        ));
        assert!(matches!(
            import_dataset(r#"{"articles": [], "screens": []}"#),
            Err(DatasetError::MissingKey("tags"))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            import_dataset("{not json"),
            Err(DatasetError::InvalidJson(_))
        ));
        assert!(matches!(import_dataset(""), Err(DatasetError::InvalidJson(_))));
    }

    #[test]
    fn test_top_level_must_be_object() {
        assert!(matches!(import_dataset("[]"), Err(DatasetError::NotAnObject)));
    }

    #[test]
    fn test_wrong_value_shape() {
        assert!(matches!(
            import_dataset(r#"{"articles": 1, "screens": [], "tags": []}"#),
            Err(DatasetError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_extra_keys_ignored_and_citation_alias_accepted() {
        let text = r#"{
            "version": 3,
            "articles": [{"citation": "@misc{k}", "tags": ["A"]}],
            "screens": ["r"],
            "tags": [{"label": "A", "value": "A"}]
        }"#;
        let data = import_dataset(text).unwrap();
        assert_eq!(data.articles[0].citation, "@misc{k}");
        assert!(data.articles[0].screens.is_empty());
        assert_eq!(data.tags[0].children, None);
    }
}
