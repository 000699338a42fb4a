//! 层级标签树
//!
//! 标签以 `A/B/C` 形式输入，插入时逐段查找或创建子节点。
//! 插入是幂等的，畸形输入（空串、只有分隔符）被规整为空操作。

use crate::core::models::TagNode;

/// 路径分隔符
pub const SEPARATOR: char = '/';

/// 将用户输入拆分为路径段：按 `/` 切分、去除首尾空白、丢弃空段
pub fn parse_tag_path(input: &str) -> Vec<String> {
    input
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// 将路径段拼接为规范路径
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("/")
}

/// 按路径插入节点，已存在的段直接复用
///
/// 只有后面还有路径段时才进入（必要时创建）子列表，
/// 已存在的叶子节点缺省的 `children` 保持缺省。
pub fn insert<S: AsRef<str>>(forest: &mut Vec<TagNode>, path: &[S]) {
    let segments: Vec<&str> = path
        .iter()
        .map(|s| AsRef::<str>::as_ref(s).trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut cursor = forest;
    for (depth, segment) in segments.iter().enumerate() {
        let index = match cursor.iter().position(|n| n.value == *segment) {
            Some(index) => index,
            None => {
                cursor.push(TagNode::new(segment));
                cursor.len() - 1
            }
        };

        if depth + 1 == segments.len() {
            break;
        }
        cursor = cursor[index].children.get_or_insert_with(Vec::new);
    }
}

/// 节点的规范路径：祖先路径段加上自身 value
pub fn canonical_path<S: AsRef<str>>(node: &TagNode, ancestor_path: &[S]) -> String {
    let mut segments: Vec<&str> = ancestor_path.iter().map(AsRef::as_ref).collect();
    segments.push(&node.value);
    segments.join("/")
}

/// 按路径查找节点
pub fn find<'a, S: AsRef<str>>(forest: &'a [TagNode], path: &[S]) -> Option<&'a TagNode> {
    let (first, rest) = path.split_first()?;
    let first: &str = first.as_ref();
    let node = forest.iter().find(|n| n.value == first)?;
    if rest.is_empty() {
        Some(node)
    } else {
        find(node.children(), rest)
    }
}

/// 深度优先遍历时产生的条目
#[derive(Debug, Clone, Copy)]
pub struct TagEntry<'a> {
    /// 深度（根为 0）
    pub depth: usize,
    pub node: &'a TagNode,
}

/// 深度优先（先序）遍历整片森林，返回每个节点及其规范路径
pub fn walk(forest: &[TagNode]) -> Vec<(TagEntry<'_>, String)> {
    fn visit<'a>(
        nodes: &'a [TagNode],
        ancestors: &mut Vec<&'a str>,
        out: &mut Vec<(TagEntry<'a>, String)>,
    ) {
        for node in nodes {
            out.push((
                TagEntry {
                    depth: ancestors.len(),
                    node,
                },
                canonical_path(node, ancestors.as_slice()),
            ));
            ancestors.push(&node.value);
            visit(node.children(), ancestors, out);
            ancestors.pop();
        }
    }

    let mut out = Vec::new();
    visit(forest, &mut Vec::new(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn values(nodes: &[TagNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.value.as_str()).collect()
    }

    fn assert_unique_siblings(nodes: &[TagNode]) {
        let mut seen = HashSet::new();
        for node in nodes {
            assert!(seen.insert(&node.value), "duplicate sibling: {}", node.value);
            assert_unique_siblings(node.children());
        }
    }

    #[test]
    fn test_parse_tag_path_normalizes_segments() {
        assert_eq!(parse_tag_path(" A / B//C/ "), vec!["A", "B", "C"]);
        assert!(parse_tag_path("").is_empty());
        assert!(parse_tag_path(" / / ").is_empty());
    }

    #[test]
    fn test_insert_siblings_keep_order() {
        let mut forest = Vec::new();
        insert(&mut forest, &parse_tag_path("A/B"));
        insert(&mut forest, &parse_tag_path("A/C"));

        assert_eq!(values(&forest), vec!["A"]);
        assert_eq!(values(forest[0].children()), vec!["B", "C"]);
    }

    #[test]
    fn test_insert_is_idempotent() {
        let mut once = Vec::new();
        insert(&mut once, &["X", "Y", "Z"]);

        let mut twice = once.clone();
        insert(&mut twice, &["X", "Y", "Z"]);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_path_is_noop() {
        let mut forest = Vec::new();
        insert::<&str>(&mut forest, &[]);
        insert(&mut forest, &["  ", ""]);
        assert!(forest.is_empty());
    }

    #[test]
    fn test_insert_trims_segments() {
        let mut forest = Vec::new();
        insert(&mut forest, &[" A ", "B"]);
        insert(&mut forest, &["A", " B"]);
        assert_eq!(values(&forest), vec!["A"]);
        assert_eq!(values(forest[0].children()), vec!["B"]);
    }

    #[test]
    fn test_insert_descends_into_node_without_children() {
        let mut forest = vec![TagNode {
            label: "Method".to_string(),
            value: "M".to_string(),
            children: None,
        }];
        insert(&mut forest, &["M", "Survey"]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].label, "Method");
        assert_eq!(values(forest[0].children()), vec!["Survey"]);
    }

    #[test]
    fn test_reinserting_existing_leaf_keeps_children_absent() {
        let data = crate::core::codec::import_dataset(
            r#"{"articles": [], "screens": [], "tags": [{"label": "A", "value": "A"}]}"#,
        )
        .unwrap();
        let mut forest = data.tags.clone();

        insert(&mut forest, &["A"]);
        insert(&mut forest, &[" A ", ""]);

        assert_eq!(forest, data.tags);
        assert_eq!(forest[0].children, None);
    }

    #[test]
    fn test_new_leaf_gets_empty_children() {
        let mut forest = Vec::new();
        insert(&mut forest, &["A", "B"]);
        assert_eq!(forest[0].children().len(), 1);
        assert_eq!(forest[0].children()[0].children, Some(Vec::new()));
    }

    #[test]
    fn test_siblings_stay_unique_after_many_inserts() {
        let mut forest = Vec::new();
        for path in ["A/B", "A/B/C", "B/A", "A/C", "A/B", "B", "B/A/A", "A"] {
            insert(&mut forest, &parse_tag_path(path));
        }
        assert_unique_siblings(&forest);
        assert_eq!(values(&forest), vec!["A", "B"]);
    }

    #[test]
    fn test_canonical_path() {
        let node = TagNode::new("C");
        assert_eq!(canonical_path(&node, &["A", "B"]), "A/B/C");
        assert_eq!(canonical_path::<&str>(&node, &[]), "C");
        assert_eq!(join_path(&["A", "B"]), "A/B");
    }

    #[test]
    fn test_find() {
        let mut forest = Vec::new();
        insert(&mut forest, &["A", "B", "C"]);
        assert_eq!(find(&forest, &["A", "B"]).map(|n| n.value.as_str()), Some("B"));
        assert!(find(&forest, &["A", "C"]).is_none());
        assert!(find::<&str>(&forest, &[]).is_none());
    }

    #[test]
    fn test_walk_is_preorder_with_canonical_paths() {
        let mut forest = Vec::new();
        insert(&mut forest, &["A", "B"]);
        insert(&mut forest, &["A", "C"]);
        insert(&mut forest, &["D"]);

        let entries: Vec<(usize, String)> = walk(&forest)
            .into_iter()
            .map(|(entry, path)| (entry.depth, path))
            .collect();

        assert_eq!(
            entries,
            vec![
                (0, "A".to_string()),
                (1, "A/B".to_string()),
                (1, "A/C".to_string()),
                (0, "D".to_string()),
            ]
        );
    }
}
