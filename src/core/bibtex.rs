//! BibTeX 解析模块
//!
//! 只实现筛选需要的子集：
//! - `@type{key, field = value, ...}` 与 `@type(...)` 两种定界
//! - 值可以是 `{...}`、`"..."`、数字或宏名，并可用 `#` 连接
//! - `@string` 定义宏，`@comment` / `@preamble` 被跳过
//!
//! 条目之外的文本一律忽略。

use crate::core::models::CitationSummary;
use std::collections::HashMap;
use thiserror::Error;

/// 引文解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CitationError {
    /// 输入中没有任何可解析的条目
    #[error("未找到 BibTeX 条目")]
    NoEntryFound,
    /// 条目无法切分
    #[error("BibTeX 格式错误（偏移 {offset}）: {reason}")]
    Malformed { offset: usize, reason: String },
}

/// 解析出的单个条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibEntry {
    /// 条目类型（小写，如 `article`）
    pub entry_type: String,
    /// 引用键
    pub key: String,
    /// 字段列表，字段名统一小写，保持出现顺序
    pub fields: Vec<(String, String)>,
}

impl BibEntry {
    /// 按名称取字段值（大小写不敏感，重复字段以最后一次为准）
    pub fn field(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// 解析整段文本中的所有常规条目
pub fn parse_bibliography(src: &str) -> Result<Vec<BibEntry>, CitationError> {
    Parser::new(src).parse_all()
}

/// 解析引文并取第一条目的标题与摘要
pub fn parse_citation(raw: &str) -> Result<CitationSummary, CitationError> {
    let entries = parse_bibliography(raw)?;
    let entry = entries.first().ok_or(CitationError::NoEntryFound)?;

    Ok(CitationSummary {
        title: entry.field("title").map(collapse_whitespace).unwrap_or_default(),
        abstract_text: entry
            .field("abstract")
            .map(collapse_whitespace)
            .unwrap_or_default(),
        raw: raw.to_string(),
    })
}

/// 将连续空白（含换行）压缩为单个空格
fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    macros: HashMap<String, String>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            macros: HashMap::new(),
        }
    }

    fn parse_all(mut self) -> Result<Vec<BibEntry>, CitationError> {
        let mut entries = Vec::new();

        while let Some(at) = self.src[self.pos..].find('@') {
            self.pos += at + 1;
            self.skip_whitespace();

            let entry_type = self.read_identifier().to_ascii_lowercase();
            if entry_type.is_empty() {
                continue;
            }

            self.skip_whitespace();
            // 不跟定界符的 @（如邮箱地址）属于条目外文本
            let close = match self.peek() {
                Some(b'{') => b'}',
                Some(b'(') => b')',
                _ => continue,
            };
            self.pos += 1;

            match entry_type.as_str() {
                "comment" => self.skip_balanced(close)?,
                "preamble" => {
                    self.skip_whitespace();
                    self.read_value()?;
                    self.expect_close(close)?;
                }
                "string" => self.parse_string_macro(close)?,
                _ => entries.push(self.parse_entry(entry_type, close)?),
            }
        }

        tracing::debug!("解析出 {} 个 BibTeX 条目", entries.len());
        Ok(entries)
    }

    fn parse_entry(&mut self, entry_type: String, close: u8) -> Result<BibEntry, CitationError> {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b == b',' || b == close {
                break;
            }
            self.pos += 1;
        }
        let key = self.src[start..self.pos].trim().to_string();

        let mut entry = BibEntry {
            entry_type,
            key,
            fields: Vec::new(),
        };

        match self.peek() {
            Some(b) if b == close => {
                self.pos += 1;
                return Ok(entry);
            }
            Some(_) => self.pos += 1,
            None => return Err(self.error("条目未闭合")),
        }

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b) if b == close => {
                    self.pos += 1;
                    return Ok(entry);
                }
                None => return Err(self.error("条目未闭合")),
                _ => {}
            }

            let name = self.read_identifier().to_ascii_lowercase();
            if name.is_empty() {
                return Err(self.error("缺少字段名"));
            }
            self.skip_whitespace();
            if self.peek() != Some(b'=') {
                return Err(self.error(&format!("字段 {name} 之后缺少 =")));
            }
            self.pos += 1;
            self.skip_whitespace();

            let value = self.read_value()?;
            entry.fields.push((name, value));

            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b) if b == close => {}
                None => return Err(self.error("条目未闭合")),
                Some(_) => return Err(self.error("字段之间缺少逗号")),
            }
        }
    }

    fn parse_string_macro(&mut self, close: u8) -> Result<(), CitationError> {
        self.skip_whitespace();
        let name = self.read_identifier().to_ascii_lowercase();
        if name.is_empty() {
            return Err(self.error("@string 缺少宏名"));
        }
        self.skip_whitespace();
        if self.peek() != Some(b'=') {
            return Err(self.error("@string 缺少 ="));
        }
        self.pos += 1;
        self.skip_whitespace();
        let value = self.read_value()?;
        self.macros.insert(name, value);
        self.expect_close(close)
    }

    /// 读取一个值：若干片段以 `#` 连接
    fn read_value(&mut self) -> Result<String, CitationError> {
        let mut value = self.read_piece()?;
        loop {
            self.skip_whitespace();
            if self.peek() != Some(b'#') {
                return Ok(value);
            }
            self.pos += 1;
            self.skip_whitespace();
            value.push_str(&self.read_piece()?);
        }
    }

    fn read_piece(&mut self) -> Result<String, CitationError> {
        match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                let start = self.pos;
                self.skip_balanced(b'}')?;
                Ok(self.src[start..self.pos - 1].to_string())
            }
            Some(b'"') => {
                self.pos += 1;
                let start = self.pos;
                let mut depth = 0usize;
                while let Some(b) = self.peek() {
                    match b {
                        b'{' => depth += 1,
                        b'}' => depth = depth.saturating_sub(1),
                        b'"' if depth == 0 => {
                            let value = self.src[start..self.pos].to_string();
                            self.pos += 1;
                            return Ok(value);
                        }
                        _ => {}
                    }
                    self.pos += 1;
                }
                Err(self.error("引号值未闭合"))
            }
            Some(b) if b.is_ascii_digit() => {
                let start = self.pos;
                while self.peek().is_some_and(|b| b.is_ascii_digit()) {
                    self.pos += 1;
                }
                Ok(self.src[start..self.pos].to_string())
            }
            _ => {
                let name = self.read_identifier();
                if name.is_empty() {
                    return Err(self.error("缺少字段值"));
                }
                let resolved = self
                    .macros
                    .get(&name.to_ascii_lowercase())
                    .cloned()
                    .unwrap_or(name);
                Ok(resolved)
            }
        }
    }

    /// 跳过直到与已消费的开定界符配对的 `close`（内部花括号需平衡）
    fn skip_balanced(&mut self, close: u8) -> Result<(), CitationError> {
        let mut depth = 0usize;
        while let Some(b) = self.peek() {
            self.pos += 1;
            if b == close && depth == 0 {
                return Ok(());
            }
            match b {
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        Err(self.error("花括号不平衡"))
    }

    fn expect_close(&mut self, close: u8) -> Result<(), CitationError> {
        self.skip_whitespace();
        if self.peek() == Some(b',') {
            self.pos += 1;
            self.skip_whitespace();
        }
        if self.peek() == Some(close) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error("缺少结束定界符"))
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b':' | b'.'))
        {
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn error(&self, reason: &str) -> CitationError {
        CitationError::Malformed {
            offset: self.pos,
            reason: reason.to_string(),
        }
    }
}
