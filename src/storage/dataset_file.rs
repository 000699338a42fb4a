//! 数据集文件读写
//!
//! 只负责文本与磁盘之间的搬运，JSON 的解析与生成由会话和编解码模块完成。

use anyhow::{Context, Result};
use std::path::Path;

/// 读取文本文件（数据集或规则文件）
pub fn read_text(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("读取文件失败: {}", path.display()))?;
    tracing::info!("已读取 {} ({} 字节)", path.display(), text.len());
    Ok(text)
}

/// 写出文本文件，必要时创建上级目录
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("创建目录失败: {}", parent.display()))?;
    }
    std::fs::write(path, text).with_context(|| format!("写入文件失败: {}", path.display()))?;
    tracing::info!("已写出: {}", path.display());
    Ok(())
}
