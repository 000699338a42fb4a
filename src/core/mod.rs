//! Core模块 - 包含所有核心业务逻辑

pub mod models;
pub mod tag_tree;
pub mod bibtex;
pub mod ruleset;
pub mod codec;
pub mod session;
