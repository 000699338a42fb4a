//! 存储模块 - 配置文件与数据集文件

pub mod config;
pub mod dataset_file;
