pub mod app;
pub mod article_panel;
pub mod article_table;
pub mod dialogs;
pub mod rule_panel;
pub mod styles;
pub mod tag_view;
