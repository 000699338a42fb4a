//! Screener - 文献筛选工具
//!
//! 逐篇粘贴 BibTeX 引文，按规则勾选是否通过，
//! 用层级标签归类，最终导出为 JSON 数据集。

pub mod core;
pub mod storage;
pub mod ui;

use anyhow::Result;
use eframe::egui::{self, FontData, FontDefinitions, FontFamily};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// 配置中文字体
fn setup_custom_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();

    let font_paths = [
        "C:/Windows/Fonts/msyh.ttc",
        "C:/Windows/Fonts/simhei.ttf",
        "/System/Library/Fonts/PingFang.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    ];

    let loaded = font_paths.iter().find_map(|path| {
        std::fs::read(path).ok().map(|data| (*path, data))
    });

    match loaded {
        Some((path, data)) => {
            fonts
                .font_data
                .insert("cjk".to_owned(), FontData::from_owned(data).into());
            for family in [FontFamily::Proportional, FontFamily::Monospace] {
                fonts
                    .families
                    .entry(family)
                    .or_default()
                    .insert(0, "cjk".to_owned());
            }
            tracing::info!("已加载中文字体: {}", path);
        }
        None => tracing::warn!("未能加载中文字体，界面可能显示乱码"),
    }

    ctx.set_fonts(fonts);
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("启动 Screener");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 800.0])
            .with_min_inner_size([720.0, 520.0])
            .with_title("Screener - 文献筛选"),
        ..Default::default()
    };

    eframe::run_native(
        "Screener",
        options,
        Box::new(|cc| {
            setup_custom_fonts(&cc.egui_ctx);
            Ok(Box::new(ui::app::ScreenerApp::new(cc)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI启动失败: {}", e))?;

    Ok(())
}
