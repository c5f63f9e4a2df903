//! PluginShell 主程序 - 配置驱动运行
//!
//! 加载模块目录、构建导出树并监控目录文件变化

use anyhow::{Context, Result};
use plugin_shell::{
    config::{generate_default_config_file, ConfigManager, LoggingConfig},
    CatalogWatcher, ExportNode, ModuleManager,
};
use std::env;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_CONFIG_PATH: &str = "plugin_shell.yaml";

/// 程序入口点
#[tokio::main]
async fn main() {
    // 运行主逻辑并处理错误
    if let Err(e) = run_main().await {
        // 配置加载前失败时日志尚未初始化
        let _ = plugin_shell::initialize(&LoggingConfig::default());
        tracing::error!("❌ 程序运行失败: {:#}", e);
        std::process::exit(1);
    }
}

/// 主要逻辑函数
async fn run_main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    match args.as_slice() {
        [_, command] if command == "init" => generate_config_file().await,
        [_, command, path] if command == "tree" => print_tree_once(path).await,
        [_, path] => run_with_config_file(path).await,
        _ => {
            print_usage();
            Ok(())
        }
    }
}

/// 加载配置、发现模块并构建第一棵导出树
async fn prepare_manager(config_path: &str) -> Result<Option<Arc<ModuleManager>>> {
    if !Path::new(config_path).exists() {
        plugin_shell::initialize(&LoggingConfig::default())?;
        tracing::error!("❌ 配置文件不存在: {}", config_path);
        tracing::info!("💡 使用 'plugin_shell init' 生成默认配置文件");
        return Ok(None);
    }

    let config_manager = ConfigManager::load_from_file(config_path)
        .await
        .with_context(|| format!("加载配置文件 {} 失败", config_path))?;
    plugin_shell::initialize(&config_manager.get_config().logging)?;
    config_manager.validate()?;

    let config = config_manager.into_config();
    tracing::info!("📄 配置文件: {}", config_path);
    tracing::info!("📂 模块目录: {:?}", config.modules_root);

    let discover = config.discover_modules;
    let manager = Arc::new(ModuleManager::new(config));
    if discover {
        manager
            .discover_modules()
            .await
            .context("扫描模块目录失败")?;
    }
    manager
        .reload_and_rebuild()
        .await
        .context("构建导出树失败")?;

    let pending = manager.list_pending();
    if !pending.is_empty() {
        tracing::warn!("⏳ 等待安装的模块: {}", pending.join(", "));
    }

    Ok(Some(manager))
}

/// 使用配置文件运行，直到收到 Ctrl-C
async fn run_with_config_file(config_path: &str) -> Result<()> {
    let Some(manager) = prepare_manager(config_path).await? else {
        return Ok(());
    };
    tracing::info!("🚀 启动 PluginShell");
    print_tree(&manager.export_tree(), 0);

    manager.start_all().await?;

    let mut watcher = if manager.config().watch_catalog {
        Some(CatalogWatcher::spawn(manager.clone())?)
    } else {
        None
    };

    tracing::info!("👀 运行中，按 Ctrl-C 退出");
    tokio::signal::ctrl_c().await?;

    if let Some(watcher) = watcher.as_mut() {
        watcher.stop();
    }
    manager.shutdown_all().await?;

    tracing::info!("🎉 已退出");
    Ok(())
}

/// 只打印一次导出树
async fn print_tree_once(config_path: &str) -> Result<()> {
    if let Some(manager) = prepare_manager(config_path).await? {
        print_tree(&manager.export_tree(), 0);
    }
    Ok(())
}

/// 生成默认配置文件
async fn generate_config_file() -> Result<()> {
    plugin_shell::initialize(&LoggingConfig::default())?;
    tracing::info!("📝 生成默认配置文件: {}", DEFAULT_CONFIG_PATH);

    generate_default_config_file(DEFAULT_CONFIG_PATH).await?;

    tracing::info!("✅ 配置文件生成完成");
    tracing::info!("🔧 请编辑配置文件后运行: plugin_shell {}", DEFAULT_CONFIG_PATH);
    Ok(())
}

/// 按缩进打印导出树
fn print_tree(node: &ExportNode, depth: usize) {
    let indent = "  ".repeat(depth);
    if depth == 0 {
        println!("{} [{}]", node.id, node.tag);
    } else {
        let area = if node.area.is_empty() { "shell" } else { node.area.as_str() };
        let marker = if node.placeholder { " (placeholder)" } else { "" };
        println!(
            "{}- {} [{}] order={} area={}{}",
            indent, node.title, node.tag, node.order, area, marker
        );
    }

    for child in &node.children {
        print_tree(child, depth + 1);
    }
}

/// 打印使用说明
fn print_usage() {
    println!("PluginShell 模块宿主");
    println!();
    println!("用法:");
    println!("  plugin_shell init                  # 生成默认配置文件");
    println!("  plugin_shell <config_file>         # 使用指定配置文件运行");
    println!("  plugin_shell tree <config_file>    # 打印导出树后退出");
    println!();
    println!("示例:");
    println!("  plugin_shell init");
    println!("  plugin_shell plugin_shell.yaml");
    println!();
    println!("配置文件格式: YAML 或 TOML");
}
