//! Tooltip Demo
//!
//! Builds a small page, binds two plugins to it through `data-*` attributes
//! and prints the resulting markup.
//!
//! ```text
//! <ul data-toggle="hide">
//!   <li data-tooltip="show: Save, Ctrl+S">
//!   <li data-tooltip="show: Quit; unknown">     unknown method, skipped
//!   <li data-missing="anything">                 unknown plugin, skipped
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package tooltip-demo -- --config ./seam.toml
//! SEAM_LOGGING__LEVEL=debug cargo run --package tooltip-demo
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use seam::prelude::*;
use seam::runtime::ConfigLoader;
use serde_json::json;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Apply tooltip plugins to a sample element tree")]
struct Args {
    /// Configuration file (defaults to seam.toml in the working directory).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Configuration profile, overriding SEAM_PROFILE.
    #[arg(short, long)]
    profile: Option<String>,
}

// ============================================================================
// Plugins
// ============================================================================

fn tooltip_plugin() -> Arc<Plugin<Element>> {
    define_plugin! {
        node: Element,
        methods: {
            show: |this, node, params| {
                if params.is_empty() {
                    return Err(PluginError::new("show needs at least one line of text"));
                }
                let separator = this
                    .value("separator")
                    .and_then(|v| v.as_str())
                    .unwrap_or(" ");
                node.set_attribute("title", params.join(separator));
                node.set_attribute("role", "tooltip");
                Ok(())
            },
        },
        values: {
            separator: " / ",
            defaults: json!({ "delay_ms": 300 }),
        },
    }
}

fn toggle_plugin() -> Arc<Plugin<Element>> {
    define_plugin! {
        node: Element,
        methods: {
            hide: |_this, node, _params| {
                node.set_attribute("hidden", "");
                Ok(())
            },
            show: |_this, node, _params| {
                node.remove_attribute("hidden");
                Ok(())
            },
        },
    }
}

// ============================================================================
// Page
// ============================================================================

fn sample_page(prefix: &str) -> Element {
    let attr = |plugin: &str| format!("{prefix}{plugin}");

    Element::new("nav").with_child(
        Element::new("ul")
            .with_attr(attr("toggle"), "hide")
            .with_child(
                Element::new("li")
                    .with_attr(attr("tooltip"), "show: Save, Ctrl+S")
                    .with_text("Save"),
            )
            .with_child(
                Element::new("li")
                    .with_attr(attr("tooltip"), "show: Quit; unknown")
                    .with_text("Quit"),
            )
            .with_child(
                Element::new("li")
                    .with_attr(attr("missing"), "anything")
                    .with_text("Help"),
            ),
    )
}

// ============================================================================
// Main
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.file(path);
    }
    if let Some(profile) = &args.profile {
        loader = loader.profile(profile);
    }

    let runtime = SeamRuntime::from_loader(loader)?;
    runtime.init_logging();

    let seam = runtime.engine_with([("tooltip", tooltip_plugin()), ("toggle", toggle_plugin())]);
    info!(plugins = ?seam.names(), prefix = %seam.prefix(), "Engine ready");

    let page = sample_page(seam.prefix());
    let (_, stats) = seam.apply_with_stats(&page)?;
    info!(%stats, "Page bound");

    println!("{page}");

    // Re-run only the list through the plugin's own binding.
    let children = page.element_children();
    if let Some(list) = children.first()
        && let Some(binding) = seam.get("toggle").and_then(|p| p.plugins())
    {
        list.set_attribute(format!("{}toggle", seam.prefix()), "show");
        binding.apply(list)?;
        println!("{page}");
    }

    Ok(())
}
