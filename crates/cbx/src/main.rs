use anyhow::Context;

use cbx_core::{config::Config, render_summary};

fn main() -> anyhow::Result<()> {
    cbx_core::logging::init("cbx")?;

    let cfg = Config::load().context("resolving project directories")?;
    println!("ContentBot key extractor");
    println!("Sources: {}, {}", cfg.ikar_dir.display(), cfg.parser_dir.display());
    println!("Destination: {}", cfg.contentbot_dir.display());

    let report = cbx_core::run(&cfg)
        .with_context(|| format!("provisioning {}", cfg.contentbot_dir.display()))?;

    print!("{}", render_summary(&report));
    Ok(())
}
