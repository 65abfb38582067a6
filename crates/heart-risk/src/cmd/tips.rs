use anyhow::Result;
use risk_spec::render::{info_view, render_tips_text};

use super::Context;

pub fn run(ctx: &Context) -> Result<()> {
    let tables = ctx.tables()?;
    println!("{}", render_tips_text(&info_view(&tables, ctx.language)));
    Ok(())
}
