//! `collage plan --count N` – dry run of the layout engine.

use anyhow::Result;
use collage_core::config::CollageConfig;
use collage_core::layout::LayoutPlan;

pub fn run_plan(cfg: &CollageConfig, count: usize) -> Result<()> {
    let layout = cfg.layout.layout_config();
    let plan = LayoutPlan::uniform(count, &layout)?;

    println!(
        "canvas {}x{} ({} rows x {} columns, cell {}x{}, margin {})",
        plan.canvas.width,
        plan.canvas.height,
        plan.rows,
        layout.columns,
        plan.cell.width,
        plan.cell.height,
        layout.margin
    );
    for p in &plan.placements {
        println!(
            "{:>4}  row {:>3}  col {:>3}  x {:>6}  y {:>6}",
            p.image_index, p.row, p.column, p.x, p.y
        );
    }
    Ok(())
}
