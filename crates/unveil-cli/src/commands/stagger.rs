use anyhow::Result;

use unveil_core::{AppConfig, StaggerGroup, StaggerMode};

pub fn run(
    config: &AppConfig,
    mode: StaggerMode,
    base: Option<u64>,
    step: Option<u64>,
    count: usize,
) -> Result<()> {
    let group = schedule(config, mode, base, step);

    println!("{:?} stagger, {} children:\n", mode, count);
    for (index, delay) in group.delays(mode, count).iter().enumerate() {
        println!("  [{:>2}] {:>5}ms", index, delay);
    }

    Ok(())
}

/// Configured schedule with command-line overrides applied
fn schedule(config: &AppConfig, mode: StaggerMode, base: Option<u64>, step: Option<u64>) -> StaggerGroup {
    match mode {
        StaggerMode::Group => {
            let defaults = config.stagger.group();
            StaggerGroup::new(
                base.unwrap_or(defaults.base_delay_ms),
                step.unwrap_or(defaults.step_delay_ms),
            )
        }
        StaggerMode::PerItem => {
            let defaults = config.stagger.per_item();
            StaggerGroup::new(base.unwrap_or(defaults.base_delay_ms), 0).with_cap(defaults.cap_ms)
        }
    }
}
