//! Terminal rendering of battle views and summaries.

use console::style;

use battle_core::{BattleEvent, BattleView, EventKind, MetaValue, RewardReport, SideView, UnitView};

pub fn print_view(view: &BattleView) {
    println!(
        "{} tick {}/{}  {}",
        style("Battle").bold().cyan(),
        view.tick,
        view.tick_limit,
        style(view.phase).bold()
    );
    if let Some(tag) = &view.awaiting {
        println!("{} {}", style("Awaiting:").bold().yellow(), tag);
    }
    if let Some(winner) = view.winner {
        println!("{} {}", style("Winner:").bold().green(), winner);
    }
    println!();

    print_side("Player", &view.player);
    print_side("Enemy", &view.enemy);

    if !view.log.is_empty() {
        println!("{}", style("Log:").bold().yellow());
        for event in &view.log {
            println!("  {}", format_event(event));
        }
    }
}

fn print_side(label: &str, side: &SideView) {
    println!("{}", style(format!("{label}:")).bold().yellow());
    for unit in side.front.iter().chain(&side.back) {
        print_unit(unit);
    }
    println!();
}

fn print_unit(unit: &UnitView) {
    let hp = format!("{}/{}", unit.hp, unit.max_hp);
    let hp = if unit.alive {
        style(hp).green()
    } else {
        style(hp).red().dim()
    };
    println!(
        "  {:<6} {:<2} {:<16} Lv{:<3} HP {:<9} AP {:<4} dmg {:<5} kills {}",
        unit.row.as_ref(),
        unit.slot,
        unit.name,
        unit.level,
        hp,
        unit.ap,
        unit.damage_dealt,
        unit.kills
    );
}

pub fn format_event(event: &BattleEvent) -> String {
    let mut line = format!("[{:>4}] {:<7}", event.tick, event.kind.as_ref());
    if let Some(source) = &event.source {
        line.push_str(&format!(" {source}"));
    }
    if let Some(target) = &event.target {
        line.push_str(&format!(" -> {target}"));
    }
    if let Some(value) = event.value {
        line.push_str(&format!(" ({value})"));
    }
    for (key, value) in &event.meta {
        match value {
            MetaValue::Int(n) => line.push_str(&format!(" {key}={n}")),
            MetaValue::Text(s) => line.push_str(&format!(" {key}={s}")),
        }
    }
    match event.kind {
        EventKind::Error => style(line).red().to_string(),
        EventKind::Death => style(line).dim().to_string(),
        _ => line,
    }
}

pub fn print_rewards(report: &RewardReport) {
    println!("{}", style("=== Battle Summary ===").bold().green());
    println!("  Winner: {}", report.winner);
    match &report.mvp {
        Some(mvp) => println!("  MVP: {} ({}) {} damage", mvp.name, mvp.tag, mvp.damage_dealt),
        None => println!("  MVP: -"),
    }
    if let Some(hit) = &report.highlights.biggest_hit {
        println!("  Biggest hit: {}", format_event(hit));
    }
    if let Some(death) = &report.highlights.first_death {
        println!("  First death: {}", format_event(death));
    }
    println!("{}", style("XP:").bold().yellow());
    for (hero, xp) in &report.xp {
        println!("  hero {hero}: +{xp}");
    }
    println!("  total: {}", report.total_xp());
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::UnitTag;

    #[test]
    fn event_line_lists_tags_value_and_meta() {
        console::set_colors_enabled(false);
        let knight = UnitTag::new("player#1");
        let grub = UnitTag::new("enemy~0");
        let event = BattleEvent::new(12, EventKind::Attack)
            .with_source(&knight)
            .with_target(&grub)
            .with_value(23)
            .with_meta("row", "front")
            .with_meta("target_hp", 27_i64);

        assert_eq!(
            format_event(&event),
            "[  12] attack  player#1 -> enemy~0 (23) row=front target_hp=27"
        );
    }
}
