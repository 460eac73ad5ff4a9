//! Terminal output for rolls, initiative, and odds.

use std::fmt::Write as _;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use st_mechanics::{
    ChannelId, FaceKind, InitiativeEntry, PoolVerdict, ProbabilityRecord, RenderedTable,
    RollOptions, RollResult, TraditionalRollResult,
};

/// A finished pool roll and the context it was made in.
pub struct PoolView<'a> {
    pub options: &'a RollOptions,
    pub result: &'a RollResult,
    pub specialty: Option<&'a str>,
    pub comment: Option<&'a str>,
}

fn pluralize(count: i32, singular: &str, plural: &str) -> String {
    if count.abs() == 1 {
        format!("{count:+} {singular}")
    } else {
        format!("{count:+} {plural}")
    }
}

fn pool_title(options: &RollOptions, result: &RollResult) -> String {
    let mut title = if options.chronicles_mode {
        format!("Pool {}, {}-again", options.pool, options.explosion_target)
    } else {
        format!("Pool {}, diff. {}", options.pool, options.difficulty)
    };
    if options.auto_successes != 0 {
        let autos = pluralize(options.auto_successes, "success", "successes");
        let _ = write!(title, ", {autos}");
    }
    if options.never_botch && !options.chronicles_mode {
        title.push_str(", no botch");
    }
    match result.explosion_count {
        0 => {}
        1 => title.push_str(" (+1 explosion)"),
        n => {
            let _ = write!(title, " (+{n} explosions)");
        }
    }
    title
}

fn pool_dice(options: &RollOptions, result: &RollResult) -> String {
    let faces: Vec<String> = result
        .dice
        .iter()
        .map(|&face| {
            let text = face.to_string();
            match options.classify(face) {
                FaceKind::DoubleSuccess => text.green().bold().to_string(),
                FaceKind::Success => text.green().to_string(),
                FaceKind::Failure => text.dimmed().to_string(),
                FaceKind::One => text.red().bold().to_string(),
            }
        })
        .collect();

    let mut dice = faces.join(", ");
    if options.grants_willpower_success() {
        dice.push_str(" +WP");
    }
    if options.auto_successes > 0 {
        let _ = write!(dice, " +{}", options.auto_successes);
    }
    dice
}

fn verdict(result: &RollResult) -> String {
    let verdict = result.verdict();
    let text = verdict.to_string();
    match verdict {
        PoolVerdict::Successes(n) if n >= 5 => text.green().bold().to_string(),
        PoolVerdict::Successes(n) if n >= 3 => text.green().to_string(),
        PoolVerdict::Successes(_) => text.cyan().to_string(),
        PoolVerdict::Failure => text.dimmed().to_string(),
        PoolVerdict::Botch(_) => text.red().bold().to_string(),
    }
}

/// Render a pool roll.
pub fn pool(view: &PoolView<'_>, compact: bool) -> String {
    let PoolView {
        options,
        result,
        specialty,
        comment,
    } = *view;
    let mut out = String::new();

    if compact {
        if let Some(comment) = comment {
            let _ = writeln!(out, "> {comment}\n");
        }
        out.push_str(&pool_dice(options, result));
        if let Some(specialty) = specialty {
            let _ = write!(out, "   ({specialty})");
        }
        let _ = writeln!(out, "\n{}", verdict(result));
        return out;
    }

    let _ = writeln!(out, "  {}", pool_title(options, result).bold());
    let _ = writeln!(out, "  Dice:      {}", pool_dice(options, result));
    if let Some(specialty) = specialty {
        let _ = writeln!(out, "  Specialty: {specialty}");
    }
    let _ = writeln!(out, "  Result:    {}", verdict(result));
    if let Some(comment) = comment {
        let _ = writeln!(out, "  {}", comment.italic());
    }
    out
}

/// Render a traditional roll.
pub fn traditional(
    expression: &str,
    result: &TraditionalRollResult,
    comment: Option<&str>,
    compact: bool,
) -> String {
    let mut out = String::new();
    let hint = result
        .looks_like_initiative
        .then_some("Rolling initiative? Try `st init roll <character> <modifier>`.");

    if compact {
        if let Some(comment) = comment {
            let _ = writeln!(out, "> {comment}\n");
        }
        let _ = writeln!(out, "{result}");
        if let Some(hint) = hint {
            let _ = writeln!(out, "{}", hint.dimmed());
        }
        return out;
    }

    let _ = writeln!(out, "  {}", expression.bold());
    if result.components.len() > 1 {
        let _ = writeln!(out, "  Dice:   {result}");
    }
    let _ = writeln!(
        out,
        "  Result: {}",
        result.total.to_string().green().bold()
    );
    if let Some(comment) = comment {
        let _ = writeln!(out, "  {}", comment.italic());
    }
    if let Some(hint) = hint {
        let _ = writeln!(out, "  {}", hint.dimmed());
    }
    out
}

/// Render one character's fresh initiative.
pub fn initiative_entry(entry: &InitiativeEntry) -> String {
    format!(
        "  {} {}\n",
        format!("{}:", entry.character_name).bold(),
        entry
    )
}

/// Render a channel's turn order.
pub fn initiative_table(channel: &ChannelId, table: Option<&RenderedTable>) -> String {
    let Some(table) = table.filter(|t| !t.rows.is_empty()) else {
        return format!("  No initiative set in channel {channel}.\n");
    };

    let mut grid = Table::new();
    grid.set_content_arrangement(ContentArrangement::Dynamic);
    grid.set_header(vec!["Score", "Character", "Die", "Mod", "Action"]);
    for row in &table.rows {
        grid.add_row(vec![
            row.score.to_string(),
            row.character.clone(),
            row.die.to_string(),
            format!("{:+}", row.modifier),
            row.declared_action.clone().unwrap_or_default(),
        ]);
    }

    let mut out = format!("{grid}\n");
    let mut extras: Vec<_> = table.rows.iter().filter(|r| r.extra_actions > 0).collect();
    if !extras.is_empty() {
        extras.sort_by(|a, b| a.character.cmp(&b.character));
        let _ = writeln!(out, "\n  {}", "Extra actions".bold().underline());
        for row in extras {
            let _ = writeln!(out, "  {} ({})", row.character, row.extra_actions);
        }
    }
    out
}

fn percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

/// Render the odds for one pool, difficulty, and target.
pub fn probability(pool: i32, difficulty: i32, target: i32, record: &ProbabilityRecord) -> String {
    let mut grid = Table::new();
    grid.set_content_arrangement(ContentArrangement::Dynamic);
    grid.set_header(vec!["", "Plain", "Specialty"]);
    grid.add_row(vec![
        "Average successes".to_string(),
        format!("{:.2}", record.avg_successes),
        format!("{:.2}", record.avg_successes_with_specialty),
    ]);
    grid.add_row(vec![
        format!("At least {target}"),
        percent(record.prob_success),
        percent(record.prob_success_with_specialty),
    ]);
    grid.add_row(vec![
        format!("At least {target} with Willpower"),
        percent(record.prob_success_with_willpower),
        percent(record.prob_success_with_specialty_and_willpower),
    ]);
    grid.add_row(vec![
        "Failure".to_string(),
        percent(record.prob_failure),
        percent(record.prob_failure_with_specialty),
    ]);
    grid.add_row(vec![
        "Botch".to_string(),
        percent(record.prob_botch),
        "-".to_string(),
    ]);

    let title = format!("Pool {pool}, diff. {difficulty}, target {target}");
    format!("  {}\n{grid}\n", title.bold())
}

#[cfg(test)]
mod tests {
    use super::*;
    use st_mechanics::{ScriptedDice, evaluate_pool};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn pool_title_mentions_modifiers() {
        let options = RollOptions::new(5, 7)
            .with_auto_successes(2)
            .with_never_botch(true);
        let result = RollResult::score(&options, vec![8, 3, 3, 2, 2], 2);
        assert_eq!(
            pool_title(&options, &result),
            "Pool 5, diff. 7, +2 successes, no botch (+2 explosions)"
        );

        let options = RollOptions::chronicles(4, 8, 9);
        let result = RollResult::score(&options, vec![8, 3, 3, 2], 0);
        assert_eq!(pool_title(&options, &result), "Pool 4, 9-again");
    }

    #[test]
    fn compact_pool_output() {
        plain();
        let options = RollOptions::new(5, 6).with_willpower(true);
        let mut dice = ScriptedDice::new([9, 7, 3, 2, 1]);
        let result = evaluate_pool(&options, &mut dice).unwrap();
        let view = PoolView {
            options: &options,
            result: &result,
            specialty: Some("Brawl"),
            comment: Some("punch"),
        };
        assert_eq!(
            pool(&view, true),
            "> punch\n\n9, 7, 3, 2, 1 +WP   (Brawl)\n2 successes\n"
        );
    }

    #[test]
    fn empty_table_message() {
        let out = initiative_table(&ChannelId::from("tavern"), None);
        assert!(out.contains("No initiative set in channel tavern"));
    }

    #[test]
    fn percentages() {
        assert_eq!(percent(0.5), "50.00%");
        assert_eq!(percent(0.1234), "12.34%");
    }
}
