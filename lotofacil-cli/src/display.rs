use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use textplots::Plot;

use lotofacil_core::frequency::tag_scores;
use lotofacil_core::models::{CandidatePool, Draw, FrequencyVector, NumberStats, PlaySet, ScoreTag, Scores};
use lotofacil_core::pipeline::AnalysisReport;

fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:02}", n))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{}", score as u64)
    } else {
        format!("{:.4}", score)
    }
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Concours", "Date", "Numéros"]);

    for draw in draws.iter().rev() {
        let date = draw
            .date()
            .map(|d| d.format("%d/%m/%Y").to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            draw.index().to_string(),
            date,
            format_numbers(draw.numbers()),
        ]);
    }

    println!("{table}");
}

pub fn display_stats(stats: &[NumberStats], window: usize) {
    println!("\n📊 Statistiques sur les {} derniers concours\n", window);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", "Retard"]);

    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        table.add_row(vec![
            format!("{:2}", stat.number),
            stat.frequency.to_string(),
            stat.gap.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_frequency_chart(frequency: &FrequencyVector) {
    println!("\n── Fréquence par numéro ──\n");

    let points: Vec<(f32, f32)> = frequency
        .iter()
        .map(|(n, c)| (n as f32, c as f32))
        .collect();
    let y_max = points.iter().map(|p| p.1).fold(0.0f32, f32::max) + 1.0;
    let x_max = frequency.domain_size() as f32 + 1.0;

    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 0.0, x_max, 0.0, y_max);
    println!("{}", chart.lineplot(&shape));
}

pub fn display_scores(scores: &Scores, strategy: &str, pool: &CandidatePool) {
    println!("\n🎯 Scores ({strategy})\n");

    let tags = tag_scores(scores);
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Score", "Tag", "Retenu"]);

    for ranked in scores.ranked() {
        let tag = tags[(ranked.number - 1) as usize];
        let color = match tag {
            ScoreTag::Hot => Color::Green,
            ScoreTag::Cold => Color::Red,
            ScoreTag::Normal => Color::White,
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", ranked.number)),
            Cell::new(format_score(ranked.score)),
            Cell::new(tag.to_string()).fg(color),
            Cell::new(if pool.contains(ranked.number) { "✓" } else { "" }),
        ]);
    }
    println!("{table}");
}

pub fn display_pool(pool: &CandidatePool) {
    println!("\n── Numéros retenus ({}) ──", pool.len());
    println!("{}", format_numbers(pool.numbers()));
}

pub fn display_plays(plays: &PlaySet) {
    println!("\n🎲 Grilles générées\n");

    if plays.is_empty() {
        println!("Aucune grille générée.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros"]);

    for (i, play) in plays.iter().enumerate() {
        table.add_row(vec![format!("{}", i + 1), play.to_string()]);
    }
    println!("{table}");
}

pub fn display_report(report: &AnalysisReport, chart: bool) {
    println!(
        "\nAnalyse des {} derniers concours ({} → {})",
        report.window.len(),
        report.window.first().map(|d| d.index()).unwrap_or_default(),
        report.window.last().map(|d| d.index()).unwrap_or_default(),
    );
    if chart {
        display_frequency_chart(&report.frequency);
    }
    display_scores(&report.scores, &report.strategy, &report.pool);
    display_pool(&report.pool);
    display_plays(&report.plays);
}
