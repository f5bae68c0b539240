use std::io::Write;

use owo_colors::OwoColorize;
use pokegallery_core::detail::{DetailView, StatBand, capitalize_first};
use pokegallery_core::table::CatalogTable;
use pokegallery_core::{DetailRecord, Mode, Notice, NoticeLevel, ViewSnapshot};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

const BAR_WIDTH: usize = 24;

/// `25` -> `#025`
pub fn format_id(id: u32) -> String {
    format!("#{:03}", id)
}

/// Print the gallery listing for the current controller state.
pub fn print_listing(
    w: &mut dyn Write,
    view: &ViewSnapshot<'_>,
    color: ColorMode,
) -> std::io::Result<()> {
    match view.mode {
        Mode::Browse => {
            let header = format!("Pokémon ({} total)", view.total);
            if color.enabled() {
                writeln!(w, "{}", header.bold())?;
            } else {
                writeln!(w, "{}", header)?;
            }
        }
        Mode::Search => {
            if color.enabled() {
                writeln!(w, "Results for \"{}\"", view.search_text.cyan())?;
            } else {
                writeln!(w, "Results for \"{}\"", view.search_text)?;
            }
        }
    }
    writeln!(w)?;

    if view.not_found {
        if color.enabled() {
            writeln!(w, "{}", "No Pokémon found.".yellow())?;
        } else {
            writeln!(w, "No Pokémon found.")?;
        }
        return Ok(());
    }

    for record in view.records {
        print_record_line(w, record, color)?;
    }

    if view.pagination_visible {
        writeln!(w)?;
        let footer = format!("Page {} of {}", view.current_page, view.page_count);
        if color.enabled() {
            writeln!(w, "{}", footer.dimmed())?;
        } else {
            writeln!(w, "{}", footer)?;
        }
    }
    Ok(())
}

fn print_record_line(
    w: &mut dyn Write,
    record: &DetailRecord,
    color: ColorMode,
) -> std::io::Result<()> {
    let id = format_id(record.id);
    let name = capitalize_first(&record.name);
    let types = record.type_names().join("/");
    if color.enabled() {
        writeln!(w, "{:>6}  {:<24} {}", id.dimmed(), name.bold(), types.cyan())?;
    } else {
        writeln!(w, "{:>6}  {:<24} {}", id, name, types)?;
    }
    Ok(())
}

/// Print a transient notice from the controller.
pub fn print_notice(w: &mut dyn Write, notice: &Notice, color: ColorMode) -> std::io::Result<()> {
    match notice.level {
        NoticeLevel::Info => {
            if color.enabled() {
                writeln!(w, "{}", notice.message.yellow())?;
            } else {
                writeln!(w, "{}", notice.message)?;
            }
        }
        NoticeLevel::Error => {
            if color.enabled() {
                writeln!(w, "{} {}", "ERROR:".red().bold(), notice.message)?;
            } else {
                writeln!(w, "ERROR: {}", notice.message)?;
            }
        }
    }
    Ok(())
}

fn section(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", title.bold().underline())?;
    } else {
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", "-".repeat(title.chars().count()))?;
    }
    Ok(())
}

fn stat_bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Print the full detail page for one record.
pub fn print_detail(w: &mut dyn Write, view: &DetailView, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{}", view.heading.bold())?;
        writeln!(w, "{}", view.types.join(" / ").cyan())?;
    } else {
        writeln!(w, "{}", view.heading)?;
        writeln!(w, "{}", view.types.join(" / "))?;
    }
    if let Some(url) = &view.artwork_url {
        if color.enabled() {
            writeln!(w, "{}", url.dimmed())?;
        } else {
            writeln!(w, "{}", url)?;
        }
    }

    section(w, "Stats", color)?;
    for stat in &view.stats {
        let bar = stat_bar(stat.percent);
        if color.enabled() {
            let bar = match stat.band {
                StatBand::Excellent => bar.green().to_string(),
                StatBand::Good => bar.blue().to_string(),
                StatBand::Fair => bar.yellow().to_string(),
                StatBand::Low => bar.red().to_string(),
            };
            writeln!(w, "{:<16} {:>3} {}", stat.label, stat.value, bar)?;
        } else {
            writeln!(w, "{:<16} {:>3} {}", stat.label, stat.value, bar)?;
        }
    }

    section(w, "Details", color)?;
    writeln!(w, "Height: {:.1} m", view.height_m)?;
    writeln!(w, "Weight: {:.1} kg", view.weight_kg)?;
    if let Some(exp) = view.base_experience {
        writeln!(w, "Base experience: {}", exp)?;
    }
    if !view.abilities.is_empty() {
        writeln!(w, "Abilities:")?;
        for ability in &view.abilities {
            if ability.hidden {
                if color.enabled() {
                    writeln!(w, "  {} {}", ability.label, "(hidden)".dimmed())?;
                } else {
                    writeln!(w, "  {} (hidden)", ability.label)?;
                }
            } else {
                writeln!(w, "  {}", ability.label)?;
            }
        }
    }
    if let Some(entry) = &view.pokedex_entry {
        writeln!(w)?;
        if color.enabled() {
            writeln!(w, "{}", entry.italic())?;
        } else {
            writeln!(w, "{}", entry)?;
        }
    }

    if !view.moves.is_empty() {
        section(w, "Moves", color)?;
        for mv in &view.moves {
            let learned = if mv.learned == "TM/TR" {
                mv.learned.clone()
            } else {
                format!("Lv. {}", mv.learned)
            };
            if color.enabled() {
                writeln!(w, "{:<24} {}", mv.label, learned.dimmed())?;
            } else {
                writeln!(w, "{:<24} {}", mv.label, learned)?;
            }
        }
    }
    Ok(())
}

/// Print the current page of the catalog table.
pub fn print_table(
    w: &mut dyn Write,
    table: &CatalogTable,
    color: ColorMode,
) -> std::io::Result<()> {
    let header = format!(
        "{:>6}  {:<20} {:>8} {:>9}",
        "ID", "Name", "Height", "Weight"
    );
    if color.enabled() {
        writeln!(w, "{}", header.bold())?;
    } else {
        writeln!(w, "{}", header)?;
        writeln!(w, "{}", "-".repeat(header.len()))?;
    }

    let rows = table.page_rows();
    if rows.is_empty() {
        writeln!(w, "No results.")?;
    }
    for row in rows {
        writeln!(
            w,
            "{:>6}  {:<20} {:>6.1} m {:>6.1} kg",
            format_id(row.id),
            capitalize_first(&row.name),
            f64::from(row.height) / 10.0,
            f64::from(row.weight) / 10.0,
        )?;
    }

    let footer = format!(
        "Page {} of {} ({} of {} rows)",
        table.current_page(),
        table.page_count(),
        table.visible_rows().len(),
        table.len()
    );
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", footer.dimmed())?;
    } else {
        writeln!(w, "{}", footer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pokegallery_core::detail::DetailView;
    use pokegallery_core::model::{NamedResource, StatEntry};
    use pokegallery_core::source::mock::mock_record;
    use pokegallery_core::table::TableRow;

    fn render(f: impl FnOnce(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn snapshot<'a>(records: &'a [DetailRecord], mode: Mode, not_found: bool) -> ViewSnapshot<'a> {
        ViewSnapshot {
            mode,
            search_text: if mode == Mode::Search { "pika" } else { "" },
            loading: false,
            not_found,
            records,
            total: 45,
            current_page: 2,
            page_size: 20,
            page_count: 3,
            pagination_visible: mode == Mode::Browse && !not_found,
        }
    }

    #[test]
    fn browse_listing_shows_rows_and_page_footer() {
        let records = vec![mock_record(25, "pikachu")];
        let out = render(|w| print_listing(w, &snapshot(&records, Mode::Browse, false), ColorMode(false)));
        assert!(out.contains("Pokémon (45 total)"));
        assert!(out.contains("#025  Pikachu"));
        assert!(out.contains("normal"));
        assert!(out.contains("Page 2 of 3"));
    }

    #[test]
    fn search_listing_hides_pagination() {
        let records = vec![mock_record(25, "pikachu")];
        let out = render(|w| print_listing(w, &snapshot(&records, Mode::Search, false), ColorMode(false)));
        assert!(out.contains("Results for \"pika\""));
        assert!(!out.contains("Page 2"));
    }

    #[test]
    fn not_found_listing() {
        let out = render(|w| print_listing(w, &snapshot(&[], Mode::Search, true), ColorMode(false)));
        assert!(out.contains("No Pokémon found."));
    }

    #[test]
    fn error_notice_is_prefixed() {
        let notice = Notice {
            level: NoticeLevel::Error,
            message: "Failed to load Pokémon list".into(),
        };
        let out = render(|w| print_notice(w, &notice, ColorMode(false)));
        assert_eq!(out, "ERROR: Failed to load Pokémon list\n");
    }

    #[test]
    fn detail_page_lists_stats_and_measurements() {
        let mut record = mock_record(25, "pikachu");
        record.height = 4;
        record.weight = 60;
        record.stats = vec![StatEntry {
            base_stat: 255,
            stat: NamedResource::new("hp"),
        }];
        let view = DetailView::build(&record, None);
        let out = render(|w| print_detail(w, &view, ColorMode(false)));
        assert!(out.starts_with("Pikachu #025\n"));
        let full_bar = format!("{:<16} {:>3} {}", "Hp", 255, "█".repeat(BAR_WIDTH));
        assert!(out.contains(&full_bar));
        assert!(out.contains("Height: 0.4 m"));
        assert!(out.contains("Weight: 6.0 kg"));
    }

    #[test]
    fn table_prints_page_footer() {
        let rows = (1..=7)
            .map(|i| TableRow {
                id: i,
                name: format!("mon-{i}"),
                height: i,
                weight: i * 10,
            })
            .collect();
        let table = CatalogTable::new(rows, 5);
        let out = render(|w| print_table(w, &table, ColorMode(false)));
        assert!(out.contains("#001  Mon-1"));
        assert!(!out.contains("Mon-6"));
        assert!(out.contains("Page 1 of 2 (7 of 7 rows)"));
    }

    #[test]
    fn stat_bar_is_clamped() {
        assert_eq!(stat_bar(0.0), "░".repeat(BAR_WIDTH));
        assert_eq!(stat_bar(150.0).chars().count(), BAR_WIDTH);
    }
}
