use std::fmt::Write as _;

use console::Style;
use saramsa_config::Theme;
use saramsa_core::{ReelData, format_count, format_duration};

#[derive(Debug, Clone)]
pub struct Palette {
    accent: Style,
    heading: Style,
    muted: Style,
    tag: Style,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                accent: Style::new().cyan().bold(),
                heading: Style::new().white().bold(),
                muted: Style::new().dim(),
                tag: Style::new().magenta(),
            },
            Theme::Light => Self {
                accent: Style::new().blue().bold(),
                heading: Style::new().black().bold(),
                muted: Style::new().black().dim(),
                tag: Style::new().blue(),
            },
        }
    }

    pub fn plain() -> Self {
        Self {
            accent: Style::new(),
            heading: Style::new(),
            muted: Style::new(),
            tag: Style::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Full,
    Simple,
    Json,
}

pub fn render(data: &ReelData, mode: OutputMode, palette: &Palette) -> String {
    match mode {
        OutputMode::Full => render_full(data, palette),
        OutputMode::Simple => format!("{}\n", data.transcript),
        OutputMode::Json => match serde_json::to_string_pretty(data) {
            Ok(json) => format!("{json}\n"),
            Err(err) => json_error(&err.to_string()),
        },
    }
}

fn json_error(message: &str) -> String {
    format!("{}\n", serde_json::json!({ "error": message }))
}

fn render_full(data: &ReelData, palette: &Palette) -> String {
    let mut out = String::new();

    let mut stats = vec![("Views", format_count(data.view_count.as_ref()))];
    if data.like_count.is_some() {
        stats.push(("Likes", format_count(data.like_count.as_ref())));
    }
    if data.comment_count.is_some() {
        stats.push(("Comments", format_count(data.comment_count.as_ref())));
    }
    stats.push(("Duration", format_duration(&data.duration)));
    stats.push(("Language", data.language.to_uppercase()));

    let line = stats
        .iter()
        .map(|(label, value)| format!("{} {}", palette.muted.apply_to(label), palette.accent.apply_to(value)))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{line}");

    match (data.author.as_deref(), data.author_profile_url()) {
        (Some(author), Some(profile)) => {
            let handle = format!("@{}", author.trim().trim_start_matches('@'));
            let _ = writeln!(
                out,
                "{} {} {}",
                palette.muted.apply_to("Creator:"),
                palette.accent.apply_to(handle),
                palette.muted.apply_to(format!("({profile})"))
            );
        }
        _ => {
            let _ = writeln!(out, "{} Instagram", palette.muted.apply_to("Creator:"));
        }
    }
    let _ = writeln!(
        out,
        "{} {}",
        palette.muted.apply_to("View original:"),
        data.source_url
    );

    section(&mut out, palette, "Caption", &data.caption);
    section(&mut out, palette, "Transcript", &data.transcript);

    if !data.hashtags.is_empty() {
        let tags = data
            .hashtags
            .iter()
            .map(|tag| palette.tag.apply_to(format!("#{tag}")).to_string())
            .collect::<Vec<_>>()
            .join(" ");
        section(&mut out, palette, "Tags", &tags);
    }

    out
}

fn section(out: &mut String, palette: &Palette, title: &str, body: &str) {
    let _ = writeln!(out, "\n{}", palette.heading.apply_to(title));
    for line in body.lines() {
        let _ = writeln!(out, "  {line}");
    }
}
