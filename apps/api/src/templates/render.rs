//! Portfolio rendering: fills an HTML page from a `PortfolioSchema` and the chosen
//! template's display metadata, then writes it into the output directory.
//!
//! Recognized metadata keys: `layout` (`single-column` | `sidebar` | `split`),
//! `accent_color`, `font_family`. Unknown or missing keys fall back to defaults.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::profile::schema::PortfolioSchema;
use crate::templates::registry::TemplateDescriptor;

const DEFAULT_ACCENT: &str = "#1f2937";
const DEFAULT_FONT: &str = "Inter, system-ui, sans-serif";

/// Page skeleton. Replace every `{...}` placeholder before writing.
const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<meta name="generator" content="portfolio-api; template={template_id}">
<title>{name}</title>
<style>
:root { --accent: {accent}; }
body { font-family: {font}; margin: 0; color: #111827; }
header { padding: 3rem 2rem; border-bottom: 4px solid var(--accent); }
h1 { margin: 0; color: var(--accent); }
main { padding: 2rem; gap: 2rem; }
.layout-sidebar main { display: grid; grid-template-columns: 16rem 1fr; }
.layout-split main { display: grid; grid-template-columns: 1fr 1fr; }
.skills li { display: inline-block; margin: 0 .5rem .5rem 0; padding: .25rem .75rem; border: 1px solid var(--accent); border-radius: 999px; }
footer { padding: 1rem 2rem; font-size: .8rem; color: #6b7280; }
</style>
</head>
<body class="layout-{layout}">
<header>
<h1>{name}</h1>
<p class="headline">{headline}</p>
</header>
<main>
<section class="skills">
<h2>Skills</h2>
<ul>{skills}</ul>
</section>
<section class="about">
<h2>About</h2>
<p>{summary}</p>
<h2>Projects</h2>
{projects}
</section>
</main>
<footer>Generated {generated_at} with the {template_name} template.</footer>
</body>
</html>
"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    SingleColumn,
    Sidebar,
    Split,
}

impl Layout {
    fn from_metadata(value: Option<&str>) -> Self {
        match value {
            Some("sidebar") => Layout::Sidebar,
            Some("split") => Layout::Split,
            _ => Layout::SingleColumn,
        }
    }

    fn css_name(self) -> &'static str {
        match self {
            Layout::SingleColumn => "single-column",
            Layout::Sidebar => "sidebar",
            Layout::Split => "split",
        }
    }
}

pub fn render_portfolio(
    schema: &PortfolioSchema,
    template: &TemplateDescriptor,
    generated_at: DateTime<Utc>,
) -> String {
    let layout = Layout::from_metadata(template.meta_str("layout"));

    let skills: String = schema
        .skills
        .iter()
        .map(|s| format!("<li>{}</li>", escape_html(s)))
        .collect();

    let projects = if schema.projects.is_empty() {
        "<p>No projects listed.</p>".to_string()
    } else {
        let items: String = schema
            .projects
            .iter()
            .map(|p| {
                if p.description.is_empty() {
                    format!("<li><strong>{}</strong></li>", escape_html(&p.title))
                } else {
                    format!(
                        "<li><strong>{}</strong>: {}</li>",
                        escape_html(&p.title),
                        escape_html(&p.description)
                    )
                }
            })
            .collect();
        format!("<ul>{items}</ul>")
    };

    PAGE_TEMPLATE
        .replace("{template_id}", &escape_html(&template.id))
        .replace("{template_name}", &escape_html(template.display_name()))
        .replace("{accent}", &css_value(template.meta_str("accent_color"), DEFAULT_ACCENT))
        .replace("{font}", &css_value(template.meta_str("font_family"), DEFAULT_FONT))
        .replace("{layout}", layout.css_name())
        .replace("{generated_at}", &generated_at.format("%Y-%m-%d %H:%M UTC").to_string())
        .replace("{headline}", &escape_html(&schema.headline))
        .replace("{summary}", &escape_html(&schema.profile_summary))
        .replace("{skills}", &skills)
        .replace("{projects}", &projects)
        .replace("{name}", &escape_html(&schema.name))
}

/// Writes `<slug>.html` into `output_dir`, creating the directory if needed.
pub async fn write_portfolio(output_dir: &Path, slug: &str, html: &str) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(format!("{slug}.html"));
    tokio::fs::write(&path, html).await?;
    info!("Wrote portfolio to {}", path.display());
    Ok(path)
}

/// File- and branch-safe form of a display name. Empty input becomes `user`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "user".to_string()
    } else {
        slug.to_string()
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

/// Metadata goes into a style block; anything that could close it is dropped.
fn css_value(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() && !v.contains(&['<', '>', '{', '}', ';'][..]) => v.trim().to_string(),
        _ => default.to_string(),
    }
}
