//! Header block and the five looping section renderers.
//!
//! Every looping section follows the same shape: nothing at all for an empty
//! list; otherwise a space check for the heading block, the upper-case title
//! with a rule under it, one block per entry (each preceded by its own space
//! check) and a trailing section gap.

use serde::Serialize;
use tracing::debug;

use crate::layout::error::LayoutError;
use crate::layout::font_metrics::Font;
use crate::layout::primitives::{Align, RenderContext, Run};
use crate::models::resume::{
    Certification, EducationEntry, ExperienceEntry, ProjectEntry, ResumeDocument, SkillGroup,
};

// ────────────────────────────────────────────────────────────────────────────
// Vertical rhythm (points)
// ────────────────────────────────────────────────────────────────────────────

const NAME_GAP: f32 = 16.0;
const CONTACT_BASELINE_OFFSET: f32 = 10.0;
const HEADER_GAP: f32 = 30.0;

const HEADING_BLOCK_HEIGHT: f32 = 40.0;
const HEADING_RULE_OFFSET: f32 = 4.0;
const HEADING_GAP: f32 = 14.0;

const EXPERIENCE_ENTRY_HEIGHT: f32 = 50.0;
const PROJECT_ENTRY_HEIGHT: f32 = 40.0;
const EDUCATION_ENTRY_HEIGHT: f32 = 30.0;
const CERTIFICATION_ENTRY_HEIGHT: f32 = 20.0;
const SKILL_GROUP_MIN_HEIGHT: f32 = 15.0;

const PRIMARY_LINE_GAP: f32 = 12.0;
const SUBTITLE_GAP: f32 = 14.0;
const EDUCATION_ENTRY_GAP: f32 = 18.0;
const CERTIFICATION_LINE_GAP: f32 = 14.0;
const ENTRY_GAP: f32 = 6.0;

/// Small indent used by the skills and certification lines.
const LIST_INDENT: f32 = 10.0;

// ────────────────────────────────────────────────────────────────────────────
// Section kinds
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Experience,
    Skills,
    Projects,
    Education,
    Certifications,
}

impl SectionKind {
    /// Fixed document order.
    pub const ORDER: [SectionKind; 5] = [
        SectionKind::Experience,
        SectionKind::Skills,
        SectionKind::Projects,
        SectionKind::Education,
        SectionKind::Certifications,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SectionKind::Experience => "EXPERIENCE",
            SectionKind::Skills => "TECHNICAL SKILLS",
            SectionKind::Projects => "PROJECTS",
            SectionKind::Education => "EDUCATION",
            SectionKind::Certifications => "CERTIFICATIONS",
        }
    }

    fn section_gap(self) -> f32 {
        match self {
            SectionKind::Skills => 10.0,
            _ => 6.0,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

/// Upper-cased name centered in large bold type, contact line centered below.
/// Both lines are drawn even when their text is empty.
pub fn render_header(ctx: &mut RenderContext<'_>, doc: &ResumeDocument) -> Result<(), LayoutError> {
    let config = ctx.config();

    let y = ctx.y();
    let name = doc.full_name.to_uppercase();
    ctx.draw_text(&name, 0.0, y, Font::bold(config.name_size), Align::Center)?;
    ctx.advance(NAME_GAP);

    let y = ctx.y() + CONTACT_BASELINE_OFFSET;
    ctx.draw_text(
        &doc.contact_info,
        0.0,
        y,
        Font::normal(config.contact_size),
        Align::Center,
    )?;
    ctx.advance(HEADER_GAP);
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Looping sections
// ────────────────────────────────────────────────────────────────────────────

/// Renders one section of `doc`. Returns `false` when the section was empty
/// and contributed nothing.
pub fn render_section(
    ctx: &mut RenderContext<'_>,
    kind: SectionKind,
    doc: &ResumeDocument,
) -> Result<bool, LayoutError> {
    match kind {
        SectionKind::Experience => render_entries(ctx, kind, &doc.experience, render_experience),
        SectionKind::Skills => render_entries(ctx, kind, &doc.skill_groups, render_skill_group),
        SectionKind::Projects => render_entries(ctx, kind, &doc.projects, render_project),
        SectionKind::Education => render_entries(ctx, kind, &doc.education, render_education),
        SectionKind::Certifications => {
            render_entries(ctx, kind, &doc.certifications, render_certification)
        }
    }
}

fn render_entries<'a, T>(
    ctx: &mut RenderContext<'a>,
    kind: SectionKind,
    entries: &[T],
    render_entry: impl Fn(&mut RenderContext<'a>, &T) -> Result<(), LayoutError>,
) -> Result<bool, LayoutError> {
    if entries.is_empty() {
        return Ok(false);
    }

    render_heading(ctx, kind.title())?;
    for entry in entries {
        render_entry(ctx, entry)?;
    }
    ctx.advance(kind.section_gap());
    debug!(
        section = kind.title(),
        entries = entries.len(),
        pages = ctx.page_count(),
        ops = ctx.ops_emitted(),
        "section laid out"
    );
    Ok(true)
}

fn render_heading(ctx: &mut RenderContext<'_>, title: &str) -> Result<(), LayoutError> {
    let config = ctx.config();
    ctx.ensure_space(HEADING_BLOCK_HEIGHT);

    let y = ctx.y();
    ctx.draw_text(title, config.margin, y, config.heading(), Align::Left)?;
    ctx.advance(HEADING_RULE_OFFSET);
    let rule_y = ctx.y();
    ctx.draw_rule(rule_y);
    ctx.advance(HEADING_GAP);
    Ok(())
}

/// Some non-blank text, or `None`.
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.trim().is_empty())
}

/// Height beyond one line taken by the tallest of `texts` sharing a baseline.
/// Pre-wrapped fields draw one line per `\n`.
fn extra_height(ctx: &RenderContext<'_>, texts: &[&str]) -> f32 {
    let lines = texts.iter().map(|t| t.split('\n').count()).max().unwrap_or(1);
    lines.saturating_sub(1) as f32 * ctx.config().line_height
}

fn render_bullets(ctx: &mut RenderContext<'_>, points: &[String]) -> Result<(), LayoutError> {
    let indent = ctx.config().bullet_indent;
    for point in points {
        ctx.bullet_block(point, indent)?;
    }
    Ok(())
}

fn render_experience(
    ctx: &mut RenderContext<'_>,
    entry: &ExperienceEntry,
) -> Result<(), LayoutError> {
    let config = ctx.config();
    let location = present(&entry.location);
    let title_extra = extra_height(ctx, &[entry.role.as_str(), entry.duration.as_str()]);
    let subtitle_extra = extra_height(ctx, &[entry.company.as_str(), location.unwrap_or_default()]);
    ctx.ensure_space(EXPERIENCE_ENTRY_HEIGHT + title_extra + subtitle_extra);

    let y = ctx.y();
    ctx.paired_line(
        &[Run::new(&entry.role, config.body_bold())],
        Some(Run::new(&entry.duration, config.body())),
        y,
    )?;
    ctx.advance(PRIMARY_LINE_GAP + title_extra);

    let y = ctx.y();
    let location = location.map(|loc| Run::new(loc, config.body_italic()));
    ctx.paired_line(&[Run::new(&entry.company, config.body_italic())], location, y)?;
    ctx.advance(SUBTITLE_GAP + subtitle_extra);

    render_bullets(ctx, &entry.points)?;
    ctx.advance(ENTRY_GAP);
    Ok(())
}

fn render_skill_group(ctx: &mut RenderContext<'_>, group: &SkillGroup) -> Result<(), LayoutError> {
    let config = ctx.config();
    let category = if group.category.trim().is_empty() {
        String::new()
    } else {
        format!("{}: ", group.category)
    };
    let category_width = ctx.measure(&category, config.body_bold())?;

    let items_x = config.margin + LIST_INDENT + category_width;
    let items_width = config.content_width() - LIST_INDENT - category_width;
    let lines = ctx.wrap(&group.items, config.body(), items_width)?;
    let height = lines.len().max(1) as f32 * config.line_height;

    ctx.ensure_space(height.max(SKILL_GROUP_MIN_HEIGHT));
    let y = ctx.y();
    if !category.is_empty() {
        ctx.draw_text(&category, config.margin + LIST_INDENT, y, config.body_bold(), Align::Left)?;
    }
    ctx.draw_lines(&lines, items_x, y, config.body());
    ctx.advance(height);
    Ok(())
}

fn render_project(ctx: &mut RenderContext<'_>, entry: &ProjectEntry) -> Result<(), LayoutError> {
    let config = ctx.config();
    let stack = present(&entry.technologies).map(|tech| format!(" | {tech}"));
    let title_extra = extra_height(
        ctx,
        &[entry.name.as_str(), stack.as_deref().unwrap_or_default(), entry.duration.as_str()],
    );
    ctx.ensure_space(PROJECT_ENTRY_HEIGHT + title_extra);

    let mut title = vec![Run::new(&entry.name, config.body_bold())];
    if let Some(stack) = stack.as_deref() {
        title.push(Run::new(stack, config.body_italic()));
    }

    let y = ctx.y();
    ctx.paired_line(&title, Some(Run::new(&entry.duration, config.body())), y)?;
    ctx.advance(SUBTITLE_GAP + title_extra);

    render_bullets(ctx, &entry.points)?;
    ctx.advance(ENTRY_GAP);
    Ok(())
}

fn render_education(ctx: &mut RenderContext<'_>, entry: &EducationEntry) -> Result<(), LayoutError> {
    let config = ctx.config();
    let location = present(&entry.location);
    let school_extra = extra_height(ctx, &[entry.school.as_str(), location.unwrap_or_default()]);
    let degree_extra = extra_height(ctx, &[entry.degree.as_str(), entry.year.as_str()]);
    ctx.ensure_space(EDUCATION_ENTRY_HEIGHT + school_extra + degree_extra);

    let y = ctx.y();
    let location = location.map(|loc| Run::new(loc, config.body()));
    ctx.paired_line(&[Run::new(&entry.school, config.body_bold())], location, y)?;
    ctx.advance(PRIMARY_LINE_GAP + school_extra);

    let y = ctx.y();
    ctx.paired_line(
        &[Run::new(&entry.degree, config.body_italic())],
        Some(Run::new(&entry.year, config.body())),
        y,
    )?;
    ctx.advance(EDUCATION_ENTRY_GAP + degree_extra);
    Ok(())
}

/// "name" or "name - issuer"; the separator only appears with an issuer.
pub fn certification_line(cert: &Certification) -> String {
    match present(&cert.issuer) {
        Some(issuer) => format!("{} - {}", cert.name, issuer),
        None => cert.name.clone(),
    }
}

fn render_certification(
    ctx: &mut RenderContext<'_>,
    cert: &Certification,
) -> Result<(), LayoutError> {
    let config = ctx.config();
    let line = certification_line(cert);
    let extra = extra_height(ctx, &[line.as_str()]);
    ctx.ensure_space(CERTIFICATION_ENTRY_HEIGHT + extra);

    let y = ctx.y();
    ctx.draw_text(&line, config.margin + LIST_INDENT, y, config.body_bold(), Align::Left)?;
    ctx.advance(CERTIFICATION_LINE_GAP + extra);
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
