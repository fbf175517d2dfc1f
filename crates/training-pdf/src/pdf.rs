use crate::options::ExportOptions;
use crate::text::{Fitted, fit, sanitize, text_width_pt};
use crate::types::{ExportError, Result};
use printpdf::*;
use std::path::Path;
use training_plan::{
    EstimateProfile, Exercise, HeightEstimator, HeightProvider, PageGroup, PageKind, PageSetup,
    Pagination, RenderContext, Session, format_session_date, load_level_color,
    objectives_abbreviation, paginate, total_duration,
};

type Color3 = (f32, f32, f32);

/// Exercise card accent (left border)
const ACCENT: Color3 = (0.133, 0.773, 0.369);
const MUTED: Color3 = (0.4, 0.4, 0.4);
const RULE: Color3 = (0.898, 0.906, 0.922);
const BLACK: Color3 = (0.0, 0.0, 0.0);

/// Image frame drawn to the right of an illustrated exercise
const IMAGE_FRAME_WIDTH: f32 = 120.0;
const IMAGE_FRAME_HEIGHT: f32 = 100.0;
const IMAGE_FRAME_TOP: f32 = 22.0;
const IMAGE_COLUMN_GAP: f32 = 10.0;
const CARD_INDENT: f32 = 10.0;
const LOGO_SIZE: f32 = 60.0;
const TITLE_ROW_BASELINE: f32 = 14.0;
const TITLE_ROW_SIZE: f32 = 12.0;
/// Gap between the last card and the footer rule
const FOOTER_GAP: f32 = 20.0;
/// Depth below the baseline glyph descenders reach, as a fraction of size
const DESCENT_RATIO: f32 = 0.25;

/// Paginate a session the way the exported document will be laid out.
///
/// Export never has measured heights, so this always uses the content-based
/// estimate in points.
pub fn layout_pages(session: &Session, options: &ExportOptions) -> Pagination {
    let estimator = HeightEstimator::for_context(RenderContext::Export);
    let budget = options.setup.budget_for(session);
    paginate(&session.exercises, &estimator, &budget)
}

/// Write the session plan to `output_path` and return the pagination used
pub async fn generate_pdf(
    session: &Session,
    options: &ExportOptions,
    output_path: impl AsRef<Path>,
) -> Result<Pagination> {
    options.validate()?;

    let font_bytes = match &options.font_path {
        Some(path) => Some(tokio::fs::read(path).await?),
        None => None,
    };
    let session = session.clone();
    let options = options.clone();
    let output_path = output_path.as_ref().to_owned();

    let (bytes, pagination) = tokio::task::spawn_blocking(move || {
        let pagination = layout_pages(&session, &options);
        let bytes = render_document(&session, &options, &pagination, font_bytes.as_deref())?;
        Ok::<_, ExportError>((bytes, pagination))
    })
    .await??;

    tokio::fs::write(&output_path, bytes).await?;
    log::info!(
        "Wrote {} page(s) to {}",
        pagination.page_count(),
        output_path.display()
    );

    Ok(pagination)
}

/// Render the session plan to PDF bytes
pub fn generate_pdf_bytes(session: &Session, options: &ExportOptions) -> Result<Vec<u8>> {
    options.validate()?;
    let font_bytes = match &options.font_path {
        Some(path) => Some(std::fs::read(path)?),
        None => None,
    };
    let pagination = layout_pages(session, options);
    render_document(session, options, &pagination, font_bytes.as_deref())
}

fn render_document(
    session: &Session,
    options: &ExportOptions,
    pagination: &Pagination,
    font_bytes: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let mut doc = PdfDocument::new(session.display_name());
    let typeface = Typeface::load(&mut doc, font_bytes)?;
    let setup = &options.setup;
    let estimator = HeightEstimator::for_context(RenderContext::Export);
    let total_pages = pagination.page_count();

    for (page_index, group) in pagination.iter().enumerate() {
        let mut canvas = Canvas::new(setup, &typeface);

        let mut cursor = match group.kind {
            PageKind::First => draw_first_header(&mut canvas, session, options),
            PageKind::Continuation => draw_continuation_header(&mut canvas, session, setup),
        };

        cursor = draw_exercises(&mut canvas, session, group, &estimator, options, cursor);

        if page_index + 1 == total_pages {
            draw_footer(&mut canvas, session, setup, cursor);
        }

        if options.page_numbers {
            let label = format!("{} / {}", page_index + 1, total_pages);
            let x = (setup.page_width - typeface.width(&label, 8.0)) / 2.0;
            let baseline = setup.page_height - setup.padding / 2.0;
            canvas.text(x, baseline, 8.0, Weight::Regular, MUTED, &label);
        }

        log::debug!(
            "Rendered page {} with {} exercise(s)",
            page_index + 1,
            group.len()
        );
        doc.pages.push(canvas.into_page());
    }

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    for warning in &warnings {
        log::debug!("PDF warning: {:?}", warning);
    }
    Ok(bytes)
}

/// Title, metadata grid and optional equipment block. Returns the y offset
/// (from the top edge) where exercises start.
fn draw_first_header(canvas: &mut Canvas, session: &Session, options: &ExportOptions) -> f32 {
    let setup = &options.setup;
    let left = setup.padding;
    let top = setup.padding;
    let width = setup.content_width();

    let mut title_width = width;
    if session.has_logo() {
        let x = left + width - LOGO_SIZE;
        canvas.frame(x, top, LOGO_SIZE, LOGO_SIZE, RULE);
        canvas.text(x + 16.0, top + LOGO_SIZE / 2.0 + 3.0, 8.0, Weight::Regular, MUTED, "LOGO");
        title_width -= LOGO_SIZE + IMAGE_COLUMN_GAP;
    }

    let title = canvas.fit_line(
        &session.display_name().to_uppercase(),
        title_width,
        options.title_font_size_pt,
    );
    canvas.text(left, top + options.title_font_size_pt, title.size, Weight::Bold, BLACK, &title.lines.concat());

    let (r, g, b) = load_level_color(session.load_level);
    let load_color = (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
    let cells = [
        (
            "Date/Time",
            format!("{} {}", format_session_date(&session.date), session.time),
            BLACK,
        ),
        ("Duration", format!("{} MINUTES", session.duration_minutes), BLACK),
        ("Players", format!("{} PLAYERS", session.players_count), BLACK),
        ("Load", format!("{}/10", session.load_level), load_color),
        ("Objectives", objectives_abbreviation(&session.objectives), BLACK),
    ];
    let column = width / cells.len() as f32;
    for (i, (label, value, color)) in cells.iter().enumerate() {
        let x = left + i as f32 * column;
        canvas.text(x, top + 66.0, 9.0, Weight::Regular, MUTED, &label.to_uppercase());
        let value = canvas.fit_line(value, column - 4.0, 11.0);
        canvas.text(x, top + 80.0, value.size, Weight::Bold, *color, &value.lines.concat());
    }
    canvas.rule(left, left + width, top + 92.0, 1.0, BLACK);

    let mut block_top = top + setup.first_header_height;
    if !session.equipment.is_empty() {
        let y = top + setup.first_header_height - 20.0;
        canvas.text(left, y, 9.0, Weight::Regular, MUTED, "EQUIPMENT");
        let equipment = canvas.fit_line(&session.equipment, width, options.body_font_size_pt);
        canvas.text(left, y + 14.0, equipment.size, Weight::Regular, BLACK, &equipment.lines.concat());
        block_top += setup.equipment_block_height;
    }

    canvas.text(left, block_top - 8.0, 14.0, Weight::Bold, BLACK, "EXERCISES");
    block_top
}

fn draw_continuation_header(canvas: &mut Canvas, session: &Session, setup: &PageSetup) -> f32 {
    let left = setup.padding;
    let top = setup.padding;
    let label = format!("{} (continued)", session.display_name().to_uppercase());
    let label = canvas.fit_line(&label, setup.content_width(), 10.0);
    canvas.text(left, top + 12.0, label.size, Weight::Regular, MUTED, &label.lines.concat());
    canvas.rule(left, left + setup.content_width(), top + 20.0, 0.5, RULE);
    top + setup.continuation_header_height
}

/// Draw the page's exercise cards starting at `cursor`; returns the offset
/// just below the last card.
fn draw_exercises(
    canvas: &mut Canvas,
    session: &Session,
    group: &PageGroup,
    estimator: &HeightEstimator,
    options: &ExportOptions,
    mut cursor: f32,
) -> f32 {
    let setup = &options.setup;
    for (position, (index, exercise)) in group.numbered(&session.exercises).enumerate() {
        if position > 0 {
            cursor += setup.item_spacing;
        }
        let height = estimator.height(exercise);
        let card = layout_card(index + 1, exercise, estimator.profile(), options, canvas.typeface);

        canvas.rule_vertical(setup.padding + 1.5, cursor, cursor + height, 3.0, ACCENT);
        if let Some((x, y, w, h)) = card.image_frame {
            canvas.frame(x, cursor + y, w, h, RULE);
            canvas.text(x + 8.0, cursor + y + h / 2.0, 8.0, Weight::Regular, MUTED, "DIAGRAM");
        }
        for run in &card.runs {
            canvas.text(run.x, cursor + run.baseline, run.size, run.weight, run.color, &run.text);
        }
        cursor += height;
    }
    cursor
}

/// One line of text on an exercise card; `baseline` is measured from the
/// card's top edge
#[derive(Debug, Clone, PartialEq)]
struct Run {
    x: f32,
    baseline: f32,
    size: f32,
    weight: Weight,
    color: Color3,
    text: String,
}

impl Run {
    fn bottom(&self) -> f32 {
        self.baseline + self.size * DESCENT_RATIO
    }
}

#[derive(Debug, Clone, PartialEq)]
struct CardLayout {
    runs: Vec<Run>,
    /// `(x, y from card top, width, height)`
    image_frame: Option<(f32, f32, f32, f32)>,
}

impl CardLayout {
    /// Lowest point anything on the card reaches, from the card top
    fn bottom(&self) -> f32 {
        let text = self.runs.iter().map(Run::bottom).fold(0.0, f32::max);
        let image = self.image_frame.map_or(0.0, |(_, y, _, h)| y + h);
        text.max(image)
    }
}

/// Place the text of one exercise card.
///
/// Each section takes exactly the lines the estimator charged for it, so the
/// card never grows past its estimated height. Text that would need more
/// lines is set smaller and, as a last resort, cut.
fn layout_card(
    number: usize,
    exercise: &Exercise,
    profile: &EstimateProfile,
    options: &ExportOptions,
    typeface: &Typeface,
) -> CardLayout {
    let setup = &options.setup;
    let body_size = options.body_font_size_pt;
    let small = body_size - 1.0;
    let x = setup.padding + CARD_INDENT;
    let right = setup.padding + setup.content_width();
    let mut runs = Vec::new();
    let mut push = |x: f32, baseline: f32, fitted: Fitted, weight: Weight, color: Color3| {
        for line in fitted.lines {
            runs.push(Run {
                x,
                baseline,
                size: fitted.size,
                weight,
                color,
                text: line,
            });
        }
    };

    // Title row: number, name, tags, duration on the right
    let duration = format!("{} min", exercise.duration_minutes);
    let duration_width = typeface.width(&duration, body_size);
    let number_label = format!("#{}", number);
    let name_x = x + typeface.width(&number_label, TITLE_ROW_SIZE) + 8.0;
    let tags = format!(
        "{}  {}",
        exercise.kind.name().to_uppercase(),
        exercise.intensity.name().to_uppercase()
    );
    let tags_width = typeface.width(&tags, 9.0);
    let name_room = (right - duration_width - 12.0 - tags_width - 8.0 - name_x).max(40.0);
    let name = fit(exercise.display_name(), name_room, 1, TITLE_ROW_SIZE, |s, size| {
        typeface.width(s, size)
    });
    let name_width = name
        .lines
        .first()
        .map_or(0.0, |line| typeface.width(line, name.size));

    push(x, TITLE_ROW_BASELINE, single(number_label), Weight::Bold, BLACK);
    let tags_x = name_x + name_width + 8.0;
    push(name_x, TITLE_ROW_BASELINE, name, Weight::Bold, BLACK);
    if tags_x + tags_width <= right - duration_width - 4.0 {
        push(tags_x, TITLE_ROW_BASELINE, single_sized(tags, 9.0), Weight::Regular, MUTED);
    }
    push(
        right - duration_width,
        TITLE_ROW_BASELINE,
        single_sized(duration, body_size),
        Weight::Regular,
        MUTED,
    );

    // Text column, narrowed when an image sits on the right
    let mut column_width = right - x;
    let mut image_frame = None;
    if exercise.has_image() {
        column_width -= IMAGE_FRAME_WIDTH + IMAGE_COLUMN_GAP;
        image_frame = Some((
            right - IMAGE_FRAME_WIDTH,
            IMAGE_FRAME_TOP,
            IMAGE_FRAME_WIDTH,
            IMAGE_FRAME_HEIGHT,
        ));
    }
    let measure = |s: &str, size: f32| typeface.width(s, size);

    let mut y = profile.base_height - 6.0;

    if !exercise.players.is_empty() || !exercise.area.is_empty() {
        let mut info = Vec::new();
        if !exercise.players.is_empty() {
            info.push(format!("Players: {}", exercise.players));
        }
        if !exercise.area.is_empty() {
            info.push(format!("Area: {}", exercise.area));
        }
        let fitted = fit(&info.join("   "), column_width, 1, small, measure);
        push(x, y, fitted, Weight::Regular, MUTED);
        y += profile.players_area_height;
    }

    if !exercise.description.is_empty() {
        let budget = profile.description_lines(&exercise.description);
        let fitted = fit(&exercise.description, column_width, budget, body_size, measure);
        if fitted.truncated {
            log::warn!(
                "Description of {} shortened to fit its {} line(s)",
                exercise.id,
                budget
            );
        }
        for line in fitted.lines {
            push(x, y, single_sized(line, fitted.size), Weight::Regular, BLACK);
            y += profile.line_height;
        }
    }

    if !exercise.coaching_points.is_empty() {
        push(x, y + 2.0, single_sized("COACHING POINTS:".to_string(), small), Weight::Bold, MUTED);
        y += profile.coaching_header;
        for point in &exercise.coaching_points {
            let fitted = fit(&format!("- {}", point), column_width - 10.0, 1, small, measure);
            push(x + 10.0, y, fitted, Weight::Regular, BLACK);
            y += profile.coaching_item;
        }
    }

    if !exercise.equipment.is_empty() {
        let fitted = fit(&format!("Equipment: {}", exercise.equipment), column_width, 1, small, measure);
        push(x, y, fitted, Weight::Regular, MUTED);
        y += profile.equipment_height;
    }

    if !exercise.variations.is_empty() {
        let fitted = fit(&format!("Variations: {}", exercise.variations), column_width, 1, small, measure);
        push(x, y, fitted, Weight::Regular, BLACK);
    }

    CardLayout { runs, image_frame }
}

fn single(text: String) -> Fitted {
    single_sized(text, TITLE_ROW_SIZE)
}

fn single_sized(text: String, size: f32) -> Fitted {
    Fitted {
        lines: vec![text],
        size,
        truncated: false,
    }
}

/// Where the footer rule goes: just under the last card, but never so low
/// that the footer leaves the page body
fn footer_top(setup: &PageSetup, cursor: f32) -> f32 {
    let lowest = setup.page_height - setup.padding - setup.footer_height;
    (cursor + FOOTER_GAP).min(lowest).max(setup.padding)
}

fn draw_footer(canvas: &mut Canvas, session: &Session, setup: &PageSetup, cursor: f32) {
    let left = setup.padding;
    let right = left + setup.content_width();
    let top = footer_top(setup, cursor);

    canvas.rule(left, right, top, 1.0, RULE);
    let total = format!("{} minutes", total_duration(session));
    let total_width = canvas.typeface.width(&total, 11.0);
    canvas.text(left, top + 18.0, 11.0, Weight::Bold, BLACK, "Total Duration:");
    canvas.text(right - total_width, top + 18.0, 11.0, Weight::Bold, BLACK, &total);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Weight {
    Regular,
    Bold,
}

/// The face all text is set in: an embedded TrueType font, or the builtin
/// Helvetica pair when none is configured
enum Typeface {
    Builtin,
    Embedded { id: FontId, font: ParsedFont },
}

impl Typeface {
    fn load(doc: &mut PdfDocument, bytes: Option<&[u8]>) -> Result<Self> {
        let Some(bytes) = bytes else {
            return Ok(Typeface::Builtin);
        };
        let mut font_warnings = Vec::new();
        let font = ParsedFont::from_bytes(bytes, 0, &mut font_warnings)
            .ok_or_else(|| ExportError::Pdf("Failed to parse font".to_string()))?;
        let id = doc.add_font(&font);
        Ok(Typeface::Embedded { id, font })
    }

    /// Rendered width of `text` in points
    fn width(&self, text: &str, size: f32) -> f32 {
        match self {
            Typeface::Builtin => text_width_pt(text, size),
            Typeface::Embedded { font, .. } => text
                .chars()
                .filter_map(|ch| font.lookup_glyph_index(ch as u32))
                .map(|glyph_id| font.get_horizontal_advance(glyph_id) as f32 / 1000.0 * size)
                .sum(),
        }
    }
}

/// Collects drawing ops for one page, addressed from the top-left corner
struct Canvas<'a> {
    typeface: &'a Typeface,
    width: f32,
    height: f32,
    ops: Vec<Op>,
}

impl<'a> Canvas<'a> {
    fn new(setup: &PageSetup, typeface: &'a Typeface) -> Self {
        Self {
            typeface,
            width: setup.page_width,
            height: setup.page_height,
            ops: Vec::new(),
        }
    }

    fn point(&self, x: f32, y_from_top: f32) -> Point {
        Point {
            x: Pt(x),
            y: Pt(self.height - y_from_top),
        }
    }

    /// `text` on a single line of `max_width`, shrunk or cut as needed
    fn fit_line(&self, text: &str, max_width: f32, size: f32) -> Fitted {
        let typeface = self.typeface;
        fit(text, max_width, 1, size, |s, size| typeface.width(s, size))
    }

    /// Write one line of text with its baseline at `baseline` from the top
    fn text(&mut self, x: f32, baseline: f32, size: f32, weight: Weight, color: Color3, text: &str) {
        let pos = self.point(x, baseline);
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFillColor { col: rgb(color) });
        self.ops.push(Op::SetTextCursor { pos });
        let typeface = self.typeface;
        match typeface {
            Typeface::Builtin => {
                let font = match weight {
                    Weight::Regular => BuiltinFont::Helvetica,
                    Weight::Bold => BuiltinFont::HelveticaBold,
                };
                self.ops.push(Op::SetFontSizeBuiltinFont {
                    font,
                    size: Pt(size),
                });
                self.ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(sanitize(text))],
                    font,
                });
            }
            Typeface::Embedded { id, .. } => {
                self.ops.push(Op::SetFontSize {
                    font: id.clone(),
                    size: Pt(size),
                });
                self.ops.push(Op::WriteText {
                    items: vec![TextItem::Text(text.to_string())],
                    font: id.clone(),
                });
            }
        }
        self.ops.push(Op::EndTextSection);
    }

    fn stroke(&mut self, points: Vec<Point>, closed: bool, thickness: f32, color: Color3) {
        self.ops.push(Op::SetOutlineColor { col: rgb(color) });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(thickness) });
        self.ops.push(Op::DrawLine {
            line: Line {
                points: points
                    .into_iter()
                    .map(|p| LinePoint { p, bezier: false })
                    .collect(),
                is_closed: closed,
            },
        });
    }

    /// Horizontal rule at `y` from the top
    fn rule(&mut self, x1: f32, x2: f32, y: f32, thickness: f32, color: Color3) {
        let points = vec![self.point(x1, y), self.point(x2, y)];
        self.stroke(points, false, thickness, color);
    }

    fn rule_vertical(&mut self, x: f32, y1: f32, y2: f32, thickness: f32, color: Color3) {
        let points = vec![self.point(x, y1), self.point(x, y2)];
        self.stroke(points, false, thickness, color);
    }

    /// Rectangle outline with its top-left corner at (`x`, `y`)
    fn frame(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color3) {
        let points = vec![
            self.point(x, y),
            self.point(x + w, y),
            self.point(x + w, y + h),
            self.point(x, y + h),
        ];
        self.stroke(points, true, 1.0, color);
    }

    fn into_page(self) -> PdfPage {
        PdfPage::new(Mm::from(Pt(self.width)), Mm::from(Pt(self.height)), self.ops)
    }
}

fn rgb((r, g, b): Color3) -> Color {
    Color::Rgb(Rgb {
        r,
        g,
        b,
        icc_profile: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use training_plan::{ExerciseId, Illustration};

    fn long_drill(illustrated: bool) -> Exercise {
        Exercise {
            id: ExerciseId::new("exercise-1"),
            name: "Third-man combinations".into(),
            description: "Receive on the half turn and play forward. ".repeat(22),
            players: "6v6 + 2".into(),
            area: "40x30m".into(),
            coaching_points: vec!["Open body shape".into(), "Check shoulder".into()],
            equipment: "Cones, bibs, 2 mini goals".into(),
            variations: "Limit to two touches in the middle zone".into(),
            illustration: illustrated.then(|| Illustration::image("https://example.com/drill.png")),
            ..Default::default()
        }
    }

    fn assert_card_within_estimate(exercise: &Exercise) {
        let options = ExportOptions::default();
        let estimator = HeightEstimator::for_context(RenderContext::Export);
        let card = layout_card(1, exercise, estimator.profile(), &options, &Typeface::Builtin);
        let estimate = estimator.estimate(exercise);

        assert!(
            card.bottom() <= estimate,
            "card bottom {} below estimate {}",
            card.bottom(),
            estimate
        );
        let right = options.setup.padding + options.setup.content_width();
        for run in &card.runs {
            assert!(run.x + text_width_pt(&run.text, run.size) <= right + 0.01, "{:?}", run);
        }
    }

    #[test]
    fn test_illustrated_card_stays_within_estimate() {
        let exercise = long_drill(true);
        let estimator = HeightEstimator::for_context(RenderContext::Export);
        let budget = estimator.profile().description_lines(&exercise.description);

        let card = layout_card(
            1,
            &exercise,
            estimator.profile(),
            &ExportOptions::default(),
            &Typeface::Builtin,
        );
        let description_runs = card
            .runs
            .iter()
            .filter(|run| run.color == BLACK && run.weight == Weight::Regular && run.x == 40.0)
            .filter(|run| !run.text.starts_with("Variations"))
            .count();
        assert!(description_runs <= budget);
        assert_card_within_estimate(&exercise);
    }

    #[test]
    fn test_plain_card_stays_within_estimate() {
        assert_card_within_estimate(&long_drill(false));
    }

    #[test]
    fn test_newline_heavy_description_stays_within_estimate() {
        let mut exercise = long_drill(false);
        exercise.description = "1.\n2.\n3.\n4.\n5.\n6.".into();
        assert_card_within_estimate(&exercise);
    }

    #[test]
    fn test_bare_card_stays_within_estimate() {
        let exercise = Exercise::default();
        assert_card_within_estimate(&exercise);
    }

    #[test]
    fn test_footer_stays_on_page() {
        let setup = PageSetup::default();
        let body_bottom = setup.page_height - setup.padding;

        // Room to spare: footer sits just below the last card
        assert_eq!(footer_top(&setup, 200.0), 200.0 + FOOTER_GAP);

        // Full page: footer is pulled up into the body
        let top = footer_top(&setup, body_bottom - 5.0);
        assert!(top + setup.footer_height <= body_bottom + 0.01);
    }
}
