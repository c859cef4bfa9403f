//! PDF screening report generation.
//!
//! Renders the finished assessment as a paginated US Letter document: a
//! centered title, the subject line (name, age, date), one question/answer
//! block per survey field at a fixed vertical pitch, and a colored final
//! verdict paragraph. The output is an immutable byte stream ready for
//! download; nothing may alter it afterwards.

use crate::error::{Error, Result};
use chrono::NaiveDate;
use printpdf::{BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfLayerReference, Pt, Rgb};

/// MIME type of the generated document.
pub const MIME_TYPE: &str = "application/pdf";

// US Letter, in points.
const PAGE_WIDTH: f64 = 612.0;
const PAGE_HEIGHT: f64 = 792.0;

const LEFT_MARGIN: f64 = 50.0;
/// Vertical pitch per question/answer block.
const QA_PITCH: f64 = 40.0;
/// Below this the cursor wraps to a fresh page.
const BOTTOM_MARGIN: f64 = 100.0;
/// First question/answer baseline on page one.
const QA_TOP: f64 = PAGE_HEIGHT - 165.0;
/// Cursor reset position on continuation pages.
const PAGE_TOP: f64 = PAGE_HEIGHT - 50.0;

const NEEDS_SUPPORT_LINE: &str = "Final Prediction: Needs Support";
const NEEDS_SUPPORT_PARAGRAPH: &str = "Based on your responses, it appears that you may benefit \
    from mental health support. We encourage you to seek guidance from a mental health \
    professional and explore available resources. You are not alone, and support is available.";

const HEALTHY_LINE: &str = "Final Prediction: Mentally Healthy";
const HEALTHY_PARAGRAPH: &str = "Great job! You are currently maintaining good mental health. \
    Keep following healthy habits and being mindful of your mental well-being.";

/// Suggested download filename for a subject's report.
pub fn report_filename(name: &str) -> String {
    format!("{name}_mental_health_report.pdf")
}

/// Verdict line, explanatory paragraph and line color for a prediction
/// label. The "Yes" target class is the needs-support outcome.
fn verdict(prediction_label: &str) -> (&'static str, &'static str, Color) {
    if prediction_label == "Yes" {
        (
            NEEDS_SUPPORT_LINE,
            NEEDS_SUPPORT_PARAGRAPH,
            Color::Rgb(Rgb::new(1.0, 0.0, 0.0, None)),
        )
    } else {
        (
            HEALTHY_LINE,
            HEALTHY_PARAGRAPH,
            Color::Rgb(Rgb::new(0.0, 0.5, 0.0, None)),
        )
    }
}

/// Number of pages the question/answer section occupies, given the fixed
/// pitch and margins. Pure mirror of the cursor walk in [`render_with_date`].
pub fn qa_page_count(n_pairs: usize) -> usize {
    let mut y = QA_TOP;
    let mut pages = 1;
    for _ in 0..n_pairs {
        y -= QA_PITCH;
        if y < BOTTOM_MARGIN {
            pages += 1;
            y = PAGE_TOP;
        }
    }
    pages
}

/// Greedy word wrap for the verdict paragraph.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Render the screening report with today's date embedded.
pub fn render(
    name: &str,
    age: i64,
    answers: &[(String, String)],
    prediction_label: &str,
) -> Result<Vec<u8>> {
    render_with_date(
        name,
        age,
        answers,
        prediction_label,
        chrono::Local::now().date_naive(),
    )
}

/// Render with an explicit report date. Deterministic given identical
/// inputs, which is what the round-trip tests rely on.
pub fn render_with_date(
    name: &str,
    age: i64,
    answers: &[(String, String)],
    prediction_label: &str,
    date: NaiveDate,
) -> Result<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        "Mental Health Assessment Report",
        Mm::from(Pt(PAGE_WIDTH as f32)),
        Mm::from(Pt(PAGE_HEIGHT as f32)),
        "content",
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Render(e.to_string()))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::Render(e.to_string()))?;

    let mut canvas = doc.get_page(page).get_layer(layer);

    // Title, centered.
    let title = "Mental Health Assessment Report";
    draw_centered(&canvas, &bold, title, 18.0, PAGE_HEIGHT - 50.0);

    // Subject line and date.
    draw(&canvas, &regular, &format!("Name: {name}"), 11.0, LEFT_MARGIN, PAGE_HEIGHT - 90.0);
    draw(&canvas, &regular, &format!("Age: {age}"), 11.0, 300.0, PAGE_HEIGHT - 90.0);
    let date_line = format!("Date: {}", date.format("%B %d, %Y"));
    draw(&canvas, &regular, &date_line, 11.0, LEFT_MARGIN, PAGE_HEIGHT - 110.0);

    draw(&canvas, &bold, "Assessment Summary:", 14.0, LEFT_MARGIN, PAGE_HEIGHT - 140.0);

    // Question/answer blocks with a running cursor, paginating when the
    // cursor falls below the bottom margin.
    let mut y = QA_TOP;
    for (question, answer) in answers {
        draw(&canvas, &regular, question, 11.0, LEFT_MARGIN, y);
        draw(&canvas, &regular, &format!("Answer: {answer}"), 11.0, LEFT_MARGIN, y - 14.0);
        y -= QA_PITCH;
        if y < BOTTOM_MARGIN {
            let (next_page, next_layer) = doc.add_page(
                Mm::from(Pt(PAGE_WIDTH as f32)),
                Mm::from(Pt(PAGE_HEIGHT as f32)),
                "content",
            );
            canvas = doc.get_page(next_page).get_layer(next_layer);
            y = PAGE_TOP;
        }
    }

    // Final verdict, colored, then the explanatory paragraph in black.
    let (line, paragraph, color) = verdict(prediction_label);
    y -= 30.0;
    canvas.set_fill_color(color);
    draw(&canvas, &bold, line, 13.0, LEFT_MARGIN, y);

    y -= 25.0;
    canvas.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    for wrapped in wrap_text(paragraph, 92) {
        draw(&canvas, &regular, &wrapped, 11.0, LEFT_MARGIN, y);
        y -= 14.0;
    }

    doc.save_to_bytes().map_err(|e| Error::Render(e.to_string()))
}

fn draw(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f64, x: f64, y: f64) {
    layer.use_text(text, size as f32, Mm::from(Pt(x as f32)), Mm::from(Pt(y as f32)), font);
}

/// Centered placement from an average Helvetica glyph width. Close enough
/// for a title; the builtin fonts ship no metrics to measure against.
fn draw_centered(layer: &PdfLayerReference, font: &IndirectFontRef, text: &str, size: f64, y: f64) {
    let width = text.len() as f64 * size * 0.5;
    let x = (PAGE_WIDTH - width) / 2.0;
    draw(layer, font, text, size, x, y);
}
