//! Referral-letter PDF rendering via `printpdf`.
//!
//! The built-in fonts cover the Latin-1 repertoire only, so the text is
//! re-encoded lossily first: anything outside that set becomes `?` instead
//! of failing the render. Every page carries the fixed header line and a
//! page-number footer.

use std::io::BufWriter;

use printpdf::*;

use super::ReportError;

pub const PDF_HEADER: &str = "Dr. Hipocrates AI - Informe de Derivacion";

/// Download filename for the compiled letter.
pub const PDF_FILENAME: &str = "Informe_Dr_Hipocrates.pdf";

// A4 geometry, in millimetres.
const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN: f64 = 20.0;
const BODY_TOP: f64 = 262.0;
const BODY_BOTTOM: f64 = 25.0;
const LINE_HEIGHT: f64 = 5.5;
const WRAP_COLUMNS: usize = 90;

/// Render free-form letter text to paginated PDF bytes.
///
/// Never fails on the input text itself: unrepresentable characters are
/// replaced, long lines wrapped, and overflow flows onto new pages.
pub fn render_report_pdf(text: &str) -> Result<Vec<u8>, ReportError> {
    let clean = to_latin1_lossy(text);

    let (doc, first_page, first_layer) = PdfDocument::new(
        PDF_HEADER,
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        "Layer 1",
    );
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::GenerationFailed(format!("PDF font error: {e}")))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ReportError::GenerationFailed(format!("PDF font error: {e}")))?;
    let italic = doc
        .add_builtin_font(BuiltinFont::HelveticaOblique)
        .map_err(|e| ReportError::GenerationFailed(format!("PDF font error: {e}")))?;

    // Wrap each source line, preserving blank lines as paragraph breaks.
    let mut lines: Vec<String> = Vec::new();
    for source_line in clean.lines() {
        if source_line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.extend(wrap_text(source_line, WRAP_COLUMNS));
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }

    let lines_per_page = (((BODY_TOP - BODY_BOTTOM) / LINE_HEIGHT) as usize).max(1);

    let mut layer = doc.get_page(first_page).get_layer(first_layer);
    for (page_index, chunk) in lines.chunks(lines_per_page).enumerate() {
        if page_index > 0 {
            let (page, layer_index) = doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Layer {}", page_index + 1),
            );
            layer = doc.get_page(page).get_layer(layer_index);
        }

        layer.use_text(PDF_HEADER, 15.0, Mm(MARGIN + 18.0), Mm(280.0), &bold);
        layer.use_text(
            format!("Pagina {}", page_index + 1),
            8.0,
            Mm(PAGE_WIDTH / 2.0 - 8.0),
            Mm(10.0),
            &italic,
        );

        let mut y = Mm(BODY_TOP);
        for line in chunk {
            if !line.is_empty() {
                layer.use_text(line, 11.0, Mm(MARGIN), y, &font);
            }
            y -= Mm(LINE_HEIGHT);
        }
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| ReportError::GenerationFailed(format!("PDF save error: {e}")))?;
    buf.into_inner()
        .map_err(|e| ReportError::GenerationFailed(format!("PDF buffer error: {e}")))
}

/// Replace anything outside Latin-1 with `?`. Lossy by contract; the
/// built-in PDF fonts have no glyphs beyond that set.
fn to_latin1_lossy(text: &str) -> String {
    text.chars()
        .map(|c| if (c as u32) <= 0xFF { c } else { '?' })
        .collect()
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_simple_letter() {
        let bytes = render_report_pdf(
            "CLINICAL REFERRAL LETTER\n\nChief Complaint: chest pain\nAssessment: urgent",
        )
        .unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn never_fails_on_characters_outside_latin1() {
        let bytes = render_report_pdf("Dolor torácico 🚑 — 頭痛 — Привет").unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn empty_text_still_produces_a_document() {
        let bytes = render_report_pdf("").unwrap();
        assert_eq!(&bytes[0..4], b"%PDF");
    }

    #[test]
    fn long_text_spills_onto_more_pages() {
        let long = "Linea de anamnesis repetida para forzar paginacion.\n".repeat(200);
        let multi = render_report_pdf(&long).unwrap();
        let single = render_report_pdf("una linea").unwrap();
        // More pages → strictly more content objects in the file.
        assert!(multi.len() > single.len());
        assert_eq!(&multi[0..4], b"%PDF");
    }

    #[test]
    fn latin1_replacement_keeps_accents_and_drops_emoji() {
        let clean = to_latin1_lossy("Dolor torácico 🚑 intenso");
        assert!(clean.contains("torácico"));
        assert!(clean.contains('?'));
        assert!(!clean.contains('🚑'));
    }

    #[test]
    fn wrap_text_respects_word_boundaries() {
        let text = "This is a long sentence that should be wrapped at around forty characters or so.";
        let lines = wrap_text(text, 40);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.len() <= 45); // Allow some slack for word boundaries
        }
    }

    #[test]
    fn wrap_text_empty_input() {
        assert_eq!(wrap_text("", 40), vec![String::new()]);
    }
}
