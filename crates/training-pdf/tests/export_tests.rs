use lopdf::Document;
use training_pdf::*;
use training_plan::{
    Exercise, ExerciseDraft, Illustration, PageKind, PageSetup, PaperSize, Session, SessionStore,
};

fn session_with(count: usize, description_repeat: usize) -> Session {
    let mut store = SessionStore::default();
    for i in 0..count {
        store.add_exercise(ExerciseDraft {
            description: "Receive on the half turn and play forward. ".repeat(description_repeat),
            coaching_points: vec!["Open body shape".into(), "Check shoulder".into()],
            equipment: "Cones, bibs".into(),
            ..ExerciseDraft::named(format!("Drill {}", i + 1))
        });
    }
    store.into_session()
}

fn page_count(bytes: &[u8]) -> usize {
    let doc = Document::load_mem(bytes).unwrap();
    doc.get_pages().len()
}

#[test]
fn test_pdf_page_count_matches_layout() {
    let session = session_with(9, 4);
    let options = ExportOptions::default();

    let layout = layout_pages(&session, &options);
    assert!(layout.page_count() > 1);
    assert_eq!(layout.pages[0].kind, PageKind::First);

    let bytes = generate_pdf_bytes(&session, &options).unwrap();
    assert_eq!(page_count(&bytes), layout.page_count());
}

#[test]
fn test_empty_session_renders_one_page() {
    let session = Session::default();
    let options = ExportOptions::default();

    let layout = layout_pages(&session, &options);
    assert_eq!(layout.page_count(), 1);
    assert!(!layout.footer_page);

    let bytes = generate_pdf_bytes(&session, &options).unwrap();
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn test_footer_gets_its_own_page() {
    let mut session = session_with(1, 1);
    let mut options = ExportOptions::default();
    // Leave just enough room for the exercise but not the footer
    let body = options.setup.page_height - 2.0 * options.setup.padding;
    options.setup.footer_height = body - options.setup.first_header_height - 20.0;
    session.equipment.clear();

    let layout = layout_pages(&session, &options);
    assert!(layout.footer_page);
    assert_eq!(layout.page_count(), 2);
    assert!(layout.pages[1].is_empty());

    let bytes = generate_pdf_bytes(&session, &options).unwrap();
    assert_eq!(page_count(&bytes), 2);
}

#[test]
fn test_illustrated_and_unicode_content() {
    let mut session = session_with(2, 1);
    session.name = "Прессинг – “high” block".into();
    session.logo_url = Some("data:image/png;base64,AAAA".into());
    session.exercises.push(Exercise {
        name: "Rondo 4v2".into(),
        illustration: Some(Illustration::image("https://example.com/rondo.png")),
        ..Default::default()
    });

    let bytes = generate_pdf_bytes(&session, &ExportOptions::default()).unwrap();
    assert!(page_count(&bytes) >= 1);
}

#[test]
fn test_preview_setup_is_rejected() {
    let options = ExportOptions {
        setup: PageSetup::preview(),
        ..Default::default()
    };
    assert!(matches!(
        generate_pdf_bytes(&Session::default(), &options),
        Err(ExportError::Plan(_))
    ));
}

#[test]
fn test_missing_font_file_is_an_io_error() {
    let options = ExportOptions {
        font_path: Some("/nonexistent/fonts/NotoSans-Regular.ttf".into()),
        ..Default::default()
    };
    assert!(matches!(
        generate_pdf_bytes(&session_with(1, 1), &options),
        Err(ExportError::Io(_))
    ));
}

#[test]
fn test_unparseable_font_is_rejected() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut font_file = NamedTempFile::new().unwrap();
    font_file.write_all(b"not a truetype font").unwrap();
    let options = ExportOptions {
        font_path: Some(font_file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(
        generate_pdf_bytes(&session_with(1, 1), &options),
        Err(ExportError::Pdf(_))
    ));
}

#[test]
fn test_invalid_setup_is_rejected() {
    let mut options = ExportOptions::for_paper(PaperSize::A5);
    options.setup.padding = -4.0;
    assert!(matches!(
        generate_pdf_bytes(&Session::default(), &options),
        Err(ExportError::Plan(_))
    ));
}

#[test]
fn test_suggested_file_name() {
    let mut session = Session::default();
    assert_eq!(suggested_file_name(&session), "training-session.pdf");

    session.name = "U12 / Tuesday: pressing".into();
    assert_eq!(suggested_file_name(&session), "U12 - Tuesday- pressing.pdf");
}

#[tokio::test]
async fn test_generate_pdf_writes_file() {
    use tempfile::NamedTempFile;

    let session = session_with(4, 2);
    let options = ExportOptions::for_paper(PaperSize::Letter);
    let temp_file = NamedTempFile::new().unwrap();

    let layout = generate_pdf(&session, &options, temp_file.path())
        .await
        .unwrap();

    let bytes = tokio::fs::read(temp_file.path()).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(page_count(&bytes), layout.page_count());
}
