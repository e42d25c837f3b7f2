use famtree_core::service::{decompose, paginate, parse_record, segment_page};
use famtree_core::{
    DocumentWriter, FamilyName, PageLayout, PagedText, PagedTextSink, PaginatedSource,
    PersonPool, Template, TemplateGenerator, TemplateReader,
};

const SMITH_NARRATIVE: &str = "I: John Smith 1900 1925 1970 Jane Doe 1902 1980 \
    A. Mary Smith 1926 1990 \
    B. Peter Smith 1928 1950 Ann Brown 1930 \
    1. Lucy Smith 1951 2010 \
    II: Tom Smith 1905 1960";

fn family() -> FamilyName {
    FamilyName::new("Smith", 1_754_729_228).unwrap()
}

fn smith_template() -> Template {
    TemplateGenerator::new(family())
        .generate(SMITH_NARRATIVE)
        .unwrap()
        .template
}

fn small_layout() -> PageLayout {
    PageLayout {
        usable_height: 100.0,
        line_height: 36.0,
    }
}

fn read_record(record: &str) -> famtree_core::TemplateResult<famtree_core::TemplateLine> {
    let mut pool = PersonPool::new();
    let mut warnings = Vec::new();
    parse_record(record, &mut pool, &mut warnings)
}

#[test]
fn writer_breaks_pages_before_overflowing_lines() {
    let template = smith_template();
    let mut sink = PagedTextSink::new(100.0);
    let summary = DocumentWriter::new(small_layout())
        .write(&template.lines, &mut sink)
        .unwrap();

    assert_eq!(summary.lines, 5);
    assert_eq!(summary.pages, 3);
    let sizes = sink.pages().iter().map(Vec::len).collect::<Vec<_>>();
    assert_eq!(sizes, vec![2, 2, 1]);
    assert_eq!(
        sink.pages()[0][1],
        "[1.1] Mary Smith (1926 \u{2013} 1990)"
    );
}

#[test]
fn paginate_matches_writer_page_breaks() {
    let template = smith_template();
    let mut sink = PagedTextSink::new(100.0);
    DocumentWriter::new(small_layout())
        .write(&template.lines, &mut sink)
        .unwrap();
    assert_eq!(paginate(&template.lines, &small_layout()), sink.pages().to_vec());
}

#[test]
fn read_of_written_document_restores_the_model() {
    let template = smith_template();
    let mut sink = PagedTextSink::new(100.0);
    DocumentWriter::new(small_layout())
        .write(&template.lines, &mut sink)
        .unwrap();

    let reopened = PagedText::from_text(&sink.render());
    assert_eq!(reopened.page_count().unwrap(), 3);
    let output = TemplateReader::new(family()).read(&reopened).unwrap();
    assert_eq!(output.template, template);
    assert!(output.warnings.is_empty());
}

#[test]
fn sink_pages_reopen_without_rendering() {
    let template = smith_template();
    let mut sink = PagedTextSink::new(100.0);
    DocumentWriter::new(small_layout())
        .write(&template.lines, &mut sink)
        .unwrap();

    let reopened = sink.to_paged_text();
    assert_eq!(reopened.page_count().unwrap(), sink.page_count());
    let output = TemplateReader::new(family()).read(&reopened).unwrap();
    assert_eq!(output.template, template);
}

#[test]
fn round_trip_survives_a_file() {
    let template = smith_template();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("smith.pages");
    let mut sink = PagedTextSink::new(PageLayout::default().usable_height);
    DocumentWriter::new(PageLayout::default())
        .write(&template.lines, &mut sink)
        .unwrap();
    sink.save(&path).unwrap();

    let output = TemplateReader::new(family())
        .read(&PagedText::load(&path).unwrap())
        .unwrap();
    assert_eq!(output.template, template);
}

#[test]
fn reader_shares_people_across_pages() {
    let pages = PagedText::new(vec![
        "[1] Ann Smith (1900 \u{2013} 1950)".to_string(),
        "[2] Ann Smith (1900 \u{2013} 1950)".to_string(),
    ]);
    let output = TemplateReader::new(family()).read(&pages).unwrap();
    let lines = &output.template.lines;
    assert_eq!(lines[0].member.id, lines[1].member.id);
}

#[test]
fn page_with_two_records_segments_at_brackets() {
    let records = segment_page("[1] Smith 1900 1950 ... [2] Doe 1905");
    assert_eq!(records, vec!["[1] Smith 1900 1950 ...", "[2] Doe 1905"]);
}

#[test]
fn reader_normalizes_extracted_dash_variants() {
    let pages = PagedText::new(vec![
        "Smith family\n[1] Ann Smith (1900 -\n1950) & Bob Jones ( - )\n: 1925".to_string(),
    ]);
    let output = TemplateReader::new(family()).read(&pages).unwrap();
    let line = &output.template.lines[0];
    assert_eq!(
        line.to_string(),
        "[1] Ann Smith (1900 \u{2013} 1950) & Bob Jones (\u{2013}): 1925"
    );
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].subject, "Bob Jones");
}

#[test]
fn reader_rejects_malformed_records() {
    let cases = [
        ("[] Ann Smith (\u{2013})", "coordinate missing"),
        ("[x.1] Ann Smith (\u{2013})", "coordinate missing"),
        ("[1] (\u{2013})", "member name missing"),
        ("[1] Ann Smith", "member lifespan incomplete"),
        (
            "[1] Ann Smith (1900 \u{2013} 1950): 1925",
            "in-law must exist if a dynamic is defined",
        ),
        ("[1] Ann Smith (\u{2013}) & (\u{2013})", "in-law name missing"),
        ("[1] Ann Smith (\u{2013}) & Bob Jones (\u{2013}):", "dynamic start date missing"),
        ("[1] Ann Smith (\u{2013}) & Bob Jones (\u{2013}): 1925: 1926", "unexpected trailing segments"),
    ];
    for (record, reason) in cases {
        let err = read_record(record).unwrap_err();
        assert!(err.is_data_format(), "{record}");
        assert!(err.to_string().contains(reason), "{record}: {err}");
        assert_eq!(err.fragment(), Some(record));
    }
}

#[test]
fn reader_rejects_invalid_dates() {
    let err = read_record("[1] Ann Smith (Spring 1900 \u{2013} 1950)").unwrap_err();
    assert!(err.is_data_format());
}

#[test]
fn three_dates_without_in_law_do_not_survive_a_round_trip() {
    let mut pool = PersonPool::new();
    let lines = decompose("I: Ann Smith 1900 1920 1980", &mut pool).unwrap().lines;
    let rendered = lines[0].to_string();
    assert_eq!(rendered, "[1] Ann Smith (1900 \u{2013} 1980): 1920");
    assert!(read_record(&rendered).unwrap_err().is_data_format());
}

#[test]
fn reading_fails_on_the_first_bad_page() {
    let pages = PagedText::new(vec![
        "[1] Ann Smith (1900 \u{2013} 1950)".to_string(),
        "[2] (\u{2013})".to_string(),
    ]);
    let err = TemplateReader::new(family()).read(&pages).unwrap_err();
    assert_eq!(err.fragment(), Some("[2] (\u{2013})"));
}
