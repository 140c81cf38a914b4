use rat_mask::string_surface::StringSurface;
use rat_mask::{
    CharClass, EditOutcome, EditRequest, FieldState, FormatSymbolTable, GlyphClass, Measure,
    RenderMode, upos_type,
};

fn setup(formats: &[&str]) -> (FieldState, StringSurface) {
    let mut field = FieldState::with_formats(formats.iter().copied());
    let mut surface = StringSurface::new();
    surface.revalidate(&mut field);
    (field, surface)
}

#[test]
fn test_typing() {
    let (mut field, mut surface) = setup(&["ddd-ddd"]);

    for c in ["1", "2", "3", "4"] {
        assert_eq!(surface.type_str(&mut field, c), EditOutcome::Changed);
    }
    assert_eq!(surface.text(), "1234");
    assert_eq!(surface.cursor(), 4);
    assert_eq!(surface.display(&field), "123-4");
    assert_eq!(surface.layers(), field.decorations());

    assert_eq!(surface.type_str(&mut field, "x"), EditOutcome::Rejected);
    assert_eq!(surface.text(), "1234");

    assert_eq!(surface.backspace(&mut field), EditOutcome::Changed);
    assert_eq!(surface.text(), "123");
    assert_eq!(surface.display(&field), "123");
    assert_eq!(surface.layers(), field.decorations());
}

#[test]
fn test_pending_cursor() {
    let (mut field, mut surface) = setup(&["ddd-ddd"]);

    assert_eq!(
        surface.edit(&mut field, EditRequest::insert(0, "123-456")),
        EditOutcome::Changed
    );
    assert_eq!(surface.text(), "123456");
    // not before the host had its turn.
    assert_eq!(surface.cursor(), 0);
    assert_eq!(surface.pending_cursor(), Some(6));
    assert!(surface.run_pending());
    assert_eq!(surface.cursor(), 6);
    assert!(!surface.run_pending());
}

#[test]
fn test_trim() {
    let (mut field, mut surface) = setup(&["ddd-ddd"]);

    assert_eq!(
        surface.edit(&mut field, EditRequest::insert(0, " 12\n")),
        EditOutcome::Changed
    );
    assert_eq!(surface.text(), "12");
    assert_eq!(surface.pending_cursor(), Some(2));

    field.set_trim_input(false);
    assert_eq!(
        surface.edit(&mut field, EditRequest::insert(2, " 3")),
        EditOutcome::Rejected
    );
}

#[test]
fn test_filter() {
    let (mut field, mut surface) = setup(&["ddd-ddd"]);

    let mut seen = Vec::new();
    let r = surface.edit_filtered(&mut field, EditRequest::insert(0, " 12 "), &mut |e| {
        seen.push(e.text.clone());
        false
    });
    assert_eq!(r, EditOutcome::Vetoed);
    assert_eq!(seen, vec!["12".to_string()]);
    assert_eq!(surface.text(), "");

    let r = surface.edit_filtered(&mut field, EditRequest::insert(0, "12"), &mut |_| true);
    assert_eq!(r, EditOutcome::Changed);
    assert_eq!(surface.text(), "12");

    // a rejected edit stays rejected, and the filter never sees it.
    let mut called = false;
    let r = surface.edit_filtered(&mut field, EditRequest::insert(2, "a"), &mut |_| {
        called = true;
        true
    });
    assert_eq!(r, EditOutcome::Rejected);
    assert!(!called);
}

#[test]
fn test_filter_keeps_format() {
    let (mut field, mut surface) = setup(&["dd-dd", "wwww"]);
    surface.type_str(&mut field, "123");
    assert_eq!(field.current_format(), Some("dd-dd"));
    assert_eq!(surface.display(&field), "12-3");

    // "wwww" would accept this one.
    let edit = EditRequest::replace_all(surface.text(), "abcd");
    let r = surface.edit_filtered(&mut field, edit, &mut |_| false);
    assert_eq!(r, EditOutcome::Vetoed);
    assert_eq!(surface.text(), "123");
    assert_eq!(field.current_format(), Some("dd-dd"));
    assert_eq!(field.formatted_text(surface.text()), "12-3");
    assert_eq!(surface.display(&field), "12-3");
    assert_eq!(surface.layers(), field.decorations());

    let edit = EditRequest::replace_all(surface.text(), "abcd");
    let r = surface.edit_filtered(&mut field, edit, &mut |_| true);
    assert_eq!(r, EditOutcome::Changed);
    assert_eq!(field.current_format(), Some("wwww"));
    assert_eq!(surface.display(&field), "abcd");
}

#[test]
fn test_passthrough() {
    let mut field = FieldState::new();
    let mut surface = StringSurface::new();

    assert_eq!(
        surface.edit(&mut field, EditRequest::insert(0, "non-formatted text")),
        EditOutcome::Passthrough
    );
    assert_eq!(surface.text(), "non-formatted text");
    assert_eq!(field.formatted_text(surface.text()), "non-formatted text");
    assert_eq!(surface.display(&field), "non-formatted text");

    // no trimming either.
    assert_eq!(
        surface.edit(&mut field, EditRequest::insert(18, " ")),
        EditOutcome::Passthrough
    );
    assert_eq!(surface.text(), "non-formatted text ");
}

#[test]
fn test_fallback() {
    let mut symbols = FormatSymbolTable::new();
    symbols
        .insert('7', CharClass::OneOf("7".into()))
        .expect("symbol");

    let mut field = FieldState::new();
    field.set_symbols(symbols);
    let mut surface = StringSurface::new();
    surface.set_formats(&mut field, ["+7(ddd)ddd-dd-dd", "dddddd ₽"]);
    assert_eq!(surface.display(&field), "+");

    surface.type_str(&mut field, "7912");
    assert_eq!(field.current_format(), Some("+7(ddd)ddd-dd-dd"));
    assert_eq!(surface.display(&field), "+7(912");

    surface.assign(&mut field, "250");
    assert_eq!(field.current_format(), Some("dddddd ₽"));
    assert_eq!(surface.display(&field), "250 ₽");
    assert_eq!(surface.layers(), field.decorations());
}

#[test]
fn test_left_and_right() {
    let (mut field, mut surface) = setup(&["ddd-ddd"]);
    field.set_render_mode(RenderMode::LeftAndRight);
    surface.revalidate(&mut field);

    surface.type_str(&mut field, "123");
    assert_eq!(surface.display(&field), "123-");
    surface.type_str(&mut field, "4");
    assert_eq!(surface.display(&field), "123-4");
}

#[test]
fn test_whole() {
    let (mut field, mut surface) = setup(&["ddd-ddd"]);
    field.set_render_mode(RenderMode::whole_with([('d', '_')]));
    surface.revalidate(&mut field);
    assert_eq!(surface.display(&field), "___-___");

    surface.type_str(&mut field, "12");
    assert_eq!(surface.display(&field), "12_-___");
    surface.type_str(&mut field, "34");
    assert_eq!(surface.display(&field), "123-4__");
    assert_eq!(surface.layers(), field.decorations());
}

#[test]
fn test_revalidate() {
    let (mut field, mut surface) = setup(&["ddd-ddd"]);
    surface.type_str(&mut field, "1234");

    field.set_symbols(
        FormatSymbolTable::empty()
            .with('d', CharClass::Letter)
            .expect("symbol"),
    );
    surface.revalidate(&mut field);
    assert_eq!(surface.text(), "");
    assert_eq!(surface.cursor(), 0);
    assert!(surface.layers().is_empty());
}

#[test]
fn test_set_formats() {
    let (mut field, mut surface) = setup(&["ddd-ddd"]);
    surface.type_str(&mut field, "1234");

    surface.set_formats(&mut field, ["(ddd)"]);
    assert_eq!(surface.text(), "");
    // the closing literal is shown from the start.
    assert_eq!(surface.display(&field), "()");
    assert_eq!(surface.layers(), field.decorations());
}

#[test]
fn test_inset() {
    let (mut field, mut surface) = setup(&["+dd"]);
    field.set_inset(2);
    surface.revalidate(&mut field);

    surface.type_str(&mut field, "1");
    assert_eq!(surface.display(&field), "  +1");
}

/// Measurement without a decoration style.
#[derive(Debug, Default)]
struct NoDecorationStyle;

impl Measure for NoDecorationStyle {
    fn width(&self, text: &str, class: GlyphClass) -> Option<upos_type> {
        match class {
            GlyphClass::Input => Some(text.chars().count() as upos_type),
            GlyphClass::Decoration => None,
        }
    }
}

#[test]
fn test_unmeasurable() {
    let mut field = FieldState::with_formats(["ddd-ddd"]);
    let mut surface = StringSurface::with_measure(NoDecorationStyle);
    surface.revalidate(&mut field);

    surface.type_str(&mut field, "1234");
    assert_eq!(surface.text(), "1234");
    assert_eq!(surface.display(&field), "1234");
    assert!(surface.layers().is_empty());
}
