use rat_mask::{FieldState, FormatSymbolTable, RenderMode, extract_typed, formatted_text};

#[test]
fn test_formatted() {
    let symbols = FormatSymbolTable::new();

    assert_eq!(
        formatted_text("ddd-ddd", &symbols, &RenderMode::LeftOnly, "123456"),
        "123-456"
    );
    assert_eq!(
        formatted_text("w*45d-_*asdf", &symbols, &RenderMode::LeftOnly, "t(9"),
        "t(459"
    );
    assert_eq!(
        formatted_text("w*45d-_*asdf", &symbols, &RenderMode::LeftAndRight, "t(9"),
        "t(459-_"
    );
    assert_eq!(
        formatted_text("w*45d-_*asdf", &symbols, &RenderMode::whole(), "t(9"),
        "t(459-_*asdf"
    );
}

#[test]
fn test_formatted_partial() {
    let symbols = FormatSymbolTable::new();

    assert_eq!(
        formatted_text("+7(ddd)ddd", &symbols, &RenderMode::LeftOnly, ""),
        "+7("
    );
    assert_eq!(
        formatted_text("ddd-ddd", &symbols, &RenderMode::LeftOnly, "12"),
        "12"
    );
    assert_eq!(
        formatted_text("ddd-ddd", &symbols, &RenderMode::whole(), "12"),
        "12d-ddd"
    );
    // more than fits
    assert_eq!(
        formatted_text("dd", &symbols, &RenderMode::LeftOnly, "123"),
        "12"
    );
}

#[test]
fn test_extract() {
    let symbols = FormatSymbolTable::new();

    assert_eq!(
        extract_typed("ddd-ddd", &symbols, &RenderMode::LeftOnly, "123-456"),
        "123456"
    );
    assert_eq!(
        extract_typed("w*45d-_*asdf", &symbols, &RenderMode::LeftOnly, "t(459"),
        "t(9"
    );
    assert_eq!(
        extract_typed(
            "w*45d-_*asdf",
            &symbols,
            &RenderMode::LeftAndRight,
            "t(459-_"
        ),
        "t(9"
    );
    assert_eq!(
        extract_typed("w*45d-_*asdf", &symbols, &RenderMode::whole(), "t(459-_*asdf"),
        "t(9"
    );
    assert_eq!(
        extract_typed("ddd-ddd", &symbols, &RenderMode::whole(), "12d-ddd"),
        "12"
    );
}

#[test]
fn test_round_trip() {
    let symbols = FormatSymbolTable::new();

    let modes = [
        RenderMode::LeftOnly,
        RenderMode::LeftAndRight,
        RenderMode::whole(),
    ];
    let cases = [
        ("ddd-ddd", "123456"),
        ("ddd-ddd", "1234"),
        ("ddd-ddd", "1"),
        ("ddd-ddd", ""),
        ("+7(ddd)ddd-dd-dd", "9123456"),
        ("w*45d-_*asdf", "t(9"),
        ("w*45d-_*asdf", "t"),
        ("dddddd ₽", "250"),
        ("(www) ddd", "abc12"),
    ];

    for mode in &modes {
        for (format, typed) in cases {
            let shown = formatted_text(format, &symbols, mode, typed);
            assert_eq!(
                extract_typed(format, &symbols, mode, &shown),
                typed,
                "{:?} {:?} {:?}",
                mode,
                format,
                shown
            );
        }
    }
}

#[test]
fn test_whole_ambiguous() {
    let symbols = FormatSymbolTable::new();

    let shown = formatted_text("**", &symbols, &RenderMode::whole(), "**");
    assert_eq!(shown, "**");
    assert_eq!(extract_typed("**", &symbols, &RenderMode::whole(), &shown), "*");
}

#[test]
fn test_field() {
    let field = FieldState::new();
    assert_eq!(field.formatted_text("non-formatted text"), "non-formatted text");

    let mut field = FieldState::with_formats(["w*45d-_*asdf"]);
    assert_eq!(field.formatted_text("t(9"), "t(459");
    field.set_render_mode(RenderMode::whole());
    assert_eq!(field.formatted_text("t(9"), "t(459-_*asdf");
    assert_eq!(field.extract_typed("t(459-_*asdf"), "t(9");
}
