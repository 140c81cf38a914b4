use rat_mask::config::FieldConfig;
use rat_mask::string_surface::StringSurface;
use rat_mask::{CharClass, FieldState, FormatSymbolTable, MaskError, RenderMode};

#[test]
fn test_load() -> Result<(), anyhow::Error> {
    let json = r#"{
        "formats": ["+7(ddd)ddd-dd-dd", "ddd-ddd"],
        "symbols": { "7": "[7]" },
        "mode": "LeftAndRight"
    }"#;

    let config: FieldConfig = serde_json::from_str(json)?;
    assert!(config.default_symbols);
    assert!(config.trailing_literals);
    assert!(config.trim_input);

    let mut field = config.build()?;
    assert_eq!(
        field.formats().collect::<Vec<_>>(),
        vec!["+7(ddd)ddd-dd-dd", "ddd-ddd"]
    );
    assert_eq!(field.render_mode(), &RenderMode::LeftAndRight);
    assert_eq!(field.symbols().class('7'), Some(&CharClass::OneOf("7".into())));
    assert_eq!(field.symbols().class('d'), Some(&CharClass::Digit));

    let mut surface = StringSurface::new();
    surface.revalidate(&mut field);
    surface.assign(&mut field, "+7(912)");
    assert_eq!(surface.text(), "7912");
    assert_eq!(surface.display(&field), "+7(912)");

    Ok(())
}

#[test]
fn test_invalid() -> Result<(), anyhow::Error> {
    let config: FieldConfig = serde_json::from_str(r#"{ "symbols": { "x": "numbers" } }"#)?;
    assert_eq!(
        config.build().err(),
        Some(MaskError::InvalidClass("numbers".into()))
    );

    let config: FieldConfig = serde_json::from_str(r#"{ "symbols": { " ": "digit" } }"#)?;
    assert_eq!(config.build().err(), Some(MaskError::InvalidSymbol(' ')));

    Ok(())
}

#[test]
fn test_store() -> Result<(), anyhow::Error> {
    let mut field = FieldState::with_formats(["ddd-ddd"]);
    field.set_render_mode(RenderMode::whole_with([('d', '_')]));
    field.set_inset(1);
    field.set_trailing_literals(false);

    let mut symbols = field.symbols().clone();
    symbols.insert('h', CharClass::OneOf("0123456789abcdef".into()))?;
    field.set_symbols(symbols);

    let config = FieldConfig::from(&field);
    assert!(config.default_symbols);
    assert_eq!(config.symbols.len(), 1);
    assert_eq!(
        config.symbols.get(&'h').map(|v| v.as_str()),
        Some("[0123456789abcdef]")
    );

    let json = serde_json::to_string(&config)?;
    let loaded: FieldConfig = serde_json::from_str(&json)?;
    assert_eq!(loaded, config);

    let rebuilt = loaded.build()?;
    assert_eq!(rebuilt.symbols(), field.symbols());
    assert_eq!(rebuilt.render_mode(), field.render_mode());
    assert_eq!(rebuilt.inset(), 1);
    assert!(!rebuilt.trailing_literals());

    Ok(())
}

#[test]
fn test_store_classes() -> Result<(), anyhow::Error> {
    let classes = [
        CharClass::OneOf("^a".into()),
        CharClass::OneOf("\\".into()),
        CharClass::OneOf("a^".into()),
        CharClass::OneOf("]".into()),
        CharClass::NoneOf("^".into()),
        CharClass::NoneOf("ab".into()),
    ];

    for class in classes {
        let mut field = FieldState::with_formats(["x"]);
        field.set_symbols(FormatSymbolTable::new().with('x', class.clone())?);

        let config = FieldConfig::from(&field);
        let json = serde_json::to_string(&config)?;
        let loaded: FieldConfig = serde_json::from_str(&json)?;
        let rebuilt = loaded.build()?;
        assert_eq!(rebuilt.symbols().class('x'), Some(&class), "{:?}", json);
    }

    Ok(())
}

#[test]
fn test_empty_class() {
    assert_eq!(
        FormatSymbolTable::new()
            .with('x', CharClass::OneOf("".into()))
            .err(),
        Some(MaskError::InvalidClass("[]".into()))
    );
    assert_eq!(
        FormatSymbolTable::new()
            .with('x', CharClass::NoneOf("".into()))
            .err(),
        Some(MaskError::InvalidClass("[^]".into()))
    );
    assert_eq!(
        CharClass::parse("[^]"),
        Err(MaskError::InvalidClass("[^]".into()))
    );
    assert_eq!(CharClass::parse("[^^]"), Ok(CharClass::NoneOf("^".into())));
    assert_eq!(CharClass::parse("[\\^]"), Ok(CharClass::OneOf("^".into())));
}
