//! Binding behavior across input flavors.

use proptest::prelude::*;
use rostrum_input::{
    ArgumentMode, ArgvInput, CollectionInput, Input, InputArgument, InputDefinition, InputOption,
    OptionMode, Value,
};

fn greet_definition() -> InputDefinition {
    let mut def = InputDefinition::new();
    def.add_argument(InputArgument::new("name", ArgumentMode::REQUIRED, ""))
        .unwrap();
    def.add_argument(
        InputArgument::new("titles", ArgumentMode::OPTIONAL | ArgumentMode::IS_ARRAY, ""),
    )
    .unwrap();
    def.add_option(InputOption::new("yell", Some("y"), OptionMode::VALUE_NONE, "").unwrap())
        .unwrap();
    def.add_option(
        InputOption::new("greeting", Some("g"), OptionMode::VALUE_REQUIRED, "")
            .unwrap()
            .with_default("hello".into())
            .unwrap(),
    )
    .unwrap();
    def
}

#[test]
fn argv_and_collection_agree() {
    let def = greet_definition();

    let mut argv = ArgvInput::new(vec![
        "alice".into(),
        "dr".into(),
        "prof".into(),
        "--greeting=hi".into(),
        "-y".into(),
    ]);
    argv.bind(&def).unwrap();

    let mut collection = CollectionInput::new(vec![
        ("name".into(), "alice".into()),
        (
            "titles".into(),
            Value::Array(vec!["dr".into(), "prof".into()]),
        ),
        ("--greeting".into(), "hi".into()),
        ("-y".into(), Value::Null),
    ]);
    collection.bind(&def).unwrap();

    assert_eq!(argv.arguments(), collection.arguments());
    assert_eq!(argv.options(), collection.options());
}

#[test]
fn defaults_fill_unbound_values() {
    let def = greet_definition();
    let mut input = ArgvInput::new(vec!["bob".into()]);
    input.bind(&def).unwrap();

    assert_eq!(input.option("greeting").unwrap(), Value::from("hello"));
    assert_eq!(input.option("yell").unwrap(), Value::Bool(false));
    assert_eq!(input.argument("titles").unwrap(), Value::Array(vec![]));
}

#[test]
fn set_argument_and_option_require_declaration() {
    let def = greet_definition();
    let mut input = ArgvInput::new(vec!["bob".into()]);
    input.bind(&def).unwrap();

    input.set_argument("name", "carol".into()).unwrap();
    assert_eq!(input.argument("name").unwrap(), Value::from("carol"));
    assert!(input.set_argument("nope", Value::Null).is_err());
    assert!(input.set_option("nope", Value::Null).is_err());
}

#[test]
fn interactivity_is_sticky_across_binds() {
    let def = greet_definition();
    let mut input = ArgvInput::new(vec!["bob".into()]);
    input.set_interactive(false);
    input.bind(&def).unwrap();
    assert!(!input.is_interactive());
}

proptest! {
    /// Positional words land on the array argument in their given order.
    #[test]
    fn argv_preserves_positional_order(words in proptest::collection::vec("[a-z]{1,8}", 1..6)) {
        let def = greet_definition();
        let mut input = ArgvInput::new(words.clone());
        input.bind(&def).unwrap();

        prop_assert_eq!(input.argument("name").unwrap(), Value::from(words[0].as_str()));
        let rest: Vec<Value> = words[1..].iter().map(|w| Value::from(w.as_str())).collect();
        prop_assert_eq!(input.argument("titles").unwrap(), Value::Array(rest));
    }

    /// Every value handed to a collection input reads back unchanged
    /// after binding.
    #[test]
    fn collection_round_trips_its_values(
        name in "[a-z]{1,8}",
        titles in proptest::collection::vec("[a-z]{1,8}", 0..4),
        greeting in "[a-z]{1,8}",
        yell in any::<bool>(),
    ) {
        let def = greet_definition();
        let mut params = vec![
            ("name".to_string(), Value::from(name.as_str())),
            (
                "titles".to_string(),
                Value::Array(titles.iter().map(|t| Value::from(t.as_str())).collect()),
            ),
            ("--greeting".to_string(), Value::from(greeting.as_str())),
        ];
        if yell {
            params.push(("--yell".to_string(), Value::Null));
        }
        let mut input = CollectionInput::new(params);
        input.bind(&def).unwrap();

        prop_assert_eq!(input.argument("name").unwrap(), Value::from(name.as_str()));
        prop_assert_eq!(
            input.argument("titles").unwrap(),
            Value::Array(titles.iter().map(|t| Value::from(t.as_str())).collect())
        );
        prop_assert_eq!(input.option("greeting").unwrap(), Value::from(greeting.as_str()));
        prop_assert_eq!(input.option("yell").unwrap(), Value::Bool(yell));
    }

    /// Binding is idempotent: a second bind of the same definition yields
    /// the same view of the input.
    #[test]
    fn rebinding_is_stable(words in proptest::collection::vec("[a-z]{1,8}", 1..4)) {
        let def = greet_definition();
        let mut input = ArgvInput::new(words);
        input.bind(&def).unwrap();
        let (args, opts) = (input.arguments(), input.options());

        input.bind(&def).unwrap();
        prop_assert_eq!(input.arguments(), args);
        prop_assert_eq!(input.options(), opts);
    }
}
