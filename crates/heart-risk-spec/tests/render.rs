use risk_spec::{
    Action, AnswerValue, BodyView, ContentTables, Language, PredictionResult, QuestionView,
    RiskLevel, ScreenState, TextDirection, answers_schema, build_screen, heart_risk_form, keys,
    option_selected, render_json_ui, render_text, text_changed, validate_answer,
};

fn tables() -> ContentTables {
    ContentTables::builtin().expect("content")
}

#[test]
fn choice_question_marks_selected_option() {
    let tables = tables();
    let value = AnswerValue::Int(1);
    let screen = build_screen(
        &tables,
        Language::En,
        ScreenState::Question {
            step: 2,
            value: Some(&value),
            error: None,
        },
    );

    let BodyView::Question {
        progress, question, ..
    } = &screen.body
    else {
        panic!("expected question body");
    };
    assert_eq!(progress.label, "Question 3 of 6");
    let QuestionView::SingleChoice { options, .. } = question else {
        panic!("diabetes is a choice");
    };
    let selected: Vec<_> = options.iter().filter(|option| option.selected).collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].label, "Yes");

    let enabled: Vec<_> = screen
        .actions
        .iter()
        .filter(|action| action.enabled)
        .map(|action| action.action)
        .collect();
    assert_eq!(enabled, [Action::Previous, Action::Next]);
}

#[test]
fn first_and_last_steps_adjust_actions() {
    let tables = tables();
    let first = build_screen(
        &tables,
        Language::En,
        ScreenState::Question {
            step: 0,
            value: None,
            error: None,
        },
    );
    assert!(!first.actions[0].enabled);

    let last = build_screen(
        &tables,
        Language::En,
        ScreenState::Question {
            step: 5,
            value: None,
            error: None,
        },
    );
    assert_eq!(last.actions[1].action, Action::Submit);
    assert_eq!(last.actions[1].label, "Submit");
}

#[test]
fn arabic_screen_is_right_to_left_and_translated() {
    let tables = tables();
    let value = AnswerValue::from("50");
    let screen = build_screen(
        &tables,
        Language::Ar,
        ScreenState::Question {
            step: 0,
            value: Some(&value),
            error: None,
        },
    );
    assert_eq!(screen.direction, TextDirection::Rtl);
    let text = render_text(&screen);
    assert!(text.contains("العمر"));
    assert!(text.contains("= 50"));

    let ui = render_json_ui(&screen);
    assert_eq!(ui["direction"], "rtl");
    assert_eq!(ui["body"]["state"], "question");
    assert_eq!(ui["body"]["question"]["value"], "50");
}

#[test]
fn result_shows_headline_and_two_decimal_probability() {
    let tables = tables();
    let result = PredictionResult::new(RiskLevel::High, 0.876).expect("valid");
    let screen = build_screen(&tables, Language::En, ScreenState::Result(&result));
    let text = render_text(&screen);
    assert!(text.contains("High risk of heart attack"));
    assert!(text.contains("Probability: 0.88"));
    assert_eq!(screen.actions.len(), 1);
    assert_eq!(screen.actions[0].action, Action::StartOver);
}

#[test]
fn pending_screen_disables_navigation() {
    let tables = tables();
    let screen = build_screen(&tables, Language::En, ScreenState::Pending);
    assert!(screen.actions.iter().all(|action| !action.enabled));
    assert!(matches!(screen.body, BodyView::Pending { .. }));
}

#[test]
fn change_notifications_respect_question_kind() {
    let form = heart_risk_form();
    let age = form.question_by_key(keys::AGE).expect("age");
    let sex = form.question_by_key(keys::SEX).expect("sex");

    assert_eq!(text_changed(age, " 4x "), Some(AnswerValue::from(" 4x ")));
    assert_eq!(text_changed(sex, "1"), None);
    assert_eq!(option_selected(sex, 1), Some(AnswerValue::Int(1)));
    assert_eq!(option_selected(sex, 7), None);
    assert_eq!(option_selected(age, 1), None);
}

#[test]
fn answers_schema_lists_every_question() {
    let schema = answers_schema(&tables(), Language::En);
    assert_eq!(schema["required"].as_array().map(Vec::len), Some(6));
    assert_eq!(schema["properties"]["Age"]["minimum"], 1);
    assert_eq!(schema["properties"]["PhysicalActivity"]["maximum"], 7);
    assert_eq!(
        schema["properties"]["Sex"]["anyOf"],
        serde_json::json!([
            {"type": "integer", "enum": [0, 1]},
            {"type": "string", "enum": ["0", "1"]},
        ])
    );
}

#[test]
fn answers_schema_admits_every_value_the_validator_accepts() {
    let tables = tables();
    let schema = answers_schema(&tables, Language::En);
    let form = tables.form();
    let sex = form.question_by_key(keys::SEX).expect("sex");
    let variants = schema["properties"]["Sex"]["anyOf"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    for value in [AnswerValue::Int(1), AnswerValue::from("1")] {
        assert!(validate_answer(sex, Some(&value)).is_ok());
        let as_json = serde_json::to_value(&value).expect("json");
        assert!(
            variants
                .iter()
                .any(|variant| variant["enum"].as_array().is_some_and(|e| e.contains(&as_json))),
            "{as_json} missing from schema"
        );
    }
}
