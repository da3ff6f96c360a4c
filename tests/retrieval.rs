//! Retrieval Integration Tests
//!
//! End-to-end scenarios over the public API: build, lookup, category
//! filtering, summaries and search.

use edukb::{
    Category, ContentEntry, KnowledgeBase, LevelContent, LoadProblem, LookupError, Relationship,
};

fn minimal(id: &str, name: &str, category: Category) -> ContentEntry {
    (1..=5).fold(ContentEntry::new(id, name, category), |entry, level| {
        entry.with_level(LevelContent::new(
            level,
            format!("Tier {} overview", level),
            format!("Tier {} details", level),
        ))
    })
}

#[test]
fn test_two_entry_scenario() {
    let a = minimal("a", "Acupuncture", Category::ManualTherapy);
    let b = minimal("b", "Ginkgo Biloba", Category::Herbal);
    let kb = KnowledgeBase::build(vec![a.clone(), b.clone()]).unwrap();

    // search("acup") -> [a]
    let found = kb.search("acup");
    assert_eq!(found, vec![&a]);

    // filterByCategory("herbal") -> [b]
    assert_eq!(kb.filter_by_category(&Category::Herbal), vec![&b]);
    assert_eq!(kb.filter_by_category_label("herbal"), vec![&b]);

    // categorySummary() -> {"manual-therapy": 1, "herbal": 1}
    let summary = serde_json::to_value(kb.category_summary()).unwrap();
    assert_eq!(
        summary,
        serde_json::json!({ "manual-therapy": 1, "herbal": 1 })
    );

    // getById("c") -> NotFound
    assert_eq!(
        kb.get_by_id("c").unwrap_err(),
        LookupError::NotFound("c".to_string())
    );
}

#[test]
fn test_duplicate_id_scenario() {
    let result = KnowledgeBase::build(vec![
        minimal("dup", "First", Category::Herbal),
        minimal("dup", "Second", Category::Safety),
    ]);

    let err = result.unwrap_err();
    assert_eq!(err.duplicate_ids(), vec!["dup"]);
    assert!(matches!(
        err.problems.as_slice(),
        [LoadProblem::DuplicateId { id, first_index: 0, second_index: 1 }] if id == "dup"
    ));
    assert!(err.to_string().contains("dup"));
}

#[test]
fn test_dangling_cross_reference_does_not_fail_build() {
    let kb = KnowledgeBase::build(vec![minimal("a", "Acupuncture", Category::ManualTherapy)
        .with_cross_reference("not-loaded-yet", Relationship::SeeAlso)])
    .unwrap();

    let entry = kb.get_by_id("a").unwrap();
    assert_eq!(entry.cross_references[0].target_id, "not-loaded-yet");
    assert!(kb.get_by_id("not-loaded-yet").is_err());
    assert_eq!(
        kb.corpus().dangling_references(),
        vec![("a", "not-loaded-yet")]
    );
}

#[test]
fn test_invalid_batch_reports_everything() {
    let mut no_summary = minimal("s", "Sauna", Category::Traditional);
    no_summary.levels.get_mut(&1).unwrap().summary.clear();
    let mut wrong_level = minimal("w", "Willow Bark", Category::Herbal);
    wrong_level.levels.get_mut(&4).unwrap().level = 2;
    let bad_reference = minimal("r", "Reiki", Category::EnergyMedicine)
        .with_cross_reference("x", Relationship::Unrecognized("friend".to_string()));

    let err = KnowledgeBase::build(vec![
        no_summary,
        wrong_level,
        bad_reference,
        minimal("s", "Sauna again", Category::Traditional),
    ])
    .unwrap_err();

    let paths: Vec<&str> = err
        .validation_errors()
        .iter()
        .map(|e| e.path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec![
            "levels.1.summary",
            "levels.4.level",
            "crossReferences[0].relationship"
        ]
    );
    assert_eq!(err.duplicate_ids(), vec!["s"]);
}

#[test]
fn test_search_covers_reference_fields() {
    let kb = KnowledgeBase::build(vec![
        minimal("ginkgo", "Ginkgo Biloba", Category::Herbal)
            .with_name_es("Ginkgo")
            .with_description("Leaf extract of the maidenhair tree")
            .with_interactions(["May potentiate anticoagulant agents"]),
        minimal("omega-3", "Omega-3 Fatty Acids", Category::Nutritional)
            .with_risks(["Fishy aftertaste"])
            .with_interactions(["Additive effect with anticoagulants"]),
        minimal("tai-chi", "Tai Chi", Category::MindBody)
            .with_patient_explanation("Slow, flowing movements with deep breathing")
            .with_level(
                LevelContent::new(2, "Balance training", "Improves proprioception")
                    .with_key_term("proprioception", "Sense of body position"),
            ),
    ])
    .unwrap();

    let ids = |query: &str| -> Vec<String> {
        kb.search(query).iter().map(|e| e.id.clone()).collect()
    };

    assert_eq!(ids("ANTICOAGULANT"), vec!["ginkgo", "omega-3"]);
    assert_eq!(ids("maidenhair"), vec!["ginkgo"]);
    assert_eq!(ids("fishy"), vec!["omega-3"]);
    assert_eq!(ids("flowing movements"), vec!["tai-chi"]);
    assert_eq!(ids("sense of body"), vec!["tai-chi"]);
    assert!(ids("").is_empty());
    assert!(ids("reflexology").is_empty());
}

#[test]
fn test_level_requests_do_not_fall_back() {
    let kb = KnowledgeBase::build(vec![minimal("a", "Acupuncture", Category::ManualTherapy)])
        .unwrap();

    assert_eq!(kb.get_level("a", 2).unwrap().summary, "Tier 2 overview");
    assert_eq!(
        kb.get_level("a", 9).unwrap_err(),
        LookupError::LevelNotFound {
            id: "a".to_string(),
            level: 9
        }
    );
}
