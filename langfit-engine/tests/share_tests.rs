//! Share token properties over the built-in catalog

use langfit_engine::share::{self, SharedResult};
use langfit_engine::{Catalog, PersonalityType};

#[test]
fn test_every_catalog_result_survives_a_share_link() {
    let catalog = Catalog::builtin().unwrap();
    let types = PersonalityType::all();

    for (index, record) in catalog.iter().enumerate() {
        let personality = types[index % types.len()];
        let url = share::share_url("https://langfit.example/", &record.id, personality);

        let decoded = share::decode_token_or_url(&url);
        assert_eq!(
            decoded,
            Some(SharedResult {
                language_id: record.id.clone(),
                personality,
            }),
            "{} did not survive",
            record.id
        );
    }
}

#[test]
fn test_corrupted_tokens_never_panic() {
    let token = share::encode("javascript", "ESFP".parse().unwrap());

    // Replacing any single character either still decodes to a well-formed
    // pair or is rejected; it must never panic.
    for position in 0..token.len() {
        for replacement in ['A', '-', '_', '*', '%', '|'] {
            let mut corrupted: Vec<char> = token.chars().collect();
            corrupted[position] = replacement;
            let corrupted: String = corrupted.into_iter().collect();
            if let Some(result) = share::decode(&corrupted) {
                assert!(!result.language_id.is_empty());
            }
        }
    }

    assert_eq!(share::decode("%%%%"), None);
    assert_eq!(share::decode("   "), None);
    assert_eq!(
        share::decode_token_or_url("https://langfit.example/?r=@@@"),
        None
    );
}

#[test]
fn test_loaded_catalog_id_with_delimiter_is_shareable() {
    let doc = r#"
[[language]]
id = "c|pp"
name = "C Pipe"
description = "-"
affinities = ["INTJ"]
"#;
    let catalog = Catalog::from_toml_str(doc).unwrap();
    let record = catalog.get("c|pp").unwrap();
    let personality: PersonalityType = "INTJ".parse().unwrap();

    let url = share::share_url("https://langfit.example/", &record.id, personality);
    let decoded = share::decode_token_or_url(&url).unwrap();
    assert_eq!(decoded.language_id, "c|pp");
    assert_eq!(decoded.personality, personality);
}
