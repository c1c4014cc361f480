use crate::{
    domain::{OutputFormat, SourceSystem, TransformRequest},
    error::{TransformError, TransformErrorKind},
};

#[test]
fn selections_default_to_default_variant() {
    assert_eq!(SourceSystem::default(), SourceSystem::Default);
    assert_eq!(OutputFormat::default(), OutputFormat::Default);
    assert_eq!(SourceSystem::default().as_str(), "default");
    assert_eq!(OutputFormat::default().as_str(), "default");
}

#[test]
fn option_sets_match_remote_allow_lists() {
    let sources: Vec<_> = SourceSystem::ALL.iter().map(|s| s.as_str()).collect();
    assert_eq!(
        sources,
        ["default", "github", "stripe", "shopify", "wix", "cloudflare", "webflow"]
    );

    let formats: Vec<_> = OutputFormat::ALL.iter().map(|f| f.as_str()).collect();
    assert_eq!(formats, ["default", "slack", "discord", "msteams", "email"]);
}

#[test]
fn labels_are_operator_facing() {
    assert_eq!(SourceSystem::Github.label(), "GitHub");
    assert_eq!(OutputFormat::MsTeams.label(), "Microsoft Teams");
}

#[test]
fn parses_wire_values_case_insensitively() {
    assert_eq!("Stripe".parse::<SourceSystem>(), Ok(SourceSystem::Stripe));
    assert_eq!(" msteams ".parse::<OutputFormat>(), Ok(OutputFormat::MsTeams));
}

#[test]
fn rejects_unknown_selection_with_expected_values() {
    let err = "gitlab".parse::<SourceSystem>().expect_err("must fail");
    assert_eq!(err.kind, "source");
    assert!(err.to_string().contains("github"), "unexpected error: {err}");

    let err = "teams".parse::<OutputFormat>().expect_err("must fail");
    assert_eq!(err.kind, "format");
}

#[test]
fn display_prints_wire_values() {
    assert_eq!(OutputFormat::MsTeams.to_string(), "msteams");
    assert_eq!(OutputFormat::MsTeams.label(), "Microsoft Teams");
    assert_eq!(
        SourceSystem::Cloudflare.to_string().parse::<SourceSystem>(),
        Ok(SourceSystem::Cloudflare)
    );
}

#[test]
fn request_query_pairs_carry_wire_values() {
    let request = TransformRequest::new(SourceSystem::Stripe, OutputFormat::Email, "{\"id\":1}");
    assert_eq!(
        request.query_pairs(),
        [("source", "stripe"), ("format", "email")]
    );
}

#[test]
fn malformed_json_maps_to_malformed_response() {
    let err: TransformError = serde_json::from_str::<serde_json::Value>("not json")
        .expect_err("must fail")
        .into();
    assert_eq!(err.kind(), TransformErrorKind::MalformedResponse);
}
